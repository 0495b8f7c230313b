use chrono::{DateTime, Local};

/// 相对时间，只取最大的非零单位
pub fn time_since(then: DateTime<Local>, now: DateTime<Local>) -> String {
    let seconds = (now - then).num_seconds().max(0);
    let minutes = seconds / 60;
    let hours = minutes / 60;
    let days = hours / 24;

    if days > 0 {
        format!("{days} days ago")
    } else if hours > 0 {
        format!("{hours} hours ago")
    } else if minutes > 0 {
        format!("{minutes} minutes ago")
    } else {
        format!("{seconds} seconds ago")
    }
}
