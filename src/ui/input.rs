//! 键盘事件映射 (Input -> Action)
//!
//! 将按键事件转换为 Action

use std::io;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::actions::Action;
use super::state::{App, AppMode, Focus};

/// 根据当前模式、焦点和按键获取对应的 Action
pub fn get_action(mode: &AppMode, focus: Focus, key: KeyCode) -> Option<Action> {
    match mode {
        AppMode::Normal => match (focus, key) {
            (_, KeyCode::Char('q')) => Some(Action::Quit),
            (_, KeyCode::Char('j') | KeyCode::Down) => Some(Action::MoveSelectionDown),
            (_, KeyCode::Char('k') | KeyCode::Up) => Some(Action::MoveSelectionUp),
            (_, KeyCode::Tab) => Some(Action::SwitchFocus),
            (_, KeyCode::Char('n')) => Some(Action::NewQuestion),
            (_, KeyCode::Char('/')) => Some(Action::StartSearch),
            (_, KeyCode::Char('c')) => Some(Action::StartCompose),
            (_, KeyCode::Char('u')) => Some(Action::Upvote),
            (_, KeyCode::Char('d')) => Some(Action::Downvote),
            (_, KeyCode::Char('f')) => Some(Action::ToggleFavorite),
            (_, KeyCode::Char('r')) => Some(Action::StartResolve),
            (Focus::Questions, KeyCode::Enter) => Some(Action::OpenQuestion),
            (Focus::Responses, KeyCode::Esc) => Some(Action::Cancel),
            _ => None,
        },
        AppMode::Searching => match key {
            KeyCode::Esc => Some(Action::Cancel),
            KeyCode::Enter => Some(Action::Submit),
            KeyCode::Backspace => Some(Action::DeleteChar),
            KeyCode::Char(c) => Some(Action::Input(c)),
            _ => None,
        },
        AppMode::ComposingQuestion | AppMode::ComposingResponse(_) => match key {
            KeyCode::Esc => Some(Action::Cancel),
            KeyCode::Enter => Some(Action::Submit),
            KeyCode::Backspace => Some(Action::DeleteChar),
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                Some(Action::SwitchField)
            }
            KeyCode::Char(c) => Some(Action::Input(c)),
            _ => None,
        },
        AppMode::Confirm(_) => match key {
            KeyCode::Char('y') | KeyCode::Char('Y') => Some(Action::Submit),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => Some(Action::Cancel),
            _ => None,
        },
    }
}

/// 组合键：Ctrl-C 任何模式下退出，其余 Ctrl/Alt 组合键忽略
fn chord_action(key: &KeyEvent) -> Option<Option<Action>> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return Some(match key.code {
            KeyCode::Char('c') => Some(Action::Quit),
            _ => None,
        });
    }
    if key.modifiers.contains(KeyModifiers::ALT) {
        return Some(None);
    }
    None
}

/// 处理按键事件
pub fn handle_key_event(app: &mut App, key: KeyEvent) -> io::Result<bool> {
    let action = match chord_action(&key) {
        Some(action) => action,
        None => get_action(&app.mode, app.focus, key.code),
    };

    if let Some(action) = action {
        Ok(app.dispatch(action))
    } else {
        Ok(false)
    }
}
