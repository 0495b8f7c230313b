//! Action 枚举定义 (Intent)
//!
//! 用户交互转化为明确的语义化 Action

/// 用户操作枚举
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Quit,
    MoveSelectionUp,
    MoveSelectionDown,
    SwitchFocus,

    // 问题操作
    OpenQuestion,
    NewQuestion,
    StartSearch,
    StartCompose,
    Upvote,
    Downvote,
    ToggleFavorite,
    StartResolve,

    // 表单/通用交互
    Cancel,      // Esc / n
    Submit,      // Enter / y
    Input(char), // 输入字符
    DeleteChar,  // Backspace
    SwitchField, // Tab / BackTab / Up / Down
}
