//! App 状态定义 (Model)
//!
//! 包含应用状态结构体、详情面板的选择状态机及相关枚举

use chrono::Local;

use crate::board::{BoardView, ResponseRow, compute_view};
use crate::models::{QuestionId, ResponseId};
use crate::store::Store;

/// 右侧面板显示什么：新问题表单，或某个问题的详情
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Selection {
    #[default]
    None,
    Question(QuestionId),
}

impl Selection {
    /// 从列表打开问题
    pub fn select(&mut self, id: QuestionId) {
        *self = Selection::Question(id);
    }

    /// "New Question"
    pub fn new_question(&mut self) {
        *self = Selection::None;
    }

    /// 结帖后调用；只有结掉的是当前打开的问题时才关闭详情
    pub fn resolved(&mut self, id: &QuestionId) {
        if self.selected() == Some(id) {
            *self = Selection::None;
        }
    }

    pub fn selected(&self) -> Option<&QuestionId> {
        match self {
            Selection::None => None,
            Selection::Question(id) => Some(id),
        }
    }
}

/// 键盘焦点所在的列表
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Questions,
    Responses,
}

/// 应用模式
#[derive(Debug, Clone, PartialEq)]
pub enum AppMode {
    Normal,
    Searching,
    ComposingQuestion,
    ComposingResponse(QuestionId),
    Confirm(ConfirmAction),
}

/// 确认操作类型
#[derive(Debug, Clone, PartialEq)]
pub enum ConfirmAction {
    Resolve(QuestionId),
}

/// 输入字段类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputField {
    Primary,
    Secondary,
}

/// 两个必填字段的表单：问题 (主题/内容)，回复 (名字/评论)
#[derive(Debug, Clone, PartialEq)]
pub struct Form {
    pub primary: String,
    pub secondary: String,
    pub field: InputField,
}

impl Default for Form {
    fn default() -> Self {
        Self {
            primary: String::new(),
            secondary: String::new(),
            field: InputField::Primary,
        }
    }
}

impl Form {
    pub fn active_mut(&mut self) -> &mut String {
        match self.field {
            InputField::Primary => &mut self.primary,
            InputField::Secondary => &mut self.secondary,
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// 第二个字段总能回到第一个；第一个字段非空才能前进
    pub fn switch_field(&mut self) {
        self.field = match self.field {
            InputField::Secondary => InputField::Primary,
            InputField::Primary if !self.primary.trim().is_empty() => InputField::Secondary,
            InputField::Primary => InputField::Primary,
        };
    }

    /// Backspace：第二个字段已空时退回第一个字段
    pub fn delete_char(&mut self) {
        if self.field == InputField::Secondary && self.secondary.is_empty() {
            self.field = InputField::Primary;
        } else {
            self.active_mut().pop();
        }
    }
}

/// 应用状态
pub struct App {
    pub store: Store,
    pub view: BoardView,
    pub selection: Selection,
    pub focus: Focus,
    pub cursor: usize,
    pub response_cursor: usize,
    pub mode: AppMode,
    pub search: String,
    pub question_form: Form,
    pub response_form: Form,
    pub message: Option<String>,
}

impl App {
    /// 创建新的应用实例
    pub fn new(store: Store) -> Self {
        let mut app = Self {
            store,
            view: BoardView::default(),
            selection: Selection::None,
            focus: Focus::Questions,
            cursor: 0,
            response_cursor: 0,
            mode: AppMode::Normal,
            search: String::new(),
            question_form: Form::default(),
            response_form: Form::default(),
            message: None,
        };
        app.refresh();
        app
    }

    /// 重新计算派生视图，光标尽量停留在原来的条目上
    pub fn refresh(&mut self) {
        let cursor_id = self.cursor_question_id();
        let response_id = self.cursor_response().map(|r| r.id.clone());

        if let Some(id) = self.selection.selected() {
            if self.store.get(id).is_none() {
                self.selection.new_question();
            }
        }

        self.view = compute_view(
            self.store.questions(),
            &self.search,
            self.selection.selected(),
            Local::now(),
        );

        if let Some(index) = cursor_id.and_then(|id| self.view.position(&id)) {
            self.cursor = index;
        }
        self.cursor = clamp(self.cursor, self.view.rows.len());

        let responses = self.responses();
        if let Some(index) = response_id.and_then(|id| position(responses, &id)) {
            self.response_cursor = index;
        }
        self.response_cursor = clamp(self.response_cursor, self.responses().len());

        if self.responses().is_empty() {
            self.focus = Focus::Questions;
        }
    }

    /// 光标所在行的问题 ID
    pub fn cursor_question_id(&self) -> Option<QuestionId> {
        self.view.rows.get(self.cursor).map(|row| row.id.clone())
    }

    /// 详情中排好序的回复
    pub fn responses(&self) -> &[ResponseRow] {
        self.view
            .detail
            .as_ref()
            .map(|d| d.responses.as_slice())
            .unwrap_or_default()
    }

    pub fn cursor_response(&self) -> Option<&ResponseRow> {
        self.responses().get(self.response_cursor)
    }
}

fn clamp(index: usize, len: usize) -> usize {
    if len == 0 { 0 } else { index.min(len - 1) }
}

fn position(responses: &[ResponseRow], id: &ResponseId) -> Option<usize> {
    responses.iter().position(|r| &r.id == id)
}
