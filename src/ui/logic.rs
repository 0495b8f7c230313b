//! 业务逻辑处理 (Update/Dispatch)
//!
//! 包含核心的 dispatch 逻辑和各种业务处理方法

use super::actions::Action;
use super::state::{App, AppMode, ConfirmAction, Focus, InputField};
use crate::models::QuestionId;

impl App {
    /// 核心逻辑分发，返回 true 表示退出
    pub fn dispatch(&mut self, action: Action) -> bool {
        match action {
            Action::Quit => return true,
            Action::MoveSelectionUp => self.move_up(),
            Action::MoveSelectionDown => self.move_down(),
            Action::SwitchFocus => self.switch_focus(),

            Action::OpenQuestion => self.open_question(),
            Action::NewQuestion => self.new_question(),
            Action::StartSearch => self.mode = AppMode::Searching,
            Action::StartCompose => self.start_compose(),
            Action::Upvote => self.vote(true),
            Action::Downvote => self.vote(false),
            Action::ToggleFavorite => self.toggle_favorite(),
            Action::StartResolve => self.start_resolve(),

            Action::Cancel => self.cancel(),
            Action::Submit => self.submit(),
            Action::Input(c) => {
                if let Some(buffer) = self.active_buffer() {
                    buffer.push(c);
                }
            }
            Action::DeleteChar => match self.mode {
                AppMode::ComposingQuestion => self.question_form.delete_char(),
                AppMode::ComposingResponse(_) => self.response_form.delete_char(),
                _ => {
                    if let Some(buffer) = self.active_buffer() {
                        buffer.pop();
                    }
                }
            },
            Action::SwitchField => match self.mode {
                AppMode::ComposingQuestion => self.question_form.switch_field(),
                AppMode::ComposingResponse(_) => self.response_form.switch_field(),
                _ => {}
            },
        }
        self.refresh();
        false
    }

    // ============ 导航相关 ============

    /// 向上移动选择
    pub fn move_up(&mut self) {
        match self.focus {
            Focus::Questions => self.cursor = self.cursor.saturating_sub(1),
            Focus::Responses => self.response_cursor = self.response_cursor.saturating_sub(1),
        }
    }

    /// 向下移动选择
    pub fn move_down(&mut self) {
        match self.focus {
            Focus::Questions => {
                if self.cursor + 1 < self.view.rows.len() {
                    self.cursor += 1;
                }
            }
            Focus::Responses => {
                if self.response_cursor + 1 < self.responses().len() {
                    self.response_cursor += 1;
                }
            }
        }
    }

    /// 在问题列表和回复列表之间切换
    pub fn switch_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Questions if !self.responses().is_empty() => Focus::Responses,
            _ => Focus::Questions,
        };
    }

    /// 打开光标所在的问题
    pub fn open_question(&mut self) {
        if let Some(id) = self.cursor_question_id() {
            self.selection.select(id);
            self.response_cursor = 0;
            self.response_form.clear();
        }
    }

    /// "New Question"：回到新问题表单并开始输入
    pub fn new_question(&mut self) {
        self.selection.new_question();
        self.focus = Focus::Questions;
        self.mode = AppMode::ComposingQuestion;
    }

    /// 右侧是详情则填写回复，否则填写新问题
    pub fn start_compose(&mut self) {
        self.mode = match self.selection.selected() {
            Some(id) => AppMode::ComposingResponse(id.clone()),
            None => AppMode::ComposingQuestion,
        };
    }

    // ============ 投票/收藏 ============

    /// 问题列表中作用于光标所在问题，回复列表中作用于打开的问题
    fn target_question(&self) -> Option<QuestionId> {
        match self.focus {
            Focus::Questions => self.cursor_question_id(),
            Focus::Responses => self.selection.selected().cloned(),
        }
    }

    pub fn vote(&mut self, up: bool) {
        let Some(id) = self.target_question() else {
            return;
        };
        let result = if up {
            self.store.upvote(&id)
        } else {
            self.store.downvote(&id)
        };
        if let Some(upvotes) = result {
            self.message = Some(format!("Upvotes: {upvotes}"));
        }
    }

    pub fn toggle_favorite(&mut self) {
        match self.focus {
            Focus::Questions => {
                if let Some(id) = self.cursor_question_id() {
                    self.store.toggle_favorite(&id);
                }
            }
            Focus::Responses => {
                let question = self.selection.selected().cloned();
                let response = self.cursor_response().map(|r| r.id.clone());
                if let (Some(question), Some(response)) = (question, response) {
                    self.store.toggle_response_favorite(&question, &response);
                }
            }
        }
    }

    // ============ 结帖 ============

    /// 只能结掉当前打开的问题
    pub fn start_resolve(&mut self) {
        match self.selection.selected() {
            Some(id) => self.mode = AppMode::Confirm(ConfirmAction::Resolve(id.clone())),
            None => self.message = Some("Open a question to resolve it".to_string()),
        }
    }

    /// 执行确认操作
    pub fn execute_confirm(&mut self) {
        if let AppMode::Confirm(ConfirmAction::Resolve(id)) = &self.mode {
            let id = id.clone();
            if let Some(removed) = self.store.resolve(&id) {
                self.message = Some(format!("Resolved \"{}\"", removed.subject));
            }
            self.selection.resolved(&id);
        }
        self.mode = AppMode::Normal;
    }

    // ============ 表单 ============

    fn active_buffer(&mut self) -> Option<&mut String> {
        match self.mode {
            AppMode::Searching => Some(&mut self.search),
            AppMode::ComposingQuestion => Some(self.question_form.active_mut()),
            AppMode::ComposingResponse(_) => Some(self.response_form.active_mut()),
            _ => None,
        }
    }

    fn submit(&mut self) {
        match &self.mode {
            AppMode::Searching => self.mode = AppMode::Normal,
            AppMode::ComposingQuestion => self.submit_question(),
            AppMode::ComposingResponse(id) => {
                let id = id.clone();
                self.submit_response(&id);
            }
            AppMode::Confirm(_) => self.execute_confirm(),
            AppMode::Normal => {}
        }
    }

    /// 第一个字段非空才能进入第二个字段；提交不合法时静默忽略
    pub fn submit_question(&mut self) {
        let form = &mut self.question_form;
        match form.field {
            InputField::Primary => {
                if !form.primary.trim().is_empty() {
                    form.field = InputField::Secondary;
                }
            }
            InputField::Secondary => {
                if let Some(id) = self.store.submit_question(&form.primary, &form.secondary) {
                    form.clear();
                    self.mode = AppMode::Normal;
                    self.message = Some("Question posted".to_string());
                    self.refresh();
                    if let Some(index) = self.view.position(&id) {
                        self.cursor = index;
                    }
                }
            }
        }
    }

    pub fn submit_response(&mut self, question_id: &QuestionId) {
        let form = &mut self.response_form;
        match form.field {
            InputField::Primary => {
                if !form.primary.trim().is_empty() {
                    form.field = InputField::Secondary;
                }
            }
            InputField::Secondary => {
                if self
                    .store
                    .submit_response(question_id, &form.primary, &form.secondary)
                    .is_some()
                {
                    form.clear();
                    self.mode = AppMode::Normal;
                    self.message = Some("Response posted".to_string());
                }
            }
        }
    }

    // ============ 通用操作 ============

    /// 取消当前操作；表单内容保留，搜索词清空
    pub fn cancel(&mut self) {
        match self.mode {
            AppMode::Searching => self.search.clear(),
            AppMode::Normal => self.focus = Focus::Questions,
            _ => {}
        }
        self.mode = AppMode::Normal;
        self.message = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemorySlot;
    use crate::store::Store;
    use crate::ui::state::Selection;

    fn app() -> App {
        App::new(Store::open(Box::new(MemorySlot::default())))
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.dispatch(Action::Input(c));
        }
    }

    fn post(app: &mut App, subject: &str, body: &str) -> QuestionId {
        app.dispatch(Action::NewQuestion);
        type_text(app, subject);
        app.dispatch(Action::Submit);
        type_text(app, body);
        app.dispatch(Action::Submit);
        app.store
            .questions()
            .iter()
            .find(|q| q.subject == subject)
            .map(|q| q.id.clone())
            .unwrap()
    }

    fn open(app: &mut App, id: &QuestionId) {
        app.cursor = app.view.position(id).unwrap();
        app.dispatch(Action::OpenQuestion);
    }

    #[test]
    fn test_selection_state_machine() {
        let mut selection = Selection::default();
        assert_eq!(selection, Selection::None);

        let a = QuestionId::new();
        let b = QuestionId::new();
        selection.select(a.clone());
        assert_eq!(selection.selected(), Some(&a));

        selection.resolved(&b);
        assert_eq!(selection.selected(), Some(&a));

        selection.resolved(&a);
        assert_eq!(selection, Selection::None);

        selection.select(b);
        selection.new_question();
        assert_eq!(selection, Selection::None);
    }

    #[test]
    fn test_post_question_through_form() {
        let mut app = app();
        let id = post(&mut app, "Subject", "Body");

        assert_eq!(app.store.len(), 1);
        assert_eq!(app.mode, AppMode::Normal);
        assert_eq!(app.question_form.primary, "");
        assert_eq!(app.question_form.secondary, "");
        assert_eq!(app.cursor_question_id(), Some(id));
    }

    #[test]
    fn test_blank_fields_are_rejected() {
        let mut app = app();
        app.dispatch(Action::NewQuestion);
        type_text(&mut app, "   ");
        app.dispatch(Action::Submit);
        assert_eq!(app.question_form.field, InputField::Primary);

        type_text(&mut app, "Subject");
        app.dispatch(Action::Submit);
        type_text(&mut app, "  ");
        app.dispatch(Action::Submit);

        assert!(app.store.is_empty());
        assert_eq!(app.mode, AppMode::ComposingQuestion);
        assert_eq!(app.question_form.primary, "   Subject");
    }

    #[test]
    fn test_form_fields_stay_editable() {
        let mut app = app();
        app.dispatch(Action::NewQuestion);
        type_text(&mut app, "Typo");
        app.dispatch(Action::Submit);
        assert_eq!(app.question_form.field, InputField::Secondary);

        // 第二个字段为空时 Backspace 回到主题，再按一次才删字
        app.dispatch(Action::DeleteChar);
        assert_eq!(app.question_form.field, InputField::Primary);
        app.dispatch(Action::DeleteChar);
        assert_eq!(app.question_form.primary, "Typ");

        app.dispatch(Action::SwitchField);
        assert_eq!(app.question_form.field, InputField::Secondary);
        type_text(&mut app, "Body");
        app.dispatch(Action::SwitchField);
        assert_eq!(app.question_form.field, InputField::Primary);

        // 离开表单再回来，主题仍可编辑
        app.dispatch(Action::SwitchField);
        app.dispatch(Action::Cancel);
        app.dispatch(Action::NewQuestion);
        assert_eq!(app.question_form.field, InputField::Secondary);
        app.dispatch(Action::SwitchField);
        type_text(&mut app, "e");
        assert_eq!(app.question_form.primary, "Type");
        assert_eq!(app.question_form.secondary, "Body");

        // 主题清空后不能前进到第二个字段
        for _ in 0..4 {
            app.dispatch(Action::DeleteChar);
        }
        app.dispatch(Action::SwitchField);
        assert_eq!(app.question_form.field, InputField::Primary);
    }

    #[test]
    fn test_resolve_open_question_closes_detail() {
        let mut app = app();
        let a = post(&mut app, "First", "Body");
        let b = post(&mut app, "Second", "Body");

        open(&mut app, &a);
        assert_eq!(app.selection.selected(), Some(&a));
        assert!(app.view.detail.is_some());

        app.dispatch(Action::StartResolve);
        assert_eq!(app.mode, AppMode::Confirm(ConfirmAction::Resolve(a.clone())));
        app.dispatch(Action::Submit);

        assert_eq!(app.selection, Selection::None);
        assert!(app.view.detail.is_none());
        assert!(app.store.get(&a).is_none());
        assert!(app.store.get(&b).is_some());
    }

    #[test]
    fn test_resolve_cancelled() {
        let mut app = app();
        let a = post(&mut app, "First", "Body");
        open(&mut app, &a);

        app.dispatch(Action::StartResolve);
        app.dispatch(Action::Cancel);
        assert_eq!(app.mode, AppMode::Normal);
        assert_eq!(app.store.len(), 1);
        assert_eq!(app.selection.selected(), Some(&a));
    }

    #[test]
    fn test_resolve_requires_open_question() {
        let mut app = app();
        post(&mut app, "First", "Body");
        app.dispatch(Action::StartResolve);
        assert_eq!(app.mode, AppMode::Normal);
        assert_eq!(app.store.len(), 1);
    }

    #[test]
    fn test_cursor_follows_question_after_resort() {
        let mut app = app();
        let a = post(&mut app, "First", "Body");
        let b = post(&mut app, "Second", "Body");

        app.cursor = app.view.position(&b).unwrap();
        app.dispatch(Action::Upvote);
        assert_eq!(app.view.rows[0].id, b);
        assert_eq!(app.cursor_question_id(), Some(b.clone()));

        app.dispatch(Action::MoveSelectionDown);
        app.dispatch(Action::ToggleFavorite);
        assert!(app.store.get(&a).unwrap().favorite);
        assert_eq!(app.view.rows[0].id, a);
        assert_eq!(app.cursor_question_id(), Some(a));
    }

    #[test]
    fn test_respond_and_favorite_response() {
        let mut app = app();
        let q = post(&mut app, "Subject", "Body");
        open(&mut app, &q);

        for (name, comment) in [("ann", "first"), ("bob", "second")] {
            app.dispatch(Action::StartCompose);
            assert_eq!(app.mode, AppMode::ComposingResponse(q.clone()));
            type_text(&mut app, name);
            app.dispatch(Action::Submit);
            type_text(&mut app, comment);
            app.dispatch(Action::Submit);
        }
        assert_eq!(app.store.get(&q).unwrap().responses.len(), 2);
        assert_eq!(app.response_form.primary, "");

        app.dispatch(Action::SwitchFocus);
        assert_eq!(app.focus, Focus::Responses);
        app.dispatch(Action::MoveSelectionDown);
        assert_eq!(app.cursor_response().unwrap().name, "bob");

        app.dispatch(Action::ToggleFavorite);
        let stored = app.store.get(&q).unwrap();
        assert!(!stored.responses[0].favorite);
        assert!(stored.responses[1].favorite);
        // bob 排到最前，光标跟随
        assert_eq!(app.responses()[0].name, "bob");
        assert_eq!(app.cursor_response().unwrap().name, "bob");

        app.dispatch(Action::ToggleFavorite);
        assert!(!app.store.get(&q).unwrap().responses[1].favorite);
    }

    #[test]
    fn test_search_filters_and_cancel_clears() {
        let mut app = app();
        post(&mut app, "Category theory", "functors");
        post(&mut app, "Dogs", "I like dogs");

        app.dispatch(Action::StartSearch);
        type_text(&mut app, "CAT");
        assert_eq!(app.view.rows.len(), 1);
        app.dispatch(Action::Submit);
        assert_eq!(app.mode, AppMode::Normal);
        assert_eq!(app.search, "CAT");

        app.dispatch(Action::StartSearch);
        app.dispatch(Action::Cancel);
        assert!(app.search.is_empty());
        assert_eq!(app.view.rows.len(), 2);
    }

    #[test]
    fn test_new_question_closes_detail() {
        let mut app = app();
        let q = post(&mut app, "Subject", "Body");
        open(&mut app, &q);
        app.dispatch(Action::NewQuestion);
        assert_eq!(app.selection, Selection::None);
        assert_eq!(app.mode, AppMode::ComposingQuestion);
    }

    #[test]
    fn test_quit() {
        let mut app = app();
        assert!(app.dispatch(Action::Quit));
        assert!(!app.dispatch(Action::MoveSelectionDown));
    }
}
