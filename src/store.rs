//! 问题集合的唯一持有者
//!
//! 所有变更都经过 `Store`：变更成功后整体覆盖持久化槽位，再通知订阅者。

use chrono::{DateTime, Local};
use tracing::{debug, info, warn};

use crate::models::{BoardData, Question, QuestionId, Response, ResponseId};
use crate::storage::{self, Slot};

/// 一次成功变更的描述
#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    QuestionAdded(QuestionId),
    ResponseAdded {
        question: QuestionId,
        response: ResponseId,
    },
    Voted {
        question: QuestionId,
        upvotes: i64,
    },
    FavoriteToggled {
        question: QuestionId,
        favorite: bool,
    },
    ResponseFavoriteToggled {
        question: QuestionId,
        response: ResponseId,
        favorite: bool,
    },
    Resolved(QuestionId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionId(u64);

type Subscriber = Box<dyn FnMut(&StoreEvent, &[Question])>;

pub struct Store {
    questions: Vec<Question>,
    created_at: DateTime<Local>,
    slot: Box<dyn Slot>,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: u64,
}

impl Store {
    /// 从槽位恢复集合
    pub fn open(slot: Box<dyn Slot>) -> Self {
        let data = storage::load_or_default(slot.as_ref());
        info!(questions = data.questions.len(), "board loaded");
        Self {
            questions: data.questions,
            created_at: data.meta.created_at,
            slot,
            subscribers: Vec::new(),
            next_subscription: 0,
        }
    }

    // ============ 读取 ============

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn get(&self, id: &QuestionId) -> Option<&Question> {
        self.questions.iter().find(|q| &q.id == id)
    }

    fn get_mut(&mut self, id: &QuestionId) -> Option<&mut Question> {
        self.questions.iter_mut().find(|q| &q.id == id)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    // ============ 订阅 ============

    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&StoreEvent, &[Question]) + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    #[allow(dead_code)]
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub, _)| *sub != id);
        self.subscribers.len() != before
    }

    // ============ 变更 ============

    /// 发布新问题；主题或内容去掉空白后为空则忽略
    pub fn submit_question(&mut self, subject: &str, question: &str) -> Option<QuestionId> {
        if subject.trim().is_empty() || question.trim().is_empty() {
            return None;
        }

        let q = Question::new(subject.to_string(), question.to_string());
        let id = q.id.clone();
        self.questions.push(q);
        debug!(question = %id, "question added");
        self.commit(StoreEvent::QuestionAdded(id.clone()));
        Some(id)
    }

    /// 回复问题；字段为空或问题已不存在则忽略
    pub fn submit_response(
        &mut self,
        question_id: &QuestionId,
        name: &str,
        comment: &str,
    ) -> Option<ResponseId> {
        if name.trim().is_empty() || comment.trim().is_empty() {
            return None;
        }

        let question = self.get_mut(question_id)?;
        let response = Response::new(name.to_string(), comment.to_string());
        let response_id = response.id.clone();
        question.responses.push(response);
        debug!(question = %question_id, response = %response_id, "response added");
        self.commit(StoreEvent::ResponseAdded {
            question: question_id.clone(),
            response: response_id.clone(),
        });
        Some(response_id)
    }

    pub fn upvote(&mut self, id: &QuestionId) -> Option<i64> {
        self.vote(id, 1)
    }

    pub fn downvote(&mut self, id: &QuestionId) -> Option<i64> {
        self.vote(id, -1)
    }

    // 票数不设上下限
    fn vote(&mut self, id: &QuestionId, delta: i64) -> Option<i64> {
        let question = self.get_mut(id)?;
        question.upvotes += delta;
        let upvotes = question.upvotes;
        debug!(question = %id, upvotes, "vote recorded");
        self.commit(StoreEvent::Voted {
            question: id.clone(),
            upvotes,
        });
        Some(upvotes)
    }

    pub fn toggle_favorite(&mut self, id: &QuestionId) -> Option<bool> {
        let question = self.get_mut(id)?;
        question.favorite = !question.favorite;
        let favorite = question.favorite;
        self.commit(StoreEvent::FavoriteToggled {
            question: id.clone(),
            favorite,
        });
        Some(favorite)
    }

    pub fn toggle_response_favorite(
        &mut self,
        question_id: &QuestionId,
        response_id: &ResponseId,
    ) -> Option<bool> {
        let response = self.get_mut(question_id)?.response_mut(response_id)?;
        response.favorite = !response.favorite;
        let favorite = response.favorite;
        self.commit(StoreEvent::ResponseFavoriteToggled {
            question: question_id.clone(),
            response: response_id.clone(),
            favorite,
        });
        Some(favorite)
    }

    /// 结帖：永久移除问题及其全部回复，其余问题顺序不变
    pub fn resolve(&mut self, id: &QuestionId) -> Option<Question> {
        let index = self.questions.iter().position(|q| &q.id == id)?;
        let removed = self.questions.remove(index);
        info!(question = %id, responses = removed.responses.len(), "question resolved");
        self.commit(StoreEvent::Resolved(id.clone()));
        Some(removed)
    }

    /// 整体覆盖槽位后通知订阅者；写入失败只记录日志
    fn commit(&mut self, event: StoreEvent) {
        let data = BoardData::new(self.questions.clone(), self.created_at);
        if let Err(e) = self.slot.write(&data) {
            warn!(error = %e, "failed to persist board");
        }

        for (_, subscriber) in self.subscribers.iter_mut() {
            subscriber(&event, &self.questions);
        }
    }
}
