//! 派生视图
//!
//! 每次刷新界面时由表现层调用 `compute_view`：过滤、排序、高亮、计算相对时间。

use chrono::{DateTime, Local};

use crate::models::{Question, QuestionId, ResponseId};
use crate::ordering::{question_order, response_order};
use crate::search::{self, Fragment};
use crate::timefmt::time_since;

/// 左侧列表中的一行
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionRow {
    pub id: QuestionId,
    pub subject: Vec<Fragment>,
    pub question: Vec<Fragment>,
    pub upvotes: i64,
    pub favorite: bool,
    pub age: String,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResponseRow {
    pub id: ResponseId,
    pub name: String,
    pub comment: String,
    pub upvotes: i64,
    pub favorite: bool,
    pub age: String,
}

/// 右侧详情：打开的问题及其排好序的回复
#[derive(Debug, Clone, PartialEq)]
pub struct Detail {
    pub id: QuestionId,
    pub subject: String,
    pub question: String,
    pub upvotes: i64,
    pub favorite: bool,
    pub age: String,
    pub responses: Vec<ResponseRow>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct BoardView {
    pub rows: Vec<QuestionRow>,
    pub detail: Option<Detail>,
}

impl BoardView {
    pub fn position(&self, id: &QuestionId) -> Option<usize> {
        self.rows.iter().position(|row| &row.id == id)
    }
}

pub fn compute_view(
    questions: &[Question],
    search_term: &str,
    selected: Option<&QuestionId>,
    now: DateTime<Local>,
) -> BoardView {
    let mut visible: Vec<&Question> = questions
        .iter()
        .filter(|q| search::matches(q, search_term))
        .collect();
    visible.sort_by(|a, b| question_order(a, b));

    let rows = visible
        .into_iter()
        .map(|q| QuestionRow {
            id: q.id.clone(),
            subject: search::highlight(&q.subject, search_term),
            question: search::highlight(&q.question, search_term),
            upvotes: q.upvotes,
            favorite: q.favorite,
            age: time_since(q.created_at, now),
            selected: selected == Some(&q.id),
        })
        .collect();

    // 详情不受搜索过滤影响
    let detail = selected
        .and_then(|id| questions.iter().find(|q| &q.id == id))
        .map(|q| detail_for(q, now));

    BoardView { rows, detail }
}

fn detail_for(q: &Question, now: DateTime<Local>) -> Detail {
    let mut responses: Vec<_> = q.responses.iter().collect();
    responses.sort_by(|a, b| response_order(a, b));

    Detail {
        id: q.id.clone(),
        subject: q.subject.clone(),
        question: q.question.clone(),
        upvotes: q.upvotes,
        favorite: q.favorite,
        age: time_since(q.created_at, now),
        responses: responses
            .into_iter()
            .map(|r| ResponseRow {
                id: r.id.clone(),
                name: r.name.clone(),
                comment: r.comment.clone(),
                upvotes: r.upvotes,
                favorite: r.favorite,
                age: time_since(r.created_at, now),
            })
            .collect(),
    }
}
