use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// 问题 ID（UUIDv7，按创建时间有序）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionId(pub String);

impl QuestionId {
    pub fn new() -> Self {
        Self(Uuid::now_v7().to_string())
    }
}

impl Default for QuestionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 回复 ID，回复排序后依然能准确定位
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResponseId(pub String);

impl ResponseId {
    pub fn new() -> Self {
        Self(Uuid::now_v7().to_string())
    }
}

impl Default for ResponseId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ResponseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 对问题的回复
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    // 旧数据没有 id，加载时补一个
    #[serde(default)]
    pub id: ResponseId,
    pub name: String,
    pub comment: String,
    #[serde(default)]
    pub upvotes: i64,
    pub created_at: DateTime<Local>,
    #[serde(default)]
    pub favorite: bool,
}

impl Response {
    pub fn new(name: String, comment: String) -> Self {
        Self {
            id: ResponseId::new(),
            name,
            comment,
            upvotes: 0,
            created_at: Local::now(),
            favorite: false,
        }
    }
}

/// 讨论帖
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub subject: String,
    pub question: String,
    #[serde(default)]
    pub upvotes: i64,
    pub created_at: DateTime<Local>,
    #[serde(default)]
    pub favorite: bool,
    // 数组表必须放在最后
    #[serde(default)]
    pub responses: Vec<Response>,
}

impl Question {
    pub fn new(subject: String, question: String) -> Self {
        Self {
            id: QuestionId::new(),
            subject,
            question,
            upvotes: 0,
            created_at: Local::now(),
            favorite: false,
            responses: Vec::new(),
        }
    }

    #[allow(dead_code)]
    pub fn response(&self, id: &ResponseId) -> Option<&Response> {
        self.responses.iter().find(|r| &r.id == id)
    }

    pub fn response_mut(&mut self, id: &ResponseId) -> Option<&mut Response> {
        self.responses.iter_mut().find(|r| &r.id == id)
    }
}

/// TOML文件结构
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardData {
    pub meta: BoardMeta,
    #[serde(default)]
    pub questions: Vec<Question>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardMeta {
    pub version: String,
    pub created_at: DateTime<Local>,
    pub last_modified: DateTime<Local>,
}

pub const FORMAT_VERSION: &str = "1.0";

impl BoardData {
    pub fn new(questions: Vec<Question>, created_at: DateTime<Local>) -> Self {
        Self {
            meta: BoardMeta {
                version: FORMAT_VERSION.to_string(),
                created_at,
                last_modified: Local::now(),
            },
            questions,
        }
    }
}

impl Default for BoardData {
    fn default() -> Self {
        Self::new(Vec::new(), Local::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_question_defaults() {
        let q = Question::new("Subject".to_string(), "Body".to_string());
        assert_eq!(q.upvotes, 0);
        assert!(!q.favorite);
        assert!(q.responses.is_empty());
        assert!(!q.id.0.is_empty());
    }

    #[test]
    fn test_ids_are_unique() {
        let a = Question::new("a".to_string(), "a".to_string());
        let b = Question::new("a".to_string(), "a".to_string());
        assert_ne!(a.id, b.id);
        assert_ne!(ResponseId::new(), ResponseId::new());
    }

    #[test]
    fn test_response_lookup_by_id() {
        let mut q = Question::new("s".to_string(), "q".to_string());
        let first = Response::new("ann".to_string(), "one".to_string());
        let second = Response::new("bob".to_string(), "two".to_string());
        let second_id = second.id.clone();
        q.responses.push(first);
        q.responses.push(second);

        assert_eq!(q.response(&second_id).map(|r| r.name.as_str()), Some("bob"));
        q.response_mut(&second_id).unwrap().favorite = true;
        assert!(q.responses[1].favorite);
        assert!(q.response(&ResponseId::new()).is_none());
    }

    #[test]
    fn test_legacy_response_without_id() {
        let toml_str = r#"
            name = "ann"
            comment = "hello"
            upvotes = 3
            created_at = "2024-01-01T10:00:00+00:00"
            favorite = true
        "#;
        let response: Response = toml::from_str(toml_str).unwrap();
        assert_eq!(response.name, "ann");
        assert_eq!(response.upvotes, 3);
        assert!(response.favorite);
        assert!(!response.id.0.is_empty());
    }

    #[test]
    fn test_board_data_toml_roundtrip() {
        let mut q = Question::new("Category theory".to_string(), "What is a functor?".to_string());
        q.upvotes = -2;
        q.favorite = true;
        q.responses
            .push(Response::new("ann".to_string(), "A map between categories".to_string()));
        let data = BoardData::new(vec![q, Question::new("x".to_string(), "y".to_string())], Local::now());

        let encoded = toml::to_string_pretty(&data).unwrap();
        let decoded: BoardData = toml::from_str(&encoded).unwrap();
        assert_eq!(decoded, data);
    }
}
