//! 列表排序规则：收藏优先，其次按票数降序
//!
//! 配合稳定排序使用，票数相同时保持创建顺序。

use std::cmp::Ordering;

use crate::models::{Question, Response};

fn favorite_then_upvotes(a: (bool, i64), b: (bool, i64)) -> Ordering {
    b.0.cmp(&a.0).then(b.1.cmp(&a.1))
}

pub fn question_order(a: &Question, b: &Question) -> Ordering {
    favorite_then_upvotes((a.favorite, a.upvotes), (b.favorite, b.upvotes))
}

pub fn response_order(a: &Response, b: &Response) -> Ordering {
    favorite_then_upvotes((a.favorite, a.upvotes), (b.favorite, b.upvotes))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(subject: &str, favorite: bool, upvotes: i64) -> Question {
        let mut q = Question::new(subject.to_string(), "body".to_string());
        q.favorite = favorite;
        q.upvotes = upvotes;
        q
    }

    fn response(name: &str, favorite: bool, upvotes: i64) -> Response {
        let mut r = Response::new(name.to_string(), "comment".to_string());
        r.favorite = favorite;
        r.upvotes = upvotes;
        r
    }

    #[test]
    fn test_favorite_beats_upvotes() {
        let mut list = vec![question("popular", false, 100), question("starred", true, 2)];
        list.sort_by(question_order);
        assert_eq!(list[0].subject, "starred");
    }

    #[test]
    fn test_upvotes_descending_within_favorite_group() {
        let mut list = vec![
            question("a", false, 1),
            question("b", true, 3),
            question("c", false, 7),
            question("d", true, 9),
            question("e", false, -4),
        ];
        list.sort_by(question_order);
        let order: Vec<_> = list.iter().map(|q| q.subject.as_str()).collect();
        assert_eq!(order, vec!["d", "b", "c", "a", "e"]);
    }

    #[test]
    fn test_ties_keep_insertion_order() {
        let mut list = vec![question("first", false, 5), question("second", false, 5)];
        list.sort_by(question_order);
        assert_eq!(list[0].subject, "first");
    }

    #[test]
    fn test_response_order_is_transitive() {
        let responses = vec![
            response("low", false, 1),
            response("fav-low", true, -3),
            response("high", false, 10),
            response("fav-high", true, 4),
        ];

        for a in &responses {
            for b in &responses {
                for c in &responses {
                    let ab = response_order(a, b);
                    let bc = response_order(b, c);
                    if ab == bc && ab != Ordering::Equal {
                        assert_eq!(response_order(a, c), ab);
                    }
                }
            }
        }

        let mut sorted = responses.clone();
        sorted.sort_by(response_order);
        let order: Vec<_> = sorted.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(order, vec!["fav-high", "fav-low", "high", "low"]);
    }
}
