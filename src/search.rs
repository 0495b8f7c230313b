//! 搜索与高亮
//!
//! 大小写不敏感的子串匹配。整段转小写后查找，再把匹配映射回原文，
//! 匹配落在某个展开字符内部时高亮整个原字符。

use crate::models::Question;

/// 高亮切分后的一个片段
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub text: String,
    pub highlighted: bool,
}

impl Fragment {
    fn plain(text: &str) -> Self {
        Self {
            text: text.to_string(),
            highlighted: false,
        }
    }

    fn marked(text: &str) -> Self {
        Self {
            text: text.to_string(),
            highlighted: true,
        }
    }
}

fn lowered(term: &str) -> Vec<char> {
    term.chars().flat_map(char::to_lowercase).collect()
}

/// 小写后的一个字符，以及它来源字符在原文中的字节范围
struct Folded {
    c: char,
    start: usize,
    end: usize,
}

/// 整段转小写；一个字符可能展开成多个 (如 'İ')
fn fold(text: &str) -> Vec<Folded> {
    text.char_indices()
        .flat_map(|(start, c)| {
            let end = start + c.len_utf8();
            c.to_lowercase().map(move |lc| Folded { c: lc, start, end })
        })
        .collect()
}

/// 从 `folded[from..]` 开始最左匹配，返回原文中的字节范围
fn find_from(folded: &[Folded], from: usize, needle: &[char]) -> Option<(usize, usize)> {
    let rest = folded.get(from..)?;
    rest.windows(needle.len())
        .position(|window| window.iter().map(|f| f.c).eq(needle.iter().copied()))
        .map(|i| (rest[i].start, rest[i + needle.len() - 1].end))
}

/// `text` 是否包含 `term`；空搜索词匹配一切
pub fn contains(text: &str, term: &str) -> bool {
    let needle = lowered(term);
    if needle.is_empty() {
        return true;
    }
    find_from(&fold(text), 0, &needle).is_some()
}

/// 主题或内容任一包含搜索词即命中
pub fn matches(question: &Question, term: &str) -> bool {
    contains(&question.subject, term) || contains(&question.question, term)
}

/// 按搜索词把文本切成普通/高亮交替的片段，匹配之间互不重叠
pub fn highlight(text: &str, term: &str) -> Vec<Fragment> {
    let needle = lowered(term);
    if needle.is_empty() {
        return vec![Fragment::plain(text)];
    }

    let folded = fold(text);
    let mut fragments = Vec::new();
    let mut start = 0;
    let mut from = 0;
    while let Some((at, end)) = find_from(&folded, from, &needle) {
        if at > start {
            fragments.push(Fragment::plain(&text[start..at]));
        }
        fragments.push(Fragment::marked(&text[at..end]));
        start = end;
        from = folded
            .iter()
            .position(|f| f.start >= end)
            .unwrap_or(folded.len());
    }
    if start < text.len() || fragments.is_empty() {
        fragments.push(Fragment::plain(&text[start..]));
    }
    fragments
}
