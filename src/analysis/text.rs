//! Shared tokenization and statistical keyword extraction.
//!
//! Titles and descriptions mix Chinese and Latin text. Latin/digit runs
//! tokenize on the usual word boundaries; han runs have no delimiters, so a
//! short run (2-4 characters) counts as one token and longer runs contribute
//! their overlapping character bigrams.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::round3;

static ASCII_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z0-9][A-Za-z0-9]+").unwrap());

static STOPWORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "的", "了", "是", "在", "我", "有", "和", "就", "不", "人", "都", "一", "个", "上", "也",
        "很", "到", "说", "要", "去", "你", "会", "着", "没有", "看", "好", "自己", "这", "哔哩",
        "bilibili", "b站", "视频", "观看", "点赞", "投币", "收藏", "分享", "弹幕", "评论", "关注",
        "up主", "up", "播放", "更新", "发布", "上传", "链接", "地址", "网站", "平台", "用户",
        "内容",
    ]
    .into_iter()
    .collect()
});

/// An extracted keyword with its relative weight in [0, 1].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordWeight {
    pub keyword: String,
    pub weight: f64,
}

/// An extracted keyword with its raw occurrence count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordCount {
    pub keyword: String,
    pub count: u64,
}

pub fn tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();

    let lower = text.to_lowercase();
    for m in ASCII_TOKEN.find_iter(&lower) {
        let token = m.as_str();
        if token.chars().all(|c| c.is_ascii_digit()) {
            continue;
        }
        push_token(&mut tokens, token);
    }

    let mut run: Vec<char> = Vec::new();
    for ch in lower.chars().chain(std::iter::once(' ')) {
        if is_han(ch) {
            run.push(ch);
            continue;
        }
        flush_run(&mut tokens, &run);
        run.clear();
    }

    tokens
}

fn is_han(ch: char) -> bool {
    ('\u{4E00}'..='\u{9FFF}').contains(&ch)
}

fn flush_run(tokens: &mut Vec<String>, run: &[char]) {
    match run.len() {
        0 | 1 => {}
        2..=4 => push_token(tokens, &run.iter().collect::<String>()),
        _ => {
            for pair in run.windows(2) {
                push_token(tokens, &pair.iter().collect::<String>());
            }
        }
    }
}

fn push_token(tokens: &mut Vec<String>, token: &str) {
    if token.chars().count() < 2 {
        return;
    }
    if STOPWORDS.contains(token) {
        return;
    }
    tokens.push(token.to_string());
}

/// Top-k keywords by frequency, weighted relative to the most frequent one.
pub fn keyword_weights<'a, I>(texts: I, top_k: usize) -> Vec<KeywordWeight>
where
    I: IntoIterator<Item = &'a str>,
{
    let counts = ranked_counts(texts, top_k);
    let max = counts.first().map(|(_, c)| *c).unwrap_or(0) as f64;
    counts
        .into_iter()
        .map(|(keyword, count)| KeywordWeight {
            keyword,
            weight: if max > 0.0 {
                round3(count as f64 / max)
            } else {
                0.0
            },
        })
        .collect()
}

/// Top-k keywords by frequency with their raw counts.
pub fn keyword_counts<'a, I>(texts: I, top_k: usize) -> Vec<KeywordCount>
where
    I: IntoIterator<Item = &'a str>,
{
    ranked_counts(texts, top_k)
        .into_iter()
        .map(|(keyword, count)| KeywordCount { keyword, count })
        .collect()
}

fn ranked_counts<'a, I>(texts: I, top_k: usize) -> Vec<(String, u64)>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut bag: HashMap<String, u64> = HashMap::new();
    for text in texts {
        for token in tokenize(text) {
            *bag.entry(token).or_insert(0) += 1;
        }
    }

    let mut counts: Vec<(String, u64)> = bag.into_iter().collect();
    // count desc, then keyword asc for a deterministic ordering
    counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    counts.truncate(top_k);
    counts
}
