//! Post-processing of model output before it reaches the chat.

use std::sync::LazyLock;

use regex::Regex;

static MARKUP_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[*#_`~\-=]").expect("valid regex"));

static MARKDOWN_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[.*?\]\(.*?\)").expect("valid regex"));

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

static SPACE_BEFORE_PUNCT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+([.,!?;:])").expect("valid regex"));

static SPACE_AFTER_PUNCT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([.,!?;:])\s+").expect("valid regex"));

/// Filler phrases models like to open or pad answers with.
const BOILERPLATE: [&str; 17] = [
    "as an ai",
    "as a language model",
    "i am an ai",
    "please note that",
    "keep in mind that",
    "according to",
    "based on my knowledge",
    "i should note",
    "it's important to note",
    "here is",
    "here are",
    "for example",
    "in summary",
    "in conclusion",
    "additionally",
    "furthermore",
    "moreover",
];

static BOILERPLATE_PHRASES: LazyLock<Regex> = LazyLock::new(|| {
    let alternation = BOILERPLATE
        .iter()
        .map(|p| regex::escape(p))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!("(?i)(?:{alternation})")).expect("valid regex")
});

/// Strip markdown and filler, normalize spacing, capitalize the first letter.
pub fn clean_text(text: &str) -> String {
    let text = MARKUP_CHARS.replace_all(text, " ");
    let text = MARKDOWN_LINK.replace_all(&text, "");
    let text = BOILERPLATE_PHRASES.replace_all(&text, "");
    let text = WHITESPACE.replace_all(&text, " ");
    let text = capitalize_first(text.trim());
    let text = SPACE_BEFORE_PUNCT.replace_all(&text, "$1");
    SPACE_AFTER_PUNCT.replace_all(&text, "$1 ").into_owned()
}

fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) if first.is_lowercase() => first.to_uppercase().chain(chars).collect(),
        _ => text.to_string(),
    }
}
