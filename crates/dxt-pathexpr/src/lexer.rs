//! `TagLexer`: finds directive tokens (`{...}`) in run text and whole
//! paragraphs.

use regex::Regex;
use std::sync::OnceLock;

fn inline_token_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{([^{}]+)\}").expect("static regex is valid"))
}

fn whole_paragraph_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\{([^{}]+)\}$").expect("static regex is valid"))
}

/// One `{...}` token found in a run's text, with its byte offsets in that
/// text so the caller can splice the resolved value back in.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub raw: String,
    pub start: usize,
    pub end: usize,
}

/// Returns every `{...}` token in `text`, left to right.
pub fn find_tokens(text: &str) -> Vec<Token> {
    inline_token_re()
        .captures_iter(text)
        .map(|c| {
            let whole = c.get(0).expect("group 0 always matches");
            let inner = c.get(1).expect("capture group 1 is mandatory in the pattern");
            Token {
                raw: inner.as_str().to_string(),
                start: whole.start(),
                end: whole.end(),
            }
        })
        .collect()
}

/// If `text`, trimmed, is exactly one `{...}` token with nothing else
/// around it, returns the inner directive text.
pub fn as_whole_paragraph_token(text: &str) -> Option<&str> {
    whole_paragraph_re()
        .captures(text.trim())
        .map(|c| c.get(1).expect("capture group 1 is mandatory in the pattern").as_str())
}
