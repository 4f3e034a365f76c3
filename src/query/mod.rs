//! Query templates
//!
//! A template is SQL text that may contain named placeholders of the form `:name`,
//! where `name` is one or more ASCII word characters (`[A-Za-z0-9_]`). Templates are
//! tokenized once when the distribution index is built, so rendering under load
//! never has to run the regex again.
//!
//! # Example
//!
//! ```
//! use sqlpulse::query::Template;
//!
//! let template = Template::new("select * from t where a = :a and b = :b");
//! let names: Vec<&str> = template.tokens().collect();
//! assert_eq!(names, vec!["a", "b"]);
//! ```

pub mod render;

use regex::Regex;
use std::fmt;
use std::ops::Range;
use std::sync::OnceLock;

fn token_regex() -> &'static Regex {
    static TOKEN: OnceLock<Regex> = OnceLock::new();
    TOKEN.get_or_init(|| Regex::new(r":([A-Za-z0-9_]+)").expect("token pattern is valid"))
}

/// Piece of a tokenized template
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    /// Verbatim text
    Literal(Range<usize>),
    /// Placeholder; `span` covers the leading colon, `name` only the identifier
    Token { span: Range<usize>, name: Range<usize> },
}

/// Tokenized, immutable query template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    text: String,
    segments: Vec<Segment>,
}

impl Template {
    /// Tokenize a query text
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let mut segments = Vec::new();
        let mut last = 0;

        for caps in token_regex().captures_iter(&text) {
            let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            if whole.start() > last {
                segments.push(Segment::Literal(last..whole.start()));
            }
            segments.push(Segment::Token {
                span: whole.range(),
                name: name.range(),
            });
            last = whole.end();
        }
        if last < text.len() {
            segments.push(Segment::Literal(last..text.len()));
        }

        Self { text, segments }
    }

    /// Original template text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Placeholder names in order of appearance, repeats included
    pub fn tokens(&self) -> impl Iterator<Item = &str> + '_ {
        self.segments.iter().filter_map(move |segment| match segment {
            Segment::Token { name, .. } => Some(&self.text[name.clone()]),
            Segment::Literal(_) => None,
        })
    }

    /// Whether the template contains any placeholder
    pub fn has_tokens(&self) -> bool {
        self.segments
            .iter()
            .any(|segment| matches!(segment, Segment::Token { .. }))
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens_in_order() {
        let template = Template::new(":a + :b_2 - :a");
        assert_eq!(template.tokens().collect::<Vec<_>>(), vec!["a", "b_2", "a"]);
        assert!(template.has_tokens());
    }

    #[test]
    fn test_no_tokens() {
        let template = Template::new("select 1");
        assert_eq!(template.tokens().count(), 0);
        assert!(!template.has_tokens());
    }

    #[test]
    fn test_bare_colons_are_not_tokens() {
        let template = Template::new("select ': ' || x, y :  z from t:");
        assert_eq!(template.tokens().count(), 0);
    }

    #[test]
    fn test_non_ascii_word_chars_end_token() {
        let template = Template::new("select :idé");
        assert_eq!(template.tokens().collect::<Vec<_>>(), vec!["id"]);
    }

    #[test]
    fn test_text_preserved() {
        let text = "update t set v = :v where id = :id";
        assert_eq!(Template::new(text).to_string(), text);
    }
}
