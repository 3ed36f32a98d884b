//! Best-effort extraction of fenced code from model replies
//!
//! Models are asked to reply with a single fenced block, but the raw text is
//! always kept verbatim alongside - extraction is a convenience, not a
//! transformation of the displayed output.

use once_cell::sync::Lazy;
use regex::Regex;

static FENCE_RE: Lazy<Regex> = Lazy::new(|| {
    // opening fence with optional language tag, lazily up to the closing fence
    Regex::new(r"(?s)```[a-zA-Z0-9_+.-]*\r?\n(.*?)```").expect("fence regex")
});

/// First fenced code block in `raw`, if the reply contained one
///
/// The language tag is accepted but ignored. Returns `None` when the reply
/// has no complete fence, in which case callers fall back to the raw text.
pub fn extract_code(raw: &str) -> Option<String> {
    FENCE_RE
        .captures(raw)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str().trim_end_matches(['\r', '\n']).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_with_language_tag() {
        let raw = "Here you go:\n```svelte\n<button>Go</button>\n```\nEnjoy!";
        assert_eq!(extract_code(raw).unwrap(), "<button>Go</button>");
    }

    #[test]
    fn test_extract_without_language_tag() {
        let raw = "```\n<div>hi</div>\n```";
        assert_eq!(extract_code(raw).unwrap(), "<div>hi</div>");
    }

    #[test]
    fn test_extract_first_of_many() {
        let raw = "```html\nfirst\n```\ntext\n```html\nsecond\n```";
        assert_eq!(extract_code(raw).unwrap(), "first");
    }

    #[test]
    fn test_extract_multiline_body() {
        let raw = "```jsx\nline one\nline two\n```";
        assert_eq!(extract_code(raw).unwrap(), "line one\nline two");
    }

    #[test]
    fn test_no_fence_returns_none() {
        assert!(extract_code("just prose, no code").is_none());
    }

    #[test]
    fn test_unterminated_fence_returns_none() {
        assert!(extract_code("```html\n<div>never closed").is_none());
    }
}
