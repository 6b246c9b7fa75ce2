use regex::Regex;
use std::sync::OnceLock;

pub const MAX_SEED_CHARS: usize = 1500;

fn whitespace_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("valid whitespace regex"))
}

pub fn normalize_whitespace(text: &str) -> String {
    whitespace_re().replace_all(text.trim(), " ").into_owned()
}

pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

pub fn extract_page_text(raw: &str) -> Option<String> {
    let normalized = normalize_whitespace(raw);
    if normalized.is_empty() {
        return None;
    }
    Some(truncate_chars(&normalized, MAX_SEED_CHARS).to_string())
}

pub fn compose_seed_text(prompt: &str, page_text: &str) -> String {
    format!("{prompt}{page_text}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_collapses_and_trims() {
        assert_eq!(
            normalize_whitespace("  This   paper\n\tstudies X.  "),
            "This paper studies X."
        );
    }

    #[test]
    fn normalize_is_idempotent() {
        for input in ["", "   ", "a  b", "\n x \u{a0} y\t", "already clean"] {
            let once = normalize_whitespace(input);
            assert_eq!(normalize_whitespace(&once), once);
        }
    }

    #[test]
    fn truncate_caps_length_without_splitting_chars() {
        let long = "é".repeat(MAX_SEED_CHARS + 10);
        let cut = truncate_chars(&long, MAX_SEED_CHARS);
        assert_eq!(cut.chars().count(), MAX_SEED_CHARS);

        assert_eq!(truncate_chars("short", MAX_SEED_CHARS), "short");
        assert_eq!(truncate_chars("", MAX_SEED_CHARS), "");
    }

    #[test]
    fn extract_rejects_blank_text() {
        assert_eq!(extract_page_text(" \n\t "), None);
        assert_eq!(extract_page_text(" a  b ").as_deref(), Some("a b"));
    }

    #[test]
    fn extract_truncates_after_normalizing() {
        let raw = format!("   {}", "word ".repeat(1000));
        let text = extract_page_text(&raw).unwrap();
        assert_eq!(text.chars().count(), MAX_SEED_CHARS);
        assert!(text.starts_with("word word"));
    }

    #[test]
    fn seed_text_is_prompt_then_text() {
        assert_eq!(
            compose_seed_text("Summarize: ", "This paper studies X."),
            "Summarize: This paper studies X."
        );
    }
}
