pub const SUMMARY_LIMIT: usize = 1000;
pub const ELLIPSIS: &str = "...";

// one entry of the digest. built from a feed entry inside the date window.

#[derive(Debug, Clone, PartialEq)]
pub struct PaperRecord {
    pub title: String,
    pub summary: String,
    pub link: String,
    pub authors: String,
    pub category: String
}

impl PaperRecord {
    pub fn new(title: String, summary: &str, link: String, authors: &[String], category: String) -> Self {
        PaperRecord {
            title,
            summary: truncate_summary(summary),
            link,
            authors: authors.join(", "),
            category
        }
    }
}

/// Cuts `text` to `SUMMARY_LIMIT` characters and appends `ELLIPSIS` when it is longer.
pub fn truncate_summary(text: &str) -> String {
    match text.char_indices().nth(SUMMARY_LIMIT) {
        Some((end, _)) => format!("{}{}", &text[..end], ELLIPSIS),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_at_limit_unchanged() {
        let text = "a".repeat(SUMMARY_LIMIT);
        assert_eq!(truncate_summary(&text), text);
    }

    #[test]
    fn test_summary_over_limit_truncated() {
        let text = "a".repeat(SUMMARY_LIMIT + 1);
        let out = truncate_summary(&text);
        assert_eq!(out.chars().count(), SUMMARY_LIMIT + ELLIPSIS.len());
        assert!(out.ends_with(ELLIPSIS));
        assert_eq!(&out[..SUMMARY_LIMIT], &text[..SUMMARY_LIMIT]);
    }

    #[test]
    fn test_truncation_counts_chars_not_bytes() {
        let text = "é".repeat(SUMMARY_LIMIT + 5);
        let out = truncate_summary(&text);
        assert_eq!(out, format!("{}...", "é".repeat(SUMMARY_LIMIT)));
    }

    #[test]
    fn test_record_joins_authors() {
        let authors = vec!["A. Author".to_string(), "B. Author".to_string()];
        let record = PaperRecord::new(
            "Title".into(), "short", "http://arxiv.org/abs/1".into(), &authors, "hep-ex".into()
        );
        assert_eq!(record.authors, "A. Author, B. Author");
        assert_eq!(record.summary, "short");
    }
}
