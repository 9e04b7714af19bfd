//! Completion sentinel handling

/// Remove every sentinel from `text` and trim the result.
///
/// Returns `None` when nothing but sentinels and whitespace remains, so
/// callers can show a placeholder instead of an empty section. Longer
/// sentinels are removed first so one that contains another is not left
/// half-stripped.
pub fn strip_sentinels<S: AsRef<str>>(text: &str, sentinels: &[S]) -> Option<String> {
    let mut ordered: Vec<&str> = sentinels
        .iter()
        .map(AsRef::as_ref)
        .filter(|s| !s.is_empty())
        .collect();
    ordered.sort_by_key(|s| std::cmp::Reverse(s.len()));

    let stripped = ordered
        .into_iter()
        .fold(text.to_string(), |acc, sentinel| acc.replace(sentinel, ""));

    let trimmed = stripped.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_final_sentinel() {
        assert_eq!(
            strip_sentinels("Visit the tower.\nFINAL PLAN COMPLETE", &["FINAL PLAN COMPLETE"]),
            Some("Visit the tower.".to_string())
        );
    }

    #[test]
    fn test_sentinel_only_is_none() {
        assert_eq!(strip_sentinels("  LOCAL COMPLETE \n", &["LOCAL COMPLETE"]), None);
        assert_eq!(strip_sentinels("", &["LOCAL COMPLETE"]), None);
    }

    #[test]
    fn test_every_occurrence_removed() {
        let text = "Bonjour\nLANGUAGE COMPLETE\nMerci\nLANGUAGE COMPLETE";
        assert_eq!(
            strip_sentinels(text, &["LANGUAGE COMPLETE"]),
            Some("Bonjour\n\nMerci".to_string())
        );
    }

    #[test]
    fn test_longer_sentinel_first() {
        let sentinels = ["PLAN COMPLETE", "FINAL PLAN COMPLETE"];
        assert_eq!(
            strip_sentinels("Done.\nFINAL PLAN COMPLETE", &sentinels),
            Some("Done.".to_string())
        );
    }

    #[test]
    fn test_no_sentinels() {
        let empty: [&str; 0] = [];
        assert_eq!(strip_sentinels(" text ", &empty), Some("text".to_string()));
    }
}
