//! Phrase matching helpers shared by the analyzers.

use signalscale_core::RawRecord;

/// Lowercase `input`, turn every non-alphanumeric character into a space and
/// collapse runs of whitespace.
#[must_use]
pub fn normalize(input: &str) -> String {
    let mapped: String = input
        .chars()
        .map(|ch| if ch.is_alphanumeric() { ch } else { ' ' })
        .collect::<String>()
        .to_lowercase();
    mapped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalised text that answers whole-word phrase queries.
///
/// `"goes hard"` matches `"This fit GOES HARD!"` but `"hard"` does not match
/// `"hardware"`.
#[derive(Debug, Clone)]
pub struct MatchText {
    padded: String,
}

impl MatchText {
    #[must_use]
    pub fn new(text: &str) -> Self {
        Self {
            padded: format!(" {} ", normalize(text)),
        }
    }

    /// Record text plus its hashtags.
    #[must_use]
    pub fn from_record(record: &RawRecord) -> Self {
        let mut text = record.text().unwrap_or_default().to_owned();
        for tag in &record.hashtags {
            text.push(' ');
            text.push_str(tag);
        }
        Self::new(&text)
    }

    #[must_use]
    pub fn has(&self, phrase: &str) -> bool {
        let needle = normalize(phrase);
        !needle.is_empty() && self.padded.contains(&format!(" {needle} "))
    }

    /// Number of `phrases` present at least once.
    #[must_use]
    pub fn count(&self, phrases: &[&str]) -> usize {
        phrases.iter().filter(|p| self.has(p)).count()
    }

    #[must_use]
    pub fn has_any<S: AsRef<str>>(&self, phrases: &[S]) -> bool {
        phrases.iter().any(|p| self.has(p.as_ref()))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.padded.trim().is_empty()
    }
}

/// First `max_chars` characters of `text`, with `...` appended when cut.
#[must_use]
pub fn excerpt(text: &str, max_chars: usize) -> String {
    let text = text.trim();
    if text.chars().count() <= max_chars {
        return text.to_owned();
    }
    let cut: String = text.chars().take(max_chars).collect();
    format!("{}...", cut.trim_end())
}

/// `1234567` → `"1,234,567"`.
#[must_use]
pub fn thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_punctuation_and_case() {
        assert_eq!(normalize("  Fit-Check: GOES   hard!! "), "fit check goes hard");
        assert_eq!(normalize("#Y2K"), "y2k");
        assert_eq!(normalize("!!!"), "");
    }

    #[test]
    fn phrases_match_on_word_boundaries() {
        let text = MatchText::new("This collab goes hard, honestly.");
        assert!(text.has("goes hard"));
        assert!(text.has("hard"));
        assert!(text.has("Collab"));
        assert!(!text.has("ard"));
        assert!(!text.has(""));
        assert!(!MatchText::new("hardware store").has("hard"));
    }

    #[test]
    fn count_counts_distinct_phrases() {
        let text = MatchText::new("fire fire fire, clean and fresh");
        assert_eq!(text.count(&["fire", "clean", "fresh", "mid"]), 3);
    }

    #[test]
    fn excerpt_cuts_on_char_boundary() {
        assert_eq!(excerpt("short", 10), "short");
        assert_eq!(excerpt("ééééé", 3), "ééé...");
    }

    #[test]
    fn thousands_groups_digits() {
        assert_eq!(thousands(0), "0");
        assert_eq!(thousands(999), "999");
        assert_eq!(thousands(45_000), "45,000");
        assert_eq!(thousands(1_234_567), "1,234,567");
    }
}
