//! Text truncation for oversized string fields in API responses
//!
//! Long free-text fields (issue descriptions, commit messages, note bodies) can
//! blow up the size of list responses. The truncator works on decoded JSON values
//! so it stays independent of any concrete entity type.

use serde::Serialize;
use serde_json::Value;

/// Maximum number of characters kept in a truncated field
pub const MAX_FIELD_LENGTH: usize = 300;

/// Marker appended to truncated text
pub const TRUNCATION_SUFFIX: &str = "...";

/// Truncates strings to a character budget, appending a suffix marker.
///
/// Lengths are counted in Unicode scalar values, not bytes. Grapheme clusters
/// may be split at the boundary.
#[derive(Debug, Clone)]
pub struct TextTruncator {
    max_chars: usize,
    suffix: String,
}

impl Default for TextTruncator {
    fn default() -> Self {
        Self::new(MAX_FIELD_LENGTH, TRUNCATION_SUFFIX)
    }
}

impl TextTruncator {
    pub fn new(max_chars: usize, suffix: impl Into<String>) -> Self {
        Self {
            max_chars,
            suffix: suffix.into(),
        }
    }

    /// Truncates `text` to the configured budget.
    ///
    /// A string that is already in truncated form (exactly `max_chars` characters
    /// followed by the suffix) is returned unchanged, so truncation is idempotent.
    pub fn truncate(&self, text: &str) -> String {
        if text.is_empty() {
            return String::new();
        }

        let char_count = text.chars().count();
        if char_count <= self.max_chars || self.is_truncated_form(text, char_count) {
            return text.to_string();
        }

        let mut truncated: String = text.chars().take(self.max_chars).collect();
        truncated.push_str(&self.suffix);
        truncated
    }

    fn is_truncated_form(&self, text: &str, char_count: usize) -> bool {
        !self.suffix.is_empty()
            && text.ends_with(&self.suffix)
            && char_count == self.max_chars + self.suffix.chars().count()
    }

    /// Truncates the named string fields of every record in a list.
    ///
    /// The input is serialized into a generic JSON value first. Input that is not
    /// a list is returned as-is. Non-string and absent fields are left untouched.
    pub fn truncate_list_response<T: Serialize + ?Sized>(
        &self,
        items: &T,
        fields: &[&str],
    ) -> Result<Value, serde_json::Error> {
        let mut value = serde_json::to_value(items)?;
        if let Value::Array(records) = &mut value {
            for record in records.iter_mut() {
                self.truncate_fields(record, fields);
            }
        }
        Ok(value)
    }

    fn truncate_fields(&self, record: &mut Value, fields: &[&str]) {
        let Value::Object(map) = record else {
            return;
        };
        for field in fields {
            if let Some(Value::String(text)) = map.get_mut(*field) {
                let truncated = self.truncate(text);
                *text = truncated;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_truncate_short_string_unchanged() {
        let truncator = TextTruncator::default();
        assert_eq!(truncator.truncate(""), "");
        assert_eq!(truncator.truncate("short"), "short");

        let exact = "a".repeat(MAX_FIELD_LENGTH);
        assert_eq!(truncator.truncate(&exact), exact);
    }

    #[test]
    fn test_truncate_long_string() {
        let truncator = TextTruncator::default();
        let long = "x".repeat(500);
        let result = truncator.truncate(&long);

        assert_eq!(result.chars().count(), MAX_FIELD_LENGTH + TRUNCATION_SUFFIX.len());
        assert!(result.ends_with(TRUNCATION_SUFFIX));
        assert!(result.starts_with(&"x".repeat(MAX_FIELD_LENGTH)));
    }

    #[test]
    fn test_truncate_counts_characters_not_bytes() {
        let truncator = TextTruncator::default();
        let emoji = "😀".repeat(8);
        let input = format!("{}{}", emoji, "a".repeat(350));

        let result = truncator.truncate(&input);

        let expected = format!("{}{}{}", emoji, "a".repeat(292), TRUNCATION_SUFFIX);
        assert_eq!(result, expected);
    }

    #[test]
    fn test_truncate_is_idempotent() {
        let truncator = TextTruncator::default();
        let once = truncator.truncate(&"b".repeat(1000));
        let twice = truncator.truncate(&once);

        assert_eq!(once, twice);
        assert_eq!(twice.matches(TRUNCATION_SUFFIX).count(), 1);
    }

    #[test]
    fn test_truncate_custom_budget() {
        let truncator = TextTruncator::new(5, "…");
        assert_eq!(truncator.truncate("abcdefgh"), "abcde…");
        assert_eq!(truncator.truncate("abcde…"), "abcde…");
    }

    #[test]
    fn test_truncate_list_response_only_touches_string_fields() {
        let truncator = TextTruncator::new(4, "...");
        let records = json!([
            {"title": "long title here", "description": "long description", "iid": 12345678},
            {"description": 42, "confidential": true},
            {"title": "no description"}
        ]);

        let result = truncator
            .truncate_list_response(&records, &["description", "iid", "confidential"])
            .unwrap();

        assert_eq!(result[0]["description"], "long...");
        assert_eq!(result[0]["title"], "long title here");
        assert_eq!(result[0]["iid"], 12345678);
        assert_eq!(result[1]["description"], 42);
        assert_eq!(result[1]["confidential"], true);
        assert!(result[2].get("description").is_none());
    }

    #[test]
    fn test_truncate_list_response_edge_cases() {
        let truncator = TextTruncator::default();

        let empty: Vec<Value> = Vec::new();
        let result = truncator
            .truncate_list_response(&empty, &["description"])
            .unwrap();
        assert_eq!(result, json!([]));

        let long = "z".repeat(400);
        let records = json!([{ "description": long.clone() }]);
        let result = truncator.truncate_list_response(&records, &[]).unwrap();
        assert_eq!(result[0]["description"], long);

        let single = json!({ "description": long.clone() });
        let result = truncator
            .truncate_list_response(&single, &["description"])
            .unwrap();
        assert_eq!(result, single);
    }
}
