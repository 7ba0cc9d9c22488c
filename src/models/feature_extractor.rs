use crate::types::Token;
use crate::Error;
use std::collections::BTreeMap;

/// Names of every key produced by [`features`].
pub const FEATURE_NAMES: [&str; 17] = [
    "is_first_capital",
    "is_first_word",
    "is_last_word",
    "is_complete_capital",
    "prev_word",
    "next_word",
    "is_numeric",
    "is_alphanumeric",
    "prefix_1",
    "prefix_2",
    "prefix_3",
    "prefix_4",
    "suffix_1",
    "suffix_2",
    "suffix_3",
    "suffix_4",
    "word_has_hyphen",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeatureValue {
    Number(i64),
    Text(String),
}

/// Shape attributes of a single token within its sentence.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FeatureMap {
    values: BTreeMap<&'static str, FeatureValue>,
}

impl FeatureMap {
    fn insert_flag(&mut self, name: &'static str, flag: bool) {
        self.values.insert(name, FeatureValue::Number(flag as i64));
    }

    fn insert_text(&mut self, name: &'static str, text: String) {
        self.values.insert(name, FeatureValue::Text(text));
    }

    pub fn get(&self, name: &str) -> Option<&FeatureValue> {
        self.values.get(name)
    }

    /// Numeric value of a flag feature. Text features yield `None`.
    pub fn flag(&self, name: &str) -> Option<i64> {
        match self.values.get(name) {
            Some(FeatureValue::Number(n)) => Some(*n),
            _ => None,
        }
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        match self.values.get(name) {
            Some(FeatureValue::Text(s)) => Some(s),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.values.keys().copied()
    }

    /// Expands the map into weighted CRF attributes.
    ///
    /// Text values become binary `key=value` attributes. Numeric values become
    /// a `key` attribute scaled by the number; zeros carry no signal and are
    /// skipped.
    pub fn to_attributes(&self) -> Vec<(String, f64)> {
        self.values
            .iter()
            .filter_map(|(name, value)| match value {
                FeatureValue::Text(text) => Some((format!("{}={}", name, text), 1.0)),
                FeatureValue::Number(0) => None,
                FeatureValue::Number(n) => Some((name.to_string(), *n as f64)),
            })
            .collect()
    }
}

fn prefix(chars: &[char], len: usize) -> String {
    chars.iter().take(len).collect()
}

fn suffix(chars: &[char], len: usize) -> String {
    chars[chars.len().saturating_sub(len)..].iter().collect()
}

/// Narrow alphanumeric test: the token ends in a digit and contains a letter
/// somewhere. Tokens like `"a1b"` do not qualify.
fn is_trailing_digit_alphanumeric(token: &str) -> bool {
    token.chars().last().map_or(false, |c| c.is_ascii_digit())
        && token.chars().any(|c| c.is_ascii_alphabetic())
}

/// Builds the feature map for the token at `index` of `sentence`.
///
/// Fails with `Error::BoundaryError` when `index` is out of range or the token
/// is empty.
pub fn features(sentence: &[Token], index: usize) -> Result<FeatureMap, Error> {
    let token = sentence.get(index).ok_or_else(|| {
        Error::BoundaryError(format!(
            "Token index {} is out of range for a sentence of {} tokens",
            index,
            sentence.len()
        ))
    })?;

    let chars: Vec<char> = token.chars().collect();
    let first_char = chars.first().ok_or_else(|| {
        Error::BoundaryError(format!("Empty token at index {}", index))
    })?;

    let is_last = index == sentence.len() - 1;

    let mut map = FeatureMap::default();
    map.insert_flag("is_first_capital", first_char.is_uppercase());
    map.insert_flag("is_first_word", index == 0);
    map.insert_flag("is_last_word", is_last);
    map.insert_flag("is_complete_capital", token.to_uppercase() == *token);
    map.insert_text(
        "prev_word",
        if index == 0 {
            String::new()
        } else {
            sentence[index - 1].clone()
        },
    );
    map.insert_text(
        "next_word",
        if is_last {
            String::new()
        } else {
            sentence[index + 1].clone()
        },
    );
    map.insert_flag("is_numeric", chars.iter().all(|c| c.is_ascii_digit()));
    map.insert_flag("is_alphanumeric", is_trailing_digit_alphanumeric(token));

    for (len, name) in [(1, "prefix_1"), (2, "prefix_2"), (3, "prefix_3"), (4, "prefix_4")] {
        map.insert_text(name, prefix(&chars, len));
    }
    for (len, name) in [(1, "suffix_1"), (2, "suffix_2"), (3, "suffix_3"), (4, "suffix_4")] {
        map.insert_text(name, suffix(&chars, len));
    }

    map.insert_flag("word_has_hyphen", token.contains('-'));

    Ok(map)
}

/// Feature maps for every token of the sentence, in order.
pub fn sentence_features(sentence: &[Token]) -> Result<Vec<FeatureMap>, Error> {
    (0..sentence.len())
        .map(|index| features(sentence, index))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sentence(words: &[&str]) -> Vec<Token> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_all_keys_present() {
        let s = sentence(&["Organic", "almond", "milk"]);
        for index in 0..s.len() {
            let map = features(&s, index).unwrap();
            assert_eq!(map.len(), FEATURE_NAMES.len());
            for name in FEATURE_NAMES {
                assert!(map.get(name).is_some(), "Missing feature {}", name);
            }
        }
    }

    #[test]
    fn test_position_flags() {
        let s = sentence(&["fresh", "whole", "milk"]);
        let first = features(&s, 0).unwrap();
        let middle = features(&s, 1).unwrap();
        let last = features(&s, 2).unwrap();

        assert_eq!(first.flag("is_first_word"), Some(1));
        assert_eq!(first.flag("is_last_word"), Some(0));
        assert_eq!(middle.flag("is_first_word"), Some(0));
        assert_eq!(middle.flag("is_last_word"), Some(0));
        assert_eq!(last.flag("is_first_word"), Some(0));
        assert_eq!(last.flag("is_last_word"), Some(1));

        let single = features(&sentence(&["milk"]), 0).unwrap();
        assert_eq!(single.flag("is_first_word"), Some(1));
        assert_eq!(single.flag("is_last_word"), Some(1));
    }

    #[test]
    fn test_neighbour_words() {
        let s = sentence(&["fresh", "whole", "milk"]);
        assert_eq!(features(&s, 0).unwrap().text("prev_word"), Some(""));
        assert_eq!(features(&s, 0).unwrap().text("next_word"), Some("whole"));
        assert_eq!(features(&s, 2).unwrap().text("prev_word"), Some("whole"));
        assert_eq!(features(&s, 2).unwrap().text("next_word"), Some(""));
    }

    #[test]
    fn test_prefix_and_suffix_truncate() {
        let s = sentence(&["ab"]);
        let map = features(&s, 0).unwrap();
        assert_eq!(map.text("prefix_1"), Some("a"));
        assert_eq!(map.text("prefix_4"), Some("ab"));
        assert_eq!(map.text("suffix_1"), Some("b"));
        assert_eq!(map.text("suffix_3"), Some("ab"));

        let s = sentence(&["chocolate"]);
        let map = features(&s, 0).unwrap();
        assert_eq!(map.text("prefix_4"), Some("choc"));
        assert_eq!(map.text("suffix_4"), Some("late"));
    }

    #[test]
    fn test_multibyte_slices_by_char() {
        let s = sentence(&["crème"]);
        let map = features(&s, 0).unwrap();
        assert_eq!(map.text("prefix_3"), Some("crè"));
        assert_eq!(map.text("suffix_3"), Some("ème"));
    }

    #[test]
    fn test_numeric_and_alphanumeric() {
        let s = sentence(&["123", "abc123", "abc1", "abc", "a1b"]);
        let numeric: Vec<_> = (0..s.len())
            .map(|i| features(&s, i).unwrap().flag("is_numeric").unwrap())
            .collect();
        let alphanumeric: Vec<_> = (0..s.len())
            .map(|i| features(&s, i).unwrap().flag("is_alphanumeric").unwrap())
            .collect();

        assert_eq!(numeric, vec![1, 0, 0, 0, 0]);
        assert_eq!(alphanumeric, vec![0, 1, 1, 0, 0]);
    }

    #[test]
    fn test_capitalization() {
        let s = sentence(&["Milk", "UHT", "milk", "2%"]);
        let map = |i| features(&s, i).unwrap();
        assert_eq!(map(0).flag("is_first_capital"), Some(1));
        assert_eq!(map(0).flag("is_complete_capital"), Some(0));
        assert_eq!(map(1).flag("is_complete_capital"), Some(1));
        assert_eq!(map(2).flag("is_first_capital"), Some(0));
        // Uncased tokens are unchanged by uppercasing
        assert_eq!(map(3).flag("is_complete_capital"), Some(1));
    }

    #[test]
    fn test_hyphen() {
        let s = sentence(&["low-fat", "yogurt"]);
        assert_eq!(features(&s, 0).unwrap().flag("word_has_hyphen"), Some(1));
        assert_eq!(features(&s, 1).unwrap().flag("word_has_hyphen"), Some(0));
    }

    #[test]
    fn test_boundary_errors() {
        let s = sentence(&["milk", ""]);
        assert!(matches!(features(&s, 2), Err(Error::BoundaryError(_))));
        assert!(matches!(features(&s, 1), Err(Error::BoundaryError(_))));
        assert!(matches!(features(&[], 0), Err(Error::BoundaryError(_))));
    }

    #[test]
    fn test_attribute_expansion() {
        let s = sentence(&["milk"]);
        let attributes = features(&s, 0).unwrap().to_attributes();

        assert!(attributes.contains(&("prefix_2=mi".to_string(), 1.0)));
        assert!(attributes.contains(&("prev_word=".to_string(), 1.0)));
        assert!(attributes.contains(&("is_last_word".to_string(), 1.0)));
        assert!(!attributes.iter().any(|(name, _)| name == "is_numeric"));
    }
}
