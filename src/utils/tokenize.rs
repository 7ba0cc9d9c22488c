use crate::types::Token;

/// Splits a phrase into whitespace-separated tokens.
///
/// Note: This explicitly does not modify the case of the text.
///
/// ### Example:
/// ```rust
/// use product_sniffer::utils::tokenize;
///
/// assert_eq!(tokenize(" Organic  almond\tmilk "), vec!["Organic", "almond", "milk"]);
/// assert!(tokenize("   ").is_empty());
/// ```
pub fn tokenize(text: &str) -> Vec<Token> {
    text.split_whitespace().map(|word| word.to_string()).collect()
}
