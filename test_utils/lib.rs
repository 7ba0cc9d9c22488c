pub mod constants;

use std::fs;
use std::path::{Path, PathBuf};

/// A search phrase together with the outcome it is expected to produce.
#[derive(Debug, Clone, PartialEq)]
pub struct PhraseScenario {
    pub path: PathBuf,
    pub phrase: String,
    pub expected_noun: Option<String>,
    pub expected_top: Option<String>,
    pub expected_failure: Option<String>,
}

// Helper function to get the value of the first line starting with `prefix`
fn get_prefixed_value(content: &str, prefix: &str) -> Option<String> {
    content.lines().find_map(|line| {
        line.trim()
            .strip_prefix(prefix)
            .map(|value| value.trim().to_string())
    })
}

/// Parses a scenario file made of `PHRASE:`, `EXPECTED_NOUN:`,
/// `EXPECTED_TOP:` and `EXPECTED_FAILURE:` lines. Lines starting with
/// `COMMENT:` are ignored.
pub fn load_phrase_scenario(file_path: &Path) -> PhraseScenario {
    let content = fs::read_to_string(file_path).expect("Failed to read test file");

    let phrase = get_prefixed_value(&content, "PHRASE:").unwrap_or_else(|| {
        panic!("Missing PHRASE: line in {}", file_path.display());
    });

    PhraseScenario {
        path: file_path.to_path_buf(),
        phrase,
        expected_noun: get_prefixed_value(&content, "EXPECTED_NOUN:"),
        expected_top: get_prefixed_value(&content, "EXPECTED_TOP:"),
        expected_failure: get_prefixed_value(&content, "EXPECTED_FAILURE:"),
    }
}

/// Every `.txt` scenario file in the directory, in file name order.
pub fn get_test_files(directory: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = fs::read_dir(directory)
        .expect("Failed to read test files directory")
        .filter_map(|entry| entry.ok().map(|entry| entry.path()))
        .filter(|path| path.extension().map_or(false, |ext| ext == "txt"))
        .collect();

    files.sort();
    files
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_prefixed_value() {
        let content = "COMMENT: dairy\nPHRASE:  organic almond milk \nEXPECTED_TOP: Almond Milk\n";

        assert_eq!(
            get_prefixed_value(content, "PHRASE:"),
            Some("organic almond milk".to_string())
        );
        assert_eq!(
            get_prefixed_value(content, "EXPECTED_TOP:"),
            Some("Almond Milk".to_string())
        );
        assert_eq!(get_prefixed_value(content, "EXPECTED_NOUN:"), None);
    }

    #[test]
    fn test_empty_value_is_kept() {
        assert_eq!(get_prefixed_value("PHRASE:\n", "PHRASE:"), Some(String::new()));
    }
}
