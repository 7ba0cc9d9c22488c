use product_sniffer::{find_noun, rank_products, Error};
use test_utils::constants::TEST_FILES_DIRECTORY;
use test_utils::{get_test_files, load_phrase_scenario};

#[cfg(test)]
mod tests {
    use super::*;

    fn error_name(err: &Error) -> &'static str {
        match err {
            Error::BoundaryError(_) => "BoundaryError",
            Error::NoNounFound(_) => "NoNounFound",
            Error::ParserError(_) => "ParserError",
            Error::TrainingError(_) => "TrainingError",
            Error::IoError(_) => "IoError",
        }
    }

    #[test]
    fn test_phrase_scenarios_against_embedded_data() {
        let test_files = get_test_files(&TEST_FILES_DIRECTORY);
        assert!(!test_files.is_empty(), "No scenario files found");

        for test_file in test_files {
            let scenario = load_phrase_scenario(&test_file);
            eprintln!("Testing file: {}", scenario.path.display());

            if let Some(expected_failure) = &scenario.expected_failure {
                match rank_products(&scenario.phrase) {
                    Err(err) => assert_eq!(
                        error_name(&err),
                        expected_failure,
                        "{} - Failure reason mismatch",
                        scenario.path.display()
                    ),
                    Ok(ranking) => panic!(
                        "{} - Expected {}, got ranking {:?}",
                        scenario.path.display(),
                        expected_failure,
                        ranking
                    ),
                }
                continue;
            }

            if let Some(expected_noun) = &scenario.expected_noun {
                let noun = find_noun(&scenario.phrase).unwrap_or_else(|err| {
                    panic!("{} - find_noun failed: {}", scenario.path.display(), err)
                });
                assert_eq!(
                    &noun.to_lowercase(),
                    expected_noun,
                    "{} - Noun mismatch",
                    scenario.path.display()
                );
            }

            if let Some(expected_top) = &scenario.expected_top {
                let ranking = rank_products(&scenario.phrase).unwrap_or_else(|err| {
                    panic!("{} - rank_products failed: {}", scenario.path.display(), err)
                });
                assert_eq!(
                    ranking.first().map(|(name, _)| name),
                    Some(expected_top),
                    "{} - Unexpected top product in {:?}",
                    scenario.path.display(),
                    ranking
                );
            }
        }
    }
}
