use crate::models::LexicalTaxonomy;
use crate::types::{CandidateName, Ranking, SimilarityScore, Token, TokenRef};
use crate::utils::sort_results;
use crate::Error;
use rayon::prelude::*;
use std::collections::HashSet;

/// Scores candidate product names against the tokens of a search phrase.
///
/// For every phrase token the best-matching candidate token counts; a
/// candidate's score is the sum of those best matches.
pub struct SimilarityRanker<'a> {
    taxonomy: &'a LexicalTaxonomy,
}

impl<'a> SimilarityRanker<'a> {
    pub fn new(taxonomy: &'a LexicalTaxonomy) -> Self {
        Self { taxonomy }
    }

    /// Similarity of the first noun senses of two tokens, if both resolve.
    pub fn pairwise_similarity(&self, phrase_token: &TokenRef, candidate_token: &TokenRef) -> Option<f64> {
        self.taxonomy
            .word_similarity(&phrase_token.to_lowercase(), &candidate_token.to_lowercase())
    }

    /// Aggregate score of one candidate name.
    pub fn score(&self, candidate: &str, phrase_tokens: &[Token]) -> Result<SimilarityScore, Error> {
        if phrase_tokens.is_empty() {
            return Err(Error::BoundaryError(
                "Cannot score against an empty phrase".to_string(),
            ));
        }

        let candidate_tokens: HashSet<&str> = candidate.split_whitespace().collect();
        if candidate_tokens.is_empty() {
            return Err(Error::BoundaryError(format!(
                "Candidate {:?} has no tokens",
                candidate
            )));
        }

        let score = phrase_tokens
            .iter()
            .map(|phrase_token| {
                candidate_tokens
                    .iter()
                    .map(|candidate_token| {
                        match self.pairwise_similarity(phrase_token, candidate_token) {
                            Some(similarity) => similarity,
                            // No resolvable sense on one side
                            None => 0.0,
                        }
                    })
                    .fold(0.0, f64::max)
            })
            .sum();

        Ok(score)
    }

    /// Scores every distinct candidate and sorts by score, highest first.
    /// Equal scores are ordered by name.
    pub fn rank<I>(&self, candidates: I, phrase_tokens: &[Token]) -> Result<Ranking, Error>
    where
        I: IntoIterator<Item = CandidateName>,
    {
        if phrase_tokens.is_empty() {
            return Err(Error::BoundaryError(
                "Cannot rank candidates against an empty phrase".to_string(),
            ));
        }

        let unique_candidates: Vec<CandidateName> = candidates
            .into_iter()
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();

        let scored = unique_candidates
            .into_par_iter()
            .map(|candidate| {
                let score = self.score(&candidate, phrase_tokens)?;
                Ok((candidate, score))
            })
            .collect::<Result<Vec<_>, Error>>()?;

        Ok(sort_results(scored))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TAXONOMY: &str = "\
entity.n.01\tentity
food.n.01\tfood\tentity.n.01
dairy_product.n.01\tdairy_product\tfood.n.01
milk.n.01\tmilk\tdairy_product.n.01
cheese.n.01\tcheese\tdairy_product.n.01
beverage.n.01\tbeverage\tfood.n.01
juice.n.01\tjuice\tbeverage.n.01
";

    fn tokens(phrase: &str) -> Vec<Token> {
        phrase.split_whitespace().map(String::from).collect()
    }

    fn names(names: &[&str]) -> Vec<CandidateName> {
        names.iter().map(|name| name.to_string()).collect()
    }

    #[test]
    fn test_exact_match_contributes_one() {
        let taxonomy = LexicalTaxonomy::from_tsv(TAXONOMY).unwrap();
        let ranker = SimilarityRanker::new(&taxonomy);

        assert_eq!(ranker.score("Milk", &tokens("milk")).unwrap(), 1.0);
        assert_eq!(ranker.score("Milk Chocolate", &tokens("milk")).unwrap(), 1.0);
    }

    #[test]
    fn test_missing_senses_count_as_zero() {
        let taxonomy = LexicalTaxonomy::from_tsv(TAXONOMY).unwrap();
        let ranker = SimilarityRanker::new(&taxonomy);

        assert_eq!(ranker.pairwise_similarity("organic", "milk"), None);
        assert_eq!(ranker.score("Milk", &tokens("organic")).unwrap(), 0.0);
        // organic -> 0, milk -> 1
        assert_eq!(ranker.score("Milk", &tokens("organic milk")).unwrap(), 1.0);
    }

    #[test]
    fn test_sum_of_per_token_maxima() {
        let taxonomy = LexicalTaxonomy::from_tsv(TAXONOMY).unwrap();
        let ranker = SimilarityRanker::new(&taxonomy);

        // milk: max(milk/cheese 0.75, milk/juice 0.5) = 0.75
        // juice: max(juice/cheese 0.5, juice/juice 1.0) = 1.0
        let score = ranker.score("Cheese Juice", &tokens("milk juice")).unwrap();
        assert!((score - 1.75).abs() < 1e-12);
    }

    #[test]
    fn test_duplicate_candidate_tokens_collapse() {
        let taxonomy = LexicalTaxonomy::from_tsv(TAXONOMY).unwrap();
        let ranker = SimilarityRanker::new(&taxonomy);

        assert_eq!(
            ranker.score("Milk Milk", &tokens("milk")).unwrap(),
            ranker.score("Milk", &tokens("milk")).unwrap()
        );
    }

    #[test]
    fn test_rank_sorts_and_deduplicates() {
        let taxonomy = LexicalTaxonomy::from_tsv(TAXONOMY).unwrap();
        let ranker = SimilarityRanker::new(&taxonomy);

        let ranking = ranker
            .rank(
                names(&["Juice", "Milk Cheese", "Juice", "Cheese"]),
                &tokens("milk cheese"),
            )
            .unwrap();

        assert_eq!(
            ranking
                .iter()
                .map(|(name, _)| name.as_str())
                .collect::<Vec<_>>(),
            vec!["Milk Cheese", "Cheese", "Juice"]
        );
        assert_eq!(ranking[0].1, 2.0);
        assert!((ranking[1].1 - 1.75).abs() < 1e-12);
        assert!((ranking[2].1 - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_rank_is_repeatable() {
        let taxonomy = LexicalTaxonomy::from_tsv(TAXONOMY).unwrap();
        let ranker = SimilarityRanker::new(&taxonomy);
        let candidates = names(&["Juice", "Milk", "Cheese", "Dairy Food"]);

        let first = ranker.rank(candidates.clone(), &tokens("milk")).unwrap();
        let second = ranker.rank(candidates, &tokens("milk")).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_candidates_rank_empty() {
        let taxonomy = LexicalTaxonomy::from_tsv(TAXONOMY).unwrap();
        let ranker = SimilarityRanker::new(&taxonomy);

        assert!(ranker.rank(Vec::new(), &tokens("milk")).unwrap().is_empty());
    }

    #[test]
    fn test_boundary_errors() {
        let taxonomy = LexicalTaxonomy::from_tsv(TAXONOMY).unwrap();
        let ranker = SimilarityRanker::new(&taxonomy);

        assert!(matches!(
            ranker.rank(names(&["Milk"]), &[]),
            Err(Error::BoundaryError(_))
        ));
        assert!(matches!(
            ranker.rank(names(&["Milk", "  "]), &tokens("milk")),
            Err(Error::BoundaryError(_))
        ));
    }
}
