#[cfg(doctest)]
doc_comment::doctest!("../README.md");

pub mod config;
pub use config::{DEFAULT_CATALOG_CONFIG, DEFAULT_CRF_TRAINER_CONFIG};
mod constants;
pub use constants::{EMBEDDED_GROCERY_CATALOG, EMBEDDED_NOUN_TAXONOMY, EMBEDDED_TAGGED_CORPUS};
use constants::{DEFAULT_GROCERY_CATALOG, DEFAULT_NOUN_SELECTOR, DEFAULT_NOUN_TAXONOMY};
pub mod models;
pub use models::{
    CatalogConfig, CatalogLookup, CrfModel, CrfTrainerConfig, Error, LexicalTaxonomy,
    NounSelector, ProductCatalog, SimilarityRanker, TaggedCorpus,
};
pub mod types;
pub use types::{
    CandidateName, Ranking, SimilarityScore, TaggedSentence, TaggedToken, Token, TokenRef,
    UniversalTag,
};
pub mod utils;
pub use utils::tokenize;

use log::info;

/// The noun selector trained on the embedded corpus.
///
/// Training happens on the first call; later calls reuse the same model.
pub fn default_noun_selector() -> Result<&'static NounSelector, Error> {
    DEFAULT_NOUN_SELECTOR.as_ref().map_err(Error::clone)
}

/// The embedded noun taxonomy.
pub fn default_taxonomy() -> Result<&'static LexicalTaxonomy, Error> {
    DEFAULT_NOUN_TAXONOMY.as_ref().map_err(Error::clone)
}

/// The embedded sample grocery catalog.
pub fn default_catalog() -> Result<&'static ProductCatalog, Error> {
    DEFAULT_GROCERY_CATALOG.as_ref().map_err(Error::clone)
}

/// Guesses the head noun of a search phrase with the default noun selector.
pub fn find_noun(phrase: &str) -> Result<Token, Error> {
    default_noun_selector()?.find_noun(phrase)
}

/// Ranks the embedded catalog's products for a search phrase.
pub fn rank_products(phrase: &str) -> Result<Ranking, Error> {
    rank_products_with_custom_catalog(phrase, default_catalog()?)
}

/// Ranks the products of `catalog` for a search phrase, using the default
/// noun selector and taxonomy.
pub fn rank_products_with_custom_catalog(
    phrase: &str,
    catalog: &impl CatalogLookup,
) -> Result<Ranking, Error> {
    rank_products_for_phrase(phrase, default_noun_selector()?, catalog, default_taxonomy()?)
}

/// Finds the phrase's noun, fetches the catalog rows naming it, and ranks
/// them by their lexical similarity to the whole phrase.
///
/// A noun that matches nothing in the catalog yields an empty ranking.
pub fn rank_products_for_phrase(
    phrase: &str,
    selector: &NounSelector,
    catalog: &impl CatalogLookup,
    taxonomy: &LexicalTaxonomy,
) -> Result<Ranking, Error> {
    let phrase_tokens = tokenize(phrase);
    if phrase_tokens.is_empty() {
        return Err(Error::BoundaryError(format!(
            "Cannot rank products for an empty phrase: {:?}",
            phrase
        )));
    }

    let noun = selector.find_noun(phrase)?.to_lowercase();

    info!("Fetching catalog rows for {:?}...", noun);
    let candidates = catalog.lookup(&noun);
    info!("Ranking {} candidates", candidates.len());

    SimilarityRanker::new(taxonomy).rank(candidates, &phrase_tokens)
}

/// Renders each ranked product as a `name: score` line.
///
/// ### Example:
/// ```rust
/// use product_sniffer::format_ranking;
///
/// let lines = format_ranking(&vec![("Almond Milk".to_string(), 2.5333333)]);
/// assert_eq!(lines, vec!["Almond Milk: 2.5333"]);
/// ```
pub fn format_ranking(ranking: &Ranking) -> Vec<String> {
    ranking
        .iter()
        .map(|(name, score)| format!("{}: {:.4}", name, score))
        .collect()
}
