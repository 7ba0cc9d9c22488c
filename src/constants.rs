use crate::config::{DEFAULT_CATALOG_CONFIG, DEFAULT_CRF_TRAINER_CONFIG};
use crate::models::{LexicalTaxonomy, NounSelector, ProductCatalog, TaggedCorpus};
use crate::Error;
use log::info;
use std::sync::LazyLock;

pub const EMBEDDED_TAGGED_CORPUS: &str = include_str!("../data/tagged_corpus.txt");

pub const EMBEDDED_NOUN_TAXONOMY: &str = include_str!("../data/noun_taxonomy.tsv");

pub const EMBEDDED_GROCERY_CATALOG: &str = include_str!("../data/grocery_catalog.csv");

// Lazy-initialized defaults, built on first use and shared afterwards
pub static DEFAULT_NOUN_SELECTOR: LazyLock<Result<NounSelector, Error>> = LazyLock::new(|| {
    info!("Training the default noun selector...");

    let corpus = TaggedCorpus::from_tagged_text(EMBEDDED_TAGGED_CORPUS)?;
    NounSelector::train(&corpus, DEFAULT_CRF_TRAINER_CONFIG)
});

pub static DEFAULT_NOUN_TAXONOMY: LazyLock<Result<LexicalTaxonomy, Error>> =
    LazyLock::new(|| LexicalTaxonomy::from_tsv(EMBEDDED_NOUN_TAXONOMY));

pub static DEFAULT_GROCERY_CATALOG: LazyLock<Result<ProductCatalog, Error>> = LazyLock::new(|| {
    ProductCatalog::read_catalog_from_string(EMBEDDED_GROCERY_CATALOG, DEFAULT_CATALOG_CONFIG)
});
