pub mod attribute_mapper;
pub use attribute_mapper::AttributeMapper;

pub mod crf_model;
pub use crf_model::CrfModel;

pub mod crf_trainer;
pub use crf_trainer::{train_crf, CrfTrainer, CrfTrainerConfig};

pub mod error;
pub use error::Error;

pub mod feature_extractor;
pub use feature_extractor::{features, sentence_features, FeatureMap, FeatureValue, FEATURE_NAMES};

pub mod lexical_taxonomy;
pub use lexical_taxonomy::{LexicalTaxonomy, Synset, SynsetId};

pub mod noun_selector;
pub use noun_selector::NounSelector;

pub mod product_catalog;
pub use product_catalog::{CatalogConfig, CatalogLookup, ProductCatalog};

pub mod similarity_ranker;
pub use similarity_ranker::SimilarityRanker;

pub mod tagged_corpus;
pub use tagged_corpus::TaggedCorpus;
