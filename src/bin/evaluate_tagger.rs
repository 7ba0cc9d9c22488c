use log::{error, info};
use product_sniffer::config::DEFAULT_TEST_SPLIT_RATIO;
use product_sniffer::{
    Error, NounSelector, TaggedCorpus, DEFAULT_CRF_TRAINER_CONFIG, EMBEDDED_TAGGED_CORPUS,
};
use std::env;
use std::fs;

/// Trains on the training split of a tagged corpus and reports token
/// accuracy on the held-out split.
fn evaluate_tagger(corpus_text: &str) -> Result<(usize, usize, f64), Error> {
    let corpus = TaggedCorpus::from_tagged_text(corpus_text)?;
    let (train, test) = corpus.train_test_split(DEFAULT_TEST_SPLIT_RATIO);

    info!(
        "Training on {} sentences, holding out {}",
        train.len(),
        test.len()
    );

    let selector = NounSelector::train(&train, DEFAULT_CRF_TRAINER_CONFIG)?;
    let accuracy = selector.evaluate(&test)?;

    Ok((train.len(), test.len(), accuracy))
}

fn main() {
    // Initialize the logger
    env_logger::init();

    // An optional corpus path replaces the embedded corpus
    let corpus_text = match env::args().nth(1) {
        Some(corpus_path) => match fs::read_to_string(&corpus_path) {
            Ok(text) => text,
            Err(e) => {
                error!("Failed to read corpus {}: {}", corpus_path, e);
                std::process::exit(1);
            }
        },
        None => EMBEDDED_TAGGED_CORPUS.to_string(),
    };

    match evaluate_tagger(&corpus_text) {
        Ok((train_len, test_len, accuracy)) => {
            println!("Training sentences: {}", train_len);
            println!("Held-out sentences: {}", test_len);
            println!("Token accuracy: {:.4}", accuracy);
        }
        Err(e) => {
            error!("Error evaluating tagger: {}", e);
            std::process::exit(1);
        }
    }
}
