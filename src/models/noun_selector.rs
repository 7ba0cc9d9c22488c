use crate::models::crf_trainer::{train_crf, CrfTrainerConfig};
use crate::models::feature_extractor::sentence_features;
use crate::models::{CrfModel, TaggedCorpus};
use crate::types::{TaggedToken, Token, UniversalTag};
use crate::utils::tokenize;
use crate::Error;
use log::debug;

/// Guesses the head noun of a search phrase with a CRF tagger.
///
/// The tagger is trained once, when the selector is built; tagging afterwards
/// only runs inference against the immutable model.
#[derive(Debug, Clone)]
pub struct NounSelector {
    model: CrfModel,
}

impl NounSelector {
    pub fn from_model(model: CrfModel) -> Self {
        Self { model }
    }

    /// Trains the tagger on every sentence of the corpus.
    pub fn train(corpus: &TaggedCorpus, config: &CrfTrainerConfig) -> Result<Self, Error> {
        let (xs, ys) = corpus.prepare_data()?;
        let model = train_crf(config, &xs, &ys)?;

        Ok(Self { model })
    }

    pub fn model(&self) -> &CrfModel {
        &self.model
    }

    /// Labels each token of an already tokenized sentence.
    pub fn tag_tokens(&self, tokens: &[Token]) -> Result<Vec<TaggedToken>, Error> {
        let xseq = sentence_features(tokens)?;
        let labels = self.model.predict(&xseq);

        Ok(tokens.iter().cloned().zip(labels).collect())
    }

    /// Splits the phrase on whitespace and labels each token.
    pub fn tag(&self, phrase: &str) -> Result<Vec<TaggedToken>, Error> {
        let tokens = tokenize(phrase);
        if tokens.is_empty() {
            return Err(Error::BoundaryError(format!(
                "Cannot tag an empty phrase: {:?}",
                phrase
            )));
        }

        self.tag_tokens(&tokens)
    }

    /// Returns the first token of the phrase labeled NOUN.
    pub fn find_noun(&self, phrase: &str) -> Result<Token, Error> {
        let tagged_tokens = self.tag(phrase)?;

        debug!("Tagged phrase: {:?}", tagged_tokens);

        tagged_tokens
            .into_iter()
            .find(|(_, tag)| *tag == UniversalTag::Noun)
            .map(|(token, _)| token)
            .ok_or_else(|| Error::NoNounFound(phrase.to_string()))
    }

    /// Fraction of tokens whose predicted label matches the corpus label.
    pub fn evaluate(&self, corpus: &TaggedCorpus) -> Result<f64, Error> {
        let mut total = 0usize;
        let mut correct = 0usize;

        for sentence in &corpus.sentences {
            let tokens: Vec<Token> = sentence.iter().map(|(word, _)| word.clone()).collect();
            let predicted = self.tag_tokens(&tokens)?;

            total += sentence.len();
            correct += sentence
                .iter()
                .zip(&predicted)
                .filter(|((_, expected), (_, actual))| expected == actual)
                .count();
        }

        if total == 0 {
            return Err(Error::BoundaryError(
                "Cannot evaluate on an empty corpus".to_string(),
            ));
        }

        Ok(correct as f64 / total as f64)
    }
}
