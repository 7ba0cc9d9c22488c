use crate::models::feature_extractor::{sentence_features, FeatureMap};
use crate::types::{TaggedSentence, Token, UniversalTag};
use crate::Error;

/// Reference sentences with one part-of-speech label per token.
#[derive(Debug, Clone, Default)]
pub struct TaggedCorpus {
    pub sentences: Vec<TaggedSentence>,
}

impl TaggedCorpus {
    pub fn new(sentences: Vec<TaggedSentence>) -> Self {
        Self { sentences }
    }

    /// Parses a corpus written as one sentence per line, with `word/TAG`
    /// tokens separated by whitespace. The tag follows the last `/`, so
    /// tokens such as `1/2/NUM` keep their inner slash. Blank lines and
    /// lines starting with `#` are ignored.
    pub fn from_tagged_text(text: &str) -> Result<Self, Error> {
        let mut sentences = Vec::new();

        for (line_index, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let sentence = line
                .split_whitespace()
                .map(|tagged| {
                    let (word, tag) = tagged
                        .rsplit_once('/')
                        .filter(|(word, _)| !word.is_empty())
                        .ok_or_else(|| {
                            Error::ParserError(format!(
                                "Line {}: expected `word/TAG`, found {:?}",
                                line_index + 1,
                                tagged
                            ))
                        })?;

                    let tag = tag.parse::<UniversalTag>().map_err(|e| {
                        Error::ParserError(format!("Line {}: {}", line_index + 1, e))
                    })?;

                    Ok((word.to_string(), tag))
                })
                .collect::<Result<TaggedSentence, Error>>()?;

            sentences.push(sentence);
        }

        Ok(Self { sentences })
    }

    pub fn len(&self) -> usize {
        self.sentences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }

    /// Splits the corpus deterministically: every sentence whose position
    /// falls on the `1 / test_ratio` stride goes to the test set.
    ///
    /// Returns `(train, test)`.
    pub fn train_test_split(&self, test_ratio: f64) -> (TaggedCorpus, TaggedCorpus) {
        if test_ratio <= 0.0 || self.sentences.is_empty() {
            return (self.clone(), TaggedCorpus::default());
        }

        let stride = ((1.0 / test_ratio).round() as usize).max(1);

        let (test, train): (Vec<_>, Vec<_>) = self
            .sentences
            .iter()
            .enumerate()
            .partition(|(index, _)| (index + 1) % stride == 0);

        let strip = |pairs: Vec<(usize, &TaggedSentence)>| {
            TaggedCorpus::new(pairs.into_iter().map(|(_, s)| s.clone()).collect())
        };

        (strip(train), strip(test))
    }

    /// Feature and label sequences for every sentence.
    pub fn prepare_data(&self) -> Result<(Vec<Vec<FeatureMap>>, Vec<Vec<UniversalTag>>), Error> {
        let mut xs = Vec::with_capacity(self.sentences.len());
        let mut ys = Vec::with_capacity(self.sentences.len());

        for sentence in &self.sentences {
            let words = untag(sentence);
            xs.push(sentence_features(&words)?);
            ys.push(sentence.iter().map(|(_, tag)| *tag).collect());
        }

        Ok((xs, ys))
    }
}

pub fn untag(sentence: &TaggedSentence) -> Vec<Token> {
    sentence.iter().map(|(word, _)| word.clone()).collect()
}
