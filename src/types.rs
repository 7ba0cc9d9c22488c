use std::fmt;
use std::str::FromStr;

use crate::Error;

// Types listed here are either shared across multiple files and/or exposed via the library.

/// Represents a token as an owned `String`. Tokens are the basic units of a search phrase.
pub type Token = String;

/// Represents a borrowed view of a token as a `str`. This is used when ownership is not required.
pub type TokenRef = str;

/// A token paired with the part-of-speech label assigned to it.
pub type TaggedToken = (Token, UniversalTag);

/// A single sentence of the reference tagged corpus.
pub type TaggedSentence = Vec<TaggedToken>;

/// Represents the name of a product, as it appears in the catalog.
pub type CandidateName = String;

/// Aggregate lexical similarity of a candidate against a search phrase.
pub type SimilarityScore = f64;

/// Candidate names paired with their scores, highest score first.
pub type Ranking = Vec<(CandidateName, SimilarityScore)>;

/// Index of an attribute within a trained CRF model.
pub type AttributeId = usize;

/// Index of a label within a trained CRF model.
pub type LabelId = usize;

/// Part-of-speech labels of the universal tag set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum UniversalTag {
    Noun,
    Verb,
    Adj,
    Adv,
    Pron,
    Det,
    Adp,
    Num,
    Conj,
    Prt,
    Punct,
    X,
}

impl UniversalTag {
    pub const ALL: [UniversalTag; 12] = [
        UniversalTag::Noun,
        UniversalTag::Verb,
        UniversalTag::Adj,
        UniversalTag::Adv,
        UniversalTag::Pron,
        UniversalTag::Det,
        UniversalTag::Adp,
        UniversalTag::Num,
        UniversalTag::Conj,
        UniversalTag::Prt,
        UniversalTag::Punct,
        UniversalTag::X,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            UniversalTag::Noun => "NOUN",
            UniversalTag::Verb => "VERB",
            UniversalTag::Adj => "ADJ",
            UniversalTag::Adv => "ADV",
            UniversalTag::Pron => "PRON",
            UniversalTag::Det => "DET",
            UniversalTag::Adp => "ADP",
            UniversalTag::Num => "NUM",
            UniversalTag::Conj => "CONJ",
            UniversalTag::Prt => "PRT",
            UniversalTag::Punct => ".",
            UniversalTag::X => "X",
        }
    }
}

impl fmt::Display for UniversalTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for UniversalTag {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UniversalTag::ALL
            .iter()
            .find(|tag| tag.as_str() == s)
            .copied()
            .ok_or_else(|| Error::ParserError(format!("Unknown part-of-speech tag: {:?}", s)))
    }
}
