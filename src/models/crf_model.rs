use crate::models::{AttributeMapper, FeatureMap};
use crate::types::{AttributeId, LabelId, UniversalTag};

/// Attribute ids and weights for each position of a sequence.
pub type EncodedItem = Vec<(AttributeId, f64)>;

/// A trained linear-chain CRF.
///
/// Weights are laid out as `[state weights | transition weights]`, where the
/// state weight of attribute `a` for label `y` lives at `a * num_labels + y`
/// and the transition weight `i -> j` at `transition_offset + i * num_labels + j`.
#[derive(Debug, Clone)]
pub struct CrfModel {
    labels: Vec<UniversalTag>,
    attributes: AttributeMapper,
    weights: Vec<f64>,
}

impl CrfModel {
    pub(crate) fn new(
        labels: Vec<UniversalTag>,
        attributes: AttributeMapper,
        weights: Vec<f64>,
    ) -> Self {
        debug_assert_eq!(
            weights.len(),
            attributes.attribute_count() * labels.len() + labels.len() * labels.len()
        );

        Self {
            labels,
            attributes,
            weights,
        }
    }

    pub fn labels(&self) -> &[UniversalTag] {
        &self.labels
    }

    pub fn num_labels(&self) -> usize {
        self.labels.len()
    }

    pub fn num_attributes(&self) -> usize {
        self.attributes.attribute_count()
    }

    /// Number of weights that are not exactly zero.
    pub fn num_active_weights(&self) -> usize {
        self.weights.iter().filter(|w| **w != 0.0).count()
    }

    pub fn transition_weight(&self, from: UniversalTag, to: UniversalTag) -> Option<f64> {
        let i = self.label_id(from)?;
        let j = self.label_id(to)?;
        Some(self.weights[self.transition_offset() + i * self.num_labels() + j])
    }

    fn label_id(&self, tag: UniversalTag) -> Option<LabelId> {
        self.labels.iter().position(|label| *label == tag)
    }

    fn transition_offset(&self) -> usize {
        self.num_attributes() * self.num_labels()
    }

    /// Looks up attribute ids; attributes unseen during training are dropped.
    fn encode(&self, xseq: &[FeatureMap]) -> Vec<EncodedItem> {
        xseq.iter()
            .map(|feature_map| {
                feature_map
                    .to_attributes()
                    .into_iter()
                    .filter_map(|(name, value)| {
                        self.attributes
                            .get_attribute_id(&name)
                            .map(|id| (id, value))
                    })
                    .collect()
            })
            .collect()
    }

    /// Most likely label sequence for the given feature maps.
    pub fn predict(&self, xseq: &[FeatureMap]) -> Vec<UniversalTag> {
        let items = self.encode(xseq);
        let state = state_scores(&self.weights, &items, self.num_labels());

        viterbi(
            &state,
            &self.weights[self.transition_offset()..],
            items.len(),
            self.num_labels(),
        )
        .into_iter()
        .map(|label_id| self.labels[label_id])
        .collect()
    }
}

/// Per-position label scores, flattened as `t * num_labels + y`.
pub(crate) fn state_scores(weights: &[f64], items: &[EncodedItem], num_labels: usize) -> Vec<f64> {
    let mut state = vec![0.0; items.len() * num_labels];

    for (t, item) in items.iter().enumerate() {
        for &(attribute_id, value) in item {
            let base = attribute_id * num_labels;
            for y in 0..num_labels {
                state[t * num_labels + y] += value * weights[base + y];
            }
        }
    }

    state
}

pub(crate) fn viterbi(
    state: &[f64],
    transitions: &[f64],
    length: usize,
    num_labels: usize,
) -> Vec<LabelId> {
    if length == 0 || num_labels == 0 {
        return Vec::new();
    }

    let mut best = state[..num_labels].to_vec();
    let mut backpointers = vec![0usize; length * num_labels];

    for t in 1..length {
        let mut next = vec![f64::NEG_INFINITY; num_labels];
        for j in 0..num_labels {
            for i in 0..num_labels {
                let score = best[i] + transitions[i * num_labels + j];
                if score > next[j] {
                    next[j] = score;
                    backpointers[t * num_labels + j] = i;
                }
            }
            next[j] += state[t * num_labels + j];
        }
        best = next;
    }

    let mut last = 0;
    for y in 1..num_labels {
        if best[y] > best[last] {
            last = y;
        }
    }

    let mut path = vec![0; length];
    path[length - 1] = last;
    for t in (1..length).rev() {
        path[t - 1] = backpointers[t * num_labels + path[t]];
    }

    path
}
