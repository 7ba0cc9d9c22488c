use crate::models::crf_model::{state_scores, EncodedItem};
use crate::models::{AttributeMapper, CrfModel, FeatureMap};
use crate::types::{LabelId, UniversalTag};
use crate::utils::{log_sum_exp, minimize, LbfgsConfig, LbfgsStatus};
use crate::Error;
use log::{debug, info};

#[derive(Debug, Clone, Copy)]
pub struct CrfTrainerConfig {
    /// L1 regularization coefficient.
    pub c1: f64,
    /// L2 regularization coefficient.
    pub c2: f64,
    pub max_iterations: usize,
    /// Allow weights for label transitions never seen in the training data.
    pub all_possible_transitions: bool,
    /// Allow weights for (attribute, label) pairs never seen in the training data.
    pub all_possible_states: bool,
    pub num_memories: usize,
    pub epsilon: f64,
    pub delta: f64,
    pub period: usize,
    pub max_linesearch: usize,
}

struct TrainingSequence {
    items: Vec<EncodedItem>,
    labels: Vec<LabelId>,
}

pub struct CrfTrainer<'a> {
    config: &'a CrfTrainerConfig,
    labels: Vec<UniversalTag>,
    attributes: AttributeMapper,
    sequences: Vec<TrainingSequence>,
    active: Vec<bool>,
}

impl<'a> CrfTrainer<'a> {
    /// Encodes the training data and decides which weights take part in training.
    pub fn new(
        config: &'a CrfTrainerConfig,
        xs: &[Vec<FeatureMap>],
        ys: &[Vec<UniversalTag>],
    ) -> Result<Self, Error> {
        if xs.len() != ys.len() {
            return Err(Error::TrainingError(format!(
                "Got {} feature sequences but {} label sequences",
                xs.len(),
                ys.len()
            )));
        }

        let mut labels: Vec<UniversalTag> = Vec::new();
        let mut attributes = AttributeMapper::new();
        let mut sequences = Vec::with_capacity(xs.len());

        for (xseq, yseq) in xs.iter().zip(ys) {
            if xseq.len() != yseq.len() {
                return Err(Error::TrainingError(format!(
                    "Sequence has {} items but {} labels",
                    xseq.len(),
                    yseq.len()
                )));
            }
            if xseq.is_empty() {
                continue;
            }

            let items: Vec<EncodedItem> = xseq
                .iter()
                .map(|feature_map| {
                    feature_map
                        .to_attributes()
                        .into_iter()
                        .map(|(name, value)| (attributes.upsert_attribute(&name), value))
                        .collect()
                })
                .collect();

            let label_ids: Vec<LabelId> = yseq
                .iter()
                .map(|tag| {
                    let position = labels.iter().position(|label| label == tag);
                    match position {
                        Some(id) => id,
                        None => {
                            labels.push(*tag);
                            labels.len() - 1
                        }
                    }
                })
                .collect();

            sequences.push(TrainingSequence {
                items,
                labels: label_ids,
            });
        }

        if sequences.is_empty() || labels.is_empty() {
            return Err(Error::TrainingError(
                "No labeled sequences to train on".to_string(),
            ));
        }

        let mut trainer = Self {
            config,
            labels,
            attributes,
            sequences,
            active: Vec::new(),
        };
        trainer.active = trainer.active_weights();

        Ok(trainer)
    }

    fn num_labels(&self) -> usize {
        self.labels.len()
    }

    fn transition_offset(&self) -> usize {
        self.attributes.attribute_count() * self.num_labels()
    }

    fn num_weights(&self) -> usize {
        self.transition_offset() + self.num_labels() * self.num_labels()
    }

    fn active_weights(&self) -> Vec<bool> {
        let num_labels = self.num_labels();
        let offset = self.transition_offset();
        let mut active = vec![false; self.num_weights()];

        if self.config.all_possible_states {
            active[..offset].iter_mut().for_each(|a| *a = true);
        }
        if self.config.all_possible_transitions {
            active[offset..].iter_mut().for_each(|a| *a = true);
        }

        for sequence in &self.sequences {
            for (t, item) in sequence.items.iter().enumerate() {
                let y = sequence.labels[t];
                for &(attribute_id, _) in item {
                    active[attribute_id * num_labels + y] = true;
                }
                if t > 0 {
                    active[offset + sequence.labels[t - 1] * num_labels + y] = true;
                }
            }
        }

        active
    }

    pub fn num_active_features(&self) -> usize {
        self.active.iter().filter(|a| **a).count()
    }

    /// Negative log-likelihood of one sequence; accumulates its gradient.
    fn sequence_loss(&self, weights: &[f64], sequence: &TrainingSequence, grad: &mut [f64]) -> f64 {
        let num_labels = self.num_labels();
        let offset = self.transition_offset();
        let transitions = &weights[offset..];
        let length = sequence.items.len();

        let state = state_scores(weights, &sequence.items, num_labels);

        // Forward pass
        let mut alpha = vec![0.0; length * num_labels];
        alpha[..num_labels].copy_from_slice(&state[..num_labels]);
        let mut scratch = vec![0.0; num_labels];
        for t in 1..length {
            for j in 0..num_labels {
                for i in 0..num_labels {
                    scratch[i] = alpha[(t - 1) * num_labels + i] + transitions[i * num_labels + j];
                }
                alpha[t * num_labels + j] = log_sum_exp(&scratch) + state[t * num_labels + j];
            }
        }
        let log_z = log_sum_exp(&alpha[(length - 1) * num_labels..]);

        // Backward pass
        let mut beta = vec![0.0; length * num_labels];
        for t in (0..length - 1).rev() {
            for i in 0..num_labels {
                for j in 0..num_labels {
                    scratch[j] = transitions[i * num_labels + j]
                        + state[(t + 1) * num_labels + j]
                        + beta[(t + 1) * num_labels + j];
                }
                beta[t * num_labels + i] = log_sum_exp(&scratch);
            }
        }

        // Expected counts minus observed counts
        let mut gold_score = 0.0;
        for (t, item) in sequence.items.iter().enumerate() {
            let gold = sequence.labels[t];
            gold_score += state[t * num_labels + gold];

            for y in 0..num_labels {
                let marginal =
                    (alpha[t * num_labels + y] + beta[t * num_labels + y] - log_z).exp();
                for &(attribute_id, value) in item {
                    grad[attribute_id * num_labels + y] += marginal * value;
                }
            }
            for &(attribute_id, value) in item {
                grad[attribute_id * num_labels + gold] -= value;
            }

            if t > 0 {
                let prev_gold = sequence.labels[t - 1];
                gold_score += transitions[prev_gold * num_labels + gold];

                for i in 0..num_labels {
                    for j in 0..num_labels {
                        let marginal = (alpha[(t - 1) * num_labels + i]
                            + transitions[i * num_labels + j]
                            + state[t * num_labels + j]
                            + beta[t * num_labels + j]
                            - log_z)
                            .exp();
                        grad[offset + i * num_labels + j] += marginal;
                    }
                }
                grad[offset + prev_gold * num_labels + gold] -= 1.0;
            }
        }

        log_z - gold_score
    }

    /// Smooth part of the objective: negative log-likelihood plus the L2 term.
    fn objective(&self, weights: &[f64], grad: &mut [f64]) -> f64 {
        grad.iter_mut().for_each(|g| *g = 0.0);

        let mut loss: f64 = self
            .sequences
            .iter()
            .map(|sequence| self.sequence_loss(weights, sequence, grad))
            .sum();

        let c2 = self.config.c2;
        for ((g, w), active) in grad.iter_mut().zip(weights).zip(&self.active) {
            if *active {
                loss += c2 * w * w;
                *g += 2.0 * c2 * w;
            } else {
                *g = 0.0;
            }
        }

        loss
    }

    /// Fits the weights and returns the trained model.
    pub fn train(self) -> Result<CrfModel, Error> {
        info!(
            "Training CRF on {} sequences ({} labels, {} attributes, {} active features)",
            self.sequences.len(),
            self.num_labels(),
            self.attributes.attribute_count(),
            self.num_active_features()
        );

        let lbfgs_config = LbfgsConfig {
            num_memories: self.config.num_memories,
            max_iterations: self.config.max_iterations,
            epsilon: self.config.epsilon,
            delta: self.config.delta,
            period: self.config.period,
            max_linesearch: self.config.max_linesearch,
            c1: self.config.c1,
        };

        let outcome = minimize(
            |weights, grad| self.objective(weights, grad),
            vec![0.0; self.num_weights()],
            &lbfgs_config,
        );

        if outcome.status == LbfgsStatus::LineSearchFailed && outcome.iterations == 0 {
            return Err(Error::TrainingError(
                "Optimizer could not improve on the initial weights".to_string(),
            ));
        }

        info!(
            "Training finished after {} iterations ({:?}), loss {:.4}",
            outcome.iterations, outcome.status, outcome.fx
        );
        debug!(
            "{} of {} weights are non-zero",
            outcome.x.iter().filter(|w| **w != 0.0).count(),
            outcome.x.len()
        );

        Ok(CrfModel::new(self.labels, self.attributes, outcome.x))
    }
}

/// Trains a CRF on feature and label sequences with the given configuration.
pub fn train_crf(
    config: &CrfTrainerConfig,
    xs: &[Vec<FeatureMap>],
    ys: &[Vec<UniversalTag>],
) -> Result<CrfModel, Error> {
    CrfTrainer::new(config, xs, ys)?.train()
}
