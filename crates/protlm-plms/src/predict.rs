//! Prediction orchestration.
//!
//! One query runs the organism classifier, the protein-type classifier when
//! the bundle has one, and the substitution matrix builder, and merges the
//! three into a [`PredictionResponse`].
use crate::bundle::{self, ClassifierHead, ModelBundle};
use crate::error::{ProtlmError, Result};
use crate::labels::LabelMap;
use candle_core::{Device, Tensor};
use candle_nn::ops::softmax_last_dim;
use protlm_core::{build_substitution_matrix, SubstitutionMatrix};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;

/// Top class of one classifier and its full distribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassPrediction {
    pub predicted_label: String,
    pub confidence: f32,
    pub class_probabilities: BTreeMap<String, f32>,
}

impl ClassPrediction {
    /// `None` for an empty distribution. Ties go to the lowest class index.
    pub fn from_probabilities(probabilities: &[f32], labels: &LabelMap) -> Option<Self> {
        let (best_idx, confidence) = probabilities.iter().copied().enumerate().fold(
            None,
            |best: Option<(usize, f32)>, (idx, p)| match best {
                Some((_, best_p)) if best_p >= p => best,
                _ => Some((idx, p)),
            },
        )?;
        let class_probabilities = probabilities
            .iter()
            .enumerate()
            .map(|(idx, &p)| (labels.name(idx), p))
            .collect();
        Some(Self {
            predicted_label: labels.name(best_idx),
            confidence,
            class_probabilities,
        })
    }
}

/// Flat JSON: the organism fields sit at the top level next to the optional
/// protein-type prediction and the matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    #[serde(flatten)]
    pub organism: ClassPrediction,
    pub protein_type_prediction: Option<ClassPrediction>,
    pub blosum_matrix: SubstitutionMatrix,
}

impl ClassifierHead {
    /// Softmax over the logits for one encoded sequence.
    pub fn classify(&self, input_ids: &[u32], device: &Device) -> Result<ClassPrediction> {
        let input_ids = Tensor::new(input_ids, device)?.unsqueeze(0)?;
        let logits = self.model.forward(&input_ids)?;
        let probabilities = softmax_last_dim(&logits)?.squeeze(0)?.to_vec1::<f32>()?;
        ClassPrediction::from_probabilities(&probabilities, &self.labels).ok_or_else(|| {
            ProtlmError::Candle(candle_core::Error::Msg(
                "classifier produced an empty distribution".to_string(),
            ))
        })
    }
}

impl ModelBundle {
    pub fn predict(&self, sequence: &str) -> Result<PredictionResponse> {
        let sequence = sequence.trim().to_uppercase();
        if sequence.is_empty() {
            return Err(ProtlmError::InvalidInput("Sequence is required".to_string()));
        }

        let organism_head = self.organism();
        let organism_ids = organism_head.tokenizer.encode(&sequence);
        let organism = organism_head.classify(&organism_ids, self.device())?;

        let protein_type_prediction = match self.protein_type() {
            Some(head) if self.has_secondary_model() => {
                let ids: Cow<[u32]> =
                    if head.tokenizer.max_length() == organism_head.tokenizer.max_length() {
                        Cow::Borrowed(organism_ids.as_slice())
                    } else {
                        Cow::Owned(head.tokenizer.encode(&sequence))
                    };
                Some(head.classify(&ids, self.device())?)
            }
            _ => None,
        };

        let blosum_matrix = build_substitution_matrix(&sequence, self.scoring());
        tracing::debug!(
            residues = blosum_matrix.len(),
            organism = %organism.predicted_label,
            confidence = organism.confidence,
            protein_type = protein_type_prediction
                .as_ref()
                .map(|p| p.predicted_label.as_str()),
            "prediction complete"
        );

        Ok(PredictionResponse {
            organism,
            protein_type_prediction,
            blosum_matrix,
        })
    }
}

/// [`ModelBundle::predict`] against the bundle built by [`bundle::init_global`].
pub fn predict_global(sequence: &str) -> Result<PredictionResponse> {
    bundle::global()?.predict(sequence)
}
