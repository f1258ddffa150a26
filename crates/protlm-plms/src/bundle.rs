//! Loaded models and the process-wide bundle.
//!
//! [`ModelBundle`] owns the mandatory organism classifier and, when its
//! checkpoint and label map are both on disk, the protein-type classifier.
//! Each classifier keeps its own tokenizer since the two checkpoints may be
//! trained with different `max_length`s.
//!
//! A serving process calls [`init_global`] once at startup and gates traffic
//! on [`is_ready`]; request handlers then read the bundle through [`global`]
//! without locking.
use crate::checkpoint::Checkpoint;
use crate::classifier::SequenceClassifier;
use crate::error::{ProtlmError, Result};
use crate::labels::{LabelMap, Organism};
use crate::tokenizer::ProteinTokenizer;
use bon::Builder;
use candle_core::Device;
use protlm_core::{ScoringScheme, ScoringSource};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};

/// Where the bundle's resources live.
#[derive(Debug, Clone, PartialEq, Builder, Serialize, Deserialize)]
pub struct BundleConfig {
    #[builder(into)]
    pub organism_checkpoint: PathBuf,
    #[builder(into)]
    pub type_checkpoint: Option<PathBuf>,
    #[builder(into)]
    pub type_label_map: Option<PathBuf>,
    #[builder(default)]
    #[serde(default)]
    pub scoring: ScoringSource,
}

impl BundleConfig {
    /// Standard layout under one root directory:
    ///
    /// ```text
    /// <root>/checkpoints/public_small
    /// <root>/checkpoints/protein_type
    /// <root>/data/processed/protein_type_label_map.json
    /// ```
    pub fn from_root<P: AsRef<Path>>(root: P) -> Self {
        let root = root.as_ref();
        Self {
            organism_checkpoint: root.join("checkpoints").join("public_small"),
            type_checkpoint: Some(root.join("checkpoints").join("protein_type")),
            type_label_map: Some(
                root.join("data")
                    .join("processed")
                    .join("protein_type_label_map.json"),
            ),
            scoring: ScoringSource::default(),
        }
    }
}

/// One classifier with the tokenizer it was trained with and its label names.
#[derive(Debug)]
pub struct ClassifierHead {
    pub(crate) tokenizer: ProteinTokenizer,
    pub(crate) model: SequenceClassifier,
    pub(crate) labels: LabelMap,
}

impl ClassifierHead {
    pub fn tokenizer(&self) -> &ProteinTokenizer {
        &self.tokenizer
    }

    pub fn model(&self) -> &SequenceClassifier {
        &self.model
    }

    pub fn labels(&self) -> &LabelMap {
        &self.labels
    }
}

#[derive(Debug)]
pub struct ModelBundle {
    organism: ClassifierHead,
    protein_type: Option<ClassifierHead>,
    has_secondary_model: bool,
    scoring: Arc<dyn ScoringScheme>,
    device: Device,
}

impl ModelBundle {
    pub fn load(config: &BundleConfig, device: &Device) -> Result<Self> {
        tracing::info!(
            checkpoint = %config.organism_checkpoint.display(),
            "loading organism classifier"
        );
        let checkpoint = Checkpoint::open(&config.organism_checkpoint)?;
        let num_classes = checkpoint.model_config().num_classes;
        if num_classes != Organism::count() {
            return Err(ProtlmError::Config {
                path: checkpoint.dir().join(crate::checkpoint::CONFIG_FILE),
                reason: format!(
                    "organism classifier has {num_classes} classes, expected {}",
                    Organism::count()
                ),
            });
        }
        let (tokenizer, model) = checkpoint.load_classifier(device)?;
        let organism = ClassifierHead {
            tokenizer,
            model,
            labels: LabelMap::organisms(),
        };

        let protein_type = load_protein_type(config, device)?;
        let has_secondary_model = protein_type.is_some();
        tracing::info!(has_secondary_model, "model bundle ready");

        Ok(Self {
            organism,
            protein_type,
            has_secondary_model,
            scoring: config.scoring.resolve(),
            device: device.clone(),
        })
    }

    pub fn organism(&self) -> &ClassifierHead {
        &self.organism
    }

    pub fn protein_type(&self) -> Option<&ClassifierHead> {
        self.protein_type.as_ref()
    }

    pub fn has_secondary_model(&self) -> bool {
        self.has_secondary_model
    }

    pub fn scoring(&self) -> &dyn ScoringScheme {
        self.scoring.as_ref()
    }

    pub fn device(&self) -> &Device {
        &self.device
    }
}

/// The secondary classifier needs its checkpoint and a non-empty label map;
/// anything less disables it without error.
fn load_protein_type(config: &BundleConfig, device: &Device) -> Result<Option<ClassifierHead>> {
    let (Some(checkpoint_dir), Some(label_map_path)) =
        (&config.type_checkpoint, &config.type_label_map)
    else {
        tracing::info!("protein-type classifier not configured");
        return Ok(None);
    };
    if !Checkpoint::is_present(checkpoint_dir) || !label_map_path.is_file() {
        tracing::info!(
            checkpoint = %checkpoint_dir.display(),
            label_map = %label_map_path.display(),
            "protein-type resources not found, secondary prediction disabled"
        );
        return Ok(None);
    }

    let labels = LabelMap::from_json_file(label_map_path)?;
    if labels.is_empty() {
        tracing::warn!(
            label_map = %label_map_path.display(),
            "protein-type label map is empty, secondary prediction disabled"
        );
        return Ok(None);
    }
    tracing::info!(
        checkpoint = %checkpoint_dir.display(),
        labels = labels.len(),
        "loading protein-type classifier"
    );
    let (tokenizer, model) = Checkpoint::open(checkpoint_dir)?.load_classifier(device)?;
    Ok(Some(ClassifierHead {
        tokenizer,
        model,
        labels,
    }))
}

static MODEL_BUNDLE: OnceLock<ModelBundle> = OnceLock::new();
static INIT_LOCK: Mutex<()> = Mutex::new(());

/// Build the process-wide bundle, at most once.
///
/// Concurrent first callers serialize on a lock; the loser of the race sees the
/// winner's bundle. A failed load returns the error and leaves the global unset.
pub fn init_global(config: &BundleConfig, device: &Device) -> Result<&'static ModelBundle> {
    if let Some(bundle) = MODEL_BUNDLE.get() {
        return Ok(bundle);
    }
    let _guard = INIT_LOCK
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    if let Some(bundle) = MODEL_BUNDLE.get() {
        return Ok(bundle);
    }
    let bundle = ModelBundle::load(config, device)?;
    Ok(MODEL_BUNDLE.get_or_init(|| bundle))
}

pub fn global() -> Result<&'static ModelBundle> {
    MODEL_BUNDLE.get().ok_or(ProtlmError::NotReady)
}

pub fn is_ready() -> bool {
    MODEL_BUNDLE.get().is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_root_layout() {
        let config = BundleConfig::from_root("/srv/protlm");
        assert_eq!(
            config.organism_checkpoint,
            PathBuf::from("/srv/protlm/checkpoints/public_small")
        );
        assert_eq!(
            config.type_checkpoint,
            Some(PathBuf::from("/srv/protlm/checkpoints/protein_type"))
        );
        assert_eq!(
            config.type_label_map,
            Some(PathBuf::from(
                "/srv/protlm/data/processed/protein_type_label_map.json"
            ))
        );
        assert_eq!(config.scoring, ScoringSource::Blosum62);
    }

    #[test]
    fn test_builder_defaults() {
        let config = BundleConfig::builder()
            .organism_checkpoint("ckpt")
            .build();
        assert_eq!(config.organism_checkpoint, PathBuf::from("ckpt"));
        assert!(config.type_checkpoint.is_none());
        assert!(config.type_label_map.is_none());
        assert_eq!(config.scoring, ScoringSource::Blosum62);
    }

    #[test]
    fn test_config_from_json() {
        let config: BundleConfig = serde_json::from_str(
            r#"{"organism_checkpoint": "a", "type_checkpoint": null, "type_label_map": null}"#,
        )
        .unwrap();
        assert_eq!(config.scoring, ScoringSource::Blosum62);
        assert!(config.type_checkpoint.is_none());
    }
}
