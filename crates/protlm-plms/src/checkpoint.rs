//! On-disk classifier checkpoints.
//!
//! A checkpoint is a directory holding `config.json` and `model.safetensors`:
//!
//! ```text
//! checkpoints/public_small/
//! ├── config.json          {"model": {...}, "vocab": ["<PAD>", "<UNK>", "A", ...]}
//! └── model.safetensors
//! ```
//!
//! The config carries the exact construction parameters the weights were
//! trained with, so the classifier is always rebuilt with matching shapes.
use crate::classifier::{SequenceClassifier, SequenceClassifierConfig};
use crate::error::{ProtlmError, Result};
use crate::tokenizer::{build_protein_vocab, ProteinTokenizer};
use candle_core::{DType, Device};
use candle_nn::{VarBuilder, VarMap};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "config.json";
pub const WEIGHTS_FILE: &str = "model.safetensors";

/// Contents of `config.json`. Unknown top-level keys are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckpointConfig {
    pub model: SequenceClassifierConfig,
    /// Vocabulary snapshot in id order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vocab: Option<Vec<String>>,
}

impl CheckpointConfig {
    /// Pair a model config with a snapshot of the built protein vocabulary.
    pub fn new(model: SequenceClassifierConfig) -> Self {
        Self {
            model,
            vocab: Some(build_protein_vocab().tokens().to_vec()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Checkpoint {
    dir: PathBuf,
    config: CheckpointConfig,
}

impl Checkpoint {
    /// Both files exist under `dir`.
    pub fn is_present<P: AsRef<Path>>(dir: P) -> bool {
        let dir = dir.as_ref();
        dir.join(CONFIG_FILE).is_file() && dir.join(WEIGHTS_FILE).is_file()
    }

    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        if !Self::is_present(dir) {
            return Err(ProtlmError::MissingCheckpoint(dir.to_path_buf()));
        }
        let config_path = dir.join(CONFIG_FILE);
        let json = std::fs::read_to_string(&config_path)?;
        let config: CheckpointConfig =
            serde_json::from_str(&json).map_err(|err| ProtlmError::Config {
                path: config_path.clone(),
                reason: err.to_string(),
            })?;
        Ok(Self {
            dir: dir.to_path_buf(),
            config,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn config(&self) -> &CheckpointConfig {
        &self.config
    }

    pub fn model_config(&self) -> &SequenceClassifierConfig {
        &self.config.model
    }

    pub fn weights_path(&self) -> PathBuf {
        self.dir.join(WEIGHTS_FILE)
    }

    /// Check the model config against itself and against `tokenizer`'s vocabulary.
    pub fn validate(&self, tokenizer: &ProteinTokenizer) -> Result<()> {
        let model = &self.config.model;
        let invalid = |reason: String| ProtlmError::Config {
            path: self.dir.join(CONFIG_FILE),
            reason,
        };
        model.validate().map_err(invalid)?;
        if model.vocab_size != tokenizer.len() {
            return Err(invalid(format!(
                "vocab_size {} does not match the protein vocabulary ({} tokens)",
                model.vocab_size,
                tokenizer.len()
            )));
        }
        if model.pad_id != tokenizer.pad_id() {
            return Err(invalid(format!(
                "pad_id {} does not match the vocabulary PAD id {}",
                model.pad_id,
                tokenizer.pad_id()
            )));
        }
        if let Some(vocab) = &self.config.vocab {
            if vocab.as_slice() != tokenizer.vocab().tokens() {
                return Err(invalid(
                    "vocabulary snapshot differs from the protein vocabulary".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Build the tokenizer and the classifier described by this checkpoint.
    pub fn load_classifier(&self, device: &Device) -> Result<(ProteinTokenizer, SequenceClassifier)> {
        let model_config = &self.config.model;
        let tokenizer = ProteinTokenizer::new(model_config.max_length);
        self.validate(&tokenizer)?;
        tracing::debug!(
            weights = %self.weights_path().display(),
            max_length = model_config.max_length,
            embedding_dim = model_config.embedding_dim,
            num_heads = model_config.num_heads,
            num_layers = model_config.num_layers,
            num_classes = model_config.num_classes,
            "loading classifier weights"
        );
        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[self.weights_path()], DType::F32, device)?
        };
        let model = SequenceClassifier::load(vb, model_config)?;
        Ok((tokenizer, model))
    }

    /// Write `config` and the variables in `varmap` as a checkpoint under `dir`.
    pub fn save<P: AsRef<Path>>(dir: P, config: &CheckpointConfig, varmap: &VarMap) -> Result<Self> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;
        std::fs::write(dir.join(CONFIG_FILE), serde_json::to_string_pretty(config)?)?;
        varmap.save(dir.join(WEIGHTS_FILE))?;
        Ok(Self {
            dir: dir.to_path_buf(),
            config: config.clone(),
        })
    }
}
