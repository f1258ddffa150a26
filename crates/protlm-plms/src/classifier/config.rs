use serde::{Deserialize, Serialize};

fn default_vocab_size() -> usize {
    22
}

/// Construction parameters for [`SequenceClassifier`](super::SequenceClassifier).
///
/// Stored in a checkpoint's `config.json` under the `model` key, so the model
/// can be rebuilt with the exact shapes it was trained with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequenceClassifierConfig {
    #[serde(default = "default_vocab_size")]
    pub vocab_size: usize,
    pub max_length: usize,
    pub embedding_dim: usize,
    pub num_heads: usize,
    pub num_layers: usize,
    pub ff_dim: usize,
    #[serde(default)]
    pub dropout: f64,
    pub num_classes: usize,
    #[serde(default)]
    pub pad_id: u32,
}

impl Default for SequenceClassifierConfig {
    fn default() -> Self {
        Self {
            vocab_size: default_vocab_size(),
            max_length: 512,
            embedding_dim: 128,
            num_heads: 4,
            num_layers: 2,
            ff_dim: 256,
            dropout: 0.1,
            num_classes: 3,
            pad_id: 0,
        }
    }
}

impl SequenceClassifierConfig {
    pub fn head_dim(&self) -> usize {
        self.embedding_dim / self.num_heads
    }

    pub fn validate(&self) -> Result<(), String> {
        let positive = [
            ("max_length", self.max_length),
            ("embedding_dim", self.embedding_dim),
            ("num_heads", self.num_heads),
            ("num_layers", self.num_layers),
            ("ff_dim", self.ff_dim),
            ("num_classes", self.num_classes),
        ];
        if let Some((name, _)) = positive.iter().find(|(_, value)| *value == 0) {
            return Err(format!("{name} must be greater than zero"));
        }
        if self.embedding_dim % self.num_heads != 0 {
            return Err(format!(
                "embedding_dim ({}) must be divisible by num_heads ({})",
                self.embedding_dim, self.num_heads
            ));
        }
        if !(0.0..1.0).contains(&self.dropout) {
            return Err(format!("dropout ({}) must be in [0, 1)", self.dropout));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate() {
        let config = SequenceClassifierConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.head_dim(), 32);

        let uneven = SequenceClassifierConfig {
            embedding_dim: 30,
            num_heads: 4,
            ..config.clone()
        };
        assert!(uneven.validate().unwrap_err().contains("divisible"));

        let no_heads = SequenceClassifierConfig {
            num_heads: 0,
            ..config
        };
        assert_eq!(
            no_heads.validate().unwrap_err(),
            "num_heads must be greater than zero"
        );
    }

    #[test]
    fn test_deserialize_training_config() {
        let json = r#"{
            "max_length": 256, "embedding_dim": 64, "num_heads": 4,
            "num_layers": 2, "ff_dim": 128, "dropout": 0.1, "num_classes": 3
        }"#;
        let config: SequenceClassifierConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.vocab_size, 22);
        assert_eq!(config.pad_id, 0);
        assert_eq!(config.max_length, 256);
    }
}
