//! Transformer sequence classifier.
//!
//! Weight names follow a PyTorch `nn.TransformerEncoder` state dict so that
//! trained checkpoints load without renaming.
mod config;
mod encoder;
mod model;

pub use config::SequenceClassifierConfig;
pub use encoder::{EncoderLayer, SelfAttention, TransformerEncoder};
pub use model::{masked_mean_pool, SequenceClassifier};
