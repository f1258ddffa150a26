//! protlm-plms
//!
//! Protein sequence classifiers on candle:
//!
//! - [`tokenizer`]: fixed 22-token protein vocabulary and fixed-length encoding.
//! - [`classifier`]: transformer encoder with masked mean pooling and a linear head.
//! - [`checkpoint`]: `config.json` + `model.safetensors` directories.
//! - [`bundle`]: the organism classifier plus the optional protein-type classifier.
//! - [`predict`]: one query in, merged [`PredictionResponse`] out.
//!
//! ```no_run
//! use protlm_plms::{device, init_global, predict_global, BundleConfig};
//!
//! let config = BundleConfig::from_root("backend");
//! init_global(&config, &device(false)?)?;
//! let response = predict_global("MKTAYIAKQRQISFVKSHFSRQ")?;
//! println!("{}", response.organism.predicted_label);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
use candle_core::utils::{cuda_is_available, metal_is_available};
use candle_core::Device;

pub mod bundle;
pub mod checkpoint;
pub mod classifier;
pub mod error;
pub mod labels;
pub mod predict;
pub mod tokenizer;

pub use bundle::{global, init_global, is_ready, BundleConfig, ClassifierHead, ModelBundle};
pub use checkpoint::{Checkpoint, CheckpointConfig};
pub use classifier::{SequenceClassifier, SequenceClassifierConfig};
pub use error::{ProtlmError, Result};
pub use labels::{LabelMap, Organism};
pub use predict::{predict_global, ClassPrediction, PredictionResponse};
pub use tokenizer::{build_protein_vocab, ProteinTokenizer, ProteinVocab};

pub fn device(cpu: bool) -> candle_core::Result<Device> {
    if cpu {
        Ok(Device::Cpu)
    } else if cuda_is_available() {
        Ok(Device::new_cuda(0)?)
    } else if metal_is_available() {
        Ok(Device::new_metal(0)?)
    } else {
        #[cfg(all(target_os = "macos", target_arch = "aarch64"))]
        {
            tracing::info!("running on CPU, to run on GPU(metal), build with `--features metal`");
        }
        #[cfg(not(all(target_os = "macos", target_arch = "aarch64")))]
        {
            tracing::info!("running on CPU, to run on GPU, build with `--features cuda`");
        }
        Ok(Device::Cpu)
    }
}
