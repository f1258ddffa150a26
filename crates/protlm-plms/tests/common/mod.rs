#![allow(dead_code)]
use candle_core::{DType, Device};
use candle_nn::{VarBuilder, VarMap};
use protlm_plms::{BundleConfig, Checkpoint, CheckpointConfig, SequenceClassifier, SequenceClassifierConfig};
use std::path::{Path, PathBuf};

pub fn small_config(max_length: usize, num_classes: usize) -> SequenceClassifierConfig {
    SequenceClassifierConfig {
        max_length,
        embedding_dim: 16,
        num_heads: 4,
        num_layers: 2,
        ff_dim: 32,
        dropout: 0.1,
        num_classes,
        ..Default::default()
    }
}

/// Randomly initialized classifier saved as a checkpoint under `dir`.
pub fn write_checkpoint(dir: &Path, model: SequenceClassifierConfig) -> anyhow::Result<Checkpoint> {
    let varmap = VarMap::new();
    let vb = VarBuilder::from_varmap(&varmap, DType::F32, &Device::Cpu);
    SequenceClassifier::load(vb, &model)?;
    Ok(Checkpoint::save(dir, &CheckpointConfig::new(model), &varmap)?)
}

pub fn write_label_map(path: &Path, names: &[&str]) -> anyhow::Result<()> {
    let map: serde_json::Map<String, serde_json::Value> = names
        .iter()
        .enumerate()
        .map(|(idx, name)| (idx.to_string(), serde_json::Value::from(*name)))
        .collect();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, serde_json::to_string_pretty(&map)?)?;
    Ok(())
}

pub const PROTEIN_TYPES: [&str; 4] = ["Enzymes", "Transporters", "Secreted proteins", "Transcription factors"];

/// Organism checkpoint only, laid out the way [`BundleConfig::from_root`] expects.
pub fn organism_only_root(root: &Path) -> anyhow::Result<BundleConfig> {
    let config = BundleConfig::from_root(root);
    write_checkpoint(&config.organism_checkpoint, small_config(32, 3))?;
    Ok(config)
}

/// Both classifiers plus the protein-type label map. The type model uses its own `max_length`.
pub fn full_root(root: &Path, type_max_length: usize) -> anyhow::Result<BundleConfig> {
    let config = organism_only_root(root)?;
    let type_checkpoint: PathBuf = config.type_checkpoint.clone().unwrap_or_default();
    let label_map: PathBuf = config.type_label_map.clone().unwrap_or_default();
    write_checkpoint(&type_checkpoint, small_config(type_max_length, PROTEIN_TYPES.len()))?;
    write_label_map(&label_map, &PROTEIN_TYPES)?;
    Ok(config)
}
