//! Class index to display-name tables.
use crate::error::{ProtlmError, Result};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

/// Source organisms known to the mandatory classifier, in class-index order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum Organism {
    HumanSwissprot = 0,
    YeastSwissprot = 1,
    EcoliSwissprot = 2,
}

impl Organism {
    pub fn count() -> usize {
        Organism::iter().count()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelMap {
    names: BTreeMap<usize, String>,
}

impl LabelMap {
    /// The compiled-in organism table: `{0: human_swissprot, 1: yeast_swissprot, 2: ecoli_swissprot}`.
    pub fn organisms() -> Self {
        Self {
            names: Organism::iter()
                .map(|organism| (organism as usize, organism.to_string()))
                .collect(),
        }
    }

    /// Parse `{"0": "name", "1": "name", ...}`.
    pub fn from_json_str(json: &str, path: &Path) -> Result<Self> {
        let raw: HashMap<String, String> = serde_json::from_str(json)?;
        let names = raw
            .into_iter()
            .map(|(idx, name)| {
                idx.trim()
                    .parse::<usize>()
                    .map(|idx| (idx, name))
                    .map_err(|_| ProtlmError::LabelMap {
                        path: path.to_path_buf(),
                        reason: format!("key `{idx}` is not a class index"),
                    })
            })
            .collect::<Result<BTreeMap<_, _>>>()?;
        Ok(Self { names })
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json, path)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Display name for a class index; unmapped indices render as their number.
    pub fn name(&self, idx: usize) -> String {
        self.names
            .get(&idx)
            .cloned()
            .unwrap_or_else(|| idx.to_string())
    }
}
