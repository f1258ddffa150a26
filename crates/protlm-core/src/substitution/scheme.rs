use super::table::SubstitutionTable;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt::Debug;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

/// Scores one cell `(i, j)` of a substitution matrix.
///
/// Positions are passed alongside residues so that schemes which only care
/// about the diagonal (see [`IdentityScheme`]) do not need a table.
pub trait ScoringScheme: Debug + Send + Sync {
    fn name(&self) -> &str;
    fn pair_score(&self, i: usize, a: char, j: usize, b: char) -> i32;
}

impl ScoringScheme for SubstitutionTable {
    fn name(&self) -> &str {
        SubstitutionTable::name(self)
    }
    fn pair_score(&self, _i: usize, a: char, _j: usize, b: char) -> i32 {
        self.score(a, b)
    }
}

/// 1 on the positional diagonal, 0 everywhere else.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityScheme;

impl ScoringScheme for IdentityScheme {
    fn name(&self) -> &str {
        "identity"
    }
    fn pair_score(&self, i: usize, _a: char, j: usize, _b: char) -> i32 {
        i32::from(i == j)
    }
}

/// Where the scoring table comes from. Resolved once at startup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringSource {
    #[default]
    Blosum62,
    Identity,
    /// NCBI-format matrix on disk.
    File(PathBuf),
}

impl ScoringSource {
    /// Build the scheme for this source.
    ///
    /// An unreadable or malformed table degrades to [`IdentityScheme`] with a warning.
    pub fn resolve(&self) -> Arc<dyn ScoringScheme> {
        let table = match self {
            ScoringSource::Identity => return Arc::new(IdentityScheme),
            ScoringSource::Blosum62 => SubstitutionTable::blosum62(),
            ScoringSource::File(path) => SubstitutionTable::from_file(path),
        };
        match table {
            Ok(table) => {
                tracing::debug!(table = table.name(), "loaded substitution table");
                Arc::new(table)
            }
            Err(err) => {
                tracing::warn!(
                    source = ?self,
                    error = %err,
                    "substitution table unavailable, falling back to identity scoring"
                );
                Arc::new(IdentityScheme)
            }
        }
    }
}

impl FromStr for ScoringSource {
    type Err = Infallible;

    /// `blosum62` and `identity` (any case) name the built-ins; anything else is a path.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_ascii_lowercase().as_str() {
            "blosum62" => ScoringSource::Blosum62,
            "identity" => ScoringSource::Identity,
            _ => ScoringSource::File(PathBuf::from(s)),
        })
    }
}
