//! Substitution tables in the NCBI text format.
//!
//! ```text
//! #  comment lines start with '#'
//!    A  R  N
//! A  4 -1 -2
//! R -1  5  0
//! N -2  0  6
//! ```
//!
//! Rows may stop early (lower-triangular tables), in which case the missing
//! half is answered by the swapped lookup.
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Score used when a residue pair resolves in neither order.
pub const FALLBACK_SUBSTITUTION_SCORE: i32 = -4;

const BLOSUM62_NCBI: &str = include_str!("../../data/blosum62.txt");

#[derive(Debug, Error)]
pub enum TableError {
    #[error("substitution table has no header row")]
    Empty,
    #[error("line {line}: expected at most {expected} scores, found {found}")]
    RaggedRow {
        line: usize,
        expected: usize,
        found: usize,
    },
    #[error("line {line}: invalid score `{value}`")]
    InvalidScore { line: usize, value: String },
    #[error("line {line}: residue label `{label}` is not a single character")]
    InvalidLabel { line: usize, label: String },
    #[error("failed to read substitution table {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A parsed pairwise scoring table keyed by one-letter residue codes.
#[derive(Debug, Clone)]
pub struct SubstitutionTable {
    name: String,
    alphabet: Vec<char>,
    scores: HashMap<(char, char), i32>,
}

impl SubstitutionTable {
    /// The BLOSUM62 table bundled with the crate.
    pub fn blosum62() -> Result<Self, TableError> {
        Self::from_ncbi_str("BLOSUM62", BLOSUM62_NCBI)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, TableError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| TableError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().to_uppercase())
            .unwrap_or_else(|| "CUSTOM".to_string());
        Self::from_ncbi_str(&name, &text)
    }

    pub fn from_ncbi_str(name: &str, text: &str) -> Result<Self, TableError> {
        let mut lines = text
            .lines()
            .enumerate()
            .map(|(idx, line)| (idx + 1, line.trim()))
            .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'));

        let (header_line, header) = lines.next().ok_or(TableError::Empty)?;
        let alphabet = header
            .split_whitespace()
            .map(|label| parse_label(header_line, label))
            .collect::<Result<Vec<char>, _>>()?;

        let mut scores = HashMap::with_capacity(alphabet.len() * alphabet.len());
        for (line, row) in lines {
            let mut fields = row.split_whitespace();
            let Some(label) = fields.next() else {
                continue;
            };
            let row_residue = parse_label(line, label)?;
            let values: Vec<&str> = fields.collect();
            if values.is_empty() || values.len() > alphabet.len() {
                return Err(TableError::RaggedRow {
                    line,
                    expected: alphabet.len(),
                    found: values.len(),
                });
            }
            for (col_residue, value) in alphabet.iter().zip(values) {
                let score = value.parse::<i32>().map_err(|_| TableError::InvalidScore {
                    line,
                    value: value.to_string(),
                })?;
                scores.insert((row_residue, *col_residue), score);
            }
        }

        Ok(Self {
            name: name.to_string(),
            alphabet,
            scores,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Column labels in header order.
    pub fn alphabet(&self) -> &[char] {
        &self.alphabet
    }

    /// Ordered lookup: `(a, b)` first, then `(b, a)`.
    pub fn lookup(&self, a: char, b: char) -> Option<i32> {
        self.scores
            .get(&(a, b))
            .or_else(|| self.scores.get(&(b, a)))
            .copied()
    }

    /// [`lookup`](Self::lookup), resolving misses to [`FALLBACK_SUBSTITUTION_SCORE`].
    pub fn score(&self, a: char, b: char) -> i32 {
        self.lookup(a, b).unwrap_or(FALLBACK_SUBSTITUTION_SCORE)
    }
}

fn parse_label(line: usize, label: &str) -> Result<char, TableError> {
    let mut chars = label.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c.to_ascii_uppercase()),
        _ => Err(TableError::InvalidLabel {
            line,
            label: label.to_string(),
        }),
    }
}
