//! Substitution Matrix
//!
//! Pairwise substitution scores for every ordered pair of positions in a
//! query sequence. Used for visualization only; cost is O(n²) in sequence length.
//!
//! ```
//! use protlm_core::{build_substitution_matrix, ScoringSource};
//!
//! let scheme = ScoringSource::Blosum62.resolve();
//! let matrix = build_substitution_matrix("egh", scheme.as_ref());
//! assert_eq!(matrix.residues, vec!['E', 'G', 'H']);
//! assert_eq!(matrix.scores[0], vec![5, -2, 0]);
//! ```
mod scheme;
mod table;

pub use scheme::{IdentityScheme, ScoringScheme, ScoringSource};
pub use table::{SubstitutionTable, TableError, FALLBACK_SUBSTITUTION_SCORE};

use crate::sequence::clean_sequence;
use serde::{Deserialize, Serialize};

/// Ordered residues and the square grid aligned to them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubstitutionMatrix {
    pub residues: Vec<char>,
    pub scores: Vec<Vec<i32>>,
}

impl SubstitutionMatrix {
    pub fn len(&self) -> usize {
        self.residues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }

    pub fn get(&self, i: usize, j: usize) -> Option<i32> {
        self.scores.get(i).and_then(|row| row.get(j)).copied()
    }
}

/// Score every ordered position pair of the cleaned sequence.
///
/// Pairs are not deduplicated by residue identity: a sequence of length `n`
/// always yields an `n x n` grid. An empty cleaned sequence yields an empty matrix.
pub fn build_substitution_matrix(sequence: &str, scheme: &dyn ScoringScheme) -> SubstitutionMatrix {
    let residues: Vec<char> = clean_sequence(sequence).chars().collect();
    let scores = residues
        .iter()
        .enumerate()
        .map(|(i, &a)| {
            residues
                .iter()
                .enumerate()
                .map(|(j, &b)| scheme.pair_score(i, a, j, b))
                .collect()
        })
        .collect();
    SubstitutionMatrix { residues, scores }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_square(matrix: &SubstitutionMatrix) {
        assert_eq!(matrix.scores.len(), matrix.residues.len());
        for row in &matrix.scores {
            assert_eq!(row.len(), matrix.residues.len());
        }
    }

    #[test]
    fn test_empty_sequence() {
        let scheme = ScoringSource::Blosum62.resolve();
        for input in ["", "   ", "123-*"] {
            let matrix = build_substitution_matrix(input, scheme.as_ref());
            assert!(matrix.is_empty());
            assert!(matrix.scores.is_empty());
        }
    }

    #[test]
    fn test_blosum_matrix_egh() {
        let scheme = ScoringSource::Blosum62.resolve();
        let matrix = build_substitution_matrix("E g-H", scheme.as_ref());
        assert_square(&matrix);
        assert_eq!(matrix.residues, vec!['E', 'G', 'H']);
        assert_eq!(
            matrix.scores,
            vec![vec![5, -2, 0], vec![-2, 6, -2], vec![0, -2, 8]]
        );
    }

    #[test]
    fn test_repeated_residues_are_not_deduplicated() {
        let scheme = ScoringSource::Blosum62.resolve();
        let matrix = build_substitution_matrix("AAW", scheme.as_ref());
        assert_square(&matrix);
        assert_eq!(matrix.len(), 3);
        assert_eq!(matrix.get(0, 1), Some(4));
        assert_eq!(matrix.get(2, 0), Some(-3));
        assert_eq!(matrix.get(3, 0), None);
    }

    #[test]
    fn test_unknown_residue_falls_back() {
        let scheme = ScoringSource::Blosum62.resolve();
        let matrix = build_substitution_matrix("AJ", scheme.as_ref());
        assert_eq!(matrix.get(0, 1), Some(FALLBACK_SUBSTITUTION_SCORE));
        assert_eq!(matrix.get(1, 0), Some(FALLBACK_SUBSTITUTION_SCORE));
        assert_eq!(matrix.get(1, 1), Some(FALLBACK_SUBSTITUTION_SCORE));
    }

    #[test]
    fn test_identity_fallback_matrix() {
        let scheme = ScoringSource::File("/missing/blosum62.txt".into()).resolve();
        let matrix = build_substitution_matrix("MKTAYA", scheme.as_ref());
        assert_square(&matrix);
        for i in 0..matrix.len() {
            for j in 0..matrix.len() {
                let expected = if i == j { 1 } else { 0 };
                assert_eq!(matrix.scores[i][j], expected);
            }
        }
    }

    #[test]
    fn test_matrix_is_symmetric() {
        let scheme = ScoringSource::Blosum62.resolve();
        let matrix = build_substitution_matrix("MALWMRLLPLLALLALWGPDPAAA", scheme.as_ref());
        assert_square(&matrix);
        for i in 0..matrix.len() {
            for j in 0..matrix.len() {
                assert_eq!(matrix.scores[i][j], matrix.scores[j][i]);
            }
        }
    }

    #[test]
    fn test_serializes_residues_as_strings() {
        let scheme = ScoringSource::Identity.resolve();
        let matrix = build_substitution_matrix("AC", scheme.as_ref());
        let json = serde_json::to_string(&matrix).unwrap();
        assert_eq!(json, r#"{"residues":["A","C"],"scores":[[1,0],[0,1]]}"#);
    }
}
