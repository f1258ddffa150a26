//! protlm-core
//!
//! Sequence-level utilities shared by the protlm crates:
//!
//! - [`info`]: amino-acid constants.
//! - [`sequence`]: input cleaning.
//! - [`substitution`]: pairwise substitution-score matrices (BLOSUM62 with an identity fallback).
//!
pub mod info;
pub mod sequence;
pub mod substitution;

pub use info::constants::{is_standard_amino_acid, AMINO_ACIDS};
pub use sequence::clean_sequence;
pub use substitution::{
    build_substitution_matrix, IdentityScheme, ScoringScheme, ScoringSource, SubstitutionMatrix,
    SubstitutionTable, TableError, FALLBACK_SUBSTITUTION_SCORE,
};
