//! # Constants
//!
//! The twenty canonical amino acids, in the one-letter order used by the
//! classifier vocabulary.

#[rustfmt::skip]
pub const AMINO_ACIDS: [char; 20] = [
    'A', 'C', 'D', 'E', 'F',
    'G', 'H', 'I', 'K', 'L',
    'M', 'N', 'P', 'Q', 'R',
    'S', 'T', 'V', 'W', 'Y',
];

/// True for the twenty canonical one-letter codes (uppercase only).
pub fn is_standard_amino_acid(aa: char) -> bool {
    AMINO_ACIDS.contains(&aa)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_amino_acids() {
        assert!(is_standard_amino_acid('W'));
        assert!(!is_standard_amino_acid('X'));
        assert!(!is_standard_amino_acid('a'));
        let mut sorted = AMINO_ACIDS;
        sorted.sort();
        assert_eq!(sorted, AMINO_ACIDS);
    }
}
