//! Sequence cleaning.

/// Trim, uppercase, and drop every non-alphabetic character.
///
/// Unknown letters (`X`, `B`, `U`, ...) are kept; the tokenizer and the
/// scoring tables decide what to do with them.
pub fn clean_sequence(sequence: &str) -> String {
    sequence
        .trim()
        .to_uppercase()
        .chars()
        .filter(|c| c.is_alphabetic())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_sequence() {
        assert_eq!(clean_sequence("  megh \n"), "MEGH");
        assert_eq!(clean_sequence("M-K 1T*a"), "MKTA");
        assert_eq!(clean_sequence("xBu"), "XBU");
        assert_eq!(clean_sequence("123 -*"), "");
        assert_eq!(clean_sequence(""), "");
    }
}
