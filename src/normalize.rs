//! Line normalizer: trims leading/trailing ASCII whitespace while leaving
//! interior spacing untouched.

/// Trims ASCII whitespace (space, tab, and the rest of the `isspace` class)
/// from both ends of `line`. Never grows the string; an all-whitespace
/// input normalizes to the empty string.
pub fn normalize(line: &str) -> &str {
    line.trim_matches(|c: char| c.is_ascii_whitespace())
}

#[cfg(test)]
mod tests {
    use super::normalize;

    #[test]
    fn trims_both_ends() {
        assert_eq!(normalize("   ls -l   "), "ls -l");
    }

    #[test]
    fn preserves_interior_spacing() {
        assert_eq!(normalize("  ls   -l  "), "ls   -l");
    }

    #[test]
    fn all_whitespace_becomes_empty() {
        assert_eq!(normalize("   \t  \n"), "");
    }

    #[test]
    fn empty_stays_empty() {
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn idempotent() {
        for s in ["  ls -l  ", "ls", "", "\t\t", "a\tb   c"] {
            assert_eq!(normalize(normalize(s)), normalize(s));
        }
    }
}
