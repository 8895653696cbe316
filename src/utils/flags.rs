//! Boolean-like option values
//!
//! `--build-test` and `--build-examples` take a value rather than acting as
//! switches, so `--build-test=no` and `--build-test off` both work.

/// Recognized spellings, compared case-insensitively
const BOOL_SPELLINGS: &[(&str, bool)] = &[
    ("y", true),
    ("yes", true),
    ("t", true),
    ("true", true),
    ("on", true),
    ("1", true),
    ("n", false),
    ("no", false),
    ("f", false),
    ("false", false),
    ("off", false),
    ("0", false),
];

/// Parse a boolean-like string into a `bool`
///
/// Used as a clap `value_parser`, so the error is a plain message that clap
/// folds into its own diagnostic.
pub fn parse_bool_flag(value: &str) -> Result<bool, String> {
    let needle = value.trim();
    BOOL_SPELLINGS
        .iter()
        .find(|(spelling, _)| spelling.eq_ignore_ascii_case(needle))
        .map(|&(_, flag)| flag)
        .ok_or_else(|| {
            format!(
                "expected one of yes/no, true/false, on/off, 1/0, y/n, t/f (got '{}')",
                value
            )
        })
}

/// Render a boolean the way CMake cache entries are written by this tool
pub fn cmake_bool(value: bool) -> &'static str {
    if value {
        "True"
    } else {
        "False"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truthy_spellings() {
        for s in ["true", "yes", "1", "on", "y", "t", "TRUE", "Yes", "ON"] {
            assert_eq!(parse_bool_flag(s), Ok(true), "spelling: {}", s);
        }
    }

    #[test]
    fn test_falsy_spellings() {
        for s in ["false", "no", "0", "off", "n", "f", "FALSE", "No", "Off"] {
            assert_eq!(parse_bool_flag(s), Ok(false), "spelling: {}", s);
        }
    }

    #[test]
    fn test_invalid_spellings() {
        for s in ["maybe", "", "2", "yess", "enable"] {
            let err = parse_bool_flag(s).unwrap_err();
            assert!(err.contains(s), "message should echo the input: {}", err);
        }
    }

    #[test]
    fn test_cmake_bool() {
        assert_eq!(cmake_bool(true), "True");
        assert_eq!(cmake_bool(false), "False");
    }
}
