use crate::error::ShellError;

const MAX_SOURCE_LEN: usize = 4096;

/// True for the quit answer accepted at every prompt.
pub fn is_quit(input: &str) -> bool {
    input.trim().eq_ignore_ascii_case("q")
}

/// Validates an install source (URL or filesystem path) before dispatching
pub fn validate_source(source: &str) -> Result<(), ShellError> {
    if source.trim().is_empty() {
        return Err(ShellError::InvalidSource(
            "source cannot be empty".to_string(),
        ));
    }

    if source.chars().any(char::is_control) {
        return Err(ShellError::InvalidSource(
            "source contains control characters".to_string(),
        ));
    }

    if source.len() > MAX_SOURCE_LEN {
        return Err(ShellError::InvalidSource(format!(
            "source is too long (max: {MAX_SOURCE_LEN} characters)"
        )));
    }

    Ok(())
}

/// Parses a 1-indexed menu answer into a 0-based index into a list of `len` items
pub fn parse_index(input: &str, len: usize) -> Result<usize, ShellError> {
    match input.trim().parse::<usize>() {
        Ok(n) if n >= 1 && n <= len => Ok(n - 1),
        _ => Err(ShellError::InvalidOption),
    }
}

/// The typed confirmation must equal the theme name exactly; no case folding
pub fn confirmation_matches(typed: &str, name: &str) -> bool {
    typed == name
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quit_is_case_insensitive() {
        assert!(is_quit("q"));
        assert!(is_quit(" Q "));
        assert!(!is_quit("quit"));
        assert!(!is_quit(""));
    }

    #[test]
    fn sources_must_be_non_empty_single_line() {
        assert!(validate_source("https://example.com/NiceTheme.zip").is_ok());
        assert!(validate_source("/var/www/themes/NiceTheme").is_ok());
        assert!(validate_source("   ").is_err());
        assert!(validate_source("a\0b").is_err());
        assert!(validate_source(&"x".repeat(MAX_SOURCE_LEN + 1)).is_err());
    }

    #[test]
    fn index_must_be_numeric_and_in_range() {
        assert_eq!(parse_index("1", 3), Ok(0));
        assert_eq!(parse_index(" 3 ", 3), Ok(2));
        assert_eq!(parse_index("0", 3), Err(ShellError::InvalidOption));
        assert_eq!(parse_index("4", 3), Err(ShellError::InvalidOption));
        assert_eq!(parse_index("-1", 3), Err(ShellError::InvalidOption));
        assert_eq!(parse_index("two", 3), Err(ShellError::InvalidOption));
        assert_eq!(parse_index("1", 0), Err(ShellError::InvalidOption));
    }

    #[test]
    fn confirmation_is_case_sensitive() {
        assert!(confirmation_matches("Foo", "Foo"));
        assert!(!confirmation_matches("foo", "Foo"));
        assert!(!confirmation_matches("Foo ", "Foo"));
    }
}
