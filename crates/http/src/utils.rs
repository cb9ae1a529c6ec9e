//! Small helpers shared by the codec and io layers: the `ensure!` early-return
//! macro and the byte-class predicates the wire grammars are written against.

/// Returns early with an error if a condition is not met.
///
/// Similar to `assert!`, but produces an `Err` instead of panicking, which
/// keeps grammar code flat: every mandatory byte becomes one line.
///
/// # Example
///
/// ```
/// use nano_http::ensure;
/// use nano_http::protocol::ParseError;
///
/// fn require_space(byte: u8) -> Result<(), ParseError> {
///     ensure!(byte == b' ', ParseError::expected(b' '));
///     Ok(())
/// }
///
/// assert!(require_space(b'x').is_err());
/// ```
#[macro_export]
macro_rules! ensure {
    ($predicate:expr, $error:expr) => {
        if !$predicate {
            return Err($error);
        }
    };
}

/// True for the two horizontal padding bytes allowed after a header colon.
#[must_use]
pub const fn is_space_or_tab(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t')
}

/// True for space, tab, carriage return and line feed.
///
/// This is the token-terminator class of the request grammar and also the
/// insignificant-whitespace class of JSON.
#[must_use]
pub const fn is_whitespace(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\r' | b'\n')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_classes() {
        assert!(is_space_or_tab(b' '));
        assert!(is_space_or_tab(b'\t'));
        assert!(!is_space_or_tab(b'\r'));

        assert!(is_whitespace(b'\r'));
        assert!(is_whitespace(b'\n'));
        assert!(!is_whitespace(b'a'));
        assert!(!is_whitespace(b':'));
    }
}
