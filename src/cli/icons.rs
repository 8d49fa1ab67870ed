//! Console output icons and styled text helpers.

use console::{style, StyledObject};

/// Success checkmark icon (green ✓).
pub fn success() -> StyledObject<&'static str> {
    style("✓").green()
}

/// Warning icon (yellow !).
pub fn warn() -> StyledObject<&'static str> {
    style("!").yellow()
}

/// Error icon (red ✗).
pub fn error() -> StyledObject<&'static str> {
    style("✗").red()
}

/// Dim arrow for secondary info.
pub fn dim_arrow() -> StyledObject<&'static str> {
    style("→").dim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_icons_keep_their_glyphs() {
        assert!(success().to_string().contains('✓'));
        assert!(warn().to_string().contains('!'));
        assert!(error().to_string().contains('✗'));
        assert!(dim_arrow().to_string().contains('→'));
    }
}
