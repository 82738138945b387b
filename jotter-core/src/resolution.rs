use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Resolutions offered by the dashboard, smallest first.
pub const RESOLUTION_PRESETS: [&str; 4] = [
    "900 by 600",
    "1500 by 1000",
    "3000 by 2000",
    "6000 by 4000",
];

/// Grid sampling density: `width` columns by `height` rows.
///
/// Both dimensions are always `> 0`; the only ways to build one are
/// [`ResolutionSpec::new`] and [`ResolutionSpec::parse`], which enforce it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResolutionSpec {
    width: u32,
    height: u32,
}

impl ResolutionSpec {
    /// Token that sits between the two numbers, e.g. `"900 by 600"`.
    pub const SEPARATOR: &'static str = "by";

    pub fn new(width: u32, height: u32) -> crate::Result<Self> {
        if width == 0 || height == 0 {
            return Err(CoreError::InvalidResolutionFormat {
                input: format!("{width} {} {height}", Self::SEPARATOR),
            });
        }
        Ok(Self { width, height })
    }

    /// Parse `"<width> by <height>"`.
    ///
    /// Tokens are whitespace separated. Exactly three tokens are accepted:
    /// a positive integer, the separator, and another positive integer.
    pub fn parse(input: &str) -> crate::Result<Self> {
        let invalid = || CoreError::InvalidResolutionFormat {
            input: input.to_string(),
        };

        let tokens: Vec<&str> = input.split_whitespace().collect();
        let [w, sep, h] = tokens.as_slice() else {
            return Err(invalid());
        };
        if *sep != Self::SEPARATOR {
            return Err(invalid());
        }
        let width: u32 = w.parse().map_err(|_| invalid())?;
        let height: u32 = h.parse().map_err(|_| invalid())?;
        if width == 0 || height == 0 {
            return Err(invalid());
        }
        Ok(Self { width, height })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of grid cells (`width × height`).
    pub fn cell_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

impl FromStr for ResolutionSpec {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ResolutionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.width, Self::SEPARATOR, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_width_then_height() {
        let r = ResolutionSpec::parse("900 by 600").unwrap();
        assert_eq!(r.width(), 900);
        assert_eq!(r.height(), 600);
        assert_eq!(r.cell_count(), 540_000);
    }

    #[test]
    fn tolerates_extra_whitespace() {
        let r: ResolutionSpec = "  4   by\t3 ".parse().unwrap();
        assert_eq!((r.width(), r.height()), (4, 3));
    }

    #[test]
    fn all_presets_parse() {
        for preset in RESOLUTION_PRESETS {
            let r = ResolutionSpec::parse(preset).unwrap();
            assert_eq!(r.to_string(), preset);
        }
    }

    #[test]
    fn rejects_wrong_token_count() {
        for input in ["", "900", "900 600", "900 by", "900 by 600 by 400", "by 600"] {
            assert!(
                matches!(
                    ResolutionSpec::parse(input),
                    Err(CoreError::InvalidResolutionFormat { .. })
                ),
                "{input:?} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_wrong_separator() {
        assert!(ResolutionSpec::parse("900 x 600").is_err());
        assert!(ResolutionSpec::parse("900 BY 600").is_err());
        assert!(ResolutionSpec::parse("900by600").is_err());
    }

    #[test]
    fn rejects_non_integers() {
        assert!(ResolutionSpec::parse("9.5 by 600").is_err());
        assert!(ResolutionSpec::parse("900 by six").is_err());
        assert!(ResolutionSpec::parse("-900 by 600").is_err());
    }

    #[test]
    fn rejects_zero_dimensions() {
        assert!(ResolutionSpec::parse("0 by 600").is_err());
        assert!(ResolutionSpec::parse("900 by 0").is_err());
        assert!(ResolutionSpec::new(0, 1).is_err());
        assert!(ResolutionSpec::new(1, 0).is_err());
    }

    #[test]
    fn error_message_names_input() {
        let err = ResolutionSpec::parse("big").unwrap_err();
        assert!(err.to_string().contains("\"big\""));
    }
}
