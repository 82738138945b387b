use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// The rectangle of the complex plane a [`ComplexGrid`](crate::ComplexGrid)
/// samples.
///
/// `re_start` is the left column and `re_end` the right one. `im_start` is
/// row 0 (the top of the image) and `im_end` the bottom row, so for the
/// usual orientation `im_start > im_end`. Both ends are sampled.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    pub re_start: f64,
    pub re_end: f64,
    pub im_start: f64,
    pub im_end: f64,
}

impl Extent {
    /// real ∈ [−1.7, 1.7], imag from 1.4 down to −1.4.
    pub const WIDE: Self = Self {
        re_start: -1.7,
        re_end: 1.7,
        im_start: 1.4,
        im_end: -1.4,
    };

    /// real ∈ [−1.6, 1.6], imag from 1.3 down to −1.3.
    pub const NARROW: Self = Self {
        re_start: -1.6,
        re_end: 1.6,
        im_start: 1.3,
        im_end: -1.3,
    };

    pub fn new(re_start: f64, re_end: f64, im_start: f64, im_end: f64) -> crate::Result<Self> {
        let all = [re_start, re_end, im_start, im_end];
        if all.iter().any(|v| !v.is_finite()) {
            return Err(CoreError::InvalidExtent {
                reason: format!("bounds must be finite, got {all:?}"),
            });
        }
        if re_start == re_end || im_start == im_end {
            return Err(CoreError::InvalidExtent {
                reason: format!(
                    "degenerate extent: re {re_start}..{re_end}, im {im_start}..{im_end}"
                ),
            });
        }
        Ok(Self {
            re_start,
            re_end,
            im_start,
            im_end,
        })
    }

    pub fn re_span(&self) -> f64 {
        self.re_end - self.re_start
    }

    pub fn im_span(&self) -> f64 {
        self.im_end - self.im_start
    }
}

impl Default for Extent {
    fn default() -> Self {
        ExtentProfile::default().extent()
    }
}

/// Named extent presets. `Wide` is the canonical default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtentProfile {
    #[default]
    Wide,
    Narrow,
}

impl ExtentProfile {
    pub const ALL: [Self; 2] = [Self::Wide, Self::Narrow];

    pub fn extent(self) -> Extent {
        match self {
            Self::Wide => Extent::WIDE,
            Self::Narrow => Extent::NARROW,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Wide => "wide",
            Self::Narrow => "narrow",
        }
    }
}

impl FromStr for ExtentProfile {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CoreError::InvalidExtent {
                reason: format!("unknown extent profile {s:?} (expected wide or narrow)"),
            })
    }
}

impl fmt::Display for ExtentProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_wide() {
        assert_eq!(Extent::default(), Extent::WIDE);
        assert_eq!(ExtentProfile::default(), ExtentProfile::Wide);
    }

    #[test]
    fn top_row_is_positive_imaginary() {
        for p in ExtentProfile::ALL {
            let e = p.extent();
            assert!(e.im_start > e.im_end);
            assert!(e.re_start < e.re_end);
            assert!(e.im_span() < 0.0);
        }
    }

    #[test]
    fn profile_names_round_trip() {
        for p in ExtentProfile::ALL {
            assert_eq!(p.name().parse::<ExtentProfile>().unwrap(), p);
        }
        assert_eq!(" NARROW ".parse::<ExtentProfile>().unwrap(), ExtentProfile::Narrow);
        assert!("square".parse::<ExtentProfile>().is_err());
    }

    #[test]
    fn profile_serializes_lowercase() {
        let json = serde_json::to_string(&ExtentProfile::Narrow).unwrap();
        assert_eq!(json, "\"narrow\"");
    }

    #[test]
    fn rejects_bad_bounds() {
        assert!(Extent::new(f64::NAN, 1.0, 1.0, -1.0).is_err());
        assert!(Extent::new(-1.0, 1.0, f64::INFINITY, -1.0).is_err());
        assert!(Extent::new(1.0, 1.0, 1.0, -1.0).is_err());
        assert!(Extent::new(-1.0, 1.0, 0.5, 0.5).is_err());
        assert!(Extent::new(-2.0, 2.0, 2.0, -2.0).is_ok());
    }
}
