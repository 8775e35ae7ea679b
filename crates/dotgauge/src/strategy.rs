use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Dot-location strategy, fixed once at construction.
///
/// Exactly one strategy is active per session. Parsing an unrecognized name
/// fails with [`ConfigError::UnknownStrategy`] before any frame is processed;
/// there is no per-frame dispatch on strings.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// Pixel-mass centroid of components above a minimum area.
    Contour,
    /// Pixel-mass centroid of every component, no area filter.
    #[default]
    Moments,
    /// Gradient circle transform on the mask.
    Hough,
    /// Center of each component's minimum enclosing circle.
    EnclosingCircle,
    /// Peak search restricted to a small disk around the mask centroid.
    RadialSymmetry,
    /// Line-fit-derived point per component (inherited misuse, see docs).
    LeastSquares,
}

impl Strategy {
    pub const ALL: [Strategy; 6] = [
        Strategy::Contour,
        Strategy::Moments,
        Strategy::Hough,
        Strategy::EnclosingCircle,
        Strategy::RadialSymmetry,
        Strategy::LeastSquares,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Contour => "contour",
            Strategy::Moments => "moments",
            Strategy::Hough => "hough",
            Strategy::EnclosingCircle => "enclosing-circle",
            Strategy::RadialSymmetry => "radial-symmetry",
            Strategy::LeastSquares => "least-squares",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Strategy {
    type Err = ConfigError;

    /// Accepts kebab-case names; underscores are tolerated as separators.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.replace('_', "-").as_str() {
            "contour" => Ok(Strategy::Contour),
            "moments" => Ok(Strategy::Moments),
            "hough" => Ok(Strategy::Hough),
            "enclosing-circle" => Ok(Strategy::EnclosingCircle),
            "radial-symmetry" => Ok(Strategy::RadialSymmetry),
            "least-squares" => Ok(Strategy::LeastSquares),
            _ => Err(ConfigError::UnknownStrategy(s.to_string())),
        }
    }
}
