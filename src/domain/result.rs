//! Outcome of one chart analysis.

use serde::Serialize;

use super::house::{HouseCell, PlanetPlacement};
use super::zodiac::Sign;

/// Chart layout reported for every valid result.
pub const CHART_TYPE: &str = "North Indian (Diamond)";

/// Error reported when no house yields a sign.
pub const ASCENDANT_MISSING: &str =
    "Ascendant (House 1) Sign not detected (and could not deduce from others)";

/// Warning reported when no house yields a planet.
pub const NO_PLANETS: &str = "No planets detected (Text unclear)";

/// Where the ascendant sign came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AscendantSource {
    /// House 1 was read directly.
    Read,
    /// House 1 was unreadable; the sign was derived from another house.
    Deduced { from_house: u8 },
}

/// Result of analysing one image. Exactly one case is produced per call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AnalysisResult {
    Valid {
        chart_type: &'static str,
        ascendant_sign: Sign,
        ascendant_source: AscendantSource,
        placements: Vec<PlanetPlacement>,
        warnings: Vec<String>,
    },
    Invalid {
        errors: Vec<String>,
        raw_house_data: Vec<HouseCell>,
    },
    DecodeError {
        message: String,
    },
}

impl AnalysisResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, AnalysisResult::Valid { .. })
    }

    pub fn ascendant_sign(&self) -> Option<Sign> {
        match self {
            AnalysisResult::Valid { ascendant_sign, .. } => Some(*ascendant_sign),
            _ => None,
        }
    }

    pub fn warnings(&self) -> &[String] {
        match self {
            AnalysisResult::Valid { warnings, .. } => warnings,
            _ => &[],
        }
    }

    pub fn errors(&self) -> Vec<String> {
        match self {
            AnalysisResult::Valid { .. } => Vec::new(),
            AnalysisResult::Invalid { errors, .. } => errors.clone(),
            AnalysisResult::DecodeError { message } => vec![message.clone()],
        }
    }
}
