//! Domain-level structures shared across the chart reader.
//!
//! This module groups the astrological value types ([`Sign`], [`Planet`]),
//! the fixed diamond layout ([`HouseTopology`]), per-house state
//! ([`HouseCell`]) and the final [`AnalysisResult`].

pub mod house;
pub mod result;
pub mod topology;
pub mod zodiac;

pub use house::{HouseCell, PlanetPlacement, placements};
pub use result::{ASCENDANT_MISSING, AnalysisResult, AscendantSource, CHART_TYPE, NO_PLANETS};
pub use topology::{HOUSE_LAYOUT, HouseTopology, PixelPoint};
pub use zodiac::{Planet, Sign};
