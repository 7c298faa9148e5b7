//! Per-house extraction state.

use std::collections::BTreeSet;

use serde::Serialize;

use super::topology::{HouseTopology, PixelPoint};
use super::zodiac::{Planet, Sign};

/// What was read from one house of the chart.
///
/// All twelve cells are created up front by [`HouseCell::for_topology`] and
/// then filled in place; they are never recreated or reordered.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HouseCell {
    house_number: u8,
    pub centroid: PixelPoint,
    pub sign: Option<Sign>,
    pub planets: BTreeSet<Planet>,
    /// Trimmed text of every OCR pass, in pass order.
    pub raw_ocr_trace: Vec<String>,
}

impl HouseCell {
    pub fn new(house_number: u8, centroid: PixelPoint) -> Self {
        Self {
            house_number,
            centroid,
            sign: None,
            planets: BTreeSet::new(),
            raw_ocr_trace: Vec::new(),
        }
    }

    /// One cell per house, in house order.
    pub fn for_topology(topology: &HouseTopology) -> [HouseCell; 12] {
        let mut centroids = topology.centroids();
        std::array::from_fn(|_| {
            let (house, centroid) = centroids
                .next()
                .unwrap_or((0, PixelPoint { x: 0, y: 0 }));
            HouseCell::new(house, centroid)
        })
    }

    pub fn house_number(&self) -> u8 {
        self.house_number
    }

    /// The OCR trace joined for display.
    pub fn raw_ocr(&self) -> String {
        self.raw_ocr_trace.join(" | ")
    }
}

/// One planet found in one house.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlanetPlacement {
    pub planet: Planet,
    pub house: u8,
    pub sign: Option<Sign>,
}

/// Flattens the planets of every cell into placements, in house order.
pub fn placements(cells: &[HouseCell]) -> Vec<PlanetPlacement> {
    cells
        .iter()
        .flat_map(|cell| {
            cell.planets.iter().map(move |&planet| PlanetPlacement {
                planet,
                house: cell.house_number,
                sign: cell.sign,
            })
        })
        .collect()
}
