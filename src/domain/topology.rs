//! Fixed geometry of the North-Indian diamond chart.
//!
//! The chart is a square with both diagonals and the diamond joining the
//! edge midpoints drawn in. That yields four diamond houses (1, 4, 7, 10) and
//! eight triangular houses. House 1 is the top diamond and numbering runs
//! counter-clockwise.
//!
//! ```text
//!    2 | 1 | 12
//!  3   |   |   11
//!  4   |   |   10
//!  5   |   |   9
//!    6 | 7 | 8
//! ```
//!
//! The table is an ordered slice rather than a map so that iteration order is
//! the house order.

use serde::Serialize;

/// A ratio `num / den` applied to an image dimension with integer division.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fraction {
    pub num: u32,
    pub den: u32,
}

impl Fraction {
    pub const fn new(num: u32, den: u32) -> Self {
        Self { num, den }
    }

    /// `floor(length * num / den)`.
    pub fn of(self, length: u32) -> u32 {
        (u64::from(length) * u64::from(self.num) / u64::from(self.den)) as u32
    }
}

/// Normalised centroid of one house.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HousePosition {
    pub house: u8,
    pub x: Fraction,
    pub y: Fraction,
}

const fn position(house: u8, x: (u32, u32), y: (u32, u32)) -> HousePosition {
    HousePosition {
        house,
        x: Fraction::new(x.0, x.1),
        y: Fraction::new(y.0, y.1),
    }
}

/// House centroids in enumeration order.
pub const HOUSE_LAYOUT: [HousePosition; 12] = [
    position(1, (1, 2), (1, 4)),  // top diamond
    position(2, (1, 4), (1, 8)),  // upper-left triangle, upper
    position(3, (1, 8), (1, 4)),  // upper-left triangle, lower
    position(4, (1, 4), (1, 2)),  // left diamond
    position(5, (1, 8), (3, 4)),  // lower-left triangle, upper
    position(6, (1, 4), (7, 8)),  // lower-left triangle, lower
    position(7, (1, 2), (3, 4)),  // bottom diamond
    position(8, (3, 4), (7, 8)),  // lower-right triangle, lower
    position(9, (7, 8), (3, 4)),  // lower-right triangle, upper
    position(10, (3, 4), (1, 2)), // right diamond
    position(11, (7, 8), (1, 4)), // upper-right triangle, lower
    position(12, (3, 4), (1, 8)), // upper-right triangle, upper
];

/// A pixel position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PixelPoint {
    pub x: u32,
    pub y: u32,
}

/// Resolves the layout against concrete image dimensions.
#[derive(Debug, Clone, Copy)]
pub struct HouseTopology {
    width: u32,
    height: u32,
}

impl HouseTopology {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Pixel centroid of `house`, or `None` outside 1..=12.
    pub fn centroid(&self, house: u8) -> Option<PixelPoint> {
        HOUSE_LAYOUT
            .iter()
            .find(|p| p.house == house)
            .map(|p| self.resolve(p))
    }

    /// `(house, centroid)` pairs in house order.
    pub fn centroids(&self) -> impl Iterator<Item = (u8, PixelPoint)> + '_ {
        HOUSE_LAYOUT.iter().map(|p| (p.house, self.resolve(p)))
    }

    fn resolve(&self, position: &HousePosition) -> PixelPoint {
        PixelPoint {
            x: position.x.of(self.width),
            y: position.y.of(self.height),
        }
    }
}
