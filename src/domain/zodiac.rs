//! Zodiac signs and grahas (planets) as they appear on a chart.

use std::fmt;

use serde::{Deserialize, Serialize};

const SIGN_NAMES: [&str; 12] = [
    "Aries",
    "Taurus",
    "Gemini",
    "Cancer",
    "Leo",
    "Virgo",
    "Libra",
    "Scorpio",
    "Sagittarius",
    "Capricorn",
    "Aquarius",
    "Pisces",
];

/// A zodiac sign number in `1..=12` (1 = Aries, 12 = Pisces).
///
/// The only way to obtain a `Sign` is through [`Sign::new`] or
/// [`Sign::from_house_offset`], so a stored sign is never 0 or above 12.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Sign(u8);

impl Sign {
    pub fn new(number: u8) -> Option<Self> {
        (1..=12).contains(&number).then_some(Self(number))
    }

    pub fn number(self) -> u8 {
        self.0
    }

    pub fn name(self) -> &'static str {
        SIGN_NAMES[usize::from(self.0 - 1)]
    }

    /// The ascendant implied by this sign sitting in `house`.
    ///
    /// Signs advance by one per house, so `ascendant = sign - house + 1`,
    /// wrapped into `1..=12`.
    pub fn ascendant_from(self, house: u8) -> Self {
        Self::from_house_offset(i32::from(self.0) - i32::from(house) + 1)
    }

    /// Wraps any integer into `1..=12`.
    pub fn from_house_offset(raw: i32) -> Self {
        // rem_euclid keeps the result in 0..12 for negative inputs.
        Self((raw - 1).rem_euclid(12) as u8 + 1)
    }
}

impl TryFrom<u8> for Sign {
    type Error = String;

    fn try_from(number: u8) -> Result<Self, Self::Error> {
        Sign::new(number).ok_or_else(|| format!("sign number {} outside 1..=12", number))
    }
}

impl From<Sign> for u8 {
    fn from(sign: Sign) -> Self {
        sign.0
    }
}

impl fmt::Display for Sign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.0, self.name())
    }
}

/// The nine grahas placed on a Vedic chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Planet {
    Sun,
    Moon,
    Mars,
    Mercury,
    Jupiter,
    Venus,
    Saturn,
    Rahu,
    Ketu,
}

impl Planet {
    pub const ALL: [Planet; 9] = [
        Planet::Sun,
        Planet::Moon,
        Planet::Mars,
        Planet::Mercury,
        Planet::Jupiter,
        Planet::Venus,
        Planet::Saturn,
        Planet::Rahu,
        Planet::Ketu,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Planet::Sun => "Sun",
            Planet::Moon => "Moon",
            Planet::Mars => "Mars",
            Planet::Mercury => "Mercury",
            Planet::Jupiter => "Jupiter",
            Planet::Venus => "Venus",
            Planet::Saturn => "Saturn",
            Planet::Rahu => "Rahu",
            Planet::Ketu => "Ketu",
        }
    }
}

impl fmt::Display for Planet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_range() {
        assert!(Sign::new(0).is_none());
        assert!(Sign::new(13).is_none());
        assert_eq!(Sign::new(1).unwrap().name(), "Aries");
        assert_eq!(Sign::new(12).unwrap().name(), "Pisces");
    }

    #[test]
    fn test_ascendant_from_house() {
        let sign = |n| Sign::new(n).unwrap();
        assert_eq!(sign(9).ascendant_from(5), sign(5));
        assert_eq!(sign(3).ascendant_from(10), sign(6));
        assert_eq!(sign(10).ascendant_from(4), sign(7));
        assert_eq!(sign(12).ascendant_from(12), sign(1));
        assert_eq!(sign(1).ascendant_from(12), sign(2));
    }

    #[test]
    fn test_ascendant_matches_every_house_of_a_chart() {
        for lagna in 1..=12u8 {
            for house in 1..=12u8 {
                let sign = Sign::from_house_offset(i32::from(lagna) + i32::from(house) - 1);
                assert_eq!(sign.ascendant_from(house).number(), lagna);
            }
        }
    }

    #[test]
    fn test_from_house_offset_wraps() {
        assert_eq!(Sign::from_house_offset(-6).number(), 6);
        assert_eq!(Sign::from_house_offset(0).number(), 12);
        assert_eq!(Sign::from_house_offset(13).number(), 1);
        assert_eq!(Sign::from_house_offset(25).number(), 1);
    }

    #[test]
    fn test_sign_serde() {
        let sign = Sign::new(7).unwrap();
        assert_eq!(serde_json::to_string(&sign).unwrap(), "7");
        assert_eq!(serde_json::from_str::<Sign>("7").unwrap(), sign);
        assert!(serde_json::from_str::<Sign>("13").is_err());
    }

    #[test]
    fn test_planet_names() {
        assert_eq!(Planet::ALL.len(), 9);
        assert_eq!(Planet::Mercury.to_string(), "Mercury");
        assert_eq!(serde_json::to_string(&Planet::Rahu).unwrap(), "\"Rahu\"");
    }
}
