//! Assembly of the final [`AnalysisResult`].

use crate::domain::{AnalysisResult, CHART_TYPE, HouseCell, placements};
use crate::pipeline::stages::ValidationOutcome;

/// Turns validated house cells into an [`AnalysisResult`].
///
/// A chart with any error is `Invalid` and carries all twelve cells so the
/// caller can see what OCR produced. Otherwise it is `Valid` with one
/// placement per detected planet.
pub fn assemble(cells: &[HouseCell], outcome: ValidationOutcome) -> AnalysisResult {
    match outcome.ascendant() {
        Some((ascendant_sign, ascendant_source)) if outcome.errors.is_empty() => {
            AnalysisResult::Valid {
                chart_type: CHART_TYPE,
                ascendant_sign,
                ascendant_source,
                placements: placements(cells),
                warnings: outcome.warnings,
            }
        }
        _ => AnalysisResult::Invalid {
            errors: outcome.errors,
            raw_house_data: cells.to_vec(),
        },
    }
}

/// Result for an image that could not be decoded. The message lists the
/// whole error chain.
pub fn decode_error(error: &(dyn std::error::Error + 'static)) -> AnalysisResult {
    let mut message = format!("Could not read image: {}", error);
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    AnalysisResult::DecodeError { message }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        ASCENDANT_MISSING, AscendantSource, HouseTopology, NO_PLANETS, Planet, Sign,
    };
    use crate::core::ChartError;
    use crate::pipeline::stages::ValidatorState;

    fn cells() -> [HouseCell; 12] {
        HouseCell::for_topology(&HouseTopology::new(800, 800))
    }

    #[test]
    fn test_valid_lists_placements_in_house_order() {
        let mut cells = cells();
        cells[0].sign = Sign::new(4);
        cells[0].planets.insert(Planet::Sun);
        cells[6].sign = Sign::new(10);
        cells[6].planets.extend([Planet::Moon, Planet::Mars]);

        let outcome = ValidationOutcome {
            state: ValidatorState::Resolved {
                sign: Sign::new(4).unwrap(),
                source: AscendantSource::Read,
            },
            errors: vec![],
            warnings: vec![],
        };
        match assemble(&cells, outcome) {
            AnalysisResult::Valid {
                chart_type,
                ascendant_sign,
                placements,
                ..
            } => {
                assert_eq!(chart_type, CHART_TYPE);
                assert_eq!(ascendant_sign.number(), 4);
                let got: Vec<(Planet, u8, Option<u8>)> = placements
                    .iter()
                    .map(|p| (p.planet, p.house, p.sign.map(Sign::number)))
                    .collect();
                assert_eq!(
                    got,
                    vec![
                        (Planet::Sun, 1, Some(4)),
                        (Planet::Moon, 7, Some(10)),
                        (Planet::Mars, 7, Some(10)),
                    ]
                );
            }
            other => panic!("expected valid, got {:?}", other),
        }
    }

    #[test]
    fn test_failed_ascendant_is_invalid_with_raw_cells() {
        let outcome = ValidationOutcome {
            state: ValidatorState::Failed,
            errors: vec![ASCENDANT_MISSING.to_string()],
            warnings: vec![NO_PLANETS.to_string()],
        };
        let result = assemble(&cells(), outcome);
        assert!(!result.is_valid());
        match result {
            AnalysisResult::Invalid {
                errors,
                raw_house_data,
            } => {
                assert_eq!(errors, vec![ASCENDANT_MISSING.to_string()]);
                assert_eq!(raw_house_data.len(), 12);
            }
            other => panic!("expected invalid, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_error_message_lists_causes() {
        let err = ChartError::decode("grayscale conversion", "image has no pixels (0x0)");
        assert_eq!(
            decode_error(&err).errors(),
            vec![
                "Could not read image: decode failed: grayscale conversion: image has no pixels (0x0)"
                    .to_string()
            ]
        );
    }
}
