//! Validate stage: ascendant resolution and chart-level checks.

use std::time::Instant;

use tracing::{info, warn};

use super::types::{StageMetrics, StageResult};
use crate::core::{ChartError, ChartResult, PipelineStage};
use crate::domain::{ASCENDANT_MISSING, AscendantSource, HouseCell, NO_PLANETS, Sign};

/// Progress of ascendant resolution.
///
/// ```text
/// AwaitingAscendant --house 1 has a sign------------> Resolved(Read)
/// AwaitingAscendant --house 1 empty--> Deducing --hit-> Resolved(Deduced)
///                                         \--no sign anywhere--> Failed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidatorState {
    AwaitingAscendant,
    Deducing,
    Resolved {
        sign: Sign,
        source: AscendantSource,
    },
    Failed,
}

impl ValidatorState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Resolved { .. } | Self::Failed)
    }
}

/// What the validator concluded.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationOutcome {
    pub state: ValidatorState,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationOutcome {
    pub fn ascendant(&self) -> Option<(Sign, AscendantSource)> {
        match self.state {
            ValidatorState::Resolved { sign, source } => Some((sign, source)),
            _ => None,
        }
    }
}

/// Resolves the ascendant of twelve filled house cells.
///
/// Only house 1 is ever written, and only when OCR left it empty. The
/// deduced sign comes from the first house, in house order, that has a sign.
#[derive(Debug)]
pub struct ChartValidator {
    state: ValidatorState,
}

impl Default for ChartValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl ChartValidator {
    pub fn new() -> Self {
        Self {
            state: ValidatorState::AwaitingAscendant,
        }
    }

    pub fn state(&self) -> ValidatorState {
        self.state
    }

    /// Advances the state machine by one transition.
    pub fn step(&mut self, cells: &mut [HouseCell]) -> ChartResult<ValidatorState> {
        self.state = match self.state {
            ValidatorState::AwaitingAscendant => {
                let first = cells.first().ok_or_else(|| {
                    ChartError::validate("ascendant", "house cells are empty")
                })?;
                if first.house_number() != 1 {
                    return Err(ChartError::validate(
                        "ascendant",
                        format!("first cell is house {}, expected 1", first.house_number()),
                    ));
                }
                match first.sign {
                    Some(sign) => ValidatorState::Resolved {
                        sign,
                        source: AscendantSource::Read,
                    },
                    None => ValidatorState::Deducing,
                }
            }
            ValidatorState::Deducing => match deduce_ascendant(cells) {
                Some((from_house, sign)) => {
                    info!(
                        "house 1 sign missing, deduced {} from house {}",
                        sign, from_house
                    );
                    if let Some(first) = cells.first_mut() {
                        first.sign = Some(sign);
                    }
                    ValidatorState::Resolved {
                        sign,
                        source: AscendantSource::Deduced { from_house },
                    }
                }
                None => ValidatorState::Failed,
            },
            terminal => terminal,
        };
        Ok(self.state)
    }

    /// Runs the state machine to completion and collects errors and warnings.
    pub fn run(mut self, cells: &mut [HouseCell]) -> ChartResult<ValidationOutcome> {
        while !self.state.is_terminal() {
            self.step(cells)?;
        }

        let mut errors = Vec::new();
        let mut warnings = Vec::new();
        if self.state == ValidatorState::Failed {
            warn!("no house yielded a sign");
            errors.push(ASCENDANT_MISSING.to_string());
        }
        if cells.iter().all(|cell| cell.planets.is_empty()) {
            warnings.push(NO_PLANETS.to_string());
        }

        Ok(ValidationOutcome {
            state: self.state,
            errors,
            warnings,
        })
    }
}

/// First house in order with a sign, and the ascendant that sign implies.
pub fn deduce_ascendant(cells: &[HouseCell]) -> Option<(u8, Sign)> {
    cells.iter().find_map(|cell| {
        cell.sign
            .map(|sign| (cell.house_number(), sign.ascendant_from(cell.house_number())))
    })
}

/// Stage wrapper around [`ChartValidator`].
#[derive(Debug, Default)]
pub struct ValidationStage;

impl ValidationStage {
    pub fn new() -> Self {
        Self
    }

    pub fn process(&self, cells: &mut [HouseCell]) -> ChartResult<StageResult<ValidationOutcome>> {
        let start = Instant::now();
        let outcome = ChartValidator::new().run(cells)?;

        let resolved = usize::from(outcome.ascendant().is_some());
        let source = match outcome.ascendant() {
            Some((_, AscendantSource::Read)) => "read",
            Some((_, AscendantSource::Deduced { .. })) => "deduced",
            None => "none",
        };
        let metrics = StageMetrics::new(PipelineStage::Validate, resolved, 1 - resolved)
            .finished(start)
            .with_info("ascendant_source", source)
            .with_info("warnings", outcome.warnings.len().to_string());
        Ok(StageResult::new(outcome, metrics))
    }
}
