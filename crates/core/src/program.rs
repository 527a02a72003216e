//! Training-program requests as received from callers.

use serde::{Deserialize, Serialize};

use crate::capability::{DetailRequest, StructureRequest, TableFormat};
use crate::error::Error;

/// Shortest and longest program the product offers, in weeks.
pub const MIN_DURATION_WEEKS: u32 = 8;
pub const MAX_DURATION_WEEKS: u32 = 16;

/// Everything needed to generate a multi-week program.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramRequest {
    pub disciplines: Vec<String>,
    /// Program length in weeks
    pub duration: u32,
    pub level: String,
    pub goals: String,
    #[serde(default)]
    pub constraints: String,
    #[serde(default)]
    pub equipment: String,
    /// Sessions per week
    pub frequency: u32,
    /// Minutes per session
    pub time_per_session: u32,
    #[serde(default)]
    pub format: TableFormat,
}

impl ProgramRequest {
    /// Caller-boundary checks. The orchestrator itself does not re-validate.
    pub fn validate(&self) -> Result<(), Error> {
        if self.disciplines.iter().all(|d| d.trim().is_empty()) {
            return Err(Error::Validation(
                "at least one discipline must be selected".into(),
            ));
        }
        if !(MIN_DURATION_WEEKS..=MAX_DURATION_WEEKS).contains(&self.duration) {
            return Err(Error::Validation(format!(
                "duration must be between {MIN_DURATION_WEEKS} and {MAX_DURATION_WEEKS} weeks, got {}",
                self.duration
            )));
        }
        if self.frequency == 0 {
            return Err(Error::Validation("frequency must be at least 1 session per week".into()));
        }
        if self.time_per_session == 0 {
            return Err(Error::Validation("time per session must be at least 1 minute".into()));
        }
        Ok(())
    }

    pub fn structure_request(&self) -> StructureRequest {
        StructureRequest {
            disciplines: self.disciplines.clone(),
            duration_weeks: self.duration,
            level: self.level.clone(),
            goals: self.goals.clone(),
        }
    }

    /// The detail-stage input, built around the structure stage's output.
    pub fn detail_request(&self, structure: String) -> DetailRequest {
        DetailRequest {
            structure,
            constraints: self.constraints.clone(),
            equipment: self.equipment.clone(),
            frequency: self.frequency,
            time_per_session: self.time_per_session,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn beginner_runner() -> ProgramRequest {
        ProgramRequest {
            disciplines: vec!["running".into()],
            duration: 8,
            level: "beginner".into(),
            goals: "endurance".into(),
            constraints: String::new(),
            equipment: String::new(),
            frequency: 3,
            time_per_session: 45,
            format: TableFormat::Markdown,
        }
    }

    #[test]
    fn valid_request_passes() {
        assert!(beginner_runner().validate().is_ok());
    }

    #[test]
    fn empty_disciplines_rejected() {
        let req = ProgramRequest {
            disciplines: vec![],
            ..beginner_runner()
        };
        assert!(matches!(req.validate(), Err(Error::Validation(_))));

        let blank = ProgramRequest {
            disciplines: vec!["  ".into()],
            ..beginner_runner()
        };
        assert!(blank.validate().is_err());
    }

    #[test]
    fn duration_bounds_are_inclusive() {
        for weeks in [8, 12, 16] {
            let req = ProgramRequest {
                duration: weeks,
                ..beginner_runner()
            };
            assert!(req.validate().is_ok(), "{weeks} weeks should be accepted");
        }
        for weeks in [0, 7, 17] {
            let req = ProgramRequest {
                duration: weeks,
                ..beginner_runner()
            };
            let err = req.validate().unwrap_err();
            assert!(err.to_string().contains("between 8 and 16"));
        }
    }

    #[test]
    fn zero_frequency_rejected() {
        let req = ProgramRequest {
            frequency: 0,
            ..beginner_runner()
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn stage_requests_carry_fields() {
        let req = ProgramRequest {
            equipment: "haltères".into(),
            ..beginner_runner()
        };
        let structure = req.structure_request();
        assert_eq!(structure.duration_weeks, 8);
        assert_eq!(structure.disciplines, vec!["running".to_string()]);

        let detail = req.detail_request("Phase 1: base".into());
        assert_eq!(detail.structure, "Phase 1: base");
        assert_eq!(detail.equipment, "haltères");
        assert_eq!(detail.time_per_session, 45);
    }
}
