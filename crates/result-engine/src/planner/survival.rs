use crate::error::EngineError;
use serde::{Deserialize, Serialize};

/// Combined internal + external marks needed to pass a subject.
pub const DEFAULT_PASS_TOTAL: f64 = 40.0;
/// Absolute minimum in the external exam, whatever the internal marks.
pub const MIN_EXTERNAL_FLOOR: f64 = 21.0;
/// Highest score the external exam awards.
pub const DEFAULT_EXTERNAL_MAX: f64 = 60.0;

/// Treatment of internal marks outside `[0, pass_total]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InternalMarksPolicy {
    /// Reject with `InvalidInput`.
    #[default]
    Strict,
    /// Compute anyway, as the result portal always has.
    Lenient,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurvivalRules {
    pub pass_total: f64,
    pub min_external_floor: f64,
    pub external_max: f64,
    pub internal_policy: InternalMarksPolicy,
}

impl Default for SurvivalRules {
    fn default() -> Self {
        Self {
            pass_total: DEFAULT_PASS_TOTAL,
            min_external_floor: MIN_EXTERNAL_FLOOR,
            external_max: DEFAULT_EXTERNAL_MAX,
            internal_policy: InternalMarksPolicy::Strict,
        }
    }
}

/// Answers "what do I need in the external exam to pass?".
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ExamSurvivalPlanner {
    rules: SurvivalRules,
}

impl ExamSurvivalPlanner {
    pub fn new(rules: SurvivalRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &SurvivalRules {
        &self.rules
    }

    /// `max(pass_total - internal, min_external_floor)`, or
    /// [`EngineError::Unattainable`] when that exceeds the external maximum.
    pub fn required_external(&self, internal_marks: f64) -> Result<f64, EngineError> {
        let rules = &self.rules;
        if !internal_marks.is_finite() {
            return Err(EngineError::invalid("internal_marks", "must be a finite number"));
        }
        if rules.internal_policy == InternalMarksPolicy::Strict
            && !(0.0..=rules.pass_total).contains(&internal_marks)
        {
            return Err(EngineError::invalid(
                "internal_marks",
                format!("{internal_marks} is outside 0..={}", rules.pass_total),
            ));
        }

        let required = (rules.pass_total - internal_marks).max(rules.min_external_floor);
        if required > rules.external_max {
            return Err(EngineError::Unattainable {
                required,
                maximum: rules.external_max,
            });
        }

        Ok(required)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lenient() -> ExamSurvivalPlanner {
        ExamSurvivalPlanner::new(SurvivalRules {
            internal_policy: InternalMarksPolicy::Lenient,
            ..SurvivalRules::default()
        })
    }

    #[test]
    fn weak_internals_raise_the_requirement() {
        let planner = ExamSurvivalPlanner::default();
        assert_eq!(planner.required_external(15.0), Ok(25.0));
        assert_eq!(planner.required_external(0.0), Ok(40.0));
    }

    #[test]
    fn strong_internals_hit_the_external_floor() {
        let planner = ExamSurvivalPlanner::default();
        assert_eq!(planner.required_external(30.0), Ok(21.0));
        assert_eq!(planner.required_external(40.0), Ok(21.0));
        assert_eq!(planner.required_external(19.0), Ok(21.0));
    }

    #[test]
    fn strict_policy_rejects_out_of_range_internals() {
        let planner = ExamSurvivalPlanner::default();
        for internal in [45.0, -1.0] {
            assert!(matches!(
                planner.required_external(internal),
                Err(EngineError::InvalidInput {
                    field: "internal_marks",
                    ..
                })
            ));
        }
    }

    #[test]
    fn lenient_policy_computes_out_of_range_internals() {
        assert_eq!(lenient().required_external(45.0), Ok(21.0));
        assert_eq!(
            lenient().required_external(-30.0),
            Err(EngineError::Unattainable {
                required: 70.0,
                maximum: 60.0,
            })
        );
    }

    #[test]
    fn requirement_above_external_max_is_unattainable() {
        let planner = ExamSurvivalPlanner::new(SurvivalRules {
            pass_total: 100.0,
            ..SurvivalRules::default()
        });
        assert_eq!(planner.required_external(40.0), Ok(60.0));
        assert_eq!(
            planner.required_external(39.0),
            Err(EngineError::Unattainable {
                required: 61.0,
                maximum: 60.0,
            })
        );
    }

    #[test]
    fn floor_is_not_scaled_with_external_max() {
        let planner = ExamSurvivalPlanner::new(SurvivalRules {
            external_max: 100.0,
            ..SurvivalRules::default()
        });
        assert_eq!(planner.required_external(35.0), Ok(MIN_EXTERNAL_FLOOR));
    }

    #[test]
    fn non_finite_internals_are_rejected_in_every_mode() {
        assert!(lenient().required_external(f64::NAN).is_err());
        assert!(ExamSurvivalPlanner::default()
            .required_external(f64::INFINITY)
            .is_err());
    }

    #[test]
    fn rules_deserialize_with_defaults() {
        let rules: SurvivalRules =
            serde_json::from_str(r#"{"internal_policy": "lenient"}"#).expect("rules parse");
        assert_eq!(rules.internal_policy, InternalMarksPolicy::Lenient);
        assert_eq!(rules.min_external_floor, MIN_EXTERNAL_FLOOR);
        assert_eq!(rules.pass_total, DEFAULT_PASS_TOTAL);
    }
}
