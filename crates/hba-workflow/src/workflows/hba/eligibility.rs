use serde::{Deserialize, Serialize};

/// Reference salary used when an application carries no figures of its own.
pub const REFERENCE_BASIC_PAY: u64 = 85_000;
pub const REFERENCE_DEARNESS_ALLOWANCE: u64 = 42_500;

/// The entitlement formula: one hundred months of salary, capped.
pub const SALARY_MULTIPLIER: u64 = 100;
pub const ENTITLEMENT_CEILING: u64 = 6_500_000;

/// Monthly salary components the entitlement formula draws on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryBasis {
    pub basic_pay: u64,
    pub dearness_allowance: u64,
}

impl SalaryBasis {
    /// Advance entitlement: the lower of one hundred months of (basic + DA)
    /// and the program ceiling. Salary figures come straight off the wire,
    /// so an overflowing product clamps to the ceiling it already exceeds.
    pub fn entitlement(&self) -> u64 {
        self.basic_pay
            .checked_add(self.dearness_allowance)
            .and_then(|monthly| monthly.checked_mul(SALARY_MULTIPLIER))
            .unwrap_or(ENTITLEMENT_CEILING)
            .min(ENTITLEMENT_CEILING)
    }

    /// Places a requested amount into the advisory bands shown at intake.
    /// Anything above ninety percent of the limit is worth a warning.
    pub fn assess(&self, requested: u64) -> EligibilityAssessment {
        let limit = self.entitlement();
        if requested > limit {
            EligibilityAssessment::Exceeds {
                limit,
                excess: requested - limit,
            }
        } else if requested * 10 > limit * 9 {
            EligibilityAssessment::NearCeiling { limit }
        } else {
            EligibilityAssessment::WithinLimit { limit }
        }
    }
}

impl Default for SalaryBasis {
    fn default() -> Self {
        Self {
            basic_pay: REFERENCE_BASIC_PAY,
            dearness_allowance: REFERENCE_DEARNESS_ALLOWANCE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "band")]
pub enum EligibilityAssessment {
    WithinLimit { limit: u64 },
    NearCeiling { limit: u64 },
    Exceeds { limit: u64, excess: u64 },
}

impl EligibilityAssessment {
    pub const fn label(self) -> &'static str {
        match self {
            Self::WithinLimit { .. } => "Within Limit",
            Self::NearCeiling { .. } => "Near Ceiling",
            Self::Exceeds { .. } => "Exceeds Limit",
        }
    }

    pub const fn limit(self) -> u64 {
        match self {
            Self::WithinLimit { limit }
            | Self::NearCeiling { limit }
            | Self::Exceeds { limit, .. } => limit,
        }
    }

    pub const fn is_exceeded(self) -> bool {
        matches!(self, Self::Exceeds { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_salary_hits_the_ceiling() {
        let basis = SalaryBasis::default();
        // (85,000 + 42,500) * 100 is well past the cap.
        assert_eq!(basis.entitlement(), ENTITLEMENT_CEILING);
    }

    #[test]
    fn lower_salaries_use_the_formula_value() {
        let basis = SalaryBasis {
            basic_pay: 20_000,
            dearness_allowance: 10_000,
        };
        assert_eq!(basis.entitlement(), 3_000_000);
    }

    #[test]
    fn assessment_bands_split_at_ninety_percent_and_the_limit() {
        let basis = SalaryBasis::default();

        match basis.assess(4_500_000) {
            EligibilityAssessment::WithinLimit { limit } => {
                assert_eq!(limit, ENTITLEMENT_CEILING);
            }
            other => panic!("expected WithinLimit, got {other:?}"),
        }

        match basis.assess(6_000_000) {
            EligibilityAssessment::NearCeiling { limit } => {
                assert_eq!(limit, ENTITLEMENT_CEILING);
            }
            other => panic!("expected NearCeiling, got {other:?}"),
        }

        match basis.assess(7_000_000) {
            EligibilityAssessment::Exceeds { limit, excess } => {
                assert_eq!(limit, ENTITLEMENT_CEILING);
                assert_eq!(excess, 500_000);
            }
            other => panic!("expected Exceeds, got {other:?}"),
        }
    }

    #[test]
    fn extreme_salary_figures_clamp_to_the_ceiling() {
        let overflowing_product = SalaryBasis {
            basic_pay: u64::MAX / 2,
            dearness_allowance: 1,
        };
        assert_eq!(overflowing_product.entitlement(), ENTITLEMENT_CEILING);
        assert!(matches!(
            overflowing_product.assess(1),
            EligibilityAssessment::WithinLimit {
                limit: ENTITLEMENT_CEILING
            }
        ));

        let overflowing_sum = SalaryBasis {
            basic_pay: u64::MAX,
            dearness_allowance: u64::MAX,
        };
        assert_eq!(overflowing_sum.entitlement(), ENTITLEMENT_CEILING);
    }

    #[test]
    fn band_boundaries_are_exact() {
        let basis = SalaryBasis::default();
        // Exactly ninety percent stays within the limit band.
        assert!(matches!(
            basis.assess(5_850_000),
            EligibilityAssessment::WithinLimit { .. }
        ));
        // The full limit itself is allowed, merely close.
        assert!(matches!(
            basis.assess(ENTITLEMENT_CEILING),
            EligibilityAssessment::NearCeiling { .. }
        ));
        assert!(basis.assess(ENTITLEMENT_CEILING + 1).is_exceeded());
    }
}
