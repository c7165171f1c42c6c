//! Классификация индекса по уровням риска

use crate::types::RiskLevel;

pub const MEDIUM_RISK_THRESHOLD: f64 = 30.0;
pub const HIGH_RISK_THRESHOLD: f64 = 60.0;

/// low < 30 <= medium < 60 <= high
pub fn classify(premise_index: f64) -> RiskLevel {
    if premise_index < MEDIUM_RISK_THRESHOLD {
        RiskLevel::Low
    } else if premise_index < HIGH_RISK_THRESHOLD {
        RiskLevel::Medium
    } else {
        RiskLevel::High
    }
}
