use serde::Serialize;
use tracing::debug;

use super::config::ScoringConfig;
use super::input::ScoringInput;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EthicalCheckResult {
    pub passed: bool,
    pub flags: Vec<String>, // In rule-evaluation order
    pub risk_score: f64,
    pub mitigation_required: bool,
}

/// Run the ethical safeguard rules against an engagement.
///
/// Rules are additive and independent: sector, then jurisdiction, then
/// verification. The risk score is capped at 100.
pub fn check_ethical_safeguards(input: &ScoringInput, config: &ScoringConfig) -> EthicalCheckResult {
    let rules = &config.ethics;
    let mut risk_score = rules.base_risk;
    let mut flags = Vec::new();

    let high_impact: Vec<&str> = input
        .industries
        .iter()
        .filter(|i| i.is_high_impact())
        .map(|i| i.label())
        .collect();
    if !high_impact.is_empty() {
        flags.push(format!(
            "High-Impact Sector: {} requires enhanced environmental and human-rights review",
            high_impact.join(", ")
        ));
        risk_score += rules.high_impact_sector_penalty;
    }

    if input.region.jurisdiction_risk {
        flags.push(format!(
            "Jurisdiction Flag: {} carries elevated regulatory and anti-corruption exposure",
            input.region.name
        ));
        risk_score += rules.jurisdiction_penalty;
    }

    if !input.uploaded_document {
        flags.push(
            "Verification Gap: no supporting documentation uploaded; claims are unverified"
                .to_string(),
        );
        risk_score += rules.verification_gap_penalty;
    }

    let risk_score = risk_score.min(100.0);

    debug!(risk_score, flags = flags.len(), "evaluated ethical safeguards");

    EthicalCheckResult {
        passed: risk_score < rules.pass_below,
        flags,
        risk_score,
        mitigation_required: risk_score > rules.mitigation_above,
    }
}
