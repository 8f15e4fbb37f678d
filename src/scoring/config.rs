use serde::{Deserialize, Serialize};

/// Main scoring configuration.
///
/// Holds every numeric table the engines use. All sections are optional and
/// default to the stock weights, so an empty file scores exactly like no file.
///
/// Example YAML:
/// ```yaml
/// scoring:
///   spi:
///     economic_readiness: 0.30
///     symbiosis: 0.15
///   rating:
///     green: 80
///   ethics:
///     pass_below: 60
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct ScoringConfig {
    /// Success Probability Index factor weights
    pub spi: SpiWeights,

    /// Partner rating component weights
    pub partner: PartnerWeights,

    /// Overall-score thresholds for the Green/Amber/Red rating
    pub rating: RatingThresholds,

    /// Ethical safeguard base score, penalties and gates
    pub ethics: EthicsRules,
}

/// Weights of the seven SPI factors. Must sum to 1.0.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct SpiWeights {
    pub economic_readiness: f64,
    pub symbiosis: f64,
    pub cultural: f64,
    pub partner_reliability: f64,
    pub activation: f64,
    pub ethical: f64,
    pub transparency: f64,
}

impl Default for SpiWeights {
    fn default() -> Self {
        Self {
            economic_readiness: 0.25,
            symbiosis: 0.20,
            cultural: 0.15,
            partner_reliability: 0.15,
            activation: 0.10,
            ethical: 0.10,
            transparency: 0.05,
        }
    }
}

impl SpiWeights {
    pub fn entries(&self) -> [(&'static str, f64); 7] {
        [
            ("economic_readiness", self.economic_readiness),
            ("symbiosis", self.symbiosis),
            ("cultural", self.cultural),
            ("partner_reliability", self.partner_reliability),
            ("activation", self.activation),
            ("ethical", self.ethical),
            ("transparency", self.transparency),
        ]
    }
}

/// Weights of the six partner rating components. Must sum to 1.0.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct PartnerWeights {
    pub financial_health: f64,
    pub project_delivery: f64,
    pub legal_compliance: f64,
    pub strategic_fit: f64,
    pub local_capacity: f64,
    pub reputation: f64,
}

impl Default for PartnerWeights {
    fn default() -> Self {
        Self {
            financial_health: 0.20,
            project_delivery: 0.20,
            legal_compliance: 0.15,
            strategic_fit: 0.20,
            local_capacity: 0.15,
            reputation: 0.10,
        }
    }
}

impl PartnerWeights {
    pub fn entries(&self) -> [(&'static str, f64); 6] {
        [
            ("financial_health", self.financial_health),
            ("project_delivery", self.project_delivery),
            ("legal_compliance", self.legal_compliance),
            ("strategic_fit", self.strategic_fit),
            ("local_capacity", self.local_capacity),
            ("reputation", self.reputation),
        ]
    }
}

/// Rating thresholds: `>= green` is Green, `< red` is Red, anything between is Amber.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct RatingThresholds {
    pub green: f64,
    pub red: f64,
}

impl Default for RatingThresholds {
    fn default() -> Self {
        Self {
            green: 75.0,
            red: 45.0,
        }
    }
}

/// Ethical safeguard rule table.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct EthicsRules {
    /// Risk score before any rule fires
    pub base_risk: f64,
    pub high_impact_sector_penalty: f64,
    pub jurisdiction_penalty: f64,
    pub verification_gap_penalty: f64,
    /// The check passes while the risk score stays strictly below this
    pub pass_below: f64,
    /// Mitigation is required once the risk score is strictly above this
    pub mitigation_above: f64,
}

impl Default for EthicsRules {
    fn default() -> Self {
        Self {
            base_risk: 20.0,
            high_impact_sector_penalty: 30.0,
            jurisdiction_penalty: 20.0,
            verification_gap_penalty: 10.0,
            pass_below: 70.0,
            mitigation_above: 50.0,
        }
    }
}
