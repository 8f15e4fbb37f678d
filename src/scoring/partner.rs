use serde::{Deserialize, Serialize};
use tracing::debug;

use super::config::{PartnerWeights, RatingThresholds, ScoringConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartnerCategory {
    Government,
    Ngo,
    Academic,
    Community,
    International,
    #[default]
    #[serde(other)]
    Business,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectOutcome {
    Success,
    Partial,
    #[serde(other)]
    Failure,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    High,
    Medium,
    #[default]
    #[serde(other)]
    Low,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectRecord {
    pub outcome: ProjectOutcome,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskFactor {
    pub level: RiskLevel,
    #[serde(default)]
    pub description: Option<String>,
}

/// A candidate partner organization as described by the user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartnerProfile {
    pub name: String,
    pub category: PartnerCategory,
    pub track_record: Vec<ProjectRecord>,
    /// The first entry is the primary declared risk.
    pub risk_factors: Vec<RiskFactor>,
    pub expertise: Vec<String>,
    pub contact_complete: bool,
    /// Externally supplied credibility score, 0-100
    pub credibility_score: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Rating {
    Green,
    Amber,
    Red,
}

impl Rating {
    /// `>= green` is Green, `< red` is Red, everything between is Amber.
    pub fn from_score(score: f64, thresholds: &RatingThresholds) -> Self {
        if score >= thresholds.green {
            Rating::Green
        } else if score < thresholds.red {
            Rating::Red
        } else {
            Rating::Amber
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Rating::Green => "Green",
            Rating::Amber => "Amber",
            Rating::Red => "Red",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PartnerComponents {
    pub financial_health: f64,
    pub project_delivery: f64,
    pub legal_compliance: f64,
    pub strategic_fit: f64,
    pub local_capacity: f64,
    pub reputation: f64,
}

impl PartnerComponents {
    pub fn weighted_sum(&self, weights: &PartnerWeights) -> f64 {
        self.financial_health * weights.financial_health
            + self.project_delivery * weights.project_delivery
            + self.legal_compliance * weights.legal_compliance
            + self.strategic_fit * weights.strategic_fit
            + self.local_capacity * weights.local_capacity
            + self.reputation * weights.reputation
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartnerScore {
    pub name: String,
    pub overall_score: f64,
    pub rating: Rating,
    pub components: PartnerComponents,
}

const DEFAULT_REPUTATION: f64 = 75.0;

/// Rate a partner profile. Components are clamped to [0, 100] before weighting.
pub fn rate_partner(profile: &PartnerProfile, config: &ScoringConfig) -> PartnerScore {
    let financial_health = match profile.category {
        PartnerCategory::Government => 85.0,
        PartnerCategory::Ngo => 60.0,
        _ => 70.0,
    };

    let successes = profile
        .track_record
        .iter()
        .filter(|p| p.outcome == ProjectOutcome::Success)
        .count();
    let project_delivery = 75.0 + 10.0 * successes as f64;

    let legal_compliance = match profile.risk_factors.first().map(|r| r.level) {
        Some(RiskLevel::High) => 80.0 - 30.0,
        Some(RiskLevel::Medium) => 80.0 - 15.0,
        _ => 80.0,
    };

    let strategic_fit = 70.0 + 5.0 * profile.expertise.len() as f64;
    let local_capacity = if profile.contact_complete { 85.0 } else { 75.0 };
    let reputation = profile
        .credibility_score
        .filter(|score| score.is_finite())
        .unwrap_or(DEFAULT_REPUTATION);

    let clamp = |v: f64| v.clamp(0.0, 100.0);
    let components = PartnerComponents {
        financial_health: clamp(financial_health),
        project_delivery: clamp(project_delivery),
        legal_compliance: clamp(legal_compliance),
        strategic_fit: clamp(strategic_fit),
        local_capacity: clamp(local_capacity),
        reputation: clamp(reputation),
    };

    let overall_score = components.weighted_sum(&config.partner);
    let rating = Rating::from_score(overall_score, &config.rating);

    debug!(
        partner = %profile.name,
        overall = overall_score,
        rating = rating.as_str(),
        "rated partner"
    );

    PartnerScore {
        name: profile.name.clone(),
        overall_score,
        rating,
        components,
    }
}

/// Rate every profile and order them best first; equal scores sort by name.
pub fn rank_partners(profiles: &[PartnerProfile], config: &ScoringConfig) -> Vec<PartnerScore> {
    let mut scores: Vec<PartnerScore> = profiles.iter().map(|p| rate_partner(p, config)).collect();

    scores.sort_by(|a, b| {
        b.overall_score
            .total_cmp(&a.overall_score)
            .then_with(|| a.name.cmp(&b.name))
    });

    scores
}
