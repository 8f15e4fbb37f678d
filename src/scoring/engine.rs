use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use super::config::{ScoringConfig, SpiWeights};
use super::input::{DueDiligenceDepth, RegionCategory, ScoringInput, Timeline};

/// The seven factors of the Success Probability Index, in breakdown order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpiFactor {
    EconomicReadiness,
    Symbiosis,
    Cultural,
    PartnerReliability,
    Activation,
    Ethical,
    Transparency,
}

impl SpiFactor {
    pub const ALL: [SpiFactor; 7] = [
        SpiFactor::EconomicReadiness,
        SpiFactor::Symbiosis,
        SpiFactor::Cultural,
        SpiFactor::PartnerReliability,
        SpiFactor::Activation,
        SpiFactor::Ethical,
        SpiFactor::Transparency,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SpiFactor::EconomicReadiness => "Economic Readiness",
            SpiFactor::Symbiosis => "Symbiosis Potential",
            SpiFactor::Cultural => "Cultural Compatibility",
            SpiFactor::PartnerReliability => "Partner Reliability",
            SpiFactor::Activation => "Activation Velocity",
            SpiFactor::Ethical => "Ethical Alignment",
            SpiFactor::Transparency => "User Transparency",
        }
    }

    pub fn weight(self, weights: &SpiWeights) -> f64 {
        match self {
            SpiFactor::EconomicReadiness => weights.economic_readiness,
            SpiFactor::Symbiosis => weights.symbiosis,
            SpiFactor::Cultural => weights.cultural,
            SpiFactor::PartnerReliability => weights.partner_reliability,
            SpiFactor::Activation => weights.activation,
            SpiFactor::Ethical => weights.ethical,
            SpiFactor::Transparency => weights.transparency,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreBreakdownEntry {
    pub label: String,
    pub value: f64, // Clamped to [0, 100]
    pub weight: f64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub adjustments: Vec<String>, // e.g. "+25 developed market", "-10 immediate timeline"
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreResult {
    pub composite_score: f64,
    pub confidence_low: f64,
    pub confidence_high: f64,
    pub breakdown: Vec<ScoreBreakdownEntry>,
    pub positive_drivers: Vec<String>,
    pub negative_drivers: Vec<String>,
    pub generated_at: DateTime<Utc>,
}

impl ScoreResult {
    /// Value of a single factor from the breakdown.
    pub fn factor(&self, factor: SpiFactor) -> Option<f64> {
        self.breakdown
            .iter()
            .find(|entry| entry.label == factor.label())
            .map(|entry| entry.value)
    }

    /// Confidence band clipped to the valid score range, for display.
    /// The stored band itself is never clamped.
    pub fn clamped_interval(&self) -> (f64, f64) {
        (
            self.confidence_low.clamp(0.0, 100.0),
            self.confidence_high.clamp(0.0, 100.0),
        )
    }

    pub fn margin(&self) -> f64 {
        (self.confidence_high - self.confidence_low) / 2.0
    }
}

const POSITIVE_DRIVER_MIN: f64 = 75.0;
const NEGATIVE_DRIVER_BELOW: f64 = 60.0;

/// Running value of one factor: a baseline plus a trail of fixed adjustments.
struct FactorScore {
    value: f64,
    adjustments: Vec<String>,
}

impl FactorScore {
    fn baseline(value: f64) -> Self {
        Self {
            value,
            adjustments: Vec::new(),
        }
    }

    fn adjust(&mut self, delta: f64, reason: &str) {
        self.value += delta;
        self.adjustments.push(format!("{:+} {}", delta, reason));
    }

    fn into_entry(self, factor: SpiFactor, weights: &SpiWeights) -> ScoreBreakdownEntry {
        ScoreBreakdownEntry {
            label: factor.label().to_string(),
            value: self.value.clamp(0.0, 100.0),
            weight: factor.weight(weights),
            adjustments: self.adjustments,
        }
    }
}

/// Compute the Success Probability Index for an engagement.
pub fn compute_score(input: &ScoringInput, config: &ScoringConfig) -> ScoreResult {
    compute_score_at(input, config, Utc::now())
}

/// Same as [`compute_score`] with an explicit timestamp, so results are reproducible.
pub fn compute_score_at(
    input: &ScoringInput,
    config: &ScoringConfig,
    generated_at: DateTime<Utc>,
) -> ScoreResult {
    let breakdown: Vec<ScoreBreakdownEntry> = SpiFactor::ALL
        .iter()
        .map(|&factor| score_factor(factor, input).into_entry(factor, &config.spi))
        .collect();

    let composite_score: f64 = breakdown.iter().map(|e| e.value * e.weight).sum();

    let transparency = breakdown
        .iter()
        .find(|e| e.label == SpiFactor::Transparency.label())
        .map(|e| e.value)
        .unwrap_or(0.0);
    let margin = 15.0 - (transparency / 100.0 * 10.0);

    let (positive_drivers, negative_drivers) = derive_drivers(&breakdown);

    debug!(
        composite = composite_score,
        margin, "computed success probability index"
    );

    ScoreResult {
        composite_score,
        confidence_low: composite_score - margin,
        confidence_high: composite_score + margin,
        breakdown,
        positive_drivers,
        negative_drivers,
        generated_at,
    }
}

fn score_factor(factor: SpiFactor, input: &ScoringInput) -> FactorScore {
    match factor {
        SpiFactor::EconomicReadiness => {
            let mut score = FactorScore::baseline(60.0);
            match input.region.category {
                RegionCategory::Developed => score.adjust(25.0, "developed market"),
                RegionCategory::Emerging => score.adjust(15.0, "emerging growth market"),
                RegionCategory::Other => {}
            }
            if !input.industries.is_empty() {
                score.adjust(5.0, "industry specified");
            }
            score
        }
        SpiFactor::Symbiosis => {
            let mut score = FactorScore::baseline(50.0);
            if input.problem_statement.chars().count() > 50 {
                score.adjust(15.0, "detailed problem statement");
            }
            if input.intents.len() > 1 {
                score.adjust(15.0, "multiple strategic intents");
            }
            if input.partner_profile.chars().count() > 10 {
                score.adjust(10.0, "partner profile described");
            }
            score
        }
        SpiFactor::Cultural => {
            let mut score = FactorScore::baseline(60.0);
            let home_matches = input
                .home_region
                .as_deref()
                .is_some_and(|home| input.region.matches_name(home));
            if home_matches {
                score.adjust(30.0, "home region matches target");
            } else {
                score.adjust(10.0, "cross-border engagement");
            }
            score
        }
        SpiFactor::PartnerReliability => {
            let mut score = FactorScore::baseline(65.0);
            match input.due_diligence {
                DueDiligenceDepth::DeepForensic => score.adjust(20.0, "deep forensic diligence"),
                DueDiligenceDepth::Standard => score.adjust(10.0, "standard diligence"),
                DueDiligenceDepth::Basic => {}
            }
            score
        }
        SpiFactor::Activation => {
            let mut score = FactorScore::baseline(60.0);
            match input.timeline {
                Timeline::LongTerm => score.adjust(20.0, "long-term timeline"),
                Timeline::MediumTerm => score.adjust(10.0, "medium-term timeline"),
                Timeline::Immediate if !input.skill_level.is_high_skill() => {
                    score.adjust(-10.0, "immediate timeline without senior operator")
                }
                _ => {}
            }
            score
        }
        SpiFactor::Ethical => {
            let mut score = FactorScore::baseline(85.0);
            if input.industries.iter().any(|i| i.is_high_risk()) {
                score.adjust(-15.0, "high-risk sector");
            }
            if input.region.jurisdiction_risk {
                score.adjust(-5.0, "elevated jurisdiction risk");
            }
            score
        }
        SpiFactor::Transparency => {
            let mut score = FactorScore::baseline(60.0);
            if input.uploaded_document {
                score.adjust(30.0, "supporting document uploaded");
            }
            if input.has_website {
                score.adjust(10.0, "website provided");
            }
            score
        }
    }
}

fn derive_drivers(breakdown: &[ScoreBreakdownEntry]) -> (Vec<String>, Vec<String>) {
    let describe = |e: &ScoreBreakdownEntry| format!("{} ({:.0})", e.label, e.value);

    let mut strong: Vec<&ScoreBreakdownEntry> = breakdown
        .iter()
        .filter(|e| e.value >= POSITIVE_DRIVER_MIN)
        .collect();
    // Stable sorts keep factor order on ties
    strong.sort_by(|a, b| b.value.total_cmp(&a.value));

    let mut weak: Vec<&ScoreBreakdownEntry> = breakdown
        .iter()
        .filter(|e| e.value < NEGATIVE_DRIVER_BELOW)
        .collect();
    weak.sort_by(|a, b| a.value.total_cmp(&b.value));

    let mut positive: Vec<String> = strong.into_iter().map(describe).collect();
    let negative: Vec<String> = weak.into_iter().map(describe).collect();

    if positive.is_empty() && negative.is_empty() {
        positive.push("Balanced profile".to_string());
    }

    (positive, negative)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::input::{Industry, SkillLevel, TargetRegion};

    fn scenario_input() -> ScoringInput {
        ScoringInput {
            region: TargetRegion::classify("North America (developed)"),
            industries: vec![Industry::classify("Technology")],
            problem_statement: "x".repeat(80),
            intents: vec!["market entry".to_string()],
            uploaded_document: false,
            timeline: Timeline::Immediate,
            skill_level: SkillLevel::Novice,
            due_diligence: DueDiligenceDepth::Standard,
            ..Default::default()
        }
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_developed_market_immediate_novice() {
        let result = compute_score(&scenario_input(), &ScoringConfig::default());

        assert_eq!(result.factor(SpiFactor::EconomicReadiness), Some(90.0));
        assert_eq!(result.factor(SpiFactor::Symbiosis), Some(65.0));
        assert_eq!(result.factor(SpiFactor::Cultural), Some(70.0));
        assert_eq!(result.factor(SpiFactor::PartnerReliability), Some(75.0));
        assert_eq!(result.factor(SpiFactor::Activation), Some(50.0));
        assert_eq!(result.factor(SpiFactor::Ethical), Some(85.0));
        assert_eq!(result.factor(SpiFactor::Transparency), Some(60.0));

        // 22.5 + 13 + 10.5 + 11.25 + 5 + 8.5 + 3
        assert!(approx(result.composite_score, 73.75));
        assert!(approx(result.margin(), 9.0));
        assert!(approx(result.confidence_low, 64.75));
        assert!(approx(result.confidence_high, 82.75));
    }

    #[test]
    fn test_immediate_timeline_with_senior_operator() {
        let mut input = scenario_input();
        input.skill_level = SkillLevel::Executive;
        let result = compute_score(&input, &ScoringConfig::default());
        assert_eq!(result.factor(SpiFactor::Activation), Some(60.0));
    }

    #[test]
    fn test_empty_input_gets_baselines() {
        let result = compute_score(&ScoringInput::default(), &ScoringConfig::default());
        assert_eq!(result.factor(SpiFactor::EconomicReadiness), Some(60.0));
        assert_eq!(result.factor(SpiFactor::Symbiosis), Some(50.0));
        assert_eq!(result.factor(SpiFactor::Cultural), Some(70.0));
        assert_eq!(result.factor(SpiFactor::PartnerReliability), Some(65.0));
        assert_eq!(result.factor(SpiFactor::Activation), Some(60.0));
        assert_eq!(result.factor(SpiFactor::Ethical), Some(85.0));
        assert_eq!(result.factor(SpiFactor::Transparency), Some(60.0));
    }

    #[test]
    fn test_emerging_tag_scores_as_emerging_market() {
        for region in ["Emerging Europe", "Western Africa"] {
            let input = ScoringInput {
                region: TargetRegion::classify(region),
                ..Default::default()
            };
            let result = compute_score(&input, &ScoringConfig::default());
            assert_eq!(result.factor(SpiFactor::EconomicReadiness), Some(75.0), "{region}");
        }
    }

    #[test]
    fn test_home_region_match() {
        let mut input = scenario_input();
        input.home_region = Some("north america (developed)".to_string());
        let result = compute_score(&input, &ScoringConfig::default());
        assert_eq!(result.factor(SpiFactor::Cultural), Some(90.0));
    }

    #[test]
    fn test_ethical_alignment_penalties_stack() {
        let input = ScoringInput {
            region: TargetRegion::classify("Latin America"),
            industries: vec![Industry::Defense, Industry::MiningMetals],
            ..Default::default()
        };
        let result = compute_score(&input, &ScoringConfig::default());
        // One sector penalty regardless of how many high-risk sectors
        assert_eq!(result.factor(SpiFactor::Ethical), Some(65.0));
    }

    #[test]
    fn test_maximum_transparency_clamps_to_hundred() {
        let input = ScoringInput {
            uploaded_document: true,
            has_website: true,
            ..Default::default()
        };
        let result = compute_score(&input, &ScoringConfig::default());
        assert_eq!(result.factor(SpiFactor::Transparency), Some(100.0));
        assert!(approx(result.margin(), 5.0));
    }

    #[test]
    fn test_composite_is_weighted_sum_of_breakdown() {
        let inputs = [
            ScoringInput::default(),
            scenario_input(),
            ScoringInput {
                region: TargetRegion::classify("Sub-Saharan Africa"),
                home_region: Some("Sub-Saharan Africa".to_string()),
                industries: vec![Industry::OilGas],
                problem_statement: "y".repeat(120),
                intents: vec!["a".to_string(), "b".to_string()],
                partner_profile: "Regional logistics cooperative".to_string(),
                due_diligence: DueDiligenceDepth::DeepForensic,
                timeline: Timeline::LongTerm,
                uploaded_document: true,
                has_website: true,
                ..Default::default()
            },
        ];

        for input in &inputs {
            let result = compute_score(input, &ScoringConfig::default());
            let weighted: f64 = result.breakdown.iter().map(|e| e.value * e.weight).sum();
            let weight_sum: f64 = result.breakdown.iter().map(|e| e.weight).sum();

            assert!(approx(result.composite_score, weighted));
            assert!(approx(weight_sum, 1.0));
            assert_eq!(result.breakdown.len(), 7);
            for entry in &result.breakdown {
                assert!((0.0..=100.0).contains(&entry.value));
            }
        }
    }

    #[test]
    fn test_transparency_narrows_confidence_band() {
        let config = ScoringConfig::default();
        let opaque = compute_score(&ScoringInput::default(), &config);
        let with_site = compute_score(
            &ScoringInput {
                has_website: true,
                ..Default::default()
            },
            &config,
        );
        let with_document = compute_score(
            &ScoringInput {
                has_website: true,
                uploaded_document: true,
                ..Default::default()
            },
            &config,
        );

        let width = |r: &ScoreResult| r.confidence_high - r.confidence_low;
        assert!(width(&with_site) <= width(&opaque));
        assert!(width(&with_document) <= width(&with_site));
    }

    #[test]
    fn test_drivers_follow_breakdown() {
        let result = compute_score(&scenario_input(), &ScoringConfig::default());
        assert_eq!(
            result.positive_drivers,
            vec![
                "Economic Readiness (90)".to_string(),
                "Ethical Alignment (85)".to_string(),
                "Partner Reliability (75)".to_string(),
            ]
        );
        assert_eq!(result.negative_drivers, vec!["Activation Velocity (50)".to_string()]);
    }

    #[test]
    fn test_drivers_fallback_when_nothing_stands_out() {
        let breakdown = vec![ScoreBreakdownEntry {
            label: "Economic Readiness".to_string(),
            value: 65.0,
            weight: 1.0,
            adjustments: vec![],
        }];
        let (positive, negative) = derive_drivers(&breakdown);
        assert_eq!(positive, vec!["Balanced profile".to_string()]);
        assert!(negative.is_empty());
    }

    #[test]
    fn test_confidence_band_not_clamped() {
        let config = ScoringConfig {
            spi: SpiWeights {
                economic_readiness: 0.0,
                symbiosis: 0.0,
                cultural: 0.0,
                partner_reliability: 0.0,
                activation: 0.0,
                ethical: 1.0,
                transparency: 0.0,
            },
            ..Default::default()
        };
        let input = ScoringInput {
            uploaded_document: true,
            ..Default::default()
        };
        let result = compute_score(&input, &config);
        // Ethical 85, transparency 90 -> margin 6
        assert!(approx(result.confidence_low, 79.0));
        assert!(approx(result.confidence_high, 91.0));
        let (low, high) = result.clamped_interval();
        assert!(approx(low, 79.0) && approx(high, 91.0));

        let mut wide = result.clone();
        wide.confidence_high = 104.0;
        assert_eq!(wide.clamped_interval().1, 100.0);
    }

    #[test]
    fn test_generated_at_is_explicit() {
        let at = Utc::now();
        let a = compute_score_at(&scenario_input(), &ScoringConfig::default(), at);
        let b = compute_score_at(&scenario_input(), &ScoringConfig::default(), at);
        assert_eq!(a, b);
    }
}
