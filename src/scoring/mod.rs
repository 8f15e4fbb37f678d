pub mod config;
pub mod engine;
pub mod ethics;
pub mod input;
pub mod partner;
pub mod validation;

pub use config::*;
pub use engine::{compute_score, compute_score_at, ScoreBreakdownEntry, ScoreResult, SpiFactor};
pub use ethics::{check_ethical_safeguards, EthicalCheckResult};
pub use input::{
    DueDiligenceDepth, Industry, RegionCategory, ScoringInput, SkillLevel, TargetRegion, Timeline,
};
pub use partner::{
    rank_partners, rate_partner, PartnerCategory, PartnerComponents, PartnerProfile,
    PartnerScore, ProjectOutcome, ProjectRecord, Rating, RiskFactor, RiskLevel,
};
pub use validation::validate_scoring;
