use serde::{Deserialize, Serialize};

/// Coarse economic classification of a target region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionCategory {
    Developed,
    Emerging,
    #[default]
    #[serde(other)]
    Other,
}

// Keywords are matched as whole words or word sequences, never substrings.
const DEVELOPED_KEYWORDS: &[&str] = &[
    "western",
    "north america",
    "europe",
    "united states",
    "canada",
    "united kingdom",
    "australia",
    "japan",
];

const EMERGING_KEYWORDS: &[&str] = &[
    "asia",
    "india",
    "china",
    "brazil",
    "middle east",
];

// Regions treated as a higher jurisdiction / corruption-risk proxy.
const JURISDICTION_RISK_KEYWORDS: &[&str] =
    &["emerging", "africa", "latin america", "south america"];

/// Lowercased alphanumeric words of `text`.
fn words(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// True if `phrase` appears in `words` as a run of whole words.
fn has_phrase(words: &[String], phrase: &str) -> bool {
    let needle: Vec<&str> = phrase.split(' ').collect();
    words
        .windows(needle.len())
        .any(|window| window.iter().zip(&needle).all(|(w, n)| w == n))
}

fn has_any(words: &[String], phrases: &[&str]) -> bool {
    phrases.iter().any(|p| has_phrase(words, p))
}

/// Target region of an engagement, classified once when the input is built.
///
/// Deserializes from a plain string (`region: "Sub-Saharan Africa"`); the
/// scoring engine only ever looks at `category` and `jurisdiction_risk`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct TargetRegion {
    pub name: String,
    pub category: RegionCategory,
    pub jurisdiction_risk: bool,
}

impl TargetRegion {
    pub fn classify(name: &str) -> Self {
        let words = words(name);
        let jurisdiction_risk = has_any(&words, JURISDICTION_RISK_KEYWORDS);

        // Explicit tags and at-risk regions win over broad geography
        let category = if jurisdiction_risk {
            RegionCategory::Emerging
        } else if has_phrase(&words, "developed") || has_any(&words, DEVELOPED_KEYWORDS) {
            RegionCategory::Developed
        } else if has_any(&words, EMERGING_KEYWORDS) {
            RegionCategory::Emerging
        } else {
            RegionCategory::Other
        };

        Self {
            name: name.trim().to_string(),
            category,
            jurisdiction_risk,
        }
    }

    /// Case-insensitive comparison against a freeform region name.
    pub fn matches_name(&self, other: &str) -> bool {
        let other = other.trim();
        !other.is_empty() && self.name.eq_ignore_ascii_case(other)
    }
}

impl From<String> for TargetRegion {
    fn from(name: String) -> Self {
        Self::classify(&name)
    }
}

impl From<TargetRegion> for String {
    fn from(region: TargetRegion) -> Self {
        region.name
    }
}

const NON_EXTRACTIVE_MINING: &[&str] = &["data", "text", "process", "crypto", "bitcoin"];

/// Industry sector, with the sectors the scoring rules single out as named variants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Industry {
    MiningMetals,
    Energy,
    OilGas,
    Defense,
    Other(String),
}

impl Industry {
    pub fn classify(name: &str) -> Self {
        let words = words(name);
        // "data mining", "text mining" and the like are not extraction
        let extraction_mining = words.iter().enumerate().any(|(i, w)| {
            w == "mining" && !(i > 0 && NON_EXTRACTIVE_MINING.contains(&words[i - 1].as_str()))
        });

        if extraction_mining || has_any(&words, &["metal", "metals", "minerals"]) {
            Industry::MiningMetals
        } else if has_any(&words, &["oil", "gas", "petroleum"]) {
            Industry::OilGas
        } else if has_any(&words, &["defense", "defence"]) {
            Industry::Defense
        } else if has_phrase(&words, "energy") {
            Industry::Energy
        } else {
            Industry::Other(name.trim().to_string())
        }
    }

    /// Sectors that lower the ethical alignment factor of the SPI.
    pub fn is_high_risk(&self) -> bool {
        matches!(
            self,
            Industry::MiningMetals | Industry::Energy | Industry::OilGas | Industry::Defense
        )
    }

    /// Sectors that raise a flag in the ethical safeguard check.
    pub fn is_high_impact(&self) -> bool {
        matches!(
            self,
            Industry::MiningMetals | Industry::OilGas | Industry::Defense
        )
    }

    pub fn label(&self) -> &str {
        match self {
            Industry::MiningMetals => "Mining & Metals",
            Industry::Energy => "Energy",
            Industry::OilGas => "Oil & Gas",
            Industry::Defense => "Defense",
            Industry::Other(name) => name,
        }
    }
}

impl From<String> for Industry {
    fn from(name: String) -> Self {
        Self::classify(&name)
    }
}

impl From<Industry> for String {
    fn from(industry: Industry) -> Self {
        industry.label().to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DueDiligenceDepth {
    #[serde(alias = "deep-forensic", alias = "deep")]
    DeepForensic,
    Standard,
    #[default]
    #[serde(other)]
    Basic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Timeline {
    Immediate,
    #[serde(alias = "short-term")]
    ShortTerm,
    #[serde(alias = "medium-term", alias = "medium")]
    MediumTerm,
    #[serde(alias = "long-term", alias = "long")]
    LongTerm,
    #[default]
    #[serde(other)]
    Unspecified,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillLevel {
    Novice,
    Intermediate,
    Experienced,
    Senior,
    Expert,
    Executive,
    Visionary,
    #[default]
    #[serde(other)]
    Unspecified,
}

impl SkillLevel {
    pub fn is_high_skill(self) -> bool {
        matches!(
            self,
            SkillLevel::Experienced
                | SkillLevel::Senior
                | SkillLevel::Expert
                | SkillLevel::Executive
                | SkillLevel::Visionary
        )
    }
}

/// Everything the SPI engine and the ethical safeguards read about an engagement.
///
/// Every field defaults; an absent field simply forfeits its bonus.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringInput {
    pub region: TargetRegion,
    pub home_region: Option<String>,
    pub industries: Vec<Industry>,
    pub organization_type: String,
    pub problem_statement: String,
    pub due_diligence: DueDiligenceDepth,
    pub timeline: Timeline,
    pub skill_level: SkillLevel,
    pub uploaded_document: bool,
    pub has_website: bool,
    pub intents: Vec<String>,
    pub partner_profile: String,
}
