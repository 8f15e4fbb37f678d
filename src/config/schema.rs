use serde::{Deserialize, Serialize};

use crate::markup::DEFAULT_NAMESPACE;
use crate::scoring::ScoringConfig;

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct Config {
    pub scoring: ScoringConfig,
    pub markup: MarkupConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct MarkupConfig {
    /// Tag namespace prefix, e.g. "nsil" for `<nsil:section>`
    pub namespace: String,
}

impl Default for MarkupConfig {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
        }
    }
}
