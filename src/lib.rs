//! Deterministic engagement scoring and report-markup parsing.
//!
//! The scoring side turns an engagement description into a Success
//! Probability Index, rates candidate partners, and runs rule-based ethical
//! safeguards. The markup side extracts titled sections from the namespaced
//! pseudo-XML that report generators emit, tolerating partial input.

pub mod config;
pub mod markup;
pub mod output;
pub mod scoring;
pub mod telemetry;
