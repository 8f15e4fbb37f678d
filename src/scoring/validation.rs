use super::config::ScoringConfig;

const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

/// Validate scoring configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_scoring(config: &ScoringConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    validate_weights("scoring.spi", &config.spi.entries(), &mut errors);
    validate_weights("scoring.partner", &config.partner.entries(), &mut errors);

    // Rating thresholds
    let rating = &config.rating;
    for (name, value) in [("green", rating.green), ("red", rating.red)] {
        if !(0.0..=100.0).contains(&value) {
            errors.push(format!(
                "scoring.rating.{}: must be between 0 and 100, got {}",
                name, value
            ));
        }
    }
    if rating.red > rating.green {
        errors.push(format!(
            "scoring.rating: red threshold {} must not exceed green threshold {}",
            rating.red, rating.green
        ));
    }

    // Ethics gates
    let ethics = &config.ethics;
    for (name, value) in [
        ("base_risk", ethics.base_risk),
        ("pass_below", ethics.pass_below),
        ("mitigation_above", ethics.mitigation_above),
    ] {
        if !(0.0..=100.0).contains(&value) {
            errors.push(format!(
                "scoring.ethics.{}: must be between 0 and 100, got {}",
                name, value
            ));
        }
    }
    for (name, value) in [
        ("high_impact_sector_penalty", ethics.high_impact_sector_penalty),
        ("jurisdiction_penalty", ethics.jurisdiction_penalty),
        ("verification_gap_penalty", ethics.verification_gap_penalty),
    ] {
        if value < 0.0 || !value.is_finite() {
            errors.push(format!(
                "scoring.ethics.{}: must be a non-negative number, got {}",
                name, value
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_weights(prefix: &str, weights: &[(&str, f64)], errors: &mut Vec<String>) {
    for (name, weight) in weights {
        if *weight < 0.0 || !weight.is_finite() {
            errors.push(format!(
                "{}.{}: must be a non-negative number, got {}",
                prefix, name, weight
            ));
        }
    }

    let sum: f64 = weights.iter().map(|(_, w)| w).sum();
    if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
        errors.push(format!("{}: weights must sum to 1.0, got {:.4}", prefix, sum));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_scoring(&ScoringConfig::default()).is_ok());
    }

    #[test]
    fn test_weights_not_summing_to_one() {
        let mut config = ScoringConfig::default();
        config.spi.economic_readiness = 0.5;
        let errors = validate_scoring(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("scoring.spi"));
        assert!(errors[0].contains("sum to 1.0"));
    }

    #[test]
    fn test_negative_weight() {
        let mut config = ScoringConfig::default();
        config.partner.reputation = -0.1;
        config.partner.financial_health = 0.4;
        let errors = validate_scoring(&config).unwrap_err();
        assert!(errors[0].contains("scoring.partner.reputation"));
    }

    #[test]
    fn test_nan_penalty_rejected() {
        let mut config = ScoringConfig::default();
        config.ethics.jurisdiction_penalty = f64::NAN;
        let errors = validate_scoring(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("scoring.ethics.jurisdiction_penalty"));
    }

    #[test]
    fn test_inverted_rating_thresholds() {
        let mut config = ScoringConfig::default();
        config.rating.red = 80.0;
        config.rating.green = 60.0;
        let errors = validate_scoring(&config).unwrap_err();
        assert!(errors[0].contains("scoring.rating"));
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = ScoringConfig::default();
        config.spi.transparency = 0.5; // Error 1: spi sum
        config.ethics.pass_below = 120.0; // Error 2: out of range
        config.ethics.jurisdiction_penalty = -5.0; // Error 3: negative penalty
        let errors = validate_scoring(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }
}
