use std::io::IsTerminal;

use owo_colors::OwoColorize;
use terminal_size::{terminal_size, Width};

use crate::markup::{MarkupDocument, Section};
use crate::scoring::{EthicalCheckResult, PartnerScore, Rating, ScoreResult};

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Format a 0-100 score with one decimal, dropping a trailing ".0"
pub fn format_score(score: f64) -> String {
    let formatted = format!("{:.1}", score);
    formatted
        .strip_suffix(".0")
        .map(str::to_string)
        .unwrap_or(formatted)
}

fn format_rating(rating: Rating, use_colors: bool) -> String {
    let label = rating.as_str();
    if !use_colors {
        return label.to_string();
    }
    match rating {
        Rating::Green => label.green().bold().to_string(),
        Rating::Amber => label.yellow().bold().to_string(),
        Rating::Red => label.red().bold().to_string(),
    }
}

/// Multi-line SPI report: composite, band, breakdown and drivers
pub fn format_score_result(result: &ScoreResult, verbose: bool, use_colors: bool) -> String {
    let mut lines = Vec::new();

    let composite = format_score(result.composite_score);
    let band = format!(
        "{} - {}",
        format_score(result.confidence_low),
        format_score(result.confidence_high)
    );
    if use_colors {
        lines.push(format!(
            "Success Probability Index: {} ({})",
            composite.bold(),
            band.dimmed()
        ));
    } else {
        lines.push(format!("Success Probability Index: {} ({})", composite, band));
    }

    for entry in &result.breakdown {
        let label = format!("{:<24}", entry.label);
        let value = format!("{:>5}", format_score(entry.value));
        let weight = format!("x{:.2}", entry.weight);
        if use_colors {
            lines.push(format!("  {} {} {}", label, value.bold(), weight.dimmed()));
        } else {
            lines.push(format!("  {} {} {}", label, value, weight));
        }
        if verbose {
            for adjustment in &entry.adjustments {
                lines.push(format!("      {}", adjustment));
            }
        }
    }

    if !result.positive_drivers.is_empty() {
        lines.push(format!("Strengths: {}", result.positive_drivers.join(", ")));
    }
    if !result.negative_drivers.is_empty() {
        lines.push(format!("Weaknesses: {}", result.negative_drivers.join(", ")));
    }

    lines.join("\n")
}

/// Ethical safeguard verdict followed by its flags
pub fn format_ethics(check: &EthicalCheckResult, use_colors: bool) -> String {
    let verdict = match (check.passed, check.mitigation_required) {
        (true, false) => "PASSED",
        (true, true) => "PASSED (mitigation required)",
        (false, _) => "FAILED (mitigation required)",
    };
    let verdict = if !use_colors {
        verdict.to_string()
    } else if !check.passed {
        verdict.red().bold().to_string()
    } else if check.mitigation_required {
        verdict.yellow().bold().to_string()
    } else {
        verdict.green().bold().to_string()
    };

    let mut lines = vec![format!(
        "Ethical safeguards: {} (risk {})",
        verdict,
        format_score(check.risk_score)
    )];
    lines.extend(check.flags.iter().map(|flag| format!("  - {}", flag)));
    lines.join("\n")
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate text to fit available width, accounting for Unicode
fn truncate(text: &str, max_width: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= max_width {
        text.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Format ranked partners as a table: Index, Score, Rating, Name
pub fn format_partner_table(scores: &[PartnerScore], use_colors: bool) -> String {
    if scores.is_empty() {
        return "No partner profiles found.".to_string();
    }

    // Index (4) + score (6) + rating (6) + separators
    let fixed_width = 4 + 6 + 6 + 4;
    let term_width = get_terminal_width();

    scores
        .iter()
        .enumerate()
        .map(|(idx, score)| {
            let index_str = format!("{:>2}.", idx + 1);
            let score_str = format!("{:>6}", format_score(score.overall_score));
            // Pad before coloring so escape codes don't skew alignment
            let rating_str = format_rating(score.rating, use_colors);
            let rating_pad = " ".repeat(6usize.saturating_sub(score.rating.as_str().len()));
            let name = if score.name.is_empty() { "(unnamed)" } else { score.name.as_str() };
            let name = match term_width {
                Some(width) if width > fixed_width + 10 => truncate(name, width - fixed_width),
                Some(_) => truncate(name, 20),
                None => name.to_string(),
            };

            if use_colors {
                format!(
                    "{} {}  {}{}  {}",
                    index_str.dimmed(),
                    score_str.bold(),
                    rating_str,
                    rating_pad,
                    name
                )
            } else {
                format!("{} {}  {}{}  {}", index_str, score_str, rating_str, rating_pad, name)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Component-level detail for one partner (verbose mode)
pub fn format_partner_detail(score: &PartnerScore, use_colors: bool) -> String {
    let c = &score.components;
    let name = if score.name.is_empty() { "(unnamed)" } else { score.name.as_str() };
    let header = if use_colors {
        format!("{}", name.bold())
    } else {
        name.to_string()
    };
    format!(
        "{}\n  Overall: {} ({})\n  Financial health: {}\n  Project delivery: {}\n  Legal compliance: {}\n  Strategic fit: {}\n  Local capacity: {}\n  Reputation: {}",
        header,
        format_score(score.overall_score),
        format_rating(score.rating, use_colors),
        format_score(c.financial_health),
        format_score(c.project_delivery),
        format_score(c.legal_compliance),
        format_score(c.strategic_fit),
        format_score(c.local_capacity),
        format_score(c.reputation),
    )
}

/// Render one section as a heading followed by its paragraphs
pub fn format_section(section: &Section, use_colors: bool) -> String {
    let mut lines = Vec::with_capacity(section.paragraphs.len() + 1);
    if use_colors {
        lines.push(format!("## {}", section.title.cyan().bold()));
    } else {
        lines.push(format!("## {}", section.title));
    }
    lines.extend(section.paragraphs.iter().map(|p| format!("  {}", p)));
    lines.join("\n")
}

/// Render a whole document as plain text
pub fn format_document(doc: &MarkupDocument, use_colors: bool) -> String {
    let mut blocks = Vec::new();
    if use_colors {
        blocks.push(format!("# {}", doc.title.bold()));
    } else {
        blocks.push(format!("# {}", doc.title));
    }
    if !doc.subtitle.is_empty() {
        blocks.push(doc.subtitle.clone());
    }
    blocks.extend(doc.sections.iter().map(|s| format_section(s, use_colors)));
    blocks.join("\n\n")
}
