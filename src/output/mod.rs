pub mod formatter;

pub use formatter::{
    format_document, format_ethics, format_partner_detail, format_partner_table, format_score,
    format_score_result, format_section, should_use_colors,
};
