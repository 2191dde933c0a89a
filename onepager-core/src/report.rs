//! Text and JSON output
//!
//! Global invariants enforced:
//! - Deterministic output ordering
//! - Byte-for-byte identical output across runs

use crate::dataset::Dataset;
use crate::schema::Docket;
use crate::view::{DocketView, Transformer, ViewResult, ViewStatus};
use serde::Serialize;

/// Width of the longest bar in the text chart
const BAR_WIDTH: usize = 40;

/// Render a view as a plain-text one-pager
pub fn render_text(view: &ViewResult) -> String {
    let mut output = String::new();

    match view.status {
        ViewStatus::Empty => {
            output.push_str("No judiciary selected\n");
            return output;
        }
        ViewStatus::NoData | ViewStatus::MissingFields => {
            output.push_str(&view.label);
            output.push('\n');
            return output;
        }
        ViewStatus::Populated => {}
    }

    output.push_str(&view.label);
    output.push('\n');
    output.push_str(&"=".repeat(view.label.chars().count()));
    output.push('\n');

    for docket in Docket::ALL {
        output.push('\n');
        render_docket_text(view.docket(docket), &mut output);
    }

    output
}

fn render_docket_text(docket: &DocketView, output: &mut String) {
    output.push_str(&docket.heading);
    output.push('\n');

    output.push_str("  Summary of Key Court Events\n");
    for row in &docket.metrics {
        output.push_str(&format!(
            "    {:<32} {:>8}\n",
            truncate_or_pad(&row.variable, 32),
            row.value
        ));
    }

    output.push_str("  Case Clearance Rate (CCR)\n");
    let scale = docket
        .ccr
        .points
        .iter()
        .map(|p| p.value)
        .fold(100.0_f64, f64::max);
    for point in &docket.ccr.points {
        let filled = ((point.value.max(0.0) / scale) * BAR_WIDTH as f64).round() as usize;
        output.push_str(&format!(
            "    {:<4} {:>7.1}  {}\n",
            point.period,
            point.value,
            "#".repeat(filled.min(BAR_WIDTH))
        ));
    }

    output.push_str("  Top Three Reasons for Adjournments\n");
    output.push_str(&format!(
        "    {:<5} {:<40} {:>6} {:>7}\n",
        "RANK", "REASON", "NUMBER", "PERCENT"
    ));
    for row in &docket.reasons {
        output.push_str(&format!(
            "    {:<5} {:<40} {:>6} {:>7}\n",
            row.rank,
            truncate_or_pad(&row.reason, 40),
            row.number,
            row.percent
        ));
    }
}

/// Render a view as JSON output
pub fn render_json(view: &ViewResult) -> String {
    serde_json::to_string_pretty(view).unwrap_or_else(|_| "{}".to_string())
}

#[derive(Serialize)]
struct ViewsDocument<'a> {
    source: String,
    judiciaries: Vec<&'a str>,
    views: Vec<ViewResult>,
}

/// Render every view of a dataset (empty selection first) as JSON
pub fn render_views_json(dataset: &Dataset) -> String {
    let document = ViewsDocument {
        source: dataset.source().display().to_string(),
        judiciaries: dataset.distinct_judiciaries(),
        views: Transformer::new(dataset).all_views(),
    };
    serde_json::to_string_pretty(&document).unwrap_or_else(|_| "{}".to_string())
}

/// Render the selector's judiciary list, one name per line
pub fn render_judiciaries_text(dataset: &Dataset) -> String {
    dataset
        .distinct_judiciaries()
        .iter()
        .map(|name| format!("{}\n", name))
        .collect()
}

pub fn render_judiciaries_json(dataset: &Dataset) -> String {
    serde_json::to_string_pretty(&dataset.distinct_judiciaries())
        .unwrap_or_else(|_| "[]".to_string())
}

/// Truncate or pad string to fixed width
fn truncate_or_pad(s: &str, width: usize) -> String {
    if s.chars().count() > width {
        let kept: String = s.chars().take(width.saturating_sub(3)).collect();
        format!("{}...", kept)
    } else {
        format!("{:<width$}", s, width = width)
    }
}
