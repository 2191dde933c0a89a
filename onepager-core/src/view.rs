//! Selection transformer
//!
//! Projects one judiciary's row into the one-pager view: two key-event
//! tables, two adjournment-reason tables, and two CCR chart series.
//!
//! Global invariants enforced:
//! - `transform` is a pure function of (dataset, selection)
//! - Every non-populated outcome has the same empty shape
//! - Charts are never partially filled

use crate::dataset::{Dataset, DocketRecord};
use crate::schema::{CaseCount, Docket};
use serde::Serialize;
use tracing::{debug, info};

/// Chart x-axis labels, most recent period first
pub const PERIOD_LABELS: [&str; 3] = ["M1", "M2", "M3"];

/// Shown for an adjournment reason that the source does not provide
pub const NOT_AVAILABLE: &str = "N/A";

pub const PERIOD_AXIS_LABEL: &str = "Period";
pub const CCR_AXIS_LABEL: &str = "CCR (%)";

/// Outcome of a transformation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewStatus {
    /// No judiciary selected
    Empty,
    /// The selection matches no `Court_Name`
    NoData,
    /// The matched row lacks one or more CCR values
    MissingFields,
    Populated,
}

impl ViewStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ViewStatus::Empty => "empty",
            ViewStatus::NoData => "no_data",
            ViewStatus::MissingFields => "missing_fields",
            ViewStatus::Populated => "populated",
        }
    }
}

/// Row of the "Summary of Key Court Events" table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricRow {
    #[serde(rename = "Variable")]
    pub variable: String,
    #[serde(rename = "Value")]
    pub value: u64,
}

/// Row of the "Top Three Reasons for Adjournments" table
///
/// The source carries reason names only, so `number` and `percent` are always zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReasonRow {
    #[serde(rename = "Rank")]
    pub rank: u8,
    #[serde(rename = "Reason")]
    pub reason: String,
    #[serde(rename = "Number")]
    pub number: u64,
    #[serde(rename = "Percent")]
    pub percent: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub period: String,
    pub value: f64,
}

/// Bar chart data for one docket's clearance rate
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub points: Vec<ChartPoint>,
}

/// Everything shown in one docket column of the one-pager
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocketView {
    pub docket: Docket,
    pub heading: String,
    pub metrics: Vec<MetricRow>,
    pub reasons: Vec<ReasonRow>,
    pub ccr: ChartSeries,
}

impl DocketView {
    fn empty(docket: Docket) -> Self {
        DocketView {
            docket,
            heading: docket.heading(),
            metrics: Vec::new(),
            reasons: Vec::new(),
            ccr: ChartSeries {
                title: docket.chart_title(),
                x_label: PERIOD_AXIS_LABEL.to_string(),
                y_label: CCR_AXIS_LABEL.to_string(),
                points: Vec::new(),
            },
        }
    }

    fn populated(docket: Docket, record: &DocketRecord, ccr: [f64; 3]) -> Self {
        let mut view = DocketView::empty(docket);

        view.metrics = CaseCount::ALL
            .iter()
            .map(|&kind| MetricRow {
                variable: kind.label(docket),
                value: record.count(kind).value_or(0),
            })
            .collect();

        view.reasons = record
            .top_reasons
            .iter()
            .zip(1u8..)
            .map(|(reason, rank)| ReasonRow {
                rank,
                reason: reason.value_or(NOT_AVAILABLE.to_string()),
                number: 0,
                percent: 0,
            })
            .collect();

        view.ccr.points = PERIOD_LABELS
            .iter()
            .zip(ccr)
            .map(|(period, value)| ChartPoint {
                period: period.to_string(),
                value,
            })
            .collect();

        view
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty() && self.reasons.is_empty() && self.ccr.points.is_empty()
    }
}

/// The derived one-pager for a selection
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewResult {
    pub status: ViewStatus,
    /// Display label: the judiciary name, a status message, or empty
    pub label: String,
    pub criminal: DocketView,
    pub civil: DocketView,
}

impl ViewResult {
    /// The view shown before anything is selected
    pub fn empty() -> Self {
        Self::placeholder(ViewStatus::Empty, String::new())
    }

    fn placeholder(status: ViewStatus, label: String) -> Self {
        ViewResult {
            status,
            label,
            criminal: DocketView::empty(Docket::Criminal),
            civil: DocketView::empty(Docket::Civil),
        }
    }

    pub fn docket(&self, docket: Docket) -> &DocketView {
        match docket {
            Docket::Criminal => &self.criminal,
            Docket::Civil => &self.civil,
        }
    }
}

/// Derive the one-pager view for `selection`
///
/// A blank selection yields `Empty`, an unknown name `NoData`, and a row with
/// a null CCR value `MissingFields`. When several rows share the selected
/// `Court_Name`, the first in source order is used.
pub fn transform(dataset: &Dataset, selection: Option<&str>) -> ViewResult {
    let name = match selection.map(str::trim) {
        Some(name) if !name.is_empty() => name,
        _ => return ViewResult::empty(),
    };

    let Some(record) = dataset.find_first(name) else {
        debug!(court = name, "no row matches selection");
        return ViewResult::placeholder(
            ViewStatus::NoData,
            format!("No data available for {}", name),
        );
    };

    let (Some(criminal_ccr), Some(civil_ccr)) = (
        resolve_ccr(&record.criminal),
        resolve_ccr(&record.civil),
    ) else {
        info!(court = name, row = record.row, "row is missing CCR data");
        return ViewResult::placeholder(
            ViewStatus::MissingFields,
            format!("Missing CCR data for {}", name),
        );
    };

    ViewResult {
        status: ViewStatus::Populated,
        label: name.to_string(),
        criminal: DocketView::populated(Docket::Criminal, &record.criminal, criminal_ccr),
        civil: DocketView::populated(Docket::Civil, &record.civil, civil_ccr),
    }
}

/// CCR triple with absent columns read as zero; `None` if any value is null
fn resolve_ccr(record: &DocketRecord) -> Option<[f64; 3]> {
    let mut values = [0.0; 3];
    for (slot, field) in values.iter_mut().zip(&record.ccr) {
        *slot = field.resolve(0.0).filter(|v| !v.is_nan())?;
    }
    Some(values)
}

/// A transformer bound to one dataset
#[derive(Debug, Clone, Copy)]
pub struct Transformer<'a> {
    dataset: &'a Dataset,
}

impl<'a> Transformer<'a> {
    pub fn new(dataset: &'a Dataset) -> Self {
        Transformer { dataset }
    }

    pub fn transform(&self, selection: Option<&str>) -> ViewResult {
        transform(self.dataset, selection)
    }

    /// The empty view followed by one view per distinct judiciary, in selector order
    pub fn all_views(&self) -> Vec<ViewResult> {
        std::iter::once(ViewResult::empty())
            .chain(
                self.dataset
                    .distinct_judiciaries()
                    .into_iter()
                    .map(|name| self.transform(Some(name))),
            )
            .collect()
    }
}
