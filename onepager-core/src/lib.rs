//! Onepager core library - per-judiciary one-pagers from quarterly court statistics

#![deny(warnings)]

// Global invariants enforced in this crate:
// - The dataset is loaded once and never mutated
// - No global mutable state
// - No randomness, clocks, threads, or async
// - Deterministic ordering: source row order, first occurrence wins
// - Identical input yields byte-for-byte identical output

pub mod config;
pub mod dataset;
pub mod html;
pub mod report;
pub mod schema;
pub mod table;
pub mod view;

pub use config::ResolvedConfig;
pub use dataset::{CourtRecord, Dataset, DocketRecord, DuplicatePolicy, Field, LoadOptions};
pub use html::{render_html_dashboard, DashboardOptions};
pub use report::{render_json, render_text, render_views_json};
pub use schema::{CaseCount, Docket};
pub use view::{transform, Transformer, ViewResult, ViewStatus};
