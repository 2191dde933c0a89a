//! Typed, immutable dataset of court records
//!
//! Global invariants enforced:
//! - Rows are never mutated after load
//! - Source row order is preserved; lookups take the first match
//! - Default substitution happens only through `Field::resolve`/`Field::value_or`

use crate::schema::{self, CaseCount, Docket, COURT_NAME};
use crate::table::{self, Cell, RawTable};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Cell text treated as a null value (compared case-insensitively after trimming)
const NULL_MARKERS: &[&str] = &["na", "n/a", "nan", "null", "-"];

/// An optional column value as read from the source
#[derive(Debug, Clone, PartialEq)]
pub enum Field<T> {
    /// The column does not exist in the source
    Absent,
    /// The column exists but this row has no usable value
    Null,
    Present(T),
}

impl<T: Clone> Field<T> {
    /// Substitute `default` for an absent column; a null cell stays missing
    pub fn resolve(&self, default: T) -> Option<T> {
        match self {
            Field::Absent => Some(default),
            Field::Null => None,
            Field::Present(value) => Some(value.clone()),
        }
    }

    /// Substitute `default` for both absent columns and null cells
    pub fn value_or(&self, default: T) -> T {
        match self {
            Field::Present(value) => value.clone(),
            Field::Absent | Field::Null => default,
        }
    }
}

/// How the loader treats repeated `Court_Name` values
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Keep every row; lookups return the first match in source order
    #[default]
    First,
    /// Refuse to load a dataset with repeated names
    Reject,
}

impl DuplicatePolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            DuplicatePolicy::First => "first",
            DuplicatePolicy::Reject => "reject",
        }
    }
}

/// Options controlling how a dataset is read
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Worksheet to read from a workbook (default: first sheet)
    pub sheet: Option<String>,
    pub duplicates: DuplicatePolicy,
}

/// One docket's columns for a single row
#[derive(Debug, Clone, PartialEq)]
pub struct DocketRecord {
    /// Indexed in `CaseCount::ALL` order
    pub counts: [Field<u64>; 4],
    /// Current period, then one and two periods back
    pub ccr: [Field<f64>; 3],
    pub top_reasons: [Field<String>; 3],
}

impl DocketRecord {
    /// A record whose columns are all absent
    pub fn absent() -> Self {
        DocketRecord {
            counts: [Field::Absent, Field::Absent, Field::Absent, Field::Absent],
            ccr: [Field::Absent, Field::Absent, Field::Absent],
            top_reasons: [Field::Absent, Field::Absent, Field::Absent],
        }
    }

    pub fn count(&self, kind: CaseCount) -> &Field<u64> {
        &self.counts[kind.index()]
    }
}

/// One judiciary-period snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct CourtRecord {
    pub court_name: String,
    /// 1-based source row, counting the header row
    pub row: usize,
    pub criminal: DocketRecord,
    pub civil: DocketRecord,
}

impl CourtRecord {
    pub fn docket(&self, docket: Docket) -> &DocketRecord {
        match docket {
            Docket::Criminal => &self.criminal,
            Docket::Civil => &self.civil,
        }
    }
}

/// The loaded, read-only dataset
#[derive(Debug, Clone)]
pub struct Dataset {
    source: PathBuf,
    records: Vec<CourtRecord>,
    absent_columns: Vec<String>,
}

impl Dataset {
    /// Load a dataset with default options
    pub fn load(path: &Path) -> Result<Self> {
        Self::load_with(path, &LoadOptions::default())
    }

    /// Load a dataset from a CSV file or workbook
    ///
    /// Fails if the file is missing or unparsable, has no `Court_Name`
    /// column, or repeats a name under `DuplicatePolicy::Reject`.
    pub fn load_with(path: &Path, options: &LoadOptions) -> Result<Self> {
        let table = table::read_table(path, options.sheet.as_deref())?;
        let dataset = Self::from_table(path, &table)
            .with_context(|| format!("failed to load dataset: {}", path.display()))?;

        let ccr_columns = schema::all_ccr_columns();
        for column in &dataset.absent_columns {
            if ccr_columns.contains(column) {
                warn!(column = %column, source = %path.display(), "CCR column not found; reading 0.0");
            } else {
                warn!(column = %column, source = %path.display(), "column not found; using defaults");
            }
        }

        let duplicates = dataset.duplicate_judiciaries();
        if !duplicates.is_empty() {
            match options.duplicates {
                DuplicatePolicy::First => warn!(
                    names = %duplicates.join(", "),
                    "duplicate Court_Name values; the first row in source order is used"
                ),
                DuplicatePolicy::Reject => anyhow::bail!(
                    "duplicate Court_Name values in {}: {}",
                    path.display(),
                    duplicates.join(", ")
                ),
            }
        }

        info!(
            source = %path.display(),
            rows = dataset.records.len(),
            judiciaries = dataset.distinct_judiciaries().len(),
            "dataset loaded"
        );
        Ok(dataset)
    }

    /// Build a dataset from records already in memory
    pub fn from_records(source: impl Into<PathBuf>, records: Vec<CourtRecord>) -> Self {
        Dataset {
            source: source.into(),
            records,
            absent_columns: Vec::new(),
        }
    }

    /// Type a raw table against the column contract
    pub fn from_table(source: &Path, table: &RawTable) -> Result<Self> {
        let name_index = table
            .column_index(COURT_NAME)
            .with_context(|| format!("missing required column '{}'", COURT_NAME))?;

        let mut absent_columns = Vec::new();
        let criminal = DocketColumns::locate(Docket::Criminal, table, &mut absent_columns);
        let civil = DocketColumns::locate(Docket::Civil, table, &mut absent_columns);

        let mut records = Vec::with_capacity(table.rows.len());
        for (i, cells) in table.rows.iter().enumerate() {
            let row = i + 2;
            if cells.iter().all(Cell::is_empty) {
                continue;
            }

            let court_name = match parse_text(cell_at(cells, name_index)) {
                Field::Present(name) => name,
                _ => {
                    warn!(row, "row has no {}; skipping", COURT_NAME);
                    continue;
                }
            };

            records.push(CourtRecord {
                court_name,
                row,
                criminal: criminal.read(table, cells, row)?,
                civil: civil.read(table, cells, row)?,
            });
        }

        Ok(Dataset {
            source: source.to_path_buf(),
            records,
            absent_columns,
        })
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn records(&self) -> &[CourtRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Contract columns missing from the source header
    pub fn absent_columns(&self) -> &[String] {
        &self.absent_columns
    }

    /// First record with an exactly matching `Court_Name`, in source order
    pub fn find_first(&self, court_name: &str) -> Option<&CourtRecord> {
        self.records.iter().find(|r| r.court_name == court_name)
    }

    /// Judiciary names in first-occurrence order, duplicates removed
    pub fn distinct_judiciaries(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.records
            .iter()
            .map(|r| r.court_name.as_str())
            .filter(|name| seen.insert(*name))
            .collect()
    }

    /// Names occurring more than once, in first-occurrence order
    pub fn duplicate_judiciaries(&self) -> Vec<&str> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for record in &self.records {
            *counts.entry(record.court_name.as_str()).or_default() += 1;
        }
        self.distinct_judiciaries()
            .into_iter()
            .filter(|name| counts.get(name).copied().unwrap_or(0) > 1)
            .collect()
    }
}

/// Column positions for one docket; `None` marks an absent column
struct DocketColumns {
    counts: [Option<usize>; 4],
    ccr: [Option<usize>; 3],
    top_reasons: [Option<usize>; 3],
}

impl DocketColumns {
    fn locate(docket: Docket, table: &RawTable, absent: &mut Vec<String>) -> Self {
        let mut find = |name: String| {
            let index = table.column_index(&name);
            if index.is_none() {
                absent.push(name);
            }
            index
        };

        let counts = CaseCount::ALL.map(|kind| find(docket.count_column(kind)));
        let ccr = docket.ccr_columns().map(&mut find);
        let top_reasons = docket.reason_columns().map(&mut find);

        DocketColumns {
            counts,
            ccr,
            top_reasons,
        }
    }

    fn read(&self, table: &RawTable, cells: &[Cell], row: usize) -> Result<DocketRecord> {
        let mut record = DocketRecord::absent();

        for (slot, index) in record.counts.iter_mut().zip(self.counts) {
            if let Some(index) = index {
                *slot = parse_count(cell_at(cells, index))
                    .with_context(|| cell_context(table, index, row))?;
            }
        }
        for (slot, index) in record.ccr.iter_mut().zip(self.ccr) {
            if let Some(index) = index {
                *slot = parse_rate(cell_at(cells, index))
                    .with_context(|| cell_context(table, index, row))?;
            }
        }
        for (slot, index) in record.top_reasons.iter_mut().zip(self.top_reasons) {
            if let Some(index) = index {
                *slot = parse_text(cell_at(cells, index));
            }
        }

        Ok(record)
    }
}

fn cell_context(table: &RawTable, index: usize, row: usize) -> String {
    format!(
        "invalid value at row {}, column '{}'",
        row, table.headers[index]
    )
}

fn cell_at(cells: &[Cell], index: usize) -> &Cell {
    const EMPTY: &Cell = &Cell::Empty;
    cells.get(index).unwrap_or(EMPTY)
}

fn is_null_marker(text: &str) -> bool {
    NULL_MARKERS
        .iter()
        .any(|marker| text.eq_ignore_ascii_case(marker))
}

/// Parse a non-negative whole case count
fn parse_count(cell: &Cell) -> Result<Field<u64>> {
    let value = match cell {
        Cell::Empty => return Ok(Field::Null),
        Cell::Int(v) => {
            return u64::try_from(*v)
                .map(Field::Present)
                .map_err(|_| anyhow::anyhow!("expected a non-negative whole number, found {}", v))
        }
        Cell::Float(v) => *v,
        Cell::Text(raw) => {
            let text = raw.trim();
            if text.is_empty() || is_null_marker(text) {
                return Ok(Field::Null);
            }
            text.replace(',', "")
                .parse::<f64>()
                .map_err(|_| anyhow::anyhow!("expected a whole number, found '{}'", text))?
        }
        Cell::Bool(b) => anyhow::bail!("expected a whole number, found boolean {}", b),
    };

    if value.is_nan() {
        return Ok(Field::Null);
    }
    if value < 0.0 || value.fract() != 0.0 || !value.is_finite() || value > u64::MAX as f64 {
        anyhow::bail!("expected a non-negative whole number, found {}", value);
    }
    Ok(Field::Present(value as u64))
}

/// Parse a percentage; a trailing '%' is accepted
fn parse_rate(cell: &Cell) -> Result<Field<f64>> {
    let value = match cell {
        Cell::Empty => return Ok(Field::Null),
        Cell::Int(v) => *v as f64,
        Cell::Float(v) => *v,
        Cell::Text(raw) => {
            let text = raw.trim();
            if text.is_empty() || is_null_marker(text) {
                return Ok(Field::Null);
            }
            text.trim_end_matches('%')
                .trim()
                .parse::<f64>()
                .map_err(|_| anyhow::anyhow!("expected a percentage, found '{}'", text))?
        }
        Cell::Bool(b) => anyhow::bail!("expected a percentage, found boolean {}", b),
    };

    if value.is_nan() {
        Ok(Field::Null)
    } else if value.is_infinite() {
        anyhow::bail!("expected a finite percentage, found {}", value)
    } else {
        Ok(Field::Present(value))
    }
}

fn parse_text(cell: &Cell) -> Field<String> {
    match cell {
        Cell::Empty => Field::Null,
        Cell::Text(raw) => {
            let text = raw.trim();
            if text.is_empty() || is_null_marker(text) {
                Field::Null
            } else {
                Field::Present(text.to_string())
            }
        }
        Cell::Int(v) => Field::Present(v.to_string()),
        Cell::Float(v) if v.is_nan() => Field::Null,
        Cell::Float(v) => Field::Present(v.to_string()),
        Cell::Bool(v) => Field::Present(v.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Cell {
        Cell::Text(s.to_string())
    }

    fn table(headers: &[&str], rows: Vec<Vec<Cell>>) -> RawTable {
        RawTable {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows,
        }
    }

    #[test]
    fn test_field_resolve() {
        assert_eq!(Field::<f64>::Absent.resolve(0.0), Some(0.0));
        assert_eq!(Field::<f64>::Null.resolve(0.0), None);
        assert_eq!(Field::Present(80.5).resolve(0.0), Some(80.5));
        assert_eq!(Field::<u64>::Null.value_or(0), 0);
        assert_eq!(Field::Present(7u64).value_or(0), 7);
    }

    #[test]
    fn test_parse_count() {
        assert_eq!(parse_count(&Cell::Int(120)).unwrap(), Field::Present(120));
        assert_eq!(parse_count(&Cell::Float(15.0)).unwrap(), Field::Present(15));
        assert_eq!(parse_count(&text(" 1,200 ")).unwrap(), Field::Present(1200));
        assert_eq!(parse_count(&Cell::Empty).unwrap(), Field::Null);
        assert_eq!(parse_count(&text("N/A")).unwrap(), Field::Null);
        assert_eq!(parse_count(&Cell::Float(f64::NAN)).unwrap(), Field::Null);
        assert!(parse_count(&Cell::Float(2.5)).is_err());
        assert!(parse_count(&Cell::Int(-3)).is_err());
        assert!(parse_count(&text("many")).is_err());
        assert!(parse_count(&Cell::Bool(true)).is_err());
    }

    #[test]
    fn test_parse_rate() {
        assert_eq!(parse_rate(&Cell::Float(83.3)).unwrap(), Field::Present(83.3));
        assert_eq!(parse_rate(&text("78.5%")).unwrap(), Field::Present(78.5));
        assert_eq!(parse_rate(&Cell::Int(100)).unwrap(), Field::Present(100.0));
        assert_eq!(parse_rate(&text("nan")).unwrap(), Field::Null);
        assert_eq!(parse_rate(&Cell::Empty).unwrap(), Field::Null);
        assert!(parse_rate(&text("high")).is_err());
        assert!(parse_rate(&Cell::Float(f64::INFINITY)).is_err());
    }

    #[test]
    fn test_parse_text() {
        assert_eq!(
            parse_text(&text("  Witness absent ")),
            Field::Present("Witness absent".to_string())
        );
        assert_eq!(parse_text(&text("   ")), Field::Null);
        assert_eq!(parse_text(&Cell::Int(4)), Field::Present("4".to_string()));
        assert_eq!(parse_text(&Cell::Float(f64::NAN)), Field::Null);
        for marker in ["null", "NaN", "-", " N/A ", "na"] {
            assert_eq!(parse_text(&text(marker)), Field::Null, "marker {:?}", marker);
        }
        assert_eq!(
            parse_text(&text("None of the parties")),
            Field::Present("None of the parties".to_string())
        );
    }

    #[test]
    fn test_from_table_requires_court_name() {
        let raw = table(&["Name", "CCR_Criminal"], vec![vec![text("A"), text("1")]]);
        let err = Dataset::from_table(Path::new("q4.csv"), &raw).unwrap_err();
        assert!(err.to_string().contains("Court_Name"));
    }

    #[test]
    fn test_from_table_marks_absent_columns() {
        let raw = table(
            &["Court_Name", "CCR_Criminal"],
            vec![vec![text("District A"), text("83.3")]],
        );
        let dataset = Dataset::from_table(Path::new("q4.csv"), &raw).unwrap();
        let record = &dataset.records()[0];

        assert_eq!(record.criminal.ccr[0], Field::Present(83.3));
        assert_eq!(record.criminal.ccr[1], Field::Absent);
        assert_eq!(record.civil.count(CaseCount::Filed), &Field::Absent);
        assert!(dataset
            .absent_columns()
            .contains(&"CCR_Criminal_L1".to_string()));
        assert!(!dataset.absent_columns().contains(&"CCR_Criminal".to_string()));
        // 8 counts + 6 rates + 6 reasons, minus the one present
        assert_eq!(dataset.absent_columns().len(), 19);
    }

    #[test]
    fn test_from_table_short_row_reads_null() {
        let raw = table(
            &["Court_Name", "CCR_Criminal", "CCR_Civil"],
            vec![vec![text("District A"), text("83.3")]],
        );
        let dataset = Dataset::from_table(Path::new("q4.csv"), &raw).unwrap();
        assert_eq!(dataset.records()[0].civil.ccr[0], Field::Null);
    }

    #[test]
    fn test_from_table_skips_blank_and_nameless_rows() {
        let raw = table(
            &["Court_Name", "num_filed_Criminal"],
            vec![
                vec![text("District A"), text("10")],
                vec![Cell::Empty, Cell::Empty],
                vec![Cell::Empty, text("5")],
                vec![text("District B"), text("3")],
            ],
        );
        let dataset = Dataset::from_table(Path::new("q4.csv"), &raw).unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.records()[1].court_name, "District B");
        assert_eq!(dataset.records()[1].row, 5);
    }

    #[test]
    fn test_from_table_reports_bad_cell_location() {
        let raw = table(
            &["Court_Name", "num_adj_Civil"],
            vec![vec![text("District A"), text("lots")]],
        );
        let err = Dataset::from_table(Path::new("q4.csv"), &raw).unwrap_err();
        let message = format!("{:#}", err);
        assert!(message.contains("row 2"), "got: {}", message);
        assert!(message.contains("num_adj_Civil"), "got: {}", message);
    }

    #[test]
    fn test_distinct_and_duplicate_judiciaries() {
        let raw = table(
            &["Court_Name"],
            vec![
                vec![text("District B")],
                vec![text("District A")],
                vec![text("District B")],
                vec![text("District C")],
                vec![text("District A")],
            ],
        );
        let dataset = Dataset::from_table(Path::new("q4.csv"), &raw).unwrap();
        assert_eq!(
            dataset.distinct_judiciaries(),
            vec!["District B", "District A", "District C"]
        );
        assert_eq!(
            dataset.duplicate_judiciaries(),
            vec!["District B", "District A"]
        );
    }

    #[test]
    fn test_find_first_uses_source_order() {
        let raw = table(
            &["Court_Name", "num_filed_Criminal"],
            vec![
                vec![text("District A"), text("1")],
                vec![text("District A"), text("2")],
            ],
        );
        let dataset = Dataset::from_table(Path::new("q4.csv"), &raw).unwrap();
        let record = dataset.find_first("District A").unwrap();
        assert_eq!(record.criminal.count(CaseCount::Filed), &Field::Present(1));
        assert_eq!(record.row, 2);
        assert!(dataset.find_first("district a").is_none());
    }

    #[test]
    fn test_duplicate_policy_serde() {
        let policy: DuplicatePolicy = serde_json::from_str(r#""reject""#).unwrap();
        assert_eq!(policy, DuplicatePolicy::Reject);
        assert_eq!(DuplicatePolicy::default(), DuplicatePolicy::First);
        assert_eq!(DuplicatePolicy::First.as_str(), "first");
    }
}
