//! Integration tests for the selection transformer

use onepager_core::view::NOT_AVAILABLE;
use onepager_core::{render_json, transform, Dataset, Transformer, ViewStatus};
use std::path::PathBuf;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn q4() -> Dataset {
    Dataset::load(&fixture_path("onepager_q4.csv")).unwrap()
}

#[test]
fn test_district_a_scenario() {
    let dataset = q4();
    let view = transform(&dataset, Some("District A"));

    assert_eq!(view.status, ViewStatus::Populated);
    assert_eq!(view.label, "District A");

    let metrics: Vec<(&str, u64)> = view
        .criminal
        .metrics
        .iter()
        .map(|m| (m.variable.as_str(), m.value))
        .collect();
    assert_eq!(
        metrics,
        vec![
            ("Criminal Cases Filed", 120),
            ("Criminal Cases Resolved", 100),
            ("Criminal Rulings & Judgments", 40),
            ("Criminal Adjournments", 15),
        ]
    );

    let series: Vec<(&str, f64)> = view
        .criminal
        .ccr
        .points
        .iter()
        .map(|p| (p.period.as_str(), p.value))
        .collect();
    assert_eq!(series, vec![("M1", 83.3), ("M2", 80.0), ("M3", 78.5)]);

    let reasons: Vec<(u8, &str, u64, u64)> = view
        .criminal
        .reasons
        .iter()
        .map(|r| (r.rank, r.reason.as_str(), r.number, r.percent))
        .collect();
    assert_eq!(
        reasons,
        vec![
            (1, "Counsel unavailable", 0, 0),
            (2, "Witness absent", 0, 0),
            (3, "Scheduling conflict", 0, 0),
        ]
    );
}

#[test]
fn test_district_a_civil_docket() {
    let dataset = q4();
    let view = transform(&dataset, Some("District A"));

    let labels: Vec<&str> = view
        .civil
        .metrics
        .iter()
        .map(|m| m.variable.as_str())
        .collect();
    assert_eq!(
        labels,
        vec![
            "Civil Cases Filed",
            "Civil Cases Resolved",
            "Civil Rulings & Judgments",
            "Civil Adjournments"
        ]
    );
    assert_eq!(view.civil.metrics[0].value, 200);
    let values: Vec<f64> = view.civil.ccr.points.iter().map(|p| p.value).collect();
    assert_eq!(values, vec![90.0, 88.2, 85.1]);
    assert_eq!(view.civil.ccr.title, "Civil Case Clearance Rate (CCR)");
    assert_eq!(view.civil.reasons[2].reason, "Pending documents");
}

#[test]
fn test_transform_is_deterministic() {
    let dataset = q4();
    for name in dataset.distinct_judiciaries() {
        let first = transform(&dataset, Some(name));
        let second = transform(&dataset, Some(name));
        assert_eq!(first, second);
        assert_eq!(render_json(&first), render_json(&second));
    }
}

#[test]
fn test_empty_selection_is_empty() {
    let dataset = q4();
    for selection in [None, Some("")] {
        let view = transform(&dataset, selection);
        assert_eq!(view.status, ViewStatus::Empty);
        assert_eq!(view.label, "");
        assert!(view.criminal.metrics.is_empty());
        assert!(view.civil.reasons.is_empty());
        assert!(view.criminal.ccr.points.is_empty());
        assert!(view.civil.ccr.points.is_empty());
    }
}

#[test]
fn test_unknown_name_is_no_data() {
    let dataset = q4();
    let view = transform(&dataset, Some("Supreme Court of Nowhere"));
    assert_eq!(view.status, ViewStatus::NoData);
    assert!(view.criminal.is_empty());
    assert!(view.civil.is_empty());
}

#[test]
fn test_null_ccr_is_missing_fields() {
    let dataset = q4();
    let view = transform(&dataset, Some("District C"));
    assert_eq!(view.status, ViewStatus::MissingFields);
    assert!(view.criminal.ccr.points.is_empty());
    assert!(view.civil.ccr.points.is_empty());
    assert!(view.criminal.metrics.is_empty());
}

#[test]
fn test_duplicate_name_uses_first_row() {
    let dataset = q4();
    let view = transform(&dataset, Some("District A"));
    assert_eq!(view.criminal.metrics[0].value, 120);
    assert!(view.criminal.reasons.iter().all(|r| r.reason != "Duplicate row"));
}

#[test]
fn test_null_counts_and_reasons_use_defaults() {
    let dataset = q4();

    let east = transform(&dataset, Some("Magistrate Court East"));
    assert_eq!(east.status, ViewStatus::Populated);
    assert_eq!(east.criminal.metrics[2].value, 0);
    assert_eq!(east.civil.metrics[3].value, 0);
    assert_eq!(east.civil.ccr.points[0].value, 83.3);

    let district_b = transform(&dataset, Some("District B"));
    assert_eq!(district_b.criminal.reasons[2].reason, NOT_AVAILABLE);
}

#[test]
fn test_null_marker_reasons_read_as_not_available() {
    let dataset = q4();
    let east = transform(&dataset, Some("Magistrate Court East"));

    let criminal: Vec<&str> = east
        .criminal
        .reasons
        .iter()
        .map(|r| r.reason.as_str())
        .collect();
    assert_eq!(
        criminal,
        vec!["Counsel unavailable", NOT_AVAILABLE, "Scheduling conflict"]
    );

    let civil: Vec<&str> = east.civil.reasons.iter().map(|r| r.reason.as_str()).collect();
    assert_eq!(civil, vec!["Parties not ready", NOT_AVAILABLE, NOT_AVAILABLE]);
}

#[test]
fn test_null_marker_reasons_from_csv() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("markers.csv");
    std::fs::write(
        &path,
        "Court_Name,CCR_Criminal,Adj_Criminal_Top_1_Name,Adj_Criminal_Top_2_Name,Adj_Criminal_Top_3_Name\n\
         District A,80,null,NaN,-\n",
    )
    .unwrap();

    let dataset = Dataset::load(&path).unwrap();
    let view = transform(&dataset, Some("District A"));
    let reasons: Vec<&str> = view
        .criminal
        .reasons
        .iter()
        .map(|r| r.reason.as_str())
        .collect();
    assert_eq!(reasons, vec![NOT_AVAILABLE; 3]);
}

#[test]
fn test_ccr_above_one_hundred_is_kept() {
    let dataset = q4();
    let view = transform(&dataset, Some("High Court Central"));
    assert_eq!(view.criminal.ccr.points[0].value, 111.1);
    assert_eq!(
        view.criminal.reasons[0].reason,
        "Accused not produced, in custody"
    );
}

#[test]
fn test_absent_ccr_columns_default_to_zero() {
    let dataset = Dataset::load(&fixture_path("minimal_columns.csv")).unwrap();

    let view = transform(&dataset, Some("District A"));
    assert_eq!(view.status, ViewStatus::Populated);
    let values: Vec<f64> = view.criminal.ccr.points.iter().map(|p| p.value).collect();
    assert_eq!(values, vec![83.3, 0.0, 0.0]);
    assert!(view.criminal.metrics.iter().all(|m| m.value == 0));
    assert!(view.civil.reasons.iter().all(|r| r.reason == NOT_AVAILABLE));

    // Present-but-blank CCR cell is still missing data
    let view = transform(&dataset, Some("District B"));
    assert_eq!(view.status, ViewStatus::MissingFields);
}

#[test]
fn test_all_views_cover_every_judiciary() {
    let dataset = q4();
    let views = Transformer::new(&dataset).all_views();
    assert_eq!(views.len(), dataset.distinct_judiciaries().len() + 1);
    assert_eq!(views[0].status, ViewStatus::Empty);

    let missing: Vec<&str> = views
        .iter()
        .filter(|v| v.status == ViewStatus::MissingFields)
        .map(|v| v.label.as_str())
        .collect();
    assert_eq!(missing, vec!["Missing CCR data for District C"]);
}
