//! Column contract for the quarterly one-pager spreadsheet
//!
//! Column names are part of the input contract and must match exactly
//! (after trimming header whitespace).

use serde::Serialize;

/// Identity column; the only column a dataset cannot load without.
pub const COURT_NAME: &str = "Court_Name";

/// Case category reported on the one-pager
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Docket {
    Criminal,
    Civil,
}

impl Docket {
    pub const ALL: [Docket; 2] = [Docket::Criminal, Docket::Civil];

    /// Column suffix and display prefix ("Criminal", "Civil")
    pub fn as_str(self) -> &'static str {
        match self {
            Docket::Criminal => "Criminal",
            Docket::Civil => "Civil",
        }
    }

    /// Heading for the docket column of the dashboard
    pub fn heading(self) -> String {
        format!("{} Cases", self.as_str())
    }

    pub fn chart_title(self) -> String {
        format!("{} Case Clearance Rate (CCR)", self.as_str())
    }

    /// `CCR_<Docket>`, `CCR_<Docket>_L1`, `CCR_<Docket>_L2`, most recent first
    pub fn ccr_columns(self) -> [String; 3] {
        let base = format!("CCR_{}", self.as_str());
        [base.clone(), format!("{}_L1", base), format!("{}_L2", base)]
    }

    /// `Adj_<Docket>_Top_{1,2,3}_Name`
    pub fn reason_columns(self) -> [String; 3] {
        [1, 2, 3].map(|rank| format!("Adj_{}_Top_{}_Name", self.as_str(), rank))
    }

    pub fn count_column(self, kind: CaseCount) -> String {
        format!("{}_{}", kind.column_stem(), self.as_str())
    }
}

/// Case counts shown in the "Summary of Key Court Events" table, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CaseCount {
    Filed,
    Resolved,
    RulingsJudgments,
    Adjournments,
}

impl CaseCount {
    pub const ALL: [CaseCount; 4] = [
        CaseCount::Filed,
        CaseCount::Resolved,
        CaseCount::RulingsJudgments,
        CaseCount::Adjournments,
    ];

    pub fn column_stem(self) -> &'static str {
        match self {
            CaseCount::Filed => "num_filed",
            CaseCount::Resolved => "num_resolved",
            CaseCount::RulingsJudgments => "num_rul_judg",
            CaseCount::Adjournments => "num_adj",
        }
    }

    /// Row label, e.g. "Criminal Cases Filed"
    pub fn label(self, docket: Docket) -> String {
        let suffix = match self {
            CaseCount::Filed => "Cases Filed",
            CaseCount::Resolved => "Cases Resolved",
            CaseCount::RulingsJudgments => "Rulings & Judgments",
            CaseCount::Adjournments => "Adjournments",
        };
        format!("{} {}", docket.as_str(), suffix)
    }

    pub(crate) fn index(self) -> usize {
        match self {
            CaseCount::Filed => 0,
            CaseCount::Resolved => 1,
            CaseCount::RulingsJudgments => 2,
            CaseCount::Adjournments => 3,
        }
    }
}

/// Every CCR column the transformer reads, criminal first
pub fn all_ccr_columns() -> Vec<String> {
    Docket::ALL
        .iter()
        .flat_map(|docket| docket.ccr_columns())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_columns() {
        assert_eq!(
            Docket::Criminal.count_column(CaseCount::Filed),
            "num_filed_Criminal"
        );
        assert_eq!(
            Docket::Civil.count_column(CaseCount::RulingsJudgments),
            "num_rul_judg_Civil"
        );
        assert_eq!(Docket::Civil.count_column(CaseCount::Adjournments), "num_adj_Civil");
    }

    #[test]
    fn test_ccr_columns_most_recent_first() {
        assert_eq!(
            Docket::Criminal.ccr_columns(),
            ["CCR_Criminal", "CCR_Criminal_L1", "CCR_Criminal_L2"].map(String::from)
        );
        assert_eq!(all_ccr_columns().len(), 6);
        assert_eq!(all_ccr_columns()[3], "CCR_Civil");
    }

    #[test]
    fn test_reason_columns() {
        assert_eq!(
            Docket::Civil.reason_columns(),
            [
                "Adj_Civil_Top_1_Name",
                "Adj_Civil_Top_2_Name",
                "Adj_Civil_Top_3_Name"
            ]
            .map(String::from)
        );
    }

    #[test]
    fn test_labels() {
        assert_eq!(
            CaseCount::RulingsJudgments.label(Docket::Criminal),
            "Criminal Rulings & Judgments"
        );
        assert_eq!(Docket::Civil.heading(), "Civil Cases");
        assert_eq!(
            Docket::Criminal.chart_title(),
            "Criminal Case Clearance Rate (CCR)"
        );
    }
}
