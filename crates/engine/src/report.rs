use std::fmt;

use cargos_core::Money;
use serde::Serialize;

use crate::price::MissingPrice;
use crate::record::{OccupationOutcome, PersonRecord, RecordStatus};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub records: usize,
    pub fully_priced: usize,
    /// Records with at least one garment that had no price.
    pub partially_priced: usize,
    pub review: usize,
    /// Labels that matched nothing in the catalog (fallback and review).
    pub unrecognized_occupations: usize,
    pub total_amount: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IssueKind {
    MissingPrice(MissingPrice),
    OccupationFallback { label: String, used: String },
    OccupationReview { label: String },
    GenderUndetermined { label: String, used: String },
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingPrice(missing) => write!(f, "price missing: {missing}"),
            Self::OccupationFallback { label, used } => {
                write!(f, "occupation '{label}' not recognized, priced as {used}")
            }
            Self::OccupationReview { label } => {
                write!(f, "occupation '{label}' not recognized, needs review")
            }
            Self::GenderUndetermined { label, used } => {
                write!(f, "gender undetermined for '{label}', priced as {used}")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    pub store: String,
    pub row_number: usize,
    pub full_name: String,
    #[serde(flatten)]
    pub kind: IssueKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SheetWarning {
    pub sheet: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputFailure {
    pub store: String,
    pub kind: String,
    pub message: String,
}

/// Row, sheet and output problems collected over a run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub summary: BatchSummary,
    pub issues: Vec<Issue>,
    pub sheet_warnings: Vec<SheetWarning>,
    pub skipped_sheets: Vec<SheetWarning>,
    pub failed_outputs: Vec<OutputFailure>,
    pub documents_written: usize,
    pub combined_written: usize,
}

impl BatchReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a record and collect its issues.
    pub fn record(&mut self, record: &PersonRecord) {
        let summary = &mut self.summary;
        summary.records += 1;
        summary.total_amount += record.total.amount;
        match record.status() {
            RecordStatus::FullyPriced => summary.fully_priced += 1,
            RecordStatus::PartiallyPriced => summary.partially_priced += 1,
            RecordStatus::Review => summary.review += 1,
        }
        if record.is_unrecognized() {
            summary.unrecognized_occupations += 1;
        }

        let used = record.occupation.clone().unwrap_or_default();
        let label = record.raw_occupation.clone();
        let occupation_issue = match &record.outcome {
            OccupationOutcome::Fallback => Some(IssueKind::OccupationFallback { label, used }),
            OccupationOutcome::Review => Some(IssueKind::OccupationReview { label }),
            OccupationOutcome::Gendered { gender: None } => {
                Some(IssueKind::GenderUndetermined { label, used })
            }
            OccupationOutcome::Recognized | OccupationOutcome::Gendered { .. } => None,
        };

        let kinds = occupation_issue.into_iter().chain(
            record
                .total
                .missing
                .iter()
                .cloned()
                .map(IssueKind::MissingPrice),
        );
        for kind in kinds {
            self.issues.push(Issue {
                store: record.store.clone(),
                row_number: record.row_number,
                full_name: record.full_name.clone(),
                kind,
            });
        }
    }

    pub fn sheet_warning(&mut self, sheet: impl Into<String>, message: impl Into<String>) {
        self.sheet_warnings.push(SheetWarning {
            sheet: sheet.into(),
            message: message.into(),
        });
    }

    pub fn skip_sheet(&mut self, sheet: impl Into<String>, reason: impl Into<String>) {
        self.skipped_sheets.push(SheetWarning {
            sheet: sheet.into(),
            message: reason.into(),
        });
    }

    pub fn output_failure(&mut self, store: impl Into<String>, kind: impl Into<String>, message: impl Into<String>) {
        self.failed_outputs.push(OutputFailure {
            store: store.into(),
            kind: kind.into(),
            message: message.into(),
        });
    }

    /// Missing prices, review rows or failed outputs.
    pub fn has_issues(&self) -> bool {
        self.summary.partially_priced > 0 || self.summary.review > 0 || !self.failed_outputs.is_empty()
    }
}

/// Compute summary statistics for a set of records.
pub fn compute_summary(records: &[PersonRecord]) -> BatchSummary {
    let mut report = BatchReport::new();
    for r in records {
        report.record(r);
    }
    report.summary
}
