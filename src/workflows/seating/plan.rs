use super::allocation::{allocate, Allocation, AllocationSummary};
use super::catalog::SubjectCatalog;
use super::categorize::{categorize, SubjectPartition};
use super::report::{
    build_branch_report, build_common_report, BranchReportView, CommonReportView, ReportOutcome,
    ReportView, ReportWriter,
};
use crate::workflows::roster::{RosterImportError, RosterImporter, RosterTable, TableLoad};
use serde::Serialize;
use std::borrow::Cow;
use std::path::PathBuf;
use tracing::error;

/// Where a roster table comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableSource {
    Path(PathBuf),
    /// CSV text, header row included.
    Inline(String),
}

impl TableSource {
    fn bytes(&self) -> Result<Cow<'_, [u8]>, RosterImportError> {
        match self {
            TableSource::Path(path) => Ok(Cow::Owned(std::fs::read(path)?)),
            TableSource::Inline(text) => Ok(Cow::Borrowed(text.as_bytes())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeatingSources {
    pub students: TableSource,
    pub buildings: TableSource,
    pub subjects: TableSource,
    pub invigilators: TableSource,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TableStatus {
    Loaded { rows: usize, skipped: usize },
    Failed { error: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableOutcome {
    pub table: RosterTable,
    #[serde(flatten)]
    pub status: TableStatus,
}

impl TableOutcome {
    pub fn is_loaded(&self) -> bool {
        matches!(self.status, TableStatus::Loaded { .. })
    }
}

/// Everything one run produces, before any report is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeatingRunResult {
    pub tables: Vec<TableOutcome>,
    pub allocation: Allocation,
    pub subjects: SubjectPartition,
    pub common_report: CommonReportView,
    pub branch_report: BranchReportView,
}

impl SeatingRunResult {
    pub fn summary(&self) -> AllocationSummary {
        self.allocation.summary()
    }

    pub fn table(&self, table: RosterTable) -> Option<&TableOutcome> {
        self.tables.iter().find(|outcome| outcome.table == table)
    }

    pub fn report_views(&self) -> [ReportView; 2] {
        [
            ReportView::Common(self.common_report.clone()),
            ReportView::BranchSpecific(self.branch_report.clone()),
        ]
    }

    /// Writes both reports; a failure in one does not prevent the other.
    pub fn write_reports(&self, writer: &ReportWriter) -> Vec<ReportOutcome> {
        self.report_views()
            .iter()
            .map(|view| writer.write(view))
            .collect()
    }
}

pub struct SeatingRun;

impl SeatingRun {
    /// Loads the four tables, allocates seats, and builds both report views.
    ///
    /// A table that cannot be read is treated as empty and recorded as failed.
    pub fn execute(sources: &SeatingSources, catalog: &SubjectCatalog) -> SeatingRunResult {
        let mut tables = Vec::with_capacity(4);

        let students = load_or_empty(
            RosterTable::Students,
            &sources.students,
            &mut tables,
            |bytes| RosterImporter::students_from_reader(bytes),
        );
        let rooms = load_or_empty(
            RosterTable::Buildings,
            &sources.buildings,
            &mut tables,
            |bytes| RosterImporter::buildings_from_reader(bytes),
        );
        let subjects = load_or_empty(
            RosterTable::Subjects,
            &sources.subjects,
            &mut tables,
            |bytes| RosterImporter::subjects_from_reader(bytes),
        );
        let invigilators = load_or_empty(
            RosterTable::Invigilators,
            &sources.invigilators,
            &mut tables,
            |bytes| RosterImporter::invigilators_from_reader(bytes),
        );

        let subjects = categorize(&subjects.records, catalog);
        let allocation = allocate(rooms.into_facility(), students.records, invigilators.records);

        let common_report = build_common_report(allocation.halls(), &subjects.common);
        let branch_report =
            build_branch_report(allocation.halls(), &subjects.branch_only, catalog);

        SeatingRunResult {
            tables,
            allocation,
            subjects,
            common_report,
            branch_report,
        }
    }
}

fn load_or_empty<T, F>(
    table: RosterTable,
    source: &TableSource,
    outcomes: &mut Vec<TableOutcome>,
    import: F,
) -> TableLoad<T>
where
    F: FnOnce(&[u8]) -> Result<TableLoad<T>, RosterImportError>,
{
    let loaded = source.bytes().and_then(|bytes| import(&bytes));
    match loaded {
        Ok(load) => {
            outcomes.push(TableOutcome {
                table,
                status: TableStatus::Loaded {
                    rows: load.records.len(),
                    skipped: load.skipped,
                },
            });
            load
        }
        Err(err) => {
            error!(
                table = table.label(),
                error = %err,
                "roster table unreadable, continuing without it"
            );
            outcomes.push(TableOutcome {
                table,
                status: TableStatus::Failed {
                    error: err.to_string(),
                },
            });
            TableLoad::default()
        }
    }
}
