pub mod allocation;
pub mod catalog;
pub mod categorize;
pub mod domain;
pub mod facility;
mod plan;
pub mod report;

pub use allocation::{allocate, Allocation, AllocationSummary};
pub use catalog::{BranchSubjects, CatalogError, SubjectCatalog};
pub use categorize::{categorize, SubjectPartition};
pub use domain::{Building, ExamHall, Invigilator, Room, Student, Subject};
pub use facility::Facility;
pub use plan::{
    SeatingRun, SeatingRunResult, SeatingSources, TableOutcome, TableSource, TableStatus,
};
