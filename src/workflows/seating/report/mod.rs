mod builder;
pub mod render;
pub mod views;

pub use builder::{build_branch_report, build_common_report};
pub use render::{ReportFormat, ReportOutcome, ReportWriteError, ReportWriter};
pub use views::{
    BranchReportView, BranchSectionView, CommonReportView, ReportMode, ReportView,
    RoomRosterView, StudentRowView, SubjectEntryView,
};
