use serde::Serialize;

pub const COMMON_REPORT_TITLE: &str = "Exam Hall Allocation — Common Subjects";
pub const BRANCH_REPORT_TITLE: &str = "Exam Hall Allocation — Branch Only Subjects";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportMode {
    Common,
    BranchSpecific,
}

impl ReportMode {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Common => "Common Subjects",
            Self::BranchSpecific => "Branch Only Subjects",
        }
    }

    pub const fn file_stem(self) -> &'static str {
        match self {
            Self::Common => "ExamAllocation-Common-Subjects",
            Self::BranchSpecific => "ExamAllocation-Branch-Only-Subjects",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubjectEntryView {
    pub name: String,
    pub duration: String,
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StudentRowView {
    pub name: String,
    pub prn: String,
    pub branch: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoomRosterView {
    pub building_number: u32,
    pub room_number: u32,
    pub invigilator: Option<String>,
    pub students: Vec<StudentRowView>,
}

impl RoomRosterView {
    pub fn invigilator_label(&self) -> &str {
        self.invigilator.as_deref().unwrap_or("N/A")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommonReportView {
    pub title: String,
    pub subjects: Vec<SubjectEntryView>,
    pub rooms: Vec<RoomRosterView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BranchSectionView {
    pub branch: String,
    pub subjects: Vec<SubjectEntryView>,
    /// Only rooms holding at least one student of this branch.
    pub rooms: Vec<RoomRosterView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BranchReportView {
    pub title: String,
    pub branches: Vec<BranchSectionView>,
}

/// Either report, as handed to the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ReportView {
    Common(CommonReportView),
    BranchSpecific(BranchReportView),
}

impl ReportView {
    pub fn mode(&self) -> ReportMode {
        match self {
            Self::Common(_) => ReportMode::Common,
            Self::BranchSpecific(_) => ReportMode::BranchSpecific,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Self::Common(view) => &view.title,
            Self::BranchSpecific(view) => &view.title,
        }
    }
}
