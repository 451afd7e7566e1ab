use super::views::{
    BranchReportView, BranchSectionView, CommonReportView, RoomRosterView, StudentRowView,
    SubjectEntryView, BRANCH_REPORT_TITLE, COMMON_REPORT_TITLE,
};
use crate::workflows::seating::catalog::{BranchSubjects, SubjectCatalog};
use crate::workflows::seating::domain::{ExamHall, Student, Subject};

impl SubjectEntryView {
    fn from_subject(subject: &Subject) -> Self {
        Self {
            name: subject.name.clone(),
            duration: subject.duration.clone(),
            date: subject.formatted_date(),
        }
    }
}

impl StudentRowView {
    fn from_student(student: &Student) -> Self {
        Self {
            name: student.name.clone(),
            prn: student.prn.clone(),
            branch: student.branch.clone(),
        }
    }
}

fn roster<'a, I>(hall: &ExamHall, students: I) -> RoomRosterView
where
    I: IntoIterator<Item = &'a Student>,
{
    RoomRosterView {
        building_number: hall.building_number(),
        room_number: hall.room().number(),
        invigilator: hall.invigilator().map(|inv| inv.name.clone()),
        students: students.into_iter().map(StudentRowView::from_student).collect(),
    }
}

/// Every common subject followed by the full roster of every hall, empty halls included.
pub fn build_common_report(halls: &[ExamHall], common_subjects: &[Subject]) -> CommonReportView {
    CommonReportView {
        title: COMMON_REPORT_TITLE.to_string(),
        subjects: common_subjects
            .iter()
            .map(SubjectEntryView::from_subject)
            .collect(),
        rooms: halls.iter().map(|hall| roster(hall, hall.students())).collect(),
    }
}

/// One section per catalog branch, in catalog order.
pub fn build_branch_report(
    halls: &[ExamHall],
    branch_only_subjects: &[Subject],
    catalog: &SubjectCatalog,
) -> BranchReportView {
    BranchReportView {
        title: BRANCH_REPORT_TITLE.to_string(),
        branches: catalog
            .branches
            .iter()
            .map(|branch| branch_section(halls, branch_only_subjects, branch))
            .collect(),
    }
}

fn branch_section(
    halls: &[ExamHall],
    branch_only_subjects: &[Subject],
    branch: &BranchSubjects,
) -> BranchSectionView {
    let branch_key = branch.branch.to_lowercase();
    let branch_key = branch_key.as_str();
    let subjects = branch
        .subjects
        .iter()
        .flat_map(|name| {
            branch_only_subjects.iter().filter(move |subject| {
                subject.name == *name && subject.branch_type.to_lowercase() == branch_key
            })
        })
        .map(SubjectEntryView::from_subject)
        .collect();

    let rooms = halls
        .iter()
        .filter_map(|hall| {
            let matching: Vec<&Student> = hall
                .students()
                .iter()
                .filter(|student| branch.matches_student_branch(&student.branch))
                .collect();
            if matching.is_empty() {
                None
            } else {
                Some(roster(hall, matching))
            }
        })
        .collect();

    BranchSectionView {
        branch: branch.branch.clone(),
        subjects,
        rooms,
    }
}
