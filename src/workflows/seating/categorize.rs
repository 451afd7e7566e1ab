use super::catalog::SubjectCatalog;
use super::domain::Subject;
use serde::Serialize;
use tracing::debug;

/// Complete, order-preserving split of the subject list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SubjectPartition {
    pub common: Vec<Subject>,
    pub branch_only: Vec<Subject>,
}

/// Splits `subjects` by whether the catalog lists their name as common.
///
/// The branch-type tag on each subject plays no part here.
pub fn categorize(subjects: &[Subject], catalog: &SubjectCatalog) -> SubjectPartition {
    let (common, branch_only): (Vec<Subject>, Vec<Subject>) = subjects
        .iter()
        .cloned()
        .partition(|subject| catalog.is_common(&subject.name));

    debug!(
        common = common.len(),
        branch_only = branch_only.len(),
        "subjects categorized"
    );

    SubjectPartition {
        common,
        branch_only,
    }
}
