use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Subjects that belong to one branch, keyed by the branch display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchSubjects {
    pub branch: String,
    pub subjects: Vec<String>,
}

impl BranchSubjects {
    fn new(branch: &str, subjects: &[&str]) -> Self {
        Self {
            branch: branch.to_string(),
            subjects: subjects.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Lowercased first word of the branch name, used to match free-text
    /// student branches ("Computer Science" -> "computer").
    pub fn match_token(&self) -> String {
        self.branch
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .to_lowercase()
    }

    pub fn matches_student_branch(&self, student_branch: &str) -> bool {
        student_branch.to_lowercase().contains(&self.match_token())
    }
}

/// Reference data driving subject categorization and the branch report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectCatalog {
    pub common_subjects: BTreeSet<String>,
    /// Catalog order is report order.
    pub branches: Vec<BranchSubjects>,
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read subject catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid subject catalog {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl SubjectCatalog {
    pub fn standard() -> Self {
        const COMMON: &[&str] = &[
            "Mathematics",
            "Physics",
            "Chemistry",
            "Engineering Mechanics",
            "Basic Electrical Engineering",
            "Computer Programming",
            "Engineering Graphics",
            "Environmental Studies",
            "Workshop Practice",
        ];

        Self {
            common_subjects: COMMON.iter().map(|s| s.to_string()).collect(),
            branches: vec![
                BranchSubjects::new("Civil Engineering", &["Structural Mechanics", "Surveying"]),
                BranchSubjects::new(
                    "Mechanical Engineering",
                    &["Thermodynamics", "Machine Design"],
                ),
                BranchSubjects::new("Electrical Engineering", &["Circuit Theory", "Power Systems"]),
                BranchSubjects::new(
                    "Information Technology",
                    &["Data Structures", "Web Technologies"],
                ),
                BranchSubjects::new(
                    "Computer Science",
                    &["Operating Systems", "Database Management Systems"],
                ),
            ],
        }
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| CatalogError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn is_common(&self, subject_name: &str) -> bool {
        self.common_subjects.contains(subject_name)
    }
}

impl Default for SubjectCatalog {
    fn default() -> Self {
        Self::standard()
    }
}
