use super::views::{ReportMode, ReportView, RoomRosterView, SubjectEntryView};
use serde::Serialize;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{error, info};

const PAGE_WIDTH: usize = 72;
const ROOM_SEPARATOR: &str = "--------------------------------------------------";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

impl ReportFormat {
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Text => "txt",
            Self::Json => "json",
        }
    }
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "text" | "txt" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown report format '{other}' (expected text or json)")),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ReportWriteError {
    #[error("failed to encode report as JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to write report {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result of writing one report file.
#[derive(Debug)]
pub enum ReportOutcome {
    Written { mode: ReportMode, path: PathBuf },
    Failed { mode: ReportMode, error: ReportWriteError },
}

impl ReportOutcome {
    pub fn mode(&self) -> ReportMode {
        match self {
            Self::Written { mode, .. } | Self::Failed { mode, .. } => *mode,
        }
    }

    pub fn is_written(&self) -> bool {
        matches!(self, Self::Written { .. })
    }
}

pub fn render(view: &ReportView, format: ReportFormat) -> Result<String, ReportWriteError> {
    match format {
        ReportFormat::Text => Ok(render_text(view)),
        ReportFormat::Json => Ok(serde_json::to_string_pretty(view)?),
    }
}

/// Plain-text document layout of a report view.
pub fn render_text(view: &ReportView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:^width$}", view.title(), width = PAGE_WIDTH);
    out.push('\n');

    match view {
        ReportView::Common(common) => {
            out.push_str("Subjects Included:\n");
            for (position, subject) in common.subjects.iter().enumerate() {
                let _ = writeln!(out, "{}. {}", position + 1, subject_line(subject));
            }
            out.push('\n');
            for room in &common.rooms {
                push_room(&mut out, room);
            }
        }
        ReportView::BranchSpecific(branch_view) => {
            for section in &branch_view.branches {
                let _ = writeln!(out, "{}:", section.branch);
                for subject in &section.subjects {
                    let _ = writeln!(out, "- {}", subject_line(subject));
                }
                out.push('\n');
                for room in &section.rooms {
                    push_room(&mut out, room);
                }
                out.push('\n');
            }
        }
    }

    out
}

fn subject_line(subject: &SubjectEntryView) -> String {
    format!("{} — {} — {}", subject.name, subject.duration, subject.date)
}

fn push_room(out: &mut String, room: &RoomRosterView) {
    let _ = writeln!(
        out,
        "Room {} | Invigilator: {}",
        room.room_number,
        room.invigilator_label()
    );

    let header = ["Name", "PRN", "Branch"];
    let mut widths = header.map(str::len);
    for student in &room.students {
        widths[0] = widths[0].max(student.name.chars().count());
        widths[1] = widths[1].max(student.prn.chars().count());
        widths[2] = widths[2].max(student.branch.chars().count());
    }

    push_row(out, &widths, header);
    for student in &room.students {
        push_row(
            out,
            &widths,
            [
                student.name.as_str(),
                student.prn.as_str(),
                student.branch.as_str(),
            ],
        );
    }
    out.push_str(ROOM_SEPARATOR);
    out.push('\n');
}

fn push_row(out: &mut String, widths: &[usize; 3], cells: [&str; 3]) {
    let _ = writeln!(
        out,
        "| {:<w0$} | {:<w1$} | {:<w2$} |",
        cells[0],
        cells[1],
        cells[2],
        w0 = widths[0],
        w1 = widths[1],
        w2 = widths[2],
    );
}

/// Writes report views into a directory using a fixed file name per mode.
#[derive(Debug, Clone)]
pub struct ReportWriter {
    directory: PathBuf,
    format: ReportFormat,
}

impl ReportWriter {
    pub fn new<P: Into<PathBuf>>(directory: P, format: ReportFormat) -> Self {
        Self {
            directory: directory.into(),
            format,
        }
    }

    pub fn path_for(&self, mode: ReportMode) -> PathBuf {
        self.directory
            .join(format!("{}.{}", mode.file_stem(), self.format.extension()))
    }

    /// Never fails the caller; a failed write is logged and returned as an outcome.
    pub fn write(&self, view: &ReportView) -> ReportOutcome {
        let mode = view.mode();
        let path = self.path_for(mode);
        match self.write_to(view, &path) {
            Ok(()) => {
                info!(report = mode.label(), path = %path.display(), "report generated");
                ReportOutcome::Written { mode, path }
            }
            Err(err) => {
                error!(report = mode.label(), error = %err, "report generation failed");
                ReportOutcome::Failed { mode, error: err }
            }
        }
    }

    fn write_to(&self, view: &ReportView, path: &Path) -> Result<(), ReportWriteError> {
        let body = render(view, self.format)?;
        std::fs::write(path, body).map_err(|source| ReportWriteError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}
