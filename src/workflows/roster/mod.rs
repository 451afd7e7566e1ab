mod normalizer;
mod parser;

use crate::workflows::seating::domain::{Invigilator, Student, Subject};
use crate::workflows::seating::facility::Facility;
use serde::Serialize;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};

use normalizer::RowRejection;
use parser::RawRow;

pub use normalizer::{normalize_year, RoomRecord};

#[derive(Debug)]
pub enum RosterImportError {
    Io(std::io::Error),
    Csv(csv::Error),
}

impl std::fmt::Display for RosterImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RosterImportError::Io(err) => write!(f, "failed to read roster table: {}", err),
            RosterImportError::Csv(err) => write!(f, "invalid roster CSV data: {}", err),
        }
    }
}

impl std::error::Error for RosterImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RosterImportError::Io(err) => Some(err),
            RosterImportError::Csv(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for RosterImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for RosterImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// The four input tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RosterTable {
    Students,
    Buildings,
    Subjects,
    Invigilators,
}

impl RosterTable {
    pub const fn ordered() -> [Self; 4] {
        [
            Self::Students,
            Self::Buildings,
            Self::Subjects,
            Self::Invigilators,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Students => "Students",
            Self::Buildings => "Buildings",
            Self::Subjects => "Subjects",
            Self::Invigilators => "Invigilators",
        }
    }
}

/// Entities read from one table plus the number of rows that were dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableLoad<T> {
    pub records: Vec<T>,
    pub skipped: usize,
}

impl<T> Default for TableLoad<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            skipped: 0,
        }
    }
}

impl TableLoad<RoomRecord> {
    pub fn into_facility(self) -> Facility {
        self.records
            .into_iter()
            .map(|record| (record.building_number, record.room))
            .collect()
    }
}

pub struct RosterImporter;

impl RosterImporter {
    pub fn students_from_path<P: AsRef<Path>>(
        path: P,
    ) -> Result<TableLoad<Student>, RosterImportError> {
        let file = std::fs::File::open(path)?;
        Self::students_from_reader(file)
    }

    pub fn students_from_reader<R: Read>(
        reader: R,
    ) -> Result<TableLoad<Student>, RosterImportError> {
        load_table(reader, RosterTable::Students, normalizer::student_from_row)
    }

    pub fn buildings_from_path<P: AsRef<Path>>(
        path: P,
    ) -> Result<TableLoad<RoomRecord>, RosterImportError> {
        let file = std::fs::File::open(path)?;
        Self::buildings_from_reader(file)
    }

    pub fn buildings_from_reader<R: Read>(
        reader: R,
    ) -> Result<TableLoad<RoomRecord>, RosterImportError> {
        load_table(reader, RosterTable::Buildings, normalizer::room_from_row)
    }

    pub fn subjects_from_path<P: AsRef<Path>>(
        path: P,
    ) -> Result<TableLoad<Subject>, RosterImportError> {
        let file = std::fs::File::open(path)?;
        Self::subjects_from_reader(file)
    }

    pub fn subjects_from_reader<R: Read>(
        reader: R,
    ) -> Result<TableLoad<Subject>, RosterImportError> {
        load_table(reader, RosterTable::Subjects, normalizer::subject_from_row)
    }

    pub fn invigilators_from_path<P: AsRef<Path>>(
        path: P,
    ) -> Result<TableLoad<Invigilator>, RosterImportError> {
        let file = std::fs::File::open(path)?;
        Self::invigilators_from_reader(file)
    }

    pub fn invigilators_from_reader<R: Read>(
        reader: R,
    ) -> Result<TableLoad<Invigilator>, RosterImportError> {
        load_table(
            reader,
            RosterTable::Invigilators,
            normalizer::invigilator_from_row,
        )
    }
}

fn load_table<R, T>(
    reader: R,
    table: RosterTable,
    convert: fn(&RawRow) -> Result<T, RowRejection>,
) -> Result<TableLoad<T>, RosterImportError>
where
    R: Read,
{
    let mut load = TableLoad::default();

    for row in parser::parse_rows(reader)? {
        match convert(&row) {
            Ok(record) => load.records.push(record),
            Err(rejection @ RowRejection::MissingField(_)) => {
                debug!(table = table.label(), line = row.line(), %rejection, "row dropped");
                load.skipped += 1;
            }
            Err(rejection) => {
                warn!(table = table.label(), line = row.line(), %rejection, "row dropped");
                load.skipped += 1;
            }
        }
    }

    info!(
        table = table.label(),
        rows = load.records.len(),
        skipped = load.skipped,
        "roster table loaded"
    );
    Ok(load)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn students_skip_rows_missing_name_or_prn() {
        let csv = "PRN,Name,Branch,Year\n\
72001,Asha Patil,Computer Science,FE\n\
,No Prn,Civil,SE\n\
72003,,Civil,SE\n\
72004,Dev Shah,Civil,2\n";
        let load = RosterImporter::students_from_reader(Cursor::new(csv)).expect("import");

        let prns: Vec<&str> = load.records.iter().map(|s| s.prn.as_str()).collect();
        assert_eq!(prns, vec!["72001", "72004"]);
        assert_eq!(load.skipped, 2);
    }

    #[test]
    fn buildings_collect_into_facility() {
        let csv = "Building,Room,Benches\n1,101,20\n2,201,10\n1,102,15\nX,1,1\n";
        let load = RosterImporter::buildings_from_reader(Cursor::new(csv)).expect("import");
        assert_eq!(load.skipped, 1);

        let facility = load.into_facility();
        assert_eq!(facility.buildings().len(), 2);
        assert_eq!(facility.buildings()[0].rooms().len(), 2);
        assert_eq!(facility.total_capacity(), 45);
    }

    #[test]
    fn subjects_and_invigilators_require_names() {
        let subjects = RosterImporter::subjects_from_reader(Cursor::new(
            "Name,Type,Date,Year,Duration\nPhysics,Common,10-05-2025 0.00,FE,3 Hours\n,Common,,,\n",
        ))
        .expect("import");
        assert_eq!(subjects.records.len(), 1);
        assert_eq!(subjects.skipped, 1);

        let invigilators = RosterImporter::invigilators_from_reader(Cursor::new(
            "Name,Department\nDr. Joshi,Physics\n,Maths\n",
        ))
        .expect("import");
        assert_eq!(invigilators.records.len(), 1);
        assert_eq!(invigilators.skipped, 1);
    }

    #[test]
    fn invalid_utf8_row_keeps_its_neighbours() {
        let mut csv = b"PRN,Name,Branch,Year\n1,Good One,Civil,FE\n2,Bad ".to_vec();
        csv.push(0xff);
        csv.extend_from_slice(b" Name,Civil,FE\n3,Good Two,Civil,FE\n");

        let load = RosterImporter::students_from_reader(Cursor::new(csv)).expect("import");

        let prns: Vec<&str> = load.records.iter().map(|s| s.prn.as_str()).collect();
        assert_eq!(prns, vec!["1", "2", "3"]);
        assert_eq!(load.skipped, 0);
        assert!(load.records[1].name.contains('\u{FFFD}'));
    }

    #[test]
    fn spaced_quoted_name_stays_in_one_column() {
        let csv = "PRN,Name,Branch,Year\n\
72000,Dev Shah,Civil,SE\n\
72001, \"Patil, Asha\",Computer Science,FE\n\
72002,Rao Chitra,Civil,TE\n";
        let load = RosterImporter::students_from_reader(Cursor::new(csv)).expect("import");

        assert_eq!(load.records.len(), 3);
        let asha = &load.records[1];
        assert_eq!(asha.name, "Patil, Asha");
        assert_eq!(asha.branch, "Computer Science");
        assert_eq!(asha.year, 1);
        assert_eq!(load.records[2].year, 3);
    }

    #[test]
    fn odd_building_rows_mid_table() {
        let csv = "Building,Room,Benches\n1,100,-1\n1,101,5\nX,102,5\n2,201,\n2,202,3\n";
        let load = RosterImporter::buildings_from_reader(Cursor::new(csv)).expect("import");

        let rooms: Vec<(u32, u32, u32)> = load
            .records
            .iter()
            .map(|record| (record.building_number, record.room.number(), record.room.benches()))
            .collect();
        assert_eq!(
            rooms,
            vec![(1, 100, 0), (1, 101, 5), (2, 201, 0), (2, 202, 3)]
        );
        assert_eq!(load.skipped, 1);
    }

    #[test]
    fn negative_bench_room_still_takes_an_invigilator() {
        use crate::workflows::seating::allocate;

        let rooms = RosterImporter::buildings_from_reader(Cursor::new(
            "Building,Room,Benches\n1,100,-1\n1,101,5\n",
        ))
        .expect("import");
        let invigilators = RosterImporter::invigilators_from_reader(Cursor::new(
            "Name,Department\nI1,Physics\nI2,Maths\n",
        ))
        .expect("import");

        let allocation = allocate(rooms.into_facility(), Vec::new(), invigilators.records);
        let halls: Vec<(u32, Option<&str>)> = allocation
            .halls()
            .iter()
            .map(|hall| {
                (
                    hall.room().number(),
                    hall.invigilator().map(|i| i.name.as_str()),
                )
            })
            .collect();
        assert_eq!(halls, vec![(100, Some("I1")), (101, Some("I2"))]);
    }

    #[test]
    fn from_path_propagates_io_errors() {
        let error = RosterImporter::students_from_path("./does-not-exist.csv")
            .expect_err("expected io error");

        match error {
            RosterImportError::Io(_) => {}
            other => panic!("expected io error, got {other:?}"),
        }
    }
}
