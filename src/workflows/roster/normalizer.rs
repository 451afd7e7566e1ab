use super::parser::RawRow;
use crate::workflows::seating::domain::{Invigilator, Room, Student, Subject};
use std::fmt;

/// Why a row did not become an entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum RowRejection {
    MissingField(&'static str),
    InvalidNumber { field: &'static str, value: String },
}

impl fmt::Display for RowRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowRejection::MissingField(field) => write!(f, "{field} is blank"),
            RowRejection::InvalidNumber { field, value } => {
                write!(f, "{field} '{value}' is not a valid whole number")
            }
        }
    }
}

/// A room row, still carrying the number of the building it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomRecord {
    pub building_number: u32,
    pub room: Room,
}

/// Maps year text to 1-4 (0 when unknown).
///
/// Word codes are tried first (`FE`, `SE`, `TE`, `BE`, or anything starting with
/// the same letters); a plain integer always overrides the word guess.
pub fn normalize_year(raw: &str) -> i32 {
    let trimmed = raw.trim();
    let upper = trimmed.to_uppercase();

    let guess = if upper.starts_with('F') {
        1
    } else if upper.starts_with('S') && upper.contains('E') {
        2
    } else if upper.starts_with('T') {
        3
    } else if upper.starts_with('B') {
        4
    } else {
        0
    };

    trimmed.parse::<i32>().unwrap_or(guess)
}

fn required<'a>(row: &'a RawRow, index: usize, field: &'static str) -> Result<&'a str, RowRejection> {
    let value = row.field(index);
    if value.is_empty() {
        Err(RowRejection::MissingField(field))
    } else {
        Ok(value)
    }
}

fn whole_number(value: &str, field: &'static str) -> Result<u32, RowRejection> {
    value.parse::<u32>().map_err(|_| RowRejection::InvalidNumber {
        field,
        value: value.to_string(),
    })
}

/// Columns: PRN, name, branch, year.
pub(crate) fn student_from_row(row: &RawRow) -> Result<Student, RowRejection> {
    let prn = required(row, 0, "PRN")?;
    let name = required(row, 1, "name")?;

    Ok(Student {
        name: name.to_string(),
        prn: prn.to_string(),
        branch: row.field(2).to_string(),
        year: normalize_year(row.field(3)),
    })
}

/// Negative counts still describe a room; it just seats nobody.
fn bench_count(value: &str) -> Result<u32, RowRejection> {
    if value.is_empty() {
        return Ok(0);
    }
    let count = value.parse::<i32>().map_err(|_| RowRejection::InvalidNumber {
        field: "bench count",
        value: value.to_string(),
    })?;
    Ok(count.max(0).unsigned_abs())
}

/// Columns: building number, room number, bench count (blank or negative means zero).
pub(crate) fn room_from_row(row: &RawRow) -> Result<RoomRecord, RowRejection> {
    let building = required(row, 0, "building number")?;
    let room = required(row, 1, "room number")?;

    let building_number = whole_number(building, "building number")?;
    let room_number = whole_number(room, "room number")?;
    let benches = bench_count(row.field(2))?;

    Ok(RoomRecord {
        building_number,
        room: Room::new(room_number, benches),
    })
}

/// Columns: name, branch type, exam date, year, duration.
pub(crate) fn subject_from_row(row: &RawRow) -> Result<Subject, RowRejection> {
    let name = required(row, 0, "subject name")?;

    Ok(Subject {
        name: name.to_string(),
        branch_type: row.field(1).to_string(),
        exam_date: row.field(2).to_string(),
        year: normalize_year(row.field(3)),
        duration: row.field(4).to_string(),
    })
}

/// Columns: name, department.
pub(crate) fn invigilator_from_row(row: &RawRow) -> Result<Invigilator, RowRejection> {
    let name = required(row, 0, "invigilator name")?;

    Ok(Invigilator {
        name: name.to_string(),
        department: row.field(1).to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::super::parser::parse_rows;
    use super::*;
    use std::io::Cursor;

    fn single_row(csv: &str) -> RawRow {
        parse_rows(Cursor::new(csv))
            .expect("parse")
            .pop()
            .expect("one row")
    }

    #[test]
    fn year_word_codes() {
        assert_eq!(normalize_year("FE"), 1);
        assert_eq!(normalize_year("SE"), 2);
        assert_eq!(normalize_year("TE"), 3);
        assert_eq!(normalize_year("BE"), 4);
        assert_eq!(normalize_year("first year"), 1);
        assert_eq!(normalize_year("Second"), 2);
        assert_eq!(normalize_year("S"), 0);
        assert_eq!(normalize_year(""), 0);
        assert_eq!(normalize_year("ME"), 0);
    }

    #[test]
    fn numeric_year_overrides_word_guess() {
        assert_eq!(normalize_year("3"), 3);
        assert_eq!(normalize_year(" 2 "), 2);
        assert_eq!(normalize_year("7"), 7);
        assert_eq!(normalize_year("3rd"), 0);
    }

    #[test]
    fn student_columns_and_blank_drop() {
        let row = single_row("PRN,Name,Branch,Year\n72001,Asha Patil,Computer Science,TE\n");
        let student = student_from_row(&row).expect("student");
        assert_eq!(student.prn, "72001");
        assert_eq!(student.name, "Asha Patil");
        assert_eq!(student.branch, "Computer Science");
        assert_eq!(student.year, 3);

        let nameless = single_row("PRN,Name,Branch,Year\n72002,,Civil,FE\n");
        assert_eq!(
            student_from_row(&nameless),
            Err(RowRejection::MissingField("name"))
        );
    }

    #[test]
    fn room_row_parses_numbers() {
        let row = single_row("Building,Room,Benches\n2,204,30\n");
        let record = room_from_row(&row).expect("room");
        assert_eq!(record.building_number, 2);
        assert_eq!(record.room.number(), 204);
        assert_eq!(record.room.benches(), 30);

        let no_benches = single_row("Building,Room,Benches\n2,205\n");
        assert_eq!(room_from_row(&no_benches).expect("room").room.benches(), 0);

        let bad = single_row("Building,Room,Benches\nA,205,10\n");
        assert!(matches!(
            room_from_row(&bad),
            Err(RowRejection::InvalidNumber { field: "building number", .. })
        ));

        let negative = single_row("Building,Room,Benches\n1,205,-4\n");
        let record = room_from_row(&negative).expect("room kept");
        assert_eq!(record.room.number(), 205);
        assert_eq!(record.room.benches(), 0);

        let words = single_row("Building,Room,Benches\n1,206,ten\n");
        assert!(matches!(
            room_from_row(&words),
            Err(RowRejection::InvalidNumber { field: "bench count", .. })
        ));
    }

    #[test]
    fn subject_and_invigilator_rows() {
        let row = single_row(
            "Name,Type,Date,Year,Duration\nSurveying,Civil Engineering,12-05-2025 0.00,SE,3 Hours\n",
        );
        let subject = subject_from_row(&row).expect("subject");
        assert_eq!(subject.branch_type, "Civil Engineering");
        assert_eq!(subject.year, 2);
        assert_eq!(subject.duration, "3 Hours");

        let row = single_row("Name,Department\nDr. Joshi\n");
        let invigilator = invigilator_from_row(&row).expect("invigilator");
        assert_eq!(invigilator.department, "");
    }
}
