use serde::{Deserialize, Serialize};

/// Exam candidate as read from the students table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub name: String,
    pub prn: String,
    pub branch: String,
    pub year: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub name: String,
    /// Either a branch display name or a free-form "common" marker.
    pub branch_type: String,
    pub exam_date: String,
    pub year: i32,
    pub duration: String,
}

impl Subject {
    /// Display form of the exam date. Only the literal `" 0.00"` time is rewritten.
    pub fn formatted_date(&self) -> String {
        self.exam_date.replace(" 0.00", " 09:00 AM")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invigilator {
    pub name: String,
    pub department: String,
}

/// A room inside a building with a fixed number of benches.
///
/// Students are seated in insertion order and never beyond `benches`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Room {
    number: u32,
    benches: u32,
    students: Vec<Student>,
}

impl Room {
    pub fn new(number: u32, benches: u32) -> Self {
        Self {
            number,
            benches,
            students: Vec::new(),
        }
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn benches(&self) -> u32 {
        self.benches
    }

    pub fn students(&self) -> &[Student] {
        &self.students
    }

    pub fn free_benches(&self) -> usize {
        (self.benches as usize).saturating_sub(self.students.len())
    }

    /// Seats students from `candidates` until the room is full or the iterator runs dry.
    /// Returns how many were seated by this call.
    pub(crate) fn seat_from<I>(&mut self, candidates: &mut I) -> usize
    where
        I: Iterator<Item = Student>,
    {
        let before = self.students.len();
        let free = self.free_benches();
        self.students.extend(candidates.by_ref().take(free));
        self.students.len() - before
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Building {
    number: u32,
    rooms: Vec<Room>,
}

impl Building {
    pub fn new(number: u32) -> Self {
        Self {
            number,
            rooms: Vec::new(),
        }
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn add_room(&mut self, room: Room) {
        self.rooms.push(room);
    }

    pub fn capacity(&self) -> usize {
        self.rooms.iter().map(|room| room.benches() as usize).sum()
    }

    pub(crate) fn into_rooms(self) -> Vec<Room> {
        self.rooms
    }
}

/// One visited room paired with at most one invigilator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExamHall {
    building_number: u32,
    room: Room,
    invigilator: Option<Invigilator>,
}

impl ExamHall {
    pub(crate) fn new(building_number: u32, room: Room, invigilator: Option<Invigilator>) -> Self {
        Self {
            building_number,
            room,
            invigilator,
        }
    }

    pub fn building_number(&self) -> u32 {
        self.building_number
    }

    pub fn room(&self) -> &Room {
        &self.room
    }

    pub fn invigilator(&self) -> Option<&Invigilator> {
        self.invigilator.as_ref()
    }

    pub fn students(&self) -> &[Student] {
        self.room.students()
    }
}
