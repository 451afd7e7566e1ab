use super::domain::{ExamHall, Invigilator, Student};
use super::facility::Facility;
use serde::Serialize;
use tracing::{info, warn};

/// Counts describing one allocation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AllocationSummary {
    pub rooms_visited: usize,
    pub total_capacity: usize,
    pub students_seated: usize,
    pub students_unallocated: usize,
    pub halls_without_invigilator: usize,
    pub spare_invigilators: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Allocation {
    halls: Vec<ExamHall>,
    unallocated: Vec<Student>,
    spare_invigilators: Vec<Invigilator>,
    total_capacity: usize,
}

impl Allocation {
    pub fn halls(&self) -> &[ExamHall] {
        &self.halls
    }

    /// Students left over once every bench was taken, in input order.
    pub fn unallocated(&self) -> &[Student] {
        &self.unallocated
    }

    pub fn spare_invigilators(&self) -> &[Invigilator] {
        &self.spare_invigilators
    }

    /// Every student handed to [`allocate`], in input order.
    pub fn students(&self) -> impl Iterator<Item = &Student> + '_ {
        self.halls
            .iter()
            .flat_map(|hall| hall.students().iter())
            .chain(self.unallocated.iter())
    }

    pub fn seated_count(&self) -> usize {
        self.halls.iter().map(|hall| hall.students().len()).sum()
    }

    pub fn summary(&self) -> AllocationSummary {
        AllocationSummary {
            rooms_visited: self.halls.len(),
            total_capacity: self.total_capacity,
            students_seated: self.seated_count(),
            students_unallocated: self.unallocated.len(),
            halls_without_invigilator: self
                .halls
                .iter()
                .filter(|hall| hall.invigilator().is_none())
                .count(),
            spare_invigilators: self.spare_invigilators.len(),
        }
    }
}

/// Seats students building by building, room by room, in stored order.
///
/// Both the student cursor and the invigilator cursor are global and only move
/// forward. Each visited room consumes exactly one invigilator (if any remain),
/// regardless of how many students it received, and always yields an [`ExamHall`].
pub fn allocate(
    facility: Facility,
    students: Vec<Student>,
    invigilators: Vec<Invigilator>,
) -> Allocation {
    if facility.is_empty() {
        warn!("no rooms to allocate, every student stays unallocated");
    }
    let total_capacity = facility.total_capacity();
    let mut remaining_students = students.into_iter();
    let mut remaining_invigilators = invigilators.into_iter();
    let mut halls = Vec::with_capacity(facility.room_count());

    for building in facility.into_buildings() {
        let building_number = building.number();
        for mut room in building.into_rooms() {
            room.seat_from(&mut remaining_students);
            let invigilator = remaining_invigilators.next();
            halls.push(ExamHall::new(building_number, room, invigilator));
        }
    }

    let allocation = Allocation {
        halls,
        unallocated: remaining_students.collect(),
        spare_invigilators: remaining_invigilators.collect(),
        total_capacity,
    };

    let summary = allocation.summary();
    info!(
        rooms = summary.rooms_visited,
        capacity = summary.total_capacity,
        seated = summary.students_seated,
        "seating allocation complete"
    );
    if summary.students_unallocated > 0 {
        warn!(
            unallocated = summary.students_unallocated,
            "not enough benches for every student"
        );
    }
    if summary.halls_without_invigilator > 0 {
        warn!(
            halls = summary.halls_without_invigilator,
            "invigilators ran out before every room was covered"
        );
    }

    allocation
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::seating::domain::Room;

    fn students(count: usize) -> Vec<Student> {
        (1..=count)
            .map(|i| Student {
                name: format!("S{i}"),
                prn: format!("PRN{i}"),
                branch: "Mechanical".to_string(),
                year: 2,
            })
            .collect()
    }

    fn invigilators(count: usize) -> Vec<Invigilator> {
        (1..=count)
            .map(|i| Invigilator {
                name: format!("I{i}"),
                department: "Physics".to_string(),
            })
            .collect()
    }

    fn names(hall: &ExamHall) -> Vec<&str> {
        hall.students().iter().map(|s| s.name.as_str()).collect()
    }

    #[test]
    fn two_buildings_one_invigilator() {
        let facility: Facility = vec![(1, Room::new(101, 2)), (2, Room::new(201, 1))]
            .into_iter()
            .collect();

        let allocation = allocate(facility, students(4), invigilators(1));
        let halls = allocation.halls();

        assert_eq!(halls.len(), 2);
        assert_eq!(names(&halls[0]), vec!["S1", "S2"]);
        assert_eq!(halls[0].building_number(), 1);
        assert_eq!(halls[0].invigilator().map(|i| i.name.as_str()), Some("I1"));
        assert_eq!(names(&halls[1]), vec!["S3"]);
        assert!(halls[1].invigilator().is_none());

        let leftover: Vec<&str> = allocation.unallocated().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(leftover, vec!["S4"]);
    }

    #[test]
    fn no_rooms_leaves_everyone_unallocated() {
        let allocation = allocate(Facility::new(), students(3), invigilators(2));
        assert!(allocation.halls().is_empty());
        assert_eq!(allocation.unallocated().len(), 3);
        assert_eq!(allocation.spare_invigilators().len(), 2);
    }

    #[test]
    fn trailing_empty_rooms_still_consume_invigilators() {
        let facility: Facility = vec![
            (1, Room::new(1, 5)),
            (1, Room::new(2, 5)),
            (1, Room::new(3, 5)),
        ]
        .into_iter()
        .collect();

        let allocation = allocate(facility, students(3), invigilators(2));
        let halls = allocation.halls();

        assert_eq!(halls.len(), 3);
        assert_eq!(halls[0].students().len(), 3);
        assert!(halls[1].students().is_empty());
        assert_eq!(halls[1].invigilator().map(|i| i.name.as_str()), Some("I2"));
        assert!(halls[2].invigilator().is_none());

        let summary = allocation.summary();
        assert_eq!(summary.students_seated, 3);
        assert_eq!(summary.total_capacity, 15);
        assert_eq!(summary.halls_without_invigilator, 1);
        assert_eq!(summary.spare_invigilators, 0);
    }

    #[test]
    fn without_invigilators_every_hall_is_uncovered() {
        let facility: Facility = vec![(3, Room::new(1, 1)), (4, Room::new(1, 1))]
            .into_iter()
            .collect();
        let allocation = allocate(facility, students(2), Vec::new());
        assert!(allocation.halls().iter().all(|hall| hall.invigilator().is_none()));
        assert_eq!(allocation.seated_count(), 2);
    }

    #[test]
    fn seated_total_is_min_of_students_and_capacity() {
        for (student_count, benches) in [(0, 4), (3, 10), (10, 3), (7, 7)] {
            let facility: Facility = vec![(1, Room::new(1, benches))].into_iter().collect();
            let allocation = allocate(facility, students(student_count), invigilators(1));
            assert_eq!(
                allocation.seated_count(),
                student_count.min(benches as usize)
            );
            assert!(allocation
                .halls()
                .iter()
                .all(|hall| hall.students().len() <= hall.room().benches() as usize));
        }
    }

    #[test]
    fn students_come_back_in_input_order() {
        let facility: Facility = vec![(1, Room::new(101, 1)), (2, Room::new(201, 2))]
            .into_iter()
            .collect();

        let allocation = allocate(facility, students(5), invigilators(0));
        let order: Vec<&str> = allocation.students().map(|s| s.name.as_str()).collect();
        assert_eq!(order, vec!["S1", "S2", "S3", "S4", "S5"]);
    }
}
