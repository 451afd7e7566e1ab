use super::domain::{Building, Room};
use serde::Serialize;
use std::collections::HashMap;

/// Buildings in first-seen order, each owning its rooms in file order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Facility {
    buildings: Vec<Building>,
    #[serde(skip)]
    index: HashMap<u32, usize>,
}

impl Facility {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `room` to the building numbered `building_number`, creating the
    /// building on first sight. Repeated room numbers are kept as separate rooms.
    pub fn add_room(&mut self, building_number: u32, room: Room) {
        let position = match self.index.get(&building_number) {
            Some(&position) => position,
            None => {
                self.buildings.push(Building::new(building_number));
                let position = self.buildings.len() - 1;
                self.index.insert(building_number, position);
                position
            }
        };
        self.buildings[position].add_room(room);
    }

    pub fn buildings(&self) -> &[Building] {
        &self.buildings
    }

    pub fn building(&self, number: u32) -> Option<&Building> {
        self.index
            .get(&number)
            .map(|&position| &self.buildings[position])
    }

    pub fn room_count(&self) -> usize {
        self.buildings.iter().map(|b| b.rooms().len()).sum()
    }

    pub fn total_capacity(&self) -> usize {
        self.buildings.iter().map(Building::capacity).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buildings.is_empty()
    }

    pub(crate) fn into_buildings(self) -> Vec<Building> {
        self.buildings
    }
}

impl FromIterator<(u32, Room)> for Facility {
    fn from_iter<T: IntoIterator<Item = (u32, Room)>>(iter: T) -> Self {
        let mut facility = Facility::new();
        for (building_number, room) in iter {
            facility.add_room(building_number, room);
        }
        facility
    }
}
