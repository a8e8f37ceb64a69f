//! Hostel rooms and allocations with occupancy aggregation.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomStatus {
    Available,
    Occupied,
    Maintenance,
}

#[derive(Debug, Clone, Serialize)]
pub struct HostelRoom {
    pub id: String,
    pub room_number: String,
    pub block: String,
    pub floor: u8,
    pub capacity: u32,
    pub current_occupancy: u32,
    pub status: RoomStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllocationStatus {
    Active,
    CheckedOut,
}

#[derive(Debug, Clone, Serialize)]
pub struct HostelAllocation {
    pub id: String,
    pub student_id: String,
    pub room_id: String,
    pub check_in_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_out_date: Option<String>,
    pub status: AllocationStatus,
}

static ROOMS: Lazy<Vec<HostelRoom>> = Lazy::new(|| {
    let room = |id: &str, number: &str, block: &str, floor, capacity, occ, status| HostelRoom {
        id: id.into(),
        room_number: number.into(),
        block: block.into(),
        floor,
        capacity,
        current_occupancy: occ,
        status,
    };
    vec![
        room("r1", "A-101", "A", 1, 3, 3, RoomStatus::Occupied),
        room("r2", "A-102", "A", 1, 3, 2, RoomStatus::Available),
        room("r3", "A-201", "A", 2, 2, 0, RoomStatus::Maintenance),
        room("r4", "B-101", "B", 1, 3, 3, RoomStatus::Occupied),
        room("r5", "B-102", "B", 1, 2, 1, RoomStatus::Available),
    ]
});

static ALLOCATIONS: Lazy<Vec<HostelAllocation>> = Lazy::new(|| {
    let alloc = |id: &str, sid: &str, rid: &str, check_in: &str| HostelAllocation {
        id: id.into(),
        student_id: sid.into(),
        room_id: rid.into(),
        check_in_date: check_in.into(),
        check_out_date: None,
        status: AllocationStatus::Active,
    };
    vec![
        alloc("h1", "MAT2024001", "r1", "2023-08-05"),
        alloc("h2", "MAT2024002", "r2", "2023-08-05"),
        HostelAllocation {
            check_out_date: Some("2024-04-30".into()),
            status: AllocationStatus::CheckedOut,
            ..alloc("h3", "MAT2023014", "r4", "2023-08-06")
        },
    ]
});

pub fn rooms() -> &'static [HostelRoom] {
    &ROOMS
}

pub fn allocations() -> &'static [HostelAllocation] {
    &ALLOCATIONS
}

pub fn allocation_for(student_id: &str) -> Option<&'static HostelAllocation> {
    ALLOCATIONS
        .iter()
        .find(|a| a.student_id == student_id && a.status == AllocationStatus::Active)
}

pub fn available_rooms() -> Vec<&'static HostelRoom> {
    ROOMS
        .iter()
        .filter(|r| r.status == RoomStatus::Available && r.current_occupancy < r.capacity)
        .collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OccupancyStats {
    pub total_capacity: u32,
    pub total_occupancy: u32,
    /// Integer percentage, rounded down. Rooms under maintenance still count
    /// toward capacity.
    pub occupancy_rate: u32,
}

pub fn occupancy() -> OccupancyStats {
    let (capacity, occupancy) = ROOMS
        .iter()
        .fold((0u32, 0u32), |(c, o), r| (c + r.capacity, o + r.current_occupancy));
    OccupancyStats {
        total_capacity: capacity,
        total_occupancy: occupancy,
        occupancy_rate: if capacity == 0 { 0 } else { occupancy * 100 / capacity },
    }
}
