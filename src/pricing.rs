// Price computation for a stay

use crate::booking::RoomType;

pub const PER_DAY: f64 = 100.0;
pub const ADULT_RATE: f64 = 75.0;
pub const CHILD_RATE: f64 = 35.0;

// Fixed surcharge added once per booking depending on the room
pub fn room_surcharge(room_type: RoomType) -> f64 {
    match room_type {
        RoomType::Standard => 150.0,
        RoomType::Delux => 200.0,
        RoomType::Suite => 250.0,
    }
}

/// Total charge for a stay. No rounding is applied; formatting is left to the caller.
pub fn compute_total(days: u32, adults: u32, children: u32, room_type: RoomType) -> f64 {
    f64::from(days) * PER_DAY
        + f64::from(adults) * ADULT_RATE
        + f64::from(children) * CHILD_RATE
        + room_surcharge(room_type)
}
