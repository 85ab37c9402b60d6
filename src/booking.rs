// Booking records and the closed sets they draw from

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::pricing::compute_total;

// Error types for booking lookups and field parsing
#[derive(Error, Debug, PartialEq)]
pub enum BookingError {
    #[error("No booking found with ID: {0}")]
    NotFound(String),

    #[error("Booking {0} is already marked as PAID")]
    AlreadyPaid(String),

    #[error("Unknown hotel: {0}")]
    UnknownHotel(String),

    #[error("Unknown room type: {0}")]
    UnknownRoomType(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hotel {
    Seasons,
    Styn,
    WildTuin,
}

impl Hotel {
    pub const ALL: [Hotel; 3] = [Hotel::Seasons, Hotel::Styn, Hotel::WildTuin];

    pub fn name(&self) -> &'static str {
        match self {
            Hotel::Seasons => "Seasons",
            Hotel::Styn => "Styn",
            Hotel::WildTuin => "WildTuin",
        }
    }
}

impl fmt::Display for Hotel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// Matches regardless of how the user capitalized the name
impl FromStr for Hotel {
    type Err = BookingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Hotel::ALL
            .into_iter()
            .find(|hotel| hotel.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| BookingError::UnknownHotel(wanted.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoomType {
    Standard,
    Delux,
    Suite,
}

impl RoomType {
    pub const ALL: [RoomType; 3] = [RoomType::Standard, RoomType::Delux, RoomType::Suite];

    pub fn name(&self) -> &'static str {
        match self {
            RoomType::Standard => "Standard",
            RoomType::Delux => "Delux",
            RoomType::Suite => "Suite",
        }
    }

    /// Menu letter shown next to the room type when booking.
    pub fn code(&self) -> char {
        match self {
            RoomType::Standard => 'A',
            RoomType::Delux => 'B',
            RoomType::Suite => 'C',
        }
    }

    pub fn from_code(input: &str) -> Option<RoomType> {
        let input = input.trim();
        RoomType::ALL
            .into_iter()
            .find(|room| input.len() == 1 && input.eq_ignore_ascii_case(&room.code().to_string()))
    }
}

impl fmt::Display for RoomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RoomType {
    type Err = BookingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        RoomType::ALL
            .into_iter()
            .find(|room| room.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| BookingError::UnknownRoomType(wanted.to_string()))
    }
}

// A single hotel reservation.
// The total is derived from the stay parameters, so every setter that touches
// one of them recomputes it.
#[derive(Debug, Clone, PartialEq)]
pub struct Booking {
    id: String,
    name: String,
    surname: String,
    hotel: Hotel,
    days: u32,
    adults: u32,
    children: u32,
    room_type: RoomType,
    total: f64,
    paid: bool,
}

impl Booking {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        surname: impl Into<String>,
        hotel: Hotel,
        days: u32,
        adults: u32,
        children: u32,
        room_type: RoomType,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            surname: surname.into(),
            hotel,
            days,
            adults,
            children,
            room_type,
            total: compute_total(days, adults, children, room_type),
            paid: false,
        }
    }

    // Only used when restoring a booking from disk
    pub(crate) fn with_paid(mut self, paid: bool) -> Self {
        self.paid = paid;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn surname(&self) -> &str {
        &self.surname
    }

    pub fn hotel(&self) -> Hotel {
        self.hotel
    }

    pub fn days(&self) -> u32 {
        self.days
    }

    pub fn adults(&self) -> u32 {
        self.adults
    }

    pub fn children(&self) -> u32 {
        self.children
    }

    pub fn room_type(&self) -> RoomType {
        self.room_type
    }

    pub fn total(&self) -> f64 {
        self.total
    }

    pub fn is_paid(&self) -> bool {
        self.paid
    }

    // Same case folding as id generation, so non-ASCII ids match too
    pub fn has_id(&self, id: &str) -> bool {
        self.id.to_uppercase() == id.to_uppercase()
    }

    pub fn set_days(&mut self, days: u32) {
        self.days = days;
        self.recalculate();
    }

    pub fn set_adults(&mut self, adults: u32) {
        self.adults = adults;
        self.recalculate();
    }

    pub fn set_children(&mut self, children: u32) {
        self.children = children;
        self.recalculate();
    }

    pub fn set_room_type(&mut self, room_type: RoomType) {
        self.room_type = room_type;
        self.recalculate();
    }

    /// Flips the paid flag. A booking can only be paid once.
    pub fn mark_paid(&mut self) -> Result<(), BookingError> {
        if self.paid {
            return Err(BookingError::AlreadyPaid(self.id.clone()));
        }
        self.paid = true;
        Ok(())
    }

    fn recalculate(&mut self) {
        self.total = compute_total(self.days, self.adults, self.children, self.room_type);
    }
}
