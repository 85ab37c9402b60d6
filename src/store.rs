// In-memory booking store
// Holds every active booking in insertion order. Persistence is a separate,
// explicit step driven by the session.

use tracing::{debug, info};

use crate::booking::{Booking, BookingError, Hotel, RoomType};
use crate::identifier::{self, SuffixSource};

#[derive(Debug, Default, Clone)]
pub struct BookingStore {
    bookings: Vec<Booking>,
}

impl BookingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a booking. The caller is responsible for the id being unique.
    pub fn add(&mut self, booking: Booking) {
        debug!("Adding booking {}", booking.id());
        self.bookings.push(booking);
    }

    // Builds a booking with a fresh id and computed total, adds it and
    // returns a reference to the stored record
    #[allow(clippy::too_many_arguments)]
    pub fn create<S: SuffixSource + ?Sized>(
        &mut self,
        name: &str,
        surname: &str,
        hotel: Hotel,
        days: u32,
        adults: u32,
        children: u32,
        room_type: RoomType,
        suffixes: &mut S,
    ) -> &Booking {
        let id = identifier::generate(name, surname, self.ids(), suffixes);
        let booking = Booking::new(id, name, surname, hotel, days, adults, children, room_type);
        info!("Created booking {} at {}", booking.id(), booking.hotel());
        self.add(booking);
        &self.bookings[self.bookings.len() - 1]
    }

    pub fn find_by_id(&self, id: &str) -> Option<&Booking> {
        self.bookings.iter().find(|b| b.has_id(id))
    }

    pub fn find_by_id_mut(&mut self, id: &str) -> Option<&mut Booking> {
        self.bookings.iter_mut().find(|b| b.has_id(id))
    }

    pub fn remove(&mut self, id: &str) -> Result<Booking, BookingError> {
        let position = self
            .bookings
            .iter()
            .position(|b| b.has_id(id))
            .ok_or_else(|| BookingError::NotFound(id.to_string()))?;
        let removed = self.bookings.remove(position);
        info!("Removed booking {}", removed.id());
        Ok(removed)
    }

    pub fn mark_paid(&mut self, id: &str) -> Result<&Booking, BookingError> {
        let booking = self
            .find_by_id_mut(id)
            .ok_or_else(|| BookingError::NotFound(id.to_string()))?;
        booking.mark_paid()?;
        info!("Booking {} marked as paid", booking.id());
        Ok(booking)
    }

    pub fn all(&self) -> &[Booking] {
        &self.bookings
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.bookings.iter().map(Booking::id)
    }

    pub fn replace_all(&mut self, bookings: Vec<Booking>) {
        debug!("Replacing store contents with {} bookings", bookings.len());
        self.bookings = bookings;
    }

    pub fn len(&self) -> usize {
        self.bookings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bookings.is_empty()
    }
}
