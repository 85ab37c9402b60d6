// Flat file persistence for the booking store
// One booking per line, fields separated by '|', with a fixed header line.
// The whole file is rewritten on every save.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::booking::{Booking, BookingError, Hotel, RoomType};

pub const DELIMITER: u8 = b'|';
pub const FIELD_COUNT: usize = 10;
pub const HEADER: [&str; FIELD_COUNT] = [
    "id", "name", "surname", "hotel", "days", "adults", "children", "roomType", "total", "paid",
];

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
}

// A line that had all its fields but could not be turned into a booking
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedRow {
    pub line: u64,
    pub reason: String,
}

#[derive(Debug, Default)]
pub struct LoadOutcome {
    pub bookings: Vec<Booking>,
    pub rejected: Vec<RejectedRow>,
    // Set when reading stopped early; bookings parsed before it are kept
    pub interrupted: Option<StorageError>,
}

// On-disk shape of a booking, in file column order
#[derive(Debug, Serialize, Deserialize)]
struct BookingRow {
    id: String,
    name: String,
    surname: String,
    hotel: String,
    days: u32,
    adults: u32,
    children: u32,
    #[serde(rename = "roomType")]
    room_type: String,
    total: f64,
    paid: String,
}

impl From<&Booking> for BookingRow {
    fn from(booking: &Booking) -> Self {
        Self {
            id: sanitize(booking.id()),
            name: sanitize(booking.name()),
            surname: sanitize(booking.surname()),
            hotel: sanitize(booking.hotel().name()),
            days: booking.days(),
            adults: booking.adults(),
            children: booking.children(),
            room_type: booking.room_type().name().to_string(),
            total: booking.total(),
            paid: booking.is_paid().to_string(),
        }
    }
}

impl BookingRow {
    // The total is always recomputed from the stay rather than trusted
    fn into_booking(self) -> Result<Booking, BookingError> {
        let hotel: Hotel = self.hotel.parse()?;
        let room_type: RoomType = self.room_type.parse()?;
        let booking = Booking::new(
            self.id,
            self.name,
            self.surname,
            hotel,
            self.days,
            self.adults,
            self.children,
            room_type,
        )
        .with_paid(self.paid.trim().eq_ignore_ascii_case("true"));

        if booking.total() != self.total {
            warn!(
                "Stored total {} for booking {} does not match its stay, using {}",
                self.total,
                booking.id(),
                booking.total()
            );
        }
        Ok(booking)
    }
}

// Free-text fields must not carry the delimiter
fn sanitize(value: &str) -> String {
    value.replace('|', "/")
}

/// Writes every booking to `path`, replacing whatever was there before.
pub fn save(bookings: &[Booking], path: &Path) -> Result<(), StorageError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut writer = csv::WriterBuilder::new()
        .delimiter(DELIMITER)
        .has_headers(false)
        .quote_style(csv::QuoteStyle::Never)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_path(path)?;

    writer.write_record(HEADER)?;
    for booking in bookings {
        writer.serialize(BookingRow::from(booking))?;
    }
    writer.flush()?;

    info!("Saved {} bookings to {}", bookings.len(), path.display());
    Ok(())
}

/// Reads bookings back from `path`.
///
/// A missing file is an empty store. Lines with fewer than ten fields are
/// skipped, as are lines whose values do not parse; the latter are reported in
/// [`LoadOutcome::rejected`].
pub fn load(path: &Path) -> Result<LoadOutcome, StorageError> {
    let mut outcome = LoadOutcome::default();
    if !path.exists() {
        debug!("No bookings file at {}, starting empty", path.display());
        return Ok(outcome);
    }

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(DELIMITER)
        .has_headers(true)
        .flexible(true)
        .quoting(false)
        .from_path(path)?;

    for result in reader.records() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                warn!("Stopped reading {}: {}", path.display(), e);
                outcome.interrupted = Some(e.into());
                break;
            }
        };
        let line = record.position().map_or(0, |p| p.line());

        if record.len() < FIELD_COUNT {
            debug!("Skipping line {} with {} fields", line, record.len());
            continue;
        }

        let fields: csv::StringRecord = record.iter().take(FIELD_COUNT).collect();
        let parsed = fields
            .deserialize::<BookingRow>(None)
            .map_err(|e| e.to_string())
            .and_then(|row| row.into_booking().map_err(|e| e.to_string()));

        match parsed {
            Ok(booking) => outcome.bookings.push(booking),
            Err(reason) => {
                warn!("Rejected line {} of {}: {}", line, path.display(), reason);
                outcome.rejected.push(RejectedRow { line, reason });
            }
        }
    }

    info!(
        "Loaded {} bookings from {} ({} rejected)",
        outcome.bookings.len(),
        path.display(),
        outcome.rejected.len()
    );
    Ok(outcome)
}
