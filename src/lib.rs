// Hotel booking desk: pricing, id generation, an in-memory store with flat
// file persistence, and the interactive session that ties them together

pub mod booking;
pub mod config;
pub mod identifier;
pub mod persistence;
pub mod pricing;
pub mod session;
pub mod store;

// Re-export key types for convenience
pub use booking::{Booking, BookingError, Hotel, RoomType};
pub use config::DeskConfig;
pub use identifier::{RandomSuffix, SuffixSource};
pub use persistence::{LoadOutcome, RejectedRow, StorageError};
pub use pricing::compute_total;
pub use session::{format_money, Session, SessionState};
pub use store::BookingStore;
