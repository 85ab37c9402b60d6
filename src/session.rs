// Interactive booking desk
// Drives the menu state machine over an injected reader/writer pair. Every
// error is turned into a message for the user here; nothing escapes except a
// broken terminal.

use std::io::{self, BufRead, Write};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::booking::{Booking, BookingError, Hotel, RoomType};
use crate::config::DeskConfig;
use crate::identifier::{RandomSuffix, SuffixSource};
use crate::persistence;
use crate::store::BookingStore;

const RULE: &str = "------------------------------";

#[derive(Error, Debug)]
enum SessionError {
    #[error("input closed")]
    InputClosed,

    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),
}

type SessionResult<T> = Result<T, SessionError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    MainMenu,
    Creating,
    Managing(String),
    Listing,
    PayingSimulation,
    Exiting,
}

/// Formats an amount the way receipts show it, e.g. `R 1,234.50`.
pub fn format_money(amount: f64, symbol: &str) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount < 0.0 { "-" } else { "" };
    format!("{}{} {}.{}", sign, symbol, grouped, cents)
}

pub struct Session<'a, R, W, S = RandomSuffix> {
    store: &'a mut BookingStore,
    input: R,
    output: W,
    config: DeskConfig,
    suffixes: S,
}

impl<'a, R: BufRead, W: Write> Session<'a, R, W, RandomSuffix> {
    pub fn new(store: &'a mut BookingStore, input: R, output: W, config: DeskConfig) -> Self {
        Self::with_suffixes(store, input, output, config, RandomSuffix::new())
    }
}

impl<'a, R: BufRead, W: Write, S: SuffixSource> Session<'a, R, W, S> {
    pub fn with_suffixes(
        store: &'a mut BookingStore,
        input: R,
        output: W,
        config: DeskConfig,
        suffixes: S,
    ) -> Self {
        Self {
            store,
            input,
            output,
            config,
            suffixes,
        }
    }

    /// Fills the store from the data file, reporting anything that went wrong.
    pub fn load(&mut self) -> io::Result<()> {
        match persistence::load(&self.config.data_file) {
            Ok(outcome) => {
                for rejected in &outcome.rejected {
                    writeln!(
                        self.output,
                        "Skipped booking on line {}: {}",
                        rejected.line, rejected.reason
                    )?;
                }
                if let Some(e) = &outcome.interrupted {
                    writeln!(self.output, "Failed to load bookings: {}", e)?;
                }
                self.store.replace_all(outcome.bookings);
            }
            Err(e) => {
                warn!("Loading {} failed: {}", self.config.data_file.display(), e);
                writeln!(self.output, "Failed to load bookings: {}", e)?;
            }
        }
        Ok(())
    }

    /// Runs menus until the user exits or input runs out, then saves.
    pub fn run(&mut self) -> io::Result<()> {
        let mut state = SessionState::MainMenu;
        loop {
            debug!("Session state {:?}", state);
            let step = match state {
                SessionState::MainMenu => self.main_menu(),
                SessionState::Creating => self.create_booking(),
                SessionState::Managing(id) => self.manage_booking(&id),
                SessionState::Listing => self.list_bookings(),
                SessionState::PayingSimulation => self.simulate_payment(),
                SessionState::Exiting => break,
            };
            state = match step {
                Ok(next) => next,
                Err(SessionError::InputClosed) => {
                    info!("Input closed, leaving the desk");
                    SessionState::Exiting
                }
                Err(SessionError::IoError(e)) => return Err(e),
            };
        }
        self.persist()?;
        writeln!(self.output, "Goodbye!")?;
        self.output.flush()
    }

    fn main_menu(&mut self) -> SessionResult<SessionState> {
        writeln!(self.output, "\n===== Hotel Reservation System =====")?;
        writeln!(self.output, "1) Book a Room")?;
        writeln!(self.output, "2) Manage an Existing Booking")?;
        writeln!(self.output, "3) List All Bookings")?;
        writeln!(self.output, "4) Payment Simulation (mark booking as PAID)")?;
        writeln!(self.output, "5) Save")?;
        writeln!(self.output, "6) Exit")?;
        writeln!(self.output, "====================================")?;

        let next = match self.read_number("Choose an option: ")? {
            1 => SessionState::Creating,
            2 => {
                let id = self.read_line("Enter Booking ID: ")?;
                if self.store.find_by_id(&id).is_some() {
                    SessionState::Managing(id)
                } else {
                    writeln!(self.output, "{}", BookingError::NotFound(id))?;
                    SessionState::MainMenu
                }
            }
            3 => SessionState::Listing,
            4 => SessionState::PayingSimulation,
            5 => {
                if self.persist()? {
                    writeln!(self.output, "Saved.")?;
                }
                SessionState::MainMenu
            }
            6 => SessionState::Exiting,
            _ => {
                writeln!(self.output, "Invalid option.")?;
                SessionState::MainMenu
            }
        };
        Ok(next)
    }

    fn create_booking(&mut self) -> SessionResult<SessionState> {
        let hotel = self.read_hotel()?;
        let name = self.read_required("Enter Name: ")?;
        let surname = self.read_required("Enter Surname: ")?;
        let days = self.read_number("Days: ")?;
        let adults = self.read_number("Adults: ")?;
        let children = self.read_number("Children: ")?;
        let room_type = self.read_room_type()?;

        let booking = self
            .store
            .create(&name, &surname, hotel, days, adults, children, room_type, &mut self.suffixes)
            .clone();
        self.persist()?;

        writeln!(self.output, "\nBooking Confirmed!")?;
        self.print_booking(&booking)?;
        Ok(SessionState::MainMenu)
    }

    fn manage_booking(&mut self, id: &str) -> SessionResult<SessionState> {
        let Some(found) = self.store.find_by_id(id).cloned() else {
            writeln!(self.output, "{}", BookingError::NotFound(id.to_string()))?;
            return Ok(SessionState::MainMenu);
        };
        writeln!(self.output, "Found booking:")?;
        self.print_booking(&found)?;

        loop {
            writeln!(self.output, "\nManage Menu")?;
            writeln!(self.output, "1) Change Days")?;
            writeln!(self.output, "2) Change Adults")?;
            writeln!(self.output, "3) Change Children")?;
            writeln!(self.output, "4) Change Room Type")?;
            writeln!(self.output, "5) Cancel Booking")?;
            writeln!(self.output, "6) Back")?;

            match self.read_number("Choose: ")? {
                1 => {
                    let days = self.read_number("New Days: ")?;
                    self.edit(id, |b| b.set_days(days))?;
                }
                2 => {
                    let adults = self.read_number("New Adults: ")?;
                    self.edit(id, |b| b.set_adults(adults))?;
                }
                3 => {
                    let children = self.read_number("New Children: ")?;
                    self.edit(id, |b| b.set_children(children))?;
                }
                4 => {
                    let room_type = self.read_room_type()?;
                    self.edit(id, |b| b.set_room_type(room_type))?;
                }
                5 => {
                    match self.store.remove(id) {
                        Ok(_) => {
                            self.persist()?;
                            writeln!(self.output, "Booking cancelled.")?;
                        }
                        Err(e) => writeln!(self.output, "{}", e)?,
                    }
                    return Ok(SessionState::MainMenu);
                }
                6 => {
                    self.persist()?;
                    return Ok(SessionState::MainMenu);
                }
                _ => writeln!(self.output, "Invalid.")?,
            }
        }
    }

    // Applies a change to one booking, saves and shows the result
    fn edit<F>(&mut self, id: &str, change: F) -> SessionResult<()>
    where
        F: FnOnce(&mut Booking),
    {
        let updated = match self.store.find_by_id_mut(id) {
            Some(booking) => {
                change(booking);
                booking.clone()
            }
            None => {
                writeln!(self.output, "{}", BookingError::NotFound(id.to_string()))?;
                return Ok(());
            }
        };
        info!("Booking {} updated, total now {}", updated.id(), updated.total());
        self.persist()?;
        writeln!(self.output, "Updated:")?;
        self.print_booking(&updated)?;
        Ok(())
    }

    fn list_bookings(&mut self) -> SessionResult<SessionState> {
        if self.store.is_empty() {
            writeln!(self.output, "No bookings yet.")?;
            return Ok(SessionState::MainMenu);
        }
        writeln!(self.output, "\nAll Bookings:")?;
        let bookings = self.store.all().to_vec();
        for booking in &bookings {
            writeln!(self.output, "{}", RULE)?;
            self.print_booking(booking)?;
        }
        writeln!(self.output, "{}", RULE)?;
        Ok(SessionState::MainMenu)
    }

    fn simulate_payment(&mut self) -> SessionResult<SessionState> {
        let id = self.read_line("Enter Booking ID to mark as PAID: ")?;
        match self.store.mark_paid(&id) {
            Ok(booking) => {
                let receipt = booking.clone();
                self.persist()?;
                writeln!(self.output, "Payment recorded. Receipt:")?;
                self.print_booking(&receipt)?;
            }
            Err(BookingError::NotFound(_)) => writeln!(self.output, "ID not found.")?,
            Err(BookingError::AlreadyPaid(_)) => writeln!(self.output, "Already marked as PAID.")?,
            Err(e) => writeln!(self.output, "{}", e)?,
        }
        Ok(SessionState::MainMenu)
    }

    // Saves the store; a failure is reported and leaves memory untouched.
    // Returns whether the file was written.
    fn persist(&mut self) -> io::Result<bool> {
        match persistence::save(self.store.all(), &self.config.data_file) {
            Ok(()) => Ok(true),
            Err(e) => {
                warn!("Saving {} failed: {}", self.config.data_file.display(), e);
                writeln!(self.output, "Failed to save bookings: {}", e)?;
                Ok(false)
            }
        }
    }

    fn print_booking(&mut self, booking: &Booking) -> io::Result<()> {
        writeln!(self.output, "ID: {}", booking.id())?;
        writeln!(self.output, "Name: {} {}", booking.name(), booking.surname())?;
        writeln!(self.output, "Hotel: {}", booking.hotel())?;
        writeln!(self.output, "Room: {}", booking.room_type())?;
        writeln!(
            self.output,
            "Days/Adults/Children: {}/{}/{}",
            booking.days(),
            booking.adults(),
            booking.children()
        )?;
        writeln!(
            self.output,
            "Total: {}",
            format_money(booking.total(), &self.config.currency_symbol)
        )?;
        writeln!(self.output, "Paid: {}", if booking.is_paid() { "YES" } else { "NO" })
    }

    fn read_line(&mut self, prompt: &str) -> SessionResult<String> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(SessionError::InputClosed);
        }
        Ok(line.trim().to_string())
    }

    fn read_required(&mut self, prompt: &str) -> SessionResult<String> {
        loop {
            let value = self.read_line(prompt)?;
            if !value.is_empty() {
                return Ok(value);
            }
            writeln!(self.output, "Please enter a value.")?;
        }
    }

    fn read_number(&mut self, prompt: &str) -> SessionResult<u32> {
        loop {
            let input = self.read_line(prompt)?;
            // Blank lines just re-prompt
            if input.is_empty() {
                continue;
            }
            match input.parse::<u32>() {
                Ok(number) => return Ok(number),
                Err(_) => writeln!(self.output, "Please enter a valid number.")?,
            }
        }
    }

    fn read_hotel(&mut self) -> SessionResult<Hotel> {
        let names: Vec<&str> = Hotel::ALL.iter().map(Hotel::name).collect();
        let prompt = format!("Enter Hotel ({}): ", names.join("/"));
        loop {
            match self.read_line(&prompt)?.parse::<Hotel>() {
                Ok(hotel) => return Ok(hotel),
                Err(_) => writeln!(self.output, "Hotel not found. Try again.")?,
            }
        }
    }

    fn read_room_type(&mut self) -> SessionResult<RoomType> {
        let options: Vec<String> = RoomType::ALL
            .iter()
            .map(|room| format!("[{}] {}", room.code(), room.name()))
            .collect();
        let prompt = format!("Room Type {}: ", options.join("  "));
        loop {
            let input = self.read_line(&prompt)?;
            if let Some(room_type) = RoomType::from_code(&input) {
                return Ok(room_type);
            }
            writeln!(self.output, "Please enter A, B or C.")?;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::compute_total;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::fs;
    use std::io::Cursor;
    use std::path::{Path, PathBuf};
    use test_case::test_case;

    fn temp_data_file() -> PathBuf {
        std::env::temp_dir()
            .join(format!("hotel-desk-session-{}", rand::random::<u64>()))
            .join("data")
            .join("bookings.csv")
    }

    // Runs a whole scripted session against `store` and returns what was printed
    fn run_script(store: &mut BookingStore, data_file: &Path, script: &str) -> String {
        let mut output = Vec::new();
        {
            let config = DeskConfig::default().with_data_file(data_file);
            let suffixes = RandomSuffix::from_rng(StdRng::seed_from_u64(3));
            let mut session =
                Session::with_suffixes(store, Cursor::new(script.to_string()), &mut output, config, suffixes);
            session.load().unwrap();
            session.run().unwrap();
        }
        String::from_utf8(output).unwrap()
    }

    const BOOK_JOHN: &str = "1\nseasons\nJohn\nSmith\n2\n1\n1\nA\n";

    #[test_case(0.0, "R 0.00"; "zero")]
    #[test_case(460.0, "R 460.00"; "hundreds")]
    #[test_case(1234.5, "R 1,234.50"; "thousands")]
    #[test_case(1234567.891, "R 1,234,567.89"; "millions")]
    fn test_format_money(amount: f64, expected: &str) {
        assert_eq!(format_money(amount, "R"), expected);
    }

    #[test]
    fn test_create_booking_normalizes_hotel_and_prices_stay() {
        let path = temp_data_file();
        let mut store = BookingStore::new();
        let output = run_script(&mut store, &path, &format!("{}6\n", BOOK_JOHN));

        let booking = store.find_by_id("JOHSMI").unwrap();
        assert_eq!(booking.hotel(), Hotel::Seasons);
        assert_eq!(booking.room_type(), RoomType::Standard);
        assert_eq!(booking.total(), 460.0);
        assert!(!booking.is_paid());

        assert!(output.contains("Booking Confirmed!"));
        assert!(output.contains("Hotel: Seasons"));
        assert!(output.contains("Total: R 460.00"));
        assert!(output.ends_with("Goodbye!\n"));

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("JOHSMI|John|Smith|Seasons|2|1|1|Standard|460.0|false"));
    }

    #[test]
    fn test_invalid_input_is_reprompted() {
        let path = temp_data_file();
        let mut store = BookingStore::new();
        let script = "abc\n9\n1\nHilton\nstyn\n\nAnna\nBerg\ntwo\n-1\n3\n2\n0\nZ\nc\n6\n";
        let output = run_script(&mut store, &path, script);

        assert!(output.contains("Please enter a valid number."));
        assert!(output.contains("Invalid option."));
        assert!(output.contains("Hotel not found. Try again."));
        assert!(output.contains("Please enter a value."));
        assert!(output.contains("Please enter A, B or C."));

        let booking = store.find_by_id("ANNBER").unwrap();
        assert_eq!(booking.hotel(), Hotel::Styn);
        assert_eq!(booking.days(), 3);
        assert_eq!(booking.room_type(), RoomType::Suite);
        assert_eq!(booking.total(), compute_total(3, 2, 0, RoomType::Suite));
    }

    #[test]
    fn test_same_guest_twice_gets_distinct_ids() {
        let path = temp_data_file();
        let mut store = BookingStore::new();
        run_script(&mut store, &path, &format!("{}{}6\n", BOOK_JOHN, BOOK_JOHN));

        assert_eq!(store.len(), 2);
        let first = store.all()[0].id().to_string();
        let second = store.all()[1].id().to_string();
        assert_eq!(first, "JOHSMI");
        assert!(second.starts_with("JOHSMI") && second.len() == 9);
        assert!(!first.eq_ignore_ascii_case(&second));
    }

    #[test]
    fn test_edit_recomputes_total_and_persists() {
        let path = temp_data_file();
        let mut store = BookingStore::new();
        let script = format!("{}2\njohsmi\n1\n5\n4\nB\n6\n6\n", BOOK_JOHN);
        let output = run_script(&mut store, &path, &script);

        let booking = store.find_by_id("JOHSMI").unwrap();
        assert_eq!(booking.days(), 5);
        assert_eq!(booking.room_type(), RoomType::Delux);
        assert_eq!(booking.total(), 810.0);
        assert!(output.contains("Updated:"));
        assert!(output.contains("Total: R 810.00"));

        let reloaded = persistence::load(&path).unwrap();
        assert_eq!(reloaded.bookings, store.all().to_vec());
    }

    #[test]
    fn test_manage_unknown_id_returns_to_menu() {
        let path = temp_data_file();
        let mut store = BookingStore::new();
        let output = run_script(&mut store, &path, "2\nNOPE\n6\n");

        assert!(output.contains("No booking found with ID: NOPE"));
        assert!(!output.contains("Manage Menu"));
    }

    #[test]
    fn test_cancelled_booking_disappears_from_listing_and_file() {
        let path = temp_data_file();
        let mut store = BookingStore::new();
        let script = format!(
            "{}1\nstyn\nAnna\nBerg\n1\n2\n0\nC\n2\nJOHSMI\n5\n3\n5\n6\n",
            BOOK_JOHN
        );
        let output = run_script(&mut store, &path, &script);

        assert!(output.contains("Booking cancelled."));
        assert!(store.find_by_id("JOHSMI").is_none());

        let listing = output.rsplit("All Bookings:").next().unwrap();
        assert!(listing.contains("ID: ANNBER"));
        assert!(!listing.contains("ID: JOHSMI"));

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("ANNBER|"));
        assert!(!content.contains("JOHSMI|"));
    }

    #[test]
    fn test_paying_twice_reports_already_paid() {
        let path = temp_data_file();
        let mut store = BookingStore::new();
        let script = format!("{}4\nJOHSMI\n4\njohsmi\n4\nNOPE\n6\n", BOOK_JOHN);
        let output = run_script(&mut store, &path, &script);

        assert_eq!(output.matches("Payment recorded. Receipt:").count(), 1);
        assert!(output.contains("Already marked as PAID."));
        assert!(output.contains("ID not found."));

        let booking = store.find_by_id("JOHSMI").unwrap();
        assert!(booking.is_paid());
        assert_eq!(booking.total(), 460.0);
        assert!(fs::read_to_string(&path).unwrap().contains("|460.0|true"));
    }

    #[test]
    fn test_empty_listing() {
        let path = temp_data_file();
        let mut store = BookingStore::new();
        let output = run_script(&mut store, &path, "3\n6\n");
        assert!(output.contains("No bookings yet."));
    }

    #[test]
    fn test_session_loads_existing_file_and_reports_bad_rows() {
        let path = temp_data_file();
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(
            &path,
            "id|name|surname|hotel|days|adults|children|roomType|total|paid\n\
             SHORT|Only|Eight|Seasons|1|1|0|Standard\n\
             BAD|B|B|Seasons|x|1|0|Standard|0|false\n\
             JOHSMI|John|Smith|Seasons|2|1|1|Standard|460.0|false\n",
        )
        .unwrap();

        let mut store = BookingStore::new();
        let output = run_script(&mut store, &path, "3\n6\n");

        assert_eq!(store.len(), 1);
        assert!(output.contains("Skipped booking on line 3"));
        assert!(output.contains("ID: JOHSMI"));
    }

    #[test]
    fn test_end_of_input_saves_and_exits() {
        let path = temp_data_file();
        let mut store = BookingStore::new();
        let output = run_script(&mut store, &path, "1\nseasons\nJohn\n");

        assert!(store.is_empty());
        assert!(output.ends_with("Goodbye!\n"));
        assert!(path.exists());
    }

    #[test]
    fn test_save_failure_is_reported_and_memory_kept() {
        let blocker = std::env::temp_dir().join(format!("hotel-desk-blocker-{}", rand::random::<u64>()));
        fs::write(&blocker, "not a directory").unwrap();
        let path = blocker.join("bookings.csv");

        let mut store = BookingStore::new();
        let output = run_script(&mut store, &path, &format!("{}5\n6\n", BOOK_JOHN));

        assert!(output.contains("Failed to save bookings"));
        assert!(!output.contains("Saved."));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_unreadable_file_reports_failed_load_and_keeps_earlier_bookings() {
        let path = temp_data_file();
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        let mut content = b"id|name|surname|hotel|days|adults|children|roomType|total|paid\n\
JOHSMI|John|Smith|Seasons|2|1|1|Standard|460.0|false\n"
            .to_vec();
        content.extend_from_slice(b"BAD|\xff\xfe|Name|Styn|1|1|0|Standard|325.0|false\n");
        fs::write(&path, content).unwrap();

        let mut store = BookingStore::new();
        let output = run_script(&mut store, &path, "3\n6\n");

        assert!(output.contains("Failed to load bookings"));
        assert_eq!(store.len(), 1);
        assert!(output.contains("ID: JOHSMI"));
    }

    #[test]
    fn test_blank_number_input_reprompts_silently() {
        let path = temp_data_file();
        let mut store = BookingStore::new();
        let output = run_script(&mut store, &path, "\n  \n3\n6\n");

        assert!(!output.contains("Please enter a valid number."));
        assert!(output.contains("No bookings yet."));
    }
}
