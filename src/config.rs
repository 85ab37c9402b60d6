// Desk configuration

use std::path::PathBuf;

pub const DEFAULT_DATA_FILE: &str = "data/bookings.csv";

#[derive(Debug, Clone)]
pub struct DeskConfig {
    // Where the bookings file lives, relative to the working directory
    pub data_file: PathBuf,
    // Prefix used when showing money amounts
    pub currency_symbol: String,
}

impl Default for DeskConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            currency_symbol: "R".to_string(),
        }
    }
}

impl DeskConfig {
    pub fn with_data_file(mut self, data_file: impl Into<PathBuf>) -> Self {
        self.data_file = data_file.into();
        self
    }
}
