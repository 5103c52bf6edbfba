//! Reads the weekly run input from a Google Sheets spreadsheet.

pub mod client;
pub mod error;

pub use client::{SheetsClient, Tab, DEFAULT_BASE_URL};
pub use error::SheetsError;
