//! Output modules.
//!
//! - [`csv_log`]: append-only CSV record of every fetched headline
//! - [`console`]: plain-text and JSON rendering for the terminal

pub mod console;
pub mod csv_log;
