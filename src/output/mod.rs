//! Output formatting for registry data.
//!
//! This module handles formatting and outputting records:
//! - [`table`] - CSV style rows for records, reports and expansions
//! - [`terminal`] - Terminal field formatting with colors

mod table;
mod terminal;

pub use table::{print_expansion, print_records, print_report, record_header, record_row};
pub use terminal::{format_field, format_state};
