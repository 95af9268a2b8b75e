//! Dataset parsing: delimited text to raw rows, raw rows to typed records.

pub mod checksum;
pub mod csv_parser;
pub mod records;

pub use checksum::calculate_checksum;
pub use csv_parser::{parse_rows, RawTable};
pub use records::{parse_records, raw_coordinates, records_from_table, require_records};
