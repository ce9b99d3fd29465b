//! CSV reading utilities.

mod decode;
mod header;
mod reader;
mod separator;

pub use decode::{decode_with, default_encodings};
pub use reader::{MAX_CSV_FILE_SIZE, RawTable, ReadOptions, check_file_size, read_csv_flexible};
pub use separator::{SNIFF_CANDIDATES, sniff_separator};
