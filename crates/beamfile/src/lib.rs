//! Guinea-PIG beam file output.

pub mod format;
pub mod sink;

pub use format::{format_field, format_record, parse_record, FIELD_WIDTH, PRECISION};
pub use sink::{BeamFileWriter, RecordSink};
