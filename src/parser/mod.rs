pub mod columns;
pub mod deserializers;
pub mod pipeline;
pub mod types;

pub use pipeline::{
    normalize_row, normalize_rows, parse_csv, parse_csv_reader, NormalizeOutput, ParseOutput,
};
pub use types::{CaseRecord, CaseRowRaw, Dataset, ParseWarning, RowError};
