//! CSV decoding into a polars [`DataFrame`].

use crate::dataset::LoadError;
use polars::io::mmap::MmapBytesReader;
use polars::prelude::*;
use tracing::debug;

/// Field spellings treated as missing values, besides the empty field.
const MISSING_MARKERS: [&str; 4] = ["NA", "N/A", "null", "None"];

fn read_options() -> CsvReadOptions {
    let null_values = NullValues::AllColumns(MISSING_MARKERS.iter().map(|m| (*m).into()).collect());

    CsvReadOptions::default()
        .with_has_header(true)
        // Scan every row: sparse columns such as `deck` only show their type late.
        .with_infer_schema_length(None)
        .with_parse_options(
            CsvParseOptions::default()
                .with_quote_char(Some(b'"'))
                .with_null_values(Some(null_values)),
        )
}

/// Read a headed CSV into a [`DataFrame`], inferring one type per column.
///
/// A column without a single value is read as text; the cleaner checks for
/// all-missing columns before it looks at types.
pub fn read_table<R: MmapBytesReader>(reader: R) -> Result<DataFrame, LoadError> {
    let df = read_options().into_reader_with_file_handle(reader).finish()?;

    for column in df.get_columns() {
        debug!("Column {} inferred as {}", column.name(), column.dtype());
    }

    Ok(df)
}
