use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use dataeden_core::{ColumnDescriptor, ValueGrid};

/// Write `grid` as CSV to `path` with a header of column names.
///
/// Returns the number of data rows written.
pub fn write_grid_csv(
    path: &Path,
    columns: &[ColumnDescriptor],
    grid: &ValueGrid,
) -> Result<u64, csv::Error> {
    let writer = BufWriter::new(File::create(path).map_err(csv::Error::from)?);
    write_grid(writer, columns, grid)
}

/// Write `grid` as CSV to any writer, header first.
pub fn write_grid<W: Write>(
    writer: W,
    columns: &[ColumnDescriptor],
    grid: &ValueGrid,
) -> Result<u64, csv::Error> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    writer.write_record(columns.iter().map(|column| column.name()))?;
    let mut rows = 0u64;
    for row in grid.rows() {
        writer.write_record(row)?;
        rows += 1;
    }
    writer.flush()?;
    Ok(rows)
}
