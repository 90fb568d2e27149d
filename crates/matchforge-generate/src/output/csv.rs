use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::errors::GenerationError;
use crate::records::FixtureRecord;

/// Summary of a dataset file written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenFile {
    pub path: PathBuf,
    pub rows: u64,
    pub bytes_written: u64,
    /// Hex SHA-256 of the bytes written.
    pub sha256: String,
}

/// Write records as CSV: a header of `fields`, then one row per record in the
/// same column order. Truncates an existing file.
///
/// Every field must belong to the record shape; this is checked before the
/// file is touched.
pub fn write_records<T: FixtureRecord>(
    path: &Path,
    records: &[T],
    fields: &[&str],
) -> Result<WrittenFile, GenerationError> {
    check_fields::<T>(fields)?;

    let writer = BufWriter::new(File::create(path)?);
    let digesting = DigestWriter::new(writer);
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(digesting);

    writer.write_record(fields)?;

    for record in records {
        let row: Vec<String> = fields
            .iter()
            .map(|field| record.field(field).unwrap_or_default())
            .collect();
        writer.write_record(&row)?;
    }

    writer.flush()?;
    let digesting = writer.into_inner().map_err(|err| err.into_error())?;
    let (bytes_written, sha256) = digesting.finish()?;

    Ok(WrittenFile {
        path: path.to_path_buf(),
        rows: records.len() as u64,
        bytes_written,
        sha256,
    })
}

/// Parse a file produced by [`write_records`] back into records. Columns are
/// matched by header name.
pub fn read_records<T: FixtureRecord>(path: &Path) -> Result<Vec<T>, GenerationError> {
    let reader = BufReader::new(File::open(path)?);
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(reader);

    let mut records = Vec::new();
    for row in reader.deserialize::<T>() {
        records.push(row?);
    }
    Ok(records)
}

fn check_fields<T: FixtureRecord>(fields: &[&str]) -> Result<(), GenerationError> {
    if fields.is_empty() {
        return Err(GenerationError::InvalidOptions(format!(
            "no fields given for {} dataset",
            T::KIND
        )));
    }
    if let Some(unknown) = fields.iter().find(|field| !T::FIELDS.contains(field)) {
        return Err(GenerationError::UnknownField {
            kind: T::KIND,
            field: unknown.to_string(),
        });
    }
    Ok(())
}

struct DigestWriter<W: Write> {
    inner: W,
    bytes: u64,
    hasher: Sha256,
}

impl<W: Write> DigestWriter<W> {
    fn new(inner: W) -> Self {
        Self {
            inner,
            bytes: 0,
            hasher: Sha256::new(),
        }
    }

    fn finish(mut self) -> std::io::Result<(u64, String)> {
        self.inner.flush()?;
        Ok((self.bytes, hex::encode(self.hasher.finalize())))
    }
}

impl<W: Write> Write for DigestWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let size = self.inner.write(buf)?;
        self.hasher.update(&buf[..size]);
        self.bytes = self.bytes.saturating_add(size as u64);
        Ok(size)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}
