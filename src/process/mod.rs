// src/process/mod.rs
use anyhow::{Context, Result};
use csv::ReaderBuilder;
use encoding_rs::WINDOWS_1252;
use std::io::{Cursor, Read};
use zip::ZipArchive;

/// A parsed dataset: the header row plus every data row, all fields as text.
///
/// Empty (zero rows, zero columns) exactly when nothing contributed data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty() && self.rows.is_empty()
    }

    /// Concatenate tables in the order given, preserving each table's row
    /// order. The first table fixes the header row; callers guarantee the
    /// rest match (see `fetch::years`).
    pub fn concat(tables: Vec<Table>) -> Table {
        let mut iter = tables.into_iter();
        let Some(mut first) = iter.next() else {
            return Table::empty();
        };
        for t in iter {
            first.rows.extend(t.rows);
        }
        first
    }
}

/// Decode a `;`-separated payload into a [`Table`].
///
/// The portal still serves its historical ISO-8859-1 encoding, not UTF-8, and
/// its dialect carries no quoting. The first record is the header row.
pub fn parse_table(raw: &[u8]) -> Result<Table> {
    let (text, _, _) = WINDOWS_1252.decode(raw);
    let mut rdr = ReaderBuilder::new()
        .delimiter(b';')
        .quoting(false)
        .flexible(true)
        .has_headers(false)
        .from_reader(text.as_bytes());

    let mut headers = Vec::new();
    let mut rows = Vec::new();
    for (idx, result) in rdr.records().enumerate() {
        let record = result.with_context(|| format!("CSV parse error at record {}", idx))?;
        let fields: Vec<String> = record.iter().map(str::to_string).collect();
        if idx == 0 {
            headers = fields;
        } else {
            rows.push(fields);
        }
    }
    Ok(Table { headers, rows })
}

/// Open `body` as a ZIP archive in memory and parse the named CSV member.
pub fn read_member_table(body: &[u8], member: &str) -> Result<Table> {
    let mut archive =
        ZipArchive::new(Cursor::new(body)).context("response body is not a valid ZIP archive")?;
    let mut entry = archive
        .by_name(member)
        .with_context(|| format!("member '{}' not present in archive", member))?;
    let mut raw = Vec::with_capacity(entry.size() as usize);
    entry
        .read_to_end(&mut raw)
        .with_context(|| format!("reading '{}' from archive", member))?;
    parse_table(&raw)
}
