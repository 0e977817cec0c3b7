use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::AsyncWriteExt;

use crate::error::{Error, Result};

pub mod models;

use models::{Donation, NewDonation, Scalar};

pub const HEADER: &str = "id,name,amount,date,location,paymentId,email";

const DELIMITER: u8 = b',';
const DELIMITER_SUBSTITUTE: char = ';';
// id, name, amount, date, location; paymentId and email may be missing.
const MIN_COLUMNS: usize = 5;

/// Handle to the append-only donations file. Cheap to clone.
///
/// Appends are not serialized: each call issues one append-mode write and
/// relies on the filesystem for atomicity.
#[derive(Clone, Debug)]
pub struct DonationStore {
    path: Arc<PathBuf>,
}

impl DonationStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Arc::new(path.into()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Creates the file with its header row if it does not exist yet.
    /// Returns `true` when the file was created.
    pub async fn init(&self) -> Result<bool> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| Error::io(parent, e))?;
        }

        let opened = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(self.path.as_path())
            .await;

        match opened {
            Ok(mut file) => {
                file.write_all(format!("{}\n", HEADER).as_bytes())
                    .await
                    .map_err(|e| Error::io(self.path.as_path(), e))?;
                file.flush()
                    .await
                    .map_err(|e| Error::io(self.path.as_path(), e))?;
                tracing::info!("Donations file created with headers at {}", self.path.display());
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                tracing::info!("Donations file found at {}", self.path.display());
                Ok(false)
            }
            Err(e) => Err(Error::io(self.path.as_path(), e)),
        }
    }

    /// Reads every well-formed row, in file order.
    pub async fn list(&self) -> Result<Vec<Donation>> {
        let text = tokio::fs::read_to_string(self.path.as_path())
            .await
            .map_err(|e| Error::io(self.path.as_path(), e))?;
        Ok(parse_donations(&text))
    }

    /// Validates and appends one row. Nothing is written on validation failure.
    ///
    /// The file must already exist (see [`DonationStore::init`]): a file
    /// created here would have no header, and its first row would be read
    /// back as one.
    pub async fn append(&self, donation: &NewDonation) -> Result<()> {
        let row = format_row(donation)?;

        let mut file = tokio::fs::OpenOptions::new()
            .append(true)
            .open(self.path.as_path())
            .await
            .map_err(|e| Error::io(self.path.as_path(), e))?;
        file.write_all(&row)
            .await
            .map_err(|e| Error::io(self.path.as_path(), e))?;
        file.flush()
            .await
            .map_err(|e| Error::io(self.path.as_path(), e))?;
        Ok(())
    }
}

/// Parses the full file contents. Rows with fewer than five columns are dropped.
pub fn parse_donations(text: &str) -> Vec<Donation> {
    let text = text.trim().as_bytes();
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .quoting(false)
        .delimiter(DELIMITER)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_reader(text);

    let mut donations = Vec::new();
    for record in reader.records() {
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!("Skipping unreadable donation row: {}", e);
                continue;
            }
        };

        let mut values: Vec<&str> = record.iter().collect();
        // The reader does not trim; match a trimmed line.
        if let Some(first) = values.first_mut() {
            *first = first.trim_start();
        }
        if let Some(last) = values.last_mut() {
            *last = last.trim_end();
        }
        if values.len() < MIN_COLUMNS {
            continue;
        }

        // Line 1 is the header, so the first data line falls back to 1.
        let position = record
            .position()
            .map(|p| record_line(text, p).saturating_sub(1) as i64)
            .unwrap_or(0);

        let column = |idx: usize| values.get(idx).copied().unwrap_or("").to_string();
        donations.push(Donation {
            id: parse_leading_int(values[0])
                .filter(|id| *id != 0)
                .unwrap_or(position),
            name: column(1),
            amount: parse_leading_float(values[2])
                .filter(|a| a.is_finite())
                .unwrap_or(0.0),
            date: column(3),
            location: column(4),
            payment_id: column(5),
            email: column(6),
        });
    }

    donations
}

// A record's position is taken before the reader skips empty lines, so
// those still sit between the position and the row itself.
fn record_line(text: &[u8], position: &csv::Position) -> u64 {
    let skipped = text
        .get(position.byte() as usize..)
        .unwrap_or_default()
        .iter()
        .take_while(|b| **b == b'\n')
        .count();
    position.line() + skipped as u64
}

/// Builds the newline-terminated row for a validated payload.
///
/// Text columns go through [`sanitize`]. `id`, `amount` and `date` keep their
/// commas but lose line breaks, so one payload is always one row.
pub fn format_row(donation: &NewDonation) -> Result<Vec<u8>> {
    if !donation.has_required_fields() {
        return Err(Error::validation("Missing required fields"));
    }

    let text = |v: &Option<Scalar>| v.as_ref().map(|s| sanitize(&s.to_string())).unwrap_or_default();
    let raw = |v: &Option<Scalar>| v.as_ref().map(|s| strip_line_breaks(&s.to_string())).unwrap_or_default();

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .quote_style(csv::QuoteStyle::Never)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    writer.write_record([
        raw(&donation.id),
        text(&donation.name),
        raw(&donation.amount),
        strip_line_breaks(donation.date.as_deref().unwrap_or("")),
        text(&donation.location),
        text(&donation.payment_id),
        text(&donation.email),
    ])?;
    writer
        .into_inner()
        .map_err(|e| Error::Csv(csv::Error::from(e.into_error())))
}

/// Keeps a text value inside its column: commas become semicolons and line
/// breaks become spaces.
pub fn sanitize(value: &str) -> String {
    strip_line_breaks(value).replace(char::from(DELIMITER), &DELIMITER_SUBSTITUTE.to_string())
}

fn strip_line_breaks(value: &str) -> String {
    value.replace(['\r', '\n'], " ")
}

// Integer prefix of `s`, ignoring leading whitespace: " 12abc" -> 12.
fn parse_leading_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }
    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end == digits_start {
        return None;
    }
    s[..end].parse().ok()
}

// Decimal prefix of `s`, ignoring leading whitespace: "12.5kg" -> 12.5.
pub(crate) fn parse_leading_float(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut mantissa_digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        mantissa_digits += frac_end - frac_start;
        if mantissa_digits > 0 {
            end = frac_end;
        }
    }
    if mantissa_digits == 0 {
        return None;
    }

    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse().ok()
}
