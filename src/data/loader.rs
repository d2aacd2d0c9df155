//! CSV ingestion for booking records
//!
//! Parses the raw booking corpus and derives the per-record fields
//! (stay length, recency, sub-trip ordinal) needed by the aggregator.

use crate::{BookingRecord, NextstayError, Result, UserId};
use chrono::NaiveDate;
use log::{debug, warn};
use serde::Deserialize;
use std::path::Path;

/// Raw CSV row as it appears in the corpus
#[derive(Debug, Deserialize)]
struct RawBookingRow {
    user_id: i64,
    utrip_id: String,
    checkin: String,
    checkout: String,
    booker_country: String,
    #[serde(default)]
    hotel_country: String,
    affiliate_id: i64,
    city_id: i64,
    device_class: String,
}

/// Load booking records from a CSV file, deriving stay length, recency
/// against `reference_date`, and the sub-trip ordinal.
///
/// Missing destination labels are kept as empty strings; callers filter
/// them with [`drop_missing_destination`] where the corpus requires it.
pub fn load_bookings<P: AsRef<Path>>(
    path: P,
    reference_date: NaiveDate,
) -> Result<Vec<BookingRecord>> {
    let path = path.as_ref();
    let mut reader = csv::Reader::from_path(path)?;

    let mut records = Vec::new();
    for row in reader.deserialize() {
        let raw: RawBookingRow = row.map_err(|e| NextstayError::Schema {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        records.push(derive_record(raw, path, reference_date)?);
    }

    debug!("Loaded {} bookings from {}", records.len(), path.display());
    Ok(records)
}

fn derive_record(
    raw: RawBookingRow,
    path: &Path,
    reference_date: NaiveDate,
) -> Result<BookingRecord> {
    let checkin = parse_date(&raw.checkin, path)?;
    let checkout = parse_date(&raw.checkout, path)?;
    let subtrip_index = parse_subtrip_ordinal(&raw.utrip_id)?;

    Ok(BookingRecord {
        user_id: UserId(raw.user_id),
        utrip_id: raw.utrip_id,
        checkin,
        checkout,
        booker_country: raw.booker_country,
        hotel_country: raw.hotel_country,
        affiliate_id: raw.affiliate_id,
        city_id: raw.city_id,
        device_class: raw.device_class,
        days_stayed: (checkout - checkin).num_days(),
        days_since: (reference_date - checkin).num_days(),
        subtrip_index,
    })
}

fn parse_date(value: &str, path: &Path) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| NextstayError::Schema {
        path: path.display().to_string(),
        message: format!("unparsable date '{}'", value),
    })
}

/// Parse the sub-trip ordinal from a trip identifier of the form
/// "<trip>_<ordinal>".
pub fn parse_subtrip_ordinal(utrip_id: &str) -> Result<i64> {
    let suffix = utrip_id
        .rsplit('_')
        .next()
        .ok_or_else(|| NextstayError::Parse(format!("malformed utrip_id '{}'", utrip_id)))?;
    suffix
        .parse::<i64>()
        .map_err(|_| NextstayError::Parse(format!("malformed utrip_id '{}'", utrip_id)))
}

/// Drop records without a destination label.
///
/// The held-out corpus contains rows with an empty hotel_country; they
/// carry no usable label and are removed before aggregation. Training
/// input is assumed to have none.
pub fn drop_missing_destination(records: Vec<BookingRecord>) -> Vec<BookingRecord> {
    let before = records.len();
    let kept: Vec<BookingRecord> = records.into_iter().filter(|r| r.has_destination()).collect();
    let dropped = before - kept.len();
    if dropped > 0 {
        warn!("Dropped {} bookings with missing hotel_country", dropped);
    }
    kept
}
