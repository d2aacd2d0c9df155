//! Trip-history feature aggregation
//!
//! Summarizes each user's ordered booking history into one aggregate row,
//! holding out the chronologically last booking as the label source so no
//! target information leaks into the features.

use crate::{BookingRecord, UserId};
use log::warn;
use std::collections::{BTreeMap, HashSet};

/// One user's summarized booking history, excluding their most recent booking
#[derive(Debug, Clone, PartialEq)]
pub struct UserAggregate {
    pub user_id: UserId,
    /// Number of retained bookings
    pub no_of_trips: usize,
    pub no_of_unique_booking_locations: usize,
    pub first_booking_location: String,
    pub last_booking_location: String,
    pub no_of_unique_destinations: usize,
    pub first_destination: String,
    pub last_destination: String,
    pub no_of_unique_affiliates: usize,
    pub first_affiliate: i64,
    pub last_affiliate: i64,
    pub no_of_unique_cities: usize,
    pub first_city: i64,
    pub last_city: i64,
    pub total_days_stayed: i64,
    pub avg_days_stayed: f32,
    pub first_days_stayed: i64,
    pub last_days_stayed: i64,
    pub days_since_first_trip: i64,
    pub days_since_last_trip: i64,
    pub no_of_unique_devices: usize,
    pub first_device: String,
    pub last_device: String,
    pub last_subtrip_index: i64,
}

/// An aggregate row joined with its label, the destination of the user's
/// held-out last booking
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledAggregate {
    pub features: UserAggregate,
    pub label: String,
}

/// Build one labeled aggregate per user from a flat sequence of bookings.
///
/// Bookings are stable-sorted by check-in date ascending before grouping,
/// so bookings sharing a check-in date keep their input order. For each
/// user the final booking becomes the label and the rest feed the
/// aggregate. Users with a single booking have nothing left to aggregate
/// after the hold-out and are skipped. Output is ordered by user id.
pub fn aggregate_users(records: &[BookingRecord]) -> Vec<LabeledAggregate> {
    let mut ordered: Vec<&BookingRecord> = records.iter().collect();
    ordered.sort_by_key(|r| r.checkin);

    let mut by_user: BTreeMap<UserId, Vec<&BookingRecord>> = BTreeMap::new();
    for record in ordered {
        by_user.entry(record.user_id).or_default().push(record);
    }

    let mut aggregates = Vec::with_capacity(by_user.len());
    let mut skipped = 0usize;
    for (user_id, history) in by_user {
        let (last, rest) = match history.split_last() {
            Some(split) => split,
            None => continue,
        };
        if rest.is_empty() {
            skipped += 1;
            continue;
        }
        aggregates.push(LabeledAggregate {
            features: summarize(user_id, rest),
            label: last.hotel_country.clone(),
        });
    }

    if skipped > 0 {
        warn!("Skipped {} single-booking users with no feature history", skipped);
    }
    aggregates
}

/// Reduce an ordered, non-empty booking slice into one aggregate row
fn summarize(user_id: UserId, history: &[&BookingRecord]) -> UserAggregate {
    let first = history[0];
    let last = history[history.len() - 1];

    let total_days_stayed: i64 = history.iter().map(|r| r.days_stayed).sum();

    UserAggregate {
        user_id,
        no_of_trips: history.len(),
        no_of_unique_booking_locations: unique_count(history, |r| r.booker_country.as_str()),
        first_booking_location: first.booker_country.clone(),
        last_booking_location: last.booker_country.clone(),
        no_of_unique_destinations: unique_count(history, |r| r.hotel_country.as_str()),
        first_destination: first.hotel_country.clone(),
        last_destination: last.hotel_country.clone(),
        no_of_unique_affiliates: unique_count(history, |r| r.affiliate_id),
        first_affiliate: first.affiliate_id,
        last_affiliate: last.affiliate_id,
        no_of_unique_cities: unique_count(history, |r| r.city_id),
        first_city: first.city_id,
        last_city: last.city_id,
        total_days_stayed,
        avg_days_stayed: total_days_stayed as f32 / history.len() as f32,
        first_days_stayed: first.days_stayed,
        last_days_stayed: last.days_stayed,
        days_since_first_trip: first.days_since,
        days_since_last_trip: last.days_since,
        no_of_unique_devices: unique_count(history, |r| r.device_class.as_str()),
        first_device: first.device_class.clone(),
        last_device: last.device_class.clone(),
        last_subtrip_index: last.subtrip_index,
    }
}

fn unique_count<'a, T, F>(history: &[&'a BookingRecord], field: F) -> usize
where
    T: std::hash::Hash + Eq,
    F: Fn(&'a BookingRecord) -> T,
{
    history.iter().map(|&r| field(r)).collect::<HashSet<T>>().len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BookingRecord;
    use chrono::NaiveDate;

    fn booking(user: i64, trip: &str, country: &str, day: u32) -> BookingRecord {
        let checkin = NaiveDate::from_ymd_opt(2021, 1, day).unwrap();
        BookingRecord {
            user_id: UserId(user),
            utrip_id: trip.to_string(),
            checkin,
            checkout: checkin + chrono::Duration::days(2),
            booker_country: "Elbonia".to_string(),
            hotel_country: country.to_string(),
            affiliate_id: 359,
            city_id: 8183,
            device_class: "desktop".to_string(),
            days_stayed: 2,
            days_since: 100 - day as i64,
            subtrip_index: trip
                .rsplit('_')
                .next()
                .and_then(|s| s.parse().ok())
                .unwrap_or(0),
        }
    }

    #[test]
    fn test_last_booking_becomes_label() {
        let records = vec![
            booking(1, "1_1", "Gondal", 1),
            booking(1, "1_2", "Borduria", 5),
            booking(1, "1_3", "Syldavia", 9),
        ];
        let aggregates = aggregate_users(&records);

        assert_eq!(aggregates.len(), 1);
        let row = &aggregates[0];
        assert_eq!(row.label, "Syldavia");
        assert_eq!(row.features.no_of_trips, 2);
        assert_eq!(row.features.first_destination, "Gondal");
        assert_eq!(row.features.last_destination, "Borduria");
    }

    #[test]
    fn test_no_leakage_from_held_out_booking() {
        // Sentinel values appear only in the final booking.
        let mut sentinel = booking(1, "1_3", "SENTINEL", 9);
        sentinel.booker_country = "SENTINEL".to_string();
        sentinel.device_class = "SENTINEL".to_string();
        sentinel.affiliate_id = 999_999;
        sentinel.city_id = 999_999;

        let records = vec![
            booking(1, "1_1", "Gondal", 1),
            booking(1, "1_2", "Borduria", 5),
            sentinel,
        ];
        let aggregates = aggregate_users(&records);
        let features = &aggregates[0].features;

        assert_ne!(features.first_destination, "SENTINEL");
        assert_ne!(features.last_destination, "SENTINEL");
        assert_ne!(features.first_booking_location, "SENTINEL");
        assert_ne!(features.last_booking_location, "SENTINEL");
        assert_ne!(features.first_device, "SENTINEL");
        assert_ne!(features.last_device, "SENTINEL");
        assert_ne!(features.first_affiliate, 999_999);
        assert_ne!(features.last_affiliate, 999_999);
        assert_ne!(features.first_city, 999_999);
        assert_ne!(features.last_city, 999_999);
        assert_eq!(features.no_of_unique_destinations, 2);
        assert_eq!(features.no_of_unique_booking_locations, 1);
        assert_eq!(features.no_of_unique_devices, 1);
    }

    #[test]
    fn test_two_booking_user_first_equals_last() {
        let records = vec![
            booking(1, "1_1", "Gondal", 1),
            booking(1, "1_2", "Borduria", 5),
        ];
        let aggregates = aggregate_users(&records);
        let features = &aggregates[0].features;

        assert_eq!(features.no_of_trips, 1);
        assert_eq!(features.first_destination, features.last_destination);
        assert_eq!(features.first_destination, "Gondal");
        assert_eq!(features.first_days_stayed, features.last_days_stayed);
        assert_eq!(features.days_since_first_trip, features.days_since_last_trip);
    }

    #[test]
    fn test_single_booking_user_is_skipped() {
        let records = vec![
            booking(1, "1_1", "Gondal", 1),
            booking(2, "2_1", "Borduria", 2),
            booking(2, "2_2", "Gondal", 6),
        ];
        let aggregates = aggregate_users(&records);

        assert_eq!(aggregates.len(), 1);
        assert_eq!(aggregates[0].features.user_id, UserId(2));
    }

    #[test]
    fn test_checkin_ties_keep_input_order() {
        // Two bookings share a check-in date; the later input row stays last
        // and becomes the label.
        let records = vec![
            booking(1, "1_1", "Gondal", 1),
            booking(1, "1_2", "Borduria", 5),
            booking(1, "1_3", "Syldavia", 5),
        ];
        let aggregates = aggregate_users(&records);

        assert_eq!(aggregates[0].label, "Syldavia");
        assert_eq!(aggregates[0].features.last_destination, "Borduria");
    }

    #[test]
    fn test_sorting_is_global_not_input_order() {
        // Input arrives out of chronological order; the label must come
        // from the latest check-in, not the last row.
        let records = vec![
            booking(1, "1_3", "Syldavia", 9),
            booking(1, "1_1", "Gondal", 1),
            booking(1, "1_2", "Borduria", 5),
        ];
        let aggregates = aggregate_users(&records);

        assert_eq!(aggregates[0].label, "Syldavia");
        assert_eq!(aggregates[0].features.first_destination, "Gondal");
    }

    #[test]
    fn test_day_reductions() {
        let mut first = booking(1, "1_1", "Gondal", 1);
        first.days_stayed = 2;
        let mut second = booking(1, "1_2", "Borduria", 5);
        second.days_stayed = 5;
        let records = vec![first, second, booking(1, "1_3", "Syldavia", 9)];

        let aggregates = aggregate_users(&records);
        let features = &aggregates[0].features;
        assert_eq!(features.total_days_stayed, 7);
        assert!((features.avg_days_stayed - 3.5).abs() < f32::EPSILON);
        assert_eq!(features.first_days_stayed, 2);
        assert_eq!(features.last_days_stayed, 5);
    }

    #[test]
    fn test_output_ordered_by_user_id() {
        let records = vec![
            booking(5, "5_1", "Gondal", 1),
            booking(5, "5_2", "Gondal", 3),
            booking(2, "2_1", "Borduria", 2),
            booking(2, "2_2", "Gondal", 6),
        ];
        let aggregates = aggregate_users(&records);
        let ids: Vec<UserId> = aggregates.iter().map(|a| a.features.user_id).collect();
        assert_eq!(ids, vec![UserId(2), UserId(5)]);
    }
}
