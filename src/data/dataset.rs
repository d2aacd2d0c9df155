//! Model-ready dataset assembly
//!
//! Flattens labeled user aggregates into a numeric feature matrix using a
//! fitted ordinal encoder. Labels stay as country strings; the classifier
//! maps them to class indices through its own vocabulary.

use crate::features::encoding::CategoricalColumn;
use crate::features::{LabeledAggregate, OrdinalEncoder, UserAggregate};
use crate::{Result, UserId};

/// Width of one encoded feature row
pub const FEATURE_DIM: usize = 23;

/// Feature column names, in row order
pub const FEATURE_NAMES: [&str; FEATURE_DIM] = [
    "no_of_trips",
    "no_of_unique_booking_locations",
    "first_booking_location",
    "last_booking_location",
    "no_of_unique_destinations",
    "first_destination",
    "last_destination",
    "no_of_unique_affiliates",
    "first_affiliate",
    "last_affiliate",
    "no_of_unique_cities",
    "first_city",
    "last_city",
    "total_days_stayed",
    "avg_days_stayed",
    "first_days_stayed",
    "last_days_stayed",
    "days_since_first_trip",
    "days_since_last_trip",
    "no_of_unique_devices",
    "first_device",
    "last_device",
    "last_subtrip_index",
];

/// Encoded aggregates ready for the classifier
#[derive(Debug, Clone)]
pub struct EncodedDataset {
    pub user_ids: Vec<UserId>,
    /// Row-major feature matrix, one row of [`FEATURE_DIM`] values per user
    pub features: Vec<Vec<f32>>,
    /// Destination-country label per user
    pub labels: Vec<String>,
}

impl EncodedDataset {
    /// Encode labeled aggregates with a fitted encoder.
    ///
    /// Fails on any categorical value absent from the encoder's fit-time
    /// vocabulary; held-out callers must pre-filter such rows.
    pub fn from_aggregates(
        aggregates: &[LabeledAggregate],
        encoder: &OrdinalEncoder,
    ) -> Result<Self> {
        let mut user_ids = Vec::with_capacity(aggregates.len());
        let mut features = Vec::with_capacity(aggregates.len());
        let mut labels = Vec::with_capacity(aggregates.len());

        for row in aggregates {
            user_ids.push(row.features.user_id);
            features.push(feature_row(&row.features, encoder)?);
            labels.push(row.label.clone());
        }

        Ok(EncodedDataset {
            user_ids,
            features,
            labels,
        })
    }

    pub fn len(&self) -> usize {
        self.user_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.user_ids.is_empty()
    }
}

fn feature_row(aggregate: &UserAggregate, encoder: &OrdinalEncoder) -> Result<Vec<f32>> {
    let encode = |column: CategoricalColumn| -> Result<f32> {
        Ok(encoder.encode(column, column.value(aggregate))? as f32)
    };

    Ok(vec![
        aggregate.no_of_trips as f32,
        aggregate.no_of_unique_booking_locations as f32,
        encode(CategoricalColumn::FirstBookingLocation)?,
        encode(CategoricalColumn::LastBookingLocation)?,
        aggregate.no_of_unique_destinations as f32,
        encode(CategoricalColumn::FirstDestination)?,
        encode(CategoricalColumn::LastDestination)?,
        aggregate.no_of_unique_affiliates as f32,
        aggregate.first_affiliate as f32,
        aggregate.last_affiliate as f32,
        aggregate.no_of_unique_cities as f32,
        aggregate.first_city as f32,
        aggregate.last_city as f32,
        aggregate.total_days_stayed as f32,
        aggregate.avg_days_stayed,
        aggregate.first_days_stayed as f32,
        aggregate.last_days_stayed as f32,
        aggregate.days_since_first_trip as f32,
        aggregate.days_since_last_trip as f32,
        aggregate.no_of_unique_devices as f32,
        encode(CategoricalColumn::FirstDevice)?,
        encode(CategoricalColumn::LastDevice)?,
        aggregate.last_subtrip_index as f32,
    ])
}
