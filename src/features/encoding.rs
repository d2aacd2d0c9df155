//! Ordinal encoding of categorical aggregate columns
//!
//! One encoder is fit on the training aggregates and reused, unmodified, on
//! the held-out aggregates. The fitted vocabulary is an immutable value; both
//! transform calls take it by shared reference.

use crate::features::{LabeledAggregate, UserAggregate};
use crate::{NextstayError, Result};
use log::warn;
use std::collections::BTreeSet;

/// Bogus placeholder country names that occur in the held-out corpus but
/// never during training. Rows containing them are dropped outright rather
/// than handled as generic unseen categories. A narrow fix for a known
/// data-quality issue, not a novelty-detection strategy.
pub const PLACEHOLDER_COUNTRIES: [&str; 5] =
    ["Romanza", "Takistan", "Maltovia", "Basran", "Pokolistan"];

/// String-typed categorical columns of the user aggregate.
///
/// Affiliate and city identifiers are already numeric and pass through
/// unencoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoricalColumn {
    FirstBookingLocation,
    LastBookingLocation,
    FirstDestination,
    LastDestination,
    FirstDevice,
    LastDevice,
}

impl CategoricalColumn {
    pub const ALL: [CategoricalColumn; 6] = [
        CategoricalColumn::FirstBookingLocation,
        CategoricalColumn::LastBookingLocation,
        CategoricalColumn::FirstDestination,
        CategoricalColumn::LastDestination,
        CategoricalColumn::FirstDevice,
        CategoricalColumn::LastDevice,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            CategoricalColumn::FirstBookingLocation => "first_booking_location",
            CategoricalColumn::LastBookingLocation => "last_booking_location",
            CategoricalColumn::FirstDestination => "first_destination",
            CategoricalColumn::LastDestination => "last_destination",
            CategoricalColumn::FirstDevice => "first_device",
            CategoricalColumn::LastDevice => "last_device",
        }
    }

    /// Extract this column's value from an aggregate row
    pub fn value<'a>(&self, aggregate: &'a UserAggregate) -> &'a str {
        match self {
            CategoricalColumn::FirstBookingLocation => &aggregate.first_booking_location,
            CategoricalColumn::LastBookingLocation => &aggregate.last_booking_location,
            CategoricalColumn::FirstDestination => &aggregate.first_destination,
            CategoricalColumn::LastDestination => &aggregate.last_destination,
            CategoricalColumn::FirstDevice => &aggregate.first_device,
            CategoricalColumn::LastDevice => &aggregate.last_device,
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

/// Ordinal encoder fit once on the training aggregates.
///
/// Categories receive integer codes in sorted order, fixed at fit time.
/// Transforming a value absent from the fit-time vocabulary is an error;
/// callers must pre-filter unseen categories.
#[derive(Debug, Clone)]
pub struct OrdinalEncoder {
    /// Sorted category list per column; a category's position is its code
    vocabularies: [Vec<String>; 6],
}

impl OrdinalEncoder {
    /// Fit the per-column vocabularies on training aggregates
    pub fn fit(aggregates: &[LabeledAggregate]) -> Self {
        let vocabularies = CategoricalColumn::ALL.map(|column| {
            aggregates
                .iter()
                .map(|row| column.value(&row.features).to_string())
                .collect::<BTreeSet<String>>()
                .into_iter()
                .collect::<Vec<String>>()
        });
        OrdinalEncoder { vocabularies }
    }

    /// Encode one category value to its integer code
    pub fn encode(&self, column: CategoricalColumn, value: &str) -> Result<u32> {
        self.vocabularies[column.index()]
            .binary_search_by(|category| category.as_str().cmp(value))
            .map(|code| code as u32)
            .map_err(|_| NextstayError::UnknownCategory {
                column: column.name(),
                value: value.to_string(),
            })
    }

    /// Decode an integer code back to its category value
    pub fn decode(&self, column: CategoricalColumn, code: u32) -> Option<&str> {
        self.vocabularies[column.index()]
            .get(code as usize)
            .map(String::as_str)
    }

    /// Vocabulary size for a column
    pub fn cardinality(&self, column: CategoricalColumn) -> usize {
        self.vocabularies[column.index()].len()
    }
}

/// Mapping between training label strings and class indices
#[derive(Debug, Clone)]
pub struct LabelVocabulary {
    labels: Vec<String>,
}

impl LabelVocabulary {
    /// Fit on the training labels, sorted unique
    pub fn fit(labels: &[String]) -> Self {
        let labels = labels
            .iter()
            .cloned()
            .collect::<BTreeSet<String>>()
            .into_iter()
            .collect();
        LabelVocabulary { labels }
    }

    pub fn encode(&self, label: &str) -> Result<usize> {
        self.labels
            .binary_search_by(|candidate| candidate.as_str().cmp(label))
            .map_err(|_| NextstayError::UnknownLabel(label.to_string()))
    }

    pub fn decode(&self, class: usize) -> Option<&str> {
        self.labels.get(class).map(String::as_str)
    }

    /// Number of classes
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Drop held-out aggregate rows containing a placeholder country name in the
/// label or any categorical feature column.
pub fn drop_placeholder_rows(aggregates: Vec<LabeledAggregate>) -> Vec<LabeledAggregate> {
    let before = aggregates.len();
    let kept: Vec<LabeledAggregate> = aggregates
        .into_iter()
        .filter(|row| {
            !is_placeholder(&row.label)
                && !CategoricalColumn::ALL
                    .iter()
                    .any(|column| is_placeholder(column.value(&row.features)))
        })
        .collect();
    let dropped = before - kept.len();
    if dropped > 0 {
        warn!("Dropped {} held-out rows containing placeholder countries", dropped);
    }
    kept
}

fn is_placeholder(value: &str) -> bool {
    PLACEHOLDER_COUNTRIES.contains(&value)
}
