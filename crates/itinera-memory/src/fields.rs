// SPDX-FileCopyrightText: 2026 Itinera Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fact field enums and their keyword trigger tables.
//!
//! Each tier has its own fixed field set. A field carries a static list of
//! trigger keywords (matched against the lowercased message) and a merge
//! kind deciding whether new values replace or union with stored ones.
//! Both tables are compile-time data, never mutated at runtime.

use strum::{Display, EnumIter, EnumString};

/// How incoming values combine with an existing stored value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeKind {
    /// The new value replaces the stored one outright.
    Single,
    /// Values accumulate as a sorted, deduplicated comma-space list.
    Multi,
}

/// A fact field with its extraction triggers and merge semantics.
///
/// The `Display` impl renders the snake_case storage key, which is also
/// the line label in a rendered context bundle.
pub trait ContextField:
    Copy + Ord + std::hash::Hash + std::fmt::Display + Send + Sync + 'static
{
    /// Keywords whose presence in a lowercased message marks this field.
    fn triggers(&self) -> &'static [&'static str];

    /// Replace-or-union semantics for this field.
    fn merge_kind(&self) -> MergeKind;
}

/// Persistent-tier fields, scoped to a user across all sessions.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumString, EnumIter,
)]
#[strum(serialize_all = "snake_case")]
pub enum PreferenceField {
    HomeAirport,
    PreferredAirline,
    TravelStyle,
    DietaryPreferences,
    LoyaltyProgrammes,
}

impl ContextField for PreferenceField {
    fn triggers(&self) -> &'static [&'static str] {
        match self {
            Self::HomeAirport => &["airport", "home airport", "depart from"],
            Self::PreferredAirline => &["airline", "flight preference", "carrier"],
            Self::TravelStyle => &["budget", "luxury", "adventure", "family-friendly"],
            Self::DietaryPreferences => &["vegan", "vegetarian", "halal", "kosher", "gluten-free"],
            Self::LoyaltyProgrammes => &[
                "loyalty program",
                "frequent flyer",
                "membership",
                "reward points",
            ],
        }
    }

    fn merge_kind(&self) -> MergeKind {
        match self {
            Self::DietaryPreferences | Self::LoyaltyProgrammes => MergeKind::Multi,
            _ => MergeKind::Single,
        }
    }
}

/// Temporary-tier fields, scoped to a single session.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumString, EnumIter,
)]
#[strum(serialize_all = "snake_case")]
pub enum SessionField {
    TripOrigin,
    TripDestination,
    DateRange,
    MaxBudget,
    NumberOfTravellers,
    TripPurpose,
    CurrentBookingStage,
    SelectedFlightId,
    SelectedHotelId,
    SelectedCarRentalId,
    SelectedActivities,
    CurrencyPreference,
    LanguagePreference,
    TimeZonePreference,
    ChattingPreference,
}

impl ContextField for SessionField {
    fn triggers(&self) -> &'static [&'static str] {
        match self {
            Self::TripOrigin => &["departing from", "trip origin", "leaving from"],
            Self::TripDestination => &["going to", "traveling to", "trip destination"],
            Self::DateRange => &["trip dates", "departure on", "return on"],
            Self::MaxBudget => &["budget", "maximum spending", "not exceeding"],
            Self::NumberOfTravellers => &["traveling with", "group size", "number of people"],
            Self::TripPurpose => &["business trip", "vacation", "honeymoon"],
            Self::CurrentBookingStage => &["now booking", "step", "choosing"],
            Self::SelectedFlightId => &["flight option", "choosing flight"],
            Self::SelectedHotelId => &["hotel option", "choosing hotel"],
            Self::SelectedCarRentalId => &["car rental option", "choosing car"],
            Self::SelectedActivities => &["booking activities", "things to do"],
            Self::CurrencyPreference => &["convert prices to", "currency preference"],
            Self::LanguagePreference => &["language setting", "chat in"],
            Self::TimeZonePreference => &["use time zone", "show times in"],
            Self::ChattingPreference => &["summarize", "detailed response"],
        }
    }

    fn merge_kind(&self) -> MergeKind {
        match self {
            Self::NumberOfTravellers
            | Self::SelectedFlightId
            | Self::SelectedHotelId
            | Self::SelectedCarRentalId
            | Self::SelectedActivities => MergeKind::Multi,
            _ => MergeKind::Single,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn display_renders_snake_case_storage_keys() {
        assert_eq!(PreferenceField::HomeAirport.to_string(), "home_airport");
        assert_eq!(SessionField::TripOrigin.to_string(), "trip_origin");
        assert_eq!(
            SessionField::SelectedCarRentalId.to_string(),
            "selected_car_rental_id"
        );
    }

    #[test]
    fn every_field_has_at_least_one_trigger() {
        for field in PreferenceField::iter() {
            assert!(!field.triggers().is_empty(), "{field} has no triggers");
        }
        for field in SessionField::iter() {
            assert!(!field.triggers().is_empty(), "{field} has no triggers");
        }
    }

    #[test]
    fn multi_valued_fields_are_the_accumulating_ones() {
        assert_eq!(
            PreferenceField::DietaryPreferences.merge_kind(),
            MergeKind::Multi
        );
        assert_eq!(
            PreferenceField::LoyaltyProgrammes.merge_kind(),
            MergeKind::Multi
        );
        assert_eq!(PreferenceField::TravelStyle.merge_kind(), MergeKind::Single);

        assert_eq!(
            SessionField::SelectedActivities.merge_kind(),
            MergeKind::Multi
        );
        assert_eq!(SessionField::TripOrigin.merge_kind(), MergeKind::Single);
        assert_eq!(
            SessionField::ChattingPreference.merge_kind(),
            MergeKind::Single
        );
    }

    #[test]
    fn fields_parse_from_storage_keys() {
        use std::str::FromStr;
        assert_eq!(
            PreferenceField::from_str("dietary_preferences").unwrap(),
            PreferenceField::DietaryPreferences
        );
        assert_eq!(
            SessionField::from_str("max_budget").unwrap(),
            SessionField::MaxBudget
        );
        assert!(SessionField::from_str("no_such_field").is_err());
    }
}
