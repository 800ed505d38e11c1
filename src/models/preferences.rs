//! Traveler preferences collected for a single itinerary request

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::TravelPlannerError;

/// Preferred kind of lodging
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccommodationType {
    Hotel,
    Hostel,
    Apartment,
    RuralHouse,
}

impl AccommodationType {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            AccommodationType::Hotel => "Hotel",
            AccommodationType::Hostel => "Hostel",
            AccommodationType::Apartment => "Apartment",
            AccommodationType::RuralHouse => "Rural house",
        }
    }
}

impl fmt::Display for AccommodationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for AccommodationType {
    type Err = TravelPlannerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', '_'], " ").as_str() {
            "hotel" => Ok(AccommodationType::Hotel),
            "hostel" | "hostal" => Ok(AccommodationType::Hostel),
            "apartment" | "apartamento" => Ok(AccommodationType::Apartment),
            "rural house" | "rural" | "casa rural" => Ok(AccommodationType::RuralHouse),
            other => Err(TravelPlannerError::validation(format!(
                "Unknown accommodation type '{other}'. Must be one of: hotel, hostel, apartment, rural-house"
            ))),
        }
    }
}

/// How active the trip should be, ordered from calmest to most demanding
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum AdventureLevel {
    Relaxed,
    #[default]
    Moderate,
    Intense,
}

impl AdventureLevel {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            AdventureLevel::Relaxed => "Relaxed",
            AdventureLevel::Moderate => "Moderate",
            AdventureLevel::Intense => "Intense",
        }
    }
}

impl fmt::Display for AdventureLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for AdventureLevel {
    type Err = TravelPlannerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "relaxed" | "relajado" => Ok(AdventureLevel::Relaxed),
            "moderate" | "moderado" => Ok(AdventureLevel::Moderate),
            "intense" | "intenso" => Ok(AdventureLevel::Intense),
            other => Err(TravelPlannerError::validation(format!(
                "Unknown adventure level '{other}'. Must be one of: relaxed, moderate, intense"
            ))),
        }
    }
}

/// Preferences for one itinerary request.
///
/// Construction validates the invariants the pipeline relies on
/// (non-empty destination, `duration_days >= 1`, finite non-negative budget),
/// so [`TravelPreferences::daily_budget`] never divides by zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TravelPreferences {
    destination: String,
    duration_days: u32,
    budget: f64,
    interests: Vec<String>,
    accommodation: AccommodationType,
    adventure_level: AdventureLevel,
    restrictions: String,
}

impl TravelPreferences {
    /// Create preferences with default accommodation (hotel), moderate
    /// adventure level, no interests and no restrictions.
    pub fn new<S: Into<String>>(
        destination: S,
        duration_days: u32,
        budget: f64,
    ) -> crate::Result<Self> {
        let destination = destination.into().trim().to_string();
        if destination.is_empty() {
            return Err(TravelPlannerError::validation("Destination cannot be empty"));
        }
        if duration_days == 0 {
            return Err(TravelPlannerError::validation(
                "Duration must be at least 1 day",
            ));
        }
        if !budget.is_finite() || budget < 0.0 {
            return Err(TravelPlannerError::validation(format!(
                "Budget must be a non-negative amount, got {budget}"
            )));
        }

        Ok(Self {
            destination,
            duration_days,
            budget,
            interests: Vec::new(),
            accommodation: AccommodationType::Hotel,
            adventure_level: AdventureLevel::default(),
            restrictions: String::new(),
        })
    }

    /// Set the interests. Blank entries and case-insensitive duplicates are
    /// dropped; the first spelling and the given order are kept for display.
    #[must_use]
    pub fn with_interests<I, S>(mut self, interests: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut kept: Vec<String> = Vec::new();
        for interest in interests {
            let interest = interest.into().trim().to_string();
            if interest.is_empty() {
                continue;
            }
            if kept.iter().any(|k| k.eq_ignore_ascii_case(&interest)) {
                continue;
            }
            kept.push(interest);
        }
        self.interests = kept;
        self
    }

    #[must_use]
    pub fn with_accommodation(mut self, accommodation: AccommodationType) -> Self {
        self.accommodation = accommodation;
        self
    }

    #[must_use]
    pub fn with_adventure_level(mut self, level: AdventureLevel) -> Self {
        self.adventure_level = level;
        self
    }

    #[must_use]
    pub fn with_restrictions<S: Into<String>>(mut self, restrictions: S) -> Self {
        self.restrictions = restrictions.into().trim().to_string();
        self
    }

    #[must_use]
    pub fn destination(&self) -> &str {
        &self.destination
    }

    #[must_use]
    pub fn duration_days(&self) -> u32 {
        self.duration_days
    }

    /// Total budget in euros
    #[must_use]
    pub fn budget(&self) -> f64 {
        self.budget
    }

    #[must_use]
    pub fn interests(&self) -> &[String] {
        &self.interests
    }

    #[must_use]
    pub fn accommodation(&self) -> AccommodationType {
        self.accommodation
    }

    #[must_use]
    pub fn adventure_level(&self) -> AdventureLevel {
        self.adventure_level
    }

    /// Free-text restrictions, empty when none were given
    #[must_use]
    pub fn restrictions(&self) -> &str {
        &self.restrictions
    }

    /// Budget available per day of the trip
    #[must_use]
    pub fn daily_budget(&self) -> f64 {
        self.budget / f64::from(self.duration_days)
    }

    /// Interests joined for display, e.g. "Culture, Gastronomy"
    #[must_use]
    pub fn interests_display(&self) -> String {
        self.interests.join(", ")
    }
}
