//! Data models for the travel planner
//!
//! This module contains the core domain models organized by concern:
//! - Preferences: what the traveler asked for
//! - Profile: structured knowledge about a destination

pub mod preferences;
pub mod profile;

// Re-export all public types for convenient access
pub use preferences::{AccommodationType, AdventureLevel, TravelPreferences};
pub use profile::{BudgetTier, DailyBudget, DestinationProfile, ParseError};
