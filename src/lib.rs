//! `TravelPlanner` - Retrieval-augmented travel itinerary planning
//!
//! This library resolves destination knowledge, ranks it against the
//! traveler's preferences, asks a language model for a day-by-day plan and
//! scores the result. Every provider failure degrades to a deterministic
//! fallback, so planning always yields an itinerary.

pub mod cancel;
pub mod catalogue;
pub mod config;
pub mod error;
pub mod generator;
pub mod knowledge;
pub mod llm;
pub mod models;
pub mod prompt;
pub mod quality;
pub mod ranking;
pub mod telemetry;

// Re-export core types for public API
pub use cancel::CancelToken;
pub use catalogue::{DestinationMatch, resolve_destination};
pub use config::PlannerConfig;
pub use error::TravelPlannerError;
pub use generator::{Itinerary, ItineraryGenerator, ItinerarySource, TravelPlan};
pub use knowledge::{KnowledgeStore, ProfileOrigin};
pub use llm::{EmbeddingProvider, OpenAiClient, ProviderError, TextGenerator};
pub use models::{AccommodationType, AdventureLevel, DestinationProfile, TravelPreferences};
pub use prompt::{GenerationRequest, PromptBuilder};
pub use quality::{QualityReport, QualityValidator};
pub use ranking::{RankedContext, RelevanceRanker};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, TravelPlannerError>;
