//! Destination knowledge store
//!
//! Resolves a destination name to a [`DestinationProfile`]. Curated profiles
//! are served directly. Any other destination is generated once by the
//! text-generation provider and memoized for the lifetime of the store;
//! if generation or parsing fails, a generic profile naming the destination
//! is memoized instead, so lookups never fail. A cancelled lookup also gets
//! the generic profile, but nothing is stored and the next lookup retries.
//!
//! Each key owns a `tokio::sync::OnceCell`, which makes generation
//! single-flight: concurrent lookups of the same key share one provider call.
//! Entries still being generated are never evicted.

pub mod curated;

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;
use tokio::sync::OnceCell;
use tracing::{debug, info, instrument, warn};

use crate::TravelPlannerError;
use crate::cancel::CancelToken;
use crate::config::KnowledgeConfig;
use crate::llm::{Message, ProviderError, SamplingConfig, TextGenerator};
use crate::models::DestinationProfile;

pub use curated::CURATED_PROFILES;

/// Where a looked-up profile came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileOrigin {
    /// Served from the curated table
    Curated,
    /// Served from an earlier lookup of the same key
    Memoized,
    /// Generated by this lookup
    Generated,
    /// Generation failed or was cancelled in this lookup; the generic profile
    /// was returned
    Fallback,
}

#[derive(Debug, Clone)]
struct GeneratedEntry {
    profile: DestinationProfile,
    parsed: bool,
}

#[derive(Default)]
struct Memo {
    cells: HashMap<String, Arc<OnceCell<GeneratedEntry>>>,
    /// Insertion order, oldest first
    order: VecDeque<String>,
}

pub struct KnowledgeStore {
    generator: Arc<dyn TextGenerator>,
    sampling: SamplingConfig,
    max_generated: usize,
    memo: Mutex<Memo>,
}

impl KnowledgeStore {
    pub fn new(generator: Arc<dyn TextGenerator>, config: &KnowledgeConfig) -> Self {
        Self {
            generator,
            sampling: config.sampling(),
            max_generated: config.max_generated_profiles,
            memo: Mutex::new(Memo::default()),
        }
    }

    /// Case-insensitive key with inner whitespace collapsed
    #[must_use]
    pub fn normalize_key(name: &str) -> String {
        name.split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase()
    }

    #[must_use]
    pub fn is_curated(name: &str) -> bool {
        CURATED_PROFILES.contains_key(Self::normalize_key(name).as_str())
    }

    pub async fn lookup(&self, name: &str, cancel: &CancelToken) -> DestinationProfile {
        self.lookup_with_origin(name, cancel).await.0
    }

    /// Like [`KnowledgeStore::lookup`], also reporting where the profile came from
    #[instrument(level = "debug", skip(self, cancel))]
    pub async fn lookup_with_origin(
        &self,
        name: &str,
        cancel: &CancelToken,
    ) -> (DestinationProfile, ProfileOrigin) {
        let key = Self::normalize_key(name);
        if let Some(profile) = CURATED_PROFILES.get(key.as_str()) {
            debug!(%key, "curated profile");
            return (profile.clone(), ProfileOrigin::Curated);
        }

        let cell = self.cell_for(&key);
        let mut generated_here = false;
        let entry = match cell
            .get_or_try_init(|| {
                generated_here = true;
                self.generate_profile(name.trim(), cancel)
            })
            .await
        {
            Ok(entry) => entry,
            Err(e) => {
                debug!(%key, error = %e, "lookup cancelled, profile not memoized");
                self.forget_abandoned(&key, &cell);
                return (
                    DestinationProfile::generic(name.trim()),
                    ProfileOrigin::Fallback,
                );
            }
        };

        let origin = match (generated_here, entry.parsed) {
            (false, _) => ProfileOrigin::Memoized,
            (true, true) => ProfileOrigin::Generated,
            (true, false) => ProfileOrigin::Fallback,
        };
        debug!(%key, ?origin, "profile resolved");
        (entry.profile.clone(), origin)
    }

    /// Number of generated profiles currently memoized, not counting
    /// lookups still in flight
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock_memo()
            .cells
            .values()
            .filter(|cell| cell.initialized())
            .count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether a generated profile is memoized for `name`
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        let key = Self::normalize_key(name);
        self.lock_memo()
            .cells
            .get(&key)
            .is_some_and(|cell| cell.initialized())
    }

    /// Forget every generated profile
    pub fn clear(&self) {
        let mut memo = self.lock_memo();
        memo.cells.clear();
        memo.order.clear();
    }

    fn lock_memo(&self) -> std::sync::MutexGuard<'_, Memo> {
        self.memo.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Cell for `key`, inserting (and evicting the oldest settled entry) when new.
    ///
    /// A cell is settled once it holds a profile, or when no lookup holds a
    /// reference to it. In-flight cells are skipped, so the memo may exceed
    /// its bound while more lookups than the bound are running.
    fn cell_for(&self, key: &str) -> Arc<OnceCell<GeneratedEntry>> {
        let mut memo = self.lock_memo();
        if let Some(cell) = memo.cells.get(key) {
            return Arc::clone(cell);
        }

        let cell = Arc::new(OnceCell::new());
        memo.cells.insert(key.to_string(), Arc::clone(&cell));
        memo.order.push_back(key.to_string());

        if self.max_generated > 0 {
            while memo.cells.len() > self.max_generated {
                let settled = memo.order.iter().position(|k| {
                    memo.cells
                        .get(k)
                        .is_some_and(|c| c.initialized() || Arc::strong_count(c) == 1)
                });
                let Some(oldest) = settled.and_then(|pos| memo.order.remove(pos)) else {
                    debug!(entries = memo.cells.len(), "memo over bound, remaining entries in flight");
                    break;
                };
                memo.cells.remove(&oldest);
                info!(key = %oldest, "evicted generated profile");
            }
        }
        cell
    }

    /// Drop `cell` from the memo if it is still empty and no other lookup holds it
    fn forget_abandoned(&self, key: &str, cell: &Arc<OnceCell<GeneratedEntry>>) {
        let mut memo = self.lock_memo();
        let abandoned = memo.cells.get(key).is_some_and(|current| {
            Arc::ptr_eq(current, cell) && !cell.initialized() && Arc::strong_count(cell) == 2
        });
        if abandoned {
            memo.cells.remove(key);
            memo.order.retain(|k| k != key);
        }
    }

    /// Generate and parse a profile for `name`.
    ///
    /// Provider and parse failures yield the generic profile; only
    /// cancellation is returned as an error, so it is never memoized.
    async fn generate_profile(
        &self,
        name: &str,
        cancel: &CancelToken,
    ) -> Result<GeneratedEntry, ProviderError> {
        info!(destination = %name, "generating destination profile");
        let messages = [Message::user(profile_instruction(name))];

        let outcome = match cancel
            .guard(self.generator.generate(&messages, &self.sampling))
            .await
        {
            Ok(document) => DestinationProfile::parse(&document).map_err(TravelPlannerError::from),
            Err(ProviderError::Cancelled) => return Err(ProviderError::Cancelled),
            Err(e) => Err(TravelPlannerError::from(e)),
        };

        Ok(match outcome {
            Ok(profile) => GeneratedEntry {
                profile,
                parsed: true,
            },
            Err(e) => {
                warn!(destination = %name, error = %e, "profile generation failed, using generic profile");
                GeneratedEntry {
                    profile: DestinationProfile::generic(name),
                    parsed: false,
                }
            }
        })
    }
}

/// Instruction asking for exactly the profile schema as JSON
#[must_use]
pub fn profile_instruction(name: &str) -> String {
    format!(
        r#"You are an expert in Spanish tourism. Provide detailed information about {name}, Spain, in exactly the following JSON format:

{{
    "description": "2-3 line description of the city, its history and main characteristics",
    "attractions": [
        "Attraction 1 - Short description",
        "Attraction 2 - Short description",
        "Attraction 3 - Short description",
        "Attraction 4 - Short description",
        "Attraction 5 - Short description"
    ],
    "gastronomy": [
        "Typical dish 1 - Short description",
        "Typical dish 2 - Short description",
        "Typical dish 3 - Short description"
    ],
    "daily_budget": {{"low": 45, "medium": 90, "high": 180}},
    "best_season": "Description of the best time to visit",
    "transport": "Information about local transport",
    "local_tips": [
        "Tip 1 specific to the city",
        "Tip 2 specific to the city",
        "Tip 3 specific to the city"
    ]
}}

IMPORTANT: Respond ONLY with the JSON, without any additional text. If the city does not exist in Spain, use general Spanish information."#
    )
}
