//! Itinerary generation pipeline
//!
//! Runs the stages in order for one request: knowledge lookup, relevance
//! ranking, prompt assembly, then the text-generation call. Any failure of
//! that call (provider error, timeout, cancellation, blank output) is replaced
//! by a rule-based itinerary built from the preferences alone, so callers
//! always receive usable Markdown.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::cancel::CancelToken;
use crate::config::{GenerationConfig, PlannerConfig};
use crate::knowledge::{KnowledgeStore, ProfileOrigin};
use crate::llm::{EmbeddingProvider, ProviderError, SamplingConfig, TextGenerator};
use crate::models::{BudgetTier, DestinationProfile, TravelPreferences};
use crate::prompt::PromptBuilder;
use crate::quality::{ContentAnalysis, QualityReport, QualityValidator};
use crate::ranking::{RankedContext, RelevanceRanker};

/// How the itinerary text was produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ItinerarySource {
    Generated,
    /// Rule-based itinerary; `reason` is the failure that triggered it
    Fallback { reason: String },
}

impl ItinerarySource {
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }
}

/// Result of [`ItineraryGenerator::generate`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Itinerary {
    /// Markdown document
    pub text: String,
    pub source: ItinerarySource,
    /// Knowledge the request was grounded on
    pub context: RankedContext,
}

/// Profile facts reported with a plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileSummary {
    pub origin: ProfileOrigin,
    pub description: String,
    pub best_season: String,
    pub transport: String,
    /// Highest daily-budget tier the per-day budget covers
    pub budget_tier: BudgetTier,
    pub typical_daily_spend: u32,
}

impl ProfileSummary {
    fn new(profile: &DestinationProfile, origin: ProfileOrigin, per_day: f64) -> Self {
        let budget_tier = profile.daily_budget.tier_for(per_day);
        Self {
            origin,
            description: profile.description.clone(),
            best_season: profile.best_season.clone(),
            transport: profile.transport.clone(),
            budget_tier,
            typical_daily_spend: profile.daily_budget.get(budget_tier),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanMetadata {
    pub generated_at: DateTime<Utc>,
    pub model: String,
    pub temperature: f32,
    pub destination: String,
    pub duration_days: u32,
    pub budget: f64,
    pub daily_budget: f64,
    pub interests: Vec<String>,
    pub quality_score: u8,
    #[serde(flatten)]
    pub analysis: ContentAnalysis,
}

/// Everything produced for one request: the itinerary plus its metadata
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TravelPlan {
    pub itinerary: String,
    pub source: ItinerarySource,
    pub context: RankedContext,
    pub profile: ProfileSummary,
    pub quality: QualityReport,
    pub metadata: PlanMetadata,
}

pub struct ItineraryGenerator {
    knowledge: Arc<KnowledgeStore>,
    ranker: RelevanceRanker,
    prompts: PromptBuilder,
    generator: Arc<dyn TextGenerator>,
    sampling: SamplingConfig,
    timeout: Duration,
}

impl ItineraryGenerator {
    pub fn new(
        knowledge: Arc<KnowledgeStore>,
        ranker: RelevanceRanker,
        generator: Arc<dyn TextGenerator>,
        config: &GenerationConfig,
    ) -> Self {
        Self {
            knowledge,
            ranker,
            prompts: PromptBuilder::new(),
            generator,
            sampling: config.sampling(),
            timeout: config.timeout(),
        }
    }

    /// Wire the whole pipeline from configuration. The same text generator
    /// serves destination profiles and itineraries.
    pub fn from_config(
        config: &PlannerConfig,
        generator: Arc<dyn TextGenerator>,
        embedder: Arc<dyn EmbeddingProvider>,
    ) -> Self {
        let knowledge = Arc::new(KnowledgeStore::new(
            Arc::clone(&generator),
            &config.knowledge,
        ));
        let ranker = RelevanceRanker::new(embedder, &config.ranking);
        Self::new(knowledge, ranker, generator, &config.generation)
    }

    /// Override the generation-call time limit
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn knowledge(&self) -> &KnowledgeStore {
        &self.knowledge
    }

    /// Produce itinerary text for `preferences`
    pub async fn generate(&self, preferences: &TravelPreferences, cancel: &CancelToken) -> Itinerary {
        self.run(preferences, cancel).await.0
    }

    /// Run the pipeline and score the result
    pub async fn plan(&self, preferences: &TravelPreferences, cancel: &CancelToken) -> TravelPlan {
        let (itinerary, profile, origin) = self.run(preferences, cancel).await;
        let quality = QualityValidator::score(&itinerary.text, preferences);
        if let Some(warning) = quality.warning() {
            warn!(%warning, "itinerary quality below threshold");
        }

        let metadata = PlanMetadata {
            generated_at: Utc::now(),
            model: self.generator.model().to_string(),
            temperature: self.sampling.temperature,
            destination: preferences.destination().to_string(),
            duration_days: preferences.duration_days(),
            budget: preferences.budget(),
            daily_budget: preferences.daily_budget(),
            interests: preferences.interests().to_vec(),
            quality_score: quality.score,
            analysis: ContentAnalysis::of(&itinerary.text, preferences),
        };

        TravelPlan {
            profile: ProfileSummary::new(&profile, origin, preferences.daily_budget()),
            itinerary: itinerary.text,
            source: itinerary.source,
            context: itinerary.context,
            quality,
            metadata,
        }
    }

    #[instrument(skip_all, fields(destination = %preferences.destination(), days = preferences.duration_days()))]
    async fn run(
        &self,
        preferences: &TravelPreferences,
        cancel: &CancelToken,
    ) -> (Itinerary, DestinationProfile, ProfileOrigin) {
        let (profile, origin) = self
            .knowledge
            .lookup_with_origin(preferences.destination(), cancel)
            .await;
        let context = self
            .ranker
            .rank(&synthetic_query(preferences), &profile, cancel)
            .await;
        let request = self.prompts.build(preferences, &context);

        let (text, source) = match self.call_generator(&request.messages(), cancel).await {
            Ok(text) => {
                info!(chars = text.len(), "itinerary generated");
                (text, ItinerarySource::Generated)
            }
            Err(e) => {
                warn!(error = %e, "itinerary generation failed, using fallback itinerary");
                (
                    fallback_itinerary(preferences),
                    ItinerarySource::Fallback {
                        reason: e.to_string(),
                    },
                )
            }
        };

        let itinerary = Itinerary {
            text,
            source,
            context,
        };
        (itinerary, profile, origin)
    }

    async fn call_generator(
        &self,
        messages: &[crate::llm::Message],
        cancel: &CancelToken,
    ) -> Result<String, ProviderError> {
        let call = cancel.guard(self.generator.generate(messages, &self.sampling));
        let text = tokio::time::timeout(self.timeout, call)
            .await
            .map_err(|_| ProviderError::Timeout)??;
        if text.trim().is_empty() {
            return Err(ProviderError::EmptyResponse);
        }
        Ok(text)
    }
}

/// Ranking query describing the trip
#[must_use]
pub fn synthetic_query(preferences: &TravelPreferences) -> String {
    format!(
        "trip to {} {} days interests: {} budget: {} euros accommodation: {}",
        preferences.destination(),
        preferences.duration_days(),
        preferences.interests_display(),
        preferences.budget(),
        preferences.accommodation(),
    )
}

/// Rule-based Markdown itinerary built from the preferences alone.
///
/// Contains exactly one "Day N" heading per trip day, the destination name,
/// and the per-day budget in euros.
#[must_use]
pub fn fallback_itinerary(preferences: &TravelPreferences) -> String {
    let destination = preferences.destination();
    let days = preferences.duration_days();
    let per_day = preferences.daily_budget();
    let lodging = preferences.accommodation().label().to_lowercase();
    let focus = if preferences.interests().is_empty() {
        "local highlights".to_string()
    } else {
        preferences.interests_display()
    };

    let mut out = String::new();
    out.push_str(&format!(
        "# Itinerary for {destination} (Basic Version)\n\n\
         *This itinerary was built with limited information because the itinerary service \
         was unavailable.*\n\n\
         ## Trip Summary\n\
         - **Destination:** {destination}\n\
         - **Duration:** {days} {unit}\n\
         - **Total budget:** €{budget:.0}\n\
         - **Focus:** {focus}\n\
         - **Accommodation:** {accommodation}\n\n\
         ## Basic Itinerary\n",
        unit = if days == 1 { "day" } else { "days" },
        budget = preferences.budget(),
        accommodation = preferences.accommodation(),
    ));

    if days == 1 {
        out.push_str(&format!(
            "\n### Day 1: Arrival, Highlights and Departure\n\
             - **Morning:** Arrival and check-in at your {lodging}\n\
             - **Afternoon:** Walk through the historic centre of {destination} focusing on {focus}\n\
             - **Evening:** Dinner at a local restaurant, then check-out and departure\n\
             - **Budget:** €{per_day:.0}\n"
        ));
    } else {
        out.push_str(&format!(
            "\n### Day 1: Arrival and Orientation\n\
             - **Morning:** Arrival and check-in at your {lodging}\n\
             - **Afternoon:** First walk around the historic centre of {destination}\n\
             - **Evening:** Dinner at a local restaurant\n\
             - **Budget:** €{per_day:.0}\n"
        ));

        let interests = preferences.interests();
        for day in 2..days {
            let theme = if interests.is_empty() {
                "local highlights"
            } else {
                interests[(day as usize - 2) % interests.len()].as_str()
            };
            out.push_str(&format!(
                "\n### Day {day}: Exploring {theme}\n\
                 - **Morning:** {theme} activities in {destination}\n\
                 - **Afternoon:** Free time for the sights that interest you most\n\
                 - **Evening:** Tapas in a local neighbourhood\n\
                 - **Budget:** €{per_day:.0}\n"
            ));
        }

        out.push_str(&format!(
            "\n### Day {days}: Departure\n\
             - **Morning:** Last purchases and check-out\n\
             - **Afternoon:** Transfer to the airport or station\n\
             - **Budget:** €{per_day:.0}\n"
        ));
    }

    out.push_str(
        "\n## General Recommendations\n\
         - Book the main attractions in advance\n\
         - Try the local food at markets and family-run restaurants\n\
         - Use public transport to save money\n\
         - Keep in mind that many shops close in the early afternoon\n\n\
         *For a more detailed itinerary, check your connection and try again.*\n",
    );
    out
}
