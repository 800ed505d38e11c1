//! Relevance ranking of destination knowledge
//!
//! A profile is split into labeled [`Fragment`]s, which are embedded together
//! with the query in one batched call and ordered by cosine similarity to the
//! query. Vectors are L2-normalized before the inner product, so providers
//! that do not return unit vectors still rank correctly.
//!
//! If the embedding call fails (or is cancelled, or returns vectors that do
//! not line up with the inputs), the ranker degrades to the first few scalar
//! fragments in profile order. Ranking never fails outward.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, instrument, warn};

use crate::cancel::CancelToken;
use crate::config::RankingConfig;
use crate::llm::{EmbeddingProvider, ProviderError};
use crate::models::DestinationProfile;

/// Upper bound on fragments handed to the prompt
pub const MAX_CONTEXT_FRAGMENTS: usize = 5;

/// Upper bound on scalar fragments used when embeddings are unavailable
pub const MAX_FALLBACK_FRAGMENTS: usize = 3;

/// Profile field a fragment was taken from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileField {
    Description,
    Attractions,
    Gastronomy,
    BestSeason,
    Transport,
    LocalTips,
}

impl ProfileField {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Description => "description",
            Self::Attractions => "attractions",
            Self::Gastronomy => "gastronomy",
            Self::BestSeason => "best_season",
            Self::Transport => "transport",
            Self::LocalTips => "local_tips",
        }
    }

    /// Whether the field holds a single string rather than a list
    #[must_use]
    pub fn is_scalar(self) -> bool {
        matches!(self, Self::Description | Self::BestSeason | Self::Transport)
    }
}

/// One labeled unit of destination knowledge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub field: ProfileField,
    pub text: String,
}

impl Fragment {
    fn new(field: ProfileField, value: &str) -> Self {
        Self {
            field,
            text: format!("{}: {}", field.label(), value),
        }
    }
}

/// Split a profile into fragments, in profile field order.
///
/// The daily budget table is numeric and is not ranked.
#[must_use]
pub fn fragments(profile: &DestinationProfile) -> Vec<Fragment> {
    let list = |field: ProfileField, items: &[String]| {
        items
            .iter()
            .map(move |item| Fragment::new(field, item))
            .collect::<Vec<_>>()
    };

    let mut out = vec![Fragment::new(ProfileField::Description, &profile.description)];
    out.extend(list(ProfileField::Attractions, &profile.attractions));
    out.extend(list(ProfileField::Gastronomy, &profile.cuisine));
    out.push(Fragment::new(ProfileField::BestSeason, &profile.best_season));
    out.push(Fragment::new(ProfileField::Transport, &profile.transport));
    out.extend(list(ProfileField::LocalTips, &profile.local_tips));
    out
}

/// Fragment texts, most relevant first
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RankedContext(Vec<String>);

impl RankedContext {
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn into_inner(self) -> Vec<String> {
        self.0
    }
}

impl From<Vec<String>> for RankedContext {
    fn from(texts: Vec<String>) -> Self {
        Self(texts)
    }
}

pub struct RelevanceRanker {
    embedder: Arc<dyn EmbeddingProvider>,
    top_k: usize,
    fallback_fragments: usize,
}

impl RelevanceRanker {
    pub fn new(embedder: Arc<dyn EmbeddingProvider>, config: &RankingConfig) -> Self {
        Self {
            embedder,
            top_k: config.top_k.clamp(1, MAX_CONTEXT_FRAGMENTS),
            fallback_fragments: config.fallback_fragments.min(MAX_FALLBACK_FRAGMENTS),
        }
    }

    /// Rank the profile's fragments against `query`
    pub async fn rank(
        &self,
        query: &str,
        profile: &DestinationProfile,
        cancel: &CancelToken,
    ) -> RankedContext {
        self.rank_fragments(query, fragments(profile), cancel).await
    }

    /// Rank arbitrary fragments against `query`.
    ///
    /// An empty fragment list yields an empty context without calling the
    /// embedding provider.
    #[instrument(level = "debug", skip(self, fragments, cancel), fields(fragments = fragments.len()))]
    pub async fn rank_fragments(
        &self,
        query: &str,
        fragments: Vec<Fragment>,
        cancel: &CancelToken,
    ) -> RankedContext {
        if fragments.is_empty() {
            return RankedContext::default();
        }

        let mut inputs = Vec::with_capacity(fragments.len() + 1);
        inputs.push(query.to_string());
        inputs.extend(fragments.iter().map(|f| f.text.clone()));

        let scores = match cancel.guard(self.embedder.embed(&inputs)).await {
            Ok(vectors) => similarity_scores(vectors, fragments.len()),
            Err(e) => Err(e),
        };

        match scores {
            Ok(scores) => {
                let mut order: Vec<usize> = (0..fragments.len()).collect();
                // Stable: equal scores keep fragment order
                order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));
                debug!(top_score = scores[order[0]], "fragments ranked");

                let mut fragments: Vec<Option<Fragment>> = fragments.into_iter().map(Some).collect();
                order
                    .into_iter()
                    .take(self.top_k)
                    .filter_map(|i| fragments[i].take())
                    .map(|f| f.text)
                    .collect::<Vec<_>>()
                    .into()
            }
            Err(e) => {
                warn!(error = %e, "embedding failed, using leading scalar fragments");
                self.degraded(fragments)
            }
        }
    }

    fn degraded(&self, fragments: Vec<Fragment>) -> RankedContext {
        fragments
            .into_iter()
            .filter(|f| f.field.is_scalar())
            .take(self.fallback_fragments)
            .map(|f| f.text)
            .collect::<Vec<_>>()
            .into()
    }
}

/// Cosine similarity of each fragment vector to the query vector.
///
/// `vectors[0]` is the query; the rest follow fragment order.
fn similarity_scores(vectors: Vec<Vec<f32>>, fragments: usize) -> Result<Vec<f32>, ProviderError> {
    if vectors.len() != fragments + 1 {
        return Err(ProviderError::InvalidResponse(format!(
            "expected {} embeddings, got {}",
            fragments + 1,
            vectors.len()
        )));
    }

    let mut vectors = vectors.into_iter().map(normalized);
    let query = vectors.next().unwrap_or_default();
    if query.is_empty() {
        return Err(ProviderError::InvalidResponse("empty query embedding".to_string()));
    }

    vectors
        .map(|v| {
            if v.len() == query.len() {
                Ok(dot(&query, &v))
            } else {
                Err(ProviderError::InvalidResponse(format!(
                    "embedding dimension {} does not match query dimension {}",
                    v.len(),
                    query.len()
                )))
            }
        })
        .collect()
}

/// Scale to unit length; zero vectors stay zero
fn normalized(mut v: Vec<f32>) -> Vec<f32> {
    let norm = dot(&v, &v).sqrt();
    if norm > 0.0 {
        v.iter_mut().for_each(|x| *x /= norm);
    }
    v
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::client::mock::{FnEmbedder, UnreachableEmbedder};
    use crate::models::DailyBudget;

    fn profile() -> DestinationProfile {
        DestinationProfile {
            description: "A sunny city".to_string(),
            attractions: vec![
                "Art museum".to_string(),
                "City park".to_string(),
                "Old bridge".to_string(),
            ],
            cuisine: vec!["Tapas bars".to_string()],
            daily_budget: DailyBudget {
                low: 40,
                medium: 80,
                high: 160,
            },
            best_season: "Spring".to_string(),
            transport: "Metro".to_string(),
            local_tips: vec!["Eat late".to_string(), "Walk a lot".to_string()],
        }
    }

    /// Query points along x; fragments point at fixed angles, some with large magnitude
    fn keyword_embedding(text: &str) -> Vec<f32> {
        if text.starts_with("query") {
            vec![1.0, 0.0]
        } else if text.contains("museum") {
            vec![1.0, 0.0]
        } else if text.contains("Tapas") {
            vec![8.0, 6.0]
        } else if text.contains("park") {
            vec![0.6, 0.8]
        } else {
            vec![0.0, 1.0]
        }
    }

    fn ranker(embedder: Arc<dyn EmbeddingProvider>) -> RelevanceRanker {
        RelevanceRanker::new(embedder, &RankingConfig::default())
    }

    #[test]
    fn test_fragments_follow_profile_order() {
        let labels: Vec<_> = fragments(&profile()).iter().map(|f| f.field).collect();
        assert_eq!(
            labels,
            vec![
                ProfileField::Description,
                ProfileField::Attractions,
                ProfileField::Attractions,
                ProfileField::Attractions,
                ProfileField::Gastronomy,
                ProfileField::BestSeason,
                ProfileField::Transport,
                ProfileField::LocalTips,
                ProfileField::LocalTips,
            ]
        );
        assert_eq!(fragments(&profile())[1].text, "attractions: Art museum");
    }

    #[tokio::test]
    async fn test_rank_orders_by_normalized_similarity() {
        let embedder = Arc::new(FnEmbedder::new(keyword_embedding));
        let context = ranker(embedder.clone())
            .rank("query: art and food", &profile(), &CancelToken::new())
            .await;

        let texts: Vec<_> = context.iter().collect();
        assert_eq!(texts.len(), 5);
        assert_eq!(texts[0], "attractions: Art museum");
        // Large magnitude must not beat a closer direction
        assert_eq!(texts[1], "gastronomy: Tapas bars");
        assert_eq!(texts[2], "attractions: City park");
        // Remaining ties keep profile order
        assert_eq!(texts[3], "description: A sunny city");
        assert_eq!(texts[4], "attractions: Old bridge");
        assert_eq!(embedder.call_count(), 1);
    }

    #[tokio::test]
    async fn test_unreachable_embedder_returns_leading_scalars() {
        let context = ranker(Arc::new(UnreachableEmbedder))
            .rank("query", &profile(), &CancelToken::new())
            .await;

        assert_eq!(
            context.into_inner(),
            vec![
                "description: A sunny city".to_string(),
                "best_season: Spring".to_string(),
                "transport: Metro".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_mismatched_dimensions_degrade() {
        let embedder = Arc::new(FnEmbedder::new(|text: &str| {
            if text.starts_with("query") {
                vec![1.0, 0.0, 0.0]
            } else {
                vec![1.0, 0.0]
            }
        }));
        let context = ranker(embedder)
            .rank("query", &profile(), &CancelToken::new())
            .await;
        assert_eq!(context.len(), 3);
    }

    #[tokio::test]
    async fn test_cancelled_ranking_degrades_without_embedding() {
        let embedder = Arc::new(FnEmbedder::new(keyword_embedding));
        let cancel = CancelToken::new();
        cancel.cancel();

        let context = ranker(embedder.clone())
            .rank("query", &profile(), &cancel)
            .await;
        assert_eq!(context.len(), 3);
        assert_eq!(embedder.call_count(), 0);
    }

    #[tokio::test]
    async fn test_oversized_limits_are_clamped() {
        let config = RankingConfig {
            top_k: 12,
            fallback_fragments: 10,
        };

        let embedder = Arc::new(FnEmbedder::new(keyword_embedding));
        let context = RelevanceRanker::new(embedder, &config)
            .rank("query", &profile(), &CancelToken::new())
            .await;
        assert_eq!(context.len(), MAX_CONTEXT_FRAGMENTS);

        let context = RelevanceRanker::new(Arc::new(UnreachableEmbedder), &config)
            .rank("query", &profile(), &CancelToken::new())
            .await;
        assert_eq!(context.len(), MAX_FALLBACK_FRAGMENTS);
    }

    #[tokio::test]
    async fn test_empty_fragments_skip_embedding() {
        let embedder = Arc::new(FnEmbedder::new(keyword_embedding));
        let context = ranker(embedder.clone())
            .rank_fragments("query", Vec::new(), &CancelToken::new())
            .await;
        assert!(context.is_empty());
        assert_eq!(embedder.call_count(), 0);
    }

    #[test]
    fn test_normalized_zero_vector_stays_zero() {
        assert_eq!(normalized(vec![0.0, 0.0]), vec![0.0, 0.0]);
        let unit = normalized(vec![3.0, 4.0]);
        assert!((dot(&unit, &unit) - 1.0).abs() < 1e-6);
    }
}
