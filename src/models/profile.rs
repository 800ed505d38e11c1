//! Structured destination knowledge
//!
//! A [`DestinationProfile`] is either taken from the curated table or parsed
//! from a generated JSON document. Parsing is strict about shape: every field
//! of the schema must be present with the right type, and no text field or
//! list may be empty once trimmed. Unknown keys are ignored, and the Spanish
//! key names used by older prompts are accepted as aliases.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reasons a generated profile document is rejected
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("profile is not valid JSON for the expected schema: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("profile field `{0}` is empty")]
    EmptyField(&'static str),
}

/// Budget tier keys of [`DailyBudget`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetTier {
    Low,
    Medium,
    High,
}

/// Typical spend per person and day, in euros
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyBudget {
    #[serde(alias = "bajo")]
    pub low: u32,
    #[serde(alias = "medio")]
    pub medium: u32,
    #[serde(alias = "alto")]
    pub high: u32,
}

impl DailyBudget {
    #[must_use]
    pub fn get(&self, tier: BudgetTier) -> u32 {
        match tier {
            BudgetTier::Low => self.low,
            BudgetTier::Medium => self.medium,
            BudgetTier::High => self.high,
        }
    }

    /// Highest tier whose typical spend is covered by `per_day`
    #[must_use]
    pub fn tier_for(&self, per_day: f64) -> BudgetTier {
        if per_day >= f64::from(self.high) {
            BudgetTier::High
        } else if per_day >= f64::from(self.medium) {
            BudgetTier::Medium
        } else {
            BudgetTier::Low
        }
    }
}

/// Factual record describing a travel destination
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DestinationProfile {
    pub description: String,
    pub attractions: Vec<String>,
    #[serde(rename = "gastronomy")]
    pub cuisine: Vec<String>,
    pub daily_budget: DailyBudget,
    pub best_season: String,
    pub transport: String,
    pub local_tips: Vec<String>,
}

/// Wire shape exchanged with the knowledge-generation model
#[derive(Debug, Deserialize)]
struct RawProfile {
    #[serde(alias = "descripcion")]
    description: String,
    #[serde(alias = "atracciones")]
    attractions: Vec<String>,
    #[serde(alias = "gastronomia", alias = "cuisine")]
    gastronomy: Vec<String>,
    #[serde(alias = "presupuesto_diario")]
    daily_budget: DailyBudget,
    #[serde(alias = "mejor_epoca")]
    best_season: String,
    #[serde(alias = "transporte")]
    transport: String,
    #[serde(alias = "tips_locales")]
    local_tips: Vec<String>,
}

impl DestinationProfile {
    /// Parse a generated profile document.
    ///
    /// Surrounding whitespace and a Markdown code fence are tolerated.
    pub fn parse(document: &str) -> Result<Self, ParseError> {
        let raw: RawProfile = serde_json::from_str(strip_code_fence(document))?;

        Ok(Self {
            description: non_empty_text(raw.description, "description")?,
            attractions: non_empty_list(raw.attractions, "attractions")?,
            cuisine: non_empty_list(raw.gastronomy, "gastronomy")?,
            daily_budget: raw.daily_budget,
            best_season: non_empty_text(raw.best_season, "best_season")?,
            transport: non_empty_text(raw.transport, "transport")?,
            local_tips: non_empty_list(raw.local_tips, "local_tips")?,
        })
    }

    /// Generic template used when no usable profile could be generated
    #[must_use]
    pub fn generic(name: &str) -> Self {
        Self {
            description: format!(
                "{name} is a beautiful Spanish city with a rich history and culture."
            ),
            attractions: strings(&[
                "Historic centre - Stroll through the main streets",
                "Main church - Representative local architecture",
                "Main square - The social heart of the city",
                "Local museum - History and culture of the region",
                "Viewpoint - Panoramic views over the city",
            ]),
            cuisine: strings(&[
                "Local tapas - Small traditional dishes",
                "Regional dishes - Specialities of the area",
                "Local wines - Pairing with the regional food",
            ]),
            daily_budget: DailyBudget {
                low: 45,
                medium: 90,
                high: 180,
            },
            best_season: "Spring and autumn for pleasant weather".to_string(),
            transport: "Local public transport available".to_string(),
            local_tips: strings(&[
                "Ask locals for recommendations",
                "Try the food at local markets",
                "Visit during local events and festivals",
            ]),
        }
    }
}

pub(crate) fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

fn strip_code_fence(document: &str) -> &str {
    let trimmed = document.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Skip the info string ("json") on the opening fence line
    let body = rest.split_once('\n').map_or("", |(_, body)| body);
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

fn non_empty_text(value: String, field: &'static str) -> Result<String, ParseError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ParseError::EmptyField(field));
    }
    Ok(value.to_string())
}

fn non_empty_list(values: Vec<String>, field: &'static str) -> Result<Vec<String>, ParseError> {
    let values: Vec<String> = values
        .into_iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect();
    if values.is_empty() {
        return Err(ParseError::EmptyField(field));
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"{
        "description": "Teruel is a small city in Aragon known for its Mudejar towers.",
        "attractions": ["Torre de El Salvador - Mudejar tower", "Mausoleo de los Amantes"],
        "gastronomy": ["Jamon de Teruel - Cured ham"],
        "daily_budget": {"low": 40, "medium": 80, "high": 160},
        "best_season": "Spring",
        "transport": "Walkable centre",
        "local_tips": ["Visit during the Medieval Wedding festival"],
        "rating": 5
    }"#;

    #[test]
    fn test_parse_valid_profile_ignores_unknown_keys() {
        let profile = DestinationProfile::parse(VALID).unwrap();
        assert_eq!(profile.attractions.len(), 2);
        assert_eq!(profile.cuisine, vec!["Jamon de Teruel - Cured ham"]);
        assert_eq!(profile.daily_budget.medium, 80);
    }

    #[test]
    fn test_parse_strips_code_fence() {
        let fenced = format!("```json\n{VALID}\n```");
        assert!(DestinationProfile::parse(&fenced).is_ok());
    }

    #[test]
    fn test_parse_accepts_spanish_keys() {
        let doc = r#"{
            "descripcion": "Cuenca",
            "atracciones": ["Casas Colgadas"],
            "gastronomia": ["Morteruelo"],
            "presupuesto_diario": {"bajo": 40, "medio": 80, "alto": 150},
            "mejor_epoca": "Otoño",
            "transporte": "Autobús",
            "tips_locales": ["Subir al casco antiguo"]
        }"#;
        let profile = DestinationProfile::parse(doc).unwrap();
        assert_eq!(profile.daily_budget.high, 150);
        assert_eq!(profile.best_season, "Otoño");
    }

    #[test]
    fn test_parse_rejects_missing_key() {
        let doc = r#"{"description": "Somewhere", "attractions": ["A"]}"#;
        assert!(matches!(
            DestinationProfile::parse(doc),
            Err(ParseError::Malformed(_))
        ));
    }

    #[test]
    fn test_parse_rejects_empty_list() {
        let doc = VALID.replace(
            r#""local_tips": ["Visit during the Medieval Wedding festival"]"#,
            r#""local_tips": ["  "]"#,
        );
        assert!(matches!(
            DestinationProfile::parse(&doc),
            Err(ParseError::EmptyField("local_tips"))
        ));
    }

    #[test]
    fn test_parse_rejects_prose() {
        assert!(DestinationProfile::parse("Sorry, I cannot help with that.").is_err());
    }

    #[test]
    fn test_generic_profile_embeds_name() {
        let profile = DestinationProfile::generic("Teruel");
        assert!(profile.description.contains("Teruel"));
        assert_eq!(profile.attractions.len(), 5);
        assert_eq!(profile.cuisine.len(), 3);
        assert_eq!(profile.local_tips.len(), 3);
    }

    #[test]
    fn test_budget_tier_for_daily_spend() {
        let budget = DailyBudget {
            low: 50,
            medium: 100,
            high: 200,
        };
        assert_eq!(budget.tier_for(30.0), BudgetTier::Low);
        assert_eq!(budget.tier_for(100.0), BudgetTier::Medium);
        assert_eq!(budget.tier_for(300.0), BudgetTier::High);
        assert_eq!(budget.get(BudgetTier::Medium), 100);
    }
}
