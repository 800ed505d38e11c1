//! Generation request assembly
//!
//! Pure string building: a fixed persona block plus a per-request block
//! carrying every preference and the ranked destination context.

use serde::Serialize;

use crate::llm::Message;
use crate::models::TravelPreferences;
use crate::ranking::RankedContext;

/// Shown in place of the context when ranking produced nothing
pub const EMPTY_CONTEXT_PLACEHOLDER: &str = "General destination information available";

/// Shown when the traveler gave no restrictions
pub const NO_RESTRICTIONS: &str = "None";

const PERSONA: &str = "\
You are an EXPERT TRAVEL PLANNER with 20 years of international experience. \
Your specialty is creating personalized, detailed and culturally authentic itineraries.

AREAS OF EXPERTISE:
- Deep knowledge of destinations worldwide
- Budget optimization
- Authentic cultural experiences
- Travel logistics
- Cultural and culinary sensitivity

PRINCIPLES OF YOUR ITINERARIES:
1. PERSONALIZATION: Every itinerary reflects the traveler's specific interests
2. BALANCE: Combine cultural, culinary and relaxing activities
3. REALISM: Feasible schedules with time for getting around
4. VALUE: Maximize experiences within the available budget
5. AUTHENTICITY: Prefer local experiences over tourist traps

REQUIRED RESPONSE FORMAT:
- Clear day-by-day structure in Markdown, one heading per day (\"Day 1\", \"Day 2\", ...)
- Specific, realistic schedules
- Detailed cost per activity in euros (€)
- Cultural and practical tips
- Alternatives for different budgets
- Relevant logistics information

TONE: Professional but friendly, enthusiastic but realistic.";

/// The two message blocks of one itinerary generation call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationRequest {
    pub system: String,
    pub user: String,
}

impl GenerationRequest {
    /// System block first, then the user block
    #[must_use]
    pub fn messages(&self) -> Vec<Message> {
        vec![Message::system(&self.system), Message::user(&self.user)]
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PromptBuilder;

impl PromptBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    #[must_use]
    pub fn build(&self, preferences: &TravelPreferences, context: &RankedContext) -> GenerationRequest {
        GenerationRequest {
            system: PERSONA.to_string(),
            user: user_block(preferences, context),
        }
    }
}

fn user_block(preferences: &TravelPreferences, context: &RankedContext) -> String {
    let destination = preferences.destination();
    let context = if context.is_empty() {
        EMPTY_CONTEXT_PLACEHOLDER.to_string()
    } else {
        context.iter().collect::<Vec<_>>().join("\n")
    };
    let restrictions = match preferences.restrictions().trim() {
        "" => NO_RESTRICTIONS,
        text => text,
    };

    format!(
        "PERSONALIZED ITINERARY REQUEST:

TRAVELER INFORMATION:
- Destination: {destination}, Spain
- Duration: {days} days
- Total budget: €{budget} (€{per_day:.0} per day)
- Main interests: {interests}
- Preferred accommodation: {accommodation}
- Desired adventure level: {adventure}
- Special restrictions: {restrictions}

DESTINATION CONTEXT:
{context}

SPECIFIC INSTRUCTIONS FOR {upper}:

1. ITINERARY STRUCTURE:
   - Build a detailed day-by-day plan specific to {destination}
   - Use realistic schedules for the size of the city
   - Give approximate costs for the local market
   - Alternate activity types for variety

2. PERSONALIZATION:
   - Focus on the interests listed above
   - Include authentic experiences of {destination}
   - Match activities to the adventure level
   - Stay within the total budget
   - Respect the stated restrictions

3. PRACTICAL INFORMATION:
   - Local transport tips for {destination}
   - Regional food recommendations
   - Best times of day given local customs (siesta, late dinners)
   - Alternatives for typical bad weather

4. BUDGET OPTIMIZATION:
   - Suggest free options (free museum hours, walks)
   - Say when to book in advance
   - Mention usual discounts (seniors, students)
   - Offer alternatives at different prices in euros

5. LOCAL AUTHENTICITY:
   - Prefer authentic local experiences over mass tourism
   - Include traditions specific to {destination}
   - Recommend local neighbourhoods, not only tourist areas
   - Mention festivals or events if they fall on the travel dates

DELIVER a Markdown itinerary that is specific to {destination}, optimized for \
the budget, personalized for the listed interests, and practical with real local \
opening hours (shops closed 14-17h, dinner 21-23h).",
        days = preferences.duration_days(),
        budget = preferences.budget(),
        per_day = preferences.daily_budget(),
        interests = preferences.interests_display(),
        accommodation = preferences.accommodation(),
        adventure = preferences.adventure_level(),
        upper = destination.to_uppercase(),
    )
}
