//! Hand-curated destination profiles

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::models::profile::strings;
use crate::models::{DailyBudget, DestinationProfile};

/// Curated profiles keyed by normalized destination name
pub static CURATED_PROFILES: LazyLock<HashMap<&'static str, DestinationProfile>> =
    LazyLock::new(|| {
        HashMap::from([
            ("madrid", madrid()),
            ("barcelona", barcelona()),
            ("sevilla", sevilla()),
        ])
    });

fn madrid() -> DestinationProfile {
    DestinationProfile {
        description: "Madrid is the capital of Spain and its most populous city. It is known for \
            its rich history, impressive architecture, world-class museums such as the Prado and \
            the Reina Sofia, and a vibrant nightlife. The city blends tradition and modernity."
            .to_string(),
        attractions: strings(&[
            "Museo del Prado - One of the most important art galleries in the world",
            "Royal Palace - Official residence of the Spanish Royal Family",
            "Retiro Park - The green lung of the city with beautiful gardens",
            "Gran Via - Main avenue for shopping and entertainment",
            "Plaza Mayor - Historic heart of Madrid",
            "Museo Reina Sofia - Contemporary art including Guernica",
            "Temple of Debod - An authentic Egyptian temple",
            "Mercado de San Miguel - Historic gourmet market",
        ]),
        cuisine: strings(&[
            "Cocido madrileño - Traditional chickpea stew with meat and vegetables",
            "Huevos rotos - Fried eggs over fried potatoes",
            "Churros con chocolate - Classic sweet for breakfast or an afternoon snack",
            "Bocadillo de calamares - Madrid's emblematic squid sandwich",
            "Callos a la madrileña - Traditional tripe stew",
        ]),
        daily_budget: DailyBudget {
            low: 50,
            medium: 100,
            high: 200,
        },
        best_season: "Spring (April-June) and autumn (September-November)".to_string(),
        transport: "Excellent metro, buses, taxis and ride-hailing available".to_string(),
        local_tips: strings(&[
            "Museums are free during certain hours",
            "The siesta is real - many shops close 14:00-17:00",
            "Dinner is late - restaurants open around 21:00",
            "Tipping is not mandatory but appreciated",
        ]),
    }
}

fn barcelona() -> DestinationProfile {
    DestinationProfile {
        description: "Barcelona is a cosmopolitan city on the Spanish Mediterranean coast, famous \
            for its unique art and architecture. The work of Antoni Gaudi, including the iconic \
            Sagrada Familia, defines much of the cityscape. It is also known for its beaches, \
            lively nightlife and distinctive Catalan culture."
            .to_string(),
        attractions: strings(&[
            "Sagrada Familia - Gaudi's masterpiece and a World Heritage Site",
            "Park Guell - Public park with Gaudi's colourful architecture",
            "Las Ramblas - Pedestrian boulevard full of life and street performers",
            "Gothic Quarter - Medieval old town with narrow streets",
            "Casa Batllo - Modernist house designed by Gaudi",
            "Camp Nou - Stadium of FC Barcelona",
            "La Boqueria Market - Vibrant food market",
            "Barcelona beaches - Accessible urban coastline",
        ]),
        cuisine: strings(&[
            "Paella - Traditional rice dish with seafood or chicken",
            "Pa amb tomaquet - Toasted bread with tomato, garlic and olive oil",
            "Crema catalana - Dessert similar to creme brulee",
            "Fideua - Like paella but made with noodles",
            "Catalan tapas - Small plates to share",
        ]),
        daily_budget: DailyBudget {
            low: 60,
            medium: 120,
            high: 250,
        },
        best_season: "May-September for the beach, March-May and September-November for \
            sightseeing"
            .to_string(),
        transport: "Efficient metro, buses, public bicycles and taxis".to_string(),
        local_tips: strings(&[
            "Catalan is the local language but Spanish is spoken everywhere",
            "The beaches are reachable by metro",
            "Book popular restaurants in advance",
            "Watch out for pickpockets on Las Ramblas",
        ]),
    }
}

fn sevilla() -> DestinationProfile {
    DestinationProfile {
        description: "Sevilla is the capital of Andalusia and the heart of Spanish flamenco. This \
            historic city is full of Mudejar architecture, patios with orange trees and an \
            unmatched romantic atmosphere. It is known for its Gothic cathedral, the Royal \
            Alcazar and the Triana neighbourhood."
            .to_string(),
        attractions: strings(&[
            "Seville Cathedral - The largest Gothic cathedral in the world",
            "Royal Alcazar - Royal palace with lush gardens",
            "Plaza de España - 20th-century architectural masterpiece",
            "Santa Cruz quarter - Labyrinth of narrow streets and patios",
            "Torre del Oro - Almohad tower on the banks of the Guadalquivir",
            "Triana - The flamenco neighbourhood across the river",
            "Metropol Parasol - Modern wooden structure",
            "Casa de Pilatos - Andalusian palace with Italian influence",
        ]),
        cuisine: strings(&[
            "Gazpacho - Cold tomato soup, perfect for the heat",
            "Jamon iberico - Cured ham of the highest quality",
            "Pescaito frito - Typical Andalusian fried fish",
            "Salmorejo - Like gazpacho but thicker",
            "Torrijas - Traditional dessert similar to French toast",
        ]),
        daily_budget: DailyBudget {
            low: 45,
            medium: 90,
            high: 180,
        },
        best_season: "March-May and October-November (avoid July-August because of extreme heat)"
            .to_string(),
        transport: "Pedestrian historic centre, tram, buses and taxis".to_string(),
        local_tips: strings(&[
            "July and August are extremely hot (+40°C)",
            "The siesta is very real here - plan accordingly",
            "The best tapas are in local neighbourhoods, not tourist centres",
            "Authentic flamenco shows in Triana",
        ]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_curated_profiles_are_complete() {
        assert_eq!(CURATED_PROFILES.len(), 3);
        for (key, profile) in CURATED_PROFILES.iter() {
            assert_eq!(*key, key.to_lowercase());
            assert!(!profile.description.is_empty());
            assert!(profile.attractions.len() >= 5, "{key} attractions");
            assert!(profile.cuisine.len() >= 3, "{key} cuisine");
            assert!(profile.local_tips.len() >= 3, "{key} tips");
            assert!(profile.daily_budget.low < profile.daily_budget.high);
        }
    }
}
