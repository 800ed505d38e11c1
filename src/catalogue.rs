//! Catalogue of Spanish destinations
//!
//! Used to resolve free-text destination input into a known city name before
//! planning. Unknown destinations are still accepted; they simply get a
//! generated (or generic) profile.

use std::sync::LazyLock;

use serde::Serialize;

const CITIES: &[&str] = &[
    // Regional capitals and large cities
    "Madrid", "Barcelona", "Sevilla", "Valencia", "Bilbao", "Zaragoza",
    "Málaga", "Murcia", "Palma", "Las Palmas de Gran Canaria", "Valladolid",
    "Córdoba", "Vigo", "Gijón", "Hospitalet de Llobregat", "Vitoria-Gasteiz",
    "A Coruña", "Granada", "Elche", "Oviedo", "Santa Cruz de Tenerife",
    "Badalona", "Cartagena", "Terrassa", "Jerez de la Frontera", "Sabadell",
    "Alicante", "Santander", "Castellón de la Plana", "Burgos", "Albacete",
    "Getafe", "Alcalá de Henares", "Logroño", "Badajoz", "Salamanca",
    "Huelva", "Marbella", "Lleida", "Tarragona", "León", "Cádiz",
    "Dos Hermanas", "Parla", "Torrejón de Ardoz", "Alcorcón", "Reus",
    "Ourense", "Telde", "Lugo", "Santiago de Compostela", "Cáceres",
    // Historic and inland towns
    "Toledo", "Segovia", "Ávila", "Cuenca", "Girona", "Pamplona",
    "San Sebastián", "Santillana del Mar", "Ronda", "Úbeda", "Baeza",
    "Mérida", "Astorga", "Soria", "Teruel", "Huesca", "Jaca",
    "Aranjuez", "El Escorial", "Chinchón", "Pedraza", "Sigüenza",
    // Coast
    "Pontevedra", "Benidorm", "Gandía", "Denia", "Calpe", "Altea", "Torrevieja",
    "Estepona", "Nerja", "Tarifa", "Almería", "Mojácar", "Lloret de Mar",
    "Tossa de Mar", "Sitges",
];

/// Known Spanish cities, sorted and without duplicates
pub static SPANISH_CITIES: LazyLock<Vec<&'static str>> = LazyLock::new(|| {
    let mut cities = CITIES.to_vec();
    cities.sort_unstable();
    cities.dedup();
    cities
});

/// Maximum number of alternatives offered for a partial match
pub const MAX_SUGGESTIONS: usize = 5;

/// Outcome of resolving user input against the catalogue
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DestinationMatch {
    /// Input names a listed city
    Exact(String),
    /// Input is part of one or more listed names; the first is chosen
    Suggested {
        chosen: String,
        alternatives: Vec<String>,
    },
    /// Not in the catalogue; planning proceeds with the title-cased input
    Unlisted(String),
    /// Blank input
    Empty,
}

impl DestinationMatch {
    /// Destination name to plan for, if any
    #[must_use]
    pub fn destination(&self) -> Option<&str> {
        match self {
            Self::Exact(name) | Self::Unlisted(name) => Some(name),
            Self::Suggested { chosen, .. } => Some(chosen),
            Self::Empty => None,
        }
    }
}

/// Resolve free-text input to a destination
#[must_use]
pub fn resolve_destination(input: &str) -> DestinationMatch {
    let input = input.trim();
    if input.is_empty() {
        return DestinationMatch::Empty;
    }

    let titled = title_case(input);
    if SPANISH_CITIES.contains(&titled.as_str()) {
        return DestinationMatch::Exact(titled);
    }

    let needle = input.to_lowercase();
    let matches: Vec<String> = SPANISH_CITIES
        .iter()
        .filter(|city| city.to_lowercase().contains(&needle))
        .map(|city| (*city).to_string())
        .collect();

    match matches.first() {
        Some(first) => DestinationMatch::Suggested {
            chosen: first.clone(),
            alternatives: matches.into_iter().take(MAX_SUGGESTIONS).collect(),
        },
        None => DestinationMatch::Unlisted(titled),
    }
}

/// Uppercase the first letter of every alphabetic run, lowercase the rest
fn title_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut at_word_start = true;
    for c in input.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}
