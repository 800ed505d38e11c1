use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

/// One role-tagged block of a generation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Sampling parameters sent with every text-generation call
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplingConfig {
    /// Creativity, 0.0 to 1.0
    pub temperature: f32,
    /// Output length budget in tokens
    pub max_tokens: u32,
    /// Nucleus-sampling probability mass
    pub top_p: f32,
    pub frequency_penalty: f32,
    pub presence_penalty: f32,
}

impl SamplingConfig {
    /// Settings for itinerary writing
    #[must_use]
    pub fn itinerary() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 3000,
            top_p: 0.9,
            frequency_penalty: 0.1,
            presence_penalty: 0.1,
        }
    }

    /// Settings for factual destination profiles
    #[must_use]
    pub fn factual() -> Self {
        Self {
            temperature: 0.3,
            max_tokens: 1000,
            top_p: 1.0,
            frequency_penalty: 0.0,
            presence_penalty: 0.0,
        }
    }
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self::itinerary()
    }
}
