//! Bot behaviour profile store.

use dice_duel::{BotBehaviorProfile, BotId, Temperament};
use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::Arc,
};

/// Profile loading errors
#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("Failed to read profiles from {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid profile file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Duplicate profile for bot {0}")]
    Duplicate(BotId),
}

/// Profiles keyed by bot id, with a preset fallback for unknown bots
#[derive(Debug, Clone)]
pub struct ProfileBook {
    profiles: HashMap<BotId, Arc<BotBehaviorProfile>>,
    fallback: Temperament,
}

impl ProfileBook {
    /// Empty book; every bot gets the fallback preset
    pub fn new(fallback: Temperament) -> Self {
        Self {
            profiles: HashMap::new(),
            fallback,
        }
    }

    /// Parse a JSON array of profiles
    pub fn from_json(json: &str, fallback: Temperament) -> Result<Self, ProfileError> {
        let profiles: Vec<BotBehaviorProfile> = serde_json::from_str(json)?;

        let mut book = Self::new(fallback);
        for profile in profiles {
            if book.profiles.contains_key(&profile.id) {
                return Err(ProfileError::Duplicate(profile.id));
            }
            book.profiles.insert(profile.id.clone(), Arc::new(profile));
        }
        Ok(book)
    }

    /// Load a JSON array of profiles from disk
    pub fn load(path: &Path, fallback: Temperament) -> Result<Self, ProfileError> {
        let json = std::fs::read_to_string(path).map_err(|source| ProfileError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json, fallback)
    }

    /// Profile for a bot, building the fallback preset for unknown ids
    pub fn profile_for(&self, bot_id: &str) -> Arc<BotBehaviorProfile> {
        match self.profiles.get(bot_id) {
            Some(profile) => profile.clone(),
            None => {
                tracing::debug!("No profile for bot {bot_id}, using {} preset", self.fallback);
                Arc::new(BotBehaviorProfile::preset(bot_id, self.fallback))
            }
        }
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROFILES: &str = r#"[
        {
            "id": "grumpy",
            "personality": {
                "aggressiveness": 0.9, "cautiousness": 0.1, "riskTolerance": 1.7,
                "adaptability": 0.4, "consistency": 0.3, "patience": 0.2,
                "confidenceLevel": 0.6, "pressureResponse": 0.9
            },
            "baseline": {"confidence": 0.4, "frustration": 0.3},
            "response": {"errorRate": 0.2, "minResponseMs": 900, "maxResponseMs": 400}
        },
        {
            "id": "zen",
            "personality": {
                "aggressiveness": 0.1, "cautiousness": 0.9, "riskTolerance": 0.2,
                "adaptability": 0.9, "consistency": 0.9, "patience": 0.9,
                "confidenceLevel": 0.5, "pressureResponse": 0.1
            },
            "response": {"errorRate": 0.0, "minResponseMs": 1500, "maxResponseMs": 2000}
        }
    ]"#;

    #[test]
    fn test_from_json_normalizes_profiles() {
        let book = ProfileBook::from_json(PROFILES, Temperament::Balanced).unwrap();
        assert_eq!(book.len(), 2);

        let grumpy = book.profile_for("grumpy");
        assert_eq!(grumpy.personality.traits().risk_tolerance, 1.0);
        assert_eq!(grumpy.response.max_response_ms(), 900);
        assert_eq!(grumpy.baseline.frustration(), 0.3);

        let zen = book.profile_for("zen");
        assert_eq!(zen.baseline.confidence(), 0.5);
    }

    #[test]
    fn test_unknown_bot_gets_fallback_preset() {
        let book = ProfileBook::new(Temperament::Cautious);
        assert!(book.is_empty());

        let profile = book.profile_for("stranger");
        assert_eq!(
            *profile,
            BotBehaviorProfile::preset("stranger", Temperament::Cautious)
        );
    }

    #[test]
    fn test_duplicate_ids_are_rejected() {
        let twin = serde_json::to_string(&BotBehaviorProfile::preset("twin", Temperament::Reckless))
            .unwrap();
        let json = format!("[{twin}, {twin}]");

        let err = ProfileBook::from_json(&json, Temperament::Balanced).unwrap_err();
        assert!(matches!(err, ProfileError::Duplicate(ref id) if id == "twin"));
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = ProfileBook::load(Path::new("/nonexistent/bots.json"), Temperament::Balanced)
            .unwrap_err();
        assert!(err.to_string().contains("/nonexistent/bots.json"));
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let err = ProfileBook::from_json("{not json", Temperament::Balanced).unwrap_err();
        assert!(matches!(err, ProfileError::Parse(_)));
    }
}
