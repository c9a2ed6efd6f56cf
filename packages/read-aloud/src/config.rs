//! Playback configuration: preferred locale, default parameters, and how long
//! a view waits for voices before reporting them unavailable.

use std::time::Duration;

use read_aloud_domain::{Language, VocalPitchMod, VocalSpeedMod, VoiceError};
use serde::{Deserialize, Serialize};

/// Environment variable overriding [`PlaybackConfig::preferred_locale`].
pub const ENV_LOCALE: &str = "READ_ALOUD_LOCALE";
/// Environment variable overriding [`PlaybackConfig::default_pitch`].
pub const ENV_PITCH: &str = "READ_ALOUD_PITCH";
/// Environment variable overriding [`PlaybackConfig::default_rate`].
pub const ENV_RATE: &str = "READ_ALOUD_RATE";
/// Environment variable overriding [`PlaybackConfig::voice_patience_ms`].
pub const ENV_VOICE_PATIENCE_MS: &str = "READ_ALOUD_VOICE_PATIENCE_MS";

/// Configuration shared by the catalog loader and the utterance controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Locale whose voice is selected by default once voices load.
    pub preferred_locale: Language,
    /// Pitch the form starts with.
    pub default_pitch: VocalPitchMod,
    /// Rate the form starts with.
    pub default_rate: VocalSpeedMod,
    /// Milliseconds a caller waits for voices before treating the catalog as
    /// unavailable.
    pub voice_patience_ms: u64,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            preferred_locale: Language::ENGLISH_US,
            default_pitch: VocalPitchMod::NATURAL,
            default_rate: VocalSpeedMod::NORMAL,
            voice_patience_ms: 3_000,
        }
    }
}

impl PlaybackConfig {
    /// Parse a JSON document. Missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, VoiceError> {
        serde_json::from_str(json)
            .map_err(|e| VoiceError::Configuration(format!("invalid playback config: {e}")))
    }

    /// Apply `READ_ALOUD_*` environment overrides.
    pub fn with_env_overrides(self) -> Result<Self, VoiceError> {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup.
    pub fn with_overrides_from<F>(mut self, lookup: F) -> Result<Self, VoiceError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(locale) = lookup(ENV_LOCALE) {
            let locale = locale.trim();
            if locale.is_empty() {
                return Err(VoiceError::Configuration(format!("{ENV_LOCALE} is empty")));
            }
            self.preferred_locale = Language::from(locale.to_owned());
        }
        if let Some(pitch) = lookup(ENV_PITCH) {
            self.default_pitch = VocalPitchMod::new(parse_number(ENV_PITCH, &pitch)?);
        }
        if let Some(rate) = lookup(ENV_RATE) {
            self.default_rate = VocalSpeedMod::new(parse_number(ENV_RATE, &rate)?);
        }
        if let Some(patience) = lookup(ENV_VOICE_PATIENCE_MS) {
            self.voice_patience_ms = patience.trim().parse().map_err(|e| {
                VoiceError::Configuration(format!("{ENV_VOICE_PATIENCE_MS}={patience:?}: {e}"))
            })?;
        }
        Ok(self)
    }

    /// [`PlaybackConfig::voice_patience_ms`] as a duration.
    pub fn voice_patience(&self) -> Duration {
        Duration::from_millis(self.voice_patience_ms)
    }
}

fn parse_number(key: &str, raw: &str) -> Result<f32, VoiceError> {
    raw.trim()
        .parse::<f32>()
        .map_err(|e| VoiceError::Configuration(format!("{key}={raw:?}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let config = PlaybackConfig::default();
        assert_eq!(config.preferred_locale, Language::ENGLISH_US);
        assert_eq!(config.default_pitch.value(), 1.0);
        assert_eq!(config.default_rate.value(), 1.0);
        assert_eq!(config.voice_patience(), Duration::from_secs(3));
    }

    #[test]
    fn json_fills_missing_fields() {
        let config =
            PlaybackConfig::from_json_str(r#"{"preferred_locale":"en-GB","default_rate":3.0}"#)
                .unwrap();
        assert_eq!(config.preferred_locale, Language::ENGLISH_UK);
        assert_eq!(config.default_rate, VocalSpeedMod::MAX);
        assert_eq!(config.default_pitch, VocalPitchMod::NATURAL);
        assert_eq!(config.voice_patience_ms, 3_000);
    }

    #[test]
    fn malformed_json_is_a_configuration_error() {
        let err = PlaybackConfig::from_json_str("{").unwrap_err();
        assert!(matches!(err, VoiceError::Configuration(_)));
    }

    #[test]
    fn overrides_apply_and_clamp() {
        let config = PlaybackConfig::default()
            .with_overrides_from(lookup(&[
                (ENV_LOCALE, "fr-FR"),
                (ENV_PITCH, "0.2"),
                (ENV_RATE, " 1.5 "),
                (ENV_VOICE_PATIENCE_MS, "500"),
            ]))
            .unwrap();
        assert_eq!(config.preferred_locale, Language::FRENCH);
        assert_eq!(config.default_pitch, VocalPitchMod::MIN);
        assert_eq!(config.default_rate.value(), 1.5);
        assert_eq!(config.voice_patience(), Duration::from_millis(500));
    }

    #[test]
    fn bad_override_is_rejected() {
        let err = PlaybackConfig::default()
            .with_overrides_from(lookup(&[(ENV_RATE, "fast")]))
            .unwrap_err();
        assert!(err.to_string().contains(ENV_RATE));

        let err = PlaybackConfig::default()
            .with_overrides_from(lookup(&[(ENV_LOCALE, "  ")]))
            .unwrap_err();
        assert!(matches!(err, VoiceError::Configuration(_)));
    }
}
