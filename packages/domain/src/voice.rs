//! Host-supplied voices.

use serde::{Deserialize, Serialize};

use crate::language::Language;
use crate::voice_id::VoiceId;

/// A speech profile enumerated by the host platform.
///
/// Voices are immutable once enumerated; the application only refers to
/// them through their [`VoiceId`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voice {
    /// Host identifier (a voice URI in browsers).
    pub id: VoiceId,
    /// Human-readable voice name.
    pub name: String,
    /// Language the voice speaks.
    pub language: Language,
    /// Whether the host marks this voice as its own default.
    #[serde(default)]
    pub is_default: bool,
    /// Whether the voice is rendered on the device rather than remotely.
    #[serde(default)]
    pub local_service: bool,
}

impl Voice {
    /// Create a voice entry.
    pub fn new(
        id: impl Into<VoiceId>,
        name: impl Into<String>,
        language: impl Into<Language>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            language: language.into(),
            is_default: false,
            local_service: false,
        }
    }

    /// Mark the voice as the host default.
    pub fn default_voice(mut self, is_default: bool) -> Self {
        self.is_default = is_default;
        self
    }

    /// Mark the voice as locally rendered.
    pub fn local_service(mut self, local: bool) -> Self {
        self.local_service = local;
        self
    }

    /// Option-list label, e.g. `"Samantha (en-US)"`.
    pub fn label(&self) -> String {
        format!("{} ({})", self.name, self.language)
    }
}
