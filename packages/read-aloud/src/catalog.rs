//! Voice catalog and the loader that populates it from the host.
//!
//! Hosts may have their voice list ready immediately or only after a
//! "voices changed" notification. The loader covers both: it subscribes to
//! the notification, refreshes once eagerly, and detaches the subscription
//! the first time a refresh finds a non-empty list.

use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;
use read_aloud_domain::{Language, Voice, VoiceError, VoiceId};
use tokio::sync::watch;
use tracing::{debug, info};

use crate::config::PlaybackConfig;
use crate::host::{SpeechHost, SubscriptionId};

/// What a view should show for the voice list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    /// Still waiting for the host.
    Loading,
    /// Voices are listed.
    Ready,
    /// Waited longer than the configured patience without any voice.
    Unavailable,
}

/// Ordered voice list, loading flag and current selection.
///
/// `loading` starts `true` and becomes `false` exactly once, when the first
/// non-empty list arrives. From then on `selected` always names a voice in
/// `voices`.
#[derive(Debug, Clone, PartialEq)]
pub struct VoiceCatalog {
    voices: Vec<Voice>,
    loading: bool,
    selected: Option<VoiceId>,
}

impl Default for VoiceCatalog {
    fn default() -> Self {
        Self {
            voices: Vec::new(),
            loading: true,
            selected: None,
        }
    }
}

impl VoiceCatalog {
    pub fn voices(&self) -> &[Voice] {
        &self.voices
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_empty(&self) -> bool {
        self.voices.is_empty()
    }

    pub fn selected(&self) -> Option<&VoiceId> {
        self.selected.as_ref()
    }

    /// The selected voice entry.
    pub fn selected_voice(&self) -> Option<&Voice> {
        self.selected.as_ref().and_then(|id| self.find(id))
    }

    pub fn find(&self, id: &VoiceId) -> Option<&Voice> {
        self.voices.iter().find(|voice| &voice.id == id)
    }

    /// Reduce the catalog to a view indicator, given how long the caller has
    /// been waiting for voices.
    pub fn availability(&self, waited: Duration, patience: Duration) -> Availability {
        match (self.loading, waited > patience) {
            (false, _) => Availability::Ready,
            (true, false) => Availability::Loading,
            (true, true) => Availability::Unavailable,
        }
    }

    fn populate(&mut self, voices: Vec<Voice>, preferred: &Language) {
        self.selected = default_selection(&voices, preferred);
        self.voices = voices;
        self.loading = false;
    }

    fn select(&mut self, id: &VoiceId) -> Result<(), VoiceError> {
        if self.voices.is_empty() {
            return Err(VoiceError::VoiceUnavailable);
        }
        if self.find(id).is_none() {
            return Err(VoiceError::UnknownVoice(id.clone()));
        }
        self.selected = Some(id.clone());
        Ok(())
    }
}

/// First voice speaking `preferred`, else the first voice.
pub fn default_selection(voices: &[Voice], preferred: &Language) -> Option<VoiceId> {
    voices
        .iter()
        .find(|voice| voice.language.matches(preferred))
        .or_else(|| voices.first())
        .map(|voice| voice.id.clone())
}

struct LoaderShared {
    host: Arc<dyn SpeechHost>,
    preferred_locale: Language,
    patience: Duration,
    catalog: Mutex<VoiceCatalog>,
    subscription: Mutex<Option<SubscriptionId>>,
    catalog_tx: watch::Sender<VoiceCatalog>,
}

impl LoaderShared {
    fn refresh(&self) -> bool {
        if !self.catalog.lock().is_loading() {
            return false;
        }

        let voices = self.host.list_voices();
        if voices.is_empty() {
            debug!("host reports no voices yet");
            return false;
        }

        {
            let mut catalog = self.catalog.lock();
            // A readiness handler may have populated it while we queried.
            if !catalog.is_loading() {
                return false;
            }
            catalog.populate(voices, &self.preferred_locale);
            info!(
                voices = catalog.voices().len(),
                selected = ?catalog.selected(),
                "voice catalog loaded"
            );
            self.catalog_tx.send_replace(catalog.clone());
        }

        self.detach();
        true
    }

    fn detach(&self) {
        let subscription = self.subscription.lock().take();
        if let Some(id) = subscription {
            debug!(?id, "detaching voices-ready handler");
            self.host.remove_voices_ready(id);
        }
    }
}

/// Populates a [`VoiceCatalog`] from the host and keeps the voice selection.
pub struct VoiceCatalogLoader {
    shared: Arc<LoaderShared>,
}

impl VoiceCatalogLoader {
    /// Subscribe to the host's readiness notification, then refresh once.
    pub fn new(host: Arc<dyn SpeechHost>, config: &PlaybackConfig) -> Self {
        let (catalog_tx, _) = watch::channel(VoiceCatalog::default());
        let shared = Arc::new(LoaderShared {
            host,
            preferred_locale: config.preferred_locale.clone(),
            patience: config.voice_patience(),
            catalog: Mutex::new(VoiceCatalog::default()),
            subscription: Mutex::new(None),
            catalog_tx,
        });

        let weak: Weak<LoaderShared> = Arc::downgrade(&shared);
        let id = shared.host.on_voices_ready(Box::new(move || {
            if let Some(shared) = weak.upgrade() {
                shared.refresh();
            }
        }));
        // The host may have fired the handler before handing back its id.
        if shared.catalog.lock().is_loading() {
            *shared.subscription.lock() = Some(id);
        } else {
            shared.host.remove_voices_ready(id);
        }

        shared.refresh();
        Self { shared }
    }

    /// Query the host again. Returns `true` if this call loaded the catalog.
    ///
    /// Once loaded the catalog is fixed for the session, so later calls are
    /// no-ops.
    pub fn refresh(&self) -> bool {
        self.shared.refresh()
    }

    /// Snapshot of the catalog.
    pub fn catalog(&self) -> VoiceCatalog {
        self.shared.catalog.lock().clone()
    }

    pub fn is_loading(&self) -> bool {
        self.shared.catalog.lock().is_loading()
    }

    pub fn selected(&self) -> Option<VoiceId> {
        self.shared.catalog.lock().selected().cloned()
    }

    pub fn selected_voice(&self) -> Option<Voice> {
        self.shared.catalog.lock().selected_voice().cloned()
    }

    /// Select a voice by identifier.
    ///
    /// Fails with [`VoiceError::VoiceUnavailable`] before any voice has
    /// loaded and with [`VoiceError::UnknownVoice`] for identifiers not in
    /// the catalog; the selection is unchanged on failure.
    pub fn select(&self, id: &VoiceId) -> Result<(), VoiceError> {
        let mut catalog = self.shared.catalog.lock();
        catalog.select(id)?;
        debug!(%id, "voice selected");
        self.shared.catalog_tx.send_replace(catalog.clone());
        Ok(())
    }

    /// Whether the readiness handler is still registered with the host.
    pub fn is_subscribed(&self) -> bool {
        self.shared.subscription.lock().is_some()
    }

    /// Availability after waiting `waited`, judged against the configured
    /// patience.
    pub fn availability(&self, waited: Duration) -> Availability {
        self.shared
            .catalog
            .lock()
            .availability(waited, self.shared.patience)
    }

    /// Watch channel that observes every catalog change.
    pub fn subscribe(&self) -> watch::Receiver<VoiceCatalog> {
        self.shared.catalog_tx.subscribe()
    }
}

impl Drop for VoiceCatalogLoader {
    fn drop(&mut self) {
        self.shared.detach();
    }
}
