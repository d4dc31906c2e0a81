//! Shared listener state: the backend client and where settings come from.

use std::sync::Arc;

use replicate_proxy_core::{config, PredictionBackend};
use replicate_proxy_types::Settings;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    backend: Arc<dyn PredictionBackend>,
    settings: SettingsSource,
}

enum SettingsSource {
    /// Re-read the process environment for every request
    Environment,
    Fixed(Settings),
}

impl AppState {
    /// Settings are resolved from the environment on each request.
    pub fn new(backend: Arc<dyn PredictionBackend>) -> Self {
        Self::build(backend, SettingsSource::Environment)
    }

    /// Settings pinned to `settings`.
    pub fn with_settings(backend: Arc<dyn PredictionBackend>, settings: Settings) -> Self {
        Self::build(backend, SettingsSource::Fixed(settings))
    }

    fn build(backend: Arc<dyn PredictionBackend>, settings: SettingsSource) -> Self {
        Self { inner: Arc::new(AppStateInner { backend, settings }) }
    }

    pub fn settings(&self) -> Settings {
        match &self.inner.settings {
            SettingsSource::Environment => config::from_env(),
            SettingsSource::Fixed(settings) => settings.clone(),
        }
    }

    pub fn backend(&self) -> &dyn PredictionBackend {
        self.inner.backend.as_ref()
    }
}
