//! The relay's use cases.
//!
//! [`RelayService`] is what the HTTP handlers call.  It combines the
//! [`SettingsStore`] with an [`UpstreamApi`] and returns domain response
//! bodies, so a handler's only job is extracting the request and rendering
//! the result.

use std::sync::Arc;

use relay_core::{CompletionRequest, Settings, SettingsUpdate};
use tracing::{debug, info_span, warn, Instrument};
use uuid::Uuid;

use crate::application::error::RelayError;
use crate::application::settings_store::SettingsStore;
use crate::application::upstream::UpstreamApi;
use crate::domain::requests::{ModelsResponse, PublicConfig};

/// Shared, cheaply clonable handle to the relay's state and collaborators.
#[derive(Clone)]
pub struct RelayService {
    settings: Arc<SettingsStore>,
    upstream: Arc<dyn UpstreamApi>,
}

impl RelayService {
    pub fn new(settings: Arc<SettingsStore>, upstream: Arc<dyn UpstreamApi>) -> Self {
        Self { settings, upstream }
    }

    /// Available models plus the one currently selected.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::Upstream`] if the provider cannot be listed.
    pub async fn list_models(&self) -> Result<ModelsResponse, RelayError> {
        let models = self.upstream.list_models().await.map_err(|e| {
            warn!("model listing failed: {e}");
            RelayError::from(e)
        })?;
        let selected = self.settings.snapshot().await.model;
        debug!(count = models.len(), %selected, "listed upstream models");
        Ok(ModelsResponse { models, selected })
    }

    /// Applies one settings change.
    ///
    /// `field` names the request key and is reported when `update` is `None`
    /// (the key was absent from the request body).
    ///
    /// # Errors
    ///
    /// - [`RelayError::MissingField`] when `update` is `None`.
    /// - Whatever [`SettingsStore::update`] returns.
    pub async fn apply(
        &self,
        field: &'static str,
        update: Option<SettingsUpdate>,
    ) -> Result<Settings, RelayError> {
        let update = update.ok_or(RelayError::MissingField(field))?;
        self.settings.update(update).await
    }

    /// The browser-visible subset of the settings.
    pub async fn public_config(&self) -> PublicConfig {
        PublicConfig::from(&self.settings.snapshot().await)
    }

    /// Sends `prompt` (with the stored instruction prepended) to the provider
    /// and returns the reply text.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::Upstream`] if the completion call fails.
    pub async fn prompt(&self, prompt: String) -> Result<String, RelayError> {
        let settings = self.settings.snapshot().await;
        let request = CompletionRequest::from_settings(&settings, prompt);
        let span = info_span!("completion", request_id = %Uuid::new_v4(), model = %request.model);

        async move {
            debug!(prompt_chars = request.prompt.chars().count(), "relaying prompt");
            match self.upstream.complete(request).await {
                Ok(text) => {
                    debug!(reply_chars = text.chars().count(), "completion received");
                    Ok(text)
                }
                Err(e) => {
                    warn!("completion failed: {e}");
                    Err(RelayError::from(e))
                }
            }
        }
        .instrument(span)
        .await
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::settings_store::MockSettingsRepository;
    use crate::application::upstream::{MockUpstreamApi, UpstreamError};

    async fn service_with(settings: Settings, upstream: MockUpstreamApi) -> RelayService {
        let mut repo = MockSettingsRepository::new();
        repo.expect_load().returning(move || Ok(settings.clone()));
        repo.expect_save().returning(|_| Ok(()));
        let store = SettingsStore::open(Arc::new(repo)).await.unwrap();
        RelayService::new(Arc::new(store), Arc::new(upstream))
    }

    #[tokio::test]
    async fn test_list_models_reports_selected_model() {
        // Arrange
        let mut upstream = MockUpstreamApi::new();
        upstream
            .expect_list_models()
            .returning(|| Ok(vec!["model-a".to_string(), "model-b".to_string()]));
        let service = service_with(Settings::new("k", "model-b"), upstream).await;

        // Act
        let response = service.list_models().await.unwrap();

        // Assert
        assert_eq!(response.models, vec!["model-a", "model-b"]);
        assert_eq!(response.selected, "model-b");
    }

    #[tokio::test]
    async fn test_list_models_maps_upstream_failure() {
        let mut upstream = MockUpstreamApi::new();
        upstream.expect_list_models().returning(|| {
            Err(UpstreamError::Status {
                status: 401,
                body: "invalid x-api-key".to_string(),
            })
        });
        let service = service_with(Settings::new("k", "m"), upstream).await;

        let result = service.list_models().await;

        assert!(matches!(
            result,
            Err(RelayError::Upstream(UpstreamError::Status { status: 401, .. }))
        ));
    }

    #[tokio::test]
    async fn test_apply_without_value_is_missing_field() {
        let service = service_with(Settings::new("k", "m"), MockUpstreamApi::new()).await;

        let result = service.apply("model", None).await;

        assert!(matches!(result, Err(RelayError::MissingField("model"))));
    }

    #[tokio::test]
    async fn test_prompt_sends_instruction_prefixed_content() {
        // Arrange
        let mut settings = Settings::new("k", "model-a");
        settings.instruction = Some("be terse".to_string());
        let mut upstream = MockUpstreamApi::new();
        upstream
            .expect_complete()
            .withf(|req: &CompletionRequest| {
                req.full_prompt() == "be terse\nhello" && req.model == "model-a"
            })
            .times(1)
            .returning(|_| Ok("hi".to_string()));
        let service = service_with(settings, upstream).await;

        // Act
        let reply = service.prompt("hello".to_string()).await.unwrap();

        // Assert
        assert_eq!(reply, "hi");
    }

    #[tokio::test]
    async fn test_prompt_uses_latest_settings() {
        // Arrange
        let mut upstream = MockUpstreamApi::new();
        upstream
            .expect_complete()
            .withf(|req: &CompletionRequest| req.temperature == Some(0.25))
            .times(1)
            .returning(|_| Ok(String::new()));
        let service = service_with(Settings::new("k", "m"), upstream).await;

        // Act
        service
            .apply("temperature", Some(SettingsUpdate::Temperature(0.25)))
            .await
            .unwrap();
        let reply = service.prompt("x".to_string()).await.unwrap();

        // Assert
        assert_eq!(reply, "");
    }

    #[tokio::test]
    async fn test_public_config_reflects_store() {
        let mut settings = Settings::new("k", "m");
        settings.instruction = Some("rules".to_string());
        let service = service_with(settings, MockUpstreamApi::new()).await;

        let config = service.public_config().await;

        assert_eq!(config.instruction, "rules");
        assert_eq!(config.temperature, 1.0);
    }
}
