pub mod config;
pub mod logging;
pub mod response;
pub mod routes;
pub mod services;
pub mod state;
pub mod workers;

use std::sync::Arc;

use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::Config;
use crate::services::lemmatizer::{Lemmatizer, WordNetLemmatizer};
use crate::services::phrasal_verbs::Catalog;
use crate::services::usage_validator::UsageValidator;
use crate::state::AppState;

/// Load the lemma resources and wire up shared state. A missing lemmatizer
/// is not fatal: the validator switches to literal phrase matching.
pub async fn build_state(config: Config) -> AppState {
    let client = config.http_client();

    let lemmatizer: Option<Arc<dyn Lemmatizer>> =
        match WordNetLemmatizer::load(&config.lemma_source, &client).await {
            Ok(lemmatizer) => Some(Arc::new(lemmatizer)),
            Err(err) => {
                tracing::warn!(
                    source = %config.lemma_source.describe(),
                    error = %err,
                    "lemmatizer unavailable, falling back to literal matching"
                );
                None
            }
        };

    let catalog = Catalog::new(config.data_source.clone(), client);
    AppState::new(config, catalog, UsageValidator::new(lemmatizer))
}

pub fn create_app(state: AppState) -> axum::Router {
    routes::router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::usage_validator::MatchPolicy;

    #[tokio::test]
    async fn default_config_lemmatizes() {
        let state = build_state(Config::default()).await;
        let validator = state.validator();
        assert_eq!(validator.policy(), MatchPolicy::Lemmatized);

        assert!(validator.validate("I came up with a plan", "come up with"));
        assert!(validator.validate("She gave in at last.", "give in"));
        assert!(validator.validate("They turned the offer down", "turn down"));
        assert!(validator.validate("He's been putting it off for weeks", "put off"));
        assert!(validator.validate("We ran into an old friend", "run into"));
    }
}
