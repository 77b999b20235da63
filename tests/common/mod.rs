#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use serde_json::Value;

use phrasal_lab::config::Config;
use phrasal_lab::services::lemmatizer::WordNetLemmatizer;
use phrasal_lab::services::phrasal_verbs::{Catalog, DataSource};
use phrasal_lab::services::usage_validator::UsageValidator;
use phrasal_lab::state::AppState;

pub const INDEX_VERB: &str = "\
come v 12 4 @ ~ * > 12 11 01849221 01848465
turn v 26 4 @ ~ * > 26 20 02094569 01907258
like v 5 3 @ ~ + 5 4 01777210 01776727
give v 44 4 @ ~ * > 44 35 02235842 02199590
run v 41 4 @ ~ * > 41 31 01926311 01925694
";

pub const VERB_EXC: &str = "\
came come
gave give
ran run
";

pub const SINGLE_ENTRY_CSV: &str = "\
PhrasalVerb,Definition,Example
turn down,to reduce the volume of something,Please turn the TV down.
";

pub fn lemmatizer() -> WordNetLemmatizer {
    WordNetLemmatizer::from_wordnet(INDEX_VERB, VERB_EXC).expect("fixture lexicon")
}

pub fn lemmatizing_validator() -> UsageValidator {
    UsageValidator::new(Some(Arc::new(lemmatizer())))
}

pub fn test_state(csv: &str) -> AppState {
    state_with_source(DataSource::Inline(csv.to_string()))
}

pub fn state_with_source(source: DataSource) -> AppState {
    let config = Config::default();
    let catalog = Catalog::new(source, reqwest::Client::new());
    AppState::new(config, catalog, lemmatizing_validator())
}

pub fn create_test_app(csv: &str) -> Router {
    phrasal_lab::create_app(test_state(csv))
}

pub fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
