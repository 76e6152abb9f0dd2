use std::sync::Arc;

use axum_test::TestServer;
use serde_json::Value;

use crate::{AppState, build_router, store::TransactionStore};

/// Create a test server for the full router backed by `store`.
pub(crate) fn get_test_server(store: Arc<dyn TransactionStore>) -> TestServer {
    let app = build_router(AppState::new(store));

    TestServer::new(app)
}

#[track_caller]
pub(crate) fn assert_error_body(body: &Value, message: &str) {
    assert_eq!(
        body,
        &serde_json::json!({ "error": message }),
        "unexpected error body"
    );
}
