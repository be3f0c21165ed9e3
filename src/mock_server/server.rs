//! Mock FOSSology API server.
//!
//! Provides an axum-based HTTP server that simulates the FOSSology API.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Json, Router,
};
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use super::fixtures::{DefaultScenario, Fixtures};
use super::handlers;
use super::state::MockState;

/// API version reported by the mock.
pub const MOCK_API_VERSION: &str = "1.4.3";

/// A mock FOSSology API server for testing.
///
/// The server runs in the background and can be used to test the FOSSology
/// client against a realistic API implementation.
pub struct MockServer {
    /// The URL where the server is listening.
    url: String,
    /// Handle to the server task.
    handle: JoinHandle<()>,
    /// Shared state that can be modified during tests.
    state: Arc<RwLock<MockState>>,
}

impl MockServer {
    /// Start a new mock server with default fixtures.
    ///
    /// The server listens on a random available port and returns immediately.
    /// Use `url()` to get the server root URL.
    pub async fn start() -> Self {
        Self::with_state(Self::default_state()).await
    }

    /// Start a mock server with empty state.
    ///
    /// Useful when you want to control exactly what data is available.
    pub async fn start_empty() -> Self {
        Self::with_state(MockState::new()).await
    }

    /// Start a mock server with custom state.
    pub async fn with_state(state: MockState) -> Self {
        let shared_state = state.shared();
        let app = Self::create_router(shared_state.clone());

        // Bind to a random available port
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to address");
        let addr = listener.local_addr().expect("Failed to get local address");

        let handle = tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("Server error");
        });

        Self {
            url: format!("http://{}", addr),
            handle,
            state: shared_state,
        }
    }

    /// Get the server root URL.
    ///
    /// Use this URL when creating a `FossologyClient` for testing; the
    /// client appends `/api/v1/` itself.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Get access to the server's shared state.
    ///
    /// This allows modifying the mock data during a test.
    pub fn state(&self) -> Arc<RwLock<MockState>> {
        self.state.clone()
    }

    /// Shutdown the server.
    ///
    /// This aborts the server task. It's safe to call multiple times.
    pub async fn shutdown(self) {
        self.handle.abort();
        let _ = self.handle.await;
    }

    /// Create the default state with common test fixtures.
    pub fn default_state() -> MockState {
        let scenario = Fixtures::default_scenario();
        Self::state_from_scenario(scenario)
    }

    /// Create state from a scenario.
    fn state_from_scenario(scenario: DefaultScenario) -> MockState {
        let mut state = MockState::new();

        for folder in scenario.folders {
            state.folders.insert(folder.id, folder);
        }

        for upload in scenario.uploads {
            state.uploads.insert(upload.id, upload);
        }

        for summary in scenario.summaries {
            state.summaries.insert(summary.id, summary);
        }

        for (upload_id, agent, findings) in scenario.licenses {
            state.licenses.insert((upload_id, agent), findings);
        }

        for user in scenario.users {
            state.users.insert(user.id, user);
        }

        for group in scenario.groups {
            state.groups.insert(group.id, group);
        }

        for job in scenario.jobs {
            state.jobs.insert(job.id, job);
        }

        state.with_credentials("fossy", "fossy")
    }

    /// Create the axum router with all routes.
    pub fn create_router(state: Arc<RwLock<MockState>>) -> Router {
        Router::new()
            // Upload routes
            .route(
                "/api/v1/uploads",
                get(handlers::list_uploads).post(handlers::create_upload),
            )
            .route(
                "/api/v1/uploads/:id",
                get(handlers::get_upload)
                    .delete(handlers::delete_upload)
                    .patch(handlers::move_upload)
                    .put(handlers::copy_upload),
            )
            .route("/api/v1/uploads/:id/summary", get(handlers::get_summary))
            .route("/api/v1/uploads/:id/licenses", get(handlers::get_licenses))
            // User routes
            .route("/api/v1/users", get(handlers::list_users))
            .route(
                "/api/v1/users/:id",
                get(handlers::get_user).delete(handlers::delete_user),
            )
            // Folder routes
            .route(
                "/api/v1/folders",
                get(handlers::list_folders).post(handlers::create_folder),
            )
            .route(
                "/api/v1/folders/:id",
                get(handlers::get_folder)
                    .patch(handlers::update_folder)
                    .put(handlers::move_or_copy_folder)
                    .delete(handlers::delete_folder),
            )
            // Group routes
            .route(
                "/api/v1/groups",
                get(handlers::list_groups).post(handlers::create_group),
            )
            // Job routes
            .route(
                "/api/v1/jobs",
                get(handlers::list_jobs).post(handlers::schedule_job),
            )
            .route("/api/v1/jobs/:id", get(handlers::get_job))
            // Report routes
            .route("/api/v1/report", get(handlers::generate_report))
            .route("/api/v1/report/:id", get(handlers::download_report))
            // Authentication
            .route("/api/v1/tokens", post(handlers::create_token))
            .route("/api/v1/version", get(version))
            // Health check
            .route("/health", get(health_check))
            .with_state(state)
    }
}

/// Version endpoint.
async fn version() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "version": MOCK_API_VERSION }))
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "ok"
}
