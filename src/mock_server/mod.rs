//! Mock FOSSology API server for E2E testing.
//!
//! This module provides an in-memory mock server that simulates the FOSSology
//! API for integration and end-to-end testing. Unlike wiremock which mocks at
//! the HTTP level per-test, this server maintains state across requests, so
//! an upload created in one call is visible to the next. It can also make
//! uploads answer 503 for a number of polls, like a server whose agents are
//! still running.
//!
//! # Example
//!
//! ```ignore
//! use fossology::mock_server::MockServer;
//! use fossology::{FossologyClient, Upload, Get};
//!
//! #[tokio::test]
//! async fn test_workflow() {
//!     let server = MockServer::start().await;
//!     let client = FossologyClient::new("test-token", server.url()).unwrap();
//!
//!     // Server comes with default fixtures
//!     let upload = Upload::get(&client, 2).await.unwrap();
//!     assert_eq!(upload.uploadname, "base-files_11.tar.xz");
//!
//!     server.shutdown().await;
//! }
//! ```

mod fixtures;
mod handlers;
mod server;
mod state;

pub use fixtures::{DefaultScenario, Fixtures};
pub use server::{MockServer, MOCK_API_VERSION};
pub use state::MockState;
