//! Helpers shared by the integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use fossology::{FossologyClient, Sleeper};

/// Sleeper that returns immediately and remembers every requested delay.
#[derive(Debug, Default)]
pub struct RecordingSleeper {
    delays: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn delays(&self) -> Vec<Duration> {
        self.delays.lock().unwrap().clone()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.delays.lock().unwrap().push(duration);
    }
}

/// Client for `server_url` that never actually waits between polls.
pub fn client(server_url: &str) -> (FossologyClient, Arc<RecordingSleeper>) {
    let sleeper = Arc::new(RecordingSleeper::default());
    let client = FossologyClient::new("test-token", server_url)
        .unwrap()
        .with_sleeper(sleeper.clone());
    (client, sleeper)
}

/// Upload detail body as returned by a current server.
pub fn upload_json(id: u64, name: &str) -> serde_json::Value {
    serde_json::json!({
        "folderid": 1,
        "foldername": "Software Repository",
        "id": id,
        "description": "",
        "uploadname": name,
        "uploaddate": "2024-03-14 09:26:53.589793+00",
        "hash": {
            "sha1": "D4D663FC2877084362FB2297337BE05684869B00",
            "md5": "6F2D9BE1E0D6E8D9D5F9C5D2B1A2E3F4",
            "sha256": "ABCDEF",
            "size": 1024
        }
    })
}

/// FOSSology `Info` body.
pub fn info_json(code: u16, message: impl Into<serde_json::Value>) -> serde_json::Value {
    serde_json::json!({
        "code": code,
        "message": message.into(),
        "type": if code < 400 { "INFO" } else { "ERROR" },
    })
}
