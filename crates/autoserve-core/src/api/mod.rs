//! Client for the maintenance backend
//!
//! Reads (`get_vehicle_health`, `get_manufacturing_insights`) degrade to `None` on any
//! failure so the panel can show "no data". Actions (`send_message`,
//! `schedule_service`) return the error so the caller can report the action as
//! failed. Every failure is logged before it is swallowed or returned.

pub mod http;
pub mod types;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

use crate::state::ScheduleRequest;

pub use http::{HttpTransport, DEFAULT_API_BASE_URL};
pub use types::{ApiError, ChatReply, ManufacturingInsights, VehicleHealth};
use types::ChatRequest;

/// A single JSON request/response round trip
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, path: &str) -> Result<Value, ApiError>;
    async fn post(&self, path: &str, body: Value) -> Result<Value, ApiError>;
}

#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
}

impl ApiClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Client over HTTP against `base_url`
    pub fn http(base_url: &str, timeout: Option<std::time::Duration>) -> Result<Self, ApiError> {
        Ok(Self::new(Arc::new(HttpTransport::new(base_url, timeout)?)))
    }

    pub async fn get_vehicle_health(&self, vehicle_id: &str) -> Option<VehicleHealth> {
        let path = format!("/api/vehicle/{}/health", vehicle_id);
        self.read(&path).await
    }

    pub async fn send_message(&self, message: &str, vehicle_id: &str) -> Result<ChatReply, ApiError> {
        let body = to_body(&ChatRequest { message, vehicle_id });
        self.write("/api/chat", body).await
    }

    pub async fn schedule_service(&self, request: &ScheduleRequest) -> Result<Value, ApiError> {
        let body = to_body(request);
        self.write("/api/service/schedule", body).await
    }

    pub async fn get_manufacturing_insights(&self) -> Option<ManufacturingInsights> {
        self.read("/api/manufacturing/insights").await
    }

    async fn read<T: DeserializeOwned>(&self, path: &str) -> Option<T> {
        let result = match self.transport.get(path).await {
            Ok(value) => decode(path, value),
            Err(e) => Err(e),
        };

        match result {
            Ok(payload) => Some(payload),
            Err(e) => {
                tracing::error!(error = %e, path, "API read failed, treating as no data");
                None
            }
        }
    }

    async fn write<T: DeserializeOwned>(&self, path: &str, body: Value) -> Result<T, ApiError> {
        let result = match self.transport.post(path, body).await {
            Ok(value) => decode(path, value),
            Err(e) => Err(e),
        };

        if let Err(e) = &result {
            tracing::error!(error = %e, path, "API request failed");
        }
        result
    }
}

fn to_body<T: serde::Serialize>(payload: &T) -> Value {
    // Plain structs with string fields always serialize
    serde_json::to_value(payload).unwrap_or(Value::Null)
}

fn decode<T: DeserializeOwned>(path: &str, value: Value) -> Result<T, ApiError> {
    serde_json::from_value(value).map_err(|e| ApiError::Decode {
        path: path.to_string(),
        message: e.to_string(),
    })
}

#[cfg(any(test, feature = "test-util"))]
pub mod testing {
    //! In-memory transport that records every call

    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq)]
    pub struct RecordedCall {
        pub method: &'static str,
        pub path: String,
        pub body: Option<Value>,
    }

    /// Replies with canned JSON per path (`{}` when none is set), or fails every call
    #[derive(Default)]
    pub struct RecordingTransport {
        calls: Mutex<Vec<RecordedCall>>,
        replies: HashMap<String, Value>,
        failing: bool,
    }

    impl RecordingTransport {
        pub fn new() -> Self {
            Self::default()
        }

        /// Every call fails as if the backend were unreachable
        pub fn failing() -> Self {
            Self {
                failing: true,
                ..Self::default()
            }
        }

        pub fn reply(mut self, path: &str, value: Value) -> Self {
            self.replies.insert(path.to_string(), value);
            self
        }

        pub fn calls(&self) -> Vec<RecordedCall> {
            self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
        }

        fn respond(&self, method: &'static str, path: &str, body: Option<Value>) -> Result<Value, ApiError> {
            self.calls
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .push(RecordedCall {
                    method,
                    path: path.to_string(),
                    body,
                });

            if self.failing {
                return Err(ApiError::Transport {
                    path: path.to_string(),
                    message: "connection refused".to_string(),
                });
            }
            Ok(self
                .replies
                .get(path)
                .cloned()
                .unwrap_or_else(|| Value::Object(Default::default())))
        }
    }

    #[async_trait]
    impl Transport for RecordingTransport {
        async fn get(&self, path: &str) -> Result<Value, ApiError> {
            self.respond("GET", path, None)
        }

        async fn post(&self, path: &str, body: Value) -> Result<Value, ApiError> {
            self.respond("POST", path, Some(body))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::RecordingTransport;
    use super::*;
    use serde_json::json;

    fn client(transport: &Arc<RecordingTransport>) -> ApiClient {
        ApiClient::new(transport.clone())
    }

    fn booking() -> ScheduleRequest {
        ScheduleRequest {
            vehicle_id: "HERO-2024-001".to_string(),
            date: "2025-01-10".to_string(),
            time: "10:00 AM".to_string(),
            service_center: "Center A".to_string(),
        }
    }

    #[tokio::test]
    async fn test_reads_return_none_on_transport_failure() {
        let transport = Arc::new(RecordingTransport::failing());
        let api = client(&transport);

        assert!(api.get_vehicle_health("HERO-2024-001").await.is_none());
        assert!(api.get_manufacturing_insights().await.is_none());
        assert_eq!(transport.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_writes_propagate_transport_failure() {
        let transport = Arc::new(RecordingTransport::failing());
        let api = client(&transport);

        let chat = api.send_message("hello", "HERO-2024-001").await;
        assert!(matches!(chat, Err(ApiError::Transport { .. })));

        let schedule = api.schedule_service(&booking()).await;
        assert!(matches!(schedule, Err(ApiError::Transport { .. })));
    }

    #[tokio::test]
    async fn test_health_lookup_hits_vehicle_path() {
        let transport = Arc::new(RecordingTransport::new().reply(
            "/api/vehicle/HERO-2024-001/health",
            json!({ "health": 70, "lastService": "3 days ago" }),
        ));
        let api = client(&transport);

        let health = api.get_vehicle_health("HERO-2024-001").await.unwrap();
        assert_eq!(health.health, Some(70));
        assert_eq!(health.last_service.as_deref(), Some("3 days ago"));

        let calls = transport.calls();
        assert_eq!(calls[0].method, "GET");
        assert_eq!(calls[0].path, "/api/vehicle/HERO-2024-001/health");
    }

    #[tokio::test]
    async fn test_mismatched_read_payload_is_no_data() {
        let transport = Arc::new(
            RecordingTransport::new().reply("/api/manufacturing/insights", json!("not an object")),
        );
        assert!(client(&transport).get_manufacturing_insights().await.is_none());
    }

    #[tokio::test]
    async fn test_send_message_body_and_reply() {
        let transport = Arc::new(
            RecordingTransport::new().reply("/api/chat", json!({ "message": "Booked for Friday" })),
        );
        let api = client(&transport);

        let reply = api.send_message("book brakes", "HERO-2024-001").await.unwrap();
        assert_eq!(reply.message.as_deref(), Some("Booked for Friday"));

        let calls = transport.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].path, "/api/chat");
        assert_eq!(
            calls[0].body,
            Some(json!({ "message": "book brakes", "vehicleId": "HERO-2024-001" }))
        );
    }

    #[tokio::test]
    async fn test_chat_reply_without_message_is_ok() {
        let transport = Arc::new(RecordingTransport::new());
        let reply = client(&transport).send_message("hi", "v").await.unwrap();
        assert_eq!(reply, ChatReply { message: None });
    }

    #[tokio::test]
    async fn test_schedule_posts_booking_once() {
        let transport = Arc::new(
            RecordingTransport::new().reply("/api/service/schedule", json!({ "status": "confirmed" })),
        );
        let api = client(&transport);

        let confirmation = api.schedule_service(&booking()).await.unwrap();
        assert_eq!(confirmation["status"], "confirmed");

        let calls = transport.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].method, "POST");
        assert_eq!(
            calls[0].body,
            Some(json!({
                "vehicleId": "HERO-2024-001",
                "date": "2025-01-10",
                "time": "10:00 AM",
                "serviceCenter": "Center A",
            }))
        );
    }
}
