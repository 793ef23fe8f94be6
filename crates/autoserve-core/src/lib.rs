pub mod api;
pub mod config;
pub mod dashboard;
pub mod router;
pub mod state;

// Re-export main types for convenience
pub use api::{ApiClient, ApiError, ChatReply, HttpTransport, ManufacturingInsights, Transport, VehicleHealth};
pub use config::Config;
pub use dashboard::DashboardData;
pub use router::{Header, Panel, RoutedView, ViewRouter};
pub use state::{BookingForm, ChatLog, ChatMessage, ChatRole, ScheduleRequest};
