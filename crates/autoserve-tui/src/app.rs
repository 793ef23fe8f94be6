use ratatui::widgets::ListState;
use serde_json::Value;
use tokio::task::{JoinError, JoinHandle};

use autoserve_core::{
    ApiClient, ApiError, BookingForm, ChatLog, ChatReply, ChatRole, Config, DashboardData,
    ManufacturingInsights, Panel, VehicleHealth, ViewRouter,
};

pub const CHAT_FALLBACK: &str =
    "I can help you schedule that service. When would be convenient for you?";
pub const CHAT_ERROR: &str =
    "I apologize for the technical issue. Please try again or contact customer support.";
pub const BOOKING_SUCCESS: &str = "Service scheduled successfully!";
pub const BOOKING_ERROR: &str = "Error scheduling service";
pub const NO_DATA: &str = "No data available";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

/// Which part of the booking form has focus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BookingField {
    #[default]
    Center,
    Date,
    Time,
    Confirm,
}

impl BookingField {
    pub fn next(self) -> Self {
        match self {
            BookingField::Center => BookingField::Date,
            BookingField::Date => BookingField::Time,
            BookingField::Time | BookingField::Confirm => BookingField::Confirm,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            BookingField::Center | BookingField::Date => BookingField::Center,
            BookingField::Time => BookingField::Date,
            BookingField::Confirm => BookingField::Time,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashKind {
    Info,
    Success,
    Error,
}

/// One-line status message shown above the footer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flash {
    pub kind: FlashKind,
    pub text: String,
}

pub struct App {
    // Core state
    pub should_quit: bool,
    pub router: ViewRouter,
    pub input_mode: InputMode,
    pub data: DashboardData,
    pub vehicle_id: String,
    pub flash: Option<Flash>,
    pub animation_frame: u8,
    api: ApiClient,

    // Alerts
    pub alert_state: ListState,

    // Scheduling
    pub booking: BookingForm,
    pub booking_field: BookingField,
    pub center_state: ListState,
    pub slot_cursor: usize,
    pub date_input: String,
    pub date_cursor: usize,
    booking_task: Option<JoinHandle<Result<Value, ApiError>>>,

    // Voice assistant
    pub chat: ChatLog,
    pub chat_input: String,
    pub chat_cursor: usize,
    /// Lines scrolled back from the newest message
    pub chat_scroll_back: u16,
    pub listening: bool,
    chat_task: Option<JoinHandle<Result<ChatReply, ApiError>>>,

    // Backend refreshes
    health_task: Option<JoinHandle<Option<VehicleHealth>>>,
    insights_task: Option<JoinHandle<Option<ManufacturingInsights>>>,
}

impl App {
    pub fn new(config: &Config, data: DashboardData, api: ApiClient) -> Self {
        let chat = ChatLog::with_greeting(&data.assistant_greeting);

        let mut alert_state = ListState::default();
        if !data.alerts.is_empty() {
            alert_state.select(Some(0));
        }
        let mut center_state = ListState::default();
        if !data.service_centers.is_empty() {
            center_state.select(Some(0));
        }

        Self {
            should_quit: false,
            router: ViewRouter::new(),
            input_mode: InputMode::Normal,
            vehicle_id: config.vehicle_id().to_string(),
            data,
            flash: None,
            animation_frame: 0,
            api,

            alert_state,

            booking: BookingForm::default(),
            booking_field: BookingField::default(),
            center_state,
            slot_cursor: 0,
            date_input: String::new(),
            date_cursor: 0,
            booking_task: None,

            chat,
            chat_input: String::new(),
            chat_cursor: 0,
            chat_scroll_back: 0,
            listening: false,
            chat_task: None,

            health_task: None,
            insights_task: None,
        }
    }

    pub fn active_panel(&self) -> Panel {
        self.router.active()
    }

    pub fn select_panel(&mut self, panel: Panel) {
        self.router.select(panel);
        self.input_mode = InputMode::Normal;
    }

    pub fn set_flash(&mut self, kind: FlashKind, text: impl Into<String>) {
        self.flash = Some(Flash {
            kind,
            text: text.into(),
        });
    }

    // Pending request state, one slot per panel

    pub fn is_chat_pending(&self) -> bool {
        self.chat_task.is_some()
    }

    pub fn is_booking_pending(&self) -> bool {
        self.booking_task.is_some()
    }

    pub fn is_health_refreshing(&self) -> bool {
        self.health_task.is_some()
    }

    pub fn is_insights_refreshing(&self) -> bool {
        self.insights_task.is_some()
    }

    pub fn has_pending_tasks(&self) -> bool {
        self.is_chat_pending()
            || self.is_booking_pending()
            || self.is_health_refreshing()
            || self.is_insights_refreshing()
    }

    pub fn can_confirm_booking(&self) -> bool {
        self.booking.is_complete() && !self.is_booking_pending()
    }

    /// Fetch fresh vehicle health. Returns false if a refresh is already running.
    pub fn refresh_health(&mut self) -> bool {
        if self.health_task.is_some() {
            return false;
        }
        let api = self.api.clone();
        let vehicle_id = self.vehicle_id.clone();
        tracing::debug!(%vehicle_id, "refreshing vehicle health");
        self.health_task = Some(tokio::spawn(async move {
            api.get_vehicle_health(&vehicle_id).await
        }));
        true
    }

    pub fn refresh_insights(&mut self) -> bool {
        if self.insights_task.is_some() {
            return false;
        }
        let api = self.api.clone();
        tracing::debug!("refreshing manufacturing insights");
        self.insights_task = Some(tokio::spawn(async move {
            api.get_manufacturing_insights().await
        }));
        true
    }

    /// Append the typed message and send it. Blank input and sends while a reply is
    /// outstanding are ignored.
    pub fn send_chat(&mut self) -> bool {
        if self.chat_input.trim().is_empty() || self.chat_task.is_some() {
            return false;
        }

        let message = std::mem::take(&mut self.chat_input);
        self.chat_cursor = 0;
        self.chat_scroll_back = 0;
        self.chat.push(ChatRole::User, message.clone());

        let api = self.api.clone();
        let vehicle_id = self.vehicle_id.clone();
        self.chat_task = Some(tokio::spawn(async move {
            api.send_message(&message, &vehicle_id).await
        }));
        true
    }

    /// Issue the booking. Does nothing until center, date and time are all set.
    pub fn confirm_booking(&mut self) -> bool {
        if self.booking_task.is_some() {
            return false;
        }
        let Some(request) = self.booking.request_for(&self.vehicle_id) else {
            return false;
        };

        tracing::info!(
            vehicle_id = %request.vehicle_id,
            date = %request.date,
            time = %request.time,
            service_center = %request.service_center,
            "scheduling service"
        );
        let api = self.api.clone();
        self.booking_task = Some(tokio::spawn(async move {
            api.schedule_service(&request).await
        }));
        true
    }

    /// Collect results of any finished requests
    pub async fn poll_tasks(&mut self) {
        if let Some(result) = take_finished(&mut self.chat_task).await {
            self.finish_chat(flatten(result));
        }
        if let Some(result) = take_finished(&mut self.booking_task).await {
            self.finish_booking(flatten(result));
        }
        if let Some(result) = take_finished(&mut self.health_task).await {
            self.finish_health(result.unwrap_or_else(|e| log_join_error(e, None)));
        }
        if let Some(result) = take_finished(&mut self.insights_task).await {
            self.finish_insights(result.unwrap_or_else(|e| log_join_error(e, None)));
        }
    }

    pub fn finish_chat(&mut self, result: Result<ChatReply, ApiError>) {
        let content = match result {
            Ok(reply) => reply.message.unwrap_or_else(|| CHAT_FALLBACK.to_string()),
            Err(_) => CHAT_ERROR.to_string(),
        };
        self.chat.push(ChatRole::Assistant, content);
        self.chat_scroll_back = 0;
    }

    pub fn finish_booking(&mut self, result: Result<Value, ApiError>) {
        match result {
            Ok(_) => self.set_flash(FlashKind::Success, BOOKING_SUCCESS),
            Err(_) => self.set_flash(FlashKind::Error, BOOKING_ERROR),
        }
    }

    pub fn finish_health(&mut self, health: Option<VehicleHealth>) {
        match health {
            Some(health) => {
                self.data.vehicle.apply(&health);
                self.set_flash(FlashKind::Success, "Vehicle health updated");
            }
            None => self.set_flash(FlashKind::Info, format!("{}: vehicle health", NO_DATA)),
        }
    }

    pub fn finish_insights(&mut self, insights: Option<ManufacturingInsights>) {
        match insights {
            Some(insights) if self.data.apply_insights(&insights) => {
                self.set_flash(FlashKind::Success, "Manufacturing insights updated");
            }
            _ => self.set_flash(FlashKind::Info, format!("{}: manufacturing insights", NO_DATA)),
        }
    }

    /// Tick animation frame (called by Tick event)
    pub fn tick_animation(&mut self) {
        if self.has_pending_tasks() || self.listening {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
    }

    // Alerts

    pub fn alert_nav_down(&mut self) {
        let len = self.data.alerts.len();
        if len > 0 {
            let i = self.alert_state.selected().unwrap_or(0);
            self.alert_state.select(Some((i + 1).min(len - 1)));
        }
    }

    pub fn alert_nav_up(&mut self) {
        let i = self.alert_state.selected().unwrap_or(0);
        self.alert_state.select(Some(i.saturating_sub(1)));
    }

    /// "Schedule Service" on an alert: jump to the booking form
    pub fn schedule_from_alert(&mut self) {
        let component = self
            .alert_state
            .selected()
            .and_then(|i| self.data.alerts.get(i))
            .map(|alert| alert.component.clone());

        self.select_panel(Panel::Scheduling);
        self.booking_field = BookingField::Center;
        if let Some(component) = component {
            self.set_flash(FlashKind::Info, format!("Book a service for: {}", component));
        }
    }

    // Scheduling

    pub fn booking_nav_down(&mut self) {
        match self.booking_field {
            BookingField::Center => {
                let len = self.data.service_centers.len();
                if len > 0 {
                    let i = self.center_state.selected().unwrap_or(0);
                    self.center_state.select(Some((i + 1).min(len - 1)));
                }
            }
            BookingField::Time => {
                let len = self.data.time_slots.len();
                if len > 0 {
                    self.slot_cursor = (self.slot_cursor + 1).min(len - 1);
                }
            }
            BookingField::Date | BookingField::Confirm => {}
        }
    }

    pub fn booking_nav_up(&mut self) {
        match self.booking_field {
            BookingField::Center => {
                let i = self.center_state.selected().unwrap_or(0);
                self.center_state.select(Some(i.saturating_sub(1)));
            }
            BookingField::Time => {
                self.slot_cursor = self.slot_cursor.saturating_sub(1);
            }
            BookingField::Date | BookingField::Confirm => {}
        }
    }

    /// Enter on the focused booking field
    pub fn booking_activate(&mut self) {
        match self.booking_field {
            BookingField::Center => {
                let selected = self
                    .center_state
                    .selected()
                    .and_then(|i| self.data.service_centers.get(i));
                if let Some(center) = selected {
                    self.booking.service_center = Some(center.name.clone());
                    self.booking_field = BookingField::Date;
                }
            }
            BookingField::Date => {
                self.date_input = self.booking.date.clone();
                self.date_cursor = self.date_input.chars().count();
                self.input_mode = InputMode::Editing;
            }
            BookingField::Time => {
                if let Some(slot) = self.data.time_slots.get(self.slot_cursor) {
                    self.booking.time = Some(slot.clone());
                    self.booking_field = BookingField::Confirm;
                }
            }
            BookingField::Confirm => {
                self.confirm_booking();
            }
        }
    }

    pub fn commit_date(&mut self) {
        self.booking.date = self.date_input.trim().to_string();
        self.input_mode = InputMode::Normal;
        if !self.booking.date.is_empty() {
            self.booking_field = BookingField::Time;
        }
    }

    // Voice assistant

    pub fn toggle_listening(&mut self) {
        self.listening = !self.listening;
    }

    pub fn chat_scroll_up(&mut self) {
        self.chat_scroll_back = self.chat_scroll_back.saturating_add(1);
    }

    pub fn chat_scroll_down(&mut self) {
        self.chat_scroll_back = self.chat_scroll_back.saturating_sub(1);
    }
}

async fn take_finished<T>(slot: &mut Option<JoinHandle<T>>) -> Option<Result<T, JoinError>> {
    if !slot.as_ref().is_some_and(|handle| handle.is_finished()) {
        return None;
    }
    let handle = slot.take()?;
    Some(handle.await)
}

fn flatten<T>(result: Result<Result<T, ApiError>, JoinError>) -> Result<T, ApiError> {
    result.unwrap_or_else(|e| {
        log_join_error(
            e,
            Err(ApiError::Transport {
                path: String::new(),
                message: "request task aborted".to_string(),
            }),
        )
    })
}

fn log_join_error<T>(err: JoinError, fallback: T) -> T {
    tracing::error!(error = %err, "request task did not complete");
    fallback
}

#[cfg(test)]
mod tests {
    use super::*;
    use autoserve_core::api::testing::RecordingTransport;
    use serde_json::json;
    use std::sync::Arc;

    fn app_with(transport: &Arc<RecordingTransport>) -> App {
        App::new(
            &Config::new(),
            DashboardData::default(),
            ApiClient::new(transport.clone()),
        )
    }

    /// Drive spawned requests to completion
    async fn settle(app: &mut App) {
        for _ in 0..200 {
            app.poll_tasks().await;
            if !app.has_pending_tasks() {
                return;
            }
            tokio::task::yield_now().await;
        }
        panic!("requests did not finish");
    }

    #[tokio::test]
    async fn test_chat_reply_is_appended() {
        let transport = Arc::new(
            RecordingTransport::new().reply("/api/chat", json!({ "message": "Friday works." })),
        );
        let mut app = app_with(&transport);
        app.chat_input = "Book my brakes".to_string();

        assert!(app.send_chat());
        assert!(app.chat_input.is_empty());
        assert_eq!(app.chat.len(), 2);
        settle(&mut app).await;

        let messages = app.chat.messages();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[1].role, ChatRole::User);
        assert_eq!(messages[1].content, "Book my brakes");
        assert_eq!(messages[2].content, "Friday works.");
    }

    #[tokio::test]
    async fn test_chat_reply_without_message_uses_fallback() {
        let transport = Arc::new(RecordingTransport::new());
        let mut app = app_with(&transport);
        app.chat_input = "hi".to_string();

        app.send_chat();
        settle(&mut app).await;

        assert_eq!(app.chat.last().map(|m| m.content.as_str()), Some(CHAT_FALLBACK));
    }

    #[tokio::test]
    async fn test_chat_failure_is_reported_to_user() {
        let transport = Arc::new(RecordingTransport::failing());
        let mut app = app_with(&transport);
        app.chat_input = "hi".to_string();

        app.send_chat();
        settle(&mut app).await;

        let last = app.chat.last().unwrap();
        assert_eq!(last.role, ChatRole::Assistant);
        assert_eq!(last.content, CHAT_ERROR);
    }

    #[tokio::test]
    async fn test_blank_chat_and_second_send_are_ignored() {
        let transport = Arc::new(RecordingTransport::new());
        let mut app = app_with(&transport);

        app.chat_input = "   ".to_string();
        assert!(!app.send_chat());

        app.chat_input = "first".to_string();
        assert!(app.send_chat());
        app.chat_input = "second".to_string();
        assert!(!app.send_chat());
        assert_eq!(app.chat_input, "second");

        settle(&mut app).await;
        assert_eq!(transport.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_incomplete_booking_sends_nothing() {
        let transport = Arc::new(RecordingTransport::new());
        let mut app = app_with(&transport);

        app.booking.service_center = Some("Center A".to_string());
        app.booking.time = Some("10:00 AM".to_string());
        assert!(!app.can_confirm_booking());
        assert!(!app.confirm_booking());

        settle(&mut app).await;
        assert!(transport.calls().is_empty());
        assert!(app.flash.is_none());
    }

    #[tokio::test]
    async fn test_booking_success_and_failure_flash() {
        let transport = Arc::new(RecordingTransport::new());
        let mut app = app_with(&transport);
        app.booking = BookingForm {
            service_center: Some("Center A".to_string()),
            date: "2025-01-10".to_string(),
            time: Some("10:00 AM".to_string()),
        };

        assert!(app.confirm_booking());
        assert!(!app.confirm_booking());
        settle(&mut app).await;
        assert_eq!(app.flash.as_ref().map(|f| f.text.as_str()), Some(BOOKING_SUCCESS));
        assert_eq!(transport.calls().len(), 1);

        let failing = Arc::new(RecordingTransport::failing());
        let mut app = app_with(&failing);
        app.booking.service_center = Some("Center A".to_string());
        app.booking.date = "2025-01-10".to_string();
        app.booking.time = Some("10:00 AM".to_string());

        app.confirm_booking();
        settle(&mut app).await;
        let flash = app.flash.unwrap();
        assert_eq!(flash.kind, FlashKind::Error);
        assert_eq!(flash.text, BOOKING_ERROR);
    }

    #[tokio::test]
    async fn test_health_refresh_failure_keeps_data() {
        let transport = Arc::new(RecordingTransport::failing());
        let mut app = app_with(&transport);
        let before = app.data.vehicle.clone();

        assert!(app.refresh_health());
        assert!(!app.refresh_health());
        settle(&mut app).await;

        assert_eq!(app.data.vehicle, before);
        assert!(app.flash.unwrap().text.starts_with(NO_DATA));
    }

    #[tokio::test]
    async fn test_health_refresh_merges_payload() {
        let transport = Arc::new(RecordingTransport::new().reply(
            "/api/vehicle/HERO-2024-001/health",
            json!({ "health": 55, "mileage": 13000 }),
        ));
        let mut app = app_with(&transport);

        app.refresh_health();
        settle(&mut app).await;

        assert_eq!(app.data.vehicle.health, 55);
        assert_eq!(app.data.vehicle.mileage_km, 13_000);
        assert_eq!(app.data.vehicle.model, "Hero Splendor Plus");
    }

    #[tokio::test]
    async fn test_insights_refresh_without_findings_is_no_data() {
        let transport = Arc::new(RecordingTransport::new());
        let mut app = app_with(&transport);

        app.refresh_insights();
        settle(&mut app).await;

        assert_eq!(app.data.rca_findings.len(), 3);
        assert!(app.flash.unwrap().text.starts_with(NO_DATA));
    }

    #[test]
    fn test_schedule_from_alert_opens_booking() {
        let transport = Arc::new(RecordingTransport::new());
        let mut app = app_with(&transport);
        app.alert_nav_down();

        app.schedule_from_alert();

        assert_eq!(app.active_panel(), Panel::Scheduling);
        assert_eq!(app.booking_field, BookingField::Center);
        assert_eq!(app.flash.unwrap().text, "Book a service for: Battery");
    }

    #[test]
    fn test_booking_field_navigation_is_clamped() {
        assert_eq!(BookingField::Center.prev(), BookingField::Center);
        assert_eq!(BookingField::Center.next().next().next(), BookingField::Confirm);
        assert_eq!(BookingField::Confirm.next(), BookingField::Confirm);
    }
}
