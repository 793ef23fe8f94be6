use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use autoserve_core::Panel;
use crate::app::{App, BookingField, InputMode};
use crate::tui::AppEvent;

/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

pub async fn handle_event(app: &mut App, event: AppEvent) -> Result<()> {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Resize(_, _) => {}
        AppEvent::Tick => {
            app.tick_animation();
        }
    }
    app.poll_tasks().await;
    Ok(())
}

pub fn handle_key(app: &mut App, key: KeyEvent) {
    // Global keys that work in any mode
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    match app.input_mode {
        InputMode::Normal => handle_normal_mode(app, key),
        InputMode::Editing => handle_editing_mode(app, key),
    }
}

fn handle_normal_mode(app: &mut App, key: KeyEvent) {
    // Panel switching works from every panel
    match key.code {
        KeyCode::Char('q') => {
            app.should_quit = true;
            return;
        }
        KeyCode::Tab => {
            app.router.next();
            return;
        }
        KeyCode::BackTab => {
            app.router.previous();
            return;
        }
        KeyCode::Char(c @ '1'..='6') => {
            let idx = (c as usize) - ('1' as usize);
            if let Some(panel) = Panel::from_index(idx) {
                app.select_panel(panel);
            }
            return;
        }
        _ => {}
    }

    match app.active_panel() {
        Panel::Dashboard => {
            if key.code == KeyCode::Char('r') {
                app.refresh_health();
            }
        }
        Panel::Alerts => handle_alerts_normal(app, key),
        Panel::Scheduling => handle_scheduling_normal(app, key),
        Panel::Voice => handle_voice_normal(app, key),
        Panel::Manufacturing => {
            if key.code == KeyCode::Char('r') {
                app.refresh_insights();
            }
        }
        Panel::Analytics => {}
    }
}

fn handle_alerts_normal(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => app.alert_nav_down(),
        KeyCode::Char('k') | KeyCode::Up => app.alert_nav_up(),
        // "Schedule Service" button on the selected alert
        KeyCode::Enter | KeyCode::Char('s') => app.schedule_from_alert(),
        _ => {}
    }
}

fn handle_scheduling_normal(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('l') | KeyCode::Right => {
            app.booking_field = app.booking_field.next();
        }
        KeyCode::Char('h') | KeyCode::Left => {
            app.booking_field = app.booking_field.prev();
        }
        KeyCode::Char('j') | KeyCode::Down => app.booking_nav_down(),
        KeyCode::Char('k') | KeyCode::Up => app.booking_nav_up(),
        KeyCode::Enter => app.booking_activate(),
        KeyCode::Char('i') if app.booking_field == BookingField::Date => app.booking_activate(),
        KeyCode::Char('c') => {
            app.confirm_booking();
        }
        _ => {}
    }
}

fn handle_voice_normal(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('i') | KeyCode::Enter => {
            app.input_mode = InputMode::Editing;
        }
        KeyCode::Char('v') => app.toggle_listening(),
        KeyCode::Char('k') | KeyCode::Up => app.chat_scroll_up(),
        KeyCode::Char('j') | KeyCode::Down => app.chat_scroll_down(),
        KeyCode::Char('G') => app.chat_scroll_back = 0,
        _ => {}
    }
}

fn handle_editing_mode(app: &mut App, key: KeyEvent) {
    match app.active_panel() {
        Panel::Voice => match key.code {
            KeyCode::Esc => app.input_mode = InputMode::Normal,
            KeyCode::Enter => {
                app.send_chat();
            }
            _ => edit_line(&mut app.chat_input, &mut app.chat_cursor, key),
        },
        Panel::Scheduling => match key.code {
            KeyCode::Esc => {
                app.date_input.clear();
                app.date_cursor = 0;
                app.input_mode = InputMode::Normal;
            }
            KeyCode::Enter => app.commit_date(),
            _ => edit_line(&mut app.date_input, &mut app.date_cursor, key),
        },
        _ => app.input_mode = InputMode::Normal,
    }
}

/// Single-line text editing shared by the chat box and the date field
fn edit_line(input: &mut String, cursor: &mut usize, key: KeyEvent) {
    match key.code {
        KeyCode::Char(c) => {
            let byte_pos = char_to_byte_index(input, *cursor);
            input.insert(byte_pos, c);
            *cursor += 1;
        }
        KeyCode::Backspace => {
            if *cursor > 0 {
                *cursor -= 1;
                let byte_pos = char_to_byte_index(input, *cursor);
                input.remove(byte_pos);
            }
        }
        KeyCode::Delete => {
            if *cursor < input.chars().count() {
                let byte_pos = char_to_byte_index(input, *cursor);
                input.remove(byte_pos);
            }
        }
        KeyCode::Left => {
            *cursor = cursor.saturating_sub(1);
        }
        KeyCode::Right => {
            *cursor = (*cursor + 1).min(input.chars().count());
        }
        KeyCode::Home => *cursor = 0,
        KeyCode::End => *cursor = input.chars().count(),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use autoserve_core::api::testing::RecordingTransport;
    use autoserve_core::{ApiClient, Config, DashboardData};
    use autoserve_core::dashboard::{Capacity, ServiceCenter};
    use serde_json::json;
    use std::sync::Arc;

    fn press(app: &mut App, code: KeyCode) {
        handle_key(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn app_with(transport: &Arc<RecordingTransport>, data: DashboardData) -> App {
        App::new(&Config::new(), data, ApiClient::new(transport.clone()))
    }

    #[test]
    fn test_char_to_byte_index() {
        assert_eq!(char_to_byte_index("héllo", 2), 3);
        assert_eq!(char_to_byte_index("abc", 10), 3);
    }

    #[test]
    fn test_number_keys_and_tab_switch_panels() {
        let transport = Arc::new(RecordingTransport::new());
        let mut app = app_with(&transport, DashboardData::default());

        press(&mut app, KeyCode::Char('5'));
        assert_eq!(app.active_panel(), Panel::Manufacturing);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.active_panel(), Panel::Analytics);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.active_panel(), Panel::Dashboard);
        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.active_panel(), Panel::Analytics);
    }

    #[test]
    fn test_typing_q_in_chat_does_not_quit() {
        let transport = Arc::new(RecordingTransport::new());
        let mut app = app_with(&transport, DashboardData::default());

        press(&mut app, KeyCode::Char('4'));
        press(&mut app, KeyCode::Char('i'));
        type_text(&mut app, "quick question");
        assert!(!app.should_quit);
        assert_eq!(app.chat_input, "quick question");

        press(&mut app, KeyCode::Esc);
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }

    #[test]
    fn test_edit_line_cursor_movement() {
        let mut input = String::from("10:00");
        let mut cursor = 5;
        edit_line(&mut input, &mut cursor, KeyEvent::new(KeyCode::Home, KeyModifiers::NONE));
        edit_line(&mut input, &mut cursor, KeyEvent::new(KeyCode::Delete, KeyModifiers::NONE));
        assert_eq!(input, "0:00");
        edit_line(&mut input, &mut cursor, KeyEvent::new(KeyCode::Char('9'), KeyModifiers::NONE));
        assert_eq!(input, "90:00");
        assert_eq!(cursor, 1);
    }

    #[tokio::test]
    async fn test_booking_flow_issues_one_schedule_call() {
        let transport = Arc::new(
            RecordingTransport::new().reply("/api/service/schedule", json!({ "confirmed": true })),
        );
        let mut data = DashboardData::default();
        data.service_centers = vec![
            ServiceCenter {
                id: 1,
                name: "Center A".to_string(),
                distance_km: 1.0,
                capacity: Capacity::Available,
            },
            ServiceCenter {
                id: 2,
                name: "Center B".to_string(),
                distance_km: 2.0,
                capacity: Capacity::Limited,
            },
        ];
        data.time_slots = vec!["09:00 AM".to_string(), "10:00 AM".to_string()];
        let mut app = app_with(&transport, data);

        press(&mut app, KeyCode::Char('3'));
        assert_eq!(app.active_panel(), Panel::Scheduling);

        // Confirm before anything is chosen does nothing
        press(&mut app, KeyCode::Char('c'));

        // Center A is highlighted first
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.booking.service_center.as_deref(), Some("Center A"));
        assert_eq!(app.booking_field, BookingField::Date);

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.input_mode, InputMode::Editing);
        type_text(&mut app, "2025-01-10");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.booking.date, "2025-01-10");
        assert_eq!(app.booking_field, BookingField::Time);

        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.booking.time.as_deref(), Some("10:00 AM"));
        assert_eq!(app.booking_field, BookingField::Confirm);

        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Enter);

        for _ in 0..200 {
            handle_event(&mut app, AppEvent::Tick).await.unwrap();
            if !app.has_pending_tasks() {
                break;
            }
            tokio::task::yield_now().await;
        }

        let calls = transport.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].path, "/api/service/schedule");
        assert_eq!(
            calls[0].body,
            Some(json!({
                "vehicleId": "HERO-2024-001",
                "date": "2025-01-10",
                "time": "10:00 AM",
                "serviceCenter": "Center A",
            }))
        );
        assert_eq!(
            app.flash.map(|f| f.text),
            Some(crate::app::BOOKING_SUCCESS.to_string())
        );
    }

    #[tokio::test]
    async fn test_chat_send_via_keys() {
        let transport = Arc::new(RecordingTransport::failing());
        let mut app = app_with(&transport, DashboardData::default());

        press(&mut app, KeyCode::Char('4'));
        press(&mut app, KeyCode::Enter);
        type_text(&mut app, "when is my service?");
        press(&mut app, KeyCode::Enter);
        assert!(app.is_chat_pending());

        for _ in 0..200 {
            handle_event(&mut app, AppEvent::Tick).await.unwrap();
            if !app.has_pending_tasks() {
                break;
            }
            tokio::task::yield_now().await;
        }

        assert_eq!(app.chat.len(), 3);
        assert_eq!(app.chat.messages()[1].content, "when is my service?");
        assert_eq!(app.chat.messages()[2].content, crate::app::CHAT_ERROR);
    }
}
