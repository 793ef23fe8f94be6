use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Gauge, List, ListItem, Paragraph, Wrap},
};
use autoserve_core::dashboard::{AgentStatus, Capacity, MetricStatus, Severity, Stat};
use autoserve_core::{ChatRole, Panel};
use crate::app::{App, BookingField, FlashKind, InputMode};

const BRAND: &str = "AutoServe AI";
const TAGLINE: &str = "Predictive Maintenance";
const EVENT: &str = "EY Techathon 6.0";
const PARTNERS: &str = "Hero MotoCorp + M&M";

/// Format an integer with thousands separators (12450 -> "12,450")
fn format_thousands(value: u32) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::High => Color::Red,
        Severity::Medium => Color::Yellow,
        Severity::Low => Color::Blue,
    }
}

fn status_color(status: MetricStatus) -> Color {
    match status {
        MetricStatus::Good => Color::Green,
        MetricStatus::Warning => Color::Yellow,
    }
}

fn bordered(title: impl Into<Line<'static>>) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(title)
}

/// A horizontal row of stat cards
fn render_stat_row(frame: &mut Frame, area: Rect, stats: &[Stat], value_color: Color) {
    if stats.is_empty() {
        return;
    }
    let constraints = vec![Constraint::Ratio(1, stats.len() as u32); stats.len()];
    let cells = Layout::horizontal(constraints).split(area);

    for (stat, cell) in stats.iter().zip(cells.iter()) {
        let text = Text::from(vec![
            Line::from(Span::styled(stat.label.clone(), Style::default().fg(Color::Gray))),
            Line::from(Span::styled(
                stat.value.clone(),
                Style::default().fg(value_color).add_modifier(Modifier::BOLD),
            )),
        ]);
        frame.render_widget(Paragraph::new(text).block(bordered("")), *cell);
    }
}

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    let [sidebar_area, main_area] = Layout::horizontal([
        Constraint::Length(28),
        Constraint::Min(0),
    ])
    .areas(area);

    render_sidebar(app, frame, sidebar_area);

    let [header_area, body_area, status_area, footer_area] = Layout::vertical([
        Constraint::Length(4),
        Constraint::Min(0),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(main_area);

    render_header(app, frame, header_area);

    match app.active_panel() {
        Panel::Dashboard => render_dashboard(app, frame, body_area),
        Panel::Alerts => render_alerts(app, frame, body_area),
        Panel::Scheduling => render_scheduling(app, frame, body_area),
        Panel::Voice => render_voice(app, frame, body_area),
        Panel::Manufacturing => render_manufacturing(app, frame, body_area),
        Panel::Analytics => render_analytics(app, frame, body_area),
    }

    render_status(app, frame, status_area);
    render_footer(app, frame, footer_area);
}

fn render_sidebar(app: &App, frame: &mut Frame, area: Rect) {
    let [brand_area, tabs_area, security_area] = Layout::vertical([
        Constraint::Length(4),
        Constraint::Min(0),
        Constraint::Length(4),
    ])
    .areas(area);

    let brand = Paragraph::new(Text::from(vec![
        Line::from(Span::styled(BRAND, Style::default().fg(Color::Cyan).bold())),
        Line::from(Span::styled(TAGLINE, Style::default().fg(Color::DarkGray))),
    ]))
    .block(Block::default().borders(Borders::BOTTOM | Borders::RIGHT).border_style(Style::default().fg(Color::DarkGray)));
    frame.render_widget(brand, brand_area);

    let active = app.active_panel();
    let tabs: Vec<ListItem> = Panel::ALL
        .iter()
        .enumerate()
        .map(|(i, panel)| {
            let style = if *panel == active {
                Style::default().bg(Color::Blue).fg(Color::White).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            ListItem::new(format!(" {} {}", i + 1, panel.label())).style(style)
        })
        .collect();
    let tabs = List::new(tabs).block(
        Block::default()
            .borders(Borders::RIGHT)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    frame.render_widget(tabs, tabs_area);

    let security = Paragraph::new(Text::from(vec![
        Line::from(vec![
            Span::styled("UEBA Security: ", Style::default().fg(Color::Gray)),
            Span::styled("Active", Style::default().fg(Color::Green).bold()),
        ]),
        Line::from(Span::styled(
            "All agent activities monitored",
            Style::default().fg(Color::DarkGray),
        )),
    ]))
    .wrap(Wrap { trim: true })
    .block(Block::default().borders(Borders::TOP | Borders::RIGHT).border_style(Style::default().fg(Color::DarkGray)));
    frame.render_widget(security, security_area);
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let view = app.router.render();

    let [title_area, event_area] = Layout::horizontal([
        Constraint::Min(0),
        Constraint::Length(24),
    ])
    .areas(area);

    let title = Paragraph::new(Text::from(vec![
        Line::from(Span::styled(view.header.title, Style::default().fg(Color::White).bold())),
        Line::from(Span::styled(view.header.subtitle, Style::default().fg(Color::Gray))),
    ]))
    .block(Block::default().borders(Borders::BOTTOM).border_style(Style::default().fg(Color::DarkGray)));
    frame.render_widget(title, title_area);

    let event = Paragraph::new(Text::from(vec![
        Line::from(Span::styled(EVENT, Style::default().fg(Color::Gray))),
        Line::from(Span::styled(PARTNERS, Style::default().fg(Color::DarkGray))),
    ]))
    .right_aligned()
    .block(Block::default().borders(Borders::BOTTOM).border_style(Style::default().fg(Color::DarkGray)));
    frame.render_widget(event, event_area);
}

fn render_status(app: &App, frame: &mut Frame, area: Rect) {
    let Some(flash) = &app.flash else {
        return;
    };
    let color = match flash.kind {
        FlashKind::Info => Color::Cyan,
        FlashKind::Success => Color::Green,
        FlashKind::Error => Color::Red,
    };
    let status = Paragraph::new(Line::from(Span::styled(
        format!(" {} ", flash.text),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )));
    frame.render_widget(status, area);
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    let mode_style = match app.input_mode {
        InputMode::Normal => Style::default().bg(Color::Blue).fg(Color::White),
        InputMode::Editing => Style::default().bg(Color::Yellow).fg(Color::Black),
    };
    let mode_text = match app.input_mode {
        InputMode::Normal => " NORMAL ",
        InputMode::Editing => " EDIT ",
    };

    // Key style: dark background with bright text for visibility on both light/dark terminals
    let key_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let label_style = Style::default().bg(Color::Black).fg(Color::White);
    let hint = |key: &'static str, label: &'static str| {
        [Span::styled(key, key_style), Span::styled(label, label_style)]
    };

    let mut hints: Vec<Span> = Vec::new();
    match (app.active_panel(), app.input_mode) {
        (_, InputMode::Editing) => {
            hints.extend(hint(" Enter ", " submit "));
            hints.extend(hint(" Esc ", " cancel "));
        }
        (Panel::Dashboard, _) => hints.extend(hint(" r ", " refresh ")),
        (Panel::Alerts, _) => {
            hints.extend(hint(" j/k ", " select "));
            hints.extend(hint(" Enter ", " schedule service "));
        }
        (Panel::Scheduling, _) => {
            hints.extend(hint(" h/l ", " field "));
            hints.extend(hint(" j/k ", " choose "));
            hints.extend(hint(" Enter ", " select "));
            hints.extend(hint(" c ", " confirm "));
        }
        (Panel::Voice, _) => {
            hints.extend(hint(" i ", " type "));
            hints.extend(hint(" v ", " speak "));
            hints.extend(hint(" j/k ", " scroll "));
        }
        (Panel::Manufacturing, _) => hints.extend(hint(" r ", " refresh ")),
        (Panel::Analytics, _) => {}
    }
    if app.input_mode == InputMode::Normal {
        hints.extend(hint(" Tab ", " panel "));
        hints.extend(hint(" 1-6 ", " jump "));
        hints.extend(hint(" q ", " quit "));
    }

    let mut spans = vec![Span::styled(mode_text, mode_style), Span::raw(" ")];
    spans.extend(hints);

    let footer = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
    frame.render_widget(footer, area);
}

fn render_dashboard(app: &App, frame: &mut Frame, area: Rect) {
    let [vehicle_area, metrics_area, telemetry_area] = Layout::vertical([
        Constraint::Length(8),
        Constraint::Min(6),
        Constraint::Length(5),
    ])
    .areas(area);

    let vehicle = &app.data.vehicle;
    let title = if app.is_health_refreshing() {
        " Vehicle (refreshing...) "
    } else {
        " Vehicle "
    };

    let [info_area, gauge_area] = Layout::horizontal([
        Constraint::Min(0),
        Constraint::Length(30),
    ])
    .areas(vehicle_area);

    let info = Paragraph::new(Text::from(vec![
        Line::from(Span::styled(vehicle.model.clone(), Style::default().fg(Color::White).bold())),
        Line::from(format!("VIN: {}", vehicle.id)),
        Line::from(format!("Odometer: {} km", format_thousands(vehicle.mileage_km))),
        Line::from(format!("Last Service: {}", vehicle.last_service)),
        Line::from(vec![
            Span::raw("Predicted Failure: "),
            Span::styled(vehicle.predicted_failure.clone(), Style::default().fg(Color::Yellow)),
        ]),
    ]))
    .block(bordered(title).border_style(Style::default().fg(Color::Blue)));
    frame.render_widget(info, info_area);

    let overall = Gauge::default()
        .block(bordered(" Overall Health "))
        .gauge_style(Style::default().fg(Color::Cyan))
        .percent(u16::from(vehicle.health.min(100)));
    frame.render_widget(overall, gauge_area);

    let metrics = &app.data.health_metrics;
    if !metrics.is_empty() {
        let rows = metrics.len().div_ceil(2);
        let row_areas = Layout::vertical(vec![Constraint::Ratio(1, rows as u32); rows]).split(metrics_area);
        for (row, chunk) in metrics.chunks(2).enumerate() {
            let cells = Layout::horizontal([Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)]).split(row_areas[row]);
            for (metric, cell) in chunk.iter().zip(cells.iter()) {
                let gauge = Gauge::default()
                    .block(bordered(format!(" {} ", metric.label)))
                    .gauge_style(Style::default().fg(status_color(metric.status)))
                    .percent(u16::from(metric.value.min(100)));
                frame.render_widget(gauge, *cell);
            }
        }
    }

    let telemetry = &app.data.telemetry;
    if !telemetry.is_empty() {
        let block = bordered(" Real-Time Telemetry Data ");
        let inner = block.inner(telemetry_area);
        frame.render_widget(block, telemetry_area);

        let cells = Layout::horizontal(vec![Constraint::Ratio(1, telemetry.len() as u32); telemetry.len()]).split(inner);
        for (reading, cell) in telemetry.iter().zip(cells.iter()) {
            let color = if reading.normal { Color::Green } else { Color::Yellow };
            let text = Text::from(vec![
                Line::from(Span::styled(reading.label.clone(), Style::default().fg(Color::Gray))),
                Line::from(Span::styled(reading.value.clone(), Style::default().fg(color).bold())),
            ]);
            frame.render_widget(Paragraph::new(text), *cell);
        }
    }
}

fn render_alerts(app: &mut App, frame: &mut Frame, area: Rect) {
    let [alerts_area, model_area] = Layout::vertical([
        Constraint::Min(0),
        Constraint::Length(4),
    ])
    .areas(area);

    let items: Vec<ListItem> = app
        .data
        .alerts
        .iter()
        .map(|alert| {
            let color = severity_color(alert.severity);
            ListItem::new(Text::from(vec![
                Line::from(vec![
                    Span::styled(format!("[{}] ", alert.severity.as_str()), Style::default().fg(color).bold()),
                    Span::styled(alert.component.clone(), Style::default().fg(Color::White).bold()),
                    Span::styled(format!("  confidence {}%", alert.confidence), Style::default().fg(Color::Gray)),
                ]),
                Line::from(format!("  {}", alert.prediction)),
                Line::from(vec![
                    Span::styled("  Recommendation: ", Style::default().fg(Color::Gray)),
                    Span::raw(alert.recommendation.clone()),
                ]),
                Line::default(),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(bordered(" Predictive Maintenance Alerts (Enter: Schedule Service) "))
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");
    frame.render_stateful_widget(list, alerts_area, &mut app.alert_state);

    render_stat_row(frame, model_area, &app.data.prediction_model, Color::White);
}

fn render_scheduling(app: &mut App, frame: &mut Frame, area: Rect) {
    let [form_area, history_area] = Layout::horizontal([
        Constraint::Percentage(65),
        Constraint::Percentage(35),
    ])
    .areas(area);

    let [centers_area, date_area, slots_area, confirm_area] = Layout::vertical([
        Constraint::Min(5),
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Length(3),
    ])
    .areas(form_area);

    let active_field = app.booking_field;
    let focus_style = |field: BookingField| {
        if active_field == field {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        }
    };

    // Service centers
    let chosen_center = app.booking.service_center.clone();
    let centers: Vec<ListItem> = app
        .data
        .service_centers
        .iter()
        .map(|center| {
            let marker = if chosen_center.as_deref() == Some(center.name.as_str()) { "[x] " } else { "[ ] " };
            let capacity_color = match center.capacity {
                Capacity::Available => Color::Green,
                Capacity::Limited => Color::Yellow,
            };
            ListItem::new(Line::from(vec![
                Span::raw(marker),
                Span::styled(center.name.clone(), Style::default().fg(Color::White)),
                Span::styled(format!("  {:.1} km away  ", center.distance_km), Style::default().fg(Color::Gray)),
                Span::styled(center.capacity.as_str(), Style::default().fg(capacity_color)),
            ]))
        })
        .collect();
    let centers = List::new(centers)
        .block(bordered(" Select Service Center ").border_style(focus_style(BookingField::Center)))
        .highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol("> ");
    frame.render_stateful_widget(centers, centers_area, &mut app.center_state);

    // Date
    let editing_date = app.input_mode == InputMode::Editing;
    let date_text = if editing_date {
        Line::from(vec![
            Span::raw(app.date_input.clone()),
            Span::styled("_", Style::default().fg(Color::Yellow)),
        ])
    } else if app.booking.date.is_empty() {
        Line::from(Span::styled("YYYY-MM-DD (Enter to edit)", Style::default().fg(Color::DarkGray)))
    } else {
        Line::from(app.booking.date.clone())
    };
    let date_border = if editing_date {
        Style::default().fg(Color::Yellow)
    } else {
        focus_style(BookingField::Date)
    };
    frame.render_widget(
        Paragraph::new(date_text).block(bordered(" Select Date ").border_style(date_border)),
        date_area,
    );

    // Time slots
    let mut slot_spans = Vec::new();
    for (i, slot) in app.data.time_slots.iter().enumerate() {
        let chosen = app.booking.time.as_deref() == Some(slot.as_str());
        let mut style = if chosen {
            Style::default().bg(Color::Blue).fg(Color::White)
        } else {
            Style::default().fg(Color::Gray)
        };
        if active_field == BookingField::Time && i == app.slot_cursor {
            style = style.add_modifier(Modifier::REVERSED);
        }
        slot_spans.push(Span::styled(format!(" {} ", slot), style));
        slot_spans.push(Span::raw(" "));
    }
    frame.render_widget(
        Paragraph::new(Line::from(slot_spans))
            .block(bordered(" Available Time Slots ").border_style(focus_style(BookingField::Time))),
        slots_area,
    );

    // Confirm
    let (label, style) = if app.is_booking_pending() {
        ("Booking...", Style::default().fg(Color::Yellow))
    } else if app.can_confirm_booking() {
        ("Confirm Booking", Style::default().fg(Color::White).bg(Color::Blue).bold())
    } else {
        ("Confirm Booking (select center, date and time)", Style::default().fg(Color::DarkGray))
    };
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(label, style)))
            .centered()
            .block(bordered("").border_style(focus_style(BookingField::Confirm))),
        confirm_area,
    );

    // History
    let history: Vec<ListItem> = app
        .data
        .service_history
        .iter()
        .map(|record| {
            ListItem::new(Text::from(vec![
                Line::from(Span::styled(record.kind.clone(), Style::default().fg(Color::White))),
                Line::from(vec![
                    Span::styled(record.date.clone(), Style::default().fg(Color::Gray)),
                    Span::raw("  "),
                    Span::styled(record.status.clone(), Style::default().fg(Color::Green)),
                ]),
            ]))
        })
        .collect();
    frame.render_widget(
        List::new(history).block(bordered(" Recent Service History ")),
        history_area,
    );
}

fn render_voice(app: &App, frame: &mut Frame, area: Rect) {
    let [chat_area, mic_area, input_area] = Layout::vertical([
        Constraint::Min(3),
        Constraint::Length(1),
        Constraint::Length(3),
    ])
    .areas(area);

    let mut lines: Vec<Line> = Vec::new();
    for msg in app.chat.messages() {
        let (label, color) = match msg.role {
            ChatRole::User => ("You:", Color::Cyan),
            ChatRole::Assistant => ("Assistant:", Color::Yellow),
        };
        lines.push(Line::from(Span::styled(label, Style::default().fg(color).add_modifier(Modifier::BOLD))));
        for line in msg.content.lines() {
            lines.push(Line::from(line.to_string()));
        }
        lines.push(Line::default());
    }
    if app.is_chat_pending() {
        // Animated ellipsis: cycles through ".", "..", "..."
        let dots = ".".repeat(app.animation_frame as usize + 1);
        lines.push(Line::from(Span::styled(
            format!("Processing{}", dots),
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )));
    }

    // Keep the newest message in view unless the user scrolled back
    let inner_width = chat_area.width.saturating_sub(2).max(1) as usize;
    let inner_height = chat_area.height.saturating_sub(2);
    let total_lines: usize = lines
        .iter()
        .map(|line| line.width().max(1).div_ceil(inner_width))
        .sum();
    let bottom = (total_lines as u16).saturating_sub(inner_height);
    let scroll = bottom.saturating_sub(app.chat_scroll_back);

    let chat = Paragraph::new(Text::from(lines))
        .block(bordered(" Assistant ").border_style(Style::default().fg(Color::Magenta)))
        .wrap(Wrap { trim: true })
        .scroll((scroll, 0));
    frame.render_widget(chat, chat_area);

    let mic = if app.listening {
        Span::styled(" ● Listening... ", Style::default().fg(Color::White).bg(Color::Red).bold())
    } else {
        Span::styled(" ○ Click to speak (v) ", Style::default().fg(Color::Gray))
    };
    frame.render_widget(Paragraph::new(Line::from(mic)), mic_area);

    let editing = app.input_mode == InputMode::Editing;
    let border = if editing { Color::Yellow } else { Color::DarkGray };
    let input_line = if app.chat_input.is_empty() && !editing {
        Line::from(Span::styled("Type or speak your query...", Style::default().fg(Color::DarkGray)))
    } else {
        Line::from(app.chat_input.clone())
    };
    frame.render_widget(
        Paragraph::new(input_line).block(bordered(" Message ").border_style(Style::default().fg(border))),
        input_area,
    );

    if editing {
        let max_x = input_area.width.saturating_sub(2);
        let cursor_x = (app.chat_cursor as u16).min(max_x);
        frame.set_cursor_position((input_area.x + 1 + cursor_x, input_area.y + 1));
    }
}

fn render_manufacturing(app: &App, frame: &mut Frame, area: Rect) {
    let [findings_area, impact_area] = Layout::vertical([
        Constraint::Min(0),
        Constraint::Length(4),
    ])
    .areas(area);

    let title = if app.is_insights_refreshing() {
        " Manufacturing Feedback Loop (refreshing...) "
    } else {
        " Manufacturing Feedback Loop - RCA & CAPA "
    };

    let items: Vec<ListItem> = app
        .data
        .rca_findings
        .iter()
        .map(|finding| {
            ListItem::new(Text::from(vec![
                Line::from(vec![
                    Span::styled(finding.component.clone(), Style::default().fg(Color::White).bold()),
                    Span::raw("  "),
                    Span::styled(format!("{} failures", finding.failures), Style::default().fg(Color::Red)),
                    Span::styled(" reported", Style::default().fg(Color::Gray)),
                ]),
                Line::from(vec![
                    Span::styled("  Root Cause Analysis: ", Style::default().fg(Color::DarkGray)),
                    Span::raw(finding.root_cause.clone()),
                ]),
                Line::from(vec![
                    Span::styled("  Corrective Action: ", Style::default().fg(Color::DarkGray)),
                    Span::styled(finding.action.clone(), Style::default().fg(Color::Cyan)),
                ]),
                Line::default(),
            ]))
        })
        .collect();
    frame.render_widget(List::new(items).block(bordered(title)), findings_area);

    render_stat_row(frame, impact_area, &app.data.impact_metrics, Color::Green);
}

fn render_analytics(app: &App, frame: &mut Frame, area: Rect) {
    let performance_rows = app.data.performance.len() as u16;
    let [stats_area, performance_area, log_area] = Layout::vertical([
        Constraint::Length(4),
        Constraint::Length(performance_rows + 2),
        Constraint::Min(0),
    ])
    .areas(area);

    render_stat_row(frame, stats_area, &app.data.fleet_stats, Color::White);

    let block = bordered(" System Performance Metrics ");
    let inner = block.inner(performance_area);
    frame.render_widget(block, performance_area);
    let rows = Layout::vertical(vec![Constraint::Length(1); app.data.performance.len()]).split(inner);
    for (metric, row) in app.data.performance.iter().zip(rows.iter()) {
        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(Color::Blue))
            .label(format!("{} {}%", metric.metric, metric.value))
            .percent(u16::from(metric.value.min(100)));
        frame.render_widget(gauge, *row);
    }

    let items: Vec<ListItem> = app
        .data
        .agent_log
        .iter()
        .map(|entry| {
            let dot = match entry.status {
                AgentStatus::Success => Span::styled("● ", Style::default().fg(Color::Green)),
                AgentStatus::Processing => Span::styled("● ", Style::default().fg(Color::Yellow)),
            };
            ListItem::new(Line::from(vec![
                dot,
                Span::styled(entry.agent.clone(), Style::default().fg(Color::White).bold()),
                Span::styled(format!("  {}", entry.action), Style::default().fg(Color::Gray)),
                Span::styled(format!("  {}", entry.time), Style::default().fg(Color::DarkGray)),
            ]))
        })
        .collect();
    frame.render_widget(List::new(items).block(bordered(" Agent Activity Log ")), log_area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use autoserve_core::api::testing::RecordingTransport;
    use autoserve_core::{ApiClient, Config, DashboardData};
    use ratatui::{backend::TestBackend, Terminal};
    use std::sync::Arc;

    fn app() -> App {
        App::new(
            &Config::new(),
            DashboardData::default(),
            ApiClient::new(Arc::new(RecordingTransport::new())),
        )
    }

    fn draw(app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(140, 45)).unwrap();
        terminal.draw(|frame| render(app, frame)).unwrap();

        let buffer = terminal.backend().buffer();
        let width = buffer.area.width as usize;
        buffer
            .content()
            .chunks(width)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_format_thousands() {
        assert_eq!(format_thousands(0), "0");
        assert_eq!(format_thousands(999), "999");
        assert_eq!(format_thousands(12_450), "12,450");
        assert_eq!(format_thousands(2_456_000), "2,456,000");
    }

    #[test]
    fn test_every_panel_renders_its_header() {
        let mut app = app();
        for panel in Panel::ALL {
            app.select_panel(panel);
            let screen = draw(&mut app);
            assert!(screen.contains(panel.header().title), "missing title for {:?}", panel);
            assert!(screen.contains(panel.header().subtitle), "missing subtitle for {:?}", panel);
        }
    }

    #[test]
    fn test_unknown_view_renders_dashboard() {
        let mut app = app();
        app.router.set_view("settings");
        let screen = draw(&mut app);
        assert!(screen.contains("Vehicle Health Dashboard"));
        assert!(screen.contains("Odometer: 12,450 km"));
    }

    #[test]
    fn test_confirm_button_reflects_form_state() {
        let mut app = app();
        app.select_panel(Panel::Scheduling);
        assert!(draw(&mut app).contains("select center, date and time"));

        app.booking.service_center = Some("Hero Service Center - MG Road".to_string());
        app.booking.date = "2025-01-10".to_string();
        app.booking.time = Some("10:30 AM".to_string());
        let screen = draw(&mut app);
        assert!(!screen.contains("select center, date and time"));
        assert!(screen.contains("[x] Hero Service Center - MG Road"));
    }

    #[test]
    fn test_voice_panel_shows_greeting_and_listening() {
        let mut app = app();
        app.select_panel(Panel::Voice);
        let screen = draw(&mut app);
        assert!(screen.contains("Hello!"));
        assert!(screen.contains("Click to speak"));

        app.toggle_listening();
        assert!(draw(&mut app).contains("Listening..."));
    }
}
