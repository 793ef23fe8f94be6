//! Panel selection for the dashboard
//!
//! The dashboard shows exactly one panel at a time. The selector is a closed enum so
//! an unknown identifier can only ever resolve to the default panel.

/// One selectable screen of the dashboard, in sidebar order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Panel {
    #[default]
    Dashboard,
    Alerts,
    Scheduling,
    Voice,
    Manufacturing,
    Analytics,
}

/// Title and subtitle shown above the active panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub title: &'static str,
    pub subtitle: &'static str,
}

/// What the view layer draws for a given selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoutedView {
    pub panel: Panel,
    pub header: Header,
}

impl Panel {
    pub const ALL: [Panel; 6] = [
        Panel::Dashboard,
        Panel::Alerts,
        Panel::Scheduling,
        Panel::Voice,
        Panel::Manufacturing,
        Panel::Analytics,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Panel::Dashboard => "dashboard",
            Panel::Alerts => "alerts",
            Panel::Scheduling => "scheduling",
            Panel::Voice => "voice",
            Panel::Manufacturing => "manufacturing",
            Panel::Analytics => "analytics",
        }
    }

    /// Resolve a panel identifier, falling back to the dashboard for anything unknown
    pub fn from_id(id: &str) -> Self {
        match id.trim().to_lowercase().as_str() {
            "dashboard" => Panel::Dashboard,
            "alerts" => Panel::Alerts,
            "scheduling" => Panel::Scheduling,
            "voice" => Panel::Voice,
            "manufacturing" => Panel::Manufacturing,
            "analytics" => Panel::Analytics,
            _ => Panel::default(),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Panel::Dashboard => "Vehicle Health",
            Panel::Alerts => "Predictive Alerts",
            Panel::Scheduling => "Service Scheduling",
            Panel::Voice => "Voice Assistant",
            Panel::Manufacturing => "Manufacturing Insights",
            Panel::Analytics => "Analytics & Reports",
        }
    }

    pub fn header(&self) -> Header {
        let (title, subtitle) = match self {
            Panel::Dashboard => (
                "Vehicle Health Dashboard",
                "Real-time vehicle telemetry and health monitoring",
            ),
            Panel::Alerts => (
                "Predictive Maintenance Alerts",
                "AI-powered failure predictions with confidence scores",
            ),
            Panel::Scheduling => (
                "Proactive Service Scheduling",
                "Smart scheduling based on capacity and proximity",
            ),
            Panel::Voice => (
                "AI Voice Assistant",
                "Natural language service booking assistant",
            ),
            Panel::Manufacturing => (
                "Manufacturing Insights & RCA",
                "CAPA feedback loop for quality improvement",
            ),
            Panel::Analytics => (
                "Analytics & Reports",
                "System performance and business metrics",
            ),
        };
        Header { title, subtitle }
    }

    /// Position in sidebar order
    pub fn index(&self) -> usize {
        Self::ALL.iter().position(|p| p == self).unwrap_or(0)
    }

    pub fn from_index(idx: usize) -> Option<Self> {
        Self::ALL.get(idx).copied()
    }
}

impl From<Panel> for RoutedView {
    fn from(panel: Panel) -> Self {
        Self {
            panel,
            header: panel.header(),
        }
    }
}

/// Holds the active panel selector. Nothing else is stored, so rendering is a pure
/// function of the selector.
#[derive(Debug, Clone, Default)]
pub struct ViewRouter {
    active: Panel,
}

impl ViewRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Panel {
        self.active
    }

    /// Replace the active selector from a string identifier
    pub fn set_view(&mut self, id: &str) {
        self.select(Panel::from_id(id));
    }

    pub fn select(&mut self, panel: Panel) {
        self.active = panel;
    }

    pub fn next(&mut self) {
        let len = Panel::ALL.len();
        self.active = Panel::ALL[(self.active.index() + 1) % len];
    }

    pub fn previous(&mut self) {
        let len = Panel::ALL.len();
        self.active = Panel::ALL[(self.active.index() + len - 1) % len];
    }

    /// Panel and header pair for the active selector
    pub fn render(&self) -> RoutedView {
        RoutedView::from(self.active)
    }

    /// Panel and header pair for an arbitrary identifier
    pub fn resolve(id: &str) -> RoutedView {
        RoutedView::from(Panel::from_id(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_ids_round_trip() {
        for panel in Panel::ALL {
            assert_eq!(Panel::from_id(panel.id()), panel);
        }
    }

    #[test]
    fn test_unknown_id_falls_back_to_dashboard() {
        for id in ["", "settings", "DASH", "voice-assistant", "42"] {
            let view = ViewRouter::resolve(id);
            assert_eq!(view.panel, Panel::Dashboard);
            assert_eq!(view.header.title, "Vehicle Health Dashboard");
            assert_eq!(
                view.header.subtitle,
                "Real-time vehicle telemetry and health monitoring"
            );
        }
    }

    #[test]
    fn test_from_id_ignores_case_and_whitespace() {
        assert_eq!(Panel::from_id("  Alerts "), Panel::Alerts);
        assert_eq!(Panel::from_id("MANUFACTURING"), Panel::Manufacturing);
    }

    #[test]
    fn test_set_view_updates_header_consistently() {
        let mut router = ViewRouter::new();
        assert_eq!(router.active(), Panel::Dashboard);

        router.set_view("manufacturing");
        let view = router.render();
        assert_eq!(view.panel, Panel::Manufacturing);
        assert_eq!(view.header, Panel::Manufacturing.header());
        assert_eq!(view.header.title, "Manufacturing Insights & RCA");

        router.set_view("nope");
        assert_eq!(router.render().panel, Panel::Dashboard);
    }

    #[test]
    fn test_next_and_previous_wrap() {
        let mut router = ViewRouter::new();
        router.previous();
        assert_eq!(router.active(), Panel::Analytics);
        router.next();
        assert_eq!(router.active(), Panel::Dashboard);
        router.next();
        assert_eq!(router.active(), Panel::Alerts);
    }

    #[test]
    fn test_headers_are_distinct() {
        let titles: std::collections::HashSet<&str> =
            Panel::ALL.iter().map(|p| p.header().title).collect();
        assert_eq!(titles.len(), Panel::ALL.len());
        assert_eq!(Panel::from_index(2), Some(Panel::Scheduling));
        assert_eq!(Panel::from_index(6), None);
    }
}
