//! Data shown by the dashboard panels
//!
//! Everything a panel displays comes from a [`DashboardData`] handed to the view layer
//! when it is built. The default is the demo data set; a JSON file with the same shape
//! can replace it.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::api::{ManufacturingInsights, VehicleHealth};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricStatus {
    Good,
    Warning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    High,
    Medium,
    Low,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::High => "HIGH",
            Severity::Medium => "MEDIUM",
            Severity::Low => "LOW",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Capacity {
    Available,
    Limited,
}

impl Capacity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Capacity::Available => "Available",
            Capacity::Limited => "Limited",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentStatus {
    Success,
    Processing,
}

/// The vehicle the dashboard is focused on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleSnapshot {
    pub id: String,
    pub model: String,
    pub health: u8,
    pub mileage_km: u32,
    pub last_service: String,
    pub predicted_failure: String,
}

impl VehicleSnapshot {
    /// Merge a backend health payload; fields it leaves out keep their current value
    pub fn apply(&mut self, health: &VehicleHealth) {
        if let Some(id) = &health.id {
            self.id = id.clone();
        }
        if let Some(model) = &health.model {
            self.model = model.clone();
        }
        if let Some(score) = health.health {
            self.health = score.min(100);
        }
        if let Some(mileage) = health.mileage {
            self.mileage_km = mileage;
        }
        if let Some(last_service) = &health.last_service {
            self.last_service = last_service.clone();
        }
        if let Some(predicted) = &health.predicted_failure {
            self.predicted_failure = predicted.clone();
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthMetric {
    pub label: String,
    pub value: u8,
    pub status: MetricStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryReading {
    pub label: String,
    pub value: String,
    pub normal: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictiveAlert {
    pub id: u32,
    pub severity: Severity,
    pub component: String,
    pub prediction: String,
    pub confidence: u8,
    pub recommendation: String,
}

/// A label/value pair rendered as a stat card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stat {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceCenter {
    pub id: u32,
    pub name: String,
    pub distance_km: f32,
    pub capacity: Capacity,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceRecord {
    pub date: String,
    pub kind: String,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RcaFinding {
    pub component: String,
    pub failures: u32,
    pub root_cause: String,
    pub action: String,
}

/// A percentage bar on the analytics panel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerformanceMetric {
    pub metric: String,
    pub value: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentActivity {
    pub agent: String,
    pub action: String,
    pub time: String,
    pub status: AgentStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardData {
    pub vehicle: VehicleSnapshot,
    pub health_metrics: Vec<HealthMetric>,
    pub telemetry: Vec<TelemetryReading>,
    pub alerts: Vec<PredictiveAlert>,
    pub prediction_model: Vec<Stat>,
    pub service_centers: Vec<ServiceCenter>,
    pub time_slots: Vec<String>,
    pub service_history: Vec<ServiceRecord>,
    pub rca_findings: Vec<RcaFinding>,
    pub impact_metrics: Vec<Stat>,
    pub fleet_stats: Vec<Stat>,
    pub performance: Vec<PerformanceMetric>,
    pub agent_log: Vec<AgentActivity>,
    pub assistant_greeting: String,
}

impl DashboardData {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read dashboard data from {}", path.display()))?;
        let data = serde_json::from_str(&content)
            .with_context(|| format!("Invalid dashboard data in {}", path.display()))?;
        Ok(data)
    }

    /// Replace the RCA findings when the backend sent any
    pub fn apply_insights(&mut self, insights: &ManufacturingInsights) -> bool {
        let mut changed = false;
        if !insights.findings.is_empty() {
            self.rca_findings = insights.findings.clone();
            changed = true;
        }
        if !insights.impact.is_empty() {
            self.impact_metrics = insights.impact.clone();
            changed = true;
        }
        changed
    }
}

fn stat(label: &str, value: &str) -> Stat {
    Stat {
        label: label.to_string(),
        value: value.to_string(),
    }
}

impl Default for DashboardData {
    fn default() -> Self {
        let metric = |label: &str, value, status| HealthMetric {
            label: label.to_string(),
            value,
            status,
        };
        let reading = |label: &str, value: &str, normal| TelemetryReading {
            label: label.to_string(),
            value: value.to_string(),
            normal,
        };
        let center = |id, name: &str, distance_km, capacity| ServiceCenter {
            id,
            name: name.to_string(),
            distance_km,
            capacity,
        };
        let record = |date: &str, kind: &str| ServiceRecord {
            date: date.to_string(),
            kind: kind.to_string(),
            status: "Completed".to_string(),
        };
        let finding = |component: &str, failures, root_cause: &str, action: &str| RcaFinding {
            component: component.to_string(),
            failures,
            root_cause: root_cause.to_string(),
            action: action.to_string(),
        };
        let performance = |metric: &str, value| PerformanceMetric {
            metric: metric.to_string(),
            value,
        };
        let activity = |agent: &str, action: &str, time: &str, status| AgentActivity {
            agent: agent.to_string(),
            action: action.to_string(),
            time: time.to_string(),
            status,
        };

        Self {
            vehicle: VehicleSnapshot {
                id: "HERO-2024-001".to_string(),
                model: "Hero Splendor Plus".to_string(),
                health: 78,
                mileage_km: 12_450,
                last_service: "45 days ago".to_string(),
                predicted_failure: "Medium Risk".to_string(),
            },
            health_metrics: vec![
                metric("Engine Health", 85, MetricStatus::Good),
                metric("Brake System", 65, MetricStatus::Warning),
                metric("Transmission", 90, MetricStatus::Good),
                metric("Electrical", 72, MetricStatus::Warning),
            ],
            telemetry: vec![
                reading("Engine Temp", "89°C", true),
                reading("Oil Pressure", "42 PSI", true),
                reading("Battery", "12.4V", false),
                reading("Fuel Level", "65%", true),
            ],
            alerts: vec![
                PredictiveAlert {
                    id: 1,
                    severity: Severity::High,
                    component: "Brake Pads".to_string(),
                    prediction: "Replacement needed in ~250 km".to_string(),
                    confidence: 94,
                    recommendation: "Schedule service within 7 days".to_string(),
                },
                PredictiveAlert {
                    id: 2,
                    severity: Severity::Medium,
                    component: "Battery".to_string(),
                    prediction: "Degradation detected, 30 days remaining".to_string(),
                    confidence: 87,
                    recommendation: "Monitor and replace soon".to_string(),
                },
                PredictiveAlert {
                    id: 3,
                    severity: Severity::Low,
                    component: "Air Filter".to_string(),
                    prediction: "Cleaning recommended".to_string(),
                    confidence: 76,
                    recommendation: "Next scheduled service".to_string(),
                },
            ],
            prediction_model: vec![
                stat("Model Type", "LSTM + Random Forest"),
                stat("Accuracy", "94.3%"),
                stat("Data Points Analyzed", "2.4M+"),
                stat("Last Updated", "2 hours ago"),
            ],
            service_centers: vec![
                center(1, "Hero Service Center - MG Road", 2.3, Capacity::Available),
                center(2, "Hero Service Center - Koramangala", 4.1, Capacity::Limited),
                center(3, "Hero Service Center - Indiranagar", 5.8, Capacity::Available),
            ],
            time_slots: ["09:00 AM", "10:30 AM", "12:00 PM", "02:00 PM", "04:00 PM"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            service_history: vec![
                record("2024-11-15", "Scheduled Maintenance"),
                record("2024-09-20", "Brake Service"),
                record("2024-07-10", "Oil Change"),
            ],
            rca_findings: vec![
                finding(
                    "Brake Pads",
                    156,
                    "Material degradation in high-temp environments",
                    "Update compound formula",
                ),
                finding(
                    "Battery",
                    89,
                    "Inadequate thermal management",
                    "Redesign cooling system",
                ),
                finding(
                    "Clutch Cable",
                    67,
                    "Premature wear due to friction",
                    "Improve cable coating",
                ),
            ],
            impact_metrics: vec![
                stat("Breakdown Reduction", "42%"),
                stat("Service Utilization", "68%"),
                stat("Customer Satisfaction", "4.7/5"),
            ],
            fleet_stats: vec![
                stat("Active Vehicles", "2,456"),
                stat("Alerts Generated", "342"),
                stat("Services Scheduled", "189"),
                stat("Avg Response Time", "3.2 min"),
            ],
            performance: vec![
                performance("Prediction Accuracy", 94),
                performance("Customer Engagement Rate", 76),
                performance("Service Completion Rate", 88),
                performance("Manufacturing Feedback Integration", 92),
            ],
            agent_log: vec![
                activity("Data Analysis Agent", "Analyzed telemetry for VEH-001", "2 min ago", AgentStatus::Success),
                activity("Diagnosis Agent", "Identified brake wear issue", "5 min ago", AgentStatus::Success),
                activity("Engagement Agent", "Initiated voice call to customer", "8 min ago", AgentStatus::Processing),
                activity("Scheduling Agent", "Booked service slot at MG Road", "12 min ago", AgentStatus::Success),
                activity("Feedback Agent", "Collected post-service feedback", "1 hour ago", AgentStatus::Success),
            ],
            assistant_greeting: "Hello! I noticed your vehicle needs brake pad replacement soon. \
                Would you like me to help schedule a service?"
                .to_string(),
        }
    }
}
