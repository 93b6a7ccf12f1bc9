// ── Fetch plans ──
//
// Which API calls a view needs. Every fetch writes exactly one panel slot;
// plans are fixed per view and only parameterised by filter and selection
// state.

use bridgeview_api::DocType;

use crate::filter::LogFilter;
use crate::state::DashboardState;
use crate::view::ViewId;

/// A panel slot in the client state. Each is written by one reducer only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub enum PanelId {
    Health,
    Sensors,
    MqttStats,
    LogStats,
    Logs,
    MqttHistory,
    Config,
    Docs,
    DetailSensor,
    DetailHistory,
}

/// One API call, with everything needed to perform it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fetch {
    Health,
    SensorStatus,
    MqttStats,
    LogStats,
    /// Resolved into query parameters when the request is sent.
    Logs(LogFilter),
    MqttHistory { sensor: String },
    ConfigSnapshot,
    Documentation(DocType),
    SensorDetail { sensor: String },
    DetailHistory { sensor: String },
}

impl Fetch {
    pub fn panel(&self) -> PanelId {
        match self {
            Self::Health => PanelId::Health,
            Self::SensorStatus => PanelId::Sensors,
            Self::MqttStats => PanelId::MqttStats,
            Self::LogStats => PanelId::LogStats,
            Self::Logs(_) => PanelId::Logs,
            Self::MqttHistory { .. } => PanelId::MqttHistory,
            Self::ConfigSnapshot => PanelId::Config,
            Self::Documentation(_) => PanelId::Docs,
            Self::SensorDetail { .. } => PanelId::DetailSensor,
            Self::DetailHistory { .. } => PanelId::DetailHistory,
        }
    }
}

/// The fetches that (re)load `view` given the current state.
pub fn plan_for(view: ViewId, state: &DashboardState) -> Vec<Fetch> {
    match view {
        ViewId::Dashboard => vec![
            Fetch::Health,
            Fetch::SensorStatus,
            Fetch::MqttStats,
            Fetch::LogStats,
        ],
        ViewId::Sensors => vec![Fetch::SensorStatus],
        ViewId::Mqtt => {
            let mut plan = vec![Fetch::MqttStats, Fetch::SensorStatus];
            if let Some(sensor) = state.mqtt_sensor() {
                plan.push(Fetch::MqttHistory {
                    sensor: sensor.to_owned(),
                });
            }
            plan
        }
        ViewId::Logs => vec![Fetch::Logs(state.filters.logs().clone()), Fetch::LogStats],
        ViewId::Config => vec![Fetch::ConfigSnapshot],
        ViewId::Docs => vec![Fetch::Documentation(state.view.doc_tab())],
    }
}

/// Fetches for the sensor detail overlay.
pub fn detail_plan(sensor: &str) -> Vec<Fetch> {
    vec![
        Fetch::SensorDetail {
            sensor: sensor.to_owned(),
        },
        Fetch::DetailHistory {
            sensor: sensor.to_owned(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::FilterUpdate;
    use bridgeview_api::LogLevel;

    #[test]
    fn dashboard_issues_four_fetches() {
        let state = DashboardState::default();
        let panels: Vec<_> = plan_for(ViewId::Dashboard, &state)
            .iter()
            .map(Fetch::panel)
            .collect();
        assert_eq!(
            panels,
            vec![PanelId::Health, PanelId::Sensors, PanelId::MqttStats, PanelId::LogStats]
        );
    }

    #[test]
    fn mqtt_history_only_with_selection() {
        let mut state = DashboardState::default();
        assert_eq!(plan_for(ViewId::Mqtt, &state).len(), 2);
        state.select_mqtt_sensor("boiler_temp".into());
        assert_eq!(
            plan_for(ViewId::Mqtt, &state).last(),
            Some(&Fetch::MqttHistory {
                sensor: "boiler_temp".into()
            })
        );
    }

    #[test]
    fn logs_plan_snapshots_current_filter() {
        let mut state = DashboardState::default();
        state
            .filters
            .set_filter(FilterUpdate::LogLevel(Some(LogLevel::Error)));
        let plan = plan_for(ViewId::Logs, &state);
        let Some(Fetch::Logs(filter)) = plan.first() else {
            panic!("logs fetch first, got {plan:?}");
        };
        assert_eq!(filter.level, Some(LogLevel::Error));
    }

    #[test]
    fn docs_plan_follows_sub_tab() {
        let mut state = DashboardState::default();
        state.view.select_doc_tab(DocType::Troubleshooting);
        assert_eq!(
            plan_for(ViewId::Docs, &state),
            vec![Fetch::Documentation(DocType::Troubleshooting)]
        );
    }
}
