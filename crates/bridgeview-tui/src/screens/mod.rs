//! Screen implementations. Each view is a top-level Component.

pub mod config;
pub mod dashboard;
pub mod detail;
pub mod docs;
pub mod logs;
pub mod mqtt;
pub mod sensors;

use bridgeview_core::ViewId;

use crate::component::Component;

/// One screen per view, in tab-bar order.
pub fn create_screens() -> Vec<(ViewId, Box<dyn Component>)> {
    vec![
        (ViewId::Dashboard, Box::new(dashboard::DashboardScreen)),
        (ViewId::Sensors, Box::new(sensors::SensorsScreen::new())),
        (ViewId::Mqtt, Box::new(mqtt::MqttScreen::new())),
        (ViewId::Logs, Box::new(logs::LogsScreen::new())),
        (ViewId::Config, Box::new(config::ConfigScreen::new())),
        (ViewId::Docs, Box::new(docs::DocsScreen::new())),
    ]
}

/// Row cursor over a list whose length changes under it.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    index: usize,
}

impl Selection {
    /// Current index clamped to `len`.
    pub fn get(self, len: usize) -> usize {
        self.index.min(len.saturating_sub(1))
    }

    pub fn move_by(&mut self, delta: isize, len: usize) {
        if len == 0 {
            self.index = 0;
            return;
        }
        let current = self.get(len);
        self.index = current.saturating_add_signed(delta).min(len - 1);
    }

    pub fn top(&mut self) {
        self.index = 0;
    }
}

/// Step through `None, Some(options[0]), …, Some(last), None`.
pub fn cycle<T: Clone + PartialEq>(current: Option<&T>, options: &[T]) -> Option<T> {
    match current.and_then(|c| options.iter().position(|o| o == c)) {
        None => options.first().cloned(),
        Some(i) => options.get(i + 1).cloned(),
    }
}
