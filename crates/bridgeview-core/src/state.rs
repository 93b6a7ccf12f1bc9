// ── Dashboard state ──
//
// Everything the front-end renders from. Only `update` writes it; the TUI
// reads it and edits nothing but the open modal's form.

use crate::config::{ClientConfig, DEFAULT_DOCS_OUTPUT_DIR};
use crate::filter::FilterState;
use crate::mutation::Modal;
use crate::panel::Panels;
use crate::view::ViewState;

#[derive(Debug, Clone)]
pub struct DashboardState {
    pub view: ViewState,
    pub filters: FilterState,
    pub panels: Panels,
    pub(crate) modal: Option<Modal>,
    mqtt_sensor: Option<String>,
    detail_sensor: Option<String>,
    docs_output_dir: String,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self {
            view: ViewState::default(),
            filters: FilterState::default(),
            panels: Panels::default(),
            modal: None,
            mqtt_sensor: None,
            detail_sensor: None,
            docs_output_dir: DEFAULT_DOCS_OUTPUT_DIR.to_owned(),
        }
    }
}

impl DashboardState {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            filters: FilterState::new(config.log_page_size, config.log_page_increment),
            docs_output_dir: config.docs_output_dir.clone(),
            ..Self::default()
        }
    }

    pub fn modal(&self) -> Option<&Modal> {
        self.modal.as_ref()
    }

    /// The open modal, for editing its form in place.
    pub fn modal_mut(&mut self) -> Option<&mut Modal> {
        self.modal.as_mut()
    }

    /// Sensor whose MQTT history the MQTT view shows.
    pub fn mqtt_sensor(&self) -> Option<&str> {
        self.mqtt_sensor.as_deref()
    }

    pub(crate) fn select_mqtt_sensor(&mut self, name: String) {
        self.mqtt_sensor = Some(name);
    }

    /// Sensor shown in the detail overlay, if open.
    pub fn detail_sensor(&self) -> Option<&str> {
        self.detail_sensor.as_deref()
    }

    pub(crate) fn set_detail_sensor(&mut self, name: Option<String>) {
        self.detail_sensor = name;
    }

    pub fn docs_output_dir(&self) -> &str {
        &self.docs_output_dir
    }
}
