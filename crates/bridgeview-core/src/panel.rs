// ── Panel slots ──
//
// Client-side data, one slot per panel. A slot remembers the sequence
// number of the newest request issued for it; only that request's outcome
// may write the slot. Failures leave the previous data in place.

use std::sync::Arc;

use bridgeview_api::{
    ConfigSnapshot, DocType, Documentation, HealthReport, LogPage, LogStats, MqttHistory,
    MqttStats, Sensor, SensorSnapshot,
};
use chrono::{DateTime, Utc};
use tracing::warn;

use crate::error::CoreError;
use crate::plan::PanelId;

/// A successful fetch result, tagged by the slot it fills.
#[derive(Debug, Clone)]
pub enum Payload {
    Health(HealthReport),
    Sensors(SensorSnapshot),
    MqttStats(MqttStats),
    LogStats(LogStats),
    Logs(LogPage),
    MqttHistory(MqttHistory),
    Config(ConfigSnapshot),
    Docs(DocType, Documentation),
    DetailSensor(Sensor),
    DetailHistory(MqttHistory),
}

#[derive(Debug, Clone)]
pub struct PanelSlot<T> {
    data: Option<Arc<T>>,
    pending: Option<u64>,
    updated_at: Option<DateTime<Utc>>,
}

impl<T> Default for PanelSlot<T> {
    fn default() -> Self {
        Self {
            data: None,
            pending: None,
            updated_at: None,
        }
    }
}

impl<T> PanelSlot<T> {
    pub fn data(&self) -> Option<&T> {
        self.data.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    /// When the data was last replaced.
    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    fn begin(&mut self, seq: u64) {
        self.pending = Some(seq);
    }

    fn accepts(&self, seq: u64) -> bool {
        self.pending == Some(seq)
    }

    fn fill(&mut self, value: T) {
        self.data = Some(Arc::new(value));
        self.pending = None;
        self.updated_at = Some(Utc::now());
    }

    fn settle(&mut self, seq: u64) {
        if self.accepts(seq) {
            self.pending = None;
        }
    }

    pub(crate) fn clear(&mut self) {
        *self = Self::default();
    }
}

impl<T: Clone> PanelSlot<T> {
    /// Edit the held data in place (optimistic updates). Nothing happens
    /// while the slot is empty.
    pub(crate) fn modify(&mut self, f: impl FnOnce(&mut T)) {
        if let Some(data) = self.data.as_mut() {
            f(Arc::make_mut(data));
        }
    }
}

/// All panel slots.
#[derive(Debug, Clone, Default)]
pub struct Panels {
    pub health: PanelSlot<HealthReport>,
    pub sensors: PanelSlot<SensorSnapshot>,
    pub mqtt_stats: PanelSlot<MqttStats>,
    pub log_stats: PanelSlot<LogStats>,
    pub logs: PanelSlot<LogPage>,
    pub mqtt_history: PanelSlot<MqttHistory>,
    pub config: PanelSlot<ConfigSnapshot>,
    pub docs: PanelSlot<(DocType, Documentation)>,
    pub detail_sensor: PanelSlot<Sensor>,
    pub detail_history: PanelSlot<MqttHistory>,
}

/// Request bookkeeping shared by every slot, independent of its data type.
trait Pending {
    fn begin(&mut self, seq: u64);
    fn accepts(&self, seq: u64) -> bool;
    fn settle(&mut self, seq: u64);
}

impl<T> Pending for PanelSlot<T> {
    fn begin(&mut self, seq: u64) {
        PanelSlot::begin(self, seq);
    }

    fn accepts(&self, seq: u64) -> bool {
        PanelSlot::accepts(self, seq)
    }

    fn settle(&mut self, seq: u64) {
        PanelSlot::settle(self, seq);
    }
}

impl Panels {
    fn slot(&self, panel: PanelId) -> &dyn Pending {
        match panel {
            PanelId::Health => &self.health,
            PanelId::Sensors => &self.sensors,
            PanelId::MqttStats => &self.mqtt_stats,
            PanelId::LogStats => &self.log_stats,
            PanelId::Logs => &self.logs,
            PanelId::MqttHistory => &self.mqtt_history,
            PanelId::Config => &self.config,
            PanelId::Docs => &self.docs,
            PanelId::DetailSensor => &self.detail_sensor,
            PanelId::DetailHistory => &self.detail_history,
        }
    }

    fn slot_mut(&mut self, panel: PanelId) -> &mut dyn Pending {
        match panel {
            PanelId::Health => &mut self.health,
            PanelId::Sensors => &mut self.sensors,
            PanelId::MqttStats => &mut self.mqtt_stats,
            PanelId::LogStats => &mut self.log_stats,
            PanelId::Logs => &mut self.logs,
            PanelId::MqttHistory => &mut self.mqtt_history,
            PanelId::Config => &mut self.config,
            PanelId::Docs => &mut self.docs,
            PanelId::DetailSensor => &mut self.detail_sensor,
            PanelId::DetailHistory => &mut self.detail_history,
        }
    }

    /// Mark `panel` as loading for request `seq`, superseding older requests.
    pub fn begin(&mut self, panel: PanelId, seq: u64) {
        self.slot_mut(panel).begin(seq);
    }

    /// Whether an outcome for request `seq` may still write `panel`.
    pub fn accepts(&self, panel: PanelId, seq: u64) -> bool {
        self.slot(panel).accepts(seq)
    }

    /// Drop request `seq` without touching data.
    pub fn abandon(&mut self, panel: PanelId, seq: u64) {
        self.slot_mut(panel).settle(seq);
    }

    /// Apply the outcome of request `seq`. Returns `false` when a newer
    /// request owns the slot and the outcome was ignored.
    pub fn apply(
        &mut self,
        panel: PanelId,
        seq: u64,
        result: Result<Payload, CoreError>,
    ) -> bool {
        if !self.accepts(panel, seq) {
            return false;
        }
        match result {
            Ok(payload) => self.fill(payload),
            Err(e) => {
                warn!(%panel, error = %e, "fetch failed, keeping previous data");
                self.abandon(panel, seq);
            }
        }
        true
    }

    fn fill(&mut self, payload: Payload) {
        match payload {
            Payload::Health(v) => self.health.fill(v),
            Payload::Sensors(v) => self.sensors.fill(v),
            Payload::MqttStats(v) => self.mqtt_stats.fill(v),
            Payload::LogStats(v) => self.log_stats.fill(v),
            Payload::Logs(v) => self.logs.fill(v),
            Payload::MqttHistory(v) => self.mqtt_history.fill(v),
            Payload::Config(v) => self.config.fill(v),
            Payload::Docs(doc_type, doc) => self.docs.fill((doc_type, doc)),
            Payload::DetailSensor(v) => self.detail_sensor.fill(v),
            Payload::DetailHistory(v) => self.detail_history.fill(v),
        }
    }

    pub(crate) fn clear_detail(&mut self) {
        self.detail_sensor.clear();
        self.detail_history.clear();
    }
}
