// bridgeview-api: Async Rust client for the sensor/MQTT bridge monitoring API

pub mod client;
pub mod config;
pub mod docs;
pub mod error;
pub mod logs;
pub mod models;
pub mod mqtt;
pub mod query;
pub mod sensors;
pub mod system;
pub mod transport;

pub use client::ApiClient;
pub use error::Error;
pub use models::{
    ComponentHealth, ConfigGroup, ConfigParameter, ConfigSnapshot, DocFormat, DocType,
    Documentation, FlowInitiator, GroupUpdate, HealthReport, LogEntry, LogLevel, LogPage,
    LogStats, MqttFlow, MqttHistory, MqttMessage, MqttStats, ParameterUpdate, Reading, Sensor,
    SensorErrorSummary, SensorGroup, SensorSnapshot, SensorStatistics, SensorStatus, Timestamp,
};
pub use query::{ExportFormat, LogQuery};
pub use transport::TransportConfig;
