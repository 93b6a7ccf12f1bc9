// ── Filter state ──
//
// The user-selected criteria per view. Controls write straight into
// `FilterState`, so every read sees the latest selection. Filters never
// touch fetched data; reducers apply them at projection time (sensors,
// config) or they are sent to the server (logs).

use bridgeview_api::{LogLevel, LogQuery, SensorStatus};
use chrono::{DateTime, Duration, Utc};

use crate::view::ViewId;

// ── Per-view criteria ────────────────────────────────────────────────

/// Group/status selector for the sensor table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SensorFilter {
    /// Group id; `None` shows every group.
    pub group: Option<String>,
    pub status: Option<SensorStatus>,
}

/// Relative time window for the log query.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, strum::Display, strum::EnumIter,
)]
pub enum TimeRange {
    #[default]
    #[strum(to_string = "all time")]
    All,
    #[strum(to_string = "last hour")]
    LastHour,
    #[strum(to_string = "last 24h")]
    LastDay,
    #[strum(to_string = "last 7 days")]
    LastWeek,
}

impl TimeRange {
    fn span(self) -> Option<Duration> {
        match self {
            Self::All => None,
            Self::LastHour => Some(Duration::hours(1)),
            Self::LastDay => Some(Duration::hours(24)),
            Self::LastWeek => Some(Duration::days(7)),
        }
    }

    /// The next range in cycle order, wrapping around.
    pub fn next(self) -> Self {
        match self {
            Self::All => Self::LastHour,
            Self::LastHour => Self::LastDay,
            Self::LastDay => Self::LastWeek,
            Self::LastWeek => Self::All,
        }
    }
}

/// Server-side log selector plus the growing page limit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFilter {
    pub level: Option<LogLevel>,
    pub category: Option<String>,
    pub sensor: Option<String>,
    pub time_range: TimeRange,
    pub errors_only: bool,
    pub limit: usize,
}

impl LogFilter {
    fn with_limit(limit: usize) -> Self {
        Self {
            level: None,
            category: None,
            sensor: None,
            time_range: TimeRange::All,
            errors_only: false,
            limit,
        }
    }

    /// Resolve into request parameters; the time window ends at `now`.
    pub fn to_query(&self, now: DateTime<Utc>) -> LogQuery {
        let start_time = self.time_range.span().map(|span| now - span);
        LogQuery {
            level: self.level,
            category: self.category.clone(),
            sensor_name: self.sensor.clone(),
            start_time,
            end_time: start_time.map(|_| now),
            errors_only: self.errors_only,
            limit: Some(self.limit),
        }
    }
}

/// Group selector for the parameter table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigFilter {
    pub group: Option<String>,
}

/// Snapshot of the criteria one view reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterCriteria {
    Sensors(SensorFilter),
    Logs(LogFilter),
    Config(ConfigFilter),
    /// The view has no user filter.
    Unfiltered,
}

/// A single control change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterUpdate {
    SensorGroup(Option<String>),
    SensorStatus(Option<SensorStatus>),
    LogLevel(Option<LogLevel>),
    LogCategory(Option<String>),
    LogSensor(Option<String>),
    LogTimeRange(TimeRange),
    LogErrorsOnly(bool),
    ConfigGroup(Option<String>),
}

impl FilterUpdate {
    /// The view whose criteria this update changes.
    pub fn view(&self) -> ViewId {
        match self {
            Self::SensorGroup(_) | Self::SensorStatus(_) => ViewId::Sensors,
            Self::LogLevel(_)
            | Self::LogCategory(_)
            | Self::LogSensor(_)
            | Self::LogTimeRange(_)
            | Self::LogErrorsOnly(_) => ViewId::Logs,
            Self::ConfigGroup(_) => ViewId::Config,
        }
    }
}

// ── FilterState ──────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct FilterState {
    sensors: SensorFilter,
    logs: LogFilter,
    config: ConfigFilter,
    page_size: usize,
    page_increment: usize,
}

impl Default for FilterState {
    fn default() -> Self {
        Self::new(
            crate::config::DEFAULT_LOG_PAGE_SIZE,
            crate::config::DEFAULT_LOG_PAGE_INCREMENT,
        )
    }
}

impl FilterState {
    /// Zero sizes fall back to one row so paging always makes progress.
    pub fn new(page_size: usize, page_increment: usize) -> Self {
        let page_size = page_size.max(1);
        Self {
            sensors: SensorFilter::default(),
            logs: LogFilter::with_limit(page_size),
            config: ConfigFilter::default(),
            page_size,
            page_increment: page_increment.max(1),
        }
    }

    pub fn set_filter(&mut self, update: FilterUpdate) {
        match update {
            FilterUpdate::SensorGroup(group) => self.sensors.group = blank_to_none(group),
            FilterUpdate::SensorStatus(status) => self.sensors.status = status,
            FilterUpdate::LogLevel(level) => self.logs.level = level,
            FilterUpdate::LogCategory(category) => self.logs.category = blank_to_none(category),
            FilterUpdate::LogSensor(sensor) => self.logs.sensor = blank_to_none(sensor),
            FilterUpdate::LogTimeRange(range) => self.logs.time_range = range,
            FilterUpdate::LogErrorsOnly(on) => self.logs.errors_only = on,
            FilterUpdate::ConfigGroup(group) => self.config.group = blank_to_none(group),
        }
    }

    pub fn current_filter(&self, view: ViewId) -> FilterCriteria {
        match view {
            ViewId::Sensors => FilterCriteria::Sensors(self.sensors.clone()),
            ViewId::Logs => FilterCriteria::Logs(self.logs.clone()),
            ViewId::Config => FilterCriteria::Config(self.config.clone()),
            ViewId::Dashboard | ViewId::Mqtt | ViewId::Docs => FilterCriteria::Unfiltered,
        }
    }

    pub fn sensors(&self) -> &SensorFilter {
        &self.sensors
    }

    pub fn logs(&self) -> &LogFilter {
        &self.logs
    }

    pub fn config(&self) -> &ConfigFilter {
        &self.config
    }

    /// Grow the log page by the fixed increment. Returns the new limit.
    pub fn load_more(&mut self) -> usize {
        self.logs.limit = self.logs.limit.saturating_add(self.page_increment);
        self.logs.limit
    }

    /// A deliberate filter application: the log page restarts at its base size.
    pub fn apply_filters(&mut self, view: ViewId) {
        if view == ViewId::Logs {
            self.logs.limit = self.page_size;
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn page_increment(&self) -> usize {
        self.page_increment
    }
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
