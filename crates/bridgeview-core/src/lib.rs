// bridgeview-core: view-state sync and filtered-reload engine between
// bridgeview-api and the terminal front-end.

pub mod command;
pub mod config;
pub mod controller;
pub mod error;
pub mod filter;
pub mod mutation;
pub mod panel;
pub mod plan;
pub mod projection;
pub mod session;
pub mod state;
pub mod table;
pub mod update;
pub mod view;

// ── Primary re-exports ──────────────────────────────────────────────
pub use command::Command;
pub use config::ClientConfig;
pub use controller::{Controller, Dispatch};
pub use error::CoreError;
pub use filter::{
    ConfigFilter, FilterCriteria, FilterState, FilterUpdate, LogFilter, SensorFilter, TimeRange,
};
pub use mutation::{GroupForm, Modal, ModalForm, ModalStatus, Mutation, ParameterForm};
pub use panel::{PanelSlot, Panels, Payload};
pub use plan::{Fetch, PanelId, plan_for};
pub use session::Session;
pub use state::DashboardState;
pub use table::{BadgeKind, Cell, NOT_AVAILABLE, TableRow};
pub use update::{Notice, NoticeLevel, Outcome, Task, handle_command, handle_outcome};
pub use view::{LoadScope, LoadToken, ViewId, ViewState};

// API types the front-end renders directly.
pub use bridgeview_api as api;
pub use bridgeview_api::{DocType, ExportFormat, LogLevel, SensorStatus};
