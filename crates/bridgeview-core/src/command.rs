// ── Command API ──
//
// Every user intent reaches the core as a `Command`. `update::handle_command`
// routes each variant to exactly one handler.

use bridgeview_api::{DocType, ExportFormat};

use crate::filter::FilterUpdate;
use crate::mutation::{GroupForm, ParameterForm};
use crate::view::ViewId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    // ── Navigation ───────────────────────────────────────────────────
    SelectTab(ViewId),
    SelectDocTab(DocType),
    /// Reload the active view (and the detail overlay, if open).
    Refresh,

    // ── Filters ──────────────────────────────────────────────────────
    SetFilter(FilterUpdate),
    /// Deliberate apply: resets paging and reloads server-filtered views.
    ApplyFilters(ViewId),
    LoadMore,
    Export(ExportFormat),

    // ── Selection ────────────────────────────────────────────────────
    SelectMqttSensor(String),
    OpenSensorDetail(String),
    CloseSensorDetail,

    // ── Editing ──────────────────────────────────────────────────────
    OpenParameterEditor(String),
    OpenGroupEditor(String),
    OpenRegenerateDocs,
    SaveParameter(ParameterForm),
    SaveGroup(GroupForm),
    RegenerateDocs { output_dir: String },
    ToggleParameter(String),
    CloseModal,
}
