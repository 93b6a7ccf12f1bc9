// ── Update ──
//
// The state machine. `handle_command` and `handle_outcome` mutate the
// dashboard state and describe side effects as `Task`s; they never perform
// I/O, so every transition is testable without a server.

use bridgeview_api::ExportFormat;
use serde_json::Value;
use tracing::{debug, info};
use url::Url;

use crate::command::Command;
use crate::error::CoreError;
use crate::filter::LogFilter;
use crate::mutation::{GroupForm, Modal, ModalForm, ModalStatus, Mutation, ParameterForm};
use crate::panel::Payload;
use crate::plan::{Fetch, PanelId, detail_plan, plan_for};
use crate::state::DashboardState;
use crate::view::{LoadToken, ViewId};

// ── Side effects ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
}

/// Something the front-end should tell the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Must be acknowledged before anything else happens.
    Blocking(String),
    Toast { message: String, level: NoticeLevel },
}

impl Notice {
    fn toast(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self::Toast {
            message: message.into(),
            level,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Task {
    Fetch { token: LoadToken, fetch: Fetch },
    Mutate(Mutation),
    /// Build the export URL for a log filter snapshot.
    Export { filter: LogFilter, format: ExportFormat },
    Notify(Notice),
}

/// A completed task, fed back through `handle_outcome`.
#[derive(Debug)]
pub enum Outcome {
    Fetched {
        token: LoadToken,
        panel: PanelId,
        result: Result<Payload, CoreError>,
    },
    Mutated {
        mutation: Mutation,
        result: Result<Option<Value>, CoreError>,
    },
    Exported {
        format: ExportFormat,
        result: Result<Url, CoreError>,
    },
}

// ── Loading ──────────────────────────────────────────────────────────

/// Issue a fresh token for `view` and one fetch task per plan entry.
fn load_view(state: &mut DashboardState, view: ViewId) -> Vec<Task> {
    let token = state.view.issue(view);
    let plan = plan_for(view, state);
    fetch_all(state, token, plan)
}

fn activate(state: &mut DashboardState, view: ViewId) -> Vec<Task> {
    let token = state.view.activate(view);
    let plan = plan_for(view, state);
    fetch_all(state, token, plan)
}

fn load_detail(state: &mut DashboardState, sensor: &str) -> Vec<Task> {
    let token = state.view.issue_detail();
    fetch_all(state, token, detail_plan(sensor))
}

fn fetch_all(state: &mut DashboardState, token: LoadToken, plan: Vec<Fetch>) -> Vec<Task> {
    plan.into_iter()
        .map(|fetch| {
            state.panels.begin(fetch.panel(), token.seq);
            Task::Fetch { token, fetch }
        })
        .collect()
}

/// The view whose data a mutation changes.
fn owning_view(mutation: &Mutation) -> ViewId {
    match mutation {
        Mutation::Parameter { .. } | Mutation::Group { .. } | Mutation::ToggleParameter { .. } => {
            ViewId::Config
        }
        Mutation::RegenerateDocs { .. } => ViewId::Docs,
    }
}

// ── Commands ─────────────────────────────────────────────────────────

pub fn handle_command(state: &mut DashboardState, command: Command) -> Vec<Task> {
    match command {
        Command::SelectTab(view) => {
            debug!(%view, "select tab");
            activate(state, view)
        }
        Command::SelectDocTab(doc_type) => {
            let token = state.view.select_doc_tab(doc_type);
            let plan = plan_for(ViewId::Docs, state);
            fetch_all(state, token, plan)
        }
        Command::Refresh => {
            let active = state.view.active();
            let mut tasks = load_view(state, active);
            if let Some(sensor) = state.detail_sensor().map(str::to_owned) {
                tasks.extend(load_detail(state, &sensor));
            }
            tasks
        }
        Command::SetFilter(update) => {
            state.filters.set_filter(update);
            Vec::new()
        }
        Command::ApplyFilters(view) => {
            state.filters.apply_filters(view);
            // Sensor and config filters are applied at projection time.
            if view == ViewId::Logs {
                load_view(state, ViewId::Logs)
            } else {
                Vec::new()
            }
        }
        Command::LoadMore => {
            let limit = state.filters.load_more();
            debug!(limit, "load more logs");
            load_view(state, ViewId::Logs)
        }
        Command::Export(format) => vec![Task::Export {
            filter: state.filters.logs().clone(),
            format,
        }],
        Command::SelectMqttSensor(name) => {
            state.select_mqtt_sensor(name);
            load_view(state, ViewId::Mqtt)
        }
        Command::OpenSensorDetail(name) => {
            state.panels.clear_detail();
            let tasks = load_detail(state, &name);
            state.set_detail_sensor(Some(name));
            tasks
        }
        Command::CloseSensorDetail => {
            state.set_detail_sensor(None);
            state.panels.clear_detail();
            Vec::new()
        }
        Command::OpenParameterEditor(name) => open_parameter_editor(state, &name),
        Command::OpenGroupEditor(name) => open_group_editor(state, &name),
        Command::OpenRegenerateDocs => {
            state.modal = Some(Modal::new(ModalForm::RegenerateDocs {
                output_dir: state.docs_output_dir().to_owned(),
            }));
            Vec::new()
        }
        Command::SaveParameter(form) => save_parameter(state, form),
        Command::SaveGroup(form) => save_group(state, form),
        Command::RegenerateDocs { output_dir } => regenerate_docs(state, output_dir),
        Command::ToggleParameter(name) => toggle_parameter(state, &name),
        Command::CloseModal => {
            state.modal = None;
            Vec::new()
        }
    }
}

fn open_parameter_editor(state: &mut DashboardState, name: &str) -> Vec<Task> {
    let form = state
        .panels
        .config
        .data()
        .and_then(|snap| snap.parameters.iter().find(|p| p.name == name))
        .map(ParameterForm::from_parameter);
    match form {
        Some(form) => {
            state.modal = Some(Modal::new(ModalForm::Parameter(form)));
            Vec::new()
        }
        None => vec![Task::Notify(Notice::toast(
            NoticeLevel::Warning,
            format!("Parameter {name} is not loaded"),
        ))],
    }
}

fn open_group_editor(state: &mut DashboardState, name: &str) -> Vec<Task> {
    let form = state
        .panels
        .config
        .data()
        .and_then(|snap| snap.groups.iter().find(|g| g.name == name))
        .map(GroupForm::from_group);
    match form {
        Some(form) => {
            state.modal = Some(Modal::new(ModalForm::Group(form)));
            Vec::new()
        }
        None => vec![Task::Notify(Notice::toast(
            NoticeLevel::Warning,
            format!("Group {name} is not loaded"),
        ))],
    }
}

/// Store the submitted form in the modal, then either submit `mutation`
/// or record why it could not be built.
fn submit(
    state: &mut DashboardState,
    form: ModalForm,
    mutation: Result<Mutation, CoreError>,
) -> Vec<Task> {
    if state.modal().is_some_and(Modal::is_saving) {
        debug!("save already in flight, ignoring");
        return Vec::new();
    }
    match mutation {
        Ok(mutation) => {
            state.modal = Some(Modal {
                form,
                status: ModalStatus::Saving,
            });
            vec![Task::Mutate(mutation)]
        }
        Err(e) => {
            let text = e.notice_text();
            state.modal = Some(Modal {
                form,
                status: ModalStatus::Failed(text.clone()),
            });
            vec![Task::Notify(Notice::Blocking(text))]
        }
    }
}

fn save_parameter(state: &mut DashboardState, form: ParameterForm) -> Vec<Task> {
    let mutation = form.to_update().map(|update| Mutation::Parameter {
        name: form.name.clone(),
        update,
    });
    submit(state, ModalForm::Parameter(form), mutation)
}

fn save_group(state: &mut DashboardState, form: GroupForm) -> Vec<Task> {
    let mutation = form.to_update().map(|update| Mutation::Group {
        name: form.name.clone(),
        update,
    });
    submit(state, ModalForm::Group(form), mutation)
}

fn regenerate_docs(state: &mut DashboardState, output_dir: String) -> Vec<Task> {
    let trimmed = output_dir.trim().to_owned();
    let mutation = if trimmed.is_empty() {
        Err(CoreError::Validation {
            field: "output_dir",
            reason: "must not be empty".into(),
        })
    } else {
        Ok(Mutation::RegenerateDocs { output_dir: trimmed })
    };
    submit(state, ModalForm::RegenerateDocs { output_dir }, mutation)
}

/// Flip a parameter's enabled flag in the table right away, then submit.
fn toggle_parameter(state: &mut DashboardState, name: &str) -> Vec<Task> {
    let current = state
        .panels
        .config
        .data()
        .and_then(|snap| snap.parameters.iter().find(|p| p.name == name))
        .map(|p| p.enabled);
    let Some(current) = current else {
        return Vec::new();
    };
    let enabled = !current;
    state.panels.config.modify(|snap| {
        if let Some(param) = snap.parameters.iter_mut().find(|p| p.name == name) {
            param.enabled = enabled;
        }
    });
    vec![Task::Mutate(Mutation::ToggleParameter {
        name: name.to_owned(),
        enabled,
    })]
}

// ── Outcomes ─────────────────────────────────────────────────────────

pub fn handle_outcome(state: &mut DashboardState, outcome: Outcome) -> Vec<Task> {
    match outcome {
        Outcome::Fetched {
            token,
            panel,
            result,
        } => {
            if !state.view.is_current(token) {
                debug!(%panel, seq = token.seq, "dropping stale outcome");
                state.panels.abandon(panel, token.seq);
            } else if !state.panels.apply(panel, token.seq, result) {
                debug!(%panel, seq = token.seq, "panel already reloading, outcome ignored");
            }
            Vec::new()
        }
        Outcome::Mutated { mutation, result } => mutation_finished(state, &mutation, result),
        Outcome::Exported { format, result } => match result {
            Ok(url) => vec![Task::Notify(Notice::toast(
                NoticeLevel::Info,
                format!("Export ({format}): {url}"),
            ))],
            Err(e) => vec![Task::Notify(Notice::Blocking(e.notice_text()))],
        },
    }
}

fn mutation_finished(
    state: &mut DashboardState,
    mutation: &Mutation,
    result: Result<Option<Value>, CoreError>,
) -> Vec<Task> {
    match result {
        Ok(response) => {
            info!(mutation = %mutation.describe(), "mutation applied");
            if state.modal().is_some_and(|m| m.owns(mutation)) {
                state.modal = None;
            }
            let mut tasks = vec![Task::Notify(Notice::toast(
                NoticeLevel::Success,
                mutation.success_message(response.as_ref()),
            ))];
            tasks.extend(load_view(state, owning_view(mutation)));
            tasks
        }
        Err(e) => {
            let text = e.notice_text();
            info!(mutation = %mutation.describe(), error = %e, "mutation refused");
            if let Some(modal) = state.modal.as_mut().filter(|m| m.owns(mutation)) {
                modal.status = ModalStatus::Failed(text.clone());
            }
            let mut tasks = vec![Task::Notify(Notice::Blocking(text))];
            // The optimistic flip is rolled back by reloading server truth.
            if matches!(mutation, Mutation::ToggleParameter { .. }) {
                tasks.extend(load_view(state, ViewId::Config));
            }
            tasks
        }
    }
}
