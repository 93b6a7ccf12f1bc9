// ── Mutation workflows ──
//
// Editor forms, the modal that hosts them, and the requests they submit.
// A save sends every control value the form holds at submit time. The
// modal survives a failed save untouched.

use bridgeview_api::{ConfigGroup, ConfigParameter, GroupUpdate, ParameterUpdate};
use serde_json::Value;

use crate::error::CoreError;

// ── Forms ────────────────────────────────────────────────────────────

/// Editable copy of one sensor parameter. Numeric fields are raw text so
/// the editor can hold partial input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterForm {
    pub name: String,
    pub polling_interval: String,
    pub priority: String,
    pub enabled: bool,
}

impl ParameterForm {
    pub fn from_parameter(param: &ConfigParameter) -> Self {
        Self {
            name: param.name.clone(),
            polling_interval: param.polling_interval.map(|v| v.to_string()).unwrap_or_default(),
            priority: param.priority.to_string(),
            enabled: param.enabled,
        }
    }

    /// Request body from the current control values. An empty numeric
    /// field is left out.
    pub fn to_update(&self) -> Result<ParameterUpdate, CoreError> {
        let polling_interval = parse_at_least_one("polling_interval", &self.polling_interval)?;
        let priority = parse_at_least_one("priority", &self.priority)?
            .map(u32::try_from)
            .transpose()
            .map_err(|_| CoreError::Validation {
                field: "priority",
                reason: "out of range".into(),
            })?;
        Ok(ParameterUpdate {
            polling_interval,
            priority,
            enabled: Some(self.enabled),
        })
    }
}

/// Editable copy of one sensor group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupForm {
    pub name: String,
    pub default_polling_interval: String,
    pub enabled: bool,
}

impl GroupForm {
    pub fn from_group(group: &ConfigGroup) -> Self {
        Self {
            name: group.name.clone(),
            default_polling_interval: group
                .default_polling_interval
                .map(|v| v.to_string())
                .unwrap_or_default(),
            enabled: group.enabled,
        }
    }

    pub fn to_update(&self) -> Result<GroupUpdate, CoreError> {
        let interval =
            parse_at_least_one("default_polling_interval", &self.default_polling_interval)?;
        Ok(GroupUpdate {
            default_polling_interval: interval,
            enabled: Some(self.enabled),
        })
    }
}

/// Empty input is omitted from the body.
fn parse_at_least_one(field: &'static str, raw: &str) -> Result<Option<u64>, CoreError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    match raw.parse::<u64>() {
        Ok(0) | Err(_) => Err(CoreError::Validation {
            field,
            reason: "must be a whole number of at least 1".into(),
        }),
        Ok(value) => Ok(Some(value)),
    }
}

// ── Modal ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalForm {
    Parameter(ParameterForm),
    Group(GroupForm),
    RegenerateDocs { output_dir: String },
}

impl ModalForm {
    pub fn title(&self) -> String {
        match self {
            Self::Parameter(form) => format!("Edit parameter {}", form.name),
            Self::Group(form) => format!("Edit group {}", form.name),
            Self::RegenerateDocs { .. } => "Regenerate documentation".to_owned(),
        }
    }

    fn target(&self) -> Target<'_> {
        match self {
            Self::Parameter(form) => Target::Parameter(&form.name),
            Self::Group(form) => Target::Group(&form.name),
            Self::RegenerateDocs { .. } => Target::Docs,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalStatus {
    Editing,
    Saving,
    /// Last save was refused; holds the notice text.
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Modal {
    pub form: ModalForm,
    pub status: ModalStatus,
}

impl Modal {
    pub fn new(form: ModalForm) -> Self {
        Self {
            form,
            status: ModalStatus::Editing,
        }
    }

    pub fn is_saving(&self) -> bool {
        self.status == ModalStatus::Saving
    }

    /// Whether `mutation` was submitted from this modal's entity.
    pub fn owns(&self, mutation: &Mutation) -> bool {
        mutation.from_modal() && self.form.target() == mutation.target()
    }
}

// ── Requests ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target<'a> {
    Parameter(&'a str),
    Group(&'a str),
    Docs,
}

/// One write against the bridge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    Parameter { name: String, update: ParameterUpdate },
    Group { name: String, update: GroupUpdate },
    /// Enable switch flipped directly in the parameter table.
    ToggleParameter { name: String, enabled: bool },
    RegenerateDocs { output_dir: String },
}

impl Mutation {
    fn target(&self) -> Target<'_> {
        match self {
            Self::Parameter { name, .. } | Self::ToggleParameter { name, .. } => {
                Target::Parameter(name)
            }
            Self::Group { name, .. } => Target::Group(name),
            Self::RegenerateDocs { .. } => Target::Docs,
        }
    }

    fn from_modal(&self) -> bool {
        !matches!(self, Self::ToggleParameter { .. })
    }

    /// Short description for notices and logs.
    pub fn describe(&self) -> String {
        match self {
            Self::Parameter { name, .. } => format!("parameter {name}"),
            Self::Group { name, .. } => format!("group {name}"),
            Self::ToggleParameter { name, enabled } => {
                format!("parameter {name} {}", if *enabled { "enabled" } else { "disabled" })
            }
            Self::RegenerateDocs { .. } => "documentation".to_owned(),
        }
    }

    pub fn success_message(&self, response: Option<&Value>) -> String {
        match self {
            Self::RegenerateDocs { output_dir } => {
                let files = response
                    .and_then(|v| v.get("files"))
                    .and_then(Value::as_array)
                    .map(Vec::len);
                match files {
                    Some(n) => format!("Documentation regenerated ({n} files in {output_dir})"),
                    None => format!("Documentation regenerated in {output_dir}"),
                }
            }
            other => format!("Saved {}", other.describe()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parameter() -> ConfigParameter {
        serde_json::from_value(json!({
            "name": "boiler_temp",
            "group": "heating",
            "priority": 1,
            "polling_interval": 30,
            "enabled": true
        }))
        .unwrap()
    }

    #[test]
    fn unchanged_form_sends_every_value() {
        let form = ParameterForm::from_parameter(&parameter());
        assert_eq!(
            form.to_update().unwrap(),
            ParameterUpdate {
                polling_interval: Some(30),
                priority: Some(1),
                enabled: Some(true),
            }
        );
    }

    #[test]
    fn edited_and_untouched_fields_are_sent() {
        let mut form = ParameterForm::from_parameter(&parameter());
        form.enabled = false;
        form.polling_interval = "60".into();
        assert_eq!(
            form.to_update().unwrap(),
            ParameterUpdate {
                polling_interval: Some(60),
                priority: Some(1),
                enabled: Some(false),
            }
        );
    }

    #[test]
    fn empty_numeric_field_is_omitted() {
        let mut form = ParameterForm::from_parameter(&parameter());
        form.polling_interval = "  ".into();
        let update = form.to_update().unwrap();
        assert_eq!(update.polling_interval, None);
        assert_eq!(update.enabled, Some(true));
    }

    #[test]
    fn zero_and_garbage_fail_validation() {
        let mut form = ParameterForm::from_parameter(&parameter());
        form.priority = "0".into();
        let err = form.to_update().unwrap_err();
        assert!(err.notice_text().starts_with("Fehler: priority"));

        form.priority = "1".into();
        form.polling_interval = "soon".into();
        assert!(matches!(
            form.to_update(),
            Err(CoreError::Validation { field: "polling_interval", .. })
        ));
    }

    #[test]
    fn group_save_keeps_unchanged_enabled() {
        let group: ConfigGroup = serde_json::from_value(json!({
            "name": "heating",
            "default_polling_interval": 60,
            "enabled": true
        }))
        .unwrap();
        let mut form = GroupForm::from_group(&group);
        form.default_polling_interval = "30".into();
        let body = serde_json::to_value(form.to_update().unwrap()).unwrap();
        assert_eq!(body, json!({ "default_polling_interval": 30, "enabled": true }));
    }

    #[test]
    fn group_form_values() {
        let group: ConfigGroup = serde_json::from_value(json!({
            "name": "heating",
            "default_polling_interval": 60,
            "enabled": false
        }))
        .unwrap();
        let mut form = GroupForm::from_group(&group);
        form.default_polling_interval = "30".into();
        form.enabled = true;
        assert_eq!(
            form.to_update().unwrap(),
            GroupUpdate {
                default_polling_interval: Some(30),
                enabled: Some(true),
            }
        );
    }

    #[test]
    fn modal_owns_only_its_entity() {
        let modal = Modal::new(ModalForm::Parameter(ParameterForm::from_parameter(&parameter())));
        let same = Mutation::Parameter {
            name: "boiler_temp".into(),
            update: ParameterUpdate::default(),
        };
        let other = Mutation::Parameter {
            name: "flow_temp".into(),
            update: ParameterUpdate::default(),
        };
        let toggle = Mutation::ToggleParameter {
            name: "boiler_temp".into(),
            enabled: false,
        };
        assert!(modal.owns(&same));
        assert!(!modal.owns(&other));
        assert!(!modal.owns(&toggle));
    }
}
