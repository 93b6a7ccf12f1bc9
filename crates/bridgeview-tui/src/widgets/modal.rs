//! Editor modal: parameter, group and documentation-regeneration forms.
//!
//! The form itself lives in the core `Modal`; this module only tracks the
//! focused field, edits values in place and renders the overlay.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Clear, Paragraph, Wrap};

use bridgeview_core::{Command, Modal, ModalForm, ModalStatus};

use crate::action::Action;
use crate::component::RenderContext;
use crate::theme;
use crate::widgets::{centered, overlay_block, panel};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    /// Digits only.
    Number(&'static str),
    Text(&'static str),
    Toggle(&'static str),
}

impl Field {
    fn label(self) -> &'static str {
        match self {
            Self::Number(l) | Self::Text(l) | Self::Toggle(l) => l,
        }
    }
}

const PARAMETER_FIELDS: &[Field] = &[
    Field::Number("Polling (s)"),
    Field::Number("Priority"),
    Field::Toggle("Enabled"),
];
const GROUP_FIELDS: &[Field] = &[Field::Number("Interval (s)"), Field::Toggle("Enabled")];
const DOCS_FIELDS: &[Field] = &[Field::Text("Output dir")];

fn fields(form: &ModalForm) -> &'static [Field] {
    match form {
        ModalForm::Parameter(_) => PARAMETER_FIELDS,
        ModalForm::Group(_) => GROUP_FIELDS,
        ModalForm::RegenerateDocs { .. } => DOCS_FIELDS,
    }
}

fn text_mut(form: &mut ModalForm, index: usize) -> Option<&mut String> {
    match (form, index) {
        (ModalForm::Parameter(f), 0) => Some(&mut f.polling_interval),
        (ModalForm::Parameter(f), 1) => Some(&mut f.priority),
        (ModalForm::Group(f), 0) => Some(&mut f.default_polling_interval),
        (ModalForm::RegenerateDocs { output_dir }, 0) => Some(output_dir),
        _ => None,
    }
}

fn toggle_mut(form: &mut ModalForm, index: usize) -> Option<&mut bool> {
    match (form, index) {
        (ModalForm::Parameter(f), 2) => Some(&mut f.enabled),
        (ModalForm::Group(f), 1) => Some(&mut f.enabled),
        _ => None,
    }
}

fn value(form: &ModalForm, index: usize) -> String {
    match (form, index) {
        (ModalForm::Parameter(f), 0) => f.polling_interval.clone(),
        (ModalForm::Parameter(f), 1) => f.priority.clone(),
        (ModalForm::Parameter(f), 2) => on_off(f.enabled),
        (ModalForm::Group(f), 0) => f.default_polling_interval.clone(),
        (ModalForm::Group(f), 1) => on_off(f.enabled),
        (ModalForm::RegenerateDocs { output_dir }, 0) => output_dir.clone(),
        _ => String::new(),
    }
}

fn on_off(enabled: bool) -> String {
    if enabled { "Enabled".into() } else { "Disabled".into() }
}

/// The save command for the form as it stands.
fn save_command(form: &ModalForm) -> Command {
    match form {
        ModalForm::Parameter(f) => Command::SaveParameter(f.clone()),
        ModalForm::Group(f) => Command::SaveGroup(f.clone()),
        ModalForm::RegenerateDocs { output_dir } => Command::RegenerateDocs {
            output_dir: output_dir.clone(),
        },
    }
}

// ── Input ────────────────────────────────────────────────────────────

/// Focused field of the open modal.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FormCursor {
    field: usize,
}

impl FormCursor {
    pub fn reset(&mut self) {
        self.field = 0;
    }
}

/// Edit `modal` in place. Enter and Esc become core commands. While a
/// save is in flight only Esc is accepted.
pub fn handle_key(modal: &mut Modal, cursor: &mut FormCursor, key: KeyEvent) -> Option<Action> {
    if modal.is_saving() {
        return (key.code == KeyCode::Esc).then(|| Command::CloseModal.into());
    }
    let fields = fields(&modal.form);
    let count = fields.len();
    let current = fields.get(cursor.field).copied()?;

    match key.code {
        KeyCode::Esc => return Some(Command::CloseModal.into()),
        KeyCode::Enter => return Some(save_command(&modal.form).into()),
        KeyCode::Tab | KeyCode::Down => cursor.field = (cursor.field + 1) % count,
        KeyCode::BackTab | KeyCode::Up => cursor.field = (cursor.field + count - 1) % count,
        KeyCode::Char(' ') if matches!(current, Field::Toggle(_)) => {
            if let Some(flag) = toggle_mut(&mut modal.form, cursor.field) {
                *flag = !*flag;
            }
        }
        KeyCode::Char(ch) => {
            let accept = match current {
                Field::Number(_) => ch.is_ascii_digit(),
                Field::Text(_) => true,
                Field::Toggle(_) => false,
            };
            if let Some(text) = text_mut(&mut modal.form, cursor.field).filter(|_| accept) {
                text.push(ch);
            }
        }
        KeyCode::Backspace => {
            if let Some(text) = text_mut(&mut modal.form, cursor.field) {
                text.pop();
            }
        }
        _ => {}
    }
    None
}

// ── Rendering ────────────────────────────────────────────────────────

#[allow(clippy::cast_possible_truncation, clippy::as_conversions)]
pub fn render(
    frame: &mut Frame,
    area: Rect,
    modal: &Modal,
    cursor: FormCursor,
    ctx: &RenderContext<'_>,
) {
    let fields = fields(&modal.form);
    let height = (fields.len() as u16 + 7).min(area.height);
    let overlay = centered(area, 56, height);

    frame.render_widget(Clear, overlay);

    let block = overlay_block(modal.form.title());
    let inner = block.inner(overlay);
    frame.render_widget(block, overlay);

    let focused_label = Style::default().fg(theme::ELECTRIC_YELLOW).add_modifier(Modifier::BOLD);
    let mut lines = vec![Line::from("")];

    for (idx, field) in fields.iter().enumerate() {
        let is_focused = idx == cursor.field;
        let lbl_style = if is_focused { focused_label } else { theme::label() };
        let marker = if is_focused { "▸ " } else { "  " };
        let text = value(&modal.form, idx);
        let val_style = match field {
            Field::Toggle(_) if text == "Enabled" => Style::default().fg(theme::SUCCESS_GREEN),
            Field::Toggle(_) => theme::muted(),
            Field::Number(_) | Field::Text(_) => theme::value(),
        };
        let cursor_mark = if is_focused && !matches!(field, Field::Toggle(_)) { "▎" } else { "" };

        lines.push(Line::from(vec![
            Span::styled(marker, lbl_style),
            Span::styled(format!("{:<14}", field.label()), lbl_style),
            Span::styled(text, val_style),
            Span::styled(cursor_mark, Style::default().fg(theme::ELECTRIC_YELLOW)),
        ]));
    }

    lines.push(Line::from(""));
    match &modal.status {
        ModalStatus::Editing => lines.push(Line::from("")),
        ModalStatus::Saving => {
            lines.push(Line::from(Span::styled("  Saving… (Esc to close)", theme::muted())));
            panel::render_throbber(frame, overlay, ctx);
        }
        ModalStatus::Failed(message) => lines.push(Line::from(Span::styled(
            format!("  {message}"),
            theme::error_text(),
        ))),
    }

    lines.push(Line::from(vec![
        Span::styled(" Tab", theme::key_hint_key()),
        Span::styled(" next  ", theme::key_hint()),
        Span::styled("Space", theme::key_hint_key()),
        Span::styled(" toggle  ", theme::key_hint()),
        Span::styled("Enter", theme::key_hint_key()),
        Span::styled(" save  ", theme::key_hint()),
        Span::styled("Esc", theme::key_hint_key()),
        Span::styled(" cancel", theme::key_hint()),
    ]));

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crossterm::event::KeyModifiers;
    use pretty_assertions::assert_eq;

    use bridgeview_core::GroupForm;
    use bridgeview_core::api::ConfigGroup;

    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn docs_modal() -> Modal {
        Modal::new(ModalForm::RegenerateDocs {
            output_dir: "docs".into(),
        })
    }

    #[test]
    fn typing_edits_the_focused_field() {
        let mut modal = docs_modal();
        let mut cursor = FormCursor::default();

        handle_key(&mut modal, &mut cursor, key(KeyCode::Char('/')));
        handle_key(&mut modal, &mut cursor, key(KeyCode::Char('x')));
        handle_key(&mut modal, &mut cursor, key(KeyCode::Backspace));

        assert_eq!(
            modal.form,
            ModalForm::RegenerateDocs {
                output_dir: "docs/".into()
            }
        );
    }

    #[test]
    fn enter_saves_current_values() {
        let mut modal = docs_modal();
        let mut cursor = FormCursor::default();

        let action = handle_key(&mut modal, &mut cursor, key(KeyCode::Enter));
        assert_eq!(
            action,
            Some(Action::Core(Command::RegenerateDocs {
                output_dir: "docs".into()
            }))
        );
    }

    #[test]
    fn numeric_fields_reject_letters_and_space_toggles() {
        let group = ConfigGroup {
            name: "heating".into(),
            display_name: None,
            description: None,
            priority: 1,
            default_polling_interval: Some(60),
            enabled: false,
            parameter_count: 4,
        };
        let mut modal = Modal::new(ModalForm::Group(GroupForm::from_group(&group)));
        let mut cursor = FormCursor::default();

        handle_key(&mut modal, &mut cursor, key(KeyCode::Backspace));
        handle_key(&mut modal, &mut cursor, key(KeyCode::Char('a')));
        handle_key(&mut modal, &mut cursor, key(KeyCode::Char('3')));
        handle_key(&mut modal, &mut cursor, key(KeyCode::Tab));
        handle_key(&mut modal, &mut cursor, key(KeyCode::Char(' ')));

        let ModalForm::Group(form) = &modal.form else {
            panic!("group form expected");
        };
        assert_eq!(form.default_polling_interval, "63");
        assert!(form.enabled);
    }

    #[test]
    fn saving_modal_still_closes_on_esc() {
        let mut modal = docs_modal();
        modal.status = ModalStatus::Saving;
        let mut cursor = FormCursor::default();

        assert_eq!(handle_key(&mut modal, &mut cursor, key(KeyCode::Char('x'))), None);
        assert_eq!(handle_key(&mut modal, &mut cursor, key(KeyCode::Enter)), None);
        assert_eq!(modal, {
            let mut m = docs_modal();
            m.status = ModalStatus::Saving;
            m
        });
        assert_eq!(
            handle_key(&mut modal, &mut cursor, key(KeyCode::Esc)),
            Some(Command::CloseModal.into())
        );
    }
}
