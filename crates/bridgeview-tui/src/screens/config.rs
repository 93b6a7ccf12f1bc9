//! Config screen: groups on the left, parameters of the selected group on
//! the right.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::widgets::Paragraph;

use bridgeview_core::projection::{config_groups, config_parameters};
use bridgeview_core::table::{
    CONFIG_GROUP_COLUMNS, PARAMETER_COLUMNS, config_group_row, parameter_row,
};
use bridgeview_core::{Command, DashboardState, FilterUpdate, TableRow};

use crate::action::Action;
use crate::component::{Component, RenderContext};
use crate::screens::Selection;
use crate::widgets::panel::render_focusable_slot;
use crate::widgets::sub_tabs::render_filter_chips;
use crate::widgets::table::DataTable;

const GROUP_WIDTHS: [Constraint; 5] = [
    Constraint::Min(14),
    Constraint::Length(8),
    Constraint::Length(9),
    Constraint::Length(9),
    Constraint::Length(6),
];

const PARAM_WIDTHS: [Constraint; 6] = [
    Constraint::Min(16),
    Constraint::Length(12),
    Constraint::Length(8),
    Constraint::Length(9),
    Constraint::Length(9),
    Constraint::Length(6),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pane {
    Groups,
    Parameters,
}

pub struct ConfigScreen {
    focus: Pane,
    groups: Selection,
    params: Selection,
}

impl ConfigScreen {
    pub fn new() -> Self {
        Self {
            focus: Pane::Groups,
            groups: Selection::default(),
            params: Selection::default(),
        }
    }

    fn group_names(state: &DashboardState) -> Vec<String> {
        state.panels.config.data().map_or_else(Vec::new, |snap| {
            config_groups(snap).into_iter().map(|g| g.name.clone()).collect()
        })
    }

    fn param_names(state: &DashboardState) -> Vec<String> {
        state.panels.config.data().map_or_else(Vec::new, |snap| {
            config_parameters(snap, state.filters.config())
                .into_iter()
                .map(|p| p.name.clone())
                .collect()
        })
    }

    fn handle_groups_key(&mut self, key: KeyEvent, state: &DashboardState) -> Option<Action> {
        let names = Self::group_names(state);
        let current = names.get(self.groups.get(names.len()));
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                self.groups.move_by(1, names.len());
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.groups.move_by(-1, names.len());
                None
            }
            KeyCode::Enter => {
                let name = current?;
                let selected = state.filters.config().group.as_ref() == Some(name);
                self.params.top();
                let next = if selected { None } else { Some(name.clone()) };
                Some(Command::SetFilter(FilterUpdate::ConfigGroup(next)).into())
            }
            KeyCode::Char('e') => {
                current.map(|name| Command::OpenGroupEditor(name.clone()).into())
            }
            _ => None,
        }
    }

    fn handle_params_key(&mut self, key: KeyEvent, state: &DashboardState) -> Option<Action> {
        let names = Self::param_names(state);
        let current = names.get(self.params.get(names.len()));
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                self.params.move_by(1, names.len());
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.params.move_by(-1, names.len());
                None
            }
            KeyCode::Char('e') | KeyCode::Enter => {
                current.map(|name| Command::OpenParameterEditor(name.clone()).into())
            }
            KeyCode::Char(' ') => {
                current.map(|name| Command::ToggleParameter(name.clone()).into())
            }
            _ => None,
        }
    }
}

impl Component for ConfigScreen {
    fn handle_key_event(
        &mut self,
        key: KeyEvent,
        state: &DashboardState,
    ) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Char('h') | KeyCode::Left => {
                self.focus = Pane::Groups;
                None
            }
            KeyCode::Char('l') | KeyCode::Right => {
                self.focus = Pane::Parameters;
                None
            }
            KeyCode::Char('f') => {
                self.params.top();
                Some(Command::SetFilter(FilterUpdate::ConfigGroup(None)).into())
            }
            _ => match self.focus {
                Pane::Groups => self.handle_groups_key(key, state),
                Pane::Parameters => self.handle_params_key(key, state),
            },
        };
        Ok(action)
    }

    fn render(&self, frame: &mut Frame, area: Rect, ctx: &RenderContext<'_>) {
        let layout = Layout::vertical([Constraint::Length(1), Constraint::Min(3)]).split(area);
        let panes = Layout::horizontal([Constraint::Percentage(45), Constraint::Percentage(55)])
            .split(layout[1]);
        let filter = ctx.state.filters.config();

        let chips = render_filter_chips(&[(
            "Enter/f",
            "Group",
            filter.group.clone().unwrap_or_else(|| "all".into()),
        )]);
        frame.render_widget(Paragraph::new(chips), layout[0]);

        let slot = &ctx.state.panels.config;
        let on_groups = self.focus == Pane::Groups;
        let (groups_sel, params_sel) = (self.groups, self.params);

        render_focusable_slot(frame, panes[0], "Groups", slot, on_groups, ctx, |f, a, snap| {
            let rows: Vec<TableRow> =
                config_groups(snap).into_iter().map(config_group_row).collect();
            let mut table = DataTable::new(&CONFIG_GROUP_COLUMNS, &GROUP_WIDTHS, &rows)
                .empty("No parameter groups");
            if on_groups {
                table = table.selected(groups_sel.get(rows.len()));
            }
            table.render(f, a);
        });

        render_focusable_slot(frame, panes[1], "Parameters", slot, !on_groups, ctx, |f, a, snap| {
            let rows: Vec<TableRow> = config_parameters(snap, filter)
                .into_iter()
                .map(parameter_row)
                .collect();
            let mut table = DataTable::new(&PARAMETER_COLUMNS, &PARAM_WIDTHS, &rows)
                .empty("No parameters in this group");
            if !on_groups {
                table = table.selected(params_sel.get(rows.len()));
            }
            table.render(f, a);
        });
    }

    fn hints(&self) -> &'static [(&'static str, &'static str)] {
        &[
            ("h/l", "pane"),
            ("Enter", "select group / edit"),
            ("e", "edit"),
            ("Space", "toggle"),
            ("f", "all groups"),
        ]
    }
}
