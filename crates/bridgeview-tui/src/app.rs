//! Application core: event loop, screen management, action dispatch.
//!
//! The session owns all dashboard data. The app maps keys to commands,
//! feeds completed tasks back into the session, and turns notices into
//! toasts or a blocking dialog.

use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Tabs, Wrap},
};
use throbber_widgets_tui::ThrobberState;
use tokio::sync::mpsc;
use tracing::{debug, info};

use bridgeview_core::{Command, Notice, NoticeLevel, Session, ViewId};

use crate::action::Action;
use crate::component::{Component, RenderContext};
use crate::event::{Event, EventReader};
use crate::screens::{create_screens, detail};
use crate::theme;
use crate::tui::Tui;
use crate::widgets::centered;
use crate::widgets::modal::{self, FormCursor};

const TOAST_TTL: Duration = Duration::from_secs(3);

pub struct App {
    session: Session,
    /// Shown in the status bar.
    server: String,
    screens: HashMap<ViewId, Box<dyn Component>>,
    running: bool,
    help_visible: bool,
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
    /// Errors waiting to be acknowledged, oldest first.
    blocking: VecDeque<String>,
    toast: Option<(String, NoticeLevel, Instant)>,
    throbber: ThrobberState,
    form_cursor: FormCursor,
    needs_render: bool,
}

impl App {
    pub fn new(session: Session, server: String) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        Self {
            session,
            server,
            screens: create_screens().into_iter().collect(),
            running: true,
            help_visible: false,
            action_tx,
            action_rx,
            blocking: VecDeque::new(),
            toast: None,
            throbber: ThrobberState::default(),
            form_cursor: FormCursor::default(),
            needs_render: true,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::enter()?;

        let mut events = EventReader::new(
            Duration::from_millis(250), // 4 Hz tick
            Duration::from_millis(33),  // ~30 FPS render
        );

        let notices = self.session.start();
        self.handle_notices(notices);
        info!("TUI event loop started");

        while self.running {
            tokio::select! {
                event = events.next() => {
                    let Some(event) = event else {
                        break;
                    };
                    self.handle_event(event)?;
                }
                Some(outcome) = self.session.next_outcome() => {
                    let notices = self.session.apply(outcome);
                    self.handle_notices(notices);
                }
            }

            while let Ok(action) = self.action_rx.try_recv() {
                self.process_action(action);
                if !self.running {
                    break;
                }
            }
            if self.needs_render {
                tui.draw(|frame| self.render(frame))?;
                self.needs_render = false;
            }
        }

        drop(events);
        drop(tui);
        info!("TUI event loop ended");
        Ok(())
    }

    fn handle_event(&mut self, event: Event) -> Result<()> {
        let action = match event {
            Event::Key(key) => self.handle_key_event(key)?,
            Event::Resize(w, h) => Some(Action::Resize(w, h)),
            Event::Tick => Some(Action::Tick),
            Event::Render => Some(Action::Render),
        };
        if let Some(action) = action {
            self.action_tx.send(action)?;
        }
        Ok(())
    }

    /// Map a key to an action. Overlays capture input top-down: blocking
    /// notice, editor modal, help, sensor detail, then global keys, then
    /// the active screen.
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if key.modifiers == KeyModifiers::CONTROL && key.code == KeyCode::Char('c') {
            return Ok(Some(Action::Quit));
        }

        if !self.blocking.is_empty() {
            return Ok(match key.code {
                KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ') => Some(Action::DismissNotice),
                _ => None,
            });
        }

        if let Some(form) = self.session.state_mut().modal_mut() {
            return Ok(modal::handle_key(form, &mut self.form_cursor, key));
        }

        if self.help_visible {
            return Ok(match key.code {
                KeyCode::Esc | KeyCode::Char('?') => Some(Action::ToggleHelp),
                _ => None,
            });
        }

        if self.session.state().detail_sensor().is_some() {
            return Ok(match key.code {
                KeyCode::Esc | KeyCode::Enter => Some(Command::CloseSensorDetail.into()),
                KeyCode::Char('r') => Some(Command::Refresh.into()),
                KeyCode::Char('q') => Some(Action::Quit),
                _ => None,
            });
        }

        let active = self.session.state().view.active();
        match (key.modifiers, key.code) {
            (KeyModifiers::NONE, KeyCode::Char('q')) => return Ok(Some(Action::Quit)),
            (KeyModifiers::NONE, KeyCode::Char('?')) => return Ok(Some(Action::ToggleHelp)),
            (KeyModifiers::NONE, KeyCode::Char('r')) => return Ok(Some(Command::Refresh.into())),
            (KeyModifiers::NONE, KeyCode::Char(c @ '1'..='6')) => {
                let view = c
                    .to_digit(10)
                    .and_then(|d| u8::try_from(d).ok())
                    .and_then(ViewId::from_number);
                if let Some(view) = view {
                    return Ok(Some(Command::SelectTab(view).into()));
                }
            }
            (KeyModifiers::NONE, KeyCode::Tab) => {
                return Ok(Some(Command::SelectTab(active.next()).into()));
            }
            (_, KeyCode::BackTab) => {
                return Ok(Some(Command::SelectTab(active.prev()).into()));
            }
            _ => {}
        }

        let state = self.session.state();
        match self.screens.get_mut(&active) {
            Some(screen) => screen.handle_key_event(key, state),
            None => Ok(None),
        }
    }

    fn process_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.running = false,
            Action::Tick => {
                self.throbber.calc_next();
                if self
                    .toast
                    .as_ref()
                    .is_some_and(|(_, _, shown)| shown.elapsed() >= TOAST_TTL)
                {
                    self.toast = None;
                }
            }
            Action::Render | Action::Resize(..) => self.needs_render = true,
            Action::ToggleHelp => self.help_visible = !self.help_visible,
            Action::DismissNotice => {
                self.blocking.pop_front();
            }
            Action::Core(command) => self.dispatch(command),
        }
    }

    fn dispatch(&mut self, command: Command) {
        debug!(?command, "dispatching");
        if matches!(
            command,
            Command::OpenParameterEditor(_)
                | Command::OpenGroupEditor(_)
                | Command::OpenRegenerateDocs
        ) {
            self.form_cursor.reset();
        }
        let notices = self.session.dispatch(command);
        self.handle_notices(notices);
    }

    fn handle_notices(&mut self, notices: Vec<Notice>) {
        for notice in notices {
            match notice {
                Notice::Blocking(message) => {
                    info!(%message, "blocking notice");
                    self.blocking.push_back(message);
                }
                Notice::Toast { message, level } => {
                    self.toast = Some((message, level, Instant::now()));
                }
            }
        }
    }

    // ── Rendering ────────────────────────────────────────────────────

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        let state = self.session.state();
        let ctx = RenderContext {
            state,
            throbber: &self.throbber,
        };

        // Layout: [screen content] [tab bar] [status bar]
        let layout = Layout::vertical([
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);

        let active = state.view.active();
        if let Some(screen) = self.screens.get(&active) {
            screen.render(frame, layout[0], &ctx);
        }
        self.render_tab_bar(frame, layout[1], active);
        self.render_status_bar(frame, layout[2], active);

        // Overlays, last is topmost.
        if let Some(name) = state.detail_sensor() {
            detail::render(frame, layout[0], name, &ctx);
        }
        if let Some(form) = state.modal() {
            modal::render(frame, area, form, self.form_cursor, &ctx);
        }
        if let Some((message, level, _)) = &self.toast {
            render_toast(frame, area, message, *level);
        }
        if self.help_visible {
            self.render_help_overlay(frame, area, active);
        }
        if let Some(message) = self.blocking.front() {
            render_blocking(frame, area, message, self.blocking.len());
        }
    }

    #[allow(clippy::unused_self)]
    fn render_tab_bar(&self, frame: &mut Frame, area: Rect, active: ViewId) {
        let titles: Vec<Line> = ViewId::ALL
            .iter()
            .map(|&id| {
                Line::from(Span::styled(
                    format!(" {} {id} ", id.number()),
                    theme::tab(id == active),
                ))
            })
            .collect();

        let selected = ViewId::ALL.iter().position(|&v| v == active).unwrap_or(0);
        let tabs = Tabs::new(titles)
            .divider(Span::styled(" ", theme::key_hint()))
            .select(selected);
        frame.render_widget(tabs, area);
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect, active: ViewId) {
        let in_flight = self.session.in_flight();
        let activity = if in_flight > 0 {
            Span::styled(
                format!("◐ {in_flight} loading"),
                Style::default().fg(theme::ELECTRIC_YELLOW),
            )
        } else {
            Span::styled("● idle", Style::default().fg(theme::SUCCESS_GREEN))
        };

        let hints = if self.session.state().detail_sensor().is_some() {
            detail::HINTS
        } else {
            self.screens.get(&active).map_or(&[][..], |s| s.hints())
        };

        let mut spans = vec![
            Span::raw(" "),
            activity,
            Span::styled(format!(" │ {} │", self.server), theme::key_hint()),
        ];
        for (key, label) in hints {
            spans.push(Span::styled(format!(" {key}"), theme::key_hint_key()));
            spans.push(Span::styled(format!(" {label}"), theme::key_hint()));
        }
        spans.push(Span::styled("  ? help  q quit", theme::key_hint()));

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn render_help_overlay(&self, frame: &mut Frame, area: Rect, active: ViewId) {
        let global: &[(&str, &str)] = &[
            ("1-6", "Jump to view"),
            ("Tab", "Next view"),
            ("r", "Refresh"),
            ("Esc", "Close overlay"),
            ("?", "This help"),
            ("q", "Quit"),
        ];
        let local = self.screens.get(&active).map_or(&[][..], |s| s.hints());

        #[allow(clippy::cast_possible_truncation, clippy::as_conversions)]
        let height = (global.len() + local.len() + 9) as u16;
        let help_area = centered(area, 60, height);
        frame.render_widget(Clear, help_area);

        let block = Block::default()
            .title(" Keyboard Shortcuts ")
            .title_style(theme::title())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border(true))
            .style(Style::default().bg(theme::BG_DARK));
        let inner = block.inner(help_area);
        frame.render_widget(block, help_area);

        let section = |title: String, keys: &[(&str, &str)]| {
            let mut lines = vec![
                Line::from(Span::styled(
                    format!("  {title}"),
                    Style::default().fg(theme::NEON_CYAN),
                )),
                Line::from(Span::styled("  ─────────", theme::key_hint())),
            ];
            lines.extend(keys.iter().map(|(key, label)| {
                Line::from(vec![
                    Span::styled(format!("  {key:<10}"), theme::key_hint_key()),
                    Span::styled(label.to_string(), theme::key_hint()),
                ])
            }));
            lines
        };

        let mut lines = vec![Line::from("")];
        lines.extend(section("Global".into(), global));
        lines.push(Line::from(""));
        lines.extend(section(active.to_string(), local));
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "  Esc or ? to close",
            theme::key_hint(),
        )));
        frame.render_widget(Paragraph::new(lines), inner);
    }
}

/// Toast in the bottom-right corner, above the status bar.
#[allow(clippy::cast_possible_truncation, clippy::as_conversions)]
fn render_toast(frame: &mut Frame, area: Rect, message: &str, level: NoticeLevel) {
    let width = (message.chars().count() as u16 + 6).clamp(20, area.width.saturating_sub(2));
    let height = 3u16;
    let x = area.width.saturating_sub(width + 1);
    let y = area.height.saturating_sub(height + 2);
    let toast_area = Rect::new(area.x + x, area.y + y, width, height);

    let (color, icon) = theme::notice(level);
    frame.render_widget(Clear, toast_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
        .style(Style::default().bg(theme::BG_DARK));
    let inner = block.inner(toast_area);
    frame.render_widget(block, toast_area);

    let line = Line::from(vec![
        Span::styled(format!(" {icon} "), Style::default().fg(color)),
        Span::styled(message, Style::default().fg(theme::DIM_WHITE)),
    ]);
    frame.render_widget(Paragraph::new(line), inner);
}

/// Error dialog that holds all input until acknowledged.
fn render_blocking(frame: &mut Frame, area: Rect, message: &str, queued: usize) {
    let dialog = centered(area, 60, 8);
    frame.render_widget(Clear, dialog);

    let title = if queued > 1 {
        format!(" Error (1 of {queued}) ")
    } else {
        " Error ".to_owned()
    };
    let block = Block::default()
        .title(title)
        .title_style(theme::error_text())
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(theme::ERROR_RED))
        .style(Style::default().bg(theme::BG_DARK));
    let inner = block.inner(dialog);
    frame.render_widget(block, dialog);

    let layout = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).split(inner);
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            format!(" {message}"),
            Style::default().fg(theme::DIM_WHITE),
        )))
        .wrap(Wrap { trim: true }),
        layout[0],
    );
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(" Enter", theme::key_hint_key()),
            Span::styled(" dismiss", theme::key_hint()),
        ])),
        layout[1],
    );
}
