//! Documentation screen: one sub-tab per document, scrollable text.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};

use bridgeview_core::api::{DocFormat, Documentation};
use bridgeview_core::{Command, DashboardState, DocType};

use crate::action::Action;
use crate::component::{Component, RenderContext};
use crate::theme;
use crate::widgets::panel::render_slot;
use crate::widgets::sub_tabs::render_sub_tabs;

const TABS: [(DocType, &str); 3] = [
    (DocType::Mqtt, "MQTT"),
    (DocType::Conversion, "Conversion"),
    (DocType::Troubleshooting, "Troubleshooting"),
];

pub struct DocsScreen {
    scroll: u16,
}

impl DocsScreen {
    pub fn new() -> Self {
        Self { scroll: 0 }
    }

    fn neighbour(current: DocType, forward: bool) -> DocType {
        let index = TABS.iter().position(|(t, _)| *t == current).unwrap_or(0);
        let step = if forward { 1 } else { TABS.len() - 1 };
        TABS[(index + step) % TABS.len()].0
    }
}

impl Component for DocsScreen {
    fn handle_key_event(
        &mut self,
        key: KeyEvent,
        state: &DashboardState,
    ) -> Result<Option<Action>> {
        let current = state.view.doc_tab();
        let action = match key.code {
            KeyCode::Char(']') | KeyCode::Right => {
                self.scroll = 0;
                Some(Command::SelectDocTab(Self::neighbour(current, true)).into())
            }
            KeyCode::Char('[') | KeyCode::Left => {
                self.scroll = 0;
                Some(Command::SelectDocTab(Self::neighbour(current, false)).into())
            }
            KeyCode::Char('j') | KeyCode::Down => {
                self.scroll = self.scroll.saturating_add(1);
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.scroll = self.scroll.saturating_sub(1);
                None
            }
            KeyCode::PageDown => {
                self.scroll = self.scroll.saturating_add(20);
                None
            }
            KeyCode::PageUp => {
                self.scroll = self.scroll.saturating_sub(20);
                None
            }
            KeyCode::Char('g') => Some(Command::OpenRegenerateDocs.into()),
            _ => None,
        };
        Ok(action)
    }

    fn render(&self, frame: &mut Frame, area: Rect, ctx: &RenderContext<'_>) {
        let layout = Layout::vertical([Constraint::Length(1), Constraint::Min(3)]).split(area);
        let active = ctx.state.view.doc_tab();

        frame.render_widget(Paragraph::new(render_sub_tabs(&TABS, &active)), layout[0]);

        let scroll = self.scroll;
        render_slot(frame, layout[1], "Documentation", &ctx.state.panels.docs, ctx, |f, a, doc| {
            let (doc_type, doc) = doc;
            if *doc_type != active {
                return;
            }
            let text = Paragraph::new(doc_lines(doc))
                .wrap(Wrap { trim: false })
                .scroll((scroll, 0));
            f.render_widget(text, a);
        });
    }

    fn hints(&self) -> &'static [(&'static str, &'static str)] {
        &[("[/]", "document"), ("j/k", "scroll"), ("g", "regenerate")]
    }
}

/// Plain text verbatim; Markdown with headings, bullets and code blocks
/// picked out.
fn doc_lines(doc: &Documentation) -> Vec<Line<'_>> {
    match doc.format {
        DocFormat::Text => doc.content.lines().map(Line::raw).collect(),
        DocFormat::Markdown => {
            let mut in_code = false;
            doc.content
                .lines()
                .map(|line| {
                    if line.trim_start().starts_with("```") {
                        in_code = !in_code;
                        return Line::styled(line, theme::muted());
                    }
                    if in_code {
                        return Line::styled(line, Style::default().fg(theme::ELECTRIC_YELLOW));
                    }
                    markdown_line(line)
                })
                .collect()
        }
    }
}

fn markdown_line(line: &str) -> Line<'_> {
    let trimmed = line.trim_start();
    if let Some(heading) = trimmed.strip_prefix('#') {
        let level = 1 + heading.chars().take_while(|c| *c == '#').count();
        let style = if level == 1 {
            theme::title().add_modifier(Modifier::UNDERLINED)
        } else {
            theme::title()
        };
        return Line::styled(heading.trim_start_matches('#').trim(), style);
    }
    if let Some(item) = trimmed.strip_prefix("- ").or_else(|| trimmed.strip_prefix("* ")) {
        return Line::from(vec![
            Span::styled("  • ", Style::default().fg(theme::CORAL)),
            Span::raw(item),
        ]);
    }
    Line::raw(line)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn markdown(content: &str) -> Documentation {
        Documentation {
            content: content.into(),
            format: DocFormat::Markdown,
        }
    }

    #[test]
    fn headings_drop_their_hashes() {
        let doc = markdown("# Topics\n## Sensors\nplain");
        let lines = doc_lines(&doc);
        let text: Vec<String> = lines.iter().map(ToString::to_string).collect();
        assert_eq!(text, vec!["Topics", "Sensors", "plain"]);
    }

    #[test]
    fn code_blocks_are_not_parsed_as_markdown() {
        let doc = markdown("```\n# not a heading\n```");
        let text: Vec<String> = doc_lines(&doc).iter().map(ToString::to_string).collect();
        assert_eq!(text[1], "# not a heading");
    }

    #[test]
    fn plain_text_is_verbatim() {
        let doc = Documentation {
            content: "# raw".into(),
            format: DocFormat::Text,
        };
        assert_eq!(doc_lines(&doc)[0].to_string(), "# raw");
    }

    #[test]
    fn tabs_wrap_around() {
        assert_eq!(DocsScreen::neighbour(DocType::Troubleshooting, true), DocType::Mqtt);
        assert_eq!(DocsScreen::neighbour(DocType::Mqtt, false), DocType::Troubleshooting);
    }
}
