use crossterm::event::{Event, KeyCode};
use ratatui::{
    Frame,
    layout::{Constraint, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph},
};
use statlab_games::{GameKind, LevelOutcome};
use statlab_tui::{RenderMode, Runtime, Screen, ScreenTransition};

use crate::view::widgets::{KeyBinding, KeyBindingDisplay, popup_area};

/// End-of-game summary.
#[derive(Debug)]
pub(crate) struct FinishedScreen {
    kind: GameKind,
    summary: String,
    outcomes: Vec<LevelOutcome>,
}

impl FinishedScreen {
    pub(crate) fn new(kind: GameKind, summary: String, outcomes: Vec<LevelOutcome>) -> Self {
        Self {
            kind,
            summary,
            outcomes,
        }
    }

    fn outcome_line(outcome: &LevelOutcome) -> Line<'static> {
        let mut spans = vec![Span::raw(format!(
            "  Level {}: {:<24}",
            outcome.level + 1,
            outcome.title
        ))];
        if let Some(score) = outcome.score {
            spans.push(Span::styled(
                format!(" {score:>6} pts"),
                Style::new().fg(Color::Yellow),
            ));
        }
        match outcome.correct {
            Some(true) => spans.push(Span::styled(" ✔ correct", Style::new().fg(Color::Green))),
            Some(false) => spans.push(Span::styled(" ✘ incorrect", Style::new().fg(Color::Red))),
            None => {}
        }
        Line::from(spans)
    }
}

impl Screen for FinishedScreen {
    fn on_active(&mut self, runtime: &mut Runtime) {
        runtime.set_render_mode(RenderMode::OnDirty);
        log::info!("{}: finished, {}", self.kind, self.summary);
    }

    fn on_inactive(&mut self, _runtime: &mut Runtime) {}

    fn on_close(&mut self, _runtime: &mut Runtime) {}

    fn handle_event(&mut self, _runtime: &mut Runtime, event: &Event) -> ScreenTransition {
        if let Some(key) = event.as_key_event() {
            match key.code {
                KeyCode::Enter | KeyCode::Esc | KeyCode::Char('q') => {
                    return ScreenTransition::Pop;
                }
                _ => {}
            }
        }
        ScreenTransition::Stay
    }

    fn draw(&self, frame: &mut Frame) {
        let [main_area, help_area] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(frame.area());
        let height = u16::try_from(self.outcomes.len())
            .unwrap_or(u16::MAX)
            .saturating_add(6);
        let area = popup_area(main_area, Constraint::Length(64), Constraint::Length(height));

        let mut lines = vec![
            Line::styled(
                self.summary.clone(),
                Style::new().fg(Color::Green).add_modifier(Modifier::BOLD),
            )
            .centered(),
            Line::raw(""),
        ];
        lines.extend(self.outcomes.iter().map(Self::outcome_line));
        let summary = Paragraph::new(lines).block(
            Block::bordered().title(format!(" {} complete ", self.kind.title())),
        );
        frame.render_widget(summary, area);

        let bindings = [KeyBinding::new(&["Enter", "q"], "Back")];
        frame.render_widget(KeyBindingDisplay::new(&bindings), help_area);
    }
}
