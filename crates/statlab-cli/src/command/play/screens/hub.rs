use crossterm::event::{Event, KeyCode};
use ratatui::{
    Frame,
    layout::{Constraint, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, List, ListItem, ListState},
};
use statlab_games::{Catalog, GameKind, GameSeed};
use statlab_tui::{RenderMode, Runtime, Screen, ScreenTransition};

use crate::{
    command::play::screens,
    view::widgets::{KeyBinding, KeyBindingDisplay},
};

const BINDINGS: &[KeyBinding<'static>] = &[
    KeyBinding::new(&["↑", "↓"], "Select"),
    KeyBinding::new(&["Enter"], "Play"),
    KeyBinding::new(&["q", "Esc"], "Quit"),
];

/// Game selection menu.
#[derive(Debug)]
pub(crate) struct HubScreen {
    catalog: Catalog,
    seed: GameSeed,
    selected: usize,
    status: Option<String>,
}

impl HubScreen {
    pub(crate) fn new(catalog: Catalog, seed: GameSeed) -> Self {
        Self {
            catalog,
            seed,
            selected: 0,
            status: None,
        }
    }

    fn selected_game(&self) -> GameKind {
        GameKind::ALL[self.selected]
    }

    fn start_selected(&mut self) -> ScreenTransition {
        let game = self.selected_game();
        match screens::game_screen(game, &self.catalog, self.seed) {
            Ok(screen) => {
                self.status = None;
                ScreenTransition::Push(screen)
            }
            Err(err) => {
                log::warn!("{game}: cannot start: {err}");
                self.status = Some(format!("Cannot start {}: {err}", game.title()));
                ScreenTransition::Stay
            }
        }
    }
}

impl Screen for HubScreen {
    fn on_active(&mut self, runtime: &mut Runtime) {
        runtime.set_render_mode(RenderMode::OnDirty);
    }

    fn on_inactive(&mut self, _runtime: &mut Runtime) {}

    fn on_close(&mut self, _runtime: &mut Runtime) {}

    fn handle_event(&mut self, _runtime: &mut Runtime, event: &Event) -> ScreenTransition {
        let Some(key) = event.as_key_event() else {
            return ScreenTransition::Stay;
        };
        let count = GameKind::ALL.len();
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return ScreenTransition::Exit,
            KeyCode::Up => self.selected = self.selected.checked_sub(1).unwrap_or(count - 1),
            KeyCode::Down => self.selected = (self.selected + 1) % count,
            KeyCode::Enter => return self.start_selected(),
            _ => {}
        }
        ScreenTransition::Stay
    }

    fn draw(&self, frame: &mut Frame) {
        let [title_area, list_area, status_area, help_area] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Fill(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        let title = Text::from(vec![
            Line::styled(
                "statlab",
                Style::new().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Line::styled(
                format!("Statistics mini-games (seed {})", self.seed),
                Style::new().fg(Color::DarkGray),
            ),
        ])
        .centered();
        frame.render_widget(title, title_area);

        let items = GameKind::ALL
            .iter()
            .map(|&game| {
                ListItem::new(vec![
                    Line::from(vec![
                        Span::styled(game.title(), Style::new().add_modifier(Modifier::BOLD)),
                        Span::styled(
                            format!("  ({} levels)", self.catalog.level_count(game)),
                            Style::new().fg(Color::DarkGray),
                        ),
                    ]),
                    Line::styled(
                        format!("   {}", game.concept()),
                        Style::new().fg(Color::Gray),
                    ),
                ])
            })
            .collect::<Vec<_>>();
        let list = List::new(items)
            .block(Block::bordered().title(" Games "))
            .highlight_style(Style::new().fg(Color::Yellow))
            .highlight_symbol(">> ");
        let mut state = ListState::default();
        state.select(Some(self.selected));
        frame.render_stateful_widget(list, list_area, &mut state);

        if let Some(status) = &self.status {
            let status = Text::from(status.as_str())
                .style(Style::new().fg(Color::Red))
                .centered();
            frame.render_widget(status, status_area);
        }
        frame.render_widget(KeyBindingDisplay::new(BINDINGS), help_area);
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyEvent, KeyModifiers};

    use super::*;

    fn press(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn hub() -> HubScreen {
        HubScreen::new(Catalog::builtin(), GameSeed::from_bytes([1; 16]))
    }

    #[test]
    fn test_selection_wraps() {
        let mut hub = hub();
        let mut runtime = Runtime::new();
        hub.handle_event(&mut runtime, &press(KeyCode::Up));
        assert_eq!(hub.selected_game(), GameKind::MirrorMatch);
        hub.handle_event(&mut runtime, &press(KeyCode::Down));
        assert_eq!(hub.selected_game(), GameKind::VarianceExplorer);
    }

    #[test]
    fn test_enter_pushes_game() {
        let mut hub = hub();
        let mut runtime = Runtime::new();
        hub.handle_event(&mut runtime, &press(KeyCode::Down));
        let transition = hub.handle_event(&mut runtime, &press(KeyCode::Enter));
        assert!(matches!(transition, ScreenTransition::Push(_)));
    }

    #[test]
    fn test_unplayable_level_is_reported() {
        let mut catalog = Catalog::builtin();
        catalog.mirror_match[0].n = 1;
        let mut hub = HubScreen::new(catalog, GameSeed::from_bytes([1; 16]));
        let mut runtime = Runtime::new();
        hub.handle_event(&mut runtime, &press(KeyCode::Up));
        let transition = hub.handle_event(&mut runtime, &press(KeyCode::Enter));
        assert!(matches!(transition, ScreenTransition::Stay));
        assert!(hub.status.as_deref().unwrap().starts_with("Cannot start Mirror Match"));
    }

    #[test]
    fn test_quit_exits() {
        let mut hub = hub();
        let mut runtime = Runtime::new();
        let transition = hub.handle_event(&mut runtime, &press(KeyCode::Esc));
        assert!(matches!(transition, ScreenTransition::Exit));
    }
}
