use std::{cell::Cell, fmt};

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Text},
    widgets::{Block, Clear, Paragraph, Wrap},
};
use statlab_games::{Advance, Game, LevelError, Phase, Tunable};
use statlab_tui::{RenderMode, Runtime, Screen, ScreenTransition};

use crate::{
    command::play::screens::finished::FinishedScreen,
    view::widgets::{KeyBinding, KeyBindingDisplay, Meter, popup_area},
};

const FPS: f64 = 60.0;
const SIDE_PANEL_WIDTH: u16 = 46;

/// Game-specific rendering and input of a [`GameScreen`].
pub(crate) trait GameView: Game + fmt::Debug {
    fn board_title(&self) -> &'static str;

    /// Draws the game's data inside the board frame.
    fn draw_board(&self, frame: &mut Frame, area: Rect);

    fn readout_lines(&self) -> Vec<Line<'static>>;

    /// Meter fill in percent.
    fn meter(&self) -> f64;

    fn controls_height(&self) -> u16;

    fn draw_controls(&self, frame: &mut Frame, area: Rect, focus: usize);

    /// Bindings of the game's own keys, shown before the common ones.
    fn key_bindings(&self) -> &'static [KeyBinding<'static>];

    fn handle_key(&mut self, key: KeyEvent, focus: &mut usize) -> Result<(), LevelError>;

    /// Handles mouse input; `board` is the inner area of the board frame.
    fn handle_mouse(&mut self, _mouse: MouseEvent, _board: Rect) -> Result<(), LevelError> {
        Ok(())
    }

    /// Extra lines for the level-complete overlay.
    fn outcome_details(&self) -> Vec<Line<'static>> {
        vec![]
    }

    /// Headline of the finished screen.
    fn summary(&self) -> String {
        format!("All {} levels complete", self.progress().level_count())
    }
}

/// Plays one game: board, readout, controls and meter, with the
/// level-complete overlay drawn on top once a level is done.
#[derive(Debug)]
pub(crate) struct GameScreen<V> {
    game: V,
    focus: usize,
    status: Option<String>,
    board_area: Cell<Rect>,
}

impl<V> GameScreen<V>
where
    V: GameView + 'static,
{
    pub(crate) fn new(game: V) -> Self {
        Self {
            game,
            focus: 0,
            status: None,
            board_area: Cell::new(Rect::default()),
        }
    }

    #[cfg(test)]
    pub(crate) fn game(&self) -> &V {
        &self.game
    }

    #[cfg(test)]
    pub(crate) fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    fn report(&mut self, result: Result<(), LevelError>) {
        self.status = match result {
            Ok(()) => None,
            Err(err) => {
                log::debug!("{}: {err}", self.game.kind());
                Some(err.to_string())
            }
        };
    }

    fn handle_key(&mut self, key: KeyEvent) -> ScreenTransition {
        match (self.game.progress().phase(), key.code) {
            (_, KeyCode::Esc | KeyCode::Char('q')) => ScreenTransition::Pop,
            (Phase::Playing, KeyCode::Enter) => {
                let result = self.game.complete_level().map(|_| ());
                self.report(result);
                ScreenTransition::Stay
            }
            (Phase::Playing, _) => {
                let result = self.game.handle_key(key, &mut self.focus);
                self.report(result);
                ScreenTransition::Stay
            }
            (Phase::LevelComplete, KeyCode::Enter | KeyCode::Char(' ')) => self.advance(),
            _ => ScreenTransition::Stay,
        }
    }

    fn advance(&mut self) -> ScreenTransition {
        match self.game.advance() {
            Ok(Advance::Next(_)) => {
                self.focus = 0;
                self.status = None;
                ScreenTransition::Stay
            }
            Ok(Advance::Finished) => ScreenTransition::Replace(Box::new(FinishedScreen::new(
                self.game.kind(),
                self.game.summary(),
                self.game.progress().outcomes().to_vec(),
            ))),
            Err(err) => {
                self.report(Err(err));
                ScreenTransition::Stay
            }
        }
    }

    fn draw_header(&self, frame: &mut Frame, area: Rect) {
        let progress = self.game.progress();
        let title = format!(
            " {} - Level {}/{}: {} ",
            self.game.kind().title(),
            progress.level() + 1,
            progress.level_count(),
            self.game.level_title()
        );
        let header = Paragraph::new(self.game.objective().to_owned())
            .wrap(Wrap { trim: true })
            .block(
                Block::bordered()
                    .title(title)
                    .title_style(Style::new().add_modifier(Modifier::BOLD)),
            );
        frame.render_widget(header, area);
    }

    fn draw_outcome(&self, frame: &mut Frame) {
        let Some(outcome) = self.game.progress().last_outcome() else {
            return;
        };
        let area = popup_area(
            frame.area(),
            Constraint::Percentage(60),
            Constraint::Percentage(50),
        );
        let mut lines = vec![
            Line::styled(
                format!("Level {} complete: {}", outcome.level + 1, outcome.title),
                Style::new().fg(Color::Green).add_modifier(Modifier::BOLD),
            ),
            Line::raw(""),
        ];
        lines.extend(self.game.outcome_details());
        lines.push(Line::raw(""));
        lines.push(Line::styled(
            outcome.insight.clone(),
            Style::new().fg(Color::White),
        ));
        lines.push(Line::raw(""));
        let next = if self.game.progress().is_last_level() {
            "Press Enter to finish"
        } else {
            "Press Enter for the next level"
        };
        lines.push(Line::styled(next, Style::new().fg(Color::Cyan)).centered());

        let popup = Paragraph::new(Text::from(lines))
            .wrap(Wrap { trim: true })
            .block(Block::bordered().title(" Level Complete "));
        frame.render_widget(Clear, area);
        frame.render_widget(popup, area);
    }
}

impl<V> Screen for GameScreen<V>
where
    V: GameView + 'static,
{
    fn on_active(&mut self, runtime: &mut Runtime) {
        runtime.set_render_mode(RenderMode::throttled_from_rate(FPS));
        log::debug!("{}: screen active", self.game.kind());
    }

    fn on_inactive(&mut self, _runtime: &mut Runtime) {}

    fn on_close(&mut self, _runtime: &mut Runtime) {
        let progress = self.game.progress();
        log::info!(
            "{}: leaving after {} of {} levels",
            self.game.kind(),
            progress.outcomes().len(),
            progress.level_count()
        );
    }

    fn handle_event(&mut self, _runtime: &mut Runtime, event: &Event) -> ScreenTransition {
        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => self.handle_key(*key),
            Event::Mouse(mouse) if self.game.progress().phase().is_playing() => {
                let result = self.game.handle_mouse(*mouse, self.board_area.get());
                self.report(result);
                ScreenTransition::Stay
            }
            _ => ScreenTransition::Stay,
        }
    }

    fn draw(&self, frame: &mut Frame) {
        let [header_area, main_area, status_area, help_area] = Layout::vertical([
            Constraint::Length(4),
            Constraint::Fill(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(frame.area());
        let [board_area, side_area] =
            Layout::horizontal([Constraint::Fill(1), Constraint::Length(SIDE_PANEL_WIDTH)])
                .areas(main_area);
        let [readout_area, controls_area, meter_area] = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(self.game.controls_height()),
            Constraint::Length(3),
        ])
        .areas(side_area);

        self.draw_header(frame, header_area);

        let board = Block::bordered().title(self.game.board_title());
        let board_inner = board.inner(board_area);
        frame.render_widget(board, board_area);
        self.board_area.set(board_inner);
        self.game.draw_board(frame, board_inner);

        let readout = Paragraph::new(self.game.readout_lines())
            .wrap(Wrap { trim: false })
            .block(Block::bordered().title("Readout"));
        frame.render_widget(readout, readout_area);
        self.game.draw_controls(frame, controls_area, self.focus);
        frame.render_widget(
            Meter::new("Target", self.game.meter(), self.game.gate_open()),
            meter_area,
        );

        if let Some(status) = &self.status {
            let status = Text::from(status.as_str())
                .style(Style::new().fg(Color::Red))
                .centered();
            frame.render_widget(status, status_area);
        }

        let mut bindings = self.game.key_bindings().to_vec();
        bindings.extend([
            KeyBinding::new(&["Enter"], "Complete").enabled(self.game.gate_open()),
            KeyBinding::new(&["q", "Esc"], "Back"),
        ]);
        frame.render_widget(KeyBindingDisplay::new(&bindings), help_area);

        if self.game.progress().phase().is_level_complete() {
            self.draw_outcome(frame);
        }
    }
}

/// Bindings of [`handle_slider_key`].
pub(super) const SLIDER_BINDINGS: &[KeyBinding<'static>] = &[
    KeyBinding::new(&["↑", "↓"], "Select"),
    KeyBinding::new(&["←", "→"], "Adjust"),
    KeyBinding::new(&["Shift"], "x10"),
];

/// Slider input shared by the [`Tunable`] games.
///
/// `focus` indexes the unlocked parameters. Up/Down move the focus, Left/Right
/// step the focused parameter (ten steps with Shift), Home/End jump to the ends.
pub(super) fn handle_slider_key<T>(
    game: &mut T,
    key: KeyEvent,
    focus: &mut usize,
) -> Result<(), LevelError>
where
    T: Tunable,
{
    let params = game.unlocked_params();
    let Some(last) = params.len().checked_sub(1) else {
        return Ok(());
    };
    *focus = (*focus).min(last);
    let param = params[*focus];
    let steps = if key.modifiers.contains(KeyModifiers::SHIFT) {
        10
    } else {
        1
    };
    match key.code {
        KeyCode::Up | KeyCode::BackTab => *focus = focus.checked_sub(1).unwrap_or(last),
        KeyCode::Down | KeyCode::Tab => *focus = if *focus == last { 0 } else { *focus + 1 },
        KeyCode::Left => game.nudge(param, -steps)?,
        KeyCode::Right => game.nudge(param, steps)?,
        KeyCode::PageDown => game.nudge(param, -10)?,
        KeyCode::PageUp => game.nudge(param, 10)?,
        KeyCode::Home => game.set(param, game.range(param).min)?,
        KeyCode::End => game.set(param, game.range(param).max)?,
        _ => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use statlab_games::group_guesser::{self, GroupGuesser, GroupParam};

    use super::*;

    fn press(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn shift(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::SHIFT))
    }

    fn screen() -> GameScreen<GroupGuesser> {
        GameScreen::new(GroupGuesser::new(group_guesser::builtin_levels()).unwrap())
    }

    #[test]
    fn test_enter_with_closed_gate_reports() {
        let mut screen = screen();
        let mut runtime = Runtime::new();
        let transition = screen.handle_event(&mut runtime, &press(KeyCode::Enter));
        assert!(matches!(transition, ScreenTransition::Stay));
        assert_eq!(screen.status(), Some("level target not reached yet"));
        assert!(screen.game().progress().phase().is_playing());
    }

    #[test]
    fn test_slider_keys_complete_level() {
        let mut screen = screen();
        let mut runtime = Runtime::new();
        screen.handle_event(&mut runtime, &shift(KeyCode::Right));
        assert_eq!(screen.game().settings().mean_diff, 10.0);
        assert!(!screen.game().gate_open());
        screen.handle_event(&mut runtime, &press(KeyCode::Right));
        assert!(screen.game().gate_open());

        screen.handle_event(&mut runtime, &press(KeyCode::Enter));
        assert_eq!(screen.status(), None);
        assert!(screen.game().progress().phase().is_level_complete());

        // Sliders are frozen while the overlay is shown
        screen.handle_event(&mut runtime, &press(KeyCode::Right));
        assert_eq!(screen.game().settings().mean_diff, 11.0);

        screen.handle_event(&mut runtime, &press(KeyCode::Enter));
        assert_eq!(screen.game().progress().level(), 1);
        assert!(screen.game().progress().phase().is_playing());
    }

    #[test]
    fn test_locked_slider_is_not_offered() {
        let mut game = GroupGuesser::new(group_guesser::builtin_levels()).unwrap();
        let mut focus = 2;
        handle_slider_key(
            &mut game,
            KeyEvent::new(KeyCode::End, KeyModifiers::NONE),
            &mut focus,
        )
        .unwrap();
        assert_eq!(focus, 0);
        assert_eq!(game.value(GroupParam::MeanDiff), 50.0);
        assert_eq!(game.value(GroupParam::Sd), 20.0);
    }

    #[test]
    fn test_quit_pops() {
        let mut screen = screen();
        let mut runtime = Runtime::new();
        let transition = screen.handle_event(&mut runtime, &press(KeyCode::Char('q')));
        assert!(matches!(transition, ScreenTransition::Pop));
    }

    #[test]
    fn test_last_level_moves_to_finished_screen() {
        let mut screen = screen();
        let mut runtime = Runtime::new();
        for _ in 0..3 {
            for param in screen.game.unlocked_params() {
                let best = match param {
                    GroupParam::MeanDiff | GroupParam::N => screen.game.range(param).max,
                    GroupParam::Sd => screen.game.range(param).min,
                };
                screen.game.set(param, best).unwrap();
            }
            screen.handle_event(&mut runtime, &press(KeyCode::Enter));
            assert!(screen.game().progress().phase().is_level_complete());
            let transition = screen.handle_event(&mut runtime, &press(KeyCode::Enter));
            if screen.game().progress().phase().is_finished() {
                assert!(matches!(transition, ScreenTransition::Replace(_)));
                return;
            }
        }
        panic!("game did not finish");
    }
}
