use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Cell, Paragraph, Row, Table},
};
use statlab_games::{
    Game, LevelError,
    chi_square::{ChiSquareChallenge, Decision},
};

use crate::{command::play::screens::game::GameView, view::widgets::KeyBinding};

const BINDINGS: &[KeyBinding<'static>] = &[
    KeyBinding::new(&["←", "i"], "Independent"),
    KeyBinding::new(&["→", "a"], "Associated"),
];

const LABEL_WIDTH: u16 = 16;
const CELL_WIDTH: u16 = 14;

impl GameView for ChiSquareChallenge {
    fn board_title(&self) -> &'static str {
        " Observed (expected) "
    }

    fn draw_board(&self, frame: &mut Frame, area: Rect) {
        let level = self.level();
        let readout = self.readout();
        let analysis = &readout.analysis;

        let header = Row::new(
            std::iter::once(Cell::from(""))
                .chain(level.col_labels.iter().map(|label| Cell::from(label.clone())))
                .chain([Cell::from("Total")]),
        )
        .style(Style::new().add_modifier(Modifier::BOLD))
        .height(1);

        let mut rows = level
            .observed
            .as_rows()
            .iter()
            .enumerate()
            .map(|(r, observed)| {
                let cells = observed.iter().enumerate().map(|(c, &count)| {
                    let text = Text::from(vec![
                        Line::raw(count.to_string()),
                        Line::styled(
                            format!("({:.1})", analysis.expected[r][c]),
                            Style::new().fg(Color::DarkGray),
                        ),
                    ]);
                    Cell::from(text).style(Style::new().bg(heat_color(analysis.intensity(r, c))))
                });
                Row::new(
                    std::iter::once(Cell::from(level.row_labels[r].clone()))
                        .chain(cells)
                        .chain([Cell::from(readout.row_totals[r].to_string())]),
                )
                .height(2)
            })
            .collect::<Vec<_>>();
        rows.push(
            Row::new(
                std::iter::once(Cell::from("Total"))
                    .chain(readout.col_totals.iter().map(|t| Cell::from(t.to_string())))
                    .chain([Cell::from(readout.grand_total.to_string())]),
            )
            .style(Style::new().add_modifier(Modifier::BOLD)),
        );

        let widths = std::iter::once(Constraint::Length(LABEL_WIDTH))
            .chain(level.col_labels.iter().map(|_| Constraint::Length(CELL_WIDTH)))
            .chain([Constraint::Length(CELL_WIDTH)]);
        let table = Table::new(rows, widths).header(header).column_spacing(1);

        let [table_area, legend_area] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(3)]).areas(area);
        frame.render_widget(table, table_area);

        let legend = Paragraph::new(vec![
            Line::raw("Shading: each cell's share of the chi-square statistic."),
            Line::from(vec![
                Span::styled("  low  ", Style::new().bg(heat_color(0.0))),
                Span::styled("  mid  ", Style::new().bg(heat_color(0.5))),
                Span::styled("  high  ", Style::new().bg(heat_color(1.0))),
            ]),
        ]);
        frame.render_widget(legend, legend_area);
    }

    fn readout_lines(&self) -> Vec<Line<'static>> {
        let readout = self.readout();
        let significance_color = if readout.analysis.is_significant() {
            Color::Green
        } else {
            Color::Gray
        };
        let answer = readout
            .decision
            .map_or_else(|| "not chosen".to_owned(), |d| d.to_string());
        vec![
            Line::raw(format!("χ² = {:.2}", readout.analysis.chi_square)),
            Line::raw(format!("df = {}", readout.analysis.degrees_of_freedom)),
            Line::raw(format!("p {}", readout.p_label)),
            Line::styled(readout.significance, Style::new().fg(significance_color)),
            Line::raw(""),
            Line::raw(format!("Your answer: {answer}")),
            Line::raw(format!(
                "Correct so far: {} / {}",
                self.correct_count(),
                self.progress().outcomes().len()
            )),
        ]
    }

    fn meter(&self) -> f64 {
        if self.decision().is_some() {
            100.0
        } else {
            0.0
        }
    }

    fn controls_height(&self) -> u16 {
        3
    }

    fn draw_controls(&self, frame: &mut Frame, area: Rect, _focus: usize) {
        let option = |decision: Decision| {
            let style = if self.decision() == Some(decision) {
                Style::new()
                    .fg(Color::Black)
                    .bg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::new().fg(Color::White)
            };
            Span::styled(format!(" {decision} "), style)
        };
        let line = Line::from(vec![
            option(Decision::Independent),
            Span::raw("   "),
            option(Decision::Associated),
        ])
        .centered();
        let controls = Paragraph::new(line).block(Block::bordered().title("Your verdict"));
        frame.render_widget(controls, area);
    }

    fn key_bindings(&self) -> &'static [KeyBinding<'static>] {
        BINDINGS
    }

    fn handle_key(&mut self, key: KeyEvent, _focus: &mut usize) -> Result<(), LevelError> {
        match key.code {
            KeyCode::Left | KeyCode::Char('i') => self.decide(Decision::Independent),
            KeyCode::Right | KeyCode::Char('a') => self.decide(Decision::Associated),
            _ => Ok(()),
        }
    }

    fn outcome_details(&self) -> Vec<Line<'static>> {
        let Some(correct) = self.progress().last_outcome().and_then(|o| o.correct) else {
            return vec![];
        };
        if correct {
            vec![Line::styled("Correct!", Style::new().fg(Color::Green))]
        } else {
            let answer = self.level().answer().to_string().to_lowercase();
            vec![Line::styled(
                format!("Not quite: the variables are {answer}."),
                Style::new().fg(Color::Red),
            )]
        }
    }

    fn summary(&self) -> String {
        format!(
            "Correct answers: {} / {}",
            self.correct_count(),
            self.progress().level_count()
        )
    }
}

/// Cell background for a contribution intensity in `[0, 1]`.
#[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn heat_color(intensity: f64) -> Color {
    let t = if intensity.is_finite() {
        intensity.clamp(0.0, 1.0)
    } else {
        0.0
    };
    let lerp = |from: f64, to: f64| (from + (to - from) * t).round() as u8;
    Color::Rgb(lerp(30.0, 200.0), lerp(30.0, 40.0), lerp(40.0, 60.0))
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyModifiers;
    use statlab_games::chi_square::builtin_levels;

    use super::*;

    #[test]
    fn test_keys_choose_decision() {
        let mut game = ChiSquareChallenge::new(builtin_levels()).unwrap();
        let mut focus = 0;
        assert_eq!(game.meter(), 0.0);
        let key = KeyEvent::new(KeyCode::Char('i'), KeyModifiers::NONE);
        game.handle_key(key, &mut focus).unwrap();
        assert_eq!(game.decision(), Some(Decision::Independent));
        let key = KeyEvent::new(KeyCode::Right, KeyModifiers::NONE);
        game.handle_key(key, &mut focus).unwrap();
        assert_eq!(game.decision(), Some(Decision::Associated));
        assert_eq!(game.meter(), 100.0);
    }

    #[test]
    fn test_wrong_answer_explains() {
        let mut game = ChiSquareChallenge::new(builtin_levels()).unwrap();
        game.decide(Decision::Independent).unwrap();
        game.complete_level().unwrap();
        let details = game.outcome_details();
        assert_eq!(
            details[0].to_string(),
            "Not quite: the variables are associated."
        );
    }

    #[test]
    fn test_heat_color_bounds() {
        assert_eq!(heat_color(0.0), Color::Rgb(30, 30, 40));
        assert_eq!(heat_color(1.0), Color::Rgb(200, 40, 60));
        assert_eq!(heat_color(f64::NAN), heat_color(0.0));
    }
}
