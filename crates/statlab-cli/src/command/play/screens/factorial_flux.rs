use crossterm::event::KeyEvent;
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Style},
    symbols::Marker,
    text::Line,
    widgets::{Axis, Chart, Dataset, GraphType, Paragraph},
};
use statlab_games::{
    LevelError,
    factorial_flux::{EFFECT_RANGE, FactorialFlux},
};

use crate::{
    command::play::screens::game::{GameView, SLIDER_BINDINGS, handle_slider_key},
    view::widgets::{KeyBinding, SliderPanel},
};

/// Largest possible cell mean: every effect at its limit.
const Y_LIMIT: f64 = EFFECT_RANGE.max * 3.0;

impl GameView for FactorialFlux {
    fn board_title(&self) -> &'static str {
        " Interaction plot "
    }

    fn draw_board(&self, frame: &mut Frame, area: Rect) {
        let readout = self.readout();
        let [chart_area, checklist_area] = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(u16::try_from(readout.conditions.len()).unwrap_or(0) + 1),
        ])
        .areas(area);

        let b1 = [(0.0, readout.cells.b1[0]), (1.0, readout.cells.b1[1])];
        let b2 = [(0.0, readout.cells.b2[0]), (1.0, readout.cells.b2[1])];
        let datasets = vec![
            Dataset::default()
                .name("B1")
                .marker(Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::new().fg(Color::Cyan))
                .data(&b1),
            Dataset::default()
                .name("B2")
                .marker(Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::new().fg(Color::Magenta))
                .data(&b2),
        ];
        let chart = Chart::new(datasets)
            .x_axis(
                Axis::default()
                    .title("Factor A")
                    .bounds([-0.1, 1.1])
                    .labels(["A1", "A2"]),
            )
            .y_axis(
                Axis::default()
                    .title("Mean")
                    .bounds([-Y_LIMIT, Y_LIMIT])
                    .labels([
                        format!("{:.0}", -Y_LIMIT),
                        "0".to_owned(),
                        format!("{Y_LIMIT:.0}"),
                    ]),
            );
        frame.render_widget(chart, chart_area);

        let checklist = std::iter::once(Line::raw("Pattern checklist:"))
            .chain(readout.conditions.iter().map(|condition| {
                let (mark, color) = if condition.met {
                    ("✔", Color::Green)
                } else {
                    ("✘", Color::Red)
                };
                Line::styled(
                    format!("  {mark} {}", condition.label),
                    Style::new().fg(color),
                )
            }))
            .collect::<Vec<_>>();
        frame.render_widget(Paragraph::new(checklist), checklist_area);
    }

    fn readout_lines(&self) -> Vec<Line<'static>> {
        let readout = self.readout();
        let cells = readout.cells;
        vec![
            Line::raw(format!("Main effect A: {:+.0}", readout.effects.a)),
            Line::raw(format!("Main effect B: {:+.0}", readout.effects.b)),
            Line::raw(format!("Interaction: {:+.0}", readout.effects.interaction)),
            Line::raw(""),
            Line::raw("Cell means     A1      A2"),
            Line::raw(format!("  B1      {:>7.0} {:>7.0}", cells.b1[0], cells.b1[1])),
            Line::raw(format!("  B2      {:>7.0} {:>7.0}", cells.b2[0], cells.b2[1])),
        ]
    }

    #[expect(clippy::cast_precision_loss)]
    fn meter(&self) -> f64 {
        let conditions = self.readout().conditions;
        if conditions.is_empty() {
            return 0.0;
        }
        let met = conditions.iter().filter(|c| c.met).count();
        met as f64 * 100.0 / conditions.len() as f64
    }

    fn controls_height(&self) -> u16 {
        SliderPanel::height(self)
    }

    fn draw_controls(&self, frame: &mut Frame, area: Rect, focus: usize) {
        frame.render_widget(SliderPanel::new(self, focus), area);
    }

    fn key_bindings(&self) -> &'static [KeyBinding<'static>] {
        SLIDER_BINDINGS
    }

    fn handle_key(&mut self, key: KeyEvent, focus: &mut usize) -> Result<(), LevelError> {
        handle_slider_key(self, key, focus)
    }
}

#[cfg(test)]
mod tests {
    use statlab_games::{
        Game, Tunable,
        factorial_flux::{FluxParam, builtin_levels},
    };

    use super::*;

    #[test]
    fn test_meter_counts_conditions() {
        let mut game = FactorialFlux::new(builtin_levels()).unwrap();
        game.set(FluxParam::A, 0.0).unwrap();
        game.set(FluxParam::B, 0.0).unwrap();
        game.set(FluxParam::Interaction, 0.0).unwrap();
        // Parallel lines: only the interaction condition holds
        assert!((game.meter() - 100.0 / 3.0).abs() < 1e-9);
        game.set(FluxParam::A, 30.0).unwrap();
        game.set(FluxParam::B, 30.0).unwrap();
        assert_eq!(game.meter(), 100.0);
        assert!(game.gate_open());
    }

    #[test]
    fn test_cell_means_table() {
        let mut game = FactorialFlux::new(builtin_levels()).unwrap();
        game.set(FluxParam::A, 10.0).unwrap();
        game.set(FluxParam::B, 20.0).unwrap();
        game.set(FluxParam::Interaction, 5.0).unwrap();
        let lines = game.readout_lines();
        assert_eq!(lines[0].to_string(), "Main effect A: +10");
        assert_eq!(lines[5].to_string(), "  B1          -25     -15");
        assert_eq!(lines[6].to_string(), "  B2            5      35");
    }
}
