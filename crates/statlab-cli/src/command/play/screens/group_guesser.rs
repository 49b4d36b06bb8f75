use crossterm::event::KeyEvent;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    text::Line,
};
use statlab_games::{LevelError, group_guesser::GroupGuesser};

use crate::{
    command::play::screens::game::{GameView, SLIDER_BINDINGS, handle_slider_key},
    view::widgets::{BellCurves, Curve, KeyBinding, SliderPanel},
};

impl GameView for GroupGuesser {
    fn board_title(&self) -> &'static str {
        " Group distributions "
    }

    fn draw_board(&self, frame: &mut Frame, area: Rect) {
        let settings = self.settings();
        let curves = [
            Curve {
                name: "Control",
                mean: 0.0,
                sd: settings.sd,
                color: Color::Cyan,
            },
            Curve {
                name: "Treatment",
                mean: settings.mean_diff,
                sd: settings.sd,
                color: Color::Magenta,
            },
        ];
        frame.render_widget(BellCurves::new(&curves), area);
    }

    fn readout_lines(&self) -> Vec<Line<'static>> {
        let readout = self.readout();
        let p_color = if readout.gate_open {
            Color::Green
        } else {
            Color::Gray
        };
        vec![
            Line::raw(format!("Mean difference: {:.0}", readout.settings.mean_diff)),
            Line::raw(format!("Standard deviation: {:.0}", readout.settings.sd)),
            Line::raw(format!("Sample size per group: {}", readout.settings.n)),
            Line::raw(""),
            Line::raw(format!("t = {:.2}", readout.t)),
            Line::raw(format!("df = {}", readout.df)),
            Line::styled(format!("p {}", readout.p_label), Style::new().fg(p_color)),
            Line::raw(format!("Target: p < {}", readout.target_p)),
        ]
    }

    fn meter(&self) -> f64 {
        self.readout().meter
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
