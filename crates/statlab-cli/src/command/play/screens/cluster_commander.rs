use crossterm::event::KeyEvent;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    text::Line,
};
use statlab_games::{LevelError, cluster_commander::ClusterCommander};
use statlab_stats::anova::MIN_SD;

use crate::{
    command::play::screens::game::{GameView, SLIDER_BINDINGS, handle_slider_key},
    view::widgets::{BellCurves, Curve, KeyBinding, SliderPanel},
};

const GROUP_COLORS: [Color; 3] = [Color::Cyan, Color::Yellow, Color::Magenta];
const GROUP_NAMES: [&str; 3] = ["Group 1", "Group 2", "Group 3"];

impl GameView for ClusterCommander {
    fn board_title(&self) -> &'static str {
        " Three groups "
    }

    fn draw_board(&self, frame: &mut Frame, area: Rect) {
        let curves = self
            .settings()
            .groups()
            .iter()
            .zip(GROUP_NAMES)
            .zip(GROUP_COLORS)
            .map(|((group, name), color)| Curve {
                name,
                mean: group.mean,
                sd: group.sd.max(MIN_SD),
                color,
            })
            .collect::<Vec<_>>();
        frame.render_widget(BellCurves::new(&curves), area);
    }

    fn readout_lines(&self) -> Vec<Line<'static>> {
        let readout = self.readout();
        let anova = &readout.anova;
        let f_color = if readout.gate_open {
            Color::Green
        } else {
            Color::Gray
        };
        vec![
            Line::raw(format!("Group offset: ±{:.1}", readout.offset)),
            Line::raw(format!("Group SD: {:.1}", readout.settings.sd)),
            Line::raw(""),
            Line::raw(format!(
                "MS between = {:.1} (df {})",
                anova.ms_between, anova.df_between
            )),
            Line::raw(format!(
                "MS within = {:.1} (df {})",
                anova.ms_within, anova.df_within
            )),
            Line::styled(
                format!("F = {:.2}", anova.f_ratio),
                Style::new().fg(f_color),
            ),
            Line::raw(format!("Critical F = {:.1}", readout.critical_f)),
            Line::raw(format!("p {}", readout.p_label)),
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

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyModifiers};
    use statlab_games::{Tunable, cluster_commander::builtin_levels};

    use super::*;

    #[test]
    fn test_readout_shows_anova() {
        let mut game = ClusterCommander::new(builtin_levels()).unwrap();
        let mut focus = 0;
        let key = KeyEvent::new(KeyCode::End, KeyModifiers::NONE);
        game.handle_key(key, &mut focus).unwrap();
        let param = game.unlocked_params()[0];
        assert_eq!(game.value(param), game.range(param).max);
        let lines = game
            .readout_lines()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>();
        let readout = game.readout();
        assert_eq!(lines[5], format!("F = {:.2}", readout.anova.f_ratio));
        assert_eq!(lines[6], "Critical F = 3.2");
    }
}
