use crossterm::event::KeyEvent;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    symbols::Marker,
    text::Line,
    widgets::{Axis, Chart, Dataset, GraphType},
};
use statlab_games::{
    LevelError,
    mirror_match::{ALPHA, MirrorMatch},
};
use statlab_stats::{
    descriptive::{self, DescriptiveStats},
    t_test::TTest,
};

use crate::{
    command::play::screens::game::{GameView, SLIDER_BINDINGS, handle_slider_key},
    view::widgets::{KeyBinding, SliderPanel},
};

const MARGIN: f64 = 5.0;

impl GameView for MirrorMatch {
    fn board_title(&self) -> &'static str {
        " Before → After, one line per subject "
    }

    fn draw_board(&self, frame: &mut Frame, area: Rect) {
        let readout = self.readout();
        let segments = readout
            .before
            .iter()
            .zip(&readout.after)
            .map(|(&before, &after)| [(0.0, before), (1.0, after)])
            .collect::<Vec<_>>();
        let means = [
            (0.0, descriptive::mean(&readout.before).unwrap_or(0.0)),
            (1.0, descriptive::mean(&readout.after).unwrap_or(0.0)),
        ];

        let mut datasets = segments
            .iter()
            .map(|segment| {
                let color = if segment[1].1 >= segment[0].1 {
                    Color::Green
                } else {
                    Color::Red
                };
                Dataset::default()
                    .marker(Marker::Braille)
                    .graph_type(GraphType::Line)
                    .style(Style::new().fg(color))
                    .data(segment)
            })
            .collect::<Vec<_>>();
        datasets.push(
            Dataset::default()
                .name("Group means")
                .marker(Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::new().fg(Color::White))
                .data(&means),
        );

        let [lo, hi] = y_bounds(&readout.before, &readout.after);
        let chart = Chart::new(datasets)
            .x_axis(
                Axis::default()
                    .bounds([-0.1, 1.1])
                    .labels(["Before", "After"]),
            )
            .y_axis(Axis::default().bounds([lo, hi]).labels([
                format!("{lo:.0}"),
                format!("{:.0}", f64::midpoint(lo, hi)),
                format!("{hi:.0}"),
            ]));
        frame.render_widget(chart, area);
    }

    fn readout_lines(&self) -> Vec<Line<'static>> {
        let readout = self.readout();
        let mut lines = vec![
            Line::raw(format!("Correlation: {:.0}%", readout.correlation)),
            Line::raw(""),
        ];
        lines.extend(test_lines("Independent t-test", &readout.independent));
        lines.push(Line::raw(""));
        lines.extend(test_lines("Paired t-test", &readout.paired));
        lines.push(Line::raw(""));
        lines.extend(summary_line("Before", &readout.before));
        lines.extend(summary_line("After", &readout.after));
        lines
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

fn test_lines(title: &'static str, test: &TTest) -> [Line<'static>; 3] {
    let verdict = if test.is_significant(ALPHA) {
        Line::styled("  significant", Style::new().fg(Color::Green))
    } else {
        Line::styled("  not significant", Style::new().fg(Color::Gray))
    };
    [
        Line::raw(title),
        Line::raw(format!(
            "  t = {:.2}, df = {}, p = {:.3}",
            test.t, test.df, test.p
        )),
        verdict,
    ]
}

fn summary_line(label: &str, values: &[f64]) -> Option<Line<'static>> {
    let stats = DescriptiveStats::new(values.iter().copied())?;
    Some(Line::raw(format!(
        "{label}: mean {:.1}, sd {:.1}, range {:.0} to {:.0}",
        stats.mean, stats.std_dev, stats.min, stats.max
    )))
}

fn y_bounds(before: &[f64], after: &[f64]) -> [f64; 2] {
    let values = || before.iter().chain(after).copied();
    let lo = values().fold(f64::INFINITY, f64::min);
    let hi = values().fold(f64::NEG_INFINITY, f64::max);
    if lo.is_finite() && hi.is_finite() {
        [lo - MARGIN, hi + MARGIN]
    } else {
        [0.0, 100.0]
    }
}

#[cfg(test)]
mod tests {
    use statlab_games::{
        GameSeed, Tunable,
        mirror_match::{MirrorParam, builtin_levels},
    };

    use super::*;

    #[test]
    fn test_full_correlation_turns_paired_significant() {
        let mut game = MirrorMatch::new(builtin_levels(), GameSeed::from_bytes([3; 16])).unwrap();
        game.set(MirrorParam::Correlation, 100.0).unwrap();
        let lines = game
            .readout_lines()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>();
        assert_eq!(lines[0], "Correlation: 100%");
        assert_eq!(lines[6], "Paired t-test");
        assert_eq!(lines[8], "  significant");
        assert_eq!(game.meter(), 100.0);
    }

    #[test]
    fn test_group_summaries() {
        assert_eq!(
            summary_line("Before", &[10.0, 20.0, 30.0]).unwrap().to_string(),
            "Before: mean 20.0, sd 10.0, range 10 to 30"
        );
        assert!(summary_line("After", &[]).is_none());

        let game = MirrorMatch::new(builtin_levels(), GameSeed::from_bytes([3; 16])).unwrap();
        let lines = game.readout_lines();
        assert!(lines[10].to_string().starts_with("Before: mean "));
        assert!(lines[11].to_string().starts_with("After: mean "));
    }

    #[test]
    fn test_y_bounds_pad_data() {
        assert_eq!(y_bounds(&[10.0, 20.0], &[15.0, 30.0]), [5.0, 35.0]);
        assert_eq!(y_bounds(&[], &[]), [0.0, 100.0]);
    }
}
