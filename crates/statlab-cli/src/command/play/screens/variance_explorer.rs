use crossterm::event::{
    KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    symbols::Marker,
    text::Line,
    widgets::{
        Block, Paragraph,
        canvas::{Canvas, Line as CanvasLine, Points},
    },
};
use statlab_games::{
    Game, LevelError,
    variance_explorer::{self, VarianceExplorer},
};
use statlab_stats::projection;

use crate::{command::play::screens::game::GameView, view::widgets::KeyBinding};

/// Half the width of the plotted square, in data units.
const PLOT_EXTENT: f64 = 200.0;
const AXIS_LENGTH: f64 = 190.0;

const BINDINGS: &[KeyBinding<'static>] = &[
    KeyBinding::new(&["←", "→"], "Rotate 1°"),
    KeyBinding::new(&["Shift"], "5°"),
    KeyBinding::new(&["Mouse"], "Drag axis"),
];

impl GameView for VarianceExplorer {
    fn board_title(&self) -> &'static str {
        " Data "
    }

    fn draw_board(&self, frame: &mut Frame, area: Rect) {
        let total = self.points().len();
        let points = self
            .points()
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let hue = variance_explorer::point_hue(i, total);
                ((p.x, p.y), hsl_color(hue, 0.7, 0.6))
            })
            .collect::<Vec<_>>();
        let pc1 = axis_segment(self.angle());
        let pc2 = self
            .shows_pc2()
            .then(|| axis_segment(projection::perpendicular(self.angle())));

        let canvas = Canvas::default()
            .marker(Marker::Braille)
            .x_bounds([-PLOT_EXTENT, PLOT_EXTENT])
            .y_bounds([-PLOT_EXTENT, PLOT_EXTENT])
            .paint(|ctx| {
                for &(coords, color) in &points {
                    ctx.draw(&Points {
                        coords: &[coords],
                        color,
                    });
                }
                ctx.layer();
                ctx.draw(&CanvasLine::new(pc1.0, pc1.1, pc1.2, pc1.3, Color::Yellow));
                if let Some(pc2) = pc2 {
                    ctx.draw(&CanvasLine::new(pc2.0, pc2.1, pc2.2, pc2.3, Color::Magenta));
                }
            });
        frame.render_widget(canvas, area);
    }

    fn readout_lines(&self) -> Vec<Line<'static>> {
        let readout = self.readout();
        let mut lines = vec![
            Line::raw(format!("Axis angle:    {:6.1}°", readout.angle)),
            Line::styled(
                format!("PC1 variance:  {:6.1}%", readout.pc1_percent),
                Style::new().fg(Color::Yellow),
            ),
        ];
        if let (Some(pc2), Some(combined)) = (readout.pc2_percent, readout.combined_percent) {
            lines.push(Line::styled(
                format!("PC2 variance:  {pc2:6.1}%"),
                Style::new().fg(Color::Magenta),
            ));
            lines.push(Line::raw(format!("PC1 + PC2:     {combined:6.1}%")));
        }
        lines.extend([
            Line::raw(""),
            Line::raw(format!("Target:       ≥{:5.1}%", readout.target_percent)),
            Line::raw(format!("Total score:   {}", self.total_score())),
        ]);
        lines
    }

    fn meter(&self) -> f64 {
        self.readout().fill
    }

    fn controls_height(&self) -> u16 {
        3
    }

    fn draw_controls(&self, frame: &mut Frame, area: Rect, _focus: usize) {
        let line = Line::raw(format!(
            "Rotate the yellow axis to capture the most variance ({:.1}°)",
            self.angle()
        ));
        let controls = Paragraph::new(line).block(Block::bordered().title("Controls"));
        frame.render_widget(controls, area);
    }

    fn key_bindings(&self) -> &'static [KeyBinding<'static>] {
        BINDINGS
    }

    fn handle_key(&mut self, key: KeyEvent, _focus: &mut usize) -> Result<(), LevelError> {
        let step = if key.modifiers.contains(KeyModifiers::SHIFT) {
            5.0
        } else {
            1.0
        };
        match key.code {
            KeyCode::Left => self.rotate_by(step),
            KeyCode::Right => self.rotate_by(-step),
            KeyCode::Up => self.rotate_by(5.0),
            KeyCode::Down => self.rotate_by(-5.0),
            _ => Ok(()),
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent, board: Rect) -> Result<(), LevelError> {
        if !matches!(
            mouse.kind,
            MouseEventKind::Down(MouseButton::Left) | MouseEventKind::Drag(MouseButton::Left)
        ) {
            return Ok(());
        }
        match pointer_offset(board, mouse.column, mouse.row) {
            Some((dx, dy)) => self.set_angle_from_pointer(dx, dy),
            None => Ok(()),
        }
    }

    fn outcome_details(&self) -> Vec<Line<'static>> {
        let Some(score) = self.last_score() else {
            return vec![];
        };
        vec![
            Line::raw(format!("Accuracy score: {}", score.base)),
            Line::raw(format!("Bonus:          {}", score.bonus)),
            Line::styled(
                format!("Total score:    {}", self.total_score()),
                Style::new().fg(Color::Yellow),
            ),
        ]
    }

    fn summary(&self) -> String {
        format!("Total score: {}", self.progress().total_score())
    }
}

/// End points of an axis through the origin.
fn axis_segment(angle_deg: f64) -> (f64, f64, f64, f64) {
    let (sin, cos) = angle_deg.to_radians().sin_cos();
    let (x, y) = (cos * AXIS_LENGTH, sin * AXIS_LENGTH);
    (-x, -y, x, y)
}

/// Maps a terminal cell inside the plot to data coordinates, y up.
///
/// The canvas stretches the plotted square over the whole area, so the
/// inverse mapping keeps the dragged axis under the pointer.
fn pointer_offset(area: Rect, column: u16, row: u16) -> Option<(f64, f64)> {
    if area.width == 0 || area.height == 0 || !area.contains((column, row).into()) {
        return None;
    }
    let width = f64::from(area.width);
    let height = f64::from(area.height);
    let x = (f64::from(column - area.x) + 0.5) / width;
    let y = (f64::from(row - area.y) + 0.5) / height;
    Some(((x - 0.5) * 2.0 * PLOT_EXTENT, (0.5 - y) * 2.0 * PLOT_EXTENT))
}

/// Converts HSL (hue in degrees, saturation and lightness in `[0, 1]`) to a terminal color.
#[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn hsl_color(hue: f64, saturation: f64, lightness: f64) -> Color {
    let chroma = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
    let sector = hue.rem_euclid(360.0) / 60.0;
    let x = chroma * (1.0 - (sector % 2.0 - 1.0).abs());
    let (r, g, b) = match sector {
        s if s < 1.0 => (chroma, x, 0.0),
        s if s < 2.0 => (x, chroma, 0.0),
        s if s < 3.0 => (0.0, chroma, x),
        s if s < 4.0 => (0.0, x, chroma),
        s if s < 5.0 => (x, 0.0, chroma),
        _ => (chroma, 0.0, x),
    };
    let m = lightness - chroma / 2.0;
    let channel = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    Color::Rgb(channel(r), channel(g), channel(b))
}
