use ratatui::{
    prelude::{Buffer, Rect},
    style::{Color, Style},
    widgets::{Block, Gauge, Widget},
};

/// Progress toward the level target.
///
/// Turns green once the gate is open.
#[derive(Debug)]
pub struct Meter<'a> {
    title: &'a str,
    percent: f64,
    gate_open: bool,
}

impl<'a> Meter<'a> {
    pub fn new(title: &'a str, percent: f64, gate_open: bool) -> Self {
        Self {
            title,
            percent,
            gate_open,
        }
    }
}

impl Widget for Meter<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let ratio = if self.percent.is_finite() {
            (self.percent / 100.0).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let (color, status) = if self.gate_open {
            (Color::Green, "target reached, press Enter")
        } else {
            (Color::Yellow, "keep going")
        };
        let gauge = Gauge::default()
            .block(Block::bordered().title(self.title))
            .gauge_style(Style::new().fg(color).bg(Color::Black))
            .ratio(ratio)
            .label(format!("{:.0}% - {status}", ratio * 100.0));
        gauge.render(area, buf);
    }
}
