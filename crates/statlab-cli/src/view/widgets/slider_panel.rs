use ratatui::{
    prelude::{Buffer, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph, Widget},
};
use statlab_games::Tunable;

const BAR_WIDTH: usize = 20;

/// The parameters of a [`Tunable`] game as horizontal sliders.
///
/// `focus` indexes the game's unlocked parameters. Locked parameters are
/// listed dimmed so the player sees the full model.
#[derive(Debug)]
pub struct SliderPanel<'a, T> {
    game: &'a T,
    focus: usize,
}

impl<'a, T> SliderPanel<'a, T>
where
    T: Tunable,
{
    pub fn new(game: &'a T, focus: usize) -> Self {
        Self { game, focus }
    }

    /// Rows needed to show every parameter, including borders.
    pub fn height(game: &T) -> u16 {
        u16::try_from(game.params().len()).unwrap_or(u16::MAX).saturating_add(2)
    }
}

impl<T> Widget for SliderPanel<'_, T>
where
    T: Tunable,
{
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let focused = self.game.unlocked_params().get(self.focus).copied();
        let label_width = self
            .game
            .params()
            .iter()
            .map(|&param| self.game.label(param).len())
            .max()
            .unwrap_or(0);

        let lines = self
            .game
            .params()
            .iter()
            .map(|&param| {
                let range = self.game.range(param);
                let value = self.game.value(param);
                let (marker, style) = if Some(param) == focused {
                    ("▶ ", Style::new().fg(Color::Yellow).add_modifier(Modifier::BOLD))
                } else if self.game.is_unlocked(param) {
                    ("  ", Style::new().fg(Color::White))
                } else {
                    ("  ", Style::new().fg(Color::DarkGray))
                };
                let bar = slider_bar(range.fraction(value));
                let suffix = if self.game.is_unlocked(param) {
                    ""
                } else {
                    " (locked)"
                };
                Line::from(vec![
                    Span::styled(marker, style),
                    Span::styled(
                        format!("{:<label_width$} ", self.game.label(param)),
                        style,
                    ),
                    Span::styled(bar, style.fg(Color::Cyan)),
                    Span::styled(format!(" {value:>5.0}{suffix}"), style),
                ])
            })
            .collect::<Vec<_>>();

        Paragraph::new(lines)
            .block(Block::bordered().title("Controls"))
            .render(area, buf);
    }
}

#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn slider_bar(fraction: f64) -> String {
    let filled = (fraction.clamp(0.0, 1.0) * BAR_WIDTH as f64).round() as usize;
    format!("[{}{}]", "━".repeat(filled), "─".repeat(BAR_WIDTH - filled))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slider_bar() {
        assert_eq!(slider_bar(0.0), format!("[{}]", "─".repeat(BAR_WIDTH)));
        assert_eq!(slider_bar(1.0), format!("[{}]", "━".repeat(BAR_WIDTH)));
        assert_eq!(slider_bar(0.5).chars().filter(|&c| c == '━').count(), 10);
        assert_eq!(slider_bar(f64::NAN).len(), slider_bar(0.0).len());
    }
}
