use ratatui::{
    prelude::{Buffer, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Widget,
};

/// Keys and the action they trigger.
///
/// Disabled bindings are shown dimmed, e.g. "Enter Complete" while the level
/// target is not reached.
#[derive(Debug, Clone, Copy)]
pub struct KeyBinding<'a> {
    keys: &'a [&'a str],
    description: &'a str,
    enabled: bool,
}

impl<'a> KeyBinding<'a> {
    pub const fn new(keys: &'a [&'a str], description: &'a str) -> Self {
        Self {
            keys,
            description,
            enabled: true,
        }
    }

    pub const fn enabled(self, enabled: bool) -> Self {
        Self { enabled, ..self }
    }
}

#[derive(Debug)]
pub struct KeyBindingDisplay<'a> {
    bindings: &'a [KeyBinding<'a>],
}

impl<'a> KeyBindingDisplay<'a> {
    pub fn new(bindings: &'a [KeyBinding<'a>]) -> Self {
        Self { bindings }
    }
}

const KEY_STYLE: Style = Style::new().fg(Color::Cyan);
const KEY_SEPARATOR_STYLE: Style = Style::new().fg(Color::DarkGray);
const DESCRIPTION_STYLE: Style = Style::new().fg(Color::White);
const DISABLED_STYLE: Style = Style::new().fg(Color::DarkGray);
const ITEM_SEPARATOR_STYLE: Style = Style::new().fg(Color::DarkGray);

impl Widget for KeyBindingDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let mut spans = vec![];

        for (i, binding) in self.bindings.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(" | ", ITEM_SEPARATOR_STYLE));
            }
            let (key_style, description_style) = if binding.enabled {
                (KEY_STYLE, DESCRIPTION_STYLE)
            } else {
                (DISABLED_STYLE, DISABLED_STYLE)
            };
            for (i, key) in binding.keys.iter().copied().enumerate() {
                if i > 0 {
                    spans.push(Span::styled("/", KEY_SEPARATOR_STYLE));
                }
                spans.push(Span::styled(key, key_style));
            }
            spans.push(Span::from(" "));
            spans.push(Span::styled(binding.description, description_style));
        }

        let text = Line::from(spans).centered();
        text.render(area, buf);
    }
}
