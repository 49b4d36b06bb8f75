use std::fmt;

use crossterm::event::Event;
use ratatui::Frame;

use crate::{App, Runtime};

/// Individual screen in the application.
///
/// # Lifecycle
///
/// 1. **Created** - Screen is constructed
/// 2. **[`on_active`]** - Screen becomes the foreground screen
/// 3. **Active** - Screen handles events and draws
/// 4. **[`on_inactive`]** - Screen goes to background (Push) or is being removed (Pop/Replace/Exit)
/// 5. **[`on_close`]** - Screen is being removed from stack (Pop/Replace/Exit only)
/// 6. **Dropped**
///
/// ```text
/// Create
///   ↓
/// on_active() ←──────────┐
///   ↓                     │
/// (Active/Foreground)     │ Child screen pops
///   ↓                     │
/// on_inactive()           │
///   ↓                     │
/// (Background) ──────────┘
///   ↓
/// on_close()  ← Only on Pop/Replace/Exit
///   ↓
/// Drop
/// ```
///
/// Screens should configure [`Runtime`] settings in [`on_active`], so that
/// returning from a child screen restores them.
///
/// ```rust
/// use crossterm::event::{Event, KeyCode};
/// use ratatui::Frame;
/// use statlab_tui::{RenderMode, Runtime, Screen, ScreenTransition};
///
/// #[derive(Debug)]
/// struct SliderScreen {
///     value: u32,
/// }
///
/// impl Screen for SliderScreen {
///     fn on_active(&mut self, runtime: &mut Runtime) {
///         runtime.set_render_mode(RenderMode::throttled_from_rate(60.0));
///     }
///
///     fn on_inactive(&mut self, _runtime: &mut Runtime) {}
///     fn on_close(&mut self, _runtime: &mut Runtime) {}
///
///     fn handle_event(&mut self, _runtime: &mut Runtime, event: &Event) -> ScreenTransition {
///         match event.as_key_event().map(|key| key.code) {
///             Some(KeyCode::Right) => self.value += 1,
///             Some(KeyCode::Char('q')) => return ScreenTransition::Pop,
///             _ => {}
///         }
///         ScreenTransition::Stay
///     }
///
///     fn draw(&self, frame: &mut Frame) {
///         frame.render_widget(format!("value: {}", self.value), frame.area());
///     }
/// }
/// ```
///
/// [`on_active`]: Self::on_active
/// [`on_inactive`]: Self::on_inactive
/// [`on_close`]: Self::on_close
pub trait Screen: fmt::Debug {
    /// Called when this screen becomes active (foreground).
    ///
    /// This is called:
    ///
    /// - On app startup (for the initial screen)
    /// - When this screen is pushed or replaces another screen
    /// - When popping back to this screen (returning from a child screen)
    fn on_active(&mut self, runtime: &mut Runtime);

    /// Called when this screen becomes inactive (background).
    ///
    /// For Pop/Replace/Exit, [`on_close`] follows immediately.
    ///
    /// [`on_close`]: Self::on_close
    fn on_inactive(&mut self, runtime: &mut Runtime);

    /// Called when this screen is being removed from the stack.
    ///
    /// Not called when another screen is pushed on top.
    fn on_close(&mut self, runtime: &mut Runtime);

    /// Handles terminal events and returns transition.
    fn handle_event(&mut self, runtime: &mut Runtime, event: &Event) -> ScreenTransition;

    /// Renders the screen.
    fn draw(&self, frame: &mut Frame);
}

/// Screen transition result from event handling.
#[derive(Debug)]
pub enum ScreenTransition {
    /// Stay in the current screen.
    Stay,

    /// Push a new screen on top of the current one.
    ///
    /// Current screen goes to background (`on_inactive` called).
    /// When the new screen is popped, current screen is reactivated (`on_active` called).
    Push(Box<dyn Screen>),

    /// Pop the current screen and return to the previous one.
    ///
    /// Current screen's `on_inactive` and `on_close` are called,
    /// then previous screen's `on_active` is called.
    Pop,

    /// Replace the current screen with a new one.
    ///
    /// Current screen's `on_inactive` and `on_close` are called,
    /// then new screen's `on_active` is called.
    Replace(Box<dyn Screen>),

    /// Exit the application, closing every screen from the top down.
    Exit,
}

impl ScreenTransition {
    fn name(&self) -> Option<&'static str> {
        match self {
            Self::Stay => None,
            Self::Push(_) => Some("push"),
            Self::Pop => Some("pop"),
            Self::Replace(_) => Some("replace"),
            Self::Exit => Some("exit"),
        }
    }
}

/// Screen stack manager that implements App.
#[derive(Debug)]
pub struct ScreenStack<'a> {
    screens: Vec<Box<dyn Screen + 'a>>,
    should_exit: bool,
}

impl<'a> ScreenStack<'a> {
    /// Creates a new screen stack with an initial screen.
    #[must_use]
    pub fn new(initial: Box<dyn Screen + 'a>) -> Self {
        Self {
            screens: vec![initial],
            should_exit: false,
        }
    }

    /// Number of screens on the stack.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.screens.len()
    }

    fn apply_transition(&mut self, runtime: &mut Runtime, transition: ScreenTransition) {
        if let Some(name) = transition.name() {
            log::trace!("{name} at screen depth {}", self.depth());
        }
        match transition {
            ScreenTransition::Stay => {}

            ScreenTransition::Push(mut new_screen) => {
                if let Some(current) = self.screens.last_mut() {
                    current.on_inactive(runtime);
                }
                new_screen.on_active(runtime);
                self.screens.push(new_screen);
            }

            ScreenTransition::Pop => {
                if let Some(mut old_screen) = self.screens.pop() {
                    old_screen.on_inactive(runtime);
                    old_screen.on_close(runtime);
                }
                if let Some(prev_screen) = self.screens.last_mut() {
                    prev_screen.on_active(runtime);
                }
            }

            ScreenTransition::Replace(mut new_screen) => {
                if let Some(mut old_screen) = self.screens.pop() {
                    old_screen.on_inactive(runtime);
                    old_screen.on_close(runtime);
                }
                new_screen.on_active(runtime);
                self.screens.push(new_screen);
            }

            ScreenTransition::Exit => {
                while let Some(mut screen) = self.screens.pop() {
                    screen.on_inactive(runtime);
                    screen.on_close(runtime);
                }
                self.should_exit = true;
            }
        }
    }
}

impl App for ScreenStack<'_> {
    fn init(&mut self, runtime: &mut Runtime) {
        if let Some(screen) = self.screens.last_mut() {
            screen.on_active(runtime);
        }
    }

    fn should_exit(&self) -> bool {
        self.should_exit || self.screens.is_empty()
    }

    fn handle_event(&mut self, runtime: &mut Runtime, event: Event) {
        if let Some(current) = self.screens.last_mut() {
            let transition = current.handle_event(runtime, &event);
            self.apply_transition(runtime, transition);
        }
    }

    fn draw(&self, frame: &mut Frame) {
        if let Some(current) = self.screens.last() {
            current.draw(frame);
        }
    }
}
