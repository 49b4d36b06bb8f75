//! A small screen-stack runtime on top of ratatui.
//!
//! The runtime is purely event driven: it redraws after terminal events and
//! otherwise blocks. Applications either implement [`App`] directly or push
//! [`Screen`]s onto a [`ScreenStack`].

pub use self::{
    app::App,
    event_loop::RenderMode,
    runtime::Runtime,
    screen::{Screen, ScreenStack, ScreenTransition},
};

mod app;
mod event;
mod event_loop;
mod runtime;
mod screen;
