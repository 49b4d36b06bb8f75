pub use self::{
    bell_curves::{BellCurves, Curve},
    key_binding_display::{KeyBinding, KeyBindingDisplay},
    meter::Meter,
    popup::popup_area,
    slider_panel::SliderPanel,
};

mod bell_curves;
mod key_binding_display;
mod meter;
mod popup;
mod slider_panel;
