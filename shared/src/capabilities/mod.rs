//! Side effects the core asks the shell to perform.
//!
//! Render is Crux's built-in capability; the timer is ours.

mod timer;

pub use self::timer::{Timer, TimerOperation, TimerOutput, TimerToken};
pub use crux_core::render::Render;

#[allow(unused_imports)]
use crate::app::App;
use crate::event::Event;

#[derive(crux_core::macros::Effect)]
pub struct Capabilities {
    pub render: Render<Event>,
    pub timer: Timer<Event>,
}
