//! A tiny widget toolkit: clickable buttons on winit + vello.
//!
//! [`Button`](components::Button) pairs a text label with a click callback;
//! [`App`](app::App) opens a window, lays the buttons out and dispatches
//! pointer input to them.
//!
//! ```no_run
//! use jalebi::prelude::*;
//!
//! fn main() -> anyhow::Result<()> {
//!     App::new()
//!         .with_button(Button::new("Click Me").on_click(|| println!("clicked")))
//!         .run()
//! }
//! ```

pub mod app;
pub mod components;
pub mod event;
pub mod render;
pub mod text;
pub mod ui;

pub mod prelude {
    pub use crate::app::App;
    pub use crate::components::Button;
    pub use crate::event::PointerEvent;
    pub use crate::ui::{ButtonId, Ui};
}
