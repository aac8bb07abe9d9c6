use jalebi::prelude::*;
use log::info;

fn main() -> anyhow::Result<()> {
    let use_cpu = std::env::args().any(|arg| arg == "--cpu");

    App::new()
        .with_use_cpu(use_cpu)
        .with_button(Button::new("Click Me").on_click(|| info!("clicked")))
        .run()
}
