use std::cell::Cell;
use std::rc::Rc;

use jalebi::prelude::*;

#[test]
fn renders_the_button_component() {
    let clicks = Rc::new(Cell::new(0));
    let on_click = {
        let clicks = clicks.clone();
        move || clicks.set(clicks.get() + 1)
    };

    let mut ui = Ui::new();
    ui.push(Button::new("Click Me").on_click(on_click));
    ui.layout(800.0, 600.0).unwrap();

    let button = ui.find_by_label("Click Me").expect("button not found");
    let center = ui.bounds(button).center();
    ui.dispatch(PointerEvent::Pressed(center));
    ui.dispatch(PointerEvent::Released(center));

    assert_eq!(clicks.get(), 1);
}
