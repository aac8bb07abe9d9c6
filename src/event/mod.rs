use vello::kurbo::Point;

/// Positioned pointer input, the unit of interaction dispatch.
///
/// The windowing shell synthesizes these from winit's cursor and mouse-button
/// events; tests synthesize them directly.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerEvent {
    Pressed(Point),
    Released(Point),
}

impl PointerEvent {
    pub fn position(&self) -> Point {
        match *self {
            PointerEvent::Pressed(p) | PointerEvent::Released(p) => p,
        }
    }
}
