use anyhow::Result;
use taffy::prelude::*;
use vello::Scene;
use vello::kurbo::{Affine, Point, Rect, RoundedRect};
use vello::peniko::{Color, Fill};

use crate::components::Button;
use crate::event::PointerEvent;
use crate::text::{self, Fonts, LabelLayout};

/// Space between a button's bounds and its label.
pub const PADDING: f64 = 10.0;
/// Vertical gap between sibling buttons.
const GAP: f32 = 8.0;
/// Inset of the button column from the window edges.
const MARGIN: f32 = 12.0;

const CORNER_RADIUS: f64 = 4.0;
const BUTTON_FILL: Color = Color::from_rgb8(66, 66, 74);
const LABEL_COLOR: Color = Color::from_rgb8(235, 235, 235);

/// Identifies a button within a [`Ui`]. Stable for the tree's lifetime.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ButtonId(usize);

struct Placement {
    rect: Rect,
    label: LabelLayout,
}

/// Retained component tree: owns the buttons, computes their geometry and
/// dispatches pointer input to them.
pub struct Ui {
    buttons: Vec<Button>,
    fonts: Fonts,
    placements: Vec<Placement>,
    pressed: Option<ButtonId>,
}

impl Ui {
    pub fn new() -> Self {
        Self {
            buttons: Vec::new(),
            fonts: Fonts::new(),
            placements: Vec::new(),
            pressed: None,
        }
    }

    /// Append a button to the tree.
    pub fn push(&mut self, button: Button) -> ButtonId {
        self.buttons.push(button);
        ButtonId(self.buttons.len() - 1)
    }

    pub fn len(&self) -> usize {
        self.buttons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buttons.is_empty()
    }

    /// Find the first button whose label equals `label` exactly.
    pub fn find_by_label(&self, label: &str) -> Option<ButtonId> {
        self.buttons
            .iter()
            .position(|b| b.label() == label)
            .map(ButtonId)
    }

    pub fn label(&self, id: ButtonId) -> &str {
        self.buttons[id.0].label()
    }

    /// The rectangle computed by the last [`layout`](Self::layout) call, or
    /// [`Rect::ZERO`] if the tree has not been laid out yet.
    pub fn bounds(&self, id: ButtonId) -> Rect {
        self.placements.get(id.0).map(|p| p.rect).unwrap_or(Rect::ZERO)
    }

    /// Measure every label and flow the buttons in a vertical column.
    ///
    /// Button size is label content plus fixed padding. Re-running with the
    /// same buttons and dimensions yields identical rectangles.
    pub fn layout(&mut self, width: f64, height: f64) -> Result<()> {
        let mut tree: TaffyTree<()> = TaffyTree::new();
        let mut labels = Vec::with_capacity(self.buttons.len());
        let mut nodes = Vec::with_capacity(self.buttons.len());
        for button in &self.buttons {
            let label = self.fonts.layout_label(button.label());
            let content_w = f64::from(label.width());
            let mut content_h = f64::from(label.height());
            if content_h == 0.0 {
                // An empty label still gets a hit target one line high.
                content_h = f64::from(text::FONT_SIZE);
            }
            let node = tree.new_leaf(Style {
                size: Size {
                    width: length((content_w + 2.0 * PADDING) as f32),
                    height: length((content_h + 2.0 * PADDING) as f32),
                },
                ..Default::default()
            })?;
            labels.push(label);
            nodes.push(node);
        }
        let root = tree.new_with_children(
            Style {
                flex_direction: FlexDirection::Column,
                align_items: Some(AlignItems::FlexStart),
                gap: Size {
                    width: length(0.0),
                    height: length(GAP),
                },
                padding: taffy::Rect {
                    left: length(MARGIN),
                    right: length(MARGIN),
                    top: length(MARGIN),
                    bottom: length(MARGIN),
                },
                size: Size {
                    width: length(width as f32),
                    height: length(height as f32),
                },
                ..Default::default()
            },
            &nodes,
        )?;
        tree.compute_layout(
            root,
            Size {
                width: AvailableSpace::Definite(width as f32),
                height: AvailableSpace::Definite(height as f32),
            },
        )?;

        self.placements.clear();
        for (node, label) in nodes.into_iter().zip(labels) {
            let placed = tree.layout(node)?;
            let origin = Point::new(f64::from(placed.location.x), f64::from(placed.location.y));
            let size = (f64::from(placed.size.width), f64::from(placed.size.height));
            self.placements.push(Placement {
                rect: Rect::from_origin_size(origin, size),
                label,
            });
        }
        Ok(())
    }

    /// Route a pointer event through the tree.
    ///
    /// A press inside a button arms it; a release inside the same button's
    /// bounds completes exactly one activation and invokes its handler
    /// synchronously. A release anywhere else discards the grab. Returns
    /// whether an activation fired.
    pub fn dispatch(&mut self, event: PointerEvent) -> bool {
        match event {
            PointerEvent::Pressed(p) => {
                self.pressed = self.hit(p);
                if let Some(id) = self.pressed {
                    log::debug!("press on button {:?}", self.label(id));
                }
                false
            }
            PointerEvent::Released(p) => {
                let armed = self.pressed.take();
                match (armed, self.hit(p)) {
                    (Some(a), Some(b)) if a == b => {
                        self.buttons[a.0].activate();
                        true
                    }
                    _ => false,
                }
            }
        }
    }

    fn hit(&self, p: Point) -> Option<ButtonId> {
        self.placements
            .iter()
            .position(|placement| placement.rect.contains(p))
            .map(ButtonId)
    }

    /// Paint every laid-out button into `scene`.
    pub fn draw(&self, scene: &mut Scene) {
        for placement in &self.placements {
            let shape = RoundedRect::from_rect(placement.rect, CORNER_RADIUS);
            scene.fill(Fill::NonZero, Affine::IDENTITY, BUTTON_FILL, None, &shape);
            let origin = placement.rect.origin();
            let content = Affine::translate((origin.x + PADDING, origin.y + PADDING));
            text::draw_label(scene, content, &placement.label, LABEL_COLOR);
        }
    }
}

impl Default for Ui {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn counted_button(label: &str) -> (Button, Rc<Cell<usize>>) {
        let calls = Rc::new(Cell::new(0));
        let button = {
            let calls = calls.clone();
            Button::new(label).on_click(move || calls.set(calls.get() + 1))
        };
        (button, calls)
    }

    fn laid_out(buttons: Vec<Button>) -> Ui {
        let mut ui = Ui::new();
        for button in buttons {
            ui.push(button);
        }
        ui.layout(800.0, 600.0).unwrap();
        ui
    }

    fn click(ui: &mut Ui, at: Point) {
        ui.dispatch(PointerEvent::Pressed(at));
        ui.dispatch(PointerEvent::Released(at));
    }

    #[test]
    fn finds_button_by_label() {
        let ui = laid_out(vec![Button::new("Click Me")]);
        let id = ui.find_by_label("Click Me").unwrap();
        assert_eq!(ui.label(id), "Click Me");
    }

    #[test]
    fn missing_label_is_not_found() {
        let ui = laid_out(vec![Button::new("Click Me")]);
        assert_eq!(ui.find_by_label("Other"), None);
    }

    #[test]
    fn bounds_before_layout_are_zero() {
        let mut ui = Ui::new();
        let id = ui.push(Button::new("a"));
        assert_eq!(ui.bounds(id), Rect::ZERO);
    }

    #[test]
    fn click_inside_activates_once() {
        let (button, calls) = counted_button("Click Me");
        let mut ui = laid_out(vec![button]);
        let id = ui.find_by_label("Click Me").unwrap();

        assert!(!ui.dispatch(PointerEvent::Pressed(ui.bounds(id).center())));
        assert!(ui.dispatch(PointerEvent::Released(ui.bounds(id).center())));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn repeated_clicks_activate_once_each() {
        let (button, calls) = counted_button("go");
        let mut ui = laid_out(vec![button]);
        let center = ui.bounds(ui.find_by_label("go").unwrap()).center();

        for n in 1..=5 {
            click(&mut ui, center);
            assert_eq!(calls.get(), n);
        }
    }

    #[test]
    fn release_outside_does_not_activate() {
        let (button, calls) = counted_button("go");
        let mut ui = laid_out(vec![button]);
        let center = ui.bounds(ui.find_by_label("go").unwrap()).center();

        ui.dispatch(PointerEvent::Pressed(center));
        ui.dispatch(PointerEvent::Released(Point::new(1.0, 1.0)));
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn press_outside_release_inside_does_not_activate() {
        let (button, calls) = counted_button("go");
        let mut ui = laid_out(vec![button]);
        let center = ui.bounds(ui.find_by_label("go").unwrap()).center();

        ui.dispatch(PointerEvent::Pressed(Point::new(1.0, 1.0)));
        ui.dispatch(PointerEvent::Released(center));
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn activation_is_isolated_per_button() {
        let (first, first_calls) = counted_button("first");
        let (second, second_calls) = counted_button("second");
        let mut ui = laid_out(vec![first, second]);
        let target = ui.bounds(ui.find_by_label("second").unwrap()).center();

        click(&mut ui, target);
        assert_eq!(first_calls.get(), 0);
        assert_eq!(second_calls.get(), 1);
    }

    #[test]
    fn click_on_empty_space_activates_nothing() {
        let (button, calls) = counted_button("go");
        let mut ui = laid_out(vec![button]);

        click(&mut ui, Point::new(799.0, 599.0));
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn buttons_are_stacked_without_overlap() {
        let ui = laid_out(vec![Button::new("first"), Button::new("second")]);
        let first = ui.bounds(ui.find_by_label("first").unwrap());
        let second = ui.bounds(ui.find_by_label("second").unwrap());
        assert!(first.y1 <= second.y0);
    }

    #[test]
    fn relayout_is_idempotent() {
        let mut ui = laid_out(vec![Button::new("Click Me")]);
        let id = ui.find_by_label("Click Me").unwrap();
        let before = ui.bounds(id);

        ui.layout(800.0, 600.0).unwrap();
        assert_eq!(ui.bounds(id), before);
        assert_eq!(ui.label(id), "Click Me");
    }

    #[test]
    fn empty_label_still_has_a_hit_target() {
        let (button, calls) = counted_button("");
        let mut ui = laid_out(vec![button]);
        let id = ui.find_by_label("").unwrap();
        let rect = ui.bounds(id);
        assert!(rect.width() > 0.0 && rect.height() > 0.0);

        click(&mut ui, rect.center());
        assert_eq!(calls.get(), 1);
    }
}
