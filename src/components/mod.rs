use std::fmt;
use std::rc::Rc;

/// A push-button: a text label inside an activatable control.
///
/// The label is displayed verbatim; the click handler, if any, runs exactly
/// once per completed click, synchronously, with no arguments. The button
/// itself holds no interaction state; press tracking belongs to the
/// [`Ui`](crate::ui::Ui) that owns it.
#[derive(Clone)]
pub struct Button {
    label: String,
    on_activate: Option<Rc<dyn Fn()>>,
}

impl Button {
    /// Construct a button with the given `label`. The label may be empty and
    /// is never validated.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            on_activate: None,
        }
    }

    /// Set the click handler (chain style).
    #[must_use]
    pub fn on_click<F: Fn() + 'static>(mut self, f: F) -> Self {
        self.on_activate = Some(Rc::new(f));
        self
    }

    /// The displayed text, exactly as supplied.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Invoke the click handler. A button without a handler is inert.
    pub(crate) fn activate(&self) {
        if let Some(f) = &self.on_activate {
            log::trace!("button {:?} activated", self.label);
            f();
        }
    }
}

impl fmt::Debug for Button {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Button")
            .field("label", &self.label)
            .field("has_handler", &self.on_activate.is_some())
            .finish()
    }
}
