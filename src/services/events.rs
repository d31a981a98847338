//! Cell interaction events surfaced to the host

pub type HandlerFn<V> = Box<dyn Fn(Option<&V>)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellEventKind {
    Click,
    MouseOver,
    MouseLeave,
}

/// Optional callbacks per event kind, each receiving the cell's value
pub struct EventHandlers<V> {
    on_click: Option<HandlerFn<V>>,
    on_mouse_over: Option<HandlerFn<V>>,
    on_mouse_leave: Option<HandlerFn<V>>,
}

impl<V> Default for EventHandlers<V> {
    fn default() -> Self {
        Self {
            on_click: None,
            on_mouse_over: None,
            on_mouse_leave: None,
        }
    }
}

impl<V> EventHandlers<V> {
    pub fn set(&mut self, kind: CellEventKind, handler: impl Fn(Option<&V>) + 'static) {
        let slot = match kind {
            CellEventKind::Click => &mut self.on_click,
            CellEventKind::MouseOver => &mut self.on_mouse_over,
            CellEventKind::MouseLeave => &mut self.on_mouse_leave,
        };
        *slot = Some(Box::new(handler));
    }

    /// Invoke the handler for `kind`; returns whether one was registered
    pub fn emit(&self, kind: CellEventKind, value: Option<&V>) -> bool {
        let handler = match kind {
            CellEventKind::Click => &self.on_click,
            CellEventKind::MouseOver => &self.on_mouse_over,
            CellEventKind::MouseLeave => &self.on_mouse_leave,
        };
        match handler {
            Some(f) => {
                f(value);
                true
            }
            None => false,
        }
    }
}
