//! Cancellable event raised before an irreversible transition.

/// An event whose subscribers may veto it.
///
/// Handlers run synchronously in registration order. The first handler
/// returning `false` cancels the event; later handlers are not consulted.
/// Handlers must not re-enter the component that raised the event.
#[derive(Default)]
pub struct VetoEvent {
    handlers: Vec<Box<dyn FnMut() -> bool>>,
}

impl VetoEvent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler. Returning `false` from it vetoes the event.
    pub fn subscribe(&mut self, handler: impl FnMut() -> bool + 'static) {
        self.handlers.push(Box::new(handler));
    }

    /// Raise the event. Returns `true` if every handler allowed it.
    pub fn raise(&mut self) -> bool {
        for handler in &mut self.handlers {
            if !handler() {
                return false;
            }
        }
        true
    }

    /// Number of registered handlers.
    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }
}

impl std::fmt::Debug for VetoEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VetoEvent")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn raise_with_no_handlers_allows() {
        let mut ev = VetoEvent::new();
        assert!(ev.raise());
    }

    #[test]
    fn all_allowing_handlers_allow() {
        let mut ev = VetoEvent::new();
        ev.subscribe(|| true);
        ev.subscribe(|| true);
        assert!(ev.raise());
    }

    #[test]
    fn single_deny_vetoes() {
        let mut ev = VetoEvent::new();
        ev.subscribe(|| true);
        ev.subscribe(|| false);
        assert!(!ev.raise());
    }

    #[test]
    fn deny_short_circuits_later_handlers() {
        let calls = Rc::new(RefCell::new(0));
        let mut ev = VetoEvent::new();
        ev.subscribe(|| false);
        let sink = Rc::clone(&calls);
        ev.subscribe(move || {
            *sink.borrow_mut() += 1;
            true
        });
        assert!(!ev.raise());
        assert_eq!(*calls.borrow(), 0);
    }

    #[test]
    fn handlers_run_in_registration_order() {
        let order = Rc::new(RefCell::new(Vec::new()));
        let mut ev = VetoEvent::new();
        for id in 0..3 {
            let sink = Rc::clone(&order);
            ev.subscribe(move || {
                sink.borrow_mut().push(id);
                true
            });
        }
        assert!(ev.raise());
        assert_eq!(*order.borrow(), vec![0, 1, 2]);
    }

    #[test]
    fn stateful_handler_can_change_its_vote() {
        // A handler that denies exactly once, then allows.
        let mut remaining = 1;
        let mut ev = VetoEvent::new();
        ev.subscribe(move || {
            if remaining > 0 {
                remaining -= 1;
                false
            } else {
                true
            }
        });
        assert!(!ev.raise());
        assert!(ev.raise());
    }
}
