//! Observable state cells.
//!
//! A `Bindable<T>` is plain state plus an explicit watcher list. Watchers run
//! synchronously, inside the mutation, in registration order. There is no
//! cross-thread machinery: the cells are owned and mutated by exactly one
//! component per frame.

use std::fmt;

/// A value with synchronous change notification.
///
/// Watchers fire only when the stored value actually changes.
pub struct Bindable<T> {
    value: T,
    watchers: Vec<Box<dyn FnMut(&T)>>,
}

impl<T> Bindable<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            watchers: Vec::new(),
        }
    }

    /// Get a reference to the current value.
    pub fn value(&self) -> &T {
        &self.value
    }

    /// Register a watcher and immediately invoke it with the current value.
    pub fn bind(&mut self, mut watcher: impl FnMut(&T) + 'static) {
        watcher(&self.value);
        self.watchers.push(Box::new(watcher));
    }

    /// Number of registered watchers.
    pub fn watcher_count(&self) -> usize {
        self.watchers.len()
    }

    fn notify(&mut self) {
        for watcher in &mut self.watchers {
            watcher(&self.value);
        }
    }
}

impl<T: Copy> Bindable<T> {
    /// Get the current value.
    pub fn get(&self) -> T {
        self.value
    }
}

impl<T: PartialEq> Bindable<T> {
    /// Set a new value, notifying watchers if it differs from the current one.
    pub fn set(&mut self, value: T) {
        if self.value != value {
            self.value = value;
            self.notify();
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Bindable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bindable")
            .field("value", &self.value)
            .field("watchers", &self.watchers.len())
            .finish()
    }
}

/// An `f64` bindable clamped to a fixed [min, max] range.
pub struct BoundedDouble {
    inner: Bindable<f64>,
    min: f64,
    max: f64,
}

impl BoundedDouble {
    /// Create a bounded cell. The initial value is clamped into range.
    pub fn new(value: f64, min: f64, max: f64) -> Self {
        debug_assert!(min <= max, "invalid bounds: [{min}, {max}]");
        Self {
            inner: Bindable::new(value.clamp(min, max)),
            min,
            max,
        }
    }

    /// Current value.
    pub fn get(&self) -> f64 {
        self.inner.get()
    }

    /// Set a new value, clamped into range. Watchers fire on change.
    pub fn set(&mut self, value: f64) {
        self.inner.set(value.clamp(self.min, self.max));
    }

    /// Add a delta to the current value, clamped into range.
    pub fn add(&mut self, delta: f64) {
        self.set(self.inner.get() + delta);
    }

    /// Lower bound.
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Upper bound.
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Register a watcher and immediately invoke it with the current value.
    pub fn bind(&mut self, watcher: impl FnMut(&f64) + 'static) {
        self.inner.bind(watcher);
    }
}

impl fmt::Debug for BoundedDouble {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundedDouble")
            .field("value", &self.inner.get())
            .field("min", &self.min)
            .field("max", &self.max)
            .finish()
    }
}
