// Shared primitives: observable state cells, veto events, time periods

mod bindable;
mod event;
mod period;

pub use bindable::{Bindable, BoundedDouble};
pub use event::VetoEvent;
pub use period::BreakPeriod;
