//! Order events
//!
//! The engine emits an [`OrderCreatedEvent`] after every successful checkout and an [`OrderUpdatedEvent`] after every
//! status change, whether it came from an admin or the payment gateway.
//!
//! Subscribers register async closures in [`EventHooks`]. [`EventHandlers`] turns those into running handler tasks and
//! hands out [`EventProducers`], which the engine APIs use to publish. Publishing never waits and never fails the
//! operation that triggered it.
mod channel;
mod event_types;
mod hooks;

pub use channel::{EventHandler, EventProducer, Handler};
pub use event_types::*;
pub use hooks::{EventHandlers, EventHooks, EventProducers};
