//! In-process event bus for detector events.
//!
//! - [`EventBus`]: publish/subscribe hub backed by `tokio::sync::broadcast`.
//! - [`DomainEvent`]: the event envelope, addressed by [`Topic`] and
//!   delivered to an [`Audience`].

pub mod bus;

pub use bus::{Audience, DomainEvent, EventBus, Topic};
