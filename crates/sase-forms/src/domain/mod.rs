//! Domain module
//!
//! Question model, schema aggregate, events and the validation service.

pub mod aggregates;
pub mod value_objects;
pub mod events;
pub mod services;

pub use aggregates::*;
pub use value_objects::*;
pub use events::*;
