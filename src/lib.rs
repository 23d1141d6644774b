//! Marquee application library
//!
//! Movie and room controllers, their HTTP modules, and the wiring that
//! turns settings into a running service.

pub mod app;
pub mod controller;
pub mod modules;
pub mod utils;

/// Re-export commonly used types
pub use app::App;
pub use controller::{ControllerError, FindAllResponse, GenericController, ValidationError};
