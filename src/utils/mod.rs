//! Project-specific utilities live here.

pub mod pagination;
