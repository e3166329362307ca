//! Pure workout math. Everything in here is synchronous, side-effect free,
//! and operates on rows already fetched by the storage layer.

pub mod duration;
pub mod history;
pub mod onerm;
pub mod pace;
pub mod records;
pub mod summary;
