//! HTTP handlers

mod health;
mod users;

pub use health::health;
pub use users::{activate, me};
