//! Recipe.Report Auth Core - token issuance and verification
//!
//! Signs time-bounded, typed claims into bearer tokens and verifies them
//! again, with a symmetric cipher for data that must stay opaque to the
//! bearer.

pub mod cipher;
pub mod config;
pub mod error;
pub mod token;

pub use cipher::*;
pub use config::*;
pub use error::*;
pub use token::*;
