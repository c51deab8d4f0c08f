//! Session authority for the Portico gateway
//!
//! Tracks authenticated sessions by token and tears them down on request

#![allow(clippy::must_use_candidate)]

mod error;
mod session;
pub mod token;

pub use error::AuthError;
pub use session::{Session, SessionAuthority, SessionStore};
