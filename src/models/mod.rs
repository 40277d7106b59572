//! Data models for the four entity collections and their request bodies.

mod account;
mod department;
mod employee;
mod request;
mod snapshot;

pub use account::*;
pub use department::*;
pub use employee::*;
pub use request::*;
pub use snapshot::*;
