//! Request types for HTTP handlers.

mod accounts;
mod authentications;
mod catalog;
mod deals;
mod paginations;
mod paths;
mod quotes;
mod validations;

pub use accounts::*;
pub use authentications::*;
pub use catalog::*;
pub use deals::*;
pub use paginations::*;
pub use paths::*;
pub use quotes::*;
pub use validations::*;
