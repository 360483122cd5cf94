pub mod domain;
pub mod errors;
pub mod ports;
pub mod services;
pub mod wire;

pub use errors::{CoreError, DraftError, ValidationError};
