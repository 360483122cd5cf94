pub mod gateway;

#[cfg(test)]
pub(crate) mod fake;

pub use gateway::{DatasetGateway, GatewayError};
