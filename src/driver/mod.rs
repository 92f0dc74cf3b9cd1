// src/driver/mod.rs

pub mod sync_driver;

#[cfg(feature = "async")]
pub mod async_driver;

#[cfg(test)]
pub(crate) mod mock;

pub use sync_driver::{BusError, Sht21};

#[cfg(feature = "async")]
pub use async_driver::{AsyncBusError, Sht21Async};
