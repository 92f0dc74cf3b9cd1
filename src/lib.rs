// src/lib.rs

#![cfg_attr(not(any(test, feature = "std")), no_std)]

pub mod common;
pub mod driver;

// Re-export key types for convenience
pub use common::{
    BusHold, CancelToken, Exclusive, FixedPoint, InvalidAddress, Measurement, MeasurementKind, Resolution, SharedBus,
    Sht21Addr, Sht21Bus, Sht21Config, Sht21Error, Sht21Timer, UserRegister,
};
pub use driver::Sht21;

#[cfg(feature = "async")]
pub use common::BusHoldAsync;
#[cfg(feature = "async")]
pub use driver::Sht21Async;
