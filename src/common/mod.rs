// src/common/mod.rs

// --- Declare all public modules within common ---
pub mod address;
pub mod bus;
pub mod cancel;
pub mod command;
pub mod config;
pub mod crc;
pub mod error;
pub mod hal_traits;
pub mod response;
pub mod timing;
pub mod types;
pub mod user_register;

// --- Re-export key types/traits/functions for easier access ---

// From address.rs
pub use address::{InvalidAddress, Sht21Addr};

// From bus.rs
pub use bus::{BusHold, BusUnavailable, Exclusive, SharedBus};

// From cancel.rs
pub use cancel::{CancelToken, NeverCancel};

// From command.rs
pub use command::{Command, MeasurementKind};

// From config.rs
pub use config::Sht21Config;

// From crc.rs
pub use crc::{crc8, verify, verify_reply};

// From error.rs
pub use error::Sht21Error;

// From hal_traits.rs
pub use hal_traits::{Sht21Bus, Sht21Instant, Sht21Timer}; // Core sync traits

// From response.rs
pub use response::{decode_reply, REPLY_LEN};

// From types.rs
pub use types::{FixedPoint, Measurement, RawReading};

// From user_register.rs
pub use user_register::{Resolution, UserRegister};

// timing.rs constants are reached through `common::timing::*`.

// --- Feature-gated re-exports ---

#[cfg(feature = "async")]
pub use bus::BusHoldAsync;
#[cfg(feature = "async")]
pub use hal_traits::{Sht21BusAsync, Sht21TimerAsync};

#[cfg(feature = "impl-native")]
pub use hal_traits::NativeBus;

#[cfg(feature = "std")]
pub use hal_traits::StdTimer;
