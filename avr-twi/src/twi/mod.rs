//! Polling TWI (I2C) bus master.
//!
//! ```ignore
//! let mut master = Master::with_deadline(regs, PollLimit::new(10_000u16));
//! master.init(Config::default().bit_rate()?);
//!
//! master.start()?;
//! master.send_address(Address::const_new(0x50), Direction::Write)?;
//! master.send_bytes([0x00, 0x10, 0xAB], FailurePolicy::Abort).result()?;
//! master.stop();
//! ```

mod address;
pub mod bitrate;
mod error;
mod i2c;
mod master;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
#[cfg(feature = "chip")]
pub mod peripheral;
mod registers;
pub mod status;

pub use address::{Address, Direction, InvalidAddress};
pub use bitrate::{BitRate, Config, ConfigError, Prescaler};
pub use error::{Error, Phase};
pub use master::{FailurePolicy, Master, SendSummary};
pub use registers::TwiRegisters;
pub use status::Status;
