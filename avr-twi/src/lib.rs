#![cfg_attr(not(test), no_std)]

pub mod time;
pub mod twi;

pub use embedded_hal;

#[cfg(feature = "chip")]
pub mod hal {
    pub use atmega_hal::*;
}

#[cfg(feature = "chip")]
pub use crate::hal::pins;
#[cfg(feature = "chip")]
pub use crate::hal::Peripherals;
