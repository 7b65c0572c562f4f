use core::ops::{Deref, DerefMut};

use avr_hal_generic::port;

use super::{bitrate::Prescaler, registers::TwiRegisters};

macro_rules! impl_twi {
    (:: $krate_head:ident $(:: $krate_rest:ident)*, $TWI:ident) => {
        impl_twi!(@def $TWI, :: $krate_head $(:: $krate_rest)*);
    };
    ($krate_head:ident $(:: $krate_rest:ident)*, $TWI:ident) => {
        impl_twi!(@def $TWI, $krate_head $(:: $krate_rest)*);
    };
    (@def $TWI:ident, $($krate:tt)+) => {
        impl $crate::twi::registers::TwiRegisters for $($krate)* ::pac::$TWI {
            #[inline(always)]
            fn read_control(&mut self) -> u8 {
                self.twcr.read().bits()
            }

            #[inline(always)]
            fn write_control(&mut self, bits: u8) {
                self.twcr.write(|w| unsafe { w.bits(bits) });
            }

            #[inline(always)]
            fn read_status(&mut self) -> u8 {
                self.twsr.read().bits()
            }

            #[inline(always)]
            fn read_data(&mut self) -> u8 {
                self.twdr.read().bits()
            }

            #[inline(always)]
            fn write_data(&mut self, byte: u8) {
                self.twdr.write(|w| unsafe { w.bits(byte) });
            }

            #[inline(always)]
            fn write_bit_rate(&mut self, divisor: u8) {
                self.twbr.write(|w| unsafe { w.bits(divisor) });
            }

            #[inline(always)]
            fn write_prescaler(&mut self, prescaler: $crate::twi::bitrate::Prescaler) {
                // Status bits are read-only, only TWPS takes the write.
                self.twsr.write(|w| unsafe { w.bits(prescaler.bits()) });
            }

            #[inline(always)]
            fn read_bit_rate(&mut self) -> u8 {
                self.twbr.read().bits()
            }
        }
    };
}

/// The TWI register block together with the pins it drives.
pub struct TwiPeripheral<TWI: TwiRegisters, SDA, SCL> {
    p: TWI,
    sda: SDA,
    scl: SCL,
}

impl<TWI, SDAPIN, SCLPIN>
    TwiPeripheral<TWI, port::Pin<port::mode::Input, SDAPIN>, port::Pin<port::mode::Input, SCLPIN>>
where
    TWI: TwiRegisters,
    SDAPIN: port::PinOps,
    SCLPIN: port::PinOps,
{
    pub fn new(
        p: TWI,
        sda: port::Pin<port::mode::Input<port::mode::PullUp>, SDAPIN>,
        scl: port::Pin<port::mode::Input<port::mode::PullUp>, SCLPIN>,
    ) -> Self {
        Self {
            p,
            sda: sda.forget_imode(),
            scl: scl.forget_imode(),
        }
    }

    pub fn with_external_pullup(
        p: TWI,
        sda: port::Pin<port::mode::Input<port::mode::Floating>, SDAPIN>,
        scl: port::Pin<port::mode::Input<port::mode::Floating>, SCLPIN>,
    ) -> Self {
        Self {
            p,
            sda: sda.forget_imode(),
            scl: scl.forget_imode(),
        }
    }
}

impl<TWI: TwiRegisters, SDA, SCL> TwiPeripheral<TWI, SDA, SCL> {
    #[inline]
    pub fn release(self) -> (TWI, SDA, SCL) {
        (self.p, self.sda, self.scl)
    }
}

impl<TWI: TwiRegisters, SDA, SCL> TwiRegisters for TwiPeripheral<TWI, SDA, SCL> {
    #[inline(always)]
    fn read_control(&mut self) -> u8 {
        self.p.read_control()
    }

    #[inline(always)]
    fn write_control(&mut self, bits: u8) {
        self.p.write_control(bits)
    }

    #[inline(always)]
    fn read_status(&mut self) -> u8 {
        self.p.read_status()
    }

    #[inline(always)]
    fn read_data(&mut self) -> u8 {
        self.p.read_data()
    }

    #[inline(always)]
    fn write_data(&mut self, byte: u8) {
        self.p.write_data(byte)
    }

    #[inline(always)]
    fn write_bit_rate(&mut self, divisor: u8) {
        self.p.write_bit_rate(divisor)
    }

    #[inline(always)]
    fn write_prescaler(&mut self, prescaler: Prescaler) {
        self.p.write_prescaler(prescaler)
    }

    #[inline(always)]
    fn read_bit_rate(&mut self) -> u8 {
        self.p.read_bit_rate()
    }
}

impl<TWI: TwiRegisters, SDA, SCL> Deref for TwiPeripheral<TWI, SDA, SCL> {
    type Target = TWI;

    #[inline(always)]
    fn deref(&self) -> &Self::Target {
        &self.p
    }
}

impl<TWI: TwiRegisters, SDA, SCL> DerefMut for TwiPeripheral<TWI, SDA, SCL> {
    #[inline(always)]
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.p
    }
}

impl_twi!(crate::hal, TWI);

pub type TwiPeripheral1Pac = crate::hal::pac::TWI;

#[cfg(any(feature = "atmega328p", feature = "atmega168", feature = "atmega48p"))]
pub type TwiPeripheral1Sda = crate::hal::port::PC4;

#[cfg(any(feature = "atmega328p", feature = "atmega168", feature = "atmega48p"))]
pub type TwiPeripheral1Scl = crate::hal::port::PC5;

#[cfg(any(feature = "atmega32u4", feature = "atmega1280", feature = "atmega2560"))]
pub type TwiPeripheral1Sda = crate::hal::port::PD1;

#[cfg(any(feature = "atmega32u4", feature = "atmega1280", feature = "atmega2560"))]
pub type TwiPeripheral1Scl = crate::hal::port::PD0;

pub type TwiPeripheral1 = TwiPeripheral<
    TwiPeripheral1Pac,
    port::Pin<port::mode::Input, TwiPeripheral1Sda>,
    port::Pin<port::mode::Input, TwiPeripheral1Scl>,
>;

/// Build a [`Master`](crate::twi::Master) on the chip's TWI pins, using the
/// internal pull-ups, and program it for `$speed` Hz. Evaluates to
/// `Result<Master<TwiPeripheral1>, ConfigError>`.
#[cfg(any(feature = "atmega328p", feature = "atmega168", feature = "atmega48p"))]
#[macro_export]
macro_rules! twi {
    ($peripherals:ident, $pins:ident, $clock:ty, $speed:expr) => {{
        $crate::twi::BitRate::for_clock::<$clock>($speed).map(|rate| {
            let mut master =
                $crate::twi::Master::new($crate::twi::peripheral::TwiPeripheral1::new(
                    $peripherals.TWI,
                    $pins.pc4.into_pull_up_input(),
                    $pins.pc5.into_pull_up_input(),
                ));
            master.init(rate);
            master
        })
    }};
}

#[cfg(any(feature = "atmega328p", feature = "atmega168", feature = "atmega48p"))]
#[macro_export]
macro_rules! twi_external_pullup {
    ($peripherals:ident, $pins:ident, $clock:ty, $speed:expr) => {{
        $crate::twi::BitRate::for_clock::<$clock>($speed).map(|rate| {
            let mut master = $crate::twi::Master::new(
                $crate::twi::peripheral::TwiPeripheral1::with_external_pullup(
                    $peripherals.TWI,
                    $pins.pc4.into_floating_input(),
                    $pins.pc5.into_floating_input(),
                ),
            );
            master.init(rate);
            master
        })
    }};
}

#[cfg(any(feature = "atmega32u4", feature = "atmega1280", feature = "atmega2560"))]
#[macro_export]
macro_rules! twi {
    ($peripherals:ident, $pins:ident, $clock:ty, $speed:expr) => {{
        $crate::twi::BitRate::for_clock::<$clock>($speed).map(|rate| {
            let mut master =
                $crate::twi::Master::new($crate::twi::peripheral::TwiPeripheral1::new(
                    $peripherals.TWI,
                    $pins.pd1.into_pull_up_input(),
                    $pins.pd0.into_pull_up_input(),
                ));
            master.init(rate);
            master
        })
    }};
}

#[cfg(any(feature = "atmega32u4", feature = "atmega1280", feature = "atmega2560"))]
#[macro_export]
macro_rules! twi_external_pullup {
    ($peripherals:ident, $pins:ident, $clock:ty, $speed:expr) => {{
        $crate::twi::BitRate::for_clock::<$clock>($speed).map(|rate| {
            let mut master = $crate::twi::Master::new(
                $crate::twi::peripheral::TwiPeripheral1::with_external_pullup(
                    $peripherals.TWI,
                    $pins.pd1.into_floating_input(),
                    $pins.pd0.into_floating_input(),
                ),
            );
            master.init(rate);
            master
        })
    }};
}
