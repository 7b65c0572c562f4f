//! SCL clock configuration.
//!
//! The peripheral clocks SCL at `F_CPU / (16 + 2 * TWBR * prescaler)`. The
//! divisor is computed as `F_CPU / (8 * F_SCL) - 2`, which is exact for the
//! ÷4 prescaler, so [`BitRate`] always pairs the two.

/// Bus clock used when none is given.
pub const DEFAULT_BUS_CLOCK_HZ: u32 = 400_000;
pub const DEFAULT_CORE_CLOCK_HZ: u32 = 16_000_000;

/// Values of the TWPS bits in TWSR.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Prescaler {
    Div1 = 0b00,
    Div4 = 0b01,
    Div16 = 0b10,
    Div64 = 0b11,
}

impl Prescaler {
    #[inline(always)]
    pub const fn bits(self) -> u8 {
        self as u8
    }

    #[inline]
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0b11 {
            0b00 => Self::Div1,
            0b01 => Self::Div4,
            0b10 => Self::Div16,
            _ => Self::Div64,
        }
    }

    #[inline]
    pub const fn factor(self) -> u32 {
        match self {
            Self::Div1 => 1,
            Self::Div4 => 4,
            Self::Div16 => 16,
            Self::Div64 => 64,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    ZeroBusClock,
    /// The divisor would be negative.
    BusClockTooFast,
    /// The divisor does not fit TWBR.
    BusClockTooSlow,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            Self::ZeroBusClock => "bus clock is zero",
            Self::BusClockTooFast => "bus clock too fast for core clock",
            Self::BusClockTooSlow => "bus clock too slow for core clock",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BitRate {
    divisor: u8,
    prescaler: Prescaler,
}

impl BitRate {
    pub const fn new(core_clock_hz: u32, bus_clock_hz: u32) -> Result<Self, ConfigError> {
        if bus_clock_hz == 0 {
            return Err(ConfigError::ZeroBusClock);
        }

        let quotient = core_clock_hz as u64 / (8 * bus_clock_hz as u64);
        if quotient < 2 {
            Err(ConfigError::BusClockTooFast)
        } else if quotient - 2 > u8::MAX as u64 {
            Err(ConfigError::BusClockTooSlow)
        } else {
            Ok(Self {
                divisor: (quotient - 2) as u8,
                prescaler: Prescaler::Div4,
            })
        }
    }

    /// Panics, at compile time in const context, on an invalid combination.
    pub const fn const_new(core_clock_hz: u32, bus_clock_hz: u32) -> Self {
        match Self::new(core_clock_hz, bus_clock_hz) {
            Ok(me) => me,
            Err(_) => panic!("Invalid bit rate"),
        }
    }

    #[cfg(feature = "chip")]
    #[inline]
    pub fn for_clock<CLOCK: avr_hal_generic::clock::Clock>(
        bus_clock_hz: u32,
    ) -> Result<Self, ConfigError> {
        Self::new(CLOCK::FREQ, bus_clock_hz)
    }

    #[inline(always)]
    pub const fn divisor(&self) -> u8 {
        self.divisor
    }

    #[inline(always)]
    pub const fn prescaler(&self) -> Prescaler {
        self.prescaler
    }

    /// The SCL frequency this setting yields on a core clocked at `core_clock_hz`.
    pub const fn bus_clock_hz(&self, core_clock_hz: u32) -> u32 {
        core_clock_hz / (16 + 2 * self.divisor as u32 * self.prescaler.factor())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    pub core_clock_hz: u32,
    pub bus_clock_hz: u32,
}

impl Default for Config {
    #[inline]
    fn default() -> Self {
        Self {
            core_clock_hz: DEFAULT_CORE_CLOCK_HZ,
            bus_clock_hz: DEFAULT_BUS_CLOCK_HZ,
        }
    }
}

impl Config {
    #[inline]
    pub const fn new(core_clock_hz: u32, bus_clock_hz: u32) -> Self {
        Self {
            core_clock_hz,
            bus_clock_hz,
        }
    }

    #[inline]
    pub const fn bus_clock(mut self, bus_clock_hz: u32) -> Self {
        self.bus_clock_hz = bus_clock_hz;
        self
    }

    #[inline]
    pub const fn bit_rate(&self) -> Result<BitRate, ConfigError> {
        BitRate::new(self.core_clock_hz, self.bus_clock_hz)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fast_mode_at_16mhz() {
        let rate = Config::default().bit_rate().unwrap();
        assert_eq!(rate.divisor(), 3);
        assert_eq!(rate.prescaler(), Prescaler::Div4);
        assert_eq!(rate.bus_clock_hz(16_000_000), 400_000);
    }

    #[test]
    fn standard_mode_at_16mhz() {
        let rate = BitRate::new(16_000_000, 100_000).unwrap();
        assert_eq!(rate.divisor(), 18);
        assert_eq!(rate.bus_clock_hz(16_000_000), 100_000);
    }

    #[test]
    fn divisor_underflow_is_rejected() {
        assert_eq!(
            BitRate::new(1_000_000, 100_000),
            Err(ConfigError::BusClockTooFast)
        );
        assert_eq!(BitRate::new(16_000_000, 0), Err(ConfigError::ZeroBusClock));
        assert_eq!(BitRate::new(16_000_000, 1_000_000).map(|r| r.divisor()), Ok(0));
    }

    #[test]
    fn divisor_overflow_is_rejected() {
        assert_eq!(
            BitRate::new(20_000_000, 1_000),
            Err(ConfigError::BusClockTooSlow)
        );
    }

    #[test]
    fn const_construction() {
        const RATE: BitRate = BitRate::const_new(8_000_000, 100_000);
        assert_eq!(RATE.divisor(), 8);
    }
}
