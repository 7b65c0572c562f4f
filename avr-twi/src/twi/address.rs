/// A 7-bit bus address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[non_exhaustive]
pub struct Address(u8);

impl core::fmt::Display for Address {
    #[inline(always)]
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:#04x}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[non_exhaustive]
pub struct InvalidAddress;

impl core::fmt::Display for InvalidAddress {
    #[inline]
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("address does not fit in 7 bits")
    }
}

/// Value of the R/W bit sent after the address.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    Write = 0,
    Read = 1,
}

impl Address {
    pub const MAX: u8 = 0b0111_1111;

    #[inline]
    pub const fn new(me: u8) -> Result<Self, InvalidAddress> {
        if me > Self::MAX {
            Err(InvalidAddress)
        } else {
            Ok(Self(me))
        }
    }

    #[inline]
    pub const fn const_new(me: u8) -> Self {
        if me > Self::MAX {
            panic!("Invalid address")
        } else {
            Self(me)
        }
    }

    #[inline(always)]
    pub const fn get(&self) -> u8 {
        self.0
    }

    /// The byte clocked out during the address phase: address in the upper
    /// seven bits, R/W in bit 0.
    #[inline]
    pub const fn with_direction(&self, direction: Direction) -> u8 {
        (self.0 << 1) | direction as u8
    }

    #[inline]
    pub const fn as_write_byte(&self) -> u8 {
        self.with_direction(Direction::Write)
    }

    #[inline]
    pub const fn as_read_byte(&self) -> u8 {
        self.with_direction(Direction::Read)
    }
}

impl TryFrom<u8> for Address {
    type Error = InvalidAddress;

    #[inline(always)]
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Address> for u8 {
    #[inline(always)]
    fn from(address: Address) -> u8 {
        address.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_eight_bit_values() {
        assert_eq!(Address::new(0x80), Err(InvalidAddress));
        assert_eq!(Address::try_from(0xFF), Err(InvalidAddress));
        assert_eq!(Address::new(0x7F).map(u8::from), Ok(0x7F));
    }

    #[test]
    fn direction_lands_in_bit_zero() {
        for raw in 0..=Address::MAX {
            let address = Address::const_new(raw);

            let write = address.with_direction(Direction::Write);
            assert_eq!(write & 1, 0);
            assert_eq!(write >> 1, raw);

            let read = address.with_direction(Direction::Read);
            assert_eq!(read & 1, 1);
            assert_eq!(read >> 1, raw);
        }
    }

    #[test]
    fn display_is_hex() {
        assert_eq!(format!("{}", Address::const_new(0x50)), "0x50");
    }
}
