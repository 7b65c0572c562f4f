//! TWSR status codes and TWCR command words.

/// Only the upper five bits of TWSR carry the status, the rest holds the
/// prescaler selection.
pub const STATUS_MASK: u8 = 0xF8;

/// A masked TWSR value.
#[derive(Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(transparent)]
pub struct Status(u8);

impl Status {
    pub const BUS_ERROR: Self = Self(0x00);
    pub const START: Self = Self(0x08);
    pub const REP_START: Self = Self(0x10);
    pub const MT_SLA_ACK: Self = Self(0x18);
    pub const MT_SLA_NACK: Self = Self(0x20);
    pub const MT_DATA_ACK: Self = Self(0x28);
    pub const MT_DATA_NACK: Self = Self(0x30);
    pub const ARB_LOST: Self = Self(0x38);
    pub const MR_SLA_ACK: Self = Self(0x40);
    pub const MR_SLA_NACK: Self = Self(0x48);
    pub const MR_DATA_ACK: Self = Self(0x50);
    pub const MR_DATA_NACK: Self = Self(0x58);
    pub const NO_INFO: Self = Self(0xF8);

    #[inline(always)]
    pub const fn from_register(twsr: u8) -> Self {
        Self(twsr & STATUS_MASK)
    }

    #[inline(always)]
    pub const fn bits(&self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn is_nack(&self) -> bool {
        matches!(self.0, 0x20 | 0x30 | 0x48)
    }

    const fn name(&self) -> Option<&'static str> {
        Some(match self.0 {
            0x00 => "bus error",
            0x08 => "start sent",
            0x10 => "repeated start sent",
            0x18 => "SLA+W acked",
            0x20 => "SLA+W nacked",
            0x28 => "data sent, acked",
            0x30 => "data sent, nacked",
            0x38 => "arbitration lost",
            0x40 => "SLA+R acked",
            0x48 => "SLA+R nacked",
            0x50 => "data received, acked",
            0x58 => "data received, nacked",
            0xF8 => "no info",
            _ => return None,
        })
    }
}

impl core::fmt::Debug for Status {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Status({:#04x})", self.0)
    }
}

impl core::fmt::Display for Status {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{:#04x} ({})", self.0, name),
            None => write!(f, "{:#04x}", self.0),
        }
    }
}

pub mod control {
    pub const TWINT: u8 = 0x80;
    pub const TWEA: u8 = 0x40;
    pub const TWSTA: u8 = 0x20;
    pub const TWSTO: u8 = 0x10;
    pub const TWWC: u8 = 0x08;
    pub const TWEN: u8 = 0x04;
    pub const TWIE: u8 = 0x01;

    /// 1010 0100
    pub const START: u8 = TWINT | TWSTA | TWEN;
    /// 1000 0100, clocks TWDR out or a byte in answered with NACK
    pub const TRANSMIT: u8 = TWINT | TWEN;
    /// 1100 0100
    pub const RECEIVE_ACK: u8 = TWINT | TWEA | TWEN;
    pub const RECEIVE_NACK: u8 = TRANSMIT;
    /// 1001 0100
    pub const STOP: u8 = TWINT | TWSTO | TWEN;
}
