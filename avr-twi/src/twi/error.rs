use embedded_hal::i2c::{ErrorKind, NoAcknowledgeSource};

use super::{address::Direction, status::Status};

/// The bus phase an [`Error`] happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    Start,
    RepeatedStart,
    Address(Direction),
    Transmit,
    Receive,
    Stop,
}

impl core::fmt::Display for Phase {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            Self::Start => "start",
            Self::RepeatedStart => "repeated start",
            Self::Address(Direction::Write) => "SLA+W",
            Self::Address(Direction::Read) => "SLA+R",
            Self::Transmit => "transmit",
            Self::Receive => "receive",
            Self::Stop => "stop",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// The peripheral did not finish the phase before the deadline.
    Timeout(Phase),
    UnexpectedStatus {
        phase: Phase,
        expected: Status,
        actual: Status,
    },
    /// An embedded-hal caller passed an address above 0x7f.
    InvalidAddress(u8),
}

impl Error {
    #[inline]
    pub const fn phase(&self) -> Option<Phase> {
        match self {
            Self::Timeout(phase) => Some(*phase),
            Self::UnexpectedStatus { phase, .. } => Some(*phase),
            Self::InvalidAddress(_) => None,
        }
    }

    #[inline]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }

    /// The status the peripheral reported, if it finished the phase at all.
    #[inline]
    pub const fn status(&self) -> Option<Status> {
        match self {
            Self::UnexpectedStatus { actual, .. } => Some(*actual),
            _ => None,
        }
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Timeout(phase) => write!(f, "timed out during {}", phase),
            Self::UnexpectedStatus {
                phase,
                expected,
                actual,
            } => write!(
                f,
                "{} finished with status {}, expected {}",
                phase, actual, expected
            ),
            Self::InvalidAddress(raw) => write!(f, "{:#04x} is not a 7-bit address", raw),
        }
    }
}

impl embedded_hal::i2c::Error for Error {
    fn kind(&self) -> ErrorKind {
        match self.status() {
            Some(Status::MT_SLA_NACK) | Some(Status::MR_SLA_NACK) => {
                ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address)
            }
            Some(Status::MT_DATA_NACK) => ErrorKind::NoAcknowledge(NoAcknowledgeSource::Data),
            Some(Status::ARB_LOST) => ErrorKind::ArbitrationLoss,
            Some(Status::BUS_ERROR) => ErrorKind::Bus,
            _ => ErrorKind::Other,
        }
    }
}
