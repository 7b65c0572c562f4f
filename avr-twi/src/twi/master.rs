//! Blocking master-mode sequencer.
//!
//! Every phase writes TWCR (and TWDR where needed), polls until TWINT is
//! set again and compares the masked TWSR against the status that phase is
//! supposed to end with.

use log::{debug, trace, warn};

use super::{
    address::{Address, Direction},
    bitrate::{BitRate, Prescaler},
    error::{Error, Phase},
    registers::TwiRegisters,
    status::{control, Status},
};
use crate::time::{Deadline, Unbounded};

/// What [`Master::send_bytes`] does when a byte is not acknowledged.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FailurePolicy {
    /// Keep sending the remaining bytes. A timeout still ends the send, the
    /// peripheral is not accepting data at that point.
    #[default]
    Continue,
    Abort,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SendSummary {
    /// Bytes clocked out, acknowledged or not.
    pub sent: usize,
    pub acknowledged: usize,
    pub first_error: Option<Error>,
}

impl SendSummary {
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.first_error.is_none()
    }

    /// Number of bytes sent, or the first failure.
    #[inline]
    pub fn result(self) -> Result<usize, Error> {
        match self.first_error {
            None => Ok(self.sent),
            Some(err) => Err(err),
        }
    }
}

pub struct Master<R: TwiRegisters, D: Deadline = Unbounded> {
    regs: R,
    deadline: D,
}

impl<R: TwiRegisters> Master<R, Unbounded> {
    /// A sequencer that waits for the peripheral for as long as it takes.
    #[inline]
    pub fn new(regs: R) -> Self {
        Self::with_deadline(regs, Unbounded)
    }
}

impl<R: TwiRegisters, D: Deadline> Master<R, D> {
    #[inline]
    pub fn with_deadline(regs: R, deadline: D) -> Self {
        Self { regs, deadline }
    }

    #[inline]
    pub fn free(self) -> (R, D) {
        (self.regs, self.deadline)
    }

    #[inline(always)]
    pub fn registers(&mut self) -> &mut R {
        &mut self.regs
    }

    /// Program prescaler and bit rate, then enable the peripheral. Must run
    /// once before anything else.
    pub fn init(&mut self, rate: BitRate) {
        trace!(
            "twi: init TWBR={} prescaler={:?}",
            rate.divisor(),
            rate.prescaler()
        );
        self.regs.write_prescaler(rate.prescaler());
        self.regs.write_bit_rate(rate.divisor());
        self.regs.write_control(control::TWEN);
    }

    pub fn start(&mut self) -> Result<(), Error> {
        self.issue(control::START, Phase::Start, Status::START)
    }

    /// Start again without releasing the bus in between.
    pub fn repeated_start(&mut self) -> Result<(), Error> {
        self.issue(control::START, Phase::RepeatedStart, Status::REP_START)
    }

    pub fn send_address(&mut self, address: Address, direction: Direction) -> Result<(), Error> {
        self.regs.write_data(address.with_direction(direction));
        let expected = match direction {
            Direction::Write => Status::MT_SLA_ACK,
            Direction::Read => Status::MR_SLA_ACK,
        };
        self.issue(control::TRANSMIT, Phase::Address(direction), expected)
    }

    pub fn send_byte(&mut self, byte: u8) -> Result<(), Error> {
        self.regs.write_data(byte);
        self.issue(control::TRANSMIT, Phase::Transmit, Status::MT_DATA_ACK)
    }

    /// Send `bytes` in order, one [`Master::send_byte`] each.
    pub fn send_bytes<I>(&mut self, bytes: I, policy: FailurePolicy) -> SendSummary
    where
        I: IntoIterator<Item = u8>,
    {
        let mut summary = SendSummary::default();

        for byte in bytes {
            summary.sent += 1;
            match self.send_byte(byte) {
                Ok(()) => summary.acknowledged += 1,
                Err(err) => {
                    summary.first_error.get_or_insert(err);
                    if policy == FailurePolicy::Abort || err.is_timeout() {
                        break;
                    }
                }
            }
        }

        summary
    }

    /// Clock in one byte. `ack` tells the transmitter more bytes are wanted,
    /// the last byte of a read must be answered with NACK.
    pub fn receive_byte(&mut self, ack: bool) -> Result<u8, Error> {
        let (command, expected) = if ack {
            (control::RECEIVE_ACK, Status::MR_DATA_ACK)
        } else {
            (control::RECEIVE_NACK, Status::MR_DATA_NACK)
        };
        self.issue(command, Phase::Receive, expected)?;
        Ok(self.regs.read_data())
    }

    /// Release the bus. The peripheral does not raise TWINT for this phase.
    #[inline]
    pub fn stop(&mut self) {
        trace!("twi: stop");
        self.regs.write_control(control::STOP);
    }

    /// Like [`Master::stop`], but also wait for the stop condition to have
    /// left the bus.
    pub fn stop_blocking(&mut self) -> Result<(), Error> {
        self.stop();
        self.deadline.arm();
        while self.regs.read_control() & control::TWSTO != 0 {
            if self.deadline.expired() {
                warn!("twi: stop condition never released the bus");
                return Err(Error::Timeout(Phase::Stop));
            }
        }
        Ok(())
    }

    /// Disable the peripheral and bring it back with the same bit rate,
    /// dropping whatever phase it was stuck in.
    pub fn reset(&mut self) {
        let twbr = self.regs.read_bit_rate();
        let prescaler = Prescaler::from_bits(self.regs.read_status());
        debug!("twi: reset");
        self.regs.write_control(0);
        self.regs.write_bit_rate(twbr);
        self.regs.write_prescaler(prescaler);
        self.regs.write_control(control::TWEN);
    }

    /// Poll until the peripheral finished the current phase.
    pub fn await_completion(&mut self, phase: Phase) -> Result<(), Error> {
        self.deadline.arm();
        while self.regs.read_control() & control::TWINT == 0 {
            if self.deadline.expired() {
                warn!("twi: timed out during {}", phase);
                return Err(Error::Timeout(phase));
            }
        }
        Ok(())
    }

    #[inline]
    pub fn status(&mut self) -> Status {
        Status::from_register(self.regs.read_status())
    }

    #[inline]
    pub fn check_status(&mut self, expected: Status) -> bool {
        self.status() == expected
    }

    fn issue(&mut self, command: u8, phase: Phase, expected: Status) -> Result<(), Error> {
        trace!("twi: {} TWCR={:#04x}", phase, command);
        self.regs.write_control(command);
        self.await_completion(phase)?;

        if self.check_status(expected) {
            Ok(())
        } else {
            let actual = self.status();
            debug!("twi: {} got {}, expected {}", phase, actual, expected);
            Err(Error::UnexpectedStatus {
                phase,
                expected,
                actual,
            })
        }
    }

    /// (Repeated) start followed by the address phase.
    pub(crate) fn open(
        &mut self,
        address: Address,
        direction: Direction,
        repeated: bool,
    ) -> Result<(), Error> {
        if repeated {
            self.repeated_start()?;
        } else {
            self.start()?;
        }
        self.send_address(address, direction)
    }

    pub(crate) fn receive_into(&mut self, buf: &mut [u8], nack_last: bool) -> Result<(), Error> {
        let last = buf.len().saturating_sub(1);
        for (i, slot) in buf.iter_mut().enumerate() {
            *slot = self.receive_byte(!(nack_last && i == last))?;
        }
        Ok(())
    }

    /// Write `bytes` to `address` in one transaction. Stop is issued even
    /// when a phase failed.
    pub fn write_to(&mut self, address: Address, bytes: &[u8]) -> Result<(), Error> {
        let res = self.open(address, Direction::Write, false).and_then(|()| {
            self.send_bytes(bytes.iter().copied(), FailurePolicy::Abort)
                .result()
                .map(drop)
        });
        self.stop();
        res
    }

    /// Fill `buf` from `address`, NACKing the last byte. An empty `buf` never
    /// touches the bus: STOP is not a legal answer to an acknowledged SLA+R.
    pub fn read_from(&mut self, address: Address, buf: &mut [u8]) -> Result<(), Error> {
        if buf.is_empty() {
            return Ok(());
        }

        let res = self
            .open(address, Direction::Read, false)
            .and_then(|()| self.receive_into(buf, true));
        self.stop();
        res
    }

    /// Write `bytes`, then read into `buf` after a repeated start. With an
    /// empty `buf` this is [`Master::write_to`].
    pub fn write_read_from(
        &mut self,
        address: Address,
        bytes: &[u8],
        buf: &mut [u8],
    ) -> Result<(), Error> {
        if buf.is_empty() {
            return self.write_to(address, bytes);
        }

        let res = self
            .open(address, Direction::Write, false)
            .and_then(|()| {
                self.send_bytes(bytes.iter().copied(), FailurePolicy::Abort)
                    .result()
                    .map(drop)
            })
            .and_then(|()| self.open(address, Direction::Read, true))
            .and_then(|()| self.receive_into(buf, true));
        self.stop();
        res
    }
}
