//! A simulated TWI register block.
//!
//! Every write that sets TWINT starts a phase which completes after
//! `latency` unsuccessful polls of TWCR, loading the next scripted status
//! into TWSR. Register writes are recorded in order.

use heapless::{Deque, Vec};

use super::{
    bitrate::Prescaler,
    registers::TwiRegisters,
    status::{control, Status},
};

pub const CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Control(u8),
    Data(u8),
    BitRate(u8),
    Prescaler(Prescaler),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Busy {
    Phase(u32),
    Stop(u32),
}

pub struct MockTwi {
    control: u8,
    status: Status,
    prescaler: Prescaler,
    bit_rate: u8,
    data: u8,
    statuses: Deque<Status, CAPACITY>,
    incoming: Deque<u8, CAPACITY>,
    latency: u32,
    busy: Option<Busy>,
    stuck: bool,
    polls: u32,
    trace: Vec<Access, CAPACITY>,
}

impl Default for MockTwi {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTwi {
    pub fn new() -> Self {
        Self {
            control: 0,
            status: Status::NO_INFO,
            prescaler: Prescaler::Div1,
            bit_rate: 0,
            data: 0,
            statuses: Deque::new(),
            incoming: Deque::new(),
            latency: 0,
            busy: None,
            stuck: false,
            polls: 0,
            trace: Vec::new(),
        }
    }

    /// Polls of TWCR that still read TWINT clear after a phase is started.
    #[inline]
    pub fn with_latency(mut self, latency: u32) -> Self {
        self.latency = latency;
        self
    }

    /// Queue the statuses reported by the next phases, in order. Once the
    /// queue runs dry phases report [`Status::NO_INFO`].
    pub fn script(&mut self, statuses: &[Status]) -> &mut Self {
        for status in statuses {
            if self.statuses.push_back(*status).is_err() {
                panic!("status script longer than {}", CAPACITY);
            }
        }
        self
    }

    /// Queue bytes returned by successive TWDR reads.
    pub fn incoming(&mut self, bytes: &[u8]) -> &mut Self {
        for byte in bytes {
            if self.incoming.push_back(*byte).is_err() {
                panic!("more than {} incoming bytes", CAPACITY);
            }
        }
        self
    }

    /// A stuck bus never completes a phase nor releases a stop condition.
    #[inline]
    pub fn set_stuck(&mut self, stuck: bool) {
        self.stuck = stuck;
    }

    #[inline]
    pub fn trace(&self) -> &[Access] {
        &self.trace
    }

    #[inline]
    pub fn clear_trace(&mut self) {
        self.trace.clear();
    }

    /// Data bytes written, in order.
    pub fn sent(&self) -> impl Iterator<Item = u8> + '_ {
        self.trace.iter().filter_map(|access| match access {
            Access::Data(byte) => Some(*byte),
            _ => None,
        })
    }

    #[inline]
    pub fn polls(&self) -> u32 {
        self.polls
    }

    #[inline]
    pub fn remaining_statuses(&self) -> usize {
        self.statuses.len()
    }

    #[inline]
    fn record(&mut self, access: Access) {
        if self.trace.push(access).is_err() {
            panic!("register trace longer than {}", CAPACITY);
        }
    }

    fn advance(&mut self) {
        if self.stuck {
            return;
        }

        self.busy = match self.busy.take() {
            Some(Busy::Phase(0)) => {
                self.control |= control::TWINT;
                self.status = self.statuses.pop_front().unwrap_or(Status::NO_INFO);
                None
            }
            Some(Busy::Stop(0)) => {
                self.control &= !control::TWSTO;
                None
            }
            Some(Busy::Phase(n)) => Some(Busy::Phase(n - 1)),
            Some(Busy::Stop(n)) => Some(Busy::Stop(n - 1)),
            None => None,
        };
    }
}

impl TwiRegisters for MockTwi {
    fn read_control(&mut self) -> u8 {
        self.polls += 1;
        self.advance();
        self.control
    }

    fn write_control(&mut self, bits: u8) {
        self.record(Access::Control(bits));

        // Writing one to TWINT clears it and kicks off the next phase.
        if bits & control::TWINT == 0 {
            self.control = bits;
            return;
        }
        self.control = bits & !control::TWINT;
        self.busy = Some(if bits & control::TWSTO != 0 {
            Busy::Stop(self.latency)
        } else {
            Busy::Phase(self.latency)
        });
    }

    fn read_status(&mut self) -> u8 {
        self.status.bits() | self.prescaler.bits()
    }

    fn read_data(&mut self) -> u8 {
        if let Some(byte) = self.incoming.pop_front() {
            self.data = byte;
        }
        self.data
    }

    fn write_data(&mut self, byte: u8) {
        self.record(Access::Data(byte));
        self.data = byte;
    }

    fn write_bit_rate(&mut self, divisor: u8) {
        self.record(Access::BitRate(divisor));
        self.bit_rate = divisor;
    }

    fn write_prescaler(&mut self, prescaler: Prescaler) {
        self.record(Access::Prescaler(prescaler));
        self.prescaler = prescaler;
    }

    fn read_bit_rate(&mut self) -> u8 {
        self.bit_rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_completes_after_latency() {
        let mut twi = MockTwi::new().with_latency(2);
        twi.script(&[Status::START]);
        twi.write_control(control::START);

        assert_eq!(twi.read_control() & control::TWINT, 0);
        assert_eq!(twi.read_control() & control::TWINT, 0);
        assert_ne!(twi.read_control() & control::TWINT, 0);
        assert_eq!(Status::from_register(twi.read_status()), Status::START);
    }

    #[test]
    fn stuck_bus_never_completes() {
        let mut twi = MockTwi::new();
        twi.set_stuck(true);
        twi.write_control(control::START);
        assert!((0..100).all(|_| twi.read_control() & control::TWINT == 0));
    }

    #[test]
    fn stop_releases_twsto() {
        let mut twi = MockTwi::new().with_latency(1);
        twi.write_control(control::STOP);
        assert_ne!(twi.read_control() & control::TWSTO, 0);
        assert_eq!(twi.read_control() & control::TWSTO, 0);
    }
}
