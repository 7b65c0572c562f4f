//! embedded-hal 1.0 blocking I2C on top of [`Master`].

use embedded_hal::i2c::{ErrorType, I2c, Operation, SevenBitAddress};

use super::{
    address::{Address, Direction},
    error::Error,
    master::{FailurePolicy, Master},
    registers::TwiRegisters,
};
use crate::time::Deadline;

impl<R: TwiRegisters, D: Deadline> ErrorType for Master<R, D> {
    type Error = Error;
}

/// A zero-length read has no bus phase: the peripheral cannot end a read
/// before clocking in at least one byte.
fn is_empty_read(operation: &Operation<'_>) -> bool {
    matches!(operation, Operation::Read(buf) if buf.is_empty())
}

impl<R: TwiRegisters, D: Deadline> Master<R, D> {
    fn run(&mut self, address: Address, operations: &mut [Operation<'_>]) -> Result<(), Error> {
        let mut open: Option<Direction> = None;

        for i in 0..operations.len() {
            let read_follows = operations[i + 1..]
                .iter()
                .find(|op| !is_empty_read(op))
                .map_or(false, |op| matches!(op, Operation::Read(_)));

            match &mut operations[i] {
                Operation::Write(bytes) => {
                    if open != Some(Direction::Write) {
                        self.open(address, Direction::Write, open.is_some())?;
                        open = Some(Direction::Write);
                    }
                    self.send_bytes(bytes.iter().copied(), FailurePolicy::Abort)
                        .result()?;
                }
                Operation::Read(buf) if buf.is_empty() => {}
                Operation::Read(buf) => {
                    if open != Some(Direction::Read) {
                        self.open(address, Direction::Read, open.is_some())?;
                        open = Some(Direction::Read);
                    }
                    self.receive_into(buf, !read_follows)?;
                }
            }
        }

        Ok(())
    }
}

impl<R: TwiRegisters, D: Deadline> I2c<SevenBitAddress> for Master<R, D> {
    fn transaction(
        &mut self,
        address: SevenBitAddress,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        let address = Address::new(address).map_err(|_| Error::InvalidAddress(address))?;
        if operations.iter().all(is_empty_read) {
            return Ok(());
        }

        let res = self.run(address, operations);
        self.stop();
        res
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::twi::{
        mock::{Access, MockTwi},
        status::Status,
    };

    #[test]
    fn rejects_eight_bit_address() {
        let mut twi = MockTwi::new();
        let mut master = Master::new(&mut twi);

        assert_eq!(
            master.write(0x80, &[1]),
            Err(Error::InvalidAddress(0x80))
        );
        assert!(twi.trace().is_empty());
    }

    #[test]
    fn adjacent_operations_share_a_phase() {
        let mut twi = MockTwi::new();
        twi.script(&[
            Status::START,
            Status::MT_SLA_ACK,
            Status::MT_DATA_ACK,
            Status::MT_DATA_ACK,
            Status::REP_START,
            Status::MR_SLA_ACK,
            Status::MR_DATA_ACK,
            Status::MR_DATA_NACK,
        ])
        .incoming(&[0xDE, 0xAD]);
        let mut master = Master::new(&mut twi);

        let mut first = [0; 1];
        let mut second = [0; 1];
        let res = master.transaction(
            0x50,
            &mut [
                Operation::Write(&[0x01]),
                Operation::Write(&[0x02]),
                Operation::Read(&mut first),
                Operation::Read(&mut second),
            ],
        );

        assert_eq!(res, Ok(()));
        assert_eq!((first, second), ([0xDE], [0xAD]));
        assert_eq!(
            twi.trace(),
            &[
                Access::Control(0xA4),
                Access::Data(0xA0),
                Access::Control(0x84),
                Access::Data(0x01),
                Access::Control(0x84),
                Access::Data(0x02),
                Access::Control(0x84),
                Access::Control(0xA4),
                Access::Data(0xA1),
                Access::Control(0x84),
                Access::Control(0xC4),
                Access::Control(0x84),
                Access::Control(0x94),
            ]
        );
    }

    #[test]
    fn data_nack_ends_transaction_with_stop() {
        use embedded_hal::i2c::{Error as _, ErrorKind, NoAcknowledgeSource};

        let mut twi = MockTwi::new();
        twi.script(&[Status::START, Status::MT_SLA_ACK, Status::MT_DATA_NACK]);
        let mut master = Master::new(&mut twi);

        let err = master.write(0x50, &[1, 2, 3]).unwrap_err();
        assert_eq!(
            err.kind(),
            ErrorKind::NoAcknowledge(NoAcknowledgeSource::Data)
        );
        assert_eq!(twi.sent().collect::<Vec<_>>(), [0xA0, 1]);
        assert_eq!(twi.trace().last(), Some(&Access::Control(0x94)));
    }

    #[test]
    fn empty_reads_are_skipped() {
        let mut twi = MockTwi::new();
        let mut master = Master::new(&mut twi);

        assert_eq!(master.read(0x50, &mut []), Ok(()));
        assert_eq!(
            master.transaction(0x50, &mut [Operation::Read(&mut []), Operation::Read(&mut [])]),
            Ok(())
        );
        assert!(twi.trace().is_empty());
    }

    #[test]
    fn trailing_empty_read_still_nacks_last_byte() {
        let mut twi = MockTwi::new();
        twi.script(&[Status::START, Status::MR_SLA_ACK, Status::MR_DATA_NACK])
            .incoming(&[0x5A]);
        let mut master = Master::new(&mut twi);

        let mut buf = [0; 1];
        let res = master.transaction(
            0x50,
            &mut [Operation::Read(&mut buf), Operation::Read(&mut [])],
        );

        assert_eq!(res, Ok(()));
        assert_eq!(buf, [0x5A]);
        assert_eq!(
            twi.trace(),
            &[
                Access::Control(0xA4),
                Access::Data(0xA1),
                Access::Control(0x84),
                Access::Control(0x84),
                Access::Control(0x94),
            ]
        );
    }

    #[test]
    fn empty_read_after_write_skips_repeated_start() {
        let mut twi = MockTwi::new();
        twi.script(&[Status::START, Status::MT_SLA_ACK, Status::MT_DATA_ACK]);
        let mut master = Master::new(&mut twi);

        assert_eq!(master.write_read(0x50, &[0x10], &mut []), Ok(()));
        assert_eq!(
            twi.trace(),
            &[
                Access::Control(0xA4),
                Access::Data(0xA0),
                Access::Control(0x84),
                Access::Data(0x10),
                Access::Control(0x84),
                Access::Control(0x94),
            ]
        );
    }
}
