use super::bitrate::Prescaler;

/// Raw access to a TWI register block.
///
/// Implemented for the chip's `TWI` peripheral and for the simulated bus in
/// [`super::mock`].
pub trait TwiRegisters {
    fn read_control(&mut self) -> u8;

    fn write_control(&mut self, bits: u8);

    /// Unmasked TWSR, status and prescaler bits together.
    fn read_status(&mut self) -> u8;

    fn read_data(&mut self) -> u8;

    fn write_data(&mut self, byte: u8);

    fn write_bit_rate(&mut self, divisor: u8);

    fn write_prescaler(&mut self, prescaler: Prescaler);

    fn read_bit_rate(&mut self) -> u8;
}

impl<R: TwiRegisters + ?Sized> TwiRegisters for &mut R {
    #[inline(always)]
    fn read_control(&mut self) -> u8 {
        (**self).read_control()
    }

    #[inline(always)]
    fn write_control(&mut self, bits: u8) {
        (**self).write_control(bits)
    }

    #[inline(always)]
    fn read_status(&mut self) -> u8 {
        (**self).read_status()
    }

    #[inline(always)]
    fn read_data(&mut self) -> u8 {
        (**self).read_data()
    }

    #[inline(always)]
    fn write_data(&mut self, byte: u8) {
        (**self).write_data(byte)
    }

    #[inline(always)]
    fn write_bit_rate(&mut self, divisor: u8) {
        (**self).write_bit_rate(divisor)
    }

    #[inline(always)]
    fn write_prescaler(&mut self, prescaler: Prescaler) {
        (**self).write_prescaler(prescaler)
    }

    #[inline(always)]
    fn read_bit_rate(&mut self) -> u8 {
        (**self).read_bit_rate()
    }
}
