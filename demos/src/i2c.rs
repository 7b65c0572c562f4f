#![no_std]
#![no_main]

use avr_hal_generic::clock::MHz16;
use panic_halt as _;

use avr_twi::{
    time::PollLimit,
    twi::{Address, Direction, FailurePolicy, Master},
};

const DISPLAY: Address = Address::const_new(0x3c);

/// SSD1306 command stream: control byte, then commands.
const DISPLAY_ON: [u8; 3] = [0x00, 0x8D, 0xAF];

#[avr_device::entry]
fn main() -> ! {
    let peripherals = avr_twi::Peripherals::take().unwrap();
    let pins = avr_twi::pins!(peripherals);
    let mut led = pins.pb5.into_output();

    let twi = avr_twi::twi!(peripherals, pins, MHz16, 400_000).unwrap();
    let (regs, _) = twi.free();
    let mut twi = Master::with_deadline(regs, PollLimit::new(10_000u16));

    let sent = twi.start().and_then(|()| twi.send_address(DISPLAY, Direction::Write));
    let summary = match sent {
        Ok(()) => twi.send_bytes(DISPLAY_ON, FailurePolicy::Abort).result(),
        Err(err) => Err(err),
    };
    twi.stop();

    if summary.is_err() {
        twi.reset();
        led.set_high();
    }

    loop {
        avr_device::asm::sleep();
    }
}
