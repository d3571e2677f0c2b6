use core::sync::atomic::{AtomicBool, AtomicU8, Ordering};

use embedded_hal::spi::{Mode, Phase, Polarity};
use stm32g0xx_hal::rcc::Rcc;
use stm32g0xx_hal::stm32g0::stm32g070::{GPIOA, RCC, SPI1};

use crate::transport::{ByteTransport, Collision, TransferStatus};

// Written by the SPI1 interrupt, read by the dispatcher
static COMPLETE: AtomicBool = AtomicBool::new(false);
static RECEIVED: AtomicU8 = AtomicU8::new(0);

// PA5 - SPI1_SCK, PA6 - SPI1_MISO, PA7 - SPI1_MOSI
const SCK: u32 = 5;
const MISO: u32 = 6;
const MOSI: u32 = 7;

const MODE_INPUT: u32 = 0b00;
const MODE_ALTERNATE: u32 = 0b10;

// SPI1 interrupt handler
pub fn on_transfer_complete() {
    let spi = unsafe { &(*SPI1::ptr()) };
    if spi.sr.read().rxne().bit_is_set() {
        // 8-bit access, a 16-bit read would pop two bytes from the FIFO
        let byte = unsafe { core::ptr::read_volatile(&spi.dr as *const _ as *const u8) };
        RECEIVED.store(byte, Ordering::Relaxed);
        COMPLETE.store(true, Ordering::Release);
    }
}

pub struct SpiResponder {
    spi: SPI1,
    in_flight: bool,
    collided: bool,
}

// FIXME Move this in some fashionable way upstream

impl SpiResponder {
    pub fn new(pac_spi: SPI1, rcc: &mut Rcc) -> Self {
        SpiResponder::enable_clock_and_reset(rcc);
        let mut responder = SpiResponder {
            spi: pac_spi,
            in_flight: false,
            collided: false,
        };
        responder.configure_pins();
        responder
    }

    fn configure(&mut self, mode: Mode) {
        self.spi.cr1.write(|w| {
            w.cpha().bit(mode.phase == Phase::CaptureOnSecondTransition);
            w.cpol().bit(mode.polarity == Polarity::IdleHigh);
            // Slave, MSB first
            w.mstr().clear_bit();
            w.lsbfirst().clear_bit();
            // Software NSS, always selected while enabled
            w.ssm().set_bit();
            w.ssi().clear_bit()
        });
        self.spi.cr2.write(|w| unsafe {
            // 8-bit frames
            w.ds().bits(0b0111);
            // RXNE on a single byte
            w.frxth().set_bit();
            w.rxneie().set_bit()
        });
        self.spi.cr1.modify(|_, w| w.spe().set_bit());
    }

    fn configure_pins(&mut self) {
        let gpioa = unsafe { &(*GPIOA::ptr()) };
        // AF0 on all three pins
        gpioa.afrl.modify(|r, w| unsafe {
            w.bits(r.bits() & !((0xf << (SCK * 4)) | (0xf << (MISO * 4)) | (0xf << (MOSI * 4))))
        });
        set_pin_mode(SCK, MODE_ALTERNATE);
        set_pin_mode(MOSI, MODE_ALTERNATE);
        set_pin_mode(MISO, MODE_INPUT);
    }

    fn enable_clock_and_reset(_: &mut Rcc) {
        let rcc = unsafe { &(*RCC::ptr()) };
        rcc.apbenr2.modify(|_, w| w.spi1en().set_bit());
        SpiResponder::reset();
    }

    // Also flushes whatever is left in the TX FIFO
    fn reset() {
        let rcc = unsafe { &(*RCC::ptr()) };
        rcc.apbrstr2.modify(|_, w| w.spi1rst().set_bit());
        rcc.apbrstr2.modify(|_, w| w.spi1rst().clear_bit());
    }
}

impl ByteTransport for SpiResponder {
    fn init_as_responder(&mut self, mode: Mode) {
        SpiResponder::reset();
        COMPLETE.store(false, Ordering::Relaxed);
        self.in_flight = false;
        self.collided = false;
        self.configure(mode);
        set_pin_mode(MISO, MODE_ALTERNATE);
    }

    fn put(&mut self, byte: u8) -> Result<(), Collision> {
        if self.in_flight || self.spi.sr.read().txe().bit_is_clear() {
            self.collided = true;
            return Err(Collision);
        }
        COMPLETE.store(false, Ordering::Relaxed);
        self.in_flight = true;
        unsafe { core::ptr::write_volatile(&self.spi.dr as *const _ as *mut u8, byte) };
        Ok(())
    }

    fn get(&mut self) -> u8 {
        RECEIVED.load(Ordering::Relaxed)
    }

    fn wait(&mut self) {
        while !COMPLETE.load(Ordering::Acquire) {
            cortex_m::asm::nop();
        }
        self.in_flight = false;
    }

    fn status(&self) -> TransferStatus {
        TransferStatus {
            transfer_complete: COMPLETE.load(Ordering::Acquire),
            write_collision: self.collided,
        }
    }

    fn release(&mut self) {
        self.spi.cr2.modify(|_, w| w.rxneie().clear_bit());
        self.spi.cr1.modify(|_, w| w.spe().clear_bit());
        // Stop driving MISO so other modules can share the bus
        set_pin_mode(MISO, MODE_INPUT);
        self.in_flight = false;
    }
}

fn set_pin_mode(pin: u32, mode: u32) {
    let gpioa = unsafe { &(*GPIOA::ptr()) };
    gpioa.moder.modify(|r, w| unsafe {
        w.bits((r.bits() & !(0b11 << (pin * 2))) | mode << (pin * 2))
    });
}
