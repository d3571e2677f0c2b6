#![cfg_attr(not(test), no_std)]

#[cfg(feature = "board")]
use core::sync::atomic::{AtomicUsize, Ordering};

#[cfg(feature = "board")]
use defmt_rtt as _; // global logger
#[cfg(feature = "board")]
use panic_probe as _;

use embedded_hal::spi::{Mode, MODE_2};

#[macro_use]
mod fmt;

pub mod dispatcher;
pub mod error;
pub mod host;
#[cfg(feature = "board")]
pub mod hw;
pub mod protocol;
pub mod sampler;
pub mod sensors;
pub mod store;
pub mod transport;
pub mod trigger;

// Samples kept per channel
pub const BUFFER_CAPACITY: usize = 10;
pub const SAMPLE_RATE_HZ: u32 = 5_000;

pub const FIRMWARE_VERSION: u8 = 0x03;
pub const MODULE_ID: u8 = 0x08;

// Host drives the bus in mode 2, data on the falling edge
pub const RESPONDER_MODE: Mode = MODE_2;

#[cfg(feature = "board")]
static COUNT: AtomicUsize = AtomicUsize::new(0);
#[cfg(feature = "board")]
defmt::timestamp!("{=usize}", {
    let n = COUNT.load(Ordering::Relaxed);
    COUNT.store(n + 1, Ordering::Relaxed);
    n
});
