mod adc;
mod helper;
mod spi;
mod timers;

pub use adc::AnalogFrontEnd;
pub use helper::*;
pub use spi::{on_transfer_complete, SpiResponder};
pub use timers::{ChipSelect, SampleTimer};
