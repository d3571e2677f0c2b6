use stm32g0xx_hal::gpio::gpioa::{PA0, PA1, PA4};
use stm32g0xx_hal::gpio::gpiob::PB1;
use stm32g0xx_hal::gpio::{Analog, DefaultMode, Input, Output, PullUp, PushPull};
use stm32g0xx_hal::rcc::{Config, PllConfig, Rcc, RccExt};
use stm32g0xx_hal::stm32g0::stm32g070::{CRC, RCC};

pub fn init_clock(pac_rcc: RCC) -> Rcc {
    // ((16 MHz / 4) * 32) / 2 = 64 MHz
    let pll_config = PllConfig::with_hsi(4, 32, 2);
    pac_rcc.freeze(Config::pll().pll_cfg(pll_config))
}

// PA0 - ADC light sensor input
pub type LightInput = PA0<Analog>;
// PA1 - ADC sound envelope input
pub type SoundInput = PA1<Analog>;
// PA4 - Host chip select (active low)
pub type ChipSelectPin = PA4<DefaultMode>;
pub type ChipSelectInput = PA4<Input<PullUp>>;
// PB1 - Alert line to the host (active high)
pub type AlertPin = PB1<Output<PushPull>>;

// PA5..PA7 - SPI1 SCK/MISO/MOSI, configured by `SpiResponder`

const FLASH_BASE: usize = 0x0800_0000;

extern "C" {
    // End of .text, provided by cortex-m-rt
    static __etext: u8;
}

// CRC-16/CCITT-FALSE of the program image
pub fn flash_checksum(pac_crc: CRC, _: &mut Rcc) -> u16 {
    let rcc = unsafe { &(*RCC::ptr()) };
    rcc.ahbenr.modify(|_, w| w.crcen().set_bit());

    let end = unsafe { &__etext as *const u8 as usize };
    let image = unsafe { core::slice::from_raw_parts(FLASH_BASE as *const u8, end - FLASH_BASE) };

    pac_crc.init.write(|w| unsafe { w.bits(0xffff) });
    pac_crc.pol.write(|w| unsafe { w.bits(0x1021) });
    pac_crc.cr.write(|w| unsafe {
        // 16-bit polynomial, no bit reversal
        w.polysize().bits(0b01);
        w.reset().set_bit()
    });
    for byte in image {
        // Byte writes feed 8 bits at a time
        unsafe { core::ptr::write_volatile(&pac_crc.dr as *const _ as *mut u8, *byte) };
    }
    let checksum = pac_crc.dr.read().bits() as u16;

    rcc.ahbenr.modify(|_, w| w.crcen().clear_bit());
    checksum
}
