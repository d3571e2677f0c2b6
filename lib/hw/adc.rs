use stm32g0xx_hal::analog::adc::{Adc, AdcExt, Precision, SampleTime};
use stm32g0xx_hal::hal::adc::OneShot;
use stm32g0xx_hal::rcc::Rcc;
use stm32g0xx_hal::stm32g0::stm32g070::ADC;

use crate::hw::helper::{LightInput, SoundInput};
use crate::sampler::AnalogInput;
use crate::sensors::Channel;

pub struct AnalogFrontEnd {
    adc: Adc,
    light: LightInput,
    sound: SoundInput,
}

impl AnalogFrontEnd {
    pub fn new(pac_adc: ADC, light: LightInput, sound: SoundInput, rcc: &mut Rcc) -> Self {
        let mut adc = pac_adc.constrain(rcc);
        // 10-bit results, the host scales by 1024
        adc.set_precision(Precision::B_10);
        // Two conversions have to fit in one 200 us sample period
        adc.set_sample_time(SampleTime::T_80);
        adc.calibrate();
        AnalogFrontEnd { adc, light, sound }
    }
}

impl AnalogInput for AnalogFrontEnd {
    fn read(&mut self, channel: Channel) -> u16 {
        let value: Result<u16, ()> = match channel {
            Channel::Light => nb::block!(self.adc.read(&mut self.light)),
            Channel::Sound => nb::block!(self.adc.read(&mut self.sound)),
        };
        // The HAL never reports a conversion error
        value.unwrap_or(0)
    }
}
