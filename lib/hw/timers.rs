use stm32g0xx_hal::exti::{Event, ExtiExt};
use stm32g0xx_hal::gpio::SignalEdge;
use stm32g0xx_hal::hal::timer::CountDown;
use stm32g0xx_hal::rcc::Rcc;
use stm32g0xx_hal::stm32g0::stm32g070::{EXTI, TIM6};
use stm32g0xx_hal::time::Hertz;
use stm32g0xx_hal::timer::{Timer, TimerExt};

use crate::hw::helper::{ChipSelectInput, ChipSelectPin};
use crate::sampler::SampleClock;

pub struct SampleTimer {
    timer: Timer<TIM6>,
    freq: Hertz,
}

impl SampleTimer {
    pub fn new(pac_tim: TIM6, freq: Hertz, rcc: &mut Rcc) -> Self {
        SampleTimer {
            timer: pac_tim.timer(rcc),
            freq,
        }
    }

    pub fn start(&mut self) {
        self.timer.clear_irq();
        self.timer.listen();
        self.timer.start(self.freq);
    }

    pub fn unpend(&mut self) {
        self.timer.clear_irq();
    }
}

impl SampleClock for SampleTimer {
    // The counter keeps running, only the interrupt is masked
    fn suspend(&mut self) {
        self.timer.unlisten();
    }

    fn resume(&mut self) {
        self.timer.clear_irq();
        self.timer.listen();
    }
}

pub struct ChipSelect {
    exti: EXTI,
    _input: ChipSelectInput,
}

impl ChipSelect {
    pub fn new(pin: ChipSelectPin, mut exti: EXTI) -> Self {
        let input = pin
            .into_pull_up_input()
            .listen(SignalEdge::Falling, &mut exti);
        ChipSelect {
            exti,
            _input: input,
        }
    }

    pub fn unpend(&mut self) {
        self.exti.unpend(Event::GPIO4);
    }
}
