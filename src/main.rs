#![no_main]
#![no_std]

use lib as _;

use lib::dispatcher::{Dispatcher, Identity, Outcome};
use lib::hw::{
    flash_checksum, init_clock, on_transfer_complete, AlertPin, AnalogFrontEnd, ChipSelect,
    SampleTimer, SpiResponder,
};
use lib::sampler::Sampler;
use lib::sensors::Sensors;
use lib::transport::ByteTransport;
use lib::{FIRMWARE_VERSION, MODULE_ID, RESPONDER_MODE, SAMPLE_RATE_HZ};
use rtic::app;
use stm32g0xx_hal::gpio::GpioExt;
use stm32g0xx_hal::time::U32Ext;

#[app(device = stm32g0xx_hal::stm32, peripherals = true)]
const APP: () = {
    struct Resources {
        sensors: Sensors<AlertPin>,
        sampler: Sampler<AnalogFrontEnd>,
        sample_timer: SampleTimer,
        dispatcher: Dispatcher,
        spi: SpiResponder,
        chip_select: ChipSelect,
    }

    #[init]
    fn init(cx: init::Context) -> init::LateResources {
        let device: stm32g0xx_hal::stm32::Peripherals = cx.device;

        // Clock
        let mut rcc = init_clock(device.RCC);

        // GPIO
        let gpioa = device.GPIOA.split(&mut rcc);
        let gpiob = device.GPIOB.split(&mut rcc);

        // Identity
        let identity = Identity {
            firmware: FIRMWARE_VERSION,
            module_id: MODULE_ID,
            checksum: flash_checksum(device.CRC, &mut rcc),
        };
        defmt::info!("ambient module {}", identity);

        // Shared sensor state, alert line starts low
        let sensors = Sensors::new(gpiob.pb1.into_push_pull_output()).unwrap();

        // Sampling
        let front_end = AnalogFrontEnd::new(
            device.ADC,
            gpioa.pa0.into_analog(),
            gpioa.pa1.into_analog(),
            &mut rcc,
        );
        let sampler = Sampler::new(front_end);
        let sample_timer = SampleTimer::new(device.TIM6, SAMPLE_RATE_HZ.hz(), &mut rcc);

        // Host bus
        let spi = SpiResponder::new(device.SPI1, &mut rcc);
        let chip_select = ChipSelect::new(gpioa.pa4, device.EXTI);
        let dispatcher = Dispatcher::new(identity, RESPONDER_MODE);

        init::LateResources {
            sensors,
            sampler,
            sample_timer,
            dispatcher,
            spi,
            chip_select,
        }
    }

    #[idle(resources = [sample_timer])]
    fn idle(mut cx: idle::Context) -> ! {
        cx.resources.sample_timer.lock(|timer: &mut SampleTimer| {
            timer.start();
        });
        loop {
            cortex_m::asm::nop();
        }
    }

    #[task(binds = TIM6, priority = 1, resources = [sampler, sample_timer, sensors])]
    fn tim6(mut cx: tim6::Context) {
        let sampler: &mut Sampler<AnalogFrontEnd> = cx.resources.sampler;

        cx.resources
            .sample_timer
            .lock(|timer: &mut SampleTimer| timer.unpend());
        cx.resources.sensors.lock(|sensors: &mut Sensors<AlertPin>| {
            if let Err(err) = sampler.sample(sensors) {
                defmt::error!("sampling failed: {=str}", err.kind());
            }
        });
    }

    // Preempts sampling, and is itself preempted by the SPI1 completion
    // interrupt it waits on
    #[task(
        binds = EXTI4_15,
        priority = 2,
        resources = [chip_select, dispatcher, spi, sample_timer, sensors]
    )]
    fn exti4_15(cx: exti4_15::Context) {
        let chip_select: &mut ChipSelect = cx.resources.chip_select;
        let dispatcher: &mut Dispatcher = cx.resources.dispatcher;
        let spi: &mut SpiResponder = cx.resources.spi;
        let sample_timer: &mut SampleTimer = cx.resources.sample_timer;
        let sensors: &mut Sensors<AlertPin> = cx.resources.sensors;

        chip_select.unpend();
        match dispatcher.transaction(spi, sample_timer, sensors) {
            Ok(Outcome::Served(command)) => {
                defmt::debug!("served {} (#{=u32})", command, dispatcher.transactions())
            }
            Ok(Outcome::Ignored(code)) => defmt::debug!("ignored {=u8}", code),
            Err(err) => defmt::warn!("transaction aborted: {=str} {}", err.kind(), spi.status()),
        }
    }

    #[task(binds = SPI1, priority = 3)]
    fn spi1(_: spi1::Context) {
        on_transfer_complete();
    }
};
