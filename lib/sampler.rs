use embedded_hal::digital::v2::OutputPin;

use crate::error::Result;
use crate::sensors::{Channel, Sensors};

pub trait AnalogInput {
    fn read(&mut self, channel: Channel) -> u16;
}

pub trait SampleClock {
    fn suspend(&mut self);
    fn resume(&mut self);
}

pub struct Sampler<A> {
    input: A,
}

impl<A> Sampler<A>
where
    A: AnalogInput,
{
    pub fn new(input: A) -> Self {
        Sampler { input }
    }

    // Conversions are stored as read, without range checks
    pub fn sample<P>(&mut self, sensors: &mut Sensors<P>) -> Result<(), P::Error>
    where
        P: OutputPin,
    {
        for channel in Channel::ALL.iter() {
            let value = self.input.read(*channel);
            sensors.record(*channel, value)?;
        }
        Ok(())
    }
}
