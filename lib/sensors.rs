use embedded_hal::digital::v2::OutputPin;

use crate::error::{Error, Result};
use crate::store::SampleBuffer;
use crate::trigger::{Threshold, Trigger};
use crate::BUFFER_CAPACITY;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Channel {
    Light,
    Sound,
}

impl Channel {
    // Sampling order
    pub const ALL: [Channel; 2] = [Channel::Light, Channel::Sound];
}

#[derive(Default)]
pub struct ChannelState {
    pub buffer: SampleBuffer<BUFFER_CAPACITY>,
    pub trigger: Trigger,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Pending {
    pub light: bool,
    pub sound: bool,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Crossings {
    pub light: Option<u16>,
    pub sound: Option<u16>,
}

pub struct Sensors<P> {
    light: ChannelState,
    sound: ChannelState,
    alert: P,
    alert_raised: bool,
}

impl<P> Sensors<P>
where
    P: OutputPin,
{
    pub fn new(alert: P) -> Result<Self, P::Error> {
        let mut sensors = Sensors {
            light: ChannelState::default(),
            sound: ChannelState::default(),
            alert,
            alert_raised: true,
        };
        sensors.lower_alert()?;
        Ok(sensors)
    }

    pub fn channel(&self, channel: Channel) -> &ChannelState {
        match channel {
            Channel::Light => &self.light,
            Channel::Sound => &self.sound,
        }
    }

    fn channel_mut(&mut self, channel: Channel) -> &mut ChannelState {
        match channel {
            Channel::Light => &mut self.light,
            Channel::Sound => &mut self.sound,
        }
    }

    pub fn record(&mut self, channel: Channel, sample: u16) -> Result<bool, P::Error> {
        let state = self.channel_mut(channel);
        state.buffer.push(sample);
        let crossed = state.trigger.evaluate(sample);
        if crossed {
            trace!("{} crossed at {=u16}", channel, sample);
            self.raise_alert()?;
        }
        Ok(crossed)
    }

    pub fn arm(&mut self, channel: Channel, threshold: Threshold) {
        info!("{} threshold {=u16}", channel, threshold.to_wire());
        self.channel_mut(channel).trigger.arm(threshold);
    }

    // Latches survive a failed lower, the next fetch sees them again
    pub fn fetch_triggers(&mut self) -> Result<Crossings, P::Error> {
        self.lower_alert()?;
        Ok(Crossings {
            light: self.light.trigger.take(),
            sound: self.sound.trigger.take(),
        })
    }

    pub fn pending(&self) -> Pending {
        Pending {
            light: self.light.trigger.latched().is_some(),
            sound: self.sound.trigger.latched().is_some(),
        }
    }

    pub fn alert(&self) -> &P {
        &self.alert
    }

    fn raise_alert(&mut self) -> Result<(), P::Error> {
        if !self.alert_raised {
            self.alert.set_high().map_err(Error::Alert)?;
            self.alert_raised = true;
        }
        Ok(())
    }

    fn lower_alert(&mut self) -> Result<(), P::Error> {
        self.alert.set_low().map_err(Error::Alert)?;
        self.alert_raised = false;
        Ok(())
    }
}
