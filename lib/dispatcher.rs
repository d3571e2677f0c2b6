use core::convert::TryFrom;

use embedded_hal::digital::v2::OutputPin;
use embedded_hal::spi::Mode;

use crate::error::Result;
use crate::protocol::{self, Command, Unknown, ACK, ALIVE, STOP};
use crate::sampler::SampleClock;
use crate::sensors::{Channel, Sensors};
use crate::transport::{ByteTransport, Collision};
use crate::trigger::Threshold;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Identity {
    pub firmware: u8,
    pub module_id: u8,
    pub checksum: u16,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Outcome {
    Served(Command),
    // Echoed, then dropped
    Ignored(u8),
}

pub struct Session<'a, T, C>
where
    T: ByteTransport,
    C: SampleClock,
{
    link: &'a mut T,
    clock: &'a mut C,
}

impl<'a, T, C> Session<'a, T, C>
where
    T: ByteTransport,
    C: SampleClock,
{
    pub fn open(link: &'a mut T, clock: &'a mut C, mode: Mode) -> Self {
        clock.suspend();
        link.init_as_responder(mode);
        Session { link, clock }
    }

    pub fn link(&mut self) -> &mut T {
        self.link
    }
}

impl<'a, T, C> Drop for Session<'a, T, C>
where
    T: ByteTransport,
    C: SampleClock,
{
    fn drop(&mut self) {
        self.link.release();
        self.clock.resume();
    }
}

pub struct Dispatcher {
    identity: Identity,
    mode: Mode,
    transactions: u32,
}

impl Dispatcher {
    pub fn new(identity: Identity, mode: Mode) -> Self {
        Dispatcher {
            identity,
            mode,
            transactions: 0,
        }
    }

    pub fn transactions(&self) -> u32 {
        self.transactions
    }

    // Blocks on every transfer, a host that stops clocking stalls this call
    pub fn transaction<T, C, P>(
        &mut self,
        link: &mut T,
        clock: &mut C,
        sensors: &mut Sensors<P>,
    ) -> Result<Outcome, P::Error>
    where
        T: ByteTransport,
        C: SampleClock,
        P: OutputPin,
    {
        self.transactions = self.transactions.wrapping_add(1);
        let mut session = Session::open(link, clock, self.mode);
        let link = session.link();

        link.send(ALIVE)?;
        let code = link.get();
        link.send(code)?;

        match Command::try_from(code) {
            Ok(command) => {
                debug!("command {}", command);
                self.serve(command, link, sensors)?;
                Ok(Outcome::Served(command))
            }
            Err(Unknown(code)) => {
                warn!("unknown command {=u8}", code);
                Ok(Outcome::Ignored(code))
            }
        }
    }

    fn serve<T, P>(
        &self,
        command: Command,
        link: &mut T,
        sensors: &mut Sensors<P>,
    ) -> Result<(), P::Error>
    where
        T: ByteTransport,
        P: OutputPin,
    {
        match command {
            Command::Ack => link.send(ACK)?,
            Command::Crc => send_word(link, self.identity.checksum)?,
            Command::Firmware => link.send(self.identity.firmware)?,
            Command::ModuleId => link.send(self.identity.module_id)?,
            Command::Light => read_out(link, sensors, Channel::Light)?,
            Command::Sound => read_out(link, sensors, Channel::Sound)?,
            Command::LightTrigger => arm(link, sensors, Channel::Light)?,
            Command::SoundTrigger => arm(link, sensors, Channel::Sound)?,
            Command::TriggerFetch => {
                debug!("fetch, pending {}", sensors.pending());
                for channel in Channel::ALL.iter() {
                    let latched = sensors.channel(*channel).trigger.latched();
                    send_word(link, latched.unwrap_or(0))?;
                }
                sensors.fetch_triggers()?;
            }
        }
        Ok(())
    }
}

fn send_word<T>(link: &mut T, value: u16) -> core::result::Result<(), Collision>
where
    T: ByteTransport,
{
    for byte in protocol::split(value).iter() {
        link.send(*byte)?;
    }
    Ok(())
}

// The requested length is echoed and honoured as is, lengths past the
// capacity walk around the history again.
fn read_out<T, P>(
    link: &mut T,
    sensors: &Sensors<P>,
    channel: Channel,
) -> core::result::Result<(), Collision>
where
    T: ByteTransport,
    P: OutputPin,
{
    let length = link.get();
    link.send(length)?;
    let buffer = &sensors.channel(channel).buffer;
    for sample in buffer.recent().take(length as usize) {
        send_word(link, sample)?;
    }
    link.send(STOP)
}

fn arm<T, P>(
    link: &mut T,
    sensors: &mut Sensors<P>,
    channel: Channel,
) -> core::result::Result<(), Collision>
where
    T: ByteTransport,
    P: OutputPin,
{
    let high = link.get();
    link.send(high)?;
    let low = link.get();
    link.send(low)?;
    sensors.arm(channel, Threshold::from(protocol::join(high, low)));
    Ok(())
}
