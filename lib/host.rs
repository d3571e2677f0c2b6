use heapless::Vec;

use crate::protocol::{self, Command, ACK, ALIVE, STOP};
use crate::sensors::{Channel, Crossings};

// A full 255-sample read-out
pub const MAX_FRAME: usize = 4 + 2 * u8::MAX as usize;

pub const FULL_SCALE: u16 = 1024;

pub type Frame = Vec<u8, MAX_FRAME>;
pub type Samples = Vec<u16, { u8::MAX as usize }>;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FrameError {
    NotAlive(u8),
    BadEcho { expected: u8, got: u8 },
    MissingStop(u8),
    Truncated { expected: usize, got: usize },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Reply {
    Ack,
    Firmware(u8),
    ModuleId(u8),
    Checksum(u16),
    Samples(Channel, Samples),
    TriggerSet(Channel, u16),
    Triggers(Crossings),
}

pub struct Request {
    command: Command,
    frame: Frame,
}

impl Request {
    pub fn ack() -> Self {
        Request::padded(Command::Ack, 1)
    }

    pub fn firmware() -> Self {
        Request::padded(Command::Firmware, 1)
    }

    pub fn module_id() -> Self {
        Request::padded(Command::ModuleId, 1)
    }

    pub fn checksum() -> Self {
        Request::padded(Command::Crc, 2)
    }

    pub fn fetch_triggers() -> Self {
        Request::padded(Command::TriggerFetch, 4)
    }

    pub fn read_buffer(channel: Channel, length: u8) -> Self {
        let command = Command::buffer(channel);
        let header = [command.code(), length, 0];
        let samples = core::iter::repeat(0).take(2 * length as usize);
        let frame = header
            .iter()
            .copied()
            .chain(samples)
            .chain(core::iter::once(STOP))
            .collect();
        Request { command, frame }
    }

    pub fn set_trigger(channel: Channel, threshold: u16) -> Self {
        let command = Command::trigger(channel);
        let [high, low] = protocol::split(threshold);
        let frame = [command.code(), high, low, 0].iter().copied().collect();
        Request { command, frame }
    }

    fn padded(command: Command, payload: usize) -> Self {
        let frame = core::iter::once(command.code())
            .chain(core::iter::repeat(0).take(payload + 1))
            .collect();
        Request { command, frame }
    }

    pub fn command(&self) -> Command {
        self.command
    }

    pub fn bytes(&self) -> &[u8] {
        &self.frame
    }

    pub fn decode(&self, response: &[u8]) -> Result<Reply, FrameError> {
        if response.len() < self.frame.len() {
            return Err(FrameError::Truncated {
                expected: self.frame.len(),
                got: response.len(),
            });
        }
        if response[0] != ALIVE {
            return Err(FrameError::NotAlive(response[0]));
        }
        expect(self.command.code(), response[1])?;

        let payload = &response[2..self.frame.len()];
        Ok(match self.command {
            Command::Ack => {
                expect(ACK, payload[0])?;
                Reply::Ack
            }
            Command::Firmware => Reply::Firmware(payload[0]),
            Command::ModuleId => Reply::ModuleId(payload[0]),
            Command::Crc => Reply::Checksum(protocol::join(payload[0], payload[1])),
            Command::Light | Command::Sound => {
                let channel = match self.command {
                    Command::Light => Channel::Light,
                    _ => Channel::Sound,
                };
                let length = self.frame[1];
                expect(length, payload[0])?;
                let (stop, words) = payload[1..]
                    .split_last()
                    .ok_or(FrameError::MissingStop(0))?;
                if *stop != STOP {
                    return Err(FrameError::MissingStop(*stop));
                }
                let samples = words
                    .chunks(2)
                    .map(|word| protocol::join(word[0], word[1]))
                    .collect();
                Reply::Samples(channel, samples)
            }
            Command::LightTrigger | Command::SoundTrigger => {
                let channel = match self.command {
                    Command::LightTrigger => Channel::Light,
                    _ => Channel::Sound,
                };
                expect(self.frame[1], payload[0])?;
                expect(self.frame[2], payload[1])?;
                Reply::TriggerSet(channel, protocol::join(payload[0], payload[1]))
            }
            Command::TriggerFetch => {
                let light = protocol::join(payload[0], payload[1]);
                let sound = protocol::join(payload[2], payload[3]);
                Reply::Triggers(Crossings {
                    light: Some(light).filter(|value| *value != 0),
                    sound: Some(sound).filter(|value| *value != 0),
                })
            }
        })
    }
}

fn expect(expected: u8, got: u8) -> Result<(), FrameError> {
    if expected == got {
        Ok(())
    } else {
        Err(FrameError::BadEcho { expected, got })
    }
}

pub fn normalize(raw: u16) -> f32 {
    raw as f32 / FULL_SCALE as f32
}

// Smallest raw threshold at or above `level`
pub fn threshold_from_level(level: f32) -> u16 {
    if !(level > 0.0) {
        return 0;
    }
    let scaled = level * FULL_SCALE as f32;
    let truncated = scaled as u16;
    if (truncated as f32) < scaled {
        truncated.saturating_add(1)
    } else {
        truncated
    }
}
