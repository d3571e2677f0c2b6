use core::convert::TryFrom;

use crate::sensors::Channel;

pub const ALIVE: u8 = 0x55;
pub const ACK: u8 = 0x33;
pub const STOP: u8 = 0x16;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Command {
    Ack = 0,
    Firmware = 1,
    Light = 2,
    Sound = 3,
    LightTrigger = 4,
    SoundTrigger = 5,
    TriggerFetch = 6,
    Crc = 7,
    ModuleId = 8,
}

impl Command {
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn buffer(channel: Channel) -> Self {
        match channel {
            Channel::Light => Command::Light,
            Channel::Sound => Command::Sound,
        }
    }

    pub fn trigger(channel: Channel) -> Self {
        match channel {
            Channel::Light => Command::LightTrigger,
            Channel::Sound => Command::SoundTrigger,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Unknown(pub u8);

impl TryFrom<u8> for Command {
    type Error = Unknown;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Ok(match code {
            0 => Command::Ack,
            1 => Command::Firmware,
            2 => Command::Light,
            3 => Command::Sound,
            4 => Command::LightTrigger,
            5 => Command::SoundTrigger,
            6 => Command::TriggerFetch,
            7 => Command::Crc,
            8 => Command::ModuleId,
            other => return Err(Unknown(other)),
        })
    }
}

pub fn split(value: u16) -> [u8; 2] {
    value.to_be_bytes()
}

pub fn join(high: u8, low: u8) -> u16 {
    u16::from_be_bytes([high, low])
}
