#![allow(dead_code)]

use std::collections::VecDeque;
use std::convert::Infallible;

use embedded_hal::digital::v2::OutputPin;
use embedded_hal::spi::Mode;
use lib::dispatcher::{Dispatcher, Identity, Outcome};
use lib::error::Error;
use lib::host::{Reply, Request};
use lib::sampler::SampleClock;
use lib::sensors::Sensors;
use lib::transport::{ByteTransport, Collision, TransferStatus};
use lib::{FIRMWARE_VERSION, MODULE_ID, RESPONDER_MODE};

pub const IDENTITY: Identity = Identity {
    firmware: FIRMWARE_VERSION,
    module_id: MODULE_ID,
    checksum: 0x1d0f,
};

#[derive(Default)]
pub struct Alert {
    pub high: bool,
}

impl OutputPin for Alert {
    type Error = Infallible;

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.high = true;
        Ok(())
    }

    fn set_low(&mut self) -> Result<(), Infallible> {
        self.high = false;
        Ok(())
    }
}

#[derive(Default)]
pub struct Clock {
    pub suspended: bool,
    pub resumes: usize,
}

impl SampleClock for Clock {
    fn suspend(&mut self) {
        self.suspended = true;
    }

    fn resume(&mut self) {
        self.suspended = false;
        self.resumes += 1;
    }
}

// Responder end of a full-duplex wire. Each completed transfer shifts one
// host byte in and one loaded byte out; the host clocks until its frame is
// exhausted, then idles at zero.
#[derive(Default)]
pub struct Wire {
    host: VecDeque<u8>,
    pub response: Vec<u8>,
    loaded: Option<u8>,
    received: u8,
    pub mode: Option<Mode>,
    pub listening: bool,
}

impl Wire {
    pub fn new(frame: &[u8]) -> Self {
        Wire {
            host: frame.iter().copied().collect(),
            ..Wire::default()
        }
    }
}

impl ByteTransport for Wire {
    fn init_as_responder(&mut self, mode: Mode) {
        self.mode = Some(mode);
        self.listening = false;
    }

    fn put(&mut self, byte: u8) -> Result<(), Collision> {
        if self.loaded.is_some() {
            return Err(Collision);
        }
        self.loaded = Some(byte);
        Ok(())
    }

    fn get(&mut self) -> u8 {
        self.received
    }

    fn wait(&mut self) {
        let byte = self.loaded.take().expect("wait without put");
        self.response.push(byte);
        self.received = self.host.pop_front().unwrap_or(0);
    }

    fn status(&self) -> TransferStatus {
        TransferStatus {
            transfer_complete: self.loaded.is_none(),
            write_collision: false,
        }
    }

    fn release(&mut self) {
        self.listening = true;
    }
}

// A module on the bench: dispatcher, state and a sample clock.
pub struct Module {
    pub dispatcher: Dispatcher,
    pub sensors: Sensors<Alert>,
    pub clock: Clock,
}

impl Module {
    pub fn new() -> Self {
        Module {
            dispatcher: Dispatcher::new(IDENTITY, RESPONDER_MODE),
            sensors: Sensors::new(Alert::default()).unwrap(),
            clock: Clock::default(),
        }
    }

    // Clocks a raw host frame through one transaction.
    pub fn exchange(&mut self, frame: &[u8]) -> (Vec<u8>, Result<Outcome, Error<Infallible>>) {
        let mut wire = Wire::new(frame);
        let outcome = self
            .dispatcher
            .transaction(&mut wire, &mut self.clock, &mut self.sensors);
        assert!(wire.listening, "transport left active");
        assert!(!self.clock.suspended, "sampling left suspended");
        (wire.response, outcome)
    }

    pub fn request(&mut self, request: &Request) -> Reply {
        let (response, outcome) = self.exchange(request.bytes());
        assert_eq!(outcome, Ok(Outcome::Served(request.command())));
        // The responder stops talking once its payload is out
        let mut padded = response;
        padded.resize(request.bytes().len(), 0);
        request.decode(&padded).expect("bad framing")
    }
}
