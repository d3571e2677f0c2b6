mod common;

use std::convert::TryFrom;

use common::{Module, IDENTITY};
use lib::dispatcher::Outcome;
use lib::host::{Reply, Request};
use lib::protocol::{Command, ALIVE};
use lib::sampler::{AnalogInput, Sampler};
use lib::sensors::{Channel, Crossings};
use lib::trigger::Threshold;
use lib::BUFFER_CAPACITY;

// Replays queued conversions per channel, then holds the last one.
struct Script {
    light: Vec<u16>,
    sound: Vec<u16>,
}

impl AnalogInput for Script {
    fn read(&mut self, channel: Channel) -> u16 {
        let queue = match channel {
            Channel::Light => &mut self.light,
            Channel::Sound => &mut self.sound,
        };
        if queue.len() > 1 {
            queue.remove(0)
        } else {
            queue.first().copied().unwrap_or(0)
        }
    }
}

fn sampler(light: &[u16], sound: &[u16]) -> Sampler<Script> {
    Sampler::new(Script {
        light: light.to_vec(),
        sound: sound.to_vec(),
    })
}

fn samples(reply: Reply) -> Vec<u16> {
    match reply {
        Reply::Samples(_, samples) => samples.iter().copied().collect(),
        other => panic!("expected samples, got {:?}", other),
    }
}

#[test]
fn identity_queries() {
    let mut module = Module::new();
    assert_eq!(module.request(&Request::ack()), Reply::Ack);
    assert_eq!(
        module.request(&Request::firmware()),
        Reply::Firmware(IDENTITY.firmware)
    );
    assert_eq!(
        module.request(&Request::module_id()),
        Reply::ModuleId(IDENTITY.module_id)
    );
    assert_eq!(
        module.request(&Request::checksum()),
        Reply::Checksum(IDENTITY.checksum)
    );
    assert_eq!(module.dispatcher.transactions(), 4);
    assert_eq!(module.clock.resumes, 4);
}

#[test]
fn ten_samples_read_back_newest_first() {
    let mut module = Module::new();
    let mut sampler = sampler(&[1, 2, 3, 4, 5, 6, 7, 8, 9, 10], &[0]);
    for _ in 0..10 {
        sampler.sample(&mut module.sensors).unwrap();
    }
    assert_eq!(module.sensors.channel(Channel::Light).buffer.cursor(), 0);

    let request = Request::read_buffer(Channel::Light, 3);
    let (response, _) = module.exchange(request.bytes());
    assert_eq!(response, vec![ALIVE, 2, 3, 0, 10, 0, 9, 0, 8, 0x16]);
    assert_eq!(samples(module.request(&request)), vec![10, 9, 8]);
}

#[test]
fn repeated_reads_are_stable_while_sampling_is_held() {
    let mut module = Module::new();
    let mut sampler = sampler(&[300, 301, 302, 303], &[7, 8, 9, 10]);
    for _ in 0..4 {
        sampler.sample(&mut module.sensors).unwrap();
    }
    let request = Request::read_buffer(Channel::Sound, 4);
    let first = samples(module.request(&request));
    let second = samples(module.request(&request));
    assert_eq!(first, vec![10, 9, 8, 7]);
    assert_eq!(first, second);
}

#[test]
fn full_capacity_read_after_wrap() {
    let mut module = Module::new();
    let light: Vec<u16> = (1..=13).collect();
    let mut sampler = sampler(&light, &[0]);
    for _ in 0..13 {
        sampler.sample(&mut module.sensors).unwrap();
    }
    let request = Request::read_buffer(Channel::Light, BUFFER_CAPACITY as u8);
    assert_eq!(
        samples(module.request(&request)),
        vec![13, 12, 11, 10, 9, 8, 7, 6, 5, 4]
    );
}

#[test]
fn over_long_read_wraps_around_history() {
    let mut module = Module::new();
    for value in 1..=10 {
        module.sensors.record(Channel::Sound, value).unwrap();
    }
    let request = Request::read_buffer(Channel::Sound, 12);
    assert_eq!(
        samples(module.request(&request)),
        vec![10, 9, 8, 7, 6, 5, 4, 3, 2, 1, 10, 9]
    );
}

#[test]
fn sound_trigger_scenario() {
    let mut module = Module::new();
    assert_eq!(
        module.request(&Request::set_trigger(Channel::Sound, 500)),
        Reply::TriggerSet(Channel::Sound, 500)
    );
    assert_eq!(
        module.sensors.channel(Channel::Sound).trigger.threshold(),
        Threshold::from(500)
    );

    let mut sampler = sampler(&[0], &[499, 500]);
    sampler.sample(&mut module.sensors).unwrap();
    assert!(!module.sensors.alert().high);
    sampler.sample(&mut module.sensors).unwrap();
    assert!(module.sensors.alert().high);
    assert_eq!(
        module.sensors.channel(Channel::Sound).trigger.latched(),
        Some(500)
    );

    let request = Request::fetch_triggers();
    let (response, _) = module.exchange(request.bytes());
    assert_eq!(response, vec![ALIVE, 6, 0, 0, 0x01, 0xf4]);
    assert!(!module.sensors.alert().high);
    assert_eq!(
        module.sensors.channel(Channel::Sound).trigger.latched(),
        None
    );
}

#[test]
fn disarmed_trigger_ignores_everything() {
    let mut module = Module::new();
    module.request(&Request::set_trigger(Channel::Light, 100));
    module.request(&Request::set_trigger(Channel::Light, 0));
    assert_eq!(
        module.sensors.channel(Channel::Light).trigger.threshold(),
        Threshold::Disarmed
    );

    let mut sampler = sampler(&[u16::MAX], &[u16::MAX]);
    for _ in 0..20 {
        sampler.sample(&mut module.sensors).unwrap();
    }
    assert!(!module.sensors.alert().high);
    assert_eq!(
        module.request(&Request::fetch_triggers()),
        Reply::Triggers(Crossings::default())
    );
}

#[test]
fn fetch_clears_both_channels_whoever_fired() {
    let mut module = Module::new();
    module.request(&Request::set_trigger(Channel::Light, 40));
    module.request(&Request::set_trigger(Channel::Sound, 60));
    let mut sampler = sampler(&[45, 41], &[70, 10]);
    sampler.sample(&mut module.sensors).unwrap();
    sampler.sample(&mut module.sensors).unwrap();

    assert_eq!(
        module.request(&Request::fetch_triggers()),
        Reply::Triggers(Crossings {
            light: Some(41),
            sound: Some(70),
        })
    );
    assert!(!module.sensors.alert().high);
    assert_eq!(
        module.request(&Request::fetch_triggers()),
        Reply::Triggers(Crossings::default())
    );
}

#[test]
fn unknown_command_only_echoes() {
    let mut module = Module::new();
    module.request(&Request::set_trigger(Channel::Light, 5));
    module.sensors.record(Channel::Light, 9).unwrap();
    let before = module.sensors.channel(Channel::Light).buffer.as_slice().to_vec();

    let (response, outcome) = module.exchange(&[0x09, 0xaa, 0xbb, 0xcc]);
    assert_eq!(response, vec![ALIVE, 0x09]);
    assert_eq!(outcome, Ok(Outcome::Ignored(0x09)));

    let light = module.sensors.channel(Channel::Light);
    assert_eq!(light.buffer.as_slice(), &before[..]);
    assert_eq!(light.trigger.latched(), Some(9));
    assert!(module.sensors.alert().high);
}

#[test]
fn echo_proves_liveness_for_every_command() {
    let mut module = Module::new();
    for code in 0..=8u8 {
        let (response, outcome) = module.exchange(&[code, 0, 0, 0, 0, 0]);
        assert_eq!(&response[..2], &[ALIVE, code]);
        let command = Command::try_from(code).unwrap();
        assert_eq!(outcome, Ok(Outcome::Served(command)));
    }
}
