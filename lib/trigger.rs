use core::num::NonZeroU16;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Threshold {
    Disarmed,
    Armed(NonZeroU16),
}

impl Threshold {
    pub fn is_crossed_by(self, sample: u16) -> bool {
        match self {
            Threshold::Disarmed => false,
            Threshold::Armed(level) => sample >= level.get(),
        }
    }

    pub fn to_wire(self) -> u16 {
        match self {
            Threshold::Disarmed => 0,
            Threshold::Armed(level) => level.get(),
        }
    }
}

impl From<u16> for Threshold {
    fn from(raw: u16) -> Self {
        NonZeroU16::new(raw).map_or(Threshold::Disarmed, Threshold::Armed)
    }
}

impl Default for Threshold {
    fn default() -> Self {
        Threshold::Disarmed
    }
}

#[derive(Default)]
pub struct Trigger {
    threshold: Threshold,
    latched: Option<u16>,
}

impl Trigger {
    pub const fn new() -> Self {
        Trigger {
            threshold: Threshold::Disarmed,
            latched: None,
        }
    }

    pub fn threshold(&self) -> Threshold {
        self.threshold
    }

    pub fn arm(&mut self, threshold: Threshold) {
        self.threshold = threshold;
    }

    // Newer crossings overwrite older ones until taken
    pub fn evaluate(&mut self, sample: u16) -> bool {
        let crossed = self.threshold.is_crossed_by(sample);
        if crossed {
            self.latched = Some(sample);
        }
        crossed
    }

    pub fn latched(&self) -> Option<u16> {
        self.latched
    }

    pub fn take(&mut self) -> Option<u16> {
        self.latched.take()
    }
}
