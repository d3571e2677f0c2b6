// `cursor` is the next slot to be written, the newest sample sits one
// slot behind it
pub struct SampleBuffer<const N: usize> {
    samples: [u16; N],
    cursor: usize,
}

impl<const N: usize> SampleBuffer<N> {
    pub const fn new() -> Self {
        SampleBuffer {
            samples: [0; N],
            cursor: 0,
        }
    }

    pub fn push(&mut self, sample: u16) {
        self.samples[self.cursor] = sample;
        self.cursor += 1;
        if self.cursor == N {
            self.cursor = 0;
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    pub fn latest(&self) -> u16 {
        let index = if self.cursor == 0 {
            N - 1
        } else {
            self.cursor - 1
        };
        self.samples[index]
    }

    // Never ends, taking more than N revisits older samples
    pub fn recent(&self) -> Recent<'_, N> {
        Recent {
            samples: &self.samples,
            index: self.cursor,
        }
    }

    pub fn as_slice(&self) -> &[u16] {
        &self.samples
    }
}

impl<const N: usize> Default for SampleBuffer<N> {
    fn default() -> Self {
        SampleBuffer::new()
    }
}

pub struct Recent<'a, const N: usize> {
    samples: &'a [u16; N],
    index: usize,
}

impl<'a, const N: usize> Iterator for Recent<'a, N> {
    type Item = u16;

    fn next(&mut self) -> Option<u16> {
        if self.index == 0 {
            self.index = N - 1;
        } else {
            self.index -= 1;
        }
        Some(self.samples[self.index])
    }
}
