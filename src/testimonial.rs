use serde_derive::*;
use thiserror::Error;

#[derive(Clone, Eq, PartialEq, Debug, Error)]
#[error("slide {index} out of range, slider has {len} slides")]
pub struct SlideOutOfRange {
    pub index: usize,
    pub len: usize,
}

/// Position of the testimonial slider within a fixed set of slides.
///
/// Movement wraps around. A slider over zero slides stays parked at index 0.
#[derive(Clone, Copy, Eq, PartialEq, Serialize, Deserialize, Debug)]
pub struct Slider {
    pub len: usize,
    pub index: usize,
}

impl Slider {
    pub fn new(len: usize) -> Self {
        Slider { len, index: 0 }
    }

    pub fn next(&self) -> Slider {
        if self.len == 0 {
            return *self;
        }
        Slider {
            len: self.len,
            index: (self.index + 1) % self.len,
        }
    }

    pub fn prev(&self) -> Slider {
        if self.len == 0 {
            return *self;
        }
        Slider {
            len: self.len,
            index: (self.index + self.len - 1) % self.len,
        }
    }

    pub fn jump(&self, index: usize) -> Result<Slider, SlideOutOfRange> {
        if index >= self.len {
            return Err(SlideOutOfRange {
                index,
                len: self.len,
            });
        }
        Ok(Slider {
            len: self.len,
            index,
        })
    }
}
