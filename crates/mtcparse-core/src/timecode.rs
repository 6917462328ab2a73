//! Decoded timecode values and their derived units.
//!
//! A [`TimecodePacket`] is the unit of output of the decoder: one complete
//! timecode carried by a Full Frame message or by a full cycle of eight
//! Quarter Frame messages. Rate tables and unit conversions live here, next
//! to each other, so every consumer derives seconds and frame counts the
//! same way.
//!
//! Fields are stored exactly as decoded. The decoder does not validate
//! ranges; use [`TimecodePacket::is_in_range`] when that matters.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::protocols::mtc::layout;

/// Frame-rate family carried in the two rate bits of the hour field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RateClass {
    #[serde(rename = "24")]
    Fps24,
    #[serde(rename = "25")]
    Fps25,
    #[serde(rename = "29.97df")]
    Fps2997DropFrame,
    #[serde(rename = "30")]
    Fps30,
}

impl RateClass {
    /// Decode the two wire bits (`rr` in `0rrhhhhh`). Higher bits are ignored.
    pub fn from_bits(bits: u8) -> Self {
        match bits & layout::RATE_MASK {
            0 => RateClass::Fps24,
            1 => RateClass::Fps25,
            2 => RateClass::Fps2997DropFrame,
            _ => RateClass::Fps30,
        }
    }

    pub fn bits(self) -> u8 {
        match self {
            RateClass::Fps24 => 0,
            RateClass::Fps25 => 1,
            RateClass::Fps2997DropFrame => 2,
            RateClass::Fps30 => 3,
        }
    }

    /// Real frame rate used for time conversions.
    pub fn frames_per_second(self) -> f64 {
        match self {
            RateClass::Fps24 => 24.0,
            RateClass::Fps25 => 25.0,
            RateClass::Fps2997DropFrame => 29.97,
            RateClass::Fps30 => 30.0,
        }
    }

    /// Duration of one frame in seconds.
    pub fn frame_duration(self) -> f64 {
        1.0 / self.frames_per_second()
    }

    /// Number of frame labels per second (frame field is `0..nominal_fps`).
    pub fn nominal_fps(self) -> u8 {
        match self {
            RateClass::Fps24 => 24,
            RateClass::Fps25 => 25,
            RateClass::Fps2997DropFrame | RateClass::Fps30 => 30,
        }
    }

    pub fn is_drop_frame(self) -> bool {
        self == RateClass::Fps2997DropFrame
    }
}

impl fmt::Display for RateClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RateClass::Fps24 => "24",
            RateClass::Fps25 => "25",
            RateClass::Fps2997DropFrame => "29.97df",
            RateClass::Fps30 => "30",
        };
        f.write_str(label)
    }
}

/// Conversion used by [`TimecodePacket::as_millis_with`] and
/// [`TimecodePacket::as_micros_with`].
///
/// `Legacy` reproduces the historical conversion, which multiplies seconds
/// by `0.001` for "millis" and again for "micros" and therefore shrinks the
/// value. `Corrected` scales up by 1e3 and 1e6.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeScale {
    #[default]
    Corrected,
    Legacy,
}

/// One complete decoded timecode.
///
/// # Examples
/// ```
/// use mtcparse_core::{RateClass, TimecodePacket};
///
/// let tc = TimecodePacket::new(RateClass::Fps24, 1, 2, 3, 12);
/// assert_eq!(tc.as_seconds(), 3723.5);
/// assert_eq!(tc.to_string(), "1:2:3:12");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimecodePacket {
    pub rate: RateClass,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    pub frame: u8,
}

impl TimecodePacket {
    pub fn new(rate: RateClass, hour: u8, minute: u8, second: u8, frame: u8) -> Self {
        Self {
            rate,
            hour,
            minute,
            second,
            frame,
        }
    }

    fn whole_seconds(&self) -> u64 {
        u64::from(self.hour) * 3600 + u64::from(self.minute) * 60 + u64::from(self.second)
    }

    /// Time since midnight in seconds, including the fractional frame.
    pub fn as_seconds(&self) -> f64 {
        self.whole_seconds() as f64 + self.frame as f64 / self.rate.frames_per_second()
    }

    pub fn as_millis(&self) -> f64 {
        self.as_millis_with(TimeScale::Corrected)
    }

    pub fn as_micros(&self) -> f64 {
        self.as_micros_with(TimeScale::Corrected)
    }

    pub fn as_millis_with(&self, scale: TimeScale) -> f64 {
        match scale {
            TimeScale::Corrected => self.as_seconds() * 1_000.0,
            TimeScale::Legacy => self.as_seconds() * 0.001,
        }
    }

    pub fn as_micros_with(&self, scale: TimeScale) -> f64 {
        match scale {
            TimeScale::Corrected => self.as_seconds() * 1_000_000.0,
            TimeScale::Legacy => self.as_millis_with(TimeScale::Legacy) * 0.001,
        }
    }

    /// Frames since midnight at the packet's own rate, truncated.
    ///
    /// Computed in integers: 29.97 is taken as 2997/100, the other rates are
    /// whole numbers.
    pub fn as_frame_count(&self) -> u32 {
        let whole = self.whole_seconds();
        let frame = u64::from(self.frame);
        let count = match self.rate {
            RateClass::Fps2997DropFrame => (whole * 2997 + frame * 100) / 100,
            rate => whole * u64::from(rate.nominal_fps()) + frame,
        };
        count as u32
    }

    /// `H:M:S:F`, or `H:M:S;F` for drop-frame. Fields are not zero-padded.
    pub fn as_string(&self) -> String {
        self.to_string()
    }

    /// Whether every field lies within the legal range for its rate.
    pub fn is_in_range(&self) -> bool {
        self.hour < 24
            && self.minute < 60
            && self.second < 60
            && self.frame < self.rate.nominal_fps()
    }
}

impl fmt::Display for TimecodePacket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let separator = if self.rate.is_drop_frame() { ';' } else { ':' };
        write!(
            f,
            "{}:{}:{}{}{}",
            self.hour, self.minute, self.second, separator, self.frame
        )
    }
}
