use super::layout;
use crate::timecode::{RateClass, TimecodePacket};

/// Split an hour byte (`0rrhhhhh`) into rate class and hour.
pub fn split_hour_byte(value: u8) -> (RateClass, u8) {
    let rate = RateClass::from_bits((value >> layout::RATE_SHIFT) & layout::RATE_MASK);
    (rate, value & layout::HOUR_MASK)
}

/// Split a Quarter Frame data byte (`0nnndddd`) into piece index and nibble.
pub fn split_quarter_frame(value: u8) -> (u8, u8) {
    let index = (value >> layout::QFM_INDEX_SHIFT) & layout::QFM_INDEX_MASK;
    (index, value & layout::QFM_NIBBLE_MASK)
}

/// Working packet mutated while a message is parsed.
///
/// Fields stay `None` until written. A Quarter Frame MSB piece merged into a
/// field that was never written ORs into [`layout::UNSET`], and unset fields
/// read back as `UNSET` when a packet is built.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Assembly {
    pub rate: Option<RateClass>,
    pub hour: Option<u8>,
    pub minute: Option<u8>,
    pub second: Option<u8>,
    pub frame: Option<u8>,
}

impl Assembly {
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_complete(&self) -> bool {
        self.rate.is_some()
            && self.hour.is_some()
            && self.minute.is_some()
            && self.second.is_some()
            && self.frame.is_some()
    }

    /// Merge one Quarter Frame piece into the working packet.
    pub fn merge_quarter_frame(&mut self, index: u8, nibble: u8) {
        match index {
            layout::QFM_INDEX_FRAME_LSB => self.frame = Some(nibble & 0x0F),
            layout::QFM_INDEX_FRAME_MSB => merge_msb(&mut self.frame, nibble & 0x01),
            layout::QFM_INDEX_SECOND_LSB => self.second = Some(nibble & 0x0F),
            layout::QFM_INDEX_SECOND_MSB => merge_msb(&mut self.second, nibble & 0x03),
            layout::QFM_INDEX_MINUTE_LSB => self.minute = Some(nibble & 0x0F),
            layout::QFM_INDEX_MINUTE_MSB => merge_msb(&mut self.minute, nibble & 0x03),
            layout::QFM_INDEX_HOUR_LSB => self.hour = Some(nibble & 0x0F),
            _ => {
                merge_msb(&mut self.hour, nibble & 0x01);
                self.rate = Some(RateClass::from_bits(nibble >> 1));
            }
        }
    }

    /// Snapshot the working packet. Unset fields read as [`layout::UNSET`].
    /// Both completion paths write the rate first, so an unset rate only
    /// shows up on a direct snapshot; it decodes from `UNSET` as `Fps30`.
    pub fn to_packet(&self) -> TimecodePacket {
        TimecodePacket {
            rate: self
                .rate
                .unwrap_or_else(|| RateClass::from_bits(layout::UNSET)),
            hour: self.hour.unwrap_or(layout::UNSET),
            minute: self.minute.unwrap_or(layout::UNSET),
            second: self.second.unwrap_or(layout::UNSET),
            frame: self.frame.unwrap_or(layout::UNSET),
        }
    }
}

fn merge_msb(field: &mut Option<u8>, bits: u8) {
    let current = field.unwrap_or(layout::UNSET);
    *field = Some(current | (bits << 4));
}
