use super::layout;
use crate::timecode::TimecodePacket;

fn hour_byte(packet: &TimecodePacket) -> u8 {
    (packet.rate.bits() << layout::RATE_SHIFT) | (packet.hour & layout::HOUR_MASK)
}

/// Encode a packet as a Full Frame message.
///
/// # Examples
/// ```
/// use mtcparse_core::{RateClass, TimecodePacket, encode_full_frame};
///
/// let tc = TimecodePacket::new(RateClass::Fps25, 1, 5, 10, 3);
/// assert_eq!(
///     encode_full_frame(&tc),
///     [0xF0, 0x7F, 0x7F, 0x01, 0x01, 0x21, 0x05, 0x0A, 0x03, 0xF7]
/// );
/// ```
pub fn encode_full_frame(packet: &TimecodePacket) -> [u8; layout::FFM_LEN] {
    [
        layout::FFM_HEADER_1,
        layout::FFM_HEADER_2,
        layout::FFM_CHANNEL,
        layout::FFM_ID_1,
        layout::FFM_ID_2,
        hour_byte(packet),
        packet.minute,
        packet.second,
        packet.frame,
        layout::FFM_EOX,
    ]
}

/// Encode a packet as a full cycle of eight Quarter Frame messages, piece 0
/// first.
pub fn encode_quarter_frames(
    packet: &TimecodePacket,
) -> [u8; layout::QFM_LEN * layout::QFM_CYCLE_LEN] {
    let nibbles = [
        packet.frame & 0x0F,
        (packet.frame >> 4) & 0x01,
        packet.second & 0x0F,
        (packet.second >> 4) & 0x03,
        packet.minute & 0x0F,
        (packet.minute >> 4) & 0x03,
        packet.hour & 0x0F,
        ((packet.hour >> 4) & 0x01) | (packet.rate.bits() << 1),
    ];
    let mut out = [0u8; layout::QFM_LEN * layout::QFM_CYCLE_LEN];
    for (index, nibble) in nibbles.into_iter().enumerate() {
        out[index * layout::QFM_LEN] = layout::QFM_HEADER;
        out[index * layout::QFM_LEN + 1] = ((index as u8) << layout::QFM_INDEX_SHIFT) | nibble;
    }
    out
}
