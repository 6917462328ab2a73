// Full Frame Message: F0 7F 7F 01 01 hr mn sc fr F7
pub const FFM_HEADER_1: u8 = 0xF0;
pub const FFM_HEADER_2: u8 = 0x7F;
pub const FFM_CHANNEL: u8 = 0x7F;
pub const FFM_ID_1: u8 = 0x01;
pub const FFM_ID_2: u8 = 0x01;
pub const FFM_EOX: u8 = 0xF7;
pub const FFM_LEN: usize = 10;

// Quarter Frame Message: F1 0nnn dddd
pub const QFM_HEADER: u8 = 0xF1;
pub const QFM_LEN: usize = 2;
pub const QFM_CYCLE_LEN: usize = 8;

pub const QFM_INDEX_SHIFT: u8 = 4;
pub const QFM_INDEX_MASK: u8 = 0x07;
pub const QFM_NIBBLE_MASK: u8 = 0x0F;

pub const QFM_INDEX_FRAME_LSB: u8 = 0;
pub const QFM_INDEX_FRAME_MSB: u8 = 1;
pub const QFM_INDEX_SECOND_LSB: u8 = 2;
pub const QFM_INDEX_SECOND_MSB: u8 = 3;
pub const QFM_INDEX_MINUTE_LSB: u8 = 4;
pub const QFM_INDEX_MINUTE_MSB: u8 = 5;
pub const QFM_INDEX_HOUR_LSB: u8 = 6;
pub const QFM_INDEX_HOUR_MSB: u8 = 7;

// Hour byte layout shared by both grammars: 0rrhhhhh
pub const RATE_SHIFT: u8 = 5;
pub const RATE_MASK: u8 = 0x03;
pub const HOUR_MASK: u8 = 0x1F;

/// Marker for a field that has not been written during assembly.
pub const UNSET: u8 = 0xFF;
