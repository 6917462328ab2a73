use serde::{Deserialize, Serialize};

use crate::queue::{DEFAULT_CAPACITY, OverflowPolicy};
use crate::timecode::TimeScale;

/// Decoder settings.
///
/// # Examples
/// ```
/// use mtcparse_core::{DecoderConfig, OverflowPolicy, TimeScale};
///
/// let config = DecoderConfig::default();
/// assert_eq!(config.queue_capacity, 3);
/// assert_eq!(config.overflow, OverflowPolicy::DropOldest);
/// assert_eq!(config.time_scale, TimeScale::Corrected);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecoderConfig {
    /// Maximum number of decoded packets waiting for a consumer.
    pub queue_capacity: usize,
    /// Behavior of the packet queue when full.
    pub overflow: OverflowPolicy,
    /// Millisecond/microsecond conversion used by the decoder accessors.
    pub time_scale: TimeScale,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            queue_capacity: DEFAULT_CAPACITY,
            overflow: OverflowPolicy::default(),
            time_scale: TimeScale::default(),
        }
    }
}
