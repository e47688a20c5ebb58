use core::fmt;

use crate::id::{
    DATACENTER_ID_MASK, DATACENTER_ID_SHIFT, SEQUENCE_MASK, TIMESTAMP_MASK, TIMESTAMP_SHIFT,
    WORKER_ID_MASK, WORKER_ID_SHIFT,
};

/// A 63-bit Snowflake ID stored in a signed 64-bit integer.
///
/// - 1 bit reserved (the sign bit, always clear)
/// - 41 bits timestamp (ms since the generator's epoch)
/// - 5 bits datacenter ID
/// - 5 bits worker ID
/// - 12 bits sequence
///
/// IDs order by their raw value, which is timestamp first, then the
/// generator identity, then the sequence.
///
/// # Example
///
/// ```
/// use snowseq::SnowflakeId;
///
/// let id = SnowflakeId::from_components(1000, 3, 7, 1);
/// assert_eq!(id.timestamp(), 1000);
/// assert_eq!(id.datacenter_id(), 3);
/// assert_eq!(id.worker_id(), 7);
/// assert_eq!(id.sequence(), 1);
/// ```
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "i64", into = "i64")
)]
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SnowflakeId {
    id: i64,
}

impl SnowflakeId {
    /// Packs the four fields into an ID. Each value is masked to its field
    /// width, so out-of-range input never bleeds into a neighbouring field.
    pub const fn from_components(
        timestamp: u64,
        datacenter_id: u64,
        worker_id: u64,
        sequence: u64,
    ) -> Self {
        let timestamp = (timestamp & TIMESTAMP_MASK) << TIMESTAMP_SHIFT;
        let datacenter_id = (datacenter_id & DATACENTER_ID_MASK) << DATACENTER_ID_SHIFT;
        let worker_id = (worker_id & WORKER_ID_MASK) << WORKER_ID_SHIFT;
        let sequence = sequence & SEQUENCE_MASK;
        Self {
            // Bit 63 is never set by the masks above.
            id: (timestamp | datacenter_id | worker_id | sequence) as i64,
        }
    }

    /// Wraps a raw value without validation. See [`Self::is_valid`].
    pub const fn from_raw(raw: i64) -> Self {
        Self { id: raw }
    }

    /// Returns the raw signed integer.
    pub const fn to_raw(&self) -> i64 {
        self.id
    }

    /// Returns true when the reserved sign bit is clear.
    pub const fn is_valid(&self) -> bool {
        self.id >= 0
    }

    /// Extracts the timestamp delta (ms since the epoch).
    pub const fn timestamp(&self) -> u64 {
        ((self.id as u64) >> TIMESTAMP_SHIFT) & TIMESTAMP_MASK
    }

    /// Extracts the datacenter ID.
    pub const fn datacenter_id(&self) -> u64 {
        ((self.id as u64) >> DATACENTER_ID_SHIFT) & DATACENTER_ID_MASK
    }

    /// Extracts the worker ID.
    pub const fn worker_id(&self) -> u64 {
        ((self.id as u64) >> WORKER_ID_SHIFT) & WORKER_ID_MASK
    }

    /// Extracts the sequence number.
    pub const fn sequence(&self) -> u64 {
        (self.id as u64) & SEQUENCE_MASK
    }

    /// Returns the wall-clock time (ms since the Unix epoch) encoded in this
    /// ID, given the epoch of the generator that issued it.
    pub const fn timestamp_millis(&self, epoch: u64) -> u64 {
        epoch + self.timestamp()
    }

    /// Returns the ID as a zero-padded 19-digit string, so that string order
    /// matches numeric order.
    pub fn to_padded_string(&self) -> String {
        format!("{:019}", self.id)
    }
}

impl fmt::Display for SnowflakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl fmt::Debug for SnowflakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnowflakeId")
            .field("id", &self.id)
            .field("timestamp", &self.timestamp())
            .field("datacenter_id", &self.datacenter_id())
            .field("worker_id", &self.worker_id())
            .field("sequence", &self.sequence())
            .finish()
    }
}

impl From<SnowflakeId> for i64 {
    fn from(id: SnowflakeId) -> Self {
        id.to_raw()
    }
}

/// A raw value that sets the reserved sign bit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{raw} sets the reserved sign bit and is not a snowflake id")]
pub struct InvalidSnowflakeId {
    /// The rejected raw value.
    pub raw: i64,
}

impl TryFrom<i64> for SnowflakeId {
    type Error = InvalidSnowflakeId;

    fn try_from(raw: i64) -> Result<Self, Self::Error> {
        let id = Self::from_raw(raw);
        if id.is_valid() {
            Ok(id)
        } else {
            Err(InvalidSnowflakeId { raw })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::{MAX_DATACENTER_ID, MAX_WORKER_ID};

    #[test]
    fn max_fields_fill_the_low_63_bits() {
        let id = SnowflakeId::from_components(
            TIMESTAMP_MASK,
            MAX_DATACENTER_ID,
            MAX_WORKER_ID,
            SEQUENCE_MASK,
        );
        assert_eq!(id.to_raw(), i64::MAX);
        assert_eq!(id.timestamp(), TIMESTAMP_MASK);
        assert_eq!(id.datacenter_id(), MAX_DATACENTER_ID);
        assert_eq!(id.worker_id(), MAX_WORKER_ID);
        assert_eq!(id.sequence(), SEQUENCE_MASK);
        assert!(id.is_valid());
    }

    #[test]
    fn oversized_components_are_masked() {
        let id = SnowflakeId::from_components(0, 32, 33, 4096);
        assert_eq!(id.datacenter_id(), 0);
        assert_eq!(id.worker_id(), 1);
        assert_eq!(id.sequence(), 0);
        assert_eq!(id.timestamp(), 0);
    }

    #[test]
    fn matches_shift_formula() {
        let id = SnowflakeId::from_components(123_456, 1, 2, 3);
        let expected = (123_456_i64 << 22) | (1 << 17) | (2 << 12) | 3;
        assert_eq!(id.to_raw(), expected);
    }

    #[test]
    fn orders_by_timestamp_then_sequence() {
        let a = SnowflakeId::from_components(10, 31, 31, 4095);
        let b = SnowflakeId::from_components(11, 0, 0, 0);
        let c = SnowflakeId::from_components(11, 0, 0, 1);
        assert!(a < b && b < c);
    }

    #[test]
    fn timestamp_millis_adds_epoch() {
        let id = SnowflakeId::from_components(5_000, 0, 0, 0);
        assert_eq!(id.timestamp_millis(1_000), 6_000);
    }

    #[test]
    fn padded_string_is_fixed_width() {
        let id = SnowflakeId::from_raw(42);
        assert_eq!(id.to_padded_string(), "0000000000000000042");
        assert_eq!(SnowflakeId::from_raw(i64::MAX).to_padded_string().len(), 19);
    }

    #[test]
    fn try_from_rejects_sign_bit() {
        assert_eq!(SnowflakeId::try_from(42).map(i64::from), Ok(42));
        assert_eq!(
            SnowflakeId::try_from(-1),
            Err(InvalidSnowflakeId { raw: -1 })
        );
    }

    #[test]
    fn debug_lists_fields() {
        let id = SnowflakeId::from_components(1, 2, 3, 4);
        let rendered = format!("{id:?}");
        assert!(rendered.contains("datacenter_id: 2"));
        assert!(rendered.contains("worker_id: 3"));
        assert!(rendered.contains("sequence: 4"));
    }
}
