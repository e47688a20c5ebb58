//! Bit widths, shifts and masks of the Snowflake layout.
//!
//! ```text
//!  Bit Index:  63           63 62            22 21               17 16           12 11             0
//!              +--------------+----------------+-------------------+---------------+---------------+
//!  Field:      | reserved (1) | timestamp (41) | datacenter ID (5) | worker ID (5) | sequence (12) |
//!              +--------------+----------------+-------------------+---------------+---------------+
//!              |<------------------------ MSB ---------- 64 bits ---------- LSB ------------------->|
//! ```

/// Width of the per-millisecond sequence field.
pub const SEQUENCE_BITS: u64 = 12;

/// Width of the worker ID field.
pub const WORKER_ID_BITS: u64 = 5;

/// Width of the datacenter ID field.
pub const DATACENTER_ID_BITS: u64 = 5;

/// Width of the timestamp-delta field. The sign bit stays clear.
pub const TIMESTAMP_BITS: u64 = 63 - (SEQUENCE_BITS + WORKER_ID_BITS + DATACENTER_ID_BITS);

/// Largest worker ID: `2^5 - 1`.
pub const MAX_WORKER_ID: u64 = (1 << WORKER_ID_BITS) - 1;

/// Largest datacenter ID: `2^5 - 1`.
pub const MAX_DATACENTER_ID: u64 = (1 << DATACENTER_ID_BITS) - 1;

/// Mask for the sequence field, also its largest value: `2^12 - 1`.
pub const SEQUENCE_MASK: u64 = (1 << SEQUENCE_BITS) - 1;

/// Mask for the worker ID field once shifted down.
pub const WORKER_ID_MASK: u64 = MAX_WORKER_ID;

/// Mask for the datacenter ID field once shifted down.
pub const DATACENTER_ID_MASK: u64 = MAX_DATACENTER_ID;

/// Mask for the timestamp-delta field once shifted down, also the largest
/// representable delta (about 69 years of milliseconds).
pub const TIMESTAMP_MASK: u64 = (1 << TIMESTAMP_BITS) - 1;

/// Position of the worker ID field.
pub const WORKER_ID_SHIFT: u64 = SEQUENCE_BITS;

/// Position of the datacenter ID field.
pub const DATACENTER_ID_SHIFT: u64 = SEQUENCE_BITS + WORKER_ID_BITS;

/// Position of the timestamp-delta field.
pub const TIMESTAMP_SHIFT: u64 = SEQUENCE_BITS + WORKER_ID_BITS + DATACENTER_ID_BITS;

const _: () = assert!(TIMESTAMP_BITS == 41);
const _: () = assert!(TIMESTAMP_SHIFT + TIMESTAMP_BITS == 63);
