//! An implementation of time-ordered UUID version 6
//!
//! ```rust
//! use uuid6::uuid6;
//!
//! let uuid = uuid6();
//! println!("{}", uuid); // e.g., "1ebfdb3c-aed5-6f38-8001-dd94caaef485"
//! println!("{:?}", uuid.as_bytes()); // as 16-byte big-endian array
//! ```
//!
//! See [draft-peabody-dispatch-new-uuid-format](https://datatracker.ietf.org/doc/html/draft-peabody-dispatch-new-uuid-format).
//!
//! # Field and bit layout
//!
//! This implementation produces identifiers with the following bit layout:
//!
//! ```text
//!  0                   1                   2                   3
//!  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                           time_high                           |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |           time_mid            |  ver  |       time_low        |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |var|         clock_seq         |             node              |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                              node                             |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! ```
//!
//! Where:
//!
//! - The 60 bits of `time_high`, `time_mid`, and `time_low` hold, most significant bits first,
//!   the count of 100-nanosecond intervals since 1582-10-15T00:00:00Z.
//! - The 4-bit `ver` field is set at `0110`.
//! - The 2-bit `var` field is set at `10`.
//! - The 14-bit `clock_seq` field holds the sequence counter that distinguishes identifiers
//!   generated within the same 100-nanosecond tick. The counter is randomly initialized, is
//!   incremented by one whenever the timestamp does not advance past the previous one, and
//!   otherwise carries over unchanged.
//! - The 48-bit `node` field is filled with random bits unless a seed value is given.
//!
//! # Output representations and timestamp extraction
//!
//! ```rust
//! use uuid6::{extract_timestamp, generate, Format, Identifier};
//!
//! let as_of = "2020-11-10T02:41:42.182162Z";
//! let e = generate(Format::Str, Some(as_of.into()), Some(0), Some(0))?;
//! assert_eq!(e, Identifier::Str("1eb22fe4-3f0c-62b4-8000-000000000000".to_owned()));
//!
//! let dt = extract_timestamp(e, false)?.unwrap();
//! assert_eq!(dt.to_rfc3339(), "2020-11-10T02:41:42.182162+00:00");
//! # Ok::<(), uuid6::Error>(())
//! ```
//!
//! # Crate features
//!
//! Default features:
//!
//! - `global_gen`: enables the process-wide global generator behind [`uuid6()`] and
//!   [`generate()`], and the [`self_check()`] routine.
//!
//! Optional features:
//!
//! - `serde`: enables serialization/deserialization of [`Uuid`] via serde.
//! - `uuid`: enables conversion to/from `uuid` crate's UUID type.

#![cfg_attr(docsrs, feature(doc_cfg))]

mod error;
pub use error::Error;

mod id;
pub use id::{ParseError, Uuid, Variant};

mod timestamp;
pub use timestamp::{AsOf, Timestamp, GREGORIAN_OFFSET};

mod identifier;
pub use identifier::{extract_timestamp, Format, Identifier};

pub mod generator;
pub use generator::V6Generator;

mod global_gen;
#[cfg(feature = "global_gen")]
pub use global_gen::{generate, uuid6};

mod check;
#[cfg(feature = "global_gen")]
pub use check::self_check;
