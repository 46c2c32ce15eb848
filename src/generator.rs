//! UUIDv6 generator and related types.

use crate::{AsOf, Error, Format, Identifier, Timestamp, Uuid};

pub mod with_rand08;

const MAX_SEQ: u16 = (1 << 14) - 1;
const MAX_NODE: u64 = (1 << 48) - 1;

/// A trait that defines the minimum random number generator interface for [`V6Generator`].
pub trait RandSource {
    /// Returns the next random `u32`.
    fn next_u32(&mut self) -> u32;

    /// Returns the next random `u64`.
    fn next_u64(&mut self) -> u64;
}

/// A trait that defines the minimum system clock interface for [`V6Generator`].
pub trait TimeSource {
    /// Returns the current time as a UUIDv6 timestamp.
    fn now(&mut self) -> Timestamp;
}

/// The default [`TimeSource`] that reads [`std::time::SystemTime`] at nanosecond resolution.
#[derive(Clone, Copy, Eq, PartialEq, Debug, Default)]
pub struct StdSystemTime;

impl TimeSource for StdSystemTime {
    fn now(&mut self) -> Timestamp {
        Timestamp::from_system_time(std::time::SystemTime::now())
            .expect("clock may have gone backwards")
    }
}

/// Determines how the sequence counter behaves when the timestamp moves forward.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug, Default)]
pub enum SequenceMode {
    /// Keeps the previous sequence value unchanged.
    #[default]
    Carry,

    /// Draws a fresh random sequence value.
    Reseed,
}

/// The last-seen timestamp and last-used sequence value of a generator.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug, Default)]
struct SequenceState {
    timestamp: u64,
    seq: Option<u16>,
}

/// Represents a UUIDv6 generator that encapsulates the sequence counter state and guarantees
/// distinct, increasing sequence values for UUIDs generated within the same timestamp tick.
///
/// The generator is a plain state machine and is not synchronized internally. Wrap it in a mutex
/// to share one sequence state across threads:
///
/// ```rust
/// use rand::rngs::OsRng;
/// use std::{sync, thread};
/// use uuid6::V6Generator;
///
/// let g = sync::Arc::new(sync::Mutex::new(V6Generator::with_rand08(OsRng)));
/// thread::scope(|s| {
///     for i in 0..4 {
///         let g = sync::Arc::clone(&g);
///         s.spawn(move || {
///             for _ in 0..8 {
///                 println!("{} by thread {}", g.lock().unwrap().generate(), i);
///                 thread::yield_now();
///             }
///         });
///     }
/// });
/// ```
///
/// # Sequence transitions
///
/// Unless a sequence value is given explicitly, each call updates the counter as follows:
///
/// | Previous state          | New timestamp vs. stored | Sequence                        |
/// | ----------------------- | ------------------------ | ------------------------------- |
/// | Unset                   | (any)                    | Random 14 bits                  |
/// | Set                     | Less than or equal       | Previous + 1 (wraps at 2^14)    |
/// | Set                     | Greater                  | Previous, or random on `Reseed` |
///
/// The new timestamp is stored afterwards in every case. An explicit sequence value replaces the
/// stored one, which allows fully deterministic output.
#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub struct V6Generator<R, T = StdSystemTime> {
    state: SequenceState,
    mode: SequenceMode,

    /// The random number generator used by the generator.
    rng: R,

    /// The system clock used by the generator.
    time: T,
}

impl<R: RandSource> V6Generator<R> {
    /// Creates a generator instance reading the system clock.
    pub const fn new(rng: R) -> Self {
        Self::with_rand_and_time_sources(rng, StdSystemTime)
    }
}

impl<R: RandSource, T: TimeSource> V6Generator<R, T> {
    /// Creates a generator instance with a specified random number generator and system clock.
    pub const fn with_rand_and_time_sources(rng: R, time: T) -> Self {
        Self {
            state: SequenceState {
                timestamp: 0,
                seq: None,
            },
            mode: SequenceMode::Carry,
            rng,
            time,
        }
    }

    /// Sets the behavior of the sequence counter on timestamp advance.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use uuid6::{generator::SequenceMode, V6Generator};
    ///
    /// let mut g =
    ///     V6Generator::with_rand08(rand::thread_rng()).with_sequence_mode(SequenceMode::Reseed);
    /// println!("{}", g.generate());
    /// ```
    pub fn with_sequence_mode(mut self, mode: SequenceMode) -> Self {
        self.mode = mode;
        self
    }

    /// Returns the timestamp stored by the last call, or `None` if nothing has been generated.
    pub fn last_timestamp(&self) -> Option<Timestamp> {
        self.state
            .seq
            .and_then(|_| Timestamp::from_ticks(self.state.timestamp))
    }

    /// Returns the sequence value used by the last call, or `None` if nothing has been generated.
    pub const fn last_seq(&self) -> Option<u16> {
        self.state.seq
    }

    /// Generates a new UUIDv6 object from the current timestamp with a random node.
    pub fn generate(&mut self) -> Uuid {
        let timestamp = self.time.now();
        self.generate_core(timestamp, None, None)
    }

    /// Generates a new UUIDv6 object and renders it in the requested representation.
    ///
    /// `as_of` defaults to the current time, `seed` replaces the random node with its low 48
    /// bits, and `seq` forces the sequence value (and overwrites the stored one).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `as_of` cannot be converted into a timestamp. The
    /// generator state is left untouched in that case.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use uuid6::{Format, Identifier, V6Generator};
    ///
    /// let mut g = V6Generator::with_rand08(rand::thread_rng());
    /// let as_of = Some("2017-06-07T16:55:35.812946Z".into());
    /// let e = g.encode(Format::Str, as_of, Some(0x010203040506), Some(0))?;
    /// assert_eq!(e, Identifier::Str("1e74ba22-0616-6934-8000-010203040506".to_owned()));
    /// # Ok::<(), uuid6::Error>(())
    /// ```
    pub fn encode(
        &mut self,
        format: Format,
        as_of: Option<AsOf>,
        seed: Option<u64>,
        seq: Option<u16>,
    ) -> Result<Identifier, Error> {
        let timestamp = match as_of {
            Some(as_of) => as_of.to_timestamp()?,
            None => self.time.now(),
        };
        Ok(Identifier::render(
            self.generate_core(timestamp, seed, seq),
            format,
        ))
    }

    /// Generates a new UUIDv6 object from the `timestamp` passed.
    ///
    /// This is the low-level primitive behind the other generator methods: it applies the
    /// sequence transition, resolves the node, and packs the fields.
    pub fn generate_core(
        &mut self,
        timestamp: Timestamp,
        seed: Option<u64>,
        seq: Option<u16>,
    ) -> Uuid {
        let seq = self.next_seq(timestamp.ticks(), seq);
        let node = match seed {
            Some(seed) => seed & MAX_NODE,
            None => self.rng.next_u64() & MAX_NODE,
        };
        Uuid::from_fields_v6(timestamp.ticks(), seq, node)
    }

    /// Determines the sequence value for `ticks` and records both in the state.
    fn next_seq(&mut self, ticks: u64, forced: Option<u16>) -> u16 {
        let seq = match (forced, self.state.seq) {
            (Some(seq), _) => {
                tracing::trace!(seq, "sequence given explicitly");
                seq & MAX_SEQ
            }
            (None, None) => {
                let seq = self.rng.next_u32() as u16 & MAX_SEQ;
                tracing::trace!(seq, "sequence initialized");
                seq
            }
            (None, Some(prev)) if ticks <= self.state.timestamp => {
                tracing::trace!(
                    prev,
                    ticks,
                    last = self.state.timestamp,
                    "timestamp did not advance"
                );
                prev.wrapping_add(1) & MAX_SEQ
            }
            (None, Some(prev)) => match self.mode {
                SequenceMode::Carry => prev,
                SequenceMode::Reseed => {
                    let seq = self.rng.next_u32() as u16 & MAX_SEQ;
                    tracing::trace!(prev, seq, "sequence reseeded");
                    seq
                }
            },
        };

        self.state = SequenceState {
            timestamp: ticks,
            seq: Some(seq),
        };
        seq
    }
}

/// Supports operations as an infinite iterator that produces a new UUIDv6 object for each call of
/// `next()`.
///
/// # Examples
///
/// ```rust
/// use uuid6::V6Generator;
///
/// V6Generator::with_rand08(rand::thread_rng())
///     .enumerate()
///     .skip(4)
///     .take(4)
///     .for_each(|(i, e)| println!("[{}] {}", i, e));
/// ```
impl<R: RandSource, T: TimeSource> Iterator for V6Generator<R, T> {
    type Item = Uuid;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.generate())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }
}

impl<R: RandSource, T: TimeSource> std::iter::FusedIterator for V6Generator<R, T> {}
