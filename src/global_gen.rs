//! Default generator and entry point functions.

#![cfg(feature = "global_gen")]
#![cfg_attr(docsrs, doc(cfg(feature = "global_gen")))]

use std::sync;

use crate::{AsOf, Error, Format, Identifier, Uuid};
use inner::GlobalGenInner;

/// Returns the lock handle of process-wide global generator, creating one if none exists.
fn lock_global_gen() -> sync::MutexGuard<'static, GlobalGenInner> {
    static G: sync::OnceLock<sync::Mutex<GlobalGenInner>> = sync::OnceLock::new();
    G.get_or_init(Default::default)
        .lock()
        .expect("uuid6: could not lock global generator")
}

/// Generates a UUIDv6 object from the current time with a random node.
///
/// This function employs a global generator and guarantees the process-wide increasing order of
/// sequence values assigned within the same timestamp tick. On Unix, this function resets the
/// generator when the process ID changes (i.e., upon process forks) to prevent collisions across
/// processes.
///
/// # Examples
///
/// ```rust
/// let uuid = uuid6::uuid6();
/// println!("{}", uuid); // e.g., "1ebfdb3c-aed5-6f38-8001-dd94caaef485"
/// println!("{:?}", uuid.as_bytes()); // as 16-byte big-endian array
///
/// let uuid_string: String = uuid6::uuid6().to_string();
/// ```
pub fn uuid6() -> Uuid {
    lock_global_gen().get_mut().generate()
}

/// Generates a UUIDv6 with the global generator and renders it in the requested representation.
///
/// See [`V6Generator::encode`](crate::V6Generator::encode) for the meaning of the arguments.
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] if `as_of` cannot be converted into a timestamp.
///
/// # Examples
///
/// ```rust
/// use uuid6::{generate, Format, Identifier};
///
/// let e = generate(Format::Hex, Some("2020-11-10T02:41:42.182162Z".into()), Some(0), Some(0))?;
/// assert_eq!(e, Identifier::Hex("1eb22fe43f0c62b48000000000000000".to_owned()));
///
/// let e = generate(Format::Int, None, None, None)?;
/// println!("{}", e); // e.g., "40873015229028996969259476966618100869"
/// # Ok::<(), uuid6::Error>(())
/// ```
pub fn generate(
    format: Format,
    as_of: Option<AsOf>,
    seed: Option<u64>,
    seq: Option<u16>,
) -> Result<Identifier, Error> {
    lock_global_gen()
        .get_mut()
        .encode(format, as_of, seed, seq)
}

mod inner {
    use rand::rngs::{adapter::ReseedingRng, OsRng};
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Core;

    use crate::generator::{RandSource, V6Generator};

    /// The type alias for the random number generator of the global generator.
    ///
    /// The global generator currently employs [`ChaCha12Core`] with [`ReseedingRng`] wrapper to
    /// emulate the strategy used by [`rand::rngs::ThreadRng`].
    #[derive(Debug)]
    pub struct GlobalGenRng(ReseedingRng<ChaCha12Core, OsRng>);

    impl RandSource for GlobalGenRng {
        fn next_u32(&mut self) -> u32 {
            rand::RngCore::next_u32(&mut self.0)
        }

        fn next_u64(&mut self) -> u64 {
            rand::RngCore::next_u64(&mut self.0)
        }
    }

    /// A thin wrapper to reset the state when the process ID changes (i.e., upon Unix forks).
    #[derive(Debug)]
    pub struct GlobalGenInner {
        #[cfg(unix)]
        pid: u32,
        generator: V6Generator<GlobalGenRng>,
    }

    impl Default for GlobalGenInner {
        fn default() -> Self {
            let core = ChaCha12Core::from_rng(OsRng)
                .expect("uuid6: could not initialize global generator");
            tracing::debug!("global generator initialized");
            Self {
                #[cfg(unix)]
                pid: std::process::id(),
                generator: V6Generator::new(GlobalGenRng(ReseedingRng::new(
                    core,
                    1024 * 64,
                    OsRng,
                ))),
            }
        }
    }

    impl GlobalGenInner {
        /// Returns a mutable reference to the inner [`V6Generator`] instance, resetting the
        /// generator state on Unix if the process ID has changed.
        pub fn get_mut(&mut self) -> &mut V6Generator<GlobalGenRng> {
            #[cfg(unix)]
            if self.pid != std::process::id() {
                tracing::debug!(pid = std::process::id(), "process ID changed");
                *self = Default::default();
            }
            &mut self.generator
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{generate, uuid6};
    use crate::{Format, Variant};

    const N_SAMPLES: usize = 100_000;
    thread_local!(static SAMPLES: Vec<String> = (0..N_SAMPLES).map(|_| uuid6().into()).collect());

    /// Generates canonical string
    #[test]
    fn generates_canonical_string() {
        let pattern = r"^[0-9a-f]{8}-[0-9a-f]{4}-6[0-9a-f]{3}-[89ab][0-9a-f]{3}-[0-9a-f]{12}$";
        let re = regex::Regex::new(pattern).unwrap();
        SAMPLES.with(|samples| {
            for e in samples {
                assert!(re.is_match(e));
            }
        });
    }

    /// Generates 100k identifiers without collision
    #[test]
    fn generates_100k_identifiers_without_collision() {
        use std::collections::HashSet;
        SAMPLES.with(|samples| {
            let s: HashSet<&String> = samples.iter().collect();
            assert_eq!(s.len(), N_SAMPLES);
        });
    }

    /// Encodes up-to-date timestamp
    #[test]
    fn encodes_up_to_date_timestamp() {
        use std::time;
        for _ in 0..10_000 {
            let ts_now = (time::SystemTime::now()
                .duration_since(time::UNIX_EPOCH)
                .expect("clock may have gone backwards")
                .as_millis()) as i128;
            let timestamp = uuid6().timestamp().unwrap().to_unix_nanos() / 1_000_000;
            assert!((ts_now - timestamp).abs() < 16);
        }
    }

    /// Sets constant bits and random bits properly
    #[test]
    fn sets_constant_bits_and_random_bits_properly() {
        // count '1' of each bit
        let bins = SAMPLES.with(|samples| {
            let mut bins = [0u32; 128];
            for e in samples {
                let mut it = bins.iter_mut().rev();
                for c in e.chars().rev() {
                    if let Some(mut num) = c.to_digit(16) {
                        for _ in 0..4 {
                            *it.next().unwrap() += num & 1;
                            num >>= 1;
                        }
                    }
                }
            }
            bins
        });

        // test if constant bits are all set to 1 or 0
        let n = N_SAMPLES as u32;
        assert_eq!(bins[48], 0, "version bit 48");
        assert_eq!(bins[49], n, "version bit 49");
        assert_eq!(bins[50], n, "version bit 50");
        assert_eq!(bins[51], 0, "version bit 51");
        assert_eq!(bins[64], n, "variant bit 64");
        assert_eq!(bins[65], 0, "variant bit 65");

        // test if random bits are set to 1 at ~50% probability
        // set margin based on binom dist 99.999% confidence interval
        let margin = 4.417173 * (0.5 * 0.5 / N_SAMPLES as f64).sqrt();
        for i in 80..128 {
            let p = bins[i] as f64 / N_SAMPLES as f64;
            assert!((p - 0.5).abs() < margin, "random bit {i}: {p}");
        }
    }

    /// Sets correct variant and version bits
    #[test]
    fn sets_correct_variant_and_version_bits() {
        for _ in 0..1_000 {
            let e = uuid6();
            assert_eq!(e.variant(), Variant::Var10);
            assert_eq!(e.version(), Some(6));
        }
    }

    /// Renders the requested format from the shared generator
    #[test]
    fn renders_the_requested_format_from_the_shared_generator() {
        for format in [Format::Int, Format::Hex, Format::Str, Format::Structured] {
            let e = generate(format, None, None, None).unwrap();
            assert_eq!(e.format(), format);
            assert_eq!(e.to_uuid().unwrap().version(), Some(6));
        }
    }

    /// Generates no IDs sharing same timestamp and sequence under multithreading
    #[test]
    fn generates_no_ids_sharing_same_timestamp_and_sequence_under_multithreading(
    ) -> Result<(), Box<dyn std::error::Error>> {
        use std::{collections::HashSet, sync::mpsc, thread};

        let (tx, rx) = mpsc::channel();
        for _ in 0..4 {
            let tx = tx.clone();
            thread::Builder::new()
                .spawn(move || {
                    for _ in 0..10_000 {
                        tx.send(uuid6()).unwrap();
                    }
                })
                .map_err(|err| format!("failed to spawn thread: {:?}", err))?;
        }
        drop(tx);

        let mut s = HashSet::new();
        while let Ok(e) = rx.recv() {
            s.insert(<[u8; 10]>::try_from(&e.as_bytes()[..10]).unwrap());
        }

        assert_eq!(s.len(), 4 * 10_000);
        Ok(())
    }
}
