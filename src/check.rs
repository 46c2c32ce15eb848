//! Consistency check over the output representations

#![cfg(feature = "global_gen")]
#![cfg_attr(docsrs, doc(cfg(feature = "global_gen")))]

use chrono::{DateTime, Utc};

use crate::{extract_timestamp, AsOf, Error, Format, Identifier, V6Generator};

/// Generates one UUIDv6 for the current time in all four formats, then verifies that they denote
/// the same 128 bits and that the embedded timestamp decodes back to the input instant.
///
/// A private generator is used, so the global generator state is not affected.
///
/// # Errors
///
/// Returns [`Error::SelfCheck`] describing the first inconsistency found.
///
/// # Examples
///
/// ```rust
/// uuid6::self_check()?;
/// # Ok::<(), uuid6::Error>(())
/// ```
pub fn self_check() -> Result<(), Error> {
    let now = DateTime::<Utc>::from(std::time::SystemTime::now());
    let seed = rand::random::<u64>() & ((1 << 48) - 1);
    let seq = rand::random::<u16>() & ((1 << 14) - 1);
    tracing::debug!(%now, seed, seq, "running self-check");

    let mut g = V6Generator::with_rand08(rand::thread_rng());
    let mut encode = |format: Format| {
        g.encode(format, Some(AsOf::from(now)), Some(seed), Some(seq))
    };
    let int = encode(Format::Int)?;
    let hex = encode(Format::Hex)?;
    let text = encode(Format::Str)?;
    let structured = encode(Format::Structured)?;

    let Identifier::Structured(uuid) = structured else {
        return Err(mismatch("structured", &structured));
    };
    if int != Identifier::Int(uuid.into()) {
        return Err(mismatch("int", &int));
    }
    if hex != Identifier::Hex(uuid.encode_hex().to_string()) {
        return Err(mismatch("hex", &hex));
    }
    if text != Identifier::Str(uuid.to_string()) {
        return Err(mismatch("str", &text));
    }

    for e in [int, hex, text, structured] {
        let decoded = extract_timestamp(e.clone(), false)?;
        if decoded.map(|dt| dt.timestamp_micros()) != Some(now.timestamp_micros()) {
            return Err(Error::SelfCheck(format!(
                "{e} decoded to {decoded:?}, expected {now}"
            )));
        }
    }
    Ok(())
}

fn mismatch(kind: &str, e: &Identifier) -> Error {
    Error::SelfCheck(format!("{kind} representation {e} disagrees with the others"))
}

#[cfg(test)]
mod tests {
    use super::self_check;

    /// Passes on a consistent build
    #[test]
    fn passes_on_a_consistent_build() {
        for _ in 0..100 {
            assert_eq!(self_check(), Ok(()));
        }
    }
}
