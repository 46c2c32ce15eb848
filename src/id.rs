use std::{fmt, str};

use fstr::FStr;

use crate::Timestamp;

/// Represents a Universally Unique IDentifier.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
pub struct Uuid([u8; 16]);

impl Uuid {
    /// Nil UUID (00000000-0000-0000-0000-000000000000)
    pub const NIL: Self = Self([0x00; 16]);

    /// Max UUID (ffffffff-ffff-ffff-ffff-ffffffffffff)
    pub const MAX: Self = Self([0xff; 16]);

    /// Returns a reference to the underlying byte array.
    pub const fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    /// Creates a UUID byte array from UUIDv6 field values.
    ///
    /// `timestamp` is the 60-bit count of 100-nanosecond ticks since 1582-10-15, `clock_seq` the
    /// 14-bit sequence counter, and `node` the 48-bit node value.
    ///
    /// # Panics
    ///
    /// Panics if any argument exceeds the bit width of its field.
    pub const fn from_fields_v6(timestamp: u64, clock_seq: u16, node: u64) -> Self {
        if timestamp >= 1 << 60 || clock_seq >= 1 << 14 || node >= 1 << 48 {
            panic!("invalid field value");
        }

        Self([
            (timestamp >> 52) as u8,
            (timestamp >> 44) as u8,
            (timestamp >> 36) as u8,
            (timestamp >> 28) as u8,
            (timestamp >> 20) as u8,
            (timestamp >> 12) as u8,
            0x60 | ((timestamp >> 8) & 0x0f) as u8,
            timestamp as u8,
            0x80 | (clock_seq >> 8) as u8,
            clock_seq as u8,
            (node >> 40) as u8,
            (node >> 32) as u8,
            (node >> 24) as u8,
            (node >> 16) as u8,
            (node >> 8) as u8,
            node as u8,
        ])
    }

    /// Returns the 4-bit version field value if the variant field is `10`, or `None` otherwise.
    pub const fn version(&self) -> Option<u8> {
        match self.variant() {
            Variant::Var10 => Some(self.0[6] >> 4),
            _ => None,
        }
    }

    /// Returns the variant field value of the UUID.
    pub const fn variant(&self) -> Variant {
        match self.0[8] >> 4 {
            0b0000..=0b0111 => Variant::Var0,
            0b1000..=0b1011 => Variant::Var10,
            0b1100..=0b1101 => Variant::Var110,
            _ => Variant::VarReserved,
        }
    }

    /// Returns the embedded timestamp if the version nibble reads 6, or `None` otherwise.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use uuid6::Uuid;
    ///
    /// let x = "1e74ba22-0616-6934-8000-010203040506".parse::<Uuid>()?;
    /// assert_eq!(x.timestamp().map(|t| t.to_unix_nanos()), Some(1_496_854_535_812_946_000));
    ///
    /// let y = "2ca4b2ce-6c13-40d4-bccf-37d222820f6f".parse::<Uuid>()?;
    /// assert_eq!(y.timestamp(), None);
    /// # Ok::<(), uuid6::ParseError>(())
    /// ```
    pub fn timestamp(&self) -> Option<Timestamp> {
        let x = u128::from(*self);
        if (x >> 76) & 0xf != 6 {
            return None;
        }
        let ticks = (((x >> 80) as u64) << 12) | ((x >> 64) as u64 & 0xfff);
        Timestamp::from_ticks(ticks)
    }

    /// Returns the 14-bit sequence counter field.
    pub const fn clock_seq(&self) -> u16 {
        (((self.0[8] & 0x3f) as u16) << 8) | self.0[9] as u16
    }

    /// Returns the 48-bit node field.
    pub const fn node(&self) -> u64 {
        let mut node = 0u64;
        let mut i = 10;
        while i < 16 {
            node = (node << 8) | self.0[i] as u64;
            i += 1;
        }
        node
    }

    /// Returns the 8-4-4-4-12 hexadecimal string representation stored in a stack-allocated
    /// string type.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use uuid6::Uuid;
    ///
    /// let x = "1eb22fe4-3f0c-62b4-8000-000000000000".parse::<Uuid>()?;
    /// let y = x.encode();
    /// assert_eq!(&y as &str, "1eb22fe4-3f0c-62b4-8000-000000000000");
    /// assert_eq!(format!("{}", y), "1eb22fe4-3f0c-62b4-8000-000000000000");
    /// # Ok::<(), uuid6::ParseError>(())
    /// ```
    pub fn encode(&self) -> FStr<36> {
        let mut buffer = [0u8; 36];
        let mut buf_iter = buffer.iter_mut();
        for (i, e) in self.0.iter().enumerate() {
            *buf_iter.next().unwrap() = DIGITS[(e >> 4) as usize];
            *buf_iter.next().unwrap() = DIGITS[(e & 15) as usize];
            if i == 3 || i == 5 || i == 7 || i == 9 {
                *buf_iter.next().unwrap() = b'-';
            }
        }
        debug_assert!(buffer.is_ascii());
        // SAFETY: ok because buffer consists of ASCII code points
        unsafe { FStr::from_inner_unchecked(buffer) }
    }

    /// Returns the 32-digit lowercase hexadecimal representation without hyphens.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use uuid6::Uuid;
    ///
    /// let x = Uuid::from(0x1eb22fe43f0c62b48000010203040506u128);
    /// assert_eq!(&x.encode_hex() as &str, "1eb22fe43f0c62b48000010203040506");
    /// ```
    pub fn encode_hex(&self) -> FStr<32> {
        let mut buffer = [0u8; 32];
        for (i, e) in self.0.iter().enumerate() {
            buffer[i * 2] = DIGITS[(e >> 4) as usize];
            buffer[i * 2 + 1] = DIGITS[(e & 15) as usize];
        }
        debug_assert!(buffer.is_ascii());
        // SAFETY: ok because buffer consists of ASCII code points
        unsafe { FStr::from_inner_unchecked(buffer) }
    }
}

const DIGITS: &[u8; 16] = b"0123456789abcdef";

impl fmt::Display for Uuid {
    /// Returns the 8-4-4-4-12 canonical hexadecimal string representation.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl str::FromStr for Uuid {
    type Err = ParseError;

    /// Creates an object from the 8-4-4-4-12 hexadecimal string representation or from the
    /// 32-digit hexadecimal representation without hyphens.
    fn from_str(src: &str) -> Result<Self, Self::Err> {
        const ERR: ParseError = ParseError {};
        let dashed = src.len() == 36;
        if !dashed && src.len() != 32 {
            return Err(ERR);
        }

        let mut dst = [0u8; 16];
        let mut iter = src.chars();
        for (i, e) in dst.iter_mut().enumerate() {
            let hi = iter.next().ok_or(ERR)?.to_digit(16).ok_or(ERR)? as u8;
            let lo = iter.next().ok_or(ERR)?.to_digit(16).ok_or(ERR)? as u8;
            *e = (hi << 4) | lo;
            if dashed && (i == 3 || i == 5 || i == 7 || i == 9) && iter.next().ok_or(ERR)? != '-' {
                return Err(ERR);
            }
        }
        if iter.next().is_none() {
            Ok(Self(dst))
        } else {
            Err(ERR)
        }
    }
}

impl From<Uuid> for [u8; 16] {
    fn from(src: Uuid) -> Self {
        src.0
    }
}

impl From<[u8; 16]> for Uuid {
    fn from(src: [u8; 16]) -> Self {
        Self(src)
    }
}

impl AsRef<[u8]> for Uuid {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl From<Uuid> for u128 {
    fn from(src: Uuid) -> Self {
        Self::from_be_bytes(src.0)
    }
}

impl From<u128> for Uuid {
    fn from(src: u128) -> Self {
        Self(src.to_be_bytes())
    }
}

impl From<Uuid> for String {
    fn from(src: Uuid) -> Self {
        src.to_string()
    }
}

impl TryFrom<String> for Uuid {
    type Error = ParseError;

    fn try_from(src: String) -> Result<Self, Self::Error> {
        src.parse()
    }
}

/// The reserved variants of UUIDs.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub enum Variant {
    /// The variant field `0`, used by the Nil UUID and the NCS backward-compatible format.
    Var0,

    /// The variant field `10`, used by RFC 4122 and its successors including UUIDv6.
    Var10,

    /// The variant field `110`, reserved for Microsoft backward compatibility.
    Var110,

    /// The reserved variant field `111`, also used by the Max UUID.
    VarReserved,
}

/// Error parsing an invalid string representation of UUID.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct ParseError {}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid string representation")
    }
}

impl std::error::Error for ParseError {}

#[cfg(feature = "uuid")]
#[cfg_attr(docsrs, doc(cfg(feature = "uuid")))]
mod uuid_support {
    use super::Uuid;

    impl From<Uuid> for uuid::Uuid {
        fn from(src: Uuid) -> Self {
            uuid::Uuid::from_bytes(src.0)
        }
    }

    impl From<uuid::Uuid> for Uuid {
        fn from(src: uuid::Uuid) -> Self {
            Self(src.into_bytes())
        }
    }
}

#[cfg(feature = "serde")]
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
mod serde_support {
    use super::{fmt, Uuid};
    use serde::{de, Deserializer, Serializer};

    impl serde::Serialize for Uuid {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            if serializer.is_human_readable() {
                serializer.serialize_str(&self.encode())
            } else {
                serializer.serialize_bytes(self.as_bytes())
            }
        }
    }

    impl<'de> serde::Deserialize<'de> for Uuid {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            if deserializer.is_human_readable() {
                deserializer.deserialize_str(VisitorImpl)
            } else {
                deserializer.deserialize_bytes(VisitorImpl)
            }
        }
    }

    struct VisitorImpl;

    impl<'de> de::Visitor<'de> for VisitorImpl {
        type Value = Uuid;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(formatter, "a UUID representation")
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
            value.parse::<Self::Value>().map_err(de::Error::custom)
        }

        fn visit_bytes<E: de::Error>(self, value: &[u8]) -> Result<Self::Value, E> {
            <[u8; 16]>::try_from(value)
                .map(Self::Value::from)
                .map_err(de::Error::custom)
        }
    }

    #[cfg(test)]
    mod tests {
        use super::Uuid;
        use serde_test::{assert_tokens, Configure, Token};

        /// Serializes and deserializes prepared cases correctly
        #[test]
        fn serializes_and_deserializes_prepared_cases_correctly() {
            let cases = [
                ("00000000-0000-0000-0000-000000000000", &[0u8; 16]),
                (
                    "1e74ba22-0616-6934-8000-010203040506",
                    &[
                        30, 116, 186, 34, 6, 22, 105, 52, 128, 0, 1, 2, 3, 4, 5, 6,
                    ],
                ),
                (
                    "1eb22fe4-3f0c-62b4-bfff-ffffffffffff",
                    &[
                        30, 178, 47, 228, 63, 12, 98, 180, 191, 255, 255, 255, 255, 255, 255, 255,
                    ],
                ),
            ];

            for (text, bytes) in cases {
                let e = text.parse::<Uuid>().unwrap();
                assert_tokens(&e.readable(), &[Token::String(text)]);
                assert_tokens(&e.compact(), &[Token::Bytes(bytes)]);
            }
        }
    }
}
