//! Output representations of a UUID and timestamp extraction from any of them

use std::{fmt, str};

use chrono::{DateTime, Utc};

use crate::{Error, ParseError, Uuid};

/// Selects the representation returned by [`generate`](crate::generate) and
/// [`V6Generator::encode`](crate::V6Generator::encode).
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum Format {
    /// A 128-bit unsigned integer.
    Int,

    /// 32 lowercase hexadecimal digits.
    Hex,

    /// The 8-4-4-4-12 lowercase hexadecimal string.
    #[default]
    Str,

    /// A [`Uuid`] value.
    Structured,
}

impl str::FromStr for Format {
    type Err = Error;

    /// Recognizes `int`, `hex`, `str`, and `uuid` (or `structured`).
    fn from_str(src: &str) -> Result<Self, Self::Err> {
        match src {
            "int" => Ok(Self::Int),
            "hex" => Ok(Self::Hex),
            "str" => Ok(Self::Str),
            "uuid" | "structured" => Ok(Self::Structured),
            _ => Err(Error::InvalidArgument(format!("unknown format {src:?}"))),
        }
    }
}

/// A UUID in one of the four supported representations.
///
/// All representations of the same UUID denote identical 128 bits; [`Identifier::to_uuid`]
/// converts any of them back into a [`Uuid`].
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum Identifier {
    /// A 128-bit unsigned integer.
    Int(u128),

    /// Hexadecimal digits without hyphens.
    Hex(String),

    /// The 8-4-4-4-12 hexadecimal string.
    Str(String),

    /// A [`Uuid`] value.
    Structured(Uuid),
}

impl Identifier {
    /// Renders a UUID in the given format.
    pub fn render(uuid: Uuid, format: Format) -> Self {
        match format {
            Format::Int => Self::Int(uuid.into()),
            Format::Hex => Self::Hex(uuid.encode_hex().to_string()),
            Format::Str => Self::Str(uuid.to_string()),
            Format::Structured => Self::Structured(uuid),
        }
    }

    /// Returns the format of this representation.
    pub const fn format(&self) -> Format {
        match self {
            Self::Int(_) => Format::Int,
            Self::Hex(_) => Format::Hex,
            Self::Str(_) => Format::Str,
            Self::Structured(_) => Format::Structured,
        }
    }

    /// Converts the representation into a [`Uuid`].
    ///
    /// Strings are read by removing all hyphens and parsing the remaining up to 32 digits as a
    /// case-insensitive hexadecimal number.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] if a string representation is not a hexadecimal number of at most
    /// 128 bits.
    pub fn to_uuid(&self) -> Result<Uuid, Error> {
        match self {
            Self::Int(value) => Ok(Uuid::from(*value)),
            Self::Hex(text) | Self::Str(text) => parse_hex(text).map(Uuid::from),
            Self::Structured(uuid) => Ok(*uuid),
        }
    }
}

fn parse_hex(text: &str) -> Result<u128, Error> {
    let digits = text.replace('-', "");
    if digits.is_empty() || digits.len() > 32 || !digits.bytes().all(|c| c.is_ascii_hexdigit())
    {
        return Err(ParseError {}.into());
    }
    u128::from_str_radix(&digits, 16).map_err(|_| ParseError {}.into())
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(value) => write!(f, "{value}"),
            Self::Hex(text) | Self::Str(text) => f.write_str(text),
            Self::Structured(uuid) => write!(f, "{uuid}"),
        }
    }
}

impl From<u128> for Identifier {
    fn from(src: u128) -> Self {
        Self::Int(src)
    }
}

impl From<Uuid> for Identifier {
    fn from(src: Uuid) -> Self {
        Self::Structured(src)
    }
}

impl From<String> for Identifier {
    fn from(src: String) -> Self {
        if src.contains('-') {
            Self::Str(src)
        } else {
            Self::Hex(src)
        }
    }
}

impl From<&str> for Identifier {
    fn from(src: &str) -> Self {
        src.to_owned().into()
    }
}

/// Recovers the instant embedded in a UUIDv6 given in any representation.
///
/// If the version field is not 6, returns `Ok(None)` when `suppress_version_error` is `true` and
/// [`Error::VersionMismatch`] otherwise.
///
/// # Examples
///
/// ```rust
/// use uuid6::extract_timestamp;
///
/// let dt = extract_timestamp("1eb22fe4-3f0c-62b4-8000-000000000000", false)?;
/// assert_eq!(dt.unwrap().to_rfc3339(), "2020-11-10T02:41:42.182162+00:00");
///
/// let v4 = "2ca4b2ce-6c13-40d4-bccf-37d222820f6f";
/// assert_eq!(extract_timestamp(v4, true)?, None);
/// assert!(extract_timestamp(v4, false).is_err());
/// # Ok::<(), uuid6::Error>(())
/// ```
pub fn extract_timestamp(
    value: impl Into<Identifier>,
    suppress_version_error: bool,
) -> Result<Option<DateTime<Utc>>, Error> {
    let uuid = value.into().to_uuid()?;
    match uuid.timestamp() {
        Some(timestamp) => Ok(Some(timestamp.to_datetime())),
        None if suppress_version_error => Ok(None),
        None => Err(Error::VersionMismatch {
            version: uuid.as_bytes()[6] >> 4,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::{extract_timestamp, Format, Identifier};
    use crate::{Error, Uuid};
    use chrono::{DateTime, Utc};

    const V6: u128 = 0x1eb22fe43f0c62b48000010203040506;

    fn expected() -> DateTime<Utc> {
        "2020-11-10T02:41:42.182162Z".parse().unwrap()
    }

    /// Renders the same bits in every format
    #[test]
    fn renders_the_same_bits_in_every_format() {
        let uuid = Uuid::from(V6);
        let cases = [
            (Format::Int, Identifier::Int(V6)),
            (
                Format::Hex,
                Identifier::Hex("1eb22fe43f0c62b48000010203040506".to_owned()),
            ),
            (
                Format::Str,
                Identifier::Str("1eb22fe4-3f0c-62b4-8000-010203040506".to_owned()),
            ),
            (Format::Structured, Identifier::Structured(uuid)),
        ];
        for (format, expected) in cases {
            let e = Identifier::render(uuid, format);
            assert_eq!(e, expected);
            assert_eq!(e.format(), format);
            assert_eq!(e.to_uuid(), Ok(uuid));
        }
    }

    /// Parses format names
    #[test]
    fn parses_format_names() {
        assert_eq!("int".parse(), Ok(Format::Int));
        assert_eq!("hex".parse(), Ok(Format::Hex));
        assert_eq!("str".parse(), Ok(Format::Str));
        assert_eq!("uuid".parse(), Ok(Format::Structured));
        assert_eq!("structured".parse(), Ok(Format::Structured));
        assert!(matches!(
            "HEX".parse::<Format>(),
            Err(Error::InvalidArgument(_))
        ));
    }

    /// Extracts timestamp from every representation
    #[test]
    fn extracts_timestamp_from_every_representation() {
        let cases: [Identifier; 6] = [
            V6.into(),
            Uuid::from(V6).into(),
            "1eb22fe4-3f0c-62b4-8000-010203040506".into(),
            "1EB22FE43F0C62B48000010203040506".into(),
            String::from("1eb22fe4-3f0c62b4-8000010203040506").into(),
            Identifier::Hex("1eb22fe43f0c62b48000010203040506".to_owned()),
        ];
        for e in cases {
            assert_eq!(extract_timestamp(e.clone(), false), Ok(Some(expected())), "{e}");
        }
    }

    /// Truncates recovered timestamp to 100 nanoseconds
    #[test]
    fn truncates_recovered_timestamp_to_100_nanoseconds() {
        let dt = extract_timestamp("1eb22fe4-3f0c-62b1-a88c-8dc55231702f", true)
            .unwrap()
            .unwrap();
        assert_eq!(dt.timestamp(), 1_604_976_102);
        assert_eq!(dt.timestamp_subsec_nanos(), 182_161_700);
    }

    /// Rejects non-v6 UUIDs unless suppressed
    #[test]
    fn rejects_non_v6_uuids_unless_suppressed() {
        let cases = [
            ("2ca4b2ce-6c13-40d4-bccf-37d222820f6f", 4),
            ("01809424-3e59-7c05-9219-566f82fff672", 7),
            ("00000000-0000-0000-0000-000000000000", 0),
            ("ffffffff-ffff-ffff-ffff-ffffffffffff", 15),
            ("1eb22fe4-3f0c-52b4-8000-010203040506", 5),
        ];
        for (text, version) in cases {
            assert_eq!(extract_timestamp(text, true), Ok(None));
            assert_eq!(
                extract_timestamp(text, false),
                Err(Error::VersionMismatch { version })
            );
        }
    }

    /// Returns error to unparseable strings
    #[test]
    fn returns_error_to_unparseable_strings() {
        let cases = [
            "",
            "-",
            "+1eb22fe43f0c62b48000010203040506",
            "1eb22fe4-3f0c-62b4-8000-0102030405067",
            "1eb22fe4 3f0c 62b4 8000 010203040506",
            "1eb22fe4-3f0c-62b4-8000-01020304050g",
        ];
        for e in cases {
            assert!(
                matches!(extract_timestamp(e, true), Err(Error::Parse(_))),
                "{e:?}"
            );
        }
    }
}
