//! Cache Key Module
//!
//! Builds composite cache keys from heterogeneous parts.

use std::fmt;

/// Separator placed between key parts.
pub const KEY_SEPARATOR: char = ':';

// == Key Part ==
/// One component of a composite key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPart<'a> {
    Text(&'a str),
    Int(i64),
    UInt(u64),
    Bool(bool),
}

impl fmt::Display for KeyPart<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyPart::Text(text) => f.write_str(text),
            KeyPart::Int(n) => write!(f, "{}", n),
            KeyPart::UInt(n) => write!(f, "{}", n),
            KeyPart::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl<'a> From<&'a str> for KeyPart<'a> {
    fn from(text: &'a str) -> Self {
        KeyPart::Text(text)
    }
}

impl<'a> From<&'a String> for KeyPart<'a> {
    fn from(text: &'a String) -> Self {
        KeyPart::Text(text.as_str())
    }
}

impl From<bool> for KeyPart<'_> {
    fn from(b: bool) -> Self {
        KeyPart::Bool(b)
    }
}

macro_rules! key_part_from_signed {
    ($($ty:ty),*) => {
        $(impl From<$ty> for KeyPart<'_> {
            fn from(n: $ty) -> Self {
                KeyPart::Int(i64::from(n))
            }
        })*
    };
}

macro_rules! key_part_from_unsigned {
    ($($ty:ty),*) => {
        $(impl From<$ty> for KeyPart<'_> {
            fn from(n: $ty) -> Self {
                KeyPart::UInt(u64::from(n))
            }
        })*
    };
}

key_part_from_signed!(i8, i16, i32, i64);
key_part_from_unsigned!(u8, u16, u32, u64);

impl From<usize> for KeyPart<'_> {
    fn from(n: usize) -> Self {
        KeyPart::UInt(n as u64)
    }
}

// == Create Key ==
/// Joins parts into a single key using [`KEY_SEPARATOR`].
///
/// The output depends only on the parts, so the same parts always yield the
/// same key across calls and runs.
///
/// ```
/// use herd_cache::cache::{create_key, KeyPart};
///
/// let key = create_key([KeyPart::from("user"), KeyPart::from(123), KeyPart::from("profile")]);
/// assert_eq!(key, "user:123:profile");
/// ```
pub fn create_key<'a, I>(parts: I) -> String
where
    I: IntoIterator<Item = KeyPart<'a>>,
{
    let mut key = String::new();
    for (i, part) in parts.into_iter().enumerate() {
        if i > 0 {
            key.push(KEY_SEPARATOR);
        }
        key.push_str(&part.to_string());
    }
    key
}

/// Builds a composite key from mixed text, integer, and boolean parts.
///
/// ```
/// use herd_cache::cache_key;
///
/// assert_eq!(cache_key!("animal", 42_u32, "pedigree", true), "animal:42:pedigree:true");
/// ```
#[macro_export]
macro_rules! cache_key {
    ($($part:expr),+ $(,)?) => {
        $crate::cache::create_key([$($crate::cache::KeyPart::from($part)),+])
    };
}
