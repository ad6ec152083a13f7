pub mod accounts;
pub mod metadata;
pub mod nfts;
pub mod transactions;

use serde::Deserializer;
use serde::de::{self, Visitor};
use std::fmt;

/// Deserializes a u64 that the API may render as a JSON string.
pub(crate) fn u64_from_string<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    struct NumericString;

    impl Visitor<'_> for NumericString {
        type Value = u64;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("an unsigned integer or a numeric string")
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> Result<u64, E> {
            Ok(value)
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<u64, E> {
            value.parse().map_err(de::Error::custom)
        }
    }

    deserializer.deserialize_any(NumericString)
}
