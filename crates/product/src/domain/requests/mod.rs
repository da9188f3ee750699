pub mod product;

use serde::{Deserialize, Deserializer, de};
use std::{fmt, str::FromStr};

/// Query strings and forms submit untouched inputs as `field=`; treat those
/// (and whitespace-only values) as absent instead of failing to parse.
pub fn empty_string_as_none<'de, D, T>(de: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    let opt = Option::<String>::deserialize(de)?;
    match opt.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => FromStr::from_str(s).map_err(de::Error::custom).map(Some),
    }
}
