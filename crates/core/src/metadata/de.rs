//! Lenient field deserializers shared by the sidecar and output formats.
//!
//! Hand-written metadata routinely stores a single value where a list is
//! expected (and the other way round), and numbers where text is expected.

use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl Scalar {
    fn into_string(self) -> String {
        match self {
            Scalar::Str(s) => s,
            Scalar::Int(i) => i.to_string(),
            Scalar::Float(f) => f.to_string(),
            Scalar::Bool(b) => b.to_string(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    Many(Vec<Option<Scalar>>),
    One(Scalar),
}

impl OneOrMany {
    fn into_strings(self) -> Vec<String> {
        let raw = match self {
            OneOrMany::Many(items) => items.into_iter().flatten().map(Scalar::into_string).collect(),
            OneOrMany::One(item) => vec![item.into_string()],
        };
        raw.into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

/// A list that may also be written as a single scalar.
pub(crate) fn string_or_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<OneOrMany>::deserialize(deserializer)?
        .map(OneOrMany::into_strings)
        .unwrap_or_default())
}

/// A scalar that may also be written as a list; lists keep their first item.
pub(crate) fn string_or_first<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<OneOrMany>::deserialize(deserializer)?
        .and_then(|v| v.into_strings().into_iter().next()))
}
