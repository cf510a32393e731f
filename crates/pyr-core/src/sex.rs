//! Canonical sex labels

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Canonical sex category.
///
/// Variant order follows the canonical labels (`female < male < persons`)
/// and is the first key of the canonical table sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Sex {
    Female,
    Male,
    Persons,
}

impl Sex {
    /// All categories in sort order
    pub const ALL: [Sex; 3] = [Sex::Female, Sex::Male, Sex::Persons];

    /// Canonical lowercase singular label
    pub fn label(self) -> &'static str {
        match self {
            Sex::Female => "female",
            Sex::Male => "male",
            Sex::Persons => "persons",
        }
    }

    /// Map raw casing/pluralisation variants onto the canonical set
    pub fn parse(raw: &str) -> CoreResult<Self> {
        match raw.trim().to_lowercase().as_str() {
            "male" | "males" => Ok(Sex::Male),
            "female" | "females" => Ok(Sex::Female),
            "persons" | "person" | "all persons" => Ok(Sex::Persons),
            _ => Err(CoreError::UnknownSex {
                value: raw.to_string(),
            }),
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Sex {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for Sex {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Sex::parse(&s).map_err(serde::de::Error::custom)
    }
}
