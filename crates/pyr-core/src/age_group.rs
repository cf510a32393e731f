//! Canonical age-group enumeration
//!
//! Every table in pyr exposes exactly the 21 buckets of [`AgeGroup::ALL`]
//! per (Sex, Year). Ordering is always by [`AgeGroup::index`], never by the
//! lexical order of the labels (`"100 & over"` sorts last, `"5-9"` sorts
//! before `"10-14"`).

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;

/// One of the 21 canonical five-year age buckets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AgeGroup {
    Age0To4,
    Age5To9,
    Age10To14,
    Age15To19,
    Age20To24,
    Age25To29,
    Age30To34,
    Age35To39,
    Age40To44,
    Age45To49,
    Age50To54,
    Age55To59,
    Age60To64,
    Age65To69,
    Age70To74,
    Age75To79,
    Age80To84,
    Age85To89,
    Age90To94,
    Age95To99,
    Age100AndOver,
}

/// Number of canonical buckets
pub const AGE_GROUP_COUNT: usize = 21;

impl AgeGroup {
    /// All buckets in display order
    pub const ALL: [AgeGroup; AGE_GROUP_COUNT] = [
        AgeGroup::Age0To4,
        AgeGroup::Age5To9,
        AgeGroup::Age10To14,
        AgeGroup::Age15To19,
        AgeGroup::Age20To24,
        AgeGroup::Age25To29,
        AgeGroup::Age30To34,
        AgeGroup::Age35To39,
        AgeGroup::Age40To44,
        AgeGroup::Age45To49,
        AgeGroup::Age50To54,
        AgeGroup::Age55To59,
        AgeGroup::Age60To64,
        AgeGroup::Age65To69,
        AgeGroup::Age70To74,
        AgeGroup::Age75To79,
        AgeGroup::Age80To84,
        AgeGroup::Age85To89,
        AgeGroup::Age90To94,
        AgeGroup::Age95To99,
        AgeGroup::Age100AndOver,
    ];

    /// Position of this bucket in [`AgeGroup::ALL`]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Bucket at `index`, if in range
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Lower bound of the bucket in years
    pub fn lower_bound(self) -> u32 {
        self.index() as u32 * 5
    }

    /// Canonical label, e.g. `"0-4"` or `"100 & over"`
    pub fn label(self) -> &'static str {
        const LABELS: [&str; AGE_GROUP_COUNT] = [
            "0-4",
            "5-9",
            "10-14",
            "15-19",
            "20-24",
            "25-29",
            "30-34",
            "35-39",
            "40-44",
            "45-49",
            "50-54",
            "55-59",
            "60-64",
            "65-69",
            "70-74",
            "75-79",
            "80-84",
            "85-89",
            "90-94",
            "95-99",
            "100 & over",
        ];
        LABELS[self.index()]
    }

    /// Parse a label that must already denote a canonical bucket.
    ///
    /// The constituent `100-104` / `105 & over` buckets are rejected here;
    /// use [`RawAgeLabel::parse`] for raw exports that still carry them.
    pub fn parse(raw: &str) -> CoreResult<Self> {
        match RawAgeLabel::parse(raw)? {
            RawAgeLabel::Canonical(group) => Ok(group),
            RawAgeLabel::Over100Part(_) => Err(CoreError::UnknownAgeGroup {
                value: raw.to_string(),
            }),
        }
    }
}

impl PartialOrd for AgeGroup {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for AgeGroup {
    fn cmp(&self, other: &Self) -> Ordering {
        self.index().cmp(&other.index())
    }
}

impl fmt::Display for AgeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for AgeGroup {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for AgeGroup {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        AgeGroup::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// The two raw buckets that collapse into [`AgeGroup::Age100AndOver`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Over100Part {
    /// `100-104`
    From100To104,
    /// `105 & over`
    From105,
}

impl Over100Part {
    /// Canonical label of the raw bucket
    pub fn label(self) -> &'static str {
        match self {
            Over100Part::From100To104 => "100-104",
            Over100Part::From105 => "105 & over",
        }
    }
}

/// An age label as found in raw exports, before the oldest buckets merge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RawAgeLabel {
    Canonical(AgeGroup),
    Over100Part(Over100Part),
}

impl RawAgeLabel {
    /// Canonicalize a raw label.
    ///
    /// Whitespace is stripped, dash variants are unified and `and`/`+`
    /// spellings of the open-ended buckets are accepted, so `"0 - 4"`,
    /// `"100 - 104"` and `"105 and over"` all parse. Anything outside the
    /// mapping is an error rather than a silent drop.
    pub fn parse(raw: &str) -> CoreResult<Self> {
        let key: String = raw
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| match c {
                '\u{2013}' | '\u{2014}' | '\u{2212}' => '-',
                other => other.to_ascii_lowercase(),
            })
            .collect();

        let unknown = || CoreError::UnknownAgeGroup {
            value: raw.to_string(),
        };

        if let Some(lower) = open_ended_lower_bound(&key) {
            return match lower {
                100 => Ok(RawAgeLabel::Canonical(AgeGroup::Age100AndOver)),
                105 => Ok(RawAgeLabel::Over100Part(Over100Part::From105)),
                _ => Err(unknown()),
            };
        }

        let (lo, hi) = key.split_once('-').ok_or_else(unknown)?;
        let lo: u32 = lo.parse().map_err(|_| unknown())?;
        let hi: u32 = hi.parse().map_err(|_| unknown())?;
        if lo % 5 != 0 || hi != lo + 4 {
            return Err(unknown());
        }
        if lo == 100 {
            return Ok(RawAgeLabel::Over100Part(Over100Part::From100To104));
        }
        AgeGroup::from_index((lo / 5) as usize)
            .filter(|g| *g != AgeGroup::Age100AndOver)
            .map(RawAgeLabel::Canonical)
            .ok_or_else(unknown)
    }
}

/// Lower bound of an open-ended label (`100&over`, `105andover`, `100+`, `100plus`)
fn open_ended_lower_bound(key: &str) -> Option<u32> {
    let digits = ["&over", "andover", "+", "plus"]
        .iter()
        .find_map(|suffix| key.strip_suffix(suffix))?;
    digits.parse().ok()
}

#[cfg(test)]
#[path = "age_group_test.rs"]
mod tests;
