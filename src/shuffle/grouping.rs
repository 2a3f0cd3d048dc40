use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Candidate chunk sizes drawn (by index) when interleaving the two halves.
///
/// Construction guarantees at least one strictly positive entry, so every
/// pass of the interleave loop has a chance to make progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<usize>", into = "Vec<usize>")]
pub struct GroupingChance {
    sizes: Vec<usize>,
}

impl GroupingChance {
    pub fn new(sizes: Vec<usize>) -> Result<Self, ConfigError> {
        if sizes.is_empty() {
            return Err(ConfigError::EmptyGroupingChance);
        }
        if sizes.iter().all(|&size| size == 0) {
            return Err(ConfigError::NoPositiveChunk(sizes));
        }
        Ok(GroupingChance { sizes })
    }

    pub fn sizes(&self) -> &[usize] {
        &self.sizes
    }

    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    pub fn get(&self, index: usize) -> usize {
        self.sizes[index]
    }

    pub fn zero_entries(&self) -> usize {
        self.sizes.iter().filter(|&&size| size == 0).count()
    }
}

impl Default for GroupingChance {
    fn default() -> Self {
        GroupingPreset::OneFive.table()
    }
}

impl TryFrom<Vec<usize>> for GroupingChance {
    type Error = ConfigError;

    fn try_from(sizes: Vec<usize>) -> Result<Self, Self::Error> {
        GroupingChance::new(sizes)
    }
}

impl From<GroupingChance> for Vec<usize> {
    fn from(chance: GroupingChance) -> Self {
        chance.sizes
    }
}

/// Built-in grouping tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GroupingPreset {
    OneOrTwo,
    Distributed,
    ZeroOne,
    #[default]
    OneFive,
}

impl GroupingPreset {
    pub const ALL: [GroupingPreset; 4] = [
        GroupingPreset::OneOrTwo,
        GroupingPreset::Distributed,
        GroupingPreset::ZeroOne,
        GroupingPreset::OneFive,
    ];

    pub fn name(self) -> &'static str {
        match self {
            GroupingPreset::OneOrTwo => "one-or-two",
            GroupingPreset::Distributed => "distributed",
            GroupingPreset::ZeroOne => "zero-one",
            GroupingPreset::OneFive => "one-five",
        }
    }

    pub fn sizes(self) -> &'static [usize] {
        match self {
            GroupingPreset::OneOrTwo => &[1, 2],
            GroupingPreset::Distributed => &[0, 0, 1, 1, 1, 1, 1, 1, 1, 1, 2, 2, 2, 2, 3, 3, 4],
            GroupingPreset::ZeroOne => &[0, 1],
            GroupingPreset::OneFive => &[1, 5],
        }
    }

    pub fn table(self) -> GroupingChance {
        GroupingChance {
            sizes: self.sizes().to_vec(),
        }
    }
}

impl fmt::Display for GroupingPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for GroupingPreset {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "one-or-two" | "onetwo" => Ok(GroupingPreset::OneOrTwo),
            "distributed" => Ok(GroupingPreset::Distributed),
            "zero-one" | "zeroone" => Ok(GroupingPreset::ZeroOne),
            "one-five" | "onefive" => Ok(GroupingPreset::OneFive),
            other => Err(ConfigError::UnknownPreset(other.to_string())),
        }
    }
}
