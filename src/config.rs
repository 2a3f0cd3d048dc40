use crate::error::ConfigError;
use crate::output::OutputFormat;
use crate::shuffle::{GroupingChance, GroupingPreset};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_ITEM_COUNT: usize = 52;
pub const DEFAULT_SAMPLE_ITERATIONS: u64 = 10_000;
pub const DEFAULT_ROUNDS: u32 = 9;

/// Everything a run needs. Every field may be omitted from the TOML file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    pub item_count: usize,
    pub sample_iterations: u64,
    pub rounds: u32,
    /// Named table, used when `grouping_chance` is not given.
    pub grouping_preset: String,
    pub grouping_chance: Option<Vec<usize>>,
    /// Seeds the deterministic source; absent means OS entropy.
    pub seed: Option<u64>,
    /// Destination file; absent means stdout.
    pub output: Option<PathBuf>,
    pub format: OutputFormat,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            item_count: DEFAULT_ITEM_COUNT,
            sample_iterations: DEFAULT_SAMPLE_ITERATIONS,
            rounds: DEFAULT_ROUNDS,
            grouping_preset: GroupingPreset::default().name().to_string(),
            grouping_chance: None,
            seed: None,
            output: None,
            format: OutputFormat::default(),
        }
    }
}

impl SimulationConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Resolves the grouping table: an explicit table wins over the preset.
    pub fn grouping(&self) -> Result<GroupingChance, ConfigError> {
        match &self.grouping_chance {
            Some(sizes) => GroupingChance::new(sizes.clone()),
            None => Ok(self.grouping_preset.parse::<GroupingPreset>()?.table()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.item_count == 0 {
            return Err(ConfigError::ZeroItemCount);
        }
        if self.sample_iterations == 0 {
            return Err(ConfigError::ZeroIterations);
        }
        self.grouping()?;
        Ok(())
    }
}
