use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::error::ConfigError;
use super::hardware_id::RecordId;
use super::run_info::RunInfo;
use super::selector::Selector;

/// Structure representing the application configuration. Contains pathing and selection information
/// Configs are seralizable and deserializable to YAML using serde and serde_yaml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub capture_path: PathBuf,
    pub hdf_path: PathBuf,
    pub channel_map_path: Option<PathBuf>,
    pub selector: String,
    pub first_record: Option<u64>,
    pub last_record: Option<u64>,
}

impl Default for Config {
    /// Generate a new Config object. All paths will be empty/invalid
    fn default() -> Self {
        Self {
            capture_path: PathBuf::from("None"),
            hdf_path: PathBuf::from("None"),
            channel_map_path: None,
            selector: String::from("all"),
            first_record: None,
            last_record: None,
        }
    }
}

impl Config {
    /// Read the configuration in a YAML file
    /// Returns a Config if successful
    pub fn read_config_file(config_path: &Path) -> Result<Self, ConfigError> {
        if !config_path.exists() {
            return Err(ConfigError::BadFilePath(config_path.to_path_buf()));
        }

        let yaml_str = std::fs::read_to_string(config_path)?;

        let config = serde_yaml::from_str::<Self>(&yaml_str)?;
        config.check_record_window()?;
        Ok(config)
    }

    /// Write the configuration to a YAML file
    pub fn write_config_file(&self, config_path: &Path) -> Result<(), ConfigError> {
        let yaml_str = serde_yaml::to_string(self)?;
        std::fs::write(config_path, yaml_str)?;
        Ok(())
    }

    /// The selector as given in the config. Selector parsing cannot fail; bad selectors are caught on resolve.
    pub fn get_selector(&self) -> Selector {
        match self.selector.parse() {
            Ok(selector) => selector,
            Err(e) => match e {},
        }
    }

    /// Check if a record falls inside the configured trigger number window
    pub fn is_record_selected(&self, record: &RecordId) -> bool {
        self.first_record.map_or(true, |first| record.number >= first)
            && self.last_record.map_or(true, |last| record.number <= last)
    }

    fn check_record_window(&self) -> Result<(), ConfigError> {
        match (self.first_record, self.last_record) {
            (Some(first), Some(last)) if first > last => {
                Err(ConfigError::BadRecordWindow(first, last))
            }
            _ => Ok(()),
        }
    }

    /// Get the path to the output hdf5 file
    pub fn get_hdf_file_name(&self, run_info: &RunInfo) -> Result<PathBuf, ConfigError> {
        let hdf_file_path: PathBuf = self.hdf_path.join(format!(
            "run_{:0>6}_{:0>4}_waveforms.h5",
            run_info.run_id, run_info.sub_run_id
        ));
        if self.hdf_path.exists() {
            Ok(hdf_file_path)
        } else {
            Err(ConfigError::BadFilePath(self.hdf_path.clone()))
        }
    }
}
