use log::debug;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::error::Category;
use serde_json::{Map, Value};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::spotdata::{Result, SpotDataError};

/// Parsed JSON configuration; no schema is imposed
pub type ConfigurationMapping = Map<String, Value>;

fn open_config(file_path: &Path) -> Result<BufReader<File>> {
    File::open(file_path)
        .map(BufReader::new)
        .map_err(|source| SpotDataError::ConfigRead {
            path: file_path.to_path_buf(),
            source,
        })
}

fn parse_error(file_path: &Path, source: serde_json::Error) -> SpotDataError {
    // serde_json reports read failures part way through as I/O errors
    match source.classify() {
        Category::Io => SpotDataError::ConfigRead {
            path: file_path.to_path_buf(),
            source: source.into(),
        },
        _ => SpotDataError::ConfigParse {
            path: file_path.to_path_buf(),
            source,
        },
    }
}

/// Read a JSON file containing configuration information.
///
/// The top level of the document must be an object. The file is closed
/// before returning, whether or not parsing succeeded.
pub fn read_config(file_path: impl AsRef<Path>) -> Result<ConfigurationMapping> {
    read_config_as(file_path)
}

/// Read a JSON configuration file into a caller defined schema
pub fn read_config_as<T: DeserializeOwned>(file_path: impl AsRef<Path>) -> Result<T> {
    let file_path = file_path.as_ref();
    debug!("Reading configuration from {}", file_path.display());

    let reader = open_config(file_path)?;
    serde_json::from_reader(reader).map_err(|e| parse_error(file_path, e))
}

/// Run configuration for the command line front end
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpotInputConfig {
    /// Spot data extraction method
    pub method: String,
    /// Root directory holding diagnostic files
    pub diagnostic_data_path: PathBuf,
    /// Optional validity time to narrow loaded diagnostics to
    #[serde(default)]
    pub time: Option<String>,
}
