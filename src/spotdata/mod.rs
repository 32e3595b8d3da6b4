//! Reading the inputs of the site specific (spot data) process chain.
//!
//! Extraction methods declare the auxiliary diagnostics they need, which are
//! found by file name under a diagnostic data directory and loaded into
//! [`CubeList`](crate::cube::CubeList)s.

pub mod diagnostics;
pub mod dictionary;
pub mod load;
pub mod prerequisites;

pub use diagnostics::{get_additional_diagnostics, DiagnosticFinder};
pub use dictionary::{data_from_dictionary, Ancillaries, DataDictionary};
pub use load::{Load, LoadInput, LoadMethod, Loaded};
pub use prerequisites::{
    get_method_prerequisites, get_method_prerequisites_at, required_diagnostics, ExtractionMethod, PrerequisiteMap,
    PrerequisiteResolver, Prerequisites, Resolved,
};

use std::path::PathBuf;
use thiserror::Error;

use crate::cube::TimeFilter;
use crate::io::DataReaderError;

#[derive(Error, Debug)]
pub enum SpotDataError {
    #[error("Unknown method \"{method}\" passed to {component}.")]
    UnknownMethod {
        method: String,
        component: &'static str,
    },

    #[error("No relevant data files for {diagnostic} found in {}.", .directory.display())]
    NotFound {
        diagnostic: String,
        directory: PathBuf,
    },

    #[error("No diagnostics match {0}")]
    NoMatch(TimeFilter),

    #[error("Invalid type sent to data_from_dictionary - Not a dictionary (got {0}).")]
    InvalidDictionary(&'static str),

    #[error("Data {0} not found in dictionary.")]
    MissingKey(String),

    #[error("Unable to read configuration file {}: {source}", .path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unable to parse configuration file {}: {source}", .path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Load error: {0}")]
    Load(#[from] DataReaderError),
}

pub type Result<T> = std::result::Result<T, SpotDataError>;
