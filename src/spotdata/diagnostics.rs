use log::{debug, warn};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::load::{Load, LoadMethod};
use super::{Result, SpotDataError};
use crate::cube::{CubeList, TimeFilter};
use crate::io::{CubeSource, DataReaderError, NetCdfSource};

/// Recursively list the files under `diagnostic_data_path` whose file name
/// contains `diagnostic_name`.
///
/// Directories are walked depth first with entries sorted by file name, so
/// the result is in lexicographic path order on every platform. Symbolic
/// links to files are included; linked directories are not descended.
/// Entries that cannot be read are logged and skipped.
pub fn find_diagnostic_files(diagnostic_name: &str, diagnostic_data_path: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for entry in WalkDir::new(diagnostic_data_path)
        .follow_links(false)
        .sort_by_file_name()
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable entry under {}: {}", diagnostic_data_path.display(), e);
                continue;
            }
        };

        let is_file = entry.file_type().is_file() || (entry.path_is_symlink() && entry.path().is_file());
        if is_file && entry.file_name().to_string_lossy().contains(diagnostic_name) {
            files.push(entry.into_path());
        }
    }

    files
}

/// Locates and loads every file belonging to one diagnostic
pub struct DiagnosticFinder<S = NetCdfSource> {
    source: S,
}

impl DiagnosticFinder<NetCdfSource> {
    pub fn new() -> Self {
        Self::with_source(NetCdfSource::new())
    }
}

impl Default for DiagnosticFinder<NetCdfSource> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: CubeSource> DiagnosticFinder<S> {
    pub fn with_source(source: S) -> Self {
        Self { source }
    }

    /// Load the diagnostic named `diagnostic_name` from every matching file
    /// under `diagnostic_data_path`.
    ///
    /// With `time_extract` the loaded cubes are narrowed to that time, and it
    /// is an error for nothing to remain. The returned list is never empty.
    pub fn find(
        &self,
        diagnostic_name: &str,
        diagnostic_data_path: &Path,
        time_extract: Option<&TimeFilter>,
    ) -> Result<CubeList> {
        let files_to_read = find_diagnostic_files(diagnostic_name, diagnostic_data_path);
        if files_to_read.is_empty() {
            return Err(SpotDataError::NotFound {
                diagnostic: diagnostic_name.to_string(),
                directory: diagnostic_data_path.to_path_buf(),
            });
        }

        debug!(
            "Found {} file(s) for {} in {}",
            files_to_read.len(),
            diagnostic_name,
            diagnostic_data_path.display()
        );

        // Files were already selected by name, so no load constraint
        let cubes = Load::with_source(LoadMethod::MultiFile.as_str(), &self.source)
            .process(files_to_read, None)?
            .into_cubes();

        if cubes.is_empty() {
            return Err(DataReaderError::MissingVariable(format!(
                "no data for {} in files under {}",
                diagnostic_name,
                diagnostic_data_path.display()
            ))
            .into());
        }

        match time_extract {
            Some(filter) => {
                let extracted = cubes.extract(filter);
                if extracted.is_empty() {
                    return Err(SpotDataError::NoMatch(*filter));
                }
                Ok(extracted)
            }
            None => Ok(cubes),
        }
    }
}

/// Load additional diagnostics from NetCDF files under `diagnostic_data_path`
pub fn get_additional_diagnostics(
    diagnostic_name: &str,
    diagnostic_data_path: &Path,
    time_extract: Option<&TimeFilter>,
) -> Result<CubeList> {
    DiagnosticFinder::new().find(diagnostic_name, diagnostic_data_path, time_extract)
}
