#![allow(dead_code)]

use chrono::{NaiveDate, TimeZone, Utc};
use ndarray::{ArrayD, IxDyn};
use spot_input::cube::Cube;
use spot_input::io::{CubeSource, DataReaderError};
use std::fs;
use std::path::{Path, PathBuf};

/// Builds one cube per file from names shaped `<prefix>_<diagnostic>_<YYYYMMDD>.nc`.
///
/// The cube is named after the diagnostic and valid at midnight of the date.
pub struct FileNameSource;

impl CubeSource for FileNameSource {
    fn load_cubes(&self, path: &Path) -> Result<Vec<Cube>, DataReaderError> {
        if !path.is_file() {
            return Err(DataReaderError::FileNotFound(path.display().to_string()));
        }

        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .ok_or_else(|| DataReaderError::InvalidFormat(path.display().to_string()))?;

        let (rest, date) = stem
            .rsplit_once('_')
            .ok_or_else(|| DataReaderError::InvalidFormat(stem.clone()))?;
        let name = rest.split_once('_').map(|(_, name)| name).unwrap_or(rest);
        let date = NaiveDate::parse_from_str(date, "%Y%m%d")
            .map_err(|e| DataReaderError::ConversionError(e.to_string()))?;
        let time = Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0).unwrap());

        let cube = Cube::new(name, path, ArrayD::zeros(IxDyn(&[1, 2, 2])))
            .with_times(vec![time]);
        Ok(vec![cube])
    }
}

/// Reads every file as two fields whose names share nothing with the file name
pub struct RenamedSource;

impl CubeSource for RenamedSource {
    fn load_cubes(&self, path: &Path) -> Result<Vec<Cube>, DataReaderError> {
        Ok(["air_pressure", "air_pressure_at_sea_level"]
            .into_iter()
            .map(|name| Cube::new(name, path, ArrayD::zeros(IxDyn(&[2, 2]))))
            .collect())
    }
}

pub fn touch(dir: &Path, relative: &str) -> PathBuf {
    let path = dir.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, b"").unwrap();
    path
}

/// Diagnostic tree holding everything the model level lapse rate method needs
pub fn lapse_rate_tree(dir: &Path) {
    touch(dir, "foo_temperature_on_height_levels_20200101.nc");
    touch(dir, "foo_pressure_on_height_levels_20200101.nc");
    touch(dir, "foo_surface_pressure_20200101.nc");
    touch(dir, "foo_wind_speed_20200101.nc");
    touch(dir, "README.txt");
}
