use std::fs::File;
use std::io::Read;
use std::path::Path;
use thiserror::Error;

use crate::cube::Cube;

#[cfg(feature = "netcdf")]
mod netcdf_reader;

/// Errors raised by the underlying load primitive
#[derive(Error, Debug)]
pub enum DataReaderError {
    #[error("NetCDF error: {0}")]
    Netcdf(String),

    #[error("Variable not found: {0}")]
    MissingVariable(String),

    #[error("Data conversion error: {0}")]
    ConversionError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid file format: {0}")]
    InvalidFormat(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Constraint mismatch: {0}")]
    ConstraintMismatch(String),

    #[error("Invalid load input: {0}")]
    InvalidInput(String),

    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),
}

/// Source of decoded cubes for a single file.
///
/// This is the seam between the spot data pipeline and whatever library
/// actually understands the file format.
pub trait CubeSource {
    /// Load every field stored in the file at `path`
    fn load_cubes(&self, path: &Path) -> Result<Vec<Cube>, DataReaderError>;
}

impl<S: CubeSource + ?Sized> CubeSource for &S {
    fn load_cubes(&self, path: &Path) -> Result<Vec<Cube>, DataReaderError> {
        (**self).load_cubes(path)
    }
}

impl<S: CubeSource + ?Sized> CubeSource for Box<S> {
    fn load_cubes(&self, path: &Path) -> Result<Vec<Cube>, DataReaderError> {
        self.as_ref().load_cubes(path)
    }
}

/// NetCDF backed cube source
#[derive(Debug, Clone, Copy, Default)]
pub struct NetCdfSource;

impl NetCdfSource {
    pub fn new() -> Self {
        Self
    }
}

impl CubeSource for NetCdfSource {
    fn load_cubes(&self, path: &Path) -> Result<Vec<Cube>, DataReaderError> {
        if !is_netcdf_format(path)? {
            return Err(DataReaderError::InvalidFormat(format!(
                "Not a NetCDF file: {}",
                path.display()
            )));
        }
        read_netcdf_cubes(path)
    }
}

#[cfg(feature = "netcdf")]
fn read_netcdf_cubes(path: &Path) -> Result<Vec<Cube>, DataReaderError> {
    netcdf_reader::read_cubes(path)
}

#[cfg(not(feature = "netcdf"))]
fn read_netcdf_cubes(_path: &Path) -> Result<Vec<Cube>, DataReaderError> {
    Err(DataReaderError::UnsupportedOperation(
        "NetCDF support not compiled in. Enable the 'netcdf' feature.".to_string(),
    ))
}

/// Check if a file is in NetCDF format by examining magic bytes
///
/// NetCDF files start with specific magic bytes:
/// - Classic NetCDF: "CDF\001" or "CDF\002" (64-bit offset), "CDF\005" (CDF-5)
/// - NetCDF-4 (HDF5): "\211HDF\r\n\032\n"
pub fn is_netcdf_format(path: &Path) -> Result<bool, DataReaderError> {
    if !path.exists() {
        return Err(DataReaderError::FileNotFound(path.to_string_lossy().to_string()));
    }

    if path.is_dir() {
        return Ok(false);
    }

    let mut file = File::open(path)?;
    let mut buffer = [0u8; 8];

    match file.read_exact(&mut buffer) {
        Ok(_) => {
            if buffer[0..3] == [b'C', b'D', b'F'] && matches!(buffer[3], 1 | 2 | 5) {
                return Ok(true);
            }

            if buffer == [0x89, b'H', b'D', b'F', b'\r', b'\n', 0x1a, b'\n'] {
                return Ok(true);
            }

            Ok(false)
        }
        // Too short to carry a signature
        Err(_) => Ok(false),
    }
}
