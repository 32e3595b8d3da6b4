use log::debug;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use super::{Result, SpotDataError};
use crate::cube::{Cube, CubeList};
use crate::io::{CubeSource, DataReaderError, NetCdfSource};

/// Available loading strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadMethod {
    /// Load exactly one cube
    SingleFile,
    /// Load every matching cube into a list
    MultiFile,
}

impl LoadMethod {
    pub const ALL: [LoadMethod; 2] = [LoadMethod::SingleFile, LoadMethod::MultiFile];

    pub fn as_str(&self) -> &'static str {
        match self {
            LoadMethod::SingleFile => "single_file",
            LoadMethod::MultiFile => "multi_file",
        }
    }
}

impl FromStr for LoadMethod {
    type Err = SpotDataError;

    fn from_str(s: &str) -> Result<Self> {
        LoadMethod::ALL
            .into_iter()
            .find(|method| method.as_str() == s)
            .ok_or_else(|| SpotDataError::UnknownMethod {
                method: s.to_string(),
                component: "Load",
            })
    }
}

impl fmt::Display for LoadMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// File path specification handed to [`Load::process`]
#[derive(Debug, Clone, PartialEq)]
pub enum LoadInput {
    Single(PathBuf),
    Multiple(Vec<PathBuf>),
}

impl LoadInput {
    fn paths(&self) -> &[PathBuf] {
        match self {
            LoadInput::Single(path) => std::slice::from_ref(path),
            LoadInput::Multiple(paths) => paths,
        }
    }
}

impl From<PathBuf> for LoadInput {
    fn from(path: PathBuf) -> Self {
        LoadInput::Single(path)
    }
}

impl From<&Path> for LoadInput {
    fn from(path: &Path) -> Self {
        LoadInput::Single(path.to_path_buf())
    }
}

impl From<&str> for LoadInput {
    fn from(path: &str) -> Self {
        LoadInput::Single(PathBuf::from(path))
    }
}

impl From<Vec<PathBuf>> for LoadInput {
    fn from(paths: Vec<PathBuf>) -> Self {
        LoadInput::Multiple(paths)
    }
}

impl From<&[PathBuf]> for LoadInput {
    fn from(paths: &[PathBuf]) -> Self {
        LoadInput::Multiple(paths.to_vec())
    }
}

/// Result of a load: a single cube or a list, depending on the strategy
#[derive(Debug, Clone, PartialEq)]
pub enum Loaded {
    Cube(Cube),
    Cubes(CubeList),
}

impl Loaded {
    pub fn into_cube(self) -> Option<Cube> {
        match self {
            Loaded::Cube(cube) => Some(cube),
            Loaded::Cubes(_) => None,
        }
    }

    /// Flatten into a list; a single cube becomes a one element list
    pub fn into_cubes(self) -> CubeList {
        match self {
            Loaded::Cube(cube) => CubeList::from(vec![cube]),
            Loaded::Cubes(cubes) => cubes,
        }
    }
}

/// Plugin for loading data with a configured strategy
pub struct Load<S = NetCdfSource> {
    method: String,
    source: S,
}

impl Load<NetCdfSource> {
    /// Create a loader reading NetCDF files.
    ///
    /// `method` is one of `single_file` or `multi_file`; it is resolved when
    /// [`Load::process`] is called.
    pub fn new(method: impl Into<String>) -> Self {
        Self::with_source(method, NetCdfSource::new())
    }
}

impl<S: CubeSource> Load<S> {
    pub fn with_source(method: impl Into<String>, source: S) -> Self {
        Self {
            method: method.into(),
            source,
        }
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    /// Load `filepath` with the configured strategy.
    ///
    /// `diagnostic` restricts the load to cubes of that name; `None` or an
    /// empty name loads everything.
    pub fn process(&self, filepath: impl Into<LoadInput>, diagnostic: Option<&str>) -> Result<Loaded> {
        let method: LoadMethod = self.method.parse()?;
        let input = filepath.into();

        match method {
            LoadMethod::SingleFile => self.single_file(&input, diagnostic).map(Loaded::Cube),
            LoadMethod::MultiFile => self.multi_file(&input, diagnostic).map(Loaded::Cubes),
        }
    }

    /// Load and return exactly one cube from a single path
    pub fn single_file(&self, input: &LoadInput, diagnostic: Option<&str>) -> Result<Cube> {
        if let LoadInput::Multiple(paths) = input {
            return Err(DataReaderError::InvalidInput(format!(
                "single_file loads one path, got a list of {}",
                paths.len()
            ))
            .into());
        }

        let mut cubes = self.load_matching(input, diagnostic)?.into_vec();

        match cubes.len() {
            1 => Ok(cubes.remove(0)),
            count => Err(DataReaderError::ConstraintMismatch(format!(
                "expected exactly one cube{}, found {}",
                describe_constraint(diagnostic),
                count
            ))
            .into()),
        }
    }

    /// Load every matching cube from every path
    pub fn multi_file(&self, input: &LoadInput, diagnostic: Option<&str>) -> Result<CubeList> {
        self.load_matching(input, diagnostic)
    }

    fn load_matching(&self, input: &LoadInput, diagnostic: Option<&str>) -> Result<CubeList> {
        let paths = input.paths();
        if paths.is_empty() {
            return Err(DataReaderError::InvalidInput("no files to load".to_string()).into());
        }

        let constraint = diagnostic.filter(|name| !name.is_empty());
        let mut cubes = CubeList::new();
        for path in paths {
            debug!("Loading {}", path.display());
            let loaded = self.source.load_cubes(path)?;
            cubes.extend(
                loaded
                    .into_iter()
                    .filter(|cube| constraint.map_or(true, |name| cube.name == name)),
            );
        }

        Ok(cubes)
    }
}

impl<S> fmt::Display for Load<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Load: method: {}>", self.method)
    }
}

fn describe_constraint(diagnostic: Option<&str>) -> String {
    match diagnostic.filter(|name| !name.is_empty()) {
        Some(name) => format!(" named {}", name),
        None => String::new(),
    }
}
