use chrono::{DateTime, Utc};
use ndarray::{ArrayD, Axis};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::time_utils::{self, TimeError};

/// A single loaded gridded field
#[derive(Debug, Clone, PartialEq)]
pub struct Cube {
    /// Field name (standard_name, falling back to long_name or the variable name)
    pub name: String,
    /// Units attribute if available
    pub units: Option<String>,
    /// File the field was read from
    pub source: PathBuf,
    /// Time coordinate points; the leading data axis when non-empty
    pub times: Vec<DateTime<Utc>>,
    /// Field values
    pub data: ArrayD<f32>,
}

impl Cube {
    pub fn new(name: impl Into<String>, source: impl Into<PathBuf>, data: ArrayD<f32>) -> Self {
        Self {
            name: name.into(),
            units: None,
            source: source.into(),
            times: Vec::new(),
            data,
        }
    }

    pub fn with_units(mut self, units: impl Into<String>) -> Self {
        self.units = Some(units.into());
        self
    }

    pub fn with_times(mut self, times: Vec<DateTime<Utc>>) -> Self {
        self.times = times;
        self
    }

    /// Slice the cube down to the single time point matching `filter`.
    ///
    /// Returns `None` when the cube has no time point equal to the filter
    /// value. A single time point with no matching data axis is scalar time,
    /// and the data is kept whole. Several time points whose count does not
    /// match the leading data axis cannot be sliced and also give `None`.
    pub fn extract_time(&self, filter: &TimeFilter) -> Option<Cube> {
        let index = self.times.iter().position(|t| *t == filter.time)?;

        let data = if self.data.ndim() > 0 && self.data.len_of(Axis(0)) == self.times.len() {
            self.data.select(Axis(0), &[index])
        } else if self.times.len() == 1 {
            self.data.clone()
        } else {
            return None;
        };

        Some(Cube {
            name: self.name.clone(),
            units: self.units.clone(),
            source: self.source.clone(),
            times: vec![self.times[index]],
            data,
        })
    }
}

impl fmt::Display for Cube {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} / ({}) {:?}",
            self.name,
            self.units.as_deref().unwrap_or("unknown"),
            self.data.shape()
        )
    }
}

/// Ordered collection of loaded cubes
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CubeList(Vec<Cube>);

impl CubeList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, cube: Cube) {
        self.0.push(cube);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Cube> {
        self.0.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Cube> {
        self.0.get(index)
    }

    pub fn names(&self) -> Vec<&str> {
        self.0.iter().map(|cube| cube.name.as_str()).collect()
    }

    /// Keep only the cubes that have the filter's time, each sliced to it
    pub fn extract(&self, filter: &TimeFilter) -> CubeList {
        self.0.iter().filter_map(|cube| cube.extract_time(filter)).collect()
    }

    pub fn into_vec(self) -> Vec<Cube> {
        self.0
    }
}

impl From<Vec<Cube>> for CubeList {
    fn from(cubes: Vec<Cube>) -> Self {
        Self(cubes)
    }
}

impl FromIterator<Cube> for CubeList {
    fn from_iter<I: IntoIterator<Item = Cube>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Extend<Cube> for CubeList {
    fn extend<I: IntoIterator<Item = Cube>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl IntoIterator for CubeList {
    type Item = Cube;
    type IntoIter = std::vec::IntoIter<Cube>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a CubeList {
    type Item = &'a Cube;
    type IntoIter = std::slice::Iter<'a, Cube>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Constraint selecting a single validity time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeFilter {
    pub time: DateTime<Utc>,
}

impl TimeFilter {
    pub fn new(time: DateTime<Utc>) -> Self {
        Self { time }
    }
}

impl FromStr for TimeFilter {
    type Err = TimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        time_utils::parse_datetime(s).map(Self::new)
    }
}

impl fmt::Display for TimeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "time == {}", time_utils::format_datetime(&self.time))
    }
}
