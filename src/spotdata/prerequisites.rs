use log::{debug, info};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use super::diagnostics::DiagnosticFinder;
use super::{Result, SpotDataError};
use crate::cube::{CubeList, TimeFilter};
use crate::io::{CubeSource, NetCdfSource};

/// Diagnostics needed to derive a lapse rate from model level data
const MODEL_LEVEL_LAPSE_RATE_DIAGNOSTICS: &[&str] = &[
    "temperature_on_height_levels",
    "pressure_on_height_levels",
    "surface_pressure",
];

/// Spot data extraction methods
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionMethod {
    UseNearest,
    OrographyDerivedTemperatureLapseRate,
    ModelLevelTemperatureLapseRate,
}

impl ExtractionMethod {
    pub const ALL: [ExtractionMethod; 3] = [
        ExtractionMethod::UseNearest,
        ExtractionMethod::OrographyDerivedTemperatureLapseRate,
        ExtractionMethod::ModelLevelTemperatureLapseRate,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractionMethod::UseNearest => "use_nearest",
            ExtractionMethod::OrographyDerivedTemperatureLapseRate => {
                "orography_derived_temperature_lapse_rate"
            }
            ExtractionMethod::ModelLevelTemperatureLapseRate => "model_level_temperature_lapse_rate",
        }
    }

    pub fn prerequisites(&self) -> Prerequisites {
        match self {
            ExtractionMethod::ModelLevelTemperatureLapseRate => {
                Prerequisites::Required(MODEL_LEVEL_LAPSE_RATE_DIAGNOSTICS)
            }
            ExtractionMethod::UseNearest | ExtractionMethod::OrographyDerivedTemperatureLapseRate => {
                Prerequisites::NoPrerequisites
            }
        }
    }
}

impl FromStr for ExtractionMethod {
    type Err = SpotDataError;

    fn from_str(s: &str) -> Result<Self> {
        ExtractionMethod::ALL
            .into_iter()
            .find(|method| method.as_str() == s)
            .ok_or_else(|| SpotDataError::UnknownMethod {
                method: s.to_string(),
                component: "ExtractionMethod",
            })
    }
}

impl fmt::Display for ExtractionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Diagnostics an extraction method needs loaded in advance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prerequisites {
    NoPrerequisites,
    Required(&'static [&'static str]),
}

/// Loaded prerequisite diagnostics keyed by diagnostic name
pub type PrerequisiteMap = BTreeMap<String, CubeList>;

/// Outcome of resolving the prerequisites of a method
#[derive(Debug, Clone, PartialEq)]
pub enum Resolved {
    NoPrerequisites,
    Loaded(PrerequisiteMap),
}

impl Resolved {
    pub fn into_map(self) -> Option<PrerequisiteMap> {
        match self {
            Resolved::NoPrerequisites => None,
            Resolved::Loaded(map) => Some(map),
        }
    }
}

/// Which additional diagnostics `method` requires.
///
/// Methods that are not recognised need nothing extra; that is not an error.
pub fn required_diagnostics(method: &str) -> Prerequisites {
    method
        .parse::<ExtractionMethod>()
        .map(|m| m.prerequisites())
        .unwrap_or(Prerequisites::NoPrerequisites)
}

/// Loads the diagnostics an extraction method depends on
pub struct PrerequisiteResolver<S = NetCdfSource> {
    finder: DiagnosticFinder<S>,
}

impl PrerequisiteResolver<NetCdfSource> {
    pub fn new() -> Self {
        Self::with_source(NetCdfSource::new())
    }
}

impl Default for PrerequisiteResolver<NetCdfSource> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: CubeSource> PrerequisiteResolver<S> {
    pub fn with_source(source: S) -> Self {
        Self {
            finder: DiagnosticFinder::with_source(source),
        }
    }

    /// Load every diagnostic `method` requires from `diagnostic_data_path`.
    ///
    /// The first diagnostic that cannot be found or loaded fails the whole
    /// resolution.
    pub fn resolve(&self, method: &str, diagnostic_data_path: &Path) -> Result<Resolved> {
        self.resolve_at(method, diagnostic_data_path, None)
    }

    /// As [`resolve`](Self::resolve), with every diagnostic narrowed to
    /// `time_extract` when one is given.
    pub fn resolve_at(
        &self,
        method: &str,
        diagnostic_data_path: &Path,
        time_extract: Option<&TimeFilter>,
    ) -> Result<Resolved> {
        let diagnostics = match required_diagnostics(method) {
            Prerequisites::NoPrerequisites => {
                debug!("Method {} has no prerequisite diagnostics", method);
                return Ok(Resolved::NoPrerequisites);
            }
            Prerequisites::Required(diagnostics) => diagnostics,
        };

        let mut additional_diagnostics = PrerequisiteMap::new();
        for &item in diagnostics {
            let cubes = self.finder.find(item, diagnostic_data_path, time_extract)?;
            info!("Loaded {} cube(s) for {}", cubes.len(), item);
            additional_diagnostics.insert(item.to_string(), cubes);
        }

        Ok(Resolved::Loaded(additional_diagnostics))
    }
}

/// Resolve the prerequisites of `method` from NetCDF files
pub fn get_method_prerequisites(method: &str, diagnostic_data_path: &Path) -> Result<Resolved> {
    PrerequisiteResolver::new().resolve(method, diagnostic_data_path)
}

/// Resolve the prerequisites of `method` from NetCDF files, keeping only
/// data valid at `time_extract`
pub fn get_method_prerequisites_at(
    method: &str,
    diagnostic_data_path: &Path,
    time_extract: Option<&TimeFilter>,
) -> Result<Resolved> {
    PrerequisiteResolver::new().resolve_at(method, diagnostic_data_path, time_extract)
}
