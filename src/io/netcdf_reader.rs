use ndarray::{ArrayD, IxDyn};
use std::path::Path;

use super::DataReaderError;
use crate::cube::Cube;
use crate::time_utils;

const TIME_COORDINATE: &str = "time";

fn string_attribute(var: &netcdf::Variable, name: &str) -> Option<String> {
    match var.attribute(name)?.value().ok()? {
        netcdf::AttributeValue::Str(value) => Some(value),
        _ => None,
    }
}

/// Coordinate variables share their name with their only dimension
fn is_coordinate_variable(var: &netcdf::Variable) -> bool {
    let dims = var.dimensions();
    dims.len() == 1 && dims[0].name() == var.name()
}

fn read_time_points(
    file: &netcdf::File,
) -> Result<Option<Vec<chrono::DateTime<chrono::Utc>>>, DataReaderError> {
    let Some(var) = file.variable(TIME_COORDINATE) else {
        return Ok(None);
    };

    let units = string_attribute(&var, "units")
        .ok_or_else(|| DataReaderError::ConversionError("time coordinate has no units".to_string()))?;
    let raw: Vec<f64> = var
        .get_values::<f64, _>(..)
        .map_err(|e| DataReaderError::Netcdf(e.to_string()))?;

    time_utils::decode_cf_times(&raw, &units)
        .map(Some)
        .map_err(|e| DataReaderError::ConversionError(e.to_string()))
}

/// Decode every data variable in a NetCDF file into a cube
pub(super) fn read_cubes(path: &Path) -> Result<Vec<Cube>, DataReaderError> {
    let file = netcdf::open(path).map_err(|e| DataReaderError::Netcdf(e.to_string()))?;
    let time_points = read_time_points(&file)?;

    let mut cubes = Vec::new();
    for var in file.variables() {
        if is_coordinate_variable(&var) {
            continue;
        }

        let var_name = var.name();
        let dims = var.dimensions();
        let shape: Vec<usize> = dims.iter().map(|d| d.len()).collect();
        let leading_time = dims.first().map(|d| d.name() == TIME_COORDINATE).unwrap_or(false);

        let raw: Vec<f32> = var
            .get_values::<f32, _>(..)
            .map_err(|e| DataReaderError::Netcdf(format!("{}: {}", var_name, e)))?;
        let data = ArrayD::from_shape_vec(IxDyn(&shape), raw)
            .map_err(|e| DataReaderError::ConversionError(format!("{}: {}", var_name, e)))?;

        let name = string_attribute(&var, "standard_name")
            .or_else(|| string_attribute(&var, "long_name"))
            .unwrap_or_else(|| var_name.clone());

        let mut cube = Cube::new(name, path, data);
        if let Some(units) = string_attribute(&var, "units") {
            cube = cube.with_units(units);
        }
        if leading_time {
            if let Some(times) = &time_points {
                cube = cube.with_times(times.clone());
            }
        }
        cubes.push(cube);
    }

    if cubes.is_empty() {
        return Err(DataReaderError::MissingVariable(format!(
            "no data variables in {}",
            path.display()
        )));
    }

    Ok(cubes)
}
