pub mod config;
pub mod cube;
pub mod io;
pub mod spotdata;
pub mod time_utils;

pub use cube::{Cube, CubeList, TimeFilter};
pub use spotdata::{Result, SpotDataError};
