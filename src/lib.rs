pub mod config;
pub mod instance;
pub mod model;
pub mod params;
pub mod solution;
