pub mod constraints;
pub mod objective;
pub mod sets_and_parameters;
pub mod solver;
pub mod utils;
pub mod variables;
