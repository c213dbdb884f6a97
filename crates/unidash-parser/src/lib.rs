pub mod errors;
mod loader;
pub mod model;
pub mod schema;

pub use errors::{LoadError, MissingColumn};
pub use loader::{load_path, load_reader, read_source};
pub use model::{Department, DepartmentCounts, Metric, Record};

#[cfg(test)]
mod tests;
