//! External representations and (de)serialization of jobs and solutions.

pub mod export;
pub mod ext_repr;
pub mod import;
pub mod svg;

pub use export::build_solution;
pub use import::Importer;
