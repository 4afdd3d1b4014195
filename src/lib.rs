pub mod error;
pub mod math;
pub mod operations;
pub mod query;
pub mod scene;
pub mod settings;

pub use error::{GrindError, Result};
