//! utils is a tool module that provides functions generating closures
//! for common timer shapes.
pub mod convenience;

pub use convenience::functions;
