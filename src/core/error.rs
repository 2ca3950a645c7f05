//! Error taxonomy for attribute resolution and settings.

use std::fmt;
use thiserror::Error;

/// Which kind of graph element an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Vertex,
    Edge,
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementKind::Vertex => f.write_str("vertex"),
            ElementKind::Edge => f.write_str("edge"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DrawError {
    #[error(
        "The {element} with the ID {id} has an out-of-range {key} value ({value}). \
         Valid values are between {min} and {max}."
    )]
    OutOfRange {
        element: ElementKind,
        id: u32,
        key: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("\"{0}\" is not a recognized color")]
    InvalidColor(String),

    #[error("Invalid draw settings: {0}")]
    InvalidSettings(String),
}

pub type DrawResult<T> = Result<T, DrawError>;
