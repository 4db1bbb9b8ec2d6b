use thiserror::Error;

use crate::catalog::RejectedRecord;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("enter a query")]
    EmptyQuery,

    #[error("Invalid record: {0}")]
    Validation(#[from] ValidationError),

    #[error("Strict catalog load rejected {count} record(s), first: {first}")]
    StrictLoad {
        count: usize,
        first: String,
        rejected: Vec<RejectedRecord>,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

/// Why a single catalog record was refused.
///
/// The `Display` output is the exact rejection reason reported back to the
/// caller of a catalog load.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("missing {0}")]
    Missing(&'static str),

    #[error("negative {0}")]
    Negative(&'static str),

    #[error("selling price exceeds list price")]
    SellingAboveList,

    #[error("rating out of range: {0}")]
    RatingOutOfRange(f64),

    #[error("invalid {field} quantity: {value}")]
    InvalidQuantity { field: &'static str, value: String },

    #[error("duplicate id {0}")]
    DuplicateId(String),

    #[error("malformed record: {0}")]
    Malformed(String),
}
