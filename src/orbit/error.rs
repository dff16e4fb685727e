use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TleFieldError {
    #[error("{field} field is empty")]
    Empty { field: &'static str },
    #[error("{field} field is not valid text")]
    Encoding { field: &'static str },
    #[error("invalid {field} value {raw:?}")]
    InvalidNumber { field: &'static str, raw: String },
    #[error("epoch out of range: year {year}, day {day}")]
    EpochOutOfRange { year: i32, day: f64 },
}

#[derive(Debug, Error)]
pub enum PropagationError {
    #[error("invalid tle: {0}")]
    InvalidTle(#[from] sgp4::TleError),
    #[error("elements error: {0}")]
    Elements(#[from] sgp4::ElementsError),
    #[error("epoch conversion failed: {0}")]
    Epoch(String),
    #[error("sgp4 error: {0}")]
    Sgp4(#[from] sgp4::Error),
    #[error("propagated state is not finite")]
    NonFinite,
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("TLE file read error: {0}")]
    FileRead(#[from] std::io::Error),
    #[error("Invalid TLE format in {source_name}: {message}")]
    InvalidTle { source_name: String, message: String },
    #[error("No satellites found in {0}")]
    Empty(String),
}
