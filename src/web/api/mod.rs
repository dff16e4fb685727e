pub mod error;
pub mod export;
pub mod satellites;
pub mod status;
