pub mod amortization;
pub mod chart;
pub mod error;
pub mod export;
pub mod input;
pub mod preferences;
pub mod summary;
pub mod time_value;
pub mod types;

pub use error::EduLoanError;
pub use types::*;

/// Standard result type for all education-loan operations
pub type EduLoanResult<T> = Result<T, EduLoanError>;
