//! Domain layer containing core business types, traits, and error definitions.

pub mod error;
pub mod money;
pub mod traits;
pub mod types;

pub use error::{AppError, ConfigError, ExternalServiceError, ValidationError};
pub use money::{format_fixed2, parse_decimal};
pub use traits::{IdGenerator, ProfileStore, TransactionLedger};
pub use types::{
    ErrorDetail, ErrorResponse, HealthResponse, HealthStatus, PaymentMethod, Profile,
    ProfileUpdate, Transaction, TransactionStatus, TransactionType, WireTransferDetails,
    WithdrawalMethod,
};
