//! The API layer, containing web handlers and routing.

pub mod handlers;
pub mod router;

pub use handlers::{ApiDoc, BeginWithdrawalRequest, EditFieldRequest, TermsRequest};
pub use router::create_router;
