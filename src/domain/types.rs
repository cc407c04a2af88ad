//! Domain types with validation support.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Payout channel chosen in step one of the withdraw flow
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, ToSchema)]
pub enum WithdrawalMethod {
    #[serde(rename = "paypalAddress")]
    PaypalAddress,
    #[serde(rename = "wireTransfer")]
    WireTransfer,
    #[serde(rename = "walletBTCAddress")]
    WalletBtcAddress,
}

impl WithdrawalMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PaypalAddress => "paypalAddress",
            Self::WireTransfer => "wireTransfer",
            Self::WalletBtcAddress => "walletBTCAddress",
        }
    }

    /// Human readable channel name
    pub fn label(&self) -> &'static str {
        match self {
            Self::PaypalAddress => "PayPal",
            Self::WireTransfer => "Wire transfer",
            Self::WalletBtcAddress => "Crypto",
        }
    }

    /// Whether the user must accept the transfer terms before submitting
    pub fn requires_terms(&self) -> bool {
        matches!(self, Self::WireTransfer)
    }
}

impl std::str::FromStr for WithdrawalMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "paypalAddress" => Ok(Self::PaypalAddress),
            "wireTransfer" => Ok(Self::WireTransfer),
            "walletBTCAddress" => Ok(Self::WalletBtcAddress),
            _ => Err(format!("Invalid withdrawal method: {}", s)),
        }
    }
}

impl std::fmt::Display for WithdrawalMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Method recorded on a ledger entry. Deposits may use channels that are not
/// offered for withdrawal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub enum PaymentMethod {
    #[serde(rename = "zelleTransfer")]
    ZelleTransfer,
    #[serde(rename = "paypalAddress")]
    PaypalAddress,
    #[serde(rename = "wireTransfer")]
    WireTransfer,
    #[serde(rename = "walletBTCAddress")]
    WalletBtcAddress,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ZelleTransfer => "zelleTransfer",
            Self::PaypalAddress => "paypalAddress",
            Self::WireTransfer => "wireTransfer",
            Self::WalletBtcAddress => "walletBTCAddress",
        }
    }
}

impl From<WithdrawalMethod> for PaymentMethod {
    fn from(method: WithdrawalMethod) -> Self {
        match method {
            WithdrawalMethod::PaypalAddress => Self::PaypalAddress,
            WithdrawalMethod::WireTransfer => Self::WireTransfer,
            WithdrawalMethod::WalletBtcAddress => Self::WalletBtcAddress,
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Direction of a ledger entry
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Deposit,
    Withdrawal,
}

/// Processing status of a ledger entry
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    /// Accepted, waiting for an operator
    #[default]
    Pending,
    Completed,
    Canceled,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Canceled => "canceled",
        }
    }
}

impl std::str::FromStr for TransactionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            "canceled" => Ok(Self::Canceled),
            _ => Err(format!("Invalid transaction status: {}", s)),
        }
    }
}

impl std::fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Banking details for a wire-transfer payout
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, Validate, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct WireTransferDetails {
    #[validate(length(min = 1, message = "First name is required"))]
    #[schema(example = "Jane")]
    pub first_name: String,
    #[validate(length(min = 1, message = "Last name is required"))]
    #[schema(example = "Doe")]
    pub last_name: String,
    #[validate(length(min = 1, message = "Account number is required"))]
    #[schema(example = "000123456789")]
    pub account_number: String,
    #[validate(length(min = 1, message = "Routing number is required"))]
    #[schema(example = "110000000")]
    pub routing_number: String,
    #[validate(length(min = 1, message = "Bank name is required"))]
    #[schema(example = "First Bank")]
    pub bank_name: String,
    #[validate(length(min = 1, message = "Bank address is required"))]
    #[schema(example = "1 Main St, Springfield")]
    pub address: String,
}

/// The user's saved payout destinations and balance
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct Profile {
    /// Current balance as a decimal string
    #[schema(example = "120.50")]
    pub balance: String,
    #[schema(example = "user@example.com")]
    pub paypal_address: String,
    #[serde(rename = "walletBTCAddress")]
    #[schema(example = "bc1qxy2kgdygjrsqtzq2n0yrf2493p83kkfjhx0wlh")]
    pub wallet_btc_address: String,
    pub wire_transfer: WireTransferDetails,
}

/// Merge-patch for the profile. Omitted fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paypal_address: Option<String>,
    #[serde(rename = "walletBTCAddress", skip_serializing_if = "Option::is_none")]
    pub wallet_btc_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wire_transfer: Option<WireTransferDetails>,
}

impl ProfileUpdate {
    #[must_use]
    pub fn paypal(address: impl Into<String>) -> Self {
        Self {
            paypal_address: Some(address.into()),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn wallet_btc(address: impl Into<String>) -> Self {
        Self {
            wallet_btc_address: Some(address.into()),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn wire_transfer(details: WireTransferDetails) -> Self {
        Self {
            wire_transfer: Some(details),
            ..Default::default()
        }
    }

    /// Apply the patch to a profile, merge-patch style
    pub fn apply_to(&self, profile: &mut Profile) {
        if let Some(ref address) = self.paypal_address {
            profile.paypal_address = address.clone();
        }
        if let Some(ref address) = self.wallet_btc_address {
            profile.wallet_btc_address = address.clone();
        }
        if let Some(ref details) = self.wire_transfer {
            profile.wire_transfer = details.clone();
        }
    }
}

/// Ledger entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    #[schema(example = "3f0e5a8c-2b61-4b8e-9d0c-6a3cb1f9e0d4")]
    pub transaction_id: String,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    /// Fixed two-decimal amount
    #[schema(example = "50.00")]
    pub amount: String,
    /// Projected balance after this entry, fixed two decimals
    #[schema(example = "70.50")]
    pub balance: String,
    pub method: PaymentMethod,
    #[serde(with = "iso_millis")]
    #[schema(value_type = String, example = "2024-05-01T10:00:00.000Z")]
    pub date: DateTime<Utc>,
    pub status: TransactionStatus,
}

impl Transaction {
    /// A pending withdrawal, as created by the submission workflow
    #[must_use]
    pub fn withdrawal(
        transaction_id: String,
        amount: String,
        balance: String,
        method: WithdrawalMethod,
        date: DateTime<Utc>,
    ) -> Self {
        Self {
            transaction_id,
            kind: TransactionType::Withdrawal,
            amount,
            balance,
            method: method.into(),
            date,
            status: TransactionStatus::Pending,
        }
    }
}

/// Timestamps as ISO-8601 UTC with millisecond precision and a `Z` suffix.
pub mod iso_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&date.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|date| date.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

/// Health status enum
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// All systems operational
    Healthy,
    /// Some systems degraded but functional
    Degraded,
    /// Critical systems unavailable
    Unhealthy,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Overall system status
    pub status: HealthStatus,
    /// Profile service health status
    pub profile_service: HealthStatus,
    /// Transaction ledger health status
    pub ledger: HealthStatus,
    /// Number of live workflow instances
    pub active_workflows: usize,
    /// Current server timestamp
    pub timestamp: DateTime<Utc>,
    /// Application version
    #[schema(example = "0.1.0")]
    pub version: String,
}

impl HealthResponse {
    #[must_use]
    pub fn new(profile_service: HealthStatus, ledger: HealthStatus, active_workflows: usize) -> Self {
        let status = match (&profile_service, &ledger) {
            (HealthStatus::Healthy, HealthStatus::Healthy) => HealthStatus::Healthy,
            (HealthStatus::Unhealthy, HealthStatus::Unhealthy) => HealthStatus::Unhealthy,
            _ => HealthStatus::Degraded,
        };
        Self {
            status,
            profile_service,
            ledger,
            active_workflows,
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Error response structure
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error details
    pub error: ErrorDetail,
}

/// Error detail structure
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Error type identifier
    #[schema(example = "validation_error")]
    pub r#type: String,
    /// Human-readable error message
    #[schema(example = "Withdrawal form is incomplete; submission is disabled")]
    pub message: String,
}
