//! Editable withdrawal form.
//!
//! [`FormState`] keeps two copies of the payout fields: the snapshot loaded
//! from the profile on mount, which never changes, and the draft the user
//! edits. Profile sync compares the two directly.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    AppError, Profile, ProfileUpdate, ValidationError, WireTransferDetails, WithdrawalMethod,
};

/// Editable text fields of the step-two screen
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, ToSchema)]
pub enum FormField {
    #[serde(rename = "paypalAddress")]
    PaypalAddress,
    #[serde(rename = "walletBTCAddress")]
    WalletBtcAddress,
    #[serde(rename = "wireTransferFirstName")]
    WireTransferFirstName,
    #[serde(rename = "wireTransferLastName")]
    WireTransferLastName,
    #[serde(rename = "wireTransferAccountNumber")]
    WireTransferAccountNumber,
    #[serde(rename = "wireTransferRoutingNumber")]
    WireTransferRoutingNumber,
    #[serde(rename = "wireTransferBankName")]
    WireTransferBankName,
    #[serde(rename = "wireTransferAddress")]
    WireTransferAddress,
    #[serde(rename = "amount")]
    Amount,
}

const PAYPAL_FIELDS: &[FormField] = &[FormField::PaypalAddress];
const WALLET_FIELDS: &[FormField] = &[FormField::WalletBtcAddress];
const WIRE_FIELDS: &[FormField] = &[
    FormField::WireTransferAccountNumber,
    FormField::WireTransferRoutingNumber,
    FormField::WireTransferBankName,
    FormField::WireTransferAddress,
    FormField::WireTransferFirstName,
    FormField::WireTransferLastName,
];

impl FormField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PaypalAddress => "paypalAddress",
            Self::WalletBtcAddress => "walletBTCAddress",
            Self::WireTransferFirstName => "wireTransferFirstName",
            Self::WireTransferLastName => "wireTransferLastName",
            Self::WireTransferAccountNumber => "wireTransferAccountNumber",
            Self::WireTransferRoutingNumber => "wireTransferRoutingNumber",
            Self::WireTransferBankName => "wireTransferBankName",
            Self::WireTransferAddress => "wireTransferAddress",
            Self::Amount => "amount",
        }
    }

    /// Payout fields shown for `method`, in display order. `amount` is
    /// common to every method and not included.
    pub fn payout_fields(method: WithdrawalMethod) -> &'static [FormField] {
        match method {
            WithdrawalMethod::PaypalAddress => PAYPAL_FIELDS,
            WithdrawalMethod::WalletBtcAddress => WALLET_FIELDS,
            WithdrawalMethod::WireTransfer => WIRE_FIELDS,
        }
    }

    pub fn applies_to(&self, method: WithdrawalMethod) -> bool {
        *self == Self::Amount || Self::payout_fields(method).contains(self)
    }

    /// Input filter applied on every update of this field
    pub fn filter(&self, raw: &str) -> String {
        match self {
            Self::WireTransferAccountNumber | Self::WireTransferRoutingNumber => digits_only(raw),
            Self::Amount => decimal_text(raw),
            _ => raw.to_string(),
        }
    }
}

impl std::fmt::Display for FormField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Keep ASCII digits only.
#[must_use]
pub fn digits_only(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

/// Keep digits and `.`; extra points are dropped and the fragments after the
/// first point are joined into the fraction, so `1.2.3` becomes `1.23`.
#[must_use]
pub fn decimal_text(raw: &str) -> String {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    match cleaned.split_once('.') {
        Some((whole, rest)) if rest.contains('.') => {
            format!("{}.{}", whole, rest.replace('.', ""))
        }
        _ => cleaned,
    }
}

/// Payout destination fields, one copy per snapshot/draft
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PayoutFields {
    pub paypal_address: String,
    pub wallet_btc_address: String,
    pub wire_transfer: WireTransferDetails,
}

impl From<&Profile> for PayoutFields {
    fn from(profile: &Profile) -> Self {
        Self {
            paypal_address: profile.paypal_address.clone(),
            wallet_btc_address: profile.wallet_btc_address.clone(),
            wire_transfer: profile.wire_transfer.clone(),
        }
    }
}

impl PayoutFields {
    fn get(&self, field: FormField) -> &str {
        match field {
            FormField::PaypalAddress => &self.paypal_address,
            FormField::WalletBtcAddress => &self.wallet_btc_address,
            FormField::WireTransferFirstName => &self.wire_transfer.first_name,
            FormField::WireTransferLastName => &self.wire_transfer.last_name,
            FormField::WireTransferAccountNumber => &self.wire_transfer.account_number,
            FormField::WireTransferRoutingNumber => &self.wire_transfer.routing_number,
            FormField::WireTransferBankName => &self.wire_transfer.bank_name,
            FormField::WireTransferAddress => &self.wire_transfer.address,
            FormField::Amount => "",
        }
    }

    fn slot_mut(&mut self, field: FormField) -> Option<&mut String> {
        match field {
            FormField::PaypalAddress => Some(&mut self.paypal_address),
            FormField::WalletBtcAddress => Some(&mut self.wallet_btc_address),
            FormField::WireTransferFirstName => Some(&mut self.wire_transfer.first_name),
            FormField::WireTransferLastName => Some(&mut self.wire_transfer.last_name),
            FormField::WireTransferAccountNumber => Some(&mut self.wire_transfer.account_number),
            FormField::WireTransferRoutingNumber => Some(&mut self.wire_transfer.routing_number),
            FormField::WireTransferBankName => Some(&mut self.wire_transfer.bank_name),
            FormField::WireTransferAddress => Some(&mut self.wire_transfer.address),
            FormField::Amount => None,
        }
    }
}

/// Step-two form of one workflow instance
#[derive(Debug, Clone)]
pub struct FormState {
    method: WithdrawalMethod,
    transaction_id: String,
    original: PayoutFields,
    draft: PayoutFields,
    amount: String,
    terms_accepted: bool,
}

impl FormState {
    /// Seed the form from the profile loaded on mount
    #[must_use]
    pub fn new(method: WithdrawalMethod, profile: &Profile, transaction_id: String) -> Self {
        let original = PayoutFields::from(profile);
        Self {
            method,
            transaction_id,
            draft: original.clone(),
            original,
            amount: String::new(),
            terms_accepted: false,
        }
    }

    pub fn method(&self) -> WithdrawalMethod {
        self.method
    }

    pub fn transaction_id(&self) -> &str {
        &self.transaction_id
    }

    pub fn amount(&self) -> &str {
        &self.amount
    }

    pub fn terms_accepted(&self) -> bool {
        self.terms_accepted
    }

    pub fn draft(&self) -> &PayoutFields {
        &self.draft
    }

    /// Current text of `field`
    pub fn value(&self, field: FormField) -> &str {
        match field {
            FormField::Amount => &self.amount,
            other => self.draft.get(other),
        }
    }

    /// Filter `raw` through the field's input filter and store it.
    /// Returns the stored value.
    pub fn set(&mut self, field: FormField, raw: &str) -> Result<&str, AppError> {
        if !field.applies_to(self.method) {
            return Err(AppError::Validation(ValidationError::FieldNotAvailable {
                field: field.as_str().to_string(),
                method: self.method.as_str().to_string(),
            }));
        }

        let filtered = field.filter(raw);
        let slot = match self.draft.slot_mut(field) {
            Some(slot) => slot,
            None => &mut self.amount,
        };
        *slot = filtered;
        Ok(slot.as_str())
    }

    pub fn set_terms_accepted(&mut self, accepted: bool) {
        self.terms_accepted = accepted;
    }

    /// Whether any payout field of the active method differs from the
    /// snapshot taken on mount
    pub fn has_profile_changes(&self) -> bool {
        FormField::payout_fields(self.method)
            .iter()
            .any(|field| self.draft.get(*field) != self.original.get(*field))
    }

    /// Merge-patch carrying only the active method's fields, or `None` when
    /// nothing changed
    pub fn profile_update(&self) -> Option<ProfileUpdate> {
        if !self.has_profile_changes() {
            return None;
        }

        Some(match self.method {
            WithdrawalMethod::PaypalAddress => ProfileUpdate::paypal(&self.draft.paypal_address),
            WithdrawalMethod::WalletBtcAddress => {
                ProfileUpdate::wallet_btc(&self.draft.wallet_btc_address)
            }
            WithdrawalMethod::WireTransfer => {
                ProfileUpdate::wire_transfer(self.draft.wire_transfer.clone())
            }
        })
    }
}
