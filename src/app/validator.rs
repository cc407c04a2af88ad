//! Submit-enable predicate.

use rust_decimal::Decimal;
use validator::Validate;

use super::form::FormState;
use crate::domain::{WithdrawalMethod, parse_decimal};

/// Whether the submit control is enabled for `form`.
///
/// Requires a positive amount and non-empty payout details for the active
/// method; wire transfers additionally need all six banking fields and
/// accepted terms. Formats are not checked here.
pub fn can_submit(form: &FormState) -> bool {
    if !amount_is_positive(form.amount()) {
        return false;
    }

    let draft = form.draft();
    match form.method() {
        WithdrawalMethod::PaypalAddress => !draft.paypal_address.is_empty(),
        WithdrawalMethod::WalletBtcAddress => !draft.wallet_btc_address.is_empty(),
        WithdrawalMethod::WireTransfer => {
            draft.wire_transfer.validate().is_ok() && form.terms_accepted()
        }
    }
}

fn amount_is_positive(amount: &str) -> bool {
    parse_decimal(amount).is_some_and(|value| value > Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::form::FormField;
    use crate::domain::{Profile, WireTransferDetails};

    fn wire_profile() -> Profile {
        Profile {
            balance: "100".to_string(),
            wire_transfer: WireTransferDetails {
                first_name: "Jane".to_string(),
                last_name: "Doe".to_string(),
                account_number: "1".to_string(),
                routing_number: "2".to_string(),
                bank_name: "Bank".to_string(),
                address: "Street".to_string(),
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_amount_must_be_positive_number() {
        let profile = Profile {
            paypal_address: "a@b.com".to_string(),
            ..Default::default()
        };
        let mut form = FormState::new(WithdrawalMethod::PaypalAddress, &profile, "tx".into());

        for (amount, expected) in [
            ("", false),
            ("0", false),
            ("0.00", false),
            (".", false),
            ("0.01", true),
            (".5", true),
            ("50", true),
        ] {
            form.set(FormField::Amount, amount).unwrap();
            assert_eq!(can_submit(&form), expected, "amount {:?}", amount);
        }
    }

    #[test]
    fn test_paypal_requires_address() {
        let mut form =
            FormState::new(WithdrawalMethod::PaypalAddress, &Profile::default(), "tx".into());
        form.set(FormField::Amount, "10").unwrap();
        assert!(!can_submit(&form));

        form.set(FormField::PaypalAddress, "a@b.com").unwrap();
        assert!(can_submit(&form));
    }

    #[test]
    fn test_wallet_requires_address() {
        let mut form = FormState::new(
            WithdrawalMethod::WalletBtcAddress,
            &Profile::default(),
            "tx".into(),
        );
        form.set(FormField::Amount, "10").unwrap();
        assert!(!can_submit(&form));

        form.set(FormField::WalletBtcAddress, "bc1q").unwrap();
        assert!(can_submit(&form));
    }

    #[test]
    fn test_wire_transfer_requires_terms() {
        let mut form = FormState::new(WithdrawalMethod::WireTransfer, &wire_profile(), "tx".into());
        form.set(FormField::Amount, "10").unwrap();
        assert!(!can_submit(&form));

        form.set_terms_accepted(true);
        assert!(can_submit(&form));
    }

    #[test]
    fn test_wire_transfer_requires_every_field() {
        let mut form = FormState::new(WithdrawalMethod::WireTransfer, &wire_profile(), "tx".into());
        form.set(FormField::Amount, "10").unwrap();
        form.set_terms_accepted(true);

        form.set(FormField::WireTransferRoutingNumber, "abc").unwrap();
        assert!(!can_submit(&form));
    }
}
