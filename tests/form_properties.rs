//! Property tests for input filters and the submit predicate.

use proptest::prelude::*;

use withdrawal_workflow::app::{
    FormField, FormState, WithdrawalWorkflow, can_submit, decimal_text, digits_only,
};
use withdrawal_workflow::domain::{Profile, WireTransferDetails, WithdrawalMethod, parse_decimal};

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

proptest! {
    #[test]
    fn decimal_filter_is_idempotent(raw in ".*") {
        let once = decimal_text(&raw);
        prop_assert_eq!(decimal_text(&once), once);
    }

    #[test]
    fn decimal_filter_keeps_one_point_and_digits(raw in ".*") {
        let filtered = decimal_text(&raw);
        prop_assert!(filtered.matches('.').count() <= 1);
        prop_assert!(filtered.chars().all(|c| c.is_ascii_digit() || c == '.'));
    }

    #[test]
    fn decimal_filter_output_parses_unless_bare_point(raw in "[0-9.a-z ]{0,12}") {
        let filtered = decimal_text(&raw);
        if !filtered.is_empty() && filtered != "." {
            prop_assert!(parse_decimal(&filtered).is_some());
        }
    }

    #[test]
    fn digit_filter_keeps_only_digits(raw in ".*") {
        let filtered = digits_only(&raw);
        prop_assert!(filtered.chars().all(|c| c.is_ascii_digit()));
        prop_assert_eq!(digits_only(&filtered), filtered.clone());
        prop_assert_eq!(
            filtered.len(),
            raw.chars().filter(char::is_ascii_digit).count()
        );
    }

    #[test]
    fn routing_and_account_fields_store_digits(raw in ".*") {
        let mut form = FormState::new(WithdrawalMethod::WireTransfer, &wire_profile(), "tx".into());
        form.set(FormField::WireTransferAccountNumber, &raw).unwrap();
        form.set(FormField::WireTransferRoutingNumber, &raw).unwrap();

        prop_assert!(form.value(FormField::WireTransferAccountNumber).chars().all(|c| c.is_ascii_digit()));
        prop_assert!(form.value(FormField::WireTransferRoutingNumber).chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn submit_enabled_iff_predicate_holds(
        amount in "[0-9.]{0,8}",
        address in "[a-z@.]{0,6}",
        terms in any::<bool>(),
    ) {
        let mut paypal = FormState::new(WithdrawalMethod::PaypalAddress, &Profile::default(), "tx".into());
        paypal.set(FormField::Amount, &amount).unwrap();
        paypal.set(FormField::PaypalAddress, &address).unwrap();

        let positive = parse_decimal(paypal.amount()).is_some_and(|v| v > rust_decimal::Decimal::ZERO);
        prop_assert_eq!(can_submit(&paypal), positive && !address.is_empty());

        let mut wire = FormState::new(WithdrawalMethod::WireTransfer, &wire_profile(), "tx".into());
        wire.set(FormField::Amount, &amount).unwrap();
        wire.set_terms_accepted(terms);
        prop_assert_eq!(can_submit(&wire), positive && terms);
    }

    #[test]
    fn submit_control_follows_predicate(
        amount in "[0-9.]{0,8}",
        address in "[a-z@.]{0,6}",
        terms in any::<bool>(),
    ) {
        let paypal = WithdrawalWorkflow::from_profile(
            WithdrawalMethod::PaypalAddress,
            &Profile::default(),
            "tx".into(),
        );
        paypal.edit(FormField::Amount, &amount).unwrap();
        let view = paypal.edit(FormField::PaypalAddress, &address).unwrap();

        let mut form = FormState::new(WithdrawalMethod::PaypalAddress, &Profile::default(), "tx".into());
        form.set(FormField::Amount, &amount).unwrap();
        form.set(FormField::PaypalAddress, &address).unwrap();
        prop_assert_eq!(view.can_submit, can_submit(&form));
        prop_assert_eq!(paypal.view().can_submit, can_submit(&form));

        let wire = WithdrawalWorkflow::from_profile(
            WithdrawalMethod::WireTransfer,
            &wire_profile(),
            "tx".into(),
        );
        wire.edit(FormField::Amount, &amount).unwrap();
        let view = wire.set_terms_accepted(terms).unwrap();

        let mut form = FormState::new(WithdrawalMethod::WireTransfer, &wire_profile(), "tx".into());
        form.set(FormField::Amount, &amount).unwrap();
        form.set_terms_accepted(terms);
        prop_assert_eq!(view.can_submit, can_submit(&form));
        prop_assert_eq!(wire.view().can_submit, can_submit(&form));
    }
}
