//! End-to-end workflow scenarios against mock collaborators.

use std::sync::Arc;
use std::time::Duration;

use withdrawal_workflow::app::{
    DialogState, FormField, Phase, SubmissionState, WithdrawalService,
};
use withdrawal_workflow::domain::{
    AppError, PaymentMethod, Profile, ProfileUpdate, TransactionStatus, TransactionType,
    ValidationError, WireTransferDetails, WithdrawalMethod,
};
use withdrawal_workflow::test_utils::{
    MockProfileStore, MockTransactionLedger, SequentialIdGenerator,
};

fn paypal_profile() -> Profile {
    Profile {
        balance: "120.00".to_string(),
        paypal_address: "a@b.com".to_string(),
        ..Default::default()
    }
}

fn wire_profile() -> Profile {
    Profile {
        balance: "500".to_string(),
        wire_transfer: WireTransferDetails {
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            account_number: "123456".to_string(),
            routing_number: "021000021".to_string(),
            bank_name: "First Bank".to_string(),
            address: "1 Main St".to_string(),
        },
        ..Default::default()
    }
}

struct Harness {
    store: Arc<MockProfileStore>,
    ledger: Arc<MockTransactionLedger>,
    service: WithdrawalService,
}

fn harness(store: MockProfileStore, ledger: MockTransactionLedger) -> Harness {
    let store = Arc::new(store);
    let ledger = Arc::new(ledger);
    let service = WithdrawalService::new(
        Arc::clone(&store) as _,
        Arc::clone(&ledger) as _,
        Arc::new(SequentialIdGenerator::new()),
    );
    Harness {
        store,
        ledger,
        service,
    }
}

#[tokio::test]
async fn test_unedited_paypal_skips_profile_sync() {
    let h = harness(
        MockProfileStore::with_profile(paypal_profile()),
        MockTransactionLedger::new(),
    );

    let view = h
        .service
        .begin_withdrawal(WithdrawalMethod::PaypalAddress)
        .await
        .unwrap();
    h.service
        .edit_field(&view.transaction_id, FormField::Amount, "50")
        .unwrap();

    let response = h.service.submit_withdrawal(&view.transaction_id).await.unwrap();

    assert!(response.success);
    assert!(!response.profile_committed);
    assert_eq!(response.phases.len(), 1);
    assert_eq!(response.phases[0].phase, Phase::Transaction);
    assert!(h.store.updates().is_empty());

    let created = h.ledger.get_transactions();
    assert_eq!(created.len(), 1);
    let tx = &created[0];
    assert_eq!(tx.kind, TransactionType::Withdrawal);
    assert_eq!(tx.amount, "50.00");
    assert_eq!(tx.balance, "70.00");
    assert_eq!(tx.method, PaymentMethod::PaypalAddress);
    assert_eq!(tx.status, TransactionStatus::Pending);

    assert_eq!(response.dialog.state, DialogState::Success);
    assert_eq!(response.dialog.messages, vec!["ready-steady".to_string()]);
}

#[tokio::test]
async fn test_edited_paypal_sends_only_that_field() {
    let h = harness(
        MockProfileStore::with_profile(paypal_profile()),
        MockTransactionLedger::new(),
    );

    let view = h
        .service
        .begin_withdrawal(WithdrawalMethod::PaypalAddress)
        .await
        .unwrap();
    let id = view.transaction_id;
    h.service
        .edit_field(&id, FormField::PaypalAddress, "c@d.com")
        .unwrap();
    h.service.edit_field(&id, FormField::Amount, "50").unwrap();

    let response = h.service.submit_withdrawal(&id).await.unwrap();

    assert!(response.success);
    assert!(response.profile_committed);
    assert_eq!(h.store.updates(), vec![ProfileUpdate::paypal("c@d.com")]);
    assert_eq!(
        serde_json::to_value(&h.store.updates()[0]).unwrap(),
        serde_json::json!({ "paypalAddress": "c@d.com" })
    );
    assert_eq!(h.store.profile().paypal_address, "c@d.com");
    assert_eq!(h.ledger.get_transactions().len(), 1);
}

#[tokio::test]
async fn test_wire_transfer_without_terms_stays_disabled() {
    let h = harness(
        MockProfileStore::with_profile(wire_profile()),
        MockTransactionLedger::new(),
    );

    let view = h
        .service
        .begin_withdrawal(WithdrawalMethod::WireTransfer)
        .await
        .unwrap();
    let id = view.transaction_id;
    assert!(view.terms_required);
    assert_eq!(view.fields.len(), 6);

    for amount in ["10", "0.5", "999999"] {
        let view = h.service.edit_field(&id, FormField::Amount, amount).unwrap();
        assert!(!view.can_submit, "amount {}", amount);
    }

    let result = h.service.submit_withdrawal(&id).await;
    assert!(matches!(
        result,
        Err(AppError::Validation(ValidationError::SubmitDisabled))
    ));
    assert_eq!(h.ledger.create_calls(), 0);

    // refusal leaves the guard idle; accepting terms enables submit
    let view = h.service.set_terms_accepted(&id, true).unwrap();
    assert_eq!(view.submission, SubmissionState::Idle);
    assert!(view.can_submit);
}

#[tokio::test]
async fn test_rejected_transaction_shows_support_messages() {
    let h = harness(
        MockProfileStore::with_profile(paypal_profile()),
        MockTransactionLedger::failing("ledger down"),
    );

    let id = h
        .service
        .begin_withdrawal(WithdrawalMethod::PaypalAddress)
        .await
        .unwrap()
        .transaction_id;
    h.service.edit_field(&id, FormField::Amount, "50").unwrap();

    let response = h.service.submit_withdrawal(&id).await.unwrap();

    assert!(!response.success);
    assert!(!response.profile_committed);
    assert!(response.transaction.is_none());
    assert_eq!(response.dialog.state, DialogState::Failure);
    assert!(response.dialog.open);
    assert_eq!(
        response.dialog.messages,
        vec!["oops", "writing to support", "we help"]
    );

    let view = h.service.get_withdrawal(&id).unwrap();
    assert_eq!(view.submission, SubmissionState::Done);
    assert!(!view.can_submit);
}

#[tokio::test]
async fn test_partial_failure_is_reported() {
    let h = harness(
        MockProfileStore::with_profile(paypal_profile()),
        MockTransactionLedger::failing("ledger down"),
    );

    let id = h
        .service
        .begin_withdrawal(WithdrawalMethod::PaypalAddress)
        .await
        .unwrap()
        .transaction_id;
    h.service
        .edit_field(&id, FormField::PaypalAddress, "c@d.com")
        .unwrap();
    h.service.edit_field(&id, FormField::Amount, "5").unwrap();

    let response = h.service.submit_withdrawal(&id).await.unwrap();

    assert!(!response.success);
    assert!(response.profile_committed);
    assert_eq!(response.phases.len(), 2);
    assert!(response.phases[0].ok);
    assert!(!response.phases[1].ok);
    // the profile write stays committed
    assert_eq!(h.store.profile().paypal_address, "c@d.com");
    assert_eq!(response.dialog.state, DialogState::Failure);
}

#[tokio::test]
async fn test_profile_failure_aborts_transaction() {
    let h = harness(
        MockProfileStore::with_profile(paypal_profile()).with_failing_updates("profile down"),
        MockTransactionLedger::new(),
    );

    let id = h
        .service
        .begin_withdrawal(WithdrawalMethod::PaypalAddress)
        .await
        .unwrap()
        .transaction_id;
    h.service
        .edit_field(&id, FormField::PaypalAddress, "c@d.com")
        .unwrap();
    h.service.edit_field(&id, FormField::Amount, "5").unwrap();

    let response = h.service.submit_withdrawal(&id).await.unwrap();

    assert!(!response.success);
    assert!(!response.profile_committed);
    assert_eq!(response.phases.len(), 1);
    assert_eq!(response.phases[0].phase, Phase::Profile);
    assert_eq!(h.ledger.create_calls(), 0);
    assert_eq!(response.dialog.state, DialogState::Failure);
}

#[tokio::test]
async fn test_transaction_id_survives_edits() {
    let h = harness(
        MockProfileStore::with_profile(wire_profile()),
        MockTransactionLedger::new(),
    );

    let view = h
        .service
        .begin_withdrawal(WithdrawalMethod::WireTransfer)
        .await
        .unwrap();
    let id = view.transaction_id.clone();
    assert_eq!(id, "tx-1");

    h.service
        .edit_field(&id, FormField::WireTransferBankName, "Second Bank")
        .unwrap();
    h.service
        .edit_field(&id, FormField::WireTransferAccountNumber, "12-34 56")
        .unwrap();
    h.service.edit_field(&id, FormField::Amount, "12.345").unwrap();
    h.service.set_terms_accepted(&id, true).unwrap();

    let response = h.service.submit_withdrawal(&id).await.unwrap();

    assert!(response.success);
    let created = h.ledger.get_transactions();
    assert_eq!(created[0].transaction_id, id);
    assert_eq!(response.transaction.unwrap().transaction_id, id);
    assert_eq!(created[0].amount, "12.35");
    assert_eq!(created[0].balance, "487.66");
    assert_eq!(created[0].method, PaymentMethod::WireTransfer);

    // only the wire-transfer block is written
    let updates = h.store.updates();
    assert_eq!(updates.len(), 1);
    assert!(updates[0].paypal_address.is_none());
    let details = updates[0].wire_transfer.as_ref().unwrap();
    assert_eq!(details.bank_name, "Second Bank");
    assert_eq!(details.account_number, "123456");
}

#[tokio::test]
async fn test_load_failure_registers_nothing() {
    let h = harness(
        MockProfileStore::failing("unreachable"),
        MockTransactionLedger::new(),
    );

    let result = h
        .service
        .begin_withdrawal(WithdrawalMethod::PaypalAddress)
        .await;

    assert!(matches!(result, Err(AppError::ProfileLoad(_))));
    assert_eq!(h.service.active_workflows(), 0);
}

#[tokio::test]
async fn test_double_submit_is_rejected_while_in_flight() {
    let h = harness(
        MockProfileStore::with_profile(paypal_profile()),
        MockTransactionLedger::new().with_delay(Duration::from_millis(100)),
    );
    let id = h
        .service
        .begin_withdrawal(WithdrawalMethod::PaypalAddress)
        .await
        .unwrap()
        .transaction_id;
    h.service.edit_field(&id, FormField::Amount, "1").unwrap();

    let (first, second) = tokio::join!(
        h.service.submit_withdrawal(&id),
        async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            h.service.submit_withdrawal(&id).await
        }
    );

    assert!(first.unwrap().success);
    assert!(matches!(second, Err(AppError::Conflict(_))));
    assert_eq!(h.ledger.create_calls(), 1);

    // and again once the first has finished
    assert!(matches!(
        h.service.submit_withdrawal(&id).await,
        Err(AppError::Conflict(_))
    ));
}

#[tokio::test]
async fn test_confirm_closes_workflow() {
    let h = harness(
        MockProfileStore::with_profile(paypal_profile()),
        MockTransactionLedger::new(),
    );
    let id = h
        .service
        .begin_withdrawal(WithdrawalMethod::PaypalAddress)
        .await
        .unwrap()
        .transaction_id;

    // nothing to confirm before submitting
    assert!(matches!(
        h.service.confirm_outcome(&id),
        Err(AppError::Conflict(_))
    ));

    h.service.edit_field(&id, FormField::Amount, "1").unwrap();
    h.service.submit_withdrawal(&id).await.unwrap();

    let navigation = h.service.confirm_outcome(&id).unwrap();
    assert_eq!(navigation.route, "/");
    assert!(matches!(
        h.service.get_withdrawal(&id),
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_edit_of_foreign_field_is_rejected() {
    let h = harness(
        MockProfileStore::with_profile(paypal_profile()),
        MockTransactionLedger::new(),
    );
    let id = h
        .service
        .begin_withdrawal(WithdrawalMethod::PaypalAddress)
        .await
        .unwrap()
        .transaction_id;

    let result = h
        .service
        .edit_field(&id, FormField::WireTransferBankName, "x");
    assert!(matches!(
        result,
        Err(AppError::Validation(ValidationError::FieldNotAvailable { .. }))
    ));
}

#[tokio::test]
async fn test_evict_idle_keeps_fresh_workflows() {
    let h = harness(
        MockProfileStore::with_profile(paypal_profile()),
        MockTransactionLedger::new(),
    );
    h.service
        .begin_withdrawal(WithdrawalMethod::PaypalAddress)
        .await
        .unwrap();

    assert_eq!(h.service.evict_idle(Duration::from_secs(60)), 0);
    assert_eq!(h.service.evict_idle(Duration::ZERO), 1);
    assert_eq!(h.service.active_workflows(), 0);
}
