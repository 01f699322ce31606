//! Journal-voucher integration tests: paired rows, sequence-backed
//! numbering, balance snapshots on both sides, and soft delete.

mod common;

use common::spawn_app;
use serde_json::json;
use uuid::Uuid;

fn voucher_body(debit_id: &str, credit_id: &str, amount: f64) -> serde_json::Value {
    json!({
        "debit_account": {
            "party_type": "ledger_account",
            "party_id": debit_id,
            "account_name": "Bank",
        },
        "credit_account": {
            "party_type": "ledger_account",
            "party_id": credit_id,
            "account_name": "Brokerage payable",
        },
        "amount": amount,
        "narration": "Brokerage transfer",
    })
}

#[tokio::test]
async fn voucher_writes_both_ledger_sides() {
    let Some(app) = spawn_app().await else { return };

    // Debit party starts at 10000, credit party at -2000.
    let debit_id = app
        .create_ledger_account(&format!("Bank {}", Uuid::new_v4().simple()), 10_000.0)
        .await;
    let credit_id = app
        .create_ledger_account(&format!("Payable {}", Uuid::new_v4().simple()), -2_000.0)
        .await;

    let (status, body) = app
        .post_json(
            "/api/v1/journal-vouchers",
            voucher_body(&debit_id, &credit_id, 5000.0),
        )
        .await;
    assert_eq!(status, 201, "voucher failed: {}", body);
    assert!(body["jv_number"].as_str().unwrap().starts_with("JV-1"));

    let (_, debit_ledger) = app
        .get_json(&format!("/api/v1/ledgers/ledger_account/{}", debit_id))
        .await;
    assert_eq!(debit_ledger["current_balance"].as_f64().unwrap(), 15_000.0);

    let (_, credit_ledger) = app
        .get_json(&format!("/api/v1/ledgers/ledger_account/{}", credit_id))
        .await;
    assert_eq!(credit_ledger["current_balance"].as_f64().unwrap(), -7_000.0);
}

#[tokio::test]
async fn voucher_numbers_are_sequential_and_unique() {
    let Some(app) = spawn_app().await else { return };

    let debit_id = app
        .create_ledger_account(&format!("Bank {}", Uuid::new_v4().simple()), 0.0)
        .await;
    let credit_id = app
        .create_ledger_account(&format!("Cash {}", Uuid::new_v4().simple()), 0.0)
        .await;

    let mut numbers = Vec::new();
    for _ in 0..3 {
        let (status, body) = app
            .post_json(
                "/api/v1/journal-vouchers",
                voucher_body(&debit_id, &credit_id, 100.0),
            )
            .await;
        assert_eq!(status, 201);
        numbers.push(body["jv_number"].as_str().unwrap().to_string());
    }

    let mut deduped = numbers.clone();
    deduped.sort();
    deduped.dedup();
    assert_eq!(deduped.len(), numbers.len(), "duplicate voucher numbers");
}

#[tokio::test]
async fn voucher_against_missing_party_leaves_nothing_behind() {
    let Some(app) = spawn_app().await else { return };

    let debit_id = app
        .create_ledger_account(&format!("Bank {}", Uuid::new_v4().simple()), 1_000.0)
        .await;

    let (status, _) = app
        .post_json(
            "/api/v1/journal-vouchers",
            voucher_body(&debit_id, &Uuid::new_v4().to_string(), 500.0),
        )
        .await;
    assert_eq!(status, 404);

    // The debit side must be untouched: no half-posted voucher.
    let (_, ledger) = app
        .get_json(&format!("/api/v1/ledgers/ledger_account/{}", debit_id))
        .await;
    assert_eq!(ledger["current_balance"].as_f64().unwrap(), 1_000.0);
    assert_eq!(ledger["entries"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn zero_amount_voucher_is_rejected() {
    let Some(app) = spawn_app().await else { return };

    let debit_id = app
        .create_ledger_account(&format!("Bank {}", Uuid::new_v4().simple()), 0.0)
        .await;
    let credit_id = app
        .create_ledger_account(&format!("Cash {}", Uuid::new_v4().simple()), 0.0)
        .await;

    let (status, _) = app
        .post_json(
            "/api/v1/journal-vouchers",
            voucher_body(&debit_id, &credit_id, 0.0),
        )
        .await;
    assert_eq!(status, 422);
}

#[tokio::test]
async fn deleting_a_voucher_deactivates_both_rows() {
    let Some(app) = spawn_app().await else { return };

    let debit_id = app
        .create_ledger_account(&format!("Bank {}", Uuid::new_v4().simple()), 0.0)
        .await;
    let credit_id = app
        .create_ledger_account(&format!("Cash {}", Uuid::new_v4().simple()), 0.0)
        .await;

    let (_, voucher) = app
        .post_json(
            "/api/v1/journal-vouchers",
            voucher_body(&debit_id, &credit_id, 750.0),
        )
        .await;
    let voucher_id = voucher["id"].as_str().unwrap();

    let status = app
        .delete(&format!("/api/v1/journal-vouchers/{}", voucher_id))
        .await;
    assert_eq!(status, 204);

    let (_, voucher) = app
        .get_json(&format!("/api/v1/journal-vouchers/{}", voucher_id))
        .await;
    assert_eq!(voucher["active"], false);

    // Both parties' views drop the voucher rows.
    let (_, debit_ledger) = app
        .get_json(&format!("/api/v1/ledgers/ledger_account/{}", debit_id))
        .await;
    assert!(debit_ledger["entries"].as_array().unwrap().is_empty());
    let (_, credit_ledger) = app
        .get_json(&format!("/api/v1/ledgers/ledger_account/{}", credit_id))
        .await;
    assert!(credit_ledger["entries"].as_array().unwrap().is_empty());
}
