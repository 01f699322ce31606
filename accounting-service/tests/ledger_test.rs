//! Ledger posting integration tests: balance recurrence, validation, and
//! the per-party ledger view.

mod common;

use common::spawn_app;
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn opening_balance_seeds_the_account_ledger() {
    let Some(app) = spawn_app().await else { return };

    let account_id = app
        .create_ledger_account(&format!("HDFC Current {}", Uuid::new_v4().simple()), 50_000.0)
        .await;

    let (status, body) = app
        .get_json(&format!("/api/v1/ledgers/ledger_account/{}", account_id))
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["current_balance"].as_f64().unwrap(), 50_000.0);
    assert_eq!(body["entries"].as_array().unwrap().len(), 1);
    assert_eq!(body["entries"][0]["reference_type"], "opening_balance");
}

#[tokio::test]
async fn running_balance_follows_the_recurrence() {
    let Some(app) = spawn_app().await else { return };

    let account_id = app
        .create_ledger_account(&format!("Cash Box {}", Uuid::new_v4().simple()), 0.0)
        .await;

    // debit 1000, credit 300, debit 50: balances 1000, 700, 750
    for (debit, credit) in [(1000.0, 0.0), (0.0, 300.0), (50.0, 0.0)] {
        let (status, body) = app
            .post_json(
                "/api/v1/ledgers",
                json!({
                    "party_type": "ledger_account",
                    "party_id": account_id,
                    "debit": debit,
                    "credit": credit,
                    "description": "Manual adjustment",
                }),
            )
            .await;
        assert_eq!(status, 201, "posting failed: {}", body);
    }

    let (status, body) = app
        .get_json(&format!("/api/v1/ledgers/ledger_account/{}", account_id))
        .await;
    assert_eq!(status, 200);
    let entries = body["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 3);

    // Entries come back newest first; verify the recurrence oldest first.
    let balances: Vec<f64> = entries
        .iter()
        .rev()
        .map(|e| e["balance"].as_f64().unwrap())
        .collect();
    assert_eq!(balances, vec![1000.0, 700.0, 750.0]);

    // balance_n == balance_{n-1} + debit_n - credit_n
    let debits: Vec<f64> = entries
        .iter()
        .rev()
        .map(|e| e["debit"].as_f64().unwrap())
        .collect();
    let credits: Vec<f64> = entries
        .iter()
        .rev()
        .map(|e| e["credit"].as_f64().unwrap())
        .collect();
    let mut prev = 0.0;
    for i in 0..balances.len() {
        assert_eq!(balances[i], prev + debits[i] - credits[i]);
        prev = balances[i];
    }

    assert_eq!(body["current_balance"].as_f64().unwrap(), 750.0);
}

#[tokio::test]
async fn posting_with_no_amount_is_rejected() {
    let Some(app) = spawn_app().await else { return };

    let account_id = app
        .create_ledger_account(&format!("Petty Cash {}", Uuid::new_v4().simple()), 0.0)
        .await;

    let (status, body) = app
        .post_json(
            "/api/v1/ledgers",
            json!({
                "party_type": "ledger_account",
                "party_id": account_id,
                "debit": 0.0,
                "credit": 0.0,
                "description": "Empty posting",
            }),
        )
        .await;
    assert_eq!(status, 400, "expected rejection, got: {}", body);
}

#[tokio::test]
async fn ledger_for_unknown_party_is_404() {
    let Some(app) = spawn_app().await else { return };

    let (status, _) = app
        .get_json(&format!(
            "/api/v1/ledgers/ledger_account/{}",
            Uuid::new_v4()
        ))
        .await;
    assert_eq!(status, 404);
}

#[tokio::test]
async fn soft_deleted_entry_leaves_later_balances_as_posted() {
    let Some(app) = spawn_app().await else { return };

    let account_id = app
        .create_ledger_account(&format!("Suspense {}", Uuid::new_v4().simple()), 0.0)
        .await;

    let mut entry_ids = Vec::new();
    for debit in [100.0, 200.0, 300.0] {
        let (status, body) = app
            .post_json(
                "/api/v1/ledgers",
                json!({
                    "party_type": "ledger_account",
                    "party_id": account_id,
                    "debit": debit,
                    "credit": 0.0,
                    "description": "Adjustment",
                }),
            )
            .await;
        assert_eq!(status, 201);
        entry_ids.push(body["id"].as_str().unwrap().to_string());
    }

    // Drop the middle entry: the view hides it, later balances are untouched.
    let status = app.delete(&format!("/api/v1/ledgers/{}", entry_ids[1])).await;
    assert_eq!(status, 204);

    let (_, body) = app
        .get_json(&format!("/api/v1/ledgers/ledger_account/{}", account_id))
        .await;
    let entries = body["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 2);
    // Newest first: the last posting keeps its of-the-time balance of 600.
    assert_eq!(entries[0]["balance"].as_f64().unwrap(), 600.0);
    assert_eq!(body["current_balance"].as_f64().unwrap(), 600.0);

    // Deleting the same entry twice is a 404.
    let status = app.delete(&format!("/api/v1/ledgers/{}", entry_ids[1])).await;
    assert_eq!(status, 404);
}
