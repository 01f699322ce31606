//! Booking and payment flow integration tests: plot lifecycle, the
//! customer balance invariant, ledger rows, and payment reversal.

mod common;

use common::spawn_app;
use serde_json::json;

#[tokio::test]
async fn booking_marks_the_plot_sold_and_opens_the_ledger() {
    let Some(app) = spawn_app().await else { return };

    let project_id = app.create_project().await;
    let plot_id = app.create_plot(&project_id, 1200.0, 450.0).await;

    let customer_id = app
        .create_customer(&project_id, &plot_id, None, 540_000.0)
        .await;

    let (_, plot) = app.get_json(&format!("/api/v1/plots/{}", plot_id)).await;
    assert_eq!(plot["status"], "sold");

    let (_, customer) = app
        .get_json(&format!("/api/v1/customers/{}", customer_id))
        .await;
    assert_eq!(customer["deal_value"].as_f64().unwrap(), 540_000.0);
    assert_eq!(customer["paid_amount"].as_f64().unwrap(), 0.0);
    assert_eq!(customer["balance_amount"].as_f64().unwrap(), 540_000.0);

    // The booking debit opens the customer's ledger.
    let (_, ledger) = app
        .get_json(&format!("/api/v1/ledgers/customer/{}", customer_id))
        .await;
    assert_eq!(ledger["current_balance"].as_f64().unwrap(), 540_000.0);
    assert_eq!(ledger["entries"][0]["reference_type"], "booking");

    // The plot cannot be booked twice.
    let (status, body) = app
        .post_json(
            "/api/v1/customers",
            json!({
                "name": "Second Buyer",
                "phone": "9820099999",
                "project_id": project_id,
                "plot_id": plot_id,
                "deal_value": 600_000.0,
            }),
        )
        .await;
    assert_eq!(status, 409, "expected conflict, got: {}", body);
}

#[tokio::test]
async fn payments_keep_the_balance_invariant() {
    let Some(app) = spawn_app().await else { return };

    let project_id = app.create_project().await;
    let plot_id = app.create_plot(&project_id, 1000.0, 400.0).await;
    let customer_id = app
        .create_customer(&project_id, &plot_id, None, 400_000.0)
        .await;

    app.record_payment(&customer_id, 150_000.0).await;
    app.record_payment(&customer_id, 100_000.0).await;

    let (_, customer) = app
        .get_json(&format!("/api/v1/customers/{}", customer_id))
        .await;
    let deal = customer["deal_value"].as_f64().unwrap();
    let paid = customer["paid_amount"].as_f64().unwrap();
    let balance = customer["balance_amount"].as_f64().unwrap();
    assert_eq!(paid, 250_000.0);
    assert_eq!(balance, deal - paid);

    // Ledger: booking debit then two payment credits.
    let (_, ledger) = app
        .get_json(&format!("/api/v1/ledgers/customer/{}", customer_id))
        .await;
    assert_eq!(ledger["current_balance"].as_f64().unwrap(), 150_000.0);

    // The transaction snapshot carries the balance after that payment.
    let (_, payments) = app
        .get_json(&format!("/api/v1/payments?customer_id={}", customer_id))
        .await;
    let payments = payments.as_array().unwrap();
    assert_eq!(payments.len(), 2);
    // Newest first: 100k payment left 150k outstanding.
    assert_eq!(payments[0]["balance_at_time"].as_f64().unwrap(), 150_000.0);
    assert_eq!(payments[1]["balance_at_time"].as_f64().unwrap(), 250_000.0);
}

#[tokio::test]
async fn reversal_restores_the_customer_and_appends_a_compensating_row() {
    let Some(app) = spawn_app().await else { return };

    let project_id = app.create_project().await;
    let plot_id = app.create_plot(&project_id, 900.0, 500.0).await;
    let customer_id = app
        .create_customer(&project_id, &plot_id, None, 450_000.0)
        .await;

    let transaction_id = app.record_payment(&customer_id, 50_000.0).await;

    let (status, body) = app
        .post_json(&format!("/api/v1/payments/{}/reverse", transaction_id), json!({}))
        .await;
    assert_eq!(status, 200, "reversal failed: {}", body);
    assert_eq!(body["reversed"], true);

    let (_, customer) = app
        .get_json(&format!("/api/v1/customers/{}", customer_id))
        .await;
    assert_eq!(customer["paid_amount"].as_f64().unwrap(), 0.0);
    assert_eq!(customer["balance_amount"].as_f64().unwrap(), 450_000.0);

    // Ledger: booking debit, payment credit, reversal debit.
    let (_, ledger) = app
        .get_json(&format!("/api/v1/ledgers/customer/{}", customer_id))
        .await;
    assert_eq!(ledger["entries"].as_array().unwrap().len(), 3);
    assert_eq!(ledger["current_balance"].as_f64().unwrap(), 450_000.0);
    assert_eq!(ledger["entries"][0]["reference_type"], "payment_reversal");

    // A transaction reverses once.
    let (status, _) = app
        .post_json(&format!("/api/v1/payments/{}/reverse", transaction_id), json!({}))
        .await;
    assert_eq!(status, 409);
}
