#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use quote_comparator::prelude::*;
use serde_json::{Value, json};
use tokio::sync::Notify;

pub const SUBJECT_ID: &str = "0Q0000000000001";
pub const CANDIDATE_ID: &str = "0Q0000000000002";

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}

/// Quote header, line items with products, and an object only the right-hand
/// quote carries.
pub fn sample_payload_json() -> Value {
    let line_item_fields = json!([
        { "apiName": "Product2Id", "label": "Product ID", "type": "reference" },
        { "apiName": "Quantity", "label": "Quantity", "type": "double" },
        { "apiName": "Discount", "label": "Discount", "type": "percent" },
        { "apiName": "TotalPrice", "label": "Total Price", "type": "currency" }
    ]);

    json!({
        "sectionOrder": ["Quote", "QuoteLineItem", "Contract"],
        "quote1Data": {
            "Quote": {
                "objectLabel": "Quote",
                "objectApiName": "Quote",
                "record": {
                    "Name": "Acme Renewal",
                    "GrandTotal": 1500.5,
                    "ExpirationDate": "2024-03-15",
                    "IsSyncing": true,
                    "Account": { "Name": "Acme Corp" }
                },
                "fields": [
                    { "apiName": "Name", "label": "Quote Name", "type": "string" },
                    { "apiName": "GrandTotal", "label": "Grand Total", "type": "currency" },
                    { "apiName": "ExpirationDate", "label": "Expiration Date", "type": "date" },
                    { "apiName": "IsSyncing", "label": "Syncing", "type": "boolean" },
                    { "apiName": "Account.Name", "label": "Account", "type": "string" }
                ],
                "childRecords": []
            },
            "QuoteLineItem": {
                "objectLabel": "Quote Line Item",
                "record": null,
                "fields": line_item_fields,
                "childRecords": [
                    { "record": {
                        "Product2Id": "01t001",
                        "Product2": { "Name": "Widget Pro" },
                        "Quantity": 3,
                        "Discount": 10,
                        "TotalPrice": 2700
                    }},
                    { "record": {
                        "Product2Id": "01t002",
                        "Quantity": 1,
                        "Discount": null,
                        "TotalPrice": 99.999
                    }}
                ]
            }
        },
        "quote2Data": {
            "Quote": {
                "objectLabel": "Quote",
                "record": {
                    "Name": "Acme Renewal v2",
                    "GrandTotal": 1234567.891,
                    "ExpirationDate": null,
                    "IsSyncing": false
                },
                "fields": []
            },
            "QuoteLineItem": {
                "objectLabel": "Quote Line Item",
                "record": null,
                "fields": [],
                "childRecords": [
                    { "record": {
                        "Product2Id": "01t001",
                        "Product2": { "Name": "Widget Pro" },
                        "Quantity": 5,
                        "Discount": 12.5,
                        "TotalPrice": 4375
                    }}
                ]
            },
            "Contract": {
                "objectLabel": "Contract",
                "record": { "ContractNumber": "00000100" },
                "fields": [{ "apiName": "ContractNumber", "label": "Contract Number", "type": "string" }]
            }
        }
    })
}

pub fn sample_payload() -> ComparisonPayload {
    serde_json::from_value(sample_payload_json()).expect("sample payload should decode")
}

// ================================================================================================
// Collaborators
// ================================================================================================

/// Backend double keyed by candidate id. Unknown candidates fail.
#[derive(Debug, Default)]
pub struct InMemoryFetcher {
    payloads: HashMap<String, ComparisonPayload>,
    gate: Option<Arc<Notify>>,
    calls: Mutex<Vec<(RecordId, RecordId)>>,
}

impl InMemoryFetcher {
    pub fn with_payload(self, candidate: &str, payload: ComparisonPayload) -> Self {
        let mut payloads = self.payloads;
        payloads.insert(candidate.to_string(), payload);
        Self { payloads, ..self }
    }

    /// Every fetch waits for one permit on `gate` before answering.
    pub fn with_gate(self, gate: Arc<Notify>) -> Self {
        Self {
            gate: Some(gate),
            ..self
        }
    }

    pub fn calls(&self) -> Vec<(RecordId, RecordId)> {
        self.calls.lock().expect("poisoned").clone()
    }
}

impl ComparisonFetcher for InMemoryFetcher {
    async fn fetch_comparison(
        &self,
        subject: &RecordId,
        candidate: &RecordId,
    ) -> Result<ComparisonPayload, FetchFailure> {
        self.calls
            .lock()
            .expect("poisoned")
            .push((subject.clone(), candidate.clone()));
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.payloads.get(candidate.as_str()).cloned().ok_or_else(|| {
            FetchFailure::with_body("Bad Request", format!("No quote with id {candidate}"))
        })
    }
}

/// Notification sink that keeps everything it receives.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink(Arc<Mutex<Vec<Notification>>>);

impl RecordingSink {
    pub fn messages(&self) -> Vec<String> {
        self.0
            .lock()
            .expect("poisoned")
            .iter()
            .map(|n| n.message.clone())
            .collect()
    }
}

impl NotificationSink for RecordingSink {
    fn notify(&self, notification: Notification) {
        self.0.lock().expect("poisoned").push(notification);
    }
}

pub fn drain<T>(rx: &async_channel::Receiver<T>) -> Vec<T> {
    std::iter::from_fn(|| rx.try_recv().ok()).collect()
}
