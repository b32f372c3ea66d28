use std::{collections::HashMap, sync::Arc, time::Instant};

use anyhow::{Context, Result};
use quote_comparator::prelude::*;
use serde_json::json;
use tracing::info;
use tracing_subscriber::EnvFilter;

const SUBJECT_ID: &str = "0Q0000000000001";
const CANDIDATE_ID: &str = "0Q0000000000002";

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = ComparatorConfig::from_env().context("Invalid QUOTE_COMPARE_* environment")?;
    info!(
        currency = %config.currency().code,
        time_zone = %config.locale().time_zone,
        timeout = ?config.fetch_timeout(),
        "Comparator configured"
    );

    let backend = Arc::new(DemoBackend::new()?);
    let (toasts_tx, toasts) = async_channel::unbounded();
    let (mut controller, signals) =
        ComparisonController::new(SUBJECT_ID, Arc::clone(&backend), toasts_tx, config);
    controller.load_subject(backend.as_ref()).await;

    // A mistaken first attempt, then the real comparison.
    let (events, events_rx) = async_channel::unbounded();
    events.send(UserEvent::Select(SUBJECT_ID.into())).await?;
    events.send(UserEvent::Compare).await?;
    events.send(UserEvent::Select(CANDIDATE_ID.into())).await?;
    events.send(UserEvent::Compare).await?;

    let (driver, mut views) = ViewDriver::new(controller, events_rx);
    let started = Instant::now();
    let handle = tokio::spawn(driver.run());

    let view = views
        .wait_for(|v| v.show_comparison())
        .await
        .context("View driver stopped before the comparison arrived")?
        .clone();
    info!(elapsed = ?started.elapsed(), "Comparison ready");

    print_view(&view);

    events.send(UserEvent::Close).await?;
    let controller = handle.await?;

    println!("\n--- Notifications ---");
    while let Ok(toast) = toasts.try_recv() {
        println!("[{}] {}: {}", toast.severity, toast.title, toast.message);
    }
    println!("\n--- Signals ---");
    while let Ok(signal) = signals.try_recv() {
        println!("{signal:?}");
    }
    println!("\nFinal status: {}", controller.status());

    Ok(())
}

// ================================================================================================
// Tracing Configuration
// ================================================================================================

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

// ================================================================================================
// Rendering
// ================================================================================================

fn print_view(view: &ComparisonView) {
    let subject = if view.subject_number.is_empty() {
        view.subject_name.clone()
    } else {
        format!("{} ({})", view.subject_name, view.subject_number)
    };
    println!("\n{subject} vs. {}", view.comparison_label);

    for section in &view.sections {
        println!("\n=== {} ===", section.object_label);
        print_rows(
            &view.quote1_name,
            &view.quote2_name,
            section.quote1_fields(),
            section.quote2_fields(),
        );

        let children = section
            .quote1_children()
            .len()
            .max(section.quote2_children().len());
        for i in 0..children {
            println!("  -- #{} --", i + 1);
            let left = section.quote1_children().get(i);
            let right = section.quote2_children().get(i);
            print_rows(
                &view.quote1_name,
                &view.quote2_name,
                left.map_or(&[][..], |c| c.fields_with_values.as_slice()),
                right.map_or(&[][..], |c| c.fields_with_values.as_slice()),
            );
        }
    }
}

fn print_rows(left_name: &str, right_name: &str, left: &[RenderedField], right: &[RenderedField]) {
    if left.is_empty() && right.is_empty() {
        return;
    }
    println!("  {:<20} {:<24} {:<24}", "", left_name, right_name);
    for i in 0..left.len().max(right.len()) {
        let label = left.get(i).or(right.get(i)).map_or("", |f| f.label.as_str());
        let l = left.get(i).map_or("", |f| f.formatted_value.as_str());
        let r = right.get(i).map_or("", |f| f.formatted_value.as_str());
        println!("  {label:<20} {l:<24} {r:<24}");
    }
}

// ================================================================================================
// In-Memory Backend
// ================================================================================================

struct DemoBackend {
    comparisons: HashMap<String, ComparisonPayload>,
}

impl DemoBackend {
    fn new() -> Result<Self> {
        let payload = json!({
            "sectionOrder": ["Quote", "QuoteLineItem"],
            "quote1Data": {
                "Quote": {
                    "objectLabel": "Quote",
                    "record": {
                        "Name": "Acme Renewal",
                        "GrandTotal": 1500.5,
                        "ExpirationDate": "2024-03-15",
                        "LastModifiedDate": "2024-03-15T14:30:05.000+0000",
                        "Discount": 5
                    },
                    "fields": [
                        { "apiName": "Name", "label": "Quote Name", "type": "string" },
                        { "apiName": "GrandTotal", "label": "Grand Total", "type": "currency" },
                        { "apiName": "Discount", "label": "Discount", "type": "percent" },
                        { "apiName": "ExpirationDate", "label": "Expires", "type": "date" },
                        { "apiName": "LastModifiedDate", "label": "Last Modified", "type": "datetime" }
                    ]
                },
                "QuoteLineItem": {
                    "objectLabel": "Quote Line Item",
                    "fields": [
                        { "apiName": "Product2Id", "label": "Product ID", "type": "reference" },
                        { "apiName": "Quantity", "label": "Quantity", "type": "double" },
                        { "apiName": "TotalPrice", "label": "Total Price", "type": "currency" }
                    ],
                    "childRecords": [
                        { "record": { "Product2Id": "01t001", "Product2": { "Name": "Widget Pro" }, "Quantity": 3, "TotalPrice": 1500.5 } }
                    ]
                }
            },
            "quote2Data": {
                "Quote": {
                    "objectLabel": "Quote",
                    "record": {
                        "Name": "Acme Renewal (Discounted)",
                        "GrandTotal": 1350.45,
                        "ExpirationDate": "2024-04-01",
                        "LastModifiedDate": "2024-03-20T09:12:00.000+0000",
                        "Discount": 15
                    }
                },
                "QuoteLineItem": {
                    "objectLabel": "Quote Line Item",
                    "childRecords": [
                        { "record": { "Product2Id": "01t001", "Product2": { "Name": "Widget Pro" }, "Quantity": 3, "TotalPrice": 1275.43 } },
                        { "record": { "Product2Id": "01t009", "Product2": { "Name": "Support Plan" }, "Quantity": 1, "TotalPrice": 75.02 } }
                    ]
                }
            }
        });

        let payload = ComparisonPayload::from_json(&payload.to_string())?;
        Ok(Self {
            comparisons: HashMap::from([(CANDIDATE_ID.to_string(), payload)]),
        })
    }
}

impl ComparisonFetcher for DemoBackend {
    async fn fetch_comparison(
        &self,
        _subject: &RecordId,
        candidate: &RecordId,
    ) -> Result<ComparisonPayload, FetchFailure> {
        tokio::time::sleep(std::time::Duration::from_millis(150)).await;
        self.comparisons
            .get(candidate.as_str())
            .cloned()
            .ok_or_else(|| FetchFailure::new(format!("Quote {candidate} not found")))
    }
}

impl SubjectLookup for DemoBackend {
    async fn lookup(
        &self,
        id: &RecordId,
        _fields: &[&str],
    ) -> Result<RawRecord, FetchFailure> {
        let record = json!({ "Id": id.as_str(), "Name": "Acme Renewal", "QuoteNumber": "00000042" });
        match record {
            serde_json::Value::Object(map) => Ok(map),
            _ => Err(FetchFailure::new("Subject record is not an object")),
        }
    }
}
