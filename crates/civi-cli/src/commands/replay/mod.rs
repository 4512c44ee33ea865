mod dry_run;
mod sink;

use std::sync::{Arc, Mutex, PoisonError};

use anyhow::Context;
use async_trait::async_trait;
use civi_api::{ApiRequest, CrmApi};
use civi_core::{Operation, Origin, SyncEvent};
use civi_resolver::ResolverSet;
use civi_sync::{
    BridgeOutcome, DispatchReport, MappingBridge, PostUpdate, SyncBus, SyncError, SyncObserver,
    SyncPass,
};
use serde::Serialize;
use serde_json::Value;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::ReplayArgs;
use crate::context::AppContext;
use crate::output::output;

use dry_run::DryRunCrm;
use sink::PreviewSink;

/// Runs the bridge for each event and keeps what it did.
struct RecordingBridge {
    bridge: MappingBridge,
    last: Mutex<Option<BridgeOutcome>>,
}

impl RecordingBridge {
    fn take_outcome(&self) -> Option<BridgeOutcome> {
        self.last.lock().unwrap_or_else(PoisonError::into_inner).take()
    }
}

#[async_trait]
impl SyncObserver for RecordingBridge {
    fn name(&self) -> &str {
        "mapping-bridge"
    }

    async fn on_event(&self, event: &SyncEvent, pass: &mut SyncPass) -> Result<(), SyncError> {
        let outcome = self.bridge.handle(event, pass).await?;
        *self.last.lock().unwrap_or_else(PoisonError::into_inner) = Some(outcome);
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct ReplayRow {
    entity: String,
    record_id: i64,
    operation: Operation,
    origin: Origin,
    outcome: Option<BridgeOutcome>,
    error: Option<String>,
}

#[derive(Debug, Serialize)]
struct ReplayResponse {
    events: Vec<ReplayRow>,
    post_updates: Vec<PostUpdate>,
    /// Writes held back by `--dry-run`.
    #[serde(skip_serializing_if = "Option::is_none")]
    crm_writes: Option<Vec<ApiRequest>>,
}

/// Handle `civibridge replay`.
pub async fn handle(args: &ReplayArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let raw = std::fs::read_to_string(&args.file)
        .with_context(|| format!("failed to read event file {}", args.file))?;
    let events = parse_events(&raw).with_context(|| format!("invalid event file {}", args.file))?;

    let dry_run = args.dry_run.then(|| Arc::new(DryRunCrm::new(Arc::clone(&ctx.api))));
    let api: Arc<dyn CrmApi> = match &dry_run {
        Some(dry) => dry.clone(),
        None => Arc::clone(&ctx.api),
    };
    let resolvers = ResolverSet::load(ctx.store.clone(), api).await?;

    let sink = Arc::new(PreviewSink::new(args.fields.clone()));
    let observer = Arc::new(RecordingBridge {
        bridge: MappingBridge::new(resolvers, sink.clone(), ctx.config.sync.clone()),
        last: Mutex::new(None),
    });
    let bus = SyncBus::new();
    bus.subscribe(observer.clone());

    let mut rows = Vec::with_capacity(events.len());
    for event in &events {
        let report = bus.publish(event).await;
        rows.push(row(event, observer.take_outcome(), &report));
    }

    output(
        &ReplayResponse {
            events: rows,
            post_updates: sink.take_updates(),
            crm_writes: dry_run.map(|dry| dry.take_writes()),
        },
        flags.format,
    )
}

/// One event object, or an array of them.
fn parse_events(raw: &str) -> anyhow::Result<Vec<SyncEvent>> {
    let value: Value = serde_json::from_str(raw)?;
    let events = match value {
        Value::Array(items) => items
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<SyncEvent>, _>>()?,
        single => vec![serde_json::from_value(single)?],
    };
    Ok(events)
}

fn row(event: &SyncEvent, outcome: Option<BridgeOutcome>, report: &DispatchReport) -> ReplayRow {
    ReplayRow {
        entity: event.entity.clone(),
        record_id: event.record_id,
        operation: event.operation,
        origin: event.origin,
        outcome,
        error: report
            .failures
            .first()
            .map(|failure| failure.error.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use civi_core::{Operation, Origin};

    use super::parse_events;

    #[test]
    fn accepts_single_event_or_array() {
        let single = r#"{"entity": "Activity", "record_id": 3, "operation": "edit", "origin": "crm",
                         "after": {"activity_type_id": 5}}"#;
        let events = parse_events(single).expect("single event parses");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].origin, Origin::Crm);

        let many = r#"[
            {"entity": "Activity", "record_id": 3, "operation": "create", "origin": "crm"},
            {"entity": "Case", "record_id": 9, "operation": "delete", "origin": "post"}
        ]"#;
        let events = parse_events(many).expect("array parses");
        assert_eq!(events[1].operation, Operation::Delete);
    }

    #[test]
    fn rejects_unknown_operation() {
        let bad = r#"{"entity": "Activity", "record_id": 3, "operation": "merge", "origin": "crm"}"#;
        assert!(parse_events(bad).is_err());
    }
}
