use civi_core::{EntityTypeId, RecordCount};
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::CountArgs;
use crate::commands::shared::parse::parse_kind;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct CountResponse {
    kind: &'static str,
    id: EntityTypeId,
    status: &'static str,
    count: Option<u64>,
}

impl CountResponse {
    fn new(kind: &'static str, id: EntityTypeId, count: RecordCount) -> Self {
        let (status, count) = match count {
            RecordCount::Known(n) => ("known", Some(n)),
            RecordCount::Unknown => ("unknown", None),
        };
        Self {
            kind,
            id,
            status,
            count,
        }
    }
}

/// Handle `civibridge count`. A failed CRM call prints `unknown`, not zero.
pub async fn handle(args: &CountArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    ctx.require_crm()?;
    let kind = parse_kind(&args.kind)?;
    let id = EntityTypeId(args.id);
    let count = ctx.resolvers.get(kind).count(id).await;
    output(&CountResponse::new(kind.as_str(), id, count), flags.format)
}

#[cfg(test)]
mod tests {
    use civi_core::{EntityTypeId, RecordCount};
    use serde_json::json;

    use super::CountResponse;

    #[test]
    fn unknown_count_is_not_zero() {
        let response = CountResponse::new("activity_type", EntityTypeId(5), RecordCount::Unknown);
        let value = serde_json::to_value(response).expect("serializes");
        assert_eq!(value["status"], "unknown");
        assert_eq!(value["count"], json!(null));
    }

    #[test]
    fn known_count_carries_value() {
        let response = CountResponse::new("activity_type", EntityTypeId(5), RecordCount::Known(7));
        let value = serde_json::to_value(response).expect("serializes");
        assert_eq!(value["count"], 7);
    }
}
