use anyhow::Context;
use civi_core::{EntityTypeId, PostType};
use civi_resolver::RequestCache;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::ChoicesArgs;
use crate::commands::shared::parse::parse_kind;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct ChoiceRow {
    id: EntityTypeId,
    label: String,
    post_type: Option<PostType>,
}

#[derive(Debug, Serialize)]
struct ChoicesResponse {
    kind: &'static str,
    choices: Vec<ChoiceRow>,
}

/// Handle `civibridge choices`.
pub async fn handle(args: &ChoicesArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    ctx.require_crm()?;
    let kind = parse_kind(&args.kind)?;
    let resolver = ctx.resolvers.get(kind);

    let choices = resolver
        .choices_for_select(&mut RequestCache::new())
        .await
        .with_context(|| format!("failed to fetch {kind} choices"))?;

    let choices = choices
        .into_iter()
        .map(|choice| ChoiceRow {
            post_type: resolver.is_mapped(choice.id).cloned(),
            id: choice.id,
            label: choice.label,
        })
        .collect();

    output(
        &ChoicesResponse {
            kind: kind.as_str(),
            choices,
        },
        flags.format,
    )
}
