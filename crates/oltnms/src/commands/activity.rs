//! Activity log command handlers.

use tabled::Tabled;

use oltnms_core::types::{ActivityLog, ActivityLogFilter, ActivityStats};
use oltnms_core::{PageRequest, view};

use super::Ctx;
use crate::cli::{ActivityArgs, ActivityCommand};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct ActivityRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "When")]
    when: String,
    #[tabled(rename = "User")]
    user: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Entity")]
    entity: String,
    #[tabled(rename = "Description")]
    description: String,
}

impl From<&ActivityLog> for ActivityRow {
    fn from(l: &ActivityLog) -> Self {
        let entity = match l.entity_id {
            Some(id) => format!("{} {id}", l.entity_type),
            None => l.entity_type.clone(),
        };
        Self {
            id: l.id,
            when: output::fmt_time(l.created_at),
            user: l.user.as_ref().map_or_else(|| "-".into(), |u| u.name.clone()),
            kind: l.activity_type.to_string(),
            entity,
            description: l.description.clone(),
        }
    }
}

fn stats_detail(s: &ActivityStats) -> String {
    let mut lines = vec![format!("Last {} days", s.period_days), String::new(), "By type:".into()];
    lines.extend(s.activity_by_type.iter().map(|(kind, n)| format!("  {kind:<12} {n}")));
    lines.push(String::new());
    lines.push("By user:".into());
    lines.extend(
        s.activity_by_user
            .iter()
            .map(|u| format!("  {:<24} {}", format!("{} <{}>", u.name, u.email), u.count)),
    );
    lines.join("\n")
}

pub async fn handle(ctx: &Ctx<'_>, args: ActivityArgs) -> Result<(), CliError> {
    let global = ctx.global;
    match args.command {
        ActivityCommand::List {
            activity_type,
            entity,
            user,
            offset,
            limit,
            search,
        } => {
            let filter = ActivityLogFilter {
                activity_type,
                entity_type: entity,
                user_id: user,
                ..ActivityLogFilter::default()
            };
            let (logs, info) = ctx.nms.activity_logs(filter, PageRequest::new(offset, limit)).await?;
            let logs = view::search(&logs, search.as_deref().unwrap_or(""));
            let out = output::render_list(global.output, &logs, |l: &ActivityLog| ActivityRow::from(l), |l| l.id.to_string())?;
            output::print_output(&out, global.quiet);
            output::print_page_footer(global.output, &info, global.quiet);
            Ok(())
        }

        ActivityCommand::Stats { days } => {
            let stats = ctx.nms.activity_stats(days).await?;
            let out = output::render_single(global.output, &stats, stats_detail, |s| s.period_days.to_string())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
