use crate::args::SummaryArgs;
use crate::commands::Out;
use crate::report::{group_totals, Dimension, Totals};
use crate::{pipeline, Config, Result};
use serde::Serialize;

/// Totals for one value of the grouping dimension.
#[derive(Debug, Clone, Serialize)]
pub struct Group {
    pub key: String,
    pub totals: Totals,
}

/// The headline totals of the filtered ledger, and per group when a dimension was requested.
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub totals: Totals,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub by: Option<Dimension>,
    pub groups: Vec<Group>,
}

/// Builds the ledger, applies the filters in `args` and computes the totals.
pub async fn summary(config: Config, args: SummaryArgs) -> Result<Out<Summary>> {
    let ledger = pipeline::run(&config).await?;
    let filter = args.filter();
    let records = ledger.filter(&filter);

    let totals = Totals::from_records(records.iter().copied());
    let groups: Vec<Group> = match args.by() {
        Some(dimension) => group_totals(records.iter().copied(), dimension)
            .into_iter()
            .map(|(key, totals)| Group { key, totals })
            .collect(),
        None => Vec::new(),
    };

    let mut message = format!("Summary of {} records\n\n{totals}", records.len());
    if let Some(dimension) = args.by() {
        for group in &groups {
            let key = if group.key.is_empty() {
                "(none)"
            } else {
                group.key.as_str()
            };
            message.push_str(&format!("\n\n{dimension}: {key}\n{}", group.totals));
        }
    }

    Ok(Out::new(
        message,
        Summary {
            totals,
            by: args.by(),
            groups,
        },
    ))
}
