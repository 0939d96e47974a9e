use super::Context;
use crate::cli::SearchArgs;
use crate::error::{CliError, Result};
use isoscope::core::models::gene::GeneSearchResult;
use isoscope::core::utils::catalog;
use isoscope::workflows::search::MIN_QUERY_LENGTH;
use tracing::info;

pub async fn run(args: SearchArgs, ctx: &Context) -> Result<()> {
    let query = args.query.trim();
    if query.chars().count() < MIN_QUERY_LENGTH {
        return Err(CliError::Argument(format!(
            "Search query must have at least {} characters",
            MIN_QUERY_LENGTH
        )));
    }
    let limit = args.limit.unwrap_or(ctx.config.search.limit);
    let services = ctx.services()?;

    ctx.progress.phase(format!("Searching UniProt for genes starting with '{}'", query));
    let suggestions = services.uniprot.suggest_genes(query, limit).await?;
    ctx.progress.finish_phase();
    info!("{} suggestion(s) for '{}'", suggestions.len(), query);

    print!("{}", render(query, &suggestions));
    if let Some(gene) = catalog::lookup(query).filter(|g| !g.symbol.eq_ignore_ascii_case(query)) {
        println!(
            "Note: {} is a common name for {} ({}).",
            query.to_uppercase(),
            gene.symbol,
            gene.uniprot_accession
        );
    }
    Ok(())
}

fn render(query: &str, suggestions: &[GeneSearchResult]) -> String {
    if suggestions.is_empty() {
        return format!("No gene found starting with '{}'.\n", query);
    }
    let width = suggestions
        .iter()
        .map(|s| s.gene_name.len())
        .max()
        .unwrap_or(0);
    suggestions
        .iter()
        .map(|s| {
            format!(
                "{:<width$}  {:<10}  {}\n",
                s.gene_name,
                s.uniprot_id.as_deref().unwrap_or("-"),
                s.description,
                width = width
            )
        })
        .collect()
}
