use super::{Context, format_mean};
use crate::cli::GeneArgs;
use crate::error::{CliError, Result};
use isoscope::core::models::alphafold::base_accession;
use isoscope::core::models::gene::{GeneProteinInfo, IsoformListing};
use isoscope::core::utils::catalog;
use isoscope::workflows::isoforms::isoform_listings;
use serde::Serialize;
use tracing::{debug, info};

#[derive(Debug, Serialize)]
struct GeneReport {
    gene: String,
    primary_accession: Option<String>,
    primary_name: Option<String>,
    uniprot_entries: Vec<EntrySummary>,
    alphafold_models: Vec<IsoformListing>,
}

#[derive(Debug, Serialize)]
struct EntrySummary {
    accession: String,
    name: String,
    length: Option<usize>,
}

/// Official symbol for a gene name, resolving common protein names such as `HER2`.
fn resolve_symbol(name: &str) -> String {
    match catalog::lookup(name) {
        Some(gene) => gene.symbol.to_string(),
        None => name.trim().to_uppercase(),
    }
}

pub async fn run(args: GeneArgs, ctx: &Context) -> Result<()> {
    let symbol = resolve_symbol(&args.name);
    if symbol.is_empty() {
        return Err(CliError::Argument("Gene name must not be empty".to_string()));
    }
    if !symbol.eq_ignore_ascii_case(args.name.trim()) {
        debug!("Resolved '{}' to gene symbol {}", args.name, symbol);
        ctx.progress
            .message(format!("{} is a common name for {}", args.name.trim(), symbol));
    }
    let services = ctx.services()?;

    ctx.progress.phase(format!("Fetching UniProt entries for {}", symbol));
    let info = services.uniprot.gene_proteins(&symbol).await?;
    ctx.progress.finish_phase();

    let Some(primary) = info.primary_accession().map(str::to_string) else {
        return Err(CliError::NotFound(format!(
            "No reviewed UniProt entry for gene {}",
            symbol
        )));
    };

    ctx.progress.phase(format!("Fetching AlphaFold models for {}", primary));
    let models = services.alphafold.predictions(base_accession(&primary)).await?;
    ctx.progress.finish_phase();
    info!("{} AlphaFold model(s) for {}", models.len(), primary);

    let descriptions: Vec<String> = models
        .iter()
        .filter_map(|m| m.uniprot_description.clone())
        .collect();
    let translated = if services.translator.is_enabled() && !descriptions.is_empty() {
        ctx.progress.phase("Translating descriptions");
        let map = services
            .translator
            .translate_all(&descriptions, ctx.cancellation.clone())
            .await?;
        ctx.progress.finish_phase();
        map
    } else {
        Default::default()
    };

    let report = build_report(&symbol, &info, isoform_listings(models, &translated));
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report).map_err(anyhow::Error::from)?);
    } else {
        print!("{}", render(&report));
    }
    Ok(())
}

fn build_report(symbol: &str, info: &GeneProteinInfo, models: Vec<IsoformListing>) -> GeneReport {
    GeneReport {
        gene: symbol.to_string(),
        primary_accession: info.primary_accession().map(str::to_string),
        primary_name: info.primary_isoform.as_ref().map(|e| e.full_name()),
        uniprot_entries: info
            .isoforms
            .iter()
            .filter_map(|e| {
                Some(EntrySummary {
                    accession: e.accession()?.to_string(),
                    name: e.full_name(),
                    length: e.sequence_length(),
                })
            })
            .collect(),
        alphafold_models: models,
    }
}

fn render(report: &GeneReport) -> String {
    let mut out = format!(
        "Gene {}: primary isoform {} ({})\n",
        report.gene,
        report.primary_accession.as_deref().unwrap_or("-"),
        report.primary_name.as_deref().unwrap_or("unnamed")
    );
    out.push_str(&format!(
        "\nReviewed UniProt entries ({}):\n",
        report.uniprot_entries.len()
    ));
    for e in &report.uniprot_entries {
        out.push_str(&format!(
            "  {:<10} {:>6} aa  {}\n",
            e.accession,
            e.length.map(|l| l.to_string()).unwrap_or_else(|| "?".into()),
            e.name
        ));
    }

    if report.alphafold_models.is_empty() {
        out.push_str("\nNo AlphaFold model available.\n");
        return out;
    }
    out.push_str(&format!(
        "\nAlphaFold models ({}):\n",
        report.alphafold_models.len()
    ));
    for m in &report.alphafold_models {
        out.push_str(&format!(
            "  {:<12} {:>6} aa  pLDDT {:>5}  {}\n",
            m.entry.uniprot_accession,
            m.entry
                .sequence_length()
                .map(|l| l.to_string())
                .unwrap_or_else(|| "?".into()),
            format_mean(m.entry.global_metric_value),
            m.description.as_deref().unwrap_or("")
        ));
    }
    out
}
