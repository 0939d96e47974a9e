use crate::error::Result;
use isoscope::core::utils::catalog;

pub fn run() -> Result<()> {
    println!("Showcase genes:");
    for gene in catalog::showcase() {
        println!("  {:<7} {:<7} {}", gene.symbol, gene.uniprot_accession, gene.description);
        println!("                  Diseases: {}", gene.diseases.join(", "));
    }
    Ok(())
}
