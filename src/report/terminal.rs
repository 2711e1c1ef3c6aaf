use anyhow::Result;
use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use crate::models::{RiskLabel, Verdict};
use crate::pipeline::Analysis;

/// Render a colored terminal report.
pub fn render(analysis: &Analysis, verbose: bool, quiet: bool) -> Result<()> {
    let report = &analysis.report;
    let total = report.assessments.len();
    let low = report.count(RiskLabel::Low);
    let moderate = report.count(RiskLabel::Moderate);
    let high = report.count(RiskLabel::High);

    if quiet {
        println!(
            "Total: {}  Low: {}  Moderate: {}  High: {}  Verdict: {}",
            total,
            low.to_string().green(),
            moderate.to_string().yellow(),
            high.to_string().red(),
            verdict_colored(report.verdict),
        );
        return Ok(());
    }

    println!(
        "\n {} v{}",
        "chemcheck".bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!(" Keyword table: {}\n", analysis.keyword_version);

    println!(" ┌────────────────────────────────────────────────────┐");
    println!(" │  {:<48} │", "SUMMARY".bold());
    println!(" │  {:<48} │", format!("Ingredients        : {}", total));
    println!(
        " │  {:<48} │",
        format!("{}  Low risk        : {:>4}", "✓".green(), low)
    );
    println!(
        " │  {:<48} │",
        format!("{}  Moderate risk   : {:>4}", "⚠".yellow(), moderate)
    );
    println!(
        " │  {:<48} │",
        format!("{}  High risk       : {:>4}", "✗".red(), high)
    );
    println!(" └────────────────────────────────────────────────────┘\n");

    if verbose {
        println!(" {} Normalized ingredients:\n", "[INFO]".cyan().bold());
        println!("   {}\n", analysis.ingredients.join(", "));
    }

    render_table(analysis);
    println!();

    match report.verdict {
        Verdict::Unsafe => println!(" {} {}", "⚠".red().bold(), report.closing.red().bold()),
        Verdict::Safe => println!(" {} {}", "✓".green().bold(), report.closing.green()),
    }

    Ok(())
}

fn render_table(analysis: &Analysis) {
    let with_compounds = !analysis.compounds.is_empty();

    let mut header = vec![
        Cell::new("Ingredient").add_attribute(Attribute::Bold),
        Cell::new("Matched").add_attribute(Attribute::Bold),
        Cell::new("Score").add_attribute(Attribute::Bold),
        Cell::new("Risk").add_attribute(Attribute::Bold),
    ];
    if with_compounds {
        header.push(Cell::new("Formula").add_attribute(Attribute::Bold));
        header.push(Cell::new("PubChem CID").add_attribute(Attribute::Bold));
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);

    for a in &analysis.report.assessments {
        let (risk_str, risk_color) = match a.risk_label {
            RiskLabel::Low => ("✓ low", Color::Green),
            RiskLabel::Moderate => ("⚠ moderate", Color::Yellow),
            RiskLabel::High => ("✗ high", Color::Red),
        };

        let mut row = vec![
            Cell::new(&a.ingredient),
            Cell::new(a.matched_keyword.as_deref().unwrap_or("—")).fg(Color::DarkGrey),
            Cell::new(format!("{:.1}", a.toxicity_score)).set_alignment(CellAlignment::Right),
            Cell::new(risk_str)
                .fg(risk_color)
                .set_alignment(CellAlignment::Center),
        ];

        if with_compounds {
            let compound = analysis.compounds.get(&a.ingredient);
            row.push(Cell::new(
                compound
                    .and_then(|c| c.molecular_formula.as_deref())
                    .unwrap_or("—"),
            ));
            row.push(Cell::new(
                compound
                    .map(|c| c.cid.to_string())
                    .unwrap_or_else(|| "—".to_string()),
            ));
        }

        table.add_row(row);
    }

    println!("{}", table);
}

fn verdict_colored(verdict: Verdict) -> ColoredString {
    match verdict {
        Verdict::Safe => verdict.to_string().green(),
        Verdict::Unsafe => verdict.to_string().red().bold(),
    }
}
