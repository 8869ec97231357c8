//! `minv status` command - Connection check and table statistics

use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::Session;
use crate::cli::{GlobalOpts, OutputFormat};

#[derive(clap::Args, Debug)]
pub struct StatusArgs {
    /// Only list the schema's table names
    #[arg(long)]
    pub tables: bool,
}

pub fn run(args: StatusArgs, global: &GlobalOpts) -> Result<()> {
    let session = Session::open(global)?;
    let format = session.format(global);
    let db = &session.db;

    let table_names = db.table_names()?;

    if args.tables {
        match format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&table_names).into_diagnostic()?)
            }
            OutputFormat::Yaml => print!("{}", serde_yml::to_string(&table_names).into_diagnostic()?),
            _ => {
                for name in &table_names {
                    println!("{}", name);
                }
            }
        }
        return session.close();
    }

    let stats = db.statistics()?;
    let low_stock = db
        .list_materials()?
        .iter()
        .filter(|m| m.below_minimum())
        .count();

    match format {
        OutputFormat::Json | OutputFormat::Yaml => {
            let status = serde_json::json!({
                "path": stats.path,
                "schema_version": stats.schema_version,
                "tables": table_names,
                "row_counts": stats.tables,
                "total_rows": stats.total_rows(),
                "db_size_bytes": stats.db_size_bytes,
                "low_stock_materials": low_stock,
            });
            if format == OutputFormat::Json {
                println!("{}", serde_json::to_string_pretty(&status).into_diagnostic()?);
            } else {
                print!("{}", serde_yml::to_string(&status).into_diagnostic()?);
            }
        }
        _ => {
            let location = stats
                .path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| ":memory:".to_string());

            println!("{}", style("Inventory Database").bold().underlined());
            println!();
            println!("{} Connected to {}", style("✓").green(), style(location).cyan());
            println!("  Schema version: {}", stats.schema_version);
            if let Some(size) = stats.db_size_bytes {
                println!("  File size:      {:.1} KB", size as f64 / 1024.0);
            }
            println!();

            println!("{:<20} {:>8}", style("TABLE").bold(), style("ROWS").bold());
            println!("{}", "-".repeat(29));
            for count in &stats.tables {
                println!("{:<20} {:>8}", count.table, count.rows);
            }
            println!("{}", "-".repeat(29));
            println!("{:<20} {:>8}", style("total").dim(), stats.total_rows());

            if low_stock > 0 {
                println!();
                println!(
                    "{} {} material(s) below minimum stock (see {})",
                    style("!").yellow(),
                    low_stock,
                    style("minv mat list --low-stock").yellow()
                );
            }
        }
    }

    session.close()
}
