//! `minv link` command - Bill-of-materials rows (product/material junction)

use clap::Subcommand;
use console::style;
use miette::Result;
use tracing::info;

use crate::cli::forms::confirm_delete;
use crate::cli::helpers::Session;
use crate::cli::table::{
    print_records, CellValue, ColumnDef, TableConfig, TableFormatter, TableRow,
};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::Database;
use crate::entities::{ProductMaterial, Usage};

#[derive(Subcommand, Debug)]
pub enum LinkCommands {
    /// List bill-of-materials rows
    List(ListArgs),

    /// Record that a product consumes a material
    Add(LinkArgs),

    /// Change the quantity a product needs of a material
    Set(LinkArgs),

    /// Remove a bill-of-materials row
    Remove(RemoveArgs),
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Only rows for this product
    #[arg(long, short = 'p')]
    pub product: Option<String>,

    /// Only rows for this material
    #[arg(long, short = 'm')]
    pub material: Option<String>,

    /// Show only count
    #[arg(long)]
    pub count: bool,
}

#[derive(clap::Args, Debug)]
pub struct LinkArgs {
    /// Product name
    pub product: String,

    /// Material name
    pub material: String,

    /// Material quantity per product unit
    pub qty: f64,
}

#[derive(clap::Args, Debug)]
pub struct RemoveArgs {
    /// Product name
    pub product: String,

    /// Material name
    pub material: String,

    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

const LINK_COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("product", "PRODUCT", 32),
    ColumnDef::new("material", "MATERIAL", 32),
    ColumnDef::new("qty", "QTY NEEDED", 12),
];

/// Run a link subcommand
pub fn run(cmd: LinkCommands, global: &GlobalOpts) -> Result<()> {
    let session = Session::open(global)?;
    let format = session.format(global);

    match cmd {
        LinkCommands::List(args) => run_list(&session.db, args, format, global.quiet)?,
        LinkCommands::Add(args) => run_add(&session.db, args, global)?,
        LinkCommands::Set(args) => run_set(&session.db, args, global)?,
        LinkCommands::Remove(args) => run_remove(&session.db, args, global)?,
    }

    session.close()
}

fn run_list(db: &Database, args: ListArgs, format: OutputFormat, quiet: bool) -> Result<()> {
    let links: Vec<ProductMaterial> = db
        .list_links()?
        .into_iter()
        .filter(|l| args.product.as_ref().map_or(true, |p| &l.product == p))
        .filter(|l| args.material.as_ref().map_or(true, |m| &l.material == m))
        .collect();

    if args.count {
        println!("{}", links.len());
        return Ok(());
    }

    if links.is_empty() && !matches!(format, OutputFormat::Json | OutputFormat::Yaml) {
        println!("No links found.");
        return Ok(());
    }

    let rows: Vec<TableRow> = links
        .iter()
        .map(|l| {
            TableRow::new(format!("{}/{}", l.product, l.material))
                .cell("product", CellValue::Key(l.product.clone()))
                .cell("material", CellValue::Text(l.material.clone()))
                .cell("qty", CellValue::Number(l.qty_needed))
        })
        .collect();

    let formatter =
        TableFormatter::new(LINK_COLUMNS, "link").with_config(TableConfig::for_output(quiet));
    print_records(&links, &rows, &formatter, format, &["product", "material", "qty"])
}

fn run_add(db: &Database, args: LinkArgs, global: &GlobalOpts) -> Result<()> {
    let link = ProductMaterial::new(args.product, args.material, args.qty);
    db.insert_link(&link)?;
    info!(product = %link.product, material = %link.material, "link created");

    if !global.quiet {
        println!(
            "{} {} now uses {} of {}",
            style("✓").green(),
            style(&link.product).cyan(),
            link.qty_needed,
            style(&link.material).cyan()
        );
    }
    Ok(())
}

fn run_set(db: &Database, args: LinkArgs, global: &GlobalOpts) -> Result<()> {
    let link = ProductMaterial::new(args.product, args.material, args.qty);
    db.update_link(&link)?;
    info!(product = %link.product, material = %link.material, "link updated");

    if !global.quiet {
        println!(
            "{} {} now uses {} of {}",
            style("✓").green(),
            style(&link.product).cyan(),
            link.qty_needed,
            style(&link.material).cyan()
        );
    }
    Ok(())
}

fn run_remove(db: &Database, args: RemoveArgs, global: &GlobalOpts) -> Result<()> {
    let what = format!("link {} -> {}", args.product, args.material);
    if !confirm_delete(&what, args.yes)? {
        println!("Cancelled.");
        return Ok(());
    }

    db.delete_link(&args.product, &args.material)?;
    info!(product = %args.product, material = %args.material, "link removed");

    if !global.quiet {
        println!("{} Removed {}", style("✓").green(), what);
    }
    Ok(())
}

/// Render one side of a junction lookup (products of a material or materials of a product)
pub fn print_usage(
    usages: &[Usage],
    header: &'static str,
    noun: &'static str,
    format: OutputFormat,
) -> Result<()> {
    if usages.is_empty() && !matches!(format, OutputFormat::Json | OutputFormat::Yaml) {
        println!("No {}s found.", noun);
        return Ok(());
    }

    let columns = [
        ColumnDef::new("name", header, 40),
        ColumnDef::new("qty", "QTY PER UNIT", 12),
    ];
    let rows: Vec<TableRow> = usages
        .iter()
        .map(|u| {
            TableRow::new(&u.name)
                .cell("name", CellValue::Key(u.name.clone()))
                .cell("qty", CellValue::Number(u.qty_needed))
        })
        .collect();

    let formatter = TableFormatter::new(&columns, noun);
    print_records(usages, &rows, &formatter, format, &["name", "qty"])
}
