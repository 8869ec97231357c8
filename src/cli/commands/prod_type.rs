//! `minv prod-type` command - Product types and their coefficient

use clap::Subcommand;
use console::style;
use miette::Result;
use tracing::info;

use crate::cli::forms::{confirm_delete, Form};
use crate::cli::helpers::{format_number, Session};
use crate::cli::table::{
    print_records, CellValue, ColumnDef, TableConfig, TableFormatter, TableRow,
};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::{Database, StoreError};
use crate::entities::ProductType;

#[derive(Subcommand, Debug)]
pub enum ProdTypeCommands {
    /// List product types
    List(ListArgs),

    /// Create a product type
    New(NewArgs),

    /// Change a product type's coefficient (or rename it)
    Edit(EditArgs),

    /// Delete a product type no product uses
    Delete(DeleteArgs),
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Show only count
    #[arg(long)]
    pub count: bool,
}

#[derive(clap::Args, Debug)]
pub struct NewArgs {
    /// Type name
    pub name: Option<String>,

    /// Material multiplier applied per product unit
    #[arg(long, short = 'c')]
    pub coef: Option<f64>,

    /// Interactive mode (prompt for fields)
    #[arg(long, short = 'i')]
    pub interactive: bool,
}

#[derive(clap::Args, Debug)]
pub struct EditArgs {
    /// Current type name
    pub name: String,

    /// New name (products of this type follow the rename)
    #[arg(long)]
    pub rename: Option<String>,

    /// Material multiplier applied per product unit
    #[arg(long, short = 'c')]
    pub coef: Option<f64>,

    /// Interactive mode (prompt for every field)
    #[arg(long, short = 'i')]
    pub interactive: bool,
}

#[derive(clap::Args, Debug)]
pub struct DeleteArgs {
    /// Type name
    pub name: String,

    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

const COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("name", "NAME", 32),
    ColumnDef::new("coef", "COEFFICIENT", 12),
];

/// Run a product type subcommand
pub fn run(cmd: ProdTypeCommands, global: &GlobalOpts) -> Result<()> {
    let session = Session::open(global)?;
    let format = session.format(global);

    match cmd {
        ProdTypeCommands::List(args) => run_list(&session.db, args, format, global.quiet)?,
        ProdTypeCommands::New(args) => run_new(&session.db, args, global)?,
        ProdTypeCommands::Edit(args) => run_edit(&session.db, args, global)?,
        ProdTypeCommands::Delete(args) => run_delete(&session.db, args, global)?,
    }

    session.close()
}

fn run_list(db: &Database, args: ListArgs, format: OutputFormat, quiet: bool) -> Result<()> {
    let types = db.list_product_types()?;

    if args.count {
        println!("{}", types.len());
        return Ok(());
    }

    if types.is_empty() && !matches!(format, OutputFormat::Json | OutputFormat::Yaml) {
        println!("No product types found.");
        return Ok(());
    }

    let rows: Vec<TableRow> = types
        .iter()
        .map(|t| {
            TableRow::new(&t.name)
                .cell("name", CellValue::Key(t.name.clone()))
                .cell("coef", CellValue::Number(t.coefficient))
        })
        .collect();

    let formatter =
        TableFormatter::new(COLUMNS, "product type").with_config(TableConfig::for_output(quiet));
    print_records(&types, &rows, &formatter, format, &["name", "coef"])
}

fn find(db: &Database, name: &str) -> Result<ProductType> {
    let coefficient = db
        .product_type_coefficient(name)?
        .ok_or_else(|| StoreError::NotFound {
            kind: "product type",
            key: name.to_string(),
        })?;
    Ok(ProductType::new(name, coefficient))
}

fn run_new(db: &Database, args: NewArgs, global: &GlobalOpts) -> Result<()> {
    let product_type = if args.interactive {
        let form = Form::new();
        form.title("New product type");
        ProductType::new(
            form.text("Name", args.name.as_deref().unwrap_or(""))?,
            form.number("Coefficient", args.coef.unwrap_or(1.0), true)?,
        )
    } else {
        let name = args.name.ok_or_else(|| {
            miette::miette!(
                help = "pass the type name, or use --interactive",
                "product type name is required"
            )
        })?;
        ProductType::new(name, args.coef.unwrap_or(1.0))
    };

    db.insert_product_type(&product_type)?;
    info!(product_type = %product_type.name, "product type created");

    if !global.quiet {
        println!(
            "{} Created product type {} (coefficient {})",
            style("✓").green(),
            style(&product_type.name).cyan(),
            format_number(product_type.coefficient)
        );
    }
    Ok(())
}

fn run_edit(db: &Database, args: EditArgs, global: &GlobalOpts) -> Result<()> {
    let current = find(db, &args.name)?;

    let updated = if args.interactive {
        let form = Form::new();
        form.title(&format!("Edit product type '{}'", current.name));
        ProductType::new(
            form.text("Name", &current.name)?,
            form.number("Coefficient", current.coefficient, true)?,
        )
    } else {
        ProductType::new(
            args.rename.unwrap_or_else(|| current.name.clone()),
            args.coef.unwrap_or(current.coefficient),
        )
    };

    if updated == current {
        if !global.quiet {
            println!("No changes to product type {}", style(&current.name).cyan());
        }
        return Ok(());
    }

    db.update_product_type(&current.name, &updated)?;
    info!(product_type = %current.name, "product type updated");

    if !global.quiet {
        println!(
            "{} Updated product type {}",
            style("✓").green(),
            style(&updated.name).cyan()
        );
    }
    Ok(())
}

fn run_delete(db: &Database, args: DeleteArgs, global: &GlobalOpts) -> Result<()> {
    let product_type = find(db, &args.name)?;

    if !confirm_delete(&format!("product type '{}'", product_type.name), args.yes)? {
        println!("Cancelled.");
        return Ok(());
    }

    db.delete_product_type(&product_type.name)?;
    info!(product_type = %product_type.name, "product type deleted");

    if !global.quiet {
        println!(
            "{} Deleted product type {}",
            style("✓").green(),
            style(&product_type.name).cyan()
        );
    }
    Ok(())
}
