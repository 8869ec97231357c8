//! `minv mat` command - Material management

use clap::{Subcommand, ValueEnum};
use console::style;
use miette::{IntoDiagnostic, Result};
use tracing::info;

use crate::cli::commands::link::print_usage;
use crate::cli::forms::{confirm_delete, Form};
use crate::cli::helpers::{format_number, Session};
use crate::cli::table::{
    print_records, CellValue, ColumnDef, TableConfig, TableFormatter, TableRow,
};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::{Database, StoreError};
use crate::entities::Material;

#[derive(Subcommand, Debug)]
pub enum MatCommands {
    /// List materials with filtering
    List(ListArgs),

    /// Show a material's details
    Show(ShowArgs),

    /// Create a new material
    New(NewArgs),

    /// Change fields of a material (or rename it)
    Edit(EditArgs),

    /// Delete a material and its bill-of-materials rows
    Delete(DeleteArgs),

    /// Products that consume a material
    Products(ShowArgs),
}

/// Columns to display in list output
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum ListColumn {
    Name,
    Type,
    Price,
    Stock,
    Min,
    Pack,
    Unit,
}

impl ListColumn {
    fn key(self) -> &'static str {
        match self {
            ListColumn::Name => "name",
            ListColumn::Type => "type",
            ListColumn::Price => "price",
            ListColumn::Stock => "stock",
            ListColumn::Min => "min",
            ListColumn::Pack => "pack",
            ListColumn::Unit => "unit",
        }
    }
}

impl std::fmt::Display for ListColumn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

const COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("name", "NAME", 32),
    ColumnDef::new("type", "TYPE", 20),
    ColumnDef::new("price", "PRICE", 10),
    ColumnDef::new("stock", "STOCK", 10),
    ColumnDef::new("min", "MIN", 10),
    ColumnDef::new("pack", "PACK", 10),
    ColumnDef::new("unit", "UNIT", 6),
];

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Only materials of this type
    #[arg(long, short = 't')]
    pub r#type: Option<String>,

    /// Search in name (case-insensitive substring)
    #[arg(long)]
    pub search: Option<String>,

    /// Only materials whose stock is below the minimum
    #[arg(long)]
    pub low_stock: bool,

    /// Columns to display (can specify multiple)
    #[arg(long, value_delimiter = ',', default_values_t = vec![
        ListColumn::Name,
        ListColumn::Type,
        ListColumn::Price,
        ListColumn::Stock,
        ListColumn::Min,
        ListColumn::Unit
    ])]
    pub columns: Vec<ListColumn>,

    /// Sort by field (default: database order)
    #[arg(long)]
    pub sort: Option<ListColumn>,

    /// Reverse sort order
    #[arg(long, short = 'r')]
    pub reverse: bool,

    /// Limit number of results
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,

    /// Show only count
    #[arg(long)]
    pub count: bool,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Material name
    pub name: String,
}

#[derive(clap::Args, Debug)]
pub struct NewArgs {
    /// Material name
    #[arg(long, short = 'n')]
    pub name: Option<String>,

    /// Material type name
    #[arg(long, short = 't')]
    pub r#type: Option<String>,

    /// Price per unit of measure
    #[arg(long, default_value_t = 0.0)]
    pub price: f64,

    /// Quantity on hand
    #[arg(long, default_value_t = 0.0)]
    pub stock: f64,

    /// Reorder threshold
    #[arg(long, default_value_t = 0.0)]
    pub min: f64,

    /// Units per package
    #[arg(long, default_value_t = 0.0)]
    pub pack: f64,

    /// Unit of measure (e.g., m, kg, pcs)
    #[arg(long, short = 'u')]
    pub unit: Option<String>,

    /// Interactive mode (prompt for fields)
    #[arg(long, short = 'i')]
    pub interactive: bool,
}

#[derive(clap::Args, Debug)]
pub struct EditArgs {
    /// Current material name
    pub name: String,

    /// New name (bill-of-materials rows follow the rename)
    #[arg(long)]
    pub rename: Option<String>,

    /// Material type name
    #[arg(long, short = 't')]
    pub r#type: Option<String>,

    #[arg(long)]
    pub price: Option<f64>,

    #[arg(long)]
    pub stock: Option<f64>,

    #[arg(long)]
    pub min: Option<f64>,

    #[arg(long)]
    pub pack: Option<f64>,

    #[arg(long, short = 'u')]
    pub unit: Option<String>,

    /// Interactive mode (prompt for every field)
    #[arg(long, short = 'i')]
    pub interactive: bool,
}

#[derive(clap::Args, Debug)]
pub struct DeleteArgs {
    /// Material name
    pub name: String,

    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

/// Run a material subcommand
pub fn run(cmd: MatCommands, global: &GlobalOpts) -> Result<()> {
    let session = Session::open(global)?;
    let format = session.format(global);

    match cmd {
        MatCommands::List(args) => run_list(&session.db, args, format, global.quiet)?,
        MatCommands::Show(args) => run_show(&session.db, args, format)?,
        MatCommands::New(args) => run_new(&session.db, args, global)?,
        MatCommands::Edit(args) => run_edit(&session.db, args, global)?,
        MatCommands::Delete(args) => run_delete(&session.db, args, global)?,
        MatCommands::Products(args) => run_products(&session.db, args, format)?,
    }

    session.close()
}

fn run_list(db: &Database, args: ListArgs, format: OutputFormat, quiet: bool) -> Result<()> {
    let mut materials: Vec<Material> = db
        .list_materials()?
        .into_iter()
        .filter(|m| {
            args.r#type
                .as_ref()
                .map_or(true, |t| m.material_type.eq_ignore_ascii_case(t))
        })
        .filter(|m| {
            args.search.as_ref().map_or(true, |search| {
                m.name.to_lowercase().contains(&search.to_lowercase())
            })
        })
        .filter(|m| !args.low_stock || m.below_minimum())
        .collect();

    if let Some(sort) = args.sort {
        match sort {
            ListColumn::Name => materials.sort_by(|a, b| a.name.cmp(&b.name)),
            ListColumn::Type => materials.sort_by(|a, b| a.material_type.cmp(&b.material_type)),
            ListColumn::Price => materials.sort_by(|a, b| a.unit_price.total_cmp(&b.unit_price)),
            ListColumn::Stock => materials.sort_by(|a, b| a.stock_qty.total_cmp(&b.stock_qty)),
            ListColumn::Min => materials.sort_by(|a, b| a.min_qty.total_cmp(&b.min_qty)),
            ListColumn::Pack => materials.sort_by(|a, b| a.pack_qty.total_cmp(&b.pack_qty)),
            ListColumn::Unit => materials.sort_by(|a, b| a.unit.cmp(&b.unit)),
        }
    }

    if args.reverse {
        materials.reverse();
    }

    if let Some(limit) = args.limit {
        materials.truncate(limit);
    }

    if args.count {
        println!("{}", materials.len());
        return Ok(());
    }

    if materials.is_empty() && !matches!(format, OutputFormat::Json | OutputFormat::Yaml) {
        println!("No materials found.");
        return Ok(());
    }

    let rows: Vec<TableRow> = materials.iter().map(material_row).collect();
    let visible: Vec<&str> = args.columns.iter().map(|c| c.key()).collect();
    let formatter =
        TableFormatter::new(COLUMNS, "material").with_config(TableConfig::for_output(quiet));
    print_records(&materials, &rows, &formatter, format, &visible)
}

fn material_row(m: &Material) -> TableRow {
    TableRow::new(&m.name)
        .cell("name", CellValue::Key(m.name.clone()))
        .cell("type", CellValue::Text(m.material_type.clone()))
        .cell("price", CellValue::Number(m.unit_price))
        .cell(
            "stock",
            CellValue::Stock {
                qty: m.stock_qty,
                min: m.min_qty,
            },
        )
        .cell("min", CellValue::Number(m.min_qty))
        .cell("pack", CellValue::Number(m.pack_qty))
        .cell("unit", CellValue::Text(m.unit.clone()))
}

fn load(db: &Database, name: &str) -> Result<Material> {
    db.get_material(name)?.ok_or_else(|| {
        StoreError::NotFound {
            kind: "material",
            key: name.to_string(),
        }
        .into()
    })
}

fn run_show(db: &Database, args: ShowArgs, format: OutputFormat) -> Result<()> {
    let material = load(db, &args.name)?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&material).into_diagnostic()?);
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(&material).into_diagnostic()?);
        }
        OutputFormat::Id => println!("{}", material.name),
        _ => {
            println!("{}", style(&material.name).bold().cyan());
            println!("{}", "-".repeat(40));
            println!("Type:        {}", material.material_type);
            println!("Unit price:  {}", format_number(material.unit_price));
            let stock = format!("{} {}", format_number(material.stock_qty), material.unit);
            if material.below_minimum() {
                println!("Stock:       {} {}", style(stock).red().bold(), style("(below minimum)").red());
            } else {
                println!("Stock:       {}", stock);
            }
            println!("Minimum:     {} {}", format_number(material.min_qty), material.unit);
            println!("Package:     {} {}", format_number(material.pack_qty), material.unit);

            let shortfall = material.min_qty - material.stock_qty;
            if let Some(packages) = material.packages_for(shortfall) {
                println!(
                    "Reorder:     {} package(s) to reach the minimum",
                    style(packages).yellow()
                );
            }

            let used_by = db.products_for_material(&material.name)?;
            println!();
            println!("Used by {} product(s)", style(used_by.len()).cyan());
        }
    }

    Ok(())
}

fn type_names(db: &Database) -> Result<Vec<String>> {
    Ok(db
        .list_material_types()?
        .into_iter()
        .map(|t| t.name)
        .collect())
}

/// Prompt for every field, starting from `current`
fn fill_form(db: &Database, form: &Form, current: &Material) -> Result<Material> {
    let types = type_names(db)?;
    if types.is_empty() {
        return Err(miette::miette!(
            help = "create one with `minv mat-type new <name> --defect <percent>`",
            "no material types defined"
        ));
    }

    Ok(Material {
        name: form.text("Name", &current.name)?,
        material_type: form.choose("Material type", &types, &current.material_type)?,
        unit_price: form.number("Unit price", current.unit_price, true)?,
        stock_qty: form.number("Stock quantity", current.stock_qty, true)?,
        min_qty: form.number("Minimum quantity", current.min_qty, true)?,
        pack_qty: form.number("Package quantity", current.pack_qty, true)?,
        unit: form.text("Unit of measure", &current.unit)?,
    })
}

fn run_new(db: &Database, args: NewArgs, global: &GlobalOpts) -> Result<()> {
    let material = if args.interactive {
        let form = Form::new();
        form.title("New material");
        let mut seed = Material::new(
            args.name.unwrap_or_default(),
            args.r#type.unwrap_or_default(),
            args.unit.unwrap_or_default(),
        );
        seed.unit_price = args.price;
        seed.stock_qty = args.stock;
        seed.min_qty = args.min;
        seed.pack_qty = args.pack;
        fill_form(db, &form, &seed)?
    } else {
        let missing = |field: &str| {
            miette::miette!(
                help = "pass --name, --type and --unit, or use --interactive",
                "material {} is required",
                field
            )
        };
        let mut material = Material::new(
            args.name.ok_or_else(|| missing("name"))?,
            args.r#type.ok_or_else(|| missing("type"))?,
            args.unit.ok_or_else(|| missing("unit"))?,
        );
        material.unit_price = args.price;
        material.stock_qty = args.stock;
        material.min_qty = args.min;
        material.pack_qty = args.pack;
        material
    };

    db.insert_material(&material)?;
    info!(material = %material.name, "material created");

    if !global.quiet {
        println!(
            "{} Created material {}",
            style("✓").green(),
            style(&material.name).cyan()
        );
    }
    Ok(())
}

fn run_edit(db: &Database, args: EditArgs, global: &GlobalOpts) -> Result<()> {
    let current = load(db, &args.name)?;

    let updated = if args.interactive {
        let form = Form::new();
        form.title(&format!("Edit material '{}'", current.name));
        fill_form(db, &form, &current)?
    } else {
        let mut updated = current.clone();
        if let Some(name) = args.rename {
            updated.name = name;
        }
        if let Some(t) = args.r#type {
            updated.material_type = t;
        }
        if let Some(v) = args.price {
            updated.unit_price = v;
        }
        if let Some(v) = args.stock {
            updated.stock_qty = v;
        }
        if let Some(v) = args.min {
            updated.min_qty = v;
        }
        if let Some(v) = args.pack {
            updated.pack_qty = v;
        }
        if let Some(u) = args.unit {
            updated.unit = u;
        }
        updated
    };

    if updated == current {
        if !global.quiet {
            println!("No changes to material {}", style(&current.name).cyan());
        }
        return Ok(());
    }

    db.update_material(&current.name, &updated)?;
    info!(material = %current.name, "material updated");

    if !global.quiet {
        if updated.name != current.name {
            println!(
                "{} Renamed material {} to {}",
                style("✓").green(),
                style(&current.name).cyan(),
                style(&updated.name).cyan()
            );
        } else {
            println!(
                "{} Updated material {}",
                style("✓").green(),
                style(&updated.name).cyan()
            );
        }
    }
    Ok(())
}

fn run_delete(db: &Database, args: DeleteArgs, global: &GlobalOpts) -> Result<()> {
    let material = load(db, &args.name)?;
    let used_by = db.products_for_material(&material.name)?;

    if !used_by.is_empty() && !global.quiet {
        println!(
            "{} {} is used by {} product(s); their bill-of-materials rows will be removed",
            style("!").yellow(),
            style(&material.name).cyan(),
            used_by.len()
        );
    }

    if !confirm_delete(&format!("material '{}'", material.name), args.yes)? {
        println!("Cancelled.");
        return Ok(());
    }

    db.delete_material(&material.name)?;
    info!(material = %material.name, "material deleted");

    if !global.quiet {
        println!(
            "{} Deleted material {}",
            style("✓").green(),
            style(&material.name).cyan()
        );
    }
    Ok(())
}

fn run_products(db: &Database, args: ShowArgs, format: OutputFormat) -> Result<()> {
    let material = load(db, &args.name)?;
    let usages = db.products_for_material(&material.name)?;
    print_usage(&usages, "PRODUCT", "product", format)
}
