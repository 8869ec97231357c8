//! `minv prod` command - Product management

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
use crate::entities::Product;

#[derive(Subcommand, Debug)]
pub enum ProdCommands {
    /// List products with filtering
    List(ListArgs),

    /// Show a product's details and bill of materials
    Show(ShowArgs),

    /// Create a new product
    New(NewArgs),

    /// Change fields of a product (or rename it)
    Edit(EditArgs),

    /// Delete a product and its bill-of-materials rows
    Delete(DeleteArgs),

    /// Materials a product consumes (bill of materials)
    Materials(ShowArgs),
}

/// Columns to display in list output
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum ListColumn {
    Name,
    Type,
    Sku,
    Price,
    Width,
    PartnerPrice,
}

impl ListColumn {
    fn key(self) -> &'static str {
        match self {
            ListColumn::Name => "name",
            ListColumn::Type => "type",
            ListColumn::Sku => "sku",
            ListColumn::Price => "price",
            ListColumn::Width => "width",
            ListColumn::PartnerPrice => "partner-price",
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
    ColumnDef::new("sku", "SKU", 14),
    ColumnDef::new("price", "MIN PRICE", 10),
    ColumnDef::new("width", "ROLL WIDTH", 10),
    ColumnDef::new("partner-price", "PARTNER PRICE", 13),
];

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Only products of this type
    #[arg(long, short = 't')]
    pub r#type: Option<String>,

    /// Search in name and SKU (case-insensitive substring)
    #[arg(long)]
    pub search: Option<String>,

    /// Columns to display (can specify multiple)
    #[arg(long, value_delimiter = ',', default_values_t = vec![
        ListColumn::Name,
        ListColumn::Type,
        ListColumn::Sku,
        ListColumn::Price
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
    /// Product name
    pub name: String,
}

#[derive(clap::Args, Debug)]
pub struct NewArgs {
    /// Product name
    #[arg(long, short = 'n')]
    pub name: Option<String>,

    /// Product type name
    #[arg(long, short = 't')]
    pub r#type: Option<String>,

    /// Article / SKU
    #[arg(long, short = 's')]
    pub sku: Option<String>,

    /// Minimum selling price
    #[arg(long, default_value_t = 0.0)]
    pub price: f64,

    /// Roll width for rolled goods
    #[arg(long, default_value_t = 0.0)]
    pub width: f64,

    /// Minimum price for partners
    #[arg(long)]
    pub partner_price: Option<f64>,

    /// Interactive mode (prompt for fields)
    #[arg(long, short = 'i')]
    pub interactive: bool,
}

#[derive(clap::Args, Debug)]
pub struct EditArgs {
    /// Current product name
    pub name: String,

    /// New name (bill-of-materials rows follow the rename)
    #[arg(long)]
    pub rename: Option<String>,

    /// Product type name
    #[arg(long, short = 't')]
    pub r#type: Option<String>,

    #[arg(long, short = 's')]
    pub sku: Option<String>,

    #[arg(long)]
    pub price: Option<f64>,

    #[arg(long)]
    pub width: Option<f64>,

    #[arg(long, conflicts_with = "clear_partner_price")]
    pub partner_price: Option<f64>,

    /// Remove the partner price
    #[arg(long)]
    pub clear_partner_price: bool,

    /// Interactive mode (prompt for every field)
    #[arg(long, short = 'i')]
    pub interactive: bool,
}

#[derive(clap::Args, Debug)]
pub struct DeleteArgs {
    /// Product name
    pub name: String,

    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

/// Run a product subcommand
pub fn run(cmd: ProdCommands, global: &GlobalOpts) -> Result<()> {
    let session = Session::open(global)?;
    let format = session.format(global);

    match cmd {
        ProdCommands::List(args) => run_list(&session.db, args, format, global.quiet)?,
        ProdCommands::Show(args) => run_show(&session.db, args, format)?,
        ProdCommands::New(args) => run_new(&session.db, args, global)?,
        ProdCommands::Edit(args) => run_edit(&session.db, args, global)?,
        ProdCommands::Delete(args) => run_delete(&session.db, args, global)?,
        ProdCommands::Materials(args) => run_materials(&session.db, args, format)?,
    }

    session.close()
}

fn run_list(db: &Database, args: ListArgs, format: OutputFormat, quiet: bool) -> Result<()> {
    let mut products: Vec<Product> = db
        .list_products()?
        .into_iter()
        .filter(|p| {
            args.r#type
                .as_ref()
                .map_or(true, |t| p.product_type.eq_ignore_ascii_case(t))
        })
        .filter(|p| {
            args.search.as_ref().map_or(true, |search| {
                let search = search.to_lowercase();
                p.name.to_lowercase().contains(&search) || p.sku.to_lowercase().contains(&search)
            })
        })
        .collect();

    if let Some(sort) = args.sort {
        match sort {
            ListColumn::Name => products.sort_by(|a, b| a.name.cmp(&b.name)),
            ListColumn::Type => products.sort_by(|a, b| a.product_type.cmp(&b.product_type)),
            ListColumn::Sku => products.sort_by(|a, b| a.sku.cmp(&b.sku)),
            ListColumn::Price => products.sort_by(|a, b| a.min_price.total_cmp(&b.min_price)),
            ListColumn::Width => products.sort_by(|a, b| a.roll_width.total_cmp(&b.roll_width)),
            ListColumn::PartnerPrice => products.sort_by(|a, b| {
                a.min_partner_price
                    .unwrap_or(f64::NEG_INFINITY)
                    .total_cmp(&b.min_partner_price.unwrap_or(f64::NEG_INFINITY))
            }),
        }
    }

    if args.reverse {
        products.reverse();
    }

    if let Some(limit) = args.limit {
        products.truncate(limit);
    }

    if args.count {
        println!("{}", products.len());
        return Ok(());
    }

    if products.is_empty() && !matches!(format, OutputFormat::Json | OutputFormat::Yaml) {
        println!("No products found.");
        return Ok(());
    }

    let rows: Vec<TableRow> = products.iter().map(product_row).collect();
    let visible: Vec<&str> = args.columns.iter().map(|c| c.key()).collect();
    let formatter =
        TableFormatter::new(COLUMNS, "product").with_config(TableConfig::for_output(quiet));
    print_records(&products, &rows, &formatter, format, &visible)
}

fn product_row(p: &Product) -> TableRow {
    TableRow::new(&p.name)
        .cell("name", CellValue::Key(p.name.clone()))
        .cell("type", CellValue::Text(p.product_type.clone()))
        .cell("sku", CellValue::Text(p.sku.clone()))
        .cell("price", CellValue::Number(p.min_price))
        .cell("width", CellValue::Number(p.roll_width))
        .cell(
            "partner-price",
            p.min_partner_price.map_or(CellValue::Empty, CellValue::Number),
        )
}

fn load(db: &Database, name: &str) -> Result<Product> {
    db.get_product(name)?.ok_or_else(|| {
        StoreError::NotFound {
            kind: "product",
            key: name.to_string(),
        }
        .into()
    })
}

fn run_show(db: &Database, args: ShowArgs, format: OutputFormat) -> Result<()> {
    let product = load(db, &args.name)?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&product).into_diagnostic()?);
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(&product).into_diagnostic()?);
        }
        OutputFormat::Id => println!("{}", product.name),
        _ => {
            println!("{}", style(&product.name).bold().cyan());
            println!("{}", "-".repeat(40));
            println!("Type:          {}", product.product_type);
            println!("SKU:           {}", product.sku);
            println!("Min price:     {}", format_number(product.min_price));
            println!("Roll width:    {}", format_number(product.roll_width));
            if let Some(price) = product.min_partner_price {
                println!("Partner price: {}", format_number(price));
            }

            let materials = db.materials_for_product(&product.name)?;
            println!();
            if materials.is_empty() {
                println!("{}", style("No bill of materials recorded.").dim());
            } else {
                println!("{}", style("Bill of materials").bold());
                for usage in &materials {
                    println!(
                        "  {:<32} {}",
                        style(&usage.name).cyan(),
                        format_number(usage.qty_needed)
                    );
                }
            }
        }
    }

    Ok(())
}

/// Prompt for every field, starting from `current`
fn fill_form(db: &Database, form: &Form, current: &Product) -> Result<Product> {
    let types: Vec<String> = db.list_product_types()?.into_iter().map(|t| t.name).collect();
    if types.is_empty() {
        return Err(miette::miette!(
            help = "create one with `minv prod-type new <name> --coef <value>`",
            "no product types defined"
        ));
    }

    Ok(Product {
        name: form.text("Name", &current.name)?,
        product_type: form.choose("Product type", &types, &current.product_type)?,
        sku: form.text("SKU", &current.sku)?,
        min_price: form.number("Minimum price", current.min_price, true)?,
        roll_width: form.number("Roll width", current.roll_width, true)?,
        min_partner_price: form.optional_number("Partner price", current.min_partner_price)?,
    })
}

fn run_new(db: &Database, args: NewArgs, global: &GlobalOpts) -> Result<()> {
    let product = if args.interactive {
        let form = Form::new();
        form.title("New product");
        let mut seed = Product::new(
            args.name.unwrap_or_default(),
            args.r#type.unwrap_or_default(),
            args.sku.unwrap_or_default(),
        );
        seed.min_price = args.price;
        seed.roll_width = args.width;
        seed.min_partner_price = args.partner_price;
        fill_form(db, &form, &seed)?
    } else {
        let missing = |field: &str| {
            miette::miette!(
                help = "pass --name, --type and --sku, or use --interactive",
                "product {} is required",
                field
            )
        };
        let mut product = Product::new(
            args.name.ok_or_else(|| missing("name"))?,
            args.r#type.ok_or_else(|| missing("type"))?,
            args.sku.ok_or_else(|| missing("sku"))?,
        );
        product.min_price = args.price;
        product.roll_width = args.width;
        product.min_partner_price = args.partner_price;
        product
    };

    db.insert_product(&product)?;
    info!(product = %product.name, "product created");

    if !global.quiet {
        println!(
            "{} Created product {}",
            style("✓").green(),
            style(&product.name).cyan()
        );
    }
    Ok(())
}

fn run_edit(db: &Database, args: EditArgs, global: &GlobalOpts) -> Result<()> {
    let current = load(db, &args.name)?;

    let updated = if args.interactive {
        let form = Form::new();
        form.title(&format!("Edit product '{}'", current.name));
        fill_form(db, &form, &current)?
    } else {
        let mut updated = current.clone();
        if let Some(name) = args.rename {
            updated.name = name;
        }
        if let Some(t) = args.r#type {
            updated.product_type = t;
        }
        if let Some(sku) = args.sku {
            updated.sku = sku;
        }
        if let Some(v) = args.price {
            updated.min_price = v;
        }
        if let Some(v) = args.width {
            updated.roll_width = v;
        }
        if args.clear_partner_price {
            updated.min_partner_price = None;
        } else if let Some(v) = args.partner_price {
            updated.min_partner_price = Some(v);
        }
        updated
    };

    if updated == current {
        if !global.quiet {
            println!("No changes to product {}", style(&current.name).cyan());
        }
        return Ok(());
    }

    db.update_product(&current.name, &updated)?;
    info!(product = %current.name, "product updated");

    if !global.quiet {
        if updated.name != current.name {
            println!(
                "{} Renamed product {} to {}",
                style("✓").green(),
                style(&current.name).cyan(),
                style(&updated.name).cyan()
            );
        } else {
            println!(
                "{} Updated product {}",
                style("✓").green(),
                style(&updated.name).cyan()
            );
        }
    }
    Ok(())
}

fn run_delete(db: &Database, args: DeleteArgs, global: &GlobalOpts) -> Result<()> {
    let product = load(db, &args.name)?;

    if !confirm_delete(&format!("product '{}'", product.name), args.yes)? {
        println!("Cancelled.");
        return Ok(());
    }

    db.delete_product(&product.name)?;
    info!(product = %product.name, "product deleted");

    if !global.quiet {
        println!(
            "{} Deleted product {}",
            style("✓").green(),
            style(&product.name).cyan()
        );
    }
    Ok(())
}

fn run_materials(db: &Database, args: ShowArgs, format: OutputFormat) -> Result<()> {
    let product = load(db, &args.name)?;
    let usages = db.materials_for_product(&product.name)?;
    print_usage(&usages, "MATERIAL", "material", format)
}
