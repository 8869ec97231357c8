//! `minv calc` command - Raw material requirement for a production batch

use console::style;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use tracing::debug;

use crate::cli::helpers::{format_number, Session};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::calc::to_sentinel;
use crate::core::{
    calculate_material_quantity, BatchSpec, CalcError, Database, StoreError, FAILURE_SENTINEL,
};

#[derive(clap::Args, Debug)]
pub struct CalcArgs {
    /// Product type supplying the coefficient
    #[arg(long, required_unless_present = "product")]
    pub product_type: Option<String>,

    /// Take the product type from this product instead
    #[arg(long, conflicts_with = "product_type")]
    pub product: Option<String>,

    /// Material type supplying the defect percent
    #[arg(long, required_unless_present = "material")]
    pub material_type: Option<String>,

    /// Take the material type and stock from this material instead
    #[arg(long, conflicts_with = "material_type")]
    pub material: Option<String>,

    /// Number of product units to make
    #[arg(long)]
    pub quantity: u64,

    /// First product parameter (e.g., length)
    #[arg(long, allow_negative_numbers = true)]
    pub param1: f64,

    /// Second product parameter (e.g., width)
    #[arg(long, allow_negative_numbers = true)]
    pub param2: f64,

    /// Material already on hand (default: the material's stock, else 0)
    #[arg(long, allow_negative_numbers = true)]
    pub stock: Option<f64>,

    /// Print only the quantity, or -1 on any failure, and always exit successfully
    #[arg(long)]
    pub sentinel: bool,
}

/// A resolved calculation, as printed by the command
#[derive(Debug, Serialize)]
struct Calculation {
    product_type: String,
    material_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    material: Option<String>,
    product_qty: u64,
    param1: f64,
    param2: f64,
    stock_qty: f64,
    required: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    packages: Option<u64>,
}

pub fn run(args: CalcArgs, global: &GlobalOpts) -> Result<()> {
    if args.sentinel {
        // The integer protocol has no error channel: an unreachable database is -1 too
        let value = match Session::open(global) {
            Ok(session) => {
                let qty = to_sentinel(&resolve(&session.db, &args).map(|c| c.required));
                session.close()?;
                qty
            }
            Err(e) => {
                debug!(error = %e, "calculation unavailable");
                FAILURE_SENTINEL
            }
        };
        println!("{}", value);
        return Ok(());
    }

    let session = Session::open(global)?;
    let format = session.format(global);
    let calculation = resolve(&session.db, &args)?;
    session.close()?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&calculation).into_diagnostic()?);
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(&calculation).into_diagnostic()?);
        }
        OutputFormat::Id | OutputFormat::Csv | OutputFormat::Tsv | OutputFormat::Md
            if global.quiet =>
        {
            println!("{}", calculation.required);
        }
        OutputFormat::Csv => print!("{}", to_csv(&calculation)?),
        OutputFormat::Id => println!("{}", calculation.required),
        _ => print_summary(&calculation),
    }

    Ok(())
}

fn to_csv(c: &Calculation) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    writer
        .write_record([
            "product_type",
            "material_type",
            "product_qty",
            "param1",
            "param2",
            "stock_qty",
            "required",
        ])
        .into_diagnostic()?;
    writer
        .write_record([
            c.product_type.clone(),
            c.material_type.clone(),
            c.product_qty.to_string(),
            format_number(c.param1),
            format_number(c.param2),
            format_number(c.stock_qty),
            c.required.to_string(),
        ])
        .into_diagnostic()?;
    let bytes = writer.into_inner().into_diagnostic()?;
    String::from_utf8(bytes).into_diagnostic()
}

fn print_summary(c: &Calculation) {
    println!("{}", style("Material requirement").bold());
    println!("{}", "-".repeat(40));
    println!("Product type:   {}", style(&c.product_type).cyan());
    match &c.material {
        Some(material) => println!(
            "Material:       {} ({})",
            style(material).cyan(),
            c.material_type
        ),
        None => println!("Material type:  {}", style(&c.material_type).cyan()),
    }
    println!(
        "Batch:          {} x {} x {}",
        c.product_qty,
        format_number(c.param1),
        format_number(c.param2)
    );
    println!("In stock:       {}", format_number(c.stock_qty));
    println!();

    let unit = c.unit.as_deref().map(|u| format!(" {}", u)).unwrap_or_default();
    if c.required == 0 {
        println!(
            "{} Stock covers the batch, nothing to procure",
            style("✓").green()
        );
    } else {
        println!(
            "Required:       {}{}",
            style(c.required).yellow().bold(),
            unit
        );
        if let Some(packages) = c.packages {
            println!("Packages:       {}", packages);
        }
    }
}

/// Fill in the lookups the arguments leave open, then calculate
fn resolve(db: &Database, args: &CalcArgs) -> Result<Calculation, CalcError> {
    let product_type = match (&args.product_type, &args.product) {
        (Some(t), _) => t.clone(),
        (None, Some(name)) => {
            db.get_product(name)?
                .ok_or_else(|| StoreError::NotFound {
                    kind: "product",
                    key: name.clone(),
                })?
                .product_type
        }
        (None, None) => {
            return Err(CalcError::InvalidInput(
                "a product type or product is required".to_string(),
            ))
        }
    };

    let material = match &args.material {
        Some(name) => Some(db.get_material(name)?.ok_or_else(|| StoreError::NotFound {
            kind: "material",
            key: name.clone(),
        })?),
        None => None,
    };

    let material_type = match (&args.material_type, &material) {
        (Some(t), _) => t.clone(),
        (None, Some(m)) => m.material_type.clone(),
        (None, None) => {
            return Err(CalcError::InvalidInput(
                "a material type or material is required".to_string(),
            ))
        }
    };

    let stock_qty = args
        .stock
        .or_else(|| material.as_ref().map(|m| m.stock_qty))
        .unwrap_or(0.0);

    let batch = BatchSpec {
        product_qty: args.quantity,
        param1: args.param1,
        param2: args.param2,
        stock_qty,
    };
    debug!(?batch, %product_type, %material_type, "calculating requirement");

    let required = calculate_material_quantity(db, &product_type, &material_type, &batch)?;

    Ok(Calculation {
        product_type,
        material_type,
        material: material.as_ref().map(|m| m.name.clone()),
        product_qty: batch.product_qty,
        param1: batch.param1,
        param2: batch.param2,
        stock_qty: batch.stock_qty,
        required,
        unit: material.as_ref().map(|m| m.unit.clone()),
        packages: material
            .as_ref()
            .and_then(|m| m.packages_for(required as f64)),
    })
}
