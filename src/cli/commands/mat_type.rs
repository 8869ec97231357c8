//! `minv mat-type` command - Material types and their defect percent

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
use crate::entities::MaterialType;

#[derive(Subcommand, Debug)]
pub enum MatTypeCommands {
    /// List material types
    List(ListArgs),

    /// Create a material type
    New(NewArgs),

    /// Change a material type's defect percent (or rename it)
    Edit(EditArgs),

    /// Delete a material type no material uses
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

    /// Production waste in percent
    #[arg(long, short = 'd', allow_negative_numbers = true)]
    pub defect: Option<f64>,

    /// Interactive mode (prompt for fields)
    #[arg(long, short = 'i')]
    pub interactive: bool,
}

#[derive(clap::Args, Debug)]
pub struct EditArgs {
    /// Current type name
    pub name: String,

    /// New name (materials of this type follow the rename)
    #[arg(long)]
    pub rename: Option<String>,

    /// Production waste in percent
    #[arg(long, short = 'd', allow_negative_numbers = true)]
    pub defect: Option<f64>,

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
    ColumnDef::new("defect", "DEFECT %", 10),
];

/// Run a material type subcommand
pub fn run(cmd: MatTypeCommands, global: &GlobalOpts) -> Result<()> {
    let session = Session::open(global)?;
    let format = session.format(global);

    match cmd {
        MatTypeCommands::List(args) => run_list(&session.db, args, format, global.quiet)?,
        MatTypeCommands::New(args) => run_new(&session.db, args, global)?,
        MatTypeCommands::Edit(args) => run_edit(&session.db, args, global)?,
        MatTypeCommands::Delete(args) => run_delete(&session.db, args, global)?,
    }

    session.close()
}

fn run_list(db: &Database, args: ListArgs, format: OutputFormat, quiet: bool) -> Result<()> {
    let types = db.list_material_types()?;

    if args.count {
        println!("{}", types.len());
        return Ok(());
    }

    if types.is_empty() && !matches!(format, OutputFormat::Json | OutputFormat::Yaml) {
        println!("No material types found.");
        return Ok(());
    }

    let rows: Vec<TableRow> = types
        .iter()
        .map(|t| {
            TableRow::new(&t.name)
                .cell("name", CellValue::Key(t.name.clone()))
                .cell("defect", CellValue::Number(t.defect_percent))
        })
        .collect();

    let formatter =
        TableFormatter::new(COLUMNS, "material type").with_config(TableConfig::for_output(quiet));
    print_records(&types, &rows, &formatter, format, &["name", "defect"])
}

fn find(db: &Database, name: &str) -> Result<MaterialType> {
    let defect_percent = db
        .material_defect_percent(name)?
        .ok_or_else(|| StoreError::NotFound {
            kind: "material type",
            key: name.to_string(),
        })?;
    Ok(MaterialType::new(name, defect_percent))
}

fn run_new(db: &Database, args: NewArgs, global: &GlobalOpts) -> Result<()> {
    let material_type = if args.interactive {
        let form = Form::new();
        form.title("New material type");
        MaterialType::new(
            form.text("Name", args.name.as_deref().unwrap_or(""))?,
            form.number("Defect percent", args.defect.unwrap_or(0.0), false)?,
        )
    } else {
        let name = args.name.ok_or_else(|| {
            miette::miette!(
                help = "pass the type name, or use --interactive",
                "material type name is required"
            )
        })?;
        MaterialType::new(name, args.defect.unwrap_or(0.0))
    };

    db.insert_material_type(&material_type)?;
    info!(material_type = %material_type.name, "material type created");

    if !global.quiet {
        println!(
            "{} Created material type {} ({}% defect)",
            style("✓").green(),
            style(&material_type.name).cyan(),
            format_number(material_type.defect_percent)
        );
    }
    Ok(())
}

fn run_edit(db: &Database, args: EditArgs, global: &GlobalOpts) -> Result<()> {
    let current = find(db, &args.name)?;

    let updated = if args.interactive {
        let form = Form::new();
        form.title(&format!("Edit material type '{}'", current.name));
        MaterialType::new(
            form.text("Name", &current.name)?,
            form.number("Defect percent", current.defect_percent, false)?,
        )
    } else {
        MaterialType::new(
            args.rename.unwrap_or_else(|| current.name.clone()),
            args.defect.unwrap_or(current.defect_percent),
        )
    };

    if updated == current {
        if !global.quiet {
            println!("No changes to material type {}", style(&current.name).cyan());
        }
        return Ok(());
    }

    db.update_material_type(&current.name, &updated)?;
    info!(material_type = %current.name, "material type updated");

    if !global.quiet {
        println!(
            "{} Updated material type {}",
            style("✓").green(),
            style(&updated.name).cyan()
        );
    }
    Ok(())
}

fn run_delete(db: &Database, args: DeleteArgs, global: &GlobalOpts) -> Result<()> {
    let material_type = find(db, &args.name)?;

    if !confirm_delete(&format!("material type '{}'", material_type.name), args.yes)? {
        println!("Cancelled.");
        return Ok(());
    }

    db.delete_material_type(&material_type.name)?;
    info!(material_type = %material_type.name, "material type deleted");

    if !global.quiet {
        println!(
            "{} Deleted material type {}",
            style("✓").green(),
            style(&material_type.name).cyan()
        );
    }
    Ok(())
}
