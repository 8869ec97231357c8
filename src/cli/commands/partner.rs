//! `minv partner` command - Partner companies

use clap::Subcommand;
use console::style;
use miette::Result;
use tracing::info;

use crate::cli::forms::{confirm_delete, Form};
use crate::cli::helpers::Session;
use crate::cli::table::{
    print_records, CellValue, ColumnDef, TableConfig, TableFormatter, TableRow,
};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::{Database, StoreError};
use crate::entities::Partner;

#[derive(Subcommand, Debug)]
pub enum PartnerCommands {
    /// List partners
    List(ListArgs),

    /// Register a partner company
    New(NewArgs),

    /// Change a partner's details
    Edit(EditArgs),

    /// Delete a partner
    Delete(DeleteArgs),
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Search in company name, phone and email
    #[arg(long)]
    pub search: Option<String>,

    /// Show only count
    #[arg(long)]
    pub count: bool,
}

#[derive(clap::Args, Debug)]
pub struct NewArgs {
    /// Company name
    #[arg(long, short = 'c')]
    pub company: Option<String>,

    #[arg(long)]
    pub phone: Option<String>,

    #[arg(long)]
    pub email: Option<String>,

    /// Interactive mode (prompt for fields)
    #[arg(long, short = 'i')]
    pub interactive: bool,
}

#[derive(clap::Args, Debug)]
pub struct EditArgs {
    /// Partner id
    pub id: i64,

    /// Company name
    #[arg(long, short = 'c')]
    pub company: Option<String>,

    #[arg(long)]
    pub phone: Option<String>,

    #[arg(long)]
    pub email: Option<String>,

    /// Interactive mode (prompt for every field)
    #[arg(long, short = 'i')]
    pub interactive: bool,
}

#[derive(clap::Args, Debug)]
pub struct DeleteArgs {
    /// Partner id
    pub id: i64,

    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

const COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("id", "ID", 6),
    ColumnDef::new("company", "COMPANY", 32),
    ColumnDef::new("phone", "PHONE", 18),
    ColumnDef::new("email", "EMAIL", 30),
];

/// Run a partner subcommand
pub fn run(cmd: PartnerCommands, global: &GlobalOpts) -> Result<()> {
    let session = Session::open(global)?;
    let format = session.format(global);

    match cmd {
        PartnerCommands::List(args) => run_list(&session.db, args, format, global.quiet)?,
        PartnerCommands::New(args) => run_new(&session.db, args, global)?,
        PartnerCommands::Edit(args) => run_edit(&session.db, args, global)?,
        PartnerCommands::Delete(args) => run_delete(&session.db, args, global)?,
    }

    session.close()
}

fn run_list(db: &Database, args: ListArgs, format: OutputFormat, quiet: bool) -> Result<()> {
    let partners: Vec<Partner> = db
        .list_partners()?
        .into_iter()
        .filter(|p| {
            args.search.as_ref().map_or(true, |search| {
                let search = search.to_lowercase();
                p.company_name.to_lowercase().contains(&search)
                    || p.phone.contains(&search)
                    || p.email.to_lowercase().contains(&search)
            })
        })
        .collect();

    if args.count {
        println!("{}", partners.len());
        return Ok(());
    }

    if partners.is_empty() && !matches!(format, OutputFormat::Json | OutputFormat::Yaml) {
        println!("No partners found.");
        return Ok(());
    }

    let text_or_empty = |s: &str| {
        if s.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(s.to_string())
        }
    };

    let rows: Vec<TableRow> = partners
        .iter()
        .map(|p| {
            TableRow::new(p.id.to_string())
                .cell("id", CellValue::Integer(p.id))
                .cell("company", CellValue::Key(p.company_name.clone()))
                .cell("phone", text_or_empty(&p.phone))
                .cell("email", text_or_empty(&p.email))
        })
        .collect();

    let formatter =
        TableFormatter::new(COLUMNS, "partner").with_config(TableConfig::for_output(quiet));
    print_records(&partners, &rows, &formatter, format, &["id", "company", "phone", "email"])
}

fn load(db: &Database, id: i64) -> Result<Partner> {
    db.get_partner(id)?.ok_or_else(|| {
        StoreError::NotFound {
            kind: "partner",
            key: id.to_string(),
        }
        .into()
    })
}

fn fill_form(form: &Form, current: &Partner) -> Result<Partner> {
    Ok(Partner {
        id: current.id,
        company_name: form.text("Company name", &current.company_name)?,
        phone: form.optional_text("Phone", &current.phone)?,
        email: form.optional_text("Email", &current.email)?,
    })
}

fn run_new(db: &Database, args: NewArgs, global: &GlobalOpts) -> Result<()> {
    let partner = if args.interactive {
        let form = Form::new();
        form.title("New partner");
        let mut seed = Partner::new(args.company.unwrap_or_default());
        seed.phone = args.phone.unwrap_or_default();
        seed.email = args.email.unwrap_or_default();
        fill_form(&form, &seed)?
    } else {
        let company = args.company.ok_or_else(|| {
            miette::miette!(
                help = "pass --company, or use --interactive",
                "partner company name is required"
            )
        })?;
        let mut partner = Partner::new(company);
        partner.phone = args.phone.unwrap_or_default();
        partner.email = args.email.unwrap_or_default();
        partner
    };

    let id = db.insert_partner(&partner)?;
    info!(partner = id, "partner created");

    if global.quiet {
        println!("{}", id);
    } else {
        println!(
            "{} Created partner {} ({})",
            style("✓").green(),
            style(id).cyan(),
            partner.company_name
        );
    }
    Ok(())
}

fn run_edit(db: &Database, args: EditArgs, global: &GlobalOpts) -> Result<()> {
    let current = load(db, args.id)?;

    let updated = if args.interactive {
        let form = Form::new();
        form.title(&format!("Edit partner {}", current.id));
        fill_form(&form, &current)?
    } else {
        Partner {
            id: current.id,
            company_name: args.company.unwrap_or_else(|| current.company_name.clone()),
            phone: args.phone.unwrap_or_else(|| current.phone.clone()),
            email: args.email.unwrap_or_else(|| current.email.clone()),
        }
    };

    if updated == current {
        if !global.quiet {
            println!("No changes to partner {}", style(current.id).cyan());
        }
        return Ok(());
    }

    db.update_partner(current.id, &updated)?;
    info!(partner = current.id, "partner updated");

    if !global.quiet {
        println!(
            "{} Updated partner {} ({})",
            style("✓").green(),
            style(updated.id).cyan(),
            updated.company_name
        );
    }
    Ok(())
}

fn run_delete(db: &Database, args: DeleteArgs, global: &GlobalOpts) -> Result<()> {
    let partner = load(db, args.id)?;

    if !confirm_delete(
        &format!("partner {} ({})", partner.id, partner.company_name),
        args.yes,
    )? {
        println!("Cancelled.");
        return Ok(());
    }

    db.delete_partner(partner.id)?;
    info!(partner = partner.id, "partner deleted");

    if !global.quiet {
        println!(
            "{} Deleted partner {}",
            style("✓").green(),
            style(partner.id).cyan()
        );
    }
    Ok(())
}
