//! `minv init` command - Initialize a new inventory project

use console::style;
use miette::{IntoDiagnostic, Result};
use std::path::Path;
use tracing::info;

use crate::cli::GlobalOpts;
use crate::core::project::{Project, ProjectError};
use crate::core::{Config, Database};

#[derive(clap::Args, Debug)]
pub struct InitArgs {
    /// Directory to initialize (default: current directory)
    #[arg(default_value = ".")]
    pub path: std::path::PathBuf,

    /// Force initialization even if .minv/ already exists
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: InitArgs, global: &GlobalOpts) -> Result<()> {
    let path = if args.path.as_os_str() == "." {
        std::env::current_dir().into_diagnostic()?
    } else {
        args.path.clone()
    };

    // Create directory if it doesn't exist
    if !path.exists() {
        std::fs::create_dir_all(&path).into_diagnostic()?;
        if !global.quiet {
            println!(
                "{} Created directory {}",
                style("✓").green(),
                style(path.display()).cyan()
            );
        }
    }

    let project = if args.force {
        Project::init_force(&path)
    } else {
        Project::init(&path)
    };

    let project = match project {
        Ok(project) => project,
        Err(ProjectError::AlreadyExists(path)) => {
            println!(
                "{} Inventory project already exists at {}",
                style("!").yellow(),
                style(path.display()).cyan()
            );
            println!();
            println!(
                "Use {} to reinitialize",
                style("minv init --force").yellow()
            );
            return Ok(());
        }
        Err(e) => return Err(miette::miette!("{}", e)),
    };

    // Opening the database creates the schema
    let config = Config::load(Some(&project))?;
    let db_path = match &global.database {
        Some(path) => path.clone(),
        None => config
            .database_path(Some(&project))
            .unwrap_or_else(|| project.default_database_path()),
    };
    let db = Database::open(&db_path)?;
    let tables = db.table_names()?;
    db.close()?;
    info!(root = %project.root().display(), "project initialized");

    if global.quiet {
        return Ok(());
    }

    println!(
        "{} Initialized inventory project at {}",
        style("✓").green(),
        style(project.root().display()).cyan()
    );
    println!();
    println!("Created:");
    print_structure(project.root(), &db_path);
    println!(
        "  {} {} table(s)",
        style("schema").dim(),
        tables.len()
    );
    println!();
    println!("Next steps:");
    println!(
        "  {} Add a material type",
        style("minv mat-type new Fabric --defect 10").yellow()
    );
    println!(
        "  {} Add a product type",
        style("minv prod-type new Sofa --coef 2").yellow()
    );
    println!(
        "  {} Work out a material requirement",
        style("minv calc --product-type Sofa --material-type Fabric --quantity 5 --param1 3 --param2 4").yellow()
    );
    Ok(())
}

fn print_structure(root: &Path, db_path: &Path) {
    let config = root.join(".minv/config.yaml");
    for path in [config.as_path(), db_path] {
        if path.exists() {
            let shown = path.strip_prefix(root).unwrap_or(path);
            println!("  {}", style(shown.display()).dim());
        }
    }
}
