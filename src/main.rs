use clap::Parser;
use miette::Result;
use minv::cli::helpers::log_level;
use minv::cli::{Cli, Commands};
use minv::core::config::init_tracing;

fn main() -> Result<()> {
    // Reset SIGPIPE to default behavior (terminate silently) for proper Unix piping.
    // Without this, piping to `head`, `grep -q`, etc. causes a panic on broken pipe.
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
    // Install miette's fancy error handler for beautiful diagnostics
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    let global = cli.global;

    init_tracing(&log_level(&global));

    match cli.command {
        Commands::Init(args) => minv::cli::commands::init::run(args, &global),
        Commands::Mat(cmd) => minv::cli::commands::mat::run(cmd, &global),
        Commands::MatType(cmd) => minv::cli::commands::mat_type::run(cmd, &global),
        Commands::Prod(cmd) => minv::cli::commands::prod::run(cmd, &global),
        Commands::ProdType(cmd) => minv::cli::commands::prod_type::run(cmd, &global),
        Commands::Partner(cmd) => minv::cli::commands::partner::run(cmd, &global),
        Commands::Link(cmd) => minv::cli::commands::link::run(cmd, &global),
        Commands::Calc(args) => minv::cli::commands::calc::run(args, &global),
        Commands::Status(args) => minv::cli::commands::status::run(args, &global),
        Commands::Config(cmd) => minv::cli::commands::config::run(cmd, &global),
        Commands::Completions(args) => minv::cli::commands::completions::run(args),
    }
}
