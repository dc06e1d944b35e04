use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use vellum_cli::{DEFAULT_LOG_FILTER, ParseArgs, parse_cmd, split_cmd};

#[derive(Parser)]
#[command(name = "vellum", version, about = "Vellum template compiler")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a template (or the <template> block of a .vue/.vx file) and print its AST.
    Parse {
        /// Path to the template or component file
        input: PathBuf,
        #[command(flatten)]
        args: ParseArgs,
    },
    /// Split a .vue/.vx component into its blocks and print them as JSON.
    Split {
        /// Path to .vx/.vue file
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(DEFAULT_LOG_FILTER),
    )
    .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Parse { input, args } => {
            let (rendered, warnings) = parse_cmd(&input, &args)?;
            for warning in &warnings {
                eprintln!("warning: {warning}");
            }
            println!("{rendered}");
        }
        Commands::Split { input } => {
            log::debug!("splitting {}", input.display());
            println!("{}", split_cmd(&input)?);
        }
    }
    Ok(())
}
