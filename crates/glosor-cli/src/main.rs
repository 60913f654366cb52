mod commands;
mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "glosor",
    version,
    about = "Turn Rivstart word-list and word-card PDFs into Anki decks"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert ordlista_a1a2.pdf and ordlista_b1b2.pdf into word-list decks
    Ordlista,
    /// Convert ordkort_b1b2.pdf and ordkort_b2c1.pdf into translated word-card decks
    Ordkort,
    /// Run a single conversion profile
    Run {
        /// Preset name (e.g., "a1a2") or path to a JSON profile
        profile: String,

        /// Read this file instead of the profile's input
        #[arg(short, long, value_name = "FILE")]
        input: Option<PathBuf>,

        /// Write the deck here instead of the profile's output
        #[arg(short = 'O', long = "out", value_name = "FILE")]
        out: Option<PathBuf>,

        /// Leave English empty instead of translating word cards
        #[arg(long)]
        no_translate: bool,
    },
    /// Extract pairs from a PDF (or JSON layout dump) and print them
    Parse {
        /// Preset name or path to a JSON profile
        profile: String,

        /// Path to a PDF or a JSON layout tree
        input_file: PathBuf,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,

        /// Leave English empty instead of translating word cards
        #[arg(long)]
        no_translate: bool,
    },
    /// Print the notes of an .apkg package
    Inspect {
        /// Path to the package
        package: PathBuf,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
    /// Manage and inspect conversion profiles
    Profiles {
        #[command(subcommand)]
        action: ProfilesAction,
    },
}

#[derive(Subcommand)]
enum ProfilesAction {
    /// List predefined profiles
    List,
    /// Print a predefined profile as JSON
    Show {
        /// Preset name (e.g., "ordkort-b1b2")
        preset: String,
    },
    /// Validate a custom profile file
    Validate {
        /// Path to JSON profile
        file: PathBuf,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Ordlista => commands::batch::ordlista(),
        Commands::Ordkort => commands::batch::ordkort(),
        Commands::Run {
            profile,
            input,
            out,
            no_translate,
        } => commands::run::run(&profile, input, out, no_translate),
        Commands::Parse {
            profile,
            input_file,
            output,
            no_translate,
        } => commands::parse::run(&profile, input_file, &output, no_translate),
        Commands::Inspect { package, output } => commands::inspect::run(&package, &output),
        Commands::Profiles { action } => match action {
            ProfilesAction::List => commands::profiles::list(),
            ProfilesAction::Show { preset } => commands::profiles::show(&preset),
            ProfilesAction::Validate { file } => commands::profiles::validate(&file),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
