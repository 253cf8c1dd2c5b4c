mod commands;
mod config;
mod logging;
mod output;

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use std::path::PathBuf;

use commands::label::LabelArgs;
use config::Config;

#[derive(Parser)]
#[command(
    name = "labelkit",
    version,
    about = "Turn purchase-order sheets into label printer CSVs"
)]
struct Cli {
    /// Config file (default: ./labelkit.toml if present)
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log engine decisions (same as RUST_LOG=debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse an order sheet PDF into raw records (without applying rules)
    Parse {
        /// Path to the order sheet PDF
        pdf_file: PathBuf,

        /// Secondary order sheets whose order ids are merged in
        #[arg(short, long = "extra", value_name = "PDF")]
        extra: Vec<PathBuf>,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,

        /// Write parsed records to a JSON file
        #[arg(short = 'O', long = "out", value_name = "FILE")]
        out: Option<PathBuf>,
    },
    /// Parse an order sheet, apply the label rules and export CSV
    Label {
        /// Path to the order sheet PDF
        pdf_file: PathBuf,

        /// Product type as listed in the lookup table (e.g. "Bodysuit")
        #[arg(short, long)]
        product_type: String,

        /// Base price in the reference currency
        #[arg(long)]
        price: Decimal,

        /// Material share, repeatable: "60% cotton"
        #[arg(short, long = "material", value_name = "HINT")]
        materials: Vec<String>,

        /// Override the department derived from the item classification
        #[arg(short, long)]
        department: Option<String>,

        /// Pick a washing code from the catalogue instead of mapping it
        #[arg(short, long)]
        washing_code: Option<String>,

        /// Lookup table (.json or .xlsx)
        #[arg(short, long, value_name = "FILE")]
        lookup: Option<PathBuf>,

        /// Secondary order sheets whose order ids are merged in
        #[arg(short, long = "extra", value_name = "PDF")]
        extra: Vec<PathBuf>,

        /// Write the label CSV here
        #[arg(long, value_name = "FILE")]
        csv: Option<PathBuf>,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
    /// Finalize draft records from a JSON file
    Finalize {
        /// JSON array of draft records
        drafts_file: PathBuf,

        /// Lookup table (.json or .xlsx)
        #[arg(short, long, value_name = "FILE")]
        lookup: Option<PathBuf>,

        /// Write the label CSV here
        #[arg(long, value_name = "FILE")]
        csv: Option<PathBuf>,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
    /// Show the price ladder for a base price
    Ladder {
        /// Base price in the reference currency
        price: Decimal,

        /// Lookup table (.json or .xlsx)
        #[arg(short, long, value_name = "FILE")]
        lookup: Option<PathBuf>,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
    /// Inspect and validate lookup tables
    Lookup {
        #[command(subcommand)]
        action: LookupAction,
    },
}

#[derive(Subcommand)]
enum LookupAction {
    /// Summarize the active lookup table
    Show {
        /// Lookup table (default: config or built-in)
        file: Option<PathBuf>,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
    /// Validate a lookup file (.json or .xlsx)
    Validate {
        file: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };
    logging::init(&config.log_level, cli.verbose);

    let result = match cli.command {
        Commands::Parse {
            pdf_file,
            extra,
            output,
            out,
        } => commands::parse::run(&config, pdf_file, extra, &output, out),
        Commands::Label {
            pdf_file,
            product_type,
            price,
            materials,
            department,
            washing_code,
            lookup,
            extra,
            csv,
            output,
        } => commands::label::run(
            &config,
            LabelArgs {
                pdf_file,
                extra,
                lookup,
                product_type,
                department,
                materials,
                price,
                washing_code,
                csv,
                output,
            },
        ),
        Commands::Finalize {
            drafts_file,
            lookup,
            csv,
            output,
        } => commands::finalize::run(&config, drafts_file, lookup, csv, &output),
        Commands::Ladder {
            price,
            lookup,
            output,
        } => commands::ladder::run(&config, price, lookup, &output),
        Commands::Lookup { action } => match action {
            LookupAction::Show { file, output } => {
                commands::lookup::show(&config, file.as_deref(), &output)
            }
            LookupAction::Validate { file } => commands::lookup::validate(&config, &file),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
