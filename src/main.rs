use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use simplelog::LevelFilter;

use bank_statement_converter::output::qif;
use bank_statement_converter::pipeline::{self, Options};

/// Convert Australian bank PDF statements to CSV and QIF.
#[derive(Parser)]
#[command(name = "bstc", version)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Logging level.
    #[arg(long, default_value = "Info")]
    log_level: LevelFilter,
}

#[derive(Subcommand)]
enum Command {
    /// Auto-detect the bank and convert one PDF to CSV (optionally QIF).
    File {
        /// Path to the input PDF.
        pdf_path: PathBuf,

        /// Also convert the resulting CSV to QIF.
        #[arg(short, long)]
        qif: bool,

        /// Remove the intermediary CSV after QIF conversion (implies -q).
        #[arg(short = 'r', long = "rm-csv")]
        rm_csv: bool,
    },
    /// Convert every PDF in a folder to CSV (optionally QIF).
    Folder {
        /// Path to the folder containing PDFs.
        folder_path: PathBuf,

        /// Also convert each CSV to QIF.
        #[arg(short, long)]
        qif: bool,

        /// Remove each intermediary CSV after QIF conversion (implies -q).
        #[arg(short = 'r', long = "rm-csv")]
        rm_csv: bool,
    },
    /// Convert one CSV to QIF.
    Csv2qif {
        /// Path to the input CSV.
        csv_path: PathBuf,
    },
}

fn options(qif: bool, rm_csv: bool) -> Options {
    Options {
        qif: qif || rm_csv,
        remove_csv: rm_csv,
    }
}

fn run() -> Result<()> {
    let args = Args::parse();

    simplelog::SimpleLogger::init(args.log_level, simplelog::Config::default())
        .with_context(|| "configuring logging")?;

    let written = match args.command {
        Command::File {
            pdf_path,
            qif,
            rm_csv,
        } => pipeline::convert_pdf(&pdf_path, options(qif, rm_csv))
            .with_context(|| format!("converting {}", pdf_path.display()))?,
        Command::Folder {
            folder_path,
            qif,
            rm_csv,
        } => pipeline::convert_folder(&folder_path, options(qif, rm_csv))
            .with_context(|| format!("converting folder {}", folder_path.display()))?,
        Command::Csv2qif { csv_path } => {
            let qif_path = qif::csv_to_qif(&csv_path)
                .with_context(|| format!("converting {}", csv_path.display()))?;
            vec![qif_path]
        }
    };

    for path in written {
        println!("{}", path.display());
    }
    Ok(())
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
