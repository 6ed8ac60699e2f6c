//! ALICE-Column-Meta CLI
//!
//! Inspect and verify the column metadata of a segment.

use alice_column_meta::{ColumnMetadata, SegmentColumns};
use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "alice-column-meta")]
#[command(author = "Moroya Sakamoto")]
#[command(version = "1.0.0")]
#[command(about = "Inspect per-column segment metadata (metadata.properties)")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the full metadata of every column (or one column)
    Describe {
        /// Segment metadata file (metadata.properties)
        input: PathBuf,

        /// Only this column
        #[arg(short, long)]
        column: Option<String>,

        /// Output JSON instead of the text dump
        #[arg(long)]
        json: bool,
    },

    /// List columns with type, role and cardinality
    Columns {
        /// Segment metadata file (metadata.properties)
        input: PathBuf,
    },

    /// Decode every column and check min <= max
    Verify {
        /// Segment metadata file (metadata.properties)
        input: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Describe { input, column, json } => {
            describe(&input, column.as_deref(), json)?;
        }
        Commands::Columns { input } => {
            list_columns(&input)?;
        }
        Commands::Verify { input } => {
            verify(&input)?;
        }
    }

    Ok(())
}

fn describe(input: &PathBuf, column: Option<&str>, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let segment = SegmentColumns::load(input)?;

    let selected: Vec<&ColumnMetadata> = match column {
        Some(name) => match segment.get(name) {
            Some(meta) => vec![meta],
            None => return Err(format!("Column not found: {}", name).into()),
        },
        None => segment.iter().collect(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&selected)?);
    } else {
        for meta in selected {
            println!("{}", meta);
        }
    }

    Ok(())
}

fn list_columns(input: &PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let segment = SegmentColumns::load(input)?;

    println!("{:20} {:8} {:10} {:>12}", "COLUMN", "TYPE", "ROLE", "CARDINALITY");
    println!("{}", "-".repeat(53));
    for meta in &segment {
        let cardinality = if meta.has_unknown_cardinality() {
            "unknown".to_string()
        } else {
            meta.cardinality().to_string()
        };
        println!(
            "{:20} {:8} {:10} {:>12}",
            meta.column_name(),
            meta.data_type().name(),
            meta.field_type().name(),
            cardinality
        );
    }
    println!();
    println!("({} columns)", segment.len());

    Ok(())
}

fn verify(input: &PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    print!("Verifying {}... ", input.display());
    io::stdout().flush()?;

    let segment = match SegmentColumns::load(input) {
        Ok(segment) => segment,
        Err(e) => {
            println!("FAILED");
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let out_of_order: Vec<&str> = segment
        .iter()
        .filter(|meta| match (meta.min_value(), meta.max_value()) {
            (Some(min), Some(max)) => !matches!(min.partial_cmp(max), Some(o) if o.is_le()),
            _ => false,
        })
        .map(|meta| meta.column_name())
        .collect();

    if out_of_order.is_empty() {
        println!("OK ({} columns)", segment.len());
    } else {
        println!("FAILED");
        for name in out_of_order {
            eprintln!("Error: column {} has minValue > maxValue", name);
        }
        std::process::exit(1);
    }

    Ok(())
}
