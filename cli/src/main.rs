use clap::{Parser, Subcommand};
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

use astproto::{compile_schema, compile_schema_to_typescript, generate_file, schema_to_json, GeneratorConfig};
use astproto::error::AstProtoError;
use astproto_compiler::emitter::node_types;

#[derive(Parser)]
#[command(name = "astproto")]
#[command(about = "Generate TypeScript AST encoders from protobuf-style schemas", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the TypeScript encoder module for a schema
    Generate {
        /// Input schema file
        #[arg(short, long)]
        input: PathBuf,

        /// Output `.ts` file (if omitted, prints to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// JSON generator config overriding the defaults
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Print the parsed schema tree as JSON
    Dump {
        /// Input schema file
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Parse and generate without writing anything
    Check {
        /// Input schema file
        #[arg(short, long)]
        input: PathBuf,

        /// JSON generator config overriding the defaults
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn load_config(path: Option<&Path>) -> Result<GeneratorConfig, AstProtoError> {
    match path {
        Some(p) => {
            debug!("loading generator config from {}", p.display());
            GeneratorConfig::from_json_file(p)
        }
        None => Ok(GeneratorConfig::default()),
    }
}

fn main() -> Result<(), AstProtoError> {
    env_logger::init();
    let cli = Cli::parse();

    match &cli.command {
        Commands::Generate { input, output, config } => {
            let config = load_config(config.as_deref())?;
            if let Some(out_path) = output {
                generate_file(input, out_path, &config)?;
                println!("Generated {} → {}", input.display(), out_path.display());
            } else {
                let text = fs::read_to_string(input)?;
                let schema = compile_schema(&text)?;
                println!("{}", compile_schema_to_typescript(&schema, &config)?);
            }
            Ok(())
        }

        Commands::Dump { input } => {
            let text = fs::read_to_string(input)?;
            println!("{}", schema_to_json(&text)?);
            Ok(())
        }

        Commands::Check { input, config } => {
            let config = load_config(config.as_deref())?;
            let text = fs::read_to_string(input)?;
            let schema = compile_schema(&text)?;
            compile_schema_to_typescript(&schema, &config)?;
            println!(
                "{}: {} nodes, {} node types",
                input.display(),
                schema.node_count(),
                node_types(&schema, &config).len()
            );
            Ok(())
        }
    }
}
