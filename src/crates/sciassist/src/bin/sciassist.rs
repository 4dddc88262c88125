//! sciassist CLI
//!
//! Main entry point for the sciassist command-line tool.

use anyhow::Context;
use clap::{Parser, Subcommand};
use sciassist::cli::{self, OutputFormat};
use sciassist::dispatcher::Credentials;
use sciassist::{AppConfig, Dispatcher};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "sciassist")]
#[command(about = "Route scientific queries to code generation or computation lookup", long_about = None)]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Config file (default: config/sciassist.toml, then ./sciassist.toml)
    #[arg(short, long, global = true, env = "SCIASSIST_CONFIG")]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Log at debug level unless RUST_LOG is set
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the interactive form
    Serve,

    /// Route a query to code generation or lookup
    Query {
        /// Query text
        query: String,
    },

    /// Generate code for an intent
    Generate {
        /// What the code should do
        intent: String,
        /// Few-shot example; repeatable. Defaults to the configured examples.
        #[arg(short, long = "example")]
        examples: Vec<String>,
    },

    /// Ask the model to debug code
    Debug {
        /// Code to debug
        #[arg(required_unless_present = "file")]
        code: Option<String>,
        /// Read the code from a file
        #[arg(long, conflicts_with = "code")]
        file: Option<PathBuf>,
    },

    /// Generate code and run it on a new compute instance
    Deploy {
        /// What the code should do
        #[arg(required_unless_present = "code_file")]
        intent: Option<String>,
        /// Task size: simple, moderate or complex
        #[arg(short, long, default_value = "simple")]
        task_type: String,
        /// Few-shot example; repeatable. Defaults to the configured examples.
        #[arg(short, long = "example")]
        examples: Vec<String>,
        /// Deploy this file instead of generating code
        #[arg(long)]
        code_file: Option<PathBuf>,
    },

    /// Query the computation service directly
    Lookup {
        /// One or more queries, answered concurrently
        #[arg(required = true)]
        queries: Vec<String>,
    },

    /// Show the compute tier for a task size
    Classify {
        /// Task size label
        task_type: String,
    },

    /// Run the lookup-batch notebook over a file of queries
    Notebook {
        /// One query per line; blank lines and # comments are skipped
        file: PathBuf,
    },

    /// Show version information
    Version,
}

impl Commands {
    /// Backends whose credentials the command cannot run without
    fn credentials(&self) -> Credentials {
        match self {
            Commands::Serve | Commands::Query { .. } => Credentials::ALL,
            Commands::Generate { .. } | Commands::Debug { .. } => Credentials::MODEL,
            Commands::Deploy { code_file: Some(_), .. } => Credentials::NONE,
            Commands::Deploy { .. } => Credentials::MODEL,
            Commands::Lookup { .. } | Commands::Notebook { .. } => Credentials::LOOKUP,
            Commands::Classify { .. } | Commands::Version => Credentials::NONE,
        }
    }
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<AppConfig> {
    let config = match path {
        Some(path) => AppConfig::load_from(path),
        None => AppConfig::load(),
    }
    .context("failed to load configuration")?;
    tracing::info!("Configuration: {}", config.summary());
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    tooling::logging::init_tracing(if args.verbose { "debug" } else { "warn" })?;

    let format = args.format;
    let config = match args.command {
        Commands::Version => {
            println!("{}", sciassist::version::version_line());
            return Ok(());
        }
        _ => load_config(args.config.as_ref())?,
    };

    if let Commands::Classify { task_type } = &args.command {
        cli::handle_classify(task_type, &config.provisioner.machine_types, format)?;
        return Ok(());
    }

    let dispatcher = Arc::new(Dispatcher::from_config_requiring(
        &config,
        args.command.credentials(),
    )?);
    let default_examples = dispatcher.examples().to_vec();
    let with_defaults = |examples: Vec<String>| {
        if examples.is_empty() {
            default_examples.clone()
        } else {
            examples
        }
    };

    match args.command {
        Commands::Serve => cli::serve(dispatcher, &config.server).await?,
        Commands::Query { query } => cli::handle_query(&dispatcher, &query, format).await?,
        Commands::Generate { intent, examples } => {
            cli::handle_generate(&dispatcher, &intent, &with_defaults(examples), format).await?
        }
        Commands::Debug { code, file } => {
            let code = match file {
                Some(path) => std::fs::read_to_string(&path)
                    .with_context(|| format!("failed to read {}", path.display()))?,
                None => code.unwrap_or_default(),
            };
            cli::handle_debug(&dispatcher, &code, format).await?
        }
        Commands::Deploy {
            intent,
            task_type,
            examples,
            code_file,
        } => {
            let code = code_file
                .map(|path| {
                    std::fs::read_to_string(&path)
                        .with_context(|| format!("failed to read {}", path.display()))
                })
                .transpose()?;
            cli::handle_deploy(
                &dispatcher,
                intent.as_deref().unwrap_or_default(),
                &with_defaults(examples),
                &task_type,
                code,
                format,
            )
            .await?
        }
        Commands::Lookup { queries } => cli::handle_lookup(&dispatcher, &queries, format).await?,
        Commands::Notebook { file } => cli::handle_notebook(dispatcher, file, format).await?,
        Commands::Classify { .. } | Commands::Version => {}
    }

    Ok(())
}
