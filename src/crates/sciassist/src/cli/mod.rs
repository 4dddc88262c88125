//! Command handlers for the `sciassist` binary
//!
//! Each handler runs one dispatcher operation and prints the result to
//! stdout, as plain text or JSON.

pub mod server;

pub use server::serve;

use crate::classifier::classify_label;
use crate::codegen::GeneratedCode;
use crate::dispatcher::Dispatcher;
use crate::notebook::{AnalysisNotebook, LookupBatchNotebook};
use crate::Result;
use clap::ValueEnum;
use serde::Serialize;
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;

/// How command results are printed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value)
        .map_err(|e| crate::SciassistError::Config(format!("cannot render JSON: {}", e)))?;
    println!("{}", rendered);
    Ok(())
}

/// Route and answer a query
pub async fn handle_query(dispatcher: &Dispatcher, query: &str, format: OutputFormat) -> Result<()> {
    let outcome = dispatcher.dispatch(query).await?;
    match format {
        OutputFormat::Text => println!("{}", outcome.text),
        OutputFormat::Json => print_json(&outcome)?,
    }
    Ok(())
}

/// Generate code with explicit examples, bypassing routing
pub async fn handle_generate(
    dispatcher: &Dispatcher,
    intent: &str,
    examples: &[String],
    format: OutputFormat,
) -> Result<()> {
    let code = dispatcher.generate(intent, examples).await?;
    match format {
        OutputFormat::Text => println!("{}", code),
        OutputFormat::Json => print_json(&json!({ "code": code }))?,
    }
    Ok(())
}

pub async fn handle_debug(dispatcher: &Dispatcher, code: &str, format: OutputFormat) -> Result<()> {
    let debugged = dispatcher.debug(code).await?;
    match format {
        OutputFormat::Text => println!("{}", debugged),
        OutputFormat::Json => print_json(&json!({ "code": debugged }))?,
    }
    Ok(())
}

/// Generate code, or take it from a file, and provision an instance for it
pub async fn handle_deploy(
    dispatcher: &Dispatcher,
    intent: &str,
    examples: &[String],
    task_type: &str,
    code: Option<String>,
    format: OutputFormat,
) -> Result<()> {
    let (code, instance) = match code {
        Some(code) => {
            let code = GeneratedCode::new(code);
            let instance = dispatcher.deploy(task_type, code.clone()).await?;
            (code, instance)
        }
        None => {
            let deployment = dispatcher.generate_and_deploy(intent, examples, task_type).await?;
            (deployment.code, deployment.instance)
        }
    };

    match format {
        OutputFormat::Text => {
            println!("Instance {} requested in {}", instance.name, instance.zone);
            println!("  Machine type: {}", instance.machine_type);
            if let Some(status) = &instance.status {
                println!("  Status: {}", status);
            }
            println!("  Code: {} chars", code.as_str().chars().count());
        }
        OutputFormat::Json => print_json(&json!({ "code": code, "instance": instance }))?,
    }
    Ok(())
}

/// Look up several queries concurrently; failures are reported per query
pub async fn handle_lookup(dispatcher: &Dispatcher, queries: &[String], format: OutputFormat) -> Result<()> {
    let answers = dispatcher.lookup_many(queries).await;

    match format {
        OutputFormat::Text => {
            for (query, answer) in queries.iter().zip(&answers) {
                println!("> {}", query);
                match answer {
                    Ok(text) => println!("{}\n", text),
                    Err(e) => println!("error: {}\n", e),
                }
            }
        }
        OutputFormat::Json => {
            let rows: Vec<_> = queries
                .iter()
                .zip(&answers)
                .map(|(query, answer)| match answer {
                    Ok(text) => json!({ "query": query, "answer": text }),
                    Err(e) => json!({ "query": query, "error": e.to_string(), "kind": e.kind() }),
                })
                .collect();
            print_json(&rows)?;
        }
    }
    Ok(())
}

/// Show the classification and machine type for a task-size label
pub fn handle_classify(
    task_type: &str,
    machine_types: &crate::classifier::MachineTypes,
    format: OutputFormat,
) -> Result<()> {
    let classification = classify_label(task_type);
    let tier = classification.tier();
    let machine_type = machine_types.for_tier(tier);

    match format {
        OutputFormat::Text => println!("{} -> {} ({})", classification, tier, machine_type),
        OutputFormat::Json => print_json(&json!({
            "classification": classification.label(),
            "tier": tier,
            "machine_type": machine_type,
        }))?,
    }
    Ok(())
}

/// Run the lookup-batch notebook over a query file
pub async fn handle_notebook(dispatcher: Arc<Dispatcher>, path: PathBuf, format: OutputFormat) -> Result<()> {
    let run = LookupBatchNotebook::new(dispatcher, path).run().await?;
    match format {
        OutputFormat::Text => {
            println!("# {}", run.title);
            for line in &run.versions {
                println!("{}", line);
            }
            println!("\n{}", run.rendering);
        }
        OutputFormat::Json => print_json(&run)?,
    }
    Ok(())
}
