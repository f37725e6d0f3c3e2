use std::error::Error;
use std::fs;
use std::path::PathBuf;

use boolq_core::wire::query_from_json;
use boolq_core::{GroupId, OperandRef};
use boolq_store::{render_equation, QueryStore};
use clap::{Args as ClapArgs, Parser, Subcommand};
use serde_json::json;

#[derive(Parser, Debug)]
#[command(name = "boolq", about = "Boolean query builder engine CLI")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate a query document against the wire schema.
    Validate(ValidateArgs),
    /// Round-trip a document through the normalized store.
    Normalize(NormalizeArgs),
    /// Render the infix equation for a document.
    Equation(EquationArgs),
    /// Report normalized-store statistics for a document.
    Inspect(InspectArgs),
}

#[derive(ClapArgs, Debug)]
struct ValidateArgs {
    /// JSON query document to validate.
    #[arg(long = "in")]
    input: PathBuf,
}

#[derive(ClapArgs, Debug)]
struct NormalizeArgs {
    /// JSON query document to round-trip.
    #[arg(long = "in")]
    input: PathBuf,
    /// Output path for the re-exported document; stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(ClapArgs, Debug)]
struct EquationArgs {
    /// JSON query document to render.
    #[arg(long = "in")]
    input: PathBuf,
}

#[derive(ClapArgs, Debug)]
struct InspectArgs {
    /// JSON query document to inspect.
    #[arg(long = "in")]
    input: PathBuf,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    match cli.command {
        Command::Validate(args) => validate(&args),
        Command::Normalize(args) => normalize(&args),
        Command::Equation(args) => equation(&args),
        Command::Inspect(args) => inspect(&args),
    }
}

fn validate(args: &ValidateArgs) -> Result<(), Box<dyn Error>> {
    let content = fs::read_to_string(&args.input)?;
    let query = query_from_json(&content)?;
    query.validate()?;
    println!(
        "{}",
        serde_json::to_string_pretty(&json!({
            "status": "ok",
            "input": args.input,
        }))?
    );
    Ok(())
}

fn normalize(args: &NormalizeArgs) -> Result<(), Box<dyn Error>> {
    let content = fs::read_to_string(&args.input)?;
    let store = QueryStore::import_json(&content)?;
    store.check_invariants()?;
    let exported = store.export_json()?;
    match &args.out {
        Some(path) => fs::write(path, exported)?,
        None => println!("{exported}"),
    }
    Ok(())
}

fn equation(args: &EquationArgs) -> Result<(), Box<dyn Error>> {
    let content = fs::read_to_string(&args.input)?;
    let store = QueryStore::import_json(&content)?;
    println!("{}", render_equation(&store)?);
    Ok(())
}

fn inspect(args: &InspectArgs) -> Result<(), Box<dyn Error>> {
    let content = fs::read_to_string(&args.input)?;
    let store = QueryStore::import_json(&content)?;
    store.check_invariants()?;
    let depth = group_depth(&store, store.root_id());
    println!(
        "{}",
        serde_json::to_string_pretty(&json!({
            "rules": store.rule_count(),
            "groups": store.group_count(),
            "depth": depth,
        }))?
    );
    Ok(())
}

fn group_depth(store: &QueryStore, id: &GroupId) -> usize {
    let Ok(group) = store.group(id) else {
        return 0;
    };
    let nested = std::iter::once(&group.join)
        .chain(group.operands.iter())
        .filter_map(|reference| match reference {
            OperandRef::Group(child) => Some(group_depth(store, child)),
            OperandRef::Rule(_) => None,
        })
        .max()
        .unwrap_or(0);
    1 + nested
}
