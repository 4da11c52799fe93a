mod error_formatter;
mod formatter;
mod server;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use costing::{ElementFormulas, Engine, VariableTable};
use formatter::Formatter;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "costing")]
#[command(about = "Safe formulas for material and labor costs.")]
#[command(
    long_about = "Evaluate cost formulas that refer to named variables, convert them between display and storage form,\nestimate element costs, or serve the engine over HTTP."
)]
#[command(version)]
struct Cli {
    /// Log engine decisions to stderr (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a formula against a variable table
    ///
    /// Unknown references and malformed formulas evaluate to 0 unless --strict is given.
    Eval {
        /// The formula, e.g. "Wall Length * Wall Height" or "{v1} * 2"
        formula: String,
        /// JSON file holding an array of variables ({id, name, value?, type?})
        #[arg(long = "vars", value_name = "FILE")]
        vars: Option<PathBuf>,
        /// Fail with a diagnostic instead of degrading to 0
        #[arg(short, long)]
        strict: bool,
        /// Output the bare value only (for piping to other tools)
        #[arg(short = 'r', long)]
        raw: bool,
        /// Show the resolved expression, the variables used and each arithmetic step
        #[arg(short = 'e', long, conflicts_with = "raw")]
        explain: bool,
    },
    /// Check a formula for unknown references and syntax errors
    Check {
        formula: String,
        #[arg(long = "vars", value_name = "FILE")]
        vars: Option<PathBuf>,
    },
    /// Convert {id} tokens to {name} tokens
    Display {
        formula: String,
        #[arg(long = "vars", value_name = "FILE")]
        vars: PathBuf,
    },
    /// Convert {name} tokens to {id} tokens
    ///
    /// With --bracket, bare variable names are turned into {id} tokens as well.
    Store {
        formula: String,
        #[arg(long = "vars", value_name = "FILE")]
        vars: PathBuf,
        /// Also bracket bare variable names
        #[arg(short, long)]
        bracket: bool,
    },
    /// Wrap every {name} token in highlight markers
    Highlight {
        formula: String,
        /// Opening marker (default: an HTML span)
        #[arg(long, requires = "close")]
        open: Option<String>,
        /// Closing marker
        #[arg(long, requires = "open")]
        close: Option<String>,
    },
    /// List the variables in a table
    Vars {
        #[arg(long = "vars", value_name = "FILE")]
        vars: PathBuf,
    },
    /// Compute material and labor costs for a list of elements
    ///
    /// ELEMENTS is a JSON file holding an array of {name, materialCostFormula?, laborCostFormula?}.
    Estimate {
        #[arg(value_name = "ELEMENTS")]
        elements: PathBuf,
        #[arg(long = "vars", value_name = "FILE")]
        vars: PathBuf,
        /// Print the estimate as JSON
        #[arg(long)]
        json: bool,
    },
    /// Start HTTP REST API server (default: localhost:3000)
    ///
    /// Runs a server that evaluates formulas via HTTP POST requests.
    /// API: POST /evaluate with {formula, variables?}
    Server {
        /// Host address to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
        /// Port number to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,
        /// Variable table used when a request does not supply one
        #[arg(long = "vars", value_name = "FILE")]
        vars: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match &cli.command {
        Commands::Eval {
            formula,
            vars,
            strict,
            raw,
            explain,
        } => eval_command(formula, vars.as_deref(), *strict, *raw, *explain),
        Commands::Check { formula, vars } => check_command(formula, vars.as_deref()),
        Commands::Display { formula, vars } => display_command(formula, vars),
        Commands::Store {
            formula,
            vars,
            bracket,
        } => store_command(formula, vars, *bracket),
        Commands::Highlight {
            formula,
            open,
            close,
        } => highlight_command(formula, open.as_deref(), close.as_deref()),
        Commands::Vars { vars } => vars_command(vars),
        Commands::Estimate {
            elements,
            vars,
            json,
        } => estimate_command(elements, vars, *json),
        Commands::Server { host, port, vars } => server_command(host, *port, vars.as_deref()),
    };

    if let Err(e) = result {
        // Check if it's a CostingError and format it nicely, otherwise use default
        if let Some(costing_err) = e.downcast_ref::<costing::CostingError>() {
            eprintln!("{}", error_formatter::format_error(costing_err));
        } else {
            eprintln!("Error: {:#}", e);
        }
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_directive = if verbose { "costing=debug" } else { "costing=warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default_directive.into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn eval_command(
    formula: &str,
    vars: Option<&Path>,
    strict: bool,
    raw: bool,
    explain: bool,
) -> Result<()> {
    let table = load_table(vars)?;
    let engine = Engine::new();
    let formatter = Formatter::default();

    if explain {
        let evaluation = engine.explain(formula, &table);
        print!("{}", formatter.format_evaluation(&evaluation));
        return Ok(());
    }

    let value = if strict {
        engine.try_evaluate(formula, &table)?
    } else {
        engine.evaluate(formula, &table)
    };

    if raw {
        println!("{}", value);
    } else {
        println!("{} = {}", formula.trim(), formatter.format_value(value));
        for unknown in engine.unknown_references(formula, &table) {
            eprintln!("warning: unknown variable {} counted as 0", unknown);
        }
    }

    Ok(())
}

fn check_command(formula: &str, vars: Option<&Path>) -> Result<()> {
    let table = load_table(vars)?;
    let report = Engine::new().check(formula, &table);

    if report.is_valid() {
        println!("ok");
        return Ok(());
    }

    for unknown in &report.unknown {
        eprintln!(
            "{}",
            error_formatter::format_unknown_reference(formula, unknown)
        );
    }
    if let Some(error) = &report.error {
        eprintln!("{}", error_formatter::format_error(error));
    }
    std::process::exit(1);
}

fn display_command(formula: &str, vars: &Path) -> Result<()> {
    let table = load_table(Some(vars))?;
    println!("{}", costing::to_display_form(formula, &table));
    Ok(())
}

fn store_command(formula: &str, vars: &Path, bracket: bool) -> Result<()> {
    let table = load_table(Some(vars))?;
    let stored = costing::to_storage_form(formula, &table);
    if bracket {
        println!("{}", costing::bracket_bare_names(&stored, &table));
    } else {
        println!("{}", stored);
    }
    Ok(())
}

fn highlight_command(formula: &str, open: Option<&str>, close: Option<&str>) -> Result<()> {
    let highlighted = match (open, close) {
        (Some(open), Some(close)) => costing::Highlighter::new(open, close).highlight(formula),
        _ => costing::highlight(formula),
    };
    println!("{}", highlighted);
    Ok(())
}

fn vars_command(vars: &Path) -> Result<()> {
    let table = load_table(Some(vars))?;
    print!("{}", Formatter::default().format_variables(&table));
    Ok(())
}

fn estimate_command(elements: &Path, vars: &Path, json: bool) -> Result<()> {
    let table = load_table(Some(vars))?;
    let content = fs::read_to_string(elements)
        .with_context(|| format!("failed to read elements file {}", elements.display()))?;
    let elements: Vec<ElementFormulas> = serde_json::from_str(&content)
        .with_context(|| format!("invalid elements JSON in {}", elements.display()))?;

    let estimate = Engine::new().estimate(&elements, &table);
    for warning in &estimate.warnings {
        eprintln!("warning: {}", warning);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&estimate)?);
    } else {
        print!("{}", Formatter::default().format_estimate(&estimate));
    }
    Ok(())
}

fn server_command(host: &str, port: u16, vars: Option<&Path>) -> Result<()> {
    #[cfg(feature = "server")]
    {
        use tokio::runtime::Runtime;
        let table = load_table(vars)?;
        let rt = Runtime::new()?;
        rt.block_on(async {
            println!("Starting HTTP server with {} variable(s) loaded", table.len());
            server::http::start_server(table, host, port).await
        })?;
    }

    #[cfg(not(feature = "server"))]
    {
        let _ = (host, port, vars);
        eprintln!("Error: Server feature not enabled");
        eprintln!("Recompile with: cargo build --features server");
        std::process::exit(1);
    }

    Ok(())
}

/// Load a variable table from a JSON file; no file means an empty table
fn load_table(path: Option<&Path>) -> Result<VariableTable> {
    let Some(path) = path else {
        return Ok(VariableTable::default());
    };
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read variables file {}", path.display()))?;
    VariableTable::from_json(&content)
        .with_context(|| format!("invalid variables JSON in {}", path.display()))
}
