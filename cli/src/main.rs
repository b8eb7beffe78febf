//! `lgc` — generate and inspect randomized boolean logic circuits.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use lgc_core::{
    Circuit, Diagnostics, GenParams, boolean_expressions, build_truth_table, difficulty, generate,
};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Parser)]
#[command(name = "lgc")]
#[command(about = "Random logic circuit generator and analyzer", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a random circuit and report on it
    Generate {
        /// Number of input gates
        #[arg(short = 'i', long, default_value = "2")]
        inputs: u32,

        /// Number of output gates
        #[arg(short = 'o', long, default_value = "1")]
        outputs: u32,

        /// Number of fixed-width hidden layers
        #[arg(short = 'l', long, default_value = "1")]
        layers: u32,

        /// Gates per hidden layer
        #[arg(short = 's', long, default_value = "3")]
        layer_size: u32,

        /// RNG seed; omit for a fresh circuit every run
        #[arg(long)]
        seed: Option<u64>,

        /// Write the structural JSON record to this file
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,

        /// Print the full truth table
        #[arg(short = 't', long)]
        table: bool,

        /// Print one boolean expression per output
        #[arg(short = 'e', long)]
        expressions: bool,
    },

    /// Summarize a circuit JSON file
    Info {
        /// Circuit JSON file
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Print the truth table of a circuit JSON file
    Table {
        /// Circuit JSON file
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Generate {
            inputs,
            outputs,
            layers,
            layer_size,
            seed,
            out,
            table,
            expressions,
        } => cmd_generate(
            GenParams {
                input_count: inputs,
                output_count: outputs,
                layer_count: layers,
                layer_size,
            },
            seed,
            out.as_deref(),
            table,
            expressions,
        ),
        Commands::Info { file } => cmd_info(&file),
        Commands::Table { file } => cmd_table(&file),
    }
}

fn cmd_generate(
    params: GenParams,
    seed: Option<u64>,
    out: Option<&Path>,
    table: bool,
    expressions: bool,
) -> anyhow::Result<()> {
    let mut rng = match seed {
        Some(seed) => ChaCha20Rng::seed_from_u64(seed),
        None => ChaCha20Rng::from_os_rng(),
    };

    let generated = generate(&params, &mut rng)?;
    let mut circuit = generated.circuit;
    let mut diagnostics = generated.diagnostics;

    print_summary(&circuit);

    if expressions {
        print_expressions(&circuit);
    }

    if table {
        let truth_table = build_truth_table(&mut circuit, &mut diagnostics)?;
        println!("\nTruth table:");
        print!("{truth_table}");
    }

    if let Some(path) = out {
        let exported = lgc_fmt::export(&circuit, Some(path))?;
        match exported.write_error {
            None => println!("\nWrote {}", path.display()),
            Some(error) => {
                // keep the record available even though persisting failed
                eprintln!("Could not write {}: {error}", path.display());
                println!("{}", exported.json);
            }
        }
    }

    print_diagnostics(&diagnostics);
    Ok(())
}

fn cmd_info(file: &Path) -> anyhow::Result<()> {
    let decoded = read_circuit(file)?;
    print_summary(&decoded.circuit);
    print_expressions(&decoded.circuit);
    print_diagnostics(&decoded.diagnostics);
    Ok(())
}

fn cmd_table(file: &Path) -> anyhow::Result<()> {
    let decoded = read_circuit(file)?;
    let mut circuit = decoded.circuit;
    let mut diagnostics = decoded.diagnostics;

    let truth_table = build_truth_table(&mut circuit, &mut diagnostics)?;
    print!("{truth_table}");
    print_diagnostics(&diagnostics);
    Ok(())
}

fn read_circuit(file: &Path) -> anyhow::Result<lgc_fmt::Decoded> {
    let json = fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let record = lgc_fmt::from_json(&json)
        .with_context(|| format!("{} is not a circuit record", file.display()))?;
    Ok(lgc_fmt::decode(&record)?)
}

fn print_summary(circuit: &Circuit) {
    let hidden_gates: usize = circuit.hidden_layers().iter().map(Vec::len).sum();

    println!("Circuit Summary:");
    println!("  Inputs: {}", circuit.inputs().len());
    println!(
        "  Hidden layers: {} ({hidden_gates} gates)",
        circuit.hidden_layers().len()
    );
    println!("  Outputs: {}", circuit.outputs().len());

    let mut by_kind: BTreeMap<&'static str, usize> = BTreeMap::new();
    for &g in circuit.all_gates() {
        *by_kind.entry(circuit.kind(g).type_name()).or_insert(0) += 1;
    }
    let kinds: Vec<String> = by_kind
        .iter()
        .map(|(name, count)| format!("{name}: {count}"))
        .collect();
    println!("  Gate kinds: {}", kinds.join(", "));
    println!("  Difficulty: {}", difficulty(circuit));
    println!(
        "  Fully connected: {}",
        if circuit.is_fully_connected() { "yes" } else { "no" }
    );
}

fn print_expressions(circuit: &Circuit) {
    println!("\nBoolean expressions:");
    for (i, expression) in boolean_expressions(circuit).iter().enumerate() {
        println!("  Q{i} = {expression}");
    }
}

fn print_diagnostics(diagnostics: &Diagnostics) {
    if diagnostics.is_clean() {
        return;
    }
    println!("\nDiagnostics ({}):", diagnostics.len());
    for entry in diagnostics.iter() {
        println!("  {entry}");
    }
}
