use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use mn_core::Tolerances;
use mn_project::NetworkDef;
use mn_solver::{Network, SolveConfig, SweepParams, SweepSpacing};

mod error;

use error::{CliError, CliResult};

#[derive(Parser)]
#[command(name = "mn-cli")]
#[command(about = "mechnet CLI - transfer functions of mechanical networks", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Options of the symbolic solve, shared by `transfer` and `sweep`.
#[derive(Args)]
struct SolveArgs {
    /// Keep common factors of numerator and denominator
    #[arg(long)]
    no_reduce: bool,
    /// Relative tolerance for polynomial arithmetic
    #[arg(long, default_value_t = 1e-9)]
    rel_tol: f64,
}

impl SolveArgs {
    fn config(&self) -> SolveConfig {
        SolveConfig {
            tolerances: Tolerances {
                rel: self.rel_tol,
                ..Tolerances::default()
            },
            reduce: !self.no_reduce,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Validate network file syntax and structure
    Validate {
        /// Path to the network YAML or JSON file
        network_path: PathBuf,
    },
    /// Print the equation of motion of every coordinate
    Equations {
        /// Path to the network YAML or JSON file
        network_path: PathBuf,
    },
    /// Derive the transfer function x_last / x_first
    Transfer {
        /// Path to the network YAML or JSON file
        network_path: PathBuf,
        /// Also print every coordinate's response per unit excitation
        #[arg(long)]
        responses: bool,
        #[command(flatten)]
        solve: SolveArgs,
    },
    /// Evaluate the frequency response along s = jw
    Sweep {
        /// Path to the network YAML or JSON file
        network_path: PathBuf,
        /// Lowest angular frequency (rad/s)
        #[arg(long)]
        w_min: f64,
        /// Highest angular frequency (rad/s)
        #[arg(long)]
        w_max: f64,
        /// Number of frequencies, endpoints included
        #[arg(long, default_value_t = 50)]
        points: usize,
        /// Space frequencies linearly instead of logarithmically
        #[arg(long)]
        linear: bool,
        /// Output CSV file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[command(flatten)]
        solve: SolveArgs,
    },
}

fn main() -> CliResult<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { network_path } => cmd_validate(&network_path),
        Commands::Equations { network_path } => cmd_equations(&network_path),
        Commands::Transfer {
            network_path,
            responses,
            solve,
        } => cmd_transfer(&network_path, &solve.config(), responses),
        Commands::Sweep {
            network_path,
            w_min,
            w_max,
            points,
            linear,
            output,
            solve,
        } => {
            let params = SweepParams {
                w_start: w_min,
                w_stop: w_max,
                points,
                spacing: if linear {
                    SweepSpacing::Linear
                } else {
                    SweepSpacing::Logarithmic
                },
            };
            cmd_sweep(&network_path, &params, &solve.config(), output.as_deref())
        }
    }
}

fn load(path: &Path) -> CliResult<NetworkDef> {
    mn_project::load(path).map_err(|source| CliError::Load {
        path: path.to_path_buf(),
        source,
    })
}

fn load_network(path: &Path) -> CliResult<Network> {
    let def = load(path)?;
    tracing::info!(name = %def.name, masses = def.masses.len(), "loaded network");
    Ok(def.to_network()?)
}

fn cmd_validate(network_path: &Path) -> CliResult<()> {
    println!("Validating network: {}", network_path.display());
    let def = load(network_path)?;
    let network = def.to_network()?;
    // Catches what the file schema cannot, such as a coordinate in the excitation
    network.linear_system()?;
    println!(
        "✓ Network is valid ({} coordinates, {} elements)",
        network.coordinates().len(),
        def.elements.len()
    );
    Ok(())
}

fn cmd_equations(network_path: &Path) -> CliResult<()> {
    let network = load_network(network_path)?;
    for equation in network.equations() {
        println!("{equation}");
    }
    Ok(())
}

fn cmd_transfer(network_path: &Path, config: &SolveConfig, responses: bool) -> CliResult<()> {
    let network = load_network(network_path)?;
    let tf = network.transfer_with(config)?;

    let response = network.response_coordinate().label();
    let excited = network.excited_coordinate().label();
    println!("x{response} / x{excited} = {tf}");
    match tf.value_at_zero() {
        Some(dc) => println!("DC gain: {dc}"),
        None => println!("DC gain: unbounded (pole at s = 0)"),
    }

    if responses {
        println!();
        println!("Responses per unit excitation ({}):", network.excitation());
        for (id, r) in network.coordinates().ids().zip(network.responses_with(config)?) {
            println!("  x{} = {}", id.label(), r);
        }
    }
    Ok(())
}

fn cmd_sweep(
    network_path: &Path,
    params: &SweepParams,
    config: &SolveConfig,
    output: Option<&Path>,
) -> CliResult<()> {
    let network = load_network(network_path)?;
    let sweep = network.sweep_with(params, config)?;

    let mut csv = String::from("omega_rad_s,magnitude_db,phase_deg\n");
    for point in sweep.points() {
        csv.push_str(&format!(
            "{},{},{}\n",
            point.omega,
            point.magnitude_db(),
            point.phase_deg()
        ));
    }

    if let Some(path) = output {
        std::fs::write(path, csv).map_err(|source| CliError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        println!(
            "✓ Exported {} frequency points to {}",
            sweep.points().len(),
            path.display()
        );
    } else {
        print!("{csv}");
    }
    Ok(())
}
