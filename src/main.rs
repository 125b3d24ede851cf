//! QAP GRASP Solver - Command Line Interface
//!
//! A heuristic solver for the Quadratic Assignment Problem.

use clap::{Parser, Subcommand};
use qap_grasp_solver::benchmark::{load_instances_from_dir, Benchmark, BenchmarkConfig};
use qap_grasp_solver::heuristics::grasp::{GraspConfig, GraspSolver};
use qap_grasp_solver::instance::QAPInstance;

use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "qap-grasp-solver")]
#[command(version = "1.0")]
#[command(about = "A GRASP solver for the Quadratic Assignment Problem")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a single instance
    Solve {
        /// Path to the instance file (QAPLIB format)
        #[arg(short, long)]
        instance: PathBuf,

        /// Construction greediness in (0, 1]; smaller is greedier
        #[arg(long, default_value = "0.25")]
        alpha: f64,

        /// Candidate-list retention fraction in (0, 1]
        #[arg(long, default_value = "0.5")]
        beta: f64,

        /// Iteration budget
        #[arg(short = 'n', long, default_value = "1000")]
        iterations: usize,

        /// Stop early once this cost is reached
        #[arg(short, long)]
        target: Option<i64>,

        /// Random seed (positive, non-zero)
        #[arg(short, long, default_value = "270001")]
        seed: u32,

        /// Output solution to a JSON file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Generate a random instance in QAPLIB format
    Generate {
        /// Problem size (number of facilities)
        #[arg(short = 'n', long)]
        size: usize,

        /// Maximum matrix entry
        #[arg(short, long, default_value = "100")]
        max_value: i64,

        /// Generate asymmetric matrices
        #[arg(long)]
        asymmetric: bool,

        /// Random seed
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// Output file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Analyze an instance
    Analyze {
        /// Path to the instance file
        #[arg(short, long)]
        instance: PathBuf,
    },

    /// Compare parameter presets on an instance
    Compare {
        /// Path to the instance file
        #[arg(short, long)]
        instance: PathBuf,

        /// Number of seeded runs per preset
        #[arg(short, long, default_value = "10")]
        runs: usize,

        /// Iteration budget per run
        #[arg(short = 'n', long, default_value = "200")]
        iterations: usize,

        /// Output CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Run benchmarks on a directory of instances
    Benchmark {
        /// Directory containing instance files
        #[arg(short, long)]
        dir: PathBuf,

        /// Output directory for results
        #[arg(short, long, default_value = "results")]
        output: PathBuf,

        /// Number of seeded runs per instance
        #[arg(short, long, default_value = "5")]
        runs: usize,

        /// Iteration budget per run
        #[arg(short = 'n', long, default_value = "500")]
        iterations: usize,

        /// Maximum instance size
        #[arg(long)]
        max_size: Option<usize>,
    },
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Solve {
            instance,
            alpha,
            beta,
            iterations,
            target,
            seed,
            output,
            verbose,
        } => {
            solve_instance(&instance, alpha, beta, iterations, target, seed, output, verbose);
        }

        Commands::Generate {
            size,
            max_value,
            asymmetric,
            seed,
            output,
        } => {
            generate_instance(size, max_value, asymmetric, seed, &output);
        }

        Commands::Analyze { instance } => {
            analyze_instance(&instance);
        }

        Commands::Compare {
            instance,
            runs,
            iterations,
            output,
        } => {
            compare_presets(&instance, runs, iterations, output);
        }

        Commands::Benchmark {
            dir,
            output,
            runs,
            iterations,
            max_size,
        } => {
            run_benchmark(&dir, &output, runs, iterations, max_size);
        }
    }
}

fn load_or_exit(path: &PathBuf) -> QAPInstance {
    match QAPInstance::from_file(path) {
        Ok(instance) => instance,
        Err(e) => {
            eprintln!("Error loading instance: {}", e);
            std::process::exit(1);
        }
    }
}

fn solve_instance(
    path: &PathBuf,
    alpha: f64,
    beta: f64,
    iterations: usize,
    target: Option<i64>,
    seed: u32,
    output: Option<PathBuf>,
    verbose: bool,
) {
    println!("Loading instance from {:?}...", path);
    let instance = load_or_exit(path);

    if verbose {
        println!("{}", instance.statistics());
    }

    let config = GraspConfig {
        alpha,
        beta,
        iterations,
        target: target.unwrap_or(i64::MAX),
        seed,
    };

    println!(
        "Solving {} (n={}) with GRASP (alpha={}, beta={}, budget={})...",
        instance.name, instance.n, alpha, beta, iterations
    );

    let solver = GraspSolver::new(config);
    let solution = match solver.solve(&instance) {
        Ok(solution) => solution,
        Err(e) => {
            eprintln!("Solver error: {}", e);
            std::process::exit(1);
        }
    };

    println!("\n========== Results ==========");
    println!("Algorithm: {}", solution.algorithm);
    println!("Cost: {}", solution.cost);
    println!("Iterations: {}", solution.iterations);
    println!("Target met: {}", solution.target_met);
    println!("Final seed: {}", solution.final_seed);
    println!("Time: {:.4}s", solution.computation_time);

    if verbose {
        println!("\nAssignment (facility -> location): {:?}", solution.permutation);
        println!(
            "Recomputed cost from assignment: {}",
            instance.evaluate(&solution.permutation)
        );
    }

    if let Some(out_path) = output {
        let json = serde_json::to_string_pretty(&solution).unwrap();
        std::fs::write(&out_path, json).expect("Failed to write output");
        println!("\nSolution saved to {:?}", out_path);
    }
}

fn generate_instance(size: usize, max_value: i64, asymmetric: bool, seed: u64, output: &PathBuf) {
    let name = output
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "random".to_string());

    let instance = match QAPInstance::random(&name, size, max_value, !asymmetric, seed) {
        Ok(instance) => instance,
        Err(e) => {
            eprintln!("Error generating instance: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = instance.save_to_file(output) {
        eprintln!("Error writing instance: {}", e);
        std::process::exit(1);
    }

    println!(
        "Generated {} (n={}, max={}, symmetric={}) at {:?}",
        instance.name, size, max_value, !asymmetric, output
    );
}

fn analyze_instance(path: &PathBuf) {
    let instance = load_or_exit(path);

    println!("========== Instance Analysis ==========\n");
    println!("{}", instance.statistics());

    // Quick estimate with a small budget.
    let solver = GraspSolver::new(GraspConfig {
        iterations: 50,
        ..GraspConfig::default()
    });

    match solver.solve(&instance) {
        Ok(solution) => {
            println!("Quick GRASP estimate (50 iterations): {}", solution.cost);
        }
        Err(e) => {
            eprintln!("Quick solve failed: {}", e);
        }
    }
}

fn compare_presets(path: &PathBuf, runs: usize, iterations: usize, output: Option<PathBuf>) {
    let instance = load_or_exit(path);

    println!(
        "Comparing parameter presets on {} (n={}, {} runs each)...\n",
        instance.name, instance.n, runs
    );

    let presets: Vec<(&str, f64, f64)> = vec![
        ("greedy", 0.1, 0.5),
        ("balanced", 0.25, 0.5),
        ("diverse", 0.5, 0.75),
        ("random", 0.9, 1.0),
    ];

    let mut rows: Vec<(String, Vec<i64>, Vec<f64>)> = Vec::new();

    for (name, alpha, beta) in &presets {
        let mut costs = Vec::new();
        let mut times = Vec::new();

        print!("Testing {} (alpha={}, beta={})... ", name, alpha, beta);
        std::io::Write::flush(&mut std::io::stdout()).unwrap();

        for run in 0..runs {
            let config = GraspConfig {
                alpha: *alpha,
                beta: *beta,
                iterations,
                target: i64::MAX,
                seed: 270_001 + 7_919 * run as u32,
            };
            match GraspSolver::new(config).solve(&instance) {
                Ok(solution) => {
                    costs.push(solution.cost);
                    times.push(solution.computation_time);
                }
                Err(e) => {
                    eprintln!("run {} failed: {}", run, e);
                }
            }
        }

        if !costs.is_empty() {
            let best = *costs.iter().min().unwrap();
            let avg = costs.iter().sum::<i64>() as f64 / costs.len() as f64;
            let avg_time = times.iter().sum::<f64>() / times.len() as f64;
            println!("best={}, avg={:.1}, time={:.4}s", best, avg, avg_time);
        } else {
            println!("no successful runs");
        }

        rows.push((name.to_string(), costs, times));
    }

    println!("\n========== Summary ==========");
    println!(
        "{:<12} {:>10} {:>10} {:>10} {:>10}",
        "Preset", "Best", "Average", "Worst", "Avg Time"
    );
    println!("{}", "-".repeat(56));

    for (name, costs, times) in &rows {
        if !costs.is_empty() {
            let best = *costs.iter().min().unwrap();
            let worst = *costs.iter().max().unwrap();
            let avg = costs.iter().sum::<i64>() as f64 / costs.len() as f64;
            let avg_time = times.iter().sum::<f64>() / times.len() as f64;
            println!(
                "{:<12} {:>10} {:>10.1} {:>10} {:>10.4}",
                name, best, avg, worst, avg_time
            );
        }
    }

    if let Some(out_path) = output {
        let mut csv = String::new();
        csv.push_str("preset,run,cost,time\n");

        for (name, costs, times) in &rows {
            for (i, (cost, time)) in costs.iter().zip(times.iter()).enumerate() {
                csv.push_str(&format!("{},{},{},{:.4}\n", name, i, cost, time));
            }
        }

        std::fs::write(&out_path, csv).expect("Failed to write CSV");
        println!("\nResults exported to {:?}", out_path);
    }
}

fn run_benchmark(
    dir: &PathBuf,
    output: &PathBuf,
    runs: usize,
    iterations: usize,
    max_size: Option<usize>,
) {
    println!("Loading instances from {:?}...", dir);

    let mut instances = load_instances_from_dir(dir);

    if let Some(max) = max_size {
        instances.retain(|i| i.n <= max);
    }

    println!("Found {} instances", instances.len());

    if instances.is_empty() {
        eprintln!("No instances found!");
        return;
    }

    std::fs::create_dir_all(output).expect("Failed to create output directory");

    let config = BenchmarkConfig {
        num_runs: runs,
        grasp: GraspConfig {
            iterations,
            ..GraspConfig::default()
        },
    };

    let mut benchmark = Benchmark::new(config);

    for (i, instance) in instances.iter().enumerate() {
        println!(
            "\n[{}/{}] Processing {} (n={})...",
            i + 1,
            instances.len(),
            instance.name,
            instance.n
        );

        if let Err(e) = benchmark.run_on_instance(instance) {
            eprintln!("Benchmark failed on {}: {}", instance.name, e);
        }
    }

    let results_path = output.join("results.csv");
    benchmark.export_to_csv(&results_path).expect("Failed to export results");
    println!("\nResults exported to {:?}", results_path);

    let stats_path = output.join("statistics.csv");
    benchmark
        .export_summaries_csv(&stats_path)
        .expect("Failed to export statistics");
    println!("Statistics exported to {:?}", stats_path);

    let report = benchmark.generate_report();
    println!("\n{}", report);

    let report_path = output.join("report.txt");
    std::fs::write(&report_path, &report).expect("Failed to save report");
    println!("Report saved to {:?}", report_path);
}
