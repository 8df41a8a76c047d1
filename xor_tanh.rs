use std::path::Path;
use std::process;

use tanh_backprop::config::{load_config, TrainingConfig};
use tanh_backprop::network::NetworkState;
use tanh_backprop::patterns::PatternSet;
use tanh_backprop::trainer::Trainer;
use tanh_backprop::utils::{SimpleRng, TanhInterpolator};
use tanh_backprop::Result;
use tracing_subscriber::EnvFilter;

// XOR with the tanh range encoding: false = -1, true = +1.
const CONFIG_PATH: &str = "config/xor.json";
const SEED: u64 = 42;
const INIT_LIMIT: f64 = 0.5;

fn xor_patterns() -> Result<PatternSet<f64>> {
    PatternSet::from_rows(&[
        (vec![0.0, 0.0], vec![-1.0]),
        (vec![0.0, 1.0], vec![1.0]),
        (vec![1.0, 0.0], vec![1.0]),
        (vec![1.0, 1.0], vec![-1.0]),
    ])
}

// Falls back to the built-in XOR parameters when no config file is present.
fn load_or_default(path: &str) -> Result<TrainingConfig> {
    if Path::new(path).exists() {
        load_config(path)
    } else {
        Ok(TrainingConfig::new(1000, 2, 0.5, 0.9))
    }
}

fn run(config_path: &str) -> Result<()> {
    let config = load_or_default(config_path)?;
    let patterns = xor_patterns()?;

    let topology = config.topology(patterns.input_len(), patterns.target_len())?;
    let mut network = NetworkState::<f64>::allocate(topology)?;
    network.initialize_uniform(&mut SimpleRng::new(SEED), INIT_LIMIT);

    let tanh = TanhInterpolator::<f64>::with_defaults();
    let mut trainer = Trainer::new(network, &patterns, &tanh, &config)?;
    let report = trainer.run()?;

    let initial = report.mse_history.first().copied().unwrap_or(report.final_mse);
    println!(
        "Generations: {}, MSE: {:.6} -> {:.6}",
        report.generations, initial, report.final_mse
    );

    println!("\nTesting the trained network:");
    let network = trainer.network();
    for p in 0..patterns.len() {
        let input = patterns.input(p);
        let output = network.predict(&tanh, input)?;
        println!(
            "Input: {:.1}, {:.1}, Expected Output: {:.1}, Predicted Output: {:.4}",
            input[0],
            input[1],
            patterns.target(p)[0],
            output[0]
        );
    }
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config_path = std::env::args().nth(1).unwrap_or_else(|| CONFIG_PATH.to_string());
    if let Err(err) = run(&config_path) {
        eprintln!("xor_tanh: {err}");
        process::exit(1);
    }
}
