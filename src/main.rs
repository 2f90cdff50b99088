//! Casino HMM CLI
//!
//! Simulate the occasionally dishonest casino, run hidden-state inference
//! over a simulated game, or recover the model parameters with Baum-Welch.

use anyhow::Result;
use casino_hmm::{
    backward, forward, map_states, marginal_map_states, posterior, viterbi_lattice, BaumWelch,
    Croupier, DiceKind, HmmParams, DEFAULT_EPOCHS,
};
use clap::{Parser, Subcommand};
use colored::Colorize;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "casino_hmm")]
#[command(about = "Two-state HMM inference for the occasionally dishonest casino")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Roll the reference croupier and print the (dice, face) sequence
    Simulate {
        /// Number of rolls
        #[arg(short, long, default_value = "100")]
        length: usize,

        /// RNG seed
        #[arg(short, long, default_value = "42")]
        seed: u64,
    },

    /// Simulate a game, then run Viterbi and forward-backward smoothing
    Infer {
        /// Number of rolls
        #[arg(short, long, default_value = "100")]
        length: usize,

        /// RNG seed
        #[arg(short, long, default_value = "42")]
        seed: u64,
    },

    /// Recover the model parameters from simulated games with Baum-Welch
    Train {
        /// Number of training sequences to generate
        #[arg(short = 'k', long, default_value = "10")]
        sequences: usize,

        /// Length of each training sequence
        #[arg(short, long, default_value = "200")]
        length: usize,

        /// Number of training epochs
        #[arg(short, long, default_value_t = DEFAULT_EPOCHS)]
        epochs: usize,

        /// RNG seed (drives both simulation and parameter init)
        #[arg(short, long, default_value = "42")]
        seed: u64,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("casino_hmm=info".parse()?))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Simulate { length, seed } => simulate(length, seed)?,
        Commands::Infer { length, seed } => infer(length, seed)?,
        Commands::Train {
            sequences,
            length,
            epochs,
            seed,
        } => train(sequences, length, epochs, seed)?,
    }

    Ok(())
}

fn dice_label(kind: DiceKind) -> colored::ColoredString {
    let label = format!("{:<6}", kind.to_string());
    match kind {
        DiceKind::Fair => label.green(),
        DiceKind::Loaded => label.red(),
    }
}

fn simulate(length: usize, seed: u64) -> Result<()> {
    println!("{}", "Rolling the casino...".cyan());

    let mut croupier = Croupier::new(HmmParams::casino(), seed)?;
    let (states, symbols) = croupier.observe(length);

    for (t, (kind, symbol)) in states.iter().zip(&symbols).enumerate() {
        println!("  t={t:<4} dice: {} face: {symbol}", dice_label(*kind));
    }

    let loaded_rolls = states.iter().filter(|&&k| k == DiceKind::Loaded).count();
    println!(
        "\n{}",
        format!("{loaded_rolls}/{length} rolls used the loaded die").bold()
    );

    Ok(())
}

fn infer(length: usize, seed: u64) -> Result<()> {
    let params = HmmParams::casino();
    let mut croupier = Croupier::new(params.clone(), seed)?;
    let (states, observations) = croupier.observe(length);

    println!("{}", "Running Viterbi and forward-backward...".cyan());
    let delta = viterbi_lattice(&observations, &params)?;
    let alpha = forward(&observations, &params)?;
    let beta = backward(&observations, &params)?;
    let smoothed = posterior(&alpha, &beta)?;

    let viterbi_guesses = marginal_map_states(&delta);
    let posterior_guesses = map_states(&smoothed);

    println!("\n{}", "+---------------------------+".bold());
    println!("{}", "|   Viterbi & Aposteriori   |".bold());
    println!("{}", "+---------------------------+".bold());
    for t in 0..length {
        let truth = states[t];
        let vit = DiceKind::from_index(viterbi_guesses[t]).expect("two-state model");
        let post = DiceKind::from_index(posterior_guesses[t]).expect("two-state model");
        println!(
            "face: {} dice: {} | viterbi: [{:.3} {:.3}] guess: {} | alpha: [{:.3} {:.3}] | beta: [{:.3} {:.3}] | aposteriori: [{:.3} {:.3}] guess: {}",
            observations[t],
            dice_label(truth),
            delta[[t, 0]],
            delta[[t, 1]],
            dice_label(vit),
            alpha[[t, 0]],
            alpha[[t, 1]],
            beta[[t, 0]],
            beta[[t, 1]],
            smoothed[[t, 0]],
            smoothed[[t, 1]],
            dice_label(post),
        );
    }

    let hits = posterior_guesses
        .iter()
        .zip(&states)
        .filter(|&(&guess, &truth)| guess == truth as usize)
        .count();
    println!(
        "\n{}",
        format!("Smoothed guesses matched the hidden dice {hits}/{length} times").bold()
    );

    Ok(())
}

fn train(n_sequences: usize, length: usize, epochs: usize, seed: u64) -> Result<()> {
    println!(
        "{}",
        format!("Generating {n_sequences} sequences of {length} rolls...").cyan()
    );

    let mut croupier = Croupier::new(HmmParams::casino(), seed)?;
    let sequences: Vec<Vec<usize>> = (0..n_sequences)
        .map(|_| croupier.observe(length).1)
        .collect();

    println!(
        "{}",
        format!("Training with Baum-Welch for {epochs} epochs...").cyan()
    );

    let mut rng = StdRng::seed_from_u64(seed);
    let mut trainer = BaumWelch::random(epochs, &mut rng);
    let params = trainer.fit(&sequences)?;

    println!("\n{}", "=== Recovered parameters ===".bold().green());
    println!(
        "Initial distribution: [{:.3} {:.3}]",
        params.initial[0], params.initial[1]
    );
    println!("Transition matrix:");
    for i in 0..2 {
        println!(
            "  state {i}: [{:.3} {:.3}]",
            params.transition[[i, 0]],
            params.transition[[i, 1]]
        );
    }
    for (i, dice) in params.dice.iter().enumerate() {
        let faces: Vec<String> = dice
            .probabilities()
            .iter()
            .map(|p| format!("{p:.3}"))
            .collect();
        println!("Dice {i}: [{}]", faces.join(" "));
    }

    if let Some(fitness) = trainer.fitness_history().last() {
        println!("\nFinal fitness (diagnostic): {fitness:.6}");
    }

    Ok(())
}
