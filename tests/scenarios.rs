//! End-to-end scenarios for the casino HMM

use casino_hmm::{
    backward, forward, map_states, posterior, viterbi_lattice, BaumWelch, Croupier, Dice,
    DiceKind, HmmError, HmmParams,
};
use ndarray::array;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Five consecutive sixes: the loaded-state posterior must dominate from
/// t = 2 onward.
#[test]
fn test_scenario_run_of_sixes_flags_loaded() {
    let params = HmmParams::casino();
    let obs = [5, 5, 5, 5, 5];

    let alpha = forward(&obs, &params).unwrap();
    let beta = backward(&obs, &params).unwrap();
    let smoothed = posterior(&alpha, &beta).unwrap();

    for t in 2..obs.len() {
        assert!(
            smoothed[[t, 1]] > smoothed[[t, 0]],
            "loaded posterior should dominate at t={t}"
        );
    }
}

/// Alternating low faces, never a six: the fair state must dominate at
/// every time step.
#[test]
fn test_scenario_no_sixes_stays_fair() {
    let params = HmmParams::casino();
    let obs = [0, 1, 2, 3, 4, 0, 1, 2, 3, 4];

    let alpha = forward(&obs, &params).unwrap();
    let beta = backward(&obs, &params).unwrap();
    let smoothed = posterior(&alpha, &beta).unwrap();

    for t in 0..obs.len() {
        assert!(
            smoothed[[t, 0]] > smoothed[[t, 1]],
            "fair posterior should dominate at t={t}"
        );
    }

    let guesses = map_states(&smoothed);
    assert!(guesses.iter().all(|&s| s == DiceKind::Fair as usize));
}

/// Train on data generated by the known casino model: re-estimated rows
/// must be stochastic and the six-heavy die must peak at symbol 5.
#[test]
fn test_scenario_baum_welch_recovers_loaded_die() {
    let mut croupier = Croupier::new(HmmParams::casino(), 42).unwrap();
    let sequences: Vec<Vec<usize>> = (0..12).map(|_| croupier.observe(250).1).collect();

    let mut rng = StdRng::seed_from_u64(42);
    let mut trainer = BaumWelch::random(50, &mut rng);
    let params = trainer.fit(&sequences).unwrap();

    assert!((params.initial.sum() - 1.0).abs() < 1e-6);
    for row in params.transition.rows() {
        assert!((row.sum() - 1.0).abs() < 1e-6);
    }

    // Label switching is allowed: identify the recovered loaded die as the
    // one with more mass on the six.
    let loaded = if params.dice[0].prob(5) > params.dice[1].prob(5) {
        &params.dice[0]
    } else {
        &params.dice[1]
    };
    let probs = loaded.probabilities();
    for face in 0..5 {
        assert!(
            probs[5] > probs[face],
            "recovered loaded die should peak at the six, got {probs}"
        );
    }

    assert_eq!(trainer.fitness_history().len(), 50);
}

/// A state whose die can never explain any observed symbol gets zero
/// occupancy everywhere, which must surface as a degenerate accumulator.
#[test]
fn test_scenario_unvisited_state_is_degenerate() {
    let params = HmmParams::new(
        array![0.5, 0.5],
        array![[0.95, 0.05], [0.10, 0.90]],
        [
            Dice::fair(),
            Dice::new(array![0.0, 0.0, 0.0, 0.0, 0.0, 1.0]).unwrap(),
        ],
    )
    .unwrap();

    let mut trainer = BaumWelch::new(params, 10).unwrap();
    let sequences = vec![vec![0, 1, 2, 3, 4, 0, 1, 2, 3, 4]];
    let result = trainer.fit(&sequences);

    assert!(matches!(result, Err(HmmError::DegenerateAccumulator(_))));
}

/// Length-0 inputs are invalid across all engines.
#[test]
fn test_scenario_empty_sequence_rejected_everywhere() {
    let params = HmmParams::casino();
    assert!(matches!(
        forward(&[], &params),
        Err(HmmError::InvalidInput(_))
    ));
    assert!(matches!(
        backward(&[], &params),
        Err(HmmError::InvalidInput(_))
    ));
    assert!(matches!(
        viterbi_lattice(&[], &params),
        Err(HmmError::InvalidInput(_))
    ));
}

/// Inference on a simulated game should beat chance comfortably.
#[test]
fn test_scenario_smoothing_beats_chance() {
    let params = HmmParams::casino();
    let mut croupier = Croupier::new(params.clone(), 7).unwrap();
    let (states, obs) = croupier.observe(400);

    let alpha = forward(&obs, &params).unwrap();
    let beta = backward(&obs, &params).unwrap();
    let smoothed = posterior(&alpha, &beta).unwrap();
    let guesses = map_states(&smoothed);

    let hits = guesses
        .iter()
        .zip(&states)
        .filter(|&(&guess, &truth)| guess == truth as usize)
        .count();

    assert!(
        hits as f64 / states.len() as f64 > 0.6,
        "smoothed accuracy {hits}/{}",
        states.len()
    );
}
