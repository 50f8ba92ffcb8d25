use std::cmp::Ordering;
use std::collections::HashMap;

use crate::hand::Hand;
use crate::hints::{Answer, Hint};

/// Expected filtering power of a hint over a hypothesis set.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Simulation {
    /// Mean share of hands eliminated, over every distinct possible answer.
    pub mean: f64,
    /// Standard deviation of that share, in percentage points.
    pub stdev: f64,
}

impl Simulation {
    /// Unweighted average of several agents' results.
    pub fn average(results: &[Simulation]) -> Simulation {
        if results.is_empty() {
            return Simulation::default();
        }
        let n = results.len() as f64;
        Simulation {
            mean: results.iter().map(|s| s.mean).sum::<f64>() / n,
            stdev: results.iter().map(|s| s.stdev).sum::<f64>() / n,
        }
    }
}

pub fn simulate_set(hands: &[Hand], hint: &Hint) -> Simulation {
    if hands.is_empty() {
        return Simulation::default();
    }
    let mut partition: HashMap<Answer, usize> = HashMap::new();
    for hand in hands {
        *partition.entry(hint.evaluate(*hand)).or_insert(0) += 1;
    }

    let total = hands.len() as f64;
    let eliminated: Vec<f64> = partition
        .values()
        .map(|&count| (total - count as f64) / total)
        .collect();
    let mean = eliminated.iter().sum::<f64>() / eliminated.len() as f64;
    let stdev = if eliminated.len() < 2 {
        0.0
    } else {
        let variance = eliminated.iter().map(|e| (e - mean).powi(2)).sum::<f64>()
            / (eliminated.len() - 1) as f64;
        variance.sqrt() * 100.0
    };
    Simulation { mean, stdev }
}

/// Best hint first: higher mean (to two decimals), then lower deviation.
pub fn rank_simulations(results: &mut [(&'static Hint, Simulation)]) {
    let rounded = |s: &Simulation| (s.mean * 100.0).round() as i64;
    results.sort_by(|(_, a), (_, b)| {
        rounded(b)
            .cmp(&rounded(a))
            .then_with(|| a.stdev.partial_cmp(&b.stdev).unwrap_or(Ordering::Equal))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::generate_universe;
    use crate::hints::{catalog, find_hint};
    use crate::tile::test_hand;

    fn hand(tokens: &[&str]) -> Hand {
        test_hand(tokens)
    }

    #[test]
    fn test_simulate_empty_set() {
        let sim = simulate_set(&[], find_hint("st").unwrap());
        assert_eq!(sim, Simulation::default());
    }

    #[test]
    fn test_simulate_single_answer_filters_nothing() {
        let hands = vec![hand(&["0b", "1b"]), hand(&["0w", "1w"])];
        // Both hands sum to 1.
        let sim = simulate_set(&hands, find_hint("st").unwrap());
        assert_eq!(sim.mean, 0.0);
        assert_eq!(sim.stdev, 0.0);
    }

    #[test]
    fn test_simulate_even_split() {
        let hands = vec![
            hand(&["0b", "1b"]),
            hand(&["0w", "2b"]),
            hand(&["0b", "3b"]),
            hand(&["1w", "3w"]),
        ];
        // Sums 1, 2, 3, 4: every answer leaves one hand.
        let sim = simulate_set(&hands, find_hint("st").unwrap());
        assert!((sim.mean - 0.75).abs() < 1e-12);
        assert!(sim.stdev.abs() < 1e-9);
    }

    #[test]
    fn test_simulate_uneven_split() {
        let hands = vec![
            hand(&["0b", "1b"]),
            hand(&["0w", "1w"]),
            hand(&["0b", "2b"]),
        ];
        // Answers 1 (two hands) and 2 (one hand): eliminated 1/3 and 2/3.
        let sim = simulate_set(&hands, find_hint("st").unwrap());
        assert!((sim.mean - 0.5).abs() < 1e-12);
        let expected_stdev = ((1.0f64 / 3.0 - 0.5).powi(2) * 2.0).sqrt() * 100.0;
        assert!((sim.stdev - expected_stdev).abs() < 1e-9);
    }

    #[test]
    fn test_simulate_bounds_over_universe() {
        let own = hand(&["0b", "1w", "3b", "7w", "9b"]);
        let universe = generate_universe(own, 5);
        for hint in catalog() {
            let sim = simulate_set(&universe, hint);
            assert!((0.0..=1.0).contains(&sim.mean), "hint {}", hint.code);
            assert!(sim.stdev >= 0.0, "hint {}", hint.code);
        }
    }

    #[test]
    fn test_average() {
        let avg = Simulation::average(&[
            Simulation { mean: 0.2, stdev: 10.0 },
            Simulation { mean: 0.6, stdev: 30.0 },
        ]);
        assert!((avg.mean - 0.4).abs() < 1e-12);
        assert!((avg.stdev - 20.0).abs() < 1e-12);
        assert_eq!(Simulation::average(&[]), Simulation::default());
    }

    #[test]
    fn test_rank_simulations_orders_by_mean_then_stdev() {
        let st = find_hint("st").unwrap();
        let tw = find_hint("tw").unwrap();
        let nc = find_hint("nc").unwrap();
        let mut results = vec![
            (st, Simulation { mean: 0.801, stdev: 12.0 }),
            (tw, Simulation { mean: 0.5, stdev: 1.0 }),
            (nc, Simulation { mean: 0.799, stdev: 3.0 }),
        ];
        rank_simulations(&mut results);
        let order: Vec<&str> = results.iter().map(|(h, _)| h.code).collect();
        assert_eq!(order, vec!["nc", "st", "tw"]);
    }
}
