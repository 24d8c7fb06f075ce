//! Helpers shared by the unit tests: seeded random circuits and output simulation.

use rand::{Rng, SeedableRng, seq::SliceRandom};
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::{Aig, AigEdge, NodeId};

/// Builds a random AIG with plenty of redundancy for the passes to find.
///
/// Besides plain random gates, it inserts commuted copies of existing gates, gates
/// reading a constant or twice the same signal, and re-derivations of existing
/// functions through De Morgan.
pub(crate) fn random_aig(seed: u64, n_inputs: usize, n_ands: usize, n_outputs: usize) -> Aig {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    let mut aig = Aig::new();
    let mut signals: Vec<NodeId> = (0..n_inputs).map(|_| aig.add_input(None)).collect();
    let mut gates: Vec<NodeId> = Vec::new();

    let pick = |rng: &mut Xoshiro256PlusPlus, signals: &[NodeId]| -> AigEdge {
        let node = *signals.choose(rng).unwrap();
        AigEdge::new(node, rng.r#gen())
    };

    while gates.len() < n_ands {
        let id = match rng.gen_range(0..10) {
            // Commuted copy of an existing gate.
            0 | 1 if !gates.is_empty() => {
                let g = *gates.choose(&mut rng).unwrap();
                let fanins = aig.get_node(g).unwrap().get_fanins();
                aig.add_and(fanins[1], fanins[0]).unwrap()
            }
            // Constant or repeated fanin.
            2 => {
                let x = pick(&mut rng, &signals);
                let other = match rng.gen_range(0..4) {
                    0 => AigEdge::cst_false(),
                    1 => AigEdge::cst_true(),
                    2 => x,
                    _ => !x,
                };
                aig.add_and(x, other).unwrap()
            }
            // !(!x & !y) & x == x, built as two gates.
            3 => {
                let x = pick(&mut rng, &signals);
                let y = pick(&mut rng, &signals);
                let or = aig.add_and(!x, !y).unwrap();
                gates.push(or);
                aig.add_and(AigEdge::new(or, true), x).unwrap()
            }
            _ => {
                let x = pick(&mut rng, &signals);
                let y = pick(&mut rng, &signals);
                aig.add_and(x, y).unwrap()
            }
        };
        gates.push(id);
        signals.push(id);
    }

    for _ in 0..n_outputs {
        let fanin = if gates.is_empty() {
            pick(&mut rng, &signals)
        } else {
            // Favor the latest gates so that most of the circuit is reachable.
            let from = gates.len().saturating_sub(gates.len() / 3 + 1);
            AigEdge::new(*gates[from..].choose(&mut rng).unwrap(), rng.r#gen())
        };
        aig.add_output(fanin, None).unwrap();
    }
    aig
}

/// Simulates `rounds` random batches (same stream for a given `seed`) and returns every
/// output word, round after round.
pub(crate) fn output_words(aig: &mut Aig, seed: u64, rounds: usize) -> Vec<u64> {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    let order = aig.walk_from_outputs();
    let mut out = Vec::new();
    for _ in 0..rounds {
        let words: Vec<u64> = (0..aig.inputs().len()).map(|_| rng.r#gen()).collect();
        aig.set_input_words(&words);
        aig.simulate(&order);
        out.extend(aig.output_signatures());
    }
    out
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn random_aig_is_consistent() {
        for seed in 0..8 {
            let aig = random_aig(seed, 5, 40, 6);
            assert_eq!(aig.stats().inputs, 5);
            assert_eq!(aig.stats().outputs, 6);
            assert!(aig.stats().ands >= 40);
            aig.check_integrity().unwrap();
        }
    }

    #[test]
    fn output_words_is_reproducible() {
        let mut aig = random_aig(3, 4, 20, 3);
        assert_eq!(output_words(&mut aig, 9, 2), output_words(&mut aig, 9, 2));
        assert_eq!(output_words(&mut aig, 9, 2).len(), 6);
    }
}
