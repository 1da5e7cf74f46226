//! Dependency scheduling: evaluation ranks and the level plan.
//!
//! [`schedule`] runs once when a model is built. It assigns every
//! reaction and equation output a [`Rank`] strictly above the ranks of
//! the molecules it reads, then buckets reactions and equations into
//! [`Level`]s that the simulation evaluates in ascending order.
//!
//! # Algorithm
//!
//! Ranks start at 0 for independent molecules and unresolved for every
//! produced molecule. Passes over the producers (reactions, then
//! equations, each in name order) resolve any producer whose inputs are
//! all resolved. When a full pass resolves nothing the remaining producers
//! form or depend on a cycle: the first unresolved producer in pass order
//! is forced to one above the highest rank seen so far, and the passes
//! resume. Every iteration resolves at least one producer, so the loop
//! runs at most twice per producer.

use smallvec::SmallVec;
use tracing::{trace, warn};

use taukin_core::{EqnId, MolId, Rank, ReacId};

// ── Graph ──────────────────────────────────────────────────────────

/// What a producer node stands for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProducerKind {
    /// A reaction in the reaction registry.
    Reaction(ReacId),
    /// An equation in the equation registry.
    Equation(EqnId),
}

/// A reaction or equation viewed as a graph node.
#[derive(Clone, Debug)]
pub struct Producer {
    /// Name used for deterministic ordering and diagnostics.
    pub name: String,
    /// Registry entry this node stands for.
    pub kind: ProducerKind,
    /// The molecule it writes.
    pub output: MolId,
    /// The distinct molecules it reads.
    pub inputs: SmallVec<[MolId; 4]>,
}

/// The dependency graph handed to [`schedule`].
///
/// `initial[m]` is `Some(rank)` for molecules with a fixed rank (species
/// and pure inputs) and `None` for molecules waiting on a producer.
#[derive(Clone, Debug, Default)]
pub struct DependencyGraph {
    /// Starting rank of every molecule, indexed by [`MolId`].
    pub initial: Vec<Option<Rank>>,
    /// Every reaction and equation.
    pub producers: Vec<Producer>,
}

// ── Plan ───────────────────────────────────────────────────────────

/// Reactions and equations sharing one rank.
///
/// Entries within a level are independent of each other and are kept in
/// name order so that repeated runs evaluate them identically.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Level {
    /// Equations at this rank, evaluated first.
    pub equations: Vec<EqnId>,
    /// Reactions at this rank.
    pub reactions: Vec<ReacId>,
}

impl Level {
    /// Whether the level holds no work.
    pub fn is_empty(&self) -> bool {
        self.equations.is_empty() && self.reactions.is_empty()
    }
}

/// The resolved evaluation order of a model.
#[derive(Clone, Debug)]
#[must_use]
pub struct Schedule {
    ranks: Vec<Rank>,
    levels: Vec<Level>,
    forced: Vec<String>,
}

impl Schedule {
    /// Resolved rank of every molecule, indexed by [`MolId`].
    pub fn ranks(&self) -> &[Rank] {
        &self.ranks
    }

    /// Rank of one molecule.
    pub fn rank(&self, mol: MolId) -> Option<Rank> {
        self.ranks.get(mol.index()).copied()
    }

    /// Levels in evaluation order; `levels()[r]` holds rank `r`.
    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    /// Number of levels: one more than the highest rank.
    pub fn depth(&self) -> usize {
        self.levels.len()
    }

    /// Number of cycles broken by forcing a rank.
    pub fn loops_broken(&self) -> usize {
        self.forced.len()
    }

    /// Names of the producers whose rank was forced, in forcing order.
    pub fn forced(&self) -> &[String] {
        &self.forced
    }
}

// ── Scheduling ─────────────────────────────────────────────────────

/// Resolve ranks for every producer in `graph` and build the level plan.
///
/// Always terminates. Cycles are reported through
/// [`Schedule::loops_broken`], never as an error.
pub fn schedule(graph: &DependencyGraph) -> Schedule {
    let mut ranks = graph.initial.clone();

    // Pass order: reactions by name, then equations by name.
    let mut order: Vec<usize> = (0..graph.producers.len()).collect();
    order.sort_by(|&a, &b| {
        let (pa, pb) = (&graph.producers[a], &graph.producers[b]);
        kind_order(pa.kind)
            .cmp(&kind_order(pb.kind))
            .then_with(|| pa.name.cmp(&pb.name))
    });

    let mut max_rank = ranks.iter().flatten().copied().max().unwrap_or(Rank::SPECIES);
    let mut forced = Vec::new();

    loop {
        let mut progressed = false;
        let mut pending = 0usize;

        for &i in &order {
            let p = &graph.producers[i];
            if let Some(r) = ranks[p.output.index()] {
                max_rank = max_rank.max(r);
                continue;
            }
            let resolved: Option<Rank> = p
                .inputs
                .iter()
                .map(|m| ranks[m.index()])
                .try_fold(Rank::SPECIES, |acc, r| r.map(|r| acc.max(r.next())));
            match resolved {
                Some(r) => {
                    trace!(producer = %p.name, rank = %r, "rank resolved");
                    ranks[p.output.index()] = Some(r);
                    max_rank = max_rank.max(r);
                    progressed = true;
                }
                None => pending += 1,
            }
        }

        if pending == 0 {
            break;
        }
        if !progressed {
            let stuck = order
                .iter()
                .map(|&i| &graph.producers[i])
                .find(|p| ranks[p.output.index()].is_none());
            if let Some(p) = stuck {
                let r = max_rank.next();
                warn!(
                    producer = %p.name,
                    rank = %r,
                    loops_broken = forced.len() + 1,
                    "dependency cycle broken by forcing rank"
                );
                ranks[p.output.index()] = Some(r);
                max_rank = r;
                forced.push(p.name.clone());
            }
        }
    }

    // Every producer output is resolved; plain molecules never produced
    // keep their initial rank, and anything else defaults to 0.
    let ranks: Vec<Rank> = ranks
        .into_iter()
        .map(|r| r.unwrap_or(Rank::SPECIES))
        .collect();

    let depth = graph
        .producers
        .iter()
        .map(|p| ranks[p.output.index()].index() + 1)
        .max()
        .unwrap_or(0);
    let mut levels = vec![Level::default(); depth];
    for &i in &order {
        let p = &graph.producers[i];
        let level = &mut levels[ranks[p.output.index()].index()];
        match p.kind {
            ProducerKind::Reaction(id) => level.reactions.push(id),
            ProducerKind::Equation(id) => level.equations.push(id),
        }
    }

    Schedule {
        ranks,
        levels,
        forced,
    }
}

fn kind_order(kind: ProducerKind) -> u8 {
    match kind {
        ProducerKind::Reaction(_) => 0,
        ProducerKind::Equation(_) => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use smallvec::smallvec;

    fn reac(name: &str, id: u32, output: u32, inputs: &[u32]) -> Producer {
        Producer {
            name: name.to_string(),
            kind: ProducerKind::Reaction(ReacId(id)),
            output: MolId(output),
            inputs: inputs.iter().map(|&m| MolId(m)).collect(),
        }
    }

    fn eqn(name: &str, id: u32, output: u32, inputs: &[u32]) -> Producer {
        Producer {
            name: name.to_string(),
            kind: ProducerKind::Equation(EqnId(id)),
            output: MolId(output),
            inputs: inputs.iter().map(|&m| MolId(m)).collect(),
        }
    }

    fn graph(n_mols: usize, fixed: &[u32], producers: Vec<Producer>) -> DependencyGraph {
        let mut initial = vec![None; n_mols];
        for &m in fixed {
            initial[m as usize] = Some(Rank::SPECIES);
        }
        DependencyGraph {
            initial,
            producers,
        }
    }

    #[test]
    fn empty_graph_has_no_levels() {
        let s = schedule(&graph(2, &[0, 1], vec![]));
        assert_eq!(s.depth(), 0);
        assert_eq!(s.loops_broken(), 0);
        assert_eq!(s.ranks(), &[Rank(0), Rank(0)]);
    }

    #[test]
    fn chain_ranks_increase() {
        // 0 (species) -> 1 -> 2 -> 3
        let g = graph(
            4,
            &[0],
            vec![
                reac("c", 2, 3, &[2]),
                reac("a", 0, 1, &[0]),
                reac("b", 1, 2, &[1]),
            ],
        );
        let s = schedule(&g);
        assert_eq!(s.ranks(), &[Rank(0), Rank(1), Rank(2), Rank(3)]);
        assert_eq!(s.depth(), 4);
        assert!(s.levels()[0].is_empty());
        assert_eq!(s.levels()[3].reactions, vec![ReacId(2)]);
        assert_eq!(s.loops_broken(), 0);
    }

    #[test]
    fn equation_feeding_reaction_resolves_across_kinds() {
        // eqn x = f(s); reac p reads x.
        let g = graph(3, &[0], vec![reac("p", 0, 2, &[1]), eqn("x", 0, 1, &[0])]);
        let s = schedule(&g);
        assert_eq!(s.rank(MolId(1)), Some(Rank(1)));
        assert_eq!(s.rank(MolId(2)), Some(Rank(2)));
        assert_eq!(s.levels()[1].equations, vec![EqnId(0)]);
        assert_eq!(s.levels()[2].reactions, vec![ReacId(0)]);
    }

    #[test]
    fn three_cycle_breaks_once_at_first_name() {
        // a reads c, b reads a, c reads b.
        let g = graph(
            3,
            &[],
            vec![
                reac("b", 1, 1, &[0]),
                reac("c", 2, 2, &[1]),
                reac("a", 0, 0, &[2]),
            ],
        );
        let s = schedule(&g);
        assert_eq!(s.loops_broken(), 1);
        assert_eq!(s.forced(), &["a".to_string()]);
        assert_eq!(s.ranks(), &[Rank(1), Rank(2), Rank(3)]);
    }

    #[test]
    fn self_loop_is_forced() {
        let g = graph(2, &[0], vec![reac("auto", 0, 1, &[0, 1])]);
        let s = schedule(&g);
        assert_eq!(s.loops_broken(), 1);
        assert_eq!(s.rank(MolId(1)), Some(Rank(1)));
    }

    #[test]
    fn reactions_forced_before_equations() {
        // reaction r and equation e read each other.
        let g = graph(2, &[], vec![eqn("a_eqn", 0, 0, &[1]), reac("z_reac", 0, 1, &[0])]);
        let s = schedule(&g);
        assert_eq!(s.forced(), &["z_reac".to_string()]);
        assert_eq!(s.rank(MolId(1)), Some(Rank(1)));
        assert_eq!(s.rank(MolId(0)), Some(Rank(2)));
    }

    #[test]
    fn two_disjoint_cycles_break_twice() {
        let g = graph(
            4,
            &[],
            vec![
                reac("a", 0, 0, &[1]),
                reac("b", 1, 1, &[0]),
                reac("c", 2, 2, &[3]),
                reac("d", 3, 3, &[2]),
            ],
        );
        let s = schedule(&g);
        assert_eq!(s.loops_broken(), 2);
        assert_eq!(s.forced(), &["a".to_string(), "c".to_string()]);
    }

    #[test]
    fn pre_resolved_output_keeps_rank_zero() {
        // Product declared as species: reaction sits at level 0.
        let g = graph(2, &[0, 1], vec![reac("p", 0, 1, &[0])]);
        let s = schedule(&g);
        assert_eq!(s.rank(MolId(1)), Some(Rank(0)));
        assert_eq!(s.levels()[0].reactions, vec![ReacId(0)]);
    }

    #[test]
    fn level_entries_are_name_ordered() {
        let g = graph(
            4,
            &[0],
            vec![
                reac("zeta", 0, 1, &[0]),
                reac("alpha", 1, 2, &[0]),
                reac("mid", 2, 3, &[0]),
            ],
        );
        let s = schedule(&g);
        assert_eq!(
            s.levels()[1].reactions,
            vec![ReacId(1), ReacId(2), ReacId(0)]
        );
    }

    #[test]
    fn multiple_inputs_take_max_plus_one() {
        // 1 = f(0) at rank 1; 2 = f(1) at rank 2; 3 = f(0, 2) at rank 3.
        let mut producers: Vec<Producer> = vec![reac("p1", 0, 1, &[0]), reac("p2", 1, 2, &[1])];
        producers.push(Producer {
            name: "p3".into(),
            kind: ProducerKind::Reaction(ReacId(2)),
            output: MolId(3),
            inputs: smallvec![MolId(0), MolId(2)],
        });
        let s = schedule(&graph(4, &[0], producers));
        assert_eq!(s.rank(MolId(3)), Some(Rank(3)));
    }

    fn acyclic_graph() -> impl Strategy<Value = DependencyGraph> {
        // Molecules 0..n_species are fixed; each later molecule is produced
        // from a random subset of strictly earlier molecules.
        (1usize..5, 1usize..30).prop_flat_map(|(n_species, n_produced)| {
            let n = n_species + n_produced;
            prop::collection::vec(prop::collection::vec(any::<prop::sample::Index>(), 1..4), n_produced)
                .prop_map(move |picks| {
                    let mut initial = vec![None; n];
                    for slot in initial.iter_mut().take(n_species) {
                        *slot = Some(Rank::SPECIES);
                    }
                    let producers = picks
                        .iter()
                        .enumerate()
                        .map(|(k, idxs)| {
                            let out = n_species + k;
                            let mut inputs: SmallVec<[MolId; 4]> =
                                idxs.iter().map(|ix| MolId(ix.index(out) as u32)).collect();
                            inputs.sort_unstable();
                            inputs.dedup();
                            Producer {
                                name: format!("r{k:03}"),
                                kind: ProducerKind::Reaction(ReacId(k as u32)),
                                output: MolId(out as u32),
                                inputs,
                            }
                        })
                        .collect();
                    DependencyGraph { initial, producers }
                })
        })
    }

    proptest! {
        #[test]
        fn acyclic_ranks_exceed_inputs(g in acyclic_graph()) {
            let s = schedule(&g);
            prop_assert_eq!(s.loops_broken(), 0);
            for p in &g.producers {
                let out = s.rank(p.output).unwrap();
                for &m in &p.inputs {
                    prop_assert!(out > s.rank(m).unwrap());
                }
            }
        }

        #[test]
        fn arbitrary_graphs_terminate_and_cover_all(
            edges in prop::collection::vec((0u32..12, 0u32..12), 0..40),
        ) {
            // Molecules 0..12, all produced; inputs from random edges.
            let producers: Vec<Producer> = (0..12u32)
                .map(|m| {
                    let mut inputs: SmallVec<[MolId; 4]> = edges
                        .iter()
                        .filter(|(to, _)| *to == m)
                        .map(|(_, from)| MolId(*from))
                        .collect();
                    inputs.sort_unstable();
                    inputs.dedup();
                    Producer {
                        name: format!("m{m:02}"),
                        kind: ProducerKind::Reaction(ReacId(m)),
                        output: MolId(m),
                        inputs,
                    }
                })
                .collect();
            let g = DependencyGraph { initial: vec![None; 12], producers };
            let s = schedule(&g);
            prop_assert!(s.loops_broken() <= 12);
            let placed: usize = s.levels().iter().map(|l| l.reactions.len()).sum();
            prop_assert_eq!(placed, 12);
        }
    }
}
