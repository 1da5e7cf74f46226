//! The time-stepping engine.
//!
//! A [`Simulation`] owns the concentration vector, its reinit snapshot and
//! the recorded history for one run of a shared, immutable [`Model`].
//! Each step evaluates the model level by level: at every rank the
//! equations are assigned first, then the reactions relax their products.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use tracing::debug;

use taukin_core::MolId;
use taukin_kinetics::{HillTau, Kinetics};

use crate::config::{ConfigError, SimConfig};
use crate::history::History;
use crate::metrics::AdvanceMetrics;
use crate::model::Model;

/// Lifecycle state of a [`Simulation`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EngineState {
    /// Between calls; concentrations are consistent.
    Ready,
    /// Inside [`Simulation::advance`].
    Running,
}

/// One independent run of a [`Model`].
///
/// Cloning a simulation shares the model and the kinetics strategy and
/// copies the mutable state, giving an independent run.
#[derive(Clone)]
pub struct Simulation {
    model: Arc<Model>,
    kinetics: Arc<dyn Kinetics>,
    config: SimConfig,
    substeps: u64,
    conc: Vec<f64>,
    snapshot: Vec<f64>,
    history: History,
    time: f64,
    state: EngineState,
    last_metrics: AdvanceMetrics,
}

impl fmt::Debug for Simulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Simulation")
            .field("kinetics", &self.kinetics.name())
            .field("config", &self.config)
            .field("time", &self.time)
            .field("state", &self.state)
            .field("rows", &self.history.len())
            .finish_non_exhaustive()
    }
}

impl Simulation {
    /// Create a simulation using the default [`HillTau`] kinetics.
    pub fn new(model: impl Into<Arc<Model>>, config: SimConfig) -> Result<Self, ConfigError> {
        Self::with_kinetics(model, config, Arc::new(HillTau::new()))
    }

    /// Create a simulation with an injected kinetics strategy.
    ///
    /// Validates `config`, computes the initial value of every reaction
    /// product that is not an explicit species (in rank order, so that
    /// products feeding other reactions are set first) and takes the
    /// reinit snapshot. The simulation starts in [`EngineState::Ready`].
    pub fn with_kinetics(
        model: impl Into<Arc<Model>>,
        config: SimConfig,
        kinetics: Arc<dyn Kinetics>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let model = model.into();

        let mut snapshot = model.conc_init();
        for level in model.schedule().levels() {
            for eqn in level.equations.iter().filter_map(|&id| model.equation(id)) {
                if !is_species(&model, eqn.lhs()) {
                    snapshot[eqn.lhs().index()] = eqn.eval(&snapshot);
                }
            }
            for reac in level.reactions.iter().filter_map(|&id| model.reaction(id)) {
                if !is_species(&model, reac.product()) {
                    snapshot[reac.product().index()] = kinetics.initial_value(reac, &snapshot);
                }
            }
        }

        Ok(Self {
            history: History::new(model.molecule_count(), config.dt),
            substeps: config.substeps(),
            conc: snapshot.clone(),
            snapshot,
            model,
            kinetics,
            config,
            time: 0.0,
            state: EngineState::Ready,
            last_metrics: AdvanceMetrics::default(),
        })
    }

    // ── Lifecycle ──────────────────────────────────────────────────

    /// Restore the build-time snapshot, clear history and reset time.
    ///
    /// Always safe to call; calling it twice is the same as calling it once.
    pub fn reinit(&mut self) {
        self.conc.copy_from_slice(&self.snapshot);
        self.history.clear();
        self.time = 0.0;
        self.state = EngineState::Ready;
        debug!(molecules = self.conc.len(), "reinit");
    }

    /// Evolve the model by `duration`.
    ///
    /// Normal mode takes `round(duration / dt)` recorded steps, appending
    /// the concentrations at the start of each step to the history.
    /// Settle mode takes steps of `max(dt, duration / 100)`, records
    /// nothing and leaves [`time`](Self::time) unchanged.
    ///
    /// Non-positive, non-finite or sub-half-step durations are no-ops.
    pub fn advance(&mut self, duration: f64, settle: bool) -> AdvanceMetrics {
        let start = Instant::now();
        let mut metrics = AdvanceMetrics {
            settle,
            ..AdvanceMetrics::default()
        };
        if !(duration.is_finite() && duration > 0.0) {
            debug!(duration, settle, "advance skipped: non-positive duration");
            self.last_metrics = metrics;
            return metrics;
        }

        self.state = EngineState::Running;
        if settle {
            let step = self.config.dt.max(duration / 100.0);
            let n = (duration / step).ceil() as u64;
            let h = duration / n as f64;
            for _ in 0..n {
                self.step(h, 1, &mut metrics);
            }
            metrics.steps = n;
        } else {
            let n = (duration / self.config.dt).round() as u64;
            let h = self.config.dt / self.substeps as f64;
            for _ in 0..n {
                if self.config.record_history {
                    self.history.push(&self.conc);
                    metrics.rows_recorded += 1;
                }
                self.step(h, self.substeps, &mut metrics);
            }
            metrics.steps = n;
            self.time += n as f64 * self.config.dt;
        }
        self.state = EngineState::Ready;

        metrics.total_us = start.elapsed().as_micros() as u64;
        debug!(
            duration,
            settle,
            steps = metrics.steps,
            substeps = metrics.substeps,
            time = self.time,
            "advance"
        );
        self.last_metrics = metrics;
        metrics
    }

    /// One outer step made of `substeps` integrations of width `h`.
    fn step(&mut self, h: f64, substeps: u64, metrics: &mut AdvanceMetrics) {
        let model = &*self.model;
        for _ in 0..substeps {
            for level in model.schedule().levels() {
                for eqn in level.equations.iter().filter_map(|&id| model.equation(id)) {
                    let v = eqn.eval(&self.conc);
                    self.conc[eqn.lhs().index()] = v;
                }
                for reac in level.reactions.iter().filter_map(|&id| model.reaction(id)) {
                    self.kinetics.step(reac, &mut self.conc, h);
                }
                metrics.equations_evaluated += level.equations.len() as u64;
                metrics.reactions_evaluated += level.reactions.len() as u64;
            }
            metrics.substeps += 1;
        }
    }

    // ── State access ───────────────────────────────────────────────

    /// Current concentration of a molecule.
    pub fn conc(&self, mol: MolId) -> Option<f64> {
        self.conc.get(mol.index()).copied()
    }

    /// Current concentration of a molecule by name.
    pub fn conc_by_name(&self, name: &str) -> Option<f64> {
        self.model.mol_id(name).and_then(|id| self.conc(id))
    }

    /// Assign a molecule's concentration. Returns `false` for an unknown id.
    pub fn set_conc(&mut self, mol: MolId, value: f64) -> bool {
        match self.conc.get_mut(mol.index()) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    /// The whole concentration vector, indexed by [`MolId`].
    pub fn concentrations(&self) -> &[f64] {
        &self.conc
    }

    /// The value `reinit` restores for a molecule.
    pub fn initial_conc(&self, mol: MolId) -> Option<f64> {
        self.snapshot.get(mol.index()).copied()
    }

    /// The reinit snapshot, indexed by [`MolId`].
    pub fn snapshot(&self) -> &[f64] {
        &self.snapshot
    }

    /// Recorded history since the last reinit.
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Simulated time covered by recorded steps since the last reinit.
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Current lifecycle state.
    pub fn state(&self) -> EngineState {
        self.state
    }

    /// The model being simulated.
    pub fn model(&self) -> &Model {
        &self.model
    }

    /// The validated configuration.
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Name of the kinetics strategy in use.
    pub fn kinetics_name(&self) -> &str {
        self.kinetics.name()
    }

    /// Metrics from the most recent [`advance`](Self::advance).
    pub fn last_metrics(&self) -> &AdvanceMetrics {
        &self.last_metrics
    }
}

fn is_species(model: &Model, mol: MolId) -> bool {
    model
        .molecules()
        .get(mol)
        .is_some_and(|m| m.is_species())
}
