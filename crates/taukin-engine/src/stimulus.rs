//! Scheduled external perturbations and the driving loop.
//!
//! A [`Stimulus`] holds a molecule at a value over `[start, stop)`. The
//! [`StimulusQueue`] expands each one into an apply event and a revert
//! event, keeps all events sorted by time (ties in insertion order), and
//! [`run`](StimulusQueue::run)s a simulation through them.
//!
//! Malformed stimuli never abort a run: [`StimulusQueue::extend_lossy`]
//! logs each rejected entry and carries on with the rest.

use std::error::Error;
use std::fmt;

use tracing::{debug, warn};

use taukin_core::MolId;

use crate::simulation::Simulation;

// ── Stimulus ───────────────────────────────────────────────────────

/// A request to hold `molecule` at `value` between `start` and `stop`.
#[derive(Clone, Debug, PartialEq)]
pub struct Stimulus {
    /// Target molecule name.
    pub molecule: String,
    /// Value to assign at `start`.
    pub value: f64,
    /// Time of the apply event.
    pub start: f64,
    /// Time of the revert event.
    pub stop: f64,
}

impl Stimulus {
    /// A stimulus over `[start, stop)`.
    pub fn new(molecule: impl Into<String>, value: f64, start: f64, stop: f64) -> Self {
        Self {
            molecule: molecule.into(),
            value,
            start,
            stop,
        }
    }

    /// Parse the field form `molecule value [start [stop]]`.
    ///
    /// `start` defaults to 0 and `stop` to `runtime`. `value` is multiplied
    /// by `scale` (the model's quantity-unit factor). Fields past the
    /// fourth are ignored.
    pub fn parse<S: AsRef<str>>(
        fields: &[S],
        runtime: f64,
        scale: f64,
    ) -> Result<Self, StimulusError> {
        if fields.len() < 2 {
            return Err(StimulusError::TooFewFields {
                got: fields.len(),
                text: join(fields),
            });
        }
        let number = |i: usize, what: &'static str| -> Result<f64, StimulusError> {
            let text = fields[i].as_ref();
            text.parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| StimulusError::InvalidNumber {
                    field: what,
                    text: text.to_string(),
                })
        };
        let value = number(1, "value")? * scale;
        let start = if fields.len() > 2 {
            number(2, "start")?
        } else {
            0.0
        };
        let stop = if fields.len() > 3 {
            number(3, "stop")?
        } else {
            runtime
        };
        Ok(Self::new(fields[0].as_ref(), value, start, stop))
    }
}

fn join<S: AsRef<str>>(fields: &[S]) -> String {
    fields
        .iter()
        .map(|f| f.as_ref())
        .collect::<Vec<_>>()
        .join(" ")
}

// ── StimulusError ──────────────────────────────────────────────────

/// Why a stimulus was rejected.
#[derive(Clone, Debug, PartialEq)]
pub enum StimulusError {
    /// Fewer than the two required fields (molecule and value).
    TooFewFields {
        /// Number of fields supplied.
        got: usize,
        /// The fields as given, space-joined.
        text: String,
    },
    /// A numeric field did not parse as a finite number.
    InvalidNumber {
        /// Which field: `"value"`, `"start"` or `"stop"`.
        field: &'static str,
        /// The text supplied.
        text: String,
    },
    /// The target molecule is not in the model.
    UnknownMolecule {
        /// The name supplied.
        name: String,
    },
}

impl fmt::Display for StimulusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooFewFields { got, text } => write!(
                f,
                "stimulus needs at least molecule and value, got {got} field(s): '{text}'"
            ),
            Self::InvalidNumber { field, text } => {
                write!(f, "stimulus {field} '{text}' is not a finite number")
            }
            Self::UnknownMolecule { name } => {
                write!(f, "stimulus molecule '{name}' not found in model")
            }
        }
    }
}

impl Error for StimulusError {}

// ── Events ─────────────────────────────────────────────────────────

/// Whether an event starts a stimulus or ends it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventKind {
    /// Assign the stimulus value.
    Apply,
    /// Restore the molecule's reinit value.
    Revert,
}

/// One scheduled assignment.
#[derive(Clone, Debug, PartialEq)]
pub struct StimulusEvent {
    /// Target molecule.
    pub mol: MolId,
    /// Scheduled time.
    pub time: f64,
    /// Value assigned.
    pub value: f64,
    /// Apply or revert.
    pub kind: EventKind,
}

/// Summary returned by [`StimulusQueue::run`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RunSummary {
    /// Events applied.
    pub events_applied: usize,
    /// Run length actually covered, after extension by stop times.
    pub runtime: f64,
}

// ── StimulusQueue ──────────────────────────────────────────────────

/// Time-ordered stimulus events.
#[derive(Clone, Debug, Default)]
pub struct StimulusQueue {
    events: Vec<StimulusEvent>,
}

impl StimulusQueue {
    /// Empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve `stim` against `sim`'s model and enqueue its two events.
    ///
    /// The revert value is the molecule's reinit value in `sim`.
    pub fn push(&mut self, sim: &Simulation, stim: &Stimulus) -> Result<(), StimulusError> {
        let mol = sim
            .model()
            .mol_id(&stim.molecule)
            .ok_or_else(|| StimulusError::UnknownMolecule {
                name: stim.molecule.clone(),
            })?;
        let baseline = sim.initial_conc(mol).unwrap_or(0.0);
        self.insert(StimulusEvent {
            mol,
            time: stim.start,
            value: stim.value,
            kind: EventKind::Apply,
        });
        self.insert(StimulusEvent {
            mol,
            time: stim.stop,
            value: baseline,
            kind: EventKind::Revert,
        });
        Ok(())
    }

    /// Enqueue every valid stimulus, logging and skipping the rest.
    ///
    /// Returns the number skipped.
    pub fn extend_lossy<I>(&mut self, sim: &Simulation, stimuli: I) -> usize
    where
        I: IntoIterator<Item = Result<Stimulus, StimulusError>>,
    {
        let mut skipped = 0;
        for stim in stimuli {
            if let Err(e) = stim.and_then(|s| self.push(sim, &s)) {
                warn!(error = %e, "stimulus skipped");
                skipped += 1;
            }
        }
        skipped
    }

    // Insert after every event at or before `event.time`, so equal times
    // keep insertion order.
    fn insert(&mut self, event: StimulusEvent) {
        let at = self
            .events
            .partition_point(|e| e.time.total_cmp(&event.time).is_le());
        self.events.insert(at, event);
    }

    /// Events in the order they will be applied.
    pub fn events(&self) -> &[StimulusEvent] {
        &self.events
    }

    /// Number of queued events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Time of the last event, or 0 for an empty queue.
    pub fn last_time(&self) -> f64 {
        self.events.last().map_or(0.0, |e| e.time)
    }

    /// Drive `sim` through every event, then on to the run length.
    ///
    /// The run length is `max(runtime, last event time)`. Before each event
    /// the simulation is advanced from [`Simulation::time`] to the event
    /// time, then the event's value is assigned. Gaps are always measured
    /// from the simulation's own clock, so event times that are not
    /// multiples of `dt` land on the nearest step without accumulating
    /// drift. Events at or before the current time are assigned without
    /// advancing. Does not reinit `sim`.
    pub fn run(&self, sim: &mut Simulation, runtime: f64) -> RunSummary {
        let runtime = runtime.max(self.last_time());
        let mut applied = 0;
        for event in &self.events {
            let gap = event.time - sim.time();
            if gap > 0.0 {
                sim.advance(gap, false);
            }
            if sim.set_conc(event.mol, event.value) {
                applied += 1;
                debug!(
                    mol = %event.mol,
                    time = event.time,
                    value = event.value,
                    kind = ?event.kind,
                    "stimulus applied"
                );
            }
        }
        let tail = runtime - sim.time();
        if tail > 0.0 {
            sim.advance(tail, false);
        }
        RunSummary {
            events_applied: applied,
            runtime,
        }
    }
}
