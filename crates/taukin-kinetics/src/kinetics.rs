//! The [`Kinetics`] trait.
//!
//! A kinetics strategy computes a reaction's steady-state target from the
//! current concentrations and relaxes the product toward it. Strategies
//! are stateless; all mutable state lives in the concentration vector.

use taukin_core::{Polarity, Reaction};

/// Exact first-order relaxation of `current` toward `target` over `dt`.
///
/// `x' = target + (x - target) * exp(-dt / tau)`
#[inline]
pub fn relax_exponential(current: f64, target: f64, tau: f64, dt: f64) -> f64 {
    target + (current - target) * (-dt / tau).exp()
}

/// A rule for advancing a reaction's product by one step.
///
/// # Contract
///
/// - `steady_state()` MUST be deterministic: same inputs, same output.
/// - `&self`: strategies are stateless and shared between simulations.
/// - Reactions are evaluated in rank order, so every substrate read via
///   `conc` already holds its value for the current step.
///
/// # Object safety
///
/// This trait is object-safe; the engine stores the strategy as
/// `Arc<dyn Kinetics>`.
///
/// # Examples
///
/// A strategy whose target is simply the reagent concentration:
///
/// ```
/// use taukin_core::{MolId, Reaction, ReactionParams};
/// use taukin_kinetics::Kinetics;
///
/// struct Follow;
///
/// impl Kinetics for Follow {
///     fn name(&self) -> &str { "follow" }
///
///     fn steady_state(&self, reaction: &Reaction, conc: &[f64]) -> f64 {
///         conc[reaction.reagent().index()]
///     }
/// }
///
/// let r = Reaction::new("P", "g", &[MolId(0)], MolId(1), ReactionParams::new(1.0, 2.0)).unwrap();
/// let mut conc = vec![4.0, 0.0];
/// Follow.step(&r, &mut conc, 1e9);
/// assert!((conc[1] - 4.0).abs() < 1e-12);
/// ```
pub trait Kinetics: Send + Sync + 'static {
    /// Human-readable name for logging.
    fn name(&self) -> &str;

    /// Absolute steady-state value of the product (baseline included).
    fn steady_state(&self, reaction: &Reaction, conc: &[f64]) -> f64;

    /// Move `current` toward `target` over `dt`.
    ///
    /// Default: exact exponential relaxation, using the rise time constant
    /// when the target lies above the current value and the decay time
    /// constant otherwise.
    fn relax(&self, reaction: &Reaction, current: f64, target: f64, dt: f64) -> f64 {
        let params = reaction.params();
        let tau = if target > current {
            params.rise_tau()
        } else {
            params.decay_tau()
        };
        relax_exponential(current, target, tau, dt)
    }

    /// Value of the product when it is not declared as a species.
    ///
    /// Default: excitatory products start at their baseline; inhibitory
    /// products start at their steady state, clamped at zero.
    fn initial_value(&self, reaction: &Reaction, conc_init: &[f64]) -> f64 {
        match reaction.params().polarity {
            Polarity::Excitatory => reaction.params().baseline,
            Polarity::Inhibitory => self.steady_state(reaction, conc_init).max(0.0),
        }
    }

    /// Advance the reaction's product in place by `dt`.
    fn step(&self, reaction: &Reaction, conc: &mut [f64], dt: f64) {
        let target = self.steady_state(reaction, conc);
        let slot = reaction.product().index();
        conc[slot] = self.relax(reaction, conc[slot], target, dt);
    }
}
