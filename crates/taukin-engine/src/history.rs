//! Recorded concentration time series.
//!
//! A [`History`] is a row-major matrix: one row per recorded step, one
//! column per molecule. Row `k` holds the concentrations at the start of
//! step `k`, i.e. at time `k * dt` since the last reinit.

use taukin_core::MolId;

const FNV_OFFSET: u64 = 0xcbf29ce484222325;
const FNV_PRIME: u64 = 0x00000100000001B3;

#[inline]
fn fnv1a_u64(mut hash: u64, v: u64) -> u64 {
    for &b in &v.to_le_bytes() {
        hash = (hash ^ b as u64).wrapping_mul(FNV_PRIME);
    }
    hash
}

/// Concentration rows recorded by [`Simulation::advance`](crate::Simulation::advance).
#[derive(Clone, Debug, PartialEq)]
pub struct History {
    width: usize,
    dt: f64,
    data: Vec<f64>,
}

impl History {
    pub(crate) fn new(width: usize, dt: f64) -> Self {
        Self {
            width,
            dt,
            data: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, row: &[f64]) {
        debug_assert_eq!(row.len(), self.width);
        self.data.extend_from_slice(row);
    }

    pub(crate) fn clear(&mut self) {
        self.data.clear();
    }

    /// Number of recorded rows.
    pub fn len(&self) -> usize {
        if self.width == 0 {
            0
        } else {
            self.data.len() / self.width
        }
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Number of columns (molecules).
    pub fn width(&self) -> usize {
        self.width
    }

    /// Time between rows.
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Row `k`, or `None` past the end.
    pub fn row(&self, k: usize) -> Option<&[f64]> {
        if k >= self.len() {
            return None;
        }
        let start = k * self.width;
        self.data.get(start..start + self.width)
    }

    /// All rows in order.
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        // chunks_exact panics on 0; a zero-width history has no rows.
        self.data.chunks_exact(self.width.max(1))
    }

    /// Time stamp of every row.
    pub fn times(&self) -> impl Iterator<Item = f64> + '_ {
        (0..self.len()).map(move |k| k as f64 * self.dt)
    }

    /// The column for one molecule.
    pub fn series(&self, mol: MolId) -> Vec<f64> {
        let col = mol.index();
        if col >= self.width {
            return Vec::new();
        }
        self.rows().map(|row| row[col]).collect()
    }

    /// Flat row-major storage.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// FNV-1a hash of every recorded value's bit pattern.
    ///
    /// Two runs of the same model with the same inputs produce the same
    /// fingerprint. The width is folded in first so that histories of
    /// different shape never collide trivially.
    pub fn fingerprint(&self) -> u64 {
        let mut hash = fnv1a_u64(FNV_OFFSET, self.width as u64);
        for v in &self.data {
            hash = fnv1a_u64(hash, v.to_bits());
        }
        hash
    }
}
