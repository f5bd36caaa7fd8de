use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};

/// Fixed-width 1D histogram over `[low, high)` with under/overflow counters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram1D {
    pub name: String,
    pub title: String,
    pub low: f64,
    pub high: f64,
    pub counts: Vec<u64>,
    pub underflow: u64,
    pub overflow: u64,
    /// Total fills, including under/overflow
    pub entries: u64,
    sum: f64,
    sum_sq: f64,
}

impl Histogram1D {
    pub fn new(name: &str, title: &str, n_bins: usize, low: f64, high: f64) -> Result<Self> {
        if n_bins == 0 {
            return Err(SimError::InvalidHistogram(format!(
                "'{}' needs at least one bin",
                name
            )));
        }
        if !(low.is_finite() && high.is_finite()) || high <= low {
            return Err(SimError::InvalidHistogram(format!(
                "'{}' range [{}, {}) is empty",
                name, low, high
            )));
        }
        Ok(Self {
            name: name.to_string(),
            title: title.to_string(),
            low,
            high,
            counts: vec![0; n_bins],
            underflow: 0,
            overflow: 0,
            entries: 0,
            sum: 0.0,
            sum_sq: 0.0,
        })
    }

    pub fn n_bins(&self) -> usize {
        self.counts.len()
    }

    pub fn bin_width(&self) -> f64 {
        (self.high - self.low) / self.counts.len() as f64
    }

    /// Bin index of `x`, `None` outside `[low, high)`
    pub fn find_bin(&self, x: f64) -> Option<usize> {
        if !(x >= self.low && x < self.high) {
            return None;
        }
        let i = ((x - self.low) / self.bin_width()) as usize;
        // x just below `high` can round up to n_bins
        Some(i.min(self.counts.len() - 1))
    }

    pub fn fill(&mut self, x: f64) {
        self.entries += 1;
        match self.find_bin(x) {
            Some(i) => {
                self.counts[i] += 1;
                self.sum += x;
                self.sum_sq += x * x;
            }
            None if x < self.low => self.underflow += 1,
            // NaN lands here too
            None => self.overflow += 1,
        }
    }

    /// Fills inside the range
    pub fn in_range(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Mean of in-range fills
    pub fn mean(&self) -> f64 {
        let n = self.in_range();
        if n == 0 {
            0.0
        } else {
            self.sum / n as f64
        }
    }

    /// Standard deviation of in-range fills
    pub fn std_dev(&self) -> f64 {
        let n = self.in_range();
        if n < 2 {
            return 0.0;
        }
        let mean = self.mean();
        (self.sum_sq / n as f64 - mean * mean).max(0.0).sqrt()
    }

    /// Lower edge of bin `i`
    pub fn bin_low_edge(&self, i: usize) -> f64 {
        self.low + i as f64 * self.bin_width()
    }

    /// Add another histogram with identical binning.
    pub fn merge(&mut self, other: &Histogram1D) -> Result<()> {
        if self.counts.len() != other.counts.len()
            || self.low != other.low
            || self.high != other.high
        {
            return Err(SimError::InvalidHistogram(format!(
                "cannot merge '{}' into '{}': binning differs",
                other.name, self.name
            )));
        }
        for (a, b) in self.counts.iter_mut().zip(&other.counts) {
            *a += b;
        }
        self.underflow += other.underflow;
        self.overflow += other.overflow;
        self.entries += other.entries;
        self.sum += other.sum;
        self.sum_sq += other.sum_sq;
        Ok(())
    }

    pub fn reset(&mut self) {
        self.counts.iter_mut().for_each(|c| *c = 0);
        self.underflow = 0;
        self.overflow = 0;
        self.entries = 0;
        self.sum = 0.0;
        self.sum_sq = 0.0;
    }
}

impl fmt::Display for Histogram1D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Histogram {}: {}", self.name, self.title)?;
        writeln!(
            f,
            "  Bins: {} over [{}, {})",
            self.n_bins(),
            self.low,
            self.high
        )?;
        writeln!(f, "  Entries: {}", self.entries)?;
        writeln!(f, "  Mean: {:.4}  Std Dev: {:.4}", self.mean(), self.std_dev())?;
        write!(f, "  Underflow: {}  Overflow: {}", self.underflow, self.overflow)
    }
}
