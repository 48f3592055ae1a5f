//! Histogram Registry
//!
//! Each analysis task owns one [`HistogramRegistry`], an explicit accumulator of
//! named 1D and 2D histograms. Names are slash-separated paths
//! (`system/2pi/cut/0n0n/unlike-sign/hM`) so related histograms group together
//! when the registry is listed.
//!
//! Filling follows the usual binning convention: bin `i` covers
//! `[edges[i], edges[i + 1])`, values below the first edge go to underflow and
//! values at or above the last edge go to overflow. NaN counts as overflow.

use crate::error::AnalysisError;
use crate::AnalysisResult;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ═══════════════════════════════════════════════════════════════════════════════
// AXES
// ═══════════════════════════════════════════════════════════════════════════════

/// Serializable axis binning, either uniform or with explicit edges
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AxisSpec {
    Uniform { bins: usize, min: f64, max: f64 },
    Variable { edges: Vec<f64> },
}

impl AxisSpec {
    pub fn uniform(bins: usize, min: f64, max: f64) -> Self {
        AxisSpec::Uniform { bins, min, max }
    }

    pub fn variable(edges: Vec<f64>) -> Self {
        AxisSpec::Variable { edges }
    }
}

/// Where a value lands on an axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinIndex {
    Underflow,
    Bin(usize),
    Overflow,
}

/// Binned axis with optional per-bin labels
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Axis {
    edges: Vec<f64>,
    labels: BTreeMap<usize, String>,
}

impl Axis {
    /// Uniform binning of `[min, max)` into `bins` bins
    pub fn uniform(bins: usize, min: f64, max: f64) -> AnalysisResult<Self> {
        if bins == 0 {
            return Err(AnalysisError::InvalidAxis("zero bins".to_string()));
        }
        if !(min < max) {
            return Err(AnalysisError::InvalidAxis(format!(
                "min {} must be below max {}",
                min, max
            )));
        }
        let step = (max - min) / bins as f64;
        let mut edges: Vec<f64> = (0..bins).map(|i| min + i as f64 * step).collect();
        edges.push(max);
        Ok(Self {
            edges,
            labels: BTreeMap::new(),
        })
    }

    /// Variable binning from explicit, strictly increasing edges
    pub fn variable(edges: Vec<f64>) -> AnalysisResult<Self> {
        if edges.len() < 2 {
            return Err(AnalysisError::InvalidAxis(
                "variable axis needs at least two edges".to_string(),
            ));
        }
        if edges.windows(2).any(|w| !(w[0] < w[1])) {
            return Err(AnalysisError::InvalidAxis(
                "edges must be strictly increasing".to_string(),
            ));
        }
        Ok(Self {
            edges,
            labels: BTreeMap::new(),
        })
    }

    pub fn from_spec(spec: &AxisSpec) -> AnalysisResult<Self> {
        match spec {
            AxisSpec::Uniform { bins, min, max } => Self::uniform(*bins, *min, *max),
            AxisSpec::Variable { edges } => Self::variable(edges.clone()),
        }
    }

    /// Attach labels to the first bins, in order
    pub fn with_labels<S: AsRef<str>>(mut self, labels: &[S]) -> AnalysisResult<Self> {
        if labels.len() > self.n_bins() {
            return Err(AnalysisError::InvalidAxis(format!(
                "{} labels for {} bins",
                labels.len(),
                self.n_bins()
            )));
        }
        for (i, label) in labels.iter().enumerate() {
            self.labels.insert(i, label.as_ref().to_string());
        }
        Ok(self)
    }

    pub fn n_bins(&self) -> usize {
        self.edges.len() - 1
    }

    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    pub fn min(&self) -> f64 {
        self.edges[0]
    }

    pub fn max(&self) -> f64 {
        self.edges[self.edges.len() - 1]
    }

    pub fn label(&self, bin: usize) -> Option<&str> {
        self.labels.get(&bin).map(String::as_str)
    }

    /// Locate the bin holding `value`
    pub fn find_bin(&self, value: f64) -> BinIndex {
        if value.is_nan() || value >= self.max() {
            return BinIndex::Overflow;
        }
        if value < self.min() {
            return BinIndex::Underflow;
        }
        // Binary search for bin
        let bin = self.edges.partition_point(|&e| e <= value) - 1;
        BinIndex::Bin(bin.min(self.n_bins() - 1))
    }

    pub fn bin_center(&self, bin: usize) -> f64 {
        if bin < self.n_bins() {
            (self.edges[bin] + self.edges[bin + 1]) / 2.0
        } else {
            0.0
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// 1D HISTOGRAM
// ═══════════════════════════════════════════════════════════════════════════════

/// Weighted one-dimensional histogram
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Histogram1D {
    axis: Axis,
    counts: Vec<f64>,
    underflow: f64,
    overflow: f64,
    /// Number of fill calls
    pub entries: u64,
    sum_w: f64,
    sum_wx: f64,
    sum_wx2: f64,
}

impl Histogram1D {
    pub fn new(axis: Axis) -> Self {
        let n = axis.n_bins();
        Self {
            axis,
            counts: vec![0.0; n],
            underflow: 0.0,
            overflow: 0.0,
            entries: 0,
            sum_w: 0.0,
            sum_wx: 0.0,
            sum_wx2: 0.0,
        }
    }

    pub fn fill(&mut self, value: f64) {
        self.fill_weighted(value, 1.0);
    }

    /// Fill with weight `weight`; mean/std only track in-range values
    pub fn fill_weighted(&mut self, value: f64, weight: f64) {
        self.entries += 1;
        match self.axis.find_bin(value) {
            BinIndex::Underflow => self.underflow += weight,
            BinIndex::Overflow => self.overflow += weight,
            BinIndex::Bin(i) => {
                self.counts[i] += weight;
                self.sum_w += weight;
                self.sum_wx += weight * value;
                self.sum_wx2 += weight * value * value;
            }
        }
    }

    pub fn axis(&self) -> &Axis {
        &self.axis
    }

    pub fn counts(&self) -> &[f64] {
        &self.counts
    }

    pub fn bin_content(&self, bin: usize) -> f64 {
        self.counts.get(bin).copied().unwrap_or(0.0)
    }

    /// Content of the bin carrying `label`
    pub fn labeled_content(&self, label: &str) -> Option<f64> {
        (0..self.axis.n_bins())
            .find(|&i| self.axis.label(i) == Some(label))
            .map(|i| self.counts[i])
    }

    pub fn underflow(&self) -> f64 {
        self.underflow
    }

    pub fn overflow(&self) -> f64 {
        self.overflow
    }

    /// Sum of in-range bin contents
    pub fn integral(&self) -> f64 {
        self.counts.iter().sum()
    }

    pub fn mean(&self) -> f64 {
        if self.sum_w > 0.0 {
            self.sum_wx / self.sum_w
        } else {
            0.0
        }
    }

    pub fn variance(&self) -> f64 {
        if self.sum_w > 0.0 {
            let mean = self.mean();
            (self.sum_wx2 / self.sum_w - mean * mean).max(0.0)
        } else {
            0.0
        }
    }

    pub fn std(&self) -> f64 {
        self.variance().sqrt()
    }

    /// Center of the most populated bin, `None` while nothing is in range
    pub fn peak(&self) -> Option<f64> {
        let (bin, content) = self
            .counts
            .iter()
            .enumerate()
            .fold((0, 0.0), |best, (i, &c)| if c > best.1 { (i, c) } else { best });
        (content > 0.0).then(|| self.axis.bin_center(bin))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// 2D HISTOGRAM
// ═══════════════════════════════════════════════════════════════════════════════

/// Weighted two-dimensional histogram, row-major in x
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Histogram2D {
    x_axis: Axis,
    y_axis: Axis,
    counts: Vec<f64>,
    /// Weight of fills outside either axis range
    out_of_range: f64,
    pub entries: u64,
}

impl Histogram2D {
    pub fn new(x_axis: Axis, y_axis: Axis) -> Self {
        let n = x_axis.n_bins() * y_axis.n_bins();
        Self {
            x_axis,
            y_axis,
            counts: vec![0.0; n],
            out_of_range: 0.0,
            entries: 0,
        }
    }

    pub fn fill(&mut self, x: f64, y: f64) {
        self.fill_weighted(x, y, 1.0);
    }

    pub fn fill_weighted(&mut self, x: f64, y: f64, weight: f64) {
        self.entries += 1;
        match (self.x_axis.find_bin(x), self.y_axis.find_bin(y)) {
            (BinIndex::Bin(ix), BinIndex::Bin(iy)) => {
                self.counts[ix * self.y_axis.n_bins() + iy] += weight;
            }
            _ => self.out_of_range += weight,
        }
    }

    pub fn x_axis(&self) -> &Axis {
        &self.x_axis
    }

    pub fn y_axis(&self) -> &Axis {
        &self.y_axis
    }

    pub fn bin_content(&self, ix: usize, iy: usize) -> f64 {
        if ix < self.x_axis.n_bins() && iy < self.y_axis.n_bins() {
            self.counts[ix * self.y_axis.n_bins() + iy]
        } else {
            0.0
        }
    }

    pub fn out_of_range(&self) -> f64 {
        self.out_of_range
    }

    pub fn integral(&self) -> f64 {
        self.counts.iter().sum()
    }

}

// ═══════════════════════════════════════════════════════════════════════════════
// REGISTRY
// ═══════════════════════════════════════════════════════════════════════════════

/// A registered histogram of either dimension
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Histogram {
    OneD(Histogram1D),
    TwoD(Histogram2D),
}

impl Histogram {
    pub fn kind(&self) -> &'static str {
        match self {
            Histogram::OneD(_) => "1D",
            Histogram::TwoD(_) => "2D",
        }
    }

    pub fn entries(&self) -> u64 {
        match self {
            Histogram::OneD(h) => h.entries,
            Histogram::TwoD(h) => h.entries,
        }
    }

    pub fn integral(&self) -> f64 {
        match self {
            Histogram::OneD(h) => h.integral(),
            Histogram::TwoD(h) => h.integral(),
        }
    }
}

/// Named collection of histograms owned by one task
#[derive(Debug, Clone, Default)]
pub struct HistogramRegistry {
    name: String,
    histograms: BTreeMap<String, Histogram>,
}

impl HistogramRegistry {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            histograms: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn add_1d(&mut self, path: &str, axis: Axis) -> AnalysisResult<()> {
        self.insert(path, Histogram::OneD(Histogram1D::new(axis)))
    }

    pub fn add_2d(&mut self, path: &str, x_axis: Axis, y_axis: Axis) -> AnalysisResult<()> {
        self.insert(path, Histogram::TwoD(Histogram2D::new(x_axis, y_axis)))
    }

    fn insert(&mut self, path: &str, histogram: Histogram) -> AnalysisResult<()> {
        if self.histograms.contains_key(path) {
            return Err(AnalysisError::DuplicateHistogram(path.to_string()));
        }
        self.histograms.insert(path.to_string(), histogram);
        Ok(())
    }

    pub fn fill_1d(&mut self, path: &str, value: f64) -> AnalysisResult<()> {
        self.fill_1d_weighted(path, value, 1.0)
    }

    pub fn fill_1d_weighted(&mut self, path: &str, value: f64, weight: f64) -> AnalysisResult<()> {
        self.get_1d_mut(path)?.fill_weighted(value, weight);
        Ok(())
    }

    pub fn fill_2d(&mut self, path: &str, x: f64, y: f64) -> AnalysisResult<()> {
        self.get_2d_mut(path)?.fill(x, y);
        Ok(())
    }

    pub fn get(&self, path: &str) -> AnalysisResult<&Histogram> {
        self.histograms
            .get(path)
            .ok_or_else(|| AnalysisError::UnknownHistogram(path.to_string()))
    }

    pub fn get_1d(&self, path: &str) -> AnalysisResult<&Histogram1D> {
        match self.get(path)? {
            Histogram::OneD(h) => Ok(h),
            other => Err(kind_mismatch(path, "1D", other)),
        }
    }

    pub fn get_2d(&self, path: &str) -> AnalysisResult<&Histogram2D> {
        match self.get(path)? {
            Histogram::TwoD(h) => Ok(h),
            other => Err(kind_mismatch(path, "2D", other)),
        }
    }

    pub fn get_1d_mut(&mut self, path: &str) -> AnalysisResult<&mut Histogram1D> {
        match self.histograms.get_mut(path) {
            Some(Histogram::OneD(h)) => Ok(h),
            Some(other) => Err(kind_mismatch(path, "1D", other)),
            None => Err(AnalysisError::UnknownHistogram(path.to_string())),
        }
    }

    pub fn get_2d_mut(&mut self, path: &str) -> AnalysisResult<&mut Histogram2D> {
        match self.histograms.get_mut(path) {
            Some(Histogram::TwoD(h)) => Ok(h),
            Some(other) => Err(kind_mismatch(path, "2D", other)),
            None => Err(AnalysisError::UnknownHistogram(path.to_string())),
        }
    }

    pub fn contains(&self, path: &str) -> bool {
        self.histograms.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.histograms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.histograms.is_empty()
    }

    /// Iterate histograms in path order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Histogram)> {
        self.histograms.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Paths under `prefix` that received at least one fill
    pub fn filled_under(&self, prefix: &str) -> Vec<&str> {
        self.iter()
            .filter(|(path, h)| path.starts_with(prefix) && h.entries() > 0)
            .map(|(path, _)| path)
            .collect()
    }

    /// Tree-style listing of every non-empty histogram
    pub fn summary(&self) -> String {
        let filled: Vec<(&str, &Histogram)> =
            self.iter().filter(|(_, h)| h.entries() > 0).collect();
        let mut out = format!(
            "Histograms [{}] ({} registered, {} filled):",
            self.name,
            self.len(),
            filled.len()
        );
        for (i, (path, h)) in filled.iter().enumerate() {
            let branch = if i + 1 == filled.len() { "└─" } else { "├─" };
            match h {
                Histogram::OneD(h1) => {
                    out.push_str(&format!(
                        "\n{} {} [1D] entries={} mean={:.4} std={:.4}",
                        branch,
                        path,
                        h1.entries,
                        h1.mean(),
                        h1.std()
                    ));
                    if let Some(peak) = h1.peak() {
                        out.push_str(&format!(" peak={:.4}", peak));
                    }
                }
                Histogram::TwoD(h2) => out.push_str(&format!(
                    "\n{} {} [2D] entries={} in-range={:.0}",
                    branch,
                    path,
                    h2.entries,
                    h2.integral()
                )),
            }
        }
        out
    }
}

fn kind_mismatch(path: &str, expected: &'static str, actual: &Histogram) -> AnalysisError {
    AnalysisError::HistogramKindMismatch {
        name: path.to_string(),
        expected,
        actual: actual.kind(),
    }
}
