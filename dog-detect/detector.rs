use dog_core::{DogError, DogPyramid, DogResult, EdgeFilter, Grid, Keypoint, Octave, ScaleSpaceConfig};
use log::debug;
use rayon::prelude::*;

use crate::rules::{classify_extremum, passes_contrast, passes_edge};
use crate::types::{DetectionStats, ScoredKeypoint};

pub const DEFAULT_EDGE_THRESHOLD: f32 = 10.0;

/// Scans a DoG pyramid for scale-space extrema that survive the contrast and edge filters.
///
/// Only interior DoG scales (`1..=len-2`) and interior pixels are examined. Output is ordered
/// by octave, then scale, then row-major position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeypointDetector {
    contrast_threshold: f32,
    edge_threshold: f32,
    edge_filter: EdgeFilter,
}

impl KeypointDetector {
    /// Detector with the default gradient-magnitude edge filter at threshold 10.
    pub fn new(contrast_threshold: f32) -> DogResult<Self> {
        Self::with_thresholds(contrast_threshold, DEFAULT_EDGE_THRESHOLD, EdgeFilter::GradientMagnitude)
    }

    pub fn with_thresholds(contrast_threshold: f32, edge_threshold: f32, edge_filter: EdgeFilter) -> DogResult<Self> {
        if !contrast_threshold.is_finite() {
            return Err(DogError::InvalidThreshold {
                name: "contrast_threshold",
                value: contrast_threshold,
            });
        }
        // A curvature ratio must be positive; the gradient rule accepts any finite value.
        let edge_ok = match edge_filter {
            EdgeFilter::GradientMagnitude => edge_threshold.is_finite(),
            EdgeFilter::HessianRatio => edge_threshold.is_finite() && edge_threshold > 0.0,
        };
        if !edge_ok {
            return Err(DogError::InvalidThreshold {
                name: "edge_threshold",
                value: edge_threshold,
            });
        }
        Ok(Self {
            contrast_threshold,
            edge_threshold,
            edge_filter,
        })
    }

    pub fn from_config(cfg: &ScaleSpaceConfig) -> DogResult<Self> {
        Self::with_thresholds(cfg.contrast_threshold, cfg.edge_threshold, cfg.edge_filter)
    }

    pub fn detect(&self, dog: &DogPyramid) -> Vec<Keypoint> {
        self.detect_with_stats(dog).0
    }

    pub fn detect_with_stats(&self, dog: &DogPyramid) -> (Vec<Keypoint>, DetectionStats) {
        let (scored, stats) = self.detect_with_response(dog);
        (scored.into_iter().map(|sk| sk.keypoint).collect(), stats)
    }

    /// Detect keypoints along with their DoG response and per-stage counters
    pub fn detect_with_response(&self, dog: &DogPyramid) -> (Vec<ScoredKeypoint>, DetectionStats) {
        let mut keypoints = Vec::new();
        let mut stats = DetectionStats::default();

        for (octave_index, octave) in dog.octaves().iter().enumerate() {
            if octave.len() < 3 {
                debug!(
                    "octave {}: {} DoG scales, no interior scale to scan",
                    octave_index,
                    octave.len()
                );
                continue;
            }
            for scale in 1..octave.len() - 1 {
                let (found, scale_stats) = self.scan_scale(octave, octave_index, scale);
                keypoints.extend(found);
                stats.merge(&scale_stats);
            }
        }

        debug!(
            "detection: examined={} extrema={} low_contrast={} edge={} accepted={}",
            stats.candidates_examined,
            stats.extrema,
            stats.rejected_low_contrast,
            stats.rejected_edge,
            stats.accepted
        );
        (keypoints, stats)
    }

    fn scan_scale(&self, octave: &Octave, octave_index: usize, scale: usize) -> (Vec<ScoredKeypoint>, DetectionStats) {
        let images = octave.images();
        let (below, current, above) = (&images[scale - 1], &images[scale], &images[scale + 1]);

        let rows: Vec<(Vec<ScoredKeypoint>, DetectionStats)> = current
            .interior_rows()
            .into_par_iter()
            .map(|row| self.scan_row(below, current, above, octave_index, scale, row))
            .collect();

        let mut keypoints = Vec::new();
        let mut stats = DetectionStats::default();
        for (found, row_stats) in rows {
            keypoints.extend(found);
            stats.merge(&row_stats);
        }
        (keypoints, stats)
    }

    fn scan_row(
        &self,
        below: &Grid,
        current: &Grid,
        above: &Grid,
        octave: usize,
        scale: usize,
        row: usize,
    ) -> (Vec<ScoredKeypoint>, DetectionStats) {
        let mut found = Vec::new();
        let mut stats = DetectionStats::default();
        for col in current.interior_cols() {
            stats.candidates_examined += 1;
            if classify_extremum(below, current, above, row, col).is_none() {
                continue;
            }
            stats.extrema += 1;

            let response = current.at(row, col);
            if !passes_contrast(response, self.contrast_threshold) {
                stats.rejected_low_contrast += 1;
                continue;
            }
            if !passes_edge(current, row, col, self.edge_filter, self.edge_threshold) {
                stats.rejected_edge += 1;
                continue;
            }

            stats.accepted += 1;
            found.push(ScoredKeypoint {
                keypoint: Keypoint { octave, scale, row, col },
                response,
            });
        }
        (found, stats)
    }

    pub fn contrast_threshold(&self) -> f32 {
        self.contrast_threshold
    }

    pub fn edge_threshold(&self) -> f32 {
        self.edge_threshold
    }

    pub fn edge_filter(&self) -> EdgeFilter {
        self.edge_filter
    }
}
