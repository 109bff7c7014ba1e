use dog_core::{DogPyramid, DogWarning, GaussianPyramid, Keypoint};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Keypoint with the DoG value it was detected at
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScoredKeypoint {
    pub keypoint: Keypoint,
    pub response: f32,
}

/// Counters for each stage of the detector, summed over the whole pyramid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DetectionStats {
    pub candidates_examined: usize,
    pub extrema: usize,
    pub rejected_low_contrast: usize,
    pub rejected_edge: usize,
    pub accepted: usize,
}

impl DetectionStats {
    pub fn merge(&mut self, other: &DetectionStats) {
        self.candidates_examined += other.candidates_examined;
        self.extrema += other.extrema;
        self.rejected_low_contrast += other.rejected_low_contrast;
        self.rejected_edge += other.rejected_edge;
        self.accepted += other.accepted;
    }
}

/// Everything produced by one pipeline run.
#[derive(Debug, Clone)]
pub struct DetectionReport {
    pub gaussian: GaussianPyramid,
    pub dog: DogPyramid,
    pub keypoints: Vec<ScoredKeypoint>,
    pub stats: DetectionStats,
    pub warnings: Vec<DogWarning>,
}

impl DetectionReport {
    pub fn keypoints(&self) -> Vec<Keypoint> {
        self.keypoints.iter().map(|sk| sk.keypoint).collect()
    }
}
