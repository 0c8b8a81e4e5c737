//! Stream samples and feature-vector arithmetic.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use streams_evals::Label;

/// A single observation from a sample stream.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Position in the stream
    #[serde(default)]
    pub t: u64,
    /// Feature vector
    pub x: Vec<f64>,
    /// True class, when known at evaluation time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<Label>,
    /// Optional caller-assigned identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
}

impl Sample {
    /// Unlabeled sample.
    #[must_use]
    pub fn new(x: Vec<f64>) -> Self {
        Self {
            x,
            ..Self::default()
        }
    }

    /// Sample with a true label.
    #[must_use]
    pub fn labeled(x: Vec<f64>, y: Label) -> Self {
        Self {
            x,
            y: Some(y),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_time(mut self, t: u64) -> Self {
        self.t = t;
        self
    }

    #[must_use]
    pub fn with_id(mut self, id: u64) -> Self {
        self.id = Some(id);
        self
    }

    /// Number of features.
    #[must_use]
    pub fn dimension(&self) -> usize {
        self.x.len()
    }

    /// Euclidean distance over the features `other` has.
    #[must_use]
    pub fn distance(&self, other: &Sample) -> f64 {
        other
            .x
            .iter()
            .zip(&self.x)
            .map(|(a, b)| (a - b) * (a - b))
            .sum::<f64>()
            .sqrt()
    }

    /// Element-wise `self += other`.
    pub fn add(&mut self, other: &Sample) {
        for (a, b) in self.x.iter_mut().zip(&other.x) {
            *a += b;
        }
    }

    pub fn divide(&mut self, scalar: f64) {
        for a in &mut self.x {
            *a /= scalar;
        }
    }

    pub fn multiply(&mut self, scalar: f64) {
        for a in &mut self.x {
            *a *= scalar;
        }
    }

    /// Raise every feature to `exp`.
    pub fn pow(&mut self, exp: i32) {
        for a in &mut self.x {
            *a = a.powi(exp);
        }
    }

    /// `self - other` as a new sample carrying `self`'s label.
    #[must_use]
    pub fn difference(&self, other: &Sample) -> Sample {
        let x = self
            .x
            .iter()
            .enumerate()
            .map(|(i, a)| a - other.x.get(i).copied().unwrap_or_default())
            .collect();
        Sample {
            x,
            y: self.y,
            ..Sample::default()
        }
    }

    /// Comparator ordering samples by their distance to `self`.
    pub fn by_distance(&self) -> impl Fn(&Sample, &Sample) -> Ordering + '_ {
        move |a: &Sample, b: &Sample| a.distance(self).total_cmp(&b.distance(self))
    }

    /// Closest sample in `samples`; the first one wins ties.
    #[must_use]
    pub fn closest<'a>(&self, samples: &'a [Sample]) -> Option<&'a Sample> {
        self.closest_index(samples).map(|i| &samples[i])
    }

    /// Index of the closest sample in `samples`; the first one wins ties.
    #[must_use]
    pub fn closest_index(&self, samples: &[Sample]) -> Option<usize> {
        let compare = self.by_distance();
        samples
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| compare(*a, *b))
            .map(|(i, _)| i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_is_euclidean() {
        let a = Sample::new(vec![0.0, 0.0]);
        let b = Sample::new(vec![3.0, 4.0]);
        assert_eq!(a.distance(&b), 5.0);
        assert_eq!(b.distance(&a), 5.0);
    }

    #[test]
    fn arithmetic_updates_in_place() {
        let mut s = Sample::new(vec![1.0, 2.0]);
        s.add(&Sample::new(vec![3.0, 4.0]));
        assert_eq!(s.x, vec![4.0, 6.0]);

        s.divide(2.0);
        assert_eq!(s.x, vec![2.0, 3.0]);

        s.multiply(3.0);
        assert_eq!(s.x, vec![6.0, 9.0]);

        s.pow(2);
        assert_eq!(s.x, vec![36.0, 81.0]);
    }

    #[test]
    fn difference_keeps_own_label() {
        let a = Sample::labeled(vec![5.0, 1.0], 2);
        let b = Sample::labeled(vec![1.0, 1.0], 7);

        let d = a.difference(&b);

        assert_eq!(d.x, vec![4.0, 0.0]);
        assert_eq!(d.y, Some(2));
        assert_eq!(a.x, vec![5.0, 1.0]);
    }

    #[test]
    fn closest_picks_minimum_distance() {
        let target = Sample::new(vec![0.0]);
        let samples = vec![
            Sample::new(vec![5.0]),
            Sample::new(vec![-1.0]),
            Sample::new(vec![2.0]),
        ];

        assert_eq!(target.closest_index(&samples), Some(1));
        assert_eq!(target.closest(&samples).map(|s| s.x[0]), Some(-1.0));
    }

    #[test]
    fn closest_ties_keep_first() {
        let target = Sample::new(vec![0.0]);
        let samples = vec![Sample::new(vec![1.0]), Sample::new(vec![-1.0])];

        assert_eq!(target.closest_index(&samples), Some(0));
    }

    #[test]
    fn closest_of_empty_slice_is_none() {
        let target = Sample::new(vec![0.0]);
        assert!(target.closest(&[]).is_none());
        assert!(target.closest_index(&[]).is_none());
    }

    #[test]
    fn by_distance_sorts_nearest_first() {
        let target = Sample::new(vec![10.0]);
        let mut samples = vec![
            Sample::new(vec![0.0]),
            Sample::new(vec![9.0]),
            Sample::new(vec![12.0]),
        ];

        samples.sort_by(target.by_distance());

        let xs: Vec<f64> = samples.iter().map(|s| s.x[0]).collect();
        assert_eq!(xs, vec![9.0, 12.0, 0.0]);
    }

    #[test]
    fn builders_set_time_and_id() {
        let s = Sample::new(vec![1.0]).with_time(4).with_id(9);
        assert_eq!(s.t, 4);
        assert_eq!(s.id, Some(9));
        assert_eq!(s.dimension(), 1);
    }
}
