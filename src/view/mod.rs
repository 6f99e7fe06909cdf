//! Bounded most-recent-first projection of the track for display.

use std::collections::VecDeque;

use crate::track::Sample;

/// Fixed-capacity window over the latest samples, newest at the front.
#[derive(Debug)]
pub struct RecentView {
    entries: VecDeque<Sample>,
    capacity: usize,
}

impl RecentView {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Insert at the front, evicting from the back until the window fits.
    pub fn push(&mut self, sample: Sample) {
        self.entries.push_front(sample);
        while self.entries.len() > self.capacity {
            self.entries.pop_back();
        }
    }

    /// Discard every entry and adopt the new capacity. Shrinking would
    /// otherwise require partial pruning; a total reset matches the
    /// rebuild the display layer performs anyway.
    pub fn reset(&mut self, new_capacity: usize) {
        self.entries.clear();
        self.capacity = new_capacity;
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The most recently pushed sample.
    pub fn front(&self) -> Option<&Sample> {
        self.entries.front()
    }

    /// Newest-first snapshot for display.
    pub fn snapshot(&self) -> Vec<Sample> {
        self.entries.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn sample(lat: f64) -> Sample {
        Sample {
            timestamp: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
            latitude: lat,
            longitude: 10.0,
            speed_mps: 0.0,
        }
    }

    #[test]
    fn stays_within_capacity_and_keeps_newest_in_front() {
        let mut view = RecentView::new(3);
        for i in 0..7 {
            view.push(sample(i as f64));
        }

        assert_eq!(view.len(), 3);
        assert_eq!(view.front().unwrap().latitude, 6.0);

        let lats: Vec<f64> = view.snapshot().iter().map(|s| s.latitude).collect();
        assert_eq!(lats, [6.0, 5.0, 4.0]);
    }

    #[test]
    fn under_capacity_keeps_everything() {
        let mut view = RecentView::new(10);
        view.push(sample(1.0));
        view.push(sample(2.0));

        assert_eq!(view.len(), 2);
        assert_eq!(view.front().unwrap().latitude, 2.0);
    }

    #[test]
    fn reset_clears_entries_and_applies_new_capacity() {
        let mut view = RecentView::new(5);
        for i in 0..5 {
            view.push(sample(i as f64));
        }

        view.reset(2);
        assert!(view.is_empty());
        assert_eq!(view.capacity(), 2);

        for i in 0..4 {
            view.push(sample(i as f64));
        }
        assert_eq!(view.len(), 2);
    }
}
