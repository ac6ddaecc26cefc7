//! Position history drawn behind the ball.

use std::collections::VecDeque;

use glam::Vec3;

/// Bounded history of ball positions, oldest first.
#[derive(Clone, Debug)]
pub struct Trail {
    points: VecDeque<Vec3>,
    max_len: usize,
    min_spacing: f32,
    pub color: Vec3,
}

impl Trail {
    pub fn new(max_len: usize, min_spacing: f32, color: Vec3) -> Self {
        Self {
            points: VecDeque::with_capacity(max_len.min(4096)),
            max_len,
            min_spacing: min_spacing.max(0.0),
            color,
        }
    }

    /// Append a point, dropping the oldest one once the trail is full.
    ///
    /// Returns `false` if the point was closer than the minimum spacing to the
    /// previous one and was skipped.
    pub fn record(&mut self, point: Vec3) -> bool {
        if self.max_len == 0 {
            return false;
        }
        if let Some(last) = self.points.back() {
            if self.min_spacing > 0.0 && last.distance(point) < self.min_spacing {
                return false;
            }
        }
        if self.points.len() == self.max_len {
            self.points.pop_front();
        }
        self.points.push_back(point);
        true
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.max_len
    }

    /// Most recently recorded point.
    pub fn latest(&self) -> Option<Vec3> {
        self.points.back().copied()
    }

    /// Points from oldest to newest.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Vec3> + '_ {
        self.points.iter()
    }
}
