use glam::Vec2;
use ripplefx_common::{CanvasSize, GridCell, GridDims};
use serde::{Deserialize, Serialize};

use crate::error::RippleError;
use crate::table::RIPPLE_LENGTH;

/// Identifier assigned to each ripple in insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RippleId(pub u64);

/// One propagating disturbance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ripple {
    pub id: RippleId,
    /// Grid cell the ripple started from.
    pub origin: GridCell,
    /// Distance the front has travelled, in canvas units.
    pub age: u32,
    /// Age past which the ripple is dropped.
    pub duration: u32,
    /// Age added per tick. Always positive.
    pub step: u32,
}

impl Ripple {
    pub fn is_expired(&self) -> bool {
        self.age > self.duration
    }
}

/// Unordered collection of active ripples over one grid/canvas pair.
#[derive(Debug, Clone)]
pub struct RippleSet {
    dims: GridDims,
    canvas: CanvasSize,
    ripples: Vec<Ripple>,
    capacity: Option<usize>,
    next_id: u64,
}

impl RippleSet {
    pub fn new(dims: GridDims, canvas: CanvasSize) -> Self {
        Self {
            dims,
            canvas,
            ripples: Vec::new(),
            capacity: None,
            next_id: 0,
        }
    }

    /// Limit the number of simultaneous ripples. Adding past the limit evicts the oldest.
    pub fn with_capacity_limit(mut self, capacity: Option<usize>) -> Self {
        self.capacity = capacity.map(|c| c.max(1));
        self
    }

    /// Lifetime of every ripple on this canvas: the diagonal plus the amplitude tail.
    pub fn ripple_duration(&self) -> u32 {
        (self.canvas.diagonal().ceil() as u32).saturating_add(RIPPLE_LENGTH as u32)
    }

    /// Map a canvas-centered, y-up point to the grid cell it falls in.
    pub fn cell_at(&self, point: Vec2) -> GridCell {
        let CanvasSize { width, height } = self.canvas;
        let x = point.x + width * 0.5;
        let y = height - (point.y + height * 0.5);
        let gx = (x / width * self.dims.cols as f32).floor() as i32;
        let gy = (y / height * self.dims.rows as f32).floor() as i32;
        GridCell::new(
            gx.clamp(0, self.dims.cols as i32),
            gy.clamp(0, self.dims.rows as i32),
        )
    }

    /// Start a ripple at a canvas-centered point.
    ///
    /// Returns the new ripple and, if the capacity limit forced one out, the evicted ripple.
    pub fn add(&mut self, point: Vec2, step: i32) -> Result<(Ripple, Option<Ripple>), RippleError> {
        if step <= 0 {
            return Err(RippleError::InvalidStep(step));
        }
        if !self.canvas.contains(point) {
            return Err(RippleError::OutsideCanvas {
                x: point.x,
                y: point.y,
                width: self.canvas.width,
                height: self.canvas.height,
            });
        }

        let evicted = match self.capacity {
            Some(cap) if self.ripples.len() >= cap => self.evict_oldest(),
            _ => None,
        };

        let ripple = Ripple {
            id: RippleId(self.next_id),
            origin: self.cell_at(point),
            age: 0,
            duration: self.ripple_duration(),
            step: step as u32,
        };
        self.next_id += 1;
        self.ripples.push(ripple);
        Ok((ripple, evicted))
    }

    /// Age every ripple by its step and drop the ones past their duration.
    ///
    /// Returns the ripples that expired on this tick.
    pub fn tick(&mut self) -> Vec<Ripple> {
        let mut expired = Vec::new();
        let mut i = 0;
        while i < self.ripples.len() {
            let ripple = &mut self.ripples[i];
            ripple.age = ripple.age.saturating_add(ripple.step);
            if ripple.is_expired() {
                expired.push(self.ripples.swap_remove(i));
            } else {
                i += 1;
            }
        }
        expired
    }

    pub fn len(&self) -> usize {
        self.ripples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ripples.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Ripple> {
        self.ripples.iter()
    }

    pub fn as_slice(&self) -> &[Ripple] {
        &self.ripples
    }

    pub fn get(&self, id: RippleId) -> Option<&Ripple> {
        self.ripples.iter().find(|r| r.id == id)
    }

    fn evict_oldest(&mut self) -> Option<Ripple> {
        let (idx, _) = self
            .ripples
            .iter()
            .enumerate()
            .max_by_key(|(_, r)| r.age)?;
        Some(self.ripples.swap_remove(idx))
    }
}
