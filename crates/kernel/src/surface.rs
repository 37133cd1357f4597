use glam::{Vec2, Vec3};
use ripplefx_common::{CanvasSize, DistortMode, GridCell, GridDims};
use serde::{Deserialize, Serialize};

use crate::config::SurfaceConfig;
use crate::error::RippleError;
use crate::mesh::GridMesh;
use crate::ripple::{Ripple, RippleId, RippleSet};
use crate::table::{RIPPLE_LENGTH, RippleLookupTable, radial_phase};

/// A record of every state change outside the per-vertex recomputation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SurfaceEvent {
    /// A ripple started at the given cell.
    RippleAdded {
        id: RippleId,
        origin: GridCell,
        step: u32,
        duration: u32,
    },
    /// A ripple aged past its duration, or was evicted to make room.
    RippleExpired { id: RippleId, age: u32, evicted: bool },
    /// The distorted attribute changed; `from` was restored to pristine.
    ModeChanged { from: DistortMode, to: DistortMode },
}

/// Borrowed view of the attribute currently being distorted.
#[derive(Debug, Clone, Copy)]
pub enum LiveAttribute<'a> {
    Positions(&'a [Vec3]),
    TexCoords(&'a [Vec2]),
}

/// The ripple simulation: lookup tables, grid mesh, active ripples and the
/// distort-mode state machine.
///
/// All mutation goes through `tick`, `add_ripple` and `set_distort_mode`.
/// Only the attribute selected by the current mode ever differs from its
/// pristine snapshot, and border vertices never move.
///
/// Every insertion, expiry and mode change is appended to an event log that
/// only shrinks through [`drain_events`](Self::drain_events). Hosts must drain
/// it regularly (once per frame is typical) or it grows for the surface's
/// whole lifetime.
#[derive(Debug, Clone)]
pub struct RippleSurface {
    table: RippleLookupTable,
    mesh: GridMesh,
    ripples: RippleSet,
    mode: DistortMode,
    tick: u64,
    event_log: Vec<SurfaceEvent>,
}

impl RippleSurface {
    pub fn new(config: &SurfaceConfig) -> Result<Self, RippleError> {
        config.validate()?;
        let mesh = GridMesh::build(config.grid, config.canvas)?;
        let table = RippleLookupTable::new(config.grid, config.canvas);
        let ripples =
            RippleSet::new(config.grid, config.canvas).with_capacity_limit(config.max_ripples);

        tracing::debug!(
            cols = config.grid.cols,
            rows = config.grid.rows,
            width = config.canvas.width,
            height = config.canvas.height,
            mode = %config.initial_mode,
            "ripple surface built"
        );

        Ok(Self {
            table,
            mesh,
            ripples,
            mode: config.initial_mode,
            tick: 0,
            event_log: Vec::new(),
        })
    }

    pub fn dims(&self) -> GridDims {
        self.mesh.dims()
    }

    pub fn canvas(&self) -> CanvasSize {
        self.mesh.canvas()
    }

    pub fn mode(&self) -> DistortMode {
        self.mode
    }

    /// Number of completed ticks.
    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    pub fn mesh(&self) -> &GridMesh {
        &self.mesh
    }

    pub fn table(&self) -> &RippleLookupTable {
        &self.table
    }

    pub fn ripples(&self) -> &RippleSet {
        &self.ripples
    }

    /// The working array of the attribute the current mode distorts.
    pub fn live_attribute(&self) -> LiveAttribute<'_> {
        match self.mode {
            DistortMode::Vertices => LiveAttribute::Positions(self.mesh.positions()),
            DistortMode::TexCoords => LiveAttribute::TexCoords(self.mesh.texcoords()),
        }
    }

    /// Read-only access to the event log.
    pub fn events(&self) -> &[SurfaceEvent] {
        &self.event_log
    }

    /// Drain and return the event log. The only way the log shrinks.
    pub fn drain_events(&mut self) -> Vec<SurfaceEvent> {
        std::mem::take(&mut self.event_log)
    }

    /// Start a ripple at a canvas-centered, y-up point travelling `step` units per tick.
    pub fn add_ripple(&mut self, x: f32, y: f32, step: i32) -> Result<RippleId, RippleError> {
        let (ripple, evicted) = self.ripples.add(Vec2::new(x, y), step)?;

        if let Some(old) = evicted {
            tracing::debug!(id = old.id.0, age = old.age, "ripple evicted at capacity");
            self.event_log.push(SurfaceEvent::RippleExpired {
                id: old.id,
                age: old.age,
                evicted: true,
            });
        }

        tracing::debug!(
            id = ripple.id.0,
            gx = ripple.origin.gx,
            gy = ripple.origin.gy,
            step = ripple.step,
            "ripple added"
        );
        self.event_log.push(SurfaceEvent::RippleAdded {
            id: ripple.id,
            origin: ripple.origin,
            step: ripple.step,
            duration: ripple.duration,
        });
        Ok(ripple.id)
    }

    /// Switch the distorted attribute.
    ///
    /// The attribute that stops being live is restored to pristine first.
    /// Returns `true` if the mode actually changed.
    pub fn set_distort_mode(&mut self, mode: DistortMode) -> bool {
        if mode == self.mode {
            return false;
        }
        let from = self.mode;
        self.mesh.restore(from);
        self.mode = mode;

        tracing::debug!(%from, to = %mode, "distort mode changed");
        self.event_log.push(SurfaceEvent::ModeChanged { from, to: mode });
        true
    }

    /// Advance every ripple one step and recompute the live attribute.
    pub fn tick(&mut self) {
        let _span = tracing::trace_span!("surface_tick").entered();

        for ripple in self.ripples.tick() {
            tracing::debug!(id = ripple.id.0, age = ripple.age, "ripple expired");
            self.event_log.push(SurfaceEvent::RippleExpired {
                id: ripple.id,
                age: ripple.age,
                evicted: false,
            });
        }

        let GridDims { cols, rows } = self.mesh.dims();
        let scale = displacement_scale(self.mode, self.mesh.canvas());
        for row in 1..rows {
            for col in 1..cols {
                let offset: Vec2 = self
                    .ripples
                    .iter()
                    .map(|ripple| ripple_displacement(&self.table, ripple, col, row, scale))
                    .sum();
                self.apply(col, row, offset);
            }
        }

        self.tick += 1;
        tracing::trace!(tick = self.tick, active = self.ripples.len(), "surface tick complete");
    }

    /// Reset one interior vertex of the live attribute to pristine plus `offset`.
    fn apply(&mut self, col: u32, row: u32, offset: Vec2) {
        let idx = self.mesh.dims().vertex_index(col, row);
        match self.mode {
            DistortMode::Vertices => {
                let base = self.mesh.pristine_positions()[idx];
                self.mesh.positions_mut()[idx] = base + offset.extend(0.0);
            }
            DistortMode::TexCoords => {
                let base = self.mesh.pristine_texcoords()[idx];
                self.mesh.texcoords_mut()[idx] = base + offset;
            }
        }
    }
}

/// Per-axis displacement scale: canvas units for positions, unit range for texcoords.
pub fn displacement_scale(mode: DistortMode, canvas: CanvasSize) -> Vec2 {
    match mode {
        DistortMode::Vertices => Vec2::new(canvas.width, canvas.height),
        DistortMode::TexCoords => Vec2::ONE,
    }
}

/// Fold a signed cell offset into the stored quadrant.
///
/// A negative offset is negated and the scale's sign flipped with it, so the
/// stored outward direction still points away from the origin.
pub fn mirror_axis(offset: i32, scale: f32) -> (u32, f32) {
    if offset < 0 {
        (offset.unsigned_abs(), -scale)
    } else {
        (offset as u32, scale)
    }
}

/// Fade applied to a whole ripple as it ages, independent of radial phase.
pub fn age_fade(age: u32) -> f32 {
    let remaining = (1.0 - age as f32 / RIPPLE_LENGTH as f32).max(0.0);
    remaining * remaining
}

/// Displacement one ripple contributes to the vertex at `(col, row)`.
pub fn ripple_displacement(
    table: &RippleLookupTable,
    ripple: &Ripple,
    col: u32,
    row: u32,
    scale: Vec2,
) -> Vec2 {
    let (mx, sx) = mirror_axis(col as i32 - ripple.origin.gx, scale.x);
    let (my, sy) = mirror_axis(row as i32 - ripple.origin.gy, scale.y);

    let entry = table.direction(mx, my);
    let phase = radial_phase(ripple.age, entry.phase);
    let strength = table.amplitude(phase) * age_fade(ripple.age);

    Vec2::new(
        entry.direction.x * sx * strength,
        entry.direction.y * sy * strength,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(cols: u32, rows: u32, w: f32, h: f32, mode: DistortMode) -> SurfaceConfig {
        SurfaceConfig {
            grid: GridDims::new(cols, rows),
            canvas: CanvasSize::new(w, h),
            initial_mode: mode,
            max_ripples: None,
        }
    }

    fn border_matches_pristine(surface: &RippleSurface) -> bool {
        let dims = surface.dims();
        let mesh = surface.mesh();
        for row in 0..=dims.rows {
            for col in 0..=dims.cols {
                if !dims.is_border(col, row) {
                    continue;
                }
                let idx = dims.vertex_index(col, row);
                if mesh.positions()[idx] != mesh.pristine_positions()[idx]
                    || mesh.texcoords()[idx] != mesh.pristine_texcoords()[idx]
                {
                    return false;
                }
            }
        }
        true
    }

    #[test]
    fn scenario_ten_by_ten() {
        let mut s =
            RippleSurface::new(&config(10, 10, 100.0, 100.0, DistortMode::TexCoords)).unwrap();
        let id = s.add_ripple(0.0, 0.0, 7).unwrap();
        let ripple = *s.ripples().get(id).unwrap();
        assert_eq!(ripple.origin, GridCell::new(5, 5));
        assert_eq!(ripple.duration, 142 + RIPPLE_LENGTH as u32);

        s.tick();
        assert_eq!(s.ripples().get(id).unwrap().age, 7);

        let total_ticks = ripple.duration.div_ceil(7);
        for _ in 1..total_ticks {
            s.tick();
        }
        assert!(s.ripples().get(id).is_none());
        assert_eq!(s.tick_count(), total_ticks as u64);
    }

    #[test]
    fn ripple_present_until_past_duration() {
        let mut s =
            RippleSurface::new(&config(10, 10, 100.0, 100.0, DistortMode::Vertices)).unwrap();
        let id = s.add_ripple(0.0, 0.0, 7).unwrap();
        let duration = s.ripples().get(id).unwrap().duration;
        let mut k = 0u32;
        loop {
            s.tick();
            k += 1;
            match s.ripples().get(id) {
                Some(r) => {
                    assert_eq!(r.age, k * 7);
                    assert!(r.age <= duration);
                }
                None => {
                    assert!(k * 7 > duration);
                    assert!((k - 1) * 7 <= duration);
                    break;
                }
            }
        }
    }

    #[test]
    fn borders_stay_pinned() {
        for mode in [DistortMode::Vertices, DistortMode::TexCoords] {
            let mut s = RippleSurface::new(&config(12, 9, 240.0, 180.0, mode)).unwrap();
            s.add_ripple(0.0, 0.0, 7).unwrap();
            s.add_ripple(-119.0, 89.0, 11).unwrap();
            s.add_ripple(120.0, -90.0, 3).unwrap();
            for _ in 0..40 {
                s.tick();
                assert!(border_matches_pristine(&s));
            }
        }
    }

    #[test]
    fn ripple_actually_distorts_interior() {
        let mut s =
            RippleSurface::new(&config(16, 16, 256.0, 256.0, DistortMode::Vertices)).unwrap();
        s.add_ripple(0.0, 0.0, 7).unwrap();
        for _ in 0..10 {
            s.tick();
        }
        assert!(!s.mesh().is_pristine(DistortMode::Vertices));
        assert!(s.mesh().is_pristine(DistortMode::TexCoords));
    }

    #[test]
    fn only_live_attribute_moves() {
        let mut s =
            RippleSurface::new(&config(16, 16, 256.0, 256.0, DistortMode::TexCoords)).unwrap();
        s.add_ripple(10.0, -20.0, 7).unwrap();
        for _ in 0..10 {
            s.tick();
        }
        assert!(!s.mesh().is_pristine(DistortMode::TexCoords));
        assert!(s.mesh().is_pristine(DistortMode::Vertices));
        assert!(matches!(s.live_attribute(), LiveAttribute::TexCoords(_)));
    }

    #[test]
    fn mode_switch_restores_previous_attribute() {
        let mut s =
            RippleSurface::new(&config(16, 16, 256.0, 256.0, DistortMode::Vertices)).unwrap();
        s.add_ripple(0.0, 0.0, 7).unwrap();
        for _ in 0..10 {
            s.tick();
        }
        assert!(s.set_distort_mode(DistortMode::TexCoords));
        assert!(s.mesh().is_pristine(DistortMode::Vertices));

        s.tick();
        assert!(s.mesh().is_pristine(DistortMode::Vertices));
        assert!(!s.mesh().is_pristine(DistortMode::TexCoords));
    }

    #[test]
    fn mode_round_trip_without_ripples_is_pristine() {
        let mut s =
            RippleSurface::new(&config(8, 8, 64.0, 64.0, DistortMode::TexCoords)).unwrap();
        assert!(s.set_distort_mode(DistortMode::Vertices));
        s.tick();
        assert!(s.set_distort_mode(DistortMode::TexCoords));
        s.tick();
        assert!(s.mesh().is_pristine(DistortMode::Vertices));
        assert!(s.mesh().is_pristine(DistortMode::TexCoords));
    }

    #[test]
    fn same_mode_is_not_a_transition() {
        let mut s =
            RippleSurface::new(&config(8, 8, 64.0, 64.0, DistortMode::TexCoords)).unwrap();
        assert!(!s.set_distort_mode(DistortMode::TexCoords));
        assert!(s.events().is_empty());
    }

    #[test]
    fn mirror_axis_flips_scale_with_sign() {
        assert_eq!(mirror_axis(3, 2.0), (3, 2.0));
        assert_eq!(mirror_axis(0, 2.0), (0, 2.0));
        assert_eq!(mirror_axis(-3, 2.0), (3, -2.0));
    }

    #[test]
    fn displacement_scale_per_mode() {
        let canvas = CanvasSize::new(320.0, 240.0);
        assert_eq!(
            displacement_scale(DistortMode::Vertices, canvas),
            Vec2::new(320.0, 240.0)
        );
        assert_eq!(displacement_scale(DistortMode::TexCoords, canvas), Vec2::ONE);
    }

    #[test]
    fn age_fade_never_rises_again() {
        assert_eq!(age_fade(0), 1.0);
        assert_eq!(age_fade(RIPPLE_LENGTH as u32), 0.0);
        assert_eq!(age_fade(RIPPLE_LENGTH as u32 * 3), 0.0);
        assert!(age_fade(100) > age_fade(200));
    }

    #[test]
    fn quadrant_symmetry_around_center() {
        let s = RippleSurface::new(&config(10, 10, 100.0, 100.0, DistortMode::Vertices)).unwrap();
        let table = s.table();
        let scale = displacement_scale(DistortMode::Vertices, s.canvas());
        let ripple = Ripple {
            id: RippleId(0),
            origin: GridCell::new(5, 5),
            age: 60,
            duration: 10_000,
            step: 7,
        };
        for dy in 0..=4i32 {
            for dx in 0..=4i32 {
                let at = |sx: i32, sy: i32| {
                    let col = (5 + sx * dx) as u32;
                    let row = (5 + sy * dy) as u32;
                    ripple_displacement(table, &ripple, col, row, scale)
                };
                let base = at(1, 1);
                assert_eq!(at(-1, 1), Vec2::new(-base.x, base.y));
                assert_eq!(at(1, -1), Vec2::new(base.x, -base.y));
                assert_eq!(at(-1, -1), -base);
            }
        }
    }

    #[test]
    fn unreached_cells_are_undisturbed() {
        let s = RippleSurface::new(&config(10, 10, 100.0, 100.0, DistortMode::Vertices)).unwrap();
        let ripple = Ripple {
            id: RippleId(0),
            origin: GridCell::new(1, 1),
            age: 5,
            duration: 10_000,
            step: 7,
        };
        let scale = displacement_scale(DistortMode::Vertices, s.canvas());
        // 80 canvas units away; a front aged 5 has not arrived
        let d = ripple_displacement(s.table(), &ripple, 9, 1, scale);
        assert!(d.length() < 1e-3);
    }

    #[test]
    fn events_track_lifecycle() {
        let mut s = RippleSurface::new(&config(4, 4, 16.0, 16.0, DistortMode::TexCoords)).unwrap();
        let id = s.add_ripple(0.0, 0.0, 5000).unwrap();
        s.set_distort_mode(DistortMode::Vertices);
        s.tick();

        let events = s.drain_events();
        assert_eq!(events.len(), 3);
        assert!(matches!(events[0], SurfaceEvent::RippleAdded { id: i, .. } if i == id));
        assert!(matches!(
            events[1],
            SurfaceEvent::ModeChanged {
                from: DistortMode::TexCoords,
                to: DistortMode::Vertices
            }
        ));
        assert!(matches!(
            events[2],
            SurfaceEvent::RippleExpired { id: i, evicted: false, .. } if i == id
        ));
        assert!(s.events().is_empty());
    }

    #[test]
    fn event_log_holds_until_drained() {
        let mut s = RippleSurface::new(&config(8, 8, 64.0, 64.0, DistortMode::TexCoords)).unwrap();
        for i in 0..3 {
            s.add_ripple(i as f32, 0.0, 1).unwrap();
            s.tick();
        }
        assert_eq!(s.events().len(), 3);
        assert_eq!(s.drain_events().len(), 3);

        // Ticking live ripples adds nothing; the log stays empty after a drain.
        for _ in 0..10 {
            s.tick();
        }
        assert!(s.events().is_empty());
        assert!(s.drain_events().is_empty());
    }

    #[test]
    fn eviction_is_logged() {
        let cfg = SurfaceConfig {
            max_ripples: Some(1),
            ..config(4, 4, 16.0, 16.0, DistortMode::TexCoords)
        };
        let mut s = RippleSurface::new(&cfg).unwrap();
        let first = s.add_ripple(0.0, 0.0, 7).unwrap();
        s.add_ripple(1.0, 1.0, 7).unwrap();
        assert_eq!(s.ripples().len(), 1);
        assert!(s.events().iter().any(|e| matches!(
            e,
            SurfaceEvent::RippleExpired { id, evicted: true, .. } if *id == first
        )));
    }

    #[test]
    fn invalid_input_leaves_state_untouched() {
        let mut s = RippleSurface::new(&config(4, 4, 16.0, 16.0, DistortMode::TexCoords)).unwrap();
        assert_eq!(s.add_ripple(0.0, 0.0, 0), Err(RippleError::InvalidStep(0)));
        assert!(s.add_ripple(100.0, 0.0, 7).is_err());
        assert!(s.ripples().is_empty());
        assert!(s.events().is_empty());
    }
}
