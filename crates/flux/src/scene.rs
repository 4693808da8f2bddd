//! Background wash and the lensed grid.

use glam::DVec2;
use magnaflux_core::palette;
use magnaflux_core::state::{Anomaly, FieldState};
use magnaflux_core::surface::{DrawCommand, Stroke, Surface};

use crate::integrator::HORIZON_RADIUS;
use crate::mode::RenderMode;

/// Horizontal spacing of grid columns, px.
pub const GRID_SPACING: f64 = 40.0;
/// Vertical spacing of vertices along a grid column, px.
pub const GRID_VERTEX_STEP: f64 = 10.0;
/// Vertices closer than this to the center are lensed.
pub const LENS_OUTER_RADIUS: f64 = 300.0;

/// Paints the translucent background rectangle over the whole surface.
pub fn draw_fade(surface: &mut dyn Surface, size: DVec2, state: &FieldState, mode: &RenderMode) {
    surface.draw(DrawCommand::FillRect {
        origin: DVec2::ZERO,
        size,
        color: palette::background().with_alpha(mode.fade_alpha(state)),
    });
}

/// Displaces a grid vertex toward `center` by `40² * 2 / d` when its distance
/// `d` lies strictly between the horizon radius and 300.
pub fn lens(vertex: DVec2, center: DVec2) -> DVec2 {
    let offset = vertex - center;
    let d = offset.length();
    if d > HORIZON_RADIUS && d < LENS_OUTER_RADIUS {
        let pull = HORIZON_RADIUS * HORIZON_RADIUS * 2.0 / d;
        vertex - offset / d * pull
    } else {
        vertex
    }
}

/// Vertices of every grid column, lensed when "Event Horizon" is active.
///
/// Columns start at x = 0 and continue one spacing past the right edge;
/// vertices likewise run one spacing past the bottom edge.
pub fn grid_columns(size: DVec2, lensing: bool) -> Vec<Vec<DVec2>> {
    let center = size * 0.5;
    let columns = (size.x / GRID_SPACING).floor() as usize + 2;
    let rows = ((size.y + GRID_SPACING) / GRID_VERTEX_STEP).ceil() as usize;
    (0..columns)
        .map(|c| c as f64 * GRID_SPACING)
        .filter(|x| *x < size.x + GRID_SPACING)
        .map(|x| {
            (0..rows)
                .map(|r| DVec2::new(x, r as f64 * GRID_VERTEX_STEP))
                .filter(|v| v.y < size.y + GRID_SPACING)
                .map(|v| if lensing { lens(v, center) } else { v })
                .collect()
        })
        .collect()
}

/// Strokes the grid, one polyline per column.
pub fn draw_grid(surface: &mut dyn Surface, size: DVec2, state: &FieldState, mode: &RenderMode) {
    let stroke = Stroke::new(palette::grid().with_alpha(mode.grid_alpha()), 1.0);
    for points in grid_columns(size, state.has(Anomaly::EventHorizon)) {
        surface.draw(DrawCommand::StrokePath { points, stroke });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use magnaflux_core::state::Intervention;
    use magnaflux_core::surface::RecordingSurface;

    #[test]
    fn fade_covers_surface_with_background_color() {
        let mut s = RecordingSurface::new(400, 300);
        let size = DVec2::new(400.0, 300.0);
        let mode = RenderMode::new(Some(Intervention::VoidAnalysis));
        draw_fade(&mut s, size, &FieldState::default(), &mode);
        match &s.commands()[0] {
            DrawCommand::FillRect {
                origin,
                size: rect,
                color,
            } => {
                assert_eq!(*origin, DVec2::ZERO);
                assert_eq!(*rect, size);
                assert_eq!(color.a, 0.4);
                assert_eq!(color.to_rgba8(), [2, 6, 23, 102]);
            }
            other => panic!("expected fill_rect, got: {other:?}"),
        }
    }

    #[test]
    fn grid_has_a_column_every_40px_plus_overhang() {
        let cols = grid_columns(DVec2::new(400.0, 300.0), false);
        // x = 0, 40, ..., 400 (< 440)
        assert_eq!(cols.len(), 11);
        assert_eq!(cols[10][0].x, 400.0);
        // y = 0, 10, ..., 330 (< 340)
        assert_eq!(cols[0].len(), 34);
        assert_eq!(cols[0].last().unwrap().y, 330.0);
    }

    #[test]
    fn lens_pulls_vertices_inward_in_band_only() {
        let center = DVec2::new(400.0, 300.0);
        // d = 100 -> pulled 32 px toward center
        let v = lens(DVec2::new(500.0, 300.0), center);
        assert!((v.x - 468.0).abs() < 1e-9);
        assert_eq!(v.y, 300.0);
        // inside horizon and beyond 300 untouched
        assert_eq!(lens(DVec2::new(410.0, 300.0), center), DVec2::new(410.0, 300.0));
        assert_eq!(lens(DVec2::new(750.0, 300.0), center), DVec2::new(750.0, 300.0));
    }

    #[test]
    fn grid_lenses_only_with_event_horizon() {
        let size = DVec2::new(800.0, 600.0);
        let flat = grid_columns(size, false);
        let lensed = grid_columns(size, true);
        assert_eq!(flat.len(), lensed.len());
        assert_ne!(flat, lensed);

        let mut s = RecordingSurface::new(800, 600);
        let state = FieldState::default().with_anomaly(Anomaly::EventHorizon);
        draw_grid(&mut s, size, &state, &RenderMode::default());
        assert_eq!(s.count("stroke_path"), lensed.len());
        match &s.commands()[0] {
            DrawCommand::StrokePath { stroke, .. } => assert_eq!(stroke.color.a, 0.05),
            other => panic!("expected stroke_path, got: {other:?}"),
        }
    }
}
