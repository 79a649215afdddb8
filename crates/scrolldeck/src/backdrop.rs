//! Decorative particle field painted behind the slides. Strictly
//! one-way: it consumes viewport size and pointer position and emits
//! pixels; navigation state never flows through here.

use eframe::egui;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::theme::Theme;

/// One point per this many square pixels of viewport.
const DENSITY_AREA: f32 = 38_000.0;
const MIN_POINTS: usize = 26;
const MAX_POINTS: usize = 64;

/// Drift speed per axis, in pixels per frame, centered on zero.
const DRIFT: f32 = 0.25;

const RADIUS_MIN: f32 = 1.0;
const RADIUS_SPREAD: f32 = 1.6;

/// Pairs closer than this get a connecting line, fading with distance.
const LINK_DISTANCE: f32 = 180.0;

/// Pointer parallax: offset from viewport center, scaled by factor and
/// swing, nudges every point each frame.
const PARALLAX_FACTOR: f32 = 0.000_06;
const PARALLAX_SWING: f32 = 22.0;

/// Points wrap to the opposite edge once this far outside.
const WRAP_MARGIN: f32 = 40.0;

const POINT_ALPHA: f32 = 0.18;
const LINK_ALPHA: f32 = 0.10;
const VIGNETTE_ALPHA: f32 = 0.06;

fn point_count(area: f32) -> usize {
    ((area / DENSITY_AREA) as usize).clamp(MIN_POINTS, MAX_POINTS)
}

struct Point {
    pos: egui::Pos2,
    vel: egui::Vec2,
    radius: f32,
}

pub struct Backdrop {
    points: Vec<Point>,
    size: egui::Vec2,
    rng: SmallRng,
}

impl Backdrop {
    pub fn new() -> Self {
        Self {
            points: Vec::new(),
            size: egui::Vec2::ZERO,
            rng: SmallRng::from_os_rng(),
        }
    }

    /// Advance one frame and paint into `rect`. `pointer` is the last
    /// known cursor position for the parallax nudge.
    pub fn paint(
        &mut self,
        painter: &egui::Painter,
        rect: egui::Rect,
        pointer: Option<egui::Pos2>,
        theme: &Theme,
    ) {
        if (rect.size() - self.size).length() > 1.0 || self.points.is_empty() {
            self.reseed(rect);
        }

        self.vignette(painter, rect, theme);

        let parallax = match pointer {
            Some(p) => (p - rect.center()) * PARALLAX_FACTOR * PARALLAX_SWING,
            None => egui::Vec2::ZERO,
        };

        for point in &mut self.points {
            point.pos += point.vel + parallax;

            if point.pos.x < rect.left() - WRAP_MARGIN {
                point.pos.x = rect.right() + WRAP_MARGIN;
            }
            if point.pos.x > rect.right() + WRAP_MARGIN {
                point.pos.x = rect.left() - WRAP_MARGIN;
            }
            if point.pos.y < rect.top() - WRAP_MARGIN {
                point.pos.y = rect.bottom() + WRAP_MARGIN;
            }
            if point.pos.y > rect.bottom() + WRAP_MARGIN {
                point.pos.y = rect.top() - WRAP_MARGIN;
            }
        }

        for i in 0..self.points.len() {
            for j in (i + 1)..self.points.len() {
                let a = self.points[i].pos;
                let b = self.points[j].pos;
                let d2 = a.distance_sq(b);
                if d2 < LINK_DISTANCE * LINK_DISTANCE {
                    let alpha = (1.0 - d2.sqrt() / LINK_DISTANCE) * LINK_ALPHA;
                    painter.line_segment(
                        [a, b],
                        egui::Stroke::new(1.0, Theme::with_opacity(theme.accent, alpha)),
                    );
                }
            }
        }

        for point in &self.points {
            painter.circle_filled(
                point.pos,
                point.radius,
                Theme::with_opacity(theme.particle, POINT_ALPHA),
            );
        }
    }

    fn reseed(&mut self, rect: egui::Rect) {
        self.size = rect.size();
        let count = point_count(rect.area());
        let rng = &mut self.rng;
        self.points = (0..count)
            .map(|_| Point {
                pos: egui::pos2(
                    rect.left() + rng.random::<f32>() * rect.width(),
                    rect.top() + rng.random::<f32>() * rect.height(),
                ),
                vel: egui::vec2(
                    (rng.random::<f32>() - 0.5) * DRIFT,
                    (rng.random::<f32>() - 0.5) * DRIFT,
                ),
                radius: RADIUS_MIN + rng.random::<f32>() * RADIUS_SPREAD,
            })
            .collect();
    }

    /// Soft radial glow centered above the middle of the viewport,
    /// drawn as a triangle fan from tinted center to transparent rim.
    fn vignette(&self, painter: &egui::Painter, rect: egui::Rect, theme: &Theme) {
        let center = egui::pos2(rect.center().x, rect.top() + rect.height() * 0.35);
        let radius = rect.width().max(rect.height()) * 0.75;
        let inner = Theme::with_opacity(theme.accent, VIGNETTE_ALPHA);
        let outer = Theme::with_opacity(theme.accent, 0.0);

        let mut mesh = egui::Mesh::default();
        mesh.colored_vertex(center, inner);
        let segments: u32 = 48;
        for i in 0..=segments {
            let angle = i as f32 / segments as f32 * std::f32::consts::TAU;
            mesh.colored_vertex(center + egui::vec2(angle.cos(), angle.sin()) * radius, outer);
        }
        for i in 0..segments {
            mesh.add_triangle(0, i + 1, i + 2);
        }
        painter.add(egui::Shape::mesh(mesh));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_count_scales_with_area() {
        assert_eq!(point_count(100.0), MIN_POINTS);
        assert_eq!(point_count(1920.0 * 1080.0), 54);
        assert_eq!(point_count(3840.0 * 2160.0), MAX_POINTS);
    }
}
