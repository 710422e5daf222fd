//! Scene state for the bouncing-ball sketches
//!
//! Everything a sketch used to keep in module-level globals lives in one
//! `BounceScene`: created at setup, mutated by `tick` and input handlers each
//! frame, dropped when the sketch unloads.

use std::f64::consts::TAU;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::collision::{CollisionResult, PredictedCollision, predict_collision};
use crate::consts::ANGLE_ARC_RADIUS;
use crate::error::GeometryError;
use crate::events::EventBus;
use crate::geom::{AngleArc, LineSegment, SegmentStyle, Vector2};
use crate::renderer::{Canvas, Color, Stroke, colors};
use crate::settings::SketchSettings;

/// A ball entity
#[derive(Debug, Clone, PartialEq)]
pub struct Ball {
    pub id: u32,
    pub pos: Vector2,
    /// Velocity in pixels per frame
    pub vel: Vector2,
    pub radius: f64,
    pub fill: Color,
}

impl Ball {
    pub fn new(id: u32, pos: Vector2, radius: f64) -> Self {
        Self {
            id,
            pos,
            vel: Vector2::ZERO,
            radius,
            fill: colors::BALL,
        }
    }

    /// Ball at a random position inside the canvas with a random heading
    pub fn random(id: u32, rng: &mut Pcg32, settings: &SketchSettings) -> Self {
        let r = settings.ball_radius;
        let coord = |rng: &mut Pcg32, extent: f64| {
            if extent > 2.0 * r {
                rng.random_range(r..extent - r)
            } else {
                extent / 2.0
            }
        };
        let x = coord(rng, settings.canvas_width);
        let y = coord(rng, settings.canvas_height);

        let speed = rng.random_range(settings.ball_min_speed..=settings.ball_max_speed);
        let heading = rng.random_range(0.0..TAU);

        let mut ball = Self::new(id, Vector2::new(x, y), r);
        ball.vel = Vector2::from_angle(heading) * speed;
        ball
    }

    /// Advance one frame
    pub fn step(&mut self) {
        self.pos += self.vel;
    }

    pub fn draw(&self, canvas: &mut impl Canvas) {
        canvas.circle(self.pos, self.radius, Some(self.fill), None);
    }
}

/// A ball/segment reflection that happened during the last frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentHit {
    pub ball_id: u32,
    pub segment_index: usize,
    pub result: CollisionResult,
    /// Velocity before the reflection
    pub incoming: Vector2,
    /// Velocity after the reflection
    pub outgoing: Vector2,
}

/// Complete sketch state for one bouncing-ball scene
#[derive(Debug)]
pub struct BounceScene {
    pub settings: SketchSettings,
    pub balls: Vec<Ball>,
    pub segments: Vec<LineSegment>,
    /// Segment whose `pt2` follows the mouse
    pub tracked_segment: Option<usize>,
    /// Reflections from the most recent frame
    pub last_hits: Vec<SegmentHit>,
    pub paused: bool,
    /// Frame counter
    pub frame: u64,
    pub events: EventBus,
    rng: Pcg32,
    next_id: u32,
}

impl BounceScene {
    /// Create a scene and spawn `settings.ball_count` balls
    pub fn new(settings: SketchSettings) -> Result<Self, GeometryError> {
        settings.validate()?;

        let mut scene = Self {
            rng: Pcg32::seed_from_u64(settings.seed),
            settings,
            balls: Vec::new(),
            segments: Vec::new(),
            tracked_segment: None,
            last_hits: Vec::new(),
            paused: false,
            frame: 0,
            events: EventBus::new(),
            next_id: 1,
        };

        for _ in 0..scene.settings.ball_count {
            scene.spawn_ball();
        }
        log::info!(
            "Scene {}x{} created with {} balls (seed {})",
            scene.settings.canvas_width,
            scene.settings.canvas_height,
            scene.balls.len(),
            scene.settings.seed
        );

        Ok(scene)
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Spawn a ball at a random position and heading
    pub fn spawn_ball(&mut self) -> u32 {
        let id = self.next_entity_id();
        let ball = Ball::random(id, &mut self.rng, &self.settings);
        self.balls.push(ball);
        id
    }

    /// Spawn a ball at `pos` with a random heading
    pub fn spawn_ball_at(&mut self, pos: Vector2) -> u32 {
        let id = self.spawn_ball();
        if let Some(ball) = self.balls.last_mut() {
            ball.pos = pos;
        }
        id
    }

    /// Add a segment, applying the overlay settings to its style
    pub fn add_segment(&mut self, mut segment: LineSegment) -> usize {
        segment.style = SegmentStyle {
            show_normals: self.settings.show_normals,
            show_heading_label: self.settings.show_labels,
            ..segment.style
        };
        self.segments.push(segment);
        self.segments.len() - 1
    }

    /// Make segment `index` follow the mouse (its `pt2` is rewritten each tick)
    pub fn track_mouse_with(&mut self, index: usize) {
        if index < self.segments.len() {
            self.tracked_segment = Some(index);
        } else {
            log::warn!("No segment {} to track (have {})", index, self.segments.len());
        }
    }

    /// Earliest expected collision for each ball, if any
    pub fn predictions(&self) -> Vec<(u32, usize, PredictedCollision)> {
        self.balls
            .iter()
            .filter_map(|ball| {
                self.segments
                    .iter()
                    .enumerate()
                    .filter_map(|(i, seg)| {
                        predict_collision(ball.pos, ball.vel, ball.radius, seg).map(|p| (ball.id, i, p))
                    })
                    .min_by(|a, b| a.2.time.total_cmp(&b.2.time))
            })
            .collect()
    }

    /// Emit the frame: segments, balls, then the enabled overlays
    pub fn draw(&self, canvas: &mut impl Canvas) {
        for segment in &self.segments {
            segment.draw(canvas);
        }
        for ball in &self.balls {
            ball.draw(canvas);
        }

        if self.settings.show_angle_arcs {
            let stroke = Stroke::solid(colors::ANGLE_ARC, 1.5);
            let label = self.settings.show_labels.then_some(colors::LABEL);
            for hit in &self.last_hits {
                match AngleArc::reflection_arcs(
                    hit.result.point,
                    hit.result.normal,
                    hit.incoming,
                    hit.outgoing,
                    ANGLE_ARC_RADIUS,
                ) {
                    Ok((incidence, reflection)) => {
                        incidence.draw(canvas, stroke, label);
                        reflection.draw(canvas, stroke, label);
                    }
                    Err(e) => log::debug!("Skipping angle arcs for ball {}: {}", hit.ball_id, e),
                }
            }
        }

        if self.settings.show_predictions {
            let stroke = Stroke::dashed(colors::PREDICTION, 1.0);
            for (_, _, prediction) in self.predictions() {
                canvas.circle(prediction.ball_center, self.settings.ball_radius, None, Some(stroke));
                canvas.circle(prediction.point, 3.0, Some(colors::PREDICTION), None);
            }
        }
    }
}
