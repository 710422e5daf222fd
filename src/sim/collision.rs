//! Collision detection and response for circles against line segments
//!
//! The tricky part of the bouncing-ball sketches: a ball that touches a segment
//! near one of its endpoints must bounce off the endpoint as a point (normal from
//! the endpoint to the ball center), not off the segment's plane. Using the plane
//! normal there makes balls stick to or tunnel through segment corners.

use super::state::Ball;
use crate::error::GeometryError;
use crate::geom::{LineSegment, Vector2, vector};

/// Which end of a segment was hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Pt1,
    Pt2,
}

impl Endpoint {
    pub fn of(self, segment: &LineSegment) -> Vector2 {
        match self {
            Endpoint::Pt1 => segment.pt1,
            Endpoint::Pt2 => segment.pt2,
        }
    }
}

/// Where on the segment the contact happened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactKind {
    /// Planar contact, normal is the segment normal
    Interior,
    /// Point contact, normal runs from the endpoint to the ball center
    Endpoint(Endpoint),
}

/// Result of a collision check
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Contact point on the segment (if hit)
    pub point: Vector2,
    /// Unit surface normal pointing toward the ball center, for reflection
    pub normal: Vector2,
    /// Penetration depth (for position correction)
    pub penetration: f64,
    pub kind: ContactKind,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            point: Vector2::ZERO,
            normal: Vector2::ZERO,
            penetration: 0.0,
            kind: ContactKind::Interior,
        }
    }
}

/// Nearest endpoint to `point`, if it is closer than `tolerance`
fn endpoint_near(segment: &LineSegment, point: Vector2, tolerance: f64) -> Option<Endpoint> {
    let d1 = point.distance(segment.pt1);
    let d2 = point.distance(segment.pt2);
    let (which, dist) = if d1 <= d2 {
        (Endpoint::Pt1, d1)
    } else {
        (Endpoint::Pt2, d2)
    };
    (dist < tolerance).then_some(which)
}

/// Unit normal of the segment opposing `velocity` (the side the ball comes from)
fn normal_opposing(segment: &LineSegment, velocity: Vector2) -> Result<Vector2, GeometryError> {
    let [a, b] = segment.unit_normals()?;
    Ok(if a.dot(velocity) <= 0.0 { a } else { b })
}

/// Check collision between a moving ball and a line segment
///
/// `endpoint_tolerance` decides between the two reflection rules: contact points
/// closer than this to an endpoint use the endpoint-to-center normal.
pub fn ball_segment_collision(
    ball_pos: Vector2,
    ball_vel: Vector2,
    ball_radius: f64,
    segment: &LineSegment,
    endpoint_tolerance: f64,
) -> CollisionResult {
    let closest = segment.orthogonal_projection(ball_pos);
    let offset = ball_pos - closest;
    let dist = offset.length();

    if dist > ball_radius {
        return CollisionResult::miss();
    }
    let penetration = ball_radius - dist;

    if let Some(which) = endpoint_near(segment, closest, endpoint_tolerance) {
        let endpoint = which.of(segment);
        let normal = vector::normalize(ball_pos - endpoint)
            // Center exactly on the endpoint: push back along the incoming path
            .or_else(|_| vector::normalize(-ball_vel))
            .or_else(|_| segment.normal_facing(ball_pos));
        return match normal {
            Ok(normal) => CollisionResult {
                hit: true,
                point: endpoint,
                normal,
                penetration,
                kind: ContactKind::Endpoint(which),
            },
            Err(_) => CollisionResult::miss(),
        };
    }

    let normal = if vector::is_zero(offset) {
        // Center on the line itself
        normal_opposing(segment, ball_vel)
    } else {
        segment.normal_facing(ball_pos)
    };

    match normal {
        Ok(normal) => CollisionResult {
            hit: true,
            point: closest,
            normal,
            penetration,
            kind: ContactKind::Interior,
        },
        Err(_) => CollisionResult::miss(),
    }
}

/// Reflect the ball off a collision result and push it out of the segment
///
/// Returns `true` if the velocity was reflected. A ball already moving away from
/// the surface is left alone so it cannot get stuck re-reflecting.
pub fn resolve_collision(ball: &mut Ball, result: &CollisionResult) -> Result<bool, GeometryError> {
    if !result.hit || ball.vel.dot(result.normal) >= 0.0 {
        return Ok(false);
    }
    ball.vel = vector::reflect(ball.vel, result.normal)?;
    ball.pos += result.normal * result.penetration;
    Ok(true)
}

/// Where and when a moving ball will first touch a segment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PredictedCollision {
    /// Time until contact, in frames (velocity units)
    pub time: f64,
    /// Ball center at the moment of contact
    pub ball_center: Vector2,
    /// Contact point on the segment
    pub point: Vector2,
    pub kind: ContactKind,
}

/// Predict the expected collision of a ball travelling along `ball_vel`
///
/// Considers the segment interior (the line offset by the radius toward the ball)
/// and both endpoints (circle/point contact); returns the earliest contact at
/// `time >= 0`, or `None` if the ball never touches the segment.
pub fn predict_collision(
    ball_pos: Vector2,
    ball_vel: Vector2,
    ball_radius: f64,
    segment: &LineSegment,
) -> Option<PredictedCollision> {
    if vector::is_zero(ball_vel) {
        return None;
    }

    let mut best: Option<PredictedCollision> = None;
    let mut consider = |candidate: PredictedCollision| {
        if best.is_none_or(|b| candidate.time < b.time) {
            best = Some(candidate);
        }
    };

    // Interior: first time the center reaches distance `radius` from the line
    if let Ok(normal) = segment.normal_facing(ball_pos) {
        let start_dist = (ball_pos - segment.pt1).dot(normal);
        let approach_speed = -ball_vel.dot(normal);
        if approach_speed > 0.0 {
            let time = ((start_dist - ball_radius) / approach_speed).max(0.0);
            let ball_center = ball_pos + ball_vel * time;
            let point = ball_center - normal * (start_dist - approach_speed * time).min(ball_radius);
            let length = segment.magnitude();
            let along = (point - segment.pt1).dot(segment.direction() / length);
            if (0.0..=length).contains(&along) {
                consider(PredictedCollision {
                    time,
                    ball_center,
                    point,
                    kind: ContactKind::Interior,
                });
            }
        }
    }

    // Endpoints: |pos + vel*t - endpoint| = radius
    for which in [Endpoint::Pt1, Endpoint::Pt2] {
        let endpoint = which.of(segment);
        let rel = ball_pos - endpoint;
        let a = ball_vel.length_squared();
        let b = 2.0 * ball_vel.dot(rel);
        let c = rel.length_squared() - ball_radius * ball_radius;

        let time = if c <= 0.0 {
            // Already touching: only counts if still moving inward
            if b < 0.0 { 0.0 } else { continue }
        } else {
            let disc = b * b - 4.0 * a * c;
            if disc < 0.0 {
                continue;
            }
            let t = (-b - disc.sqrt()) / (2.0 * a);
            if t < 0.0 {
                continue;
            }
            t
        };

        consider(PredictedCollision {
            time,
            ball_center: ball_pos + ball_vel * time,
            point: endpoint,
            kind: ContactKind::Endpoint(which),
        });
    }

    best
}

/// Bounce a ball off the canvas edges
///
/// Returns `true` if any edge was hit.
pub fn bounce_off_bounds(ball: &mut Ball, width: f64, height: f64) -> bool {
    let mut bounced = false;
    let r = ball.radius;

    if ball.pos.x - r < 0.0 {
        ball.pos.x = r;
        ball.vel.x = ball.vel.x.abs();
        bounced = true;
    } else if ball.pos.x + r > width {
        ball.pos.x = width - r;
        ball.vel.x = -ball.vel.x.abs();
        bounced = true;
    }

    if ball.pos.y - r < 0.0 {
        ball.pos.y = r;
        ball.vel.y = ball.vel.y.abs();
        bounced = true;
    } else if ball.pos.y + r > height {
        ball.pos.y = height - r;
        ball.vel.y = -ball.vel.y.abs();
        bounced = true;
    }

    bounced
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::ENDPOINT_TOLERANCE;

    const EPS: f64 = 1e-9;

    fn floor() -> LineSegment {
        LineSegment::from_coords(0.0, 100.0, 200.0, 100.0)
    }

    fn ball_at(pos: Vector2, vel: Vector2) -> Ball {
        let mut ball = Ball::new(1, pos, 10.0);
        ball.vel = vel;
        ball
    }

    #[test]
    fn test_interior_hit_uses_segment_normal() {
        // Ball above the floor (y-down), overlapping by 2 px
        let result = ball_segment_collision(
            Vector2::new(100.0, 92.0),
            Vector2::new(1.0, 1.0),
            10.0,
            &floor(),
            ENDPOINT_TOLERANCE,
        );
        assert!(result.hit);
        assert_eq!(result.kind, ContactKind::Interior);
        assert!((result.normal - Vector2::new(0.0, -1.0)).length() < EPS);
        assert!((result.point - Vector2::new(100.0, 100.0)).length() < EPS);
        assert!((result.penetration - 2.0).abs() < EPS);
    }

    #[test]
    fn test_miss() {
        let result = ball_segment_collision(
            Vector2::new(100.0, 50.0),
            Vector2::new(0.0, 1.0),
            10.0,
            &floor(),
            ENDPOINT_TOLERANCE,
        );
        assert!(!result.hit);
    }

    #[test]
    fn test_endpoint_hit_uses_point_normal() {
        // Ball up and to the left of pt1 at (0, 100)
        let pos = Vector2::new(-5.0, 93.0);
        let result = ball_segment_collision(pos, Vector2::new(1.0, 1.0), 10.0, &floor(), ENDPOINT_TOLERANCE);
        assert!(result.hit);
        assert_eq!(result.kind, ContactKind::Endpoint(Endpoint::Pt1));
        assert_eq!(result.point, Vector2::new(0.0, 100.0));
        let expected = (pos - Vector2::new(0.0, 100.0)).normalize();
        assert!((result.normal - expected).length() < EPS);
        // Not the planar normal
        assert!((result.normal - Vector2::new(0.0, -1.0)).length() > 0.1);
    }

    #[test]
    fn test_endpoint_tolerance_is_tunable() {
        // Contact point 3 px inside the segment end
        let pos = Vector2::new(3.0, 92.0);
        let default = ball_segment_collision(pos, Vector2::Y, 10.0, &floor(), ENDPOINT_TOLERANCE);
        assert_eq!(default.kind, ContactKind::Interior);

        let wide = ball_segment_collision(pos, Vector2::Y, 10.0, &floor(), 5.0);
        assert_eq!(wide.kind, ContactKind::Endpoint(Endpoint::Pt1));
    }

    #[test]
    fn test_center_on_line_opposes_velocity() {
        let result = ball_segment_collision(
            Vector2::new(100.0, 100.0),
            Vector2::new(0.0, -3.0),
            10.0,
            &floor(),
            ENDPOINT_TOLERANCE,
        );
        assert!(result.hit);
        assert!(result.normal.dot(Vector2::new(0.0, -3.0)) < 0.0);
    }

    #[test]
    fn test_degenerate_segment_acts_as_point() {
        let dot = LineSegment::from_coords(50.0, 50.0, 50.0, 50.0);
        let result = ball_segment_collision(
            Vector2::new(55.0, 50.0),
            Vector2::new(-1.0, 0.0),
            10.0,
            &dot,
            ENDPOINT_TOLERANCE,
        );
        assert!(result.hit);
        assert!(matches!(result.kind, ContactKind::Endpoint(_)));
        assert!((result.normal - Vector2::X).length() < EPS);
    }

    #[test]
    fn test_resolve_reflects_and_separates() {
        let mut ball = ball_at(Vector2::new(100.0, 92.0), Vector2::new(1.0, 1.0));
        let result = ball_segment_collision(ball.pos, ball.vel, ball.radius, &floor(), ENDPOINT_TOLERANCE);
        assert!(resolve_collision(&mut ball, &result).unwrap());
        assert!((ball.vel - Vector2::new(1.0, -1.0)).length() < EPS);
        assert!((ball.pos.y - 90.0).abs() < EPS);

        // Moving away: no second reflection
        let result = ball_segment_collision(
            Vector2::new(100.0, 92.0),
            ball.vel,
            ball.radius,
            &floor(),
            ENDPOINT_TOLERANCE,
        );
        assert!(!resolve_collision(&mut ball, &result).unwrap());
        assert!(!resolve_collision(&mut ball, &CollisionResult::miss()).unwrap());
    }

    #[test]
    fn test_predict_interior() {
        let prediction =
            predict_collision(Vector2::new(50.0, 40.0), Vector2::new(1.0, 2.0), 10.0, &floor()).unwrap();
        // Center must travel from y=40 to y=90 at 2 px/frame
        assert!((prediction.time - 25.0).abs() < EPS);
        assert!((prediction.ball_center - Vector2::new(75.0, 90.0)).length() < EPS);
        assert!((prediction.point - Vector2::new(75.0, 100.0)).length() < EPS);
        assert_eq!(prediction.kind, ContactKind::Interior);
    }

    #[test]
    fn test_predict_endpoint() {
        // Travelling straight down just past the left end
        let prediction =
            predict_collision(Vector2::new(-6.0, 0.0), Vector2::new(0.0, 1.0), 10.0, &floor()).unwrap();
        assert_eq!(prediction.kind, ContactKind::Endpoint(Endpoint::Pt1));
        // Touches when the center is 8 px above the endpoint (6-8-10 triangle)
        assert!((prediction.time - 92.0).abs() < EPS);
        assert_eq!(prediction.point, Vector2::new(0.0, 100.0));
    }

    #[test]
    fn test_predict_none() {
        // Moving away
        assert!(predict_collision(Vector2::new(50.0, 40.0), Vector2::new(0.0, -1.0), 10.0, &floor()).is_none());
        // Passing wide of the segment
        assert!(predict_collision(Vector2::new(-50.0, 0.0), Vector2::new(0.0, 1.0), 10.0, &floor()).is_none());
        // Not moving
        assert!(predict_collision(Vector2::new(50.0, 95.0), Vector2::ZERO, 10.0, &floor()).is_none());
    }

    #[test]
    fn test_bounce_off_bounds() {
        let mut ball = ball_at(Vector2::new(5.0, 50.0), Vector2::new(-2.0, 1.0));
        assert!(bounce_off_bounds(&mut ball, 100.0, 100.0));
        assert_eq!(ball.pos.x, 10.0);
        assert_eq!(ball.vel, Vector2::new(2.0, 1.0));

        let mut ball = ball_at(Vector2::new(50.0, 95.0), Vector2::new(0.0, 3.0));
        assert!(bounce_off_bounds(&mut ball, 100.0, 100.0));
        assert_eq!(ball.pos.y, 90.0);
        assert_eq!(ball.vel.y, -3.0);

        let mut ball = ball_at(Vector2::new(50.0, 50.0), Vector2::ONE);
        assert!(!bounce_off_bounds(&mut ball, 100.0, 100.0));
    }
}
