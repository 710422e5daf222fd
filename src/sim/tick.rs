//! Per-frame scene update
//!
//! The external driver calls `tick` once per frame before drawing.

use super::collision::{ball_segment_collision, bounce_off_bounds, resolve_collision};
use super::state::{BounceScene, SegmentHit};
use crate::events::Event;
use crate::geom::Vector2;

/// Input collected since the previous frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Current mouse position (drives the tracked segment's `pt2`)
    pub mouse: Option<Vector2>,
    /// Spawn a ball here (click)
    pub spawn_at: Option<Vector2>,
    /// Pause toggle
    pub pause: bool,
    /// Remove every ball
    pub clear_balls: bool,
}

/// Advance the scene by one frame
pub fn tick(scene: &mut BounceScene, input: &TickInput) {
    if input.pause {
        scene.paused = !scene.paused;
        log::info!("Scene {}", if scene.paused { "paused" } else { "resumed" });
    }

    if input.clear_balls {
        scene.balls.clear();
    }

    // The tracked segment follows the mouse even while paused
    if let (Some(mouse), Some(index)) = (input.mouse, scene.tracked_segment) {
        if let Some(segment) = scene.segments.get_mut(index) {
            if segment.pt2 != mouse {
                segment.pt2 = mouse;
                scene.events.publish(&Event::SegmentMoved { index, pt2: mouse });
            }
        }
    }

    if let Some(pos) = input.spawn_at {
        scene.spawn_ball_at(pos);
    }

    if scene.paused {
        return;
    }

    scene.last_hits.clear();
    let width = scene.settings.canvas_width;
    let height = scene.settings.canvas_height;
    let tolerance = scene.settings.endpoint_tolerance;

    for ball in &mut scene.balls {
        ball.step();
        bounce_off_bounds(ball, width, height);

        for (segment_index, segment) in scene.segments.iter().enumerate() {
            let result = ball_segment_collision(ball.pos, ball.vel, ball.radius, segment, tolerance);
            if !result.hit {
                continue;
            }

            let incoming = ball.vel;
            match resolve_collision(ball, &result) {
                Ok(true) => {
                    log::debug!(
                        "Frame {}: ball {} hit segment {} ({:?}) at ({:.1}, {:.1})",
                        scene.frame,
                        ball.id,
                        segment_index,
                        result.kind,
                        result.point.x,
                        result.point.y
                    );
                    scene.last_hits.push(SegmentHit {
                        ball_id: ball.id,
                        segment_index,
                        result,
                        incoming,
                        outgoing: ball.vel,
                    });
                }
                Ok(false) => {}
                Err(e) => log::warn!("Ball {} reflection skipped: {}", ball.id, e),
            }
        }
    }

    for hit in &scene.last_hits {
        scene.events.publish(&Event::Collision {
            ball_id: hit.ball_id,
            segment_index: hit.segment_index,
            point: hit.result.point,
            kind: hit.result.kind,
        });
    }

    scene.frame += 1;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;
    use crate::geom::LineSegment;
    use crate::settings::SketchSettings;
    use crate::sim::collision::{ContactKind, Endpoint};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn empty_scene() -> BounceScene {
        BounceScene::new(SketchSettings {
            ball_count: 0,
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_ball_bounces_off_segment() {
        let mut scene = empty_scene();
        scene.add_segment(LineSegment::from_coords(100.0, 300.0, 500.0, 300.0));
        scene.spawn_ball_at(Vector2::new(300.0, 280.0));
        scene.balls[0].vel = Vector2::new(1.0, 2.0);

        let hits = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&hits);
        let _sub = scene
            .events
            .subscribe(EventKind::Collision, move |_| *sink.borrow_mut() += 1);

        // Frame 1: center at y=282, 2 px inside the 20 px radius
        tick(&mut scene, &TickInput::default());
        assert_eq!(scene.last_hits.len(), 1);
        assert_eq!(scene.last_hits[0].result.kind, ContactKind::Interior);
        assert!((scene.balls[0].vel - Vector2::new(1.0, -2.0)).length() < 1e-9);
        assert!((scene.balls[0].pos.y - 280.0).abs() < 1e-9);
        assert_eq!(*hits.borrow(), 1);

        // Frame 2: moving away, no new hit
        tick(&mut scene, &TickInput::default());
        assert!(scene.last_hits.is_empty());
        assert_eq!(scene.frame, 2);
    }

    #[test]
    fn test_ball_bounces_off_endpoint() {
        let mut scene = empty_scene();
        scene.add_segment(LineSegment::from_coords(100.0, 300.0, 500.0, 300.0));
        // Heading straight down, 12 px left of the left end
        scene.spawn_ball_at(Vector2::new(88.0, 284.0));
        scene.balls[0].vel = Vector2::new(0.0, 2.0);

        tick(&mut scene, &TickInput::default());
        assert_eq!(scene.last_hits.len(), 1);
        assert_eq!(
            scene.last_hits[0].result.kind,
            ContactKind::Endpoint(Endpoint::Pt1)
        );
        // Deflected up and to the left, not straight back up
        let vel = scene.balls[0].vel;
        assert!(vel.x < 0.0 && vel.y < 0.0);
        assert!((vel.length() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_mouse_tracks_segment() {
        let mut scene = empty_scene();
        let index = scene.add_segment(LineSegment::from_coords(0.0, 0.0, 10.0, 0.0));
        scene.track_mouse_with(index);

        let moved = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&moved);
        let _sub = scene.events.subscribe(EventKind::SegmentMoved, move |e| {
            sink.borrow_mut().push(e.clone());
        });

        let input = TickInput {
            mouse: Some(Vector2::new(40.0, 30.0)),
            ..Default::default()
        };
        tick(&mut scene, &input);
        tick(&mut scene, &input);
        assert_eq!(scene.segments[index].pt2, Vector2::new(40.0, 30.0));
        assert_eq!(scene.segments[index].pt1, Vector2::ZERO);
        // Published once: the second frame did not move it
        assert_eq!(moved.borrow().len(), 1);
    }

    #[test]
    fn test_pause_spawn_and_clear() {
        let mut scene = empty_scene();
        scene.spawn_ball_at(Vector2::new(100.0, 100.0));
        scene.balls[0].vel = Vector2::new(3.0, 0.0);

        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut scene, &pause);
        assert!(scene.paused);
        assert_eq!(scene.balls[0].pos, Vector2::new(100.0, 100.0));
        assert_eq!(scene.frame, 0);

        tick(&mut scene, &pause);
        assert!(!scene.paused);
        assert_eq!(scene.balls[0].pos, Vector2::new(103.0, 100.0));

        let spawn = TickInput {
            spawn_at: Some(Vector2::new(50.0, 50.0)),
            ..Default::default()
        };
        tick(&mut scene, &spawn);
        assert_eq!(scene.balls.len(), 2);

        let clear = TickInput {
            clear_balls: true,
            ..Default::default()
        };
        tick(&mut scene, &clear);
        assert!(scene.balls.is_empty());
    }

    #[test]
    fn test_many_balls_stay_in_bounds() {
        let mut scene = BounceScene::new(SketchSettings {
            ball_count: 25,
            seed: 99999,
            ..Default::default()
        })
        .unwrap();
        scene.add_segment(LineSegment::from_coords(100.0, 100.0, 400.0, 350.0));
        scene.add_segment(LineSegment::from_coords(500.0, 80.0, 520.0, 400.0));

        for _ in 0..2000 {
            tick(&mut scene, &TickInput::default());
        }

        let (w, h) = (scene.settings.canvas_width, scene.settings.canvas_height);
        for ball in &scene.balls {
            assert!(ball.pos.is_finite() && ball.vel.is_finite());
            assert!(ball.pos.x >= 0.0 && ball.pos.x <= w);
            assert!(ball.pos.y >= 0.0 && ball.pos.y <= h);
        }
    }
}
