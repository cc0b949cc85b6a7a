//! Per-frame growth of a segment and its tests against the scene.

use super::segment::{RaySegment, Termination};
use crate::config::CollisionMode;
use crate::math::{DVec2, EPSILON, Point};
use crate::scene::Scene;

/// Advances `segment` by one frame.
///
/// Terminated segments only age. Otherwise the length grows by `speed`, is
/// clamped at the right edge and at the sphere boundary, and the new endpoint
/// is tested against the particles. Returns the termination reason when the
/// segment stopped during this call.
pub fn advance(
    segment: &mut RaySegment,
    scene: &Scene,
    mode: CollisionMode,
) -> Option<Termination> {
    if segment.terminated {
        segment.age_since_termination += 1;
        return None;
    }

    let dir = segment.direction();
    let previous = segment.length;
    let mut candidate = previous + segment.speed;

    if let Some(t) = right_edge_distance(segment.start, dir, scene.width()) {
        let end_x = segment.start.x + candidate * dir.x;
        if end_x > scene.width() && t < candidate {
            // A segment starting past the edge stops where it is.
            candidate = t.max(previous);
            segment.terminate(Termination::LeftPlayfield);
        }
    }

    if let Some(t) = scene.sphere().next_crossing(segment.start, dir, previous) {
        if t > previous && t < candidate {
            candidate = t;
            segment.struck_sphere = true;
            segment.terminate(Termination::StruckSphere);
        }
    }

    segment.length = candidate;

    if !segment.terminated && !segment.collided && segment.can_scatter {
        let hit = match mode {
            CollisionMode::Discrete => {
                discrete_hit(segment.start + dir * candidate, scene, segment.ignored_particle)
            }
            CollisionMode::Swept => {
                swept_hit(segment.start, dir, previous, candidate, scene, segment.ignored_particle)
            }
        };

        if let Some(index) = hit {
            let particle = scene.particles()[index];
            segment.collided = true;
            segment.collision_point = Some(particle);
            segment.collision_particle = Some(index);
            segment.length = particle.distance(segment.start);
            segment.terminate(Termination::Collided);
        }
    }

    if segment.terminated {
        segment.termination
    } else {
        None
    }
}

/// Distance along the ray at which x reaches `width`.
///
/// `None` unless the ray heads right; a near-zero x component never reaches
/// the edge by this test.
fn right_edge_distance(start: Point, dir: DVec2, width: f64) -> Option<f64> {
    if dir.x > EPSILON {
        Some((width - start.x) / dir.x)
    } else {
        None
    }
}

/// First particle, in iteration order, whose disc contains `endpoint`.
fn discrete_hit(endpoint: Point, scene: &Scene, ignored: Option<usize>) -> Option<usize> {
    let radius = scene.particle_radius();
    scene
        .particles()
        .iter()
        .enumerate()
        .filter(|(index, _)| Some(*index) != ignored)
        .find(|(_, particle)| endpoint.distance(**particle) <= radius)
        .map(|(index, _)| index)
}

/// Particle whose disc the path `[from, to]` enters first.
///
/// Ties go to the particle earlier in iteration order.
fn swept_hit(
    start: Point,
    dir: DVec2,
    from: f64,
    to: f64,
    scene: &Scene,
    ignored: Option<usize>,
) -> Option<usize> {
    let radius_sq = scene.particle_radius() * scene.particle_radius();
    let mut best: Option<(usize, f64)> = None;

    for (index, particle) in scene.particles().iter().enumerate() {
        if Some(index) == ignored {
            continue;
        }

        let to_particle = *particle - start;
        let along = to_particle.dot(dir);
        let perp_sq = to_particle.length_squared() - along * along;
        if perp_sq > radius_sq {
            continue;
        }

        let half_chord = (radius_sq - perp_sq).max(0.0).sqrt();
        let entry = along - half_chord;
        let exit = along + half_chord;
        if exit < from || entry > to {
            continue;
        }

        let hit_at = entry.max(from);
        match best {
            Some((_, best_at)) if best_at <= hit_at => {}
            _ => best = Some((index, hit_at)),
        }
    }

    best.map(|(index, _)| index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ray::RayClass;
    use crate::scene::{Bounds, Sphere};

    const TOLERANCE: f64 = 1e-9;

    fn empty_scene(width: f64) -> Scene {
        Scene::with_particles(
            DVec2::new(0.0, 300.0),
            Sphere::new(DVec2::new(10_000.0, 10_000.0), 200.0),
            Vec::new(),
            10.0,
            Bounds::new(width, 600.0),
        )
    }

    fn run_until_terminated(segment: &mut RaySegment, scene: &Scene, mode: CollisionMode) {
        for _ in 0..10_000 {
            advance(segment, scene, mode);
            if segment.terminated {
                return;
            }
        }
        panic!("segment never terminated");
    }

    #[test]
    fn test_length_grows_by_speed() {
        let scene = empty_scene(1000.0);
        let mut seg = RaySegment::primary(scene.source(), 0.0, 5.0);
        let mut last = seg.length;
        for _ in 0..20 {
            advance(&mut seg, &scene, CollisionMode::Discrete);
            assert!(seg.length >= last);
            assert!((seg.length - last - 5.0).abs() < TOLERANCE);
            last = seg.length;
        }
    }

    #[test]
    fn test_right_edge_termination() {
        let scene = empty_scene(103.0);
        let mut seg = RaySegment::primary(scene.source(), 0.0, 5.0);
        run_until_terminated(&mut seg, &scene, CollisionMode::Discrete);

        assert_eq!(seg.termination, Some(Termination::LeftPlayfield));
        assert!(!seg.struck_sphere);
        assert!(!seg.collided);
        assert!((seg.length - 103.0).abs() < TOLERANCE);
        assert!((seg.endpoint(scene.width()).x - 103.0).abs() < TOLERANCE);
    }

    #[test]
    fn test_right_edge_termination_at_angle() {
        let scene = empty_scene(400.0);
        let mut seg = RaySegment::primary(scene.source(), 0.3, 5.0);
        run_until_terminated(&mut seg, &scene, CollisionMode::Discrete);

        assert_eq!(seg.termination, Some(Termination::LeftPlayfield));
        let end = seg.endpoint(scene.width());
        assert!((end.x - 400.0).abs() < 1e-6);
    }

    #[test]
    fn test_vertical_ray_never_divides_by_zero() {
        let scene = empty_scene(100.0);
        let start = DVec2::new(150.0, 0.0);
        let mut seg = RaySegment::primary(start, std::f64::consts::FRAC_PI_2, 5.0);
        for _ in 0..50 {
            advance(&mut seg, &scene, CollisionMode::Discrete);
        }
        assert!(!seg.terminated);
        assert!(seg.length.is_finite());
        assert!((seg.length - 250.0).abs() < TOLERANCE);
    }

    #[test]
    fn test_sphere_strike_lands_on_boundary() {
        let sphere = Sphere::new(DVec2::new(500.0, 300.0), 200.0);
        let scene = Scene::with_particles(
            DVec2::new(0.0, 300.0),
            sphere,
            Vec::new(),
            10.0,
            Bounds::new(1000.0, 600.0),
        );
        // Off-axis so the crossing point is not a multiple of the speed.
        let mut seg = RaySegment::primary(scene.source(), 0.17, 5.0);
        run_until_terminated(&mut seg, &scene, CollisionMode::Discrete);

        assert!(seg.struck_sphere);
        assert_eq!(seg.termination, Some(Termination::StruckSphere));
        let end = seg.endpoint(scene.width());
        assert!((end.distance(sphere.center) - sphere.radius).abs() < 1e-6);
    }

    #[test]
    fn test_particle_collision_snaps_to_particle() {
        let particle = DVec2::new(100.0, 300.0);
        let scene = Scene::with_particles(
            DVec2::new(0.0, 300.0),
            Sphere::new(DVec2::new(600.0, 300.0), 200.0),
            vec![particle],
            10.0,
            Bounds::new(1000.0, 600.0),
        );
        let mut seg = RaySegment::primary(scene.source(), 0.0, 5.0);
        run_until_terminated(&mut seg, &scene, CollisionMode::Discrete);

        assert!(seg.collided);
        assert_eq!(seg.collision_point, Some(particle));
        assert_eq!(seg.collision_particle, Some(0));
        assert!((seg.length - 100.0).abs() < TOLERANCE);
        assert!(seg.endpoint(scene.width()).distance(particle) <= scene.particle_radius());
        assert!(seg.needs_spawn());
    }

    #[test]
    fn test_first_particle_in_order_wins() {
        // Both discs first contain the endpoint at length 95.
        let scene = Scene::with_particles(
            DVec2::new(0.0, 300.0),
            Sphere::new(DVec2::new(600.0, 300.0), 200.0),
            vec![DVec2::new(100.0, 303.0), DVec2::new(101.0, 300.0)],
            10.0,
            Bounds::new(1000.0, 600.0),
        );
        let mut seg = RaySegment::primary(scene.source(), 0.0, 5.0);
        run_until_terminated(&mut seg, &scene, CollisionMode::Discrete);
        assert_eq!(seg.collision_particle, Some(0));
    }

    #[test]
    fn test_ignored_particle_is_skipped() {
        let scene = Scene::with_particles(
            DVec2::new(0.0, 300.0),
            Sphere::new(DVec2::new(10_000.0, 300.0), 200.0),
            vec![DVec2::new(0.0, 300.0)],
            10.0,
            Bounds::new(1000.0, 600.0),
        );
        let start = scene.source() + DVec2::new(5.0, 0.0);
        let mut seg = RaySegment::new(start, 0.0, RayClass::Scattered, 5.0, 1);
        seg.ignored_particle = Some(0);
        advance(&mut seg, &scene, CollisionMode::Discrete);
        assert!(!seg.collided);
        assert!(!seg.terminated);
    }

    #[test]
    fn test_absorbed_path_passes_through_particles() {
        let scene = Scene::with_particles(
            DVec2::new(0.0, 300.0),
            Sphere::new(DVec2::new(10_000.0, 300.0), 200.0),
            vec![DVec2::new(50.0, 300.0)],
            10.0,
            Bounds::new(200.0, 600.0),
        );
        let mut seg = RaySegment::new(scene.source(), 0.0, RayClass::AbsorbedPath, 5.0, 1);
        run_until_terminated(&mut seg, &scene, CollisionMode::Discrete);
        assert!(!seg.collided);
        assert_eq!(seg.termination, Some(Termination::LeftPlayfield));
    }

    #[test]
    fn test_terminated_segment_only_ages() {
        let scene = empty_scene(50.0);
        let mut seg = RaySegment::primary(scene.source(), 0.0, 5.0);
        run_until_terminated(&mut seg, &scene, CollisionMode::Discrete);
        let frozen = seg.clone();

        for i in 1..=5 {
            assert_eq!(advance(&mut seg, &scene, CollisionMode::Discrete), None);
            assert_eq!(seg.age_since_termination, i);
        }
        assert_eq!(seg.length, frozen.length);
        assert_eq!(seg.collided, frozen.collided);
        assert_eq!(seg.struck_sphere, frozen.struck_sphere);
    }

    #[test]
    fn test_advance_reports_termination_once() {
        let scene = empty_scene(12.0);
        let mut seg = RaySegment::primary(scene.source(), 0.0, 5.0);
        assert_eq!(advance(&mut seg, &scene, CollisionMode::Discrete), None);
        assert_eq!(advance(&mut seg, &scene, CollisionMode::Discrete), None);
        assert_eq!(
            advance(&mut seg, &scene, CollisionMode::Discrete),
            Some(Termination::LeftPlayfield)
        );
        assert_eq!(advance(&mut seg, &scene, CollisionMode::Discrete), None);
    }

    #[test]
    fn test_discrete_mode_tunnels_but_swept_does_not() {
        // Speed 30 jumps straight over a radius-10 particle centred at x = 45.
        let scene = Scene::with_particles(
            DVec2::new(0.0, 300.0),
            Sphere::new(DVec2::new(10_000.0, 300.0), 200.0),
            vec![DVec2::new(45.0, 300.0)],
            10.0,
            Bounds::new(1000.0, 600.0),
        );

        let mut discrete = RaySegment::primary(scene.source(), 0.0, 30.0);
        for _ in 0..3 {
            advance(&mut discrete, &scene, CollisionMode::Discrete);
        }
        assert!(!discrete.collided);

        let mut swept = RaySegment::primary(scene.source(), 0.0, 30.0);
        for _ in 0..3 {
            advance(&mut swept, &scene, CollisionMode::Swept);
        }
        assert!(swept.collided);
        assert_eq!(swept.collision_point, Some(DVec2::new(45.0, 300.0)));
        assert!((swept.length - 45.0).abs() < TOLERANCE);
    }

    #[test]
    fn test_swept_picks_nearest_entry() {
        let scene = Scene::with_particles(
            DVec2::new(0.0, 300.0),
            Sphere::new(DVec2::new(10_000.0, 300.0), 200.0),
            vec![DVec2::new(80.0, 300.0), DVec2::new(40.0, 300.0)],
            10.0,
            Bounds::new(1000.0, 600.0),
        );
        let mut seg = RaySegment::primary(scene.source(), 0.0, 100.0);
        advance(&mut seg, &scene, CollisionMode::Swept);
        assert_eq!(seg.collision_particle, Some(1));
    }
}
