use crate::config::{RetentionPolicy, SimulationDesc};
use crate::error::Result;
use crate::events::{FrameTimingEvent, SimulationEvent};
use crate::ray::{RaySegment, ScatterRules, SegmentId, Termination, advance, spawn};
use crate::scene::{Bounds, Scene};
use crate::wedge::{WedgeTally, sector_index};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;
use std::time::Instant;

/// Events kept for `poll_events`; older ones are dropped first
const MAX_PENDING_EVENTS: usize = 16_384;

/// Summary of one call to [`Simulation::step`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameReport {
    pub frame: u64,
    /// Segments that terminated during the step
    pub terminated: usize,
    /// Children appended after the update pass
    pub spawned: usize,
    /// Segments removed by the retention policy
    pub retired: usize,
    pub timing: FrameTimingEvent,
}

/// Owned state of a running scattering simulation.
///
/// `Simulation` replaces global state: it holds the immutable [`Scene`], the
/// active segment set, the RNG used for launching rays, the running wedge
/// tally and the pending events. Each [`step`](Self::step) is one animation
/// frame:
///
/// 1. every segment present at the start of the step is advanced, and
///    collided segments spawn their children into a side buffer;
/// 2. the side buffer is appended, so children first move on the next step;
/// 3. the retention policy retires old terminated segments;
/// 4. the wedge tally is recomputed from the live set plus the archive of
///    retired strikes.
pub struct Simulation {
    desc: SimulationDesc,
    rules: ScatterRules,
    scene: Scene,
    segments: Vec<RaySegment>,
    archived: WedgeTally,
    tally: WedgeTally,
    frame: u64,
    next_id: SegmentId,
    rng: StdRng,
    events: VecDeque<SimulationEvent>,
    last_timing: Option<FrameTimingEvent>,
}

impl Simulation {
    /// Generates a scene for `bounds` and launches the primary rays.
    pub fn new(desc: SimulationDesc, bounds: Bounds) -> Result<Self> {
        desc.validate()?;
        let mut rng = make_rng(desc.seed);
        let scene = Scene::generate(&desc, bounds, &mut rng)?;
        Ok(Self::assemble(desc, scene, rng))
    }

    /// Runs on a prepared scene instead of a generated one.
    pub fn with_scene(desc: SimulationDesc, scene: Scene) -> Result<Self> {
        desc.validate()?;
        let rng = make_rng(desc.seed);
        Ok(Self::assemble(desc, scene, rng))
    }

    fn assemble(desc: SimulationDesc, scene: Scene, rng: StdRng) -> Self {
        let mut simulation = Self {
            rules: ScatterRules::from_desc(&desc),
            desc,
            scene,
            segments: Vec::new(),
            archived: WedgeTally::new(),
            tally: WedgeTally::new(),
            frame: 0,
            next_id: 0,
            rng,
            events: VecDeque::new(),
            last_timing: None,
        };
        simulation.launch_primaries();
        simulation
    }

    /// Clears all segments and statistics and launches a fresh set of primary rays.
    ///
    /// The scene (particle layout) is kept.
    pub fn reset(&mut self) {
        self.segments.clear();
        self.archived = WedgeTally::new();
        self.tally = WedgeTally::new();
        self.frame = 0;
        self.last_timing = None;
        self.launch_primaries();
        self.push_event(SimulationEvent::SimulationReset {
            primaries: self.segments.len(),
        });
    }

    /// Places a new set of particles for `bounds`, then resets.
    pub fn regenerate(&mut self, bounds: Bounds) -> Result<()> {
        self.scene = Scene::generate(&self.desc, bounds, &mut self.rng)?;
        self.reset();
        Ok(())
    }

    fn launch_primaries(&mut self) {
        let source = self.scene.source();
        let cone = self.desc.launch_cone;
        let speed = self.desc.primary_speed;
        for _ in 0..self.desc.primary_ray_count {
            let angle = self.rng.gen_range(-cone..=cone);
            let primary = RaySegment::primary(source, angle, speed);
            self.admit(primary);
        }
        log::info!(
            "Launched {} primary rays from ({:.0}, {:.0})",
            self.desc.primary_ray_count,
            source.x,
            source.y
        );
    }

    /// Advances the simulation by one frame.
    pub fn step(&mut self) -> FrameReport {
        let started = Instant::now();
        self.frame += 1;

        let mut report = FrameReport {
            frame: self.frame,
            ..Default::default()
        };
        let mut spawned = Vec::new();
        let mode = self.desc.collision_mode;
        let width = self.scene.width();

        for segment in self.segments.iter_mut() {
            if let Some(reason) = advance(segment, &self.scene, mode) {
                report.terminated += 1;
                let event = match reason {
                    Termination::Collided => SimulationEvent::SegmentCollided {
                        segment: segment.id,
                        particle: segment.collision_particle.unwrap_or_default(),
                        generation: segment.generation,
                    },
                    Termination::StruckSphere => SimulationEvent::SphereStruck {
                        segment: segment.id,
                        class: segment.class,
                        sector: sector_index(self.scene.sphere().center, segment.endpoint(width)),
                    },
                    Termination::LeftPlayfield => SimulationEvent::LeftPlayfield { segment: segment.id },
                };
                push_bounded(&mut self.events, event);
            }

            if segment.needs_spawn() {
                let children = spawn(segment, &self.rules);
                segment.scatter_already_spawned = true;
                if !children.is_empty() {
                    log::debug!(
                        "Segment {} (generation {}) scattered into {} children",
                        segment.id,
                        segment.generation,
                        children.len()
                    );
                    push_bounded(
                        &mut self.events,
                        SimulationEvent::Spawned {
                            parent: segment.id,
                            count: children.len(),
                            generation: segment.generation + 1,
                        },
                    );
                }
                spawned.extend(children);
            }
        }

        report.spawned = spawned.len();
        for child in spawned {
            self.admit(child);
        }
        report.retired = self.retire();
        let update_time = started.elapsed();

        let tally_started = Instant::now();
        self.tally = self.archived + WedgeTally::compute(&self.segments, &self.scene);
        let tally_time = tally_started.elapsed();

        let timing = FrameTimingEvent {
            frame: self.frame,
            update_time_us: update_time.as_micros() as u64,
            tally_time_us: tally_time.as_micros() as u64,
            total_time_us: started.elapsed().as_micros() as u64,
            segment_count: self.segments.len(),
        };
        self.last_timing = Some(timing);
        report.timing = timing;

        if report.terminated > 0 || report.spawned > 0 || report.retired > 0 {
            log::debug!(
                "Frame {}: {} terminated, {} spawned, {} retired, {} segments",
                report.frame,
                report.terminated,
                report.spawned,
                report.retired,
                self.segments.len()
            );
        }

        report
    }

    /// Applies the retention policy; retired sphere strikes move to the archive.
    fn retire(&mut self) -> usize {
        let before = self.segments.len();
        let archived = &mut self.archived;
        let scene = &self.scene;

        match self.desc.retention {
            RetentionPolicy::KeepAll => return 0,
            RetentionPolicy::RetireAfter { frames } => {
                self.segments.retain(|segment| {
                    let expired = segment.terminated && segment.age_since_termination > frames;
                    if expired {
                        archived.record(segment, scene);
                    }
                    !expired
                });
            }
            RetentionPolicy::Cap { max_segments } => {
                let mut excess = self.segments.len().saturating_sub(max_segments);
                self.segments.retain(|segment| {
                    if excess > 0 && segment.terminated {
                        excess -= 1;
                        archived.record(segment, scene);
                        false
                    } else {
                        true
                    }
                });
            }
        }

        let retired = before - self.segments.len();
        if retired > 0 {
            push_bounded(&mut self.events, SimulationEvent::Retired { count: retired });
        }
        retired
    }

    /// Adds `segment` to the active set under a fresh id.
    fn admit(&mut self, mut segment: RaySegment) {
        segment.id = self.next_id;
        self.next_id += 1;
        self.segments.push(segment);
    }

    fn push_event(&mut self, event: SimulationEvent) {
        push_bounded(&mut self.events, event);
    }

    /// Drains the events recorded since the last call.
    pub fn poll_events(&mut self) -> Vec<SimulationEvent> {
        self.events.drain(..).collect()
    }

    pub fn desc(&self) -> &SimulationDesc {
        &self.desc
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn segments(&self) -> &[RaySegment] {
        &self.segments
    }

    /// Wedge counts as of the last step
    pub fn tally(&self) -> &WedgeTally {
        &self.tally
    }

    /// Number of completed steps since start or the last reset
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn last_timing(&self) -> Option<FrameTimingEvent> {
        self.last_timing
    }

    /// Segments that are still growing
    pub fn growing_count(&self) -> usize {
        self.segments.iter().filter(|s| !s.terminated).count()
    }

    /// True once no segment can change any more
    pub fn is_settled(&self) -> bool {
        self.segments.iter().all(|s| s.terminated && !s.needs_spawn())
    }
}

fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

fn push_bounded(events: &mut VecDeque<SimulationEvent>, event: SimulationEvent) {
    if events.len() >= MAX_PENDING_EVENTS {
        events.pop_front();
    }
    events.push_back(event);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CollisionMode, MAX_GENERATION};
    use crate::math::DVec2;
    use crate::ray::RayClass;
    use crate::scene::Sphere;

    /// One particle straight ahead of the source at distance 100, sphere further on.
    fn line_scene() -> Scene {
        Scene::with_particles(
            DVec2::new(0.0, 300.0),
            Sphere::new(DVec2::new(600.0, 300.0), 200.0),
            vec![DVec2::new(100.0, 300.0)],
            10.0,
            Bounds::new(1000.0, 600.0),
        )
    }

    fn single_ray_desc() -> SimulationDesc {
        let mut desc = SimulationDesc::default().primary_ray_count(1).seed(3);
        desc.launch_cone = 0.0;
        desc
    }

    fn run_until_settled(sim: &mut Simulation) {
        for _ in 0..10_000 {
            if sim.is_settled() {
                return;
            }
            sim.step();
        }
        panic!("simulation never settled");
    }

    #[test]
    fn test_launch_primaries() {
        let desc = SimulationDesc::default().seed(42);
        let sim = Simulation::new(desc, Bounds::new(1920.0, 1080.0)).unwrap();
        assert_eq!(sim.segments().len(), 30);
        assert!(sim.segments().iter().all(|s| s.class == RayClass::Primary));
        assert!(sim.segments().iter().all(|s| s.generation == 0));
        assert!(
            sim.segments()
                .iter()
                .all(|s| s.angle.abs() <= std::f64::consts::FRAC_PI_8)
        );
        assert!(sim.segments().iter().all(|s| s.start == sim.scene().source()));
    }

    #[test]
    fn test_seeded_runs_are_identical() {
        let desc = SimulationDesc::default().seed(99);
        let mut a = Simulation::new(desc.clone(), Bounds::new(1280.0, 720.0)).unwrap();
        let mut b = Simulation::new(desc, Bounds::new(1280.0, 720.0)).unwrap();
        for _ in 0..300 {
            a.step();
            b.step();
        }
        assert_eq!(a.segments(), b.segments());
        assert_eq!(a.tally(), b.tally());
    }

    #[test]
    fn test_collision_spawns_on_next_frame() {
        let mut sim = Simulation::with_scene(single_ray_desc(), line_scene()).unwrap();

        // Endpoint reaches distance 10 from the particle after 18 frames.
        for _ in 0..17 {
            let report = sim.step();
            assert_eq!(report.spawned, 0);
        }
        let report = sim.step();
        assert_eq!(report.terminated, 1);
        assert_eq!(report.spawned, 9);
        assert_eq!(sim.segments().len(), 10);

        let parent = &sim.segments()[0];
        assert!(parent.collided && parent.scatter_already_spawned);
        assert!((parent.length - 100.0).abs() < 1e-9);

        // Children are appended with zero length: not advanced in their spawn frame.
        let children = &sim.segments()[1..];
        assert!(children.iter().all(|c| c.length == 0.0 && c.generation == 1));
        assert_eq!(children[0].class, RayClass::AbsorbedPath);
        assert_eq!(
            children.iter().filter(|c| c.class == RayClass::Scattered).count(),
            8
        );

        sim.step();
        assert!(sim.segments()[1..].iter().all(|c| c.length > 0.0));

        let events = sim.poll_events();
        assert!(events.contains(&SimulationEvent::SegmentCollided {
            segment: 0,
            particle: 0,
            generation: 0
        }));
        assert!(events.contains(&SimulationEvent::Spawned {
            parent: 0,
            count: 9,
            generation: 1
        }));
        assert!(sim.poll_events().is_empty());
    }

    #[test]
    fn test_each_segment_spawns_once() {
        let mut sim = Simulation::with_scene(single_ray_desc(), line_scene()).unwrap();
        for _ in 0..40 {
            sim.step();
        }
        let spawns = sim
            .poll_events()
            .into_iter()
            .filter(|e| matches!(e, SimulationEvent::Spawned { parent: 0, .. }))
            .count();
        assert_eq!(spawns, 1);
    }

    #[test]
    fn test_generation_never_exceeds_cap() {
        let desc = SimulationDesc::default().seed(7);
        let mut sim = Simulation::new(desc, Bounds::new(1600.0, 900.0)).unwrap();
        run_until_settled(&mut sim);
        assert!(sim.segments().iter().all(|s| s.generation <= MAX_GENERATION));
        // Worst case fan-out of every primary.
        assert!(sim.segments().len() <= 30 * (1 + 9 + 8 * 8));
    }

    #[test]
    fn test_tally_matches_struck_segments() {
        let desc = SimulationDesc::default().seed(21);
        let mut sim = Simulation::new(desc, Bounds::new(1600.0, 900.0)).unwrap();
        run_until_settled(&mut sim);
        let struck = sim.segments().iter().filter(|s| s.struck_sphere).count() as u32;
        assert_eq!(sim.tally().total(), struck);
    }

    #[test]
    fn test_struck_segments_end_on_sphere() {
        let desc = SimulationDesc::default().seed(5);
        let mut sim = Simulation::new(desc, Bounds::new(1600.0, 900.0)).unwrap();
        run_until_settled(&mut sim);
        let sphere = *sim.scene().sphere();
        let width = sim.scene().width();
        for segment in sim.segments().iter().filter(|s| s.struck_sphere) {
            let d = segment.endpoint(width).distance(sphere.center);
            assert!((d - sphere.radius).abs() < 1e-6, "endpoint at distance {d}");
        }
    }

    #[test]
    fn test_retention_keeps_tally() {
        let base = SimulationDesc::default().seed(13);
        let mut keep = Simulation::new(base.clone(), Bounds::new(1600.0, 900.0)).unwrap();
        let mut retire = Simulation::new(
            base.retention(RetentionPolicy::retire_after(5)),
            Bounds::new(1600.0, 900.0),
        )
        .unwrap();

        for _ in 0..600 {
            keep.step();
            retire.step();
        }
        assert_eq!(keep.tally(), retire.tally());
        assert!(retire.segments().len() < keep.segments().len());
        assert!(
            retire
                .segments()
                .iter()
                .all(|s| !s.terminated || s.age_since_termination <= 5)
        );
    }

    #[test]
    fn test_cap_retires_oldest_terminated() {
        let desc = single_ray_desc().retention(RetentionPolicy::cap(5));
        let mut sim = Simulation::with_scene(desc, line_scene()).unwrap();
        for _ in 0..18 {
            sim.step();
        }
        // Parent terminated and was retired; the nine live children stay.
        assert_eq!(sim.segments().len(), 9);
        assert!(sim.segments().iter().all(|s| s.generation == 1));
        assert!(
            sim.poll_events()
                .contains(&SimulationEvent::Retired { count: 1 })
        );
    }

    #[test]
    fn test_event_ids_survive_retirement() {
        let desc = single_ray_desc().retention(RetentionPolicy::retire_after(0));
        let mut sim = Simulation::with_scene(desc, line_scene()).unwrap();
        for _ in 0..18 {
            sim.step();
        }
        let ids: Vec<SegmentId> = sim.segments().iter().map(|s| s.id).collect();
        assert_eq!(ids, (0..10).collect::<Vec<_>>());

        run_until_settled(&mut sim);
        let events = sim.poll_events();
        assert!(events.contains(&SimulationEvent::Spawned {
            parent: 0,
            count: 9,
            generation: 1
        }));

        // Retiring the parent shifts the children in the active set, but
        // every termination still names a distinct segment.
        let mut terminated: Vec<SegmentId> = events
            .iter()
            .filter(|e| e.is_termination())
            .filter_map(|e| e.segment())
            .collect();
        terminated.sort_unstable();
        assert_eq!(terminated, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn test_reset_relaunches() {
        let desc = SimulationDesc::default().seed(8);
        let mut sim = Simulation::new(desc, Bounds::new(1600.0, 900.0)).unwrap();
        for _ in 0..100 {
            sim.step();
        }
        let particles = sim.scene().particles().to_vec();
        sim.reset();
        assert_eq!(sim.frame(), 0);
        assert_eq!(sim.segments().len(), 30);
        assert_eq!(sim.tally().total(), 0);
        assert_eq!(sim.scene().particles(), particles.as_slice());
        assert!(
            sim.poll_events()
                .contains(&SimulationEvent::SimulationReset { primaries: 30 })
        );
    }

    #[test]
    fn test_regenerate_moves_particles() {
        let desc = SimulationDesc::default().seed(8);
        let mut sim = Simulation::new(desc, Bounds::new(1600.0, 900.0)).unwrap();
        let before = sim.scene().particles().to_vec();
        sim.regenerate(Bounds::new(1600.0, 900.0)).unwrap();
        assert_ne!(sim.scene().particles(), before.as_slice());
        assert_eq!(sim.segments().len(), 30);
    }

    #[test]
    fn test_swept_mode_runs() {
        let desc = SimulationDesc::default()
            .seed(17)
            .collision_mode(CollisionMode::Swept);
        let mut sim = Simulation::new(desc, Bounds::new(1600.0, 900.0)).unwrap();
        run_until_settled(&mut sim);
        assert!(sim.segments().iter().all(|s| s.terminated));
    }

    #[test]
    fn test_invalid_desc_is_rejected() {
        let desc = SimulationDesc::default().primary_speed(-1.0);
        assert!(Simulation::new(desc, Bounds::new(800.0, 600.0)).is_err());
    }
}
