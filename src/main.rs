//! Beer Pong entry point
//!
//! There is no AR host on the desktop, so the binary replays a scripted,
//! seeded session against the headless host and prints the final state:
//!
//! ```text
//! beer-pong [settings.json] [seed] [throws]
//! ```

mod replay {
    use std::path::Path;

    use glam::{Mat4, Vec2, Vec3};
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;
    use serde::Serialize;

    use beer_pong::Settings;
    use beer_pong::consts::CUP_BOTTOM_NAME;
    use beer_pong::platform::{HeadlessHost, PlaneAnchor, SceneGraph};
    use beer_pong::sim::{Session, SessionEvent, SessionState};

    const DEFAULT_SEED: u64 = 0xBEE2;
    const DEFAULT_THROWS: u32 = 12;
    /// Seconds between throws
    const FRAME_GAP: f32 = 0.8;
    /// Chance a throw lands in a cup
    const SINK_CHANCE: f64 = 0.35;
    /// Chance tracking drops out for a throw
    const TRACKING_LOSS_CHANCE: f64 = 0.08;

    #[derive(Serialize)]
    struct Summary<'a> {
        seed: u64,
        throws_attempted: u32,
        throws: u32,
        score: usize,
        cups_remaining: usize,
        alerts: usize,
        live_nodes: usize,
        state: &'a SessionState,
    }

    pub fn run() {
        let args: Vec<String> = std::env::args().skip(1).collect();
        let settings = match args.first() {
            Some(path) => Settings::load(Path::new(path)),
            None => Settings::default(),
        };
        let seed = args
            .get(1)
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_SEED);
        let attempts = args
            .get(2)
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_THROWS);

        log::info!("Replaying session with seed {} ({} throws)", seed, attempts);
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut host = HeadlessHost::new();
        let mut session = Session::new(settings);
        session.start(&mut host);

        // Scanning: one plane grows while the user looks around
        let anchor_node = host.spawn_node(None, false);
        let root = host.root();
        host.add_child(root, anchor_node);
        let mut plane = PlaneAnchor {
            id: 1,
            node: anchor_node,
            center: Vec3::ZERO,
            extent: Vec3::new(0.6, 0.0, 0.4),
        };
        session.handle(&mut host, SessionEvent::PlaneDetected(plane));
        plane.extent = Vec3::new(2.4, 0.0, 1.8);
        session.handle(&mut host, SessionEvent::PlaneUpdated(plane));

        // First tap misses the plane, second one lands on it
        let tap = Vec2::new(180.0, 400.0);
        session.handle(&mut host, SessionEvent::Tap(tap));
        host.hit = Some(Mat4::from_translation(Vec3::new(0.0, -1.2, -2.0)));
        session.handle(&mut host, SessionEvent::Tap(tap));

        for _ in 0..attempts {
            let viewer = Mat4::from_translation(Vec3::new(0.0, 0.0, 0.5))
                * Mat4::from_rotation_y(rng.random_range(-0.3..0.3))
                * Mat4::from_rotation_x(rng.random_range(-0.2..0.2));
            host.viewer_pose = (!rng.random_bool(TRACKING_LOSS_CHANCE)).then_some(viewer);

            let throws_before = session.state.throws;
            session.handle(&mut host, SessionEvent::Tap(tap));
            let thrown = session.state.throws > throws_before;

            let target_cup = match session.state.surface.as_ref() {
                Some(surface) if thrown && !surface.cups.is_empty() && rng.random_bool(SINK_CHANCE) => {
                    Some(surface.cups[rng.random_range(0..surface.cups.len())])
                }
                _ => None,
            };
            let ball = session.state.projectiles.back().map(|p| p.node);

            if let (Some(cup), Some(ball)) = (target_cup, ball) {
                if let Some(bottom) = host.find_named(cup, CUP_BOTTOM_NAME) {
                    session.handle(&mut host, SessionEvent::ContactBegin { a: ball, b: bottom });
                }
            }

            session.handle(&mut host, SessionEvent::Tick(FRAME_GAP));
            host.advance(FRAME_GAP);
        }

        session.handle(&mut host, SessionEvent::Pause);

        let summary = Summary {
            seed,
            throws_attempted: attempts,
            throws: session.state.throws,
            score: session.state.score(),
            cups_remaining: session.state.cups_remaining(),
            alerts: host.alerts().len(),
            live_nodes: host.node_count(),
            state: &session.state,
        };
        match serde_json::to_string_pretty(&summary) {
            Ok(json) => println!("{json}"),
            Err(e) => log::error!("Failed to serialize summary: {}", e),
        }
        log::info!(
            "Sunk {} of {} cups in {} throws",
            summary.score,
            summary.score + summary.cups_remaining,
            summary.throws
        );
    }
}

fn main() {
    env_logger::init();
    log::info!("Beer Pong (headless) starting...");
    replay::run();
}
