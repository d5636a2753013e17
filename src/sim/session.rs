//! Session controller
//!
//! Owns the phase machine and routes host events:
//! - Scanning: plane overlays follow detected anchors; a tap on a plane places the table
//! - TablePlaced: a tap throws a ball; contacts sink cups
//!
//! [`Session::handle`] is the error boundary. Failed events are logged and shown
//! as an alert, and the session stays in its current phase.

use glam::{Mat4, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::ball::ThrowableBody;
use super::contact::{ContactOutcome, FadeTiming};
use super::geometry::position_from_transform;
use super::state::{SessionPhase, SessionState};
use super::table::{PlacementSurface, SubpartKind};
use crate::SessionError;
use crate::audio::AudioManager;
use crate::consts::{ALERT_MESSAGE, PLANE_OVERLAY_NAME};
use crate::platform::{Host, NodeId, PlaneAnchor};
use crate::settings::Settings;

/// Events delivered by the host, in arrival order
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SessionEvent {
    /// Screen tap (view coordinates)
    Tap(Vec2),
    /// Two bodies started touching
    ContactBegin { a: NodeId, b: NodeId },
    PlaneDetected(PlaneAnchor),
    PlaneUpdated(PlaneAnchor),
    /// Frame update, seconds since the last one
    Tick(f32),
    /// View is going away
    Pause,
}

/// Result of a tap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TapOutcome {
    /// Scanning and no plane under the tap
    NoHit,
    /// Table placed; holds its root node
    Placed(NodeId),
    /// Ball thrown; holds its node
    Thrown(NodeId),
}

/// A running AR beer pong session
#[derive(Debug, Clone)]
pub struct Session {
    pub state: SessionState,
    settings: Settings,
    ball: ThrowableBody,
    table: PlacementSurface,
    audio: AudioManager,
    fade: FadeTiming,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

impl Session {
    pub fn new(settings: Settings) -> Self {
        Self {
            state: SessionState::new(),
            ball: ThrowableBody::from_settings(&settings),
            table: PlacementSurface::new(&settings.table_template),
            audio: AudioManager::from_settings(&settings),
            fade: FadeTiming::from_settings(&settings),
            settings,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn phase(&self) -> SessionPhase {
        self.state.phase
    }

    pub fn audio_mut(&mut self) -> &mut AudioManager {
        &mut self.audio
    }

    /// Load cues and start looking for horizontal planes
    pub fn start<H: Host>(&mut self, host: &mut H) {
        self.audio.preload(host);
        if self.state.phase == SessionPhase::Scanning {
            host.set_plane_detection(true);
        }
        log::info!("Session started ({:?})", self.state.phase);
    }

    /// Dispatch one event. Returns false if it failed (the user was alerted).
    pub fn handle<H: Host>(&mut self, host: &mut H, event: SessionEvent) -> bool {
        let result = match event {
            SessionEvent::Tap(location) => self.tap(host, location).map(|_| ()),
            SessionEvent::ContactBegin { a, b } => self.contact_begin(host, a, b).map(|_| ()),
            SessionEvent::PlaneDetected(anchor) => {
                self.plane_detected(host, anchor);
                Ok(())
            }
            SessionEvent::PlaneUpdated(anchor) => {
                self.plane_updated(host, anchor);
                Ok(())
            }
            SessionEvent::Tick(dt) => {
                self.tick(host, dt);
                Ok(())
            }
            SessionEvent::Pause => {
                self.pause(host);
                Ok(())
            }
        };

        match result {
            Ok(()) => true,
            Err(e) => {
                log::warn!("{:?} failed in {:?}: {}", event, self.state.phase, e);
                host.present_alert(&e.to_string(), ALERT_MESSAGE);
                false
            }
        }
    }

    /// Place the table while scanning, throw a ball once it is placed
    pub fn tap<H: Host>(&mut self, host: &mut H, location: Vec2) -> Result<TapOutcome, SessionError> {
        match self.state.phase {
            SessionPhase::Scanning => {
                let Some(hit) = host.hit_test(location) else {
                    log::debug!("No plane under tap at {:?}", location);
                    return Ok(TapOutcome::NoHit);
                };
                let surface = self.table.place(host, position_from_transform(hit))?;
                let root = surface.root;
                self.state.surface = Some(surface);
                self.state.phase = SessionPhase::TablePlaced;
                self.disable_plane_scanning(host);
                log::info!("Phase -> {:?}", self.state.phase);
                Ok(TapOutcome::Placed(root))
            }
            SessionPhase::TablePlaced => self.throw(host).map(TapOutcome::Thrown),
        }
    }

    fn throw<H: Host>(&mut self, host: &mut H) -> Result<NodeId, SessionError> {
        let viewer = host.current_viewer_pose().ok_or(SessionError::NoViewerPose)?;
        let mut projectile = self.ball.spawn(host, Some(viewer))?;
        if let Err(e) = self.ball.launch(host, &mut projectile, viewer) {
            host.remove(projectile.node);
            return Err(e);
        }

        let node = projectile.node;
        log::debug!("Ball {} thrown with impulse {:?}", node, projectile.impulse);
        self.state.projectiles.push_back(projectile);
        self.state.throws += 1;

        while self.state.projectiles.len() > self.settings.projectile_cap() {
            if let Some(oldest) = self.state.projectiles.pop_front() {
                log::debug!("Evicting ball {} (cap {})", oldest.node, self.settings.projectile_cap());
                host.remove(oldest.node);
            }
        }

        Ok(node)
    }

    /// Forward a contact to the registry with the ball first.
    ///
    /// Contacts against parts of the placed table other than cups are
    /// ignored (`Ok(None)`).
    pub fn contact_begin<H: Host>(
        &mut self,
        host: &mut H,
        a: NodeId,
        b: NodeId,
    ) -> Result<Option<ContactOutcome>, SessionError> {
        let (ball, target) = if !self.state.is_projectile(a) && self.state.is_projectile(b) {
            (b, a)
        } else {
            (a, b)
        };

        let cup_part = self.state.surface.as_ref().is_some_and(|surface| {
            matches!(
                surface.kind_of(target),
                Some(SubpartKind::CupBottom | SubpartKind::CupSide)
            )
        });
        if host.parent(target).is_some() && !cup_part {
            log::debug!("Ignoring contact between {} and non-cup {}", ball, target);
            return Ok(None);
        }

        let outcome = self
            .state
            .contacts
            .on_contact_begin(host, &self.audio, ball, target, self.fade)?;
        if let Some(projectile) = self.state.projectile(ball) {
            log::debug!("Ball {} hit cup {} after {:.2}s", ball, outcome.cup(), projectile.age);
        }
        Ok(Some(outcome))
    }

    /// Show a translucent overlay for a newly detected plane
    pub fn plane_detected<H: Host>(&mut self, host: &mut H, anchor: PlaneAnchor) {
        if self.state.phase != SessionPhase::Scanning {
            return;
        }
        if self.state.overlays.contains_key(&anchor.id) {
            self.plane_updated(host, anchor);
            return;
        }

        let overlay = host.create_plane(
            PLANE_OVERLAY_NAME,
            anchor.extent.x,
            anchor.extent.z,
            self.settings.plane_overlay_color,
        );
        host.set_transform(overlay, overlay_transform(&anchor));
        host.add_child(anchor.node, overlay);
        self.state.overlays.insert(anchor.id, overlay);
        log::debug!("Plane {} detected ({:.2} x {:.2})", anchor.id, anchor.extent.x, anchor.extent.z);
    }

    /// Resize and recenter an anchor's overlay
    pub fn plane_updated<H: Host>(&mut self, host: &mut H, anchor: PlaneAnchor) {
        if self.state.phase != SessionPhase::Scanning {
            return;
        }
        match self.state.overlays.get(&anchor.id) {
            Some(&overlay) => {
                host.resize_plane(overlay, anchor.extent.x, anchor.extent.z);
                host.set_transform(overlay, overlay_transform(&anchor));
            }
            None => self.plane_detected(host, anchor),
        }
    }

    fn disable_plane_scanning<H: Host>(&mut self, host: &mut H) {
        host.set_plane_detection(false);
        for (_, overlay) in std::mem::take(&mut self.state.overlays) {
            host.remove(overlay);
        }
        let root = host.root();
        for stray in host.find_all_named(root, PLANE_OVERLAY_NAME) {
            host.remove(stray);
        }
    }

    /// Advance the session clock and despawn expired balls
    pub fn tick<H: Host>(&mut self, host: &mut H, dt: f32) {
        self.state.time_secs += dt;
        for projectile in self.state.projectiles.iter_mut() {
            projectile.age += dt;
        }

        let Some(lifetime) = self.settings.projectile_lifetime_secs else {
            return;
        };
        let (expired, live) = std::mem::take(&mut self.state.projectiles)
            .into_iter()
            .partition(|p| p.age >= lifetime);
        self.state.projectiles = live;
        for projectile in expired {
            log::debug!("Ball {} expired after {:.1}s", projectile.node, projectile.age);
            host.remove(projectile.node);
        }
    }

    pub fn pause<H: Host>(&mut self, host: &mut H) {
        host.pause();
        log::info!("Session paused");
    }
}

/// Flat quad centered on the anchor (planes are authored vertical)
fn overlay_transform(anchor: &PlaneAnchor) -> Mat4 {
    Mat4::from_translation(Vec3::new(anchor.center.x, 0.0, anchor.center.z))
        * Mat4::from_rotation_x(-std::f32::consts::FRAC_PI_2)
}
