//! Ball-in-cup contacts
//!
//! Cup bottoms are the only bodies that raise contact-begin events against
//! balls. The first contact on a cup sinks it: the cue plays once and the cup
//! is remembered. Damping the ball and fading both nodes happens on every
//! contact, which is harmless because opacity and hidden are absolute values.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::SessionError;
use crate::audio::{AudioManager, SoundEffect};
use crate::platform::{AudioCuePlayer, NodeId, PhysicsWorld, SceneGraph, Transition};
use crate::settings::Settings;

/// Fade/hide durations for a sunk cup and its ball
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FadeTiming {
    /// Cup opacity tween
    pub cup_secs: f32,
    /// Ball opacity tween, and the delay before both are hidden
    pub ball_secs: f32,
}

impl FadeTiming {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            cup_secs: settings.cup_fade_secs,
            ball_secs: settings.ball_fade_secs,
        }
    }
}

/// What a contact did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContactOutcome {
    /// First contact on this cup
    Sunk { cup: NodeId },
    /// Cup was already sunk
    Repeat { cup: NodeId },
}

impl ContactOutcome {
    pub fn cup(&self) -> NodeId {
        match self {
            ContactOutcome::Sunk { cup } | ContactOutcome::Repeat { cup } => *cup,
        }
    }
}

/// Sunk-cup bookkeeping
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactRegistry {
    scored: BTreeSet<NodeId>,
}

impl ContactRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_scored(&self, cup: NodeId) -> bool {
        self.scored.contains(&cup)
    }

    pub fn scored_count(&self) -> usize {
        self.scored.len()
    }

    /// Sunk cups in id order
    pub fn scored(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.scored.iter().copied()
    }

    /// Handle a contact between a ball and a cup part.
    ///
    /// The owning cup is the parent of `target`.
    pub fn on_contact_begin<H>(
        &mut self,
        host: &mut H,
        audio: &AudioManager,
        projectile: NodeId,
        target: NodeId,
        fade: FadeTiming,
    ) -> Result<ContactOutcome, SessionError>
    where
        H: SceneGraph + PhysicsWorld + AudioCuePlayer,
    {
        let cup = host.parent(target).ok_or(SessionError::OrphanTarget(target))?;

        let outcome = if self.scored.insert(cup) {
            audio.play(host, cup, SoundEffect::BallSunk);
            log::info!("Cup {} sunk ({} total)", cup, self.scored.len());
            ContactOutcome::Sunk { cup }
        } else {
            log::debug!("Repeat contact on sunk cup {}", cup);
            ContactOutcome::Repeat { cup }
        };

        let damped = host.set_restitution(projectile, 0.0);
        fade_out(host, cup, projectile, fade);
        if !damped {
            return Err(SessionError::NoPhysicsBody(projectile));
        }

        Ok(outcome)
    }
}

/// Fade the cup quickly and the ball slowly, then hide both
pub fn fade_out(scene: &mut impl SceneGraph, cup: NodeId, ball: NodeId, fade: FadeTiming) {
    scene.schedule_transition(cup, Transition::Opacity(0.0), fade.cup_secs);
    scene.schedule_transition(ball, Transition::Opacity(0.0), fade.ball_secs);
    scene.schedule_transition(cup, Transition::Hidden, fade.ball_secs);
    scene.schedule_transition(ball, Transition::Hidden, fade.ball_secs);
}
