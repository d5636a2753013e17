//! Session error type
//!
//! Every error is non-fatal: the session controller catches it, logs it and
//! presents it as a dismiss-only alert.

use crate::platform::NodeId;

/// Errors raised while handling a session event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// The tracker has no current viewer pose (tracking lost or not started)
    NoViewerPose,
    /// A node expected to carry a physics body has none
    NoPhysicsBody(NodeId),
    /// The named template asset could not be loaded
    AssetNotFound(String),
    /// A required named part is missing from the loaded table template
    MissingSubpart(String),
    /// A cup contains a child that is neither a bottom nor a side
    UnexpectedSubpart(String),
    /// A contact target has no parent cup
    OrphanTarget(NodeId),
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionError::NoViewerPose => write!(f, "Error loading current frame"),
            SessionError::NoPhysicsBody(node) => {
                write!(f, "Error loading physics body for node {}", node)
            }
            SessionError::AssetNotFound(name) => write!(f, "Error finding {} scene", name),
            SessionError::MissingSubpart(name) => write!(f, "Error finding {}", name),
            SessionError::UnexpectedSubpart(name) => {
                write!(f, "Error with cup child name: {}", name)
            }
            SessionError::OrphanTarget(node) => {
                write!(f, "Error loading parent of contact target {}", node)
            }
        }
    }
}

impl std::error::Error for SessionError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_alert_title() {
        assert_eq!(
            SessionError::MissingSubpart("floor".to_string()).to_string(),
            "Error finding floor"
        );
        assert_eq!(
            SessionError::AssetNotFound("table".to_string()).to_string(),
            "Error finding table scene"
        );
        assert_eq!(
            SessionError::NoViewerPose.to_string(),
            "Error loading current frame"
        );
    }

    #[test]
    fn test_node_ids_in_messages() {
        let msg = SessionError::OrphanTarget(NodeId(7)).to_string();
        assert!(msg.contains("#7"));
    }
}
