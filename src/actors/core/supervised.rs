// ============================================================================
// Supervision Metadata
// ============================================================================
//
// Every supervised actor describes itself and tells the coordinator what to
// do when it surfaces a fault.
//
// ============================================================================

/// Supervision strategy for an actor
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SupervisionStrategy {
    /// Re-create the actor from its factory, up to the restart limit
    Restart,
    /// Stop the actor permanently, keep the others running
    Stop,
    /// Shut everything down and report the failure to the caller
    Escalate,
}

/// Metadata about a supervised actor
#[derive(Debug, Clone)]
pub struct ActorMetadata {
    pub name: String,
    pub description: String,
    pub strategy: SupervisionStrategy,
}

impl ActorMetadata {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        strategy: SupervisionStrategy,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            strategy,
        }
    }
}
