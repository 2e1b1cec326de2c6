use std::fmt;

/// Failure modes of the entity pool and component registry.
///
/// `CapacityExceeded` is non-fatal: callers check and skip the operation.
/// The remaining variants are configuration errors and should surface once
/// at startup. Dangling references (a constraint or predation check naming a
/// destroyed entity) are deliberately not represented here: they are skipped
/// silently, since destruction is asynchronous relative to the arrays that
/// still hold the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EcsError {
    /// The entity pool or a component store is full.
    CapacityExceeded,
    /// Lookup of a component name that was never registered.
    UnknownComponent(&'static str),
    /// A component name registered twice.
    DuplicateComponent(&'static str),
    /// Typed store access with the wrong element type.
    ElementTypeMismatch(&'static str),
}

impl fmt::Display for EcsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EcsError::CapacityExceeded => write!(f, "entity or component capacity reached"),
            EcsError::UnknownComponent(name) => write!(f, "component \"{name}\" not registered"),
            EcsError::DuplicateComponent(name) => {
                write!(f, "component \"{name}\" already registered")
            }
            EcsError::ElementTypeMismatch(name) => {
                write!(f, "component \"{name}\" accessed with wrong element type")
            }
        }
    }
}

impl std::error::Error for EcsError {}
