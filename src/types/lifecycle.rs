//! Open/Sealed state shared by the mutable builder nodes.

use crate::error::{Result, TypeGraphError};

/// Lifecycle of a builder node. `Sealed` is terminal and carries whatever
/// the node produces on sealing (a container type, or nothing).
#[derive(Debug, Clone)]
pub(crate) enum Lifecycle<S> {
    Open,
    Sealed(S),
}

impl<S: Clone> Lifecycle<S> {
    /// Gate for every mutating entry point.
    pub(crate) fn ensure_open(&self, kind: &'static str, name: &str) -> Result<()> {
        match self {
            Lifecycle::Open => Ok(()),
            Lifecycle::Sealed(_) => Err(TypeGraphError::Frozen {
                kind,
                name: name.to_string(),
            }),
        }
    }

    pub(crate) fn is_sealed(&self) -> bool {
        matches!(self, Lifecycle::Sealed(_))
    }

    /// Seal the node, building the payload only on the first call.
    pub(crate) fn seal_with(&mut self, make: impl FnOnce() -> S) -> S {
        match self {
            Lifecycle::Sealed(payload) => payload.clone(),
            Lifecycle::Open => {
                let payload = make();
                *self = Lifecycle::Sealed(payload.clone());
                payload
            }
        }
    }
}

impl<S> Default for Lifecycle<S> {
    fn default() -> Self {
        Lifecycle::Open
    }
}
