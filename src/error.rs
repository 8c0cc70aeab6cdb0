use thiserror::Error;

/// Errors produced while building or reading a vault.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VaultError {
    /// The name is not part of the vault's declaration.
    #[error("store `{store}` is not declared in this vault")]
    UnknownStore { store: String },

    /// A store was registered twice. The first container is kept.
    #[error("store `{store}` is already registered")]
    DuplicateRegistration { store: &'static str },

    /// A store was read before its registration call ran.
    #[error("store `{store}` was read before it was registered")]
    PrematureReference { store: &'static str },

    /// `finalize` ran while declared stores were still missing.
    #[error("vault is incomplete, missing stores: {}", missing.join(", "))]
    Incomplete { missing: Vec<&'static str> },

    /// The store's own `get`/`set` ran before its initializer returned.
    #[error("store `{store}` has no state yet, its initializer is still running")]
    Uninitialized { store: &'static str },

    /// A setter or getter outlived the container it was bound to.
    #[error("container for store `{store}` has been dropped")]
    ContainerDropped { store: &'static str },

    /// The registered container does not hold the requested state type.
    #[error("store `{store}` holds a different state type")]
    TypeMismatch { store: &'static str },
}

impl VaultError {
    pub(crate) fn unknown(store: impl Into<String>) -> Self {
        Self::UnknownStore {
            store: store.into(),
        }
    }

    /// The store name this error refers to, when there is exactly one.
    pub fn store(&self) -> Option<&str> {
        match self {
            Self::UnknownStore { store } => Some(store.as_str()),
            Self::DuplicateRegistration { store }
            | Self::PrematureReference { store }
            | Self::Uninitialized { store }
            | Self::ContainerDropped { store }
            | Self::TypeMismatch { store } => Some(*store),
            Self::Incomplete { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_store() {
        let err = VaultError::PrematureReference { store: "counter" };
        assert_eq!(
            err.to_string(),
            "store `counter` was read before it was registered"
        );
        assert_eq!(err.store(), Some("counter"));
    }

    #[test]
    fn incomplete_lists_every_missing_store() {
        let err = VaultError::Incomplete {
            missing: vec!["labels", "toast"],
        };
        assert_eq!(
            err.to_string(),
            "vault is incomplete, missing stores: labels, toast"
        );
        assert_eq!(err.store(), None);
    }
}
