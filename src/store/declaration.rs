use super::StoreState;

/// The declared set of store names for one vault.
///
/// Usually generated by [`declare_vault!`](crate::declare_vault) together
/// with the [`Store`] keys that belong to it.
pub trait Schema: 'static {
    /// Store names in declaration order.
    const STORES: &'static [&'static str];

    /// Whether `name` is part of this declaration.
    fn declares(name: &str) -> bool {
        Self::STORES.iter().any(|declared| *declared == name)
    }
}

/// A key naming one store of a [`Schema`].
///
/// The key ties the store's name to its state+actions type, so the
/// container type ([`Container<Self::State>`](crate::Container)) and the
/// reactive read type (`Self::State`) both come from this one declaration.
pub trait Store: 'static {
    type Schema: Schema;
    type State: StoreState;

    const NAME: &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::declare_vault;

    declare_vault! {
        Shelf {
            Books = "books" => Vec<&'static str>,
            Lamps = "lamps" => Vec<&'static str>,
        }
    }

    impl StoreState for Vec<&'static str> {
        type Patch = &'static str;

        fn merge(&mut self, patch: &'static str) {
            self.push(patch);
        }
    }

    #[test]
    fn macro_declares_names_in_order() {
        assert_eq!(Shelf::STORES, &["books", "lamps"]);
        assert_eq!(Books::NAME, "books");
        assert_eq!(<Lamps as Store>::NAME, "lamps");
    }

    #[test]
    fn declares_checks_membership() {
        assert!(Shelf::declares("books"));
        assert!(!Shelf::declares("chairs"));
    }
}
