/// Declare a vault schema and the keys of its stores in one place.
///
/// Generates a unit struct implementing [`Schema`](crate::Schema) and, for
/// every entry, a unit struct implementing [`Store`](crate::Store) with the
/// given name and state type.
///
/// # Examples
///
/// ```
/// use tincan_vault::{declare_vault, Schema, Store, StoreState};
///
/// #[derive(Clone)]
/// pub struct Toast {
///     pub visible: bool,
/// }
///
/// impl StoreState for Toast {
///     type Patch = bool;
///
///     fn merge(&mut self, visible: bool) {
///         self.visible = visible;
///     }
/// }
///
/// declare_vault! {
///     pub AppVault {
///         ToastStore = "toast" => Toast,
///     }
/// }
///
/// assert_eq!(AppVault::STORES, &["toast"]);
/// assert_eq!(ToastStore::NAME, "toast");
/// ```
#[macro_export]
macro_rules! declare_vault {
    (
        $(#[$meta:meta])*
        $vis:vis $schema:ident {
            $(
                $(#[$store_meta:meta])*
                $store:ident = $name:literal => $state:ty
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        $vis struct $schema;

        impl $crate::Schema for $schema {
            const STORES: &'static [&'static str] = &[$($name),+];
        }

        $(
            $(#[$store_meta])*
            #[derive(Debug, Clone, Copy, PartialEq, Eq)]
            $vis struct $store;

            impl $crate::Store for $store {
                type Schema = $schema;
                type State = $state;

                const NAME: &'static str = $name;
            }
        )+
    };
}
