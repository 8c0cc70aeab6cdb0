use std::fmt;

/// The state+actions shape managed by one store.
///
/// `merge` applies a partial update in place: fields named by the patch are
/// overwritten, every other field is left untouched. Replacing the whole
/// state does not go through `merge`.
///
/// # Examples
///
/// ```
/// use tincan_vault::StoreState;
///
/// #[derive(Clone, Debug, PartialEq)]
/// struct Toast {
///     visible: bool,
///     text: String,
/// }
///
/// #[derive(Default)]
/// struct ToastPatch {
///     visible: Option<bool>,
///     text: Option<String>,
/// }
///
/// impl StoreState for Toast {
///     type Patch = ToastPatch;
///
///     fn merge(&mut self, patch: ToastPatch) {
///         if let Some(visible) = patch.visible {
///             self.visible = visible;
///         }
///         if let Some(text) = patch.text {
///             self.text = text;
///         }
///     }
/// }
///
/// let mut toast = Toast { visible: false, text: "saved".into() };
/// toast.merge(ToastPatch { visible: Some(true), ..Default::default() });
/// assert_eq!(toast, Toast { visible: true, text: "saved".into() });
/// ```
pub trait StoreState: Clone + Send + Sync + 'static {
    /// A partial update, usually a struct of `Option` fields.
    type Patch: Send + 'static;

    /// Shallow-merge `patch` into `self`.
    fn merge(&mut self, patch: Self::Patch);
}

type MergeFn<S> = Box<dyn FnOnce(&S) -> <S as StoreState>::Patch + Send>;
type ReplaceFn<S> = Box<dyn FnOnce(&S) -> S + Send>;

/// A state transition: a value or an updater, merged or replacing.
pub enum Update<S: StoreState> {
    /// Merge a partial update.
    Merge(S::Patch),
    /// Merge the partial update computed from the current state.
    MergeWith(MergeFn<S>),
    /// Replace the whole state.
    Replace(S),
    /// Replace the whole state with one computed from the current state.
    ReplaceWith(ReplaceFn<S>),
}

impl<S: StoreState> Update<S> {
    pub fn merge_with<F>(f: F) -> Self
    where
        F: FnOnce(&S) -> S::Patch + Send + 'static,
    {
        Self::MergeWith(Box::new(f))
    }

    pub fn replace_with<F>(f: F) -> Self
    where
        F: FnOnce(&S) -> S + Send + 'static,
    {
        Self::ReplaceWith(Box::new(f))
    }

    /// Whether this update discards fields it does not mention.
    pub fn is_replace(&self) -> bool {
        matches!(self, Self::Replace(_) | Self::ReplaceWith(_))
    }

    /// Run the updater, if any, against `current`.
    pub(crate) fn resolve(self, current: &S) -> Change<S> {
        match self {
            Self::Merge(patch) => Change::Merge(patch),
            Self::MergeWith(f) => Change::Merge(f(current)),
            Self::Replace(next) => Change::Replace(next),
            Self::ReplaceWith(f) => Change::Replace(f(current)),
        }
    }
}

/// An [`Update`] whose updater has already run.
pub(crate) enum Change<S: StoreState> {
    Merge(S::Patch),
    Replace(S),
}

impl<S: StoreState> Change<S> {
    pub(crate) fn apply_to(state: &mut S, change: Self) {
        match change {
            Self::Merge(patch) => state.merge(patch),
            Self::Replace(next) => *state = next,
        }
    }
}

impl<S: StoreState> fmt::Debug for Update<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            Self::Merge(_) => "Merge",
            Self::MergeWith(_) => "MergeWith",
            Self::Replace(_) => "Replace",
            Self::ReplaceWith(_) => "ReplaceWith",
        };
        f.debug_tuple("Update").field(&kind).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    struct Pair {
        left: i32,
        right: i32,
    }

    #[derive(Default)]
    struct PairPatch {
        left: Option<i32>,
        right: Option<i32>,
    }

    impl StoreState for Pair {
        type Patch = PairPatch;

        fn merge(&mut self, patch: PairPatch) {
            if let Some(left) = patch.left {
                self.left = left;
            }
            if let Some(right) = patch.right {
                self.right = right;
            }
        }
    }

    #[test]
    fn merge_touches_only_patched_fields() {
        let mut pair = Pair { left: 1, right: 2 };
        let change = Update::merge_with(|p: &Pair| PairPatch {
            left: Some(p.left + 1),
            ..Default::default()
        })
        .resolve(&pair);
        Change::apply_to(&mut pair, change);
        assert_eq!(pair, Pair { left: 2, right: 2 });
    }

    #[test]
    fn replace_discards_previous_state() {
        let mut pair = Pair { left: 1, right: 2 };
        let update = Update::replace_with(|p: &Pair| Pair {
            left: p.right,
            right: 0,
        });
        assert!(update.is_replace());
        let change = update.resolve(&pair);
        Change::apply_to(&mut pair, change);
        assert_eq!(pair, Pair { left: 2, right: 0 });
    }
}
