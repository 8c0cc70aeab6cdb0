/// Options applied while a vault is being built.
///
/// # Examples
///
/// ```
/// use tincan_vault::VaultConfig;
///
/// let config = VaultConfig::new().label("app").require_complete(false);
/// assert_eq!(config.label_str(), "app");
/// assert!(!config.requires_complete());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VaultConfig {
    label: &'static str,
    require_complete: bool,
}

impl VaultConfig {
    /// Create the default configuration.
    pub const fn new() -> Self {
        Self {
            label: "vault",
            require_complete: true,
        }
    }

    /// Name attached to log events emitted by this vault.
    pub const fn label(mut self, label: &'static str) -> Self {
        self.label = label;
        self
    }

    /// Whether `finalize` rejects a vault with unregistered stores.
    pub const fn require_complete(mut self, require: bool) -> Self {
        self.require_complete = require;
        self
    }

    pub const fn label_str(&self) -> &'static str {
        self.label
    }

    pub const fn requires_complete(&self) -> bool {
        self.require_complete
    }
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self::new()
    }
}
