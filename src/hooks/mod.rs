//! Global configuration of stack capture and value formatting.
//!
//! # Quick Start
//!
//! ```rust
//! use errnote::hooks::{Hooks, StackConfig};
//!
//! // Keep stacks short and never abbreviate them.
//! Hooks::new()
//!     .stack_config(StackConfig {
//!         max_depth: 16,
//!         abbreviate: false,
//!         ..StackConfig::DEFAULT
//!     })
//!     .install()
//!     .expect("failed to install hooks");
//! ```
//!
//! **Most users don't need hooks.** Without them, stacks are captured
//! according to [`StackConfig::from_env`] and values are displayed with their
//! default formatting.
//!
//! - [`StackConfig`] controls whether stacks are captured, how deep, whether
//!   they are abbreviated against wrapped stacks, and how frame paths are
//!   shown.
//! - [`value_formatter`] customizes how data values of a given type are
//!   displayed.

mod hook_lock;
mod stack_config;
pub mod value_formatter;

use alloc::boxed::Box;
use core::{any::Any, fmt};

use self::{
    hook_lock::HookSlot,
    value_formatter::{HookMap, ValueFormatterHook},
};
pub use self::stack_config::StackConfig;

static HOOKS: HookSlot<Box<HookData>> = HookSlot::new();

/// Process-wide settings for stack capture and data value display.
///
/// # Examples
///
/// ```rust
/// use std::fmt;
///
/// use errnote::hooks::{Hooks, StackConfig};
///
/// #[derive(Debug)]
/// struct ApiToken(String);
///
/// Hooks::new()
///     .stack_config(StackConfig::DISABLED)
///     .value_formatter::<ApiToken, _>(|_: &ApiToken, f: &mut fmt::Formatter<'_>| f.write_str("***"))
///     .install()
///     .expect("failed to install hooks");
/// ```
#[derive(Debug)]
pub struct Hooks(Box<HookData>);

impl Default for Hooks {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug)]
pub(crate) struct HookData {
    stack_config: Option<StackConfig>,
    value_formatters: HookMap,
}

/// Returned by [`Hooks::install`] when another set of hooks got there first.
///
/// The rejected hooks are handed back in the field.
pub struct HooksAlreadyInstalledError(pub Hooks);

impl fmt::Debug for HooksAlreadyInstalledError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HooksAlreadyInstalledError").finish()
    }
}

impl fmt::Display for HooksAlreadyInstalledError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "hooks are already installed globally")
    }
}

impl core::error::Error for HooksAlreadyInstalledError {}

impl Hooks {
    /// Creates a new `Hooks` builder.
    ///
    /// Until [`stack_config`](Self::stack_config) is called, the installed
    /// hooks keep using the configuration from the environment.
    pub fn new() -> Self {
        Self(Box::new(HookData {
            stack_config: None,
            value_formatters: HookMap::default(),
        }))
    }

    /// Sets the stack capture configuration.
    pub fn stack_config(mut self, config: StackConfig) -> Self {
        self.0.stack_config = Some(config);
        self
    }

    /// Registers a formatter used when a data value of type `V` is displayed.
    ///
    /// Registering a second formatter for the same type replaces the first.
    /// The formatter runs without the global hook lock held, so it may
    /// display other values and frames or even call
    /// [`replace`](Self::replace).
    /// See [`value_formatter`] for an example.
    pub fn value_formatter<V, H>(mut self, hook: H) -> Self
    where
        V: 'static,
        H: ValueFormatterHook<V>,
    {
        self.0.value_formatters.insert::<V, H>(hook);
        self
    }

    /// Makes these hooks the process-wide configuration.
    ///
    /// Only the first installation succeeds; later ones get their hooks back
    /// inside [`HooksAlreadyInstalledError`]. Use [`replace`](Self::replace)
    /// to overwrite unconditionally.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use errnote::hooks::Hooks;
    ///
    /// // The slot starts out empty
    /// Hooks::new().install().expect("failed to install hooks");
    ///
    /// // and is taken now
    /// Hooks::new().install().unwrap_err();
    /// ```
    pub fn install(self) -> Result<(), HooksAlreadyInstalledError> {
        HOOKS
            .set_if_empty(self.0)
            .map_err(|hooks| HooksAlreadyInstalledError(Hooks(hooks)))
    }

    /// Installs these hooks whether or not others were installed before,
    /// returning the ones they displace.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use errnote::hooks::{Hooks, StackConfig};
    ///
    /// Hooks::new().install().expect("failed to install hooks");
    ///
    /// let previous = Hooks::new().stack_config(StackConfig::DISABLED).replace();
    /// assert!(previous.is_some());
    /// ```
    pub fn replace(self) -> Option<Hooks> {
        HOOKS.swap(self.0).map(Hooks)
    }
}

/// Returns the stack configuration currently in effect.
pub fn stack_config() -> StackConfig {
    if let Some(config) = HOOKS.with(|hooks| hooks?.stack_config) {
        return config;
    }

    #[cfg(feature = "std")]
    {
        StackConfig::from_env()
    }
    #[cfg(not(feature = "std"))]
    {
        StackConfig::DEFAULT
    }
}

/// Formats `value` with the formatter installed for its type.
///
/// Returns `None` when no formatter is installed for the type.
pub(crate) fn format_value(value: &dyn Any, f: &mut fmt::Formatter<'_>) -> Option<fmt::Result> {
    let hook = HOOKS.with(|hooks| hooks?.value_formatters.lookup(value))?;
    hook.display(value, f)
}
