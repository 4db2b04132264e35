//! Channel hooks.
//!
//! A [`HookRegistry`] holds named callbacks keyed by [`EventCategory`]. The
//! network attaches every stored callback to each channel it wires, so hooks
//! observe channel traffic without touching component code.
//!
//! Hooks are attached when a channel is wired. A hook registered later does
//! not reach channels that already exist, so register hooks before building
//! the network (see [`NetworkBuilder::hooks`](crate::NetworkBuilder::hooks))
//! when initial values must be observed.
//!
//! # Example
//!
//! ```
//! use flowline_component::ChannelEvent;
//! use flowline_network::HookRegistry;
//!
//! let hooks = HookRegistry::new();
//! hooks
//!     .hook("data", "log", |event: &ChannelEvent<'_>| {
//!         tracing::info!(channel = %event.channel().identity(), "packet");
//!     })?
//!     .hook("disconnect", "log", |_: &ChannelEvent<'_>| {})?;
//!
//! assert_eq!(hooks.len(), 2);
//! assert!(hooks.hook("data", "log", |_: &ChannelEvent<'_>| {}).is_err());
//! # Ok::<(), flowline_network::HookError>(())
//! ```

use core::fmt;
use std::sync::Arc;

use flowline_component::{Channel, ChannelEvent, EventCategory, Observer};
use indexmap::IndexMap;
use parking_lot::RwLock;

use crate::error::HookError;

/// Snapshot of registered hooks: category, then hook name, then callback.
pub type HookTable = IndexMap<EventCategory, IndexMap<String, Observer>>;

/// Entry in the hook registry.
struct HookEntry {
    /// Name, unique within its category.
    name: String,
    hook: Observer,
}

/// Registry of named channel-event callbacks.
///
/// Uses interior mutability so hooks can be added through a shared
/// reference, including through a live `Arc<Network>`.
#[derive(Default)]
pub struct HookRegistry {
    hooks: RwLock<IndexMap<EventCategory, Vec<HookEntry>>>,
}

impl HookRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a hook by category name (`"data"`, `"connect"`,
    /// `"disconnect"`, `"beginGroup"`, `"endGroup"`).
    ///
    /// # Errors
    ///
    /// - [`HookError::InvalidCategory`] if the category is unknown.
    /// - [`HookError::DuplicateHook`] if the name is already used for the
    ///   category.
    ///
    /// Nothing is stored when an error is returned.
    pub fn hook<F>(
        &self,
        category: &str,
        name: impl Into<String>,
        callback: F,
    ) -> Result<&Self, HookError>
    where
        F: Fn(&ChannelEvent<'_>) + Send + Sync + 'static,
    {
        let category: EventCategory = category.parse()?;
        self.hook_on(category, name, callback)
    }

    /// Registers a hook for a typed category.
    ///
    /// # Errors
    ///
    /// Returns [`HookError::DuplicateHook`] if the name is already used for
    /// the category.
    pub fn hook_on<F>(
        &self,
        category: EventCategory,
        name: impl Into<String>,
        callback: F,
    ) -> Result<&Self, HookError>
    where
        F: Fn(&ChannelEvent<'_>) + Send + Sync + 'static,
    {
        let name = name.into();

        let mut hooks = self.hooks.write();
        let entries = hooks.entry(category).or_default();

        if entries.iter().any(|entry| entry.name == name) {
            return Err(HookError::DuplicateHook {
                category: category.to_string(),
                name,
            });
        }

        tracing::debug!(%category, hook = %name, "hook registered");
        entries.push(HookEntry {
            name,
            hook: Arc::new(callback),
        });
        Ok(self)
    }

    /// Returns a snapshot of every registered hook.
    #[must_use]
    pub fn hooks(&self) -> HookTable {
        self.hooks
            .read()
            .iter()
            .map(|(category, entries)| {
                let named = entries
                    .iter()
                    .map(|entry| (entry.name.clone(), Arc::clone(&entry.hook)))
                    .collect();
                (*category, named)
            })
            .collect()
    }

    /// Checks if a hook with the given name exists for the category.
    #[must_use]
    pub fn contains_hook(&self, category: EventCategory, name: &str) -> bool {
        self.hooks
            .read()
            .get(&category)
            .is_some_and(|entries| entries.iter().any(|entry| entry.name == name))
    }

    /// Returns the number of hooks registered for the category.
    #[must_use]
    pub fn hook_count(&self, category: EventCategory) -> usize {
        self.hooks.read().get(&category).map_or(0, Vec::len)
    }

    /// Returns the total number of hooks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.hooks.read().values().map(Vec::len).sum()
    }

    /// Returns true if no hooks are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Attaches every hook to the channel, in registration order per category.
    pub(crate) fn add_hooks(&self, channel: &Channel) {
        let hooks = self.hooks.read();
        for (category, entries) in hooks.iter() {
            for entry in entries {
                channel.on_shared(*category, Arc::clone(&entry.hook));
            }
        }
    }
}

impl fmt::Debug for HookRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hooks = self.hooks.read();
        let mut map = f.debug_map();
        for (category, entries) in hooks.iter() {
            let names: Vec<&str> = entries.iter().map(|entry| entry.name.as_str()).collect();
            map.entry(&category.as_str(), &names);
        }
        map.finish()
    }
}
