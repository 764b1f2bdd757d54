//! Query and edit Windows file type associations.
//!
//! [`FileAssociations`] works on any [`RegistryStore`]. On Windows,
//! [`FileAssociations::system`] uses the live registry and broadcasts
//! `SHCNE_ASSOCCHANGED` after every change; elsewhere, and in tests,
//! [`MemoryStore`] stands in for the registry.

mod assoc;
mod error;
pub mod keys;
mod notify;
mod store;
mod wide;

#[cfg(windows)]
mod dll;
#[cfg(windows)]
mod registry;

pub use assoc::FileAssociations;
pub use error::{Error, Result};
pub use notify::ShellNotifier;
pub use store::{Hive, MemoryStore, RegistryStore};

#[cfg(windows)]
pub use notify::ShellChangeNotify;
#[cfg(windows)]
pub use registry::WindowsRegistry;
