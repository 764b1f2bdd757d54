use crate::error::{Error, Result};
use crate::keys::{self, Extension, DEFAULT_VALUE, PROG_ID_VALUE};
use crate::notify::ShellNotifier;
use crate::store::{Hive, RegistryStore};

/// Queries and edits the file type associations stored in `S`.
///
/// Nothing is cached; every call reads the store again.
#[derive(Debug, Default)]
pub struct FileAssociations<S, N> {
    store: S,
    notifier: N,
}

#[cfg(windows)]
impl FileAssociations<crate::registry::WindowsRegistry, crate::notify::ShellChangeNotify> {
    /// Operates on the live registry and notifies the shell after changes.
    pub fn system() -> Self {
        Self::new(
            crate::registry::WindowsRegistry,
            crate::notify::ShellChangeNotify,
        )
    }
}

impl<S: RegistryStore, N: ShellNotifier> FileAssociations<S, N> {
    pub fn new(store: S, notifier: N) -> Self {
        Self { store, notifier }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// An empty default value names no key and counts as absent.
    fn open_method_key_name(&self, extension: Extension) -> Result<Option<String>> {
        Ok(self
            .store
            .read_string(
                Hive::ClassesRoot,
                &keys::extension_key(extension),
                DEFAULT_VALUE,
            )?
            .filter(|prog_id| !prog_id.is_empty()))
    }

    fn open_command(&self, prog_id: &str) -> Result<Option<String>> {
        Ok(self
            .store
            .read_string(Hive::ClassesRoot, &keys::command_key(prog_id), DEFAULT_VALUE)?)
    }

    fn user_choice(&self, extension: Extension) -> Result<Option<String>> {
        Ok(self.store.read_string(
            Hive::CurrentUser,
            &keys::user_choice_key(extension),
            PROG_ID_VALUE,
        )?)
    }

    /// Whether opening `extension` files runs `exe_path`.
    ///
    /// The open command under the extension's ProgId has to be exactly
    /// `"<exe_path>" "%1"`, ignoring case, and a per-user `UserChoice` for the
    /// extension, if any, has to name that same ProgId.
    pub fn is_associated_with(&self, extension: &str, exe_path: &str) -> Result<bool> {
        let extension = Extension::parse(extension)?;
        log::trace!("is_associated_with({}, {})", extension.as_str(), exe_path);

        let prog_id = match self.open_method_key_name(extension)? {
            Some(prog_id) => prog_id,
            None => {
                log::debug!("{}: no open method key", extension.as_str());
                return Ok(false);
            }
        };

        let command = match self.open_command(&prog_id)? {
            Some(command) => command,
            None => {
                log::debug!("{}: no open command", prog_id);
                return Ok(false);
            }
        };

        if command.to_lowercase() != keys::open_command(exe_path).to_lowercase() {
            log::debug!("{}: command {} does not match", prog_id, command);
            return Ok(false);
        }

        match self.user_choice(extension)? {
            None => Ok(true),
            Some(user_prog_id) => {
                log::debug!("{}: user choice is {}", extension.as_str(), user_prog_id);
                Ok(user_prog_id == prog_id)
            }
        }
    }

    /// The executable named by the open command of `extension`, if any.
    pub fn associated_exe_path(&self, extension: &str) -> Result<Option<String>> {
        let extension = Extension::parse(extension)?;
        log::trace!("associated_exe_path({})", extension.as_str());

        let prog_id = match self.open_method_key_name(extension)? {
            Some(prog_id) => prog_id,
            None => return Ok(None),
        };
        Ok(self
            .open_command(&prog_id)?
            .and_then(|command| keys::quoted_path(&command)))
    }

    /// Binds `extension` to `exe_path`.
    ///
    /// Writes to `HKEY_CLASSES_ROOT`, which usually needs elevation. A failed
    /// write leaves the earlier ones in place. Fails before writing anything
    /// when `exe_path` has no file name to derive a ProgId from.
    pub fn set_association(
        &self,
        extension: &str,
        exe_path: &str,
        file_description: &str,
        icon_path: Option<&str>,
    ) -> Result<()> {
        let extension = Extension::parse(extension)?;
        let icon_path = icon_path.unwrap_or(exe_path);
        log::trace!(
            "set_association({}, {}, {}, {})",
            extension.as_str(),
            exe_path,
            file_description,
            icon_path
        );

        let prog_id = keys::derive_key_name(exe_path);
        if prog_id.is_empty() {
            return Err(Error::InvalidExecutable(exe_path.to_owned()));
        }

        self.store.write_string(
            Hive::ClassesRoot,
            &keys::extension_key(extension),
            DEFAULT_VALUE,
            &prog_id,
        )?;
        self.store
            .write_string(Hive::ClassesRoot, &prog_id, DEFAULT_VALUE, file_description)?;
        self.store.write_string(
            Hive::ClassesRoot,
            &keys::default_icon_key(&prog_id),
            DEFAULT_VALUE,
            &keys::icon_value(icon_path),
        )?;
        self.store.write_string(
            Hive::ClassesRoot,
            &keys::command_key(&prog_id),
            DEFAULT_VALUE,
            &keys::open_command(exe_path),
        )?;
        log::debug!("{} -> {}", extension.as_str(), prog_id);

        // A stale per-user choice would shadow the new association.
        self.store
            .delete_key(Hive::CurrentUser, &keys::user_choice_key(extension))?;

        self.notifier.associations_changed();
        Ok(())
    }

    /// Removes the association of `extension`, both system-wide and per-user.
    pub fn clear_associations(&self, extension: &str) -> Result<()> {
        let extension = Extension::parse(extension)?;
        log::trace!("clear_associations({})", extension.as_str());

        self.store
            .delete_key(Hive::ClassesRoot, &keys::extension_key(extension))?;
        self.store
            .delete_tree(Hive::CurrentUser, &keys::file_exts_key(extension))?;
        log::debug!("{}: cleared", extension.as_str());

        self.notifier.associations_changed();
        Ok(())
    }
}
