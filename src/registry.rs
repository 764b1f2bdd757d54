use std::io;

use winreg::enums::*;
use winreg::RegKey;

use crate::store::{Hive, RegistryStore};

/// What `winreg` reports when a value is not a string.
const ERROR_BAD_FILE_TYPE: i32 = 222;

fn predef(hive: Hive) -> RegKey {
    match hive {
        Hive::ClassesRoot => RegKey::predef(HKEY_CLASSES_ROOT),
        Hive::CurrentUser => RegKey::predef(HKEY_CURRENT_USER),
    }
}

fn absent_as_none<T>(result: io::Result<T>) -> io::Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err),
    }
}

/// A value of another type, such as `REG_DWORD`, reads as absent.
fn readable_as_none<T>(result: io::Result<T>) -> io::Result<Option<T>> {
    match result {
        Err(err) if err.raw_os_error() == Some(ERROR_BAD_FILE_TYPE) => Ok(None),
        result => absent_as_none(result),
    }
}

/// The Windows registry, through `winreg`.
///
/// Key handles live only for the duration of a single call.
#[derive(Debug, Default, Clone, Copy)]
pub struct WindowsRegistry;

impl RegistryStore for WindowsRegistry {
    fn read_string(&self, hive: Hive, path: &str, name: &str) -> io::Result<Option<String>> {
        let key = match absent_as_none(predef(hive).open_subkey(path))? {
            Some(key) => key,
            None => return Ok(None),
        };
        readable_as_none(key.get_value::<String, _>(name))
    }

    fn write_string(&self, hive: Hive, path: &str, name: &str, value: &str) -> io::Result<()> {
        let (key, _) = predef(hive).create_subkey(path)?;
        key.set_value(name, &value)
    }

    fn delete_key(&self, hive: Hive, path: &str) -> io::Result<()> {
        absent_as_none(predef(hive).delete_subkey(path)).map(|_| ())
    }

    fn delete_tree(&self, hive: Hive, path: &str) -> io::Result<()> {
        absent_as_none(predef(hive).delete_subkey_all(path)).map(|_| ())
    }
}
