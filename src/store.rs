use std::cell::RefCell;
use std::collections::BTreeMap;
use std::io;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Hive {
    /// `HKEY_CLASSES_ROOT`
    ClassesRoot,
    /// `HKEY_CURRENT_USER`
    CurrentUser,
}

/// Hierarchical string store with registry semantics.
///
/// Paths are backslash-separated and relative to a hive. A value name of `""`
/// addresses the default value of a key.
pub trait RegistryStore {
    /// `Ok(None)` when either the key or the value does not exist.
    fn read_string(&self, hive: Hive, path: &str, name: &str) -> io::Result<Option<String>>;

    /// Creates any missing keys along `path` before writing.
    fn write_string(&self, hive: Hive, path: &str, name: &str, value: &str) -> io::Result<()>;

    /// Deletes a key that has no subkeys. Deleting a missing key succeeds.
    fn delete_key(&self, hive: Hive, path: &str) -> io::Result<()>;

    /// Deletes a key together with everything below it. Deleting a missing key succeeds.
    fn delete_tree(&self, hive: Hive, path: &str) -> io::Result<()>;
}

impl<S: RegistryStore + ?Sized> RegistryStore for &S {
    fn read_string(&self, hive: Hive, path: &str, name: &str) -> io::Result<Option<String>> {
        (**self).read_string(hive, path, name)
    }

    fn write_string(&self, hive: Hive, path: &str, name: &str, value: &str) -> io::Result<()> {
        (**self).write_string(hive, path, name, value)
    }

    fn delete_key(&self, hive: Hive, path: &str) -> io::Result<()> {
        (**self).delete_key(hive, path)
    }

    fn delete_tree(&self, hive: Hive, path: &str) -> io::Result<()> {
        (**self).delete_tree(hive, path)
    }
}

type Values = BTreeMap<String, String>;

/// In-memory [`RegistryStore`]. Key and value names compare case-insensitively.
#[derive(Debug, Default)]
pub struct MemoryStore {
    keys: RefCell<BTreeMap<(Hive, String), Values>>,
}

/// Lowercased path. An empty path names the hive itself; empty segments,
/// as in `\Shell` or `Bar\`, are rejected like the registry does.
fn normalize(path: &str) -> io::Result<String> {
    if path.is_empty() {
        return Ok(String::new());
    }
    if path.split('\\').any(str::is_empty) {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("malformed key path {:?}", path),
        ));
    }
    Ok(path.to_lowercase())
}

fn is_below(parent: &str, candidate: &str) -> bool {
    candidate.len() > parent.len()
        && candidate.starts_with(parent)
        && candidate.as_bytes()[parent.len()] == b'\\'
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_exists(&self, hive: Hive, path: &str) -> bool {
        match normalize(path) {
            Ok(path) => self.keys.borrow().contains_key(&(hive, path)),
            Err(_) => false,
        }
    }
}

impl RegistryStore for MemoryStore {
    fn read_string(&self, hive: Hive, path: &str, name: &str) -> io::Result<Option<String>> {
        let path = normalize(path)?;
        Ok(self
            .keys
            .borrow()
            .get(&(hive, path))
            .and_then(|values| values.get(&name.to_lowercase()))
            .cloned())
    }

    fn write_string(&self, hive: Hive, path: &str, name: &str, value: &str) -> io::Result<()> {
        let path = normalize(path)?;
        let mut keys = self.keys.borrow_mut();

        let mut ancestor = String::new();
        for segment in path.split('\\').filter(|segment| !segment.is_empty()) {
            if !ancestor.is_empty() {
                ancestor.push('\\');
            }
            ancestor.push_str(segment);
            keys.entry((hive, ancestor.clone())).or_default();
        }

        keys.entry((hive, path))
            .or_default()
            .insert(name.to_lowercase(), value.to_owned());
        Ok(())
    }

    fn delete_key(&self, hive: Hive, path: &str) -> io::Result<()> {
        let path = normalize(path)?;
        let mut keys = self.keys.borrow_mut();

        let has_subkeys = keys
            .keys()
            .any(|(h, candidate)| *h == hive && is_below(&path, candidate));
        if has_subkeys {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("key {} has subkeys", path),
            ));
        }

        keys.remove(&(hive, path));
        Ok(())
    }

    fn delete_tree(&self, hive: Hive, path: &str) -> io::Result<()> {
        let path = normalize(path)?;
        self.keys.borrow_mut().retain(|(h, candidate), _| {
            *h != hive || (*candidate != path && !is_below(&path, candidate))
        });
        Ok(())
    }
}
