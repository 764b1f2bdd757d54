//! Key paths and value formats used for file type associations.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::{Error, Result};

pub const SHELL_OPEN_COMMAND: &str = "Shell\\open\\command";
pub const DEFAULT_ICON: &str = "DefaultIcon";
pub const FILE_EXTS: &str = "Software\\Microsoft\\Windows\\CurrentVersion\\Explorer\\FileExts";
pub const USER_CHOICE: &str = "UserChoice";
pub const PROG_ID_VALUE: &str = "ProgId";

/// The unnamed value of a key.
pub const DEFAULT_VALUE: &str = "";

/// A file extension such as `.txt`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Extension<'a>(&'a str);

impl<'a> Extension<'a> {
    pub fn parse(extension: &'a str) -> Result<Self> {
        if extension.starts_with('.') {
            Ok(Self(extension))
        } else {
            Err(Error::InvalidExtension(extension.to_owned()))
        }
    }

    pub fn as_str(&self) -> &'a str {
        self.0
    }
}

pub fn extension_key(extension: Extension) -> String {
    extension.as_str().to_owned()
}

pub fn command_key(prog_id: &str) -> String {
    format!("{}\\{}", prog_id, SHELL_OPEN_COMMAND)
}

pub fn default_icon_key(prog_id: &str) -> String {
    format!("{}\\{}", prog_id, DEFAULT_ICON)
}

pub fn file_exts_key(extension: Extension) -> String {
    format!("{}\\{}", FILE_EXTS, extension.as_str())
}

pub fn user_choice_key(extension: Extension) -> String {
    format!("{}\\{}", file_exts_key(extension), USER_CHOICE)
}

pub fn open_command(exe_path: &str) -> String {
    format!("\"{}\" \"%1\"", exe_path)
}

pub fn icon_value(icon_path: &str) -> String {
    format!("\"{}\", 0", icon_path)
}

/// File name of `exe_path` without its extension and without spaces.
///
/// `C:\Program Files\My App.exe` becomes `MyApp`. Two executables with the same
/// base name map to the same key.
pub fn derive_key_name(exe_path: &str) -> String {
    let file_name = exe_path.rsplit(&['\\', '/', ':'][..]).next().unwrap_or("");
    let stem = match file_name.rfind('.') {
        Some(dot) => &file_name[..dot],
        None => file_name,
    };
    stem.chars().filter(|c| *c != ' ').collect()
}

fn quoted_path_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r#"^"([^"]*)""#).unwrap())
}

/// The leading double-quoted segment of an open command, unquoted.
pub fn quoted_path(command: &str) -> Option<String> {
    quoted_path_regex()
        .captures(command)
        .and_then(|captures| captures.get(1))
        .map(|path| path.as_str().to_owned())
}
