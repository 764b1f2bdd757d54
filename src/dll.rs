use windows::Win32::Foundation::{
    ERROR_INSUFFICIENT_BUFFER, E_FAIL, E_INVALIDARG, E_POINTER, S_FALSE, S_OK,
};
use windows_core::{HRESULT, PCWSTR};

use crate::wide::copy_nul_terminated;
use crate::{Error, FileAssociations};

fn init_logging() {
    // Sets up logging to the Cargo.toml directory for debug purposes.
    #[cfg(debug_assertions)]
    {
        static LOGGING: std::sync::Once = std::sync::Once::new();
        LOGGING.call_once(|| {
            simple_logging::log_to_file(
                &format!("{}\\debug.log", env!("CARGO_MANIFEST_DIR")),
                log::LevelFilter::Trace,
            )
            .ok();
        });
    }
}

fn to_hresult(err: Error) -> HRESULT {
    log::trace!("{}", err);
    match err {
        Error::InvalidExtension(_) | Error::InvalidExecutable(_) => E_INVALIDARG,
        Error::Registry(err) => match err.raw_os_error() {
            Some(code) => HRESULT::from_win32(code as u32),
            None => E_FAIL,
        },
    }
}

unsafe fn required(value: PCWSTR) -> Result<String, HRESULT> {
    if value.is_null() {
        return Err(E_POINTER);
    }
    value.to_string().map_err(|_| E_INVALIDARG)
}

unsafe fn optional(value: PCWSTR) -> Result<Option<String>, HRESULT> {
    if value.is_null() {
        return Ok(None);
    }
    value.to_string().map(Some).map_err(|_| E_INVALIDARG)
}

fn unwrap_hresult(result: Result<HRESULT, HRESULT>) -> HRESULT {
    match result {
        Ok(hr) | Err(hr) => hr,
    }
}

unsafe fn is_associated_with(extension: PCWSTR, exe_path: PCWSTR) -> Result<HRESULT, HRESULT> {
    let extension = required(extension)?;
    let exe_path = required(exe_path)?;
    match FileAssociations::system().is_associated_with(&extension, &exe_path) {
        Ok(true) => Ok(S_OK),
        Ok(false) => Ok(S_FALSE),
        Err(err) => Err(to_hresult(err)),
    }
}

unsafe fn associated_exe_path(
    extension: PCWSTR,
    buffer: *mut u16,
    len: *mut u32,
) -> Result<HRESULT, HRESULT> {
    let extension = required(extension)?;
    if len.is_null() {
        return Err(E_POINTER);
    }

    let path = match FileAssociations::system().associated_exe_path(&extension) {
        Ok(Some(path)) => path,
        Ok(None) => {
            *len = 0;
            return Ok(S_FALSE);
        }
        Err(err) => return Err(to_hresult(err)),
    };

    let capacity = *len as usize;
    let buffer = if buffer.is_null() {
        None
    } else {
        Some(std::slice::from_raw_parts_mut(buffer, capacity))
    };
    match copy_nul_terminated(&path, buffer) {
        Ok(written) => {
            *len = written;
            Ok(S_OK)
        }
        Err(needed) => {
            *len = needed;
            Err(HRESULT::from_win32(ERROR_INSUFFICIENT_BUFFER.0))
        }
    }
}

unsafe fn set_association(
    extension: PCWSTR,
    exe_path: PCWSTR,
    file_description: PCWSTR,
    icon_path: PCWSTR,
) -> Result<HRESULT, HRESULT> {
    let extension = required(extension)?;
    let exe_path = required(exe_path)?;
    let file_description = required(file_description)?;
    let icon_path = optional(icon_path)?;
    FileAssociations::system()
        .set_association(
            &extension,
            &exe_path,
            &file_description,
            icon_path.as_deref(),
        )
        .map(|_| S_OK)
        .map_err(to_hresult)
}

unsafe fn clear_associations(extension: PCWSTR) -> Result<HRESULT, HRESULT> {
    let extension = required(extension)?;
    FileAssociations::system()
        .clear_associations(&extension)
        .map(|_| S_OK)
        .map_err(to_hresult)
}

/// Returns `S_OK` when `extension` opens with `exe_path`, `S_FALSE` otherwise.
#[no_mangle]
#[allow(non_snake_case)]
#[allow(clippy::missing_safety_doc)]
pub unsafe extern "system" fn FileAssocIsAssociatedWith(
    extension: PCWSTR,
    exe_path: PCWSTR,
) -> HRESULT {
    init_logging();
    unwrap_hresult(is_associated_with(extension, exe_path))
}

/// Copies the associated executable path into `buffer`.
///
/// `*len` holds the capacity of `buffer` in UTF-16 units on entry and the
/// required size, including the terminating NUL, on return. Returns `S_FALSE`
/// when nothing is associated.
#[no_mangle]
#[allow(non_snake_case)]
#[allow(clippy::missing_safety_doc)]
pub unsafe extern "system" fn FileAssocGetAssociatedExePath(
    extension: PCWSTR,
    buffer: *mut u16,
    len: *mut u32,
) -> HRESULT {
    init_logging();
    unwrap_hresult(associated_exe_path(extension, buffer, len))
}

/// `icon_path` may be null, in which case the executable's icon is used.
#[no_mangle]
#[allow(non_snake_case)]
#[allow(clippy::missing_safety_doc)]
pub unsafe extern "system" fn FileAssocSetAssociation(
    extension: PCWSTR,
    exe_path: PCWSTR,
    file_description: PCWSTR,
    icon_path: PCWSTR,
) -> HRESULT {
    init_logging();
    unwrap_hresult(set_association(
        extension,
        exe_path,
        file_description,
        icon_path,
    ))
}

#[no_mangle]
#[allow(non_snake_case)]
#[allow(clippy::missing_safety_doc)]
pub unsafe extern "system" fn FileAssocClearAssociations(extension: PCWSTR) -> HRESULT {
    init_logging();
    unwrap_hresult(clear_associations(extension))
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::ptr::null_mut;

    use windows::Win32::Foundation::{E_ACCESSDENIED, E_FAIL, E_INVALIDARG, E_POINTER};
    use windows_core::{w, PCWSTR};

    use super::*;

    #[test]
    fn error_mapping() {
        assert_eq!(
            to_hresult(Error::InvalidExtension("foo".to_owned())),
            E_INVALIDARG
        );
        assert_eq!(
            to_hresult(Error::InvalidExecutable("C:\\Tools\\.exe".to_owned())),
            E_INVALIDARG
        );
        // ERROR_ACCESS_DENIED
        assert_eq!(
            to_hresult(Error::Registry(io::Error::from_raw_os_error(5))),
            E_ACCESSDENIED
        );
        assert_eq!(
            to_hresult(Error::Registry(io::Error::new(io::ErrorKind::Other, "x"))),
            E_FAIL
        );
    }

    #[test]
    fn string_arguments() {
        assert_eq!(unsafe { required(PCWSTR::null()) }, Err(E_POINTER));
        assert_eq!(unsafe { optional(PCWSTR::null()) }, Ok(None));
        assert_eq!(
            unsafe { required(w!(".foo")) }.as_deref(),
            Ok(".foo")
        );

        // Lone surrogate
        let invalid = [0xd800u16, 0];
        assert_eq!(
            unsafe { required(PCWSTR(invalid.as_ptr())) },
            Err(E_INVALIDARG)
        );
    }

    #[test]
    fn invalid_extension() {
        unsafe {
            assert_eq!(
                FileAssocIsAssociatedWith(w!("foo"), w!("C:\\Tools\\Bar.exe")),
                E_INVALIDARG
            );
            let mut len = 0u32;
            assert_eq!(
                FileAssocGetAssociatedExePath(w!("foo"), null_mut(), &mut len),
                E_INVALIDARG
            );
            assert_eq!(
                FileAssocSetAssociation(
                    w!("foo"),
                    w!("C:\\Tools\\Bar.exe"),
                    w!("Foo File"),
                    PCWSTR::null()
                ),
                E_INVALIDARG
            );
            assert_eq!(FileAssocClearAssociations(w!("foo")), E_INVALIDARG);
        }
    }

    #[test]
    fn null_pointers() {
        unsafe {
            assert_eq!(
                FileAssocIsAssociatedWith(PCWSTR::null(), w!("C:\\Tools\\Bar.exe")),
                E_POINTER
            );
            assert_eq!(
                FileAssocIsAssociatedWith(w!(".foo"), PCWSTR::null()),
                E_POINTER
            );
            assert_eq!(
                FileAssocGetAssociatedExePath(w!(".foo"), null_mut(), null_mut()),
                E_POINTER
            );
            assert_eq!(
                FileAssocSetAssociation(
                    w!(".foo"),
                    w!("C:\\Tools\\Bar.exe"),
                    PCWSTR::null(),
                    PCWSTR::null()
                ),
                E_POINTER
            );
            assert_eq!(FileAssocClearAssociations(PCWSTR::null()), E_POINTER);
        }
    }

    #[test]
    fn nothing_associated() {
        let mut buffer = [0xffffu16; 4];
        let mut len = buffer.len() as u32;
        let hr = unsafe {
            FileAssocGetAssociatedExePath(
                w!(".file-assoc-never-registered"),
                buffer.as_mut_ptr(),
                &mut len,
            )
        };
        assert_eq!(hr, S_FALSE);
        assert_eq!(len, 0);
        assert_eq!(buffer, [0xffff; 4]);
    }
}
