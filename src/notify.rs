/// Receives the "file associations changed" broadcast after a mutation.
pub trait ShellNotifier {
    fn associations_changed(&self);
}

impl<F: Fn()> ShellNotifier for F {
    fn associations_changed(&self) {
        self()
    }
}

/// Flushes the shell's association caches with `SHChangeNotify`.
#[cfg(windows)]
#[derive(Debug, Default, Clone, Copy)]
pub struct ShellChangeNotify;

#[cfg(windows)]
impl ShellNotifier for ShellChangeNotify {
    fn associations_changed(&self) {
        use windows::Win32::UI::Shell::{SHChangeNotify, SHCNE_ASSOCCHANGED, SHCNF_IDLIST};

        log::trace!("SHChangeNotify(SHCNE_ASSOCCHANGED)");
        unsafe { SHChangeNotify(SHCNE_ASSOCCHANGED, SHCNF_IDLIST, None, None) };
    }
}
