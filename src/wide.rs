//! UTF-16 out-parameters for the exported functions.

/// Copies `value` and a terminating NUL into `buffer`.
///
/// Returns the number of UTF-16 units written, NUL included. When `buffer` is
/// missing or too small nothing is copied and `Err` carries the size needed.
#[cfg_attr(not(windows), allow(dead_code))]
pub fn copy_nul_terminated(value: &str, buffer: Option<&mut [u16]>) -> Result<u32, u32> {
    let mut wide: Vec<u16> = value.encode_utf16().collect();
    wide.push(0);

    match buffer {
        Some(buffer) if buffer.len() >= wide.len() => {
            buffer[..wide.len()].copy_from_slice(&wide);
            Ok(wide.len() as u32)
        }
        _ => Err(wide.len() as u32),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PATH: &str = "C:\\Tools\\Bar.exe";

    #[test]
    fn exact_fit() {
        let mut buffer = [0xffffu16; 17];
        assert_eq!(copy_nul_terminated(PATH, Some(&mut buffer)), Ok(17));
        assert_eq!(String::from_utf16(&buffer[..16]).unwrap(), PATH);
        assert_eq!(buffer[16], 0);
    }

    #[test]
    fn larger_buffer_keeps_the_tail() {
        let mut buffer = [0xffffu16; 20];
        assert_eq!(copy_nul_terminated(PATH, Some(&mut buffer)), Ok(17));
        assert_eq!(buffer[16], 0);
        assert_eq!(&buffer[17..], &[0xffff; 3]);
    }

    #[test]
    fn one_unit_short() {
        let mut buffer = [0xffffu16; 16];
        assert_eq!(copy_nul_terminated(PATH, Some(&mut buffer)), Err(17));
        assert_eq!(buffer, [0xffff; 16], "nothing should be copied");
    }

    #[test]
    fn no_buffer() {
        assert_eq!(copy_nul_terminated(PATH, None), Err(17));
        assert_eq!(copy_nul_terminated("", None), Err(1));
    }

    #[test]
    fn counts_utf16_units() {
        // U+1F600 takes two units.
        assert_eq!(copy_nul_terminated("C:\\\u{1F600}.exe", None), Err(10));
    }
}
