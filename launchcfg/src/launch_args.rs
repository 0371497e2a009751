// SPDX-License-Identifier: Apache-2.0

use core::ffi::CStr;
use core::fmt::{self, Write};

use log::debug;

use crate::config::ConfigEntry;

/// Size of each argument buffer, terminator included.
pub const ARG_CAPACITY: usize = 256;

/// Why an entry could not be turned into launch arguments.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum LaunchError {
    /// The payload path plus its terminator exceeds [`ARG_CAPACITY`].
    PayloadTooLong { len: usize },
    /// Not reachable with the current buffer size: a decimal `usize` is at
    /// most 20 bytes.
    OffsetTooLong,
    /// The payload path contains a NUL byte.
    InteriorNul,
}

impl fmt::Display for LaunchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LaunchError::PayloadTooLong { len } => write!(
                f,
                "payload path is {len} bytes, at most {} fit",
                ARG_CAPACITY - 1
            ),
            LaunchError::OffsetTooLong => f.write_str("offset does not fit its argument buffer"),
            LaunchError::InteriorNul => f.write_str("payload path contains a NUL byte"),
        }
    }
}

/// Fixed buffer that keeps room for a trailing NUL.
struct ArgWriter {
    buf: [u8; ARG_CAPACITY],
    len: usize,
}

impl ArgWriter {
    const fn new() -> Self {
        Self {
            buf: [0; ARG_CAPACITY],
            len: 0,
        }
    }

    fn as_str(&self) -> &str {
        // Only ever filled from &str pieces
        core::str::from_utf8(&self.buf[..self.len]).unwrap_or_default()
    }

    fn as_cstr(&self) -> &CStr {
        CStr::from_bytes_until_nul(&self.buf).unwrap_or_default()
    }
}

impl Write for ArgWriter {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let end = self.len + s.len();
        if end >= ARG_CAPACITY {
            return Err(fmt::Error);
        }
        self.buf[self.len..end].copy_from_slice(s.as_bytes());
        self.len = end;
        Ok(())
    }
}

/// The argument pair handed to the next boot stage: payload path, then
/// decimal offset, both NUL-terminated.
pub struct LaunchArgs {
    payload: ArgWriter,
    offset: ArgWriter,
}

impl LaunchArgs {
    pub fn new(entry: &ConfigEntry) -> Result<Self, LaunchError> {
        let path = entry.payload();
        if path.as_bytes().contains(&0) {
            return Err(LaunchError::InteriorNul);
        }
        let mut payload = ArgWriter::new();
        payload
            .write_str(path)
            .map_err(|_| LaunchError::PayloadTooLong { len: path.len() })?;

        let mut offset = ArgWriter::new();
        write!(offset, "{}", entry.offset()).map_err(|_| LaunchError::OffsetTooLong)?;

        debug!("launch args: {:?} {:?}", payload.as_str(), offset.as_str());
        Ok(Self { payload, offset })
    }

    pub fn payload(&self) -> &str {
        self.payload.as_str()
    }

    pub fn offset(&self) -> &str {
        self.offset.as_str()
    }

    pub fn payload_cstr(&self) -> &CStr {
        self.payload.as_cstr()
    }

    pub fn offset_cstr(&self) -> &CStr {
        self.offset.as_cstr()
    }

    /// `[payload, offset]`.
    pub fn argv(&self) -> [&CStr; 2] {
        [self.payload_cstr(), self.offset_cstr()]
    }
}

impl fmt::Debug for LaunchArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LaunchArgs")
            .field("payload", &self.payload())
            .field("offset", &self.offset())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buttons::Buttons;

    #[test]
    fn test_render() {
        let entry = ConfigEntry::new("sd:/arm9loaderhax.bin", 0x1A, Buttons::empty());
        let args = LaunchArgs::new(&entry).unwrap();
        assert_eq!(args.payload(), "sd:/arm9loaderhax.bin");
        assert_eq!(args.offset(), "26");
        assert_eq!(args.payload_cstr().to_bytes(), b"sd:/arm9loaderhax.bin");
        assert_eq!(args.argv()[1].to_bytes_with_nul(), b"26\0");
    }

    #[test]
    fn test_capacity_limit() {
        let fits = "p".repeat(ARG_CAPACITY - 1);
        let args = LaunchArgs::new(&ConfigEntry::new(fits.as_str(), 0, Buttons::A)).unwrap();
        assert_eq!(args.payload().len(), ARG_CAPACITY - 1);
        assert_eq!(args.payload_cstr().to_bytes_with_nul().len(), ARG_CAPACITY);

        let too_long = "p".repeat(ARG_CAPACITY);
        assert_eq!(
            LaunchArgs::new(&ConfigEntry::new(too_long, 0, Buttons::A)).unwrap_err(),
            LaunchError::PayloadTooLong { len: ARG_CAPACITY }
        );
    }

    #[test]
    fn test_max_offset() {
        let entry = ConfigEntry::new("x", usize::MAX, Buttons::empty());
        let args = LaunchArgs::new(&entry).unwrap();
        assert_eq!(args.offset(), usize::MAX.to_string());
    }

    #[test]
    fn test_interior_nul() {
        let entry = ConfigEntry::new("a\0b", 0, Buttons::empty());
        assert_eq!(
            LaunchArgs::new(&entry).unwrap_err(),
            LaunchError::InteriorNul
        );
    }
}
