//! UTF-16 string field of the native settings record.

use std::fmt;
use std::mem;
use std::ptr;
use std::slice;

/// `u16` units in front of the text that hold its length.
const HEADER_UNITS: usize = mem::size_of::<usize>() / mem::size_of::<u16>();

fn encode_header(length: usize) -> [u16; HEADER_UNITS] {
    let bytes = length.to_ne_bytes();
    let mut header = [0u16; HEADER_UNITS];
    for (unit, pair) in header.iter_mut().zip(bytes.chunks_exact(2)) {
        *unit = u16::from_ne_bytes([pair[0], pair[1]]);
    }
    header
}

fn decode_header(header: &[u16]) -> usize {
    let mut bytes = [0u8; mem::size_of::<usize>()];
    for (pair, unit) in bytes.chunks_exact_mut(2).zip(header) {
        pair.copy_from_slice(&unit.to_ne_bytes());
    }
    usize::from_ne_bytes(bytes)
}

/// Releases a buffer allocated by [`NativeString::new`].
///
/// Only the text pointer is passed, as `cef_string_utf16_t::dtor` does. The
/// allocation is `[length header][text][NUL]`, so the length is read back
/// from the header and interior NULs are preserved.
unsafe extern "C" fn release_utf16(str_: *mut u16) {
    if str_.is_null() {
        return;
    }
    let base = str_.sub(HEADER_UNITS);
    let length = decode_header(slice::from_raw_parts(base, HEADER_UNITS));
    drop(Box::from_raw(ptr::slice_from_raw_parts_mut(
        base,
        HEADER_UNITS + length + 1,
    )));
}

/// Owned UTF-16 string with the `cef_string_utf16_t` layout:
/// `{ char16_t* str; size_t length; void (*dtor)(char16_t*); }`.
///
/// The text is NUL-terminated. An empty string has a null pointer and no
/// destructor.
#[repr(C)]
pub struct NativeString {
    str_: *mut u16,
    length: usize,
    dtor: Option<unsafe extern "C" fn(*mut u16)>,
}

impl NativeString {
    pub const fn empty() -> Self {
        Self {
            str_: ptr::null_mut(),
            length: 0,
            dtor: None,
        }
    }

    /// Encodes `value` into a freshly allocated NUL-terminated buffer.
    pub fn new(value: &str) -> Self {
        if value.is_empty() {
            return Self::empty();
        }

        let mut buffer: Vec<u16> = Vec::with_capacity(HEADER_UNITS + value.len() + 1);
        buffer.extend_from_slice(&[0; HEADER_UNITS]);
        buffer.extend(value.encode_utf16());
        let length = buffer.len() - HEADER_UNITS;
        buffer[..HEADER_UNITS].copy_from_slice(&encode_header(length));
        buffer.push(0);

        let base = Box::into_raw(buffer.into_boxed_slice()) as *mut u16;
        // SAFETY: the allocation holds HEADER_UNITS + length + 1 units.
        let str_ = unsafe { base.add(HEADER_UNITS) };

        Self {
            str_,
            length,
            dtor: Some(release_utf16),
        }
    }

    /// Replaces the contents, releasing the previous buffer.
    pub fn assign(&mut self, value: &str) {
        *self = Self::new(value);
    }

    /// Decodes the contents. A null buffer decodes to `""`.
    pub fn decode(&self) -> String {
        String::from_utf16_lossy(self.as_utf16())
    }

    pub fn as_utf16(&self) -> &[u16] {
        if self.str_.is_null() {
            &[]
        } else {
            // SAFETY: str_ points at `length + 1` initialized units owned by self.
            unsafe { slice::from_raw_parts(self.str_, self.length) }
        }
    }

    pub fn as_ptr(&self) -> *const u16 {
        self.str_
    }

    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    pub fn clear(&mut self) {
        if let Some(dtor) = self.dtor.take() {
            // SAFETY: dtor was installed together with str_ by `new`.
            unsafe { dtor(self.str_) };
        }
        self.str_ = ptr::null_mut();
        self.length = 0;
    }
}

impl Default for NativeString {
    fn default() -> Self {
        Self::empty()
    }
}

impl Drop for NativeString {
    fn drop(&mut self) {
        self.clear();
    }
}

impl Clone for NativeString {
    fn clone(&self) -> Self {
        Self::new(&self.decode())
    }
}

impl From<&str> for NativeString {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl PartialEq<str> for NativeString {
    fn eq(&self, other: &str) -> bool {
        self.as_utf16().iter().copied().eq(other.encode_utf16())
    }
}

impl fmt::Debug for NativeString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.decode(), f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_string_has_null_buffer() {
        let s = NativeString::new("");
        assert!(s.as_ptr().is_null());
        assert!(s.is_empty());
        assert_eq!(s.decode(), "");
    }

    #[test]
    fn test_round_trip_non_ascii() {
        for value in ["cache", "Ünïcödé", "日本語", "emoji 🦀", "nul\0inside"] {
            let s = NativeString::new(value);
            assert_eq!(s.decode(), value);
            assert!(s == *value);
        }
    }

    #[test]
    fn test_buffer_is_nul_terminated() {
        let s = NativeString::new("ab");
        assert_eq!(s.len(), 2);
        // SAFETY: the allocation holds len + 1 units.
        let terminator = unsafe { *s.as_ptr().add(s.len()) };
        assert_eq!(terminator, 0);
    }

    #[test]
    fn test_layout_matches_cef_string() {
        assert_eq!(mem::size_of::<NativeString>(), 3 * mem::size_of::<usize>());
        assert_eq!(mem::offset_of!(NativeString, str_), 0);
        assert_eq!(mem::offset_of!(NativeString, length), mem::size_of::<usize>());
        assert_eq!(mem::offset_of!(NativeString, dtor), 2 * mem::size_of::<usize>());
    }

    #[test]
    fn test_header_records_length() {
        for value in ["x", "nul\0inside", "日本語"] {
            let s = NativeString::new(value);
            // SAFETY: the header sits directly in front of the text.
            let header = unsafe { slice::from_raw_parts(s.as_ptr().sub(HEADER_UNITS), HEADER_UNITS) };
            assert_eq!(decode_header(header), s.len());
        }
        assert_eq!(decode_header(&encode_header(usize::MAX)), usize::MAX);
    }

    #[test]
    fn test_dtor_called_with_pointer_only() {
        let mut s = NativeString::new("released through the C destructor");
        let dtor = s.dtor.take().unwrap();
        // SAFETY: str_ was allocated by `new` and is released exactly once here.
        unsafe { dtor(s.str_) };
        s.str_ = ptr::null_mut();
        s.length = 0;
        assert_eq!(s.decode(), "");
    }

    #[test]
    fn test_assign_and_clear() {
        let mut s = NativeString::new("first");
        s.assign("second value");
        assert_eq!(s.decode(), "second value");
        s.clear();
        assert!(s.as_ptr().is_null());
        s.clear();
        assert_eq!(s.decode(), "");
    }
}
