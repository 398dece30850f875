use std::fs::File;
use std::io;
use std::os::unix::io::AsRawFd;
use std::ptr;

use crate::record::RECORD_SIZE;

/// Mapping access mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    ReadOnly,
    ReadWriteShared,
}

impl Access {
    fn prot(self) -> libc::c_int {
        match self {
            Access::ReadOnly => libc::PROT_READ,
            Access::ReadWriteShared => libc::PROT_READ | libc::PROT_WRITE,
        }
    }
}

/// A page-aligned mapping of `[byte_offset, byte_offset + byte_length)`
/// of some file. `user_ptr`/`user_len` address exactly the requested
/// range; `raw_base`/`raw_len` are the page-aligned mapping underneath,
/// kept only so `Drop` can release the right bytes.
///
/// A zero-length request produces a sentinel mapping (null pointer, zero
/// raw length) that is safe to read as an empty slice and safe to drop.
pub struct PageMapping {
    user_ptr: *mut u8,
    user_len: usize,
    raw_base: *mut libc::c_void,
    raw_len: usize,
}

// SAFETY: the mapping is `MAP_SHARED` and this type does not expose
// interior mutability beyond what `&mut self` already requires; moving
// it across threads is sound, it is just never done (the sort is
// single-threaded, per spec).
unsafe impl Send for PageMapping {}

impl PageMapping {
    /// Map `byte_length` bytes of `file` starting at `byte_offset`.
    pub fn map(file: &File, byte_offset: u64, byte_length: usize, access: Access) -> io::Result<Self> {
        if byte_length == 0 {
            return Ok(PageMapping {
                user_ptr: ptr::null_mut(),
                user_len: 0,
                raw_base: ptr::null_mut(),
                raw_len: 0,
            });
        }

        let page_size = page_size() as u64;
        let aligned_offset = (byte_offset / page_size) * page_size;
        let diff = (byte_offset - aligned_offset) as usize;
        let raw_len = byte_length + diff;

        // SAFETY: `aligned_offset` is a multiple of the page size by
        // construction; `raw_len` covers at least `diff + byte_length`
        // bytes from there, so the requested range lies fully inside the
        // mapping. `file` outlives the call (borrowed for its duration);
        // the returned mapping does not borrow `file` further because
        // `mmap` keeps the mapping alive independent of the fd after
        // return.
        let raw_base = unsafe {
            libc::mmap(
                ptr::null_mut(),
                raw_len,
                access.prot(),
                libc::MAP_SHARED,
                file.as_raw_fd(),
                aligned_offset as libc::off_t,
            )
        };

        if raw_base == libc::MAP_FAILED {
            return Err(io::Error::last_os_error());
        }

        // SAFETY: `diff < page_size <= raw_len`, so this stays within
        // the mapping just created.
        let user_ptr = unsafe { (raw_base as *mut u8).add(diff) };

        Ok(PageMapping {
            user_ptr,
            user_len: byte_length,
            raw_base,
            raw_len,
        })
    }

    /// The mapped range as bytes.
    pub fn as_bytes(&self) -> &[u8] {
        if self.user_len == 0 {
            return &[];
        }
        // SAFETY: `user_ptr` addresses `user_len` live, mapped bytes for
        // the lifetime of `self`.
        unsafe { std::slice::from_raw_parts(self.user_ptr, self.user_len) }
    }

    /// The mapped range as mutable bytes. Caller must have requested
    /// `Access::ReadWriteShared`.
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        if self.user_len == 0 {
            return &mut [];
        }
        // SAFETY: see `as_bytes`; `&mut self` ensures exclusive access
        // through this handle.
        unsafe { std::slice::from_raw_parts_mut(self.user_ptr, self.user_len) }
    }

    /// The mapped range reinterpreted as native-endian records.
    ///
    /// Every caller maps a byte range whose offset and length are whole
    /// multiples of [`RECORD_SIZE`] (record-unit offsets are always
    /// multiplied by 8 before reaching `map`), and the page size is
    /// itself a multiple of 8, so `user_ptr` is 8-byte aligned.
    pub fn as_records(&self) -> &[i64] {
        debug_assert_eq!(self.user_len % RECORD_SIZE, 0);
        if self.user_len == 0 {
            return &[];
        }
        // SAFETY: alignment and length invariants documented above;
        // `i64` has no padding/niche and any bit pattern is valid.
        unsafe { std::slice::from_raw_parts(self.user_ptr as *const i64, self.user_len / RECORD_SIZE) }
    }

    /// Mutable record view; see [`PageMapping::as_records`].
    pub fn as_records_mut(&mut self) -> &mut [i64] {
        debug_assert_eq!(self.user_len % RECORD_SIZE, 0);
        if self.user_len == 0 {
            return &mut [];
        }
        // SAFETY: see `as_records`.
        unsafe { std::slice::from_raw_parts_mut(self.user_ptr as *mut i64, self.user_len / RECORD_SIZE) }
    }

    /// Number of user-visible bytes this mapping addresses.
    pub fn len(&self) -> usize {
        self.user_len
    }

    pub fn is_empty(&self) -> bool {
        self.user_len == 0
    }
}

impl Drop for PageMapping {
    fn drop(&mut self) {
        if self.raw_len > 0 {
            // SAFETY: `raw_base`/`raw_len` are exactly the values
            // returned by the `mmap` call that created this mapping and
            // have not been mapped again since.
            unsafe {
                libc::munmap(self.raw_base, self.raw_len);
            }
        }
    }
}

/// System page size, falling back to 4096 if the query fails.
pub(crate) fn page_size() -> usize {
    // SAFETY: `sysconf` with a well-known name is always safe to call.
    let ps = unsafe { libc::sysconf(libc::_SC_PAGE_SIZE) };
    if ps < 1 { 4096 } else { ps as usize }
}
