//! Fixed-width records.
//!
//! A record is whatever the kernel side passes to `bpf_seq_write()` in one
//! go. Its layout is a foreign C ABI; the iterators in this crate never look
//! inside, they only guarantee that a record handed out consists of exactly
//! [`Record::SIZE`] bytes taken verbatim from the stream.
//!
//! Field access is explicit: each record type declares its field offsets and
//! reads them with the helpers below. Fields are in native byte order, since
//! the producer is the kernel of the very host we run on.

use core::fmt;
use core::marker::PhantomData;

use crate::name::decode_name;

/// A fixed-width record produced by an eBPF iterator.
pub trait Record: Sized {
    /// Width of one record in bytes, as written by the kernel side.
    const SIZE: usize;

    /// Decode a record from exactly [`Record::SIZE`] bytes.
    fn decode(bytes: &[u8]) -> Self;
}

/// Read a native-endian `i32` at `offset`.
#[inline]
pub fn read_i32(bytes: &[u8], offset: usize) -> i32 {
    let mut raw = [0u8; 4];
    raw.copy_from_slice(&bytes[offset..offset + 4]);
    i32::from_ne_bytes(raw)
}

/// Read a native-endian `u32` at `offset`.
#[inline]
pub fn read_u32(bytes: &[u8], offset: usize) -> u32 {
    let mut raw = [0u8; 4];
    raw.copy_from_slice(&bytes[offset..offset + 4]);
    u32::from_ne_bytes(raw)
}

/// Read a native-endian `u64` at `offset`.
#[inline]
pub fn read_u64(bytes: &[u8], offset: usize) -> u64 {
    let mut raw = [0u8; 8];
    raw.copy_from_slice(&bytes[offset..offset + 8]);
    u64::from_ne_bytes(raw)
}

/// Copy the fixed-width byte array of `N` bytes at `offset`.
#[inline]
pub fn read_array<const N: usize>(bytes: &[u8], offset: usize) -> [u8; N] {
    let mut raw = [0u8; N];
    raw.copy_from_slice(&bytes[offset..offset + N]);
    raw
}

/// Borrowed view onto a record inside a reused read buffer.
///
/// Only valid until the iterator that produced it is pulled again. Use
/// [`RecordRef::to_record`] to keep a record around.
pub struct RecordRef<'a, R> {
    bytes: &'a [u8],
    _record: PhantomData<fn() -> R>,
}

impl<'a, R: Record> RecordRef<'a, R> {
    pub(crate) fn new(bytes: &'a [u8]) -> Self {
        debug_assert_eq!(bytes.len(), R::SIZE);
        Self { bytes, _record: PhantomData }
    }

    /// The raw record bytes.
    #[inline]
    pub fn bytes(&self) -> &'a [u8] {
        self.bytes
    }

    #[inline]
    pub fn read_i32(&self, offset: usize) -> i32 {
        read_i32(self.bytes, offset)
    }

    #[inline]
    pub fn read_u32(&self, offset: usize) -> u32 {
        read_u32(self.bytes, offset)
    }

    #[inline]
    pub fn read_u64(&self, offset: usize) -> u64 {
        read_u64(self.bytes, offset)
    }

    /// Decode the fixed-width name field of `len` bytes at `offset`.
    pub fn read_name(&self, offset: usize, len: usize) -> String {
        decode_name(&self.bytes[offset..offset + len])
    }

    /// Copy the record out of the shared buffer.
    pub fn to_record(&self) -> R {
        R::decode(self.bytes)
    }
}

impl<R> fmt::Debug for RecordRef<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordRef").field("bytes", &self.bytes).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Pair {
        a: i32,
        b: u32,
    }

    impl Record for Pair {
        const SIZE: usize = 8;

        fn decode(bytes: &[u8]) -> Self {
            Pair { a: read_i32(bytes, 0), b: read_u32(bytes, 4) }
        }
    }

    fn pair_bytes(a: i32, b: u32) -> Vec<u8> {
        let mut v = a.to_ne_bytes().to_vec();
        v.extend_from_slice(&b.to_ne_bytes());
        v
    }

    #[test]
    fn test_field_readers() {
        let bytes = pair_bytes(-1, 0xdead_beef);
        assert_eq!(read_i32(&bytes, 0), -1);
        assert_eq!(read_u32(&bytes, 4), 0xdead_beef);
        assert_eq!(read_array::<2>(&bytes, 0), [0xff, 0xff]);
        assert_eq!(read_u64(&7u64.to_ne_bytes(), 0), 7);
    }

    #[test]
    fn test_record_ref_copies_out() {
        let bytes = pair_bytes(42, 7);
        let view = RecordRef::<Pair>::new(&bytes);
        assert_eq!(view.read_i32(0), 42);
        assert_eq!(view.to_record(), Pair { a: 42, b: 7 });
        assert_eq!(view.bytes().len(), Pair::SIZE);
    }

    #[test]
    fn test_record_ref_name() {
        let bytes = *b"ab\0zz\0\0\0";
        let view = RecordRef::<Pair>::new(&bytes);
        assert_eq!(view.read_name(0, 8), "ab");
        assert_eq!(view.read_name(3, 2), "zz");
    }
}
