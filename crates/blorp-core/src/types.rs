//! # BLORP Core Types
//!
//! Strongly typed GPU addresses, sizes, handles and buffer objects.

use core::fmt;

use static_assertions::assert_eq_size;

// =============================================================================
// GPU ADDRESS
// =============================================================================

/// Graphics address of a buffer object as last seen by the kernel.
///
/// Not a CPU pointer. Values written into batch words are only a guess
/// ("presumed offset"); the relocation list lets the kernel patch them.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(transparent)]
pub struct GpuAddr(u64);

assert_eq_size!(GpuAddr, u64);

impl GpuAddr {
    /// Create a new GPU address
    #[inline]
    pub const fn new(addr: u64) -> Self {
        Self(addr)
    }

    /// Get the raw u64 value
    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// Low 32 bits, the width of every Gen6 address field
    #[inline]
    pub const fn low32(self) -> u32 {
        self.0 as u32
    }

    /// Offset by bytes
    #[inline]
    pub const fn offset(self, bytes: u64) -> Self {
        Self(self.0.wrapping_add(bytes))
    }
}

impl fmt::Debug for GpuAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GpuAddr(0x{:016x})", self.0)
    }
}

impl fmt::Display for GpuAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:016x}", self.0)
    }
}

// =============================================================================
// SIZE TYPES
// =============================================================================

/// Size in bytes
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(transparent)]
pub struct ByteSize(u64);

impl ByteSize {
    /// 4 KiB
    pub const KIB_4: Self = Self(4 * 1024);

    /// Create from bytes
    #[inline]
    pub const fn from_bytes(bytes: u64) -> Self {
        Self(bytes)
    }

    /// Create from KiB
    #[inline]
    pub const fn from_kib(kib: u64) -> Self {
        Self(kib * 1024)
    }

    /// Get as bytes
    #[inline]
    pub const fn as_bytes(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for ByteSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 >= 1024 * 1024 {
            write!(f, "{} MiB", self.0 / (1024 * 1024))
        } else if self.0 >= 1024 {
            write!(f, "{} KiB", self.0 / 1024)
        } else {
            write!(f, "{} B", self.0)
        }
    }
}

impl fmt::Display for ByteSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

// =============================================================================
// HANDLE TYPES
// =============================================================================

/// Opaque handle to a GPU resource
///
/// Handles are type-safe wrappers that prevent mixing different resource types.
#[repr(transparent)]
pub struct Handle<T> {
    id: u64,
    _marker: core::marker::PhantomData<T>,
}

impl<T> Handle<T> {
    /// Create a new handle
    #[inline]
    pub const fn new(id: u64) -> Self {
        Self {
            id,
            _marker: core::marker::PhantomData,
        }
    }

    /// Get the raw ID
    #[inline]
    pub const fn id(self) -> u64 {
        self.id
    }
}

// Manual impls: derives would put bounds on the marker type.
impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Handle<T> {}

impl<T> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Eq for Handle<T> {}

impl<T> core::hash::Hash for Handle<T> {
    fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Handle<{}>(0x{:x})",
            core::any::type_name::<T>(),
            self.id
        )
    }
}

// =============================================================================
// BUFFER OBJECT
// =============================================================================

/// Buffer object ID
pub type BufferId = Handle<BufferObject>;

/// A kernel buffer object referenced from a batch
///
/// Only the identity and the presumed address matter to emission; backing
/// storage is owned elsewhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferObject {
    /// Unique ID
    id: BufferId,
    /// Presumed graphics address
    presumed: GpuAddr,
    /// Size
    size: ByteSize,
    /// Debug name
    name: &'static str,
}

impl BufferObject {
    /// Describe a buffer object
    pub const fn new(id: u64, presumed: GpuAddr, size: ByteSize, name: &'static str) -> Self {
        Self {
            id: BufferId::new(id),
            presumed,
            size,
            name,
        }
    }

    /// Get buffer ID
    pub fn id(&self) -> BufferId {
        self.id
    }

    /// Get presumed GPU address
    pub fn presumed(&self) -> GpuAddr {
        self.presumed
    }

    /// Get size
    pub fn size(&self) -> ByteSize {
        self.size
    }

    /// Get debug name
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Word to write into a pointer field referencing `delta` bytes in
    pub fn presumed_word(&self, delta: u32) -> u32 {
        self.presumed.offset(delta as u64).low32()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presumed_word_wraps_to_low_bits() {
        let bo = BufferObject::new(3, GpuAddr::new(0x1_0000_1000), ByteSize::KIB_4, "rt");
        assert_eq!(bo.presumed_word(0x20), 0x0000_1020);
    }

    #[test]
    fn test_handles_compare_by_id() {
        let a = BufferId::new(9);
        let b = BufferId::new(9);
        assert_eq!(a, b);
        assert_ne!(a, BufferId::new(10));
    }
}
