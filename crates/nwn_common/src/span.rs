//! Read-only byte spans and offset-addressed reads
//!
//! Every format in this workspace is a header followed by flat record tables that point into
//! shared data blocks. [`DataBlock`] is the single read-only view those formats decode from,
//! whatever keeps the bytes alive, and [`OffsetReader`] performs the bounds-checked record and
//! slice reads at byte offsets.

use binrw::{BinRead, Endian};
use byteorder::{ByteOrder, LittleEndian};
use memmap2::Mmap;
use std::{
    fmt::{self, Debug},
    fs::File,
    io::{self, Cursor},
    ops::{Deref, Range},
    sync::Arc,
};
use tracing::instrument;

use crate::error::{Result, SpanError};

/// Records with a fixed on-disk size
///
/// Used to bounds-check a whole table before any record of it is decoded.
pub trait FixedSize {
    /// Size of the record in bytes
    const SIZE: usize;
}

impl FixedSize for u8 {
    const SIZE: usize = 1;
}

impl FixedSize for u16 {
    const SIZE: usize = 2;
}

impl FixedSize for u32 {
    const SIZE: usize = 4;
}

impl FixedSize for i32 {
    const SIZE: usize = 4;
}

/// Which storage keeps the bytes of a [`DataBlock`] alive
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Storage {
    /// The caller owns the buffer and the block borrows it
    Borrowed,
    /// The block owns (a shared reference to) a heap buffer
    Owned,
    /// The block shares a read-only memory mapping of a file
    Mapped,
}

#[derive(Clone)]
enum Backing<'a> {
    Borrowed(&'a [u8]),
    Owned(Arc<[u8]>),
    Mapped(Arc<Mmap>),
}

impl Backing<'_> {
    fn bytes(&self) -> &[u8] {
        match self {
            Backing::Borrowed(bytes) => bytes,
            Backing::Owned(bytes) => bytes,
            Backing::Mapped(map) => map,
        }
    }
}

/// A read-only span of bytes
///
/// The decoders only ever see `&[u8]` through [`Deref`]; the backing decides the lifetime:
///
/// ```
/// use nwn_common::DataBlock;
///
/// let bytes = vec![1u8, 2, 3, 4];
///
/// // Borrow a buffer the caller keeps alive
/// let borrowed = DataBlock::from(bytes.as_slice());
///
/// // Or hand over ownership
/// let owned = DataBlock::from(bytes.clone());
///
/// assert_eq!(&*borrowed, &*owned);
///
/// // Sub-views share the backing instead of copying
/// let tail = owned.slice(2, 2).unwrap();
/// assert_eq!(&*tail, &[3, 4]);
/// ```
#[derive(Clone)]
pub struct DataBlock<'a> {
    backing: Backing<'a>,
    range: Range<usize>,
}

impl<'a> DataBlock<'a> {
    /// A block with no bytes
    pub const fn empty() -> DataBlock<'static> {
        DataBlock {
            backing: Backing::Borrowed(&[]),
            range: 0..0,
        }
    }

    /// Borrow a buffer owned by the caller
    pub fn borrowed(bytes: &'a [u8]) -> DataBlock<'a> {
        DataBlock {
            range: 0..bytes.len(),
            backing: Backing::Borrowed(bytes),
        }
    }

    /// Take ownership of a buffer
    pub fn owned(bytes: impl Into<Arc<[u8]>>) -> DataBlock<'static> {
        let bytes = bytes.into();
        DataBlock {
            range: 0..bytes.len(),
            backing: Backing::Owned(bytes),
        }
    }

    /// Map an open file read-only
    ///
    /// The mapping stays alive for as long as any block (or sub-block) created from it.
    #[instrument(err)]
    pub fn map(file: &File) -> io::Result<DataBlock<'static>> {
        // SAFETY: the mapping is only ever read through shared slices. Truncating or rewriting
        // the file from another process while it is mapped is outside of what we can guard.
        let map = unsafe { Mmap::map(file)? };
        Ok(DataBlock {
            range: 0..map.len(),
            backing: Backing::Mapped(Arc::new(map)),
        })
    }

    /// Which storage keeps these bytes alive
    pub fn storage(&self) -> Storage {
        match self.backing {
            Backing::Borrowed(_) => Storage::Borrowed,
            Backing::Owned(_) => Storage::Owned,
            Backing::Mapped(_) => Storage::Mapped,
        }
    }

    /// The viewed bytes
    pub fn as_slice(&self) -> &[u8] {
        &self.backing.bytes()[self.range.clone()]
    }

    /// An offset reader over the viewed bytes
    pub fn reader(&self) -> OffsetReader<'_> {
        OffsetReader::new(self.as_slice())
    }

    /// A view of `len` bytes starting at `offset` (relative to this block)
    ///
    /// The returned block shares the backing storage, nothing is copied.
    pub fn slice(&self, offset: usize, len: usize) -> Result<DataBlock<'a>> {
        let available = self.range.len();
        let end = offset
            .checked_add(len)
            .filter(|end| *end <= available)
            .ok_or(SpanError::OutOfBounds {
                offset,
                len,
                available,
            })?;

        Ok(DataBlock {
            backing: self.backing.clone(),
            range: self.range.start + offset..self.range.start + end,
        })
    }

    /// A view of everything from `offset` to the end of this block
    pub fn slice_from(&self, offset: usize) -> Result<DataBlock<'a>> {
        self.slice(offset, self.range.len().saturating_sub(offset))
    }

    /// Detach from the lifetime of a borrowed buffer
    ///
    /// Owned and mapped blocks keep sharing their storage; borrowed blocks copy the viewed bytes.
    pub fn into_owned(self) -> DataBlock<'static> {
        match self.backing {
            Backing::Borrowed(bytes) => DataBlock::owned(&bytes[self.range]),
            Backing::Owned(bytes) => DataBlock {
                backing: Backing::Owned(bytes),
                range: self.range,
            },
            Backing::Mapped(map) => DataBlock {
                backing: Backing::Mapped(map),
                range: self.range,
            },
        }
    }
}

impl Deref for DataBlock<'_> {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.as_slice()
    }
}

impl AsRef<[u8]> for DataBlock<'_> {
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}

impl Default for DataBlock<'_> {
    fn default() -> Self {
        DataBlock::empty()
    }
}

impl Debug for DataBlock<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "DataBlock({:?}, {} bytes)", self.storage(), self.len())
    }
}

impl PartialEq for DataBlock<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl Eq for DataBlock<'_> {}

impl<'a> From<&'a [u8]> for DataBlock<'a> {
    fn from(value: &'a [u8]) -> Self {
        DataBlock::borrowed(value)
    }
}

impl<'a, const N: usize> From<&'a [u8; N]> for DataBlock<'a> {
    fn from(value: &'a [u8; N]) -> Self {
        DataBlock::borrowed(value)
    }
}

impl<'a> From<&'a Vec<u8>> for DataBlock<'a> {
    fn from(value: &'a Vec<u8>) -> Self {
        DataBlock::borrowed(value)
    }
}

impl From<Vec<u8>> for DataBlock<'static> {
    fn from(value: Vec<u8>) -> Self {
        DataBlock::owned(value)
    }
}

impl From<Mmap> for DataBlock<'static> {
    fn from(value: Mmap) -> Self {
        DataBlock {
            range: 0..value.len(),
            backing: Backing::Mapped(Arc::new(value)),
        }
    }
}

/// Bounds-checked reads at byte offsets of a buffer
///
/// Every read validates the whole requested range before touching it, so a corrupt offset or
/// count produces [`SpanError`] rather than reading past the end of the buffer.
#[derive(Debug, Copy, Clone)]
pub struct OffsetReader<'b> {
    bytes: &'b [u8],
}

impl<'b> OffsetReader<'b> {
    /// Create a reader over `bytes`
    pub const fn new(bytes: &'b [u8]) -> Self {
        Self { bytes }
    }

    /// Size of the underlying buffer
    pub const fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the underlying buffer is empty
    pub const fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Borrow `len` bytes starting at `offset`
    pub fn read_bytes(&self, offset: usize, len: usize) -> Result<&'b [u8]> {
        let available = self.bytes.len();
        let end = offset
            .checked_add(len)
            .filter(|end| *end <= available)
            .ok_or(SpanError::OutOfBounds {
                offset,
                len,
                available,
            })?;
        Ok(&self.bytes[offset..end])
    }

    /// Decode one little-endian record at `offset`
    pub fn read<T>(&self, offset: usize) -> Result<T>
    where
        T: FixedSize + for<'a> BinRead<Args<'a> = ()>,
    {
        let bytes = self.read_bytes(offset, T::SIZE)?;
        T::read_options(&mut Cursor::new(bytes), Endian::Little, ())
            .map_err(|source| SpanError::Record { offset, source })
    }

    /// Decode `count` consecutive little-endian records starting at `offset`
    pub fn read_array<T>(&self, offset: usize, count: usize) -> Result<Vec<T>>
    where
        T: FixedSize + for<'a> BinRead<Args<'a> = ()>,
    {
        let total = count.checked_mul(T::SIZE).ok_or(SpanError::Overflow {
            offset,
            count,
            size: T::SIZE,
        })?;
        let bytes = self.read_bytes(offset, total)?;

        let mut cursor = Cursor::new(bytes);
        (0..count)
            .map(|index| {
                T::read_options(&mut cursor, Endian::Little, ()).map_err(|source| {
                    SpanError::Record {
                        offset: offset + index * T::SIZE,
                        source,
                    }
                })
            })
            .collect()
    }

    /// Read a `u8` at `offset`
    pub fn read_u8(&self, offset: usize) -> Result<u8> {
        Ok(self.read_bytes(offset, 1)?[0])
    }

    /// Read a little-endian `u32` at `offset`
    pub fn read_u32(&self, offset: usize) -> Result<u32> {
        Ok(LittleEndian::read_u32(self.read_bytes(offset, 4)?))
    }

    /// Read a little-endian `i32` at `offset`
    pub fn read_i32(&self, offset: usize) -> Result<i32> {
        Ok(LittleEndian::read_i32(self.read_bytes(offset, 4)?))
    }

    /// Read a little-endian `u64` at `offset`
    pub fn read_u64(&self, offset: usize) -> Result<u64> {
        Ok(LittleEndian::read_u64(self.read_bytes(offset, 8)?))
    }

    /// Read a little-endian `i64` at `offset`
    pub fn read_i64(&self, offset: usize) -> Result<i64> {
        Ok(LittleEndian::read_i64(self.read_bytes(offset, 8)?))
    }

    /// Read a little-endian `f64` at `offset`
    pub fn read_f64(&self, offset: usize) -> Result<f64> {
        Ok(LittleEndian::read_f64(self.read_bytes(offset, 8)?))
    }

    /// Read a `u32` length prefix at `offset` followed by that many bytes
    ///
    /// Returns the payload and the offset just past it.
    pub fn read_sized_u32(&self, offset: usize) -> Result<(&'b [u8], usize)> {
        let len = self.read_u32(offset)? as usize;
        let start = offset + 4;
        let bytes = self.read_bytes(start, len)?;
        Ok((bytes, start + len))
    }
}
