//! VOX chunk framing and decoding.
//!
//! ## Layout
//!
//! ```text
//! "VOX " (4 bytes) | version (i32 LE)
//! chunk*:
//!   id (4 bytes) | content size (i32 LE) | children size (i32 LE) | content
//! ```
//!
//! Children are plain sibling chunks, so the `MAIN` wrapper decodes as an
//! unknown zero-length chunk. Recognized chunks are decoded field by field
//! straight from the stream; only unknown chunks use the declared content
//! size, which is trusted as is.

use std::borrow::Cow;
use std::io::{self, Read};

use crate::error::{VoxError, VoxResult};
use crate::graph::Dict;

/// File magic.
pub const VOX_MAGIC: [u8; 4] = *b"VOX ";

/// Upper bound on speculative pre-allocation from declared counts.
const MAX_PREALLOC: usize = 1 << 16;

/// Number of colors stored in an `RGBA` chunk (indices 1..=255).
pub const RGBA_ENTRIES: usize = 255;

/// Decoded `nTRN` payload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransformChunk {
    /// Node id.
    pub id: i32,
    /// Node attributes.
    pub attributes: Dict,
    /// Child node id.
    pub child_id: i32,
    /// Reserved id.
    pub reserved_id: i32,
    /// Layer id.
    pub layer_id: i32,
    /// Per-frame attributes.
    pub frames: Vec<Dict>,
}

/// Decoded `nGRP` payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupChunk {
    /// Node id.
    pub id: i32,
    /// Node attributes.
    pub attributes: Dict,
    /// Child ids; slots after a failed read stay 0. Padding stops at
    /// 65536 slots, so a short list declaring more children is kept that
    /// long.
    pub child_ids: Vec<i32>,
}

/// Decoded `nSHP` payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShapeChunk {
    /// Node id.
    pub id: i32,
    /// Node attributes.
    pub attributes: Dict,
    /// `(shape id, model attributes)` entries.
    pub models: Vec<(i32, Dict)>,
}

/// One decoded chunk.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneChunk {
    /// `SIZE`: declared model extents.
    Size([i32; 3]),
    /// `XYZI`: raw `[x, y, z, color]` records.
    Xyzi(Vec<[u8; 4]>),
    /// `RGBA`: colors for indices 1..=255, canonical `0xRRGGBBAA`.
    Rgba(Vec<u32>),
    /// `MATL`: material id and its dictionary.
    Matl {
        /// Material id (palette index).
        id: i32,
        /// Material properties.
        properties: Dict,
    },
    /// `nTRN`.
    Transform(TransformChunk),
    /// `nGRP`.
    Group(GroupChunk),
    /// `nSHP`.
    Shape(ShapeChunk),
    /// Anything else; its content was skipped.
    Unknown {
        /// Chunk id.
        id: [u8; 4],
        /// Bytes skipped.
        skipped: u64,
    },
}

impl SceneChunk {
    /// Four-character name for logging.
    #[must_use]
    pub fn name(&self) -> Cow<'_, str> {
        match self {
            Self::Size(_) => Cow::Borrowed("SIZE"),
            Self::Xyzi(_) => Cow::Borrowed("XYZI"),
            Self::Rgba(_) => Cow::Borrowed("RGBA"),
            Self::Matl { .. } => Cow::Borrowed("MATL"),
            Self::Transform(_) => Cow::Borrowed("nTRN"),
            Self::Group(_) => Cow::Borrowed("nGRP"),
            Self::Shape(_) => Cow::Borrowed("nSHP"),
            Self::Unknown { id, .. } => String::from_utf8_lossy(id),
        }
    }
}

fn truncated(e: io::Error) -> VoxError {
    VoxError::TruncatedStream(e)
}

/// Streaming chunk decoder.
pub struct ChunkReader<R> {
    inner: R,
}

impl<R: Read> ChunkReader<R> {
    /// Wraps a byte stream positioned at the start of the file.
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    /// Reads and checks the magic, then returns the version.
    ///
    /// # Errors
    ///
    /// `BadMagic` on a signature mismatch, `TruncatedStream` if the header
    /// is cut short.
    pub fn read_header(&mut self) -> VoxResult<i32> {
        let mut magic = [0u8; 4];
        self.inner.read_exact(&mut magic).map_err(truncated)?;
        if magic != VOX_MAGIC {
            return Err(VoxError::BadMagic { found: magic });
        }
        self.read_i32()
    }

    /// Decodes the next chunk, or `None` at a clean end of stream.
    ///
    /// # Errors
    ///
    /// `TruncatedStream` if the stream ends or fails inside a chunk.
    pub fn next_chunk(&mut self) -> VoxResult<Option<SceneChunk>> {
        let Some(id) = self.read_chunk_id()? else {
            return Ok(None);
        };
        let content_size = self.read_i32()?;
        let _children_size = self.read_i32()?;

        let chunk = match &id {
            b"SIZE" => SceneChunk::Size([self.read_i32()?, self.read_i32()?, self.read_i32()?]),
            b"XYZI" => self.read_xyzi()?,
            b"RGBA" => self.read_rgba()?,
            b"MATL" => SceneChunk::Matl {
                id: self.read_i32()?,
                properties: self.read_dict()?,
            },
            b"nTRN" => self.read_transform()?,
            b"nGRP" => self.read_group()?,
            b"nSHP" => self.read_shape()?,
            _ => {
                let skipped = u64::try_from(content_size).unwrap_or(0);
                self.skip(skipped)?;
                SceneChunk::Unknown { id, skipped }
            }
        };
        Ok(Some(chunk))
    }

    fn read_xyzi(&mut self) -> VoxResult<SceneChunk> {
        let count = self.read_count()?;
        let mut records = Vec::with_capacity(count.min(MAX_PREALLOC));
        for _ in 0..count {
            let mut record = [0u8; 4];
            self.inner.read_exact(&mut record).map_err(truncated)?;
            records.push(record);
        }
        Ok(SceneChunk::Xyzi(records))
    }

    fn read_rgba(&mut self) -> VoxResult<SceneChunk> {
        let mut colors = Vec::with_capacity(RGBA_ENTRIES);
        for _ in 0..RGBA_ENTRIES {
            let mut raw = [0u8; 4];
            self.inner.read_exact(&mut raw).map_err(truncated)?;
            // Stored byte-reversed relative to 0xRRGGBBAA.
            colors.push(u32::from_be_bytes(raw));
        }
        // Trailing reserved entry.
        let _ = self.read_i32()?;
        Ok(SceneChunk::Rgba(colors))
    }

    fn read_transform(&mut self) -> VoxResult<SceneChunk> {
        let id = self.read_i32()?;
        let attributes = self.read_dict()?;
        let child_id = self.read_i32()?;
        let reserved_id = self.read_i32()?;
        let layer_id = self.read_i32()?;
        let frame_count = self.read_count()?;
        let mut frames = Vec::with_capacity(frame_count.min(MAX_PREALLOC));
        for _ in 0..frame_count {
            frames.push(self.read_dict()?);
        }
        Ok(SceneChunk::Transform(TransformChunk {
            id,
            attributes,
            child_id,
            reserved_id,
            layer_id,
            frames,
        }))
    }

    fn read_group(&mut self) -> VoxResult<SceneChunk> {
        let id = self.read_i32()?;
        let attributes = self.read_dict()?;
        let count = self.read_count()?;
        let mut child_ids = Vec::with_capacity(count.min(MAX_PREALLOC));
        for _ in 0..count {
            match self.read_i32() {
                Ok(child) => child_ids.push(child),
                Err(e) => {
                    tracing::debug!("nGRP {} cut short after {} children: {}", id, child_ids.len(), e);
                    break;
                }
            }
        }
        // Zero-pad a short list, up to the prealloc bound.
        child_ids.resize(count.min(MAX_PREALLOC).max(child_ids.len()), 0);
        Ok(SceneChunk::Group(GroupChunk {
            id,
            attributes,
            child_ids,
        }))
    }

    fn read_shape(&mut self) -> VoxResult<SceneChunk> {
        let id = self.read_i32()?;
        let attributes = self.read_dict()?;
        let count = self.read_count()?;
        let mut models = Vec::with_capacity(count.min(MAX_PREALLOC));
        for _ in 0..count {
            let shape_id = self.read_i32()?;
            models.push((shape_id, self.read_dict()?));
        }
        Ok(SceneChunk::Shape(ShapeChunk {
            id,
            attributes,
            models,
        }))
    }

    /// Reads a chunk id; `None` if the stream ends before its first byte.
    fn read_chunk_id(&mut self) -> VoxResult<Option<[u8; 4]>> {
        let mut id = [0u8; 4];
        let mut filled = 0;
        while filled < id.len() {
            match self.inner.read(&mut id[filled..]) {
                Ok(0) if filled == 0 => return Ok(None),
                Ok(0) => {
                    return Err(truncated(io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        "stream ended inside a chunk id",
                    )))
                }
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(truncated(e)),
            }
        }
        Ok(Some(id))
    }

    fn read_i32(&mut self) -> VoxResult<i32> {
        let mut buf = [0u8; 4];
        self.inner.read_exact(&mut buf).map_err(truncated)?;
        Ok(i32::from_le_bytes(buf))
    }

    /// Reads an i32 count; negative counts read as zero.
    fn read_count(&mut self) -> VoxResult<usize> {
        Ok(usize::try_from(self.read_i32()?).unwrap_or(0))
    }

    fn read_string(&mut self) -> VoxResult<String> {
        let len = self.read_count()?;
        let mut bytes = Vec::with_capacity(len.min(MAX_PREALLOC));
        let read = (&mut self.inner)
            .take(len as u64)
            .read_to_end(&mut bytes)
            .map_err(truncated)?;
        if read < len {
            return Err(truncated(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "stream ended inside a string",
            )));
        }
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    fn read_dict(&mut self) -> VoxResult<Dict> {
        let count = self.read_count()?;
        let mut pairs = Vec::with_capacity(count.min(MAX_PREALLOC));
        for _ in 0..count {
            let key = self.read_string()?;
            let value = self.read_string()?;
            pairs.push((key, value));
        }
        Ok(Dict(pairs))
    }

    fn skip(&mut self, len: u64) -> VoxResult<()> {
        let copied = io::copy(&mut (&mut self.inner).take(len), &mut io::sink()).map_err(truncated)?;
        if copied < len {
            return Err(truncated(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "stream ended inside a skipped chunk",
            )));
        }
        Ok(())
    }
}
