//! Flat inner-product index over prompt vectors

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::domain::embedding::inner_product;
use crate::domain::DomainError;

const MAGIC: &[u8; 4] = b"SIDX";
const FORMAT_VERSION: u16 = 1;
const HEADER_LEN: usize = 4 + 2 + 4 + 8;

/// Best match returned by [`SemanticIndex::search`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndexMatch {
    /// Insertion position of the matching vector
    pub position: usize,
    /// Inner product between query and match
    pub score: f32,
}

/// Ordered collection of fixed-dimension vectors searched exhaustively by
/// inner product.
///
/// Vectors are stored contiguously in insertion order; position `i` is the
/// `i`-th vector ever added.
#[derive(Debug, Clone, PartialEq)]
pub struct SemanticIndex {
    dimensions: usize,
    data: Vec<f32>,
}

impl SemanticIndex {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions,
            data: Vec::new(),
        }
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Number of vectors in the index
    pub fn len(&self) -> usize {
        if self.dimensions == 0 {
            return 0;
        }

        self.data.len() / self.dimensions
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Append a vector, returning its position
    pub fn add(&mut self, vector: &[f32]) -> Result<usize, DomainError> {
        if self.dimensions == 0 || vector.len() != self.dimensions {
            return Err(DomainError::validation(format!(
                "Vector has {} dimensions, index expects {}",
                vector.len(),
                self.dimensions
            )));
        }

        let position = self.len();
        self.data.extend_from_slice(vector);

        Ok(position)
    }

    /// Keep only the first `len` vectors
    pub fn truncate(&mut self, len: usize) {
        self.data.truncate(len.saturating_mul(self.dimensions));
    }

    /// Vector stored at `position`
    pub fn vector(&self, position: usize) -> Option<&[f32]> {
        let start = position.checked_mul(self.dimensions)?;
        self.data.get(start..start + self.dimensions)
    }

    /// Top-1 nearest neighbor by inner product.
    ///
    /// Ties resolve to the earliest position. Returns `None` on an empty index.
    pub fn search(&self, query: &[f32]) -> Option<IndexMatch> {
        if self.is_empty() || query.len() != self.dimensions {
            return None;
        }

        let mut best: Option<IndexMatch> = None;

        for (position, vector) in self.data.chunks_exact(self.dimensions).enumerate() {
            let score = inner_product(query, vector);

            match best {
                Some(current) if score <= current.score => {}
                _ => best = Some(IndexMatch { position, score }),
            }
        }

        best
    }

    /// Serialize to the binary snapshot format
    pub fn to_bytes(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(HEADER_LEN + self.data.len() * 4);

        buf.put_slice(MAGIC);
        buf.put_u16_le(FORMAT_VERSION);
        buf.put_u32_le(self.dimensions as u32);
        buf.put_u64_le(self.len() as u64);

        for value in &self.data {
            buf.put_f32_le(*value);
        }

        buf.freeze()
    }

    /// Decode a binary snapshot produced by [`SemanticIndex::to_bytes`]
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DomainError> {
        if bytes.len() < HEADER_LEN {
            return Err(DomainError::index_corrupt(format!(
                "Index snapshot truncated: {} bytes",
                bytes.len()
            )));
        }

        let mut buf = bytes;
        let mut magic = [0u8; 4];
        buf.copy_to_slice(&mut magic);

        if &magic != MAGIC {
            return Err(DomainError::index_corrupt("Index snapshot has wrong magic"));
        }

        let version = buf.get_u16_le();

        if version != FORMAT_VERSION {
            return Err(DomainError::index_corrupt(format!(
                "Unsupported index snapshot version {}",
                version
            )));
        }

        let dimensions = buf.get_u32_le() as usize;
        let count = buf.get_u64_le() as usize;

        if dimensions == 0 {
            return Err(DomainError::index_corrupt("Index snapshot has zero dimensions"));
        }

        let expected = count
            .checked_mul(dimensions)
            .and_then(|n| n.checked_mul(4))
            .ok_or_else(|| DomainError::index_corrupt("Index snapshot size overflows"))?;

        if buf.remaining() != expected {
            return Err(DomainError::index_corrupt(format!(
                "Index snapshot declares {} vectors of {} dimensions but carries {} payload bytes",
                count,
                dimensions,
                buf.remaining()
            )));
        }

        let mut data = Vec::with_capacity(count * dimensions);

        while buf.has_remaining() {
            data.push(buf.get_f32_le());
        }

        Ok(Self { dimensions, data })
    }
}
