use std::sync::Arc;

use serde::{Serialize, Serializer};

use crate::SizeBytes;

/// Benchmark payload: a buffer of 4-byte floats.
///
/// Contents are never inspected, only the size matters.
/// Cloning is cheap (shared buffer), which is what makes input reuse across repetitions free.
#[derive(Clone, Debug, PartialEq)]
pub struct Payload(Arc<[f32]>);

impl Payload {
    /// Size of one element in bytes.
    pub const ELEMENT_SIZE: usize = std::mem::size_of::<f32>();

    /// Allocate a payload of approximately `size_bytes` bytes (`size_bytes / 4` elements).
    ///
    /// Negative or non-finite sizes yield an empty payload.
    pub fn empty(size_bytes: SizeBytes) -> Self {
        let len = (size_bytes / Self::ELEMENT_SIZE as f64) as usize;
        Self(vec![0f32; len].into())
    }

    /// Rebuild a payload from its wire bytes. Trailing bytes that do not fill an element are dropped.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let elems: Vec<f32> = bytes
            .chunks_exact(Self::ELEMENT_SIZE)
            .map(|c| f32::from_ne_bytes([c[0], c[1], c[2], c[3]]))
            .collect();
        Self(elems.into())
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.0.iter().flat_map(|f| f.to_ne_bytes()).collect()
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn size_bytes(&self) -> usize {
        self.0.len() * Self::ELEMENT_SIZE
    }

    /// Returns `true` if both payloads share the same buffer.
    pub fn same_buffer(&self, other: &Payload) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// Payloads are logged by size only.
impl Serialize for Payload {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(self.size_bytes() as u64)
    }
}
