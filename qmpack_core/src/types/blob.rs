//! This module provides the [`Blob`] struct, a wrapper around [`Vec<u8>`] holding an opaque tile payload.
//!
//! # Examples
//!
//! ```rust
//! use qmpack_core::Blob;
//!
//! let blob = Blob::from(vec![0, 1, 2, 3]);
//! assert_eq!(blob.len(), 4);
//! assert_eq!(blob.as_slice(), &[0, 1, 2, 3]);
//! ```

use std::fmt::Debug;

/// A simple wrapper around [`Vec<u8>`]. Terrain payloads are never decoded, only moved around.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Blob(Vec<u8>);

impl Blob {
	/// Returns a reference to the underlying byte slice.
	#[must_use]
	pub fn as_slice(&self) -> &[u8] {
		self.0.as_ref()
	}

	/// Consumes this [`Blob`] and returns the underlying `Vec<u8>`.
	#[must_use]
	pub fn into_vec(self) -> Vec<u8> {
		self.0
	}

	/// Returns the length of the blob in bytes.
	#[must_use]
	pub fn len(&self) -> u64 {
		self.0.len() as u64
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

impl From<Vec<u8>> for Blob {
	fn from(item: Vec<u8>) -> Self {
		Blob(item)
	}
}

impl From<&[u8]> for Blob {
	fn from(item: &[u8]) -> Self {
		Blob(item.to_vec())
	}
}

impl From<&str> for Blob {
	fn from(item: &str) -> Self {
		Blob(item.as_bytes().to_vec())
	}
}

impl Debug for Blob {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "Blob({} bytes)", self.0.len())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn conversions() {
		let blob = Blob::from("terrain");
		assert_eq!(blob.len(), 7);
		assert!(!blob.is_empty());
		assert_eq!(blob.as_slice(), b"terrain");
		assert_eq!(Blob::from(&b"terrain"[..]), blob);
		assert_eq!(blob.into_vec(), b"terrain".to_vec());
	}

	#[test]
	fn empty() {
		let blob = Blob::default();
		assert!(blob.is_empty());
		assert_eq!(blob.len(), 0);
	}

	#[test]
	fn debug_hides_content() {
		assert_eq!(format!("{:?}", Blob::from(vec![1, 2, 3])), "Blob(3 bytes)");
	}
}
