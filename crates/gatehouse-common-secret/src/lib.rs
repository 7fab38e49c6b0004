// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Redacting wrapper for credentials that pass through the sign-in flow.
//!
//! Google ID tokens, the OAuth client secret and the Firebase API key all
//! travel through structs that are logged with `?value` and `%value`. Wrapping
//! them in [`Secret`] keeps them out of every formatter:
//!
//! ```
//! use gatehouse_common_secret::SecretString;
//!
//! let id_token = SecretString::new("eyJhbGciOiJSUzI1NiJ9.payload.sig".to_string());
//!
//! assert_eq!(format!("{id_token}"), "[REDACTED]");
//! assert_eq!(format!("{id_token:?}"), "Secret(\"[REDACTED]\")");
//! assert!(id_token.expose().starts_with("eyJ"));
//! ```
//!
//! Reading the value requires `.expose()`; there is no `Deref`.

use std::fmt;
use zeroize::Zeroize;

/// Placeholder written in place of any secret value.
pub const REDACTED: &str = "[REDACTED]";

/// A value that never appears in `Debug`, `Display` or serialized output and
/// is zeroed from memory when dropped.
#[derive(Zeroize)]
#[zeroize(drop)]
pub struct Secret<T>
where
	T: Zeroize,
{
	inner: T,
}

/// The common case: a secret string such as a token or API key.
pub type SecretString = Secret<String>;

impl<T> Secret<T>
where
	T: Zeroize,
{
	pub fn new(inner: T) -> Self {
		Self { inner }
	}

	/// Read the wrapped value. Call sites that need the raw credential (an HTTP
	/// form body, a query parameter) opt in here.
	pub fn expose(&self) -> &T {
		&self.inner
	}

	/// Copy the wrapped value out. The wrapper is still zeroed when dropped.
	pub fn into_inner(self) -> T
	where
		T: Clone,
	{
		self.inner.clone()
	}
}

impl SecretString {
	/// True when the wrapped string is empty.
	pub fn is_empty(&self) -> bool {
		self.inner.is_empty()
	}
}

impl<T> Clone for Secret<T>
where
	T: Zeroize + Clone,
{
	fn clone(&self) -> Self {
		Self {
			inner: self.inner.clone(),
		}
	}
}

impl<T> fmt::Debug for Secret<T>
where
	T: Zeroize,
{
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("Secret").field(&REDACTED).finish()
	}
}

impl<T> fmt::Display for Secret<T>
where
	T: Zeroize,
{
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(REDACTED)
	}
}

impl<T> PartialEq for Secret<T>
where
	T: Zeroize + PartialEq,
{
	fn eq(&self, other: &Self) -> bool {
		self.inner == other.inner
	}
}

impl<T> Eq for Secret<T> where T: Zeroize + Eq {}

#[cfg(feature = "serde")]
mod serde_impl {
	use super::{Secret, REDACTED};
	use serde::{Deserialize, Deserializer, Serialize, Serializer};
	use zeroize::Zeroize;

	// Config dumps and presentation snapshots serialize the placeholder.
	impl<T> Serialize for Secret<T>
	where
		T: Zeroize,
	{
		fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
		where
			S: Serializer,
		{
			serializer.serialize_str(REDACTED)
		}
	}

	impl<'de, T> Deserialize<'de> for Secret<T>
	where
		T: Deserialize<'de> + Zeroize,
	{
		fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
		where
			D: Deserializer<'de>,
		{
			T::deserialize(deserializer).map(Secret::new)
		}
	}
}
