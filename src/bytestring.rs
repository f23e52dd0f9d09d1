use std::{ops::Deref, str::Utf8Error};

use bytes::Bytes;

/// Immutable UTF-8 string backed by [`Bytes`].
///
/// Cloning is cheap and shares the underlying storage.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ByteStr(Bytes);

impl ByteStr {
    /// Create a new empty `ByteStr`.
    pub const fn new() -> Self {
        Self(Bytes::new())
    }

    /// Validate `bytes` as UTF-8.
    pub fn from_utf8(bytes: Bytes) -> Result<ByteStr, Utf8Error> {
        std::str::from_utf8(bytes.as_ref())?;
        Ok(Self(bytes))
    }

    /// Create a `ByteStr` without checking the content.
    ///
    /// # Safety
    ///
    /// `bytes` must be valid UTF-8.
    pub(crate) const unsafe fn from_utf8_unchecked(bytes: Bytes) -> ByteStr {
        Self(bytes)
    }

    /// String slice of the content.
    pub fn as_str(&self) -> &str {
        // SAFETY: checked on construction and immutable
        unsafe { std::str::from_utf8_unchecked(self.0.as_ref()) }
    }
}

impl Deref for ByteStr {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.as_str()
    }
}

impl AsRef<str> for ByteStr {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl PartialEq<str> for ByteStr {
    fn eq(&self, other: &str) -> bool {
        self.0.as_ref() == other.as_bytes()
    }
}

impl PartialEq<&str> for ByteStr {
    fn eq(&self, other: &&str) -> bool {
        self.0.as_ref() == other.as_bytes()
    }
}

impl std::fmt::Display for ByteStr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self)
    }
}

impl std::fmt::Debug for ByteStr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ByteStr").field(&self.as_str()).finish()
    }
}
