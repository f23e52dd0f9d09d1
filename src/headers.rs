//! HTTP header multimap.
use bytes::Bytes;

use crate::bytestring::ByteStr;

/// Insertion-order multimap of request headers.
///
/// Names keep the case the client sent and repeated names are kept as
/// separate entries; lookups compare names ASCII case-insensitively.
#[derive(Clone, Default)]
pub struct HeaderMap {
    entries: Vec<(ByteStr, Bytes)>,
}

impl HeaderMap {
    /// Create a new empty `HeaderMap`.
    ///
    /// This function does not allocate.
    pub const fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Create a new empty `HeaderMap` with at least the specified capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self { entries: Vec::with_capacity(capacity) }
    }

    /// Returns the number of header entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the map has no entry.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append an entry, keeping any existing entries with the same name.
    pub fn append(&mut self, name: ByteStr, value: Bytes) {
        self.entries.push((name, value));
    }

    /// Returns `true` if the map contains an entry for the header name.
    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Returns the first value for the header name.
    pub fn get(&self, name: &str) -> Option<&[u8]> {
        self.entries
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_ref())
    }

    /// Returns every value for the header name in insertion order.
    pub fn get_all<'a>(&'a self, name: &'a str) -> GetAll<'a> {
        GetAll { entries: self.entries.iter(), name }
    }

    /// Iterate over all `(name, value)` entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&ByteStr, &[u8])> {
        self.entries.iter().map(|(n, v)| (n, v.as_ref()))
    }
}

impl std::fmt::Debug for HeaderMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|(n, v)| (n.as_str(), String::from_utf8_lossy(v))))
            .finish()
    }
}

/// Iterator over every value of one header name, created by [`HeaderMap::get_all`].
pub struct GetAll<'a> {
    entries: std::slice::Iter<'a, (ByteStr, Bytes)>,
    name: &'a str,
}

impl<'a> Iterator for GetAll<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        for (n, v) in self.entries.by_ref() {
            if n.eq_ignore_ascii_case(self.name) {
                return Some(v.as_ref());
            }
        }
        None
    }
}

impl std::fmt::Debug for GetAll<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GetAll").field("name", &self.name).finish_non_exhaustive()
    }
}
