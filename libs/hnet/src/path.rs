//! Hierarchical path name parsing.
//!
//! A path such as `u1/u2/net` names an entity by the instance names leading
//! to it, separated by a divider character. An escape character placed before
//! a divider makes that divider part of a name (`u1/bus\/3` has two segments).
//! Escapes are kept in the segments; names are stored with their escapes.
//!
//! A path that ends in a lone escape is malformed. Parsing never fails loudly:
//! malformed paths simply produce no split.

/// Syntax characters of hierarchical paths.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct PathSyntax {
    /// Separates instance names.
    pub divider: char,
    /// Escapes the character that follows it.
    pub escape: char,
}

impl PathSyntax {
    /// Creates a path syntax from its divider and escape characters.
    #[inline]
    pub const fn new(divider: char, escape: char) -> Self {
        Self { divider, escape }
    }

    /// Byte offsets of every unescaped divider in `path`.
    ///
    /// Returns [`None`] if the path ends in a lone escape.
    fn dividers(&self, path: &str) -> Option<Vec<usize>> {
        let mut found = Vec::new();
        let mut chars = path.char_indices();
        while let Some((idx, c)) = chars.next() {
            if c == self.escape {
                chars.next()?;
            } else if c == self.divider {
                found.push(idx);
            }
        }
        Some(found)
    }

    /// Splits `path` at its first unescaped divider into `(first, tail)`.
    ///
    /// Returns [`None`] if there is no divider or the path is malformed.
    ///
    /// # Examples
    ///
    /// ```
    /// use hnet::path::PathSyntax;
    /// let syntax = PathSyntax::new('/', '\\');
    /// assert_eq!(syntax.path_name_first("u1/u2/a"), Some(("u1", "u2/a")));
    /// assert_eq!(syntax.path_name_first("a"), None);
    /// ```
    pub fn path_name_first<'a>(&self, path: &'a str) -> Option<(&'a str, &'a str)> {
        let idx = *self.dividers(path)?.first()?;
        Some((&path[..idx], &path[idx + self.divider.len_utf8()..]))
    }

    /// Splits `path` at its last unescaped divider into `(head, last)`.
    ///
    /// Returns [`None`] if there is no divider or the path is malformed.
    ///
    /// # Examples
    ///
    /// ```
    /// use hnet::path::PathSyntax;
    /// let syntax = PathSyntax::new('/', '\\');
    /// assert_eq!(syntax.path_name_last("u1/u2/a"), Some(("u1/u2", "a")));
    /// assert_eq!(syntax.path_name_last(r"u1/a\/b"), Some(("u1", r"a\/b")));
    /// ```
    pub fn path_name_last<'a>(&self, path: &'a str) -> Option<(&'a str, &'a str)> {
        let idx = *self.dividers(path)?.last()?;
        Some((&path[..idx], &path[idx + self.divider.len_utf8()..]))
    }

    /// Splits `path` into all of its segments.
    ///
    /// A path with no dividers is a single segment.
    /// Returns [`None`] if the path is malformed.
    pub fn segments<'a>(&self, path: &'a str) -> Option<Vec<&'a str>> {
        let dividers = self.dividers(path)?;
        let mut segments = Vec::with_capacity(dividers.len() + 1);
        let mut start = 0;
        for idx in dividers {
            segments.push(&path[start..idx]);
            start = idx + self.divider.len_utf8();
        }
        segments.push(&path[start..]);
        Some(segments)
    }

    /// Returns `true` if `path` contains an unescaped divider.
    pub fn is_hierarchical(&self, path: &str) -> bool {
        self.dividers(path).is_some_and(|d| !d.is_empty())
    }
}

impl Default for PathSyntax {
    fn default() -> Self {
        Self::new('/', '\\')
    }
}
