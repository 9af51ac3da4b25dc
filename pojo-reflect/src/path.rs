use core::fmt;

use pojo_core::PojoName;

/// The names leading from a root node to one of its descendants.
///
/// Formats as `outer.inner[3].name`: property names are joined with dots,
/// indices are bracketed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct PojoPath {
    names: Vec<PojoName>,
}

impl PojoPath {
    /// The empty path, naming the root itself.
    pub const fn new() -> Self {
        Self { names: Vec::new() }
    }

    /// Parses `a.b[0].c`. Bracketed segments must be indices; dotted segments
    /// are always property names.
    pub fn parse(text: &str) -> Option<Self> {
        let mut names = Vec::new();
        let mut rest = text;
        while !rest.is_empty() {
            if let Some(after) = rest.strip_prefix('[') {
                let close = after.find(']')?;
                let index = after[..close].parse::<usize>().ok()?;
                names.push(PojoName::index(index));
                rest = &after[close + 1..];
            } else {
                let rest_of_segment = rest.strip_prefix('.').unwrap_or(rest);
                let end = rest_of_segment
                    .find(['.', '['])
                    .unwrap_or(rest_of_segment.len());
                if end == 0 {
                    return None;
                }
                names.push(PojoName::property(&rest_of_segment[..end]));
                rest = &rest_of_segment[end..];
            }
        }
        Some(Self { names })
    }

    /// Appends a name.
    pub fn push(&mut self, name: PojoName) {
        self.names.push(name);
    }

    /// Removes the last name.
    pub fn pop(&mut self) -> Option<PojoName> {
        self.names.pop()
    }

    /// The names, root side first.
    pub fn names(&self) -> &[PojoName] {
        &self.names
    }

    /// Number of names.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// True for the root path.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl FromIterator<PojoName> for PojoPath {
    fn from_iter<I: IntoIterator<Item = PojoName>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for PojoPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, name) in self.names.iter().enumerate() {
            match name.as_index() {
                Some(index) => write!(f, "[{index}]")?,
                None if i == 0 => write!(f, "{name}")?,
                None => write!(f, ".{name}")?,
            }
        }
        Ok(())
    }
}
