//! Access paths into nested structural values.
//!
//! A `Path` locates a position inside a nested value as a sequence of steps.
//! Paths are append-only from the caller's point of view: [`Path::attr`],
//! [`Path::index`] and [`Path::key`] return a *new* path one level deeper and
//! leave the receiver untouched, so sibling recursive calls never see each
//! other's steps.

use std::fmt;

use smallvec::SmallVec;

/// One step of a [`Path`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum PathStep {
    /// Named attribute of an object.
    Attr(String),
    /// Position in a list, set, or tuple.
    Index(i64),
    /// String key of a map.
    Key(String),
}

impl fmt::Display for PathStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathStep::Attr(name) => write!(f, ".{name}"),
            PathStep::Index(i) => write!(f, "[{i}]"),
            PathStep::Key(key) => write!(f, "[{key:?}]"),
        }
    }
}

/// Ordered sequence of access steps.
///
/// Most conversion failures happen a handful of levels deep, so the steps are
/// kept inline up to that depth.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Path(SmallVec<[PathStep; 4]>);

impl Path {
    /// The empty path, addressing the value itself.
    pub fn root() -> Self {
        Path(SmallVec::new())
    }

    #[must_use]
    pub fn attr(&self, name: impl Into<String>) -> Self {
        self.child(PathStep::Attr(name.into()))
    }

    #[must_use]
    pub fn index(&self, index: i64) -> Self {
        self.child(PathStep::Index(index))
    }

    #[must_use]
    pub fn key(&self, key: impl Into<String>) -> Self {
        self.child(PathStep::Key(key.into()))
    }

    /// Copy of this path with `step` appended.
    #[must_use]
    pub fn child(&self, step: PathStep) -> Self {
        let mut steps = SmallVec::with_capacity(self.0.len() + 1);
        steps.extend(self.0.iter().cloned());
        steps.push(step);
        Path(steps)
    }

    /// This path followed by all steps of `suffix`.
    #[must_use]
    pub fn join(&self, suffix: &Path) -> Self {
        let mut steps = self.0.clone();
        steps.extend(suffix.0.iter().cloned());
        Path(steps)
    }

    pub fn steps(&self) -> &[PathStep] {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<PathStep> for Path {
    fn from_iter<I: IntoIterator<Item = PathStep>>(iter: I) -> Self {
        Path(iter.into_iter().collect())
    }
}

/// Renders as an access expression, e.g. `servers[0].ports["http"]`.
impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.0.iter().enumerate() {
            match step {
                PathStep::Attr(name) if i == 0 => write!(f, "{name}")?,
                _ => write!(f, "{step}")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests;
