use smallvec::{smallvec, SmallVec};
use std::fmt;

/// A sequence of child indices addressing a sub-tree within a [SpaceTree](super::SpaceTree)
///
/// Each element selects one child at the next level down; the empty path
/// addresses the tree it is applied to. Paths convert from single indices,
/// index arrays, slices and `Vec`s, so call sites can pass whichever form
/// reads best:
///
/// ```
/// use fem_spaces::SpaceTree;
///
/// let spaces = SpaceTree::taylor_hood(2).unwrap();
///
/// let u_y = spaces.subspace([0, 1]).unwrap();
/// assert_eq!(u_y.to_string(), "CG2");
///
/// let pressure = spaces.subspace(1).unwrap();
/// assert_eq!(pressure.to_string(), "CG1");
/// ```
///
/// Space trees are shallow in practice, so a handful of indices are stored
/// inline.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SubspacePath {
    indices: SmallVec<[usize; 4]>,
}

impl SubspacePath {
    /// The empty path, which addresses the tree it is applied to
    pub fn root() -> Self {
        Self {
            indices: SmallVec::new(),
        }
    }

    /// The number of tree levels this path descends
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Whether this is the empty path
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Iterate over the child indices from the top of the tree downwards
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.indices.iter().copied()
    }

    /// The child indices as a slice
    pub fn as_slice(&self) -> &[usize] {
        &self.indices
    }
}

impl From<usize> for SubspacePath {
    fn from(index: usize) -> Self {
        Self {
            indices: smallvec![index],
        }
    }
}

impl From<&[usize]> for SubspacePath {
    fn from(indices: &[usize]) -> Self {
        Self {
            indices: SmallVec::from_slice(indices),
        }
    }
}

impl<const N: usize> From<[usize; N]> for SubspacePath {
    fn from(indices: [usize; N]) -> Self {
        Self {
            indices: SmallVec::from_slice(&indices),
        }
    }
}

impl From<Vec<usize>> for SubspacePath {
    fn from(indices: Vec<usize>) -> Self {
        Self {
            indices: SmallVec::from_vec(indices),
        }
    }
}

impl From<&SubspacePath> for SubspacePath {
    fn from(path: &SubspacePath) -> Self {
        path.clone()
    }
}

impl FromIterator<usize> for SubspacePath {
    fn from_iter<T: IntoIterator<Item = usize>>(iter: T) -> Self {
        Self {
            indices: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for SubspacePath {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[")?;
        for (i, index) in self.indices.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", index)?;
        }
        write!(f, "]")
    }
}

/// The Error Type for [subspace](super::SpaceTree::subspace) selections that do
/// not resolve to a node
///
/// Both variants carry the full path alongside the depth at which resolution
/// stopped, so the failing element can be pointed out in context.
#[derive(Debug)]
pub enum SubspaceError {
    /// The index at `depth` was too large for the node reached at that level
    IndexOutOfRange {
        index: usize,
        num_subspaces: usize,
        depth: usize,
        path: SubspacePath,
    },
    /// The path descended into a scalar leaf, which has no subspaces
    ScalarIndexed { depth: usize, path: SubspacePath },
}

impl std::error::Error for SubspaceError {}

impl fmt::Display for SubspaceError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::IndexOutOfRange {
                index,
                num_subspaces,
                depth,
                path,
            } => write!(
                f,
                "Subspace index must be between 0 and {} but was {} at depth {} of path {}; Cannot select subspace!",
                num_subspaces.saturating_sub(1),
                index,
                depth,
                path,
            ),
            Self::ScalarIndexed { depth, path } => write!(
                f,
                "Scalar spaces have no subspaces to select at depth {} of path {}; Cannot select subspace!",
                depth, path,
            ),
        }
    }
}
