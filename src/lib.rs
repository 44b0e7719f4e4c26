//! A Toolkit for describing Composite Finite Element Function Spaces
//!
//! `fem_spaces` builds small symbolic trees which describe how a function-space
//! basis is assembled from scalar element spaces. Trees are composed of three
//! kinds of nodes:
//! * Scalar leaves: continuous or discontinuous element spaces of some polynomial order
//! * Composites: ordered tuples of distinct sub-spaces (e.g. a velocity/pressure pair)
//! * Powers: a single sub-space repeated a fixed number of times (e.g. the components of a vector field)
//!
//! The trees themselves do no numerical work. They are handed to an external
//! discretization library as constructor expressions (via [native_expression]),
//! and the index paths used to address sub-trees here are the same paths used to
//! restrict the resulting global bases to subspaces.
//!
//! # Example
//! Describe the lowest-order Taylor-Hood velocity/pressure pair over a 2D grid:
//! ```rust
//! use fem_spaces::{native_expression, SpaceTree};
//!
//! let spaces = SpaceTree::taylor_hood(2).unwrap();
//! assert_eq!(spaces.to_string(), "([CG2]^2 * CG1)");
//!
//! // select the pressure sub-space
//! let pressure = spaces.subspace([1]).unwrap();
//! assert_eq!(pressure.to_string(), "CG1");
//!
//! // generate the native library's constructor expression
//! assert_eq!(
//!     native_expression(&spaces, 2),
//!     "TupleSpace<PowerSpace<ContinuousSpace<FunctionSpace<2, 1>, 2>, 2>, ContinuousSpace<FunctionSpace<2, 1>, 1>>",
//! );
//! ```

/// Structures to describe scalar and composite function spaces as trees
pub mod space_tree;

pub use space_tree::expression::native_expression;
pub use space_tree::path::{SubspaceError, SubspacePath};
pub use space_tree::{ElementFamily, IndexLayout, IndexOrdering, SpaceTree, SpaceTreeError};

#[cfg(feature = "json_export")]
pub use space_tree::json::SpaceJsonError;
