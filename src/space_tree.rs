/// Conversion of space trees into native constructor expressions
pub mod expression;
/// JSON import and export of space descriptions
#[cfg(feature = "json_export")]
pub mod json;
/// Index paths used to address subspaces within a space tree
pub mod path;

use path::{SubspaceError, SubspacePath};
use std::fmt;

/// The continuity family of a scalar element space
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementFamily {
    /// Continuous (Lagrange) elements
    Continuous,
    /// Discontinuous Galerkin elements
    Discontinuous,
}

impl fmt::Display for ElementFamily {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Continuous => write!(f, "CG"),
            Self::Discontinuous => write!(f, "DG"),
        }
    }
}

/// The order in which a composite space's degrees of freedom are merged by the
/// native library
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IndexOrdering {
    /// Sub-space indices are enumerated one sub-space at a time
    Lexicographic,
    /// Sub-space indices alternate between the sub-spaces
    Interleaved,
}

impl Default for IndexOrdering {
    fn default() -> Self {
        Self::Lexicographic
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
/// Description of how a composite space's degrees of freedom are laid out by the
/// native library
///
/// The layout has no effect on the structure of a [SpaceTree] or on its native
/// constructor expression; it is carried along for the downstream
/// degree-of-freedom numbering and participates in structural equality.
pub struct IndexLayout {
    /// Whether sub-space indices are grouped into contiguous blocks
    pub blocked: bool,
    /// The merge order of sub-space indices
    pub ordering: IndexOrdering,
}

impl IndexLayout {
    /// Create a layout from its blocking flag and ordering
    pub fn from(blocked: bool, ordering: IndexOrdering) -> Self {
        Self { blocked, ordering }
    }

    /// Flat index merging in lexicographic order (the default)
    pub fn flat_lexicographic() -> Self {
        Self::from(false, IndexOrdering::Lexicographic)
    }

    /// Flat index merging with sub-space indices interleaved
    pub fn flat_interleaved() -> Self {
        Self::from(false, IndexOrdering::Interleaved)
    }

    /// Blocked index merging in lexicographic order
    pub fn blocked_lexicographic() -> Self {
        Self::from(true, IndexOrdering::Lexicographic)
    }

    /// Blocked index merging with sub-space indices interleaved
    pub fn blocked_interleaved() -> Self {
        Self::from(true, IndexOrdering::Interleaved)
    }
}

impl Default for IndexLayout {
    fn default() -> Self {
        Self::from(false, IndexOrdering::Lexicographic)
    }
}

/// Symbolic description of a scalar or composite function-space basis
///
/// A `SpaceTree` describes how a function space is assembled from scalar element
/// spaces; it carries no numerical information of its own. Trees are built
/// bottom-up through the validating constructors ([continuous](Self::continuous),
/// [leaf](Self::leaf), [compose](Self::compose), [repeat](Self::repeat), ...)
/// and are immutable afterwards.
///
/// Structural equality and hashing are derived over the full variant set, so
/// equal trees hash identically and a `SpaceTree` can key a `HashMap` of
/// already-built native bases.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum SpaceTree {
    /// A single scalar (or fixed-width vector) element space
    Scalar {
        family: ElementFamily,
        /// Polynomial expansion order
        order: u8,
        /// Number of identical scalar components; 1 for a scalar space
        components: usize,
    },
    /// An ordered tuple of sub-spaces of possibly different types and orders
    Composite {
        children: Vec<SpaceTree>,
        layout: IndexLayout,
    },
    /// A single sub-space repeated a fixed number of times
    ///
    /// Only one child is stored; all `exponent` slots alias it.
    Power {
        child: Box<SpaceTree>,
        exponent: usize,
        layout: IndexLayout,
    },
}

impl SpaceTree {
    /// Create a continuous scalar element space of the given polynomial order
    pub fn continuous(order: u8) -> Self {
        Self::Scalar {
            family: ElementFamily::Continuous,
            order,
            components: 1,
        }
    }

    /// Create a discontinuous scalar element space of the given polynomial order
    pub fn discontinuous(order: u8) -> Self {
        Self::Scalar {
            family: ElementFamily::Discontinuous,
            order,
            components: 1,
        }
    }

    /// Create an element space with the given number of identical scalar components
    ///
    /// Returns an `Err` if `components` is zero.
    ///
    /// A vector-valued leaf is not the same tree as a [repeat](Self::repeat) of
    /// scalar leaves: the component count is a property of the element space
    /// itself and lands in the `FunctionSpace` parameter of the native
    /// constructor expression rather than in a `PowerSpace` wrapper.
    pub fn leaf(
        family: ElementFamily,
        order: u8,
        components: usize,
    ) -> Result<Self, SpaceTreeError> {
        if components == 0 {
            return Err(SpaceTreeError::ZeroComponents);
        }

        Ok(Self::Scalar {
            family,
            order,
            components,
        })
    }

    /// Compose an ordered set of sub-spaces into a heterogeneous composite space
    /// with the default [IndexLayout]
    ///
    /// Returns an `Err` if no children are supplied
    pub fn compose(children: Vec<SpaceTree>) -> Result<Self, SpaceTreeError> {
        Self::compose_with(children, IndexLayout::default())
    }

    /// Compose an ordered set of sub-spaces into a heterogeneous composite space
    /// with an explicit [IndexLayout]
    ///
    /// Returns an `Err` if no children are supplied
    pub fn compose_with(
        children: Vec<SpaceTree>,
        layout: IndexLayout,
    ) -> Result<Self, SpaceTreeError> {
        if children.is_empty() {
            return Err(SpaceTreeError::EmptyComposite);
        }

        Ok(Self::Composite { children, layout })
    }

    /// Repeat a sub-space `exponent` times with the default [IndexLayout]
    ///
    /// Returns an `Err` if `exponent` is zero
    pub fn repeat(child: SpaceTree, exponent: usize) -> Result<Self, SpaceTreeError> {
        Self::repeat_with(child, exponent, IndexLayout::default())
    }

    /// Repeat a sub-space `exponent` times with an explicit [IndexLayout]
    ///
    /// Returns an `Err` if `exponent` is zero
    pub fn repeat_with(
        child: SpaceTree,
        exponent: usize,
        layout: IndexLayout,
    ) -> Result<Self, SpaceTreeError> {
        if exponent == 0 {
            return Err(SpaceTreeError::ZeroExponent);
        }

        Ok(Self::Power {
            child: Box::new(child),
            exponent,
            layout,
        })
    }

    /// The lowest-order Taylor-Hood velocity/pressure pair over a grid of the
    /// given dimension: `grid_dim` second-order continuous velocity components
    /// paired with a first-order continuous pressure
    ///
    /// Returns an `Err` if `grid_dim` is zero
    pub fn taylor_hood(grid_dim: usize) -> Result<Self, SpaceTreeError> {
        let velocity = Self::repeat(Self::continuous(2), grid_dim)?;
        Self::compose(vec![velocity, Self::continuous(1)])
    }

    /// Whether this node is a scalar leaf
    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Scalar { .. })
    }

    /// The number of addressable subspaces directly below this node
    ///
    /// Scalar leaves have none; a Composite has one per child; a Power has one
    /// per repetition (even though only a single child is stored).
    pub fn num_subspaces(&self) -> usize {
        match self {
            Self::Scalar { .. } => 0,
            Self::Composite { children, .. } => children.len(),
            Self::Power { exponent, .. } => *exponent,
        }
    }

    /// The total number of scalar components in the described value space
    ///
    /// This is the `dimRange` of the function space the native library will
    /// build: a Taylor-Hood pair over a 2D grid has 3 (two velocity components
    /// and one pressure).
    pub fn num_components(&self) -> usize {
        match self {
            Self::Scalar { components, .. } => *components,
            Self::Composite { children, .. } => {
                children.iter().map(|child| child.num_components()).sum()
            }
            Self::Power {
                child, exponent, ..
            } => exponent * child.num_components(),
        }
    }

    /// The stored children of this node
    ///
    /// A Power exposes its single stored child here; the repeated slots are not
    /// materialized. Use [num_subspaces](Self::num_subspaces) for the number of
    /// addressable subspaces.
    pub fn children(&self) -> &[SpaceTree] {
        match self {
            Self::Scalar { .. } => &[],
            Self::Composite { children, .. } => children,
            Self::Power { child, .. } => std::slice::from_ref(child.as_ref()),
        }
    }

    /// Iterate over the stored leaf spaces in depth-first order
    ///
    /// A Power's child is visited once, not `exponent` times.
    pub fn leaves(&self) -> Leaves<'_> {
        Leaves { stack: vec![self] }
    }

    /// Select the sub-tree addressed by a path of child indices, descending one
    /// level per path element
    ///
    /// The empty path addresses the tree itself. For a Composite, each index
    /// must be smaller than the number of children; for a Power, smaller than
    /// the exponent, and every valid index resolves to the same stored child.
    /// Resolution composes level by level: `t.subspace([a, b])` selects the
    /// same node as `t.subspace([a])?.subspace([b])`.
    ///
    /// The returned reference points into this tree; nothing is copied.
    pub fn subspace(&self, path: impl Into<SubspacePath>) -> Result<&SpaceTree, SubspaceError> {
        let path = path.into();
        let mut space = self;

        for depth in 0..path.len() {
            let index = path.as_slice()[depth];

            space = match space {
                Self::Scalar { .. } => {
                    return Err(SubspaceError::ScalarIndexed { depth, path });
                }
                Self::Composite { children, .. } => {
                    if index < children.len() {
                        &children[index]
                    } else {
                        return Err(SubspaceError::IndexOutOfRange {
                            index,
                            num_subspaces: children.len(),
                            depth,
                            path,
                        });
                    }
                }
                Self::Power {
                    child, exponent, ..
                } => {
                    if index < *exponent {
                        child.as_ref()
                    } else {
                        return Err(SubspaceError::IndexOutOfRange {
                            index,
                            num_subspaces: *exponent,
                            depth,
                            path,
                        });
                    }
                }
            };
        }

        Ok(space)
    }
}

impl fmt::Display for SpaceTree {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Scalar {
                family,
                order,
                components,
            } => {
                write!(f, "{}{}", family, order)?;
                if *components != 1 {
                    write!(f, "^{}", components)?;
                }
                Ok(())
            }
            Self::Composite { children, .. } => {
                write!(f, "(")?;
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        write!(f, " * ")?;
                    }
                    write!(f, "{}", child)?;
                }
                write!(f, ")")
            }
            Self::Power {
                child, exponent, ..
            } => {
                // a power of one is transparent
                if *exponent == 1 {
                    write!(f, "{}", child)
                } else {
                    write!(f, "[{}]^{}", child, exponent)
                }
            }
        }
    }
}

/// Depth-first iterator over the stored leaf spaces of a [SpaceTree]
pub struct Leaves<'a> {
    stack: Vec<&'a SpaceTree>,
}

impl<'a> Iterator for Leaves<'a> {
    type Item = &'a SpaceTree;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(space) = self.stack.pop() {
            if space.is_leaf() {
                return Some(space);
            }

            for child in space.children().iter().rev() {
                self.stack.push(child);
            }
        }

        None
    }
}

/// The Error Type for invalid space-tree construction parameters
#[derive(Debug)]
pub enum SpaceTreeError {
    EmptyComposite,
    ZeroExponent,
    ZeroComponents,
}

impl std::error::Error for SpaceTreeError {}

impl fmt::Display for SpaceTreeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::EmptyComposite => write!(
                f,
                "Composite spaces must have at least one sub-space; Cannot construct SpaceTree!"
            ),
            Self::ZeroExponent => write!(
                f,
                "Power spaces must have an exponent of at least 1; Cannot construct SpaceTree!"
            ),
            Self::ZeroComponents => write!(
                f,
                "Scalar spaces must have at least one component; Cannot construct SpaceTree!"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;
    use std::collections::HashMap;
    use std::hash::{Hash, Hasher};

    fn structural_hash(space: &SpaceTree) -> u64 {
        let mut hasher = DefaultHasher::new();
        space.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn empty_composites_are_rejected() {
        assert!(matches!(
            SpaceTree::compose(Vec::new()),
            Err(SpaceTreeError::EmptyComposite)
        ));
    }

    #[test]
    fn zero_exponent_powers_are_rejected() {
        assert!(matches!(
            SpaceTree::repeat(SpaceTree::continuous(1), 0),
            Err(SpaceTreeError::ZeroExponent)
        ));
        assert!(matches!(
            SpaceTree::taylor_hood(0),
            Err(SpaceTreeError::ZeroExponent)
        ));
    }

    #[test]
    fn zero_component_leaves_are_rejected() {
        assert!(matches!(
            SpaceTree::leaf(ElementFamily::Continuous, 2, 0),
            Err(SpaceTreeError::ZeroComponents)
        ));
    }

    #[test]
    fn leaves_powers_and_composites_render_compactly() {
        assert_eq!(SpaceTree::continuous(2).to_string(), "CG2");

        let vector_leaf = SpaceTree::leaf(ElementFamily::Discontinuous, 0, 3).unwrap();
        assert_eq!(vector_leaf.to_string(), "DG0^3");

        let pair = SpaceTree::compose(vec![
            SpaceTree::continuous(2),
            SpaceTree::discontinuous(1),
        ])
        .unwrap();
        assert_eq!(pair.to_string(), "(CG2 * DG1)");

        let squared = SpaceTree::repeat(SpaceTree::continuous(1), 2).unwrap();
        assert_eq!(squared.to_string(), "[CG1]^2");
    }

    #[test]
    fn a_power_of_one_renders_as_its_child() {
        let child = SpaceTree::discontinuous(3);
        let transparent = SpaceTree::repeat(child.clone(), 1).unwrap();
        assert_eq!(transparent.to_string(), child.to_string());

        // transparency also applies below a composite
        let pair = SpaceTree::compose(vec![transparent, SpaceTree::continuous(1)]).unwrap();
        assert_eq!(pair.to_string(), "(DG3 * CG1)");
    }

    #[test]
    fn equal_trees_match_and_hash_identically() {
        let a = SpaceTree::taylor_hood(3).unwrap();
        let b = SpaceTree::taylor_hood(3).unwrap();

        assert_eq!(a, a);
        assert_eq!(a, b);
        assert_eq!(b, a);
        assert_eq!(structural_hash(&a), structural_hash(&b));
    }

    #[test]
    fn trees_with_differing_attributes_are_unequal() {
        let base = SpaceTree::repeat(SpaceTree::continuous(2), 2).unwrap();

        // order
        assert_ne!(base, SpaceTree::repeat(SpaceTree::continuous(1), 2).unwrap());
        // family
        assert_ne!(
            base,
            SpaceTree::repeat(SpaceTree::discontinuous(2), 2).unwrap()
        );
        // exponent
        assert_ne!(base, SpaceTree::repeat(SpaceTree::continuous(2), 3).unwrap());
        // blocking
        assert_ne!(
            base,
            SpaceTree::repeat_with(
                SpaceTree::continuous(2),
                2,
                IndexLayout::blocked_lexicographic()
            )
            .unwrap()
        );
        // ordering
        assert_ne!(
            base,
            SpaceTree::repeat_with(SpaceTree::continuous(2), 2, IndexLayout::flat_interleaved())
                .unwrap()
        );

        // child count
        let pair = SpaceTree::compose(vec![SpaceTree::continuous(2), SpaceTree::continuous(1)])
            .unwrap();
        let triple = SpaceTree::compose(vec![
            SpaceTree::continuous(2),
            SpaceTree::continuous(1),
            SpaceTree::continuous(1),
        ])
        .unwrap();
        assert_ne!(pair, triple);

        // component width
        let two_wide = SpaceTree::leaf(ElementFamily::Continuous, 2, 2).unwrap();
        let three_wide = SpaceTree::leaf(ElementFamily::Continuous, 2, 3).unwrap();
        assert_ne!(two_wide, three_wide);

        // a vector-valued leaf is not a power of scalar leaves
        assert_ne!(two_wide, base);
    }

    #[test]
    fn trees_act_as_memoization_keys() {
        let mut built_bases: HashMap<SpaceTree, usize> = HashMap::new();
        built_bases.insert(SpaceTree::taylor_hood(2).unwrap(), 0);
        built_bases.insert(SpaceTree::continuous(1), 1);

        assert_eq!(built_bases.get(&SpaceTree::taylor_hood(2).unwrap()), Some(&0));
        assert_eq!(built_bases.get(&SpaceTree::continuous(1)), Some(&1));
        assert!(built_bases.get(&SpaceTree::discontinuous(1)).is_none());
    }

    #[test]
    fn taylor_hood_has_the_expected_structure() {
        let th = SpaceTree::taylor_hood(2).unwrap();
        assert_eq!(th.to_string(), "([CG2]^2 * CG1)");
        assert!(!th.is_leaf());
        assert_eq!(th.num_subspaces(), 2);
        assert_eq!(th.num_components(), 3);

        let velocity = th.subspace([0]).unwrap();
        assert_eq!(velocity.num_subspaces(), 2);
        assert_eq!(velocity.num_components(), 2);

        let rendered_leaves: Vec<String> =
            th.leaves().map(|leaf| leaf.to_string()).collect();
        assert_eq!(rendered_leaves, vec!["CG2", "CG1"]);
    }

    #[test]
    fn vector_leaf_components_are_counted_once() {
        let vector_leaf = SpaceTree::leaf(ElementFamily::Continuous, 1, 3).unwrap();
        assert_eq!(vector_leaf.num_components(), 3);
        assert_eq!(vector_leaf.num_subspaces(), 0);
        assert_eq!(vector_leaf.leaves().count(), 1);
    }

    #[test]
    fn the_empty_path_addresses_the_tree_itself() {
        let th = SpaceTree::taylor_hood(2).unwrap();
        let root = th.subspace(SubspacePath::root()).unwrap();
        assert!(std::ptr::eq(root, &th));
    }

    #[test]
    fn taylor_hood_subspaces_resolve_as_addressed() {
        let th = SpaceTree::taylor_hood(2).unwrap();

        let pressure = th.subspace([1]).unwrap();
        assert_eq!(*pressure, SpaceTree::continuous(1));

        let u_x = th.subspace([0, 0]).unwrap();
        let u_y = th.subspace([0, 1]).unwrap();
        assert_eq!(*u_x, SpaceTree::continuous(2));

        // the power's slots alias its single stored child
        assert!(std::ptr::eq(u_x, u_y));
    }

    #[test]
    fn paths_resolve_level_by_level() {
        let th = SpaceTree::taylor_hood(3).unwrap();

        let direct = th.subspace([0, 2]).unwrap();
        let stepped = th.subspace([0]).unwrap().subspace([2]).unwrap();
        assert!(std::ptr::eq(direct, stepped));
    }

    #[test]
    fn out_of_range_indices_report_the_valid_range() {
        let th = SpaceTree::taylor_hood(2).unwrap();

        match th.subspace([2]) {
            Err(SubspaceError::IndexOutOfRange {
                index,
                num_subspaces,
                depth,
                path,
            }) => {
                assert_eq!(index, 2);
                assert_eq!(num_subspaces, 2);
                assert_eq!(depth, 0);
                assert_eq!(path.to_string(), "[2]");
            }
            result => panic!("expected an out-of-range failure; got {:?}", result),
        }

        // power slots beyond the exponent are invalid even though the stored child exists
        assert!(matches!(
            th.subspace([0, 2]),
            Err(SubspaceError::IndexOutOfRange {
                index: 2,
                num_subspaces: 2,
                depth: 1,
                ..
            })
        ));
    }

    #[test]
    fn scalar_leaves_cannot_be_indexed() {
        let leaf = SpaceTree::continuous(1);
        assert!(matches!(
            leaf.subspace([0]),
            Err(SubspaceError::ScalarIndexed { depth: 0, .. })
        ));

        let th = SpaceTree::taylor_hood(2).unwrap();
        match th.subspace([1, 0]) {
            Err(SubspaceError::ScalarIndexed { depth, path }) => {
                assert_eq!(depth, 1);
                assert_eq!(path.to_string(), "[1, 0]");
            }
            result => panic!("expected a scalar-indexed failure; got {:?}", result),
        }
    }
}
