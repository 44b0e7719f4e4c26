use super::{ElementFamily, SpaceTree};

/// Generate the native constructor expression which builds the described space
/// over a grid of dimension `grid_dim`
///
/// The expression nests one constructor per tree node:
/// * Scalar leaves become `ContinuousSpace<FunctionSpace<d, c>, k>` or
///   `DiscontinuousSpace<FunctionSpace<d, c>, k>`, where `d` is the grid
///   dimension, `c` the component count and `k` the polynomial order
/// * Composite nodes become `TupleSpace<...>` over their sub-expressions in
///   child order
/// * Power nodes become `PowerSpace<sub-expression, exponent>`, including
///   powers of one
///
/// The output is deterministic: equal trees yield identical expressions for a
/// given `grid_dim`.
///
/// ```
/// use fem_spaces::{native_expression, SpaceTree};
///
/// let vector_lagrange = SpaceTree::repeat(SpaceTree::continuous(1), 2).unwrap();
/// assert_eq!(
///     native_expression(&vector_lagrange, 2),
///     "PowerSpace<ContinuousSpace<FunctionSpace<2, 1>, 1>, 2>",
/// );
/// ```
pub fn native_expression(space: &SpaceTree, grid_dim: usize) -> String {
    match space {
        SpaceTree::Scalar {
            family,
            order,
            components,
        } => {
            let constructor = match family {
                ElementFamily::Continuous => "ContinuousSpace",
                ElementFamily::Discontinuous => "DiscontinuousSpace",
            };
            format!(
                "{}<FunctionSpace<{}, {}>, {}>",
                constructor, grid_dim, components, order
            )
        }
        SpaceTree::Composite { children, .. } => {
            let sub_expressions: Vec<String> = children
                .iter()
                .map(|child| native_expression(child, grid_dim))
                .collect();
            format!("TupleSpace<{}>", sub_expressions.join(", "))
        }
        SpaceTree::Power {
            child, exponent, ..
        } => format!(
            "PowerSpace<{}, {}>",
            native_expression(child, grid_dim),
            exponent
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leaf_expressions_carry_family_components_and_order() {
        assert_eq!(
            native_expression(&SpaceTree::discontinuous(0), 3),
            "DiscontinuousSpace<FunctionSpace<3, 1>, 0>"
        );

        let vector_leaf = SpaceTree::leaf(ElementFamily::Continuous, 2, 3).unwrap();
        assert_eq!(
            native_expression(&vector_leaf, 3),
            "ContinuousSpace<FunctionSpace<3, 3>, 2>"
        );
    }

    #[test]
    fn vector_lagrange_expression_nests_a_power_over_a_leaf() {
        let vector_lagrange = SpaceTree::repeat(SpaceTree::continuous(1), 2).unwrap();
        assert_eq!(
            native_expression(&vector_lagrange, 2),
            "PowerSpace<ContinuousSpace<FunctionSpace<2, 1>, 1>, 2>"
        );
    }

    #[test]
    fn taylor_hood_expression_nests_all_three_constructors() {
        let th = SpaceTree::taylor_hood(2).unwrap();
        assert_eq!(
            native_expression(&th, 2),
            "TupleSpace<PowerSpace<ContinuousSpace<FunctionSpace<2, 1>, 2>, 2>, ContinuousSpace<FunctionSpace<2, 1>, 1>>"
        );
    }

    #[test]
    fn powers_of_one_keep_their_wrapper() {
        let wrapped = SpaceTree::repeat(SpaceTree::continuous(1), 1).unwrap();
        assert_eq!(
            native_expression(&wrapped, 2),
            "PowerSpace<ContinuousSpace<FunctionSpace<2, 1>, 1>, 1>"
        );
    }

    #[test]
    fn equal_trees_yield_identical_expressions() {
        let a = SpaceTree::taylor_hood(3).unwrap();
        let b = SpaceTree::taylor_hood(3).unwrap();
        assert_eq!(native_expression(&a, 3), native_expression(&b, 3));
        assert_ne!(native_expression(&a, 3), native_expression(&a, 2));
    }
}
