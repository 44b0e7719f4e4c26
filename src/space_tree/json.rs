use super::{ElementFamily, IndexLayout, IndexOrdering, SpaceTree, SpaceTreeError};
use json::{object, JsonValue};
use std::fmt;

impl From<ElementFamily> for JsonValue {
    fn from(family: ElementFamily) -> Self {
        match family {
            ElementFamily::Continuous => "continuous".into(),
            ElementFamily::Discontinuous => "discontinuous".into(),
        }
    }
}

impl From<IndexOrdering> for JsonValue {
    fn from(ordering: IndexOrdering) -> Self {
        match ordering {
            IndexOrdering::Lexicographic => "lexicographic".into(),
            IndexOrdering::Interleaved => "interleaved".into(),
        }
    }
}

impl From<&SpaceTree> for JsonValue {
    fn from(space: &SpaceTree) -> Self {
        match space {
            SpaceTree::Scalar {
                family,
                order,
                components,
            } => object! {
                "kind": "scalar",
                "family": *family,
                "order": *order,
                "components": *components,
            },
            SpaceTree::Composite { children, layout } => object! {
                "kind": "composite",
                "blocked": layout.blocked,
                "ordering": layout.ordering,
                "subspaces": JsonValue::from(
                    children.iter().map(|child| child.to_json()).collect::<Vec<_>>()
                ),
            },
            SpaceTree::Power {
                child,
                exponent,
                layout,
            } => object! {
                "kind": "power",
                "blocked": layout.blocked,
                "ordering": layout.ordering,
                "subspace": child.to_json(),
                "exponent": *exponent,
            },
        }
    }
}

impl SpaceTree {
    /// Export this space description as a JSON object
    pub fn to_json(&self) -> JsonValue {
        JsonValue::from(self)
    }

    /// Rebuild a space description from a JSON object produced by
    /// [to_json](Self::to_json)
    ///
    /// The `components`, `blocked` and `ordering` fields may be omitted; absent
    /// fields take the same defaults as the constructors. The rebuilt tree runs
    /// through the validating constructors, so a description which violates the
    /// construction rules is rejected rather than reproduced.
    pub fn from_json(description: &JsonValue) -> Result<Self, SpaceJsonError> {
        let kind = description["kind"]
            .as_str()
            .ok_or(SpaceJsonError::MissingField("kind"))?;

        match kind {
            "scalar" => {
                let family = parse_family(&description["family"])?;
                let order = description["order"]
                    .as_u8()
                    .ok_or(SpaceJsonError::MissingField("order"))?;
                let components = if description["components"].is_null() {
                    1
                } else {
                    description["components"]
                        .as_usize()
                        .ok_or(SpaceJsonError::MissingField("components"))?
                };

                Ok(Self::leaf(family, order, components)?)
            }
            "composite" => {
                let layout = parse_layout(description)?;
                if let JsonValue::Array(sub_descriptions) = &description["subspaces"] {
                    let children = sub_descriptions
                        .iter()
                        .map(Self::from_json)
                        .collect::<Result<Vec<_>, _>>()?;

                    Ok(Self::compose_with(children, layout)?)
                } else {
                    Err(SpaceJsonError::MissingField("subspaces"))
                }
            }
            "power" => {
                let layout = parse_layout(description)?;
                let sub_description = &description["subspace"];
                if sub_description.is_null() {
                    return Err(SpaceJsonError::MissingField("subspace"));
                }

                let child = Self::from_json(sub_description)?;
                let exponent = description["exponent"]
                    .as_usize()
                    .ok_or(SpaceJsonError::MissingField("exponent"))?;

                Ok(Self::repeat_with(child, exponent, layout)?)
            }
            unknown => Err(SpaceJsonError::UnknownNodeKind(unknown.to_string())),
        }
    }
}

fn parse_family(family: &JsonValue) -> Result<ElementFamily, SpaceJsonError> {
    match family.as_str() {
        Some("continuous") => Ok(ElementFamily::Continuous),
        Some("discontinuous") => Ok(ElementFamily::Discontinuous),
        Some(unknown) => Err(SpaceJsonError::UnknownFamily(unknown.to_string())),
        None => Err(SpaceJsonError::MissingField("family")),
    }
}

fn parse_layout(description: &JsonValue) -> Result<IndexLayout, SpaceJsonError> {
    let blocked = if description["blocked"].is_null() {
        false
    } else {
        description["blocked"]
            .as_bool()
            .ok_or(SpaceJsonError::MissingField("blocked"))?
    };

    let ordering = if description["ordering"].is_null() {
        IndexOrdering::default()
    } else {
        match description["ordering"].as_str() {
            Some("lexicographic") => IndexOrdering::Lexicographic,
            Some("interleaved") => IndexOrdering::Interleaved,
            Some(unknown) => return Err(SpaceJsonError::UnknownOrdering(unknown.to_string())),
            None => return Err(SpaceJsonError::MissingField("ordering")),
        }
    };

    Ok(IndexLayout::from(blocked, ordering))
}

/// The Error Type for JSON space descriptions which cannot be rebuilt into a
/// [SpaceTree]
#[derive(Debug)]
pub enum SpaceJsonError {
    /// A required field was absent or had the wrong type
    MissingField(&'static str),
    /// The 'kind' field named something other than scalar, composite or power
    UnknownNodeKind(String),
    /// The 'family' field named an unrecognized element family
    UnknownFamily(String),
    /// The 'ordering' field named an unrecognized index ordering
    UnknownOrdering(String),
    /// The description was well-formed JSON but violated a construction rule
    MalformedTree(SpaceTreeError),
}

impl From<SpaceTreeError> for SpaceJsonError {
    fn from(construction_error: SpaceTreeError) -> Self {
        Self::MalformedTree(construction_error)
    }
}

impl std::error::Error for SpaceJsonError {}

impl fmt::Display for SpaceJsonError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::MissingField(field) => write!(
                f,
                "Field '{}' is missing or malformed; Cannot parse SpaceTree from JSON!",
                field
            ),
            Self::UnknownNodeKind(kind) => write!(
                f,
                "'{}' is not a recognized node kind; Cannot parse SpaceTree from JSON!",
                kind
            ),
            Self::UnknownFamily(family) => write!(
                f,
                "'{}' is not a recognized element family; Cannot parse SpaceTree from JSON!",
                family
            ),
            Self::UnknownOrdering(ordering) => write!(
                f,
                "'{}' is not a recognized index ordering; Cannot parse SpaceTree from JSON!",
                ordering
            ),
            Self::MalformedTree(construction_error) => write!(f, "{}", construction_error),
        }
    }
}
