use serde::Serialize;

/// A category as embedded in document responses and category listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct CategoryRef {
    #[schema(example = 3)]
    pub id: i32,
    #[schema(example = "Compliance")]
    pub name: String,
}

/// A tag as embedded in document responses and tag listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct TagRef {
    #[schema(example = 11)]
    pub id: i32,
    #[schema(example = "insurance")]
    pub name: String,
}

impl From<crate::entity::category::Model> for CategoryRef {
    fn from(m: crate::entity::category::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
        }
    }
}

impl From<crate::entity::tag::Model> for TagRef {
    fn from(m: crate::entity::tag::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
        }
    }
}
