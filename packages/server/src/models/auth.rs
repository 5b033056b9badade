use serde::Serialize;

use crate::extractors::auth::AuthUser;

/// Current session's user profile.
#[derive(Serialize, utoipa::ToSchema)]
pub struct MeResponse {
    /// Subject identifier issued by the session provider.
    #[schema(example = "clx1a2b3c0000abcd")]
    pub id: String,
    #[schema(example = "Ada Lovelace")]
    pub name: Option<String>,
    #[schema(example = "ada@example.com")]
    pub email: Option<String>,
    pub image: Option<String>,
}

impl From<AuthUser> for MeResponse {
    fn from(user: AuthUser) -> Self {
        Self {
            id: user.user_id,
            name: user.name,
            email: user.email,
            image: user.image,
        }
    }
}
