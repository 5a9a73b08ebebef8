use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Tenant company as stored in the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Company {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub industry: Option<String>,
    pub created: Option<String>,
}

/// Authenticated backend user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BackendUser {
    pub id: String,
    pub email: Option<String>,
    pub name: Option<String>,
}

/// Token plus user returned by a successful password login
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthSession {
    pub token: String,
    pub user: BackendUser,
}
