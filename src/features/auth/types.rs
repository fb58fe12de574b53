use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    User,
    Admin,
    #[serde(alias = "super_admin", alias = "superadmin")]
    SuperAdmin,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::User => "user",
            Self::Admin => "admin",
            Self::SuperAdmin => "super-admin",
        })
    }
}

/// Account status. Learners move between `active`/`inactive`; admin accounts go
/// through `pending`/`approved`/`suspended`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    Active,
    Inactive,
    Approved,
    Pending,
    Suspended,
}

/// Identity snapshot returned by `GET user/me`. Never cached between navigations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawUser")]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub verified: bool,
    pub status: Option<AccountStatus>,
}

/// Wire form of [`User`]. Backends may send `_id` next to `id`, `name` next to
/// `username` and `isVerified` next to `verified`; the first of each pair wins.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawUser {
    #[serde(default)]
    id: Option<String>,
    #[serde(default, rename = "_id")]
    object_id: Option<String>,
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    name: Option<String>,
    email: String,
    role: Role,
    #[serde(default)]
    verified: Option<bool>,
    #[serde(default)]
    is_verified: Option<bool>,
    #[serde(default)]
    status: Option<AccountStatus>,
}

impl TryFrom<RawUser> for User {
    type Error = String;

    fn try_from(raw: RawUser) -> Result<Self, Self::Error> {
        let id = raw
            .id
            .or(raw.object_id)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| "missing field `id`".to_string())?;

        Ok(Self {
            id,
            username: raw.username.or(raw.name).unwrap_or_default(),
            email: raw.email,
            role: raw.role,
            verified: raw.verified.or(raw.is_verified).unwrap_or(false),
            status: raw.status,
        })
    }
}

/// Accepted shapes of the `user/me` payload.
#[derive(Deserialize)]
#[serde(untagged)]
pub(crate) enum MeResponse {
    Wrapped { user: User },
    Data { data: User },
    Bare(User),
}

impl MeResponse {
    pub(crate) fn into_user(self) -> User {
        match self {
            Self::Wrapped { user } | Self::Data { data: user } | Self::Bare(user) => user,
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct VerifyRequest {
    pub email: String,
    pub code: String,
}
