use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(UserId);
id_newtype!(StoryId);
id_newtype!(CheckInId);
id_newtype!(CollectionId);
id_newtype!(FootprintId);
id_newtype!(OrderId);

/// Identity as returned by `/user/current` and `/user/login`.
///
/// The backend is inconsistent about the avatar field name, so both
/// `avatarUrl` and the older `avatar` alias are accepted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityPayload {
    pub id: UserId,
    pub username: String,
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub id: UserId,
    pub username: String,
    pub nickname: Option<String>,
    pub avatar_url: String,
}

impl Identity {
    pub fn from_payload(payload: IdentityPayload, default_avatar: &str) -> Self {
        let avatar_url = payload
            .avatar_url
            .filter(|url| !url.trim().is_empty())
            .or(payload.avatar.filter(|url| !url.trim().is_empty()))
            .unwrap_or_else(|| default_avatar.to_string());
        Self {
            id: payload.id,
            username: payload.username,
            nickname: payload.nickname.filter(|name| !name.trim().is_empty()),
            avatar_url,
        }
    }

    pub fn display_name(&self) -> &str {
        self.nickname.as_deref().unwrap_or(&self.username)
    }
}

/// Client-held view of who the visitor is. Authenticated exactly when an
/// identity is present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    identity: Option<Identity>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn signed_in(identity: Identity) -> Self {
        Self {
            identity: Some(identity),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }
}
