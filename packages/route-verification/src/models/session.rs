use serde::{Deserialize, Serialize};

/// Who is signed in, with the identifiers each role carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum Role {
    Villager {
        village_name: String,
    },
    Contractor {
        contractor_id: String,
    },
    #[serde(rename = "government_official")]
    Official {
        government_id: String,
        village_name: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown role: {0}")]
pub struct UnknownRole(pub String);

impl Role {
    /// Role name as the platform API spells it
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Villager { .. } => "villager",
            Role::Contractor { .. } => "contractor",
            Role::Official { .. } => "government_official",
        }
    }

    /// Check a backend role string without building the identifiers
    pub fn validate_name(name: &str) -> Result<&'static str, UnknownRole> {
        match name {
            "villager" => Ok("villager"),
            "contractor" => Ok("contractor"),
            "government_official" | "official" => Ok("government_official"),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

/// Explicit session value handed to every view after login
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSession {
    pub user_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(flatten)]
    pub role: Role,
}

/// Identity used on the official/contractor discussion channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatIdentity {
    Official { user_id: String, village_name: String },
    Contractor { user_id: String },
}

impl UserSession {
    /// Landing route after login
    pub fn home_path(&self) -> &'static str {
        match self.role {
            Role::Villager { .. } => "/village-dashboard",
            Role::Contractor { .. } => "/contractor-dashboard",
            Role::Official { .. } => "/official-dashboard",
        }
    }

    /// Villagers have no access to the official/contractor chat
    pub fn chat_identity(&self) -> Option<ChatIdentity> {
        match &self.role {
            Role::Villager { .. } => None,
            Role::Contractor { .. } => Some(ChatIdentity::Contractor {
                user_id: self.user_id.clone(),
            }),
            Role::Official { village_name, .. } => Some(ChatIdentity::Official {
                user_id: self.user_id.clone(),
                village_name: village_name.clone(),
            }),
        }
    }

    /// Only contractors capture route verification photos
    pub fn can_capture_photos(&self) -> bool {
        matches!(self.role, Role::Contractor { .. })
    }

    /// Only officials place route start/end markers
    pub fn can_plan_routes(&self) -> bool {
        matches!(self.role, Role::Official { .. })
    }

    /// Bearer header value, if the session holds a token
    pub fn authorization(&self) -> Option<String> {
        self.token.as_ref().map(|t| format!("Bearer {}", t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn official() -> UserSession {
        UserSession {
            user_id: "64f0c2".to_string(),
            name: "Asha".to_string(),
            token: Some("tok".to_string()),
            role: Role::Official {
                government_id: "GOV-12".to_string(),
                village_name: "Hosur".to_string(),
            },
        }
    }

    #[test]
    fn test_deserialize_backend_user() {
        let json = r#"{
            "user_id": "abc",
            "name": "Ravi",
            "role": "contractor",
            "contractor_id": "CON-7"
        }"#;
        let session: UserSession = serde_json::from_str(json).unwrap();
        assert_eq!(
            session.role,
            Role::Contractor {
                contractor_id: "CON-7".to_string()
            }
        );
        assert_eq!(session.token, None);
        assert_eq!(session.home_path(), "/contractor-dashboard");
        assert!(session.can_capture_photos());
    }

    #[test]
    fn test_official_round_trip_uses_backend_role_name() {
        let session = official();
        let value = serde_json::to_value(&session).unwrap();
        assert_eq!(value["role"], "government_official");
        assert_eq!(value["village_name"], "Hosur");

        let back: UserSession = serde_json::from_value(value).unwrap();
        assert_eq!(back, session);
    }

    #[test]
    fn test_chat_identity_per_role() {
        assert_eq!(
            official().chat_identity(),
            Some(ChatIdentity::Official {
                user_id: "64f0c2".to_string(),
                village_name: "Hosur".to_string()
            })
        );

        let villager = UserSession {
            user_id: "v1".to_string(),
            name: "Meena".to_string(),
            token: None,
            role: Role::Villager {
                village_name: "Hosur".to_string(),
            },
        };
        assert_eq!(villager.chat_identity(), None);
        assert_eq!(villager.home_path(), "/village-dashboard");
        assert!(!villager.can_plan_routes());
    }

    #[test]
    fn test_role_names() {
        assert_eq!(official().role.as_str(), "government_official");
        assert_eq!(Role::validate_name("official"), Ok("government_official"));
        assert_eq!(
            Role::validate_name("admin"),
            Err(UnknownRole("admin".to_string()))
        );
        assert_eq!(official().authorization().as_deref(), Some("Bearer tok"));
    }
}
