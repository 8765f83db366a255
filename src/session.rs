use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::client::ApiClient;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::navigation::{self, DashboardWidget, NavItem};
use crate::permissions::{PermissionSet, WirePermissions};
use crate::roles::Role;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub company_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MeResponse {
    #[serde(default)]
    id: String,
    username: String,
    #[serde(default)]
    full_name: String,
    #[serde(default)]
    email: String,
    role: String,
    #[serde(default)]
    company_id: Option<String>,
    #[serde(default)]
    permissions: Option<WirePermissions>,
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// The authenticated user's context. Built once, never mutated.
#[derive(Debug, Clone)]
pub struct Session {
    token: String,
    user: UserProfile,
    permissions: PermissionSet,
}

impl Session {
    pub fn new(token: String, user: UserProfile, permissions: PermissionSet) -> Self {
        Self {
            token,
            user,
            permissions,
        }
    }

    /// Resolve the user behind `token` and fix its permission set.
    pub async fn establish(config: &Config, token: &str) -> Result<Self> {
        let client = ApiClient::with_token(config, token)?;
        let me: MeResponse = client.get("/api/me").await?;

        let role: Role = me
            .role
            .parse()
            .map_err(|_| Error::Session(format!("unknown role '{}'", me.role)))?;

        let permissions = match &me.permissions {
            Some(wire) => PermissionSet::from_wire(wire)?,
            None => PermissionSet::for_role(role),
        };

        let user = UserProfile {
            id: me.id,
            username: me.username,
            full_name: me.full_name,
            email: me.email,
            role,
            company_id: me.company_id,
        };

        tracing::info!("Session established for {} ({})", user.username, role);

        Ok(Self::new(token.to_string(), user, permissions))
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn user(&self) -> &UserProfile {
        &self.user
    }

    pub fn role(&self) -> Role {
        self.user.role
    }

    pub fn permissions(&self) -> &PermissionSet {
        &self.permissions
    }

    pub fn nav_items(&self) -> Vec<NavItem> {
        navigation::nav_items_for_role(self.role(), Some(&self.permissions))
    }

    pub fn dashboard_widgets(&self) -> Vec<DashboardWidget> {
        navigation::dashboard_widgets_for_role(self.role(), Some(&self.permissions))
    }
}

/// Exchange credentials for a bearer token.
pub async fn login(config: &Config, username: &str, password: &str) -> Result<String> {
    let client = ApiClient::anonymous(config)?;
    let token: TokenResponse = client
        .post_json("/api/login", &LoginRequest { username, password })
        .await?;
    Ok(token.access_token)
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredToken {
    token: String,
}

/// Persists the bearer token, the only local state kept between runs.
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(config: &Config) -> Self {
        Self {
            path: config.data_dir.join("session.json"),
        }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    pub fn load(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&self.path)?;
        let stored: StoredToken = serde_json::from_str(&contents)?;
        Ok(Some(stored.token))
    }

    pub fn save(&self, token: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string(&StoredToken {
            token: token.to_string(),
        })?;
        fs::write(&self.path, contents)?;
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }

    pub fn require(&self) -> Result<String> {
        self.load()?
            .ok_or_else(|| Error::Session("not logged in; run 'siteboard login' first".to_string()))
    }
}
