//! Client-side application state: theme, scroll position, and the
//! authenticated session.
//!
//! State is a plain value passed to whoever needs it. Every change goes
//! through [`AppState::reduce`], which returns the next state.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Theme::Light => write!(f, "light"),
            Theme::Dark => write!(f, "dark"),
        }
    }
}

impl std::str::FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("unknown theme \"{other}\" (expected light or dark)")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Customer,
    Admin,
}

#[derive(Clone, Default, PartialEq, Eq)]
pub struct AuthState {
    pub is_authenticated: bool,
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub role: Role,
}

impl std::fmt::Debug for AuthState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthState")
            .field("is_authenticated", &self.is_authenticated)
            .field("access_token", &self.access_token.as_ref().map(|_| "[redacted]"))
            .field(
                "refresh_token",
                &self.refresh_token.as_ref().map(|_| "[redacted]"),
            )
            .field("role", &self.role)
            .finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppState {
    pub theme: Theme,
    /// Last vertical scroll offset, restored on back navigation.
    pub scroll_offset: u32,
    pub auth: AuthState,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    ToggleTheme,
    SetTheme(Theme),
    SetScroll(u32),
    LoggedIn {
        access_token: String,
        refresh_token: Option<String>,
        role: Role,
    },
    TokenRefreshed {
        access_token: String,
    },
    LoggedOut,
}

impl AppState {
    #[must_use]
    pub fn reduce(self, action: Action) -> Self {
        match action {
            Action::ToggleTheme => Self {
                theme: self.theme.toggled(),
                ..self
            },
            Action::SetTheme(theme) => Self { theme, ..self },
            Action::SetScroll(scroll_offset) => Self {
                scroll_offset,
                ..self
            },
            Action::LoggedIn {
                access_token,
                refresh_token,
                role,
            } => Self {
                auth: AuthState {
                    is_authenticated: true,
                    access_token: Some(access_token),
                    refresh_token,
                    role,
                },
                ..self
            },
            // A refresh never resurrects a logged-out session.
            Action::TokenRefreshed { access_token } if self.auth.is_authenticated => Self {
                auth: AuthState {
                    access_token: Some(access_token),
                    ..self.auth
                },
                ..self
            },
            Action::TokenRefreshed { .. } => self,
            Action::LoggedOut => Self {
                auth: AuthState::default(),
                ..self
            },
        }
    }

    #[must_use]
    pub fn access_token(&self) -> Option<&str> {
        if self.auth.is_authenticated {
            self.auth.access_token.as_deref()
        } else {
            None
        }
    }
}

/// The part of [`AppState`] that survives a restart.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedSession {
    #[serde(default)]
    pub theme: Theme,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub role: Role,
}

impl std::fmt::Debug for PersistedSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistedSession")
            .field("theme", &self.theme)
            .field("access_token", &self.access_token.as_ref().map(|_| "[redacted]"))
            .field(
                "refresh_token",
                &self.refresh_token.as_ref().map(|_| "[redacted]"),
            )
            .field("role", &self.role)
            .finish()
    }
}

impl From<&AppState> for PersistedSession {
    fn from(state: &AppState) -> Self {
        Self {
            theme: state.theme,
            access_token: state.access_token().map(str::to_owned),
            refresh_token: state.auth.refresh_token.clone(),
            role: state.auth.role,
        }
    }
}

impl PersistedSession {
    /// Rebuilds application state; a stored token restores the login.
    #[must_use]
    pub fn into_state(self) -> AppState {
        let state = AppState::default().reduce(Action::SetTheme(self.theme));
        match self.access_token {
            Some(access_token) => state.reduce(Action::LoggedIn {
                access_token,
                refresh_token: self.refresh_token,
                role: self.role,
            }),
            None => state,
        }
    }
}
