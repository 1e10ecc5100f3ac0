use std::path::Path;

use anyhow::Context;
use storefront_core::{Action, PersistedSession, Role};

use crate::SessionCommands;

pub(crate) fn run_session(path: &Path, command: SessionCommands) -> anyhow::Result<()> {
    let state = load_session(path)?.into_state();
    let next = match command {
        SessionCommands::Show => {
            println!("theme: {}", state.theme);
            println!(
                "logged in: {}{}",
                state.auth.is_authenticated,
                if state.auth.role == Role::Admin { " (admin)" } else { "" }
            );
            return Ok(());
        }
        SessionCommands::Login {
            token,
            refresh_token,
            admin,
        } => state.reduce(Action::LoggedIn {
            access_token: token,
            refresh_token,
            role: if admin { Role::Admin } else { Role::Customer },
        }),
        SessionCommands::Logout => state.reduce(Action::LoggedOut),
        SessionCommands::Theme { theme } => state.reduce(Action::SetTheme(theme)),
    };
    save_session(path, &PersistedSession::from(&next))?;
    tracing::debug!(path = %path.display(), "session saved");
    Ok(())
}

/// A missing file is an empty, logged-out session.
pub(crate) fn load_session(path: &Path) -> anyhow::Result<PersistedSession> {
    match std::fs::read_to_string(path) {
        Ok(raw) => serde_json::from_str(&raw)
            .with_context(|| format!("invalid session file {}", path.display())),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(PersistedSession::default()),
        Err(err) => Err(err).with_context(|| format!("failed to read {}", path.display())),
    }
}

pub(crate) fn save_session(path: &Path, session: &PersistedSession) -> anyhow::Result<()> {
    let raw = serde_json::to_string_pretty(session)?;
    std::fs::write(path, raw).with_context(|| format!("failed to write {}", path.display()))
}
