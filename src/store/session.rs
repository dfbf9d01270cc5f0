use color_eyre::eyre::Result;
use log::info;

use super::{Storage, SESSION_KEY, SHOW_ONLY_SAVED_KEY};

/// The demo session: the presence of a stored email is the sole signal of
/// "signed in". There is no credential store, no expiry and no per-user
/// scoping.
///
/// The session is initialized from storage once and mutated only through
/// [`Session::sign_in`] and [`Session::sign_out`]; nothing re-reads the
/// marker ambiently.
#[derive(Debug, Default)]
pub struct Session {
    email: Option<String>,
}

impl Session {
    pub fn load(storage: &Storage) -> Session {
        Session {
            email: storage.get(SESSION_KEY),
        }
    }

    pub fn signed_in(&self) -> bool {
        self.email.is_some()
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// Store the email as the session marker. The password is accepted
    /// unconditionally; this is a demonstration, not authentication.
    pub fn sign_in(&mut self, storage: &Storage, email: &str, _password: &str) -> Result<()> {
        storage.set(SESSION_KEY, email)?;
        self.email = Some(email.to_string());
        info!("signed in as {}", email);
        Ok(())
    }

    /// Clear the marker and the "show only saved" view flag.
    pub fn sign_out(&mut self, storage: &Storage) -> Result<()> {
        storage.remove(SESSION_KEY)?;
        storage.remove(SHOW_ONLY_SAVED_KEY)?;
        if let Some(email) = self.email.take() {
            info!("signed out {}", email);
        }
        Ok(())
    }
}
