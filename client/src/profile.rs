//! Profile/context resolution. The miniapp host, when present, owns the
//! identity; outside a host the profile comes from local storage, and a
//! first run resolves to `NeedsUsername` so the UI can collect a name
//! without blocking initialization.

use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::storage::{ProfileStore, StorageError};

/// The identity scores are recorded under. `fid` is either the host
/// user id or a locally minted pseudo-id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub username: String,
    pub fid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pfp_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileSource {
    /// Adopted from the miniapp host context; immutable from the app.
    Host,
    /// Locally created and persisted; the user may rename or clear it.
    Local,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActiveProfile {
    pub profile: UserProfile,
    pub source: ProfileSource,
}

/// User record embedded in the host context.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostUser {
    pub fid: u64,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub pfp_url: Option<String>,
}

#[derive(thiserror::Error, Debug)]
#[error("miniapp host unavailable")]
pub struct HostUnavailable;

/// Host SDK seam. `init` signals host readiness (the host dismisses its
/// splash screen) and reads the embedded user context: `Ok(None)` means
/// the host answered but carries no user; `Err` means no host at all.
/// Both resolve through the local fallback, as an expected alternate path
/// rather than an error.
pub trait HostContext {
    fn init(&self) -> Result<Option<HostUser>, HostUnavailable>;
}

/// Reads a JSON host context from the `MINIAPP_CONTEXT` env var, e.g.
/// `{"user":{"fid":194,"username":"zoe"}}`.
pub struct EnvContext;

impl HostContext for EnvContext {
    fn init(&self) -> Result<Option<HostUser>, HostUnavailable> {
        #[derive(Deserialize)]
        struct Context {
            #[serde(default)]
            user: Option<HostUser>,
        }
        let raw = std::env::var("MINIAPP_CONTEXT").map_err(|_| HostUnavailable)?;
        let context: Context = serde_json::from_str(&raw).map_err(|_| HostUnavailable)?;
        Ok(context.user)
    }
}

#[derive(Debug, PartialEq)]
pub enum Resolution {
    Ready(ActiveProfile),
    /// No host identity and nothing stored: the UI must collect a
    /// username and call [`ProfileResolver::complete`].
    NeedsUsername,
}

#[derive(thiserror::Error, Debug)]
pub enum ProfileError {
    #[error("username is managed by the host")]
    ManagedByHost,
    #[error("username must not be empty")]
    EmptyUsername,
    #[error(transparent)]
    Storage(#[from] StorageError),
}

pub struct ProfileResolver<C, P> {
    context: C,
    store: P,
}

impl<C: HostContext, P: ProfileStore> ProfileResolver<C, P> {
    pub fn new(context: C, store: P) -> Self {
        Self { context, store }
    }

    pub fn resolve(&self) -> Resolution {
        match self.context.init() {
            Ok(Some(user)) => {
                tracing::info!(fid = user.fid, "adopted host identity");
                Resolution::Ready(ActiveProfile {
                    profile: UserProfile::from_host(user),
                    source: ProfileSource::Host,
                })
            }
            Ok(None) => {
                tracing::info!("host context carries no user, using local identity");
                self.local()
            }
            Err(HostUnavailable) => {
                tracing::info!("running outside miniapp host, using local identity");
                self.local()
            }
        }
    }

    fn local(&self) -> Resolution {
        match self.store.load() {
            Ok(Some(profile)) => Resolution::Ready(ActiveProfile {
                profile,
                source: ProfileSource::Local,
            }),
            Ok(None) => Resolution::NeedsUsername,
            Err(err) => {
                tracing::warn!(error = %err, "profile storage unreadable");
                Resolution::NeedsUsername
            }
        }
    }

    /// Finish a `NeedsUsername` resolution: trim the entered name (empty
    /// falls back to "anonymous"), mint a pseudo-id and persist.
    pub fn complete(&self, username: &str) -> Result<ActiveProfile, StorageError> {
        let username = username.trim();
        let username = if username.is_empty() {
            "anonymous"
        } else {
            username
        };
        let profile = UserProfile {
            username: username.to_string(),
            fid: mint_pseudo_fid(&mut rand::thread_rng()),
            display_name: None,
            pfp_url: None,
        };
        self.store.save(&profile)?;
        Ok(ActiveProfile {
            profile,
            source: ProfileSource::Local,
        })
    }

    /// Rename a local profile, keeping its fid. Host identities are
    /// immutable from the app's perspective.
    pub fn rename(&self, active: &ActiveProfile, username: &str) -> Result<ActiveProfile, ProfileError> {
        if active.source == ProfileSource::Host {
            return Err(ProfileError::ManagedByHost);
        }
        let username = username.trim();
        if username.is_empty() {
            return Err(ProfileError::EmptyUsername);
        }
        let profile = UserProfile {
            username: username.to_string(),
            ..active.profile.clone()
        };
        self.store.save(&profile)?;
        Ok(ActiveProfile {
            profile,
            source: ProfileSource::Local,
        })
    }

    /// Forget a local profile; the next resolve will ask for a name again.
    pub fn clear(&self, active: &ActiveProfile) -> Result<Resolution, ProfileError> {
        if active.source == ProfileSource::Host {
            return Err(ProfileError::ManagedByHost);
        }
        self.store.clear()?;
        Ok(Resolution::NeedsUsername)
    }
}

impl UserProfile {
    fn from_host(user: HostUser) -> Self {
        let username = user
            .username
            .clone()
            .unwrap_or_else(|| format!("user{}", user.fid));
        Self {
            display_name: user.display_name.or_else(|| Some(username.clone())),
            username,
            fid: user.fid.to_string(),
            pfp_url: user.pfp_url,
        }
    }
}

/// Short random pseudo-id for identities minted outside the host.
fn mint_pseudo_fid<R: Rng + ?Sized>(rng: &mut R) -> String {
    rng.sample_iter(&Alphanumeric)
        .take(8)
        .map(|b| (b as char).to_ascii_lowercase())
        .collect()
}
