use std::sync::Arc;

use mindease_persist::{ProfileStore, ProfileUpdate, UserProfile};

use crate::persister::TranscriptPersister;
use crate::prompt::ProfileProjection;
use crate::session::ConversationSession;

/// The signed-in identity, passed explicitly to whatever needs it.
///
/// Created once the identity provider hands back a user, dropped on sign-out.
pub struct AuthSession {
    store: Arc<dyn ProfileStore>,
    profile: UserProfile,
}

impl AuthSession {
    /// Load the profile for `uid`, creating it with empty defaults on first login
    pub async fn establish(
        store: Arc<dyn ProfileStore>,
        uid: &str,
        email: &str,
    ) -> mindease_persist::Result<Self> {
        let profile = match store.get(uid).await? {
            Some(profile) => profile,
            None => {
                tracing::info!(uid = %uid, "First login, creating profile");
                store.create(uid, email, ProfileUpdate::default()).await?
            }
        };

        Ok(Self { store, profile })
    }

    pub fn uid(&self) -> &str {
        &self.profile.uid
    }

    pub fn email(&self) -> &str {
        &self.profile.email
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    pub fn projection(&self) -> ProfileProjection {
        ProfileProjection::from(&self.profile)
    }

    /// Persist a partial update, then mirror it locally
    pub async fn update_profile(
        &mut self,
        update: ProfileUpdate,
    ) -> mindease_persist::Result<&UserProfile> {
        self.store.update(&self.profile.uid, update.clone()).await?;
        self.profile.apply(update);
        Ok(&self.profile)
    }

    /// New conversation greeting this user, recording every turn for them
    pub fn open_conversation(&self, persister: TranscriptPersister) -> ConversationSession {
        let name = Some(self.profile.name.as_str()).filter(|n| !n.is_empty());
        ConversationSession::new(name).with_persistence(persister, self.uid())
    }

    pub fn sign_out(self) -> String {
        tracing::info!(uid = %self.profile.uid, "Signed out");
        self.profile.uid
    }
}
