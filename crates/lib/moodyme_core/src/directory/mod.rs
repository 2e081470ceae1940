//! User directory: identity records joined with app profiles.
//!
//! The join is read-only. Profile names win over claim names when present;
//! activity and role always come from the identity record.

pub mod query;

use std::collections::HashMap;

use thiserror::Error;
use tracing::warn;

use crate::documents::{DocumentError, DocumentStore, collections};
use crate::identity::{IdentityError, IdentityProvider, list_all_users};
use crate::models::user::{CombinedUser, Identity, UserProfile};

pub use query::{DEFAULT_PAGE_SIZE, Page, RoleScope, UserQuery};

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error(transparent)]
    Identity(#[from] IdentityError),

    #[error(transparent)]
    Documents(#[from] DocumentError),
}

/// Join one identity with its profile, if any.
pub fn combine_one(identity: Identity, profile: Option<UserProfile>) -> CombinedUser {
    fn prefer(profile_value: Option<&str>, claim_value: &str) -> String {
        match profile_value.map(str::trim) {
            Some(v) if !v.is_empty() => v.to_string(),
            _ => claim_value.to_string(),
        }
    }

    let first_name = prefer(
        profile.as_ref().map(|p| p.first_name.as_str()),
        &identity.first_name,
    );
    let last_name = prefer(
        profile.as_ref().map(|p| p.last_name.as_str()),
        &identity.last_name,
    );
    let full_name = format!("{first_name} {last_name}").trim().to_string();

    CombinedUser {
        uid: identity.id.clone(),
        email: identity.email.clone(),
        disabled: identity.disabled(),
        email_verified: identity.email_verified,
        role: identity.role,
        first_name,
        last_name,
        profile_created_at: profile.as_ref().and_then(|p| p.created_at.clone()),
        allow_email_sent: profile
            .as_ref()
            .and_then(|p| p.allow_email_sent)
            .unwrap_or(false),
        is_active: identity.is_active,
        full_name,
        auth_data: identity,
        profile_data: profile,
    }
}

/// Join identities with profiles keyed by uid. Order follows `identities`.
pub fn combine(identities: Vec<Identity>, profiles: Vec<UserProfile>) -> Vec<CombinedUser> {
    let mut by_uid: HashMap<String, UserProfile> = profiles
        .into_iter()
        .map(|p| (p.owner().to_string(), p))
        .collect();

    identities
        .into_iter()
        .map(|identity| {
            let profile = by_uid.remove(&identity.id);
            combine_one(identity, profile)
        })
        .collect()
}

/// Read every profile document. Unreadable profiles are skipped.
pub async fn load_profiles(
    documents: &dyn DocumentStore,
) -> Result<Vec<UserProfile>, DocumentError> {
    let docs = documents.list(collections::USERS).await?;
    Ok(docs
        .into_iter()
        .filter_map(|doc| match doc.decode::<UserProfile>() {
            Ok(mut profile) => {
                profile.id = Some(doc.id);
                Some(profile)
            }
            Err(e) => {
                warn!(error = %e, "skipping unreadable user profile");
                None
            }
        })
        .collect())
}

/// Every account joined with its profile.
pub async fn load_combined(
    identity: &dyn IdentityProvider,
    documents: &dyn DocumentStore,
) -> Result<Vec<CombinedUser>, DirectoryError> {
    let (identities, profiles) = futures::try_join!(
        async { list_all_users(identity).await.map_err(DirectoryError::from) },
        async { load_profiles(documents).await.map_err(DirectoryError::from) },
    )?;
    Ok(combine(identities, profiles))
}

/// One account joined with its profile; `None` when the account is unknown.
pub async fn find_combined(
    identity: &dyn IdentityProvider,
    documents: &dyn DocumentStore,
    uid: &str,
) -> Result<Option<CombinedUser>, DirectoryError> {
    let Some(found) = identity.get_by_id(uid).await? else {
        return Ok(None);
    };
    let profile = match documents.get(collections::USERS, uid).await? {
        Some(doc) => match doc.decode::<UserProfile>() {
            Ok(mut profile) => {
                profile.id = Some(doc.id);
                Some(profile)
            }
            Err(e) => {
                warn!(uid, error = %e, "ignoring unreadable user profile");
                None
            }
        },
        None => None,
    };
    Ok(Some(combine_one(found, profile)))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::documents::memory::MemoryDocumentStore;
    use crate::identity::memory::MemoryIdentityProvider;
    use crate::models::user::{NewUser, Role};

    fn identity(id: &str, first: &str, last: &str, active: bool) -> Identity {
        Identity {
            id: id.into(),
            email: format!("{id}@moodyme.app"),
            first_name: first.into(),
            last_name: last.into(),
            is_active: active,
            email_verified: false,
            role: Role::User,
            created_at: None,
        }
    }

    #[test]
    fn identity_without_profile_uses_claims() {
        let combined = combine(vec![identity("u1", "Ada", "", false)], Vec::new());
        let user = &combined[0];
        assert!(!user.is_active);
        assert!(user.disabled);
        assert_eq!(user.full_name, "Ada");
        assert!(!user.allow_email_sent);
        assert_eq!(user.profile_data, None);
    }

    #[test]
    fn profile_names_take_precedence_when_present() {
        let profile = UserProfile {
            uid: "u1".into(),
            first_name: "Augusta".into(),
            last_name: String::new(),
            allow_email_sent: Some(true),
            created_at: Some("2024-01-01T00:00:00Z".into()),
            ..Default::default()
        };
        let combined = combine(vec![identity("u1", "Ada", "Lovelace", true)], vec![profile]);
        let user = &combined[0];
        assert_eq!(user.first_name, "Augusta");
        assert_eq!(user.last_name, "Lovelace");
        assert_eq!(user.full_name, "Augusta Lovelace");
        assert!(user.allow_email_sent);
        assert!(user.is_active);
        assert_eq!(user.profile_created_at.as_deref(), Some("2024-01-01T00:00:00Z"));
    }

    #[tokio::test]
    async fn load_combined_joins_by_document_id() {
        let identity = MemoryIdentityProvider::new().with_bcrypt_cost(4);
        let docs = MemoryDocumentStore::new();
        let created = identity
            .create_user(&NewUser {
                email: "ada@moodyme.app".into(),
                first_name: "Ada".into(),
                last_name: "Lovelace".into(),
                password: "password1".into(),
                role: None,
            })
            .await
            .unwrap();
        docs.insert(
            collections::USERS,
            &created.id,
            json!({"firstName": "Countess", "allowEmailSent": true})
                .as_object()
                .cloned()
                .unwrap(),
        )
        .await;
        docs.insert(
            collections::USERS,
            "broken",
            json!({"firstName": 42}).as_object().cloned().unwrap(),
        )
        .await;

        let combined = load_combined(&identity, &docs).await.unwrap();
        assert_eq!(combined.len(), 1);
        assert_eq!(combined[0].first_name, "Countess");
        assert!(combined[0].allow_email_sent);

        let found = find_combined(&identity, &docs, &created.id).await.unwrap();
        assert_eq!(found.map(|u| u.full_name), Some("Countess Lovelace".into()));
        assert!(find_combined(&identity, &docs, "missing").await.unwrap().is_none());
    }
}
