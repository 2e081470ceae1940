//! Dashboard statistics.

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::content::{ContentError, ContentStore};
use crate::identity::{IdentityError, IdentityProvider, list_all_users};
use crate::models::content::Content;
use crate::models::user::Identity;

/// Number of recent sign-ups shown on the dashboard.
pub const RECENT_USERS: usize = 5;

#[derive(Debug, Error)]
pub enum StatsError {
    #[error(transparent)]
    Identity(#[from] IdentityError),

    #[error(transparent)]
    Content(#[from] ContentError),
}

/// Counts over non-admin accounts and the content set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_users: usize,
    pub active_users: usize,
    pub inactive_users: usize,
    pub content_count: usize,
    pub active_content: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentUser {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub created_at: Option<DateTime<Utc>>,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub stats: DashboardStats,
    pub recent_users: Vec<RecentUser>,
}

/// Summarize accounts and content. Admin accounts are not counted.
pub fn summarize(identities: &[Identity], contents: &[Content]) -> Dashboard {
    let mut users: Vec<&Identity> = identities.iter().filter(|u| !u.role.is_admin()).collect();
    let active_users = users.iter().filter(|u| u.is_active).count();

    let stats = DashboardStats {
        total_users: users.len(),
        active_users,
        inactive_users: users.len() - active_users,
        content_count: contents.len(),
        active_content: contents.iter().filter(|c| c.is_active).count(),
    };

    // Newest first; accounts without a creation time sort last.
    users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    let recent_users = users
        .into_iter()
        .take(RECENT_USERS)
        .map(|u| RecentUser {
            id: u.id.clone(),
            email: u.email.clone(),
            first_name: u.first_name.clone(),
            last_name: u.last_name.clone(),
            created_at: u.created_at,
            is_active: u.is_active,
        })
        .collect();

    Dashboard {
        stats,
        recent_users,
    }
}

/// Gather accounts and content concurrently and summarize them.
pub async fn dashboard_stats(
    identity: &dyn IdentityProvider,
    content: ContentStore<'_>,
) -> Result<Dashboard, StatsError> {
    let (identities, contents) = futures::try_join!(
        async { list_all_users(identity).await.map_err(StatsError::from) },
        async { content.get_all().await.map_err(StatsError::from) },
    )?;
    Ok(summarize(&identities, &contents))
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::content::seed::seed_content;
    use crate::documents::memory::MemoryDocumentStore;
    use crate::identity::memory::MemoryIdentityProvider;
    use crate::models::user::{NewUser, Role};

    fn identity(id: &str, role: Role, active: bool, age_days: i64) -> Identity {
        Identity {
            id: id.into(),
            email: format!("{id}@moodyme.app"),
            first_name: "Mo".into(),
            last_name: "Dy".into(),
            is_active: active,
            email_verified: false,
            role,
            created_at: Some(Utc::now() - Duration::days(age_days)),
        }
    }

    #[test]
    fn admins_are_excluded_and_recent_is_newest_first() {
        let mut identities: Vec<Identity> = (0..7)
            .map(|i| identity(&format!("u{i}"), Role::User, i % 2 == 0, i))
            .collect();
        identities.push(identity("admin", Role::Admin, true, 0));
        identities.push(Identity {
            created_at: None,
            ..identity("undated", Role::User, true, 0)
        });

        let dashboard = summarize(&identities, &[]);
        assert_eq!(dashboard.stats.total_users, 8);
        assert_eq!(dashboard.stats.active_users, 5);
        assert_eq!(dashboard.stats.inactive_users, 3);

        let recent: Vec<_> = dashboard.recent_users.iter().map(|u| u.id.as_str()).collect();
        assert_eq!(recent, ["u0", "u1", "u2", "u3", "u4"]);
    }

    #[tokio::test]
    async fn dashboard_counts_seeded_content() {
        let identity = MemoryIdentityProvider::new().with_bcrypt_cost(4);
        let docs = MemoryDocumentStore::new();
        seed_content(&docs).await.unwrap();
        identity
            .create_user(&NewUser {
                email: "ada@moodyme.app".into(),
                first_name: "Ada".into(),
                last_name: "Lovelace".into(),
                password: "password1".into(),
                role: None,
            })
            .await
            .unwrap();

        let store = ContentStore::new(&docs);
        let all = store.get_all().await.unwrap();
        store.deactivate(&all[0].id).await.unwrap();

        let dashboard = dashboard_stats(&identity, store).await.unwrap();
        assert_eq!(dashboard.stats.total_users, 1);
        assert_eq!(dashboard.stats.content_count, 7);
        assert_eq!(dashboard.stats.active_content, 6);
        assert_eq!(dashboard.recent_users.len(), 1);
    }
}
