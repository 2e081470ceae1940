//! In-memory search, filtering and pagination over combined users.

use serde::Serialize;

use crate::models::user::CombinedUser;

/// Default number of users per page.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Which roles a listing includes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RoleScope {
    /// Every non-admin account.
    #[default]
    UsersOnly,
    AdminsOnly,
    All,
}

impl RoleScope {
    fn admits(self, user: &CombinedUser) -> bool {
        match self {
            RoleScope::UsersOnly => !user.role.is_admin(),
            RoleScope::AdminsOnly => user.role.is_admin(),
            RoleScope::All => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserQuery {
    pub search: Option<String>,
    pub is_active: Option<bool>,
    pub scope: RoleScope,
    /// 1-based.
    pub page: usize,
    pub limit: usize,
}

impl Default for UserQuery {
    fn default() -> Self {
        Self {
            search: None,
            is_active: None,
            scope: RoleScope::default(),
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

/// A slice of a filtered listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub page: usize,
    pub limit: usize,
    pub total_pages: usize,
}

impl UserQuery {
    fn matches(&self, needle: Option<&str>, user: &CombinedUser) -> bool {
        if !self.scope.admits(user) {
            return false;
        }
        if self.is_active.is_some_and(|active| active != user.is_active) {
            return false;
        }
        match needle {
            Some(needle) => [
                &user.email,
                &user.first_name,
                &user.last_name,
                &user.full_name,
            ]
            .iter()
            .any(|field| field.to_lowercase().contains(needle)),
            None => true,
        }
    }

    /// Filter `users` and cut out the requested page.
    pub fn apply(&self, users: Vec<CombinedUser>) -> Page<CombinedUser> {
        let needle = self
            .search
            .as_deref()
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty());

        let filtered: Vec<CombinedUser> = users
            .into_iter()
            .filter(|user| self.matches(needle.as_deref(), user))
            .collect();

        let page = self.page.max(1);
        let limit = self.limit.max(1);
        let total = filtered.len();
        let items = filtered
            .into_iter()
            .skip((page - 1).saturating_mul(limit))
            .take(limit)
            .collect();

        Page {
            items,
            total,
            page,
            limit,
            total_pages: total.div_ceil(limit),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::combine_one;
    use crate::models::user::{Identity, Role};

    fn user(id: &str, first: &str, role: Role, active: bool) -> CombinedUser {
        combine_one(
            Identity {
                id: id.into(),
                email: format!("{id}@moodyme.app"),
                first_name: first.into(),
                last_name: "Tester".into(),
                is_active: active,
                email_verified: true,
                role,
                created_at: None,
            },
            None,
        )
    }

    fn sample() -> Vec<CombinedUser> {
        vec![
            user("u1", "Ada", Role::User, true),
            user("a1", "Root", Role::Admin, true),
            user("u2", "Grace", Role::User, false),
            user("u3", "Alan", Role::User, true),
            user("a2", "Ops", Role::Admin, false),
        ]
    }

    #[test]
    fn default_scope_excludes_every_admin() {
        let page = UserQuery::default().apply(sample());
        assert_eq!(page.total, 3);
        assert!(page.items.iter().all(|u| u.role != Role::Admin));
    }

    #[test]
    fn admins_only_scope() {
        let page = UserQuery {
            scope: RoleScope::AdminsOnly,
            ..Default::default()
        }
        .apply(sample());
        assert_eq!(page.total, 2);
    }

    #[test]
    fn search_is_case_insensitive_across_fields() {
        let query = UserQuery {
            search: Some("  GRACE ".into()),
            ..Default::default()
        };
        assert_eq!(query.apply(sample()).total, 1);

        let query = UserQuery {
            search: Some("u3@MOODYME".into()),
            ..Default::default()
        };
        assert_eq!(query.apply(sample()).items[0].uid, "u3");

        let query = UserQuery {
            search: Some("ada tester".into()),
            ..Default::default()
        };
        assert_eq!(query.apply(sample()).total, 1);
    }

    #[test]
    fn active_filter_and_pagination() {
        let query = UserQuery {
            is_active: Some(true),
            page: 2,
            limit: 1,
            ..Default::default()
        };
        let page = query.apply(sample());
        assert_eq!(page.total, 2);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].uid, "u3");
    }

    #[test]
    fn out_of_range_pages_are_empty_and_page_zero_is_first() {
        let page = UserQuery {
            page: 9,
            ..Default::default()
        }
        .apply(sample());
        assert!(page.items.is_empty());
        assert_eq!(page.total_pages, 1);

        let page = UserQuery {
            page: 0,
            ..Default::default()
        }
        .apply(sample());
        assert_eq!(page.page, 1);
        assert_eq!(page.items.len(), 3);

        let empty = UserQuery::default().apply(Vec::new());
        assert_eq!(empty.total_pages, 0);
    }
}
