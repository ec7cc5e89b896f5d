/// Registration allow-list
///
/// Emails on the list are activated at signup; everyone else starts pending.
/// Entries and candidates are compared trimmed and lowercased.

use std::collections::HashSet;

use crate::models::UserStatus;

#[derive(Debug, Clone, Default)]
pub struct AllowList {
    emails: HashSet<String>,
}

impl AllowList {
    pub fn new<I, S>(emails: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let emails = emails
            .into_iter()
            .map(|email| normalize(email.as_ref()))
            .filter(|email| !email.is_empty())
            .collect();
        Self { emails }
    }

    /// Parses a comma separated list, as found in `REGISTRATION_ALLOW_LIST`
    pub fn parse(raw: &str) -> Self {
        Self::new(raw.split(','))
    }

    pub fn contains(&self, email: &str) -> bool {
        self.emails.contains(&normalize(email))
    }

    pub fn initial_status(&self, email: &str) -> UserStatus {
        if self.contains(email) {
            UserStatus::Active
        } else {
            UserStatus::Pending
        }
    }

    pub fn len(&self) -> usize {
        self.emails.len()
    }

    pub fn is_empty(&self) -> bool {
        self.emails.is_empty()
    }
}

fn normalize(email: &str) -> String {
    email.trim().to_lowercase()
}
