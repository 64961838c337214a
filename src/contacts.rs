use serde::Deserialize;

use crate::User;

/// Optional filters for [`User::contacts`](crate::User::contacts).
///
/// Unset filters are left out of the request entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactsQuery {
    search: Option<String>,
    contact_type: Option<String>,
    limit: Option<u32>,
}

impl ContactsQuery {
    /// Only return contacts whose name contains `search`
    #[must_use]
    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// Only return contacts from the given source, for example "Facebook"
    #[must_use]
    pub fn contact_type(mut self, contact_type: impl Into<String>) -> Self {
        self.contact_type = Some(contact_type.into());
        self
    }

    /// Return at most `limit` contacts
    #[must_use]
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// The query parameters in the order the API expects them
    pub(crate) fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::with_capacity(3);
        if let Some(search) = &self.search {
            params.push(("search", search.clone()));
        }
        if let Some(contact_type) = &self.contact_type {
            params.push(("type", contact_type.clone()));
        }
        if let Some(limit) = self.limit {
            params.push(("limit", limit.to_string()));
        }
        params
    }
}

/// One entry of the `/contacts` list
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct Contact {
    id: String,
    name: String,
    #[serde(rename = "Type")]
    contact_type: String,
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    state: Option<String>,
}

impl From<Contact> for User {
    fn from(contact: Contact) -> Self {
        Self {
            id: Some(contact.id),
            name: Some(contact.name),
            city: contact.city,
            state: contact.state,
            image: contact.image,
            contact_type: Some(contact.contact_type),
            ..Self::default()
        }
    }
}
