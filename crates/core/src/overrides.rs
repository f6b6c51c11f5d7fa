//! Hand-picked operation ids that take precedence over generated names.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::TransformError;

/// Endpoints whose generated name would be awkward or ambiguous
/// (sending, batches, state transitions, lookups by alternate key).
const BUILTIN_OVERRIDES: &[(&str, &str, &str)] = &[
    ("post", "/emails", "sendEmail"),
    ("post", "/emails/batch", "sendBatchEmails"),
    ("post", "/emails/{email_id}/cancel", "cancelScheduledEmail"),
    ("get", "/emails/{email_id}", "getEmail"),
    ("patch", "/emails/{email_id}", "updateEmail"),
    ("get", "/emails/{email_id}/attachments", "listEmailAttachments"),
    (
        "get",
        "/emails/{email_id}/attachments/{attachment_id}",
        "getEmailAttachment",
    ),
    ("get", "/emails/receiving", "listReceivedEmails"),
    ("get", "/emails/receiving/{email_id}", "getReceivedEmail"),
    (
        "get",
        "/emails/receiving/{email_id}/attachments",
        "listReceivedEmailAttachments",
    ),
    (
        "get",
        "/emails/receiving/{email_id}/attachments/{attachment_id}",
        "getReceivedEmailAttachment",
    ),
    ("post", "/domains", "createDomain"),
    ("get", "/domains", "listDomains"),
    ("get", "/domains/{domain_id}", "getDomain"),
    ("patch", "/domains/{domain_id}", "updateDomain"),
    ("delete", "/domains/{domain_id}", "deleteDomain"),
    ("post", "/domains/{domain_id}/verify", "verifyDomain"),
    ("post", "/api-keys", "createApiKey"),
    ("get", "/api-keys", "listApiKeys"),
    ("delete", "/api-keys/{api_key_id}", "deleteApiKey"),
    ("post", "/audiences", "createAudience"),
    ("get", "/audiences", "listAudiences"),
    ("get", "/audiences/{id}", "getAudience"),
    ("delete", "/audiences/{id}", "deleteAudience"),
    ("post", "/audiences/{audience_id}/contacts", "createContact"),
    ("get", "/audiences/{audience_id}/contacts", "listContacts"),
    (
        "get",
        "/audiences/{audience_id}/contacts/{email}",
        "getContactByEmail",
    ),
    (
        "patch",
        "/audiences/{audience_id}/contacts/{email}",
        "updateContactByEmail",
    ),
    (
        "delete",
        "/audiences/{audience_id}/contacts/{email}",
        "deleteContactByEmail",
    ),
    ("get", "/audiences/{audience_id}/contacts/{id}", "getContactById"),
    (
        "patch",
        "/audiences/{audience_id}/contacts/{id}",
        "updateContactById",
    ),
    (
        "delete",
        "/audiences/{audience_id}/contacts/{id}",
        "deleteContactById",
    ),
    ("post", "/broadcasts", "createBroadcast"),
    ("get", "/broadcasts", "listBroadcasts"),
    ("get", "/broadcasts/{id}", "getBroadcast"),
    ("delete", "/broadcasts/{id}", "deleteBroadcast"),
    ("post", "/broadcasts/{id}/send", "sendBroadcast"),
    ("post", "/webhooks", "createWebhook"),
    ("get", "/webhooks", "listWebhooks"),
    ("get", "/webhooks/{webhook_id}", "getWebhook"),
    ("patch", "/webhooks/{webhook_id}", "updateWebhook"),
    ("delete", "/webhooks/{webhook_id}", "deleteWebhook"),
    ("post", "/templates", "createTemplate"),
    ("get", "/templates", "listTemplates"),
    ("get", "/templates/{id}", "getTemplate"),
    ("patch", "/templates/{id}", "updateTemplate"),
    ("delete", "/templates/{id}", "deleteTemplate"),
    ("post", "/templates/{id}/publish", "publishTemplate"),
    ("post", "/templates/{id}/duplicate", "duplicateTemplate"),
];

/// `(method, path) -> operationId` lookup.
///
/// Methods are stored and looked up lower-cased; paths must match exactly,
/// placeholder names included.
#[derive(Debug, Clone, Default)]
pub struct OverrideTable {
    entries: BTreeMap<(String, String), String>,
}

/// On-disk override file.
///
/// ```yaml
/// overrides:
///   - method: post
///     path: /widgets/{id}/frobnicate
///     operation_id: frobnicateWidget
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OverrideFile {
    /// Entries in file order; later entries win.
    #[serde(default)]
    pub overrides: Vec<OverrideEntry>,
}

/// One entry of an [`OverrideFile`].
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OverrideEntry {
    /// HTTP method, any case.
    pub method: String,
    /// Path template exactly as written under `paths`.
    pub path: String,
    /// Identifier to assign.
    #[serde(alias = "operationId")]
    pub operation_id: String,
}

impl OverrideTable {
    /// An empty table: every name is generated.
    pub fn new() -> Self {
        Self::default()
    }

    /// The table compiled into the tool.
    pub fn builtin() -> Self {
        let mut table = Self::new();
        for (method, path, operation_id) in BUILTIN_OVERRIDES {
            table.insert(method, path, *operation_id);
        }
        table
    }

    /// Parse an [`OverrideFile`] from YAML or JSON text into a table.
    pub fn from_yaml_str(text: &str) -> Result<Self, TransformError> {
        let file: OverrideFile = serde_yaml::from_str(text).map_err(TransformError::Overrides)?;
        let mut table = Self::new();
        table.extend(file.overrides);
        Ok(table)
    }

    /// Add or replace an override, returning the previous identifier.
    pub fn insert(
        &mut self,
        method: &str,
        path: &str,
        operation_id: impl Into<String>,
    ) -> Option<String> {
        self.entries.insert(
            (method.to_ascii_lowercase(), path.to_string()),
            operation_id.into(),
        )
    }

    /// Look up the override for `method` on `path`.
    pub fn get(&self, method: &str, path: &str) -> Option<&str> {
        self.entries
            .get(&(method.to_ascii_lowercase(), path.to_string()))
            .map(String::as_str)
    }

    /// Copy every entry of `other` into this table, replacing collisions.
    pub fn merge(&mut self, other: Self) {
        self.entries.extend(other.entries);
    }

    /// Number of overrides.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no overrides.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate as `(method, path, operation_id)`, sorted by method then path.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, &str)> {
        self.entries
            .iter()
            .map(|((method, path), id)| (method.as_str(), path.as_str(), id.as_str()))
    }
}

impl Extend<OverrideEntry> for OverrideTable {
    fn extend<I: IntoIterator<Item = OverrideEntry>>(&mut self, iter: I) {
        for entry in iter {
            self.insert(&entry.method, &entry.path, entry.operation_id);
        }
    }
}
