//! Contact records and the typed patch used to edit them.

use serde::{Deserialize, Serialize};

/// One contact as stored in the `"contacts"` entry.
///
/// A fresh contact only has `id` and `created_at`; everything else is filled
/// in later through [`ContactPatch`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    /// Opaque unique id, fixed at creation.
    pub id: String,
    /// Creation time in epoch milliseconds, fixed at creation.
    pub created_at: i64,
    /// First name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first: Option<String>,
    /// Last name; primary sort key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last: Option<String>,
    /// GitHub handle, without the leading `@`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    /// Avatar image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    /// Free-form notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Unset reads as "not a favorite".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favorite: Option<bool>,
}

impl Contact {
    /// Blank record with only the immutable fields set.
    pub fn new(id: impl Into<String>, created_at: i64) -> Self {
        Self {
            id: id.into(),
            created_at,
            first: None,
            last: None,
            github: None,
            avatar: None,
            notes: None,
            favorite: None,
        }
    }

    /// `true` if marked as a favorite.
    #[must_use]
    pub fn is_favorite(&self) -> bool {
        self.favorite.unwrap_or(false)
    }

    /// Last name, or `""` when unset. This is the primary sort key.
    #[must_use]
    pub fn last_or_empty(&self) -> &str {
        self.last.as_deref().unwrap_or("")
    }

    /// `"first last"` with blank parts skipped, or `None` if both are blank.
    /// Callers typically render `None` as "No Name".
    #[must_use]
    pub fn display_name(&self) -> Option<String> {
        let parts: Vec<&str> = [self.first.as_deref(), self.last.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" "))
        }
    }

    /// Overwrite every field present in `patch`. `id` and `created_at` are
    /// not patchable.
    pub fn apply(&mut self, patch: &ContactPatch) {
        if let Some(v) = &patch.first {
            self.first = Some(v.clone());
        }
        if let Some(v) = &patch.last {
            self.last = Some(v.clone());
        }
        if let Some(v) = &patch.github {
            self.github = Some(v.clone());
        }
        if let Some(v) = &patch.avatar {
            self.avatar = Some(v.clone());
        }
        if let Some(v) = &patch.notes {
            self.notes = Some(v.clone());
        }
        if let Some(v) = patch.favorite {
            self.favorite = Some(v);
        }
    }
}

/// Sparse set of field changes. `None` means "leave as is"; `Some("")`
/// stores an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactPatch {
    /// New first name.
    pub first: Option<String>,
    /// New last name.
    pub last: Option<String>,
    /// New GitHub handle.
    pub github: Option<String>,
    /// New avatar URL.
    pub avatar: Option<String>,
    /// New notes.
    pub notes: Option<String>,
    /// New favorite flag.
    pub favorite: Option<bool>,
}

impl ContactPatch {
    /// Empty patch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `first`.
    pub fn first(mut self, v: impl Into<String>) -> Self {
        self.first = Some(v.into());
        self
    }

    /// Set `last`.
    pub fn last(mut self, v: impl Into<String>) -> Self {
        self.last = Some(v.into());
        self
    }

    /// Set `github`.
    pub fn github(mut self, v: impl Into<String>) -> Self {
        self.github = Some(v.into());
        self
    }

    /// Set `avatar`.
    pub fn avatar(mut self, v: impl Into<String>) -> Self {
        self.avatar = Some(v.into());
        self
    }

    /// Set `notes`.
    pub fn notes(mut self, v: impl Into<String>) -> Self {
        self.notes = Some(v.into());
        self
    }

    /// Set `favorite`.
    pub fn favorite(mut self, v: bool) -> Self {
        self.favorite = Some(v);
        self
    }

    /// `true` if the patch changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Build a patch from submitted form fields.
    ///
    /// Every value arrives as a string. `favorite` is `true` only for the
    /// exact string `"true"`. Names that aren't contact fields (including
    /// `id` and `createdAt`) are skipped.
    pub fn from_form<I, K, V>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut patch = Self::default();
        for (name, value) in fields {
            let value = value.into();
            match name.as_ref() {
                "first" => patch.first = Some(value),
                "last" => patch.last = Some(value),
                "github" => patch.github = Some(value),
                "avatar" => patch.avatar = Some(value),
                "notes" => patch.notes = Some(value),
                "favorite" => patch.favorite = Some(value == "true"),
                other => log::debug!("ignoring unknown form field `{other}`"),
            }
        }
        patch
    }
}

/// Favorite state to show while a favorite toggle may still be in flight.
///
/// `pending` is the form being submitted, if any. When it carries a
/// `favorite` field that value wins, so the star flips before the write
/// lands.
#[must_use]
pub fn optimistic_favorite<K, V>(contact: &Contact, pending: Option<&[(K, V)]>) -> bool
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    pending
        .and_then(|fields| {
            fields
                .iter()
                .find(|(name, _)| name.as_ref() == "favorite")
                .map(|(_, value)| value.as_ref() == "true")
        })
        .unwrap_or_else(|| contact.is_favorite())
}
