//! Engine configuration.
//!
//! Options are plain serde data so they can be embedded in an application's
//! own configuration file. With the `toml` feature they can also be read on
//! their own:
//!
//! ```toml
//! stop_on_first_error = true
//! use_qualified_field_names_as_labels = true
//!
//! [tag_names]
//! validator = "rules"
//! ```

use serde::{Deserialize, Serialize};

/// Names of the tag channels a record's fields are read from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TagNames {
    /// Validator rule chain, e.g. `validator = "required|min(3)"`.
    pub validator: String,
    /// Filter rule chain, e.g. `filter = "trim|lower"`.
    pub filter: String,
    /// Comma-separated activation triggers.
    pub trigger: String,
    /// Fixed error message overriding rule messages.
    pub message: String,
    /// Display label used in errors.
    pub label: String,
    /// `|`-separated behavioural flags such as `allow_zero`.
    pub flags: String,
}

impl Default for TagNames {
    fn default() -> Self {
        Self {
            validator: "validator".to_owned(),
            filter: "filter".to_owned(),
            trigger: "trigger".to_owned(),
            message: "message".to_owned(),
            label: "label".to_owned(),
            flags: "flags".to_owned(),
        }
    }
}

impl TagNames {
    fn channels(&self) -> [(&'static str, &str); 6] {
        [
            ("validator", &self.validator),
            ("filter", &self.filter),
            ("trigger", &self.trigger),
            ("message", &self.message),
            ("label", &self.label),
            ("flags", &self.flags),
        ]
    }
}

/// Behavioural switches for schema compilation and execution.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationOptions {
    /// Per-channel tag name overrides.
    pub tag_names: TagNames,

    /// Stop evaluating a field's validators after its first failure. The
    /// field's filters are skipped too; other fields still run.
    pub stop_on_first_error: bool,

    /// Append the failing rule's name to generated default messages.
    pub expose_rule_names_in_default_messages: bool,

    /// List the permitted values in `enum`-style rule messages.
    pub expose_allowed_values_in_default_messages: bool,

    /// Let a registration silently replace an existing rule of the same name.
    pub allow_duplicate_rule_registration: bool,

    /// Use dotted paths (`address.zip`) instead of bare field names as labels.
    pub use_qualified_field_names_as_labels: bool,
}

/// Invalid option values.
#[derive(Debug, thiserror::Error)]
pub enum OptionsError {
    /// A tag channel name is empty.
    #[error("tag name for the {channel} channel must not be empty")]
    EmptyTagName {
        /// Channel whose name is empty.
        channel: &'static str,
    },

    /// Two channels read from the same tag.
    #[error("the {first} and {second} channels both use tag `{name}`")]
    DuplicateTagName {
        /// First channel using the name.
        first: &'static str,
        /// Second channel using the name.
        second: &'static str,
        /// The shared tag name.
        name: String,
    },

    /// The TOML source could not be deserialized.
    #[cfg(feature = "toml")]
    #[error("invalid options document: {0}")]
    Toml(#[from] toml::de::Error),
}

impl ValidationOptions {
    /// Creates the default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets [`stop_on_first_error`](Self::stop_on_first_error).
    pub fn with_stop_on_first_error(mut self, enabled: bool) -> Self {
        self.stop_on_first_error = enabled;
        self
    }

    /// Sets [`expose_rule_names_in_default_messages`](Self::expose_rule_names_in_default_messages).
    pub fn with_rule_names_in_messages(mut self, enabled: bool) -> Self {
        self.expose_rule_names_in_default_messages = enabled;
        self
    }

    /// Sets [`expose_allowed_values_in_default_messages`](Self::expose_allowed_values_in_default_messages).
    pub fn with_allowed_values_in_messages(mut self, enabled: bool) -> Self {
        self.expose_allowed_values_in_default_messages = enabled;
        self
    }

    /// Sets [`allow_duplicate_rule_registration`](Self::allow_duplicate_rule_registration).
    pub fn with_duplicate_registration(mut self, allowed: bool) -> Self {
        self.allow_duplicate_rule_registration = allowed;
        self
    }

    /// Sets [`use_qualified_field_names_as_labels`](Self::use_qualified_field_names_as_labels).
    pub fn with_qualified_labels(mut self, enabled: bool) -> Self {
        self.use_qualified_field_names_as_labels = enabled;
        self
    }

    /// Replaces the tag channel names.
    pub fn with_tag_names(mut self, tag_names: TagNames) -> Self {
        self.tag_names = tag_names;
        self
    }

    /// Checks that every channel has a distinct, non-empty tag name.
    pub fn check(&self) -> Result<(), OptionsError> {
        let channels = self.tag_names.channels();
        for (i, &(channel, name)) in channels.iter().enumerate() {
            if name.trim().is_empty() {
                return Err(OptionsError::EmptyTagName { channel });
            }
            if let Some(&(first, _)) = channels[..i].iter().find(|&&(_, n)| n == name) {
                return Err(OptionsError::DuplicateTagName {
                    first,
                    second: channel,
                    name: name.to_owned(),
                });
            }
        }
        Ok(())
    }

    /// Parses options from a TOML document and checks them.
    #[cfg(feature = "toml")]
    pub fn from_toml_str(source: &str) -> Result<Self, OptionsError> {
        let options: Self = toml::from_str(source)?;
        options.check()?;
        Ok(options)
    }
}
