//! Message properties: moderation flag, dig counter, origin address, and
//! free-form key/value pairs.
//!
//! Reserved keys are held as typed fields and flattened back into the
//! property list whenever the full set is published, so a replayed
//! `MessagePropertiesRevised` event restores every value.

use super::MessageId;
use crate::message::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Property name of the moderation flag.
pub const MASKED_KEY: &str = "masked";
/// Property name of the dig counter.
pub const DIG_COUNT_KEY: &str = "dig_count";
/// Property name of the origin IP address.
pub const POST_IP_KEY: &str = "post_ip";

/// A single named property value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Property {
    /// The property name.
    pub name: String,
    /// The property value.
    pub value: String,
}

impl Property {
    /// Creates a property.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// All properties recorded against one message.
///
/// # Examples
///
/// ```
/// use agora::message::domain::{MessageId, Property, PropertySet};
///
/// let mut set = PropertySet::from_properties(
///     MessageId::new(1),
///     vec![Property::new("dig_count", "2"), Property::new("tag", "rust")],
/// ).expect("valid properties");
/// set.add_dig();
/// assert_eq!(set.dig_count(), 3);
/// assert_eq!(set.get("tag"), Some("rust"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertySet {
    message_id: MessageId,
    masked: bool,
    dig_count: u32,
    post_ip: Option<String>,
    extra: BTreeMap<String, String>,
}

impl PropertySet {
    /// Creates an empty property set.
    #[must_use]
    pub const fn empty(message_id: MessageId) -> Self {
        Self {
            message_id,
            masked: false,
            dig_count: 0,
            post_ip: None,
            extra: BTreeMap::new(),
        }
    }

    /// Builds a property set from a flat property list.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidProperty`] when a reserved key holds
    /// a value of the wrong shape.
    pub fn from_properties(
        message_id: MessageId,
        properties: impl IntoIterator<Item = Property>,
    ) -> Result<Self, ValidationError> {
        let mut set = Self::empty(message_id);
        set.merge(properties)?;
        Ok(set)
    }

    /// Returns the owning message identifier.
    #[must_use]
    pub const fn message_id(&self) -> MessageId {
        self.message_id
    }

    /// Returns whether the message is masked by moderation.
    #[must_use]
    pub const fn is_masked(&self) -> bool {
        self.masked
    }

    /// Returns the dig counter.
    #[must_use]
    pub const fn dig_count(&self) -> u32 {
        self.dig_count
    }

    /// Returns the IP address the message was posted from.
    #[must_use]
    pub fn post_ip(&self) -> Option<&str> {
        self.post_ip.as_deref()
    }

    /// Returns a free-form property value.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.extra.get(name).map(String::as_str)
    }

    /// Sets the moderation flag.
    pub const fn set_masked(&mut self, masked: bool) {
        self.masked = masked;
    }

    /// Increments the dig counter by one.
    pub const fn add_dig(&mut self) {
        self.dig_count = self.dig_count.saturating_add(1);
    }

    /// Merges properties into the set, replacing values with the same name.
    ///
    /// Returns `true` if any value changed.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidProperty`] when a reserved key holds
    /// a value of the wrong shape. The set is left unchanged in that case.
    pub fn merge(
        &mut self,
        properties: impl IntoIterator<Item = Property>,
    ) -> Result<bool, ValidationError> {
        let mut staged = self.clone();
        for property in properties {
            staged.apply(property)?;
        }
        let changed = staged != *self;
        *self = staged;
        Ok(changed)
    }

    /// Merges properties supplied with a revision.
    ///
    /// The moderation flag and dig counter stay in step with the account
    /// and thread, so only [`PropertySet::set_masked`] and
    /// [`PropertySet::add_dig`] may change them.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::ReservedProperty`] if a change names
    /// [`MASKED_KEY`] or [`DIG_COUNT_KEY`], and
    /// [`ValidationError::InvalidProperty`] as for [`PropertySet::merge`].
    /// The set is left unchanged on error.
    pub fn merge_revision(
        &mut self,
        properties: impl IntoIterator<Item = Property>,
    ) -> Result<bool, ValidationError> {
        let changes: Vec<Property> = properties.into_iter().collect();
        if let Some(reserved) = changes
            .iter()
            .find(|property| matches!(property.name.as_str(), MASKED_KEY | DIG_COUNT_KEY))
        {
            return Err(ValidationError::ReservedProperty {
                name: reserved.name.clone(),
            });
        }
        self.merge(changes)
    }

    fn apply(&mut self, property: Property) -> Result<(), ValidationError> {
        let Property { name, value } = property;
        match name.as_str() {
            MASKED_KEY => {
                self.masked = value
                    .trim()
                    .parse()
                    .map_err(|_| ValidationError::invalid_property(&name, &value))?;
            }
            DIG_COUNT_KEY => {
                self.dig_count = value
                    .trim()
                    .parse()
                    .map_err(|_| ValidationError::invalid_property(&name, &value))?;
            }
            POST_IP_KEY => {
                self.post_ip = Some(value);
            }
            _ => {
                self.extra.insert(name, value);
            }
        }
        Ok(())
    }

    /// Flattens the set into a property list, reserved keys first.
    #[must_use]
    pub fn properties(&self) -> Vec<Property> {
        let mut flat = vec![
            Property::new(MASKED_KEY, self.masked.to_string()),
            Property::new(DIG_COUNT_KEY, self.dig_count.to_string()),
        ];
        if let Some(ip) = &self.post_ip {
            flat.push(Property::new(POST_IP_KEY, ip.clone()));
        }
        flat.extend(
            self.extra
                .iter()
                .map(|(name, value)| Property::new(name.clone(), value.clone())),
        );
        flat
    }
}
