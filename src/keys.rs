//! Event keys identifying the countable event classes.
//!
//! An [`EventKey`] is an opaque string. Four keys are recognized by the
//! application; any other key is accepted as well and simply starts counting
//! from zero.
//!
//! # Examples
//!
//! ```rust
//! use conteggi::keys::EventKey;
//!
//! assert_eq!(EventKey::APP_LOADS.as_str(), "global_app_loads");
//! assert_eq!(EventKey::NAV_SWITCHES.short_name(), "NAV_SWITCHES");
//!
//! let custom = EventKey::new("beta_feature_toggles");
//! assert!(!custom.is_recognized());
//! ```

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt::{self, Display};

/// Prefix shared by the recognized keys, stripped by [`EventKey::short_name`].
const GLOBAL_PREFIX: &str = "global_";

/// Identifier of a countable event class.
///
/// Serialized as a bare string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventKey(Cow<'static, str>);

impl EventKey {
    /// Application loaded.
    pub const APP_LOADS: EventKey = EventKey::from_static("global_app_loads");
    /// Navigation tab switched.
    pub const NAV_SWITCHES: EventKey = EventKey::from_static("global_nav_switches");
    /// Outbound project link activated.
    pub const PROJECT_CLICKS: EventKey = EventKey::from_static("global_project_clicks");
    /// Media stream viewed or opened in the lightbox.
    pub const STREAM_INTERACTIONS: EventKey = EventKey::from_static("global_stream_views");

    /// The four keys the application records.
    pub const RECOGNIZED: [EventKey; 4] = [
        EventKey::APP_LOADS,
        EventKey::NAV_SWITCHES,
        EventKey::PROJECT_CLICKS,
        EventKey::STREAM_INTERACTIONS,
    ];

    /// Creates a key from a static string, usable in `const` context.
    pub const fn from_static(name: &'static str) -> Self {
        EventKey(Cow::Borrowed(name))
    }

    /// Creates a key from any string.
    pub fn new(name: impl Into<String>) -> Self {
        EventKey(Cow::Owned(name.into()))
    }

    /// Returns the wire name of the key.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if this is one of the four application keys.
    pub fn is_recognized(&self) -> bool {
        Self::RECOGNIZED.iter().any(|k| k == self)
    }

    /// Returns the key without its `global_` prefix, upper-cased.
    ///
    /// Used for compact log lines such as `EVENT_CAPTURED: APP_LOADS >> VAL:3`.
    ///
    /// ```rust
    /// use conteggi::keys::EventKey;
    ///
    /// assert_eq!(EventKey::STREAM_INTERACTIONS.short_name(), "STREAM_VIEWS");
    /// assert_eq!(EventKey::new("local_only").short_name(), "LOCAL_ONLY");
    /// ```
    pub fn short_name(&self) -> String {
        self.as_str()
            .replacen(GLOBAL_PREFIX, "", 1)
            .to_uppercase()
    }
}

impl Display for EventKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for EventKey {
    fn from(name: &str) -> Self {
        EventKey::new(name)
    }
}

impl From<String> for EventKey {
    fn from(name: String) -> Self {
        EventKey(Cow::Owned(name))
    }
}

impl AsRef<str> for EventKey {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recognized_wire_names() {
        let recognized = EventKey::RECOGNIZED;
        let names: Vec<&str> = recognized.iter().map(|k| k.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "global_app_loads",
                "global_nav_switches",
                "global_project_clicks",
                "global_stream_views"
            ]
        );
    }

    #[test]
    fn test_owned_and_static_compare_equal() {
        assert_eq!(EventKey::new("global_app_loads"), EventKey::APP_LOADS);
        assert!(EventKey::from("global_project_clicks").is_recognized());
    }

    #[test]
    fn test_unrecognized_key() {
        let key = EventKey::new("something_else");
        assert!(!key.is_recognized());
        assert_eq!(key.to_string(), "something_else");
    }

    #[test]
    fn test_short_name() {
        assert_eq!(EventKey::APP_LOADS.short_name(), "APP_LOADS");
        assert_eq!(EventKey::PROJECT_CLICKS.short_name(), "PROJECT_CLICKS");
    }

    #[test]
    fn test_serialize_as_string() {
        let json = serde_json::to_string(&EventKey::NAV_SWITCHES).unwrap();
        assert_eq!(json, r#""global_nav_switches""#);

        let key: EventKey = serde_json::from_str(r#""global_stream_views""#).unwrap();
        assert_eq!(key, EventKey::STREAM_INTERACTIONS);
    }
}
