//! Channel type definitions and parsing.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use clinic_entity::user::UserRole;

/// Typed channel identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "snake_case")]
pub enum ChannelType {
    /// Personal channel: the user's appointments and notifications.
    User(Uuid),
    /// Everyone holding a role, e.g. the clinical staff triage queue.
    Role(UserRole),
}

impl ChannelType {
    /// Parses a channel string into a typed channel.
    pub fn parse(channel: &str) -> Option<Self> {
        match channel.split_once(':')? {
            ("user", id) => Uuid::parse_str(id).ok().map(ChannelType::User),
            ("role", role) => role.parse().ok().map(ChannelType::Role),
            _ => None,
        }
    }

    /// Converts back to a channel string.
    pub fn to_channel_string(&self) -> String {
        match self {
            ChannelType::User(id) => format!("user:{id}"),
            ChannelType::Role(role) => format!("role:{role}"),
        }
    }

    /// Channels a connection is subscribed to on connect.
    pub fn defaults_for(user_id: Uuid, role: UserRole) -> [ChannelType; 2] {
        [ChannelType::User(user_id), ChannelType::Role(role)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_names() {
        let id = Uuid::new_v4();
        let user = ChannelType::User(id);
        assert_eq!(ChannelType::parse(&user.to_channel_string()), Some(user));

        let staff = ChannelType::Role(UserRole::ClinicalStaff);
        assert_eq!(staff.to_channel_string(), "role:clinical_staff");
        assert_eq!(ChannelType::parse("role:clinical_staff"), Some(staff));
    }

    #[test]
    fn test_rejects_unknown_channels() {
        assert_eq!(ChannelType::parse("folder:abc"), None);
        assert_eq!(ChannelType::parse("user:not-a-uuid"), None);
        assert_eq!(ChannelType::parse("role:janitor"), None);
        assert_eq!(ChannelType::parse("broadcast"), None);
    }
}
