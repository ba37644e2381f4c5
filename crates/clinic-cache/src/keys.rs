//! Cache key builders for every cache entry the backend uses.

use uuid::Uuid;

/// Prefix applied to all cache keys.
const PREFIX: &str = "clinic";

/// Cache key for a setting value.
pub fn setting(key: &str) -> String {
    format!("{PREFIX}:setting:{key}")
}

/// Prefix shared by every cached setting.
pub fn settings_prefix() -> String {
    format!("{PREFIX}:setting:")
}

/// Cache key marking a revoked JWT by its `jti`.
pub fn jwt_blocklist(jti: Uuid) -> String {
    format!("{PREFIX}:jwt:blocked:{jti}")
}

/// Cache key for an account's status, checked on every authenticated request.
pub fn user_status(user_id: Uuid) -> String {
    format!("{PREFIX}:user:status:{user_id}")
}

/// Cache key for the last calendar sync report of a year.
pub fn calendar_sync_report(year: i32) -> String {
    format!("{PREFIX}:calendar:sync:{year}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setting_keys_share_prefix() {
        let key = setting("appointments.block_on_holidays");
        assert!(key.starts_with(&settings_prefix()));
        assert!(!jwt_blocklist(uuid::Uuid::nil()).starts_with(&settings_prefix()));
        assert!(!user_status(uuid::Uuid::nil()).starts_with(&settings_prefix()));
    }
}
