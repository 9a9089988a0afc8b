//! Unique account identities.
//!
//! Every account the harness registers embeds a stamp so repeated runs against
//! a stateful backend never reuse quota from an earlier run.

/// Source of identity stamps
pub trait IdentityGenerator: Send + Sync {
    fn stamp(&self) -> i64;
}

/// Wall-clock seconds since the epoch
#[derive(Debug, Default, Clone, Copy)]
pub struct ClockIdentity;

impl IdentityGenerator for ClockIdentity {
    fn stamp(&self) -> i64 {
        chrono::Utc::now().timestamp()
    }
}

/// Always returns the same stamp
#[derive(Debug, Clone, Copy)]
pub struct FixedIdentity(pub i64);

impl IdentityGenerator for FixedIdentity {
    fn stamp(&self) -> i64 {
        self.0
    }
}

/// Registration details for a new account.
#[derive(Debug, Clone, PartialEq)]
pub struct AccountIdentity {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub device_id: String,
}

impl AccountIdentity {
    /// `free_test_<ts>@example.com`
    pub fn free(stamp: i64, password: &str) -> Self {
        Self {
            email: format!("free_test_{}@example.com", stamp),
            password: password.to_string(),
            full_name: format!("Free Test User {}", stamp),
            device_id: format!("test_device_{}", stamp),
        }
    }

    /// Registration for a known premium address
    pub fn premium_fixture(email: &str, password: &str, stamp: i64) -> Self {
        Self {
            email: email.to_string(),
            password: password.to_string(),
            full_name: "Premium Test User".to_string(),
            device_id: premium_device_id(stamp),
        }
    }

    /// `premium_test_<ts>@gmail.com`, last resort when the fixture is unusable
    pub fn fresh_premium(stamp: i64, password: &str) -> Self {
        Self {
            email: format!("premium_test_{}@gmail.com", stamp),
            password: password.to_string(),
            full_name: "Premium Test User".to_string(),
            device_id: premium_device_id(stamp),
        }
    }
}

pub fn premium_device_id(stamp: i64) -> String {
    format!("premium_test_device_{}", stamp)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_free_identity_embeds_stamp() {
        let identity = AccountIdentity::free(FixedIdentity(1700000000).stamp(), "pw");
        assert_eq!(identity.email, "free_test_1700000000@example.com");
        assert_eq!(identity.full_name, "Free Test User 1700000000");
        assert_eq!(identity.device_id, "test_device_1700000000");
        assert_eq!(identity.password, "pw");
    }

    #[test]
    fn test_premium_identities() {
        let fixture = AccountIdentity::premium_fixture("vip@example.com", "secret", 42);
        assert_eq!(fixture.email, "vip@example.com");
        assert_eq!(fixture.device_id, "premium_test_device_42");

        let fresh = AccountIdentity::fresh_premium(42, "secret");
        assert_eq!(fresh.email, "premium_test_42@gmail.com");
        assert_ne!(fresh.email, fixture.email);
    }

    #[test]
    fn test_clock_identity_is_recent() {
        // 2023-11-14, well before any run of this suite
        assert!(ClockIdentity.stamp() > 1_700_000_000);
    }
}
