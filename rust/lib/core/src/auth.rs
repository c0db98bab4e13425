//! Role tagging for callers.
//!
//! There are no credentials here. A `Principal` is whoever the session layer
//! says it is; the core only uses its `id` as the opaque owner of records and
//! its `role` to gate administrator-only operations.

use serde::{Deserialize, Serialize};

use crate::ServiceError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Reviews demands and may reset system data.
    Admin,
    /// Department staff: creates demands and records usage.
    Incharge,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Incharge => "incharge",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "incharge" => Ok(Self::Incharge),
            other => Err(ServiceError::Validation(format!(
                "unknown role '{other}', expected 'admin' or 'incharge'"
            ))),
        }
    }
}

/// The identity attached to a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: String,
    pub name: String,
    pub role: Role,
}

impl Principal {
    pub fn new(id: impl Into<String>, name: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            role,
        }
    }

    /// Fail with `PermissionDenied` unless this principal has `role`.
    pub fn require(&self, role: Role) -> Result<(), ServiceError> {
        if self.role == role {
            Ok(())
        } else {
            Err(ServiceError::PermissionDenied(format!(
                "'{}' is {}, this operation requires {}",
                self.id, self.role, role
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse() {
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!(" Incharge ".parse::<Role>().unwrap(), Role::Incharge);
        assert!("nurse".parse::<Role>().is_err());
    }

    #[test]
    fn test_require_role() {
        let admin = Principal::new("1", "Admin User", Role::Admin);
        let incharge = Principal::new("2", "Incharge User", Role::Incharge);

        assert!(admin.require(Role::Admin).is_ok());
        let err = incharge.require(Role::Admin).unwrap_err();
        assert_eq!(err.error_code(), "PERMISSION_DENIED");
    }
}
