use std::fmt;

/// Capability tier determining which operations an identity may invoke.
///
/// Stored in the users table as the lower-case name; parsing is
/// case-insensitive.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Role {
    Admin,
    Doctor,
    Nurse,
    Receptionist,
    Staff,
}

impl Role {
    /// Every role the service recognizes. Passing this set to the access
    /// control check means "any authenticated user".
    pub const ALL: [Role; 5] = [
        Role::Admin,
        Role::Doctor,
        Role::Nurse,
        Role::Receptionist,
        Role::Staff,
    ];

    /// Parse a role name, case-insensitively. Returns `None` for names
    /// outside the fixed set.
    pub fn parse(value: &str) -> Option<Role> {
        match value.trim().to_lowercase().as_str() {
            "admin" => Some(Role::Admin),
            "doctor" => Some(Role::Doctor),
            "nurse" => Some(Role::Nurse),
            "receptionist" => Some(Role::Receptionist),
            "staff" => Some(Role::Staff),
            _ => None,
        }
    }

    /// Canonical lower-case name, as stored in the users table.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Doctor => "doctor",
            Role::Nurse => "nurse",
            Role::Receptionist => "receptionist",
            Role::Staff => "staff",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
