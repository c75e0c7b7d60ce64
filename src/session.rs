//! Signed-in staff identity, passed explicitly to whatever needs it.
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Staff {
    pub id: i64,
    pub username: String,
    pub name: String,
    pub email: String,
    /// Backend role name, e.g. "Kasir", "Manager", "Owner".
    pub role: String,
    pub address: Option<String>,
    pub phone: Option<String>,
}

impl Staff {
    /// Whether the role belongs on the employee dashboard rather than the
    /// visitor home. Unrecognized roles count as employees.
    pub fn is_employee(&self) -> bool {
        !matches!(
            self.role.trim().to_ascii_lowercase().as_str(),
            "anggota" | "user" | "pengunjung"
        )
    }
}

/// Bearer token plus identity of the current staff member.
///
/// Starts empty; `sign_in` populates it and `logout` empties it again.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaffSession {
    token: Option<String>,
    staff: Option<Staff>,
}

impl StaffSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sign_in(&mut self, token: String, staff: Staff) {
        self.token = Some(token);
        self.staff = Some(staff);
    }

    pub fn logout(&mut self) {
        self.token = None;
        self.staff = None;
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn staff(&self) -> Option<&Staff> {
        self.staff.as_ref()
    }

    pub fn is_signed_in(&self) -> bool {
        self.token.is_some()
    }
}
