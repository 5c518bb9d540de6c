use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: String,
    pub name: String,
    pub dept: Dept,
    pub role: Role,
}

impl Employee {
    pub fn new(id: &str, name: &str, dept: Dept, role: Role) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            dept,
            role,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "Admin")]
    Admin,

    #[serde(rename = "User")]
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::User => "User",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Production stage that raises issue logs and chat messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Dept {
    /// Corrugating.
    #[serde(rename = "Sóng")]
    Song,

    /// Printing.
    #[serde(rename = "In")]
    In,

    /// Finished goods.
    #[serde(rename = "Thành phẩm")]
    ThanhPham,

    /// Warehouse.
    #[serde(rename = "Kho")]
    Kho,
}

impl Dept {
    pub const ALL: [Dept; 4] = [Dept::Song, Dept::In, Dept::ThanhPham, Dept::Kho];

    pub fn label(&self) -> &'static str {
        match self {
            Dept::Song => "Sóng",
            Dept::In => "In",
            Dept::ThanhPham => "Thành phẩm",
            Dept::Kho => "Kho",
        }
    }

    /// Accepts the display label, case-insensitively, or the ascii variant name.
    pub fn parse(value: &str) -> Option<Dept> {
        let value = value.trim();
        Dept::ALL.into_iter().find(|dept| {
            dept.label().to_lowercase() == value.to_lowercase()
                || format!("{:?}", dept).eq_ignore_ascii_case(value)
        })
    }
}

impl fmt::Display for Dept {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
