use crate::error::SelectionError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the three independent font slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Display,
    Heading,
    Body,
}

impl Role {
    /// All roles in presentation order.
    pub const ALL: [Role; 3] = [Role::Display, Role::Heading, Role::Body];

    /// Lowercase name, as used in CSS variable names.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Display => "display",
            Role::Heading => "heading",
            Role::Body => "body",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = SelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "display" => Ok(Role::Display),
            "heading" => Ok(Role::Heading),
            "body" => Ok(Role::Body),
            _ => Err(SelectionError::UnknownRole(s.to_string())),
        }
    }
}
