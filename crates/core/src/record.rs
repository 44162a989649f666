//! Record kinds and list ordering.
//!
//! A deployment manages exactly one kind of record. The kind selects the
//! table, the route prefix, and the Spanish labels shown to users.

use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Which table (and route prefix) this deployment serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecordKind {
    #[default]
    Characters,
    Items,
}

impl RecordKind {
    /// Table name. Only ever one of a fixed set of identifiers, so it is
    /// safe to interpolate into SQL text.
    pub fn table(self) -> &'static str {
        match self {
            Self::Characters => "characters",
            Self::Items => "items",
        }
    }

    /// Route prefix, e.g. `/characters`.
    pub fn base_path(self) -> &'static str {
        match self {
            Self::Characters => "/characters",
            Self::Items => "/items",
        }
    }

    /// Entity name used in `CoreError::NotFound`.
    pub fn entity(self) -> &'static str {
        match self {
            Self::Characters => "Character",
            Self::Items => "Item",
        }
    }

    pub fn singular(self) -> &'static str {
        match self {
            Self::Characters => "personaje",
            Self::Items => "elemento",
        }
    }

    pub fn plural(self) -> &'static str {
        match self {
            Self::Characters => "personajes",
            Self::Items => "elementos",
        }
    }

    /// Plain-text body returned with a 404.
    pub fn not_found_message(self) -> &'static str {
        match self {
            Self::Characters => "Personaje no encontrado",
            Self::Items => "Elemento no encontrado",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table())
    }
}

impl FromStr for RecordKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "characters" | "character" => Ok(Self::Characters),
            "items" | "item" => Ok(Self::Items),
            other => Err(CoreError::Validation(format!(
                "Unknown record kind '{other}'. Must be one of: characters, items"
            ))),
        }
    }
}

/// Direction in which the list view orders records by `id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListOrder {
    #[default]
    Asc,
    Desc,
}

impl ListOrder {
    /// SQL keyword for `ORDER BY id <dir>`.
    pub fn sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

impl FromStr for ListOrder {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(Self::Asc),
            "desc" | "descending" => Ok(Self::Desc),
            other => Err(CoreError::Validation(format!(
                "Unknown list order '{other}'. Must be one of: asc, desc"
            ))),
        }
    }
}
