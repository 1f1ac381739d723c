//! Backend selection.

use std::fmt;
use std::str::FromStr;

use common::AppError;

/// Data-access technique used to implement the repository contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RepositoryKind {
    /// Hand-written SQL with manual column decoding
    #[default]
    Standard,
    /// Hand-written SQL mapped through `sqlx::FromRow`
    Sqlx,
    /// SeaORM entities and active models
    Orm,
    /// SeaQuery statements over a SeaORM connection
    QueryBuilder,
}

impl RepositoryKind {
    /// Every supported backend, in display order
    pub const ALL: [RepositoryKind; 4] = [
        RepositoryKind::Standard,
        RepositoryKind::Sqlx,
        RepositoryKind::Orm,
        RepositoryKind::QueryBuilder,
    ];

    /// Configuration name of the backend
    pub fn as_str(&self) -> &'static str {
        match self {
            RepositoryKind::Standard => "standard",
            RepositoryKind::Sqlx => "sqlx",
            RepositoryKind::Orm => "orm",
            RepositoryKind::QueryBuilder => "query-builder",
        }
    }

    /// Older names still accepted through `LIBRARY_TYPE`
    fn from_alias(name: &str) -> Option<Self> {
        match name {
            "gorm" => Some(RepositoryKind::Orm),
            "ent" => Some(RepositoryKind::QueryBuilder),
            _ => None,
        }
    }
}

impl fmt::Display for RepositoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RepositoryKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        RepositoryKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .or_else(|| RepositoryKind::from_alias(&normalized))
            .ok_or_else(|| {
                let supported: Vec<&str> = RepositoryKind::ALL.iter().map(|k| k.as_str()).collect();
                AppError::config(format!(
                    "unsupported repository backend '{}' (expected one of: {})",
                    s,
                    supported.join(", ")
                ))
            })
    }
}
