//! Organization scoping.
//!
//! Every stored row belongs to exactly one organization. Mutations on an
//! existing row load it first and compare its organization with the
//! caller's.

use thiserror::Error;
use uuid::Uuid;

/// The row belongs to another organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("row {row_id} belongs to another organization")]
pub struct CrossTenantAccess {
    /// The row the caller tried to reach.
    pub row_id: Uuid,
}

/// A row owned by one organization.
pub trait OrgScoped {
    /// The row's ID.
    fn row_id(&self) -> Uuid;

    /// The owning organization.
    fn organization_id(&self) -> Uuid;

    /// Checks that `caller_org` owns this row.
    ///
    /// # Errors
    ///
    /// Returns `CrossTenantAccess` when the organizations differ.
    fn ensure_owned_by(&self, caller_org: Uuid) -> Result<(), CrossTenantAccess> {
        if self.organization_id() == caller_org {
            Ok(())
        } else {
            Err(CrossTenantAccess {
                row_id: self.row_id(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Row {
        id: Uuid,
        org: Uuid,
    }

    impl OrgScoped for Row {
        fn row_id(&self) -> Uuid {
            self.id
        }

        fn organization_id(&self) -> Uuid {
            self.org
        }
    }

    #[test]
    fn test_same_org_allowed() {
        let org = Uuid::new_v4();
        let row = Row {
            id: Uuid::new_v4(),
            org,
        };
        assert!(row.ensure_owned_by(org).is_ok());
    }

    #[test]
    fn test_other_org_denied() {
        let row = Row {
            id: Uuid::new_v4(),
            org: Uuid::new_v4(),
        };
        assert_eq!(
            row.ensure_owned_by(Uuid::new_v4()),
            Err(CrossTenantAccess { row_id: row.id })
        );
    }
}
