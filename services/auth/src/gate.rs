//! Authorization gate for feature visibility
//!
//! The gate only decides what the console offers. The backend enforces
//! authorization on every call independently.

use std::fmt;

use crate::models::{Permission, Session};

/// Whether `session` may see a feature guarded by `required`
///
/// Always false without a session.
pub fn has_permission(session: Option<&Session>, required: &Permission) -> bool {
    session.is_some_and(|session| session.can(required))
}

/// Top-level feature areas of the console, in navigation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureArea {
    Sales,
    Exports,
    Products,
    Accounting,
    Users,
}

impl FeatureArea {
    pub const ALL: [FeatureArea; 5] = [
        FeatureArea::Sales,
        FeatureArea::Exports,
        FeatureArea::Products,
        FeatureArea::Accounting,
        FeatureArea::Users,
    ];

    /// Permission guarding the area's navigation entry
    pub fn required_permission(self) -> Permission {
        match self {
            FeatureArea::Sales => Permission::SalesView,
            FeatureArea::Exports => Permission::ExportsView,
            FeatureArea::Products => Permission::ViewProduct,
            FeatureArea::Accounting => Permission::AccountingView,
            FeatureArea::Users => Permission::ViewUsers,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FeatureArea::Sales => "Sales / POS",
            FeatureArea::Exports => "Exports",
            FeatureArea::Products => "Products",
            FeatureArea::Accounting => "Accounting",
            FeatureArea::Users => "Users",
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            FeatureArea::Sales => "sales",
            FeatureArea::Exports => "exports",
            FeatureArea::Products => "products",
            FeatureArea::Accounting => "accounting",
            FeatureArea::Users => "users",
        }
    }
}

impl fmt::Display for FeatureArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Feature areas `session` may see, in navigation order
pub fn visible_areas(session: Option<&Session>) -> Vec<FeatureArea> {
    FeatureArea::ALL
        .into_iter()
        .filter(|area| has_permission(session, &area.required_permission()))
        .collect()
}
