//! Permission model and related functionality

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A named capability gating a feature area
///
/// `Admin` is a wildcard: holding it satisfies every check. Strings the
/// backend issues that are not part of the known vocabulary are kept
/// verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Permission {
    SalesView,
    SalesCreate,
    SalesEdit,
    SalesDelete,
    ProductsView,
    ProductsCreate,
    ProductsEdit,
    ProductsDelete,
    ExportsView,
    ExportsCreate,
    ExportsEdit,
    ExportsDelete,
    AccountingView,
    AccountingCreate,
    AccountingEdit,
    UsersView,
    UsersCreate,
    UsersEdit,
    UsersDelete,
    /// Navigation gate for the product catalog
    ViewProduct,
    /// Navigation gate for user administration
    ViewUsers,
    Admin,
    Other(String),
}

/// Permission names offered when assigning permissions to a user
const ASSIGNABLE: [&str; 20] = [
    "SALES_VIEW",
    "SALES_CREATE",
    "SALES_EDIT",
    "SALES_DELETE",
    "PRODUCTS_VIEW",
    "PRODUCTS_CREATE",
    "PRODUCTS_EDIT",
    "PRODUCTS_DELETE",
    "EXPORTS_VIEW",
    "EXPORTS_CREATE",
    "EXPORTS_EDIT",
    "EXPORTS_DELETE",
    "ACCOUNTING_VIEW",
    "ACCOUNTING_CREATE",
    "ACCOUNTING_EDIT",
    "USERS_VIEW",
    "USERS_CREATE",
    "USERS_EDIT",
    "USERS_DELETE",
    "ADMIN",
];

impl Permission {
    /// Wire name of the permission
    pub fn as_str(&self) -> &str {
        match self {
            Permission::SalesView => "SALES_VIEW",
            Permission::SalesCreate => "SALES_CREATE",
            Permission::SalesEdit => "SALES_EDIT",
            Permission::SalesDelete => "SALES_DELETE",
            Permission::ProductsView => "PRODUCTS_VIEW",
            Permission::ProductsCreate => "PRODUCTS_CREATE",
            Permission::ProductsEdit => "PRODUCTS_EDIT",
            Permission::ProductsDelete => "PRODUCTS_DELETE",
            Permission::ExportsView => "EXPORTS_VIEW",
            Permission::ExportsCreate => "EXPORTS_CREATE",
            Permission::ExportsEdit => "EXPORTS_EDIT",
            Permission::ExportsDelete => "EXPORTS_DELETE",
            Permission::AccountingView => "ACCOUNTING_VIEW",
            Permission::AccountingCreate => "ACCOUNTING_CREATE",
            Permission::AccountingEdit => "ACCOUNTING_EDIT",
            Permission::UsersView => "USERS_VIEW",
            Permission::UsersCreate => "USERS_CREATE",
            Permission::UsersEdit => "USERS_EDIT",
            Permission::UsersDelete => "USERS_DELETE",
            Permission::ViewProduct => "VIEW_PRODUCT",
            Permission::ViewUsers => "VIEW_USERS",
            Permission::Admin => "ADMIN",
            Permission::Other(name) => name,
        }
    }

    /// Parse a wire name; never fails, unknown names become `Other`
    pub fn parse(name: &str) -> Self {
        match name {
            "SALES_VIEW" => Permission::SalesView,
            "SALES_CREATE" => Permission::SalesCreate,
            "SALES_EDIT" => Permission::SalesEdit,
            "SALES_DELETE" => Permission::SalesDelete,
            "PRODUCTS_VIEW" => Permission::ProductsView,
            "PRODUCTS_CREATE" => Permission::ProductsCreate,
            "PRODUCTS_EDIT" => Permission::ProductsEdit,
            "PRODUCTS_DELETE" => Permission::ProductsDelete,
            "EXPORTS_VIEW" => Permission::ExportsView,
            "EXPORTS_CREATE" => Permission::ExportsCreate,
            "EXPORTS_EDIT" => Permission::ExportsEdit,
            "EXPORTS_DELETE" => Permission::ExportsDelete,
            "ACCOUNTING_VIEW" => Permission::AccountingView,
            "ACCOUNTING_CREATE" => Permission::AccountingCreate,
            "ACCOUNTING_EDIT" => Permission::AccountingEdit,
            "USERS_VIEW" => Permission::UsersView,
            "USERS_CREATE" => Permission::UsersCreate,
            "USERS_EDIT" => Permission::UsersEdit,
            "USERS_DELETE" => Permission::UsersDelete,
            "VIEW_PRODUCT" => Permission::ViewProduct,
            "VIEW_USERS" => Permission::ViewUsers,
            "ADMIN" => Permission::Admin,
            other => Permission::Other(other.to_string()),
        }
    }

    /// Permissions an administrator can hand out to a user
    pub fn assignable() -> Vec<Permission> {
        ASSIGNABLE.iter().map(|name| Permission::parse(name)).collect()
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Permission::Admin)
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Permission {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Permission::parse(s))
    }
}

impl Serialize for Permission {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Permission {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Permission::parse(&name))
    }
}

/// Whether the `held` permissions satisfy `required`
pub fn grants(held: &BTreeSet<Permission>, required: &Permission) -> bool {
    held.contains(required) || held.contains(&Permission::Admin)
}
