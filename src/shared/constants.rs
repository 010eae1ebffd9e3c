/// Default page size for pagination
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Maximum page size allowed
pub const MAX_PAGE_SIZE: i64 = 100;

/// Upper bound for unpaginated bulk reads from a store
pub const MAX_BULK_LIMIT: i64 = 1000;

// =============================================================================
// ROLE CONSTANTS
// =============================================================================

/// System administrator - manages every application
pub const ROLE_SYSTEM_ADMIN: &str = "system_admin";

/// Application administrator - manages categories, promos and balances of one app
pub const ROLE_APP_ADMIN: &str = "app_admin";

/// Regular member of an application (mobile client user)
pub const ROLE_MEMBER: &str = "member";

// =============================================================================
// TRANSACTION DESCRIPTIONS
// =============================================================================

pub const DESCRIPTION_MANUAL_ACCRUAL: &str = "Manual accrual";

pub const DESCRIPTION_MANUAL_DEDUCTION: &str = "Manual deduction";

pub const DESCRIPTION_ADMIN_ACCRUAL: &str = "Accrued by administrator";
