/// Page size used when the caller passes no limit, or a non-positive one.
pub const DEFAULT_PAGE_LIMIT: i64 = 20;

/// Ceiling on the caller-requested page size, to bound the work a single
/// listing call can demand.
pub const MAX_PAGE_LIMIT: i64 = 200;

/// Bounded retries of the account credit adjustment after a lost version
/// race, before the transaction is flagged for reconciliation.
pub const MAX_ADJUST_RETRIES: usize = 3;
