/// Default `auto_authorize` value for nodes created through lookup.
pub const DEFAULT_AUTO_AUTHORIZE: bool = true;

/// Default `auto_subscribe` value for nodes created through lookup.
pub const DEFAULT_AUTO_SUBSCRIBE: bool = true;

/// Separator between the bare part of a JID and its resource.
pub const RESOURCE_SEPARATOR: char = '/';

/// Separator between the local part of a JID and its domain.
pub const LOCAL_SEPARATOR: char = '@';

/// Default SQLite busy timeout in milliseconds.
pub const SQLITE_BUSY_TIMEOUT_MS: u64 = 5_000;

/// Current roster storage schema version.
pub const SCHEMA_VERSION: u32 = 1;
