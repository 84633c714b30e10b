//! Domain constants
//!
//! Default scope names, wire keys and HTTP tuning values.

// Management API scopes
pub const SCOPE_READ_CURRENT_USER: &str = "read:current_user";
pub const SCOPE_UPDATE_CURRENT_USER_METADATA: &str = "update:current_user_metadata";
pub const SCOPE_UPDATE_CURRENT_USER_IDENTITIES: &str = "update:current_user_identities";
pub const SCOPE_UPDATE_USERS: &str = "update:users";

// Secondary login ceremony: ID token only, always re-prompt
pub const SECONDARY_LOGIN_SCOPE: &str = "openid";
pub const SECONDARY_LOGIN_MAX_AGE_SECS: u64 = 0;

// Management API layout
pub const MANAGEMENT_API_PATH: &str = "/api/v2";

// Metadata form submission writes the text under this key
pub const DEFAULT_METADATA_FORM_KEY: &str = "formMetadata";

// Separator between provider and per-connection id inside a `sub`
pub const SUB_SEPARATOR: char = '|';

// HTTP defaults
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_HTTP_MAX_ATTEMPTS: usize = 2;
pub const DEFAULT_HTTP_BACKOFF_MS: u64 = 200;
pub const USER_AGENT: &str = concat!("idlink/", env!("CARGO_PKG_VERSION"));
