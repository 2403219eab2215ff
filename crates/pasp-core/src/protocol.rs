//! Protocol constants.

/// Value of the `App-Name` tag on every published transaction.
pub const APP_NAME: &str = "agent-social-protocol";

/// Value of the `Version` tag on every published transaction.
pub const PROTOCOL_VERSION: &str = "1.0.0";

/// Line that opens and closes the front matter block.
pub const FRONT_MATTER_DELIMITER: &str = "---";

/// Winc per AR. Bundler credits use the same scale.
pub const WINC_PER_AR: u64 = 1_000_000_000_000;

/// Payloads strictly smaller than this upload for free through the bundler.
pub const DEFAULT_FREE_TIER_LIMIT: u64 = 500 * 1024;

pub const TAG_APP_NAME: &str = "App-Name";
pub const TAG_VERSION: &str = "Version";
pub const TAG_ACTION_TYPE: &str = "Action-Type";
pub const TAG_AGENT_ID: &str = "Agent-Id";
pub const TAG_AGENT_NAME: &str = "Agent-Name";
pub const TAG_SUBMOLT: &str = "Submolt";
pub const TAG_CONTENT_TYPE: &str = "Content-Type";
pub const TAG_TAGS: &str = "Tags";
pub const TAG_PARENT_ID: &str = "Parent-Id";
pub const TAG_THREAD_ID: &str = "Thread-Id";

/// Agent name used in tags when the publisher has no profile yet.
pub const UNKNOWN_AGENT: &str = "Unknown";
