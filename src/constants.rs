//! # Process Mining Constants
//!
//! The closed set of activity types recorded against a case, plus
//! system-wide defaults shared by the query layer and the web API.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Activity types recorded in the event log.
///
/// The wire and storage form is SCREAMING_SNAKE_CASE (`"REQUEST_INFO"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityName {
    Create,
    Update,
    Assign,
    Reassign,
    Submit,
    Review,
    Approve,
    Reject,
    RequestInfo,
    ReceiveInfo,
    Quote,
    Issue,
    Bill,
    Pay,
    Refund,
    Cancel,
    Reopen,
    Escalate,
    Comment,
    AttachDocument,
    Notify,
    Close,
}

impl ActivityName {
    pub const ALL: [ActivityName; 22] = [
        Self::Create,
        Self::Update,
        Self::Assign,
        Self::Reassign,
        Self::Submit,
        Self::Review,
        Self::Approve,
        Self::Reject,
        Self::RequestInfo,
        Self::ReceiveInfo,
        Self::Quote,
        Self::Issue,
        Self::Bill,
        Self::Pay,
        Self::Refund,
        Self::Cancel,
        Self::Reopen,
        Self::Escalate,
        Self::Comment,
        Self::AttachDocument,
        Self::Notify,
        Self::Close,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "CREATE",
            Self::Update => "UPDATE",
            Self::Assign => "ASSIGN",
            Self::Reassign => "REASSIGN",
            Self::Submit => "SUBMIT",
            Self::Review => "REVIEW",
            Self::Approve => "APPROVE",
            Self::Reject => "REJECT",
            Self::RequestInfo => "REQUEST_INFO",
            Self::ReceiveInfo => "RECEIVE_INFO",
            Self::Quote => "QUOTE",
            Self::Issue => "ISSUE",
            Self::Bill => "BILL",
            Self::Pay => "PAY",
            Self::Refund => "REFUND",
            Self::Cancel => "CANCEL",
            Self::Reopen => "REOPEN",
            Self::Escalate => "ESCALATE",
            Self::Comment => "COMMENT",
            Self::AttachDocument => "ATTACH_DOCUMENT",
            Self::Notify => "NOTIFY",
            Self::Close => "CLOSE",
        }
    }
}

impl fmt::Display for ActivityName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ActivityName {
    type Err = String;

    /// Exact match against the upper-case wire form
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| format!("Invalid activity name: {s}"))
    }
}

impl TryFrom<String> for ActivityName {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Pagination defaults
pub mod pagination {
    /// Page size used when the client does not send `page_size`.
    /// Large enough that a single page returns the full result set.
    pub const DEFAULT_PAGE_SIZE: u64 = 100_000;

    /// Upper bound accepted for `page_size`
    pub const MAX_PAGE_SIZE: u64 = 100_000;
}

/// System-wide constants
pub mod system {
    /// Service name used in logs and health responses
    pub const SERVICE_NAME: &str = "process-mining-api";

    /// Decimal places used for reported percentages and averages
    pub const PERCENT_DECIMALS: i32 = 2;

    /// Environment variable naming the TOML config file
    pub const CONFIG_PATH_ENV: &str = "PROCESS_MINING_CONFIG_PATH";

    /// Prefix for environment overrides (`PROCESS_MINING__WEB__BIND_ADDRESS`)
    pub const ENV_PREFIX: &str = "PROCESS_MINING";
}

/// Round to the number of decimals used for reported percentages.
pub fn round_percent(value: f64) -> f64 {
    let factor = 10f64.powi(system::PERCENT_DECIMALS);
    (value * factor).round() / factor
}
