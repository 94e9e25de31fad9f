use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::ValidationError;

/// Page size used by every admin list screen.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum StatusFilter {
    #[default]
    All,
    Only(String),
}

impl StatusFilter {
    pub fn only(status: impl Into<String>) -> Self {
        Self::Only(status.into())
    }

    /// Query value for this filter; `None` when the parameter is omitted.
    pub fn query_value(&self) -> Option<&str> {
        match self {
            Self::All => None,
            Self::Only(status) => {
                let status = status.trim();
                if status.is_empty() || status.eq_ignore_ascii_case("all") {
                    None
                } else {
                    Some(status)
                }
            }
        }
    }
}

impl From<&str> for StatusFilter {
    fn from(value: &str) -> Self {
        if value.trim().is_empty() || value.eq_ignore_ascii_case("all") {
            Self::All
        } else {
            Self::Only(value.trim().to_string())
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimePeriod {
    #[default]
    Overall,
    Daily,
    Weekly,
    Monthly,
}

impl TimePeriod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Overall => "overall",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }
}

impl fmt::Display for TimePeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TimePeriod {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "overall" => Ok(Self::Overall),
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            other => Err(format!(
                "unknown time period '{other}', expected overall, daily, weekly or monthly"
            )),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub status: StatusFilter,
    pub search_query: String,
    pub time_period: TimePeriod,
    pub selected_date: Option<NaiveDate>,
}

impl FilterState {
    pub fn apply(&mut self, patch: FilterPatch) {
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(search_query) = patch.search_query {
            self.search_query = search_query;
        }
        if let Some(time_period) = patch.time_period {
            self.time_period = time_period;
        }
        if let Some(selected_date) = patch.selected_date {
            self.selected_date = selected_date;
        }
    }

    /// Period and date are only sent together, and never for `overall`.
    pub fn period_window(&self) -> Option<(TimePeriod, NaiveDate)> {
        match (self.time_period, self.selected_date) {
            (TimePeriod::Overall, _) | (_, None) => None,
            (period, Some(date)) => Some((period, date)),
        }
    }
}

/// Partial update of a [`FilterState`]. Unset fields keep their value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterPatch {
    pub status: Option<StatusFilter>,
    pub search_query: Option<String>,
    pub time_period: Option<TimePeriod>,
    pub selected_date: Option<Option<NaiveDate>>,
}

impl FilterPatch {
    pub fn status(mut self, status: impl Into<StatusFilter>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn search(mut self, query: impl Into<String>) -> Self {
        self.search_query = Some(query.into());
        self
    }

    pub fn period(mut self, period: TimePeriod) -> Self {
        self.time_period = Some(period);
        self
    }

    pub fn date(mut self, date: Option<NaiveDate>) -> Self {
        self.selected_date = Some(date);
        self
    }
}

/// Query string of a list request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    pub page: u32,
    pub limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<TimePeriod>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
}

impl ListQuery {
    pub fn from_filter(filter: &FilterState, page: u32, limit: u32) -> Self {
        let search = filter.search_query.trim();
        let window = filter.period_window();
        Self {
            status: filter.status.query_value().map(str::to_string),
            search: (!search.is_empty()).then(|| search.to_string()),
            page,
            limit,
            period: window.map(|(period, _)| period),
            date: window.map(|(_, date)| date),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageMode {
    Replace,
    Append,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationMethod {
    Post,
    Patch,
    Delete,
}

/// Admin actions on a single listed item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemOperation {
    Reply { reply: String },
    Resolve,
    SetStatus { status: String },
    Approve,
    Reject { rejection_reason: String },
    Delete,
}

impl ItemOperation {
    pub fn method(&self) -> MutationMethod {
        match self {
            Self::Reply { .. } => MutationMethod::Post,
            Self::Resolve | Self::SetStatus { .. } | Self::Approve | Self::Reject { .. } => {
                MutationMethod::Patch
            }
            Self::Delete => MutationMethod::Delete,
        }
    }

    /// Trailing path segment after the item id, if any.
    pub fn action(&self) -> Option<&'static str> {
        match self {
            Self::Reply { .. } => Some("reply"),
            Self::Resolve => Some("resolve"),
            Self::SetStatus { .. } => Some("status"),
            Self::Approve => Some("approve"),
            Self::Reject { .. } => Some("reject"),
            Self::Delete => None,
        }
    }

    pub fn body(&self) -> Option<Value> {
        match self {
            Self::Reply { reply } => Some(json!({ "reply": reply.trim() })),
            Self::SetStatus { status } => Some(json!({ "status": status.trim() })),
            Self::Reject { rejection_reason } => {
                Some(json!({ "rejectionReason": rejection_reason.trim() }))
            }
            Self::Resolve | Self::Approve | Self::Delete => None,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        match self {
            Self::Reply { reply } if reply.trim().is_empty() => Err(ValidationError::EmptyReply),
            Self::SetStatus { status } if status.trim().is_empty() => {
                Err(ValidationError::EmptyStatus)
            }
            Self::Reject { rejection_reason } if rejection_reason.trim().is_empty() => {
                Err(ValidationError::EmptyRejectionReason)
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
#[path = "tests/protocol_tests.rs"]
mod tests;
