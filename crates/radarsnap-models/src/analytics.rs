//! Analytics aggregate DTOs.
//!
//! These are *read models*: the backend computes every aggregate, the
//! client only renders them. Shapes follow the dashboard endpoints under
//! `/api/v1/dashboard/projects/{id}/…`.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Query parameters
// ---------------------------------------------------------------------------

/// Common time-window parameters accepted by every dashboard endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardQuery {
    /// Inclusive window start (`YYYY-MM-DD`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    /// Inclusive window end (`YYYY-MM-DD`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    /// IANA timezone used to bucket days.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}

impl DashboardQuery {
    /// Render as query-string pairs, skipping unset fields.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(v) = &self.start_date {
            pairs.push(("start_date".to_string(), v.clone()));
        }
        if let Some(v) = &self.end_date {
            pairs.push(("end_date".to_string(), v.clone()));
        }
        if let Some(v) = &self.timezone {
            pairs.push(("timezone".to_string(), v.clone()));
        }
        pairs
    }
}

/// Parameters for the sessions list endpoint (time window + paging +
/// segment filters).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionsQuery {
    /// Time-window parameters.
    #[serde(flatten)]
    pub window: DashboardQuery,
    /// 1-based page number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    /// Page size (backend caps at 100).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
    /// Filter by device class (`desktop` / `mobile` / `tablet`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_type: Option<String>,
    /// Filter by browser name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub browser: Option<String>,
    /// Filter by ISO country code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

impl SessionsQuery {
    /// Render as query-string pairs, skipping unset fields.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = self.window.to_pairs();
        if let Some(v) = self.page {
            pairs.push(("page".to_string(), v.to_string()));
        }
        if let Some(v) = self.page_size {
            pairs.push(("page_size".to_string(), v.to_string()));
        }
        if let Some(v) = &self.device_type {
            pairs.push(("device_type".to_string(), v.clone()));
        }
        if let Some(v) = &self.browser {
            pairs.push(("browser".to_string(), v.clone()));
        }
        if let Some(v) = &self.country {
            pairs.push(("country".to_string(), v.clone()));
        }
        pairs
    }
}

// ---------------------------------------------------------------------------
// Dashboard overview
// ---------------------------------------------------------------------------

/// One point of a daily trend series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    /// Day bucket (`YYYY-MM-DD`).
    pub date: String,
    /// Value for that day.
    pub value: f64,
}

/// Per-page traffic statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageStats {
    /// Page URL (path component).
    pub page_url: String,
    /// Document title at capture time.
    pub page_title: String,
    /// Total views in the window.
    pub views: u64,
    /// Distinct visitors in the window.
    pub unique_visitors: u64,
    /// Mean seconds spent on the page.
    pub avg_time_on_page: f64,
    /// Share of single-page sessions starting here, 0..=1.
    pub bounce_rate: f64,
}

/// Per-event statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventStats {
    /// Event name as recorded by the tracking snippet.
    pub event_name: String,
    /// Total occurrences.
    pub count: u64,
    /// Distinct users who fired it.
    pub unique_users: u64,
}

/// Device-class share.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceStats {
    /// Device class (`desktop` / `mobile` / `tablet`).
    pub device_type: String,
    /// Session count.
    pub count: u64,
    /// Share of all sessions, 0..=100.
    pub percentage: f64,
}

/// Browser share.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrowserStats {
    /// Browser family name.
    pub browser_name: String,
    /// Major version string.
    pub browser_version: String,
    /// Session count.
    pub count: u64,
    /// Share of all sessions, 0..=100.
    pub percentage: f64,
}

/// Reported time window of an aggregate response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeRange {
    /// Window start.
    pub start: DateTime<Utc>,
    /// Window end.
    pub end: DateTime<Utc>,
}

/// Response of `GET /api/v1/dashboard/projects/{id}/dashboard`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardOverview {
    /// Sessions in the window.
    pub total_sessions: u64,
    /// Page views in the window.
    pub total_page_views: u64,
    /// Custom events in the window.
    pub total_events: u64,
    /// Distinct visitors in the window.
    pub unique_visitors: u64,
    /// Mean session duration in seconds.
    pub avg_session_duration: f64,
    /// Share of single-page sessions, 0..=1.
    pub bounce_rate: f64,
    /// Daily session counts.
    pub sessions_trend: Vec<TrendPoint>,
    /// Daily page-view counts.
    pub page_views_trend: Vec<TrendPoint>,
    /// Most-visited pages.
    pub top_pages: Vec<PageStats>,
    /// Most-fired events.
    pub top_events: Vec<EventStats>,
    /// Device-class breakdown.
    pub devices: Vec<DeviceStats>,
    /// Browser breakdown.
    pub browsers: Vec<BrowserStats>,
    /// The window these aggregates cover.
    pub time_range: TimeRange,
}

// ---------------------------------------------------------------------------
// Sessions
// ---------------------------------------------------------------------------

/// A captured visitor session (list form).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Backend record id.
    pub id: String,
    /// Client-generated session id.
    pub session_id: String,
    /// Identified user, if the site associated one.
    pub user_id: Option<String>,
    /// Device class.
    pub device_type: String,
    /// Browser family.
    pub browser: String,
    /// Operating system.
    pub os: String,
    /// Geo-resolved country.
    pub country: String,
    /// Geo-resolved city.
    pub city: String,
    /// Session start.
    pub started_at: DateTime<Utc>,
    /// Session end; `None` while still live.
    pub ended_at: Option<DateTime<Utc>>,
    /// Duration in seconds.
    pub duration: f64,
    /// Pages visited.
    pub page_views: u32,
    /// Custom events fired.
    pub events_count: u32,
    /// Whether the session bounced (single page, no events).
    pub is_bounce: bool,
}

/// One page visit within a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionPage {
    /// Record id.
    pub id: String,
    /// Visited URL.
    pub page_url: String,
    /// Document title.
    pub page_title: String,
    /// Referrer URL, if any.
    pub referrer: Option<String>,
    /// Visit timestamp.
    pub visited_at: DateTime<Utc>,
    /// Seconds spent on the page.
    pub time_on_page: f64,
}

/// One custom event within a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionEvent {
    /// Record id.
    pub id: String,
    /// Event name.
    pub event_name: String,
    /// Arbitrary event payload.
    pub event_data: HashMap<String, serde_json::Value>,
    /// Page the event fired on.
    pub page_url: String,
    /// Event timestamp.
    pub timestamp: DateTime<Utc>,
}

/// Response of `GET …/sessions/{session_id}`: the session plus its
/// page and event timelines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionDetail {
    /// The session record.
    #[serde(flatten)]
    pub session: Session,
    /// Page visits, in order.
    pub pages: Vec<SessionPage>,
    /// Custom events, in order.
    pub events: Vec<SessionEvent>,
    /// Site-supplied user properties.
    pub user_properties: HashMap<String, serde_json::Value>,
}

// ---------------------------------------------------------------------------
// Performance
// ---------------------------------------------------------------------------

/// A page ranked by load time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlowPage {
    /// Page URL.
    pub page_url: String,
    /// Mean load time in milliseconds.
    pub avg_load_time: f64,
    /// Number of samples behind the mean.
    pub samples: u64,
}

/// One point of the daily load-time trend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceTrendPoint {
    /// Day bucket (`YYYY-MM-DD`).
    pub date: String,
    /// Mean load time in milliseconds.
    pub avg_load_time: f64,
}

/// Response of `GET …/performance`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    /// Mean full page load, milliseconds.
    pub avg_page_load_time: f64,
    /// Mean DOMContentLoaded, milliseconds.
    pub avg_dom_content_loaded: f64,
    /// Mean first contentful paint, milliseconds.
    pub avg_first_contentful_paint: f64,
    /// Mean time to interactive, milliseconds.
    pub avg_time_to_interactive: f64,
    /// Slowest pages in the window.
    pub slow_pages: Vec<SlowPage>,
    /// Daily load-time trend.
    pub performance_trend: Vec<PerformanceTrendPoint>,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Error count grouped by type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorByType {
    /// Error class (`javascript` / `network` / `console`).
    pub error_type: String,
    /// Occurrences.
    pub count: u64,
    /// Share of all errors, 0..=100.
    pub percentage: f64,
}

/// A single captured error, deduplicated by message + location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Record id.
    pub id: String,
    /// Error message.
    pub error_message: String,
    /// Error class.
    pub error_type: String,
    /// Page the error occurred on.
    pub page_url: String,
    /// Reporting user agent.
    pub user_agent: String,
    /// First occurrence in the window.
    pub occurred_at: DateTime<Utc>,
    /// Captured stack trace, if any.
    pub stack_trace: Option<String>,
    /// Times this error was seen.
    pub occurrences: u64,
}

/// Response of `GET …/errors`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorSummary {
    /// Total error events in the window.
    pub total_errors: u64,
    /// Distinct deduplicated errors.
    pub unique_errors: u64,
    /// Users who hit at least one error.
    pub affected_users: u64,
    /// Errors per session, 0..=1.
    pub error_rate: f64,
    /// Breakdown by class.
    pub errors_by_type: Vec<ErrorByType>,
    /// Most recent distinct errors.
    pub recent_errors: Vec<ErrorDetail>,
}

// ---------------------------------------------------------------------------
// Ingestion stats
// ---------------------------------------------------------------------------

/// Response of `GET /api/v1/analytics/stats`: quick counters used to
/// verify a tracking snippet is delivering events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsStats {
    /// Events ever received.
    pub total_events: u64,
    /// Sessions ever recorded.
    pub total_sessions: u64,
    /// Events received today.
    pub events_today: u64,
    /// Sessions started today.
    pub sessions_today: u64,
    /// Timestamp of the most recent event, if any.
    pub last_event_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dashboard_query_pairs_skip_unset() {
        let q = DashboardQuery {
            start_date: Some("2024-05-01".into()),
            end_date: None,
            timezone: Some("Europe/Paris".into()),
        };
        let pairs = q.to_pairs();
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0], ("start_date".into(), "2024-05-01".into()));
        assert_eq!(pairs[1], ("timezone".into(), "Europe/Paris".into()));
    }

    #[test]
    fn sessions_query_includes_window_and_paging() {
        let q = SessionsQuery {
            window: DashboardQuery {
                start_date: Some("2024-05-01".into()),
                ..DashboardQuery::default()
            },
            page: Some(2),
            page_size: Some(50),
            device_type: Some("mobile".into()),
            ..SessionsQuery::default()
        };
        let pairs = q.to_pairs();
        assert!(pairs.contains(&("start_date".into(), "2024-05-01".into())));
        assert!(pairs.contains(&("page".into(), "2".into())));
        assert!(pairs.contains(&("page_size".into(), "50".into())));
        assert!(pairs.contains(&("device_type".into(), "mobile".into())));
    }

    #[test]
    fn session_detail_flattens_session_fields() {
        let json = r#"{
            "id": "rec-1",
            "session_id": "s-abc",
            "user_id": null,
            "device_type": "desktop",
            "browser": "Firefox",
            "os": "Linux",
            "country": "FR",
            "city": "Paris",
            "started_at": "2024-05-01T09:00:00Z",
            "ended_at": "2024-05-01T09:10:00Z",
            "duration": 600.0,
            "page_views": 4,
            "events_count": 2,
            "is_bounce": false,
            "pages": [],
            "events": [],
            "user_properties": {}
        }"#;
        let detail: SessionDetail = serde_json::from_str(json).unwrap();
        assert_eq!(detail.session.session_id, "s-abc");
        assert_eq!(detail.session.page_views, 4);
        assert!(detail.pages.is_empty());
    }

    #[test]
    fn analytics_stats_null_last_event() {
        let json = r#"{
            "total_events": 0,
            "total_sessions": 0,
            "events_today": 0,
            "sessions_today": 0,
            "last_event_at": null
        }"#;
        let stats: AnalyticsStats = serde_json::from_str(json).unwrap();
        assert!(stats.last_event_at.is_none());
    }
}
