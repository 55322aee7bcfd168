//! Canned analytics data.
//!
//! The dashboard endpoints serve deterministic fixtures anchored to the
//! current time, enough for the SDK tests and for eyeballing CLI output.
//! Nothing here is ingested or aggregated.

use std::collections::HashMap;

use chrono::{Duration, Utc};

use radarsnap_models::{
    AnalyticsStats, BrowserStats, DashboardOverview, DeviceStats, ErrorByType, ErrorDetail,
    ErrorSummary, EventStats, PageStats, PerformanceMetrics, PerformanceTrendPoint, Session,
    SessionDetail, SessionEvent, SessionPage, SlowPage, TimeRange, TrendPoint,
};

fn day_bucket(days_ago: i64) -> String {
    (Utc::now() - Duration::days(days_ago))
        .format("%Y-%m-%d")
        .to_string()
}

/// Seven-day dashboard overview.
pub fn dashboard_overview() -> DashboardOverview {
    let sessions_trend: Vec<TrendPoint> = (0..7)
        .rev()
        .map(|d| TrendPoint {
            date: day_bucket(d),
            value: 120.0 + 10.0 * (6 - d) as f64,
        })
        .collect();
    let page_views_trend: Vec<TrendPoint> = (0..7)
        .rev()
        .map(|d| TrendPoint {
            date: day_bucket(d),
            value: 410.0 + 25.0 * (6 - d) as f64,
        })
        .collect();

    DashboardOverview {
        total_sessions: 1_042,
        total_page_views: 3_577,
        total_events: 866,
        unique_visitors: 781,
        avg_session_duration: 184.2,
        bounce_rate: 0.38,
        sessions_trend,
        page_views_trend,
        top_pages: vec![
            PageStats {
                page_url: "/".to_string(),
                page_title: "Home".to_string(),
                views: 1_204,
                unique_visitors: 690,
                avg_time_on_page: 42.5,
                bounce_rate: 0.41,
            },
            PageStats {
                page_url: "/pricing".to_string(),
                page_title: "Pricing".to_string(),
                views: 644,
                unique_visitors: 512,
                avg_time_on_page: 75.1,
                bounce_rate: 0.22,
            },
            PageStats {
                page_url: "/checkout".to_string(),
                page_title: "Checkout".to_string(),
                views: 311,
                unique_visitors: 298,
                avg_time_on_page: 118.9,
                bounce_rate: 0.09,
            },
        ],
        top_events: vec![
            EventStats {
                event_name: "add_to_cart".to_string(),
                count: 402,
                unique_users: 245,
            },
            EventStats {
                event_name: "signup".to_string(),
                count: 96,
                unique_users: 96,
            },
        ],
        devices: vec![
            DeviceStats {
                device_type: "desktop".to_string(),
                count: 640,
                percentage: 61.4,
            },
            DeviceStats {
                device_type: "mobile".to_string(),
                count: 355,
                percentage: 34.1,
            },
            DeviceStats {
                device_type: "tablet".to_string(),
                count: 47,
                percentage: 4.5,
            },
        ],
        browsers: vec![
            BrowserStats {
                browser_name: "Chrome".to_string(),
                browser_version: "126".to_string(),
                count: 598,
                percentage: 57.4,
            },
            BrowserStats {
                browser_name: "Firefox".to_string(),
                browser_version: "128".to_string(),
                count: 233,
                percentage: 22.4,
            },
            BrowserStats {
                browser_name: "Safari".to_string(),
                browser_version: "17".to_string(),
                count: 211,
                percentage: 20.2,
            },
        ],
        time_range: TimeRange {
            start: Utc::now() - Duration::days(7),
            end: Utc::now(),
        },
    }
}

/// Fixture session list, newest first.
pub fn sessions() -> Vec<Session> {
    let now = Utc::now();
    let specs: [(&str, &str, &str, &str, &str, &str, f64, u32, u32, bool); 5] = [
        ("s-1", "u-demo", "desktop", "Firefox", "Linux", "FR", 612.0, 5, 3, false),
        ("s-2", "", "mobile", "Chrome", "Android", "DE", 95.0, 2, 0, false),
        ("s-3", "", "desktop", "Chrome", "Windows", "US", 31.0, 1, 0, true),
        ("s-4", "u-demo", "tablet", "Safari", "iPadOS", "FR", 247.0, 3, 1, false),
        ("s-5", "", "mobile", "Safari", "iOS", "ES", 18.0, 1, 0, true),
    ];
    specs
        .iter()
        .enumerate()
        .map(
            |(i, (sid, user, device, browser, os, country, duration, pages, events, bounce))| {
                let started = now - Duration::hours(i as i64 + 1);
                Session {
                    id: format!("rec-{}", i + 1),
                    session_id: (*sid).to_string(),
                    user_id: (!user.is_empty()).then(|| (*user).to_string()),
                    device_type: (*device).to_string(),
                    browser: (*browser).to_string(),
                    os: (*os).to_string(),
                    country: (*country).to_string(),
                    city: "".to_string(),
                    started_at: started,
                    ended_at: Some(started + Duration::seconds(*duration as i64)),
                    duration: *duration,
                    page_views: *pages,
                    events_count: *events,
                    is_bounce: *bounce,
                }
            },
        )
        .collect()
}

/// Full timeline for one fixture session, if it exists.
pub fn session_detail(session_id: &str) -> Option<SessionDetail> {
    let session = sessions().into_iter().find(|s| s.session_id == session_id)?;
    let start = session.started_at;

    let pages = vec![
        SessionPage {
            id: "pg-1".to_string(),
            page_url: "/".to_string(),
            page_title: "Home".to_string(),
            referrer: Some("https://www.google.com/".to_string()),
            visited_at: start,
            time_on_page: 34.0,
        },
        SessionPage {
            id: "pg-2".to_string(),
            page_url: "/pricing".to_string(),
            page_title: "Pricing".to_string(),
            referrer: None,
            visited_at: start + Duration::seconds(34),
            time_on_page: 81.0,
        },
    ];
    let events = vec![SessionEvent {
        id: "ev-1".to_string(),
        event_name: "add_to_cart".to_string(),
        event_data: HashMap::from([(
            "sku".to_string(),
            serde_json::Value::String("RS-1001".to_string()),
        )]),
        page_url: "/pricing".to_string(),
        timestamp: start + Duration::seconds(90),
    }];

    Some(SessionDetail {
        session,
        pages,
        events,
        user_properties: HashMap::from([(
            "plan".to_string(),
            serde_json::Value::String("trial".to_string()),
        )]),
    })
}

/// Page performance aggregates.
pub fn performance_metrics() -> PerformanceMetrics {
    PerformanceMetrics {
        avg_page_load_time: 1_420.0,
        avg_dom_content_loaded: 860.0,
        avg_first_contentful_paint: 1_080.0,
        avg_time_to_interactive: 2_150.0,
        slow_pages: vec![
            SlowPage {
                page_url: "/checkout".to_string(),
                avg_load_time: 2_940.0,
                samples: 311,
            },
            SlowPage {
                page_url: "/pricing".to_string(),
                avg_load_time: 1_820.0,
                samples: 644,
            },
        ],
        performance_trend: (0..7)
            .rev()
            .map(|d| PerformanceTrendPoint {
                date: day_bucket(d),
                avg_load_time: 1_600.0 - 30.0 * (6 - d) as f64,
            })
            .collect(),
    }
}

/// Captured-error summary.
pub fn error_summary() -> ErrorSummary {
    ErrorSummary {
        total_errors: 87,
        unique_errors: 12,
        affected_users: 41,
        error_rate: 0.08,
        errors_by_type: vec![
            ErrorByType {
                error_type: "javascript".to_string(),
                count: 61,
                percentage: 70.1,
            },
            ErrorByType {
                error_type: "network".to_string(),
                count: 19,
                percentage: 21.8,
            },
            ErrorByType {
                error_type: "console".to_string(),
                count: 7,
                percentage: 8.1,
            },
        ],
        recent_errors: vec![ErrorDetail {
            id: "err-1".to_string(),
            error_message: "TypeError: cart is undefined".to_string(),
            error_type: "javascript".to_string(),
            page_url: "/checkout".to_string(),
            user_agent: "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0"
                .to_string(),
            occurred_at: Utc::now() - Duration::hours(2),
            stack_trace: Some("at addToCart (checkout.js:42)".to_string()),
            occurrences: 23,
        }],
    }
}

/// Global ingestion counters.
pub fn analytics_stats() -> AnalyticsStats {
    AnalyticsStats {
        total_events: 18_204,
        total_sessions: 6_311,
        events_today: 96,
        sessions_today: 34,
        last_event_at: Some(Utc::now() - Duration::minutes(4)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overview_trends_cover_seven_days() {
        let overview = dashboard_overview();
        assert_eq!(overview.sessions_trend.len(), 7);
        assert_eq!(overview.page_views_trend.len(), 7);
        assert_eq!(overview.sessions_trend.last().unwrap().date, day_bucket(0));
    }

    #[test]
    fn session_detail_matches_list() {
        let listed = sessions();
        let detail = session_detail("s-1").unwrap();
        assert_eq!(detail.session.session_id, listed[0].session_id);
        assert!(!detail.pages.is_empty());
    }

    #[test]
    fn unknown_session_has_no_detail() {
        assert!(session_detail("s-missing").is_none());
    }
}
