//! Request logger: page views, errors and performance metrics.
//!
//! Records are serialized to JSON and emitted through the `log` facade on
//! dedicated targets, so whichever logger the host installs decides where
//! they go. [`init_console_logger`] installs one that writes the line
//! format
//!
//! ```text
//! 2026-01-01T12:00:00.000Z [INFO] : Page View{"timestamp":...}
//! ```

mod records;

use std::error::Error;
use std::io::Write;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::time::Duration;

use web_time::{SystemTime, UNIX_EPOCH};

pub use records::{ErrorReport, PageView, PerformanceMetric, RequestInfo};

use crate::options::AnalyticsOptions;

/// Log target for page views.
pub const ANALYTICS_TARGET: &str = "cardfolio::analytics";
/// Log target for error reports.
pub const ERRORS_TARGET: &str = "cardfolio::errors";
/// Log target for performance metrics.
pub const PERFORMANCE_TARGET: &str = "cardfolio::performance";

/// Status and size of a finished response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseInfo {
    /// HTTP status.
    pub status: u16,
    /// Body length in bytes.
    pub content_length: Option<u64>,
}

/// Zero the host part of an address: the last octet of IPv4, the last 80
/// bits of IPv6.
#[must_use]
pub fn anonymize_ip(ip: IpAddr) -> IpAddr {
    match ip {
        IpAddr::V4(v4) => {
            let [a, b, c, _] = v4.octets();
            IpAddr::V4(Ipv4Addr::new(a, b, c, 0))
        }
        IpAddr::V6(v6) => {
            let s = v6.segments();
            IpAddr::V6(Ipv6Addr::new(s[0], s[1], s[2], 0, 0, 0, 0, 0))
        }
    }
}

/// One output line: `"{timestamp} [{level}] : {message}"`.
#[must_use]
pub fn format_line(timestamp: &str, level: log::Level, message: &str) -> String {
    format!("{timestamp} [{level}] : {message}")
}

/// Install an `env_logger` writing [`format_line`] lines to stderr.
///
/// `filter` uses `RUST_LOG` syntax and is overridden by `RUST_LOG` when
/// set.
pub fn init_console_logger(filter: &str) -> Result<(), log::SetLoggerError> {
    env_logger::Builder::new()
        .parse_filters(filter)
        .parse_env("RUST_LOG")
        .format(|buf, record| {
            let timestamp = buf.timestamp_millis().to_string();
            let message = record.args().to_string();
            writeln!(buf, "{}", format_line(&timestamp, record.level(), &message))
        })
        .try_init()
}

fn unix_millis(at: SystemTime) -> u64 {
    at.duration_since(UNIX_EPOCH)
        .map_or(0, |d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
}

/// Builds analytics records and emits them as log lines.
#[derive(Debug, Clone, Default)]
pub struct AnalyticsLogger {
    options: AnalyticsOptions,
}

impl AnalyticsLogger {
    /// Logger with the given options.
    #[must_use]
    pub fn new(options: AnalyticsOptions) -> Self {
        Self { options }
    }

    /// Options in effect.
    #[must_use]
    pub fn options(&self) -> &AnalyticsOptions {
        &self.options
    }

    fn client_ip(&self, ip: Option<IpAddr>) -> Option<String> {
        ip.map(|ip| {
            if self.options.anonymize_ip {
                anonymize_ip(ip).to_string()
            } else {
                ip.to_string()
            }
        })
    }

    /// Page view record for `request` at `at`.
    #[must_use]
    pub fn page_view(&self, request: &RequestInfo, at: SystemTime) -> PageView {
        PageView {
            timestamp: unix_millis(at),
            path: request.path.clone(),
            method: request.method.clone(),
            user_agent: request.user_agent.clone(),
            ip: self.client_ip(request.ip),
            referrer: request
                .referrer
                .clone()
                .unwrap_or_else(|| "direct".to_owned()),
            session_id: request.session_id.clone(),
        }
    }

    /// Error record for `error`, with the request in flight if any.
    #[must_use]
    pub fn error_report(
        &self,
        error: &dyn Error,
        request: Option<&RequestInfo>,
        at: SystemTime,
    ) -> ErrorReport {
        let mut stack = Vec::new();
        let mut source = error.source();
        while let Some(cause) = source {
            stack.push(cause.to_string());
            source = cause.source();
        }
        ErrorReport {
            timestamp: unix_millis(at),
            error: error.to_string(),
            stack,
            path: request.map(|r| r.path.clone()),
            method: request.map(|r| r.method.clone()),
            user_agent: request.and_then(|r| r.user_agent.clone()),
            ip: request.and_then(|r| self.client_ip(r.ip)),
        }
    }

    /// Performance record for a served request.
    #[must_use]
    pub fn performance(
        &self,
        request: &RequestInfo,
        response: ResponseInfo,
        elapsed: Duration,
        at: SystemTime,
    ) -> PerformanceMetric {
        PerformanceMetric {
            timestamp: unix_millis(at),
            path: request.path.clone(),
            method: request.method.clone(),
            response_time: elapsed.as_secs_f64() * 1000.0,
            status_code: Some(response.status),
            content_length: response.content_length,
        }
    }

    /// Performance record for a completed page sequence such as `select`.
    #[must_use]
    pub fn sequence(&self, name: &str, elapsed: Duration, at: SystemTime) -> PerformanceMetric {
        PerformanceMetric {
            timestamp: unix_millis(at),
            path: format!("animation/{name}"),
            method: "-".to_owned(),
            response_time: elapsed.as_secs_f64() * 1000.0,
            status_code: None,
            content_length: None,
        }
    }

    /// Emit a page view.
    pub fn track_page_view(&self, request: &RequestInfo) {
        let record = self.page_view(request, SystemTime::now());
        emit(ANALYTICS_TARGET, log::Level::Info, "Page View", &record);
    }

    /// Emit an error report.
    pub fn track_error(&self, error: &dyn Error, request: Option<&RequestInfo>) {
        let record = self.error_report(error, request, SystemTime::now());
        emit(ERRORS_TARGET, log::Level::Error, "Error Occurred", &record);
    }

    /// Emit a request performance metric.
    pub fn track_performance(
        &self,
        request: &RequestInfo,
        response: ResponseInfo,
        elapsed: Duration,
    ) {
        let record = self.performance(request, response, elapsed, SystemTime::now());
        emit(PERFORMANCE_TARGET, log::Level::Info, "Performance Metric", &record);
    }

    /// Emit the duration of a page sequence, if sequence metrics are on.
    pub fn track_sequence(&self, name: &str, elapsed: Duration) {
        if !self.options.sequence_metrics {
            return;
        }
        let record = self.sequence(name, elapsed, SystemTime::now());
        emit(PERFORMANCE_TARGET, log::Level::Info, "Performance Metric", &record);
    }
}

fn emit<R: serde::Serialize>(target: &str, level: log::Level, message: &str, record: &R) {
    match serde_json::to_string(record) {
        Ok(json) => log::log!(target: target, level, "{message}{json}"),
        Err(e) => log::warn!(target: target, "{message}: unserializable record: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use std::fmt;
    use std::sync::{Mutex, Once};

    use super::*;

    type Line = (String, log::Level, String);

    /// Process-wide logger keeping every line for inspection.
    struct Capture(Mutex<Vec<Line>>);

    impl log::Log for Capture {
        fn enabled(&self, _: &log::Metadata<'_>) -> bool {
            true
        }

        fn log(&self, record: &log::Record<'_>) {
            if let Ok(mut lines) = self.0.lock() {
                lines.push((
                    record.target().to_owned(),
                    record.level(),
                    record.args().to_string(),
                ));
            }
        }

        fn flush(&self) {}
    }

    static CAPTURE: Capture = Capture(Mutex::new(Vec::new()));

    fn capture() -> &'static Capture {
        static INSTALL: Once = Once::new();
        INSTALL.call_once(|| {
            log::set_logger(&CAPTURE).unwrap();
            log::set_max_level(log::LevelFilter::Trace);
        });
        &CAPTURE
    }

    /// Captured line on `target` starting with `message` and mentioning
    /// `marker`. Other tests log concurrently, so lines are matched by
    /// content.
    fn captured(target: &str, message: &str, marker: &str) -> Option<Line> {
        let lines = capture().0.lock().unwrap();
        lines
            .iter()
            .find(|(t, _, m)| t == target && m.starts_with(message) && m.contains(marker))
            .cloned()
    }

    fn request() -> RequestInfo {
        RequestInfo {
            user_agent: Some("test-agent".to_owned()),
            ip: Some("203.0.113.77".parse().unwrap()),
            session_id: Some("abc".to_owned()),
            ..RequestInfo::new("GET", "/projects")
        }
    }

    fn at() -> SystemTime {
        UNIX_EPOCH + Duration::from_millis(1_700_000_000_123)
    }

    #[test]
    fn anonymizes_both_families() {
        assert_eq!(
            anonymize_ip("192.168.4.200".parse().unwrap()),
            "192.168.4.0".parse::<IpAddr>().unwrap()
        );
        assert_eq!(
            anonymize_ip("2001:db8:85a3:8d3:1319:8a2e:370:7348".parse().unwrap()),
            "2001:db8:85a3::".parse::<IpAddr>().unwrap()
        );
    }

    #[test]
    fn page_view_defaults_referrer_and_masks_ip() {
        let logger = AnalyticsLogger::default();
        let view = logger.page_view(&request(), at());
        assert_eq!(view.timestamp, 1_700_000_000_123);
        assert_eq!(view.referrer, "direct");
        assert_eq!(view.ip.as_deref(), Some("203.0.113.0"));

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["userAgent"], "test-agent");
        assert_eq!(json["sessionId"], "abc");
    }

    #[test]
    fn raw_ip_when_anonymizing_disabled() {
        let logger = AnalyticsLogger::new(AnalyticsOptions {
            anonymize_ip: false,
            ..AnalyticsOptions::default()
        });
        let view = logger.page_view(&request(), at());
        assert_eq!(view.ip.as_deref(), Some("203.0.113.77"));
    }

    #[derive(Debug)]
    struct Outer(std::io::Error);

    impl fmt::Display for Outer {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "render failed")
        }
    }

    impl Error for Outer {
        fn source(&self) -> Option<&(dyn Error + 'static)> {
            Some(&self.0)
        }
    }

    #[test]
    fn error_report_walks_sources() {
        let logger = AnalyticsLogger::default();
        let err = Outer(std::io::Error::other("disk gone"));
        let report = logger.error_report(&err, Some(&request()), at());
        assert_eq!(report.error, "render failed");
        assert_eq!(report.stack, vec!["disk gone".to_owned()]);
        assert_eq!(report.path.as_deref(), Some("/projects"));

        let bare = logger.error_report(&err, None, at());
        assert!(bare.path.is_none());
        assert!(bare.ip.is_none());
    }

    #[test]
    fn performance_records_timing() {
        let logger = AnalyticsLogger::default();
        let metric = logger.performance(
            &request(),
            ResponseInfo {
                status: 200,
                content_length: Some(512),
            },
            Duration::from_millis(42),
            at(),
        );
        assert!((metric.response_time - 42.0).abs() < 1e-9);
        let json = serde_json::to_value(&metric).unwrap();
        assert_eq!(json["statusCode"], 200);
        assert_eq!(json["contentLength"], 512);

        let seq = logger.sequence("select", Duration::from_millis(1300), at());
        assert_eq!(seq.path, "animation/select");
        assert!(seq.status_code.is_none());
    }

    #[test]
    fn tracked_records_are_logged_on_their_targets() {
        let _ = capture();
        let logger = AnalyticsLogger::default();
        let request = RequestInfo::new("GET", "/tracked-check");
        logger.track_page_view(&request);
        logger.track_error(&Outer(std::io::Error::other("disk gone")), Some(&request));
        logger.track_performance(
            &request,
            ResponseInfo {
                status: 404,
                content_length: None,
            },
            Duration::from_millis(5),
        );

        let (_, level, line) =
            captured(ANALYTICS_TARGET, "Page View{", "/tracked-check").unwrap();
        assert_eq!(level, log::Level::Info);
        let json: serde_json::Value = serde_json::from_str(&line["Page View".len()..]).unwrap();
        assert_eq!(json["path"], "/tracked-check");
        assert_eq!(json["referrer"], "direct");

        let (_, level, line) =
            captured(ERRORS_TARGET, "Error Occurred{", "/tracked-check").unwrap();
        assert_eq!(level, log::Level::Error);
        assert!(line.contains("\"error\":\"render failed\""), "{line}");

        let (_, level, line) =
            captured(PERFORMANCE_TARGET, "Performance Metric{", "/tracked-check").unwrap();
        assert_eq!(level, log::Level::Info);
        assert!(line.contains("\"statusCode\":404"), "{line}");
    }

    #[test]
    fn sequence_metrics_respect_the_switch() {
        let _ = capture();
        let quiet = AnalyticsLogger::new(AnalyticsOptions {
            sequence_metrics: false,
            ..AnalyticsOptions::default()
        });
        quiet.track_sequence("quiet-check", Duration::from_millis(10));
        assert!(captured(PERFORMANCE_TARGET, "Performance Metric{", "quiet-check").is_none());

        AnalyticsLogger::default().track_sequence("loud-check", Duration::from_millis(10));
        let (_, _, line) =
            captured(PERFORMANCE_TARGET, "Performance Metric{", "animation/loud-check").unwrap();
        assert!(line.contains("\"responseTime\":10"), "{line}");
    }

    #[test]
    fn console_logger_yields_to_an_installed_logger() {
        let _ = capture();
        assert!(init_console_logger("info").is_err());
    }

    #[test]
    fn line_format() {
        assert_eq!(
            format_line("2026-01-01T00:00:00.000Z", log::Level::Warn, "Page View{}"),
            "2026-01-01T00:00:00.000Z [WARN] : Page View{}"
        );
    }
}
