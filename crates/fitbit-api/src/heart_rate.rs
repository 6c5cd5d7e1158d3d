//! Heart-rate time series and intraday endpoints
//!
//! See <https://dev.fitbit.com/build/reference/web-api/heartrate-timeseries/>
//! and <https://dev.fitbit.com/build/reference/web-api/intraday/>.
//!
//! Parameters are validated locally before anything goes over the wire.
//! Combination rules that only the server knows (a multi-day interval with a
//! time window, for instance) are passed through and left to Fitbit.

use fitbit_auth::CredentialStore;
use serde_json::Value;

use crate::client::ApiClient;
use crate::error::Result;
use crate::validate;

/// Heart-rate accessor borrowed from an [`ApiClient`].
pub struct HeartRate<'a, S: ?Sized> {
    client: &'a ApiClient<S>,
}

impl<S: CredentialStore + ?Sized> ApiClient<S> {
    pub fn heart_rate(&self) -> HeartRate<'_, S> {
        HeartRate { client: self }
    }
}

impl<S: CredentialStore + ?Sized> HeartRate<'_, S> {
    /// Daily summaries for `period` ending on `date`.
    pub async fn by_date(&self, date: &str, period: &str) -> Result<Value> {
        let resource = by_date_resource(date, period)?;
        self.client.get_user_resource(&resource).await
    }

    /// Daily summaries for every day in `start..=end`.
    pub async fn by_date_range(&self, start: &str, end: &str) -> Result<Value> {
        let resource = by_date_range_resource(start, end)?;
        self.client.get_user_resource(&resource).await
    }

    /// Intraday series for one day, optionally limited to a time window.
    pub async fn intraday_by_date(
        &self,
        date: &str,
        detail_level: &str,
        start_time: Option<&str>,
        end_time: Option<&str>,
    ) -> Result<Value> {
        let resource = intraday_by_date_resource(date, detail_level, start_time, end_time)?;
        self.client.get_user_resource(&resource).await
    }

    /// Intraday series across `start_date..=end_date`.
    ///
    /// Fitbit only serves multi-day intraday ranges without a time window;
    /// that rule is enforced server-side and surfaces as `ApiRequest`.
    pub async fn intraday_by_interval(
        &self,
        start_date: &str,
        end_date: &str,
        detail_level: &str,
        start_time: Option<&str>,
        end_time: Option<&str>,
    ) -> Result<Value> {
        let resource =
            intraday_by_interval_resource(start_date, end_date, detail_level, start_time, end_time)?;
        self.client.get_user_resource(&resource).await
    }
}

fn by_date_resource(date: &str, period: &str) -> Result<String> {
    let date = validate::date(date)?;
    let period = validate::period(period)?;
    Ok(format!("activities/heart/date/{date}/{period}.json"))
}

fn by_date_range_resource(start: &str, end: &str) -> Result<String> {
    let start = validate::date(start)?;
    let end = validate::date(end)?;
    Ok(format!("activities/heart/date/{start}/{end}.json"))
}

fn intraday_by_date_resource(
    date: &str,
    detail_level: &str,
    start_time: Option<&str>,
    end_time: Option<&str>,
) -> Result<String> {
    let date = validate::date(date)?;
    let detail_level = validate::detail_level(detail_level)?;
    let window = validate::time_window(start_time, end_time)?;
    Ok(format!(
        "activities/heart/date/{date}/1d/{detail_level}{}.json",
        window_segment(window)
    ))
}

fn intraday_by_interval_resource(
    start_date: &str,
    end_date: &str,
    detail_level: &str,
    start_time: Option<&str>,
    end_time: Option<&str>,
) -> Result<String> {
    let start_date = validate::date(start_date)?;
    let end_date = validate::date(end_date)?;
    let detail_level = validate::detail_level(detail_level)?;
    let window = validate::time_window(start_time, end_time)?;
    Ok(format!(
        "activities/heart/date/{start_date}/{end_date}/{detail_level}{}.json",
        window_segment(window)
    ))
}

fn window_segment(window: Option<(&str, &str)>) -> String {
    window
        .map(|(start, end)| format!("/time/{start}/{end}"))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::tests::test_client;
    use crate::error::Error;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn resource_paths() {
        assert_eq!(
            by_date_resource("today", "1d").unwrap(),
            "activities/heart/date/today/1d.json"
        );
        assert_eq!(
            by_date_range_resource("2022-08-01", "2022-08-15").unwrap(),
            "activities/heart/date/2022-08-01/2022-08-15.json"
        );
        assert_eq!(
            intraday_by_date_resource("2022-08-15", "1min", None, None).unwrap(),
            "activities/heart/date/2022-08-15/1d/1min.json"
        );
        assert_eq!(
            intraday_by_date_resource("2022-08-15", "1sec", Some("07:00"), Some("08:00")).unwrap(),
            "activities/heart/date/2022-08-15/1d/1sec/time/07:00/08:00.json"
        );
        assert_eq!(
            intraday_by_interval_resource("2022-08-14", "2022-08-15", "5min", None, None).unwrap(),
            "activities/heart/date/2022-08-14/2022-08-15/5min.json"
        );
    }

    #[test]
    fn interval_with_window_is_not_prejudged() {
        // Fitbit rejects multi-day ranges with a time window; that's its call
        assert_eq!(
            intraday_by_interval_resource(
                "2022-08-14",
                "2022-08-15",
                "1min",
                Some("07:00"),
                Some("08:00")
            )
            .unwrap(),
            "activities/heart/date/2022-08-14/2022-08-15/1min/time/07:00/08:00.json"
        );
    }

    #[test]
    fn bad_parameters_rejected() {
        assert!(by_date_resource("2022-8-15", "1d").is_err());
        assert!(by_date_resource("today", "2d").is_err());
        assert!(by_date_range_resource("today", "15-08-2022").is_err());
        assert!(intraday_by_date_resource("today", "30min", None, None).is_err());
        assert!(intraday_by_date_resource("today", "1min", Some("07:00"), None).is_err());
        assert!(intraday_by_interval_resource("today", "today", "1min", None, Some("08:00")).is_err());
    }

    #[tokio::test]
    async fn by_date_hits_user_scoped_path() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/1/user/ABCDEF/activities/heart/date/today/7d.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "activities-heart": [{"dateTime": "2022-08-15", "value": {"restingHeartRate": 58}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let client = test_client(&server, &dir).await;
        let value = client.heart_rate().by_date("today", "7d").await.unwrap();
        assert_eq!(
            value["activities-heart"][0]["value"]["restingHeartRate"],
            58
        );
    }

    #[tokio::test]
    async fn intraday_with_window_hits_time_path() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(
                "/1/user/ABCDEF/activities/heart/date/2022-08-15/1d/1min/time/07:00/08:00.json",
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let client = test_client(&server, &dir).await;
        client
            .heart_rate()
            .intraday_by_date("2022-08-15", "1min", Some("07:00"), Some("08:00"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn validation_failure_sends_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .expect(0)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let client = test_client(&server, &dir).await;
        let err = client
            .heart_rate()
            .intraday_by_interval("2022-08-14", "2022-08-15", "1min", Some("07:00"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }
}
