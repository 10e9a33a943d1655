//! Calendar source backed by another warehouse server's HTTP API

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::de::DeserializeOwned;

use super::calendar::CalendarSource;
use crate::{
    engine::shortage::overlaps,
    error::{AppError, AppResult},
    models::{project::Project, shortage::{ProjectShortage, ShortagesResponse}},
};

#[derive(Clone)]
pub struct RemoteCalendarSource {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl RemoteCalendarSource {
    pub fn new(base_url: &str, token: Option<String>) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .map_err(|e| AppError::Internal(format!("failed building HTTP client: {}", e)))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> AppResult<T> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self
            .client
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .query(query);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("GET {}: {}", url, e)))?;
        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Upstream(format!("GET {} returned {}", url, status)));
        }
        response
            .json::<T>()
            .await
            .map_err(|e| AppError::Upstream(format!("GET {}: invalid body: {}", url, e)))
    }
}

fn instant_param(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[async_trait]
impl CalendarSource for RemoteCalendarSource {
    async fn bookings(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> AppResult<Vec<Project>> {
        let projects: Vec<Project> = self.get_json("/projects", &[]).await?;
        for project in &projects {
            project.check_window()?;
        }
        Ok(projects
            .into_iter()
            .filter(|p| overlaps(p.usage_start, p.usage_end, from, to))
            .collect())
    }

    async fn shortages(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> AppResult<Vec<ProjectShortage>> {
        let response: ShortagesResponse = self
            .get_json(
                "/shortages",
                &[("from", instant_param(from)), ("to", instant_param(to))],
            )
            .await?;
        Ok(response.projects)
    }
}
