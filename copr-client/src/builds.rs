//! Build-related API endpoints

use copr_core::domain::build::{BuildHandle, BuildStatus};
use copr_core::dto::build::{NewBuild, NewBuildForm};
use tracing::debug;

use crate::CoprClient;
use crate::error::{ClientError, Result};

impl CoprClient {
    // =============================================================================
    // Build Submission
    // =============================================================================

    /// Schedule a build of a source package
    ///
    /// Sends exactly one request; a failure is final.
    ///
    /// # Arguments
    /// * `req` - Project coordinates and the absolute package URL
    ///
    /// # Returns
    /// A handle naming every build Copr scheduled
    pub async fn schedule_build(&self, req: &NewBuild) -> Result<BuildHandle> {
        let url = self.new_build_url(&req.owner, &req.project);
        debug!("Scheduling build of {} via {}", req.package_url, url);

        let response = self
            .client
            .post(&url)
            .basic_auth(self.login.expose(), Some(self.token.expose()))
            .form(&NewBuildForm::from(req))
            .send()
            .await?;

        let payload = self.handle_response(response).await?;

        if let Some(message) = payload.message.as_deref() {
            debug!("Copr says: {}", message);
        }

        payload.build_handle().ok_or(ClientError::MissingBuildId)
    }

    // =============================================================================
    // Build Status
    // =============================================================================

    /// Get the status of a single build
    pub async fn build_status_of(&self, build_id: &str) -> Result<BuildStatus> {
        let url = self.build_status_url(build_id);
        let response = self.client.get(&url).send().await?;

        let payload = self.handle_response(response).await?;

        payload
            .build_status()
            .ok_or_else(|| ClientError::MissingStatus(build_id.to_string()))
    }

    /// Get the combined status of every build behind a handle
    ///
    /// Stops at the first failed query.
    pub async fn build_status(&self, handle: &BuildHandle) -> Result<BuildStatus> {
        let mut statuses = Vec::with_capacity(handle.ids().len());

        for id in handle.ids() {
            let status = self.build_status_of(id).await?;
            debug!("Build {} is {}", id, status);
            statuses.push(status);
        }

        BuildStatus::aggregate(statuses)
            .ok_or_else(|| ClientError::MissingStatus(handle.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::{client, serve_once, serve_sequence};

    fn package() -> NewBuild {
        NewBuild::new("msrb", "jenkins", "http://ci.example.org/job/foo/ws/foo-1.0-1.src.rpm")
    }

    #[tokio::test]
    async fn test_schedule_build_sends_form_with_basic_auth() {
        let (base_url, server) =
            serve_once("200 OK", r#"{"output": "ok", "ids": [101], "message": "added"}"#).await;

        let handle = client(&base_url).schedule_build(&package()).await.unwrap();
        assert_eq!(handle.ids(), ["101"]);

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /api/coprs/msrb/jenkins/new_build/ HTTP/1.1"));
        // base64("api-login:api-token")
        assert!(request.contains("YXBpLWxvZ2luOmFwaS10b2tlbg=="));
        assert!(request.contains(
            "pkgs=http%3A%2F%2Fci.example.org%2Fjob%2Ffoo%2Fws%2Ffoo-1.0-1.src.rpm"
        ));
    }

    #[tokio::test]
    async fn test_schedule_build_rejected() {
        let (base_url, _server) =
            serve_once("200 OK", r#"{"output": "notok", "error": "Invalid request"}"#).await;

        let err = client(&base_url).schedule_build(&package()).await.unwrap_err();
        match err {
            ClientError::Rejected(reason) => assert_eq!(reason, "Invalid request"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_schedule_build_http_error_uses_body_reason() {
        let (base_url, _server) = serve_once(
            "403 Forbidden",
            r#"{"output": "notok", "error": "Login invalid/expired."}"#,
        )
        .await;

        let err = client(&base_url).schedule_build(&package()).await.unwrap_err();
        assert!(matches!(err, ClientError::ApiError { status: 403, .. }));
        assert_eq!(err.to_string(), "API error (status 403): Login invalid/expired.");
    }

    #[tokio::test]
    async fn test_schedule_build_without_ids() {
        let (base_url, _server) = serve_once("200 OK", r#"{"output": "ok"}"#).await;

        let err = client(&base_url).schedule_build(&package()).await.unwrap_err();
        assert!(matches!(err, ClientError::MissingBuildId));
    }

    #[tokio::test]
    async fn test_schedule_build_unreachable() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = client(&format!("http://{}", addr))
            .schedule_build(&package())
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::RequestFailed(_)));
    }

    #[tokio::test]
    async fn test_build_status() {
        let (base_url, server) =
            serve_once("200 OK", r#"{"output": "ok", "status": "succeeded"}"#).await;

        let handle = BuildHandle::new(["101"]).unwrap();
        let status = client(&base_url).build_status(&handle).await.unwrap();
        assert_eq!(status, BuildStatus::Succeeded);

        let request = server.await.unwrap();
        assert!(request.starts_with("GET /api/coprs/build_status/101/ HTTP/1.1"));
    }

    #[tokio::test]
    async fn test_build_status_aggregates_every_id() {
        let (base_url, server) = serve_sequence(&[
            ("200 OK", r#"{"output": "ok", "status": "succeeded"}"#),
            ("200 OK", r#"{"output": "ok", "status": "running"}"#),
        ])
        .await;

        let handle = BuildHandle::new(["101", "102"]).unwrap();
        let status = client(&base_url).build_status(&handle).await.unwrap();
        assert_eq!(status, BuildStatus::Running);

        let requests = server.await.unwrap();
        assert_eq!(requests.len(), 2);
        assert!(requests[0].starts_with("GET /api/coprs/build_status/101/ HTTP/1.1"));
        assert!(requests[1].starts_with("GET /api/coprs/build_status/102/ HTTP/1.1"));
    }

    #[tokio::test]
    async fn test_build_status_garbage_body() {
        let (base_url, _server) = serve_once("200 OK", "<html>maintenance</html>").await;

        let handle = BuildHandle::new(["101"]).unwrap();
        let err = client(&base_url).build_status(&handle).await.unwrap_err();
        assert!(matches!(err, ClientError::ParseError(_)));
    }

    #[tokio::test]
    async fn test_build_status_missing_status_field() {
        let (base_url, _server) = serve_once("200 OK", r#"{"output": "ok"}"#).await;

        let handle = BuildHandle::new(["101"]).unwrap();
        let err = client(&base_url).build_status(&handle).await.unwrap_err();
        assert!(matches!(err, ClientError::MissingStatus(id) if id == "101"));
    }
}
