//! Internal HTTP listener the CI pipeline calls to drive the deployment
//! status message. Every endpoint answers immediately; the Discord work runs
//! on detached tasks so the caller's short timeout budget is always met.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::routing::post;
use axum::Json;
use axum::Router;
use serde::Deserialize;
use serde_json::json;
use serde_json::Value;

use super::DeployMonitor;
use super::STAGES;

/// Fixed listener address, all interfaces.
const LISTEN_ADDR: &str = "0.0.0.0:3030";

/// Accepted request body; the pipeline sends either key.
#[derive(Debug, Default, Deserialize)]
struct DeployRequest {
    commit: Option<String>,
    sha: Option<String>,
    error: Option<String>,
    message: Option<String>,
}

impl DeployRequest {
    fn commit(&self) -> String {
        self.commit
            .clone()
            .or_else(|| self.sha.clone())
            .unwrap_or_else(|| "unknown".to_string())
    }

    fn error_text(&self) -> Option<String> {
        self.error.clone().or_else(|| self.message.clone())
    }
}

/// Runs the listener until the process exits.
pub async fn serve(monitor: Arc<DeployMonitor>) {
    let app = Router::new()
        .route("/deploy", post(start_deploy))
        .route("/deploy/success", post(deploy_success))
        .route("/deploy/fail", post(deploy_fail))
        .route("/health", get(health))
        .with_state(monitor);

    let listener = match tokio::net::TcpListener::bind(LISTEN_ADDR).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("Deployment listener could not bind {LISTEN_ADDR}: {err}");
            return;
        }
    };

    tracing::info!("Deployment listener active on http://{LISTEN_ADDR}");
    if let Err(err) = axum::serve(listener, app).await {
        tracing::error!("Deployment listener error: {err}");
    }
}

/// `POST /deploy` — acknowledge, then start the session and fire the canned
/// stage sequence on fixed delays. The stage timers carry the session
/// generation so a deployment starting mid-sequence invalidates them.
async fn start_deploy(
    State(monitor): State<Arc<DeployMonitor>>,
    Json(body): Json<DeployRequest>,
) -> Json<Value> {
    let commit = body.commit();
    tracing::info!("Received /deploy request for commit: {commit}");

    tokio::spawn(async move {
        let generation = monitor.start(&commit).await;
        for stage in STAGES {
            tokio::time::sleep(stage.delay).await;
            monitor
                .advance_stage(generation, stage.title, stage.color, None)
                .await;
        }
    });

    Json(json!({ "status": "ok", "message": "Deployment started" }))
}

/// `POST /deploy/success`
async fn deploy_success(State(monitor): State<Arc<DeployMonitor>>) -> Json<Value> {
    tracing::info!("Received /deploy/success request");

    tokio::spawn(async move {
        monitor.succeed().await;
    });

    Json(json!({ "status": "ok", "message": "Deployment success recorded" }))
}

/// `POST /deploy/fail`
async fn deploy_fail(
    State(monitor): State<Arc<DeployMonitor>>,
    Json(body): Json<DeployRequest>,
) -> Json<Value> {
    let commit = body.commit();
    let error_text = body.error_text();
    tracing::info!("Received /deploy/fail request for commit: {commit}");

    tokio::spawn(async move {
        monitor.fail(&commit, error_text.as_deref()).await;
    });

    Json(json!({ "status": "ok", "message": "Deployment failure recorded" }))
}

/// `GET /health`
async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "service": "deployment-monitor" }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commit_falls_back_from_commit_to_sha_to_unknown() {
        let body: DeployRequest = serde_json::from_str(r#"{"commit":"abc123"}"#).unwrap();
        assert_eq!(body.commit(), "abc123");

        let body: DeployRequest = serde_json::from_str(r#"{"sha":"def456"}"#).unwrap();
        assert_eq!(body.commit(), "def456");

        let body: DeployRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(body.commit(), "unknown");
    }

    #[test]
    fn error_text_accepts_either_key() {
        let body: DeployRequest =
            serde_json::from_str(r#"{"error":"npm install failed"}"#).unwrap();
        assert_eq!(body.error_text().as_deref(), Some("npm install failed"));

        let body: DeployRequest =
            serde_json::from_str(r#"{"message":"pm2 reload failed"}"#).unwrap();
        assert_eq!(body.error_text().as_deref(), Some("pm2 reload failed"));
    }
}
