use crate::backend::config::BackendConfig;
use reqwest::Client;
use std::time::{Duration, Instant};
use term_core::exec::{CommandExecutor, ExecError, ExecOutcome, ExecRequest, ExecResponse};
use tracing::{debug, info, warn};

/// Sends commands to the execution service as `POST {"command": ...}`.
#[derive(Clone)]
pub struct HttpExecutor {
    http: Client,
    cfg: BackendConfig,
}

impl HttpExecutor {
    pub fn new(cfg: BackendConfig) -> anyhow::Result<Self> {
        // No request timeout: the service bounds its own latency.
        let mut builder = Client::builder()
            .use_rustls_tls()
            .no_proxy()
            .pool_idle_timeout(Duration::from_secs(30))
            .pool_max_idle_per_host(2);
        match cfg.proxy.as_deref() {
            Some(_) if cfg.is_loopback() => {
                debug!(target: "providers::backend", "loopback endpoint, proxy not used");
            }
            Some(p) => {
                let proxy = reqwest::Proxy::all(p)?.no_proxy(reqwest::NoProxy::from_env());
                builder = builder.proxy(proxy);
            }
            None => {}
        }
        let http = builder.build()?;
        Ok(Self { http, cfg })
    }

    pub fn endpoint(&self) -> &str {
        &self.cfg.endpoint
    }
}

impl CommandExecutor for HttpExecutor {
    async fn execute(&self, command: &str) -> Result<ExecOutcome, ExecError> {
        let started = Instant::now();
        debug!(target: "providers::backend", "POST {} command_len={}", self.cfg.endpoint, command.len());
        let resp = self
            .http
            .post(&self.cfg.endpoint)
            .json(&ExecRequest { command })
            .send()
            .await
            .map_err(map_reqwest_err)?;
        let status = resp.status();
        let body = resp.bytes().await.map_err(map_reqwest_err)?;
        // Non-2xx replies still carry a usable {"error": ...} body.
        let parsed: ExecResponse = serde_json::from_slice(&body)
            .map_err(|e| ExecError::Decode(format!("status={} {}", status.as_u16(), e)))?;
        if !status.is_success() {
            warn!(target: "providers::backend", "service replied status={}", status);
        }
        info!(
            target: "providers::backend",
            "execute done status={} elapsed_ms={} error={}",
            status.as_u16(),
            started.elapsed().as_millis(),
            parsed.error.is_some()
        );
        Ok(parsed.into())
    }
}

fn map_reqwest_err(e: reqwest::Error) -> ExecError {
    if e.is_request() || e.is_connect() || e.is_timeout() {
        ExecError::Network(e.to_string())
    } else if e.is_decode() || e.is_body() {
        ExecError::Decode(e.to_string())
    } else {
        ExecError::Other(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn executor_for(server: &MockServer) -> HttpExecutor {
        let cfg = BackendConfig::for_endpoint(&format!("{}/api/execute", server.uri())).unwrap();
        HttpExecutor::new(cfg).unwrap()
    }

    #[tokio::test]
    async fn posts_command_and_returns_output() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/execute"))
            .and(header("content-type", "application/json"))
            .and(body_json(json!({ "command": "echo hello" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "output": "hello" })))
            .expect(1)
            .mount(&server)
            .await;

        let exec = executor_for(&server);
        let out = exec.execute("echo hello").await.unwrap();
        assert_eq!(out, ExecOutcome::Output("hello".into()));
    }

    #[tokio::test]
    async fn error_body_becomes_error_outcome() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "error": "not found" })),
            )
            .mount(&server)
            .await;

        let exec = executor_for(&server);
        let out = exec.execute("cat missing").await.unwrap();
        assert_eq!(out, ExecOutcome::Error("not found".into()));
    }

    #[tokio::test]
    async fn non_success_status_with_json_body_is_rendered_from_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(400).set_body_json(json!({ "error": "No command provided" })),
            )
            .mount(&server)
            .await;

        let exec = executor_for(&server);
        let out = exec.execute("x").await.unwrap();
        assert_eq!(out, ExecOutcome::Error("No command provided".into()));
    }

    #[tokio::test]
    async fn malformed_body_is_a_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let exec = executor_for(&server);
        let err = exec.execute("ls").await.unwrap_err();
        assert!(matches!(err, ExecError::Decode(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn proxy_from_env_is_bypassed_for_local_service() {
        let dead_proxy = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            format!("http://127.0.0.1:{}", listener.local_addr().unwrap().port())
        };
        let config_home = tempfile::tempdir().unwrap();
        std::env::set_var("XDG_CONFIG_HOME", config_home.path());
        std::env::set_var("HTTPS_PROXY", &dead_proxy);
        std::env::set_var("HTTP_PROXY", &dead_proxy);
        std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
        let mut cfg = BackendConfig::from_env_and_file();
        for var in ["HTTPS_PROXY", "HTTP_PROXY", "NO_PROXY", "XDG_CONFIG_HOME"] {
            std::env::remove_var(var);
        }
        assert_eq!(cfg.proxy.as_deref(), Some(dead_proxy.as_str()));

        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/execute"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "output": "hi" })))
            .expect(1)
            .mount(&server)
            .await;
        cfg.endpoint = format!("{}/api/execute", server.uri());

        let exec = HttpExecutor::new(cfg).unwrap();
        let out = exec.execute("echo hi").await.unwrap();
        assert_eq!(out, ExecOutcome::Output("hi".into()));
    }

    #[tokio::test]
    async fn unreachable_service_is_a_network_error() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let cfg = BackendConfig::for_endpoint(&format!("http://127.0.0.1:{port}/api/execute"))
            .unwrap();
        let exec = HttpExecutor::new(cfg).unwrap();
        let err = exec.execute("ls").await.unwrap_err();
        assert!(matches!(err, ExecError::Network(_)), "got {err:?}");
    }
}
