#![allow(dead_code)]

use std::net::{IpAddr, Ipv4Addr};

use color_eyre::Result;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tokio::sync::oneshot;
use tracing::info;
use user_directory::{config::Config, response::Envelope, user::RegisteredUser};

pub async fn start_server() -> u16 {
    start_server_with_config(Config {
        bind_address: IpAddr::V4(Ipv4Addr::LOCALHOST),
        ..Default::default()
    })
    .await
}

pub async fn start_server_with_config(config: Config) -> u16 {
    user_directory::logging::init(None)
        .await
        .expect("Logging to stdout should always initialize");

    let (port_tx, port_rx) = oneshot::channel();

    tokio::spawn(async move { user_directory::server::run_any_port(config, port_tx).await });
    port_rx
        .await
        .expect("Server should reply with allocated port")
}

/// Talks to one running server.
pub struct Client {
    http: reqwest::Client,
    base: String,
}

impl Client {
    pub fn new(port: u16) -> Self {
        info!("Client for server on port {port}");

        Self {
            http: reqwest::Client::new(),
            base: format!("http://127.0.0.1:{port}"),
        }
    }

    pub async fn start() -> Self {
        Self::new(start_server().await)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base)
    }

    pub async fn register(&self, name: &str, is_admin: bool) -> Result<(StatusCode, Envelope)> {
        self.register_raw(json!({ "name": name, "isAdmin": is_admin }))
            .await
    }

    pub async fn register_raw(&self, body: Value) -> Result<(StatusCode, Envelope)> {
        let response = self.http.post(self.url("/users")).json(&body).send().await?;

        read(response).await
    }

    /// Register, expecting success, and return the new user's id.
    pub async fn registered(&self, name: &str, is_admin: bool) -> Result<String> {
        let (status, envelope) = self.register(name, is_admin).await?;
        assert_eq!(status, StatusCode::CREATED);

        let registered: RegisteredUser = serde_json::from_value(envelope.data)?;
        assert_eq!(registered.name, name);

        Ok(registered.uuid.to_string())
    }

    pub async fn search(
        &self,
        user_id: &str,
        filter: Option<&str>,
    ) -> Result<(StatusCode, Envelope)> {
        let mut request = self.http.get(self.url(&format!("/users/search/{user_id}")));
        if let Some(filter) = filter {
            request = request.query(&[("filter", filter)]);
        }

        read(request.send().await?).await
    }

    pub async fn connect(&self, user_id: &str, other: &str) -> Result<(StatusCode, Envelope)> {
        let response = self
            .http
            .put(self.url(&format!("/users/connect/{user_id}")))
            .json(&json!({ "connectUserName": other }))
            .send()
            .await?;

        read(response).await
    }

    pub async fn list(&self, user_id: &str) -> Result<(StatusCode, Envelope)> {
        let response = self
            .http
            .get(self.url(&format!("/users/{user_id}")))
            .send()
            .await?;

        read(response).await
    }
}

pub async fn read(response: reqwest::Response) -> Result<(StatusCode, Envelope)> {
    let status = response.status();
    let envelope = response.json().await?;

    Ok((status, envelope))
}

pub fn data<T: DeserializeOwned>(envelope: Envelope) -> Result<T> {
    Ok(serde_json::from_value(envelope.data)?)
}
