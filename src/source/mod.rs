mod http;
mod influx;

pub use self::http::fetch_json;
pub use self::influx::{query, InfluxQuery};

use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder};

/// Where and how to connect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub schema: String,
    pub hostname: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub ignore_ssl_errors: bool,
    pub timeout: Duration,
}

impl Endpoint {
    pub fn url(&self, path: &str) -> String {
        format!("{}://{}:{}{}", self.schema, self.hostname, self.port, path)
    }

    fn client(&self) -> reqwest::Result<Client> {
        Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .danger_accept_invalid_certs(self.ignore_ssl_errors)
            .timeout(self.timeout)
            .build()
    }

    fn authenticate(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.username {
            Some(username) => request.basic_auth(username, self.password.as_deref()),
            None => request,
        }
    }
}
