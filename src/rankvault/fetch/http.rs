use crate::error::{Result, VaultError};

/// Fetches a page body. Any transport error or non-success status is an error.
pub trait HttpClient: Send {
    fn get(&self, url: &str) -> Result<String>;
}

/// Plain unauthenticated GETs over reqwest's blocking client.
pub struct ReqwestClient {
    client: reqwest::blocking::Client,
}

impl ReqwestClient {
    pub fn new(user_agent: Option<&str>) -> Result<Self> {
        let mut builder = reqwest::blocking::Client::builder();
        if let Some(ua) = user_agent {
            builder = builder.user_agent(ua);
        }
        let client = builder
            .build()
            .map_err(|e| VaultError::Network(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

impl HttpClient for ReqwestClient {
    fn get(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| VaultError::Network(e.to_string()))?;
        response
            .text()
            .map_err(|e| VaultError::Network(format!("Failed to read body from {}: {}", url, e)))
    }
}

#[cfg(any(test, feature = "test_utils"))]
pub mod testing {
    use super::*;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Clone)]
    pub enum Reply {
        Body(String),
        Status(u16),
        Unreachable,
    }

    /// Answers from a fixed table and records every requested URL.
    /// URLs missing from the table answer 404.
    #[derive(Clone, Default)]
    pub struct ScriptedClient {
        replies: HashMap<String, Reply>,
        requests: Arc<Mutex<Vec<String>>>,
    }

    impl ScriptedClient {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn reply(mut self, url: &str, reply: Reply) -> Self {
            self.replies.insert(url.to_string(), reply);
            self
        }

        /// Shared log of requested URLs, in request order.
        pub fn requests(&self) -> Arc<Mutex<Vec<String>>> {
            Arc::clone(&self.requests)
        }
    }

    impl HttpClient for ScriptedClient {
        fn get(&self, url: &str) -> Result<String> {
            if let Ok(mut log) = self.requests.lock() {
                log.push(url.to_string());
            }
            match self.replies.get(url) {
                Some(Reply::Body(body)) => Ok(body.clone()),
                Some(Reply::Status(code)) => {
                    Err(VaultError::Network(format!("HTTP status {} for {}", code, url)))
                }
                Some(Reply::Unreachable) => {
                    Err(VaultError::Network(format!("connection refused: {}", url)))
                }
                None => Err(VaultError::Network(format!("HTTP status 404 for {}", url))),
            }
        }
    }
}
