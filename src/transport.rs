use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::future::Future;

use crate::error::{ConsoleError, Result};
use crate::notify::Notifier;
use crate::util::join_endpoint;

/// The uniform `{result, failed, error}` wrapper every endpoint answers with.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(default)]
    pub result: Value,
    pub failed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Envelope {
    pub fn ok(result: Value) -> Self {
        Self {
            result,
            failed: false,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            result: Value::Null,
            failed: true,
            error: Some(error.into()),
        }
    }

    /// `failed` is the only success signal; `result` is returned untouched otherwise.
    pub fn into_result(self, endpoint: &str) -> Result<Value> {
        if self.failed {
            return Err(ConsoleError::Api {
                endpoint: endpoint.to_string(),
                message: self.error.unwrap_or_else(|| "unknown error".into()),
            });
        }
        Ok(self.result)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// The remote authoritative config store, one GET per group and one POST per mutation.
pub trait RemoteStore: Send + Sync {
    fn get(&self, endpoint: &str) -> impl Future<Output = Result<Envelope>> + Send;

    fn post(&self, endpoint: &str, body: &Value) -> impl Future<Output = Result<Envelope>> + Send;
}

/// REST store reached over HTTP. The base URL is fixed at construction.
pub struct HttpStore {
    client: reqwest::Client,
    base_url: String,
}

impl HttpStore {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("rconsole/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl RemoteStore for HttpStore {
    async fn get(&self, endpoint: &str) -> Result<Envelope> {
        let response = self
            .client
            .get(join_endpoint(&self.base_url, endpoint))
            .send()
            .await?;
        read_envelope(endpoint, response).await
    }

    async fn post(&self, endpoint: &str, body: &Value) -> Result<Envelope> {
        let response = self
            .client
            .post(join_endpoint(&self.base_url, endpoint))
            .json(body)
            .send()
            .await?;
        read_envelope(endpoint, response).await
    }
}

async fn read_envelope(endpoint: &str, response: reqwest::Response) -> Result<Envelope> {
    let status = response.status();
    let text = response.text().await?;
    let parsed = serde_json::from_str::<Envelope>(&text);

    if !status.is_success() {
        // Error pages sometimes still carry an envelope with a useful message
        return Err(ConsoleError::Http {
            endpoint: endpoint.to_string(),
            status: status.as_u16(),
            message: parsed.ok().and_then(|e| e.error),
        });
    }

    parsed.map_err(|e| ConsoleError::Protocol {
        endpoint: endpoint.to_string(),
        detail: e.to_string(),
    })
}

/// Wraps a store: decodes envelopes, classifies failures and emits exactly one
/// notification per failed call. Successful calls are silent.
pub struct Transport<S, N> {
    store: S,
    notifier: N,
}

impl<S: RemoteStore, N: Notifier> Transport<S, N> {
    pub fn new(store: S, notifier: N) -> Self {
        Self { store, notifier }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub async fn request(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&Value>,
    ) -> Result<Value> {
        let outcome = self.exchange(method, endpoint, body).await;
        self.settle(endpoint, outcome)
    }

    /// GET `endpoint` and decode its `result` as `T`.
    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        let outcome = match self.exchange(Method::Get, endpoint, None).await {
            Ok(value) => decode(endpoint, value),
            Err(e) => Err(e),
        };
        self.settle(endpoint, outcome)
    }

    pub async fn post<B: Serialize + ?Sized>(&self, endpoint: &str, body: &B) -> Result<Value> {
        let outcome = match serde_json::to_value(body) {
            Ok(body) => self.exchange(Method::Post, endpoint, Some(&body)).await,
            Err(e) => Err(ConsoleError::Custom(format!(
                "Cannot encode {endpoint} body: {e}"
            ))),
        };
        self.settle(endpoint, outcome)
    }

    /// Surface a failure that was caught before reaching the network.
    pub fn report(&self, err: &ConsoleError) {
        self.notifier.notify(err.into());
    }

    async fn exchange(&self, method: Method, endpoint: &str, body: Option<&Value>) -> Result<Value> {
        log::debug!("{method:?} {endpoint}");
        let envelope = match method {
            Method::Get => self.store.get(endpoint).await?,
            Method::Post => {
                let empty = Value::Object(Default::default());
                self.store.post(endpoint, body.unwrap_or(&empty)).await?
            }
        };
        envelope.into_result(endpoint)
    }

    fn settle<T>(&self, endpoint: &str, outcome: Result<T>) -> Result<T> {
        if let Err(ref e) = outcome {
            log::warn!("{endpoint}: {e}");
            self.report(e);
        }
        outcome
    }
}

fn decode<T: DeserializeOwned>(endpoint: &str, value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(|e| ConsoleError::Protocol {
        endpoint: endpoint.to_string(),
        detail: e.to_string(),
    })
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::collections::{HashMap, VecDeque};
    use std::sync::Mutex;

    use crate::notify::RecordingNotifier;

    /// A canned backend answer.
    #[derive(Clone, Debug)]
    pub enum Reply {
        Envelope(Envelope),
        Status(u16),
        Malformed,
        /// Never answers, like a backend that stopped responding.
        Hang,
    }

    #[derive(Clone, Debug, PartialEq)]
    pub struct Call {
        pub method: Method,
        pub endpoint: String,
        pub body: Option<Value>,
    }

    /// In-memory store answering from per-endpoint queues. The last reply of a
    /// queue is sticky so repeated loads keep getting it, until a new reply is
    /// scripted for that endpoint.
    #[derive(Default)]
    pub struct ScriptedStore {
        replies: Mutex<HashMap<String, VecDeque<(Reply, bool)>>>,
        calls: Mutex<Vec<Call>>,
    }

    impl ScriptedStore {
        pub fn reply(&self, endpoint: &str, reply: Reply) -> &Self {
            let mut replies = self.replies.lock().unwrap();
            let queue = replies.entry(endpoint.to_string()).or_default();
            // A sticky reply that was already served gives way to the new one
            if queue.len() == 1 && queue[0].1 {
                queue.clear();
            }
            queue.push_back((reply, false));
            drop(replies);
            self
        }

        pub fn ok(&self, endpoint: &str, result: Value) -> &Self {
            self.reply(endpoint, Reply::Envelope(Envelope::ok(result)))
        }

        pub fn fail(&self, endpoint: &str, error: &str) -> &Self {
            self.reply(endpoint, Reply::Envelope(Envelope::failed(error)))
        }

        pub fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        pub fn calls_to(&self, endpoint: &str) -> Vec<Call> {
            self.calls()
                .into_iter()
                .filter(|c| c.endpoint == endpoint)
                .collect()
        }

        async fn answer(
            &self,
            method: Method,
            endpoint: &str,
            body: Option<&Value>,
        ) -> Result<Envelope> {
            self.calls.lock().unwrap().push(Call {
                method,
                endpoint: endpoint.to_string(),
                body: body.cloned(),
            });
            let reply = {
                let mut replies = self.replies.lock().unwrap();
                let queue = replies.get_mut(endpoint);
                match queue {
                    Some(q) if q.len() > 1 => q.pop_front().map(|(r, _)| r),
                    Some(q) => q.front_mut().map(|(r, served)| {
                        *served = true;
                        r.clone()
                    }),
                    None => None,
                }
            };
            match reply {
                Some(Reply::Envelope(envelope)) => Ok(envelope),
                Some(Reply::Status(status)) => Err(ConsoleError::Http {
                    endpoint: endpoint.to_string(),
                    status,
                    message: None,
                }),
                Some(Reply::Malformed) => Err(ConsoleError::Protocol {
                    endpoint: endpoint.to_string(),
                    detail: "expected value at line 1 column 1".into(),
                }),
                Some(Reply::Hang) => std::future::pending().await,
                None => Err(ConsoleError::Custom(format!("no reply scripted for {endpoint}"))),
            }
        }
    }

    impl RemoteStore for ScriptedStore {
        async fn get(&self, endpoint: &str) -> Result<Envelope> {
            self.answer(Method::Get, endpoint, None).await
        }

        async fn post(&self, endpoint: &str, body: &Value) -> Result<Envelope> {
            self.answer(Method::Post, endpoint, Some(body)).await
        }
    }

    pub type TestApi = Transport<ScriptedStore, RecordingNotifier>;

    pub fn api() -> TestApi {
        Transport::new(ScriptedStore::default(), RecordingNotifier::default())
    }
}
