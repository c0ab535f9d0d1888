//! Fakes for the outward-facing gateways: HTTP, web search, code runner.

use async_trait::async_trait;
use std::sync::Mutex;

use tether_engine::ports::{
    CodeRunOutcome, CodeRunner, HttpGateway, HttpOutcall, HttpResponseSummary, PortError,
    WebHit, WebSearcher,
};

/// HTTP gateway fake returning one canned response and recording outcalls.
#[derive(Debug)]
pub struct StubHttpGateway {
    response: Result<HttpResponseSummary, PortError>,
    last_outcall: Mutex<Option<HttpOutcall>>,
}

impl Default for StubHttpGateway {
    fn default() -> Self {
        Self {
            response: Ok(HttpResponseSummary {
                status: 200,
                body: String::new(),
            }),
            last_outcall: Mutex::new(None),
        }
    }
}

impl StubHttpGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_response(mut self, status: u16, body: impl Into<String>) -> Self {
        self.response = Ok(HttpResponseSummary {
            status,
            body: body.into(),
        });
        self
    }

    /// Make every send fail like a gateway timeout.
    pub fn with_timeout(mut self) -> Self {
        self.response = Err(PortError::unavailable("request timed out"));
        self
    }

    pub fn last_outcall(&self) -> Option<HttpOutcall> {
        self.last_outcall.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpGateway for StubHttpGateway {
    async fn send(&self, outcall: HttpOutcall) -> Result<HttpResponseSummary, PortError> {
        *self.last_outcall.lock().unwrap() = Some(outcall);
        self.response.clone()
    }
}

/// Web searcher fake with a fixed hit list.
#[derive(Debug, Default)]
pub struct StubWebSearcher {
    hits: Vec<WebHit>,
    last_max_results: Mutex<Option<usize>>,
}

impl StubWebSearcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_hit(
        mut self,
        title: impl Into<String>,
        url: impl Into<String>,
        snippet: impl Into<String>,
    ) -> Self {
        self.hits.push(WebHit {
            title: title.into(),
            url: url.into(),
            snippet: snippet.into(),
        });
        self
    }

    pub fn last_max_results(&self) -> Option<usize> {
        *self.last_max_results.lock().unwrap()
    }
}

#[async_trait]
impl WebSearcher for StubWebSearcher {
    async fn search(&self, _query: &str, max_results: usize) -> Result<Vec<WebHit>, PortError> {
        *self.last_max_results.lock().unwrap() = Some(max_results);
        Ok(self.hits.iter().take(max_results).cloned().collect())
    }
}

/// Code runner fake returning one canned outcome.
#[derive(Debug)]
pub struct StubCodeRunner {
    outcome: CodeRunOutcome,
    last_run: Mutex<Option<(String, String)>>,
}

impl Default for StubCodeRunner {
    fn default() -> Self {
        Self {
            outcome: CodeRunOutcome {
                stdout: String::new(),
                stderr: String::new(),
                exit_code: 0,
            },
            last_run: Mutex::new(None),
        }
    }
}

impl StubCodeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stdout(mut self, stdout: impl Into<String>) -> Self {
        self.outcome.stdout = stdout.into();
        self
    }

    pub fn with_stderr(mut self, stderr: impl Into<String>) -> Self {
        self.outcome.stderr = stderr.into();
        self
    }

    pub fn with_exit_code(mut self, exit_code: i32) -> Self {
        self.outcome.exit_code = exit_code;
        self
    }

    /// The `(language, source)` of the most recent run.
    pub fn last_run(&self) -> Option<(String, String)> {
        self.last_run.lock().unwrap().clone()
    }
}

#[async_trait]
impl CodeRunner for StubCodeRunner {
    async fn run(&self, language: &str, source: &str) -> Result<CodeRunOutcome, PortError> {
        *self.last_run.lock().unwrap() = Some((language.to_string(), source.to_string()));
        Ok(self.outcome.clone())
    }
}
