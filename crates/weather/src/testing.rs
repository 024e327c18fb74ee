//! Test doubles shared by the unit tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use reqwest::Url;

use crate::endpoint::Endpoint;
use crate::fetch::Fetch;
use crate::{Error, Result};

pub(crate) fn endpoint() -> Endpoint {
    Endpoint::new("http://weather.test", "test-key").unwrap()
}

/// Compare a URL's decoded query pairs, in order.
pub(crate) fn assert_query(url: &Url, expected: &[(&str, &str)]) {
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    let pairs: Vec<(&str, &str)> = pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
    assert_eq!(pairs, expected);
}

#[derive(Default)]
struct FakeState {
    responses: VecDeque<Result<String>>,
    requests: Vec<Url>,
}

/// Records every requested URL and replays canned responses in order.
#[derive(Clone, Default)]
pub(crate) struct FakeFetcher {
    state: Arc<Mutex<FakeState>>,
}

impl FakeFetcher {
    pub fn respond(body: &str) -> Self {
        let fetcher = Self::default();
        fetcher.push(Ok(body.to_string()));
        fetcher
    }

    pub fn fail_with_status(status: u16) -> Self {
        let fetcher = Self::default();
        fetcher.push(Err(Error::UpstreamHttp {
            status,
            detail: "canned failure".to_string(),
        }));
        fetcher
    }

    pub fn push(&self, response: Result<String>) {
        self.state.lock().unwrap().responses.push_back(response);
    }

    pub fn requests(&self) -> Vec<Url> {
        self.state.lock().unwrap().requests.clone()
    }
}

impl Fetch for FakeFetcher {
    async fn get(&self, url: Url) -> Result<String> {
        let mut state = self.state.lock().unwrap();
        state.requests.push(url);
        state
            .responses
            .pop_front()
            .unwrap_or_else(|| Err(Error::Network("no canned response left".into())))
    }
}
