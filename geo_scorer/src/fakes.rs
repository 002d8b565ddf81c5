//! In-memory fakes for the two network seams (testing only).
//!
//! `FakeFetcher` serves canned HTML and `FakeGateway` replays scripted model
//! replies, so the pipeline can run without touching the network.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use url::Url;

use crate::ai::ModelGateway;
use crate::error::{GeoError, GeoResult};
use crate::prompt::Prompt;
use crate::scraper::PageFetcher;

// ---------------------------------------------------------------------------
// FakeFetcher
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct FakeFetcher {
    response: GeoResult<String>,
    calls: AtomicUsize,
    last_url: Mutex<Option<Url>>,
}

impl FakeFetcher {
    pub fn html(body: impl Into<String>) -> Self {
        Self::with_response(Ok(body.into()))
    }

    pub fn failing(err: GeoError) -> Self {
        Self::with_response(Err(err))
    }

    fn with_response(response: GeoResult<String>) -> Self {
        Self {
            response,
            calls: AtomicUsize::new(0),
            last_url: Mutex::new(None),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_url(&self) -> Option<Url> {
        self.last_url.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageFetcher for FakeFetcher {
    async fn fetch(&self, url: &Url) -> GeoResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_url.lock().unwrap() = Some(url.clone());
        self.response.clone()
    }
}

// ---------------------------------------------------------------------------
// FakeGateway
// ---------------------------------------------------------------------------

/// Replays replies in order; once the script runs out the last reply repeats.
#[derive(Debug)]
pub struct FakeGateway {
    script: Mutex<VecDeque<GeoResult<String>>>,
    last: Mutex<Option<GeoResult<String>>>,
    prompts: Mutex<Vec<Prompt>>,
}

impl FakeGateway {
    pub fn scripted(replies: Vec<GeoResult<String>>) -> Self {
        Self {
            script: Mutex::new(replies.into()),
            last: Mutex::new(None),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn reply(raw: impl Into<String>) -> Self {
        Self::scripted(vec![Ok(raw.into())])
    }

    pub fn failing(err: GeoError) -> Self {
        Self::scripted(vec![Err(err)])
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub fn prompts(&self) -> Vec<Prompt> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ModelGateway for FakeGateway {
    async fn complete(&self, prompt: &Prompt) -> GeoResult<String> {
        self.prompts.lock().unwrap().push(prompt.clone());

        let mut last = self.last.lock().unwrap();
        if let Some(next) = self.script.lock().unwrap().pop_front() {
            *last = Some(next);
        }
        last.clone()
            .unwrap_or_else(|| Err(GeoError::Internal("FakeGateway has no scripted reply".to_string())))
    }
}
