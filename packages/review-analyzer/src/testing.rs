//! Testing utilities: scripted mock collaborators.
//!
//! Useful for exercising the pipeline without network or LLM calls.
//! Both mocks replay responses in insertion order and record their
//! calls for interaction assertions.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use crate::resolver::CanonicalId;
use crate::source::{ReviewPage, ReviewSource, SourceError};
use crate::summarizer::{GenerateError, TextGenerator};

/// One recorded page request against [`MockReviewSource`].
#[derive(Debug, Clone)]
pub struct RecordedPageRequest {
    pub professor_id: String,
    pub course_filter: Option<String>,
    pub page_size: u32,
    pub cursor: Option<String>,
}

/// Scripted [`ReviewSource`]: returns queued page results in order.
///
/// Running past the script yields a schema error, which makes a test
/// that over-fetches fail loudly instead of looping.
#[derive(Default)]
pub struct MockReviewSource {
    pages: Mutex<VecDeque<Result<ReviewPage, SourceError>>>,
    calls: Arc<Mutex<Vec<RecordedPageRequest>>>,
}

impl MockReviewSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the next page result.
    pub fn with_page(self, page: Result<ReviewPage, SourceError>) -> Self {
        self.pages.lock().unwrap().push_back(page);
        self
    }

    /// Handle to the recorded requests, usable after the source has
    /// been moved into the fetcher.
    pub fn calls(&self) -> Arc<Mutex<Vec<RecordedPageRequest>>> {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl ReviewSource for MockReviewSource {
    async fn fetch_page(
        &self,
        professor_id: &CanonicalId,
        course_filter: Option<&str>,
        page_size: u32,
        cursor: Option<&str>,
    ) -> Result<ReviewPage, SourceError> {
        self.calls.lock().unwrap().push(RecordedPageRequest {
            professor_id: professor_id.as_str().to_string(),
            course_filter: course_filter.map(String::from),
            page_size,
            cursor: cursor.map(String::from),
        });

        self.pages
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(SourceError::Schema("no scripted page left".into())))
    }
}

/// Scripted [`TextGenerator`]: returns queued results in order, then
/// a fixed placeholder once the script is exhausted.
#[derive(Default)]
pub struct MockGenerator {
    responses: Mutex<VecDeque<Result<String, GenerateError>>>,
    calls: Arc<AtomicU32>,
}

impl MockGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the next generation result.
    pub fn with_response(self, response: Result<String, GenerateError>) -> Self {
        self.responses.lock().unwrap().push_back(response);
        self
    }

    /// Handle to the call counter, usable after the generator has been
    /// moved into the summarizer.
    pub fn call_count(&self) -> Arc<AtomicU32> {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl TextGenerator for MockGenerator {
    async fn generate(&self, _prompt: &str, _max_tokens: u32) -> Result<String, GenerateError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok("Mock summary.".to_string()))
    }
}
