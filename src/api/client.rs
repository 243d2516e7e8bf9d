//! Paginated API client with bounded retry

use super::transport::{HttpReply, Transport};
use super::types::{Cursor, Page};
use crate::config::RetryPolicy;
use crate::error::{FeedError, Result};
use serde::de::DeserializeOwned;
use std::thread;
use std::time::Duration;

/// Records gathered by one pagination loop, plus the error that ended it early
#[derive(Debug)]
pub struct Paged<T> {
    pub items: Vec<T>,
    pub pages: usize,
    pub error: Option<FeedError>,
}

impl<T> Paged<T> {
    pub fn is_complete(&self) -> bool {
        self.error.is_none()
    }
}

pub struct ApiClient<T: Transport> {
    transport: T,
    retry: RetryPolicy,
}

impl<T: Transport> ApiClient<T> {
    pub fn new(transport: T, retry: RetryPolicy) -> Self {
        Self { transport, retry }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Fetch and decode one page, retrying transient failures.
    ///
    /// Rate limits, network errors and 5xx responses are retried up to
    /// `max_attempts` with exponential backoff. Anything else fails at once.
    pub fn get_page<R: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(String, String)],
        cursor: Option<&Cursor>,
    ) -> Result<Page<R>> {
        let mut params = query.to_vec();
        if let Some(cursor) = cursor {
            params.push(("cursor".to_string(), cursor.to_string()));
        }

        let max_attempts = self.retry.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;

            let err = match self.transport.get(path, &params).and_then(check_status) {
                Ok(reply) => return serde_json::from_str(&reply.body).map_err(FeedError::from),
                Err(e) => e,
            };

            if !err.is_transient() {
                return Err(err);
            }
            if attempt >= max_attempts {
                return Err(FeedError::RetriesExhausted {
                    attempts: attempt,
                    last: Box::new(err),
                });
            }

            let pause = self.retry.backoff(attempt);
            log::info!(
                "{} on /{} (attempt {}/{}), retrying in {:?}",
                err,
                path,
                attempt,
                max_attempts,
                pause
            );
            thread::sleep(pause);
        }
    }

    /// Follow `next_cursor` until the last page. A missing, empty or zero
    /// cursor ends the loop.
    ///
    /// A failed page stops the loop; whatever was collected before it is kept
    /// and the error is returned alongside.
    pub fn paginate<R: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(String, String)],
        delay: Duration,
    ) -> Paged<R> {
        let mut items = Vec::new();
        let mut pages = 0;
        let mut cursor: Option<Cursor> = None;

        loop {
            match self.get_page::<R>(path, query, cursor.as_ref()) {
                Ok(page) => {
                    pages += 1;
                    items.extend(page.data);
                    match page.meta.next_cursor.filter(|c| !c.is_terminal()) {
                        Some(next) => {
                            log::debug!("/{}: page {} done, next cursor {}", path, pages, next);
                            cursor = Some(next);
                            thread::sleep(delay);
                        }
                        None => {
                            return Paged {
                                items,
                                pages,
                                error: None,
                            }
                        }
                    }
                }
                Err(e) => {
                    return Paged {
                        items,
                        pages,
                        error: Some(e),
                    }
                }
            }
        }
    }
}

fn check_status(reply: HttpReply) -> Result<HttpReply> {
    match reply.status {
        200..=299 => Ok(reply),
        429 => Err(FeedError::RateLimited),
        status => Err(FeedError::Status {
            status,
            body: truncate_body(&reply.body),
        }),
    }
}

fn truncate_body(body: &str) -> String {
    const MAX_LEN: usize = 200;
    match body.char_indices().nth(MAX_LEN) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
