//! Scripted transport for unit tests

use super::transport::{HttpReply, Transport};
use crate::error::Result;
use std::cell::RefCell;

type Handler = Box<dyn FnMut(&str, &[(String, String)]) -> Result<HttpReply>>;

pub struct MockTransport {
    handler: RefCell<Handler>,
    calls: RefCell<Vec<(String, Vec<(String, String)>)>>,
}

impl MockTransport {
    pub fn new<F>(handler: F) -> Self
    where
        F: FnMut(&str, &[(String, String)]) -> Result<HttpReply> + 'static,
    {
        Self {
            handler: RefCell::new(Box::new(handler)),
            calls: RefCell::new(Vec::new()),
        }
    }

    /// Every request seen so far, as (path, query)
    pub fn calls(&self) -> Vec<(String, Vec<(String, String)>)> {
        self.calls.borrow().clone()
    }

    pub fn param(query: &[(String, String)], key: &str) -> Option<String> {
        query.iter().find(|(k, _)| k == key).map(|(_, v)| v.clone())
    }

    pub fn params(query: &[(String, String)], key: &str) -> Vec<String> {
        query
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
            .collect()
    }
}

impl Transport for MockTransport {
    fn get(&self, path: &str, query: &[(String, String)]) -> Result<HttpReply> {
        self.calls.borrow_mut().push((path.to_string(), query.to_vec()));
        let mut handler = self.handler.borrow_mut();
        (*handler)(path, query)
    }
}
