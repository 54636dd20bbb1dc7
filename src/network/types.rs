//! Request and response types for outgoing HTTP calls

use std::collections::HashMap;

/// HTTP method
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// An outgoing request
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub url: String,
    pub method: HttpMethod,
    pub headers: HashMap<String, String>,
    /// Query string parameters for GET, form fields for POST.
    /// Kept as pairs because Solr accepts repeated parameters.
    pub params: Vec<(String, String)>,
}

impl HttpRequest {
    /// Create a GET request
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: HttpMethod::Get,
            headers: HashMap::new(),
            params: Vec::new(),
        }
    }

    /// Create a form POST request
    pub fn post(url: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Post,
            ..Self::get(url)
        }
    }

    /// Add a header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Add a parameter
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    /// First value of a parameter
    pub fn get_param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// A received response
#[derive(Debug)]
pub struct HttpResponse {
    pub status: u16,
    pub text: String,
}

impl HttpResponse {
    /// Parse response as JSON
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_str(&self.text)
    }

    /// Check if response is successful (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builder() {
        let req = HttpRequest::post("http://localhost/select")
            .param("q", "dog")
            .param("fq", "a")
            .param("fq", "b")
            .header("Accept", "application/json");

        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.get_param("q"), Some("dog"));
        assert_eq!(req.get_param("fq"), Some("a"));
        assert_eq!(req.params.len(), 3);
        assert_eq!(req.headers.get("Accept").map(String::as_str), Some("application/json"));
    }

    #[test]
    fn test_response_status() {
        let response = HttpResponse {
            status: 503,
            text: String::new(),
        };
        assert!(!response.is_success());
    }
}
