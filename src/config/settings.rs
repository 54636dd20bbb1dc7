//! Settings structures for the Solr OpenSearch bridge

use crate::feed::{RequiredFieldMode, TranslatorConfig};
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use url::Url;

/// Main settings structure matching settings.yml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub server: ServerSettings,
    pub outgoing: OutgoingSettings,
    pub solr: SolrSettings,
    pub mapping: MappingSettings,
    pub opensearch: OpenSearchSettings,
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse settings from YAML text
    pub fn from_yaml(content: &str) -> Result<Self> {
        let settings: Settings = serde_yaml::from_str(content)?;
        Ok(settings)
    }

    /// Merge with environment variables (SOLR_OPENSEARCH_* prefix)
    pub fn merge_env(&mut self) {
        if let Ok(val) = std::env::var("SOLR_OPENSEARCH_DEBUG") {
            self.general.debug = val.parse().unwrap_or(false);
        }
        if let Ok(val) = std::env::var("SOLR_OPENSEARCH_PORT") {
            if let Ok(port) = val.parse() {
                self.server.port = port;
            }
        }
        if let Ok(val) = std::env::var("SOLR_OPENSEARCH_BIND_ADDRESS") {
            self.server.bind_address = val;
        }
        if let Ok(val) = std::env::var("SOLR_OPENSEARCH_BASE_URL") {
            self.server.base_url = Some(val);
        }
        if let Ok(val) = std::env::var("SOLR_OPENSEARCH_SOLR_URL") {
            self.solr.base_url = val;
        }
        if let Ok(val) = std::env::var("SOLR_OPENSEARCH_SOLR_CORE") {
            self.solr.core = val;
        }
        if let Ok(val) = std::env::var("SOLR_OPENSEARCH_MODE") {
            if let Ok(mode) = val.parse() {
                self.mapping.mode = mode;
            }
        }
        if let Ok(val) = std::env::var("SOLR_OPENSEARCH_FLATTEN_DELIMITER") {
            self.mapping.flatten_delimiter = val;
        }
    }

    /// Reject settings that cannot produce a working endpoint
    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.solr.base_url)
            .map_err(|e| anyhow::anyhow!("invalid solr.base_url '{}': {}", self.solr.base_url, e))?;
        if let Some(ref base) = self.server.base_url {
            Url::parse(base)
                .map_err(|e| anyhow::anyhow!("invalid server.base_url '{}': {}", base, e))?;
        }
        if self.solr.core.trim().is_empty() || self.solr.core.contains('/') {
            bail!("solr.core must be a plain core or collection name");
        }
        if let Some(key) = self
            .solr
            .extra_params
            .keys()
            .find(|k| RESERVED_SOLR_PARAMS.contains(&k.as_str()))
        {
            bail!("solr.extra_params must not set '{}'", key);
        }
        if self.mapping.record_type.trim().is_empty() {
            bail!("mapping.record_type must not be empty");
        }
        if self.outgoing.request_timeout <= 0.0 {
            bail!("outgoing.request_timeout must be positive");
        }
        let os = &self.opensearch;
        if os.default_count == 0 || os.max_count == 0 {
            bail!("opensearch.default_count and opensearch.max_count must be positive");
        }
        if os.default_count > os.max_count {
            bail!(
                "opensearch.default_count ({}) exceeds opensearch.max_count ({})",
                os.default_count,
                os.max_count
            );
        }
        Ok(())
    }

    /// Public base URL used in the description's query template
    pub fn public_url(&self) -> String {
        match self.server.base_url {
            Some(ref url) => url.trim_end_matches('/').to_string(),
            None => format!("http://{}:{}", self.server.bind_address, self.server.port),
        }
    }

    /// Translator profile derived from the mapping section
    pub fn translator_config(&self) -> TranslatorConfig {
        TranslatorConfig {
            feed_title: self.general.instance_name.clone(),
            record_type: self.mapping.record_type.clone(),
            flatten_delimiter: self.mapping.flatten_delimiter.clone(),
            mode: self.mapping.mode,
        }
    }
}

/// General settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Enable debug logging
    pub debug: bool,
    /// Name used as the feed title
    pub instance_name: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            debug: false,
            instance_name: "Solr Search Results".to_string(),
        }
    }
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub port: u16,
    pub bind_address: String,
    /// Externally visible URL of this service
    pub base_url: Option<String>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            port: 8080,
            bind_address: "127.0.0.1".to_string(),
            base_url: None,
        }
    }
}

/// Outgoing request settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutgoingSettings {
    /// Request timeout in seconds
    pub request_timeout: f64,
    /// Pool max size
    pub pool_maxsize: usize,
    /// Verify SSL certificates
    pub verify_ssl: bool,
    pub proxies: ProxySettings,
    /// Extra headers sent with every request, e.g. Authorization
    pub extra_headers: HashMap<String, String>,
}

impl Default for OutgoingSettings {
    fn default() -> Self {
        Self {
            request_timeout: 5.0,
            pool_maxsize: 20,
            verify_ssl: true,
            proxies: ProxySettings::default(),
            extra_headers: HashMap::new(),
        }
    }
}

/// Proxy settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxySettings {
    pub http: Option<String>,
    pub https: Option<String>,
    pub all: Option<String>,
}

/// HTTP method used for the select handler
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SolrMethod {
    #[default]
    Get,
    /// Form-encoded POST, for queries too long for a URL
    Post,
}

/// Select parameters that paging and parsing depend on
pub const RESERVED_SOLR_PARAMS: &[&str] = &["q", "start", "rows", "wt"];

/// Solr connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SolrSettings {
    /// Solr root, e.g. http://localhost:8983/solr
    pub base_url: String,
    /// Core or collection name
    pub core: String,
    pub method: SolrMethod,
    /// Fields searched by edismax; empty means every mapped text field
    pub query_fields: Vec<String>,
    /// Additional select parameters
    pub extra_params: HashMap<String, String>,
}

impl Default for SolrSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8983/solr".to_string(),
            core: "emails".to_string(),
            method: SolrMethod::Get,
            query_fields: Vec::new(),
            extra_params: HashMap::new(),
        }
    }
}

/// Solr field names for each record field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldMap {
    pub id: String,
    pub subject: String,
    pub body: String,
    pub sender: String,
    pub date: String,
    pub receivers: String,
    pub tags: String,
}

impl Default for FieldMap {
    fn default() -> Self {
        Self {
            id: "id".to_string(),
            subject: "subject".to_string(),
            body: "body".to_string(),
            sender: "sender".to_string(),
            date: "date".to_string(),
            receivers: "receivers".to_string(),
            tags: "tags".to_string(),
        }
    }
}

impl FieldMap {
    /// All mapped Solr field names, for the `fl` parameter
    pub fn stored_fields(&self) -> Vec<&str> {
        vec![
            self.id.as_str(),
            self.subject.as_str(),
            self.body.as_str(),
            self.sender.as_str(),
            self.date.as_str(),
            self.receivers.as_str(),
            self.tags.as_str(),
        ]
    }

    /// Text fields searched when no query fields are configured
    pub fn text_fields(&self) -> Vec<&str> {
        vec![
            self.subject.as_str(),
            self.body.as_str(),
            self.sender.as_str(),
            self.receivers.as_str(),
            self.tags.as_str(),
        ]
    }
}

/// Field mapping profile
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MappingSettings {
    /// Record type emitted on every entry
    pub record_type: String,
    pub fields: FieldMap,
    /// Separator for multi-valued fields; empty concatenates
    pub flatten_delimiter: String,
    pub mode: RequiredFieldMode,
}

impl Default for MappingSettings {
    fn default() -> Self {
        Self {
            record_type: "Email".to_string(),
            fields: FieldMap::default(),
            flatten_delimiter: String::new(),
            mode: RequiredFieldMode::Strict,
        }
    }
}

/// Description document and paging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenSearchSettings {
    pub short_name: String,
    pub description: String,
    pub contact: Option<String>,
    pub record_label: String,
    pub record_label_plural: String,
    /// Extension field names advertised as sortable
    pub sortable_fields: Vec<String>,
    /// Declared result ceiling
    pub max_results: u64,
    /// Page size when the consumer sends none
    pub default_count: u64,
    /// Largest page size passed to Solr
    pub max_count: u64,
}

impl Default for OpenSearchSettings {
    fn default() -> Self {
        Self {
            short_name: "Solr".to_string(),
            description: "Search Solr records from Salesforce Federated Search".to_string(),
            contact: None,
            record_label: "Email".to_string(),
            record_label_plural: "Emails".to_string(),
            sortable_fields: vec!["sender".to_string(), "emaildate".to_string()],
            max_results: 2000,
            default_count: 10,
            max_count: 100,
        }
    }
}
