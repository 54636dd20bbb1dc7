//! Application state shared across handlers

use crate::config::Settings;
use crate::description::{check_paging_contract, OpenSearchDescription};
use crate::feed::Translator;
use crate::metrics::Metrics;
use crate::network::HttpClient;
use crate::render::Templates;
use crate::results::SearchResult;
use crate::solr::{QueryExecutor, SolrExecutor};
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Global settings
    pub settings: Arc<Settings>,
    /// Query executor in front of the search engine
    pub executor: Arc<dyn QueryExecutor>,
    /// Result translator
    pub translator: Arc<Translator>,
    /// Template renderer
    pub templates: Arc<Templates>,
    /// Rendered description document
    pub description_xml: Arc<String>,
    pub metrics: Arc<Metrics>,
}

impl AppState {
    /// Create state backed by the configured Solr core
    pub fn new(settings: Settings, client: HttpClient) -> anyhow::Result<Self> {
        let executor =
            SolrExecutor::new(client, &settings.solr, settings.mapping.fields.clone())?;
        Self::with_executor(settings, Arc::new(executor))
    }

    /// Create state around any query executor
    pub fn with_executor(
        settings: Settings,
        executor: Arc<dyn QueryExecutor>,
    ) -> anyhow::Result<Self> {
        let translator = Translator::new(settings.translator_config());
        let templates = Templates::new()?;
        let description = OpenSearchDescription::from_settings(&settings);

        // The first page of any feed must start where the description says
        let first_page = translator.translate(&SearchResult::new("", 0, 1))?;
        check_paging_contract(&description, first_page.start_index)?;

        let description_xml = templates.render_description(&description)?;

        Ok(Self {
            settings: Arc::new(settings),
            executor,
            translator: Arc::new(translator),
            templates: Arc::new(templates),
            description_xml: Arc::new(description_xml),
            metrics: Arc::new(Metrics::new()),
        })
    }
}
