//! XML rendering with Tera

use crate::description::OpenSearchDescription;
use crate::error::Result;
use crate::feed::sanitize::escape_xml;
use crate::feed::FeedDocument;
use serde::Serialize;
use tera::{Context, Tera};

const FEED_TEMPLATE: &str = "feed.xml";
const DESCRIPTION_TEMPLATE: &str = "description.xml";

/// Template renderer for feed and description documents
pub struct Templates {
    tera: Tera,
}

impl Templates {
    /// Create a new renderer with embedded templates
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        tera.add_raw_template(FEED_TEMPLATE, include_str!("../templates/feed.xml"))?;
        tera.add_raw_template(
            DESCRIPTION_TEMPLATE,
            include_str!("../templates/description.xml"),
        )?;

        // Only the five XML specials get escaped
        tera.autoescape_on(vec![".xml"]);
        tera.set_escape_fn(escape_xml);

        Ok(Self { tera })
    }

    /// Render a feed document as an Atom feed
    pub fn render_feed(&self, feed: &FeedDocument) -> Result<String> {
        self.render(FEED_TEMPLATE, feed)
    }

    /// Render the OpenSearch description document
    pub fn render_description(&self, description: &OpenSearchDescription) -> Result<String> {
        self.render(DESCRIPTION_TEMPLATE, description)
    }

    fn render(&self, template: &str, value: &impl Serialize) -> Result<String> {
        let ctx = Context::from_serialize(value)?;
        Ok(self.tera.render(template, &ctx)?)
    }
}
