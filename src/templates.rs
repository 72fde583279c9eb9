use std::path::Path;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use serde::ser::Serialize;
use tera::{Context as TeraContext, Tera};

use crate::config::SiteSection;

#[derive(Clone, Debug)]
pub struct Templates {
    tera: Arc<Tera>,
    ctx: TeraContext,
}

impl Templates {
    pub fn new(tera: Arc<Tera>, base_ctx: TeraContext) -> Self {
        Self { tera, ctx: base_ctx }
    }

    /// Loads every `templates/**/*.html` under `template_dir`.
    pub fn from_dir(template_dir: &Path, site: &SiteSection) -> Result<Self> {
        let template_pattern = template_dir.join("templates/**/*.html");
        let tera = Tera::new(
            template_pattern
                .to_str()
                .ok_or(anyhow!("missing templates directory"))?,
        )
        .context("loading templates")?;
        Ok(Self::new(Arc::new(tera), Self::base_context(site)))
    }

    pub fn base_context(site: &SiteSection) -> TeraContext {
        let mut base_ctx = TeraContext::new();
        base_ctx.insert("PORTFOLIO_RS_VERSION", env!("CARGO_PKG_VERSION"));
        base_ctx.insert("DEFAULT_LANG", "en-US");
        base_ctx.insert("SITENAME", &site.site_name);
        base_ctx.insert("MENUITEMS", &site.menu_items);
        base_ctx.insert("SOCIAL", &site.socials);
        base_ctx
    }

    pub fn add_context<T: Serialize + ?Sized>(&self, key: &str, val: &T) -> Templates {
        let mut new_ctx = self.ctx.clone();
        new_ctx.insert(key, val);

        Templates {
            tera: self.tera.clone(),
            ctx: new_ctx,
        }
    }

    pub fn render(&self, template: &str) -> Result<String> {
        self.tera
            .render(template, &self.ctx)
            .context("tera template rendering failed")
    }
}
