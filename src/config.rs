use std::net::SocketAddr;
use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct SiteConfig {
    pub database_url: String,
    pub template_dir: String,

    #[serde(default = "default_bind_address")]
    pub bind_address: SocketAddr,

    #[serde(default = "default_log_filter")]
    pub log_filter: String,

    pub site: SiteSection,

    #[serde(default)]
    pub admin: AdminSection,
}

#[derive(Clone, Debug, Deserialize)]
pub struct SiteSection {
    pub site_name: String,
    #[serde(default = "default_menu_items")]
    pub menu_items: Vec<(String, String)>,
    #[serde(default)]
    pub socials: Vec<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct AdminSection {
    #[serde(default = "default_admin_realm")]
    pub realm: String,
    #[serde(default = "default_admin_per_page")]
    pub per_page: usize,
}

impl Default for AdminSection {
    fn default() -> Self {
        Self {
            realm: default_admin_realm(),
            per_page: default_admin_per_page(),
        }
    }
}

impl SiteConfig {
    /// Reads the TOML file at `path`. `DATABASE_URL`, when set, wins over
    /// the file's `database_url`.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {:?}", path))?;
        let mut config = Self::from_toml(&raw)?;
        if let Ok(url) = std::env::var(crate::DATABASE_URL_VAR) {
            config.database_url = url;
        }
        Ok(config)
    }

    pub fn from_toml(raw: &str) -> anyhow::Result<Self> {
        toml::from_str(raw).context("parsing config file")
    }
}

fn default_bind_address() -> SocketAddr {
    crate::DEFAULT_BIND_ADDRESS
        .parse()
        .unwrap_or_else(|_| SocketAddr::from(([127, 0, 0, 1], 3030)))
}

fn default_log_filter() -> String {
    crate::DEFAULT_LOG_FILTER.into()
}

fn default_menu_items() -> Vec<(String, String)> {
    crate::MENU_ITEMS
        .iter()
        .map(|(label, href)| (label.to_string(), href.to_string()))
        .collect()
}

fn default_admin_realm() -> String {
    crate::DEFAULT_ADMIN_REALM.into()
}

fn default_admin_per_page() -> usize {
    crate::DEFAULT_ADMIN_PER_PAGE
}

#[cfg(test)]
mod test {
    use super::SiteConfig;

    #[test]
    fn it_fills_in_defaults() {
        let config = SiteConfig::from_toml(
            r#"
            database_url = "portfolio.sqlite3"
            template_dir = "."

            [site]
            site_name = "Steve's Portfolio"
            "#,
        )
        .unwrap();

        assert_eq!(config.bind_address.to_string(), "127.0.0.1:3030");
        assert_eq!(config.log_filter, "info");
        assert_eq!(config.site.menu_items.len(), crate::MENU_ITEMS.len());
        assert_eq!(config.site.menu_items[0], ("Home".to_string(), "/".to_string()));
        assert!(config.site.socials.is_empty());
        assert_eq!(config.admin.realm, "Portfolio admin");
        assert_eq!(config.admin.per_page, 100);
    }

    #[test]
    fn it_reads_every_section() {
        let config = SiteConfig::from_toml(
            r#"
            database_url = "/var/lib/portfolio/db.sqlite3"
            template_dir = "/srv/portfolio"
            bind_address = "0.0.0.0:8000"
            log_filter = "portfolio_rs=debug"

            [site]
            site_name = "Steve's Portfolio"
            menu_items = [["Blog", "/"], ["Contact", "/contact/"]]
            socials = ["https://github.com/steveongera"]

            [admin]
            realm = "Back office"
            per_page = 25
            "#,
        )
        .unwrap();

        assert_eq!(config.bind_address.port(), 8000);
        assert_eq!(config.site.menu_items.len(), 2);
        assert_eq!(config.site.socials, vec!["https://github.com/steveongera".to_string()]);
        assert_eq!(config.admin.realm, "Back office");
        assert_eq!(config.admin.per_page, 25);
    }

    #[test]
    fn it_requires_a_database_url() {
        assert!(SiteConfig::from_toml("template_dir = \".\"\n[site]\nsite_name = \"x\"\n").is_err());
    }
}
