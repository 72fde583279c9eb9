//! Basic-auth protected CRUD pages for every content type, configured per
//! entity and mounted under `/admin/`.

pub mod auth;
pub mod config;
pub mod entities;
pub mod fields;
pub mod handlers;
pub mod listing;

use std::sync::Arc;

use axum::middleware::from_fn_with_state;
use axum::routing::{get, post};
use axum::Router;

use crate::config::AdminSection;
use crate::handler::PortfolioDB;
use crate::models::{
    Category, Certification, Contact, Education, Experience, PostSummary, Project, Skill, Testimonial,
};
use crate::templates::Templates;
use crate::DbPool;

use self::config::AdminConfig;
use self::entities::AdminEntity;

pub struct AdminState {
    pub db: PortfolioDB,
    pub templates: Arc<Templates>,
    pub per_page: usize,
    pub realm: String,
    /// Every registered entity, in registration order.
    pub registry: Vec<AdminConfig>,
}

type Mount = fn(Router<Arc<AdminState>>) -> Router<Arc<AdminState>>;

fn mount<M: AdminEntity>(router: Router<Arc<AdminState>>) -> Router<Arc<AdminState>> {
    let base = format!("/admin/{}/", M::ADMIN.model);
    router
        .route(&base, get(handlers::get_changelist_handler::<M>))
        .route(
            &format!("{}add/", base),
            get(handlers::get_add_handler::<M>).post(handlers::post_add_handler::<M>),
        )
        .route(
            &format!("{}:id/change/", base),
            get(handlers::get_change_handler::<M>).post(handlers::post_change_handler::<M>),
        )
        .route(&format!("{}action/", base), post(handlers::post_action_handler::<M>))
}

#[derive(Default)]
pub struct AdminSite {
    configs: Vec<AdminConfig>,
    mounts: Vec<Mount>,
}

impl AdminSite {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `M` to the index and mounts its change list, forms and actions.
    pub fn register<M: AdminEntity>(mut self) -> Self {
        self.configs.push(M::ADMIN);
        self.mounts.push(mount::<M>);
        self
    }

    pub fn configs(&self) -> &[AdminConfig] {
        &self.configs
    }

    pub fn into_router(self, dbpool: Arc<DbPool>, templates: Arc<Templates>, settings: &AdminSection) -> Router {
        let state = Arc::new(AdminState {
            db: PortfolioDB::new(dbpool),
            templates,
            per_page: settings.per_page,
            realm: settings.realm.clone(),
            registry: self.configs,
        });

        let router = Router::new()
            .route("/admin/", get(handlers::get_index_handler))
            .route("/admin", get(handlers::get_index_handler));
        self.mounts
            .into_iter()
            .fold(router, |router, mount| mount(router))
            .route_layer(from_fn_with_state(state.clone(), auth::require_staff))
            .with_state(state)
    }
}

pub fn default_site() -> AdminSite {
    AdminSite::new()
        .register::<Category>()
        .register::<PostSummary>()
        .register::<Project>()
        .register::<Skill>()
        .register::<Experience>()
        .register::<Education>()
        .register::<Certification>()
        .register::<Contact>()
        .register::<Testimonial>()
}

#[cfg(test)]
mod test {
    use super::default_site;

    #[test]
    fn every_model_is_registered_once() {
        let site = default_site();
        let mut models: Vec<&str> = site.configs().iter().map(|c| c.model).collect();
        assert_eq!(models.len(), 9);
        models.sort();
        models.dedup();
        assert_eq!(models.len(), 9);
    }

    #[test]
    fn configured_fields_are_sortable_and_filterable() {
        for config in default_site().configs() {
            for filter in config.list_filter {
                assert!(config.list_filter_for(filter.field()).is_some());
            }
            for field in config.list_display {
                assert!(config.is_sortable(field), "{} on {}", field, config.model);
            }
        }
    }
}
