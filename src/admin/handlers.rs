use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::response::{Html, IntoResponse, Redirect, Response};
use bytes::Bytes;
use chrono::Utc;
use diesel::prelude::*;
use http::StatusCode;
use log::{error, info};
use serde::Serialize;
use serde_json::{Map, Value};
use url::form_urlencoded::{parse, Serializer};

use super::config::{label_for, AdminConfig, FieldKind, FormField};
use super::entities::AdminEntity;
use super::listing::{self, ListParams, ORDER_PARAM, PAGE_PARAM, SEARCH_PARAM};
use super::AdminState;
use crate::errors::{FormError, TemplateError};
use crate::handler::WithDB;
use crate::models::{Category, User};

const ACTION_PARAM: &str = "action";
const SELECTED_PARAM: &str = "_selected_action";

#[derive(Debug, Serialize)]
struct ModelLink {
    model: &'static str,
    name: String,
    url: String,
    add_url: String,
}

impl From<&AdminConfig> for ModelLink {
    fn from(config: &AdminConfig) -> Self {
        Self {
            model: config.model,
            name: label_for(config.verbose_name_plural),
            url: changelist_url(config),
            add_url: format!("{}add/", changelist_url(config)),
        }
    }
}

#[derive(Debug, Serialize)]
struct ColumnView {
    name: &'static str,
    label: String,
    /// Query string that sorts by this column, toggling direction.
    sort_query: String,
    sorted: Option<&'static str>,
}

#[derive(Debug, Serialize)]
struct RowView {
    id: i32,
    title: String,
    change_url: String,
    cells: Vec<String>,
}

#[derive(Debug, Serialize)]
struct ChoiceView {
    label: String,
    query: String,
    selected: bool,
}

#[derive(Debug, Serialize)]
struct FilterView {
    label: String,
    choices: Vec<ChoiceView>,
}

#[derive(Debug, Serialize)]
struct ActionView {
    name: &'static str,
    description: &'static str,
}

#[derive(Debug, Serialize)]
struct PageView {
    number: usize,
    num_pages: usize,
    total: usize,
    previous_query: Option<String>,
    next_query: Option<String>,
}

#[derive(Debug, Serialize)]
struct FormFieldView {
    name: &'static str,
    label: String,
    widget: &'static str,
    required: bool,
    help_text: &'static str,
    value: String,
    checked: bool,
    choices: Vec<(String, String)>,
}

#[derive(Debug, Serialize)]
struct ReadonlyView {
    label: String,
    value: String,
}

fn changelist_url(config: &AdminConfig) -> String {
    format!("/admin/{}/", config.model)
}

fn encode_query(params: &[(String, String)]) -> String {
    let mut serializer = Serializer::new(String::new());
    for (k, v) in params {
        serializer.append_pair(k, v);
    }
    serializer.finish()
}

/// The current query with `key` replaced (or removed when `value` is None).
/// Changing anything but the page resets pagination.
fn query_with(current: &HashMap<String, String>, key: &str, value: Option<&str>) -> String {
    let mut params: Vec<(String, String)> = current
        .iter()
        .filter(|(k, _)| k.as_str() != key && (key == PAGE_PARAM || k.as_str() != PAGE_PARAM))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    if let Some(value) = value {
        params.push((key.to_string(), value.to_string()));
    }
    params.sort();
    encode_query(&params)
}

fn render(state: &AdminState, template: &str, page_title: &str, ctx: Vec<(&str, Value)>) -> Result<Html<String>, StatusCode> {
    let registry: Vec<ModelLink> = state.registry.iter().map(ModelLink::from).collect();
    let mut templates = state
        .templates
        .add_context("page_title", page_title)
        .add_context("admin_models", &registry);
    for (key, value) in ctx {
        templates = templates.add_context(key, &value);
    }
    let page = templates.render(template).map_err(|e| {
        error!("{:?}", e);
        TemplateError
    })?;
    Ok(Html(page))
}

fn to_value<T: Serialize>(value: T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

/// Decodes an `application/x-www-form-urlencoded` body. Later duplicates win.
fn form_values(body: &[u8]) -> HashMap<String, String> {
    parse(body).into_owned().collect()
}

fn parse_input<M: AdminEntity>(values: &HashMap<String, String>) -> Result<M::Input, FormError> {
    let map: Map<String, Value> = values
        .iter()
        .map(|(k, v)| (k.clone(), Value::String(v.clone())))
        .collect();
    serde_json::from_value(Value::Object(map)).map_err(|e| FormError::Invalid("form".into(), e.to_string()))
}

fn foreign_key_choices(conn: &mut SqliteConnection, table: &str) -> QueryResult<Vec<(String, String)>> {
    match table {
        "users" => Ok(User::all(conn)?
            .into_iter()
            .map(|u| (u.id.to_string(), u.username))
            .collect()),
        "categories" => Ok(Category::all(conn)?
            .into_iter()
            .map(|c| (c.id.to_string(), c.name))
            .collect()),
        _ => Ok(Vec::new()),
    }
}

fn form_field_view(
    conn: &mut SqliteConnection,
    field: &FormField,
    value: String,
) -> QueryResult<FormFieldView> {
    let (widget, choices) = match field.kind {
        FieldKind::Text => ("text", Vec::new()),
        FieldKind::TextArea => ("textarea", Vec::new()),
        FieldKind::Email => ("email", Vec::new()),
        FieldKind::Url => ("url", Vec::new()),
        FieldKind::Int => ("number", Vec::new()),
        FieldKind::Bool => ("checkbox", Vec::new()),
        FieldKind::Date => ("date", Vec::new()),
        FieldKind::Choice(choices) => (
            "select",
            choices
                .iter()
                .map(|(v, l)| (v.to_string(), l.to_string()))
                .collect(),
        ),
        FieldKind::ForeignKey(table) => ("select", foreign_key_choices(conn, table)?),
    };
    let checked = matches!(value.as_str(), "true" | "on" | "1" | "yes");
    Ok(FormFieldView {
        name: field.name,
        label: label_for(field.name),
        widget,
        required: field.required,
        help_text: field.help_text,
        value,
        checked,
        choices,
    })
}

fn form_field_views(
    conn: &mut SqliteConnection,
    config: &AdminConfig,
    value_of: impl Fn(&FormField) -> String,
) -> QueryResult<Vec<FormFieldView>> {
    config
        .fields
        .iter()
        .map(|field| form_field_view(conn, field, value_of(field)))
        .collect()
}

pub async fn get_index_handler(State(state): State<Arc<AdminState>>) -> Result<impl IntoResponse, StatusCode> {
    render(&state, "admin/index.html", "Site administration", Vec::new())
}

pub async fn get_changelist_handler<M: AdminEntity>(
    State(state): State<Arc<AdminState>>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, StatusCode> {
    let config = M::ADMIN;
    let params = ListParams::from_query(&config, &query);

    let mut conn = state.db.dbconn()?;
    let records = M::load_all(&mut conn).map_err(|e| state.db.handle_errors(e))?;
    drop(conn);

    let filters: Vec<FilterView> = config
        .list_filter
        .iter()
        .map(|filter| {
            let current = query.get(filter.field()).map(String::as_str);
            let mut choices = vec![ChoiceView {
                label: "All".into(),
                query: query_with(&query, filter.field(), None),
                selected: current.is_none(),
            }];
            choices.extend(listing::filter_choices(&records, *filter).into_iter().map(|(value, label)| {
                ChoiceView {
                    selected: current == Some(value.as_str()),
                    query: query_with(&query, filter.field(), Some(&value)),
                    label,
                }
            }));
            FilterView {
                label: label_for(filter.field()),
                choices,
            }
        })
        .collect();

    let today = Utc::now().date_naive();
    let listed = listing::apply(records, &config, &params, today);
    let page = listing::paginate(listed, params.page, state.per_page);

    let columns: Vec<ColumnView> = config
        .list_display
        .iter()
        .map(|&name| {
            let sorted = match params.ordering.as_deref() {
                Some(o) if o == name => Some("asc"),
                Some(o) if o.strip_prefix('-') == Some(name) => Some("desc"),
                _ => None,
            };
            let toggle = match sorted {
                Some("asc") => format!("-{}", name),
                _ => name.to_string(),
            };
            ColumnView {
                name,
                label: label_for(name),
                sort_query: query_with(&query, ORDER_PARAM, Some(&toggle)),
                sorted,
            }
        })
        .collect();

    let rows: Vec<RowView> = page
        .items
        .iter()
        .map(|record| RowView {
            id: record.pk(),
            title: record.title(),
            change_url: format!("{}{}/change/", changelist_url(&config), record.pk()),
            cells: config
                .list_display
                .iter()
                .map(|name| record.field(name).to_string())
                .collect(),
        })
        .collect();

    let page_view = PageView {
        number: page.number,
        num_pages: page.num_pages,
        total: page.total,
        previous_query: (page.number > 1)
            .then(|| query_with(&query, PAGE_PARAM, Some(&(page.number - 1).to_string()))),
        next_query: (page.number < page.num_pages)
            .then(|| query_with(&query, PAGE_PARAM, Some(&(page.number + 1).to_string()))),
    };

    let actions: Vec<ActionView> = config
        .actions
        .iter()
        .map(|a| ActionView {
            name: a.name,
            description: a.description,
        })
        .collect();

    render(
        &state,
        "admin/change_list.html",
        &label_for(config.verbose_name_plural),
        vec![
            ("model", to_value(ModelLink::from(&config))),
            ("columns", to_value(&columns)),
            ("rows", to_value(&rows)),
            ("filters", to_value(&filters)),
            ("actions", to_value(&actions)),
            ("page", to_value(&page_view)),
            ("search_enabled", Value::Bool(!config.search_fields.is_empty())),
            ("search", to_value(params.search.as_deref().unwrap_or(""))),
            ("search_param", Value::from(SEARCH_PARAM)),
        ],
    )
}

fn render_form<M: AdminEntity>(
    state: &AdminState,
    conn: &mut SqliteConnection,
    record: Option<&M>,
    values: &HashMap<String, String>,
    error: Option<&FormError>,
) -> Result<Html<String>, StatusCode> {
    let config = M::ADMIN;
    // A re-rendered submission shows exactly what was posted; unchecked
    // boxes are absent from the body.
    let submitted = !values.is_empty();
    let fields = form_field_views(conn, &config, |field| match (submitted, record) {
        (true, _) => values.get(field.name).cloned().unwrap_or_default(),
        (false, Some(r)) => r.field(field.name).raw(),
        (false, None) => field.initial.to_string(),
    })
    .map_err(|e| state.db.handle_errors(e))?;

    let readonly: Vec<ReadonlyView> = match record {
        Some(r) => config
            .readonly_fields
            .iter()
            .map(|name| ReadonlyView {
                label: label_for(name),
                value: r.field(name).to_string(),
            })
            .collect(),
        None => Vec::new(),
    };

    let (action_url, title) = match record {
        Some(r) => (
            format!("{}{}/change/", changelist_url(&config), r.pk()),
            format!("Change {}", config.verbose_name),
        ),
        None => (
            format!("{}add/", changelist_url(&config)),
            format!("Add {}", config.verbose_name),
        ),
    };

    render(
        state,
        "admin/change_form.html",
        &title,
        vec![
            ("model", to_value(ModelLink::from(&config))),
            ("fields", to_value(&fields)),
            ("readonly", to_value(&readonly)),
            ("action_url", Value::from(action_url)),
            ("record_title", to_value(record.map(|r| r.title()))),
            ("prepopulated_slug", to_value(config.prepopulated_slug)),
            ("error", to_value(error.map(|e| e.to_string()))),
        ],
    )
}

/// 400 with the form re-rendered for user errors, 404/500 otherwise.
fn form_error_response<M: AdminEntity>(
    state: &AdminState,
    conn: &mut SqliteConnection,
    record: Option<&M>,
    values: &HashMap<String, String>,
    e: FormError,
) -> Result<Response, StatusCode> {
    match e {
        FormError::Database(db_error) => Err(state.db.handle_errors(db_error).into()),
        user_error => {
            info!("rejected {} form: {}", M::ADMIN.model, user_error);
            let page = render_form(state, conn, record, values, Some(&user_error))?;
            Ok((StatusCode::BAD_REQUEST, page).into_response())
        }
    }
}

pub async fn get_add_handler<M: AdminEntity>(State(state): State<Arc<AdminState>>) -> Result<impl IntoResponse, StatusCode> {
    let mut conn = state.db.dbconn()?;
    render_form::<M>(&state, &mut conn, None, &HashMap::new(), None)
}

pub async fn post_add_handler<M: AdminEntity>(
    State(state): State<Arc<AdminState>>,
    body: Bytes,
) -> Result<Response, StatusCode> {
    let values = form_values(&body);
    let mut conn = state.db.dbconn()?;

    let result = parse_input::<M>(&values)
        .and_then(|input| conn.transaction::<_, FormError, _>(|conn| M::create(conn, input)));
    match result {
        Ok(()) => {
            info!("created {}", M::ADMIN.verbose_name);
            Ok(Redirect::to(&changelist_url(&M::ADMIN)).into_response())
        }
        Err(e) => form_error_response::<M>(&state, &mut conn, None, &values, e),
    }
}

pub async fn get_change_handler<M: AdminEntity>(
    State(state): State<Arc<AdminState>>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, StatusCode> {
    let mut conn = state.db.dbconn()?;
    let record = M::find(&mut conn, id).map_err(|e| state.db.handle_errors(e))?;
    render_form(&state, &mut conn, Some(&record), &HashMap::new(), None)
}

pub async fn post_change_handler<M: AdminEntity>(
    State(state): State<Arc<AdminState>>,
    Path(id): Path<i32>,
    body: Bytes,
) -> Result<Response, StatusCode> {
    let values = form_values(&body);
    let mut conn = state.db.dbconn()?;
    let record = M::find(&mut conn, id).map_err(|e| state.db.handle_errors(e))?;

    let result = parse_input::<M>(&values)
        .and_then(|input| conn.transaction::<_, FormError, _>(|conn| M::update(conn, id, input)));
    match result {
        Ok(()) => {
            info!("changed {} {}", M::ADMIN.verbose_name, id);
            Ok(Redirect::to(&changelist_url(&M::ADMIN)).into_response())
        }
        Err(e) => form_error_response(&state, &mut conn, Some(&record), &values, e),
    }
}

/// Parses the action name and every `_selected_action` id from a change list
/// submission. Ids that are not integers are skipped.
pub fn parse_action_form(body: &[u8]) -> (Option<String>, Vec<i32>) {
    let mut action = None;
    let mut ids = Vec::new();
    for (k, v) in parse(body) {
        match &*k {
            ACTION_PARAM if !v.trim().is_empty() => action = Some(v.trim().to_string()),
            SELECTED_PARAM => {
                if let Ok(id) = v.trim().parse() {
                    ids.push(id);
                }
            }
            _ => (),
        }
    }
    (action, ids)
}

pub async fn post_action_handler<M: AdminEntity>(
    State(state): State<Arc<AdminState>>,
    body: Bytes,
) -> Result<Response, StatusCode> {
    let (action, ids) = parse_action_form(&body);
    let action = action
        .and_then(|name| M::ADMIN.action(&name))
        .ok_or(StatusCode::BAD_REQUEST)?;

    if !ids.is_empty() {
        let affected = state.db.run_txn(|conn| M::run_action(conn, action.name, &ids))?;
        info!("{} on {} {}: {} rows", action.name, ids.len(), M::ADMIN.verbose_name_plural, affected);
    }
    Ok(Redirect::to(&changelist_url(&M::ADMIN)).into_response())
}

#[cfg(test)]
mod test {
    use std::collections::HashMap;

    use super::{parse_action_form, query_with};

    #[test]
    fn it_parses_selected_ids() {
        let (action, ids) = parse_action_form(b"action=mark_as_read&_selected_action=1&_selected_action=3&_selected_action=x");
        assert_eq!(action.as_deref(), Some("mark_as_read"));
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn it_needs_an_action_name() {
        let (action, ids) = parse_action_form(b"action=&_selected_action=2");
        assert_eq!(action, None);
        assert_eq!(ids, vec![2]);
    }

    #[test]
    fn changing_the_query_resets_the_page() {
        let current: HashMap<String, String> = [("q", "django"), ("p", "2")]
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        assert_eq!(query_with(&current, "o", Some("-title")), "o=-title&q=django");
        assert_eq!(query_with(&current, "p", Some("3")), "p=3&q=django");
        assert_eq!(query_with(&current, "q", None), "");
    }
}
