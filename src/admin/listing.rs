//! Search, filtering, ordering and pagination for change lists. Everything
//! here works on already-loaded records so it can be tested without a database.

use std::collections::HashMap;

use chrono::{Datelike, Duration, NaiveDate};

use super::config::{AdminConfig, ListFilter};
use super::fields::{FieldValue, Fields};

pub const SEARCH_PARAM: &str = "q";
pub const ORDER_PARAM: &str = "o";
pub const PAGE_PARAM: &str = "p";

pub const DATE_FILTER_CHOICES: &[(&str, &str)] = &[
    ("today", "Today"),
    ("past_7_days", "Past 7 days"),
    ("this_month", "This month"),
    ("this_year", "This year"),
];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListParams {
    pub search: Option<String>,
    /// Only filters named in the config's `list_filter` survive parsing.
    pub filters: Vec<(ListFilter, String)>,
    pub ordering: Option<String>,
    /// 1-based.
    pub page: usize,
}

impl ListParams {
    pub fn from_query(config: &AdminConfig, query: &HashMap<String, String>) -> Self {
        let search = query
            .get(SEARCH_PARAM)
            .map(|q| q.trim().to_string())
            .filter(|q| !q.is_empty() && !config.search_fields.is_empty());

        let mut filters: Vec<(ListFilter, String)> = query
            .iter()
            .filter_map(|(name, value)| {
                config
                    .list_filter_for(name)
                    .map(|filter| (filter, value.trim().to_string()))
            })
            .filter(|(_, value)| !value.is_empty())
            .collect();
        filters.sort_by_key(|(filter, _)| filter.field());

        let ordering = query
            .get(ORDER_PARAM)
            .map(|o| o.trim().to_string())
            .filter(|o| config.is_sortable(o.trim_start_matches('-')));

        let page = query
            .get(PAGE_PARAM)
            .and_then(|p| p.parse::<usize>().ok())
            .filter(|p| *p > 0)
            .unwrap_or(1);

        Self {
            search,
            filters,
            ordering,
            page,
        }
    }
}

/// A record matches when any search field contains every whitespace-separated term.
pub fn matches_search<R: Fields>(record: &R, search_fields: &[&str], search: &str) -> bool {
    let lowered = search.to_lowercase();
    lowered.split_whitespace().all(|term| {
        search_fields
            .iter()
            .any(|field| record.field(field).contains(term))
    })
}

pub fn matches_filter<R: Fields>(record: &R, filter: ListFilter, value: &str, today: NaiveDate) -> bool {
    let field_value = record.field(filter.field());
    match filter {
        ListFilter::Exact(_) => field_value.raw() == value,
        ListFilter::Date(_) => match field_value.as_date() {
            Some(date) => matches_date_range(date, value, today),
            None => false,
        },
    }
}

/// Unknown range names match nothing.
pub fn matches_date_range(date: NaiveDate, range: &str, today: NaiveDate) -> bool {
    match range {
        "today" => date == today,
        "past_7_days" => date <= today && date > today - Duration::days(7),
        "this_month" => date.year() == today.year() && date.month() == today.month(),
        "this_year" => date.year() == today.year(),
        _ => false,
    }
}

/// Stable multi-key sort; `-field` sorts that key descending.
pub fn sort_records<R: Fields>(records: &mut [R], ordering: &[&str]) {
    records.sort_by(|a, b| {
        for key in ordering {
            let (field, descending) = match key.strip_prefix('-') {
                Some(field) => (field, true),
                None => (*key, false),
            };
            let ord = a.field(field).compare(&b.field(field));
            let ord = if descending { ord.reverse() } else { ord };
            if ord != std::cmp::Ordering::Equal {
                return ord;
            }
        }
        std::cmp::Ordering::Equal
    });
}

pub fn apply<R: Fields>(records: Vec<R>, config: &AdminConfig, params: &ListParams, today: NaiveDate) -> Vec<R> {
    let mut kept: Vec<R> = records
        .into_iter()
        .filter(|record| match &params.search {
            Some(search) => matches_search(record, config.search_fields, search),
            None => true,
        })
        .filter(|record| {
            params
                .filters
                .iter()
                .all(|(filter, value)| matches_filter(record, *filter, value, today))
        })
        .collect();

    match &params.ordering {
        Some(ordering) => sort_records(&mut kept, &[ordering.as_str()]),
        None => sort_records(&mut kept, config.ordering),
    }
    kept
}

/// Distinct raw values of `field` with their display text, sorted.
pub fn filter_choices<R: Fields>(records: &[R], filter: ListFilter) -> Vec<(String, String)> {
    match filter {
        ListFilter::Date(_) => DATE_FILTER_CHOICES
            .iter()
            .map(|(value, label)| (value.to_string(), label.to_string()))
            .collect(),
        ListFilter::Exact(field) => {
            let mut values: Vec<FieldValue> = Vec::new();
            for record in records {
                let value = record.field(field);
                if value != FieldValue::Null && !values.contains(&value) {
                    values.push(value);
                }
            }
            values.sort_by(|a, b| a.compare(b));
            values.into_iter().map(|v| (v.raw(), v.to_string())).collect()
        }
    }
}

#[derive(Debug)]
pub struct Page<R> {
    pub items: Vec<R>,
    pub number: usize,
    pub num_pages: usize,
    pub total: usize,
}

/// Pages past the end clamp to the last page.
pub fn paginate<R>(records: Vec<R>, page: usize, per_page: usize) -> Page<R> {
    let per_page = per_page.max(1);
    let total = records.len();
    let num_pages = ((total + per_page - 1) / per_page).max(1);
    let number = page.clamp(1, num_pages);
    let items = records
        .into_iter()
        .skip((number - 1) * per_page)
        .take(per_page)
        .collect();
    Page {
        items,
        number,
        num_pages,
        total,
    }
}

#[cfg(test)]
mod test {
    use std::collections::HashMap;

    use chrono::NaiveDate;

    use super::*;
    use crate::admin::config::{AdminConfig, ListFilter};
    use crate::admin::fields::{FieldValue, Fields};

    #[derive(Debug, Clone)]
    struct Message {
        id: i32,
        name: &'static str,
        subject: &'static str,
        is_read: bool,
        created: NaiveDate,
    }

    impl Fields for Message {
        fn field(&self, name: &str) -> FieldValue {
            match name {
                "id" => self.id.into(),
                "name" => self.name.into(),
                "subject" => self.subject.into(),
                "is_read" => self.is_read.into(),
                "created_at" => self.created.into(),
                _ => FieldValue::Null,
            }
        }
    }

    const CONFIG: AdminConfig = AdminConfig {
        model: "message",
        verbose_name: "message",
        verbose_name_plural: "messages",
        list_display: &["name", "subject", "created_at", "is_read"],
        list_filter: &[ListFilter::Exact("is_read"), ListFilter::Date("created_at")],
        search_fields: &["name", "subject"],
        ordering: &["-created_at"],
        prepopulated_slug: None,
        readonly_fields: &["created_at"],
        fields: &[],
        actions: &[],
    };

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn messages() -> Vec<Message> {
        vec![
            Message { id: 1, name: "John Doe", subject: "Project Inquiry", is_read: false, created: day(2024, 5, 1) },
            Message { id: 2, name: "Jane Smith", subject: "Hiring", is_read: true, created: day(2024, 5, 20) },
            Message { id: 3, name: "Bob", subject: "Django project", is_read: false, created: day(2023, 12, 31) },
        ]
    }

    fn query(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    fn ids(records: &[Message]) -> Vec<i32> {
        records.iter().map(|m| m.id).collect()
    }

    #[test]
    fn it_orders_by_config_by_default() {
        let params = ListParams::from_query(&CONFIG, &HashMap::new());
        let listed = apply(messages(), &CONFIG, &params, day(2024, 5, 21));
        assert_eq!(ids(&listed), vec![2, 1, 3]);
    }

    #[test]
    fn it_searches_across_search_fields() {
        let params = ListParams::from_query(&CONFIG, &query(&[("q", "PROJECT")]));
        let listed = apply(messages(), &CONFIG, &params, day(2024, 5, 21));
        assert_eq!(ids(&listed), vec![1, 3]);

        let params = ListParams::from_query(&CONFIG, &query(&[("q", "django bob")]));
        assert_eq!(ids(&apply(messages(), &CONFIG, &params, day(2024, 5, 21))), vec![3]);
    }

    #[test]
    fn it_filters_exact_and_date_values() {
        let params = ListParams::from_query(&CONFIG, &query(&[("is_read", "false")]));
        assert_eq!(ids(&apply(messages(), &CONFIG, &params, day(2024, 5, 21))), vec![1, 3]);

        let params = ListParams::from_query(&CONFIG, &query(&[("created_at", "this_month")]));
        assert_eq!(ids(&apply(messages(), &CONFIG, &params, day(2024, 5, 21))), vec![2, 1]);

        let params = ListParams::from_query(&CONFIG, &query(&[("created_at", "past_7_days")]));
        assert_eq!(ids(&apply(messages(), &CONFIG, &params, day(2024, 5, 21))), vec![2]);
    }

    #[test]
    fn it_ignores_unknown_filters_and_orderings() {
        let params = ListParams::from_query(&CONFIG, &query(&[("password", "x"), ("o", "password"), ("p", "zero")]));
        assert!(params.filters.is_empty());
        assert_eq!(params.ordering, None);
        assert_eq!(params.page, 1);
    }

    #[test]
    fn it_honours_an_ordering_override() {
        let params = ListParams::from_query(&CONFIG, &query(&[("o", "name")]));
        let listed = apply(messages(), &CONFIG, &params, day(2024, 5, 21));
        assert_eq!(ids(&listed), vec![3, 2, 1]);
    }

    #[test]
    fn it_lists_filter_choices() {
        let choices = filter_choices(&messages(), ListFilter::Exact("is_read"));
        assert_eq!(
            choices,
            vec![("false".to_string(), "No".to_string()), ("true".to_string(), "Yes".to_string())]
        );
        assert_eq!(filter_choices(&messages(), ListFilter::Date("created_at")).len(), 4);
    }

    #[test]
    fn date_ranges() {
        let today = day(2024, 1, 3);
        assert!(matches_date_range(day(2024, 1, 3), "today", today));
        assert!(matches_date_range(day(2023, 12, 28), "past_7_days", today));
        assert!(!matches_date_range(day(2023, 12, 27), "past_7_days", today));
        assert!(!matches_date_range(day(2023, 12, 31), "this_year", today));
        assert!(!matches_date_range(day(2024, 1, 3), "someday", today));
    }

    #[test]
    fn it_paginates_and_clamps() {
        let page = paginate((1..=5).collect::<Vec<i32>>(), 2, 2);
        assert_eq!(page.items, vec![3, 4]);
        assert_eq!(page.num_pages, 3);
        assert_eq!(page.total, 5);

        let page = paginate((1..=5).collect::<Vec<i32>>(), 9, 2);
        assert_eq!(page.number, 3);
        assert_eq!(page.items, vec![5]);

        let page = paginate(Vec::<i32>::new(), 1, 100);
        assert_eq!(page.num_pages, 1);
        assert!(page.items.is_empty());
    }
}
