use crate::models::SkillCategory;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    TextArea,
    Email,
    Url,
    Int,
    Bool,
    Date,
    Choice(&'static [(&'static str, &'static str)]),
    /// Select populated from the named table.
    ForeignKey(&'static str),
}

#[derive(Debug, Clone, Copy)]
pub struct FormField {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub help_text: &'static str,
    /// Pre-filled value on the add form.
    pub initial: &'static str,
}

impl FormField {
    pub const fn required(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: true,
            help_text: "",
            initial: "",
        }
    }

    pub const fn optional(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: false,
            help_text: "",
            initial: "",
        }
    }

    pub const fn help(self, help_text: &'static str) -> Self {
        Self { help_text, ..self }
    }

    pub const fn initial(self, initial: &'static str) -> Self {
        Self { initial, ..self }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListFilter {
    /// Exact match on the raw value.
    Exact(&'static str),
    /// `today`, `past_7_days`, `this_month` or `this_year`.
    Date(&'static str),
}

impl ListFilter {
    pub fn field(&self) -> &'static str {
        match *self {
            ListFilter::Exact(f) | ListFilter::Date(f) => f,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdminAction {
    pub name: &'static str,
    pub description: &'static str,
}

pub const DELETE_SELECTED: AdminAction = AdminAction {
    name: "delete_selected",
    description: "Delete selected records",
};

pub const MARK_AS_READ: AdminAction = AdminAction {
    name: "mark_as_read",
    description: "Mark selected messages as read",
};

pub const RATING_CHOICES: &[(&str, &str)] = &[("1", "1"), ("2", "2"), ("3", "3"), ("4", "4"), ("5", "5")];
pub const SKILL_CATEGORY_CHOICES: &[(&str, &str)] = SkillCategory::CHOICES;

/// List/search/filter/form configuration for one entity.
#[derive(Debug, Clone, Copy)]
pub struct AdminConfig {
    /// URL segment under `/admin/`.
    pub model: &'static str,
    pub verbose_name: &'static str,
    pub verbose_name_plural: &'static str,
    pub list_display: &'static [&'static str],
    pub list_filter: &'static [ListFilter],
    pub search_fields: &'static [&'static str],
    /// Field names, `-` prefix for descending.
    pub ordering: &'static [&'static str],
    /// `(slug field, source field)`: a blank slug is derived from the source.
    pub prepopulated_slug: Option<(&'static str, &'static str)>,
    pub readonly_fields: &'static [&'static str],
    pub fields: &'static [FormField],
    pub actions: &'static [AdminAction],
}

impl AdminConfig {
    pub fn list_filter_for(&self, name: &str) -> Option<ListFilter> {
        self.list_filter.iter().copied().find(|f| f.field() == name)
    }

    pub fn action(&self, name: &str) -> Option<AdminAction> {
        self.actions.iter().copied().find(|a| a.name == name)
    }

    /// True when `field` may be used in `?o=`.
    pub fn is_sortable(&self, field: &str) -> bool {
        self.list_display.contains(&field) || self.ordering.iter().any(|o| o.trim_start_matches('-') == field)
    }
}

/// "is_featured" -> "Is featured"
pub fn label_for(field: &str) -> String {
    let spaced = field.trim_end_matches("_id").replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod test {
    use super::label_for;

    #[test]
    fn it_builds_labels_from_field_names() {
        assert_eq!(label_for("is_featured"), "Is featured");
        assert_eq!(label_for("author_id"), "Author");
        assert_eq!(label_for("views"), "Views");
    }
}
