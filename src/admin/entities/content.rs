use diesel::prelude::*;
use serde::Deserialize;

use super::{expect_updated, AdminEntity};
use crate::admin::config::{AdminConfig, FieldKind, FormField, ListFilter, DELETE_SELECTED};
use crate::admin::fields::{FieldValue, Fields};
use crate::errors::FormError;
use crate::forms;
use crate::models::{now, Category, NewCategory, NewPost, NewProject, Post, PostSummary, Project};
use crate::schema::{categories, posts, projects};
use crate::slug_util::slug_or_derive;

const EXCERPT_MAX_LENGTH: usize = 300;

#[derive(Debug, Default, Deserialize)]
pub struct CategoryInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub description: String,
}

impl Fields for Category {
    fn field(&self, name: &str) -> FieldValue {
        match name {
            "id" => self.id.into(),
            "name" => (&self.name).into(),
            "slug" => (&self.slug).into(),
            "description" => (&self.description).into(),
            "created_at" => self.created_at.into(),
            _ => FieldValue::Null,
        }
    }
}

impl AdminEntity for Category {
    const ADMIN: AdminConfig = AdminConfig {
        model: "category",
        verbose_name: "category",
        verbose_name_plural: "categories",
        list_display: &["name", "slug", "created_at"],
        list_filter: &[],
        search_fields: &["name"],
        ordering: &["name"],
        prepopulated_slug: Some(("slug", "name")),
        readonly_fields: &["created_at"],
        fields: &[
            FormField::required("name", FieldKind::Text),
            FormField::optional("slug", FieldKind::Text).help("Leave blank to derive from the name."),
            FormField::optional("description", FieldKind::TextArea),
        ],
        actions: &[DELETE_SELECTED],
    };

    type Input = CategoryInput;

    fn load_all(conn: &mut SqliteConnection) -> QueryResult<Vec<Self>> {
        Category::all(conn)
    }

    fn find(conn: &mut SqliteConnection, id: i32) -> QueryResult<Self> {
        categories::table.find(id).select(Category::as_select()).first(conn)
    }

    fn pk(&self) -> i32 {
        self.id
    }

    fn title(&self) -> String {
        self.to_string()
    }

    fn create(conn: &mut SqliteConnection, input: CategoryInput) -> Result<(), FormError> {
        let name = forms::required(&input.name, "name")?;
        let slug = slug_or_derive(&input.slug, name)?;

        Category::insert(
            conn,
            &NewCategory {
                name,
                slug: &slug,
                description: input.description.trim(),
                created_at: now(),
            },
        )
        .map_err(|e| FormError::from_write(e, "slug"))?;
        Ok(())
    }

    fn update(conn: &mut SqliteConnection, id: i32, input: CategoryInput) -> Result<(), FormError> {
        let name = forms::required(&input.name, "name")?;
        let slug = slug_or_derive(&input.slug, name)?;

        let rows = diesel::update(categories::table.find(id))
            .set((
                categories::name.eq(name),
                categories::slug.eq(&slug),
                categories::description.eq(input.description.trim()),
            ))
            .execute(conn)
            .map_err(|e| FormError::from_write(e, "slug"))?;
        expect_updated(rows)
    }

    fn delete(conn: &mut SqliteConnection, ids: &[i32]) -> QueryResult<usize> {
        diesel::delete(categories::table.filter(categories::id.eq_any(ids))).execute(conn)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct PostInput {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default, deserialize_with = "forms::optional::deserialize")]
    pub author_id: Option<i32>,
    #[serde(default, deserialize_with = "forms::optional::deserialize")]
    pub category_id: Option<i32>,
    #[serde(default)]
    pub excerpt: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub image: String,
    #[serde(default, deserialize_with = "forms::checkbox::deserialize")]
    pub is_featured: bool,
    #[serde(default, deserialize_with = "forms::checkbox::deserialize")]
    pub published: bool,
}

struct ValidPost<'a> {
    title: &'a str,
    slug: String,
    author_id: i32,
    excerpt: &'a str,
    content: &'a str,
}

impl PostInput {
    fn validate(&self) -> Result<ValidPost<'_>, FormError> {
        let title = forms::required(&self.title, "title")?;
        let slug = slug_or_derive(&self.slug, title)?;
        let author_id = forms::required_value(self.author_id, "author")?;
        let excerpt = forms::required(&self.excerpt, "excerpt")?;
        if excerpt.chars().count() > EXCERPT_MAX_LENGTH {
            return Err(FormError::Invalid(
                "excerpt".into(),
                format!("at most {} characters", EXCERPT_MAX_LENGTH),
            ));
        }
        let content = forms::required(&self.content, "content")?;
        Ok(ValidPost {
            title,
            slug,
            author_id,
            excerpt,
            content,
        })
    }
}

impl Fields for PostSummary {
    fn field(&self, name: &str) -> FieldValue {
        let post = &self.post;
        match name {
            "id" => post.id.into(),
            "title" => (&post.title).into(),
            "slug" => (&post.slug).into(),
            "author" => (&self.author).into(),
            "author_id" => post.author_id.into(),
            "category" => self.category.as_ref().into(),
            "category_id" => post.category_id.into(),
            "excerpt" => (&post.excerpt).into(),
            "content" => (&post.content).into(),
            "image" => post.image.as_ref().into(),
            "is_featured" => post.is_featured.into(),
            "published" => post.published.into(),
            "views" => post.views.into(),
            "created_at" => post.created_at.into(),
            "updated_at" => post.updated_at.into(),
            _ => FieldValue::Null,
        }
    }
}

impl AdminEntity for PostSummary {
    const ADMIN: AdminConfig = AdminConfig {
        model: "post",
        verbose_name: "post",
        verbose_name_plural: "posts",
        list_display: &["title", "author", "category", "is_featured", "published", "views", "created_at"],
        list_filter: &[
            ListFilter::Exact("is_featured"),
            ListFilter::Exact("published"),
            ListFilter::Exact("category"),
            ListFilter::Date("created_at"),
        ],
        search_fields: &["title", "content"],
        ordering: &["-created_at"],
        prepopulated_slug: Some(("slug", "title")),
        readonly_fields: &["views", "created_at", "updated_at"],
        fields: &[
            FormField::required("title", FieldKind::Text),
            FormField::optional("slug", FieldKind::Text).help("Leave blank to derive from the title."),
            FormField::required("author_id", FieldKind::ForeignKey("users")),
            FormField::optional("category_id", FieldKind::ForeignKey("categories")),
            FormField::required("excerpt", FieldKind::TextArea).help("At most 300 characters."),
            FormField::required("content", FieldKind::TextArea),
            FormField::optional("image", FieldKind::Text).help("Path under /static/img/."),
            FormField::optional("is_featured", FieldKind::Bool),
            FormField::optional("published", FieldKind::Bool).initial("true"),
        ],
        actions: &[DELETE_SELECTED],
    };

    type Input = PostInput;

    fn load_all(conn: &mut SqliteConnection) -> QueryResult<Vec<Self>> {
        Post::summaries(conn)
    }

    fn find(conn: &mut SqliteConnection, id: i32) -> QueryResult<Self> {
        Post::summary(conn, id)
    }

    fn pk(&self) -> i32 {
        self.post.id
    }

    fn title(&self) -> String {
        self.post.title.clone()
    }

    fn create(conn: &mut SqliteConnection, input: PostInput) -> Result<(), FormError> {
        let valid = input.validate()?;
        let created = now();

        Post::insert(
            conn,
            &NewPost {
                title: valid.title,
                slug: &valid.slug,
                author_id: valid.author_id,
                category_id: input.category_id,
                excerpt: valid.excerpt,
                content: valid.content,
                image: forms::non_blank(&input.image),
                is_featured: input.is_featured,
                views: 0,
                created_at: created,
                updated_at: created,
                published: input.published,
            },
        )
        .map_err(|e| FormError::from_write(e, "slug"))?;
        Ok(())
    }

    fn update(conn: &mut SqliteConnection, id: i32, input: PostInput) -> Result<(), FormError> {
        let valid = input.validate()?;

        let rows = diesel::update(posts::table.find(id))
            .set((
                posts::title.eq(valid.title),
                posts::slug.eq(&valid.slug),
                posts::author_id.eq(valid.author_id),
                posts::category_id.eq(input.category_id),
                posts::excerpt.eq(valid.excerpt),
                posts::content.eq(valid.content),
                posts::image.eq(forms::non_blank(&input.image)),
                posts::is_featured.eq(input.is_featured),
                posts::published.eq(input.published),
                posts::updated_at.eq(now()),
            ))
            .execute(conn)
            .map_err(|e| FormError::from_write(e, "slug"))?;
        expect_updated(rows)
    }

    fn delete(conn: &mut SqliteConnection, ids: &[i32]) -> QueryResult<usize> {
        diesel::delete(posts::table.filter(posts::id.eq_any(ids))).execute(conn)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ProjectInput {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub technologies: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub demo_link: String,
    #[serde(default)]
    pub github_link: String,
    #[serde(default, deserialize_with = "forms::checkbox::deserialize")]
    pub is_featured: bool,
    #[serde(default, deserialize_with = "forms::optional::deserialize")]
    pub display_order: Option<i32>,
}

impl Fields for Project {
    fn field(&self, name: &str) -> FieldValue {
        match name {
            "id" => self.id.into(),
            "title" => (&self.title).into(),
            "slug" => (&self.slug).into(),
            "description" => (&self.description).into(),
            "technologies" => (&self.technologies).into(),
            "image" => self.image.as_ref().into(),
            "demo_link" => self.demo_link.as_ref().into(),
            "github_link" => self.github_link.as_ref().into(),
            "is_featured" => self.is_featured.into(),
            "display_order" => self.display_order.into(),
            "created_at" => self.created_at.into(),
            "updated_at" => self.updated_at.into(),
            _ => FieldValue::Null,
        }
    }
}

impl AdminEntity for Project {
    const ADMIN: AdminConfig = AdminConfig {
        model: "project",
        verbose_name: "project",
        verbose_name_plural: "projects",
        list_display: &["title", "is_featured", "display_order", "created_at"],
        list_filter: &[ListFilter::Exact("is_featured"), ListFilter::Date("created_at")],
        search_fields: &["title", "description"],
        ordering: &["display_order", "-created_at"],
        prepopulated_slug: Some(("slug", "title")),
        readonly_fields: &["created_at", "updated_at"],
        fields: &[
            FormField::required("title", FieldKind::Text),
            FormField::optional("slug", FieldKind::Text).help("Leave blank to derive from the title."),
            FormField::required("description", FieldKind::TextArea),
            FormField::required("technologies", FieldKind::Text).help("Comma-separated technologies"),
            FormField::optional("image", FieldKind::Text),
            FormField::optional("demo_link", FieldKind::Url),
            FormField::optional("github_link", FieldKind::Url),
            FormField::optional("is_featured", FieldKind::Bool),
            FormField::optional("display_order", FieldKind::Int).initial("0"),
        ],
        actions: &[DELETE_SELECTED],
    };

    type Input = ProjectInput;

    fn load_all(conn: &mut SqliteConnection) -> QueryResult<Vec<Self>> {
        Project::all(conn)
    }

    fn find(conn: &mut SqliteConnection, id: i32) -> QueryResult<Self> {
        projects::table.find(id).select(Project::as_select()).first(conn)
    }

    fn pk(&self) -> i32 {
        self.id
    }

    fn title(&self) -> String {
        self.title.clone()
    }

    fn create(conn: &mut SqliteConnection, input: ProjectInput) -> Result<(), FormError> {
        let title = forms::required(&input.title, "title")?;
        let slug = slug_or_derive(&input.slug, title)?;
        let description = forms::required(&input.description, "description")?;
        let technologies = forms::required(&input.technologies, "technologies")?;
        let created = now();

        Project::insert(
            conn,
            &NewProject {
                title,
                slug: &slug,
                description,
                technologies,
                image: forms::non_blank(&input.image),
                demo_link: forms::non_blank(&input.demo_link),
                github_link: forms::non_blank(&input.github_link),
                is_featured: input.is_featured,
                display_order: input.display_order.unwrap_or(0),
                created_at: created,
                updated_at: created,
            },
        )
        .map_err(|e| FormError::from_write(e, "slug"))?;
        Ok(())
    }

    fn update(conn: &mut SqliteConnection, id: i32, input: ProjectInput) -> Result<(), FormError> {
        let title = forms::required(&input.title, "title")?;
        let slug = slug_or_derive(&input.slug, title)?;
        let description = forms::required(&input.description, "description")?;
        let technologies = forms::required(&input.technologies, "technologies")?;

        let rows = diesel::update(projects::table.find(id))
            .set((
                projects::title.eq(title),
                projects::slug.eq(&slug),
                projects::description.eq(description),
                projects::technologies.eq(technologies),
                projects::image.eq(forms::non_blank(&input.image)),
                projects::demo_link.eq(forms::non_blank(&input.demo_link)),
                projects::github_link.eq(forms::non_blank(&input.github_link)),
                projects::is_featured.eq(input.is_featured),
                projects::display_order.eq(input.display_order.unwrap_or(0)),
                projects::updated_at.eq(now()),
            ))
            .execute(conn)
            .map_err(|e| FormError::from_write(e, "slug"))?;
        expect_updated(rows)
    }

    fn delete(conn: &mut SqliteConnection, ids: &[i32]) -> QueryResult<usize> {
        diesel::delete(projects::table.filter(projects::id.eq_any(ids))).execute(conn)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test_util::test_conn;

    fn category(name: &str, slug: &str) -> CategoryInput {
        CategoryInput {
            name: name.into(),
            slug: slug.into(),
            ..Default::default()
        }
    }

    #[test]
    fn category_slug_must_be_url_safe() {
        let mut conn = test_conn();
        for bad in ["Not A Slug!", "a/b?c=d#e"] {
            let err = <Category as AdminEntity>::create(&mut conn, category("Web", bad)).unwrap_err();
            assert!(matches!(err, FormError::Invalid(ref field, _) if field == "slug"));
        }
        assert!(Category::all(&mut conn).unwrap().is_empty());
    }

    #[test]
    fn category_slug_over_fifty_characters_is_rejected() {
        let mut conn = test_conn();
        let long = "x".repeat(80);
        let err = <Category as AdminEntity>::create(&mut conn, category("Web", &long)).unwrap_err();
        assert!(matches!(err, FormError::Invalid(ref field, _) if field == "slug"));
        assert!(Category::all(&mut conn).unwrap().is_empty());
    }

    #[test]
    fn category_keeps_a_valid_submitted_slug() {
        let mut conn = test_conn();
        <Category as AdminEntity>::create(&mut conn, category("Web Development", "web_dev-2")).unwrap();
        <Category as AdminEntity>::create(&mut conn, category("Python Tips", "")).unwrap();

        let slugs: Vec<String> = Category::all(&mut conn)
            .unwrap()
            .into_iter()
            .map(|c| c.slug)
            .collect();
        assert_eq!(slugs, vec!["python-tips", "web_dev-2"]);
    }

    #[test]
    fn post_readonly_fields_are_not_editable() {
        let config = <PostSummary as AdminEntity>::ADMIN;
        for readonly in config.readonly_fields {
            assert!(
                config.fields.iter().all(|field| field.name != *readonly),
                "{} is both readonly and a form field",
                readonly
            );
        }
    }

    #[test]
    fn post_validation_rejects_a_bad_slug() {
        let input = PostInput {
            title: "Getting Started".into(),
            slug: "getting started".into(),
            ..Default::default()
        };
        assert!(matches!(input.validate(), Err(FormError::Invalid(ref field, _)) if field == "slug"));
    }
}
