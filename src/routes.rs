use std::path::Path;
use std::sync::Arc;

use axum::{
    routing::{on, MethodFilter},
    Router,
};
use bytes::Bytes;
use tower_http::services::ServeDir;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::admin;
use crate::config::AdminSection;
use crate::handlers;
use crate::templates::Templates;
use crate::DbPool;

/// Public pages, `/static` and the admin, sharing one pool and template set.
pub fn build_router(
    dbpool: Arc<DbPool>,
    templates: Arc<Templates>,
    static_dir: &Path,
    admin_settings: &AdminSection,
) -> Router {
    let admin = admin::default_site().into_router(dbpool.clone(), templates.clone(), admin_settings);

    Router::new()
        .route(
            "/",
            on(MethodFilter::GET.or(MethodFilter::HEAD), {
                let dbpool = dbpool.clone();
                let templates = templates.clone();
                move || handlers::get_index_handler(dbpool.clone(), templates.clone())
            }),
        )
        .route(
            "/about/",
            on(MethodFilter::GET.or(MethodFilter::HEAD), {
                let dbpool = dbpool.clone();
                let templates = templates.clone();
                move || handlers::get_about_handler(dbpool.clone(), templates.clone())
            }),
        )
        .route(
            "/projects/",
            on(MethodFilter::GET.or(MethodFilter::HEAD), {
                let dbpool = dbpool.clone();
                let templates = templates.clone();
                move || handlers::get_projects_handler(dbpool.clone(), templates.clone())
            }),
        )
        .route(
            "/contact/",
            on(MethodFilter::GET.or(MethodFilter::HEAD), {
                let templates = templates.clone();
                move || handlers::get_contact_handler(templates.clone())
            })
            .post({
                let templates = templates.clone();
                move |body: Bytes| handlers::post_contact_handler(templates.clone(), body)
            }),
        )
        .route(
            "/resume/",
            on(MethodFilter::GET.or(MethodFilter::HEAD), {
                let dbpool = dbpool.clone();
                let templates = templates.clone();
                move || handlers::get_resume_handler(dbpool.clone(), templates.clone())
            }),
        )
        .nest_service("/static", ServeDir::new(static_dir))
        .merge(admin)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
}

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::Router;
    use chrono::NaiveDate;
    use http::{header, Method, Request, StatusCode};
    use tower::ServiceExt;

    use super::build_router;
    use crate::auth::hash_password;
    use crate::config::AdminSection;
    use crate::models::{now, Contact, NewContact, NewPost, NewUser, Post, User};
    use crate::test_util::{test_pool, test_templates};
    use crate::DbPool;

    // admin:admin123
    const ADMIN_AUTH: &str = "Basic YWRtaW46YWRtaW4xMjM=";

    fn app(pool: &Arc<DbPool>) -> Router {
        let static_dir = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("static");
        build_router(pool.clone(), test_templates(), &static_dir, &AdminSection::default())
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, String) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_form(uri: &str, body: impl Into<String>, auth: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(auth) = auth {
            builder = builder.header(header::AUTHORIZATION, auth);
        }
        builder.body(Body::from(body.into())).unwrap()
    }

    fn admin_get(uri: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .header(header::AUTHORIZATION, ADMIN_AUTH)
            .body(Body::empty())
            .unwrap()
    }

    fn insert_admin(pool: &DbPool) -> i32 {
        let mut conn = pool.get().unwrap();
        let hash = hash_password("admin123").unwrap();
        User::insert(
            &mut conn,
            &NewUser {
                username: "admin",
                email: "admin@example.com",
                first_name: "",
                last_name: "",
                password_hash: &hash,
                is_staff: true,
                is_superuser: true,
                date_joined: now(),
            },
        )
        .unwrap();
        User::by_username(&mut conn, "admin").unwrap().unwrap().id
    }

    fn insert_post(pool: &DbPool, author_id: i32, title: &str, slug: &str, is_featured: bool) {
        let mut conn = pool.get().unwrap();
        let created = NaiveDate::from_ymd_opt(2022, 4, 4).unwrap().and_hms_opt(10, 0, 0).unwrap();
        Post::insert(
            &mut conn,
            &NewPost {
                title,
                slug,
                author_id,
                category_id: None,
                excerpt: "An excerpt",
                content: "Body",
                image: None,
                is_featured,
                views: 0,
                created_at: created,
                updated_at: created,
                published: true,
            },
        )
        .unwrap();
    }

    fn insert_contact(pool: &DbPool, email: &str) {
        let mut conn = pool.get().unwrap();
        Contact::insert(
            &mut conn,
            &NewContact {
                name: "John Doe",
                email,
                subject: "Project Inquiry",
                message: "Hello",
                created_at: now(),
                is_read: false,
            },
        )
        .unwrap();
    }

    #[tokio::test]
    async fn home_renders_both_sections_when_empty() {
        let pool = test_pool();
        let (status, body) = send(app(&pool), get("/")).await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("id=\"featured-posts\""));
        assert!(body.contains("id=\"recent-posts\""));
        assert!(body.contains("No featured posts yet."));
    }

    #[tokio::test]
    async fn home_lists_posts_from_the_store() {
        let pool = test_pool();
        let author = insert_admin(&pool);
        insert_post(&pool, author, "Getting Started with Django", "getting-started-with-django", true);

        let (status, body) = send(app(&pool), get("/")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Getting Started with Django"));
        assert!(body.contains("04 Apr 2022"));
        assert!(body.contains("04 April 2022"));
        assert!(body.contains("datetime=\"2022-04-04\""));
    }

    #[tokio::test]
    async fn pages_accept_head() {
        let pool = test_pool();
        for uri in ["/", "/about/", "/projects/", "/contact/", "/resume/"] {
            let request = Request::builder().method(Method::HEAD).uri(uri).body(Body::empty()).unwrap();
            let (status, _) = send(app(&pool), request).await;
            assert_eq!(status, StatusCode::OK, "HEAD {}", uri);
        }
    }

    #[tokio::test]
    async fn contact_get_shows_an_empty_form() {
        let pool = test_pool();
        let (status, body) = send(app(&pool), get("/contact/")).await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("method=\"post\""));
        assert!(!body.contains("Thank you for your message!"));
    }

    #[tokio::test]
    async fn contact_post_thanks_without_storing() {
        let pool = test_pool();
        let (status, body) = send(
            app(&pool),
            post_form("/contact/", "name=John&email=j%40x.com&subject=Hi&message=Test", None),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Thank you for your message! I will get back to you soon."));
        let mut conn = pool.get().unwrap();
        assert!(Contact::all(&mut conn).unwrap().is_empty());
    }

    #[tokio::test]
    async fn contact_post_missing_fields_is_a_bad_request() {
        let pool = test_pool();
        let (status, body) = send(app(&pool), post_form("/contact/", "name=John&subject=Hi", None)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains("value=\"John\""));
        assert!(!body.contains("Thank you for your message!"));
    }

    #[tokio::test]
    async fn admin_requires_credentials() {
        let pool = test_pool();
        insert_admin(&pool);

        let response = app(&pool).oneshot(get("/admin/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(response.headers().contains_key(header::WWW_AUTHENTICATE));

        let wrong = Request::builder()
            .uri("/admin/contact/")
            .header(header::AUTHORIZATION, "Basic YWRtaW46d3Jvbmc=")
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(app(&pool), wrong).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, body) = send(app(&pool), admin_get("/admin/")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("href=\"/admin/testimonial/\""));
        assert!(body.contains("href=\"/admin/testimonial/add/\""));
    }

    #[tokio::test]
    async fn changelist_searches_and_filters() {
        let pool = test_pool();
        insert_admin(&pool);
        insert_contact(&pool, "john@example.com");
        insert_contact(&pool, "jane@example.com");

        let (status, body) = send(app(&pool), admin_get("/admin/contact/?q=JANE")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("jane@example.com"));
        assert!(!body.contains("john@example.com"));

        let (_, body) = send(app(&pool), admin_get("/admin/contact/?is_read=true")).await;
        assert!(!body.contains("jane@example.com"));
    }

    #[tokio::test]
    async fn mark_as_read_only_touches_selected_messages() {
        let pool = test_pool();
        insert_admin(&pool);
        insert_contact(&pool, "a@example.com");
        insert_contact(&pool, "b@example.com");
        insert_contact(&pool, "c@example.com");

        let ids: Vec<i32> = {
            let mut conn = pool.get().unwrap();
            let mut all = Contact::all(&mut conn).unwrap();
            all.sort_by_key(|c| c.id);
            all.iter().map(|c| c.id).collect()
        };
        let body = format!("action=mark_as_read&_selected_action={}&_selected_action={}", ids[0], ids[2]);

        let (status, _) = send(app(&pool), post_form("/admin/contact/action/", body, Some(ADMIN_AUTH))).await;
        assert_eq!(status, StatusCode::SEE_OTHER);

        let mut conn = pool.get().unwrap();
        let read: Vec<(String, bool)> = Contact::all(&mut conn)
            .unwrap()
            .into_iter()
            .map(|c| (c.email, c.is_read))
            .collect();
        assert!(read.contains(&("a@example.com".to_string(), true)));
        assert!(read.contains(&("b@example.com".to_string(), false)));
        assert!(read.contains(&("c@example.com".to_string(), true)));
    }

    #[tokio::test]
    async fn unknown_actions_are_rejected() {
        let pool = test_pool();
        insert_admin(&pool);
        insert_contact(&pool, "a@example.com");

        let (status, _) = send(
            app(&pool),
            post_form("/admin/skill/action/", "action=mark_as_read&_selected_action=1", Some(ADMIN_AUTH)),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn adding_a_post_derives_its_slug() {
        let pool = test_pool();
        let author = insert_admin(&pool);
        let body = format!(
            "title=Django+Best+Practices&slug=&author_id={}&category_id=&excerpt=Tips&content=Body&published=on",
            author
        );

        let (status, _) = send(app(&pool), post_form("/admin/post/add/", body, Some(ADMIN_AUTH))).await;
        assert_eq!(status, StatusCode::SEE_OTHER);

        let mut conn = pool.get().unwrap();
        let post = Post::by_slug(&mut conn, "django-best-practices").unwrap().unwrap();
        assert!(post.published);
        assert!(!post.is_featured);
        assert_eq!(post.category_id, None);
    }

    #[tokio::test]
    async fn duplicate_slugs_re_render_the_form() {
        let pool = test_pool();
        let author = insert_admin(&pool);
        insert_post(&pool, author, "Existing", "taken", false);
        let body = format!("title=Another&slug=taken&author_id={}&excerpt=Tips&content=Body", author);

        let (status, body) = send(app(&pool), post_form("/admin/post/add/", body, Some(ADMIN_AUTH))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains("already exists"));
    }

    #[tokio::test]
    async fn change_form_keeps_created_at_readonly() {
        let pool = test_pool();
        insert_admin(&pool);
        insert_contact(&pool, "a@example.com");
        let before = {
            let mut conn = pool.get().unwrap();
            Contact::by_email(&mut conn, "a@example.com").unwrap().unwrap()
        };
        let body = "name=John&email=a%40example.com&subject=Edited&message=Hello&is_read=on&created_at=2001-01-01+00%3A00%3A00";
        let uri = format!("/admin/contact/{}/change/", before.id);

        let (status, _) = send(app(&pool), post_form(&uri, body, Some(ADMIN_AUTH))).await;
        assert_eq!(status, StatusCode::SEE_OTHER);

        let mut conn = pool.get().unwrap();
        let after = Contact::by_email(&mut conn, "a@example.com").unwrap().unwrap();
        assert_eq!(after.subject, "Edited");
        assert!(after.is_read);
        assert_eq!(after.created_at, before.created_at);
    }

    #[tokio::test]
    async fn missing_records_are_not_found() {
        let pool = test_pool();
        insert_admin(&pool);

        let (status, _) = send(app(&pool), admin_get("/admin/project/99/change/")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
