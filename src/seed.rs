//! Sample content for a fresh install. Every record is get-or-create on a
//! natural key, so seeding twice leaves the store unchanged.

use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;

use anyhow::anyhow;
use chrono::NaiveDate;
use diesel::prelude::*;
use log::info;
use rand::Rng;

use crate::auth::hash_password;
use crate::models::{
    now, Category, Certification, Contact, Education, Experience, NewCategory, NewCertification, NewContact,
    NewEducation, NewExperience, NewPost, NewProject, NewSkill, NewTestimonial, NewUser, Post, Project, Skill,
    SkillCategory, Testimonial, User,
};
use crate::schema::{
    categories, certifications, contacts, education, experiences, posts, projects, skills, testimonials,
};
use crate::slug_util::slugify;

#[derive(Debug, Clone)]
pub struct SeedUser {
    pub username: &'static str,
    pub email: &'static str,
    pub first_name: &'static str,
    pub last_name: &'static str,
    pub password: &'static str,
}

#[derive(Debug, Clone)]
pub struct SeedCategory {
    pub name: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone)]
pub struct SeedPost {
    pub title: &'static str,
    pub excerpt: &'static str,
    pub content: &'static str,
    /// Category name; unknown names fall back to the first category.
    pub category: &'static str,
    pub is_featured: bool,
}

#[derive(Debug, Clone)]
pub struct SeedProject {
    pub title: &'static str,
    pub description: &'static str,
    pub technologies: &'static str,
    pub is_featured: bool,
}

#[derive(Debug, Clone)]
pub struct SeedSkill {
    pub name: &'static str,
    pub percentage: i32,
    pub category: SkillCategory,
    pub display_order: i32,
}

#[derive(Debug, Clone)]
pub struct SeedExperience {
    pub position: &'static str,
    pub company: &'static str,
    pub start_date: NaiveDate,
    pub description: &'static str,
    pub responsibilities: &'static str,
    pub is_current: bool,
}

#[derive(Debug, Clone)]
pub struct SeedEducation {
    pub degree: &'static str,
    pub institution: &'static str,
    pub start_year: i32,
    pub end_year: Option<i32>,
}

#[derive(Debug, Clone)]
pub struct SeedCertification {
    pub name: &'static str,
    pub issuing_organization: &'static str,
    pub issue_date: NaiveDate,
}

#[derive(Debug, Clone)]
pub struct SeedContact {
    pub name: &'static str,
    pub email: &'static str,
    pub subject: &'static str,
    pub message: &'static str,
}

#[derive(Debug, Clone)]
pub struct SeedTestimonial {
    pub name: &'static str,
    pub position: &'static str,
    pub company: &'static str,
    pub content: &'static str,
    pub rating: i32,
    pub is_featured: bool,
}

#[derive(Debug, Clone)]
pub struct SeedData {
    /// Author of every seeded post.
    pub admin: SeedUser,
    pub categories: Vec<SeedCategory>,
    pub posts: Vec<SeedPost>,
    pub projects: Vec<SeedProject>,
    pub skills: Vec<SeedSkill>,
    pub experiences: Vec<SeedExperience>,
    pub education: Vec<SeedEducation>,
    pub certifications: Vec<SeedCertification>,
    pub contacts: Vec<SeedContact>,
    pub testimonials: Vec<SeedTestimonial>,
}

fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

pub fn sample_data() -> SeedData {
    SeedData {
        admin: SeedUser {
            username: "admin",
            email: "admin@example.com",
            first_name: "Steve",
            last_name: "Ongera",
            password: "admin123",
        },
        categories: vec![
            SeedCategory { name: "Technology", description: "Latest tech trends and innovations" },
            SeedCategory { name: "Programming", description: "Coding tutorials and best practices" },
            SeedCategory { name: "Django", description: "Django framework tutorials" },
            SeedCategory { name: "Python", description: "Python programming guides" },
            SeedCategory { name: "JavaScript", description: "JavaScript and frameworks" },
            SeedCategory { name: "Tutorial", description: "Step-by-step tutorials" },
        ],
        posts: vec![
            SeedPost {
                title: "What is a Virtual Assistant",
                excerpt: "Discover how virtual assistants are revolutionizing the way we work.",
                content: "Virtual assistants are AI-powered software programs that help automate tasks...",
                category: "Technology",
                is_featured: true,
            },
            SeedPost {
                title: "Django Best Practices",
                excerpt: "Learn essential best practices for building Django applications.",
                content: "Django is a powerful framework. Following best practices ensures...",
                category: "Django",
                is_featured: true,
            },
        ],
        projects: vec![SeedProject {
            title: "E-Commerce Platform",
            description: "Full-featured e-commerce platform with Django and React.",
            technologies: "Django, React, PostgreSQL, Stripe",
            is_featured: true,
        }],
        skills: vec![
            SeedSkill { name: "Python/Django", percentage: 95, category: SkillCategory::Backend, display_order: 1 },
            SeedSkill { name: "JavaScript/React", percentage: 85, category: SkillCategory::Frontend, display_order: 2 },
            SeedSkill { name: "PostgreSQL", percentage: 90, category: SkillCategory::Database, display_order: 3 },
        ],
        experiences: vec![SeedExperience {
            position: "Senior Django Developer",
            company: "Tech Solutions Ltd",
            start_date: ymd(2023, 1, 1),
            description: "Leading web development projects.",
            responsibilities: "Lead development\nMentor juniors\nCode reviews",
            is_current: true,
        }],
        education: vec![SeedEducation {
            degree: "BSc Computer Science",
            institution: "University of Nairobi",
            start_year: 2016,
            end_year: Some(2020),
        }],
        certifications: vec![SeedCertification {
            name: "AWS Developer Associate",
            issuing_organization: "Amazon",
            issue_date: ymd(2023, 1, 1),
        }],
        contacts: vec![SeedContact {
            name: "John Doe",
            email: "john@example.com",
            subject: "Project Inquiry",
            message: "Hi, I would like to discuss a project.",
        }],
        testimonials: vec![SeedTestimonial {
            name: "Jane Smith",
            position: "CEO",
            company: "Tech Corp",
            content: "Steve is an excellent developer!",
            rating: 5,
            is_featured: true,
        }],
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedKind {
    User,
    Category,
    Post,
    Project,
    Skill,
    Experience,
    Education,
    Certification,
    Contact,
    Testimonial,
}

impl SeedKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SeedKind::User => "user",
            SeedKind::Category => "category",
            SeedKind::Post => "post",
            SeedKind::Project => "project",
            SeedKind::Skill => "skill",
            SeedKind::Experience => "experience",
            SeedKind::Education => "education",
            SeedKind::Certification => "certification",
            SeedKind::Contact => "contact",
            SeedKind::Testimonial => "testimonial",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedEntry {
    pub kind: SeedKind,
    pub label: String,
    pub created: bool,
}

impl fmt::Display for SeedEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.created {
            write!(f, "  ✓ Created {}: {}", self.kind.as_str(), self.label)
        } else {
            write!(f, "  - {} already exists: {}", self.kind.as_str(), self.label)
        }
    }
}

#[derive(Debug, Default)]
pub struct SeedReport {
    pub entries: Vec<SeedEntry>,
}

impl SeedReport {
    pub fn created(&self) -> usize {
        self.entries.iter().filter(|e| e.created).count()
    }

    pub fn skipped(&self) -> usize {
        self.entries.iter().filter(|e| !e.created).count()
    }
}

/// Natural keys already present in the store.
#[derive(Debug, Default)]
pub struct ExistingKeys {
    pub users: HashSet<String>,
    pub categories: HashSet<String>,
    pub posts: HashSet<String>,
    pub projects: HashSet<String>,
    pub skills: HashSet<String>,
    pub experiences: HashSet<(String, String)>,
    pub education: HashSet<(String, String, i32, Option<i32>)>,
    pub certifications: HashSet<(String, String, NaiveDate)>,
    pub contacts: HashSet<String>,
    pub testimonials: HashSet<(String, String)>,
}

impl ExistingKeys {
    pub fn load(conn: &mut SqliteConnection) -> QueryResult<Self> {
        Ok(Self {
            users: User::all(conn)?.into_iter().map(|u| u.username).collect(),
            categories: Category::all(conn)?.into_iter().map(|c| c.name).collect(),
            posts: posts::table.select(posts::title).load::<String>(conn)?.into_iter().collect(),
            projects: Project::all(conn)?.into_iter().map(|p| p.title).collect(),
            skills: Skill::all(conn)?.into_iter().map(|s| s.name).collect(),
            experiences: Experience::all(conn)?
                .into_iter()
                .map(|e| (e.position, e.company))
                .collect(),
            education: Education::all(conn)?
                .into_iter()
                .map(|e| (e.degree, e.institution, e.start_year, e.end_year))
                .collect(),
            certifications: Certification::all(conn)?
                .into_iter()
                .map(|c| (c.name, c.issuing_organization, c.issue_date))
                .collect(),
            contacts: Contact::all(conn)?.into_iter().map(|c| c.email).collect(),
            testimonials: Testimonial::all(conn)?
                .into_iter()
                .map(|t| (t.name, t.company))
                .collect(),
        })
    }
}

/// The records of a dataset that are missing from the store, plus one
/// report entry per record.
#[derive(Debug)]
pub struct SeedPlan<'a> {
    pub admin: Option<&'a SeedUser>,
    pub categories: Vec<&'a SeedCategory>,
    pub posts: Vec<&'a SeedPost>,
    pub projects: Vec<&'a SeedProject>,
    pub skills: Vec<&'a SeedSkill>,
    pub experiences: Vec<&'a SeedExperience>,
    pub education: Vec<&'a SeedEducation>,
    pub certifications: Vec<&'a SeedCertification>,
    pub contacts: Vec<&'a SeedContact>,
    pub testimonials: Vec<&'a SeedTestimonial>,
    pub report: SeedReport,
}

fn select_missing<'a, T, K>(
    kind: SeedKind,
    items: &'a [T],
    existing: &HashSet<K>,
    key: impl Fn(&T) -> K,
    label: impl Fn(&T) -> String,
    report: &mut SeedReport,
) -> Vec<&'a T>
where
    K: Eq + Hash,
{
    let mut seen = HashSet::new();
    let mut missing = Vec::new();
    for item in items {
        let k = key(item);
        let created = !existing.contains(&k) && seen.insert(k);
        report.entries.push(SeedEntry {
            kind,
            label: label(item),
            created,
        });
        if created {
            missing.push(item);
        }
    }
    missing
}

/// Decides what to create without touching the store.
pub fn plan<'a>(existing: &ExistingKeys, data: &'a SeedData) -> SeedPlan<'a> {
    let mut report = SeedReport::default();

    let admin = select_missing(
        SeedKind::User,
        std::slice::from_ref(&data.admin),
        &existing.users,
        |u| u.username.to_string(),
        |u| u.username.to_string(),
        &mut report,
    )
    .pop();
    let categories = select_missing(
        SeedKind::Category,
        &data.categories,
        &existing.categories,
        |c| c.name.to_string(),
        |c| c.name.to_string(),
        &mut report,
    );
    let posts = select_missing(
        SeedKind::Post,
        &data.posts,
        &existing.posts,
        |p| p.title.to_string(),
        |p| p.title.to_string(),
        &mut report,
    );
    let projects = select_missing(
        SeedKind::Project,
        &data.projects,
        &existing.projects,
        |p| p.title.to_string(),
        |p| p.title.to_string(),
        &mut report,
    );
    let skills = select_missing(
        SeedKind::Skill,
        &data.skills,
        &existing.skills,
        |s| s.name.to_string(),
        |s| s.name.to_string(),
        &mut report,
    );
    let experiences = select_missing(
        SeedKind::Experience,
        &data.experiences,
        &existing.experiences,
        |e| (e.position.to_string(), e.company.to_string()),
        |e| e.position.to_string(),
        &mut report,
    );
    let education = select_missing(
        SeedKind::Education,
        &data.education,
        &existing.education,
        |e| (e.degree.to_string(), e.institution.to_string(), e.start_year, e.end_year),
        |e| e.degree.to_string(),
        &mut report,
    );
    let certifications = select_missing(
        SeedKind::Certification,
        &data.certifications,
        &existing.certifications,
        |c| (c.name.to_string(), c.issuing_organization.to_string(), c.issue_date),
        |c| c.name.to_string(),
        &mut report,
    );
    let contacts = select_missing(
        SeedKind::Contact,
        &data.contacts,
        &existing.contacts,
        |c| c.email.to_string(),
        |c| c.name.to_string(),
        &mut report,
    );
    let testimonials = select_missing(
        SeedKind::Testimonial,
        &data.testimonials,
        &existing.testimonials,
        |t| (t.name.to_string(), t.company.to_string()),
        |t| t.name.to_string(),
        &mut report,
    );

    SeedPlan {
        admin,
        categories,
        posts,
        projects,
        skills,
        experiences,
        education,
        certifications,
        contacts,
        testimonials,
        report,
    }
}

/// Deletes every content record. Users are kept.
pub fn clear_all(conn: &mut SqliteConnection) -> QueryResult<usize> {
    let mut deleted = diesel::delete(posts::table).execute(conn)?;
    deleted += diesel::delete(categories::table).execute(conn)?;
    deleted += diesel::delete(projects::table).execute(conn)?;
    deleted += diesel::delete(skills::table).execute(conn)?;
    deleted += diesel::delete(experiences::table).execute(conn)?;
    deleted += diesel::delete(education::table).execute(conn)?;
    deleted += diesel::delete(certifications::table).execute(conn)?;
    deleted += diesel::delete(contacts::table).execute(conn)?;
    deleted += diesel::delete(testimonials::table).execute(conn)?;
    Ok(deleted)
}

fn apply(conn: &mut SqliteConnection, data: &SeedData, plan: &SeedPlan) -> anyhow::Result<()> {
    let created = now();

    if let Some(admin) = plan.admin {
        let password_hash = hash_password(admin.password)?;
        User::insert(
            conn,
            &NewUser {
                username: admin.username,
                email: admin.email,
                first_name: admin.first_name,
                last_name: admin.last_name,
                password_hash: &password_hash,
                is_staff: true,
                is_superuser: true,
                date_joined: created,
            },
        )?;
    }

    for category in &plan.categories {
        Category::insert(
            conn,
            &NewCategory {
                name: category.name,
                slug: &slugify(category.name),
                description: category.description,
                created_at: created,
            },
        )?;
    }

    if !plan.posts.is_empty() {
        let author = User::by_username(conn, data.admin.username)?
            .ok_or_else(|| anyhow!("seed author {:?} is missing", data.admin.username))?;
        let all_categories = Category::all(conn)?;
        let fallback = data
            .categories
            .first()
            .and_then(|first| all_categories.iter().find(|c| c.name == first.name));
        let mut rng = rand::thread_rng();

        for post in &plan.posts {
            let category = all_categories
                .iter()
                .find(|c| c.name == post.category)
                .or(fallback);
            Post::insert(
                conn,
                &NewPost {
                    title: post.title,
                    slug: &slugify(post.title),
                    author_id: author.id,
                    category_id: category.map(|c| c.id),
                    excerpt: post.excerpt,
                    content: post.content,
                    image: None,
                    is_featured: post.is_featured,
                    views: rng.gen_range(50..=500),
                    created_at: created,
                    updated_at: created,
                    published: true,
                },
            )?;
        }
    }

    for project in &plan.projects {
        Project::insert(
            conn,
            &NewProject {
                title: project.title,
                slug: &slugify(project.title),
                description: project.description,
                technologies: project.technologies,
                image: None,
                demo_link: None,
                github_link: None,
                is_featured: project.is_featured,
                display_order: 0,
                created_at: created,
                updated_at: created,
            },
        )?;
    }

    for skill in &plan.skills {
        Skill::insert(
            conn,
            &NewSkill {
                name: skill.name,
                percentage: skill.percentage,
                category: skill.category,
                display_order: skill.display_order,
            },
        )?;
    }

    for experience in &plan.experiences {
        Experience::insert(
            conn,
            &NewExperience {
                position: experience.position,
                company: experience.company,
                location: "",
                start_date: experience.start_date,
                end_date: None,
                description: experience.description,
                responsibilities: experience.responsibilities,
                is_current: experience.is_current,
                display_order: 0,
            },
        )?;
    }

    for entry in &plan.education {
        Education::insert(
            conn,
            &NewEducation {
                degree: entry.degree,
                institution: entry.institution,
                location: "",
                start_year: entry.start_year,
                end_year: entry.end_year,
                description: "",
                grade: "",
                display_order: 0,
            },
        )?;
    }

    for certification in &plan.certifications {
        Certification::insert(
            conn,
            &NewCertification {
                name: certification.name,
                issuing_organization: certification.issuing_organization,
                issue_date: certification.issue_date,
                expiry_date: None,
                credential_id: "",
                credential_url: "",
            },
        )?;
    }

    for contact in &plan.contacts {
        Contact::insert(
            conn,
            &NewContact {
                name: contact.name,
                email: contact.email,
                subject: contact.subject,
                message: contact.message,
                created_at: created,
                is_read: false,
            },
        )?;
    }

    for testimonial in &plan.testimonials {
        Testimonial::insert(
            conn,
            &NewTestimonial {
                name: testimonial.name,
                position: testimonial.position,
                company: testimonial.company,
                image: None,
                content: testimonial.content,
                rating: testimonial.rating,
                is_featured: testimonial.is_featured,
                created_at: created,
            },
        )?;
    }

    Ok(())
}

/// Seeds `data` in one transaction, optionally clearing content first.
/// Nothing is written when any insert fails.
pub fn run(conn: &mut SqliteConnection, data: &SeedData, clear: bool) -> anyhow::Result<SeedReport> {
    conn.transaction::<_, anyhow::Error, _>(|conn| {
        if clear {
            let deleted = clear_all(conn)?;
            info!("cleared {} records", deleted);
        }
        let existing = ExistingKeys::load(conn)?;
        let plan = plan(&existing, data);
        apply(conn, data, &plan)?;
        info!(
            "seeded {} records, {} already present",
            plan.report.created(),
            plan.report.skipped()
        );
        Ok(plan.report)
    })
}

#[cfg(test)]
mod test {
    use diesel::prelude::*;

    use super::*;
    use crate::schema::{posts, users};
    use crate::test_util::test_conn;

    const RECORDS: usize = 18;

    #[test]
    fn planning_against_an_empty_store_creates_everything() {
        let data = sample_data();
        let plan = plan(&ExistingKeys::default(), &data);
        assert_eq!(plan.report.created(), RECORDS);
        assert_eq!(plan.categories.len(), 6);
        assert!(plan.admin.is_some());
    }

    #[test]
    fn planning_skips_known_keys_and_dataset_duplicates() {
        let mut data = sample_data();
        data.skills.push(data.skills[0].clone());
        let mut existing = ExistingKeys::default();
        existing.categories.insert("Django".into());
        existing
            .education
            .insert(("BSc Computer Science".into(), "University of Nairobi".into(), 2016, Some(2020)));

        let plan = plan(&existing, &data);
        assert_eq!(plan.categories.len(), 5);
        assert_eq!(plan.skills.len(), 3);
        assert!(plan.education.is_empty());
        assert_eq!(plan.report.skipped(), 3);
    }

    #[test]
    fn seeding_twice_is_idempotent() {
        let mut conn = test_conn();
        let data = sample_data();

        let first = run(&mut conn, &data, false).unwrap();
        assert_eq!(first.created(), RECORDS);
        assert_eq!(first.skipped(), 0);

        let second = run(&mut conn, &data, false).unwrap();
        assert_eq!(second.created(), 0);
        assert_eq!(second.skipped(), RECORDS);
        assert_eq!(Category::all(&mut conn).unwrap().len(), 6);
        assert_eq!(Post::summaries(&mut conn).unwrap().len(), 2);
    }

    #[test]
    fn clearing_reseeds_a_single_pass() {
        let mut conn = test_conn();
        let data = sample_data();
        run(&mut conn, &data, false).unwrap();

        let report = run(&mut conn, &data, true).unwrap();
        assert_eq!(report.created(), RECORDS - 1);
        assert_eq!(report.skipped(), 1);
        assert_eq!(Category::all(&mut conn).unwrap().len(), 6);
        assert_eq!(Contact::all(&mut conn).unwrap().len(), 1);
        assert_eq!(User::all(&mut conn).unwrap().len(), 1);
    }

    #[test]
    fn seeded_posts_link_author_and_category() {
        let mut conn = test_conn();
        run(&mut conn, &sample_data(), false).unwrap();

        let summaries = Post::summaries(&mut conn).unwrap();
        let django = summaries
            .iter()
            .find(|s| s.post.title == "Django Best Practices")
            .unwrap();
        assert_eq!(django.author, "admin");
        assert_eq!(django.category.as_deref(), Some("Django"));
        assert_eq!(django.post.slug, "django-best-practices");
        assert!((50..=500).contains(&django.post.views));
        assert!(django.post.published);
    }

    #[test]
    fn seeded_admin_password_verifies() {
        let mut conn = test_conn();
        run(&mut conn, &sample_data(), false).unwrap();

        let admin = User::by_username(&mut conn, "admin").unwrap().unwrap();
        assert!(admin.is_staff && admin.is_superuser);
        assert!(crate::auth::verify_password("admin123", &admin.password_hash).unwrap());
    }

    #[test]
    fn slug_collision_rolls_back_the_whole_run() {
        let mut conn = test_conn();
        Category::insert(
            &mut conn,
            &NewCategory {
                name: "Tech",
                slug: "technology",
                description: "",
                created_at: now(),
            },
        )
        .unwrap();

        assert!(run(&mut conn, &sample_data(), false).is_err());
        assert!(User::all(&mut conn).unwrap().is_empty());
        assert_eq!(Category::all(&mut conn).unwrap().len(), 1);
    }

    #[test]
    fn deleting_an_author_removes_their_posts() {
        let mut conn = test_conn();
        run(&mut conn, &sample_data(), false).unwrap();

        diesel::delete(users::table.filter(users::username.eq("admin")))
            .execute(&mut conn)
            .unwrap();
        let remaining: i64 = posts::table.count().get_result(&mut conn).unwrap();
        assert_eq!(remaining, 0);
    }

    #[test]
    fn deleting_a_category_keeps_its_posts() {
        let mut conn = test_conn();
        run(&mut conn, &sample_data(), false).unwrap();

        diesel::delete(categories::table.filter(categories::name.eq("Django")))
            .execute(&mut conn)
            .unwrap();
        let post = Post::by_title(&mut conn, "Django Best Practices").unwrap().unwrap();
        assert_eq!(post.category_id, None);
    }
}
