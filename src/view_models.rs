use serde::Serialize;

use crate::models::{Certification, Education, Experience, PostSummary, Project, Skill, Testimonial};

/// Card in the home page's featured strip.
#[derive(Debug, Serialize)]
pub struct FeaturedPost {
    pub title: String,
    pub slug: String,
    /// e.g. "04 Apr 2022"
    pub date: String,
    pub image: Option<String>,
    pub category: Option<String>,
}

impl From<&PostSummary> for FeaturedPost {
    fn from(summary: &PostSummary) -> Self {
        Self {
            title: summary.post.title.clone(),
            slug: summary.post.slug.clone(),
            date: summary.post.created_at.format("%d %b %Y").to_string(),
            image: summary.post.image.clone(),
            category: summary.category.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RecentPost {
    pub title: String,
    pub slug: String,
    pub author: String,
    /// e.g. "24 July 2022"
    pub date: String,
    /// ISO date for `<time datetime>`.
    pub published: String,
    pub excerpt: String,
    pub image: Option<String>,
    pub category: Option<String>,
}

impl From<&PostSummary> for RecentPost {
    fn from(summary: &PostSummary) -> Self {
        Self {
            title: summary.post.title.clone(),
            slug: summary.post.slug.clone(),
            author: summary.author.clone(),
            date: summary.post.created_at.format("%d %B %Y").to_string(),
            published: summary.post.created_at.format("%Y-%m-%d").to_string(),
            excerpt: summary.post.excerpt.clone(),
            image: summary.post.image.clone(),
            category: summary.category.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SkillBar {
    pub name: String,
    pub percentage: i32,
    pub category: String,
}

impl From<&Skill> for SkillBar {
    fn from(skill: &Skill) -> Self {
        Self {
            name: skill.name.clone(),
            percentage: skill.percentage,
            category: skill.category.label().into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TestimonialCard {
    pub name: String,
    pub position: String,
    pub company: String,
    pub image: Option<String>,
    pub content: String,
    pub rating: i32,
}

impl From<&Testimonial> for TestimonialCard {
    fn from(t: &Testimonial) -> Self {
        Self {
            name: t.name.clone(),
            position: t.position.clone(),
            company: t.company.clone(),
            image: t.image.clone(),
            content: t.content.clone(),
            rating: t.rating,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProjectCard {
    pub title: String,
    pub slug: String,
    pub description: String,
    pub technologies: Vec<String>,
    pub image: Option<String>,
    pub link: Option<String>,
    pub github: Option<String>,
    pub is_featured: bool,
}

impl From<&Project> for ProjectCard {
    fn from(project: &Project) -> Self {
        Self {
            title: project.title.clone(),
            slug: project.slug.clone(),
            description: project.description.clone(),
            technologies: project.technologies_list(),
            image: project.image.clone(),
            link: project.demo_link.clone(),
            github: project.github_link.clone(),
            is_featured: project.is_featured,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct EducationEntry {
    pub degree: String,
    pub institution: String,
    pub year: String,
    pub description: String,
    pub grade: String,
}

impl From<&Education> for EducationEntry {
    fn from(e: &Education) -> Self {
        Self {
            degree: e.degree.clone(),
            institution: e.institution.clone(),
            year: e.year_range(),
            description: e.description.clone(),
            grade: e.grade.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ExperienceEntry {
    pub position: String,
    pub company: String,
    pub location: String,
    pub period: String,
    pub responsibilities: Vec<String>,
}

impl From<&Experience> for ExperienceEntry {
    fn from(e: &Experience) -> Self {
        Self {
            position: e.position.clone(),
            company: e.company.clone(),
            location: e.location.clone(),
            period: e.period(),
            responsibilities: e.responsibilities_list(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CertificationEntry {
    pub name: String,
    pub issuing_organization: String,
    pub credential_url: Option<String>,
}

impl From<&Certification> for CertificationEntry {
    fn from(c: &Certification) -> Self {
        Self {
            name: c.name.clone(),
            issuing_organization: c.issuing_organization.clone(),
            credential_url: crate::forms::non_blank(&c.credential_url).map(String::from),
        }
    }
}
