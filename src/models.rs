mod category;
mod certification;
mod contact;
mod education;
mod experience;
mod post;
mod project;
mod skill;
mod testimonial;
mod user;

pub use category::{Category, NewCategory};
pub use certification::{Certification, NewCertification};
pub use contact::{Contact, NewContact};
pub use education::{Education, NewEducation};
pub use experience::{Experience, NewExperience};
pub use post::{NewPost, Post, PostSummary};
pub use project::{NewProject, Project};
pub use skill::{NewSkill, Skill, SkillCategory};
pub use testimonial::{NewTestimonial, Testimonial};
pub use user::{NewUser, User};

pub fn now() -> chrono::NaiveDateTime {
    chrono::Utc::now().naive_utc()
}
