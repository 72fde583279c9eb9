use crate::errors::FormError;
use crate::SLUG_MAX_LENGTH;

/// Builds a URL-safe slug: ASCII letters, digits and underscores are kept
/// (lowercased), runs of whitespace and hyphens collapse to one hyphen, and
/// everything else is dropped.
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_hyphen = false;

    for c in input.chars() {
        if c.is_ascii_alphanumeric() || c == '_' {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c.to_ascii_lowercase());
        } else if c.is_whitespace() || c == '-' {
            pending_hyphen = true;
        }
    }

    truncate(slug, SLUG_MAX_LENGTH)
}

fn truncate(mut slug: String, max: usize) -> String {
    if slug.len() > max {
        slug.truncate(max);
        while slug.ends_with('-') {
            slug.pop();
        }
    }
    slug
}

/// Letters, digits, underscores and hyphens only, at most
/// `SLUG_MAX_LENGTH` bytes.
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug.len() <= SLUG_MAX_LENGTH
        && slug
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Checks the submitted slug, or derives one from `source` when the
/// submitted value is blank.
pub fn slug_or_derive(submitted: &str, source: &str) -> Result<String, FormError> {
    let submitted = submitted.trim();
    if submitted.is_empty() {
        let derived = slugify(source);
        if derived.is_empty() {
            return Err(FormError::MissingField("slug".into()));
        }
        return Ok(derived);
    }

    if submitted.len() > SLUG_MAX_LENGTH {
        return Err(FormError::Invalid(
            "slug".into(),
            format!("must be at most {} characters", SLUG_MAX_LENGTH),
        ));
    }
    if !is_valid_slug(submitted) {
        return Err(FormError::Invalid(
            "slug".into(),
            "use only letters, numbers, underscores or hyphens".into(),
        ));
    }
    Ok(submitted.to_string())
}

#[cfg(test)]
mod test {
    use super::{is_valid_slug, slug_or_derive, slugify};
    use crate::errors::FormError;

    #[test]
    fn it_lowercases_and_hyphenates() {
        assert_eq!(slugify("What is a Virtual Assistant"), "what-is-a-virtual-assistant");
    }

    #[test]
    fn it_keeps_existing_hyphens_single() {
        assert_eq!(slugify("E-Commerce Platform"), "e-commerce-platform");
        assert_eq!(slugify("REST  -  API"), "rest-api");
    }

    #[test]
    fn it_drops_punctuation() {
        assert_eq!(slugify("Django: Best Practices!"), "django-best-practices");
        assert_eq!(slugify("How to make toys from old Oldpaper?"), "how-to-make-toys-from-old-oldpaper");
    }

    #[test]
    fn it_trims_leading_and_trailing_separators() {
        assert_eq!(slugify("  -- Tutorial --  "), "tutorial");
    }

    #[test]
    fn it_truncates_without_a_trailing_hyphen() {
        let slug = slugify("testing stuff this is a really long title that keeps going on");
        assert!(slug.len() <= 50);
        assert!(!slug.ends_with('-'));
        assert!(slug.starts_with("testing-stuff-this-is"));
    }

    #[test]
    fn it_prefers_a_submitted_slug() {
        assert_eq!(slug_or_derive("custom-slug", "Some Title").unwrap(), "custom-slug");
        assert_eq!(slug_or_derive(" Custom_Slug_2 ", "Some Title").unwrap(), "Custom_Slug_2");
        assert_eq!(slug_or_derive("   ", "Some Title").unwrap(), "some-title");
    }

    #[test]
    fn it_rejects_a_slug_that_is_not_url_safe() {
        for bad in ["Not A Slug!", "a/b?c=d#e", "caf\u{e9}"] {
            assert!(
                matches!(slug_or_derive(bad, "Title"), Err(FormError::Invalid(ref f, _)) if f == "slug"),
                "{:?} was accepted",
                bad
            );
        }
    }

    #[test]
    fn it_rejects_a_slug_over_the_column_width() {
        let long = "x".repeat(80);
        assert!(matches!(
            slug_or_derive(&long, "Title"),
            Err(FormError::Invalid(ref f, _)) if f == "slug"
        ));
        assert!(slug_or_derive(&"x".repeat(50), "Title").is_ok());
    }

    #[test]
    fn it_needs_something_to_derive_from() {
        assert!(matches!(
            slug_or_derive("", "!!!"),
            Err(FormError::MissingField(ref f)) if f == "slug"
        ));
    }

    #[test]
    fn derived_slugs_are_valid() {
        assert!(is_valid_slug(&slugify("What is a Virtual Assistant")));
        assert!(!is_valid_slug(""));
    }
}
