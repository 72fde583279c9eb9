table! {
    users (id) {
        id -> Integer,
        username -> Text,
        email -> Text,
        first_name -> Text,
        last_name -> Text,
        password_hash -> Text,
        is_staff -> Bool,
        is_superuser -> Bool,
        date_joined -> Timestamp,
    }
}

table! {
    categories (id) {
        id -> Integer,
        name -> Text,
        slug -> Text,
        description -> Text,
        created_at -> Timestamp,
    }
}

table! {
    posts (id) {
        id -> Integer,
        title -> Text,
        slug -> Text,
        author_id -> Integer,
        category_id -> Nullable<Integer>,
        excerpt -> Text,
        content -> Text,
        image -> Nullable<Text>,
        is_featured -> Bool,
        views -> Integer,
        created_at -> Timestamp,
        updated_at -> Timestamp,
        published -> Bool,
    }
}

table! {
    projects (id) {
        id -> Integer,
        title -> Text,
        slug -> Text,
        description -> Text,
        technologies -> Text,
        image -> Nullable<Text>,
        demo_link -> Nullable<Text>,
        github_link -> Nullable<Text>,
        is_featured -> Bool,
        display_order -> Integer,
        created_at -> Timestamp,
        updated_at -> Timestamp,
    }
}

table! {
    skills (id) {
        id -> Integer,
        name -> Text,
        percentage -> Integer,
        category -> Text,
        display_order -> Integer,
    }
}

table! {
    experiences (id) {
        id -> Integer,
        position -> Text,
        company -> Text,
        location -> Text,
        start_date -> Date,
        end_date -> Nullable<Date>,
        description -> Text,
        responsibilities -> Text,
        is_current -> Bool,
        display_order -> Integer,
    }
}

table! {
    education (id) {
        id -> Integer,
        degree -> Text,
        institution -> Text,
        location -> Text,
        start_year -> Integer,
        end_year -> Nullable<Integer>,
        description -> Text,
        grade -> Text,
        display_order -> Integer,
    }
}

table! {
    certifications (id) {
        id -> Integer,
        name -> Text,
        issuing_organization -> Text,
        issue_date -> Date,
        expiry_date -> Nullable<Date>,
        credential_id -> Text,
        credential_url -> Text,
    }
}

table! {
    contacts (id) {
        id -> Integer,
        name -> Text,
        email -> Text,
        subject -> Text,
        message -> Text,
        created_at -> Timestamp,
        is_read -> Bool,
    }
}

table! {
    testimonials (id) {
        id -> Integer,
        name -> Text,
        position -> Text,
        company -> Text,
        image -> Nullable<Text>,
        content -> Text,
        rating -> Integer,
        is_featured -> Bool,
        created_at -> Timestamp,
    }
}

joinable!(posts -> users (author_id));
joinable!(posts -> categories (category_id));

allow_tables_to_appear_in_same_query!(
    categories,
    certifications,
    contacts,
    education,
    experiences,
    posts,
    projects,
    skills,
    testimonials,
    users,
);
