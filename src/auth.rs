use anyhow::anyhow;
use argon2::{
    password_hash::{rand_core::OsRng, Error as HashError, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};

pub fn hash_password(password: &str) -> Result<String, anyhow::Error> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| anyhow!("password hashing failed: {}", e))
}

pub fn verify_password(password: &str, hashed: &str) -> Result<bool, anyhow::Error> {
    let parsed = PasswordHash::new(hashed).map_err(|e| anyhow!("invalid password hash: {}", e))?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(HashError::Password) => Ok(false),
        Err(e) => Err(anyhow!("password verification failed: {}", e)),
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct BasicCredentials {
    pub username: String,
    pub password: String,
}

impl BasicCredentials {
    /// Parses an `Authorization: Basic <base64(user:pass)>` header value.
    pub fn from_header(value: &str) -> Option<Self> {
        let (scheme, encoded) = value.trim().split_once(' ')?;
        if !scheme.eq_ignore_ascii_case("basic") {
            return None;
        }
        let decoded = STANDARD.decode(encoded.trim()).ok()?;
        let decoded = String::from_utf8(decoded).ok()?;
        let (username, password) = decoded.split_once(':')?;
        Some(Self {
            username: username.into(),
            password: password.into(),
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn it_parses_basic_credentials() {
        // admin:admin123
        let creds = BasicCredentials::from_header("Basic YWRtaW46YWRtaW4xMjM=").unwrap();
        assert_eq!(creds.username, "admin");
        assert_eq!(creds.password, "admin123");
    }

    #[test]
    fn it_keeps_colons_in_the_password() {
        let header = format!("basic {}", STANDARD.encode("admin:a:b"));
        let creds = BasicCredentials::from_header(&header).unwrap();
        assert_eq!(creds.password, "a:b");
    }

    #[test]
    fn it_rejects_other_schemes_and_garbage() {
        assert_eq!(BasicCredentials::from_header("Bearer abc"), None);
        assert_eq!(BasicCredentials::from_header("Basic !!!"), None);
        assert_eq!(BasicCredentials::from_header(&format!("Basic {}", STANDARD.encode("nocolon"))), None);
    }

    #[test]
    fn hashed_passwords_verify() {
        let hash = hash_password("admin123").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("admin123", &hash).unwrap());
        assert!(!verify_password("wrong", &hash).unwrap());
    }
}
