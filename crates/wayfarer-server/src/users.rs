//! User accounts over a flat JSON file.
//!
//! Passwords are stored as SHA-256 hex digests and never leave this module;
//! every public result strips the hash before it can reach a response body.
//! File access is serialized with a mutex so concurrent connection threads
//! cannot interleave read-modify-write cycles.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

const MIN_PASSWORD_LENGTH: usize = 6;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: String,
    pub email: String,
    password: String,
    pub first_name: String,
    pub last_name: String,
    pub created_at: String,
    pub updated_at: String,
    #[serde(default)]
    pub preferences: Map<String, Value>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
struct UserFile {
    users: Vec<UserRecord>,
}

/// Public view of a user, without the password hash.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub created_at: String,
    pub updated_at: String,
    pub preferences: Map<String, Value>,
}

impl From<&UserRecord> for UserProfile {
    fn from(record: &UserRecord) -> Self {
        Self {
            id: record.id.clone(),
            email: record.email.clone(),
            first_name: record.first_name.clone(),
            last_name: record.last_name.clone(),
            created_at: record.created_at.clone(),
            updated_at: record.updated_at.clone(),
            preferences: record.preferences.clone(),
        }
    }
}

/// Outcome of an account operation, serialized directly as the response body.
#[derive(Clone, Debug, Serialize)]
pub struct AuthOutcome {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserProfile>,
}

impl AuthOutcome {
    fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            user: None,
        }
    }

    fn success(message: impl Into<String>, user: Option<UserProfile>) -> Self {
        Self {
            success: true,
            message: message.into(),
            user,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

pub struct UserStore {
    users_path: PathBuf,
    file_lock: Mutex<()>,
}

impl UserStore {
    pub fn new(users_path: impl Into<PathBuf>) -> Self {
        Self {
            users_path: users_path.into(),
            file_lock: Mutex::new(()),
        }
    }

    pub fn users_path(&self) -> &Path {
        &self.users_path
    }

    pub fn register(&self, request: &RegisterRequest) -> AuthOutcome {
        if request.email.trim().is_empty()
            || request.password.is_empty()
            || request.first_name.trim().is_empty()
            || request.last_name.trim().is_empty()
        {
            return AuthOutcome::failure("All fields are required");
        }
        if request.password.len() < MIN_PASSWORD_LENGTH {
            return AuthOutcome::failure("Password must be at least 6 characters");
        }

        let _guard = self.file_lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut file = self.load();

        let email = request.email.trim().to_lowercase();
        if file
            .users
            .iter()
            .any(|user| user.email.eq_ignore_ascii_case(&email))
        {
            return AuthOutcome::failure("Email already registered");
        }

        let now = rfc3339_now();
        let record = UserRecord {
            id: derive_user_id(&email, &now),
            email,
            password: hash_password(&request.password),
            first_name: request.first_name.trim().to_owned(),
            last_name: request.last_name.trim().to_owned(),
            created_at: now.clone(),
            updated_at: now,
            preferences: Map::new(),
        };
        let profile = UserProfile::from(&record);
        file.users.push(record);

        if self.save(&file) {
            AuthOutcome::success("Registration successful", Some(profile))
        } else {
            AuthOutcome::failure("Error registering user")
        }
    }

    pub fn login(&self, email: &str, password: &str) -> AuthOutcome {
        if email.trim().is_empty() || password.is_empty() {
            return AuthOutcome::failure("Email and password required");
        }

        let _guard = self.file_lock.lock().unwrap_or_else(|e| e.into_inner());
        let file = self.load();
        let Some(user) = file
            .users
            .iter()
            .find(|user| user.email.eq_ignore_ascii_case(email.trim()))
        else {
            return AuthOutcome::failure("User not found");
        };

        if user.password != hash_password(password) {
            return AuthOutcome::failure("Invalid password");
        }
        AuthOutcome::success("Login successful", Some(UserProfile::from(user)))
    }

    /// Applies the allowed profile fields from `updates`. Changing the email
    /// to one another account holds is rejected.
    pub fn update_profile(&self, user_id: &str, updates: &Map<String, Value>) -> AuthOutcome {
        if user_id.is_empty() {
            return AuthOutcome::failure("User ID required");
        }

        let _guard = self.file_lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut file = self.load();

        if let Some(Value::String(new_email)) = updates.get("email") {
            let new_email = new_email.trim().to_lowercase();
            let taken = file
                .users
                .iter()
                .any(|user| user.id != user_id && user.email.eq_ignore_ascii_case(&new_email));
            if taken {
                return AuthOutcome::failure("Email already in use");
            }
        }

        let Some(user) = file.users.iter_mut().find(|user| user.id == user_id) else {
            return AuthOutcome::failure("User not found");
        };

        if let Some(Value::String(first_name)) = updates.get("firstName") {
            user.first_name = first_name.clone();
        }
        if let Some(Value::String(last_name)) = updates.get("lastName") {
            user.last_name = last_name.clone();
        }
        if let Some(Value::String(email)) = updates.get("email") {
            user.email = email.trim().to_lowercase();
        }
        if let Some(Value::Object(preferences)) = updates.get("preferences") {
            user.preferences = preferences.clone();
        }
        user.updated_at = rfc3339_now();
        let profile = UserProfile::from(&*user);

        if self.save(&file) {
            AuthOutcome::success("Profile updated successfully", Some(profile))
        } else {
            AuthOutcome::failure("Error updating profile")
        }
    }

    pub fn change_password(
        &self,
        user_id: &str,
        old_password: &str,
        new_password: &str,
    ) -> AuthOutcome {
        if user_id.is_empty() || old_password.is_empty() || new_password.is_empty() {
            return AuthOutcome::failure("All fields required");
        }
        if new_password.len() < MIN_PASSWORD_LENGTH {
            return AuthOutcome::failure("Password must be at least 6 characters");
        }

        let _guard = self.file_lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut file = self.load();
        let Some(user) = file.users.iter_mut().find(|user| user.id == user_id) else {
            return AuthOutcome::failure("User not found");
        };

        if user.password != hash_password(old_password) {
            return AuthOutcome::failure("Current password is incorrect");
        }

        user.password = hash_password(new_password);
        user.updated_at = rfc3339_now();

        if self.save(&file) {
            AuthOutcome::success("Password changed successfully", None)
        } else {
            AuthOutcome::failure("Error changing password")
        }
    }

    pub fn profile(&self, user_id: &str) -> Option<UserProfile> {
        let _guard = self.file_lock.lock().unwrap_or_else(|e| e.into_inner());
        self.load()
            .users
            .iter()
            .find(|user| user.id == user_id)
            .map(UserProfile::from)
    }

    fn load(&self) -> UserFile {
        match fs::read_to_string(&self.users_path) {
            Ok(body) => match serde_json::from_str(&body) {
                Ok(file) => file,
                Err(error) => {
                    tracing::warn!(%error, "user file is corrupt; starting empty");
                    UserFile::default()
                }
            },
            Err(_) => UserFile::default(),
        }
    }

    fn save(&self, file: &UserFile) -> bool {
        let body = match serde_json::to_string_pretty(file) {
            Ok(body) => body,
            Err(error) => {
                tracing::error!(%error, "failed to serialize user file");
                return false;
            }
        };
        if let Some(parent) = self.users_path.parent() {
            if !parent.as_os_str().is_empty() {
                let _ = fs::create_dir_all(parent);
            }
        }
        match fs::write(&self.users_path, body) {
            Ok(()) => true,
            Err(error) => {
                tracing::error!(%error, path = %self.users_path.display(), "failed to write user file");
                false
            }
        }
    }
}

fn hash_password(password: &str) -> String {
    hex_digest(password.as_bytes())
}

/// Ids are the first 16 hex chars of sha256(email + creation timestamp),
/// stable for a given registration and opaque to clients.
fn derive_user_id(email: &str, created_at: &str) -> String {
    let digest = hex_digest(format!("{email}{created_at}").as_bytes());
    digest[..16].to_owned()
}

fn hex_digest(input: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input);
    let digest = hasher.finalize();
    digest.iter().map(|byte| format!("{byte:02x}")).collect()
}

fn rfc3339_now() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_default()
}
