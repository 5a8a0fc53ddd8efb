//! Repair and resolution of stored avatar references.
//!
//! Older uploads stored keys as `avatars/<file>` inside the `avatars` bucket,
//! so their public URLs carry the bucket segment twice
//! (`.../public/avatars/avatars/<file>`). These helpers collapse that run and
//! turn relative references into absolute, fetchable URLs. Nothing here
//! rejects input: anything that cannot be parsed is passed through.

use url::Url;
use uuid::Uuid;

pub const AVATAR_BUCKET: &str = "avatars";
pub const PUBLIC_OBJECT_PATH: &str = "/storage/v1/object/public";

// Origin of the hosted storage service, e.g. `https://project.example.co`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StorageBase {
    origin: String,
}

impl StorageBase {
    pub fn new(origin: impl Into<String>) -> Self {
        let origin = origin.into();
        Self {
            origin: origin.trim_end_matches('/').to_string(),
        }
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    // Public URL for an object key inside `bucket`.
    pub fn public_object_url(&self, bucket: &str, key: &str) -> String {
        format!(
            "{}{}/{}/{}",
            self.origin,
            PUBLIC_OBJECT_PATH,
            bucket,
            key.trim_start_matches('/')
        )
    }
}

/// Collapses every run of consecutive `avatars` path segments to one.
///
/// Input that does not parse as an absolute URL is returned unchanged, as is
/// a URL without a duplicated segment. Applying the function twice yields the
/// same result as applying it once.
pub fn fix_duplicated_segment(path: &str) -> String {
    let Ok(mut url) = Url::parse(path) else {
        return path.to_string();
    };
    let Some(segments) = url.path_segments() else {
        return path.to_string();
    };

    let mut kept: Vec<String> = Vec::new();
    let mut changed = false;
    for segment in segments {
        if segment == AVATAR_BUCKET && kept.last().map(String::as_str) == Some(AVATAR_BUCKET) {
            changed = true;
            continue;
        }
        kept.push(segment.to_string());
    }

    if !changed {
        return path.to_string();
    }

    url.set_path(&format!("/{}", kept.join("/")));
    url.to_string()
}

/// Turns a stored avatar reference into an absolute URL.
///
/// Returns `None` for missing or empty input. Absolute `http(s)` URLs are
/// kept (after repair); a leading `/` is joined to the storage origin; any
/// other value is treated as an object key in the public avatars bucket.
pub fn resolve(path: Option<&str>, base: &StorageBase) -> Option<String> {
    let raw = path?.trim();
    if raw.is_empty() {
        return None;
    }

    let fixed = fix_duplicated_segment(raw);
    if has_http_scheme(&fixed) {
        return Some(fixed);
    }

    let joined = if fixed.starts_with('/') {
        format!("{}{}", base.origin(), fixed)
    } else {
        base.public_object_url(AVATAR_BUCKET, &fixed)
    };

    // Relative keys that still carry the bucket prefix double up once joined.
    Some(fix_duplicated_segment(&joined))
}

// Upload key for a new avatar: `<user_id>-<random>.<ext>`, no bucket prefix.
pub fn object_key(user_id: &str, file_name: &str) -> String {
    let random = Uuid::new_v4().simple().to_string();
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.trim().to_ascii_lowercase())
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()));

    match extension {
        Some(ext) => format!("{user_id}-{}.{ext}", &random[..12]),
        None => format!("{user_id}-{}", &random[..12]),
    }
}

fn has_http_scheme(value: &str) -> bool {
    let lower = value.get(..8).unwrap_or(value).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}
