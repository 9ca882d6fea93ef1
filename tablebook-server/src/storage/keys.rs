//! Storage key generation

use rand::Rng;
use rand::distributions::Alphanumeric;
use std::path::Path;

/// Length of the random key suffix
const SUFFIX_LEN: usize = 6;

/// Which listing file a key is for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Image,
    Menu,
}

impl FileKind {
    pub fn prefix(&self) -> &'static str {
        match self {
            FileKind::Image => "restaurant_images",
            FileKind::Menu => "hotel_menus",
        }
    }
}

/// `{prefix}/{slug}-{millis}-{rand}.{ext}`
///
/// The slug comes from the listing name and the extension from the
/// original file name (lowercased). Files without an extension get none.
pub fn storage_key(kind: FileKind, listing_name: &str, file_name: &str, millis: i64) -> String {
    let mut slug = shared::util::slugify(listing_name);
    if slug.is_empty() {
        slug.push_str("listing");
    }
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SUFFIX_LEN)
        .map(|b| char::from(b).to_ascii_lowercase())
        .collect();

    let ext = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .filter(|e| !e.is_empty() && e.chars().all(|c| c.is_ascii_alphanumeric()));

    match ext {
        Some(ext) => format!("{}/{}-{}-{}.{}", kind.prefix(), slug, millis, suffix, ext),
        None => format!("{}/{}-{}-{}", kind.prefix(), slug, millis, suffix),
    }
}
