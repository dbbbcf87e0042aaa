//! Output file naming: lowerCamelCase identifiers built from document stems,
//! plus numeric suffixes when a name is already taken.

use crate::domain::model::CollisionPolicy;
use crate::utils::error::Result;
use regex::Regex;
use std::collections::HashSet;
use std::path::Path;
use std::sync::OnceLock;

/// Identifier used when a stem has no alphanumeric characters at all.
pub const FALLBACK_IDENTIFIER: &str = "file";

fn separator_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^A-Za-z0-9]+").expect("separator pattern is valid"))
}

/// Converts an arbitrary stem into a lowerCamelCase identifier.
///
/// Runs of characters outside `[A-Za-z0-9]` separate words. The first word
/// is lowercased; every following word gets an uppercase first letter and
/// a lowercase remainder. Returns an empty string when no word survives.
pub fn normalize(stem: &str) -> String {
    let mut words = separator_re().split(stem).filter(|w| !w.is_empty());

    let Some(first) = words.next() else {
        return String::new();
    };

    let mut out = first.to_ascii_lowercase();
    for word in words {
        let mut chars = word.chars();
        if let Some(head) = chars.next() {
            out.push(head.to_ascii_uppercase());
            out.push_str(&chars.as_str().to_ascii_lowercase());
        }
    }
    out
}

/// `normalize`, substituting `fallback` for stems that normalize to nothing.
pub fn identifier_for(stem: &str, fallback: &str) -> String {
    let id = normalize(stem);
    if id.is_empty() {
        fallback.to_string()
    } else {
        id
    }
}

/// Names present in one output directory, compared under a collision policy.
#[derive(Debug, Clone)]
pub struct ExistingNames {
    policy: CollisionPolicy,
    names: HashSet<String>,
}

impl ExistingNames {
    pub fn empty(policy: CollisionPolicy) -> Self {
        Self {
            policy,
            names: HashSet::new(),
        }
    }

    /// Reads the entries of `dir`. A directory that does not exist yet has
    /// no entries.
    pub fn scan(dir: &Path, policy: CollisionPolicy) -> Result<Self> {
        let mut existing = Self::empty(policy);
        if !dir.exists() {
            return Ok(existing);
        }
        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            existing.reserve(&entry.file_name().to_string_lossy());
        }
        Ok(existing)
    }

    fn key(&self, name: &str) -> String {
        match self.policy {
            CollisionPolicy::CaseSensitive => name.to_string(),
            CollisionPolicy::CaseInsensitive => name.to_lowercase(),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(&self.key(name))
    }

    pub fn reserve(&mut self, name: &str) {
        let key = self.key(name);
        self.names.insert(key);
    }

    /// First of `base.ext`, `base-2.ext`, `base-3.ext`, ... not present.
    pub fn first_free(&self, base: &str, extension: &str) -> String {
        let mut candidate = format!("{}{}", base, extension);
        let mut counter = 2u32;
        while self.contains(&candidate) {
            candidate = format!("{}-{}{}", base, counter, extension);
            counter += 1;
        }
        candidate
    }
}

/// Returns a file name in `output_dir` built from `base` and `extension`
/// (which includes its leading dot) that does not collide with an existing
/// entry under `policy`.
pub fn unique_name(
    output_dir: &Path,
    base: &str,
    extension: &str,
    policy: CollisionPolicy,
) -> Result<String> {
    let existing = ExistingNames::scan(output_dir, policy)?;
    Ok(existing.first_free(base, extension))
}
