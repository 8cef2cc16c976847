use regex::Regex;

use crate::error::AppError;

/// Patch values above this carry into the minor version. The patch counter
/// runs 0..=10 before carrying; this is the established tag convention for
/// the project set, not semver.
const PATCH_CARRY_LIMIT: u32 = 10;

/// Result of deriving the next version tag from the existing tag list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagDerivation {
    /// The latest existing tag the derivation is based on
    pub latest: String,
    /// The proposed next tag
    pub next: String,
}

/// Computes the next tag from `git tag -l --sort=v:refname` output.
///
/// Tags match `v<major>.<minor>.<patch><suffix>`; the input is sorted in
/// ascending version order, so the last matching line is the latest tag.
/// Minor and patch are numeric; major and suffix are carried through
/// verbatim from the latest tag.
pub fn derive_next_tag(tag_list: &str) -> Result<TagDerivation, AppError> {
    let pattern = Regex::new(r"v(\d+)\.(\d+)\.(\d+)(.*)").expect("regex");

    let captures = tag_list
        .lines()
        .filter_map(|line| pattern.captures(line.trim()))
        .last()
        .ok_or(AppError::NoTagsFound)?;

    let latest = captures[0].to_string();
    let major = &captures[1];
    let suffix = &captures[4];

    let minor: u32 = captures[2]
        .parse()
        .map_err(|_| AppError::VersionParse(captures[2].to_string()))?;
    let patch: u32 = captures[3]
        .parse()
        .map_err(|_| AppError::VersionParse(captures[3].to_string()))?;

    let (minor, patch) = if patch >= PATCH_CARRY_LIMIT {
        (minor + 1, 0)
    } else {
        (minor, patch + 1)
    };

    Ok(TagDerivation {
        latest,
        next: format!("v{major}.{minor}.{patch}{suffix}"),
    })
}
