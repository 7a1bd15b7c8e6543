//! PBAP Virtual Folders
//!
//! A PBAP server exposes a fixed folder tree:
//!
//! ```text
//! /telecom/{pb,ich,och,mch,cch}
//! /SIM1/telecom/{pb,ich,och,mch,cch}
//! ```
//!
//! SETPATH moves the session through this tree, and GET requests without a usable
//! object name are resolved against the current folder.

use super::{ContentCategory, ObjectType, PbapError};
use crate::constants::MAX_PATH_LENGTH;
use heapless::String;

/// Virtual path of a session
pub type VirtualPath = String<MAX_PATH_LENGTH>;

/// Folders below the telecom root
const TELECOM_PATHS: [&str; 6] = [
    "/telecom",
    "/telecom/pb",
    "/telecom/ich",
    "/telecom/och",
    "/telecom/mch",
    "/telecom/cch",
];

/// Mirror of the telecom folders on the SIM card
const SIM_PATHS: [&str; 7] = [
    "/SIM1",
    "/SIM1/telecom",
    "/SIM1/telecom/pb",
    "/SIM1/telecom/ich",
    "/SIM1/telecom/och",
    "/SIM1/telecom/mch",
    "/SIM1/telecom/cch",
];

/// Set of folders a session may navigate to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LegalPaths {
    sim_paths: bool,
}

impl LegalPaths {
    /// Create the legal path set, optionally including the SIM mirror
    #[must_use]
    pub const fn new(sim_paths: bool) -> Self {
        Self { sim_paths }
    }

    /// Check if `path` is a legal folder; the root (empty path) always is
    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        path.is_empty()
            || TELECOM_PATHS.contains(&path)
            || (self.sim_paths && SIM_PATHS.contains(&path))
    }
}

impl Default for LegalPaths {
    fn default() -> Self {
        Self::new(true)
    }
}

/// Compute the folder a SETPATH request leads to
///
/// * `backup` climbs one level (the root stays the root) and ignores `name`
/// * a `name` descends into that child
/// * neither resets to the root
///
/// # Errors
/// Returns [`PbapError::PathForbidden`] if the target is not legal and the client
/// signaled that it wants the folder created, [`PbapError::InvalidPath`] otherwise.
pub fn navigate(
    current: &str,
    backup: bool,
    create: bool,
    name: Option<&str>,
    legal: LegalPaths,
) -> Result<VirtualPath, PbapError> {
    let illegal = if create {
        PbapError::PathForbidden
    } else {
        PbapError::InvalidPath
    };

    let mut target = VirtualPath::new();
    if backup {
        let parent = current.rfind('/').map_or("", |separator| &current[..separator]);
        target.push_str(parent).map_err(|()| illegal)?;
    } else if let Some(name) = name {
        target.push_str(current).map_err(|()| illegal)?;
        target.push('/').map_err(|()| illegal)?;
        target.push_str(name).map_err(|()| illegal)?;
    }

    if legal.contains(&target) {
        Ok(target)
    } else {
        Err(illegal)
    }
}

/// Resolve the content category a GET refers to
///
/// Without an object name, or for single vCard requests, the category is the one
/// whose folder is the current path. Otherwise the name is searched for the category
/// tokens in priority order (`pb`, `ich`, `och`, `mch`, `cch`) and the first one
/// contained wins.
///
/// # Errors
/// Returns [`PbapError::UnresolvableCategory`] if neither the folder nor the name
/// identify a category.
pub fn resolve_category(
    current: &str,
    name: Option<&str>,
    object_type: Option<ObjectType>,
) -> Result<ContentCategory, PbapError> {
    match name.filter(|name| !name.is_empty()) {
        Some(name) if object_type != Some(ObjectType::Vcard) => {
            ContentCategory::from_name(name).ok_or_else(|| {
                warn!("[PBAP] Name {} does not identify a phonebook object", name);
                PbapError::UnresolvableCategory
            })
        }
        _ => ContentCategory::from_path(current).ok_or_else(|| {
            warn!("[PBAP] Current path {} is not a phonebook folder", current);
            PbapError::UnresolvableCategory
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legal_paths() {
        let legal = LegalPaths::default();

        assert!(legal.contains(""));
        assert!(legal.contains("/telecom"));
        assert!(legal.contains("/telecom/cch"));
        assert!(legal.contains("/SIM1"));
        assert!(legal.contains("/SIM1/telecom/pb"));
        assert!(!legal.contains("/"));
        assert!(!legal.contains("/telecom/"));
        assert!(!legal.contains("/telecom/xyz"));
        assert!(!legal.contains("telecom"));
    }

    #[test]
    fn test_legal_paths_without_sim() {
        let legal = LegalPaths::new(false);

        assert!(legal.contains("/telecom/pb"));
        assert!(!legal.contains("/SIM1"));
        assert!(!legal.contains("/SIM1/telecom/mch"));
    }

    #[test]
    fn test_navigate_down_and_up() {
        let legal = LegalPaths::default();

        let path = navigate("", false, false, Some("telecom"), legal).unwrap();
        assert_eq!(path.as_str(), "/telecom");

        let path = navigate(&path, false, false, Some("pb"), legal).unwrap();
        assert_eq!(path.as_str(), "/telecom/pb");

        let path = navigate(&path, true, false, None, legal).unwrap();
        assert_eq!(path.as_str(), "/telecom");

        let path = navigate(&path, true, false, Some("ignored"), legal).unwrap();
        assert_eq!(path.as_str(), "");

        let path = navigate(&path, true, false, None, legal).unwrap();
        assert_eq!(path.as_str(), "");
    }

    #[test]
    fn test_navigate_multi_level_name() {
        let path = navigate("", false, false, Some("telecom/mch"), LegalPaths::default()).unwrap();
        assert_eq!(path.as_str(), "/telecom/mch");
    }

    #[test]
    fn test_navigate_to_root() {
        let path = navigate("/telecom/pb", false, false, None, LegalPaths::default()).unwrap();
        assert_eq!(path.as_str(), "");
    }

    #[test]
    fn test_navigate_illegal() {
        let legal = LegalPaths::default();

        assert_eq!(
            navigate("/telecom", false, false, Some("photos"), legal),
            Err(PbapError::InvalidPath)
        );
        assert_eq!(
            navigate("/telecom", false, true, Some("photos"), legal),
            Err(PbapError::PathForbidden)
        );
        assert_eq!(
            navigate("", false, false, Some("SIM1"), LegalPaths::new(false)),
            Err(PbapError::InvalidPath)
        );
    }

    #[test]
    fn test_navigate_overlong_name() {
        let name = "a-folder-name-that-does-not-fit-in-the-path-buffer";
        assert_eq!(
            navigate("/telecom", false, false, Some(name), LegalPaths::default()),
            Err(PbapError::InvalidPath)
        );
    }

    #[test]
    fn test_resolve_from_path() {
        for category in ContentCategory::ALL {
            assert_eq!(
                resolve_category(category.path(), None, Some(ObjectType::Listing)),
                Ok(category)
            );
            assert_eq!(
                resolve_category(category.path(), Some(""), Some(ObjectType::Phonebook)),
                Ok(category)
            );
        }

        for path in ["", "/telecom", "/SIM1/telecom/pb", "/telecom/pbx"] {
            assert_eq!(
                resolve_category(path, None, Some(ObjectType::Vcard)),
                Err(PbapError::UnresolvableCategory)
            );
        }
    }

    #[test]
    fn test_resolve_vcard_ignores_name() {
        assert_eq!(
            resolve_category("/telecom/ich", Some("pb.vcf"), Some(ObjectType::Vcard)),
            Ok(ContentCategory::IncomingCalls)
        );
        assert_eq!(
            resolve_category("/telecom", Some("1.vcf"), Some(ObjectType::Vcard)),
            Err(PbapError::UnresolvableCategory)
        );
    }

    #[test]
    fn test_resolve_from_name() {
        assert_eq!(
            resolve_category("", Some("telecom/pb.vcf"), Some(ObjectType::Phonebook)),
            Ok(ContentCategory::Phonebook)
        );
        assert_eq!(
            resolve_category("/telecom/pb", Some("mch"), Some(ObjectType::Listing)),
            Ok(ContentCategory::MissedCalls)
        );
        assert_eq!(
            resolve_category("", Some("telecom/cch.vcf"), None),
            Ok(ContentCategory::CombinedCalls)
        );
        assert_eq!(
            resolve_category("/telecom/pb", Some("photos.vcf"), Some(ObjectType::Listing)),
            Err(PbapError::UnresolvableCategory)
        );
    }

    #[test]
    fn test_resolve_name_priority() {
        assert_eq!(
            resolve_category("", Some("cch/pb"), Some(ObjectType::Phonebook)),
            Ok(ContentCategory::Phonebook)
        );
        assert_eq!(
            resolve_category("", Some("mch-och"), Some(ObjectType::Listing)),
            Ok(ContentCategory::OutgoingCalls)
        );
    }
}
