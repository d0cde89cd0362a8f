//! Node addresses and the rule that derives them

use serde::{Deserialize, Serialize};
use std::fmt;

/// Short, stable identifier of a controller node
///
/// Derived from a player's platform identifier by an [`AddressResolver`].
/// Always lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeAddress(String);

impl NodeAddress {
    /// Creates an address, normalizing to lowercase
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for NodeAddress {
    fn from(s: &str) -> Self {
        NodeAddress::new(s)
    }
}

/// Maps a platform identifier to a node address
///
/// Returns `None` when the identifier does not have the expected shape.
pub trait AddressResolver: Send + Sync {
    fn resolve(&self, platform_id: &str) -> Option<NodeAddress>;

    /// Like [`resolve`](Self::resolve), with a missing address as an error
    fn address_for(&self, platform_id: &str) -> crate::Result<NodeAddress> {
        self.resolve(platform_id)
            .ok_or_else(|| crate::StateError::InvalidAddress(platform_id.to_string()))
    }
}

/// Positional slice of the platform identifier
///
/// Takes characters `[12, 19)` and lowercases them. For
/// `RINCON_000E58901234501400` that is `8901234`: the tail of the player's
/// MAC address, unique per household. Identifiers shorter than 19
/// characters have no address.
#[derive(Debug, Clone, Copy, Default)]
pub struct RinconSliceResolver;

impl RinconSliceResolver {
    pub const START: usize = 12;
    pub const END: usize = 19;
}

impl AddressResolver for RinconSliceResolver {
    fn resolve(&self, platform_id: &str) -> Option<NodeAddress> {
        platform_id
            .get(Self::START..Self::END)
            .map(NodeAddress::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_resolves_fixed_slice() {
        let resolver = RinconSliceResolver;
        assert_eq!(
            resolver.resolve("RINCON_000E58901234501400"),
            Some(NodeAddress::new("8901234"))
        );
        assert_eq!(
            resolver.resolve("RINCON_000E589012345:1400").unwrap().as_str(),
            "8901234"
        );
    }

    #[test]
    fn test_lowercases_slice() {
        let resolver = RinconSliceResolver;
        assert_eq!(
            resolver.resolve("RINCON_000E58ABCDEF01400").unwrap().as_str(),
            "8abcdef"
        );
    }

    #[test]
    fn test_short_identifier_has_no_address() {
        let resolver = RinconSliceResolver;
        assert!(resolver.resolve("").is_none());
        assert!(resolver.resolve("RINCON_000E5").is_none());
        assert!(resolver.resolve("RINCON_000E58ABCD").is_none());
        // Exactly 19 characters is enough
        assert!(resolver.resolve("RINCON_000E58ABCDEF").is_some());
    }

    #[test]
    fn test_address_for_reports_identifier() {
        let err = RinconSliceResolver.address_for("RINCON_1").unwrap_err();
        assert_eq!(err.to_string(), "No node address for identifier: RINCON_1");
    }

    #[test]
    fn test_non_ascii_boundary_has_no_address() {
        // Slice would split a multi-byte character
        let resolver = RinconSliceResolver;
        assert!(resolver.resolve("RINCON_000Eé8901234501400").is_none());
    }

    #[test]
    fn test_node_address_normalizes() {
        assert_eq!(NodeAddress::new("AbC1234"), NodeAddress::from("abc1234"));
        assert_eq!(NodeAddress::new("AbC1234").to_string(), "abc1234");
    }

    proptest! {
        #[test]
        fn resolve_is_lowercase_and_seven_chars(id in "[A-Za-z0-9_:]{19,40}") {
            let address = RinconSliceResolver.resolve(&id).unwrap();
            prop_assert_eq!(address.as_str().len(), 7);
            prop_assert_eq!(address.as_str(), address.as_str().to_lowercase());
        }

        #[test]
        fn resolve_is_deterministic(id in "[A-Za-z0-9_:]{19,40}") {
            let first = RinconSliceResolver.resolve(&id);
            let second = RinconSliceResolver.resolve(&id);
            prop_assert_eq!(first.clone(), second);

            let address = first.unwrap();
            prop_assert_eq!(NodeAddress::new(address.as_str()), address);
        }

        #[test]
        fn short_ids_never_resolve(id in "[A-Za-z0-9_:]{0,18}") {
            prop_assert!(RinconSliceResolver.resolve(&id).is_none());
        }
    }
}
