//! Sub-interface naming utilities

use netlens_types::InterfaceType;

/// Split a sub-interface name into (parent, sub-identifier) at the first dot
///
/// Examples:
/// - "Ethernet0.100" → ("Ethernet0", "100")
/// - "xe-0/0/0.0" → ("xe-0/0/0", "0")
/// - "swp1.10.20" → ("swp1", "10.20")
///
/// Returns None if the name has no dot or either side is empty
pub fn split_subintf_name(name: &str) -> Option<(&str, &str)> {
    let (parent, sub) = name.split_once('.')?;
    if parent.is_empty() || sub.is_empty() {
        return None;
    }
    Some((parent, sub))
}

/// Parent (physical) interface name used to look up LLDP neighbors
///
/// Only sub-interface and VLAN sub-interface types are mapped; every other
/// type is its own parent.
pub fn parent_ifname<'a>(name: &'a str, if_type: &InterfaceType) -> &'a str {
    if !if_type.is_subinterface_like() {
        return name;
    }
    split_subintf_name(name).map_or(name, |(parent, _)| parent)
}

/// Check if a name denotes unit zero of an interface (e.g. "xe-0/0/0.0")
///
/// Such units are the canonical representation of the physical port on
/// platforms that report both the port and its unit 0.
pub fn is_unit_zero(name: &str) -> bool {
    name.ends_with(".0")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_subintf_name() {
        assert_eq!(split_subintf_name("Ethernet0.100"), Some(("Ethernet0", "100")));
        assert_eq!(split_subintf_name("xe-0/0/0.0"), Some(("xe-0/0/0", "0")));
        assert_eq!(split_subintf_name("swp1.10.20"), Some(("swp1", "10.20")));
    }

    #[test]
    fn test_split_subintf_name_invalid() {
        assert_eq!(split_subintf_name("Ethernet0"), None);
        assert_eq!(split_subintf_name("Ethernet0."), None);
        assert_eq!(split_subintf_name(".100"), None);
    }

    #[test]
    fn test_parent_ifname_by_type() {
        assert_eq!(parent_ifname("swp1.100", &InterfaceType::Subinterface), "swp1");
        assert_eq!(parent_ifname("swp1.100", &InterfaceType::Vlan), "swp1");
        assert_eq!(parent_ifname("Vlan100", &InterfaceType::Vlan), "Vlan100");
        // dotted names of other types are left alone
        assert_eq!(parent_ifname("bond0.5", &InterfaceType::Bond), "bond0.5");
    }

    #[test]
    fn test_is_unit_zero() {
        assert!(is_unit_zero("xe-0/0/0.0"));
        assert!(!is_unit_zero("xe-0/0/0.10"));
        assert!(!is_unit_zero("xe-0/0/0"));
    }
}
