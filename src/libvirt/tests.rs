#[cfg(test)]
mod tests {
    use super::super::*;

    const HOOK_XML: &str = r#"<hookData>
  <network>
    <name>net-a</name>
    <uuid>9a05da11-e96b-47f3-8253-a3a482e445f5</uuid>
    <forward mode='route'/>
    <bridge name='virbr1' stp='on' delay='0'/>
    <ip family='ipv6' address='2001:db8::1' prefix='64'/>
    <ip address='192.168.100.1' netmask='255.255.255.0'/>
  </network>
</hookData>"#;

    #[test]
    fn test_metadata_from_hook_document() {
        let metadata = NetworkMetadata::from_xml(HOOK_XML).unwrap();
        assert_eq!(metadata.device_name, "virbr1");
        assert_eq!(metadata.device_ipv4.as_deref(), Some("192.168.100.1"));
    }

    #[test]
    fn test_metadata_from_bare_network() {
        let xml = "<network><name>net-a</name><bridge name='br0'/></network>";
        let metadata = NetworkMetadata::from_xml(xml).unwrap();
        assert_eq!(metadata.device_name, "br0");
        assert_eq!(metadata.device_ipv4, None);
    }

    #[test]
    fn test_metadata_missing_bridge() {
        let xml = "<hookData><network><name>net-a</name></network></hookData>";
        assert!(matches!(
            NetworkMetadata::from_xml(xml),
            Err(LibvirtError::MissingElement { ref element }) if element == "bridge"
        ));

        let xml = "<network><bridge stp='on'/></network>";
        assert!(matches!(
            NetworkMetadata::from_xml(xml),
            Err(LibvirtError::MissingAttribute { .. })
        ));
    }

    #[test]
    fn test_metadata_without_network_element() {
        assert!(matches!(
            NetworkMetadata::from_xml("<hookData/>"),
            Err(LibvirtError::MissingElement { ref element }) if element == "network"
        ));
    }

    #[test]
    fn test_metadata_malformed_xml() {
        assert!(matches!(
            NetworkMetadata::from_xml("<network><bridge name='br0'>"),
            Err(LibvirtError::MalformedXml(_))
        ));
    }

    #[test]
    fn test_network_profile() {
        let profile = HookProfile::for_identity("network").unwrap();
        assert_eq!(profile.kind, HookKind::Forwarding);

        let check = |action: &str, state: &str| {
            profile.check(&EventAction::from(action), &EventState::from(state))
        };
        assert_eq!(check("started", "begin"), EventCheck::Allowed);
        assert_eq!(check("plugged", "begin"), EventCheck::Allowed);
        assert_eq!(check("stopped", "end"), EventCheck::Allowed);
        assert_eq!(check("started", "end"), EventCheck::Unhandled);
        assert_eq!(check("plugged", "whatever"), EventCheck::Unhandled);
        assert_eq!(check("updated", "begin"), EventCheck::Ignored);
        assert_eq!(check("unplugged", "begin"), EventCheck::Ignored);
        assert_eq!(check("reboot", "begin"), EventCheck::Ignored);
    }

    #[test]
    fn test_network_routes_profile() {
        let profile = HookProfile::for_identity("network-routes").unwrap();
        assert_eq!(profile.kind, HookKind::RoutesOnly);
        assert_eq!(
            profile.check(&EventAction::Stopped, &EventState::End),
            EventCheck::Allowed
        );
        assert_eq!(
            profile.check(&EventAction::Plugged, &EventState::Begin),
            EventCheck::Ignored
        );
    }

    #[test]
    fn test_unknown_identity_has_no_profile() {
        assert!(HookProfile::for_identity("qemu").is_none());
    }

    #[test]
    fn test_identity_from_path() {
        assert_eq!(identity_from_path("/etc/libvirt/hooks/network"), "network");
        assert_eq!(identity_from_path("network-routes"), "network-routes");
    }

    #[test]
    fn test_event_keeps_unknown_values_verbatim() {
        let event = NetworkEvent::new("network", "net-a", "port-created", "middle", "-");
        assert_eq!(event.action, EventAction::PortCreated);
        assert_eq!(event.state.to_string(), "middle");
        assert_eq!(event.payload, Payload::Stdin);

        let event = NetworkEvent::new("network", "net-a", "migrate", "begin", "<network/>");
        assert_eq!(event.action.as_str(), "migrate");
        assert_eq!(event.payload, Payload::Inline("<network/>".to_string()));
    }
}
