use super::error::{LibvirtError, Result};
use roxmltree::{Document, Node};

/// Bridge details of the network an event refers to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkMetadata {
    pub device_name: String,
    pub device_ipv4: Option<String>,
}

impl NetworkMetadata {
    /// Extract `network/bridge@name` and `network/ip@address`.
    ///
    /// Accepts the `<hookData>` document libvirt passes to hooks as well as a
    /// bare `<network>` definition.
    pub fn from_xml(xml: &str) -> Result<Self> {
        let document = Document::parse(xml).map_err(LibvirtError::MalformedXml)?;
        let root = document.root_element();

        let network = if root.has_tag_name("network") {
            root
        } else {
            child(root, "network").ok_or_else(|| LibvirtError::missing_element("network"))?
        };

        let device_name = child(network, "bridge")
            .ok_or_else(|| LibvirtError::missing_element("bridge"))?
            .attribute("name")
            .ok_or_else(|| LibvirtError::missing_attribute("bridge", "name"))?
            .to_string();

        // First IPv4 <ip>; libvirt omits `family` for IPv4
        let device_ipv4 = network
            .children()
            .filter(|n| n.has_tag_name("ip"))
            .find(|n| matches!(n.attribute("family"), None | Some("ipv4")))
            .and_then(|n| n.attribute("address"))
            .map(str::to_string);

        Ok(Self {
            device_name,
            device_ipv4,
        })
    }
}

fn child<'a, 'input>(node: Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|n| n.has_tag_name(tag))
}
