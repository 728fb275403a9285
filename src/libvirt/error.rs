use thiserror::Error;

pub type Result<T> = std::result::Result<T, LibvirtError>;

#[derive(Error, Debug)]
pub enum LibvirtError {
    #[error("Malformed libvirt XML payload")]
    MalformedXml(#[source] roxmltree::Error),

    #[error("libvirt XML has no <{element}> element")]
    MissingElement { element: String },

    #[error("libvirt XML element <{element}> has no '{attribute}' attribute")]
    MissingAttribute { element: String, attribute: String },
}

impl LibvirtError {
    pub fn missing_element(element: impl Into<String>) -> Self {
        Self::MissingElement {
            element: element.into(),
        }
    }

    pub fn missing_attribute(element: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self::MissingAttribute {
            element: element.into(),
            attribute: attribute.into(),
        }
    }
}
