use crate::{Error, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::debug;

/// One `<address> <network>` line of the routing file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutedAddress {
    pub address: String,
    pub network_name: String,
}

impl RoutedAddress {
    /// Parse a single line, returning `None` for blanks, comments and
    /// anything that is not exactly two tokens.
    pub fn parse_line(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return None;
        }

        let mut tokens = line.split_whitespace();
        let address = tokens.next()?;
        let network_name = tokens.next()?;
        if tokens.next().is_some() {
            return None;
        }

        Some(Self {
            address: address.to_string(),
            network_name: network_name.to_string(),
        })
    }
}

/// Addresses mapped to `network_name`, in line order and with duplicates kept
pub fn addresses_for_network<'a, I>(lines: I, network_name: &str) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    lines
        .into_iter()
        .filter_map(RoutedAddress::parse_line)
        .filter(|entry| entry.network_name == network_name)
        .map(|entry| entry.address)
        .collect()
}

/// Contents of the flat address-to-network mapping file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressTable {
    lines: Vec<String>,
}

impl AddressTable {
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    /// Read the mapping file. A missing file is an empty table.
    pub fn load(path: &Path) -> Result<Self> {
        if path.is_dir() {
            return Err(Error::config_with_suggestion(
                "routing file is a directory",
                path.display().to_string(),
                "Point --routing-file (or NETHOOK_ROUTING_FILE) at a text file",
            ));
        }

        match fs::read_to_string(path) {
            Ok(content) => Ok(Self::from_lines(content.lines())),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("Routing file {} not present", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(Error::file_operation(path, "read routing file", e)),
        }
    }

    pub fn addresses_for(&self, network_name: &str) -> Vec<String> {
        addresses_for_network(self.lines.iter().map(String::as_str), network_name)
    }
}
