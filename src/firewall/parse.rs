use super::error::ParseError;
use super::{FirewallRule, RuleTarget};

/// Data rows are split into at most this many fields; the last one keeps
/// the rest of the line, spaces included.
const MAX_FIELDS: usize = 10;

const OPTIONS_COLUMN: &str = "options";

/// Column positions taken from the header line
struct Header {
    raw: String,
    columns: Vec<String>,
}

impl Header {
    fn parse(line: &str) -> Result<Self, ParseError> {
        let mut columns: Vec<String> = line.split_whitespace().map(str::to_string).collect();
        // iptables prints no title above the options text
        columns.push(OPTIONS_COLUMN.to_string());

        let header = Self {
            raw: line.trim().to_string(),
            columns,
        };
        for column in ["target", "prot", "opt", "in", "out", "source", "destination"] {
            if header.index_of(column).is_none() {
                return Err(ParseError::missing_column(column, header.raw.clone()));
            }
        }
        Ok(header)
    }

    fn index_of(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    fn field<'l>(&self, fields: &[&'l str], column: &str) -> Option<&'l str> {
        self.index_of(column).and_then(|idx| fields.get(idx).copied())
    }

    fn rule_from(&self, line: &str) -> Option<FirewallRule> {
        let fields = split_fields(line, MAX_FIELDS);
        let required = |column: &str| self.field(&fields, column).map(str::to_string);

        Some(FirewallRule {
            pkts: required("pkts").unwrap_or_default(),
            bytes: required("bytes").unwrap_or_default(),
            target: RuleTarget::from(self.field(&fields, "target")?),
            prot: required("prot")?,
            opt: required("opt")?,
            in_interface: required("in")?,
            out_interface: required("out")?,
            source: required("source")?,
            destination: required("destination")?,
            options: required(OPTIONS_COLUMN).unwrap_or_default(),
        })
    }
}

/// Split on whitespace runs, stopping after `max_fields - 1` splits
fn split_fields(line: &str, max_fields: usize) -> Vec<&str> {
    let mut fields = Vec::new();
    let mut rest = line.trim();

    while !rest.is_empty() {
        if fields.len() + 1 == max_fields {
            fields.push(rest);
            break;
        }
        match rest.find(char::is_whitespace) {
            Some(end) => {
                fields.push(&rest[..end]);
                rest = rest[end..].trim_start();
            }
            None => {
                fields.push(rest);
                break;
            }
        }
    }

    fields
}

/// Parse the raw output of `iptables -L <chain> -vn`.
///
/// The first line is the chain summary and the second the column header.
/// Rows that do not fill every column are skipped.
pub fn parse_firewall_output(output: &[u8]) -> Result<Vec<FirewallRule>, ParseError> {
    let text = String::from_utf8(output.to_vec()).map_err(ParseError::Encoding)?;
    let mut lines = text.trim().lines();

    // Chain FORWARD (policy ACCEPT 0 packets, 0 bytes)
    if lines.next().is_none() {
        return Ok(Vec::new());
    }
    let Some(header_line) = lines.next() else {
        return Ok(Vec::new());
    };
    let header = Header::parse(header_line)?;

    Ok(lines.filter_map(|line| header.rule_from(line)).collect())
}
