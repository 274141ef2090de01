use chrono::NaiveDateTime;
use regex_lite::Regex;
use tracing::{error, warn};

use super::types::RemoteItem;

const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Filter `names` down to `<prefix>_<14 digits>.pdf` and order them oldest first.
///
/// Ordering is stable, so equal timestamps keep their listing order. Names whose
/// digits are not a valid date are kept but placed after every dated name, in
/// listing order.
pub fn order_listing(names: Vec<String>, prefix: &str) -> Vec<RemoteItem> {
    let pattern = format!(r"^{}_(\d{{14}})\.pdf$", regex_lite::escape(prefix));
    let re = match Regex::new(&pattern) {
        Ok(re) => re,
        Err(e) => {
            error!("Invalid listing pattern for prefix {:?}: {}", prefix, e);
            return Vec::new();
        }
    };

    let mut items: Vec<RemoteItem> = names
        .into_iter()
        .filter_map(|name| {
            let digits = re.captures(&name)?.get(1)?.as_str().to_string();
            let timestamp = match NaiveDateTime::parse_from_str(&digits, TIMESTAMP_FORMAT) {
                Ok(ts) => Some(ts),
                Err(e) => {
                    warn!("Could not parse date of file {}: {}", name, e);
                    None
                }
            };
            Some(RemoteItem { name, timestamp })
        })
        .collect();

    items.sort_by_key(|item| (item.timestamp.is_none(), item.timestamp));
    items
}
