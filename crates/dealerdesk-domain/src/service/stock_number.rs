//! Stock number synthesis
//!
//! A stock number is `prefix + zero-padded counter + suffix`. Everything in
//! this module is a pure function of its arguments: previewing never touches
//! persisted state, and issuing only returns the advanced config for the
//! caller to commit.

use crate::model::{StockNumberConfig, StockNumberRule};

/// Minimum number of counter digits
pub const COUNTER_WIDTH: usize = 4;

/// Literal contribution of the `buyer` rule
pub const BUYER_CODE: &str = "BUY";

/// Resolve a prefix/suffix rule to its string contribution.
///
/// Only `sources[0]` is consulted by the `source` rule; an empty list yields
/// an empty contribution.
pub fn resolve_rule(rule: &StockNumberRule, sources: &[String]) -> String {
    match rule {
        StockNumberRule::None => String::new(),
        StockNumberRule::Source => sources
            .first()
            .and_then(|source| source.chars().next())
            .map(|c| c.to_uppercase().collect())
            .unwrap_or_default(),
        StockNumberRule::Buyer => BUYER_CODE.to_string(),
        StockNumberRule::Custom { custom_value } => custom_value.to_uppercase(),
    }
}

/// Left-pad the counter with zeros to four digits. Wider counters are kept whole.
pub fn pad_counter(counter: u64) -> String {
    format!("{:0width$}", counter, width = COUNTER_WIDTH)
}

/// Compute the stock number for a rule triple without side effects
pub fn preview(
    prefix_rule: &StockNumberRule,
    suffix_rule: &StockNumberRule,
    counter: u64,
    sources: &[String],
) -> String {
    let mut stock_number = resolve_rule(prefix_rule, sources);
    stock_number.push_str(&pad_counter(counter));
    stock_number.push_str(&resolve_rule(suffix_rule, sources));
    stock_number
}

/// Stamp a stock number from the current counter and return the config to
/// commit afterwards (counter advanced by one).
pub fn issue(config: &StockNumberConfig, sources: &[String]) -> (String, StockNumberConfig) {
    let stock_number = config.preview(sources);
    let next = StockNumberConfig {
        counter: config.counter.saturating_add(1),
        ..config.clone()
    };
    (stock_number, next)
}

impl StockNumberConfig {
    /// Preview the stock number this config would issue next
    pub fn preview(&self, sources: &[String]) -> String {
        preview(&self.prefix_rule, &self.suffix_rule, self.counter, sources)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sources(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_custom_prefix_padding() {
        let result = preview(
            &StockNumberRule::custom("ab"),
            &StockNumberRule::None,
            7,
            &[],
        );
        assert_eq!(result, "AB0007");
    }

    #[test]
    fn test_source_prefix_buyer_suffix() {
        let result = preview(
            &StockNumberRule::Source,
            &StockNumberRule::Buyer,
            42,
            &sources(&["Auction"]),
        );
        assert_eq!(result, "A0042BUY");
    }

    #[test]
    fn test_source_rule_without_sources() {
        assert_eq!(resolve_rule(&StockNumberRule::Source, &[]), "");
        assert_eq!(resolve_rule(&StockNumberRule::Source, &sources(&[""])), "");
    }

    #[test]
    fn test_source_rule_uses_first_source_only() {
        let list = sources(&["trade-in", "Auction"]);
        assert_eq!(resolve_rule(&StockNumberRule::Source, &list), "T");
    }

    #[test]
    fn test_custom_rule_uppercases_and_accepts_empty() {
        assert_eq!(resolve_rule(&StockNumberRule::custom("lot-b"), &[]), "LOT-B");
        assert_eq!(resolve_rule(&StockNumberRule::custom(""), &[]), "");
    }

    #[test]
    fn test_pad_counter() {
        assert_eq!(pad_counter(0), "0000");
        assert_eq!(pad_counter(1004), "1004");
        assert_eq!(pad_counter(12345), "12345");
    }

    #[test]
    fn test_issue_advances_counter() {
        let config = StockNumberConfig {
            prefix_rule: StockNumberRule::custom("u"),
            suffix_rule: StockNumberRule::None,
            counter: 1004,
        };
        let (stock_number, next) = issue(&config, &[]);
        assert_eq!(stock_number, "U1004");
        assert_eq!(next.counter, 1005);
        assert_eq!(next.prefix_rule, config.prefix_rule);
        // The input config is untouched
        assert_eq!(config.counter, 1004);
    }

    #[test]
    fn test_issue_saturates() {
        let config = StockNumberConfig {
            prefix_rule: StockNumberRule::None,
            suffix_rule: StockNumberRule::None,
            counter: u64::MAX,
        };
        let (_, next) = issue(&config, &[]);
        assert_eq!(next.counter, u64::MAX);
    }
}
