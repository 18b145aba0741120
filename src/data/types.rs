use serde::Deserialize;

/// Market metadata as returned by the Manifold API. Never mutated after
/// deserialization; the UI reads it verbatim.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Market {
    pub id: String,
    pub question: String,
    #[serde(default)]
    pub slug: String,
    /// Implied probability as a fraction in [0, 1].
    #[serde(default)]
    pub probability: f64,
    #[serde(default)]
    pub volume: f64,
    #[serde(default)]
    pub unique_bettor_count: u64,
    /// Ms since epoch; absent for markets without a close date.
    #[serde(default)]
    pub close_time: Option<i64>,
    #[serde(default)]
    pub created_time: i64,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub outcome_type: String,
}

impl Market {
    /// Probability as a whole percent, clamped to 0..=100 for display.
    pub fn percent(&self) -> u8 {
        (self.probability * 100.0).round().clamp(0.0, 100.0) as u8
    }
}

/// A single trade event: the probability the market moved to, and when.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bet {
    pub created_time: i64,
    pub prob_after: f64,
}

/// One point of a probability history: ms-epoch timestamp and integer
/// percent. Sequences of these are always ascending in `t`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbPoint {
    pub t: i64,
    pub p: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_market_decodes_camel_case_wire_format() {
        let json = r#"{
            "id": "abc123",
            "question": "Will we get AGI before 2030?",
            "slug": "will-we-get-agi-before-2030",
            "probability": 0.73,
            "volume": 125000.5,
            "uniqueBettorCount": 842,
            "closeTime": 1893456000000,
            "createdTime": 1577836800000,
            "url": "https://manifold.markets/will-we-get-agi-before-2030",
            "outcomeType": "BINARY",
            "creatorId": "ignored-by-us"
        }"#;

        let market: Market = serde_json::from_str(json).unwrap();
        assert_eq!(market.id, "abc123");
        assert_eq!(market.slug, "will-we-get-agi-before-2030");
        assert_eq!(market.unique_bettor_count, 842);
        assert_eq!(market.close_time, Some(1_893_456_000_000));
        assert_eq!(market.created_time, 1_577_836_800_000);
        assert_eq!(market.outcome_type, "BINARY");
        assert_eq!(market.percent(), 73);
    }

    #[test]
    fn test_market_tolerates_missing_optional_fields() {
        let json = r#"{"id": "m1", "question": "Q?"}"#;
        let market: Market = serde_json::from_str(json).unwrap();
        assert_eq!(market.close_time, None);
        assert_eq!(market.created_time, 0);
        assert!(market.slug.is_empty());
    }

    #[test]
    fn test_bet_decodes_camel_case_wire_format() {
        let json = r#"[{"createdTime": 1700000000000, "probAfter": 0.42, "amount": 5}]"#;
        let bets: Vec<Bet> = serde_json::from_str(json).unwrap();
        assert_eq!(bets.len(), 1);
        assert_eq!(bets[0].created_time, 1_700_000_000_000);
        assert!((bets[0].prob_after - 0.42).abs() < 1e-9);
    }
}
