//! Greeting card ("blessing box")
//!
//! A card carries a recipient, a sender, and a short festive message. Cards
//! travel as plain query pairs on the share link; missing fields fall back
//! to the local profile so an un-customized link still reads naturally.

use rand::Rng;

use crate::profile::Profile;

/// Message a fresh card starts with
pub const DEFAULT_MESSAGE: &str =
    "May the new year treat you gently:\nsteady luck, open roads, quiet joy.";

/// Pool behind the "draw another" button
pub const BLESSINGS: [&str; 8] = [
    "May you be rich, radiant,\ngentle, and deeply loved.",
    "A year of curiosity and hope,\nnever betraying what you love.",
    "Wealth to you - not just this year,\nbut every year after.",
    "Joy in every season,\nwins in every wish.",
    "May all you ask be granted,\nand every road turn smooth.",
    "Stay close to the people worth it,\nyear after year.",
    "Unexpected luck and\nsudden delight, all year long.",
    "Eat well, sleep well,\ngrow round and full of hope.",
];

/// Draw one canned blessing
pub fn random_blessing<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    BLESSINGS[rng.random_range(0..BLESSINGS.len())]
}

/// One greeting card, authored locally or received via a share link
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlessingCard {
    pub to: String,
    pub from: String,
    pub message: String,
    /// True when the card arrived through a share link
    pub received: bool,
}

impl BlessingCard {
    /// A fresh card addressed from the local user to their friend
    pub fn from_profile(profile: &Profile) -> Self {
        Self {
            to: profile.friend_name.clone(),
            from: profile.user_name.clone(),
            message: DEFAULT_MESSAGE.to_string(),
            received: false,
        }
    }

    /// Rebuild a card from share-link pairs. Any present field marks the
    /// card as received; missing fields fall back to the profile names and
    /// the default message.
    pub fn from_query_pairs<I>(pairs: I, profile: &Profile) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut card = Self::from_profile(profile);

        for (key, value) in pairs {
            if value.is_empty() {
                continue;
            }
            match key.as_str() {
                "to" => {
                    card.to = value;
                    card.received = true;
                }
                "from" => {
                    card.from = value;
                    card.received = true;
                }
                "msg" => {
                    card.message = value;
                    card.received = true;
                }
                _ => {}
            }
        }

        card
    }

    /// Share-link fields; percent-encoding is the web layer's job
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("to", self.to.clone()),
            ("from", self.from.clone()),
            ("msg", self.message.clone()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    use super::*;

    fn profile() -> Profile {
        Profile {
            user_name: "Mei".into(),
            friend_name: "Leo".into(),
            ..Profile::default()
        }
    }

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_local_card_uses_profile_names() {
        let card = BlessingCard::from_profile(&profile());
        assert_eq!(card.to, "Leo");
        assert_eq!(card.from, "Mei");
        assert_eq!(card.message, DEFAULT_MESSAGE);
        assert!(!card.received);
    }

    #[test]
    fn test_share_round_trip() {
        let mut card = BlessingCard::from_profile(&profile());
        card.message = "See you at the lantern festival!".to_string();

        let encoded: Vec<(String, String)> = card
            .to_query_pairs()
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();

        let back = BlessingCard::from_query_pairs(encoded, &Profile::default());
        assert_eq!(back.to, "Leo");
        assert_eq!(back.from, "Mei");
        assert_eq!(back.message, "See you at the lantern festival!");
        assert!(back.received);
    }

    #[test]
    fn test_partial_link_falls_back_to_profile() {
        let card = BlessingCard::from_query_pairs(pairs(&[("msg", "gong xi!")]), &profile());
        assert_eq!(card.to, "Leo");
        assert_eq!(card.from, "Mei");
        assert_eq!(card.message, "gong xi!");
        assert!(card.received);
    }

    #[test]
    fn test_no_share_fields_means_local_card() {
        let card = BlessingCard::from_query_pairs(pairs(&[("x", "junk")]), &profile());
        assert!(!card.received);
        assert_eq!(card.message, DEFAULT_MESSAGE);
    }

    #[test]
    fn test_random_blessing_comes_from_pool() {
        let mut rng = Pcg32::seed_from_u64(9);
        for _ in 0..20 {
            let blessing = random_blessing(&mut rng);
            assert!(BLESSINGS.contains(&blessing));
        }
    }
}
