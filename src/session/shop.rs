//! Shop catalog and offer rolling

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use super::state::GameSession;

/// Number of items shown per shop visit
pub const OFFERS_PER_VISIT: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShopItemKind {
    DoubleJump,
    MaxLife,
    Heal,
    Immortal,
}

impl ShopItemKind {
    /// One-time purchases disappear from the shop once owned
    pub fn is_one_time(&self) -> bool {
        matches!(self, ShopItemKind::DoubleJump | ShopItemKind::Immortal)
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "DOUBLE_JUMP" => Some(ShopItemKind::DoubleJump),
            "MAX_LIFE" => Some(ShopItemKind::MaxLife),
            "HEAL" => Some(ShopItemKind::Heal),
            "IMMORTAL" => Some(ShopItemKind::Immortal),
            _ => None,
        }
    }
}

/// Catalog entry; prices come from [`crate::tuning::ShopPrices`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ShopItem {
    pub kind: ShopItemKind,
    pub name: &'static str,
    pub description: &'static str,
}

pub const SHOP_ITEMS: [ShopItem; 4] = [
    ShopItem {
        kind: ShopItemKind::DoubleJump,
        name: "DOUBLE JUMP",
        description: "Jump again in mid-air. Permanent upgrade.",
    },
    ShopItem {
        kind: ShopItemKind::MaxLife,
        name: "MAX LIFE UP",
        description: "Adds a heart slot and fills it.",
    },
    ShopItem {
        kind: ShopItemKind::Heal,
        name: "REPAIR KIT",
        description: "Restores one life.",
    },
    ShopItem {
        kind: ShopItemKind::Immortal,
        name: "IMMORTALITY",
        description: "Unlock ability: a few seconds of invincibility.",
    },
];

/// An item on offer together with its current price
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ShopOffer {
    pub item: ShopItem,
    pub cost: u64,
}

impl ShopOffer {
    pub fn affordable(&self, session: &GameSession) -> bool {
        session.score() >= self.cost
    }
}

/// Roll the items shown on a shop visit: owned one-time upgrades are skipped,
/// the rest shuffled, at most [`OFFERS_PER_VISIT`] kept.
pub fn shop_offers<R: Rng + ?Sized>(session: &GameSession, rng: &mut R) -> Vec<ShopOffer> {
    let prices = &session.tuning().shop;
    let mut pool: Vec<ShopOffer> = SHOP_ITEMS
        .iter()
        .filter(|item| match item.kind {
            ShopItemKind::DoubleJump => !session.has_double_jump(),
            ShopItemKind::Immortal => !session.has_immortality(),
            _ => true,
        })
        .map(|item| ShopOffer {
            item: *item,
            cost: prices.cost_of(item.kind),
        })
        .collect();

    pool.shuffle(rng);
    pool.truncate(OFFERS_PER_VISIT);
    pool
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_offers_are_distinct_and_capped() {
        let session = GameSession::default();
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..20 {
            let offers = shop_offers(&session, &mut rng);
            assert_eq!(offers.len(), OFFERS_PER_VISIT);
            for (i, a) in offers.iter().enumerate() {
                for b in &offers[i + 1..] {
                    assert_ne!(a.item.kind, b.item.kind);
                }
            }
        }
    }

    #[test]
    fn test_owned_upgrades_not_offered() {
        let mut session = GameSession::default();
        session.start_game();
        session.collect_gem(4000);
        assert!(session.buy_item(ShopItemKind::DoubleJump, 1000));
        assert!(session.buy_item(ShopItemKind::Immortal, 3000));

        let mut rng = Pcg32::seed_from_u64(1);
        let offers = shop_offers(&session, &mut rng);
        assert_eq!(offers.len(), 2);
        assert!(offers.iter().all(|o| !o.item.kind.is_one_time()));
    }

    #[test]
    fn test_offer_prices_follow_tuning() {
        let session = GameSession::default();
        let mut rng = Pcg32::seed_from_u64(3);
        for offer in shop_offers(&session, &mut rng) {
            assert_eq!(offer.cost, session.tuning().shop.cost_of(offer.item.kind));
            assert!(!offer.affordable(&session));
        }
    }

    #[test]
    fn test_same_seed_same_offers() {
        let session = GameSession::default();
        let a = shop_offers(&session, &mut Pcg32::seed_from_u64(42));
        let b = shop_offers(&session, &mut Pcg32::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn test_kind_from_str() {
        assert_eq!(ShopItemKind::from_str("heal"), Some(ShopItemKind::Heal));
        assert_eq!(ShopItemKind::from_str("DOUBLE_JUMP"), Some(ShopItemKind::DoubleJump));
        assert_eq!(ShopItemKind::from_str("rocket"), None);
    }
}
