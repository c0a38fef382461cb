//! Game progression state machine
//!
//! All run progress lives in [`GameSession`] and changes only through its
//! action methods. Actions are synchronous and total: invalid requests are
//! ignored or reported through a return value, never through a panic.
//! Signals for other subsystems (music start/stop, milestones) are queued
//! as [`SessionEvent`]s for the owner to drain.

pub mod actions;
pub mod shop;
pub mod state;

pub use shop::{OFFERS_PER_VISIT, SHOP_ITEMS, ShopItem, ShopItemKind, ShopOffer, shop_offers};
pub use state::{GameSession, GameStatus, SessionEvent, SessionSnapshot};
