//! Marketing: quests and promotions

pub mod promotion;
pub mod quest;

pub use promotion::PromotionService;
pub use quest::QuestService;
