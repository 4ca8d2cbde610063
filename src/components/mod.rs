pub mod banner;
pub mod banner_frames;
pub mod bracket;
pub mod match_card;
