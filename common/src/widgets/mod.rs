//! Widget components for the pendant display.
//!
//! All widgets are generic over `DrawTarget<Color = Rgb565>` so the same code
//! draws onto the panel and into off-screen sprites.

mod primitives;

pub use primitives::{ButtonText, draw_button, draw_caption, draw_panel, draw_text, draw_title, fill_round_rect};
