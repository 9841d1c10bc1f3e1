pub mod escape;
pub mod renderer;

pub use escape::{escape, escape_opt, unescape};
pub use renderer::{render_turn, RenderedTurn};
