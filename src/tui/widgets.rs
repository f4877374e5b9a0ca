//! Presentational primitives
//!
//! Widgets here take everything they draw as props and hold no session
//! logic. Screens compose them.

mod button;
mod card;
mod input;
mod loader;
mod select;

pub use button::Button;
pub use card::{Card, CardStack};
pub use input::TextField;
pub use loader::Loader;
pub use select::{step, Select};
