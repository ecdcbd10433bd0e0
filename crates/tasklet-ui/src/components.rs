mod button;
mod card;
mod footer;
mod layout;
mod navbar;

pub use button::{
  Button,
  ButtonVariant
};
pub use card::Card;
pub use footer::Footer;
pub use layout::Layout;
pub use navbar::Navbar;
