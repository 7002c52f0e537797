mod token;
pub use self::token::{Key, Token};
