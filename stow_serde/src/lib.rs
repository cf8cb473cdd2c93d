#![warn(missing_docs)]
#![deny(clippy::correctness)]

//! Saves arbitrary values to binary files and loads them back
//!
//! Any serde type can be stored with [`save`] and recovered with [`load`].
//! Callers without a static type at hand use the [`Value`] document type
//! through [`save_pickle`] and [`load_pickle`].

#[macro_use]
extern crate serde_derive;

#[doc(hidden)]
pub use base64 as __base64;

#[macro_use]
mod macros;
mod bytes;
pub use self::bytes::{Codec, FromBytes, ToBytes};
mod error;
pub use self::error::{Error, Result};
mod file;
pub use self::file::{load, load_pickle, save, save_new, save_pickle};
mod value;
pub use self::value::{Value, MAX_DEPTH};
