//! # Kiwi ntfy Extension
//!
//! Push notifications through [ntfy](https://ntfy.sh) when a bank's rates
//! change.
//!
//! Delivery is a single POST with a 10 second timeout. The engine treats a
//! failure as a warning; it never affects stored history.
//!
//! ```rust,no_run
//! use kiwi_ext_ntfy::{NtfyNotifier, DEFAULT_SERVER};
//!
//! let notifier = NtfyNotifier::from_topic(DEFAULT_SERVER, std::env::var("NTFY_TOPIC").ok().as_deref())?;
//! if let Some(notifier) = notifier {
//!     println!("notifying {}", notifier.endpoint());
//! }
//! # Ok::<(), kiwi_traits::TraitError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod message;
pub mod notifier;

pub use message::format_notification;
pub use notifier::{NtfyNotifier, DEFAULT_SERVER, TAGS};
