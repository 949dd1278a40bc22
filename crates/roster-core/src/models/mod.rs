mod entry_filter;
mod presence;
mod roster_item;

pub use entry_filter::EntryFilter;
pub use presence::PresenceResource;
pub use roster_item::{RosterItem, Subscription};
