pub mod destination;
pub mod error;
pub mod favorite;
pub mod history;
pub mod itinerary;
pub mod preferences;

pub use destination::{Category, Coordinates, Destination, DestinationId, PriceTier};
pub use error::{CoreError, CoreErrorKind};
pub use favorite::{FavoriteEntry, FavoriteUpdate};
pub use history::HistoryEntry;
pub use itinerary::{Itinerary, ItineraryItem};
pub use preferences::{DistanceUnit, FilterDefaults, Preferences, Theme};
