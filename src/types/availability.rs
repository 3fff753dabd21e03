//! Availability states reported by an on-device model.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Whether the local model can serve a request right now.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Availability {
    /// The device reports it cannot run the model.
    Unavailable,
    /// The model can be fetched before first use.
    Downloadable,
    /// A download is already in flight.
    Downloading,
    /// The model is ready; no setup needed.
    Available,
}

impl Availability {
    pub fn is_available(self) -> bool {
        matches!(self, Self::Available)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_wire_names() {
        assert_eq!("downloadable".parse::<Availability>().unwrap(), Availability::Downloadable);
        assert_eq!(Availability::Available.to_string(), "available");
    }
}
