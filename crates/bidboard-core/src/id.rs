//! Opaque entity identities.
//!
//! Every entity family gets its own newtype over the server-assigned key so a
//! [`BidId`] can never be passed where a [`RequestId`] is expected. The keys
//! themselves are opaque: the client never parses or orders them
//! meaningfully, it only compares them for equality.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap a raw identity key.
            pub fn new(raw: impl Into<String>) -> Self {
                Self(raw.into())
            }

            /// Raw identity key.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(raw: &str) -> Self {
                Self::new(raw)
            }
        }

        impl From<String> for $name {
            fn from(raw: String) -> Self {
                Self(raw)
            }
        }
    };
}

entity_id!(
    /// Identity of a [`crate::Request`].
    RequestId
);

entity_id!(
    /// Identity of a [`crate::Bid`], unique within its owning request.
    BidId
);

entity_id!(
    /// Identity of a service-provider profile.
    ProfileId
);

entity_id!(
    /// Identity of a review attached to a profile.
    ReviewId
);

entity_id!(
    /// Identity of a venue.
    VenueId
);

entity_id!(
    /// Identity of a workshop.
    WorkshopId
);

entity_id!(
    /// Identity of an authenticated viewer.
    ViewerId
);
