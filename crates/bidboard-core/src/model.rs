//! Domain entities.
//!
//! A [`Request`] is a service-seeking posting owning an ordered sequence of
//! [`Bid`]s. Profiles, venues and workshops carry no nested collections and
//! share the generic [`Record`] shape. Caller-supplied data (subject,
//! scheduling, location, amount...) lives in [`Fields`], an ordered map of
//! CBOR values, so the client never has to know the remote's schema.
//!
//! Entities are only ever replaced wholesale by reconciliation; the mutating
//! helpers here return new values and leave `self` untouched.

use std::{collections::BTreeMap, fmt, hash::Hash};

use serde::{Deserialize, Serialize};

use crate::{
    id::{BidId, ProfileId, RequestId, VenueId, WorkshopId},
    reconcile::{self, Reconciled},
};

/// A single caller-supplied field value.
pub type FieldValue = ciborium::Value;

/// Caller-supplied fields keyed by name.
pub type Fields = BTreeMap<String, FieldValue>;

/// Entity with a stable identity.
///
/// Reconciliation matches entities exclusively through [`Identified::id`];
/// two values with equal ids are the same entity, whatever their fields.
pub trait Identified {
    /// Identity type.
    type Id: Clone + Eq + Hash + fmt::Debug + fmt::Display;

    /// Identity of this entity.
    fn id(&self) -> &Self::Id;
}

/// Entity families, used in diagnostics and errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityKind {
    /// A [`Request`].
    Request,
    /// A [`Bid`].
    Bid,
    /// A [`Profile`].
    Profile,
    /// A [`Venue`].
    Venue,
    /// A [`Workshop`].
    Workshop,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Request => "request",
            Self::Bid => "bid",
            Self::Profile => "profile",
            Self::Venue => "venue",
            Self::Workshop => "workshop",
        };
        f.write_str(name)
    }
}

/// An offer submitted against a [`Request`].
///
/// A bid has no reference to its request; it is always reached through the
/// request that owns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bid {
    /// Server-assigned identity.
    #[serde(rename = "_id")]
    pub id: BidId,
    /// Amount and terms.
    #[serde(default)]
    pub fields: Fields,
}

impl Bid {
    /// Create a bid with no fields.
    pub fn new(id: impl Into<BidId>) -> Self {
        Self { id: id.into(), fields: Fields::new() }
    }

    /// Builder: set a field.
    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Field value by name. `None` if unset.
    pub fn field(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }
}

impl Identified for Bid {
    type Id = BidId;

    fn id(&self) -> &BidId {
        &self.id
    }
}

/// A service-seeking posting that can receive bids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    /// Server-assigned identity.
    #[serde(rename = "_id")]
    pub id: RequestId,
    /// Subject, scheduling, location and other caller-supplied fields.
    #[serde(default)]
    pub fields: Fields,
    /// Bids, newest first.
    #[serde(default)]
    pub bids: Vec<Bid>,
}

impl Request {
    /// Create a request with no fields and no bids.
    pub fn new(id: impl Into<RequestId>) -> Self {
        Self { id: id.into(), fields: Fields::new(), bids: Vec::new() }
    }

    /// Builder: set a field.
    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Builder: append a bid (oldest last).
    #[must_use]
    pub fn with_bids(mut self, bids: impl IntoIterator<Item = Bid>) -> Self {
        self.bids.extend(bids);
        self
    }

    /// Field value by name. `None` if unset.
    pub fn field(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    /// Bid by identity. `None` if this request has no such bid.
    pub fn bid(&self, id: &BidId) -> Option<&Bid> {
        self.bids.iter().find(|bid| &bid.id == id)
    }

    /// Copy of this request with `bid` as its newest bid.
    ///
    /// A bid already present under the same identity is dropped first, so
    /// bid identities stay unique within the request.
    #[must_use]
    pub fn prepend_bid(&self, bid: Bid) -> Self {
        let remaining = reconcile::remove_by_identity(&self.bids, &bid.id).value;
        Self {
            id: self.id.clone(),
            fields: self.fields.clone(),
            bids: reconcile::prepend(&remaining, bid),
        }
    }

    /// Copy of this request without the bid `id`.
    ///
    /// `matched` is zero when the request had no such bid.
    pub fn remove_bid(&self, id: &BidId) -> Reconciled<Self> {
        reconcile::remove_by_identity(&self.bids, id).map(|bids| Self {
            id: self.id.clone(),
            fields: self.fields.clone(),
            bids,
        })
    }
}

impl Identified for Request {
    type Id = RequestId;

    fn id(&self) -> &RequestId {
        &self.id
    }
}

/// Flat entity: identity plus fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record<I> {
    /// Server-assigned identity.
    #[serde(rename = "_id")]
    pub id: I,
    /// Caller-supplied fields.
    #[serde(default)]
    pub fields: Fields,
}

impl<I> Record<I> {
    /// Create a record with no fields.
    pub fn new(id: impl Into<I>) -> Self {
        Self { id: id.into(), fields: Fields::new() }
    }

    /// Builder: set a field.
    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Field value by name. `None` if unset.
    pub fn field(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }
}

impl<I> Identified for Record<I>
where
    I: Clone + Eq + Hash + fmt::Debug + fmt::Display,
{
    type Id = I;

    fn id(&self) -> &I {
        &self.id
    }
}

/// Service-provider profile.
pub type Profile = Record<ProfileId>;

/// Venue listing.
pub type Venue = Record<VenueId>;

/// Workshop listing.
pub type Workshop = Record<WorkshopId>;

/// Form data for a create operation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Form {
    /// Submitted fields.
    pub fields: Fields,
}

impl Form {
    /// Empty form.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set a field.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Submitted value by name. `None` if not submitted.
    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    /// Overwrite `target` with every submitted field.
    pub fn merge_into(&self, target: &mut Fields) {
        for (key, value) in &self.fields {
            target.insert(key.clone(), value.clone());
        }
    }
}

/// Form data for an update: the target identity is mandatory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Update<I> {
    /// Entity to update.
    #[serde(rename = "_id")]
    pub id: I,
    /// Submitted fields.
    pub form: Form,
}

impl<I> Update<I> {
    /// Update for `id` with the given form.
    pub fn new(id: impl Into<I>, form: Form) -> Self {
        Self { id: id.into(), form }
    }
}
