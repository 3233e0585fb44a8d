//! User intents.
//!
//! This module defines [`Intent`], the set of inputs that drive
//! [`crate::App`]. Intents originate from the user interface: form
//! submissions, delete buttons, links, login and logout.

use bidboard_core::{BidId, Form, ProfileId, RequestId, Route, Update, VenueId, Viewer, WorkshopId};

/// Inputs processed by the App.
#[derive(Debug, Clone)]
pub enum Intent {
    /// Viewer authenticated.
    Login(Viewer),

    /// Viewer signed out.
    Logout,

    /// Follow a link.
    Visit(Route),

    /// Submit the new-request form.
    CreateRequest(Form),

    /// Submit the edit-request form.
    UpdateRequest(Update<RequestId>),

    /// Delete a request.
    DeleteRequest(RequestId),

    /// Submit a bid on a request.
    CreateBid {
        /// Request being bid on.
        request_id: RequestId,
        /// Amount and terms.
        form: Form,
    },

    /// Withdraw a bid.
    DeleteBid {
        /// Request owning the bid.
        request_id: RequestId,
        /// Bid to withdraw.
        bid_id: BidId,
    },

    /// Submit the edit-profile form.
    UpdateProfile(Update<ProfileId>),

    /// Submit the edit-venue form.
    UpdateVenue(Update<VenueId>),

    /// Submit the new-workshop form.
    CreateWorkshop(Form),

    /// Delete a workshop.
    DeleteWorkshop(WorkshopId),

    /// Re-fetch the viewer's collections.
    Refresh,

    /// Quit the application.
    Quit,
}
