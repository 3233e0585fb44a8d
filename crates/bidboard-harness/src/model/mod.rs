//! Reference model for model-based testing.
//!
//! [`ModelBoard`] is the simplest possible implementation of one viewer's
//! board: plain vectors of titles and bid amounts, mutated synchronously and
//! never failing. Applying the same [`Operation`] sequence to the model and
//! to a real App must produce the same [`ObservableState`].

mod operation;

use bidboard_app::App;
use bidboard_core::{FieldValue, Fields, Remote};
pub use operation::{AMOUNT_FIELD, Operation, TITLE_FIELD, sequence_from_seed};
use operation::pick;

/// One request as the viewer sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelRequest {
    /// Title. `None` if unset or not a small integer.
    pub title: Option<u8>,
    /// Bid amounts, newest first.
    pub bids: Vec<Option<u16>>,
}

/// State compared between model and real system.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObservableState {
    /// Requests, newest first.
    pub requests: Vec<ModelRequest>,
    /// Profile titles, in fetch order.
    pub profiles: Vec<Option<u8>>,
    /// Venue titles, in fetch order.
    pub venues: Vec<Option<u8>>,
    /// Workshop titles, newest first.
    pub workshops: Vec<Option<u8>>,
}

impl ObservableState {
    /// Observe a real App. Session collections are empty without a session.
    pub fn observe<R: Remote>(app: &App<R>) -> Self {
        let mut state = Self {
            workshops: app.workshops().iter().map(|w| title(&w.fields)).collect(),
            ..Self::default()
        };

        if let Ok(session) = app.session() {
            state.requests = session
                .requests()
                .iter()
                .map(|request| ModelRequest {
                    title: title(&request.fields),
                    bids: request.bids.iter().map(|bid| amount(&bid.fields)).collect(),
                })
                .collect();
            state.profiles = session.profiles().iter().map(|p| title(&p.fields)).collect();
            state.venues = session.venues().iter().map(|v| title(&v.fields)).collect();
        }

        state
    }
}

fn small_integer<T: TryFrom<u64>>(value: Option<&FieldValue>) -> Option<T> {
    let integer = value?.as_integer()?;
    let wide = u64::try_from(integer).ok()?;
    T::try_from(wide).ok()
}

fn title(fields: &Fields) -> Option<u8> {
    small_integer(fields.get(TITLE_FIELD))
}

fn amount(fields: &Fields) -> Option<u16> {
    small_integer(fields.get(AMOUNT_FIELD))
}

/// Reference implementation of a logged-in viewer's board.
#[derive(Debug, Clone, Default)]
pub struct ModelBoard {
    state: ObservableState,
}

impl ModelBoard {
    /// Model starting from `state`, typically observed right after login.
    pub fn new(state: ObservableState) -> Self {
        Self { state }
    }

    /// Current model state.
    pub fn observable_state(&self) -> &ObservableState {
        &self.state
    }

    /// Apply `op`. Returns `false` if the operation had nothing to act on.
    ///
    /// Skips under exactly the conditions [`Operation::resolve`] returns
    /// `None` for a logged-in App.
    pub fn apply(&mut self, op: &Operation) -> bool {
        let state = &mut self.state;
        match *op {
            Operation::Refresh => true,
            Operation::CreateRequest { title } => {
                state.requests.insert(0, ModelRequest { title: Some(title), bids: Vec::new() });
                true
            },
            Operation::UpdateRequest { target, title } => {
                let Some(index) = pick(target, state.requests.len()) else { return false };
                state.requests[index].title = Some(title);
                true
            },
            Operation::DeleteRequest { target } => {
                let Some(index) = pick(target, state.requests.len()) else { return false };
                state.requests.remove(index);
                true
            },
            Operation::CreateBid { target, amount } => {
                let Some(index) = pick(target, state.requests.len()) else { return false };
                state.requests[index].bids.insert(0, Some(amount));
                true
            },
            Operation::DeleteBid { target, bid } => {
                let Some(index) = pick(target, state.requests.len()) else { return false };
                let bids = &mut state.requests[index].bids;
                let Some(bid) = pick(bid, bids.len()) else { return false };
                bids.remove(bid);
                true
            },
            Operation::UpdateProfile { target, title } => {
                let Some(index) = pick(target, state.profiles.len()) else { return false };
                state.profiles[index] = Some(title);
                true
            },
            Operation::UpdateVenue { target, title } => {
                let Some(index) = pick(target, state.venues.len()) else { return false };
                state.venues[index] = Some(title);
                true
            },
            Operation::CreateWorkshop { title } => {
                state.workshops.insert(0, Some(title));
                true
            },
            Operation::DeleteWorkshop { target } => {
                let Some(index) = pick(target, state.workshops.len()) else { return false };
                state.workshops.remove(index);
                true
            },
        }
    }
}
