//! Navigation targets.
//!
//! Every view of the application is addressed by a [`Route`]. Routes render
//! to and parse from URL paths, and know whether they may only be shown to an
//! authenticated viewer.

use std::fmt;

use crate::id::{ProfileId, RequestId, ReviewId, VenueId, WorkshopId};

/// A navigable view.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    /// `/`
    Landing,
    /// `/profiles`
    Profiles,
    /// `/profile/:id`
    Profile(ProfileId),
    /// `/profile/:id/edit`
    EditProfile(ProfileId),
    /// `/profile/:id/reviews/:review`
    EditReview {
        /// Profile the review belongs to.
        profile_id: ProfileId,
        /// Review being edited.
        review_id: ReviewId,
    },
    /// `/venues`
    Venues,
    /// `/venues/new`
    NewVenue,
    /// `/venues/:id`
    Venue(VenueId),
    /// `/venues/:id/edit`
    EditVenue(VenueId),
    /// `/workshops`
    Workshops,
    /// `/workshops/new`
    NewWorkshop,
    /// `/workshops/:id`
    Workshop(WorkshopId),
    /// `/requests`
    Requests,
    /// `/newRequest`
    NewRequest,
    /// `/editRequest/:id`
    EditRequest(RequestId),
    /// `/auth/signup`
    Signup,
    /// `/auth/login`
    Login,
    /// `/auth/change-password`
    ChangePassword,
}

impl Route {
    /// URL path of this route.
    pub fn path(&self) -> String {
        match self {
            Self::Landing => "/".to_string(),
            Self::Profiles => "/profiles".to_string(),
            Self::Profile(id) => format!("/profile/{id}"),
            Self::EditProfile(id) => format!("/profile/{id}/edit"),
            Self::EditReview { profile_id, review_id } => {
                format!("/profile/{profile_id}/reviews/{review_id}")
            },
            Self::Venues => "/venues".to_string(),
            Self::NewVenue => "/venues/new".to_string(),
            Self::Venue(id) => format!("/venues/{id}"),
            Self::EditVenue(id) => format!("/venues/{id}/edit"),
            Self::Workshops => "/workshops".to_string(),
            Self::NewWorkshop => "/workshops/new".to_string(),
            Self::Workshop(id) => format!("/workshops/{id}"),
            Self::Requests => "/requests".to_string(),
            Self::NewRequest => "/newRequest".to_string(),
            Self::EditRequest(id) => format!("/editRequest/{id}"),
            Self::Signup => "/auth/signup".to_string(),
            Self::Login => "/auth/login".to_string(),
            Self::ChangePassword => "/auth/change-password".to_string(),
        }
    }

    /// Parse a URL path. `None` if no route matches.
    ///
    /// A single trailing slash is ignored. Literal segments win over
    /// identities, so `/venues/new` is [`Route::NewVenue`].
    pub fn parse(path: &str) -> Option<Self> {
        let rest = path.strip_prefix('/')?;
        let rest = rest.strip_suffix('/').unwrap_or(rest);
        if rest.is_empty() {
            return Some(Self::Landing);
        }

        let segments: Vec<&str> = rest.split('/').collect();
        if segments.iter().any(|segment| segment.is_empty()) {
            return None;
        }

        let route = match segments.as_slice() {
            ["profiles"] => Self::Profiles,
            ["profile", id] => Self::Profile(ProfileId::new(*id)),
            ["profile", id, "edit"] => Self::EditProfile(ProfileId::new(*id)),
            ["profile", id, "reviews", review] => Self::EditReview {
                profile_id: ProfileId::new(*id),
                review_id: ReviewId::new(*review),
            },
            ["venues"] => Self::Venues,
            ["venues", "new"] => Self::NewVenue,
            ["venues", id] => Self::Venue(VenueId::new(*id)),
            ["venues", id, "edit"] => Self::EditVenue(VenueId::new(*id)),
            ["workshops"] => Self::Workshops,
            ["workshops", "new"] => Self::NewWorkshop,
            ["workshops", id] => Self::Workshop(WorkshopId::new(*id)),
            ["requests"] => Self::Requests,
            ["newRequest"] => Self::NewRequest,
            ["editRequest", id] => Self::EditRequest(RequestId::new(*id)),
            ["auth", "signup"] => Self::Signup,
            ["auth", "login"] => Self::Login,
            ["auth", "change-password"] => Self::ChangePassword,
            _ => return None,
        };

        Some(route)
    }

    /// Whether only an authenticated viewer may see this route.
    ///
    /// The landing page, the workshop catalogue and the sign-up/login forms
    /// are public; everything else is protected.
    pub fn requires_viewer(&self) -> bool {
        !matches!(
            self,
            Self::Landing | Self::Workshops | Self::Workshop(_) | Self::Signup | Self::Login
        )
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_routes() -> Vec<Route> {
        vec![
            Route::Landing,
            Route::Profiles,
            Route::Profile("p1".into()),
            Route::EditProfile("p1".into()),
            Route::EditReview { profile_id: "p1".into(), review_id: "rv1".into() },
            Route::Venues,
            Route::NewVenue,
            Route::Venue("v1".into()),
            Route::EditVenue("v1".into()),
            Route::Workshops,
            Route::NewWorkshop,
            Route::Workshop("w1".into()),
            Route::Requests,
            Route::NewRequest,
            Route::EditRequest("r1".into()),
            Route::Signup,
            Route::Login,
            Route::ChangePassword,
        ]
    }

    #[test]
    fn every_route_parses_its_own_path() {
        for route in all_routes() {
            assert_eq!(Route::parse(&route.path()), Some(route.clone()), "{route}");
        }
    }

    #[test]
    fn literal_segments_win_over_ids() {
        assert_eq!(Route::parse("/venues/new"), Some(Route::NewVenue));
        assert_eq!(Route::parse("/workshops/new"), Some(Route::NewWorkshop));
        assert_eq!(Route::parse("/workshops/w7"), Some(Route::Workshop("w7".into())));
    }

    #[test]
    fn trailing_slash_is_ignored() {
        assert_eq!(Route::parse("/requests/"), Some(Route::Requests));
        assert_eq!(Route::parse("/"), Some(Route::Landing));
    }

    #[test]
    fn malformed_paths_are_rejected() {
        assert_eq!(Route::parse(""), None);
        assert_eq!(Route::parse("requests"), None);
        assert_eq!(Route::parse("/profile//edit"), None);
        assert_eq!(Route::parse("/nope"), None);
        assert_eq!(Route::parse("/venues/v1/edit/extra"), None);
    }

    #[test]
    fn public_routes() {
        let public: Vec<String> =
            all_routes().iter().filter(|r| !r.requires_viewer()).map(Route::path).collect();

        insta::assert_snapshot!(public.join(" "), @"/ /workshops /workshops/w1 /auth/signup /auth/login");
    }

    #[test]
    fn edit_review_path() {
        let route = Route::EditReview { profile_id: "p1".into(), review_id: "rv1".into() };
        insta::assert_snapshot!(route.to_string(), @"/profile/p1/reviews/rv1");
    }
}
