//! Handler implementations and Flux wiring.
//!
//! Each screen is a service struct that owns its behaviour; the
//! `register_*` functions bind request paths to its methods, downcasting
//! the payload on the way in.

pub mod debounce;
pub mod location_handlers;
pub mod map;
pub mod reveal_cache;
pub mod reveal_handlers;
pub mod search_handlers;
pub mod verifier_handlers;

#[cfg(test)]
pub(crate) mod testutil;

use std::sync::Arc;

use scout_client::{ProtectedDataApi, ReverseGeocoder, UserSearchApi, VerifierApi};
use scout_core::ScoutConfig;
use scout_flux::{Flux, I18nStore, Payload, StateStore};
use tracing::{info, warn};

use crate::request::*;
use crate::state::*;
pub use location_handlers::{LocationPicker, PickerOptions};
pub use reveal_handlers::RevealService;
pub use search_handlers::{SearchController, SearchScreen};
pub use verifier_handlers::VerifierScreens;

/// Remote collaborators, usually the reqwest clients from `scout-client`.
pub struct Clients {
    pub search: Arc<dyn UserSearchApi>,
    pub protected: Arc<dyn ProtectedDataApi>,
    pub geocoder: Arc<dyn ReverseGeocoder>,
    pub verifier: Arc<dyn VerifierApi>,
}

/// Every screen service, built from one configuration.
pub struct ScoutContext {
    pub i18n: Arc<I18nStore>,
    pub search: Arc<SearchController>,
    pub reveal: Arc<RevealService>,
    pub location: Arc<LocationPicker>,
    pub verifier: Arc<VerifierScreens>,
}

impl ScoutContext {
    pub fn from_config(cfg: &ScoutConfig, clients: Clients, picker: PickerOptions) -> Self {
        let i18n = Arc::new(I18nStore::new(&cfg.locale));
        crate::i18n_strings::register_all(&i18n);

        let search = Arc::new(SearchController::new(
            clients.search,
            Arc::clone(&i18n),
            SearchScreen::from_config(&cfg.search),
        ));
        let reveal = Arc::new(RevealService::new(clients.protected, &cfg.reveal));
        let location = Arc::new(LocationPicker::new(clients.geocoder, Arc::clone(&search), picker));
        let verifier = Arc::new(VerifierScreens::new(clients.verifier, Arc::clone(&i18n)));

        Self { i18n, search, reveal, location, verifier }
    }
}

/// Register every handler with a Flux instance.
pub fn register_handlers(flux: &Flux, ctx: &ScoutContext) {
    register_app(flux, Arc::clone(&ctx.i18n));
    register_search(flux, Arc::clone(&ctx.search));
    register_reveal(flux, Arc::clone(&ctx.reveal));
    register_location(flux, Arc::clone(&ctx.location));
    register_verifier(flux, Arc::clone(&ctx.verifier));
}

/// Typed view of a request payload; logs and yields `None` on mismatch.
fn request<'a, T: 'static>(path: &str, payload: &'a Payload) -> Option<&'a T> {
    let req = payload.downcast_ref::<T>();
    if req.is_none() {
        warn!(path, expected = std::any::type_name::<T>(), "unexpected payload type");
    }
    req
}

pub fn register_app(flux: &Flux, i18n: Arc<I18nStore>) {
    flux.on(SetLocaleReq::PATH, move |path, payload, _| {
        let i18n = Arc::clone(&i18n);
        async move {
            if let Some(req) = request::<SetLocaleReq>(&path, &payload) {
                info!(locale = %req.locale, "locale changed");
                i18n.set_locale(&req.locale);
            }
        }
    });
}

pub fn register_search(flux: &Flux, ctl: Arc<SearchController>) {
    // app/initialize
    {
        let ctl = Arc::clone(&ctl);
        flux.on(InitializeReq::PATH, move |_, _, store: Arc<StateStore>| {
            let ctl = Arc::clone(&ctl);
            async move { ctl.seed(&store) }
        });
    }

    // search/set-field
    {
        let ctl = Arc::clone(&ctl);
        flux.on(SetFieldReq::PATH, move |path, payload, store: Arc<StateStore>| {
            let ctl = Arc::clone(&ctl);
            async move {
                if let Some(req) = request::<SetFieldReq>(&path, &payload) {
                    ctl.handle_set_field(req, &store);
                }
            }
        });
    }

    // search/submit
    {
        let ctl = Arc::clone(&ctl);
        flux.on(SubmitSearchReq::PATH, move |_, _, store: Arc<StateStore>| {
            let ctl = Arc::clone(&ctl);
            async move { ctl.handle_submit(&store).await }
        });
    }

    // search/next-page
    {
        let ctl = Arc::clone(&ctl);
        flux.on(NextPageReq::PATH, move |_, _, store: Arc<StateStore>| {
            let ctl = Arc::clone(&ctl);
            async move { ctl.handle_next(&store).await }
        });
    }

    // search/previous-page
    {
        let ctl = Arc::clone(&ctl);
        flux.on(PreviousPageReq::PATH, move |_, _, store: Arc<StateStore>| {
            let ctl = Arc::clone(&ctl);
            async move { ctl.handle_previous(&store).await }
        });
    }

    // search/go-to-page
    {
        let ctl = Arc::clone(&ctl);
        flux.on(GoToPageReq::PATH, move |path, payload, store: Arc<StateStore>| {
            let ctl = Arc::clone(&ctl);
            async move {
                if let Some(req) = request::<GoToPageReq>(&path, &payload) {
                    ctl.handle_go_to(req, &store).await;
                }
            }
        });
    }

    // search/clear
    {
        let ctl = Arc::clone(&ctl);
        flux.on(ClearSearchReq::PATH, move |_, _, store: Arc<StateStore>| {
            let ctl = Arc::clone(&ctl);
            async move { ctl.handle_clear(&store) }
        });
    }

    // The page label is localized.
    {
        let ctl = Arc::clone(&ctl);
        flux.on(SetLocaleReq::PATH, move |_, _, store: Arc<StateStore>| {
            let ctl = Arc::clone(&ctl);
            async move { ctl.publish_view(&store) }
        });
    }

    // Revealed cells show up in the table rows.
    let store = Arc::downgrade(flux.store());
    flux.subscribe(RevealField::PATTERN, move |_, _| {
        if let Some(store) = store.upgrade() {
            ctl.publish_view(&store);
        }
    });
}

pub fn register_reveal(flux: &Flux, svc: Arc<RevealService>) {
    // reveal/toggle
    {
        let svc = Arc::clone(&svc);
        flux.on(ToggleRevealReq::PATH, move |path, payload, store: Arc<StateStore>| {
            let svc = Arc::clone(&svc);
            async move {
                if let Some(req) = request::<ToggleRevealReq>(&path, &payload) {
                    svc.handle_toggle(req, &store).await;
                }
            }
        });
    }

    // A cleared search forgets what was revealed.
    flux.on(ClearSearchReq::PATH, move |_, _, store: Arc<StateStore>| {
        let svc = Arc::clone(&svc);
        async move { svc.reset(&store) }
    });
}

pub fn register_location(flux: &Flux, picker: Arc<LocationPicker>) {
    // app/initialize
    {
        let picker = Arc::clone(&picker);
        flux.on(InitializeReq::PATH, move |_, _, store: Arc<StateStore>| {
            let picker = Arc::clone(&picker);
            async move { picker.seed(&store) }
        });
    }

    // location/select-marker
    {
        let picker = Arc::clone(&picker);
        flux.on(SelectMarkerReq::PATH, move |path, payload, store: Arc<StateStore>| {
            let picker = Arc::clone(&picker);
            async move {
                if let Some(req) = request::<SelectMarkerReq>(&path, &payload) {
                    picker.handle_select_marker(req, &store).await;
                }
            }
        });
    }

    // location/select-department
    {
        let picker = Arc::clone(&picker);
        flux.on(SelectDepartmentReq::PATH, move |path, payload, store: Arc<StateStore>| {
            let picker = Arc::clone(&picker);
            async move {
                if let Some(req) = request::<SelectDepartmentReq>(&path, &payload) {
                    picker.handle_select_department(req, &store).await;
                }
            }
        });
    }

    // location/click
    {
        let picker = Arc::clone(&picker);
        flux.on(MapClickReq::PATH, move |path, payload, store: Arc<StateStore>| {
            let picker = Arc::clone(&picker);
            async move {
                if let Some(req) = request::<MapClickReq>(&path, &payload) {
                    picker.handle_click(req, &store).await;
                }
            }
        });
    }

    // map/load-departments
    {
        let picker = Arc::clone(&picker);
        flux.on(LoadDepartmentsReq::PATH, move |path, payload, store: Arc<StateStore>| {
            let picker = Arc::clone(&picker);
            async move {
                if let Some(req) = request::<LoadDepartmentsReq>(&path, &payload) {
                    picker.handle_load_departments(req, &store);
                }
            }
        });
    }

    // map/zoom-in
    {
        let picker = Arc::clone(&picker);
        flux.on(ZoomInReq::PATH, move |_, _, store: Arc<StateStore>| {
            let picker = Arc::clone(&picker);
            async move { picker.handle_zoom_in(&store) }
        });
    }

    // map/zoom-out
    flux.on(ZoomOutReq::PATH, move |_, _, store: Arc<StateStore>| {
        let picker = Arc::clone(&picker);
        async move { picker.handle_zoom_out(&store) }
    });
}

pub fn register_verifier(flux: &Flux, screens: Arc<VerifierScreens>) {
    // app/initialize
    {
        let screens = Arc::clone(&screens);
        flux.on(InitializeReq::PATH, move |_, _, store: Arc<StateStore>| {
            let screens = Arc::clone(&screens);
            async move { screens.seed(&store) }
        });
    }

    // email-finder/submit
    {
        let screens = Arc::clone(&screens);
        flux.on(FindEmailsReq::PATH, move |path, payload, store: Arc<StateStore>| {
            let screens = Arc::clone(&screens);
            async move {
                if let Some(req) = request::<FindEmailsReq>(&path, &payload) {
                    screens.handle_find_emails(req, &store).await;
                }
            }
        });
    }

    // domain-trace/submit
    flux.on(TraceDomainReq::PATH, move |path, payload, store: Arc<StateStore>| {
        let screens = Arc::clone(&screens);
        async move {
            if let Some(req) = request::<TraceDomainReq>(&path, &payload) {
                screens.handle_trace(req, &store).await;
            }
        }
    });
}
