use axum::{
    routing::{get, patch, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_cookies::CookieManagerLayer;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{handlers, state::AppState, store::Store};

pub fn create_router<S: Store>(state: AppState<S>) -> Router {
    let api = Router::new()
        // Linen types
        .route(
            "/linen-types",
            get(handlers::catalog::list_linen_types::<S>).post(handlers::catalog::create_linen_type::<S>),
        )
        .route("/linen-types/:id", patch(handlers::catalog::update_linen_type::<S>))

        // Rooms
        .route(
            "/rooms",
            get(handlers::catalog::list_rooms::<S>).post(handlers::catalog::create_room::<S>),
        )
        .route(
            "/rooms/:id",
            get(handlers::catalog::room_detail::<S>).patch(handlers::catalog::update_room::<S>),
        )
        .route("/rooms/:id/status", put(handlers::catalog::update_room_status::<S>))
        .route("/rooms/:id/dirty-items", get(handlers::linen::awaiting_collection::<S>))
        .route("/rooms/:id/checklist", post(handlers::checklist::start::<S>))
        .route("/rooms/:id/checklist/current", get(handlers::checklist::current_for_room::<S>))

        // Room linen configuration
        .route("/room-config", put(handlers::catalog::set_requirement::<S>))
        .route("/room-config/:room_type", get(handlers::catalog::room_config::<S>))

        // Linen items
        .route(
            "/linen-items",
            get(handlers::linen::list_items::<S>).post(handlers::linen::register_item::<S>),
        )
        .route("/linen-items/damaged", get(handlers::linen::damaged_items::<S>))
        .route("/linen-items/:id", get(handlers::linen::item_detail::<S>))
        .route("/linen-items/:id/move", post(handlers::linen::move_item::<S>))
        .route("/linen-items/:id/discard", post(handlers::linen::discard_item::<S>))
        .route("/linen-items/:id/repair", post(handlers::linen::repair_item::<S>))

        // Movements
        .route("/movements", get(handlers::movements::list_movements::<S>))

        // Laundry
        .route("/laundry", get(handlers::laundry::list_laundry::<S>))
        .route("/laundry/collect", post(handlers::laundry::collect::<S>))
        .route("/laundry/wash", post(handlers::laundry::register_wash::<S>))
        .route("/laundry/deliver", post(handlers::laundry::deliver::<S>))

        // Checklists
        .route("/checklists/:id", get(handlers::checklist::detail::<S>))
        .route("/checklists/:id/initialize", post(handlers::checklist::initialize::<S>))
        .route("/checklists/:id/items", post(handlers::checklist::add_item::<S>))
        .route("/checklists/:id/complete", post(handlers::checklist::complete::<S>))
        .route("/checklist-items/:id", patch(handlers::checklist::update_item::<S>));

    Router::new()
        .nest("/api", api)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CookieManagerLayer::new())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
