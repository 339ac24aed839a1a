#![forbid(unsafe_code)]
//! JSON API of the fishery dashboard.

pub mod config;
mod error;
mod handlers;
pub mod state;

use std::convert::Infallible;

use serde::de::DeserializeOwned;
use warp::{filters::BoxedFilter, reply::Response, Filter, Rejection, Reply};

use crate::{
    error::handle_rejection,
    handlers::{payments, records, reference, reply, spots},
    state::with_state,
};
pub use crate::{error::ApiError, state::AppState};

const JSON_LIMIT: u64 = 1024 * 1024;

fn json_body<T: DeserializeOwned + Send>() -> impl Filter<Extract = (T,), Error = Rejection> + Clone {
    warp::body::content_length_limit(JSON_LIMIT).and(warp::body::json())
}

/// Every endpoint, with rejections rendered as JSON and requests logged.
pub fn routes(state: AppState) -> impl Filter<Extract = (impl Reply,), Error = Infallible> + Clone {
    record_routes(state.clone())
        .or(payment_routes(state.clone()))
        .unify()
        .or(reference_routes(state.clone()))
        .unify()
        .or(spot_routes(state))
        .unify()
        .recover(handle_rejection)
        .with(warp::log("fishery_web"))
}

fn record_routes(state: AppState) -> BoxedFilter<(Response,)> {
    // GET /fishing-records
    let list = warp::path!("fishing-records")
        .and(warp::get())
        .and(warp::query::<records::ListQuery>())
        .and(with_state(state.clone()))
        .then(records::list)
        .map(reply);

    // GET /fishing-records/stats
    let stats = warp::path!("fishing-records" / "stats")
        .and(warp::get())
        .and(warp::query::<records::StatsQuery>())
        .and(with_state(state.clone()))
        .then(records::stats)
        .map(reply);

    // POST /fishing-records
    let create = warp::path!("fishing-records")
        .and(warp::post())
        .and(json_body())
        .and(with_state(state.clone()))
        .then(records::create)
        .map(reply);

    // GET /fishing-records/:ID
    let get = warp::path!("fishing-records" / String)
        .and(warp::get())
        .and(with_state(state.clone()))
        .then(records::get)
        .map(reply);

    // PUT /fishing-records/:ID
    let replace = warp::path!("fishing-records" / String)
        .and(warp::put())
        .and(json_body())
        .and(with_state(state.clone()))
        .then(records::replace)
        .map(reply);

    // PATCH /fishing-records/:ID
    let patch = warp::path!("fishing-records" / String)
        .and(warp::patch())
        .and(json_body())
        .and(with_state(state.clone()))
        .then(records::patch)
        .map(reply);

    // DELETE /fishing-records/:ID
    let delete = warp::path!("fishing-records" / String)
        .and(warp::delete())
        .and(with_state(state))
        .then(records::delete)
        .map(reply);

    list.or(stats)
        .unify()
        .or(create)
        .unify()
        .or(get)
        .unify()
        .or(replace)
        .unify()
        .or(patch)
        .unify()
        .or(delete)
        .unify()
        .boxed()
}

fn payment_routes(state: AppState) -> BoxedFilter<(Response,)> {
    // GET /payments
    let list = warp::path!("payments")
        .and(warp::get())
        .and(warp::query::<payments::ListQuery>())
        .and(with_state(state.clone()))
        .then(payments::list)
        .map(reply);

    // POST /payments
    let create = warp::path!("payments")
        .and(warp::post())
        .and(json_body())
        .and(with_state(state.clone()))
        .then(payments::create)
        .map(reply);

    // GET /payments/:ID
    let get = warp::path!("payments" / String)
        .and(warp::get())
        .and(with_state(state.clone()))
        .then(payments::get)
        .map(reply);

    // DELETE /payments/:ID
    let cancel = warp::path!("payments" / String)
        .and(warp::delete())
        .and(with_state(state))
        .then(payments::cancel)
        .map(reply);

    list.or(create)
        .unify()
        .or(get)
        .unify()
        .or(cancel)
        .unify()
        .boxed()
}

fn reference_routes(state: AppState) -> BoxedFilter<(Response,)> {
    // GET /fish-distribution
    let distribution = warp::path!("fish-distribution")
        .and(warp::get())
        .and(warp::query::<reference::DistributionQuery>())
        .and(with_state(state.clone()))
        .then(reference::distribution)
        .map(reply);

    // GET /fish-species
    let species = warp::path!("fish-species")
        .and(warp::get())
        .and(with_state(state))
        .then(reference::species)
        .map(reply);

    distribution.or(species).unify().boxed()
}

fn spot_routes(state: AppState) -> BoxedFilter<(Response,)> {
    // GET /fishing-spots
    let list = warp::path!("fishing-spots")
        .and(warp::get())
        .and(with_state(state.clone()))
        .then(spots::list)
        .map(reply);

    // POST /fishing-spots
    let create = warp::path!("fishing-spots")
        .and(warp::post())
        .and(json_body())
        .and(with_state(state.clone()))
        .then(spots::create)
        .map(reply);

    // PUT /fishing-spots/:ID
    let replace = warp::path!("fishing-spots" / String)
        .and(warp::put())
        .and(json_body())
        .and(with_state(state.clone()))
        .then(spots::replace)
        .map(reply);

    // DELETE /fishing-spots/:ID
    let delete = warp::path!("fishing-spots" / String)
        .and(warp::delete())
        .and(with_state(state))
        .then(spots::delete)
        .map(reply);

    list.or(create)
        .unify()
        .or(replace)
        .unify()
        .or(delete)
        .unify()
        .boxed()
}
