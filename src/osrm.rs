//! Client for the OSRM HTTP API.
//!
//! The engine is an opaque collaborator, everything this crate knows about it
//! is the `route` service: two coordinates in, distance in meters and duration
//! in seconds out. Map data, contraction and the actual search all live on the
//! server side.

use std::{error::Error, fmt, time::Duration};

use serde::Deserialize;

use crate::{cli::env_override, geo::Coordinate};

/// Connection parameters for the engine, read from `OSRM_URL` and `OSRM_PROFILE`.
#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: String,
    pub profile: String,
}

impl Config {
    pub fn from_env() -> Config {
        Config {
            base_url: env_override("OSRM_URL", "http://localhost:5000".to_string()),
            profile: env_override("OSRM_PROFILE", "driving".to_string()),
        }
    }
}

/// Distance in meters and duration in seconds of the best found route.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteSummary {
    pub distance: f64,
    pub duration: f64,
}

#[derive(Debug)]
pub enum RouteError {
    /// The engine answered but could not route this pair. Becomes a sentinel row.
    NoRoute { code: String },
    /// Transport failure or an unreadable response. Aborts the run.
    Engine(Box<dyn Error + Send + Sync>),
}

impl fmt::Display for RouteError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RouteError::NoRoute { code } => write!(f, "engine could not route pair: {}", code),
            RouteError::Engine(err) => write!(f, "routing engine failure: {}", err),
        }
    }
}

impl Error for RouteError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            RouteError::NoRoute { .. } => None,
            RouteError::Engine(err) => Some(err.as_ref()),
        }
    }
}

/// The seam between table assembly and the actual engine.
/// Implementations must be callable from multiple worker threads.
pub trait RouteService: Sync {
    fn route(&self, from: Coordinate, to: Coordinate) -> Result<RouteSummary, RouteError>;
}

#[derive(Debug, Deserialize)]
struct RouteResponse {
    code: String,
    #[serde(default)]
    routes: Vec<Route>,
}

#[derive(Debug, Deserialize)]
struct Route {
    distance: f64,
    duration: f64,
}

fn summarize(response: RouteResponse) -> Result<RouteSummary, RouteError> {
    let RouteResponse { code, routes } = response;
    if code != "Ok" {
        return Err(RouteError::NoRoute { code });
    }
    // code Ok with no routes should not happen, treat it like an unroutable pair
    let route = routes.into_iter().next().ok_or(RouteError::NoRoute { code: "EmptyRoutes".to_string() })?;
    Ok(RouteSummary {
        distance: route.distance,
        duration: route.duration,
    })
}

/// Blocking HTTP client for the engine's `route` service.
pub struct Router {
    client: reqwest::blocking::Client,
    config: Config,
}

impl Router {
    pub fn connect(config: Config) -> Result<Router, Box<dyn Error>> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(env_override("OSRM_TIMEOUT_S", 180)))
            .build()?;
        Ok(Router { client, config })
    }

    fn request_url(&self, from: Coordinate, to: Coordinate) -> String {
        // geometries are irrelevant for the tables, skip them
        format!("{}/route/v1/{}/{};{}?overview=false", self.config.base_url, self.config.profile, from, to)
    }
}

impl RouteService for Router {
    fn route(&self, from: Coordinate, to: Coordinate) -> Result<RouteSummary, RouteError> {
        // unroutable pairs come back with HTTP 400 and a code in the body,
        // so the JSON body is authoritative, not the status line
        let response = self.client.get(self.request_url(from, to)).send().map_err(engine_err)?;
        let body: RouteResponse = response.json().map_err(engine_err)?;
        summarize(body)
    }
}

fn engine_err(err: reqwest::Error) -> RouteError {
    RouteError::Engine(Box::new(err))
}
